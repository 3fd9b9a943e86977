const CRC16_POLY_REFLECTED: u16 = 0x8408;
const CRC16_INIT: u16 = 0xFFFF;

/// CRC-16/X.25 frame check sequence used by AX.25
///
/// Reflected CRC-16-CCITT (polynomial 0x1021, processed LSB first as 0x8408),
/// initial value 0xFFFF, final complement. Updated one bit at a time in the
/// same order the bits go out on the line.
#[derive(Debug, Clone)]
pub struct Crc16 {
    register: u16,
}

impl Crc16 {
    pub fn new() -> Self {
        Self {
            register: CRC16_INIT,
        }
    }

    /// Reset the register at the start of a frame
    pub fn reset(&mut self) {
        self.register = CRC16_INIT;
    }

    pub fn update_bit(&mut self, bit: bool) {
        let low = self.register & 1 == 1;
        self.register >>= 1;
        if low != bit {
            self.register ^= CRC16_POLY_REFLECTED;
        }
    }

    /// Feed bits 0..7 of `byte`, least significant first
    pub fn update_byte(&mut self, byte: u8) {
        for i in 0..8 {
            self.update_bit((byte >> i) & 1 == 1);
        }
    }

    /// Complemented register. Transmit the low byte first.
    pub fn finalize(&self) -> u16 {
        self.register ^ 0xFFFF
    }
}

impl Default for Crc16 {
    fn default() -> Self {
        Self::new()
    }
}

/// CRC-16/X.25 over a complete buffer
pub fn crc16_x25(data: &[u8]) -> u16 {
    let mut crc = Crc16::new();
    for &byte in data {
        crc.update_byte(byte);
    }
    crc.finalize()
}
