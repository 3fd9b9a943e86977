use crate::crc::Crc16;
use crate::error::Result;
use crate::HDLC_FLAG;
use log::trace;

/// Consumer of line bits coming out of the framer (post bit-stuffing,
/// pre NRZI).
pub trait BitSink {
    fn put_bit(&mut self, bit: bool) -> Result<()>;
}

impl BitSink for Vec<bool> {
    fn put_bit(&mut self, bit: bool) -> Result<()> {
        self.push(bit);
        Ok(())
    }
}

impl<S: BitSink + ?Sized> BitSink for &mut S {
    fn put_bit(&mut self, bit: bool) -> Result<()> {
        (**self).put_bit(bit)
    }
}

/// HDLC bit framer
///
/// Serializes bytes LSB first, inserts a 0 after every run of five 1s and
/// keeps the frame check sequence over the logical (unstuffed) bits. Flags go
/// straight to the sink, bypassing both stuffing and the CRC.
pub struct BitFramer<S: BitSink> {
    crc: Crc16,
    /// Last raw bits sent, newest in bit 0
    stuff_register: u8,
    stuffed_bits: usize,
    sink: S,
}

impl<S: BitSink> BitFramer<S> {
    pub fn new(sink: S) -> Self {
        Self {
            crc: Crc16::new(),
            stuff_register: 0,
            stuffed_bits: 0,
            sink,
        }
    }

    /// Reset CRC and stuffing state. Called once, right after the opening flag.
    pub fn start_frame(&mut self) {
        self.crc.reset();
        self.stuff_register = 0;
        self.stuffed_bits = 0;
    }

    /// Send 0x7E MSB first without stuffing or CRC
    pub fn send_flag(&mut self) -> Result<()> {
        trace!("flag {:08b}", HDLC_FLAG);
        for i in (0..8).rev() {
            self.sink.put_bit((HDLC_FLAG >> i) & 1 == 1)?;
        }
        Ok(())
    }

    /// Send a byte LSB first through the stuffing stage and the CRC
    pub fn send_byte(&mut self, byte: u8) -> Result<()> {
        trace!("byte {:08b}", byte);
        for i in 0..8 {
            let bit = (byte >> i) & 1 == 1;
            self.stuff_transmit(bit)?;
            self.crc.update_bit(bit);
        }
        Ok(())
    }

    /// Frame check sequence over everything sent since `start_frame`
    pub fn fcs(&self) -> u16 {
        self.crc.finalize()
    }

    /// Number of 0 bits inserted by stuffing since `start_frame`
    pub fn stuffed_bits(&self) -> usize {
        self.stuffed_bits
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    fn stuff_transmit(&mut self, bit: bool) -> Result<()> {
        self.stuff_register = (self.stuff_register << 1) | bit as u8;
        self.sink.put_bit(bit)?;
        if self.stuff_register & 0x1F == 0x1F {
            self.stuff_register <<= 1;
            self.stuffed_bits += 1;
            self.sink.put_bit(false)?;
        }
        Ok(())
    }
}

/// Remove every 0 that follows five consecutive 1s
pub fn destuff(bits: &[bool]) -> Vec<bool> {
    let mut out = Vec::with_capacity(bits.len());
    let mut ones = 0;
    for &bit in bits {
        if ones == 5 {
            ones = 0;
            if !bit {
                continue;
            }
        }
        out.push(bit);
        if bit {
            ones += 1;
        } else {
            ones = 0;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn bits_to_string(bits: &[bool]) -> String {
        bits.iter().map(|&b| if b { '1' } else { '0' }).collect()
    }

    fn byte_bits_lsb_first(data: &[u8]) -> Vec<bool> {
        data.iter()
            .flat_map(|&byte| (0..8).map(move |i| (byte >> i) & 1 == 1))
            .collect()
    }

    fn frame_bytes(data: &[u8]) -> Vec<bool> {
        let mut framer = BitFramer::new(Vec::new());
        framer.start_frame();
        for &byte in data {
            framer.send_byte(byte).unwrap();
        }
        framer.into_sink()
    }

    #[test]
    fn test_flag_bits() {
        let mut framer = BitFramer::new(Vec::new());
        framer.send_flag().unwrap();
        assert_eq!(bits_to_string(framer.sink()), "01111110");
    }

    #[test]
    fn test_flag_bypasses_crc() {
        let mut framer = BitFramer::new(Vec::new());
        framer.start_frame();
        framer.send_flag().unwrap();
        framer.send_flag().unwrap();
        assert_eq!(framer.fcs(), 0x0000);
    }

    #[test]
    fn test_stuffing_vectors() {
        let pairs: &[(&[u8], &str)] = &[
            (b"", ""),
            (b"\x00", "00000000"),
            (b"\x00\x55", "0000000010101010"),
            (b"\x00\xff\x55", "0000000011111011110101010"),
            (b"\x00\xff\xff", "000000001111101111101111101"),
            (b"\xaa\x07", "0101010111100000"),
        ];
        for (input, want) in pairs {
            let got = frame_bytes(input);
            assert_eq!(bits_to_string(&got), *want, "input {:02x?}", input);
        }
    }

    #[test]
    fn test_stuffed_zero_not_in_crc() {
        let mut framer = BitFramer::new(Vec::new());
        framer.start_frame();
        framer.send_byte(0xFF).unwrap();
        framer.send_byte(0xFF).unwrap();
        assert_eq!(framer.stuffed_bits(), 3);
        assert_eq!(framer.fcs(), crate::crc::crc16_x25(&[0xFF, 0xFF]));
    }

    #[test]
    fn test_start_frame_resets_stuffing() {
        let mut framer = BitFramer::new(Vec::new());
        framer.start_frame();
        // Four 1s pending in the register
        framer.send_byte(0xF0).unwrap();
        framer.start_frame();
        framer.sink_mut().clear();
        // A single 1 must not complete a run of five
        framer.send_byte(0x01).unwrap();
        assert_eq!(bits_to_string(framer.sink()), "10000000");
    }

    #[test]
    fn test_start_frame_resets_stuffed_count() {
        let mut framer = BitFramer::new(Vec::new());
        framer.start_frame();
        framer.send_byte(0xFF).unwrap();
        framer.send_byte(0xFF).unwrap();
        assert_eq!(framer.stuffed_bits(), 3);

        framer.start_frame();
        assert_eq!(framer.stuffed_bits(), 0);
        framer.send_byte(0xFF).unwrap();
        assert_eq!(framer.stuffed_bits(), 1);
    }

    #[test]
    fn test_no_six_ones_in_stuffed_stream() {
        let data = [0xFFu8; 16];
        let bits = frame_bytes(&data);
        let s = bits_to_string(&bits);
        assert!(!s.contains("111111"), "stuffed stream contains flag-like run: {}", s);
    }

    #[test]
    fn test_destuff_round_trip_random() {
        let mut rng = rand::thread_rng();
        for _ in 0..50 {
            let len = rng.gen_range(1..64);
            // Bias towards 1s so long runs show up
            let data: Vec<u8> = (0..len)
                .map(|_| if rng.gen_bool(0.5) { 0xFF } else { rng.gen() })
                .collect();
            let stuffed = frame_bytes(&data);
            assert_eq!(destuff(&stuffed), byte_bits_lsb_first(&data));
        }
    }
}
