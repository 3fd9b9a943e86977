use crate::ax25::{Frame, PathEncoding};
use crate::error::{AprsError, Result};
use crate::framer::{BitFramer, BitSink};
use crate::{AX25_CONTROL_UI, AX25_PID_NO_LAYER3};
use log::debug;

/// Transmission stages of one frame, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblerState {
    SyncStart,
    Addresses,
    ControlPid,
    Info,
    Crc,
    SyncEnd,
    Done,
}

/// Drives a [`BitFramer`] through one AX.25 UI frame
///
/// Each call to [`step`](Self::step) transmits one stage and advances the
/// state. The frame must already be validated (it is, if it was built through
/// [`Frame::new`] or [`Frame::parse`]), so nothing here can reject it half way.
/// Once `Done` the assembler is spent.
pub struct FrameAssembler<'a, S: BitSink> {
    frame: &'a Frame,
    path_encoding: PathEncoding,
    opening_flags: usize,
    closing_flags: usize,
    framer: BitFramer<S>,
    state: AssemblerState,
}

impl<'a, S: BitSink> FrameAssembler<'a, S> {
    /// One opening flag, two closing flags
    pub fn new(frame: &'a Frame, path_encoding: PathEncoding, sink: S) -> Self {
        Self::with_flags(frame, path_encoding, 1, 2, sink)
    }

    pub fn with_flags(
        frame: &'a Frame,
        path_encoding: PathEncoding,
        opening_flags: usize,
        closing_flags: usize,
        sink: S,
    ) -> Self {
        Self {
            frame,
            path_encoding,
            opening_flags,
            closing_flags,
            framer: BitFramer::new(sink),
            state: AssemblerState::SyncStart,
        }
    }

    pub fn state(&self) -> AssemblerState {
        self.state
    }

    /// Transmit the current stage and return the next state
    pub fn step(&mut self) -> Result<AssemblerState> {
        self.state = match self.state {
            AssemblerState::SyncStart => {
                for _ in 0..self.opening_flags {
                    self.framer.send_flag()?;
                }
                debug!("Frame start");
                self.framer.start_frame();
                AssemblerState::Addresses
            }
            AssemblerState::Addresses => {
                self.send_addresses()?;
                AssemblerState::ControlPid
            }
            AssemblerState::ControlPid => {
                self.send_logged(AX25_CONTROL_UI, "control (UI)")?;
                self.send_logged(AX25_PID_NO_LAYER3, "PID (no layer 3)")?;
                AssemblerState::Info
            }
            AssemblerState::Info => {
                for &byte in &self.frame.info {
                    debug!("{:08b} : {:?}", byte, byte as char);
                    self.framer.send_byte(byte)?;
                }
                AssemblerState::Crc
            }
            AssemblerState::Crc => {
                let fcs = self.framer.fcs();
                self.send_logged((fcs & 0xFF) as u8, "CRC low")?;
                self.send_logged((fcs >> 8) as u8, "CRC high")?;
                AssemblerState::SyncEnd
            }
            AssemblerState::SyncEnd => {
                for _ in 0..self.closing_flags {
                    self.framer.send_flag()?;
                }
                debug!(
                    "Frame end, {} stuffed bits",
                    self.framer.stuffed_bits()
                );
                AssemblerState::Done
            }
            AssemblerState::Done => return Err(AprsError::FrameComplete),
        };
        Ok(self.state)
    }

    /// Step until `Done`
    pub fn run(&mut self) -> Result<()> {
        while self.step()? != AssemblerState::Done {}
        Ok(())
    }

    pub fn into_sink(self) -> S {
        self.framer.into_sink()
    }

    fn send_addresses(&mut self) -> Result<()> {
        let fields = self.frame.address_fields(self.path_encoding);
        let last = fields.len() - 1;
        for (i, (address, role)) in fields.iter().enumerate() {
            debug!("{:?} {}", role, address);
            for byte in address.encode(*role, i == last) {
                self.framer.send_byte(byte)?;
            }
        }
        Ok(())
    }

    fn send_logged(&mut self, byte: u8, what: &str) -> Result<()> {
        debug!("{:08b} : {}", byte, what);
        self.framer.send_byte(byte)
    }
}
