//! APRS packet to audio encoder
//!
//! Builds an AX.25 UI frame, HDLC-frames it (flags, bit-stuffing, FCS),
//! NRZI line-encodes the bits and synthesizes phase-continuous Bell 202
//! AFSK audio (1200 Hz mark / 2200 Hz space at 1200 baud).

pub mod error;
pub mod crc;
pub mod nrzi;
pub mod framer;
pub mod afsk;
pub mod ax25;
pub mod assembler;
pub mod sink;
pub mod encoder;

pub use afsk::{AfskModulator, ToneSynthesizer};
pub use assembler::{AssemblerState, FrameAssembler};
pub use ax25::{Address, AddressRole, Frame, PathEncoding};
pub use crc::Crc16;
pub use encoder::{AprsEncoder, EncoderConfig};
pub use error::{AprsError, Result};
pub use framer::{BitFramer, BitSink};
pub use nrzi::NrziEncoder;
pub use sink::{wav_spec, SampleSink, WavSink};

// Audio configuration
pub const SAMPLE_RATE: u32 = 6000;
pub const BAUD_RATE: u32 = 1200;
pub const MARK_FREQ: f64 = 1200.0; // Hz, line level 1
pub const SPACE_FREQ: f64 = 2200.0; // Hz, line level 0
pub const SYMBOL_DURATION_MS: f64 = 1000.0 / BAUD_RATE as f64;
pub const SILENCE_DURATION_MS: f64 = 150.0;
pub const MAX_SILENCE_MS: f64 = 60_000.0;
pub const AMPLITUDE: f64 = 32767.0;

// HDLC / AX.25 configuration
pub const HDLC_FLAG: u8 = 0x7E;
pub const AX25_CONTROL_UI: u8 = 0x03;
pub const AX25_PID_NO_LAYER3: u8 = 0xF0;
pub const CALLSIGN_LEN: usize = 6;
pub const MAX_SSID: u8 = 15;
pub const MAX_PATH_ENTRIES: usize = 8;
pub const MAX_FLAGS: usize = 1024;
