use crate::afsk::AfskModulator;
use crate::assembler::FrameAssembler;
use crate::ax25::{Frame, PathEncoding};
use crate::error::{AprsError, Result};
use crate::sink::{SampleSink, WavSink};
use crate::{MAX_FLAGS, MAX_SILENCE_MS, SILENCE_DURATION_MS};
use log::debug;
use std::io::{Seek, Write};
use std::path::Path;

/// Encoder settings
#[derive(Debug, Clone)]
pub struct EncoderConfig {
    /// Silence before the first flag (ms)
    pub leading_silence_ms: f64,
    /// Silence after the last flag (ms)
    pub trailing_silence_ms: f64,
    /// HDLC flags before the frame body
    pub opening_flags: usize,
    /// HDLC flags after the FCS
    pub closing_flags: usize,
    pub path_encoding: PathEncoding,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            leading_silence_ms: SILENCE_DURATION_MS,
            trailing_silence_ms: SILENCE_DURATION_MS,
            opening_flags: 1,
            closing_flags: 2,
            path_encoding: PathEncoding::PerEntry,
        }
    }
}

impl EncoderConfig {
    /// Check silence durations and flag counts.
    ///
    /// Silence must be finite and within `0..=MAX_SILENCE_MS`; each side of
    /// the frame needs between 1 and `MAX_FLAGS` flags.
    pub fn validate(&self) -> Result<()> {
        check_silence("leading_silence_ms", self.leading_silence_ms)?;
        check_silence("trailing_silence_ms", self.trailing_silence_ms)?;
        check_flags("opening_flags", self.opening_flags)?;
        check_flags("closing_flags", self.closing_flags)?;
        Ok(())
    }
}

fn check_silence(name: &str, ms: f64) -> Result<()> {
    if !ms.is_finite() || !(0.0..=MAX_SILENCE_MS).contains(&ms) {
        return Err(AprsError::InvalidConfig(format!(
            "{} must be between 0 and {} ms, got {}",
            name, MAX_SILENCE_MS, ms
        )));
    }
    Ok(())
}

fn check_flags(name: &str, count: usize) -> Result<()> {
    if count == 0 || count > MAX_FLAGS {
        return Err(AprsError::InvalidConfig(format!(
            "{} must be between 1 and {}, got {}",
            name, MAX_FLAGS, count
        )));
    }
    Ok(())
}

/// APRS frame to Bell 202 AFSK audio
///
/// Output: silence + flag(s) + stuffed frame body and FCS + flags + silence,
/// NRZI encoded, 16-bit mono PCM at 6 kHz. One encoder call is one
/// independent transmission: line level, tone phase and sample timing all
/// start fresh.
pub struct AprsEncoder {
    config: EncoderConfig,
}

impl AprsEncoder {
    pub fn new(config: EncoderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Encode into an in-memory sample buffer
    pub fn encode(&self, frame: &Frame) -> Result<Vec<i16>> {
        self.encode_into(frame, Vec::new())
    }

    /// Encode into any sample sink and hand it back
    pub fn encode_into<K: SampleSink>(&self, frame: &Frame, sink: K) -> Result<K> {
        let mut modulator = AfskModulator::new(sink);
        modulator.silence(self.config.leading_silence_ms)?;

        let mut assembler = FrameAssembler::with_flags(
            frame,
            self.config.path_encoding,
            self.config.opening_flags,
            self.config.closing_flags,
            modulator,
        );
        assembler.run()?;

        let mut modulator = assembler.into_sink();
        modulator.silence(self.config.trailing_silence_ms)?;

        let sink = modulator.into_sink();
        debug!("Encoded frame to {} samples", sink.sample_count());
        Ok(sink)
    }

    /// Encode as a complete WAV stream. Returns the number of samples.
    pub fn encode_wav<W: Write + Seek>(&self, frame: &Frame, writer: W) -> Result<u64> {
        let sink = self.encode_into(frame, WavSink::new(writer)?)?;
        sink.finalize()
    }

    /// Encode to a WAV file. Returns the number of samples.
    pub fn encode_to_file<P: AsRef<Path>>(&self, frame: &Frame, path: P) -> Result<u64> {
        let sink = self.encode_into(frame, WavSink::create(path)?)?;
        sink.finalize()
    }

    /// Line bits (after stuffing, before NRZI) the frame produces
    pub fn line_bits(&self, frame: &Frame) -> Result<Vec<bool>> {
        let mut assembler = FrameAssembler::with_flags(
            frame,
            self.config.path_encoding,
            self.config.opening_flags,
            self.config.closing_flags,
            Vec::new(),
        );
        assembler.run()?;
        Ok(assembler.into_sink())
    }
}

impl Default for AprsEncoder {
    fn default() -> Self {
        Self {
            config: EncoderConfig::default(),
        }
    }
}
