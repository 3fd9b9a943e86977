use crate::error::Result;
use crate::SAMPLE_RATE;
use hound::{SampleFormat, WavSpec, WavWriter};
use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::path::Path;

/// Append-only destination for 16-bit PCM samples
pub trait SampleSink {
    fn push_sample(&mut self, sample: i16) -> Result<()>;

    /// Samples accepted so far
    fn sample_count(&self) -> u64;
}

impl SampleSink for Vec<i16> {
    fn push_sample(&mut self, sample: i16) -> Result<()> {
        self.push(sample);
        Ok(())
    }

    fn sample_count(&self) -> u64 {
        self.len() as u64
    }
}

impl<K: SampleSink + ?Sized> SampleSink for &mut K {
    fn push_sample(&mut self, sample: i16) -> Result<()> {
        (**self).push_sample(sample)
    }

    fn sample_count(&self) -> u64 {
        (**self).sample_count()
    }
}

/// Mono 16-bit PCM at the modem sample rate
pub fn wav_spec() -> WavSpec {
    WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    }
}

/// WAV file sink
///
/// hound writes the 44-byte RIFF header up front with zero sizes and patches
/// the RIFF and data chunk sizes in `finalize`, once the sample count is known.
pub struct WavSink<W: Write + Seek> {
    writer: WavWriter<W>,
    samples: u64,
}

impl WavSink<BufWriter<File>> {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let writer = WavWriter::create(path, wav_spec())?;
        Ok(Self { writer, samples: 0 })
    }
}

impl<W: Write + Seek> WavSink<W> {
    pub fn new(inner: W) -> Result<Self> {
        let writer = WavWriter::new(inner, wav_spec())?;
        Ok(Self { writer, samples: 0 })
    }

    /// Rewrite the header sizes and flush. Returns the number of samples written.
    pub fn finalize(self) -> Result<u64> {
        self.writer.finalize()?;
        Ok(self.samples)
    }
}

impl<W: Write + Seek> SampleSink for WavSink<W> {
    fn push_sample(&mut self, sample: i16) -> Result<()> {
        self.writer.write_sample(sample)?;
        self.samples += 1;
        Ok(())
    }

    fn sample_count(&self) -> u64 {
        self.samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn u32_at(bytes: &[u8], offset: usize) -> u32 {
        u32::from_le_bytes([
            bytes[offset],
            bytes[offset + 1],
            bytes[offset + 2],
            bytes[offset + 3],
        ])
    }

    fn u16_at(bytes: &[u8], offset: usize) -> u16 {
        u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
    }

    #[test]
    fn test_vec_sink_counts() {
        let mut sink: Vec<i16> = Vec::new();
        sink.push_sample(1).unwrap();
        sink.push_sample(-1).unwrap();
        assert_eq!(sink.sample_count(), 2);
        assert_eq!(sink, vec![1, -1]);
    }

    #[test]
    fn test_wav_header_fields() {
        let mut buffer = Cursor::new(Vec::new());
        let mut sink = WavSink::new(&mut buffer).unwrap();
        for i in 0..1234 {
            sink.push_sample((i % 100) as i16).unwrap();
        }
        let written = sink.finalize().unwrap();
        assert_eq!(written, 1234);

        let bytes = buffer.into_inner();
        let data_bytes = 1234 * 2;
        assert_eq!(bytes.len(), 44 + data_bytes);

        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(u32_at(&bytes, 4), 36 + data_bytes as u32);
        assert_eq!(&bytes[8..12], b"WAVE");
        assert_eq!(&bytes[12..16], b"fmt ");
        assert_eq!(u32_at(&bytes, 16), 16);
        assert_eq!(u16_at(&bytes, 20), 1); // PCM
        assert_eq!(u16_at(&bytes, 22), 1); // mono
        assert_eq!(u32_at(&bytes, 24), SAMPLE_RATE);
        assert_eq!(u32_at(&bytes, 28), SAMPLE_RATE * 2);
        assert_eq!(u16_at(&bytes, 32), 2);
        assert_eq!(u16_at(&bytes, 34), 16);
        assert_eq!(&bytes[36..40], b"data");
        assert_eq!(u32_at(&bytes, 40), data_bytes as u32);
    }

    #[test]
    fn test_wav_samples_little_endian() {
        let mut buffer = Cursor::new(Vec::new());
        let mut sink = WavSink::new(&mut buffer).unwrap();
        sink.push_sample(32767).unwrap();
        sink.push_sample(-32767).unwrap();
        sink.finalize().unwrap();

        let bytes = buffer.into_inner();
        assert_eq!(&bytes[44..48], &[0xFF, 0x7F, 0x01, 0x80]);
    }

    #[test]
    fn test_wav_empty() {
        let mut buffer = Cursor::new(Vec::new());
        let sink = WavSink::new(&mut buffer).unwrap();
        assert_eq!(sink.finalize().unwrap(), 0);

        let bytes = buffer.into_inner();
        assert_eq!(bytes.len(), 44);
        assert_eq!(u32_at(&bytes, 4), 36);
        assert_eq!(u32_at(&bytes, 40), 0);
    }
}
