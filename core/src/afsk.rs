use crate::error::{AprsError, Result};
use crate::framer::BitSink;
use crate::nrzi::NrziEncoder;
use crate::sink::SampleSink;
use crate::{AMPLITUDE, MARK_FREQ, SAMPLE_RATE, SPACE_FREQ, SYMBOL_DURATION_MS};
use std::f64::consts::PI;

// Bell 202 AFSK synthesis
//
// - Mark (line level 1): 1200 Hz, space (line level 0): 2200 Hz
// - One symbol per line bit at 1200 baud, 5 samples at 6 kHz
// - Silence is a 0 Hz tone, which holds the last phase
// - Every segment starts at the phase where the previous one ended, so tone
//   changes never produce a step in the waveform

/// Phase angle in [-PI/2, 3PI/2) from its sine and cosine.
///
/// `asin` alone only covers quadrants I and IV; a negative cosine moves the
/// angle to the other half of the circle.
fn phase_from(sine: f64, cosine: f64) -> f64 {
    let sign = if cosine >= 0.0 { 1.0 } else { -1.0 };
    sign * sine.clamp(-1.0, 1.0).asin() + (1.0 - sign) * (PI / 2.0)
}

/// Phase-continuous tone generator
///
/// Sample counts are distributed Bresenham-style: the fractional part of each
/// segment's nominal length accumulates and an extra sample is emitted whenever
/// it reaches one, so long runs keep sub-sample timing accuracy.
#[derive(Debug, Clone)]
pub struct ToneSynthesizer {
    sample_rate: f64,
    remainder: f64,
    last_sine: f64,
    last_cosine: f64,
}

impl ToneSynthesizer {
    pub fn new() -> Self {
        Self {
            sample_rate: SAMPLE_RATE as f64,
            remainder: 0.0,
            last_sine: 0.0,
            last_cosine: 1.0,
        }
    }

    /// Append `duration_ms` of a sine at `frequency` Hz (0 for silence).
    /// Returns the number of samples emitted.
    pub fn emit_tone<K: SampleSink + ?Sized>(
        &mut self,
        frequency: f64,
        duration_ms: f64,
        sink: &mut K,
    ) -> Result<usize> {
        if !duration_ms.is_finite() {
            return Err(AprsError::InvalidConfig(format!(
                "tone duration must be finite, got {} ms",
                duration_ms
            )));
        }
        let num_samples = self.next_segment_len(duration_ms);
        let phase = phase_from(self.last_sine, self.last_cosine);
        let step = 2.0 * PI * frequency / self.sample_rate;

        for i in 0..num_samples {
            let angle = step * i as f64 + phase;
            sink.push_sample((AMPLITUDE * angle.sin()).round() as i16)?;
        }

        // Phase of the first sample of the next segment
        let end = step * num_samples as f64 + phase;
        self.last_sine = end.sin();
        self.last_cosine = end.cos();

        Ok(num_samples)
    }

    /// Phase the next segment will start at
    pub fn phase(&self) -> f64 {
        phase_from(self.last_sine, self.last_cosine)
    }

    fn next_segment_len(&mut self, duration_ms: f64) -> usize {
        let nominal = (self.sample_rate * duration_ms / 1000.0).max(0.0);
        let whole = nominal.trunc();
        let mut num_samples = whole as usize;

        self.remainder += nominal - whole;
        if self.remainder >= 1.0 {
            let extra = self.remainder.trunc();
            num_samples += extra as usize;
            self.remainder -= extra;
        }
        num_samples
    }
}

impl Default for ToneSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

/// NRZI encoder feeding the tone synthesizer: one mark or space symbol per
/// line bit.
pub struct AfskModulator<K: SampleSink> {
    nrzi: NrziEncoder,
    synth: ToneSynthesizer,
    sink: K,
}

impl<K: SampleSink> AfskModulator<K> {
    pub fn new(sink: K) -> Self {
        Self {
            nrzi: NrziEncoder::new(),
            synth: ToneSynthesizer::new(),
            sink,
        }
    }

    /// Emit `duration_ms` of silence, phase-continuous with the signal
    pub fn silence(&mut self, duration_ms: f64) -> Result<usize> {
        self.synth.emit_tone(0.0, duration_ms, &mut self.sink)
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub fn into_sink(self) -> K {
        self.sink
    }
}

impl<K: SampleSink> BitSink for AfskModulator<K> {
    fn put_bit(&mut self, bit: bool) -> Result<()> {
        let frequency = if self.nrzi.encode(bit) {
            MARK_FREQ
        } else {
            SPACE_FREQ
        };
        self.synth
            .emit_tone(frequency, SYMBOL_DURATION_MS, &mut self.sink)?;
        Ok(())
    }
}
