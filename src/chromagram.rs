//! Chromagram
//!
//! Short-time chroma extraction: fold an FFT power spectrum onto the twelve
//! pitch classes and normalize each frame to a peak of 1.
//!
//! Also accepts a precomputed magnitude spectrogram, one spectrum per time
//! frame, so callers that already ran their own STFT can skip the FFT.

use std::{f32::consts::PI, sync::Arc};
use rustfft::{num_complex::Complex, Fft, FftPlanner};
use thiserror::Error;

const SEMITONES: usize = 12;

/// One chroma frame: relative energy of each pitch class, `C` first.
pub type ChromaVector = [f32; SEMITONES];

/// Errors returned by the Chromagram pipeline.
#[derive(Debug, Error)]
pub enum ChromagramError {
    /// Frame received was not of the expected size.
    #[error("expected frame of length {expected}, got {got}")]
    InvalidFrameSize {
        /// The expected number of samples or bins.
        expected: usize,
        /// The actual number received.
        got: usize,
    },

    /// An error occurred during the configuration of the Chromagram.
    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Builder for a Chromagram pipeline.
pub struct ChromagramBuilder {
    frame_size: usize,
    hop_size: usize,
    sampling_rate: usize,
    reference_pitch: f32,
    min_frequency: f32,
}

impl ChromagramBuilder {
    /// Start with default parameters:
    /// frame_size = 2048, hop_size = 512, sampling_rate = 22_050,
    /// reference_pitch = 440.0, min_frequency = 32.7 (C1).
    pub fn new() -> Self {
        ChromagramBuilder {
            frame_size: 2048,
            hop_size: 512,
            sampling_rate: 22_050,
            reference_pitch: 440.0,
            min_frequency: 32.703,
        }
    }

    /// Set the FFT frame size in samples.
    pub fn frame_size(mut self, size: usize) -> Self {
        self.frame_size = size;
        self
    }

    /// Set the distance between consecutive frames in samples.
    pub fn hop_size(mut self, size: usize) -> Self {
        self.hop_size = size;
        self
    }

    /// Set the sampling rate of the audio.
    pub fn sampling_rate(mut self, rate: usize) -> Self {
        self.sampling_rate = rate;
        self
    }

    /// Set the frequency of A4 in Hz.
    pub fn reference_pitch(mut self, hz: f32) -> Self {
        self.reference_pitch = hz;
        self
    }

    /// Ignore spectral bins below this frequency in Hz.
    pub fn min_frequency(mut self, hz: f32) -> Self {
        self.min_frequency = hz;
        self
    }

    /// Finalize and create the Chromagram.
    pub fn build(self) -> Result<Chromagram, ChromagramError> {
        if self.frame_size < 2 {
            return Err(ChromagramError::Configuration("frame_size must be at least 2".into()));
        }
        if self.hop_size == 0 {
            return Err(ChromagramError::Configuration("hop_size cannot be zero".into()));
        }
        if self.sampling_rate == 0 {
            return Err(ChromagramError::Configuration("sampling_rate cannot be zero".into()));
        }
        if !(self.reference_pitch.is_finite() && self.reference_pitch > 0.0) {
            return Err(ChromagramError::Configuration(
                "reference_pitch must be a positive frequency".into(),
            ));
        }
        if !(self.min_frequency.is_finite() && self.min_frequency > 0.0) {
            return Err(ChromagramError::Configuration(
                "min_frequency must be a positive frequency".into(),
            ));
        }

        // Prepare FFT plan once
        let mut planner = FftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(self.frame_size);

        let window = hann_window(self.frame_size);

        // Map every non-negative frequency bin to its nearest pitch class
        let bin_width = self.sampling_rate as f32 / self.frame_size as f32;
        let bin_classes = (0..=self.frame_size / 2)
            .map(|k| {
                let freq = k as f32 * bin_width;
                if freq < self.min_frequency {
                    return None;
                }
                let midi = 69.0 + 12.0 * (freq / self.reference_pitch).log2();
                Some((midi.round() as i64).rem_euclid(SEMITONES as i64) as usize)
            })
            .collect();

        Ok(Chromagram {
            frame_size: self.frame_size,
            hop_size: self.hop_size,
            window,
            fft_buffer: vec![Complex { re: 0.0, im: 0.0 }; self.frame_size],
            bin_classes,
            fft,
        })
    }
}

impl Default for ChromagramBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Short-time chromagram calculator.
pub struct Chromagram {
    frame_size: usize,
    hop_size: usize,
    window: Vec<f32>,
    fft_buffer: Vec<Complex<f32>>,
    /// Pitch class of each bin in `0..=frame_size / 2`, `None` below the cutoff.
    bin_classes: Vec<Option<usize>>,
    fft: Arc<dyn Fft<f32>>,
}

impl Chromagram {
    /// Start customizing with a builder.
    pub fn builder() -> ChromagramBuilder {
        ChromagramBuilder::new()
    }

    /// Samples per analysis frame.
    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    /// Samples between consecutive frames.
    pub fn hop_size(&self) -> usize {
        self.hop_size
    }

    /// Number of spectral bins expected per spectrogram frame.
    pub fn bin_count(&self) -> usize {
        self.bin_classes.len()
    }

    /// Chroma of exactly one frame of samples.
    pub fn frame(&mut self, samples: &[f32]) -> Result<ChromaVector, ChromagramError> {
        if samples.len() != self.frame_size {
            return Err(ChromagramError::InvalidFrameSize {
                expected: self.frame_size,
                got: samples.len(),
            });
        }
        Ok(self.frame_unchecked(samples))
    }

    /// [`Chromagram::frame`] for a slice already known to be `frame_size` long.
    fn frame_unchecked(&mut self, samples: &[f32]) -> ChromaVector {
        for ((slot, &s), &w) in self.fft_buffer.iter_mut().zip(samples).zip(&self.window) {
            slot.re = s * w;
            slot.im = 0.0;
        }
        self.fft.process(&mut self.fft_buffer);

        let bins = self.bin_classes.len();
        let power = self.fft_buffer[..bins].iter().map(|c| c.re * c.re + c.im * c.im);
        self.fold(power)
    }

    /// Slide over `samples` by `hop_size` and return one chroma frame per
    /// full window. Trailing samples that do not fill a window are dropped.
    pub fn process(&mut self, samples: &[f32]) -> Vec<ChromaVector> {
        if samples.len() < self.frame_size {
            return Vec::new();
        }
        let count = 1 + (samples.len() - self.frame_size) / self.hop_size;
        let mut frames = Vec::with_capacity(count);
        for i in 0..count {
            let start = i * self.hop_size;
            let window = &samples[start..start + self.frame_size];
            frames.push(self.frame_unchecked(window));
        }
        frames
    }

    /// Chroma of a precomputed magnitude spectrogram, one spectrum of
    /// [`Chromagram::bin_count`] bins per time frame.
    ///
    /// NaN and infinite magnitudes are replaced with zero, negative ones are
    /// taken as absolute values.
    pub fn process_spectrogram<F>(&self, frames: &[F]) -> Result<Vec<ChromaVector>, ChromagramError>
    where
        F: AsRef<[f32]>,
    {
        let bins = self.bin_count();
        let mut replaced = 0usize;
        let mut out = Vec::with_capacity(frames.len());

        for frame in frames {
            let frame = frame.as_ref();
            if frame.len() != bins {
                return Err(ChromagramError::InvalidFrameSize {
                    expected: bins,
                    got: frame.len(),
                });
            }
            let power = frame.iter().map(|&m| {
                if m.is_finite() {
                    m * m
                } else {
                    replaced += 1;
                    0.0
                }
            });
            out.push(self.fold(power));
        }

        if replaced > 0 {
            log::warn!("spectrogram contained {replaced} non-finite values, replaced with zeros");
        }
        Ok(out)
    }

    /// Sum bin power per pitch class and scale so the loudest class is 1.
    fn fold(&self, power: impl Iterator<Item = f32>) -> ChromaVector {
        let mut chroma = [0.0; SEMITONES];
        for (class, p) in self.bin_classes.iter().zip(power) {
            if let Some(pc) = class {
                chroma[*pc] += p;
            }
        }

        let peak = chroma.iter().cloned().fold(0.0_f32, f32::max);
        if peak > 0.0 {
            for c in chroma.iter_mut() {
                *c /= peak;
            }
        }
        chroma
    }
}

/// Periodic Hann window.
fn hann_window(size: usize) -> Vec<f32> {
    (0..size)
        .map(|n| 0.5 - 0.5 * (2.0 * PI * n as f32 / size as f32).cos())
        .collect()
}
