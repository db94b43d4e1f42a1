//! Chord Detector
//!
//! Turns 12-bin chromagram slices into chords by thresholding each pitch
//! class independently. No chord naming is attempted: a chord is just the
//! pitch classes that are loud enough.

use std::fmt;
use thiserror::Error;

use crate::pitch::{Note, PitchClass};

const SEMITONES: usize = 12;

/// Default presence threshold on the 0–100 scale. A pitch class is present
/// when `round(intensity * 100)` is strictly greater than this.
pub const PRESENCE_THRESHOLD: u32 = 30;

/// Highest accepted threshold.
const MAX_THRESHOLD: u32 = 100;

/// A set of simultaneously sounding notes, kept in insertion order.
///
/// An empty chord is a rest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Chord {
    notes: Vec<Note>,
}

impl Chord {
    /// Chord from explicit notes. Order is preserved.
    pub fn new(notes: Vec<Note>) -> Self {
        Chord { notes }
    }

    /// A chord with no notes.
    pub fn rest() -> Self {
        Chord::default()
    }

    /// Chord from bare pitch classes, each placed in the lowest octave a
    /// standard-tuned guitar can play.
    pub fn from_pitch_classes<I>(pitch_classes: I) -> Self
    where
        I: IntoIterator<Item = PitchClass>,
    {
        pitch_classes.into_iter().map(Note::lowest_playable).collect()
    }

    /// Notes in chord order.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Pitch classes of the notes, in chord order.
    pub fn pitch_classes(&self) -> impl Iterator<Item = PitchClass> + '_ {
        self.notes.iter().map(Note::pitch_class)
    }

    /// Number of notes.
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    /// `true` for a rest.
    pub fn is_rest(&self) -> bool {
        self.notes.is_empty()
    }

    /// Same as [`Chord::is_rest`].
    pub fn is_empty(&self) -> bool {
        self.is_rest()
    }
}

impl FromIterator<Note> for Chord {
    fn from_iter<T: IntoIterator<Item = Note>>(iter: T) -> Self {
        Chord {
            notes: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, note) in self.notes.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{note}")?;
        }
        f.write_str("}")
    }
}

/// Errors when detecting chords
#[derive(Debug, Error)]
pub enum ChordError {
    /// A slice or row did not have the expected number of values.
    #[error("expected {expected} values, got {got}")]
    InvalidLength {
        /// The expected number of values.
        expected: usize,
        /// The actual number of values provided.
        got: usize,
    },

    /// An invalid argument was provided to the detector.
    #[error("invalid argument `{arg}`: {msg}")]
    InvalidArgument {
        /// The name of the invalid argument.
        arg: &'static str,
        /// A description of the invalid argument.
        msg: String,
    },
}

/// Builder for `ChordDetector` to customize the presence threshold
pub struct ChordDetectorBuilder {
    threshold: u32,
}

impl ChordDetectorBuilder {
    /// Create a new builder with threshold = [`PRESENCE_THRESHOLD`]
    pub fn new() -> Self {
        ChordDetectorBuilder {
            threshold: PRESENCE_THRESHOLD,
        }
    }

    /// Set the presence threshold on the 0–100 scale
    pub fn threshold(mut self, value: u32) -> Self {
        self.threshold = value;
        self
    }

    /// Build the `ChordDetector`
    pub fn build(self) -> Result<ChordDetector, ChordError> {
        if self.threshold > MAX_THRESHOLD {
            return Err(ChordError::InvalidArgument {
                arg: "threshold",
                msg: format!("must be <= {MAX_THRESHOLD}, got {}", self.threshold),
            });
        }
        Ok(ChordDetector {
            threshold: self.threshold,
        })
    }
}

impl Default for ChordDetectorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Threshold chord detector
#[derive(Debug, Clone, Copy)]
pub struct ChordDetector {
    threshold: u32,
}

impl ChordDetector {
    /// Return a builder to customize the threshold
    pub fn builder() -> ChordDetectorBuilder {
        ChordDetectorBuilder::new()
    }

    /// Create a detector with the default threshold
    pub fn new() -> Self {
        ChordDetector {
            threshold: PRESENCE_THRESHOLD,
        }
    }

    /// Active presence threshold on the 0–100 scale.
    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Pitch classes present in one chromagram slice, ascending.
    ///
    /// Returns `Err(ChordError::InvalidLength)` if `chroma.len() != 12`.
    /// Non-finite intensities count as absent.
    pub fn present_pitch_classes(&self, chroma: &[f32]) -> Result<Vec<PitchClass>, ChordError> {
        if chroma.len() != SEMITONES {
            return Err(ChordError::InvalidLength {
                expected: SEMITONES,
                got: chroma.len(),
            });
        }
        Ok(chroma
            .iter()
            .enumerate()
            .filter(|&(_, &x)| self.is_present(x))
            .map(|(idx, _)| PitchClass::from_index(idx))
            .collect())
    }

    /// Detect the chord sounding in one chromagram slice.
    ///
    /// A slice with nothing above threshold gives a rest.
    pub fn detect_chord(&self, chroma: &[f32]) -> Result<Chord, ChordError> {
        Ok(Chord::from_pitch_classes(self.present_pitch_classes(chroma)?))
    }

    /// Detect one chord per time slice.
    pub fn detect_sequence<'a, I>(&self, frames: I) -> Result<Vec<Chord>, ChordError>
    where
        I: IntoIterator<Item = &'a [f32]>,
    {
        frames
            .into_iter()
            .map(|frame| self.detect_chord(frame))
            .collect()
    }

    /// Detect chords from a pitch-class-major chromagram: 12 rows, one per
    /// pitch class, each holding one value per time frame.
    ///
    /// Returns `Err(InvalidLength)` if there are not 12 rows or the rows
    /// differ in length.
    pub fn detect_rows<R>(&self, rows: &[R]) -> Result<Vec<Chord>, ChordError>
    where
        R: AsRef<[f32]>,
    {
        if rows.len() != SEMITONES {
            return Err(ChordError::InvalidLength {
                expected: SEMITONES,
                got: rows.len(),
            });
        }
        let frames = rows[0].as_ref().len();
        if let Some(row) = rows.iter().find(|r| r.as_ref().len() != frames) {
            return Err(ChordError::InvalidLength {
                expected: frames,
                got: row.as_ref().len(),
            });
        }

        let mut slice = [0.0; SEMITONES];
        let mut chords = Vec::with_capacity(frames);
        for t in 0..frames {
            for (value, row) in slice.iter_mut().zip(rows) {
                *value = row.as_ref()[t];
            }
            chords.push(self.detect_chord(&slice)?);
        }
        Ok(chords)
    }

    #[inline]
    fn is_present(&self, intensity: f32) -> bool {
        if !intensity.is_finite() {
            return false;
        }
        let scaled = (intensity * 100.0).round_ties_even() as i64;
        scaled > i64::from(self.threshold)
    }
}

impl Default for ChordDetector {
    fn default() -> Self {
        ChordDetector::new()
    }
}
