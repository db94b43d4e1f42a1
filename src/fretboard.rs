//! Fretboard
//!
//! Standard-tuning fretboard model and the note ↔ position mapper.
//!
//! Strings are numbered from the lowest: string 1 is E2, string 6 is E4.
//! The note → positions table is generated once when a [`Fretboard`] is
//! built and never changes afterwards, so one instance can be shared by
//! reference (or behind an `Arc`) across threads.

use thiserror::Error;

use crate::pitch::{Note, NoteName, PitchError};

/// Number of strings.
pub const STRING_COUNT: usize = 6;

/// Highest fret addressable on the neck.
pub const MAX_FRET: u8 = 24;

/// Open-string pitches, lowest string first (E2 A2 D3 G3 B3 E4).
pub const STANDARD_TUNING: [u8; STRING_COUNT] = [40, 45, 50, 55, 59, 64];

/// Lowest pitch covered by the position table (E2).
pub const LOWEST_PITCH: u8 = 40;

/// Highest pitch covered by the position table (E5).
pub const HIGHEST_PITCH: u8 = 76;

/// Frets walked per string when generating the position table.
pub const DEFAULT_FRET_SPAN: u8 = 12;

const TABLE_LEN: usize = (HIGHEST_PITCH - LOWEST_PITCH) as usize + 1;

/// Errors raised by fretboard arithmetic and table construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FretboardError {
    /// String number outside `1..=6`.
    #[error("invalid string {string}: expected 1..={max}")]
    InvalidString {
        /// The rejected string number.
        string: u8,
        /// Highest valid string number.
        max: usize,
    },

    /// Fret number outside `0..=24`.
    #[error("invalid fret {fret}: expected 0..={max}")]
    InvalidFret {
        /// The rejected fret number.
        fret: u8,
        /// Highest valid fret number.
        max: u8,
    },

    /// Requested table span exceeds the neck.
    #[error("invalid fret span {span}: expected 0..={max}")]
    InvalidFretSpan {
        /// The rejected span.
        span: u8,
        /// Highest valid span.
        max: u8,
    },

    /// The configured span leaves a note of the supported range unplayable.
    #[error("fret span {span} leaves {note} without a position")]
    IncompleteCoverage {
        /// The configured span.
        span: u8,
        /// First note found without a position.
        note: Note,
    },

    /// A note name could not be read.
    #[error(transparent)]
    Pitch(#[from] PitchError),
}

/// A validated (string, fret) coordinate.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FretPosition {
    string: u8,
    fret: u8,
}

impl FretPosition {
    /// Create a position, rejecting strings outside `1..=6` and frets above 24.
    pub fn new(string: u8, fret: u8) -> Result<Self, FretboardError> {
        if !(1..=STRING_COUNT as u8).contains(&string) {
            return Err(FretboardError::InvalidString {
                string,
                max: STRING_COUNT,
            });
        }
        if fret > MAX_FRET {
            return Err(FretboardError::InvalidFret {
                fret,
                max: MAX_FRET,
            });
        }
        Ok(FretPosition { string, fret })
    }

    /// String number, 1 being the lowest string.
    pub fn string(&self) -> u8 {
        self.string
    }

    /// Fret number, 0 being the open string.
    pub fn fret(&self) -> u8 {
        self.fret
    }

    /// Absolute pitch sounded at this position.
    pub fn pitch(&self) -> u8 {
        STANDARD_TUNING[self.string as usize - 1] + self.fret
    }
}

/// Builder for a [`Fretboard`].
pub struct FretboardBuilder {
    fret_span: u8,
}

impl FretboardBuilder {
    /// Start with the default span of 12 frets per string.
    pub fn new() -> Self {
        FretboardBuilder {
            fret_span: DEFAULT_FRET_SPAN,
        }
    }

    /// Highest fret included in the position table.
    pub fn fret_span(mut self, span: u8) -> Self {
        self.fret_span = span;
        self
    }

    /// Generate the position table.
    ///
    /// Fails if the span is above 24 or if any semitone from E2 to E5 would
    /// be left without a position.
    pub fn build(self) -> Result<Fretboard, FretboardError> {
        if self.fret_span > MAX_FRET {
            return Err(FretboardError::InvalidFretSpan {
                span: self.fret_span,
                max: MAX_FRET,
            });
        }

        let fretboard = Fretboard::with_span(self.fret_span);
        if let Some(note) = fretboard.first_gap() {
            return Err(FretboardError::IncompleteCoverage {
                span: self.fret_span,
                note,
            });
        }
        Ok(fretboard)
    }
}

impl Default for FretboardBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Standard-tuning fretboard with its note → positions table.
#[derive(Debug, Clone)]
pub struct Fretboard {
    fret_span: u8,
    /// Positions per pitch, indexed from [`LOWEST_PITCH`].
    table: Vec<Vec<FretPosition>>,
}

impl Fretboard {
    /// Return a builder to customize the table span.
    pub fn builder() -> FretboardBuilder {
        FretboardBuilder::new()
    }

    /// Fretboard with the default 12-fret table.
    pub fn new() -> Self {
        let fretboard = Fretboard::with_span(DEFAULT_FRET_SPAN);
        debug_assert!(fretboard.first_gap().is_none());
        fretboard
    }

    /// Table for frets `0..=span`; `span` must not exceed [`MAX_FRET`].
    fn with_span(span: u8) -> Self {
        Fretboard {
            fret_span: span,
            table: generate_table(span),
        }
    }

    /// First note of E2..=E5 left without a position, if any.
    fn first_gap(&self) -> Option<Note> {
        self.table
            .iter()
            .position(Vec::is_empty)
            .map(|offset| Note::from_pitch(LOWEST_PITCH as i32 + offset as i32))
    }

    /// Highest fret included in the position table.
    pub fn fret_span(&self) -> u8 {
        self.fret_span
    }

    /// Pitch sounded by `string` at `fret`.
    pub fn absolute_pitch(&self, string: u8, fret: u8) -> Result<u8, FretboardError> {
        Ok(FretPosition::new(string, fret)?.pitch())
    }

    /// Sharp-spelled note for an absolute pitch (12 = C0).
    pub fn pitch_to_note(&self, pitch: u8) -> Note {
        Note::from_pitch(pitch as i32)
    }

    /// Every position producing `note`, lowest string first, then ascending
    /// fret.
    ///
    /// Flat spellings are normalized before lookup. Notes outside E2..=E5
    /// yield an empty slice.
    pub fn note_positions(&self, note: &Note) -> &[FretPosition] {
        let playable = LOWEST_PITCH as i32..=HIGHEST_PITCH as i32;
        match note.checked_pitch() {
            Some(pitch) if playable.contains(&pitch) => {
                &self.table[(pitch - LOWEST_PITCH as i32) as usize]
            }
            _ => {
                log::trace!("{note} is outside the playable range, no positions");
                &[]
            }
        }
    }

    /// [`Fretboard::note_positions`] for a textual name such as `"Db"` and an
    /// octave.
    pub fn note_positions_by_name(
        &self,
        name: &str,
        octave: i32,
    ) -> Result<&[FretPosition], FretboardError> {
        let name: NoteName = name.parse()?;
        Ok(self.note_positions(&Note::new(name, octave)))
    }

    /// Note sounded by `string` at `fret`.
    pub fn position_to_note(&self, string: u8, fret: u8) -> Result<Note, FretboardError> {
        Ok(self.pitch_to_note(self.absolute_pitch(string, fret)?))
    }

    /// Note sounded at an already validated position.
    pub fn note_at(&self, position: &FretPosition) -> Note {
        self.pitch_to_note(position.pitch())
    }
}

impl Default for Fretboard {
    fn default() -> Self {
        Fretboard::new()
    }
}

/// Walk every string from the lowest up, frets `0..=span`, and file each
/// position under the pitch it sounds. `span` must not exceed [`MAX_FRET`].
fn generate_table(span: u8) -> Vec<Vec<FretPosition>> {
    let mut table = vec![Vec::new(); TABLE_LEN];
    for (idx, &open) in STANDARD_TUNING.iter().enumerate() {
        for fret in 0..=span {
            let pitch = open + fret;
            if (LOWEST_PITCH..=HIGHEST_PITCH).contains(&pitch) {
                table[(pitch - LOWEST_PITCH) as usize].push(FretPosition {
                    string: idx as u8 + 1,
                    fret,
                });
            }
        }
    }
    table
}
