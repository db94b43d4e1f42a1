//! Pitch
//!
//! Pitch classes, spelled note names and octave-qualified notes.
//!
//! Absolute pitches use semitone numbers where 12 is C0 (60 is C4, 40 is the
//! low E of a guitar in standard tuning). Flat spellings are accepted on input
//! but every lookup happens on the canonical sharp spelling.

use std::{fmt, str::FromStr};
use thiserror::Error;

use crate::fretboard::LOWEST_PITCH;

const SEMITONES: i32 = 12;

/// Absolute pitch of C0.
const C0: i32 = 12;

/// Errors raised while reading note names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PitchError {
    /// The text is not a single-accidental note name such as `C`, `F#` or `Db`.
    #[error("invalid note name `{0}`")]
    InvalidNoteName(String),
}

/// Twelve chromatic pitch classes in semitone order, spelled with sharps.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PitchClass {
    /// C
    C,
    /// C sharp / D flat
    Cs,
    /// D
    D,
    /// D sharp / E flat
    Ds,
    /// E
    E,
    /// F
    F,
    /// F sharp / G flat
    Fs,
    /// G
    G,
    /// G sharp / A flat
    Gs,
    /// A
    A,
    /// A sharp / B flat
    As,
    /// B
    B,
}

impl PitchClass {
    /// All pitch classes, `C` first.
    pub const ALL: [PitchClass; 12] = [
        PitchClass::C,
        PitchClass::Cs,
        PitchClass::D,
        PitchClass::Ds,
        PitchClass::E,
        PitchClass::F,
        PitchClass::Fs,
        PitchClass::G,
        PitchClass::Gs,
        PitchClass::A,
        PitchClass::As,
        PitchClass::B,
    ];

    /// Pitch class for a semitone index, wrapping around every octave.
    pub const fn from_index(idx: usize) -> PitchClass {
        Self::ALL[idx % 12]
    }

    /// Semitone index, 0 for `C` through 11 for `B`.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Canonical name (`C`, `C#`, ... `B`).
    pub const fn name(self) -> &'static str {
        match self {
            PitchClass::C => "C",
            PitchClass::Cs => "C#",
            PitchClass::D => "D",
            PitchClass::Ds => "D#",
            PitchClass::E => "E",
            PitchClass::F => "F",
            PitchClass::Fs => "F#",
            PitchClass::G => "G",
            PitchClass::Gs => "G#",
            PitchClass::A => "A",
            PitchClass::As => "A#",
            PitchClass::B => "B",
        }
    }

    /// Sharp spelling of this pitch class.
    pub const fn spelling(self) -> NoteName {
        let (letter, accidental) = match self {
            PitchClass::C => (Letter::C, Accidental::Natural),
            PitchClass::Cs => (Letter::C, Accidental::Sharp),
            PitchClass::D => (Letter::D, Accidental::Natural),
            PitchClass::Ds => (Letter::D, Accidental::Sharp),
            PitchClass::E => (Letter::E, Accidental::Natural),
            PitchClass::F => (Letter::F, Accidental::Natural),
            PitchClass::Fs => (Letter::F, Accidental::Sharp),
            PitchClass::G => (Letter::G, Accidental::Natural),
            PitchClass::Gs => (Letter::G, Accidental::Sharp),
            PitchClass::A => (Letter::A, Accidental::Natural),
            PitchClass::As => (Letter::A, Accidental::Sharp),
            PitchClass::B => (Letter::B, Accidental::Natural),
        };
        NoteName { letter, accidental }
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PitchClass {
    type Err = PitchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.parse::<NoteName>()?.pitch_class())
    }
}

/// Natural note letters.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Letter {
    /// C
    C,
    /// D
    D,
    /// E
    E,
    /// F
    F,
    /// G
    G,
    /// A
    A,
    /// B
    B,
}

impl Letter {
    /// Semitone offset of the natural note above C.
    pub const fn semitone(self) -> i32 {
        match self {
            Letter::C => 0,
            Letter::D => 2,
            Letter::E => 4,
            Letter::F => 5,
            Letter::G => 7,
            Letter::A => 9,
            Letter::B => 11,
        }
    }

    fn from_char(c: char) -> Option<Letter> {
        match c.to_ascii_uppercase() {
            'C' => Some(Letter::C),
            'D' => Some(Letter::D),
            'E' => Some(Letter::E),
            'F' => Some(Letter::F),
            'G' => Some(Letter::G),
            'A' => Some(Letter::A),
            'B' => Some(Letter::B),
            _ => None,
        }
    }

    /// Upper-case letter name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Letter::C => "C",
            Letter::D => "D",
            Letter::E => "E",
            Letter::F => "F",
            Letter::G => "G",
            Letter::A => "A",
            Letter::B => "B",
        }
    }
}

/// Single accidental. Double sharps and double flats are not supported.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Accidental {
    /// No accidental.
    Natural,
    /// Raised by a semitone (`#`, `♯`).
    Sharp,
    /// Lowered by a semitone (`b`, `-`, `♭`).
    Flat,
}

impl Accidental {
    /// Semitone offset applied to the letter.
    pub const fn offset(self) -> i32 {
        match self {
            Accidental::Natural => 0,
            Accidental::Sharp => 1,
            Accidental::Flat => -1,
        }
    }

    fn from_char(c: char) -> Option<Accidental> {
        match c {
            '#' | '♯' => Some(Accidental::Sharp),
            'b' | '-' | '♭' => Some(Accidental::Flat),
            _ => None,
        }
    }
}

/// A spelled note name without octave, e.g. `Db` or `C#`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct NoteName {
    /// Natural letter.
    pub letter: Letter,
    /// Accidental applied to the letter.
    pub accidental: Accidental,
}

impl NoteName {
    /// Pitch class this spelling sounds as.
    pub const fn pitch_class(self) -> PitchClass {
        let idx = (self.letter.semitone() + self.accidental.offset()).rem_euclid(SEMITONES);
        PitchClass::from_index(idx as usize)
    }

    /// `true` when the spelling carries a flat marker.
    pub const fn is_flat(self) -> bool {
        matches!(self.accidental, Accidental::Flat)
    }

    /// Reads a letter followed by an optional accidental from the front of
    /// `s`, returning the name and the unread remainder.
    fn split_prefix(s: &str) -> Option<(NoteName, &str)> {
        let mut chars = s.chars();
        let letter = Letter::from_char(chars.next()?)?;
        let rest = chars.as_str();

        let mut ahead = rest.chars();
        match ahead.next().and_then(Accidental::from_char) {
            Some(accidental) => Some((NoteName { letter, accidental }, ahead.as_str())),
            None => Some((
                NoteName {
                    letter,
                    accidental: Accidental::Natural,
                },
                rest,
            )),
        }
    }
}

impl From<PitchClass> for NoteName {
    fn from(pc: PitchClass) -> Self {
        pc.spelling()
    }
}

impl fmt::Display for NoteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.letter.as_str())?;
        match self.accidental {
            Accidental::Natural => Ok(()),
            Accidental::Sharp => f.write_str("#"),
            Accidental::Flat => f.write_str("b"),
        }
    }
}

impl FromStr for NoteName {
    type Err = PitchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match NoteName::split_prefix(s.trim()) {
            Some((name, "")) => Ok(name),
            _ => Err(PitchError::InvalidNoteName(s.to_string())),
        }
    }
}

/// A spelled note in a specific octave, e.g. `A#3`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Note {
    /// Spelled name.
    pub name: NoteName,
    /// Octave number; octave 4 starts at middle C.
    pub octave: i32,
}

impl Note {
    /// Create a note from a spelled name and an octave.
    pub const fn new(name: NoteName, octave: i32) -> Self {
        Note { name, octave }
    }

    /// Sharp-spelled note sounding at absolute pitch `pitch`.
    pub const fn from_pitch(pitch: i32) -> Self {
        let rel = pitch as i64 - C0 as i64;
        let semitones = SEMITONES as i64;
        Note {
            name: PitchClass::from_index(rel.rem_euclid(semitones) as usize).spelling(),
            octave: rel.div_euclid(semitones) as i32,
        }
    }

    /// Lowest note of pitch class `pc` that a standard-tuned guitar can play.
    pub const fn lowest_playable(pc: PitchClass) -> Self {
        let lowest = LOWEST_PITCH as i32;
        let offset = (pc.index() as i32 - lowest).rem_euclid(SEMITONES);
        Note::from_pitch(lowest + offset)
    }

    /// Absolute semitone number (12 = C0).
    ///
    /// Spelling is taken literally, so `Cb4` sounds as `B3`. Saturates at the
    /// `i32` bounds for absurd octaves; see [`Note::checked_pitch`].
    pub const fn pitch(&self) -> i32 {
        let step = self.name.letter.semitone() + self.name.accidental.offset();
        C0.saturating_add(self.octave.saturating_mul(SEMITONES))
            .saturating_add(step)
    }

    /// [`Note::pitch`], or `None` when the octave is too large to represent.
    pub const fn checked_pitch(&self) -> Option<i32> {
        let step = self.name.letter.semitone() + self.name.accidental.offset();
        match self.octave.checked_mul(SEMITONES) {
            Some(base) => match C0.checked_add(base) {
                Some(c) => c.checked_add(step),
                None => None,
            },
            None => None,
        }
    }

    /// Pitch class of this note.
    pub const fn pitch_class(&self) -> PitchClass {
        self.name.pitch_class()
    }

    /// `true` when the spelling carries a flat marker.
    pub const fn has_flat(&self) -> bool {
        self.name.is_flat()
    }

    /// The same pitch spelled with the canonical sharp name.
    pub const fn normalized(&self) -> Note {
        Note::from_pitch(self.pitch())
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, self.octave)
    }
}

impl FromStr for Note {
    type Err = PitchError;

    /// Parses `<letter>[accidental]<octave>`, e.g. `E2`, `F#3`, `Db4`, `B-2`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PitchError::InvalidNoteName(s.to_string());
        let (name, rest) = NoteName::split_prefix(s.trim()).ok_or_else(invalid)?;
        if rest.is_empty() || !rest.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let octave = rest.parse::<i32>().map_err(|_| invalid())?;
        Ok(Note { name, octave })
    }
}
