//! Tablature
//!
//! Walks a chord sequence and emits one event per playable position of every
//! note. Nothing is merged or dropped: a note reachable on three strings
//! yields three events, leaving the choice to whoever renders them.

use std::sync::Arc;

use crate::{
    chord_detector::Chord,
    fretboard::{FretPosition, Fretboard},
    pitch::{Note, PitchClass},
};

/// One element of a chord sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequenceItem {
    /// A chord, possibly a rest.
    Chord(Chord),
    /// Anything else found in the sequence; skipped during assembly.
    Other(String),
}

impl From<Chord> for SequenceItem {
    fn from(chord: Chord) -> Self {
        SequenceItem::Chord(chord)
    }
}

/// A fret position bound to the pitch class it plays.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TablatureEvent {
    /// Index of the originating item in the input sequence.
    pub chord_index: usize,
    /// Where to play.
    pub position: FretPosition,
    /// Sharp-spelled pitch class of the source note.
    pub pitch_class: PitchClass,
}

impl TablatureEvent {
    /// Note sounded by this event, octave included.
    ///
    /// The bound `pitch_class` carries no octave; it is recovered from the
    /// position.
    pub fn sounding_note(&self, fretboard: &Fretboard) -> Note {
        fretboard.note_at(&self.position)
    }
}

/// Builds tablature from chord sequences against a shared [`Fretboard`].
#[derive(Debug, Clone)]
pub struct TablatureAssembler {
    fretboard: Arc<Fretboard>,
}

impl TablatureAssembler {
    /// Assembler reading positions from `fretboard`.
    pub fn new(fretboard: Arc<Fretboard>) -> Self {
        TablatureAssembler { fretboard }
    }

    /// The fretboard used for lookups.
    pub fn fretboard(&self) -> &Fretboard {
        &self.fretboard
    }

    /// Events for every item, in sequence order, then chord note order, then
    /// position order.
    ///
    /// [`SequenceItem::Other`] entries are skipped. Notes outside the
    /// fretboard's range produce no events.
    pub fn assemble<I>(&self, items: I) -> Vec<TablatureEvent>
    where
        I: IntoIterator<Item = SequenceItem>,
    {
        let mut events = Vec::new();
        for (chord_index, item) in items.into_iter().enumerate() {
            match item {
                SequenceItem::Chord(chord) => self.push_chord(chord_index, &chord, &mut events),
                SequenceItem::Other(kind) => {
                    log::debug!("skipping non-chord item {chord_index}: {kind}");
                }
            }
        }
        events
    }

    /// [`TablatureAssembler::assemble`] for a plain chord list.
    pub fn assemble_chords(&self, chords: &[Chord]) -> Vec<TablatureEvent> {
        let mut events = Vec::new();
        for (chord_index, chord) in chords.iter().enumerate() {
            self.push_chord(chord_index, chord, &mut events);
        }
        events
    }

    fn push_chord(&self, chord_index: usize, chord: &Chord, events: &mut Vec<TablatureEvent>) {
        for note in chord.notes() {
            let note = if note.has_flat() { note.normalized() } else { *note };
            let positions = self.fretboard.note_positions(&note);
            if positions.is_empty() {
                log::debug!("{note} in chord {chord_index} has no position, omitted");
            }
            // TODO: bind the octave too; today it is only recoverable
            // through `TablatureEvent::sounding_note`.
            let pitch_class = note.pitch_class();
            events.extend(positions.iter().map(|&position| TablatureEvent {
                chord_index,
                position,
                pitch_class,
            }));
        }
    }
}
