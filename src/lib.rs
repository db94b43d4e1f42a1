//! # chord_tab
//!
//! Threshold chord detection over 12-bin chromagrams and mapping of the
//! detected chords onto a standard-tuned six-string guitar.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use chord_tab::{ChordDetector, Fretboard, SequenceItem, TablatureAssembler};
//!
//! fn run() -> Result<(), Box<dyn std::error::Error>> {
//!     // 1) Threshold one chromagram slice into a chord
//!     let detector = ChordDetector::builder().threshold(30).build()?;
//!     let mut slice = [0.0f32; 12];
//!     slice[0] = 0.9; // C
//!     slice[4] = 0.6; // E
//!     slice[7] = 0.8; // G
//!     let chord = detector.detect_chord(&slice)?;
//!
//!     // 2) Build the position table once and share it
//!     let fretboard = Arc::new(Fretboard::builder().fret_span(12).build()?);
//!     let assembler = TablatureAssembler::new(Arc::clone(&fretboard));
//!
//!     // 3) Every playable position of every note, in chord order
//!     let events = assembler.assemble([SequenceItem::Chord(chord)]);
//!     for event in &events {
//!         println!(
//!             "{} on string {} fret {}",
//!             event.pitch_class,
//!             event.position.string(),
//!             event.position.fret()
//!         );
//!     }
//!
//!     Ok(())
//! }
//! # run().unwrap();
//! ```
//!
//! Logging goes through the `log` facade; install any logger to see skipped
//! sequence items and unplayable notes.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rust_2018_idioms)]
#![deny(clippy::all)]

/// Threshold chord detector API.
pub use chord_detector::{
    Chord, ChordDetector, ChordDetectorBuilder, ChordError, PRESENCE_THRESHOLD,
};

/// Short-time chromagram extractor.
pub use chromagram::{ChromaVector, Chromagram, ChromagramBuilder, ChromagramError};

/// Fretboard model and position mapper.
pub use fretboard::{FretPosition, Fretboard, FretboardBuilder, FretboardError};

/// Notes, spellings and pitch classes.
pub use pitch::{Accidental, Letter, Note, NoteName, PitchClass, PitchError};

/// Tablature assembly.
pub use tablature::{SequenceItem, TablatureAssembler, TablatureEvent};

/// MusicXML rendering.
pub use musicxml::to_musicxml;

/// Chord detection module.
pub mod chord_detector;

/// Chromagram computation module.
pub mod chromagram;

/// Fretboard model module.
pub mod fretboard;

/// MusicXML writer module.
pub mod musicxml;

/// Pitch and note spelling module.
pub mod pitch;

/// Tablature assembly module.
pub mod tablature;
