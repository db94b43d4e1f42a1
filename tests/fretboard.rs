//! Fretboard arithmetic, position table generation and note lookups.

use chord_tab::fretboard::{HIGHEST_PITCH, LOWEST_PITCH, MAX_FRET};
use chord_tab::{FretPosition, Fretboard, FretboardError, Note, PitchClass, PitchError};
use lazy_static::lazy_static;

lazy_static! {
    static ref FRETBOARD: Fretboard = Fretboard::new();
}

fn pos(string: u8, fret: u8) -> FretPosition {
    FretPosition::new(string, fret).unwrap()
}

fn note(s: &str) -> Note {
    s.parse().unwrap()
}

#[test]
fn test_absolute_pitch_follows_standard_tuning() {
    assert_eq!(FRETBOARD.absolute_pitch(1, 0).unwrap(), 40);
    assert_eq!(FRETBOARD.absolute_pitch(2, 0).unwrap(), 45);
    assert_eq!(FRETBOARD.absolute_pitch(5, 0).unwrap(), 59);
    assert_eq!(FRETBOARD.absolute_pitch(6, 0).unwrap(), 64);
    assert_eq!(FRETBOARD.absolute_pitch(3, 7).unwrap(), 57);
    assert_eq!(FRETBOARD.absolute_pitch(6, 24).unwrap(), 88);
}

#[test]
fn test_invalid_coordinates_are_rejected() {
    assert_eq!(
        FRETBOARD.absolute_pitch(0, 3),
        Err(FretboardError::InvalidString { string: 0, max: 6 })
    );
    assert_eq!(
        FRETBOARD.absolute_pitch(7, 3),
        Err(FretboardError::InvalidString { string: 7, max: 6 })
    );
    assert_eq!(
        FRETBOARD.position_to_note(2, 25),
        Err(FretboardError::InvalidFret { fret: 25, max: MAX_FRET })
    );
    assert!(FretPosition::new(6, 24).is_ok());
}

#[test]
fn test_pitch_to_note_numbering() {
    assert_eq!(FRETBOARD.pitch_to_note(12).to_string(), "C0");
    assert_eq!(FRETBOARD.pitch_to_note(40).to_string(), "E2");
    assert_eq!(FRETBOARD.pitch_to_note(58).to_string(), "A#3");
    assert_eq!(FRETBOARD.pitch_to_note(60).to_string(), "C4");
    assert_eq!(FRETBOARD.pitch_to_note(76).to_string(), "E5");
    assert_eq!(FRETBOARD.position_to_note(6, 0).unwrap().to_string(), "E4");
}

#[test]
fn test_position_round_trip() {
    for string in 1..=6 {
        for fret in 0..=12 {
            let n = FRETBOARD.position_to_note(string, fret).unwrap();
            let positions = FRETBOARD.note_positions(&n);
            assert!(
                positions.contains(&pos(string, fret)),
                "({string}, {fret}) -> {n} not found in {positions:?}"
            );
        }
    }
}

#[test]
fn test_table_covers_every_semitone() {
    for pitch in LOWEST_PITCH..=HIGHEST_PITCH {
        let n = FRETBOARD.pitch_to_note(pitch);
        let positions = FRETBOARD.note_positions(&n);
        assert!(!positions.is_empty(), "{n} has no positions");
        for p in positions {
            assert_eq!(p.pitch(), pitch);
        }
    }
}

#[test]
fn test_positions_are_low_string_first() {
    assert_eq!(FRETBOARD.note_positions(&note("E2")), &[pos(1, 0)]);
    assert_eq!(FRETBOARD.note_positions(&note("A2")), &[pos(1, 5), pos(2, 0)]);
    assert_eq!(FRETBOARD.note_positions(&note("B2")), &[pos(1, 7), pos(2, 2)]);
    assert_eq!(
        FRETBOARD.note_positions(&note("E4")),
        &[pos(4, 9), pos(5, 5), pos(6, 0)]
    );
    assert_eq!(FRETBOARD.note_positions(&note("E5")), &[pos(6, 12)]);
}

#[test]
fn test_enharmonic_lookup() {
    let flat = FRETBOARD.note_positions_by_name("Db", 4).unwrap();
    let sharp = FRETBOARD.note_positions_by_name("C#", 4).unwrap();
    assert!(!sharp.is_empty());
    assert_eq!(flat, sharp);

    assert_eq!(
        FRETBOARD.note_positions_by_name("B-", 2).unwrap(),
        FRETBOARD.note_positions_by_name("A#", 2).unwrap()
    );
    // Cb4 sounds as B3
    assert_eq!(
        FRETBOARD.note_positions(&note("Cb4")),
        FRETBOARD.note_positions(&note("B3"))
    );
}

#[test]
fn test_out_of_range_notes_have_no_positions() {
    assert!(FRETBOARD.note_positions_by_name("C", 9).unwrap().is_empty());
    assert!(FRETBOARD.note_positions(&note("D#2")).is_empty());
    assert!(FRETBOARD.note_positions(&note("F5")).is_empty());
}

#[test]
fn test_extreme_octaves_have_no_positions() {
    // 12 * 1073741826 wraps around to E2's pitch
    assert!(FRETBOARD.note_positions(&note("E1073741826")).is_empty());
    assert!(FRETBOARD.note_positions(&note("Db2147483647")).is_empty());
    assert!(FRETBOARD.note_positions_by_name("E", i32::MIN).unwrap().is_empty());
    assert!(FRETBOARD.note_positions_by_name("Cb", i32::MIN).unwrap().is_empty());
    assert_eq!(note("E1073741826").checked_pitch(), None);
    assert_eq!(note("E2").checked_pitch(), Some(40));

    let low = Note::new("Cb".parse().unwrap(), i32::MIN);
    assert_eq!(low.pitch(), i32::MIN);
    assert!(FRETBOARD.note_positions(&low.normalized()).is_empty());
}

#[test]
fn test_unknown_note_name() {
    assert_eq!(
        FRETBOARD.note_positions_by_name("H", 3),
        Err(FretboardError::Pitch(PitchError::InvalidNoteName("H".into())))
    );
    assert!("C##4".parse::<Note>().is_err());
    assert!("C".parse::<Note>().is_err());
}

#[test]
fn test_fret_span_configuration() {
    let full = Fretboard::builder().fret_span(24).build().unwrap();
    let e4 = full.note_positions(&note("E4"));
    assert_eq!(e4.first(), Some(&pos(1, 24)));
    assert_eq!(e4.len(), 6);
    assert_eq!(full.note_positions(&note("E2")), &[pos(1, 0)]);

    assert_eq!(
        Fretboard::builder().fret_span(25).build().unwrap_err(),
        FretboardError::InvalidFretSpan { span: 25, max: 24 }
    );

    match Fretboard::builder().fret_span(3).build() {
        Err(FretboardError::IncompleteCoverage { span, note }) => {
            assert_eq!(span, 3);
            assert_eq!(note.to_string(), "G#2");
        }
        other => panic!("expected incomplete coverage, got {other:?}"),
    }
}

#[test]
fn test_default_builder_matches_new() {
    let built = Fretboard::builder().build().unwrap();
    for pitch in LOWEST_PITCH..=HIGHEST_PITCH {
        let n = built.pitch_to_note(pitch);
        assert_eq!(built.note_positions(&n), FRETBOARD.note_positions(&n));
    }
    assert_eq!(built.fret_span(), FRETBOARD.fret_span());
    assert_eq!(
        Fretboard::default().note_positions(&note("E5")),
        built.note_positions(&note("E5"))
    );
}

#[test]
fn test_note_spelling() {
    let db4 = note("Db4");
    assert!(db4.has_flat());
    assert_eq!(db4.normalized().to_string(), "C#4");
    assert_eq!(db4.pitch_class(), PitchClass::Cs);
    assert_eq!(note("E#3").normalized().to_string(), "F3");
    assert_eq!(note("B#3").normalized().to_string(), "C4");
    assert_eq!("Gb".parse::<PitchClass>().unwrap(), PitchClass::Fs);

    assert_eq!(Note::lowest_playable(PitchClass::E).to_string(), "E2");
    assert_eq!(Note::lowest_playable(PitchClass::Ds).to_string(), "D#3");
    assert_eq!(Note::lowest_playable(PitchClass::C).to_string(), "C3");
}
