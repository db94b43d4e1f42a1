//! Chord sequence to tablature assembly, end to end.

use chord_tab::{
    Chord, ChordDetector, FretPosition, Fretboard, Note, PitchClass, SequenceItem,
    TablatureAssembler, TablatureEvent,
};
use lazy_static::lazy_static;
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use std::sync::Arc;

lazy_static! {
    static ref FRETBOARD: Arc<Fretboard> = Arc::new(Fretboard::new());
}

fn assembler() -> TablatureAssembler {
    TablatureAssembler::new(Arc::clone(&*FRETBOARD))
}

fn chord(notes: &[&str]) -> Chord {
    notes.iter().map(|n| n.parse::<Note>().unwrap()).collect()
}

fn pos(string: u8, fret: u8) -> FretPosition {
    FretPosition::new(string, fret).unwrap()
}

#[test]
fn test_pitch_class_chord_enumerates_every_position() {
    let c = Chord::from_pitch_classes([PitchClass::Cs, PitchClass::F, PitchClass::Gs]);
    let events = assembler().assemble([SequenceItem::Chord(c.clone())]);

    let expected: Vec<TablatureEvent> = c
        .notes()
        .iter()
        .flat_map(|n| {
            FRETBOARD
                .note_positions(n)
                .iter()
                .map(move |&position| TablatureEvent {
                    chord_index: 0,
                    position,
                    pitch_class: n.pitch_class(),
                })
        })
        .collect();
    assert_eq!(events, expected);

    let summary: Vec<_> = events
        .iter()
        .map(|e| (e.pitch_class, e.position.string(), e.position.fret()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (PitchClass::Cs, 1, 9),
            (PitchClass::Cs, 2, 4),
            (PitchClass::F, 1, 1),
            (PitchClass::Gs, 1, 4),
        ]
    );
}

#[test]
fn test_flat_spelling_binds_sharp_pitch_class() {
    let events = assembler().assemble_chords(&[chord(&["Db4"])]);
    let sharp = assembler().assemble_chords(&[chord(&["C#4"])]);
    assert_eq!(events, sharp);
    assert!(!events.is_empty());
    assert!(events.iter().all(|e| e.pitch_class == PitchClass::Cs));
}

#[test]
fn test_chord_order_is_kept() {
    let events = assembler().assemble_chords(&[chord(&["G2", "E2"])]);
    let classes: Vec<_> = events.iter().map(|e| e.pitch_class).collect();
    assert_eq!(classes, vec![PitchClass::G, PitchClass::E]);
    assert_eq!(events[0].position, pos(1, 3));
    assert_eq!(events[1].position, pos(1, 0));
}

#[test]
fn test_non_chord_items_are_skipped() {
    let items = vec![
        SequenceItem::Other("time signature".into()),
        SequenceItem::Chord(chord(&["A2"])),
        SequenceItem::Other("clef".into()),
        SequenceItem::Chord(chord(&["E2"])),
    ];
    let events = assembler().assemble(items);
    assert_eq!(events.len(), 3);
    assert_eq!(events[0].chord_index, 1);
    assert_eq!(events[0].position, pos(1, 5));
    assert_eq!(events[1].position, pos(2, 0));
    assert_eq!(events[2].chord_index, 3);
}

#[test]
fn test_unplayable_notes_do_not_stop_the_batch() {
    let chords = [chord(&["C9", "A2"]), chord(&["C1"]), chord(&["E5"])];
    let events = assembler().assemble_chords(&chords);
    let indexed: Vec<_> = events.iter().map(|e| (e.chord_index, e.position)).collect();
    assert_eq!(
        indexed,
        vec![(0, pos(1, 5)), (0, pos(2, 0)), (2, pos(6, 12))]
    );
}

#[test]
fn test_rests_emit_nothing() {
    let detector = ChordDetector::new();
    let rest = detector.detect_chord(&[0.25; 12]).unwrap();
    assert!(rest.is_rest());
    assert!(assembler().assemble_chords(&[rest, Chord::rest()]).is_empty());
}

#[test]
fn test_assembly_is_deterministic() {
    let chords: Vec<Chord> = vec![
        chord(&["C3", "E3", "G3"]),
        chord(&["Bb2", "D3", "F3"]),
        Chord::rest(),
        chord(&["E4", "B3"]),
    ];
    let first = assembler().assemble_chords(&chords);
    let second = assembler().assemble_chords(&chords);
    assert_eq!(first, second);
    assert_eq!(format!("{first:?}"), format!("{second:?}"));
}

#[test]
fn test_sounding_note_recovers_octave() {
    let events = assembler().assemble_chords(&[chord(&["E4"])]);
    assert_eq!(events.len(), 3);
    for e in &events {
        assert_eq!(e.sounding_note(&FRETBOARD).to_string(), "E4");
    }
}

#[test]
fn test_detector_to_tablature() {
    let detector = ChordDetector::new();
    let mut slice = [0.0f32; 12];
    slice[PitchClass::A.index()] = 0.8;
    slice[PitchClass::E.index()] = 0.45;

    let chord = detector.detect_chord(&slice).unwrap();
    let events = assembler().assemble([SequenceItem::from(chord)]);
    let summary: Vec<_> = events.iter().map(|e| (e.pitch_class, e.position)).collect();
    assert_eq!(
        summary,
        vec![
            (PitchClass::E, pos(1, 0)),
            (PitchClass::A, pos(1, 5)),
            (PitchClass::A, pos(2, 0)),
        ]
    );
}

#[test]
fn test_parallel_assembly_shares_one_fretboard() {
    let sequences: Vec<Vec<Chord>> = (0..64)
        .map(|i| {
            (0..8)
                .map(|j| {
                    Chord::from_pitch_classes([
                        PitchClass::from_index(i + j),
                        PitchClass::from_index(i + j + 4),
                        PitchClass::from_index(i + j + 7),
                    ])
                })
                .collect()
        })
        .collect();

    let sequential: Vec<Vec<TablatureEvent>> = sequences
        .iter()
        .map(|s| assembler().assemble_chords(s))
        .collect();

    let shared = assembler();
    let parallel: Vec<Vec<TablatureEvent>> = sequences
        .par_iter()
        .map(|s| shared.assemble_chords(s))
        .collect();

    assert_eq!(sequential, parallel);
    assert!(parallel.iter().all(|events| !events.is_empty()));
}
