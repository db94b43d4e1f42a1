//! MusicXML
//!
//! Renders tablature events as a single-part guitar score on a TAB staff.
//! Events that share a `chord_index` sound together as one quarter note;
//! four of those fill a 4/4 measure.
//!
//! Slots come from the events alone. A rest, or any item that produced no
//! events, leaves no slot behind, so the chords after it move up a beat.
//! Gaps in `chord_index` are not turned into rests.

use crate::{
    fretboard::{Fretboard, STANDARD_TUNING, STRING_COUNT},
    pitch::{Accidental, Note},
    tablature::TablatureEvent,
};

const SLOTS_PER_MEASURE: usize = 4;

/// Convert tablature events to a MusicXML 4.0 partwise document.
pub fn to_musicxml(events: &[TablatureEvent], fretboard: &Fretboard) -> String {
    let mut xml = String::new();

    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    xml.push('\n');
    xml.push_str(r#"<!DOCTYPE score-partwise PUBLIC "-//Recordare//DTD MusicXML 4.0 Partwise//EN" "http://www.musicxml.org/dtds/partwise.dtd">"#);
    xml.push('\n');
    xml.push_str(r#"<score-partwise version="4.0">"#);
    xml.push('\n');

    xml.push_str("  <part-list>\n");
    xml.push_str("    <score-part id=\"P1\">\n");
    xml.push_str("      <part-name>Acoustic Guitar</part-name>\n");
    xml.push_str("    </score-part>\n");
    xml.push_str("  </part-list>\n");

    xml.push_str("  <part id=\"P1\">\n");

    let slots = group_slots(events);
    if slots.is_empty() {
        xml.push_str("    <measure number=\"1\">\n");
        xml.push_str(&attributes_xml());
        xml.push_str("      <note>\n");
        xml.push_str("        <rest measure=\"yes\"/>\n");
        xml.push_str(&format!("        <duration>{SLOTS_PER_MEASURE}</duration>\n"));
        xml.push_str("      </note>\n");
        xml.push_str("    </measure>\n");
    }

    for (i, measure) in slots.chunks(SLOTS_PER_MEASURE).enumerate() {
        xml.push_str(&format!("    <measure number=\"{}\">\n", i + 1));
        if i == 0 {
            xml.push_str(&attributes_xml());
        }
        for slot in measure {
            for (j, event) in slot.iter().enumerate() {
                xml.push_str(&event_to_xml(event, fretboard, j > 0));
            }
        }
        xml.push_str("    </measure>\n");
    }

    xml.push_str("  </part>\n");
    xml.push_str("</score-partwise>\n");

    xml
}

/// Split events into runs sharing a `chord_index`. Indices with no events
/// get no run.
fn group_slots(events: &[TablatureEvent]) -> Vec<&[TablatureEvent]> {
    events
        .chunk_by(|a, b| a.chord_index == b.chord_index)
        .collect()
}

/// Divisions, 4/4 time, TAB clef and the six-line staff tuning.
fn attributes_xml() -> String {
    let mut xml = String::new();

    xml.push_str("      <attributes>\n");
    xml.push_str("        <divisions>1</divisions>\n");
    xml.push_str("        <time>\n");
    xml.push_str(&format!("          <beats>{SLOTS_PER_MEASURE}</beats>\n"));
    xml.push_str("          <beat-type>4</beat-type>\n");
    xml.push_str("        </time>\n");
    xml.push_str("        <clef>\n");
    xml.push_str("          <sign>TAB</sign>\n");
    xml.push_str("          <line>5</line>\n");
    xml.push_str("        </clef>\n");
    xml.push_str("        <staff-details>\n");
    xml.push_str(&format!("          <staff-lines>{STRING_COUNT}</staff-lines>\n"));
    for (idx, &open) in STANDARD_TUNING.iter().enumerate() {
        let note = Note::from_pitch(open as i32);
        xml.push_str(&format!("          <staff-tuning line=\"{}\">\n", idx + 1));
        xml.push_str(&format!("            <tuning-step>{}</tuning-step>\n", note.name.letter.as_str()));
        xml.push_str(&format!("            <tuning-octave>{}</tuning-octave>\n", note.octave));
        xml.push_str("          </staff-tuning>\n");
    }
    xml.push_str("        </staff-details>\n");
    xml.push_str("      </attributes>\n");

    xml
}

fn event_to_xml(event: &TablatureEvent, fretboard: &Fretboard, chord: bool) -> String {
    let mut xml = String::new();
    let note = event.sounding_note(fretboard);

    xml.push_str("      <note>\n");
    if chord {
        xml.push_str("        <chord/>\n");
    }

    xml.push_str("        <pitch>\n");
    xml.push_str(&format!("          <step>{}</step>\n", note.name.letter.as_str()));
    match note.name.accidental {
        Accidental::Sharp => xml.push_str("          <alter>1</alter>\n"),
        Accidental::Flat => xml.push_str("          <alter>-1</alter>\n"),
        Accidental::Natural => {}
    }
    xml.push_str(&format!("          <octave>{}</octave>\n", note.octave));
    xml.push_str("        </pitch>\n");

    xml.push_str("        <duration>1</duration>\n");
    xml.push_str("        <type>quarter</type>\n");

    // MusicXML counts strings from the highest
    let string = STRING_COUNT as u8 + 1 - event.position.string();
    xml.push_str("        <notations>\n");
    xml.push_str("          <technical>\n");
    xml.push_str(&format!("            <string>{string}</string>\n"));
    xml.push_str(&format!("            <fret>{}</fret>\n", event.position.fret()));
    xml.push_str("          </technical>\n");
    xml.push_str("        </notations>\n");

    xml.push_str("      </note>\n");
    xml
}
