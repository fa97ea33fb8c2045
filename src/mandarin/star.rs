//! Star-marker extraction and highlight alignment.
//!
//! Sentence rows may wrap spans in `*…*` to mark them for emphasis.  This
//! module extracts those spans, re-wraps them in the card markup the
//! sentence template styles (`.starred { color: red; }`), and highlights the
//! matching syllables of the separately computed reading.
//!
//! The reading alignment is best-effort: the de-marked text and the
//! transliterated reading are never checked for matching cardinality, so a
//! transliteration that segments differently from the visible text can
//! attach a highlight to the wrong syllable.

use crate::config::ReadingFormat;

use super::phonetics;

/// Marker character in the input CSV.
pub const MARKER: char = '*';

const STAR_OPEN: &str = "<span class=starred>";
const STAR_CLOSE: &str = "</span>";

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Extract `*`-delimited spans from `text`.
///
/// Markers pair up strictly left to right (1st+2nd, 3rd+4th, …); an
/// unpaired trailing marker is dropped.  Returns the marker-free text and
/// the extracted spans in order.
pub fn extract_starred(text: &str) -> (String, Vec<String>) {
    let positions: Vec<usize> = text
        .char_indices()
        .filter(|(_, c)| *c == MARKER)
        .map(|(i, _)| i)
        .collect();

    let mut spans = Vec::new();
    for pair in positions.chunks_exact(2) {
        spans.push(text[pair[0] + MARKER.len_utf8()..pair[1]].to_string());
    }

    let clean: String = text.chars().filter(|c| *c != MARKER).collect();
    (clean, spans)
}

// ---------------------------------------------------------------------------
// Annotation
// ---------------------------------------------------------------------------

/// Wrap each span's first remaining occurrence in `clean` with the starred
/// markup, left to right.
///
/// The search resumes after the previous annotation, so repeated identical
/// spans each claim the next occurrence.  A span that no longer occurs
/// literally (marker removal can change adjacency) is skipped.
pub fn annotate_text(clean: &str, spans: &[String]) -> String {
    let mut annotated = clean.to_string();
    let mut cursor = 0;

    for span in spans {
        match annotated[cursor..].find(span.as_str()) {
            Some(rel) => {
                let start = cursor + rel;
                let end = start + span.len();
                annotated.insert_str(end, STAR_CLOSE);
                annotated.insert_str(start, STAR_OPEN);
                cursor = end + STAR_OPEN.len() + STAR_CLOSE.len();
            }
            None => {
                log::warn!("starred span {span:?} not found in text, skipping highlight");
            }
        }
    }
    annotated
}

/// Highlight the syllables of `reading` that pronounce each starred span.
///
/// Every candidate pronunciation of the span (logographs are polyphonic) is
/// tried as a substring of the not-yet-annotated tail of the reading; the
/// first hit is wrapped and the scan continues after it.  A span with no
/// matching candidate leaves the reading untouched for that span.
pub fn annotate_reading(reading: &str, spans: &[String], format: ReadingFormat) -> String {
    let mut annotated = reading.to_string();
    let mut cursor = 0;

    for span in spans {
        let candidates = phonetics::candidate_readings(span, format);

        let hit = candidates.iter().find_map(|candidate| {
            annotated[cursor..]
                .find(candidate.as_str())
                .map(|rel| (cursor + rel, candidate))
        });

        match hit {
            Some((start, candidate)) => {
                let end = start + candidate.len();
                annotated.insert_str(end, STAR_CLOSE);
                annotated.insert_str(start, STAR_OPEN);
                cursor = end + STAR_OPEN.len() + STAR_CLOSE.len();
            }
            None => {
                log::warn!(
                    "no candidate reading of {span:?} found in {reading:?}, \
                     leaving reading unhighlighted"
                );
            }
        }
    }
    annotated
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
