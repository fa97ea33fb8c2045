//! Phonetic readings for hanzi text.
//!
//! Two sources feed the deck: the Azure transliteration service (sentences,
//! translated words) and the `pinyin` crate (glossed words, candidate
//! pronunciations for starred spans).  Everything funnels through
//! [`render_reading`], which applies the configured notation and falls back
//! to pinyin when a syllable refuses to convert.

use crate::config::ReadingFormat;

use super::zhuyin;

/// Upper bound on heteronym combinations generated for one starred span.
const MAX_CANDIDATES: usize = 32;

// ---------------------------------------------------------------------------
// Hanzi detection
// ---------------------------------------------------------------------------

/// `true` when `text` contains at least one CJK ideograph.
pub fn has_hanzi(text: &str) -> bool {
    text.chars().any(is_hanzi)
}

fn is_hanzi(c: char) -> bool {
    matches!(c,
        '\u{4E00}'..='\u{9FFF}'        // CJK Unified Ideographs
        | '\u{3400}'..='\u{4DBF}'      // Extension A
        | '\u{F900}'..='\u{FAFF}'      // Compatibility Ideographs
        | '\u{20000}'..='\u{2A6DF}'    // Extension B
    )
}

// ---------------------------------------------------------------------------
// Readings
// ---------------------------------------------------------------------------

/// Tone-marked pinyin for `text`, one space-separated syllable per hanzi.
/// Characters without a known reading pass through unchanged.
pub fn local_reading(text: &str) -> String {
    use pinyin::ToPinyin;

    let mut syllables: Vec<String> = Vec::new();
    for c in text.chars() {
        match c.to_pinyin() {
            Some(p) => syllables.push(p.with_tone().to_string()),
            None => syllables.push(c.to_string()),
        }
    }
    syllables.join(" ")
}

/// Render a tone-marked pinyin reading in the configured notation.
///
/// Zhuyin conversion failures are logged and fall back to the pinyin input —
/// a wrong notation beats a missing reading.
pub fn render_reading(pinyin_reading: &str, format: ReadingFormat) -> String {
    match format {
        ReadingFormat::Pinyin => pinyin_reading.to_string(),
        ReadingFormat::Zhuyin => match zhuyin::reading_to_zhuyin(pinyin_reading) {
            Ok(converted) => converted,
            Err(e) => {
                log::error!("{e}");
                log::warn!("Failed to convert pinyin to zhuyin. Falling back to pinyin.");
                pinyin_reading.to_string()
            }
        },
    }
}

/// All candidate pronunciations for a starred span, in the given notation.
///
/// Logographs are polyphonic, so each character contributes its full
/// heteronym list and the candidates are the (bounded) cartesian product.
/// For pinyin both the space-joined and the directly joined spellings are
/// produced, since transliterated sentences may write a word either way.
pub fn candidate_readings(span: &str, format: ReadingFormat) -> Vec<String> {
    use pinyin::ToPinyinMulti;

    // Per-character heteronym readings; a character without any reading
    // makes the span unresolvable.
    let mut per_char: Vec<Vec<String>> = Vec::new();
    for multi in span.to_pinyin_multi() {
        match multi {
            Some(m) => per_char.push(
                m.into_iter()
                    .map(|p| p.with_tone().to_string())
                    .collect(),
            ),
            None => return Vec::new(),
        }
    }
    if per_char.is_empty() {
        return Vec::new();
    }

    let mut combos: Vec<Vec<String>> = vec![Vec::new()];
    for readings in &per_char {
        let mut next = Vec::new();
        for combo in &combos {
            for r in readings {
                if next.len() >= MAX_CANDIDATES {
                    break;
                }
                let mut extended = combo.clone();
                extended.push(r.clone());
                next.push(extended);
            }
        }
        combos = next;
    }

    let mut candidates = Vec::new();
    let mut push_unique = |s: String| {
        if !candidates.contains(&s) {
            candidates.push(s);
        }
    };

    for combo in &combos {
        match format {
            ReadingFormat::Pinyin => {
                push_unique(combo.join(" "));
                if combo.len() > 1 {
                    push_unique(combo.concat());
                }
            }
            ReadingFormat::Zhuyin => {
                let converted: Result<Vec<String>, _> = combo
                    .iter()
                    .map(|syl| zhuyin::syllable_to_zhuyin(syl))
                    .collect();
                if let Ok(syllables) = converted {
                    push_unique(syllables.join(" "));
                }
            }
        }
    }
    candidates
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
