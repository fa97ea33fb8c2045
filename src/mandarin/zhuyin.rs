//! Pinyin → zhuyin (bopomofo) syllable conversion.
//!
//! Input syllables use tone-marked pinyin as produced by the Azure
//! transliteration service and the `pinyin` crate (e.g. `hǎo`, `zhōng`,
//! `lǜ`).  Output follows the usual zhuyin convention: first tone unmarked,
//! `ˊ ˇ ˋ` appended for tones 2–4, `˙` appended for the neutral tone.
//!
//! A reading string is converted syllable by syllable; syllables must be
//! whitespace-separated.  Any syllable that cannot be decomposed yields
//! [`ZhuyinError::UnknownSyllable`] so the caller can fall back to pinyin.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ZhuyinError {
    #[error("cannot convert pinyin syllable to zhuyin: {0:?}")]
    UnknownSyllable(String),
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

/// Tone-marked vowel → (plain vowel, tone number).
const TONED_VOWELS: &[(char, char, u8)] = &[
    ('ā', 'a', 1), ('á', 'a', 2), ('ǎ', 'a', 3), ('à', 'a', 4),
    ('ē', 'e', 1), ('é', 'e', 2), ('ě', 'e', 3), ('è', 'e', 4),
    ('ī', 'i', 1), ('í', 'i', 2), ('ǐ', 'i', 3), ('ì', 'i', 4),
    ('ō', 'o', 1), ('ó', 'o', 2), ('ǒ', 'o', 3), ('ò', 'o', 4),
    ('ū', 'u', 1), ('ú', 'u', 2), ('ǔ', 'u', 3), ('ù', 'u', 4),
    ('ǖ', 'ü', 1), ('ǘ', 'ü', 2), ('ǚ', 'ü', 3), ('ǜ', 'ü', 4),
];

/// Initial consonants, longest first so `zh` wins over `z`.
const INITIALS: &[(&str, &str)] = &[
    ("zh", "ㄓ"), ("ch", "ㄔ"), ("sh", "ㄕ"),
    ("b", "ㄅ"), ("p", "ㄆ"), ("m", "ㄇ"), ("f", "ㄈ"),
    ("d", "ㄉ"), ("t", "ㄊ"), ("n", "ㄋ"), ("l", "ㄌ"),
    ("g", "ㄍ"), ("k", "ㄎ"), ("h", "ㄏ"),
    ("j", "ㄐ"), ("q", "ㄑ"), ("x", "ㄒ"),
    ("r", "ㄖ"), ("z", "ㄗ"), ("c", "ㄘ"), ("s", "ㄙ"),
];

const FINALS: &[(&str, &str)] = &[
    ("a", "ㄚ"), ("o", "ㄛ"), ("e", "ㄜ"), ("ê", "ㄝ"),
    ("ai", "ㄞ"), ("ei", "ㄟ"), ("ao", "ㄠ"), ("ou", "ㄡ"),
    ("an", "ㄢ"), ("en", "ㄣ"), ("ang", "ㄤ"), ("eng", "ㄥ"),
    ("ong", "ㄨㄥ"), ("er", "ㄦ"),
    ("i", "ㄧ"), ("ia", "ㄧㄚ"), ("ie", "ㄧㄝ"), ("iao", "ㄧㄠ"),
    ("iu", "ㄧㄡ"), ("ian", "ㄧㄢ"), ("in", "ㄧㄣ"), ("iang", "ㄧㄤ"),
    ("ing", "ㄧㄥ"), ("iong", "ㄩㄥ"),
    ("u", "ㄨ"), ("ua", "ㄨㄚ"), ("uo", "ㄨㄛ"), ("uai", "ㄨㄞ"),
    ("ui", "ㄨㄟ"), ("uan", "ㄨㄢ"), ("un", "ㄨㄣ"), ("uang", "ㄨㄤ"),
    ("ueng", "ㄨㄥ"),
    ("ü", "ㄩ"), ("üe", "ㄩㄝ"), ("üan", "ㄩㄢ"), ("ün", "ㄩㄣ"),
];

const TONE_SUFFIX: [&str; 5] = ["˙", "", "ˊ", "ˇ", "ˋ"]; // index 0 = neutral

// ---------------------------------------------------------------------------
// Syllable conversion
// ---------------------------------------------------------------------------

/// Convert one tone-marked pinyin syllable to zhuyin.
pub fn syllable_to_zhuyin(syllable: &str) -> Result<String, ZhuyinError> {
    let unknown = || ZhuyinError::UnknownSyllable(syllable.to_string());

    let (plain, tone) = strip_tone(syllable);
    if plain.is_empty() || !plain.chars().all(|c| c.is_ascii_lowercase() || c == 'ü') {
        return Err(unknown());
    }

    // Syllables written with a bare retroflex/sibilant vowel: zhi chi shi
    // ri zi ci si have no final symbol in zhuyin.
    for (init, symbol) in INITIALS {
        if plain == format!("{init}i")
            && matches!(*init, "zh" | "ch" | "sh" | "r" | "z" | "c" | "s")
        {
            return Ok(format!("{symbol}{}", TONE_SUFFIX[tone as usize]));
        }
    }

    let (initial_symbol, final_part) = split_initial(&plain);
    let final_key = normalise_final(initial_symbol, &plain, final_part).ok_or_else(unknown)?;

    let final_symbol = FINALS
        .iter()
        .find(|(key, _)| *key == final_key)
        .map(|(_, sym)| *sym)
        .ok_or_else(unknown)?;

    Ok(format!(
        "{}{}{}",
        initial_symbol.unwrap_or(""),
        final_symbol,
        TONE_SUFFIX[tone as usize]
    ))
}

/// Convert a whitespace-separated reading string, preserving punctuation
/// attached to the edges of each syllable.
pub fn reading_to_zhuyin(reading: &str) -> Result<String, ZhuyinError> {
    let mut out = Vec::new();
    for token in reading.split_whitespace() {
        let core_start = token
            .find(|c: char| c.is_alphabetic())
            .unwrap_or(token.len());
        let core_end = token
            .rfind(|c: char| c.is_alphabetic())
            .map(|i| i + token[i..].chars().next().map_or(1, char::len_utf8))
            .unwrap_or(core_start);

        let (head, rest) = token.split_at(core_start);
        let (core, tail) = rest.split_at(core_end - core_start);

        if core.is_empty() {
            out.push(token.to_string());
        } else {
            out.push(format!("{head}{}{tail}", syllable_to_zhuyin(core)?));
        }
    }
    Ok(out.join(" "))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Replace the tone-marked vowel with its plain form and report the tone.
/// A syllable with no marked vowel is the neutral tone (0).
fn strip_tone(syllable: &str) -> (String, u8) {
    let mut tone = 0u8;
    let plain = syllable
        .to_lowercase()
        .chars()
        .map(|c| {
            // `v` is the common ASCII stand-in for ü.
            if c == 'v' {
                return 'ü';
            }
            match TONED_VOWELS.iter().find(|(marked, _, _)| *marked == c) {
                Some((_, plain, t)) => {
                    tone = *t;
                    *plain
                }
                None => c,
            }
        })
        .collect();
    (plain, tone)
}

fn split_initial(plain: &str) -> (Option<&'static str>, &str) {
    for (init, symbol) in INITIALS {
        if let Some(rest) = plain.strip_prefix(init) {
            // An empty remainder is not a valid initial+final split
            // (e.g. `r` alone); let the final lookup reject it.
            if !rest.is_empty() {
                return (Some(symbol), rest);
            }
        }
    }
    (None, plain)
}

/// Map the spelled final to the lookup key, handling the `y`/`w` standalone
/// spellings and the hidden `ü` after `j q x`.
fn normalise_final(
    initial: Option<&'static str>,
    plain: &str,
    final_part: &str,
) -> Option<String> {
    if initial.is_none() {
        // Standalone spellings starting with y/w.
        let key = match plain {
            "yi" => "i",
            "you" => "iu",
            "yu" => "ü",
            "yue" => "üe",
            "yuan" => "üan",
            "yun" => "ün",
            "wu" => "u",
            "wei" => "ui",
            "wen" => "un",
            "weng" => "ueng",
            _ => {
                if let Some(rest) = plain.strip_prefix('y') {
                    return Some(if rest.starts_with('i') {
                        rest.to_string()
                    } else {
                        format!("i{rest}")
                    });
                }
                if let Some(rest) = plain.strip_prefix('w') {
                    return Some(format!("u{rest}"));
                }
                plain
            }
        };
        return Some(key.to_string());
    }

    // After j/q/x a written u is actually ü.
    let jqx = matches!(initial, Some("ㄐ" | "ㄑ" | "ㄒ"));
    if jqx {
        if let Some(rest) = final_part.strip_prefix('u') {
            return Some(format!("ü{rest}"));
        }
    }
    Some(final_part.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_syllables() {
        assert_eq!(syllable_to_zhuyin("hǎo").unwrap(), "ㄏㄠˇ");
        assert_eq!(syllable_to_zhuyin("zhōng").unwrap(), "ㄓㄨㄥ");
        assert_eq!(syllable_to_zhuyin("wén").unwrap(), "ㄨㄣˊ");
        assert_eq!(syllable_to_zhuyin("mà").unwrap(), "ㄇㄚˋ");
    }

    #[test]
    fn neutral_tone_gets_dot() {
        assert_eq!(syllable_to_zhuyin("ma").unwrap(), "ㄇㄚ˙");
        assert_eq!(syllable_to_zhuyin("de").unwrap(), "ㄉㄜ˙");
    }

    #[test]
    fn retroflex_vowels_have_no_final() {
        assert_eq!(syllable_to_zhuyin("shì").unwrap(), "ㄕˋ");
        assert_eq!(syllable_to_zhuyin("zǐ").unwrap(), "ㄗˇ");
        assert_eq!(syllable_to_zhuyin("rì").unwrap(), "ㄖˋ");
    }

    #[test]
    fn y_and_w_spellings() {
        assert_eq!(syllable_to_zhuyin("yī").unwrap(), "ㄧ");
        assert_eq!(syllable_to_zhuyin("yǒu").unwrap(), "ㄧㄡˇ");
        assert_eq!(syllable_to_zhuyin("wǒ").unwrap(), "ㄨㄛˇ");
        assert_eq!(syllable_to_zhuyin("yuè").unwrap(), "ㄩㄝˋ");
        assert_eq!(syllable_to_zhuyin("wáng").unwrap(), "ㄨㄤˊ");
    }

    #[test]
    fn hidden_umlaut_after_jqx() {
        assert_eq!(syllable_to_zhuyin("jǔ").unwrap(), "ㄐㄩˇ");
        assert_eq!(syllable_to_zhuyin("qù").unwrap(), "ㄑㄩˋ");
        assert_eq!(syllable_to_zhuyin("xuǎn").unwrap(), "ㄒㄩㄢˇ");
    }

    #[test]
    fn explicit_umlaut() {
        assert_eq!(syllable_to_zhuyin("lǜ").unwrap(), "ㄌㄩˋ");
        assert_eq!(syllable_to_zhuyin("nǚ").unwrap(), "ㄋㄩˇ");
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(syllable_to_zhuyin("xyzzy").is_err());
        assert!(syllable_to_zhuyin("123").is_err());
        assert!(syllable_to_zhuyin("").is_err());
    }

    #[test]
    fn whole_reading_conversion() {
        let reading = "nǐ huì jiǎng zhōng wén ma";
        assert_eq!(
            reading_to_zhuyin(reading).unwrap(),
            "ㄋㄧˇ ㄏㄨㄟˋ ㄐㄧㄤˇ ㄓㄨㄥ ㄨㄣˊ ㄇㄚ˙"
        );
    }

    #[test]
    fn punctuation_is_preserved() {
        assert_eq!(reading_to_zhuyin("hǎo ma?").unwrap(), "ㄏㄠˇ ㄇㄚ˙?");
    }

    #[test]
    fn unknown_syllable_errs_whole_reading() {
        assert!(reading_to_zhuyin("nǐ qqq").is_err());
    }
}
