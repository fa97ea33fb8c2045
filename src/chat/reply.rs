//! Parsing of delimited-text chat replies into fixed-width rows.
//!
//! The generators ask for tabular replies (comma- or pipe-delimited, three
//! columns: word or sentence, reading, translation).  Language models do not
//! always comply, so rows with the wrong field count are silently discarded
//! rather than retried.

use crate::config::ReadingFormat;
use crate::mandarin::phonetics;

/// Expected columns per reply row.
const FIELD_COUNT: usize = 3;

/// Parse `message` into well-formed rows, each joined with `field_sep`.
///
/// * Rows without exactly three fields are dropped.
/// * When zhuyin notation is active and the first field contains hanzi, the
///   reading column is converted from pinyin (falling back to pinyin when
///   conversion fails).
/// * Fields containing commas are re-quoted so the joined row stays
///   machine-readable.
pub fn parse_reply_rows(
    message: &str,
    delimiter: u8,
    format: ReadingFormat,
    field_sep: &str,
) -> Vec<String> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(message.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                log::debug!("discarding unparseable reply line: {e}");
                continue;
            }
        };
        if record.len() != FIELD_COUNT {
            log::debug!("discarding reply row with {} fields", record.len());
            continue;
        }

        let mut fields: Vec<String> = record.iter().map(str::to_string).collect();

        if format == ReadingFormat::Zhuyin && phonetics::has_hanzi(&fields[0]) {
            fields[1] = phonetics::render_reading(&fields[1].to_lowercase(), format);
        }

        for field in &mut fields {
            if field.contains(',') {
                *field = format!("\"{field}\"");
            }
        }

        rows.push(fields.join(field_sep));
    }
    rows
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_rows_survive() {
        let message = "可能,kě néng,possible\n以下,yǐ xià,below";
        let rows = parse_reply_rows(message, b',', ReadingFormat::Pinyin, ", ");
        assert_eq!(
            rows,
            vec!["可能, kě néng, possible", "以下, yǐ xià, below"]
        );
    }

    #[test]
    fn wrong_field_count_is_discarded() {
        let message = "only two,fields\n可能,kě néng,possible\nfour,a,b,c";
        let rows = parse_reply_rows(message, b',', ReadingFormat::Pinyin, ", ");
        assert_eq!(rows, vec!["可能, kě néng, possible"]);
    }

    #[test]
    fn pipe_delimited_rows_parse() {
        let message = "她給我很大的安慰.|tā gěi wǒ hěn dà de ān wèi.|She gave me great comfort.";
        let rows = parse_reply_rows(message, b'|', ReadingFormat::Pinyin, ",");
        assert_eq!(rows.len(), 1);
        assert!(rows[0].starts_with("她給我很大的安慰."));
    }

    #[test]
    fn comma_bearing_fields_are_quoted() {
        let message = "安慰|ān wèi|to comfort, to console";
        let rows = parse_reply_rows(message, b'|', ReadingFormat::Pinyin, ",");
        assert_eq!(rows, vec!["安慰,ān wèi,\"to comfort, to console\""]);
    }

    #[test]
    fn zhuyin_notation_converts_reading_column() {
        let message = "中文|zhōng wén|Chinese";
        let rows = parse_reply_rows(message, b'|', ReadingFormat::Zhuyin, ",");
        assert_eq!(rows, vec!["中文,ㄓㄨㄥ ㄨㄣˊ,Chinese"]);
    }

    /// Reading stays pinyin when the first column has no hanzi (nothing to
    /// pronounce differently) or when conversion fails.
    #[test]
    fn zhuyin_conversion_is_conditional_and_fallible() {
        let latin = "abc|some reading|gloss";
        let rows = parse_reply_rows(latin, b'|', ReadingFormat::Zhuyin, ",");
        assert_eq!(rows, vec!["abc,some reading,gloss"]);

        let bad = "中文|not pinyin at all|gloss";
        let rows = parse_reply_rows(bad, b'|', ReadingFormat::Zhuyin, ",");
        assert_eq!(rows, vec!["中文,not pinyin at all,gloss"]);
    }

    #[test]
    fn empty_message_yields_no_rows() {
        assert!(parse_reply_rows("", b',', ReadingFormat::Pinyin, ", ").is_empty());
    }
}
