//! Word segmentation via `jieba-rs`.
//!
//! Classification of an input row hinges on the token count: a string that
//! segments into exactly one token is treated as a single word, anything
//! else as a sentence.

use jieba_rs::Jieba;

/// Thin wrapper around the jieba segmenter.
///
/// Construction loads the bundled dictionary, so build one per run and reuse
/// it for every row.
pub struct Segmenter {
    jieba: Jieba,
}

impl Segmenter {
    pub fn new() -> Self {
        Self {
            jieba: Jieba::new(),
        }
    }

    /// Segment `text` into words (no HMM for unseen words — the dictionary
    /// split is what decides word vs. sentence).
    pub fn tokens<'a>(&self, text: &'a str) -> Vec<&'a str> {
        self.jieba.cut(text, false)
    }

    /// `true` when `text` segments into exactly one token.
    pub fn is_single_word(&self, text: &str) -> bool {
        self.tokens(text).len() == 1
    }
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
