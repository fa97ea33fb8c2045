//! Mandarin text handling.
//!
//! * [`Segmenter`] — jieba word segmentation (word vs. sentence rows).
//! * [`phonetics`] — pinyin readings, hanzi detection, notation rendering.
//! * [`zhuyin`] — pinyin → zhuyin syllable conversion.
//! * [`star`] — `*`-marker extraction and highlight alignment.

pub mod phonetics;
pub mod segment;
pub mod star;
pub mod zhuyin;

pub use segment::Segmenter;
pub use zhuyin::ZhuyinError;
