//! Anki note models for word and sentence cards.
//!
//! Each model carries two templates: a listening-first card (audio on the
//! front) and a reading-first card (hanzi on the front).  The sentence model
//! additionally styles the `.starred` markup produced by the highlight
//! aligner.

use genanki_rs::{Field, Model, Template};

pub const DECK_NAME: &str = "Generated Mandarin Flashcards";

const CARD_CSS: &str = "\
.card {
    font-family: arial;
    font-size: 20px;
    text-align: center;
    color: black;
    background-color: white;
}
";

const SENTENCE_CSS: &str = "\
.card {
    font-family: arial;
    font-size: 20px;
    text-align: center;
    color: black;
    background-color: white;
}

.starred {
    color: red;
}
";

/// Field count of the word model (timestamp, Hanzi, Definition, Audio,
/// Reading, Similar Words).
pub const WORD_FIELDS: usize = 6;

/// Field count of the sentence model (timestamp, Hanzi, Meaning, Audio,
/// Reading).
pub const SENTENCE_FIELDS: usize = 5;

/// The "Mandarin Word" note model.
pub fn word_model(model_id: i64) -> Model {
    Model::new(
        model_id,
        "Mandarin Word",
        vec![
            Field::new("timestamp"),
            Field::new("Hanzi"),
            Field::new("Definition"),
            Field::new("Audio"),
            Field::new("Reading"),
            Field::new("Similar Words"),
        ],
        vec![
            Template::new("Listening").qfmt("Listen.{{Audio}}").afmt(
                "{{FrontSide}}\n\
                 <hr id=answer>\n\
                 {{Hanzi}}<br>{{Reading}}<br>{{Definition}}\n\
                 <hr id=answer>\n\
                 {{Similar Words}}",
            ),
            Template::new("Reading").qfmt("{{Hanzi}}").afmt(
                "{{FrontSide}}\n\
                 <hr id=answer>\n\
                 {{Reading}}<br>{{Definition}}<br>{{Audio}}\n\
                 <hr id=answer>\n\
                 {{Similar Words}}",
            ),
        ],
    )
    .css(CARD_CSS)
}

/// The "Mandarin Sentence" note model.
pub fn sentence_model(model_id: i64) -> Model {
    Model::new(
        model_id,
        "Mandarin Sentence",
        vec![
            Field::new("timestamp"),
            Field::new("Hanzi"),
            Field::new("Meaning"),
            Field::new("Audio"),
            Field::new("Reading"),
        ],
        vec![
            Template::new("Listening").qfmt("Listen.{{Audio}}").afmt(
                "{{FrontSide}}\n\
                 <hr id=answer>\n\
                 {{Hanzi}}<br>{{Reading}}<br>{{Meaning}}",
            ),
            Template::new("Reading").qfmt("{{Hanzi}}").afmt(
                "{{FrontSide}}\n\
                 <hr id=answer>\n\
                 {{Reading}}<br>{{Meaning}}<br>{{Audio}}",
            ),
        ],
    )
    .css(SENTENCE_CSS)
}
