//! Snapshot tests using the insta crate.
//!
//! Inline snapshots of the export format, the lesson wire format and the
//! legend. To update them after intentional changes:
//! ```sh
//! cargo insta test --accept
//! ```

use crate::helpers::workspace;
use mentorboard::types::{BankSection, BankSentence, RhetoricalFunction, Sentence};

#[test]
fn snapshot_export_text() {
    let ws = workspace();
    insta::assert_snapshot!(ws.export_text(), @r"
    How Weathering and Erosion Shape the Earth

    Weathering breaks rocks. Erosion moves the pieces. Together they shape land.

    First, water seeps into cracks. The water freezes and expands. The rock splits apart.
    ");
}

#[test]
fn snapshot_export_text_after_removal() {
    let mut ws = workspace();
    ws.remove_sentence("s2", false);
    ws.remove_sentence("s5", true);
    insta::assert_snapshot!(ws.export_text(), @r"
    How Weathering and Erosion Shape the Earth

    Weathering breaks rocks. Together they shape land.

    First, water seeps into cracks. The rock splits apart.
    ");
}

#[test]
fn snapshot_bank_sentence_json() {
    let mut sentence = Sentence::new(
        "bank3",
        "First, the rain washes minerals out of the rocks.",
        RhetoricalFunction::Intro,
    );
    sentence.current_function = Some(RhetoricalFunction::Seq);
    let item = BankSentence::new(sentence, BankSection::MySentences);

    insta::assert_json_snapshot!(item, @r#"
    {
      "id": "bank3",
      "originalText": "First, the rain washes minerals out of the rocks.",
      "currentText": "First, the rain washes minerals out of the rocks.",
      "function": "INTRO",
      "currentFunction": "SEQ",
      "section": "MY_SENTENCES"
    }
    "#);
}

#[test]
fn snapshot_legend() {
    let ws = workspace();
    insta::assert_debug_snapshot!(ws.legend(), @r#"
    [
        LegendEntry {
            function: Intro,
            label: "Introduction",
            category_key: "function-intro",
        },
        LegendEntry {
            function: Seq,
            label: "Step-by-Step Order",
            category_key: "function-seq",
        },
        LegendEntry {
            function: CauseEffect,
            label: "Cause and Effect",
            category_key: "function-cause_effect",
        },
    ]
    "#);
}
