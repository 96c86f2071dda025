//! Tests for the chunker.

use super::chunk;
use super::helpers::split_sentences;

fn strip_ws(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

const CONTRACT: &str =
    "Pay $500 within 30 days. Keep this confidential for 5 years. Terminate with 60 days notice.";

// ── Sentence splitting ──────────────────────────────────────────────

#[test]
fn splits_on_terminator_runs() {
    let sentences: Vec<&str> = split_sentences("Really?! Yes... Fine. ok")
        .iter()
        .map(|s| s.text)
        .collect();
    assert_eq!(sentences, vec!["Really?!", "Yes...", "Fine.", "ok"]);
}

#[test]
fn drops_blank_fragments() {
    let sentences = split_sentences("  .  !  First.   \n ");
    let texts: Vec<&str> = sentences.iter().map(|s| s.text).collect();
    assert_eq!(texts, vec![".", "!", "First."]);
    assert!(split_sentences("   ").is_empty());
}

#[test]
fn sentence_offsets_point_at_text() {
    let text = "One. Two! Three";
    for s in split_sentences(text) {
        let from: String = text.chars().skip(s.char_offset).collect();
        assert!(from.starts_with(s.text));
    }
}

// ── Chunking ────────────────────────────────────────────────────────

#[test]
fn contract_at_forty_chars_yields_three_chunks() {
    let chunks = chunk(CONTRACT, 40);
    assert_eq!(chunks.len(), 3);
    assert_eq!(chunks[0].text, "Pay $500 within 30 days.");
    assert_eq!(chunks[1].text, "Keep this confidential for 5 years.");
    assert_eq!(chunks[2].text, "Terminate with 60 days notice.");
    for (i, c) in chunks.iter().enumerate() {
        assert_eq!(c.index, i);
        assert!(c.length <= 40);
        assert_eq!(c.length, c.text.chars().count());
    }
}

#[test]
fn large_limit_packs_everything_into_one_chunk() {
    let chunks = chunk(CONTRACT, 1000);
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].text, CONTRACT);
}

#[test]
fn packs_greedily() {
    // 24 + 1 + 35 = 60 fits in 60; the third sentence does not.
    let chunks = chunk(CONTRACT, 60);
    assert_eq!(chunks.len(), 2);
    assert_eq!(
        chunks[0].text,
        "Pay $500 within 30 days. Keep this confidential for 5 years."
    );
    assert_eq!(chunks[1].char_offset, 61);
}

#[test]
fn empty_input_yields_single_empty_chunk() {
    for input in ["", "   ", "\n\t"] {
        let chunks = chunk(input, 100);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "");
        assert_eq!(chunks[0].length, 0);
        assert_eq!(chunks[0].index, 0);
    }
}

#[test]
fn oversized_sentence_is_kept_whole() {
    let long = "word ".repeat(50) + "end.";
    let text = format!("Short one. {long} Tail.");
    let chunks = chunk(&text, 20);
    assert_eq!(chunks.len(), 3);
    assert_eq!(chunks[1].text, long.trim());
    assert!(chunks[1].length > 20);
}

#[test]
fn text_without_terminators_is_one_sentence() {
    let chunks = chunk("no terminators at all here", 5);
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].text, "no terminators at all here");
}

#[test]
fn zero_size_behaves_like_one() {
    let chunks = chunk("A. B. C.", 0);
    assert_eq!(chunks.len(), 3);
}

#[test]
fn concatenation_preserves_content() {
    let inputs = [
        CONTRACT,
        "First clause. Second clause! Third? Fourth... fifth",
        "Section 1.2 applies. See 3.4(b).",
        "Ünïcödé sentence. Another one.",
    ];
    for text in inputs {
        for size in [1, 10, 25, 80, 1000] {
            let chunks = chunk(text, size);
            let joined: String = chunks.iter().map(|c| c.text.as_str()).collect();
            assert_eq!(strip_ws(&joined), strip_ws(text), "size {size}: {text}");
            for (i, c) in chunks.iter().enumerate() {
                assert_eq!(c.index, i);
                assert!(!c.text.is_empty());
            }
        }
    }
}

#[test]
fn chunks_respect_limit_unless_single_sentence() {
    let text = "Alpha beta. Gamma delta epsilon. Zeta. Eta theta iota kappa lambda. Mu.";
    for size in [5, 12, 20, 33] {
        for c in chunk(text, size) {
            let single = split_sentences(&c.text).len() == 1;
            assert!(c.length <= size || single, "chunk {:?} over {size}", c.text);
        }
    }
}

#[test]
fn labels_are_one_based() {
    let chunks = chunk(CONTRACT, 40);
    assert_eq!(chunks[0].label(), "Chunk 1");
    assert_eq!(chunks[2].label(), "Chunk 3");
}
