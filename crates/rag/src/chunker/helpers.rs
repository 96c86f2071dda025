//! Sentence splitting used by the chunker.

/// A sentence and the character offset it starts at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Sentence<'a> {
    pub text: &'a str,
    pub char_offset: usize,
}

impl Sentence<'_> {
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Split `text` after every run of `.`, `!` or `?`. Terminators stay attached
/// to their sentence; fragments that are blank after trimming are dropped.
pub(crate) fn split_sentences(text: &str) -> Vec<Sentence<'_>> {
    let mut sentences = Vec::new();
    let mut start = 0usize;
    let mut in_terminator_run = false;

    for (i, c) in text.char_indices() {
        let is_terminal = matches!(c, '.' | '!' | '?');
        if in_terminator_run && !is_terminal {
            push_trimmed(text, start, i, &mut sentences);
            start = i;
        }
        in_terminator_run = is_terminal;
    }
    push_trimmed(text, start, text.len(), &mut sentences);
    sentences
}

fn push_trimmed<'a>(text: &'a str, start: usize, end: usize, out: &mut Vec<Sentence<'a>>) {
    let raw = &text[start..end];
    let trimmed = raw.trim_start();
    let lead = raw.len() - trimmed.len();
    let trimmed = trimmed.trim_end();
    if trimmed.is_empty() {
        return;
    }
    out.push(Sentence {
        text: trimmed,
        char_offset: text[..start + lead].chars().count(),
    });
}
