//! Speech segmenter: splits an answer into short speakable chunks.
//!
//! Some synthesis engines stop silently after roughly fifteen seconds of a
//! single utterance, so long answers are spoken as a sequence of chunks.
//! Chunks break at sentence boundaries where possible and never cut a word.

/// Characters that end a sentence (Latin and Devanagari punctuation).
const TERMINATORS: [char; 5] = ['.', '!', '?', '।', '॥'];
/// Characters that may trail a terminator and still belong to the sentence.
const CLOSERS: [char; 6] = ['"', '\'', ')', ']', '”', '’'];

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Split `text` into trimmed sentences, keeping their terminators.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        current.push(c);
        if !TERMINATORS.contains(&c) {
            continue;
        }
        while let Some(&next) = chars.peek() {
            if TERMINATORS.contains(&next) || CLOSERS.contains(&next) {
                current.push(next);
                chars.next();
            } else {
                break;
            }
        }
        let at_boundary = chars.peek().map_or(true, |n| n.is_whitespace());
        if at_boundary {
            push_sentence(&mut sentences, &current);
            current.clear();
        }
    }
    push_sentence(&mut sentences, &current);
    sentences
}

fn push_sentence(out: &mut Vec<String>, raw: &str) {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if !collapsed.is_empty() {
        out.push(collapsed);
    }
}

/// Split an over-long sentence at whitespace so each piece fits `max_len`.
/// A single word longer than `max_len` becomes its own piece.
fn hard_split(sentence: &str, max_len: usize) -> Vec<String> {
    if char_len(sentence) <= max_len {
        return vec![sentence.to_string()];
    }
    let mut pieces = Vec::new();
    let mut current = String::new();
    for word in sentence.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
        } else if char_len(&current) + 1 + char_len(word) <= max_len {
            current.push(' ');
            current.push_str(word);
        } else {
            pieces.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}

/// Split `text` into chunks of at most `max_len` characters.
///
/// Whole sentences are packed greedily; a sentence longer than `max_len` is
/// split at the last whitespace before the limit. Joining the chunks with a
/// single space yields the words of `text` in order.
pub fn segment_for_speech(text: &str, max_len: usize) -> Vec<String> {
    let max_len = max_len.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();

    for sentence in split_sentences(text) {
        for piece in hard_split(&sentence, max_len) {
            if current.is_empty() {
                current = piece;
            } else if char_len(&current) + 1 + char_len(&piece) <= max_len {
                current.push(' ');
                current.push_str(&piece);
            } else {
                chunks.push(std::mem::replace(&mut current, piece));
            }
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
