//! Spoken-question transcripts.
//!
//! A recognizer reports interim hypotheses for the current utterance; the
//! live preview is their concatenation. The final text is set exactly once.

use serde::Serialize;

/// Join the interim hypotheses of one utterance into a single preview line.
///
/// A space is inserted between neighbours only when neither side already
/// carries whitespace at the seam. Blank segments contribute nothing.
pub fn assemble_transcript(segments: &[String]) -> String {
    let mut out = String::new();
    for segment in segments {
        if segment.trim().is_empty() {
            continue;
        }
        let needs_space = !out.is_empty()
            && !out.ends_with(char::is_whitespace)
            && !segment.starts_with(char::is_whitespace);
        if needs_space {
            out.push(' ');
        }
        out.push_str(segment);
    }
    collapse_whitespace(&out)
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// One spoken-question capture result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Transcript {
    raw_segments: Vec<String>,
    final_text: Option<String>,
    confirmed: bool,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the interim hypotheses. Returns the live preview, or `None`
    /// once the transcript is final.
    pub fn apply_partial(&mut self, segments: Vec<String>) -> Option<String> {
        if self.final_text.is_some() {
            return None;
        }
        self.raw_segments = segments;
        Some(assemble_transcript(&self.raw_segments))
    }

    /// Set the final text. Returns `false` if it was already set or `text` is blank.
    pub fn finalize(&mut self, text: &str) -> bool {
        if self.final_text.is_some() {
            return false;
        }
        let text = collapse_whitespace(text);
        if text.is_empty() {
            return false;
        }
        self.final_text = Some(text);
        self.raw_segments.clear();
        true
    }

    pub fn confirm(&mut self) {
        if self.final_text.is_some() {
            self.confirmed = true;
        }
    }

    pub fn preview(&self) -> String {
        match &self.final_text {
            Some(text) => text.clone(),
            None => assemble_transcript(&self.raw_segments),
        }
    }

    pub fn raw_segments(&self) -> &[String] {
        &self.raw_segments
    }

    pub fn final_text(&self) -> Option<&str> {
        self.final_text.as_deref()
    }

    pub fn is_final(&self) -> bool {
        self.final_text.is_some()
    }

    pub fn is_confirmed(&self) -> bool {
        self.confirmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segs(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn assembles_hypotheses_in_order() {
        assert_eq!(assemble_transcript(&segs(&["What is", "photo"])), "What is photo");
        assert_eq!(assemble_transcript(&segs(&["What is ", "photo"])), "What is photo");
        assert_eq!(assemble_transcript(&segs(&["", "  ", "hello"])), "hello");
        assert_eq!(assemble_transcript(&[]), "");
    }

    #[test]
    fn finalize_only_once() {
        let mut t = Transcript::new();
        assert_eq!(
            t.apply_partial(segs(&["What is photo"])).as_deref(),
            Some("What is photo")
        );
        assert!(t.finalize("What is photosynthesis"));
        assert!(t.raw_segments().is_empty());

        assert!(!t.finalize("Something else"));
        assert_eq!(t.apply_partial(segs(&["late partial"])), None);
        assert_eq!(t.final_text(), Some("What is photosynthesis"));
    }

    #[test]
    fn blank_final_is_rejected() {
        let mut t = Transcript::new();
        assert!(!t.finalize("   "));
        assert!(!t.is_final());
    }

    #[test]
    fn confirm_requires_final_text() {
        let mut t = Transcript::new();
        t.confirm();
        assert!(!t.is_confirmed());
        t.finalize("hello");
        t.confirm();
        assert!(t.is_confirmed());
    }
}
