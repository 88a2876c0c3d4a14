//! Voice selection as a ranked fallback chain.
//!
//! Hosts rarely ship native Telugu or Urdu voices, so selection falls back
//! from the exact locale to the language family, then to Indian English,
//! then to the host default.

use crate::language::{Language, VoiceGender};
use serde::{Deserialize, Serialize};

const FEMALE_KEYWORDS: [&str; 5] = ["female", "zira", "heera", "swara", "kalpana"];
const MALE_KEYWORDS: [&str; 5] = ["male", "david", "mark", "ravi", "hemant"];

/// One voice offered by the host synthesis capability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceInfo {
    /// Host handle passed back in [`crate::playback::Utterance::voice_id`].
    pub id: String,
    pub name: String,
    /// BCP-47 tag, e.g. `hi-IN`.
    pub locale: String,
    #[serde(default)]
    pub gender: Option<VoiceGender>,
    #[serde(default)]
    pub is_default: bool,
}

impl VoiceInfo {
    pub fn new(id: impl Into<String>, name: impl Into<String>, locale: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            locale: locale.into(),
            gender: None,
            is_default: false,
        }
    }

    pub fn with_gender(mut self, gender: VoiceGender) -> Self {
        self.gender = Some(gender);
        self
    }

    pub fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }

    /// Reported gender, or one inferred from well-known voice names.
    pub fn effective_gender(&self) -> Option<VoiceGender> {
        self.gender.or_else(|| infer_gender(&self.name))
    }

    fn locale_is(&self, locale: &str) -> bool {
        normalize_tag(&self.locale).eq_ignore_ascii_case(locale)
    }

    fn family(&self) -> String {
        normalize_tag(&self.locale)
            .split('-')
            .next()
            .unwrap_or("")
            .to_ascii_lowercase()
    }

    fn region(&self) -> Option<String> {
        normalize_tag(&self.locale)
            .split('-')
            .nth(1)
            .map(|r| r.to_ascii_uppercase())
    }
}

fn normalize_tag(tag: &str) -> String {
    tag.trim().replace('_', "-")
}

/// "female" must be tested first: it contains "male".
fn infer_gender(name: &str) -> Option<VoiceGender> {
    let name = name.to_lowercase();
    if FEMALE_KEYWORDS.iter().any(|k| name.contains(k)) {
        Some(VoiceGender::Female)
    } else if MALE_KEYWORDS.iter().any(|k| name.contains(k)) {
        Some(VoiceGender::Male)
    } else {
        None
    }
}

/// Fallback ranks, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum VoiceRank {
    ExactLocale,
    SameFamily,
    IndianEnglish,
    SameRegion,
    HostDefault,
    Any,
}

fn rank(voice: &VoiceInfo, language: Language) -> VoiceRank {
    if voice.locale_is(language.locale()) {
        VoiceRank::ExactLocale
    } else if voice.family() == language.family() {
        VoiceRank::SameFamily
    } else if language != Language::English && voice.locale_is(Language::English.locale()) {
        VoiceRank::IndianEnglish
    } else if voice.region().as_deref() == Some("IN") {
        VoiceRank::SameRegion
    } else if voice.is_default {
        VoiceRank::HostDefault
    } else {
        VoiceRank::Any
    }
}

/// Pick the best voice for `language` and `gender`.
///
/// Lower rank wins; within a rank a voice of the requested gender wins;
/// remaining ties keep host order.
pub fn select_voice(voices: &[VoiceInfo], language: Language, gender: VoiceGender) -> Option<&VoiceInfo> {
    voices.iter().min_by_key(|v| {
        let gender_miss = v.effective_gender() != Some(gender);
        (rank(v, language), gender_miss)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<VoiceInfo> {
        vec![
            VoiceInfo::new("us", "Google US English", "en-US").as_default(),
            VoiceInfo::new("in-m", "Microsoft Ravi", "en-IN"),
            VoiceInfo::new("in-f", "Microsoft Heera", "en-IN"),
            VoiceInfo::new("hi-f", "Google हिन्दी", "hi-IN").with_gender(VoiceGender::Female),
            VoiceInfo::new("hi-m", "Microsoft Hemant", "hi_IN"),
        ]
    }

    #[test]
    fn exact_locale_and_gender() {
        let voices = catalog();
        assert_eq!(select_voice(&voices, Language::Hindi, VoiceGender::Male).unwrap().id, "hi-m");
        assert_eq!(select_voice(&voices, Language::Hindi, VoiceGender::Female).unwrap().id, "hi-f");
    }

    #[test]
    fn exact_locale_beats_gender() {
        let voices = vec![
            VoiceInfo::new("te", "Telugu Voice", "te-IN"),
            VoiceInfo::new("in-f", "Microsoft Heera", "en-IN"),
        ];
        assert_eq!(select_voice(&voices, Language::Telugu, VoiceGender::Female).unwrap().id, "te");
    }

    #[test]
    fn family_match_when_region_differs() {
        let voices = vec![
            VoiceInfo::new("us", "Google US English", "en-US"),
            VoiceInfo::new("x", "Other", "fr-FR").as_default(),
        ];
        assert_eq!(select_voice(&voices, Language::English, VoiceGender::Female).unwrap().id, "us");
    }

    #[test]
    fn telugu_falls_back_to_indian_english() {
        let voices = catalog();
        assert_eq!(select_voice(&voices, Language::Telugu, VoiceGender::Female).unwrap().id, "in-f");
        assert_eq!(select_voice(&voices, Language::Urdu, VoiceGender::Male).unwrap().id, "in-m");
    }

    #[test]
    fn host_default_is_last_resort() {
        let voices = vec![
            VoiceInfo::new("de", "Deutsch", "de-DE"),
            VoiceInfo::new("us", "Google US English", "en-US").as_default(),
        ];
        assert_eq!(select_voice(&voices, Language::Telugu, VoiceGender::Male).unwrap().id, "us");
        assert!(select_voice(&[], Language::English, VoiceGender::Male).is_none());
    }

    #[test]
    fn gender_inference_from_names() {
        assert_eq!(infer_gender("Microsoft Zira Desktop"), Some(VoiceGender::Female));
        assert_eq!(infer_gender("Female Hindi"), Some(VoiceGender::Female));
        assert_eq!(infer_gender("Microsoft David"), Some(VoiceGender::Male));
        assert_eq!(infer_gender("Google हिन्दी"), None);
    }
}
