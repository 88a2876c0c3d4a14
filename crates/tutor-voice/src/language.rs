//! Student-selectable languages and voice genders.
//!
//! The set of languages offered for voice input is configuration, not a
//! fixed list: English, Telugu and Hindi by default, Urdu when enabled.

use crate::error::CaptureError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    English,
    Telugu,
    Hindi,
    Urdu,
}

impl Language {
    /// Recognizer / synthesis locale tag.
    pub fn locale(self) -> &'static str {
        match self {
            Language::English => "en-IN",
            Language::Telugu => "te-IN",
            Language::Hindi => "hi-IN",
            Language::Urdu => "ur-IN",
        }
    }

    /// Primary language subtag, used to match voices of the same family.
    pub fn family(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Telugu => "te",
            Language::Hindi => "hi",
            Language::Urdu => "ur",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Telugu => "Telugu",
            Language::Hindi => "Hindi",
            Language::Urdu => "Urdu",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Language {
    type Err = CaptureError;

    /// Accepts display names ("Telugu") and tags ("te", "te-IN").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let primary = s.split(['-', '_']).next().unwrap_or("").to_ascii_lowercase();
        match primary.as_str() {
            "english" | "en" => Ok(Language::English),
            "telugu" | "te" => Ok(Language::Telugu),
            "hindi" | "hi" => Ok(Language::Hindi),
            "urdu" | "ur" => Ok(Language::Urdu),
            _ => Err(CaptureError::UnsupportedLocale(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoiceGender {
    Female,
    Male,
}

impl VoiceGender {
    /// Synthesis pitch preset for this voice type.
    pub fn pitch(self) -> f32 {
        match self {
            VoiceGender::Female => 1.1,
            VoiceGender::Male => 0.9,
        }
    }
}

impl FromStr for VoiceGender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "female" | "f" => Ok(VoiceGender::Female),
            "male" | "m" => Ok(VoiceGender::Male),
            other => Err(format!("unknown voice gender: {}", other)),
        }
    }
}

/// Languages offered for voice input and spoken answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageSet(Vec<Language>);

impl LanguageSet {
    pub fn new(languages: impl IntoIterator<Item = Language>) -> Self {
        let mut out = Vec::new();
        for lang in languages {
            if !out.contains(&lang) {
                out.push(lang);
            }
        }
        Self(out)
    }

    pub fn contains(&self, language: Language) -> bool {
        self.0.contains(&language)
    }

    pub fn ensure_supported(&self, language: Language) -> Result<(), CaptureError> {
        if self.contains(language) {
            Ok(())
        } else {
            Err(CaptureError::UnsupportedLocale(language.locale().to_string()))
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Language> + '_ {
        self.0.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for LanguageSet {
    fn default() -> Self {
        Self::new([Language::English, Language::Telugu, Language::Hindi])
    }
}
