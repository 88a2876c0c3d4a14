//! Tutor voice configuration.
//!
//! Precedence: environment (`TUTOR_LANGUAGE=Telugu`, `__` for nesting) > TOML file at
//! `TUTOR_CONFIG` (default `config/tutor.toml`) > built-in defaults.
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | language | English | Recognizer and answer language. |
//! | voice_gender | Female | Preferred synthesis voice. |
//! | auto_speak | true | Speak answers to spoken questions. Typed questions are never spoken. |
//! | confirmation_window_secs | 6 | Countdown before a spoken question is sent. |
//! | max_chunk_length | 180 | Max characters per spoken chunk. |
//! | supported_languages | English, Telugu, Hindi | Languages offered for voice input. |
//! | inter_chunk_pause_ms | 100 | Pause between spoken chunks. |
//! | keep_alive_secs | 10 | Pause/resume cadence while an utterance plays. |
//! | speech_rate | 0.9 | Synthesis rate. |
//! | student_class | 10 | Class used in the tutor instructions. |
//! | curriculum | SCERT Telangana | Curriculum named in the tutor instructions. |

use crate::completion::tutor_system_prompt;
use crate::error::{VoiceError, VoiceResult};
use crate::language::{Language, LanguageSet, VoiceGender};
use crate::playback::PlaybackSettings;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

const MIN_CHUNK_LENGTH: usize = 40;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TutorConfig {
    pub language: Language,
    pub voice_gender: VoiceGender,
    pub auto_speak: bool,
    pub confirmation_window_secs: u64,
    pub max_chunk_length: usize,
    #[serde(default)]
    pub supported_languages: LanguageSet,
    pub inter_chunk_pause_ms: u64,
    pub keep_alive_secs: u64,
    pub speech_rate: f32,
    pub student_class: String,
    pub curriculum: String,
}

impl Default for TutorConfig {
    fn default() -> Self {
        Self {
            language: Language::English,
            voice_gender: VoiceGender::Female,
            auto_speak: true,
            confirmation_window_secs: 6,
            max_chunk_length: 180,
            supported_languages: LanguageSet::default(),
            inter_chunk_pause_ms: 100,
            keep_alive_secs: 10,
            speech_rate: 0.9,
            student_class: "10".to_string(),
            curriculum: "SCERT Telangana".to_string(),
        }
    }
}

fn with_defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
    let d = TutorConfig::default();
    config::Config::builder()
        .set_default("language", d.language.display_name())?
        .set_default("voice_gender", "Female")?
        .set_default("auto_speak", d.auto_speak)?
        .set_default("confirmation_window_secs", d.confirmation_window_secs as i64)?
        .set_default("max_chunk_length", d.max_chunk_length as i64)?
        .set_default("inter_chunk_pause_ms", d.inter_chunk_pause_ms as i64)?
        .set_default("keep_alive_secs", d.keep_alive_secs as i64)?
        .set_default("speech_rate", d.speech_rate as f64)?
        .set_default("student_class", d.student_class)?
        .set_default("curriculum", d.curriculum)
}

impl TutorConfig {
    /// Load from file and environment, then validate.
    pub fn load() -> VoiceResult<Self> {
        let config_path =
            std::env::var("TUTOR_CONFIG").unwrap_or_else(|_| "config/tutor.toml".to_string());
        let builder = with_defaults()?;

        let path = Path::new(&config_path);
        let builder = if path.exists() {
            builder.add_source(config::File::from(path))
        } else {
            builder
        };

        let built = builder
            .add_source(
                config::Environment::with_prefix("TUTOR")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let cfg: Self = built.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse a TOML document over the defaults (no environment).
    pub fn from_toml_str(toml: &str) -> VoiceResult<Self> {
        let built = with_defaults()?
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?;
        let cfg: Self = built.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> VoiceResult<()> {
        if self.confirmation_window_secs == 0 {
            return Err(VoiceError::Config(
                "confirmation_window_secs must be at least 1".to_string(),
            ));
        }
        if self.max_chunk_length < MIN_CHUNK_LENGTH {
            return Err(VoiceError::Config(format!(
                "max_chunk_length must be at least {} (got {})",
                MIN_CHUNK_LENGTH, self.max_chunk_length
            )));
        }
        if self.keep_alive_secs == 0 {
            return Err(VoiceError::Config("keep_alive_secs must be at least 1".to_string()));
        }
        if !(self.speech_rate > 0.0) {
            return Err(VoiceError::Config("speech_rate must be positive".to_string()));
        }
        if !self.supported_languages.contains(self.language) {
            return Err(VoiceError::Config(format!(
                "language {} is not in supported_languages",
                self.language
            )));
        }
        Ok(())
    }

    pub fn confirmation_window(&self) -> Duration {
        Duration::from_secs(self.confirmation_window_secs)
    }

    pub fn inter_chunk_pause(&self) -> Duration {
        Duration::from_millis(self.inter_chunk_pause_ms)
    }

    pub fn keep_alive_interval(&self) -> Duration {
        Duration::from_secs(self.keep_alive_secs)
    }

    pub fn playback_settings(&self) -> PlaybackSettings {
        PlaybackSettings {
            max_chunk_length: self.max_chunk_length,
            speech_rate: self.speech_rate,
        }
    }

    pub fn system_prompt(&self) -> String {
        tutor_system_prompt(&self.student_class, &self.curriculum, self.language)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = TutorConfig::default();
        cfg.validate().unwrap();
        assert_eq!(cfg.confirmation_window(), Duration::from_secs(6));
        assert_eq!(cfg.max_chunk_length, 180);
        assert!(cfg.auto_speak);
    }

    #[test]
    fn toml_overrides_defaults() {
        let cfg = TutorConfig::from_toml_str(
            r#"
            language = "Urdu"
            voice_gender = "Male"
            confirmation_window_secs = 9
            supported_languages = ["English", "Telugu", "Hindi", "Urdu"]
            "#,
        )
        .unwrap();
        assert_eq!(cfg.language, Language::Urdu);
        assert_eq!(cfg.voice_gender, VoiceGender::Male);
        assert_eq!(cfg.confirmation_window_secs, 9);
        assert_eq!(cfg.max_chunk_length, 180);
        assert!(cfg.supported_languages.contains(Language::Urdu));
    }

    #[test]
    fn language_outside_set_is_rejected() {
        let err = TutorConfig::from_toml_str(r#"language = "Urdu""#).unwrap_err();
        assert!(matches!(err, VoiceError::Config(msg) if msg.contains("Urdu")));
    }

    #[test]
    fn rejects_degenerate_timing() {
        let mut cfg = TutorConfig::default();
        cfg.confirmation_window_secs = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = TutorConfig::default();
        cfg.max_chunk_length = 10;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn system_prompt_uses_class_and_language() {
        let mut cfg = TutorConfig::default();
        cfg.student_class = "8".to_string();
        cfg.language = Language::Hindi;
        assert!(cfg.system_prompt().contains("Class 8"));
        assert!(cfg.system_prompt().contains("Hindi"));
    }
}
