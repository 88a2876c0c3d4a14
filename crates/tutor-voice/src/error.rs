//! Error types for the tutor voice core

use crate::turn::Phase;
use thiserror::Error;

/// Result type alias for voice operations
pub type VoiceResult<T> = Result<T, VoiceError>;

/// Terminal failures of one capture attempt.
///
/// All of these are recovered locally: the controller returns to idle and
/// surfaces [`CaptureError::status_message`] to the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("no speech detected")]
    NoSpeechDetected,

    #[error("microphone permission denied")]
    PermissionDenied,

    #[error("no capture device available")]
    DeviceUnavailable,

    #[error("speech recognition is not supported by this host")]
    RecognitionUnsupported,

    #[error("unsupported recognizer locale: {0}")]
    UnsupportedLocale(String),

    #[error("a capture session is already active")]
    AlreadyActive,

    #[error("recognition network error")]
    Network,

    #[error("recognizer error: {0}")]
    Recognizer(String),
}

impl CaptureError {
    /// Short status line for the mic affordance.
    pub fn status_message(&self) -> String {
        match self {
            CaptureError::NoSpeechDetected => "No speech detected. Try again.".to_string(),
            CaptureError::PermissionDenied => {
                "Microphone blocked. Allow microphone access and try again.".to_string()
            }
            CaptureError::DeviceUnavailable => "No microphone found.".to_string(),
            CaptureError::RecognitionUnsupported => {
                "Voice input is not supported here. Please type your question.".to_string()
            }
            CaptureError::UnsupportedLocale(tag) => {
                format!("Voice input is not available for {}.", tag)
            }
            CaptureError::AlreadyActive => "Already listening.".to_string(),
            CaptureError::Network => "Network error during voice input.".to_string(),
            CaptureError::Recognizer(msg) => format!("Voice input error: {}", msg),
        }
    }
}

/// Failures of the spoken-answer pipeline.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    /// Host has no synthesis capability; answers stay text-only.
    #[error("speech synthesis is not available")]
    SynthesisUnavailable,

    /// Host refused unsolicited audio; a manual play affordance must be offered.
    #[error("autoplay blocked by host policy")]
    AutoplayBlocked,

    #[error("synthesis engine error: {0}")]
    Engine(String),
}

impl PlaybackError {
    pub fn status_message(&self) -> String {
        match self {
            PlaybackError::SynthesisUnavailable => "Audio answers are not supported here.".to_string(),
            PlaybackError::AutoplayBlocked => "Tap play to hear the answer.".to_string(),
            PlaybackError::Engine(msg) => format!("Could not read the answer aloud: {}", msg),
        }
    }
}

/// State-machine invariant violations. These indicate a bug, not a user condition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ControllerError {
    #[error("invalid transition {from:?} -> {to:?}")]
    InvalidTransition { from: Phase, to: Phase },
}

/// Failures at the completion-client boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompletionError {
    #[error("completion API key missing")]
    MissingApiKey,

    #[error("completion HTTP error: {0}")]
    Http(String),

    #[error("completion API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("completion returned no choices")]
    EmptyResponse,
}

/// Errors that can occur anywhere in the voice core
#[derive(Error, Debug)]
pub enum VoiceError {
    #[error("Capture error: {0}")]
    Capture(#[from] CaptureError),

    #[error("Playback error: {0}")]
    Playback(#[from] PlaybackError),

    #[error("Controller error: {0}")]
    Controller(#[from] ControllerError),

    #[error("Completion error: {0}")]
    Completion(#[from] CompletionError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Channel send error: {0}")]
    ChannelSend(String),
}

impl From<config::ConfigError> for VoiceError {
    fn from(err: config::ConfigError) -> Self {
        VoiceError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_errors_have_distinct_status_lines() {
        let kinds = [
            CaptureError::NoSpeechDetected,
            CaptureError::PermissionDenied,
            CaptureError::DeviceUnavailable,
            CaptureError::RecognitionUnsupported,
        ];
        let mut lines: Vec<String> = kinds.iter().map(|k| k.status_message()).collect();
        lines.sort();
        lines.dedup();
        assert_eq!(lines.len(), kinds.len());
    }

    #[test]
    fn voice_error_wraps_capture_error() {
        let err: VoiceError = CaptureError::PermissionDenied.into();
        assert!(matches!(err, VoiceError::Capture(CaptureError::PermissionDenied)));
        assert!(err.to_string().contains("permission"));
    }
}
