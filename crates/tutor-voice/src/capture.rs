//! **Capture Session**: one microphone-driven recognition attempt.
//!
//! Recognition itself is delegated to the host through [`Recognizer`]. Host
//! callbacks (partial/final results, errors) are delivered to the turn
//! controller as events, which forwards them here.

use crate::error::CaptureError;
use crate::language::{Language, LanguageSet};
use crate::transcript::Transcript;
use serde::Serialize;
use tracing::{debug, info};

/// Identifies one recognition attempt. Every host callback for the attempt
/// carries it, so events from a stopped attempt never reach a newer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SessionId(u64);

/// Host-provided speech recognition capability.
pub trait Recognizer: Send {
    /// Whether the host can recognize speech at all. Probed once per session.
    fn is_available(&self) -> bool;

    /// Whether the host recognizer accepts this locale tag (e.g. `te-IN`).
    fn supports_locale(&self, _locale: &str) -> bool {
        true
    }

    /// Begin listening. Permission and device failures may be reported here
    /// or later through an error event. Results, errors and the end of
    /// recognition must be reported tagged with `session`.
    fn start(&mut self, session: SessionId, locale: &str) -> Result<(), CaptureError>;

    /// Stop listening. Must be safe to call when not listening.
    fn stop(&mut self);
}

impl<T: Recognizer + ?Sized> Recognizer for Box<T> {
    fn is_available(&self) -> bool {
        (**self).is_available()
    }

    fn supports_locale(&self, locale: &str) -> bool {
        (**self).supports_locale(locale)
    }

    fn start(&mut self, session: SessionId, locale: &str) -> Result<(), CaptureError> {
        (**self).start(session, locale)
    }

    fn stop(&mut self) {
        (**self).stop()
    }
}

/// Drives one recognition attempt to a final transcript or a terminal error.
pub struct CaptureSession<R> {
    recognizer: R,
    available: bool,
    languages: LanguageSet,
    transcript: Option<Transcript>,
    listening: bool,
    session: Option<SessionId>,
    next_session: u64,
}

impl<R: Recognizer> CaptureSession<R> {
    pub fn new(recognizer: R, languages: LanguageSet) -> Self {
        let available = recognizer.is_available();
        if !available {
            info!("Capture: host has no speech recognition, voice input disabled");
        }
        Self {
            recognizer,
            available,
            languages,
            transcript: None,
            listening: false,
            session: None,
            next_session: 1,
        }
    }

    /// False when the host has no recognition capability (text-only mode).
    pub fn is_available(&self) -> bool {
        self.available
    }

    /// Begin listening in `language`. On error nothing changes.
    pub fn start(&mut self, language: Language) -> Result<(), CaptureError> {
        if !self.available {
            return Err(CaptureError::RecognitionUnsupported);
        }
        if self.listening {
            return Err(CaptureError::AlreadyActive);
        }
        self.languages.ensure_supported(language)?;
        let locale = language.locale();
        if !self.recognizer.supports_locale(locale) {
            return Err(CaptureError::UnsupportedLocale(locale.to_string()));
        }
        let session = SessionId(self.next_session);
        self.next_session += 1;
        self.recognizer.start(session, locale)?;
        self.transcript = Some(Transcript::new());
        self.listening = true;
        self.session = Some(session);
        info!(locale, ?session, "Capture: listening");
        Ok(())
    }

    /// Attempt that is still listening or awaiting confirmation.
    pub fn session(&self) -> Option<SessionId> {
        self.session
    }

    pub fn is_current(&self, session: SessionId) -> bool {
        self.session == Some(session)
    }

    /// Apply interim hypotheses; returns the live preview while not final.
    pub fn on_partial(&mut self, segments: Vec<String>) -> Option<String> {
        if !self.listening {
            return None;
        }
        self.transcript.as_mut()?.apply_partial(segments)
    }

    /// Apply a final result. Returns `true` only the first time per attempt.
    pub fn on_final(&mut self, text: &str) -> bool {
        if !self.listening {
            return false;
        }
        match self.transcript.as_mut() {
            Some(t) => {
                let accepted = t.finalize(text);
                if accepted {
                    debug!("Capture: final transcript set");
                }
                accepted
            }
            None => false,
        }
    }

    /// Stop the recognizer but keep a finalized transcript for confirmation.
    pub fn release_microphone(&mut self) {
        if self.listening {
            self.recognizer.stop();
            self.listening = false;
        }
    }

    /// Explicit cancellation: stop the recognizer and discard the transcript.
    pub fn stop(&mut self) -> Option<Transcript> {
        self.release_microphone();
        self.session = None;
        self.transcript.take()
    }

    /// Confirm the finalized transcript and hand its text over, ending the attempt.
    pub fn take_confirmed(&mut self) -> Option<String> {
        let transcript = self.transcript.as_mut()?;
        transcript.confirm();
        if !transcript.is_confirmed() {
            return None;
        }
        self.release_microphone();
        self.session = None;
        self.transcript
            .take()
            .and_then(|t| t.final_text().map(str::to_string))
    }

    pub fn transcript(&self) -> Option<&Transcript> {
        self.transcript.as_ref()
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub fn has_pending(&self) -> bool {
        self.transcript.is_some()
    }

    pub fn recognizer(&self) -> &R {
        &self.recognizer
    }
}
