//! Turn-taking state machine for spoken and typed questions.
//!
//! ```text
//!            start            final             countdown / send now
//!   Idle ──────────▶ Listening ─────▶ Confirming ─────────────────────▶ Sending ──▶ Idle
//!    ▲  ◀── stop/error ──┘   ▲── new utterance ──┘                                  │
//!    │                                                                              │
//!    └──── finished / stop ──── Speaking ◀──── spoken answer arrives while Idle ◀───┘
//! ```
//!
//! Every host callback becomes one [`ControllerEvent`] fed to
//! [`TurnController::handle_event`]; user actions are methods. Side effects
//! the controller cannot perform itself (timers, completion requests, UI
//! updates) are emitted as [`ControllerOutput`]s on a channel.

use crate::capture::{CaptureSession, Recognizer, SessionId};
use crate::completion::CompletionRequest;
use crate::config::TutorConfig;
use crate::conversation::{ConversationLog, ConversationTurn, Origin};
use crate::error::{CaptureError, CompletionError, ControllerError, PlaybackError, VoiceError, VoiceResult};
use crate::language::{Language, VoiceGender};
use crate::playback::{
    ChunkProgress, PlayOutcome, PlaybackJob, PlaybackSession, Synthesizer, UtteranceId,
};
use crate::transcript::Transcript;
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Phase {
    Idle,
    Listening,
    Confirming,
    Sending,
    Speaking,
}

impl Phase {
    fn allows(self, to: Phase) -> bool {
        use Phase::*;
        matches!(
            (self, to),
            (Idle, Listening)
                | (Listening, Confirming)
                | (Listening, Idle)
                | (Confirming, Sending)
                | (Confirming, Listening)
                | (Confirming, Idle)
                | (Sending, Idle)
                | (Idle, Speaking)
                | (Speaking, Idle)
        )
    }
}

/// Handle for one scheduled timer. Only the most recent timer of each kind is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TimerId(u64);

/// Identifies one dispatched completion request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RequestId(u64);

/// Host callbacks, translated into controller inputs.
///
/// Capture events carry the [`SessionId`] given to [`Recognizer::start`] and
/// synthesis events the [`UtteranceId`] of the utterance they report on.
/// Events for a stopped session or a cancelled utterance are ignored.
#[derive(Debug, Clone)]
pub enum ControllerEvent {
    /// Interim hypotheses for the current utterance, in emission order.
    PartialResult { session: SessionId, segments: Vec<String> },
    FinalResult { session: SessionId, text: String },
    /// The recognizer stopped on its own.
    RecognitionEnded(SessionId),
    CaptureFailed { session: SessionId, error: CaptureError },
    UtteranceStarted(UtteranceId),
    UtteranceEnded(UtteranceId),
    SynthesisFailed { utterance: UtteranceId, error: PlaybackError },
    TimerFired(TimerId),
    CompletionResolved {
        request: RequestId,
        result: Result<String, CompletionError>,
    },
}

/// Effects for the hosting layer.
#[derive(Debug, Clone)]
pub enum ControllerOutput {
    PhaseChanged { from: Phase, to: Phase },
    /// Display-only transcript preview.
    LivePreview(String),
    CountdownStarted { seconds: u64 },
    Status(String),
    TurnAppended(ConversationTurn),
    /// Send this request to the completion client and report back with
    /// [`ControllerEvent::CompletionResolved`].
    Dispatch { request: RequestId, body: CompletionRequest },
    /// Fire [`ControllerEvent::TimerFired`] after `after`.
    ScheduleTimer { id: TimerId, after: Duration },
    ChunkSpoken { index: usize, total: usize },
    /// Autoplay was blocked; offer a play button that calls [`TurnController::play_blocked`].
    ManualPlayAvailable { fingerprint: String },
}

pub struct TurnController<R, S> {
    config: TutorConfig,
    phase: Phase,
    capture: CaptureSession<R>,
    playback: PlaybackSession<S>,
    log: ConversationLog,

    // Origin of each in-flight user turn, so an answer is spoken only when
    // its own question was spoken.
    pending_requests: HashMap<RequestId, Origin>,
    deferred: VecDeque<PlaybackJob>,
    blocked: Option<PlaybackJob>,

    countdown: Option<TimerId>,
    chunk_gap: Option<TimerId>,
    keep_alive: Option<TimerId>,
    next_timer: u64,
    next_request: u64,

    output_tx: mpsc::UnboundedSender<ControllerOutput>,
}

impl<R: Recognizer, S: Synthesizer> TurnController<R, S> {
    pub fn new(
        config: TutorConfig,
        recognizer: R,
        synthesizer: S,
    ) -> (Self, mpsc::UnboundedReceiver<ControllerOutput>) {
        let (output_tx, output_rx) = mpsc::unbounded_channel();
        let capture = CaptureSession::new(recognizer, config.supported_languages.clone());
        let playback = PlaybackSession::new(synthesizer, config.playback_settings());

        if !capture.is_available() {
            // Reported once; later attempts fail quietly.
            let _ = output_tx.send(ControllerOutput::Status(
                CaptureError::RecognitionUnsupported.status_message(),
            ));
        }

        let controller = Self {
            config,
            phase: Phase::Idle,
            capture,
            playback,
            log: ConversationLog::new(),
            pending_requests: HashMap::new(),
            deferred: VecDeque::new(),
            blocked: None,
            countdown: None,
            chunk_gap: None,
            keep_alive: None,
            next_timer: 1,
            next_request: 1,
            output_tx,
        };
        (controller, output_rx)
    }

    // ------------------------------------------------------------------
    // User commands
    // ------------------------------------------------------------------

    /// Tap on the mic. Voice input always preempts speech; during the
    /// confirmation window it discards the pending transcript and listens anew.
    pub fn start_capture(&mut self) -> VoiceResult<()> {
        match self.phase {
            Phase::Listening => return Err(CaptureError::AlreadyActive.into()),
            Phase::Speaking => {
                self.halt_playback();
                self.transition(Phase::Idle)?;
            }
            Phase::Confirming => {
                self.countdown = None;
                self.capture.stop();
            }
            Phase::Idle | Phase::Sending => {}
        }

        match self.capture.start(self.config.language) {
            Ok(()) => {
                self.transition(Phase::Listening)?;
                self.emit(ControllerOutput::Status("Listening... speak now".to_string()))
            }
            Err(e) => {
                if self.phase == Phase::Confirming {
                    self.transition(Phase::Idle)?;
                }
                if e != CaptureError::RecognitionUnsupported {
                    warn!(error = %e, "Turn: capture could not start");
                    self.emit(ControllerOutput::Status(e.status_message()))?;
                }
                // The mic tap may have preempted speech; queued answers still play.
                if self.phase == Phase::Idle {
                    self.resume_deferred()?;
                }
                Err(e.into())
            }
        }
    }

    /// Explicit cancel from the mic affordance. Idempotent.
    pub fn stop_capture(&mut self) -> VoiceResult<()> {
        match self.phase {
            Phase::Listening | Phase::Confirming => {
                self.countdown = None;
                self.capture.stop();
                self.transition(Phase::Idle)?;
                self.emit(ControllerOutput::Status("Recording stopped.".to_string()))?;
                self.resume_deferred()
            }
            _ => Ok(()),
        }
    }

    /// Discard the transcript shown in the confirmation window.
    pub fn cancel_transcript(&mut self) -> VoiceResult<()> {
        self.stop_capture()
    }

    /// "Send now" during the confirmation window. No-op in any other phase.
    pub fn confirm_now(&mut self) -> VoiceResult<()> {
        if self.phase != Phase::Confirming {
            debug!(phase = ?self.phase, "Turn: send-now outside confirmation window ignored");
            return Ok(());
        }
        self.send_confirmed()
    }

    /// A question typed on the keyboard. Its answer is never spoken.
    pub fn submit_typed(&mut self, text: &str) -> VoiceResult<Option<RequestId>> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        self.dispatch_user_turn(text.to_string(), Origin::Typed).map(Some)
    }

    /// Stop speaking now; queued answers are dropped too.
    pub fn stop_playback(&mut self) -> VoiceResult<()> {
        self.deferred.clear();
        if self.phase == Phase::Speaking {
            self.halt_playback();
            self.transition(Phase::Idle)?;
        }
        Ok(())
    }

    /// Manual play after the host blocked autoplay.
    pub fn play_blocked(&mut self) -> VoiceResult<()> {
        if self.phase != Phase::Idle {
            return Ok(());
        }
        match self.blocked.take() {
            Some(job) => self.start_job(job),
            None => Ok(()),
        }
    }

    pub fn set_language(&mut self, language: Language) -> VoiceResult<()> {
        self.config.supported_languages.ensure_supported(language)?;
        self.config.language = language;
        info!(%language, "Turn: language changed");
        Ok(())
    }

    pub fn set_voice_gender(&mut self, gender: VoiceGender) {
        self.config.voice_gender = gender;
    }

    pub fn set_auto_speak(&mut self, enabled: bool) {
        self.config.auto_speak = enabled;
    }

    /// Clear the conversation and abandon every in-flight capture, answer and request.
    pub fn reset_chat(&mut self) -> VoiceResult<()> {
        self.abandon_sessions()?;
        self.log.clear();
        self.pending_requests.clear();
        self.playback.forget_seen();
        info!("Turn: chat reset");
        self.emit(ControllerOutput::Status("Chat cleared.".to_string()))
    }

    /// Return to a clean idle state after an invariant violation, keeping the log.
    pub fn recover(&mut self) -> VoiceResult<()> {
        self.abandon_sessions()
    }

    // ------------------------------------------------------------------
    // Host events
    // ------------------------------------------------------------------

    pub fn handle_event(&mut self, event: ControllerEvent) -> VoiceResult<()> {
        match event {
            ControllerEvent::PartialResult { session, segments } => {
                if self.phase == Phase::Listening && self.capture.is_current(session) {
                    if let Some(preview) = self.capture.on_partial(segments) {
                        self.emit(ControllerOutput::LivePreview(preview))?;
                    }
                }
                Ok(())
            }
            ControllerEvent::FinalResult { session, text } => {
                if !self.capture.is_current(session) {
                    debug!(?session, "Turn: final result from a stopped session ignored");
                    return Ok(());
                }
                self.on_final(&text)
            }
            ControllerEvent::RecognitionEnded(session) => {
                if self.phase == Phase::Listening && self.capture.is_current(session) {
                    self.fail_capture(CaptureError::NoSpeechDetected)
                } else {
                    Ok(())
                }
            }
            ControllerEvent::CaptureFailed { session, error } => {
                let live = self.capture.is_current(session)
                    && matches!(self.phase, Phase::Listening | Phase::Confirming);
                if !live {
                    debug!(?session, %error, "Turn: stale capture error ignored");
                    return Ok(());
                }
                self.fail_capture(error)
            }
            ControllerEvent::UtteranceStarted(utterance) => {
                if self.phase == Phase::Speaking && self.playback.on_utterance_started(utterance) {
                    let id = self.schedule(self.config.keep_alive_interval())?;
                    self.keep_alive = Some(id);
                }
                Ok(())
            }
            ControllerEvent::UtteranceEnded(utterance) => self.on_utterance_ended(utterance),
            ControllerEvent::SynthesisFailed { utterance, error } => {
                if self.phase != Phase::Speaking || !self.playback.is_current(utterance) {
                    debug!(?utterance, %error, "Turn: stale synthesis error ignored");
                    return Ok(());
                }
                let job = self.halt_playback();
                self.playback_failed(error, job)
            }
            ControllerEvent::TimerFired(id) => self.on_timer(id),
            ControllerEvent::CompletionResolved { request, result } => {
                self.on_completion(request, result)
            }
        }
    }

    fn on_final(&mut self, text: &str) -> VoiceResult<()> {
        if self.phase != Phase::Listening || !self.capture.on_final(text) {
            return Ok(());
        }
        self.capture.release_microphone();
        let preview = self
            .capture
            .transcript()
            .map(Transcript::preview)
            .unwrap_or_default();
        self.emit(ControllerOutput::LivePreview(preview))?;
        self.transition(Phase::Confirming)?;

        let seconds = self.config.confirmation_window_secs;
        let id = self.schedule(self.config.confirmation_window())?;
        self.countdown = Some(id);
        self.emit(ControllerOutput::CountdownStarted { seconds })?;
        self.emit(ControllerOutput::Status(format!(
            "Got it! Sending in {} seconds...",
            seconds
        )))
    }

    fn fail_capture(&mut self, e: CaptureError) -> VoiceResult<()> {
        warn!(error = %e, phase = ?self.phase, "Turn: capture failed");
        self.countdown = None;
        self.capture.stop();
        self.transition(Phase::Idle)?;
        self.emit(ControllerOutput::Status(e.status_message()))?;
        self.resume_deferred()
    }

    fn on_utterance_ended(&mut self, utterance: UtteranceId) -> VoiceResult<()> {
        if self.phase != Phase::Speaking || !self.playback.is_current(utterance) {
            return Ok(());
        }
        self.keep_alive = None;
        match self.playback.on_utterance_ended(utterance) {
            ChunkProgress::More { next, total } => {
                debug!(next, total, "Turn: chunk finished, pausing before next");
                let id = self.schedule(self.config.inter_chunk_pause())?;
                self.chunk_gap = Some(id);
                Ok(())
            }
            ChunkProgress::Finished => {
                self.chunk_gap = None;
                self.transition(Phase::Idle)?;
                self.resume_deferred()
            }
            ChunkProgress::Idle => Ok(()),
        }
    }

    fn on_timer(&mut self, id: TimerId) -> VoiceResult<()> {
        if self.countdown == Some(id) {
            self.countdown = None;
            if self.phase == Phase::Confirming {
                return self.send_confirmed();
            }
        } else if self.chunk_gap == Some(id) {
            self.chunk_gap = None;
            if self.phase == Phase::Speaking {
                return self.speak_next_chunk();
            }
        } else if self.keep_alive == Some(id) {
            self.keep_alive = None;
            if self.phase == Phase::Speaking && self.playback.keep_alive() {
                debug!("Turn: synthesis keep-alive");
                let next = self.schedule(self.config.keep_alive_interval())?;
                self.keep_alive = Some(next);
            }
        } else {
            debug!(?id, "Turn: stale timer ignored");
        }
        Ok(())
    }

    fn speak_next_chunk(&mut self) -> VoiceResult<()> {
        match self.playback.speak_current() {
            Ok(()) => {
                if let Some(job) = self.playback.active() {
                    let (index, total) = (job.cursor(), job.chunks().len());
                    self.emit(ControllerOutput::ChunkSpoken { index, total })?;
                }
                Ok(())
            }
            Err(e) => {
                let job = self.halt_playback();
                self.playback_failed(e, job)
            }
        }
    }

    fn on_completion(
        &mut self,
        request: RequestId,
        result: Result<String, CompletionError>,
    ) -> VoiceResult<()> {
        let Some(origin) = self.pending_requests.remove(&request) else {
            debug!(?request, "Turn: answer for an abandoned request ignored");
            return Ok(());
        };
        match result {
            Ok(text) => {
                let turn = self.log.append(ConversationTurn::assistant(text.clone())).clone();
                self.emit(ControllerOutput::TurnAppended(turn))?;
                if origin == Origin::Spoken && self.config.auto_speak {
                    self.speak_answer(&text)?;
                }
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Turn: completion failed");
                let turn = self
                    .log
                    .append(ConversationTurn::assistant_error(format!(
                        "Sorry, I could not get an answer right now ({}). Please try again.",
                        e
                    )))
                    .clone();
                self.emit(ControllerOutput::TurnAppended(turn))
            }
        }
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn send_confirmed(&mut self) -> VoiceResult<()> {
        self.countdown = None;
        let Some(text) = self.capture.take_confirmed() else {
            return self.transition(Phase::Idle);
        };
        self.transition(Phase::Sending)?;
        self.emit(ControllerOutput::Status("Sent! AI is thinking...".to_string()))?;
        self.dispatch_user_turn(text, Origin::Spoken)?;
        self.transition(Phase::Idle)?;
        self.resume_deferred()
    }

    fn dispatch_user_turn(&mut self, text: String, origin: Origin) -> VoiceResult<RequestId> {
        let turn = self.log.append(ConversationTurn::user(text, origin)).clone();
        self.emit(ControllerOutput::TurnAppended(turn))?;

        let request = RequestId(self.next_request);
        self.next_request += 1;
        self.pending_requests.insert(request, origin);
        let body = CompletionRequest::new(self.config.system_prompt(), self.log.turns());
        info!(?request, ?origin, turns = body.turns.len(), "Turn: question dispatched");
        self.emit(ControllerOutput::Dispatch { request, body })?;
        Ok(request)
    }

    fn speak_answer(&mut self, text: &str) -> VoiceResult<()> {
        let Some(job) = self
            .playback
            .prepare(text, self.config.language, self.config.voice_gender)
        else {
            return Ok(());
        };
        if self.phase == Phase::Idle && !self.playback.is_active() && self.blocked.is_none() {
            self.start_job(job)
        } else {
            debug!(job = job.id(), phase = ?self.phase, "Turn: answer queued for playback");
            self.deferred.push_back(job);
            Ok(())
        }
    }

    fn start_job(&mut self, job: PlaybackJob) -> VoiceResult<()> {
        let total = job.chunks().len();
        match self.playback.play(job) {
            PlayOutcome::Speaking => {
                self.transition(Phase::Speaking)?;
                self.emit(ControllerOutput::ChunkSpoken { index: 0, total })
            }
            PlayOutcome::Busy(job) => {
                self.deferred.push_front(job);
                Ok(())
            }
            PlayOutcome::Failed(e, job) => self.playback_failed(e, Some(job)),
        }
    }

    fn playback_failed(&mut self, e: PlaybackError, job: Option<PlaybackJob>) -> VoiceResult<()> {
        warn!(error = %e, "Turn: playback failed");
        if self.phase == Phase::Speaking {
            self.transition(Phase::Idle)?;
        }
        self.emit(ControllerOutput::Status(e.status_message()))?;
        match (e, job) {
            (PlaybackError::AutoplayBlocked, Some(job)) => {
                let fingerprint = job.fingerprint().to_string();
                self.blocked = Some(job);
                self.emit(ControllerOutput::ManualPlayAvailable { fingerprint })
            }
            _ => self.resume_deferred(),
        }
    }

    /// Start the next queued answer if nothing else holds the speaker or mic.
    fn resume_deferred(&mut self) -> VoiceResult<()> {
        while self.phase == Phase::Idle && !self.playback.is_active() && self.blocked.is_none() {
            let Some(job) = self.deferred.pop_front() else {
                break;
            };
            self.start_job(job)?;
        }
        Ok(())
    }

    fn halt_playback(&mut self) -> Option<PlaybackJob> {
        self.chunk_gap = None;
        self.keep_alive = None;
        self.playback.stop()
    }

    fn abandon_sessions(&mut self) -> VoiceResult<()> {
        self.countdown = None;
        self.capture.stop();
        self.halt_playback();
        self.deferred.clear();
        self.blocked = None;
        if self.phase != Phase::Idle {
            let from = self.phase;
            self.phase = Phase::Idle;
            self.emit(ControllerOutput::PhaseChanged { from, to: Phase::Idle })?;
        }
        Ok(())
    }

    fn schedule(&mut self, after: Duration) -> VoiceResult<TimerId> {
        let id = TimerId(self.next_timer);
        self.next_timer += 1;
        self.emit(ControllerOutput::ScheduleTimer { id, after })?;
        Ok(id)
    }

    fn transition(&mut self, to: Phase) -> VoiceResult<()> {
        let from = self.phase;
        if from == to {
            return Ok(());
        }
        if !from.allows(to) {
            error!(?from, ?to, "Turn: invalid transition");
            return Err(ControllerError::InvalidTransition { from, to }.into());
        }
        self.phase = to;
        info!(?from, ?to, "Turn: phase change");
        debug_assert!(
            !(self.capture.has_pending() && self.playback.is_active()),
            "capture and playback active at once"
        );
        self.emit(ControllerOutput::PhaseChanged { from, to })
    }

    fn emit(&self, output: ControllerOutput) -> VoiceResult<()> {
        self.output_tx
            .send(output)
            .map_err(|e| VoiceError::ChannelSend(e.to_string()))
    }

    // ------------------------------------------------------------------
    // Read access for the rendering layer and tests
    // ------------------------------------------------------------------

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn log(&self) -> &ConversationLog {
        &self.log
    }

    pub fn pending_transcript(&self) -> Option<&Transcript> {
        self.capture.transcript()
    }

    pub fn active_playback(&self) -> Option<&PlaybackJob> {
        self.playback.active()
    }

    /// Recognition attempt whose events are currently accepted.
    pub fn capture_session(&self) -> Option<SessionId> {
        self.capture.session()
    }

    /// Utterance whose start/end/error events are currently accepted.
    pub fn current_utterance(&self) -> Option<UtteranceId> {
        self.playback.current_utterance()
    }

    pub fn deferred_len(&self) -> usize {
        self.deferred.len()
    }

    pub fn has_blocked_playback(&self) -> bool {
        self.blocked.is_some()
    }

    pub fn voice_input_available(&self) -> bool {
        self.capture.is_available()
    }

    pub fn config(&self) -> &TutorConfig {
        &self.config
    }

    pub fn recognizer(&self) -> &R {
        self.capture.recognizer()
    }

    pub fn synthesizer(&self) -> &S {
        self.playback.synthesizer()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::Utterance;
    use crate::voices::VoiceInfo;

    struct Mic;

    impl Recognizer for Mic {
        fn is_available(&self) -> bool {
            true
        }
        fn start(&mut self, _session: SessionId, _locale: &str) -> Result<(), CaptureError> {
            Ok(())
        }
        fn stop(&mut self) {}
    }

    #[derive(Default)]
    struct Speaker {
        spoken: Vec<String>,
    }

    impl Synthesizer for Speaker {
        fn is_available(&self) -> bool {
            true
        }
        fn voices(&self) -> Vec<VoiceInfo> {
            Vec::new()
        }
        fn speak(&mut self, utterance: &Utterance) -> Result<(), PlaybackError> {
            self.spoken.push(utterance.text.clone());
            Ok(())
        }
        fn pause(&mut self) {}
        fn resume(&mut self) {}
        fn cancel(&mut self) {}
    }

    #[test]
    fn transition_table() {
        assert!(Phase::Idle.allows(Phase::Listening));
        assert!(Phase::Confirming.allows(Phase::Listening));
        assert!(!Phase::Idle.allows(Phase::Sending));
        assert!(!Phase::Speaking.allows(Phase::Listening));
        assert!(!Phase::Listening.allows(Phase::Speaking));
    }

    #[test]
    fn undefined_transition_is_a_controller_error() {
        let (mut c, _rx) = TurnController::new(TutorConfig::default(), Mic, Speaker::default());
        let err = c.transition(Phase::Sending).unwrap_err();
        assert!(matches!(
            err,
            VoiceError::Controller(ControllerError::InvalidTransition {
                from: Phase::Idle,
                to: Phase::Sending
            })
        ));
        assert_eq!(c.phase(), Phase::Idle);
    }

    #[test]
    fn basic_spoken_flow_emits_events() {
        let (mut c, mut rx) = TurnController::new(TutorConfig::default(), Mic, Speaker::default());
        c.start_capture().unwrap();

        let event = rx.try_recv().unwrap();
        assert!(matches!(
            event,
            ControllerOutput::PhaseChanged { from: Phase::Idle, to: Phase::Listening }
        ));
        assert_eq!(c.phase(), Phase::Listening);
    }

    #[test]
    fn confirm_now_outside_window_is_ignored() {
        let (mut c, _rx) = TurnController::new(TutorConfig::default(), Mic, Speaker::default());
        c.confirm_now().unwrap();
        assert_eq!(c.phase(), Phase::Idle);
        assert!(c.log().is_empty());
    }

    #[test]
    fn language_must_be_supported() {
        let (mut c, _rx) = TurnController::new(TutorConfig::default(), Mic, Speaker::default());
        assert!(c.set_language(Language::Urdu).is_err());
        c.set_language(Language::Telugu).unwrap();
        assert_eq!(c.config().language, Language::Telugu);
    }
}
