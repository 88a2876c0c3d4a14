//! Host capability fakes shared by the integration tests.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::time::Duration;
use tokio::sync::mpsc;
use tutor_voice::{
    CaptureError, ControllerEvent, ControllerOutput, PlaybackError, Recognizer, RequestId,
    SessionId, Synthesizer, TimerId, TurnController, TutorConfig, Utterance, UtteranceId,
    VoiceInfo, VoiceResult,
};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Default)]
pub struct ScriptedRecognizer {
    pub unavailable: bool,
    pub fail_next: RefCell<VecDeque<CaptureError>>,
    pub starts: Vec<String>,
    pub sessions: Vec<SessionId>,
    pub stops: usize,
}

impl Recognizer for ScriptedRecognizer {
    fn is_available(&self) -> bool {
        !self.unavailable
    }

    fn start(&mut self, session: SessionId, locale: &str) -> Result<(), CaptureError> {
        if let Some(e) = self.fail_next.get_mut().pop_front() {
            return Err(e);
        }
        self.starts.push(locale.to_string());
        self.sessions.push(session);
        Ok(())
    }

    fn stop(&mut self) {
        self.stops += 1;
    }
}

#[derive(Default)]
pub struct RecordingSynth {
    pub unavailable: bool,
    pub block_autoplay: Cell<bool>,
    pub spoken: Vec<Utterance>,
    pub cancels: usize,
    pub pauses: usize,
}

impl RecordingSynth {
    pub fn texts(&self) -> Vec<String> {
        self.spoken.iter().map(|u| u.text.clone()).collect()
    }
}

impl Synthesizer for RecordingSynth {
    fn is_available(&self) -> bool {
        !self.unavailable
    }

    fn voices(&self) -> Vec<VoiceInfo> {
        vec![
            VoiceInfo::new("google-en-in", "Google English India", "en-IN"),
            VoiceInfo::new("heera", "Microsoft Heera", "en-IN"),
            VoiceInfo::new("swara", "Microsoft Swara", "hi-IN"),
        ]
    }

    fn speak(&mut self, utterance: &Utterance) -> Result<(), PlaybackError> {
        if self.block_autoplay.get() {
            return Err(PlaybackError::AutoplayBlocked);
        }
        self.spoken.push(utterance.clone());
        Ok(())
    }

    fn pause(&mut self) {
        self.pauses += 1;
    }

    fn resume(&mut self) {}

    fn cancel(&mut self) {
        self.cancels += 1;
    }
}

pub type TestController = TurnController<ScriptedRecognizer, RecordingSynth>;

pub fn controller(config: TutorConfig) -> (TestController, mpsc::UnboundedReceiver<ControllerOutput>) {
    init_tracing();
    TurnController::new(config, ScriptedRecognizer::default(), RecordingSynth::default())
}

pub fn drain(rx: &mut mpsc::UnboundedReceiver<ControllerOutput>) -> Vec<ControllerOutput> {
    let mut out = Vec::new();
    while let Ok(o) = rx.try_recv() {
        out.push(o);
    }
    out
}

/// Most recent timer scheduled with exactly `after`.
pub fn timer_after(outputs: &[ControllerOutput], after: Duration) -> Option<TimerId> {
    outputs.iter().rev().find_map(|o| match o {
        ControllerOutput::ScheduleTimer { id, after: a } if *a == after => Some(*id),
        _ => None,
    })
}

pub fn dispatches(outputs: &[ControllerOutput]) -> Vec<RequestId> {
    outputs
        .iter()
        .filter_map(|o| match o {
            ControllerOutput::Dispatch { request, .. } => Some(*request),
            _ => None,
        })
        .collect()
}

pub fn statuses(outputs: &[ControllerOutput]) -> Vec<String> {
    outputs
        .iter()
        .filter_map(|o| match o {
            ControllerOutput::Status(s) => Some(s.clone()),
            _ => None,
        })
        .collect()
}

/// Most recent recognition attempt the host was asked to start.
pub fn last_session(c: &TestController) -> Option<SessionId> {
    c.recognizer().sessions.last().copied()
}

/// Most recent utterance handed to the host.
pub fn last_utterance(c: &TestController) -> Option<UtteranceId> {
    c.synthesizer().spoken.last().map(|u| u.id)
}

/// Interim hypothesis from the latest recognition attempt.
pub fn partial(c: &mut TestController, text: &str) -> VoiceResult<()> {
    match last_session(c) {
        Some(session) => c.handle_event(ControllerEvent::PartialResult {
            session,
            segments: vec![text.to_string()],
        }),
        None => Ok(()),
    }
}

pub fn final_result(c: &mut TestController, text: &str) -> VoiceResult<()> {
    match last_session(c) {
        Some(session) => c.handle_event(ControllerEvent::FinalResult {
            session,
            text: text.to_string(),
        }),
        None => Ok(()),
    }
}

pub fn utterance_started(c: &mut TestController) -> VoiceResult<()> {
    match last_utterance(c) {
        Some(id) => c.handle_event(ControllerEvent::UtteranceStarted(id)),
        None => Ok(()),
    }
}

pub fn utterance_ended(c: &mut TestController) -> VoiceResult<()> {
    match last_utterance(c) {
        Some(id) => c.handle_event(ControllerEvent::UtteranceEnded(id)),
        None => Ok(()),
    }
}

/// Speak `question`, let the countdown elapse and return the dispatched request.
pub fn ask_aloud(
    c: &mut TestController,
    rx: &mut mpsc::UnboundedReceiver<ControllerOutput>,
    question: &str,
) -> RequestId {
    c.start_capture().unwrap();
    final_result(c, question).unwrap();
    let window = c.config().confirmation_window();
    let countdown = timer_after(&drain(rx), window).expect("countdown scheduled");
    c.handle_event(ControllerEvent::TimerFired(countdown)).unwrap();
    let sent = dispatches(&drain(rx));
    assert_eq!(sent.len(), 1);
    sent[0]
}

pub fn answer(c: &mut TestController, request: RequestId, text: &str) {
    c.handle_event(ControllerEvent::CompletionResolved {
        request,
        result: Ok(text.to_string()),
    })
    .unwrap();
}

/// Acknowledge chunks as the host would until the job finishes.
pub fn play_out(c: &mut TestController, rx: &mut mpsc::UnboundedReceiver<ControllerOutput>) {
    let gap = c.config().inter_chunk_pause();
    while c.active_playback().is_some() {
        utterance_started(c).unwrap();
        utterance_ended(c).unwrap();
        if let Some(timer) = timer_after(&drain(rx), gap) {
            c.handle_event(ControllerEvent::TimerFired(timer)).unwrap();
        }
    }
}
