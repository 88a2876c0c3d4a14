//! Voice Orchestrator - runs a [`TurnController`] on the tokio runtime.
//!
//! The controller itself never sleeps or performs I/O. This layer carries out
//! the effects it asks for: timers become `tokio::time::sleep` tasks,
//! completion requests are spawned against a [`CompletionClient`], and every
//! output is forwarded to the hosting UI.

use crate::capture::Recognizer;
use crate::completion::CompletionClient;
use crate::error::{VoiceError, VoiceResult};
use crate::language::{Language, VoiceGender};
use crate::playback::Synthesizer;
use crate::turn::{ControllerEvent, ControllerOutput, TurnController};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

/// User actions from the mic, composer and settings controls.
#[derive(Debug, Clone)]
pub enum UserCommand {
    StartCapture,
    StopCapture,
    ConfirmNow,
    CancelTranscript,
    SubmitTyped(String),
    StopPlayback,
    PlayBlocked,
    SetLanguage(Language),
    SetVoiceGender(VoiceGender),
    SetAutoSpeak(bool),
    ResetChat,
    Shutdown,
}

#[derive(Debug, Clone)]
pub enum HostInput {
    Event(ControllerEvent),
    Command(UserCommand),
}

/// Cloneable sender the host uses for callbacks and user actions.
#[derive(Debug, Clone)]
pub struct VoiceHandle {
    tx: mpsc::UnboundedSender<HostInput>,
}

impl VoiceHandle {
    pub fn event(&self, event: ControllerEvent) -> VoiceResult<()> {
        self.send(HostInput::Event(event))
    }

    pub fn command(&self, command: UserCommand) -> VoiceResult<()> {
        self.send(HostInput::Command(command))
    }

    fn send(&self, input: HostInput) -> VoiceResult<()> {
        self.tx
            .send(input)
            .map_err(|e| VoiceError::ChannelSend(e.to_string()))
    }
}

pub struct VoiceOrchestrator<R, S> {
    controller: TurnController<R, S>,
    outputs: mpsc::UnboundedReceiver<ControllerOutput>,
    inputs: mpsc::UnboundedReceiver<HostInput>,
    // Timer fires and completion results come back on this channel.
    internal_tx: mpsc::UnboundedSender<ControllerEvent>,
    internal_rx: mpsc::UnboundedReceiver<ControllerEvent>,
    completion: Arc<dyn CompletionClient>,
    observer: mpsc::UnboundedSender<ControllerOutput>,
}

impl<R: Recognizer, S: Synthesizer> VoiceOrchestrator<R, S> {
    /// Wrap a controller. Every controller output is also forwarded to `observer`.
    pub fn new(
        controller: TurnController<R, S>,
        outputs: mpsc::UnboundedReceiver<ControllerOutput>,
        completion: Arc<dyn CompletionClient>,
        observer: mpsc::UnboundedSender<ControllerOutput>,
    ) -> (Self, VoiceHandle) {
        let (tx, inputs) = mpsc::unbounded_channel();
        let (internal_tx, internal_rx) = mpsc::unbounded_channel();
        let orchestrator = Self {
            controller,
            outputs,
            inputs,
            internal_tx,
            internal_rx,
            completion,
            observer,
        };
        (orchestrator, VoiceHandle { tx })
    }

    /// Run until [`UserCommand::Shutdown`] or every [`VoiceHandle`] is dropped.
    pub async fn run(mut self) -> VoiceResult<TurnController<R, S>> {
        info!("🎙️ Voice loop started");
        loop {
            self.drain_outputs();

            tokio::select! {
                input = self.inputs.recv() => match input {
                    None | Some(HostInput::Command(UserCommand::Shutdown)) => break,
                    Some(HostInput::Command(command)) => {
                        let result = self.apply_command(command);
                        self.settle(result)?;
                    }
                    Some(HostInput::Event(event)) => {
                        let result = self.controller.handle_event(event);
                        self.settle(result)?;
                    }
                },
                Some(event) = self.internal_rx.recv() => {
                    let result = self.controller.handle_event(event);
                    self.settle(result)?;
                }
            }
        }
        self.drain_outputs();
        info!("🛑 Voice loop stopped");
        Ok(self.controller)
    }

    fn apply_command(&mut self, command: UserCommand) -> VoiceResult<()> {
        debug!(?command, "Voice loop: command");
        let c = &mut self.controller;
        match command {
            UserCommand::StartCapture => c.start_capture(),
            UserCommand::StopCapture => c.stop_capture(),
            UserCommand::ConfirmNow => c.confirm_now(),
            UserCommand::CancelTranscript => c.cancel_transcript(),
            UserCommand::SubmitTyped(text) => c.submit_typed(&text).map(|_| ()),
            UserCommand::StopPlayback => c.stop_playback(),
            UserCommand::PlayBlocked => c.play_blocked(),
            UserCommand::SetLanguage(language) => c.set_language(language),
            UserCommand::SetVoiceGender(gender) => {
                c.set_voice_gender(gender);
                Ok(())
            }
            UserCommand::SetAutoSpeak(enabled) => {
                c.set_auto_speak(enabled);
                Ok(())
            }
            UserCommand::ResetChat => c.reset_chat(),
            UserCommand::Shutdown => Ok(()),
        }
    }

    /// Capture and playback failures were already surfaced as status lines.
    /// An invariant violation abandons the current sessions and carries on.
    fn settle(&mut self, result: VoiceResult<()>) -> VoiceResult<()> {
        match result {
            Ok(()) => Ok(()),
            Err(VoiceError::Capture(e)) => {
                debug!(error = %e, "Voice loop: capture refused");
                Ok(())
            }
            Err(VoiceError::Playback(e)) => {
                debug!(error = %e, "Voice loop: playback refused");
                Ok(())
            }
            Err(VoiceError::Controller(e)) => {
                error!(error = %e, "Voice loop: controller invariant violated, recovering");
                self.controller.recover()
            }
            Err(e) => Err(e),
        }
    }

    fn drain_outputs(&mut self) {
        while let Ok(output) = self.outputs.try_recv() {
            match &output {
                ControllerOutput::ScheduleTimer { id, after } => {
                    let tx = self.internal_tx.clone();
                    let (id, after) = (*id, *after);
                    tokio::spawn(async move {
                        tokio::time::sleep(after).await;
                        let _ = tx.send(ControllerEvent::TimerFired(id));
                    });
                }
                ControllerOutput::Dispatch { request, body } => {
                    let tx = self.internal_tx.clone();
                    let client = Arc::clone(&self.completion);
                    let (request, body) = (*request, body.clone());
                    tokio::spawn(async move {
                        let result = client.complete(&body).await;
                        let _ = tx.send(ControllerEvent::CompletionResolved { request, result });
                    });
                }
                _ => {}
            }
            // The UI may have gone away; the loop keeps its own state regardless.
            let _ = self.observer.send(output);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::{CompletionRequest, PlaceholderCompletion};
    use crate::config::TutorConfig;
    use crate::error::{CaptureError, CompletionError, PlaybackError};
    use crate::capture::SessionId;
    use crate::playback::Utterance;
    use crate::turn::Phase;
    use crate::voices::VoiceInfo;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::time::Instant;

    #[derive(Clone, Default)]
    struct Mic {
        sessions: Arc<Mutex<Vec<SessionId>>>,
    }

    impl Mic {
        fn last_session(&self) -> SessionId {
            *self.sessions.lock().unwrap().last().expect("recognizer started")
        }
    }

    impl Recognizer for Mic {
        fn is_available(&self) -> bool {
            true
        }
        fn start(&mut self, session: SessionId, _locale: &str) -> Result<(), CaptureError> {
            self.sessions.lock().unwrap().push(session);
            Ok(())
        }
        fn stop(&mut self) {}
    }

    #[derive(Clone, Default)]
    struct Speaker {
        spoken: Arc<Mutex<Vec<Utterance>>>,
    }

    impl Synthesizer for Speaker {
        fn is_available(&self) -> bool {
            true
        }
        fn voices(&self) -> Vec<VoiceInfo> {
            vec![VoiceInfo::new("v1", "Heera", "en-IN")]
        }
        fn speak(&mut self, utterance: &Utterance) -> Result<(), PlaybackError> {
            self.spoken.lock().unwrap().push(utterance.clone());
            Ok(())
        }
        fn pause(&mut self) {}
        fn resume(&mut self) {}
        fn cancel(&mut self) {}
    }

    struct SlowCompletion;

    #[async_trait]
    impl CompletionClient for SlowCompletion {
        async fn complete(&self, _request: &CompletionRequest) -> Result<String, CompletionError> {
            tokio::time::sleep(Duration::from_secs(2)).await;
            Err(CompletionError::Http("timed out".to_string()))
        }
    }

    async fn next_where(
        rx: &mut mpsc::UnboundedReceiver<ControllerOutput>,
        pred: impl Fn(&ControllerOutput) -> bool,
    ) -> ControllerOutput {
        loop {
            let out = rx.recv().await.expect("observer channel closed");
            if pred(&out) {
                return out;
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn countdown_elapses_then_answer_is_spoken() {
        let mic = Mic::default();
        let speaker = Speaker::default();
        let spoken = Arc::clone(&speaker.spoken);
        let (controller, outputs) = TurnController::new(TutorConfig::default(), mic.clone(), speaker);
        let (observer, mut seen) = mpsc::unbounded_channel();
        let completion = Arc::new(PlaceholderCompletion::with_response("Plants make food from sunlight."));
        let (orchestrator, handle) = VoiceOrchestrator::new(controller, outputs, completion, observer);
        let task = tokio::spawn(orchestrator.run());

        let started = Instant::now();
        handle.command(UserCommand::StartCapture).unwrap();
        next_where(&mut seen, |o| {
            matches!(o, ControllerOutput::PhaseChanged { to: Phase::Listening, .. })
        })
        .await;
        handle
            .event(ControllerEvent::FinalResult {
                session: mic.last_session(),
                text: "What is photosynthesis".to_string(),
            })
            .unwrap();

        next_where(&mut seen, |o| matches!(o, ControllerOutput::Dispatch { .. })).await;
        assert!(started.elapsed() >= Duration::from_secs(6));

        next_where(&mut seen, |o| {
            matches!(o, ControllerOutput::PhaseChanged { to: Phase::Speaking, .. })
        })
        .await;
        let utterance = {
            let spoken = spoken.lock().unwrap();
            assert_eq!(spoken.len(), 1);
            assert_eq!(spoken[0].text, "Plants make food from sunlight.");
            spoken[0].id
        };

        handle.event(ControllerEvent::UtteranceStarted(utterance)).unwrap();
        handle.event(ControllerEvent::UtteranceEnded(utterance)).unwrap();
        next_where(&mut seen, |o| {
            matches!(o, ControllerOutput::PhaseChanged { to: Phase::Idle, .. })
        })
        .await;

        handle.command(UserCommand::Shutdown).unwrap();
        let controller = task.await.unwrap().unwrap();
        assert_eq!(controller.log().len(), 2);
        assert_eq!(controller.phase(), Phase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn completion_failure_is_logged_not_spoken() {
        let mic = Mic::default();
        let speaker = Speaker::default();
        let spoken = Arc::clone(&speaker.spoken);
        let (controller, outputs) = TurnController::new(TutorConfig::default(), mic.clone(), speaker);
        let (observer, mut seen) = mpsc::unbounded_channel();
        let (orchestrator, handle) =
            VoiceOrchestrator::new(controller, outputs, Arc::new(SlowCompletion), observer);
        let task = tokio::spawn(orchestrator.run());

        handle.command(UserCommand::StartCapture).unwrap();
        next_where(&mut seen, |o| {
            matches!(o, ControllerOutput::PhaseChanged { to: Phase::Listening, .. })
        })
        .await;
        handle
            .event(ControllerEvent::FinalResult {
                session: mic.last_session(),
                text: "Explain democracy".to_string(),
            })
            .unwrap();
        handle.command(UserCommand::ConfirmNow).unwrap();

        let out = next_where(&mut seen, |o| {
            matches!(o, ControllerOutput::TurnAppended(t) if t.is_error)
        })
        .await;
        if let ControllerOutput::TurnAppended(turn) = out {
            assert!(turn.content.contains("timed out"));
        }

        handle.command(UserCommand::Shutdown).unwrap();
        let controller = task.await.unwrap().unwrap();
        assert!(spoken.lock().unwrap().is_empty());
        assert_eq!(controller.phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn dropping_every_handle_stops_the_loop() {
        let (controller, outputs) =
            TurnController::new(TutorConfig::default(), Mic::default(), Speaker::default());
        let (observer, _seen) = mpsc::unbounded_channel();
        let (orchestrator, handle) = VoiceOrchestrator::new(
            controller,
            outputs,
            Arc::new(PlaceholderCompletion::new()),
            observer,
        );
        drop(handle);
        let controller = orchestrator.run().await.unwrap();
        assert!(controller.log().is_empty());
    }
}
