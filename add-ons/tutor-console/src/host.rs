//! Console stand-ins for the host speech capabilities.
//!
//! Recognition replays the text of a `/say` line word by word; synthesis
//! prints each chunk and reports start/end after a reading delay, the way a
//! real engine would. Both tag every callback with the session or utterance
//! it belongs to.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;
use tutor_voice::{
    CaptureError, ControllerEvent, PlaybackError, Recognizer, SessionId, Synthesizer, Utterance,
    VoiceInfo, VoiceGender,
};

/// Reading speed used to simulate utterance length.
const MILLIS_PER_WORD: u64 = 90;

/// Delay between simulated partial results.
const PARTIAL_INTERVAL: Duration = Duration::from_millis(150);

pub struct ConsoleRecognizer {
    callbacks: mpsc::UnboundedSender<ControllerEvent>,
    // Text of the next `/say` line, consumed when listening starts.
    scripts: mpsc::UnboundedReceiver<String>,
    listening: Option<JoinHandle<()>>,
}

impl ConsoleRecognizer {
    pub fn new(
        callbacks: mpsc::UnboundedSender<ControllerEvent>,
        scripts: mpsc::UnboundedReceiver<String>,
    ) -> Self {
        Self {
            callbacks,
            scripts,
            listening: None,
        }
    }
}

impl Recognizer for ConsoleRecognizer {
    fn is_available(&self) -> bool {
        true
    }

    fn start(&mut self, session: SessionId, locale: &str) -> Result<(), CaptureError> {
        let mut script = None;
        while let Ok(text) = self.scripts.try_recv() {
            script = Some(text);
        }
        let Some(text) = script else {
            return Err(CaptureError::DeviceUnavailable);
        };
        println!("🎙️  listening ({})", locale);
        let tx = self.callbacks.clone();
        self.listening = Some(tokio::spawn(async move {
            let words: Vec<&str> = text.split_whitespace().collect();
            for n in 1..words.len() {
                tokio::time::sleep(PARTIAL_INTERVAL).await;
                let segments = vec![words[..n].join(" ")];
                if tx.send(ControllerEvent::PartialResult { session, segments }).is_err() {
                    return;
                }
            }
            tokio::time::sleep(PARTIAL_INTERVAL).await;
            let _ = tx.send(ControllerEvent::FinalResult { session, text: text.clone() });
        }));
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(task) = self.listening.take() {
            task.abort();
            debug!("console recognizer stopped");
        }
    }
}

pub struct ConsoleSynthesizer {
    callbacks: mpsc::UnboundedSender<ControllerEvent>,
}

impl ConsoleSynthesizer {
    pub fn new(callbacks: mpsc::UnboundedSender<ControllerEvent>) -> Self {
        Self { callbacks }
    }
}

impl Synthesizer for ConsoleSynthesizer {
    fn is_available(&self) -> bool {
        true
    }

    fn voices(&self) -> Vec<VoiceInfo> {
        vec![
            VoiceInfo::new("console-heera", "Console Heera", "en-IN"),
            VoiceInfo::new("console-ravi", "Console Ravi", "en-IN"),
            VoiceInfo::new("console-swara", "Console Swara", "hi-IN"),
            VoiceInfo::new("console-mohan", "Console Mohan", "te-IN").with_gender(VoiceGender::Male),
            VoiceInfo::new("console-default", "Console Default", "en-US").as_default(),
        ]
    }

    fn speak(&mut self, utterance: &Utterance) -> Result<(), PlaybackError> {
        println!(
            "🔊 [{}] {}",
            utterance.voice_id.as_deref().unwrap_or("default"),
            utterance.text
        );
        let words = utterance.text.split_whitespace().count() as u64;
        let duration = Duration::from_millis(words.max(1) * MILLIS_PER_WORD);
        let id = utterance.id;
        let tx = self.callbacks.clone();

        // A cancelled utterance still reports its end, like browser engines do;
        // the controller drops it by id.
        tokio::spawn(async move {
            let _ = tx.send(ControllerEvent::UtteranceStarted(id));
            tokio::time::sleep(duration).await;
            let _ = tx.send(ControllerEvent::UtteranceEnded(id));
        });
        Ok(())
    }

    fn pause(&mut self) {
        debug!("console synthesizer keep-alive pause");
    }

    fn resume(&mut self) {}

    fn cancel(&mut self) {
        debug!("console synthesizer cancelled");
    }
}
