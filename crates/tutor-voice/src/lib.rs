//! # Tutor Voice - Spoken Turn-Taking for a Tutoring Chat
//!
//! This crate decides when a spoken question is captured, confirmed and sent,
//! and when the answer is read aloud. Speech recognition and synthesis are
//! host capabilities injected through [`Recognizer`] and [`Synthesizer`].
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                        Voice Orchestrator                        │
//! │  ┌──────────────┐   ┌─────────────────┐   ┌──────────────────┐  │
//! │  │   Capture    │ → │ Turn Controller │ → │ Completion Client│  │
//! │  │ (Recognizer) │   │  (6s countdown) │   │    (reqwest)     │  │
//! │  └──────────────┘   └─────────────────┘   └──────────────────┘  │
//! │         ↑ mic preempts speech  ↓ spoken answers only             │
//! │  ┌──────────────┐   ┌─────────────────┐                          │
//! │  │   Playback   │ ← │ Normalize/Chunk │                          │
//! │  │ (Synthesizer)│   │   (180 chars)   │                          │
//! │  └──────────────┘   └─────────────────┘                          │
//! └──────────────────────────────────────────────────────────────────┘
//! ```

pub mod capture;
pub mod completion;
pub mod config;
pub mod conversation;
pub mod error;
pub mod language;
pub mod normalize;
pub mod orchestrator;
pub mod playback;
pub mod segment;
pub mod transcript;
pub mod turn;
pub mod voices;

pub use capture::{CaptureSession, Recognizer, SessionId};
pub use completion::{
    create_best_completion, tutor_system_prompt, ChatCompletionsClient, CompletionClient,
    CompletionRequest, PlaceholderCompletion,
};
pub use config::TutorConfig;
pub use conversation::{ConversationLog, ConversationTurn, Origin, Role};
pub use error::{
    CaptureError, CompletionError, ControllerError, PlaybackError, VoiceError, VoiceResult,
};
pub use language::{Language, LanguageSet, VoiceGender};
pub use normalize::normalize_for_speech;
pub use orchestrator::{HostInput, UserCommand, VoiceHandle, VoiceOrchestrator};
pub use playback::{
    content_fingerprint, ChunkProgress, PlayOutcome, PlaybackJob, PlaybackSession,
    PlaybackSettings, Synthesizer, Utterance, UtteranceId,
};
pub use segment::{segment_for_speech, split_sentences};
pub use transcript::{assemble_transcript, Transcript};
pub use turn::{ControllerEvent, ControllerOutput, Phase, RequestId, TimerId, TurnController};
pub use voices::{select_voice, VoiceInfo, VoiceRank};
