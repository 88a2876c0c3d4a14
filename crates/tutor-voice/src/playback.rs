//! **Playback Session**: speaks one answer as a sequence of short utterances.
//!
//! Only one job is active at a time and only one utterance is ever in flight.
//! Chunk *n+1* is spoken only after chunk *n* reports completion (and the
//! inter-chunk pause the controller schedules). Each answer is fingerprinted so
//! the same text is never voiced twice by one session.

use crate::error::PlaybackError;
use crate::language::{Language, VoiceGender};
use crate::normalize::normalize_for_speech;
use crate::segment::segment_for_speech;
use crate::voices::{select_voice, VoiceInfo};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use tracing::{debug, info};

/// Identifies one utterance handed to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct UtteranceId(u64);

/// One synthesis request handed to the host.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Utterance {
    pub id: UtteranceId,
    pub text: String,
    /// Host voice handle; `None` lets the host pick its default.
    pub voice_id: Option<String>,
    pub locale: String,
    pub rate: f32,
    pub pitch: f32,
}

/// Host-provided speech synthesis capability.
///
/// `speak` only queues the utterance; start/end/error are reported back as
/// controller events tagged with [`Utterance::id`]. Events for a cancelled
/// utterance may still arrive and are ignored.
pub trait Synthesizer: Send {
    fn is_available(&self) -> bool;
    fn voices(&self) -> Vec<VoiceInfo>;
    fn speak(&mut self, utterance: &Utterance) -> Result<(), PlaybackError>;
    fn pause(&mut self);
    fn resume(&mut self);
    /// Drop the current and all queued utterances.
    fn cancel(&mut self);
}

impl<T: Synthesizer + ?Sized> Synthesizer for Box<T> {
    fn is_available(&self) -> bool {
        (**self).is_available()
    }

    fn voices(&self) -> Vec<VoiceInfo> {
        (**self).voices()
    }

    fn speak(&mut self, utterance: &Utterance) -> Result<(), PlaybackError> {
        (**self).speak(utterance)
    }

    fn pause(&mut self) {
        (**self).pause()
    }

    fn resume(&mut self) {
        (**self).resume()
    }

    fn cancel(&mut self) {
        (**self).cancel()
    }
}

/// Short stable hash of speakable text.
pub fn content_fingerprint(source_text: &str) -> String {
    let digest = Sha256::digest(source_text.as_bytes());
    let hex = format!("{:x}", digest);
    hex[..16].to_string()
}

/// One text-to-speech run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackJob {
    id: u64,
    source_text: String,
    chunks: Vec<String>,
    cursor: usize,
    fingerprint: String,
    language: Language,
    gender: VoiceGender,
}

impl PlaybackJob {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    pub fn chunks(&self) -> &[String] {
        &self.chunks
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn current_chunk(&self) -> Option<&str> {
        self.chunks.get(self.cursor).map(String::as_str)
    }

    /// Move past the current chunk. Returns `true` while chunks remain.
    pub fn advance(&mut self) -> bool {
        if self.cursor < self.chunks.len() {
            self.cursor += 1;
        }
        !self.is_finished()
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.chunks.len()
    }
}

/// Result of asking the session to start a job.
#[derive(Debug)]
pub enum PlayOutcome {
    /// First chunk handed to the host.
    Speaking,
    /// Another job is active; the caller keeps this one queued.
    Busy(PlaybackJob),
    /// The host refused; the job is returned for a manual retry.
    Failed(PlaybackError, PlaybackJob),
}

/// What a finished utterance leads to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkProgress {
    /// More chunks remain; speak the next one after the inter-chunk pause.
    More { next: usize, total: usize },
    /// The job is complete and no longer active.
    Finished,
    /// The utterance is not current: no job is active, or the event is a
    /// late report for a chunk that was cancelled or already ended.
    Idle,
}

/// Speech settings the session applies to every utterance.
#[derive(Debug, Clone, Copy)]
pub struct PlaybackSettings {
    pub max_chunk_length: usize,
    pub speech_rate: f32,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            max_chunk_length: 180,
            speech_rate: 0.9,
        }
    }
}

pub struct PlaybackSession<S> {
    synth: S,
    available: bool,
    settings: PlaybackSettings,
    seen: HashSet<String>,
    active: Option<PlaybackJob>,
    voice: Option<VoiceInfo>,
    in_flight: bool,
    current: Option<UtteranceId>,
    next_job_id: u64,
    next_utterance: u64,
}

impl<S: Synthesizer> PlaybackSession<S> {
    pub fn new(synth: S, settings: PlaybackSettings) -> Self {
        let available = synth.is_available();
        if !available {
            info!("Playback: host has no speech synthesis, answers stay text-only");
        }
        Self {
            synth,
            available,
            settings,
            seen: HashSet::new(),
            active: None,
            voice: None,
            in_flight: false,
            current: None,
            next_job_id: 1,
            next_utterance: 1,
        }
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    /// Normalize and chunk `text` into a job, unless this text was already
    /// voiced by this session or there is nothing to say.
    pub fn prepare(&mut self, text: &str, language: Language, gender: VoiceGender) -> Option<PlaybackJob> {
        if !self.available {
            return None;
        }
        let source_text = normalize_for_speech(text, language);
        if source_text.is_empty() {
            return None;
        }
        let fingerprint = content_fingerprint(&source_text);
        if !self.seen.insert(fingerprint.clone()) {
            debug!(%fingerprint, "Playback: answer already voiced, skipping");
            return None;
        }
        let chunks = segment_for_speech(&source_text, self.settings.max_chunk_length);
        let id = self.next_job_id;
        self.next_job_id += 1;
        debug!(job = id, chunks = chunks.len(), %fingerprint, "Playback: job prepared");
        Some(PlaybackJob {
            id,
            source_text,
            chunks,
            cursor: 0,
            fingerprint,
            language,
            gender,
        })
    }

    pub fn has_seen(&self, fingerprint: &str) -> bool {
        self.seen.contains(fingerprint)
    }

    /// Forget every voiced fingerprint (used when the chat is reset).
    pub fn forget_seen(&mut self) {
        self.seen.clear();
    }

    /// Start speaking `job` from its cursor.
    pub fn play(&mut self, job: PlaybackJob) -> PlayOutcome {
        if self.active.is_some() {
            return PlayOutcome::Busy(job);
        }
        if !self.available {
            return PlayOutcome::Failed(PlaybackError::SynthesisUnavailable, job);
        }
        let voices = self.synth.voices();
        self.voice = select_voice(&voices, job.language, job.gender).cloned();
        let id = self.next_utterance_id();
        if let Some(utterance) = self.utterance_for(&job, id) {
            if let Err(e) = self.synth.speak(&utterance) {
                self.synth.cancel();
                self.voice = None;
                return PlayOutcome::Failed(e, job);
            }
            self.current = Some(id);
        }
        info!(
            job = job.id,
            chunks = job.chunks.len(),
            voice = self.voice.as_ref().map(|v| v.name.as_str()).unwrap_or("host default"),
            "Playback: speaking answer"
        );
        self.active = Some(job);
        PlayOutcome::Speaking
    }

    fn next_utterance_id(&mut self) -> UtteranceId {
        let id = UtteranceId(self.next_utterance);
        self.next_utterance += 1;
        id
    }

    fn utterance_for(&self, job: &PlaybackJob, id: UtteranceId) -> Option<Utterance> {
        let text = job.current_chunk()?;
        Some(Utterance {
            id,
            text: text.to_string(),
            voice_id: self.voice.as_ref().map(|v| v.id.clone()),
            locale: job.language.locale().to_string(),
            rate: self.settings.speech_rate,
            pitch: job.gender.pitch(),
        })
    }

    /// Hand the chunk under the cursor to the host.
    pub fn speak_current(&mut self) -> Result<(), PlaybackError> {
        let id = self.next_utterance_id();
        let Some(job) = self.active.as_ref() else {
            return Ok(());
        };
        let Some(utterance) = self.utterance_for(job, id) else {
            return Ok(());
        };
        debug!(job = job.id, chunk = job.cursor, ?id, "Playback: speak chunk");
        self.synth.speak(&utterance)?;
        self.current = Some(id);
        Ok(())
    }

    /// Whether `id` is the utterance the host is speaking for the active job.
    pub fn is_current(&self, id: UtteranceId) -> bool {
        self.active.is_some() && self.current == Some(id)
    }

    pub fn current_utterance(&self) -> Option<UtteranceId> {
        self.current
    }

    /// Returns `false` for an utterance that is not current.
    pub fn on_utterance_started(&mut self, id: UtteranceId) -> bool {
        if !self.is_current(id) {
            return false;
        }
        self.in_flight = true;
        true
    }

    /// Advance past the finished chunk, if `id` is the current utterance.
    pub fn on_utterance_ended(&mut self, id: UtteranceId) -> ChunkProgress {
        if !self.is_current(id) {
            debug!(?id, "Playback: end of a stale utterance ignored");
            return ChunkProgress::Idle;
        }
        self.in_flight = false;
        self.current = None;
        let Some(job) = self.active.as_mut() else {
            return ChunkProgress::Idle;
        };
        if job.advance() {
            ChunkProgress::More {
                next: job.cursor,
                total: job.chunks.len(),
            }
        } else {
            info!(job = job.id, "Playback: answer finished");
            self.active = None;
            self.voice = None;
            ChunkProgress::Finished
        }
    }

    /// Pause+resume the host engine while an utterance is in flight, which
    /// keeps engines with a wall-clock cutoff speaking. Returns whether it ran.
    pub fn keep_alive(&mut self) -> bool {
        if self.in_flight {
            self.synth.pause();
            self.synth.resume();
            true
        } else {
            false
        }
    }

    /// Cancel the current and all remaining chunks. No further audio follows.
    pub fn stop(&mut self) -> Option<PlaybackJob> {
        let job = self.abort();
        if let Some(job) = &job {
            info!(job = job.id, cursor = job.cursor, "Playback: stopped");
        }
        job
    }

    fn abort(&mut self) -> Option<PlaybackJob> {
        self.synth.cancel();
        self.in_flight = false;
        self.current = None;
        self.voice = None;
        self.active.take()
    }

    pub fn active(&self) -> Option<&PlaybackJob> {
        self.active.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn synthesizer(&self) -> &S {
        &self.synth
    }
}
