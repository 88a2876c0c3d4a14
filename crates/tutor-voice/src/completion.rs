//! **Completion Client**: the external language-model boundary.
//!
//! The turn controller hands over the system instructions plus the ordered
//! conversation and gets back answer text or an error. Timeouts and retries
//! belong to the client, not the controller.

use crate::conversation::{ConversationTurn, Role};
use crate::error::CompletionError;
use crate::language::Language;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

/// System instructions for a school-syllabus tutor.
pub fn tutor_system_prompt(student_class: &str, curriculum: &str, language: Language) -> String {
    format!(
        "You are an expert AI tutor for Class {class} students following the {curriculum} curriculum.\n\
         \n\
         Guidelines:\n\
         - Answer only academic syllabus questions and politely decline anything else\n\
         - Explain concepts in simple, easy-to-understand language\n\
         - Use examples relevant to the Indian context when possible\n\
         - Keep responses concise but comprehensive (2-4 paragraphs)\n\
         - Use analogies to explain complex concepts\n\
         - Reply in {language} when possible",
        class = student_class,
        curriculum = curriculum,
        language = language.display_name(),
    )
}

/// One request: system instructions followed by the conversation so far.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    pub system: String,
    pub turns: Vec<ConversationTurn>,
}

impl CompletionRequest {
    /// Error placeholders shown to the student are not sent to the model.
    pub fn new(system: impl Into<String>, turns: &[ConversationTurn]) -> Self {
        Self {
            system: system.into(),
            turns: turns.iter().filter(|t| !t.is_error).cloned().collect(),
        }
    }
}

#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError>;
}

// OpenAI-compatible request/response
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Deserialize)]
struct ChatMessageResponse {
    #[serde(default)]
    content: Option<String>,
}

/// Chat-completions client for any OpenAI-compatible endpoint (Groq by default).
#[derive(Debug, Clone)]
pub struct ChatCompletionsClient {
    pub base_url: String,
    api_key: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    client: reqwest::Client,
}

impl ChatCompletionsClient {
    /// Build from environment: `GROQ_API_KEY` (or `TUTOR_LLM_API_KEY`),
    /// `TUTOR_LLM_BASE_URL`, `TUTOR_LLM_MODEL`.
    pub fn from_env() -> Result<Self, CompletionError> {
        let api_key = std::env::var("GROQ_API_KEY")
            .or_else(|_| std::env::var("TUTOR_LLM_API_KEY"))
            .map_err(|_| CompletionError::MissingApiKey)?;
        let base_url =
            std::env::var("TUTOR_LLM_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let model = std::env::var("TUTOR_LLM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        Self::new(base_url, api_key, model)
    }

    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self, CompletionError> {
        let api_key = api_key.into().trim().to_string();
        if api_key.is_empty() {
            return Err(CompletionError::MissingApiKey);
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| CompletionError::Http(e.to_string()))?;
        Ok(Self {
            base_url: base_url.into(),
            api_key,
            model: model.into(),
            temperature: 0.7,
            max_tokens: 800,
            client,
        })
    }

    fn body<'a>(&'a self, request: &'a CompletionRequest) -> ChatRequest<'a> {
        let mut messages = Vec::with_capacity(request.turns.len() + 1);
        messages.push(ChatMessage {
            role: "system",
            content: &request.system,
        });
        for turn in &request.turns {
            messages.push(ChatMessage {
                role: turn.role.as_str(),
                content: &turn.content,
            });
        }
        ChatRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

#[async_trait]
impl CompletionClient for ChatCompletionsClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        debug!(model = %self.model, turns = request.turns.len(), "Completion: sending request");
        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&self.body(request))
            .send()
            .await
            .map_err(|e| CompletionError::Http(e.to_string()))?;
        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            return Err(CompletionError::Api { status, body });
        }
        let parsed: ChatResponse = res
            .json()
            .await
            .map_err(|e| CompletionError::Http(e.to_string()))?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or(CompletionError::EmptyResponse)
    }
}

/// Offline client: answers with a fixed message. Used when no API key is configured.
#[derive(Debug, Default)]
pub struct PlaceholderCompletion {
    pub response: Option<String>,
}

impl PlaceholderCompletion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(s: impl Into<String>) -> Self {
        Self {
            response: Some(s.into()),
        }
    }
}

#[async_trait]
impl CompletionClient for PlaceholderCompletion {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        if let Some(ref r) = self.response {
            return Ok(r.clone());
        }
        let question = request
            .turns
            .iter()
            .rev()
            .find(|t| t.role == Role::User)
            .map(|t| t.content.as_str())
            .unwrap_or("");
        Ok(format!(
            "AI service unavailable. Add GROQ_API_KEY to answer: \"{}\"",
            question
        ))
    }
}

/// Real client when an API key is configured, otherwise the placeholder.
pub fn create_best_completion() -> Arc<dyn CompletionClient> {
    match ChatCompletionsClient::from_env() {
        Ok(client) => Arc::new(client),
        Err(_) => Arc::new(PlaceholderCompletion::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::Origin;

    #[test]
    fn request_skips_error_turns() {
        let turns = vec![
            ConversationTurn::user("Q1", Origin::Typed),
            ConversationTurn::assistant_error("Service down"),
            ConversationTurn::user("Q2", Origin::Spoken),
        ];
        let req = CompletionRequest::new("sys", &turns);
        assert_eq!(req.turns.len(), 2);
        assert_eq!(req.turns[1].content, "Q2");
    }

    #[test]
    fn body_puts_system_first() {
        let client = ChatCompletionsClient::new("http://localhost:1", "key", "m").unwrap();
        let turns = vec![
            ConversationTurn::user("What is photosynthesis", Origin::Spoken),
            ConversationTurn::assistant("Plants make food."),
        ];
        let req = CompletionRequest::new("be a tutor", &turns);
        let json = serde_json::to_value(client.body(&req)).unwrap();
        assert_eq!(json["model"], "m");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][0]["content"], "be a tutor");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][2]["role"], "assistant");
        assert_eq!(json["max_tokens"], 800);
    }

    #[test]
    fn blank_key_is_rejected() {
        assert!(matches!(
            ChatCompletionsClient::new("http://x", "  ", "m"),
            Err(CompletionError::MissingApiKey)
        ));
    }

    #[test]
    fn system_prompt_names_class_and_language() {
        let p = tutor_system_prompt("7", "SCERT Telangana", Language::Telugu);
        assert!(p.contains("Class 7"));
        assert!(p.contains("SCERT Telangana"));
        assert!(p.contains("Reply in Telugu"));
    }

    #[tokio::test]
    async fn placeholder_echoes_last_question() {
        let turns = vec![ConversationTurn::user("Explain democracy", Origin::Typed)];
        let req = CompletionRequest::new("sys", &turns);
        let out = PlaceholderCompletion::new().complete(&req).await.unwrap();
        assert!(out.contains("Explain democracy"));

        let fixed = PlaceholderCompletion::with_response("42").complete(&req).await.unwrap();
        assert_eq!(fixed, "42");
    }
}
