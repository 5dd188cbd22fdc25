use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use ai_client::AssistantClient;
use dashboard_engine::format::escape_markup;
use models::{AnalysisResult, ChatMessage, Sender};
use serde::Serialize;

use crate::context::ResultContext;
use crate::{lock, InFlight};

/// Shown in place of any assistant failure; the cause only goes to the logs.
pub const APOLOGY: &str = "Sorry, I couldn't answer that right now. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    EmptyQuery,
    NotLoaded,
    InFlight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum AskOutcome {
    Answered,
    /// The exchange happened but ended in the apology message.
    Failed,
    /// Nothing was appended and nothing was sent.
    Rejected(Rejection),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedMessage {
    pub sender: Sender,
    /// Markup-escaped.
    pub text: String,
    pub is_error: bool,
}

/// Question/answer transcript over the current analysis, one request at a time.
pub struct ChatSession {
    client: Arc<dyn AssistantClient>,
    transcript: Arc<Mutex<Vec<ChatMessage>>>,
    in_flight: Arc<AtomicBool>,
}

impl ChatSession {
    pub fn new(client: Arc<dyn AssistantClient>) -> Self {
        Self {
            client,
            transcript: Arc::new(Mutex::new(Vec::new())),
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Sends `query` with the current analysis as context.
    ///
    /// Blank queries, a missing analysis, or a request already in flight are
    /// rejected outright. Otherwise the user message is appended before the
    /// request goes out and exactly one assistant message follows it. Never
    /// returns an error: failures become the apology message.
    ///
    /// The exchange runs on its own task, so dropping the returned future
    /// does not cancel it: the reply is still appended and the session stays
    /// in flight until then. Must be called within a tokio runtime.
    pub async fn ask(&self, query: &str, context: &ResultContext) -> AskOutcome {
        let query = query.trim();
        if query.is_empty() {
            return AskOutcome::Rejected(Rejection::EmptyQuery);
        }
        let Ok(results) = context.current() else {
            return AskOutcome::Rejected(Rejection::NotLoaded);
        };
        let Some(in_flight) = InFlight::acquire(Arc::clone(&self.in_flight)) else {
            tracing::debug!("ask ignored, previous question still pending");
            return AskOutcome::Rejected(Rejection::InFlight);
        };

        push(&self.transcript, ChatMessage::user(query));

        let task = tokio::spawn(exchange(
            Arc::clone(&self.client),
            Arc::clone(&self.transcript),
            query.to_string(),
            results,
            in_flight,
        ));

        match task.await {
            Ok(outcome) => outcome,
            Err(e) => {
                // the task died before appending anything
                tracing::error!(error = %e, "assistant exchange aborted");
                push(&self.transcript, ChatMessage::ai_error(APOLOGY));
                AskOutcome::Failed
            }
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn transcript(&self) -> Vec<ChatMessage> {
        lock(&self.transcript).clone()
    }

    /// Transcript with every message escaped for a markup layer.
    pub fn rendered_transcript(&self) -> Vec<RenderedMessage> {
        lock(&self.transcript)
            .iter()
            .map(|m| RenderedMessage {
                sender: m.sender,
                text: escape_markup(&m.text),
                is_error: m.is_error,
            })
            .collect()
    }

    /// Forgets the conversation, e.g. when a different analysis is loaded.
    pub fn reset(&self) {
        lock(&self.transcript).clear();
    }
}

/// Dispatch plus the reply. Holds the in-flight token until the reply is in
/// the transcript.
async fn exchange(
    client: Arc<dyn AssistantClient>,
    transcript: Arc<Mutex<Vec<ChatMessage>>>,
    query: String,
    results: Arc<AnalysisResult>,
    _in_flight: InFlight,
) -> AskOutcome {
    match client.ask(&query, &results).await {
        Ok(answer) => {
            push(&transcript, ChatMessage::ai(answer));
            AskOutcome::Answered
        }
        Err(e) => {
            tracing::warn!(error = %e, "assistant request failed");
            push(&transcript, ChatMessage::ai_error(APOLOGY));
            AskOutcome::Failed
        }
    }
}

fn push(transcript: &Mutex<Vec<ChatMessage>>, message: ChatMessage) {
    lock(transcript).push(message);
}
