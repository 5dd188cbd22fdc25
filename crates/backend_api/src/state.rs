use std::path::Path;
use std::sync::Arc;

use ai_client::HttpAssistantClient;
use models::Settings;
use session::{ChatSession, DoubtStore, ResultContext};
use storage::FileStore;

/// Shared handler state: one results session per server process.
#[derive(Clone)]
pub struct AppState {
    pub context: Arc<ResultContext>,
    pub doubts: Arc<DoubtStore>,
    pub chat: Arc<ChatSession>,
}

impl AppState {
    pub fn new(context: ResultContext, doubts: DoubtStore, chat: ChatSession) -> Self {
        Self {
            context: Arc::new(context),
            doubts: Arc::new(doubts),
            chat: Arc::new(chat),
        }
    }

    /// The loaded result lives for the life of the process; doubts are kept
    /// under `data_dir` so they survive restarts.
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let assistant = HttpAssistantClient::new(&settings.assistant_endpoint)?;
        let doubts = DoubtStore::new(Arc::new(FileStore::new(Path::new(&settings.data_dir))));

        Ok(Self::new(
            ResultContext::in_memory(),
            doubts,
            ChatSession::new(Arc::new(assistant)),
        ))
    }
}
