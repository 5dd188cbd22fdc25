use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ai_client::{AnalysisService, AssistantClient, HttpAnalysisClient, HttpAssistantClient, Upload};
use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use dashboard_engine::{AggregationView, AlertTriage, ChartsView, DashboardPage, Surface};
use models::{AnalysisResult, Settings};
use serde::Serialize;
use session::{
    AnalysisSubmission, AskOutcome, ChatSession, DoubtStore, Rejection, ResultContext, SessionError,
};
use storage::FileStore;
use uuid::Uuid;

use crate::render;

/// Transient per-session state lives here, under the data directory.
pub const SESSION_DIR: &str = "session";

pub const NOT_LOADED_HINT: &str =
    "No analysis loaded. Run `leakscope analyze <statement.pdf>` or `leakscope load <result.json>` first.";

#[derive(Parser, Debug)]
#[command(
    name = "leakscope",
    about = "Review a bank-statement waste analysis: summary, alerts, charts, questions and doubts."
)]
pub struct Cli {
    /// Path to settings.json (defaults to ./settings.json, then built-in defaults)
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    /// Print view models as JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Upload a PDF statement for analysis and load the result
    Analyze { pdf: PathBuf },
    /// Load a saved analysis result (JSON)
    Load { path: PathBuf },
    /// Full results: every list, banner and charts
    Dashboard,
    /// Compact results preview
    Summary,
    /// Alerts by severity
    Alerts,
    /// Category and merchant charts
    Charts,
    /// Ask the assistant about the loaded analysis
    Ask {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Manage saved doubts
    Doubts {
        #[command(subcommand)]
        action: DoubtCommand,
    },
    /// Forget the loaded analysis (doubts are kept)
    EndSession,
}

#[derive(Subcommand, Debug)]
pub enum DoubtCommand {
    List,
    Add {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    Remove { id: Uuid },
    Toggle { id: Uuid },
}

/// Everything a command needs: the session, the doubts and both services.
pub struct Workspace {
    pub context: ResultContext,
    pub doubts: DoubtStore,
    pub submission: AnalysisSubmission,
    pub chat: ChatSession,
}

impl Workspace {
    pub fn new(
        context: ResultContext,
        doubts: DoubtStore,
        analysis: Arc<dyn AnalysisService>,
        assistant: Arc<dyn AssistantClient>,
    ) -> Self {
        Self {
            context,
            doubts,
            submission: AnalysisSubmission::new(analysis),
            chat: ChatSession::new(assistant),
        }
    }

    /// Session state under `<data_dir>/session`, doubts directly under `<data_dir>`.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let data_dir = PathBuf::from(&settings.data_dir);
        let analysis = HttpAnalysisClient::new(&settings.analysis_endpoint)
            .context("Configuring analysis endpoint")?;
        let assistant = HttpAssistantClient::new(&settings.assistant_endpoint)
            .context("Configuring assistant endpoint")?;

        Ok(Self::new(
            ResultContext::new(Arc::new(FileStore::new(data_dir.join(SESSION_DIR)))),
            DoubtStore::new(Arc::new(FileStore::new(&data_dir))),
            Arc::new(analysis),
            Arc::new(assistant),
        ))
    }

    /// Runs one command and returns what should be printed.
    pub async fn execute(&self, command: &Command, json: bool) -> Result<String> {
        match command {
            Command::Analyze { pdf } => {
                let upload = read_upload(pdf)?;
                let result = self.submission.submit(Some(upload), &self.context).await?;
                self.chat.reset();
                output(&AggregationView::summary(&result), json, render::render_view)
            }
            Command::Load { path } => {
                let raw = fs::read_to_string(path)
                    .with_context(|| format!("Reading {}", path.display()))?;
                let result: AnalysisResult = serde_json::from_str(&raw)
                    .with_context(|| format!("Parsing analysis result in {}", path.display()))?;
                let result = self.context.load(result);
                self.chat.reset();
                output(&AggregationView::summary(&result), json, render::render_view)
            }
            Command::Dashboard => {
                let result = self.current()?;
                let page = DashboardPage::build(&result, Surface::Full);
                output(&page, json, |p| {
                    [
                        render::render_alerts(&p.alerts),
                        render::render_view(&p.view),
                        render::render_charts(&p.charts),
                    ]
                    .join("\n\n")
                })
            }
            Command::Summary => {
                let result = self.current()?;
                output(&AggregationView::summary(&result), json, render::render_view)
            }
            Command::Alerts => {
                let result = self.current()?;
                output(&AlertTriage::new(&result.alerts).panel(), json, render::render_alerts)
            }
            Command::Charts => {
                let result = self.current()?;
                let view = AggregationView::dashboard(&result);
                output(&ChartsView::from_view(&view), json, render::render_charts)
            }
            Command::Ask { query } => self.ask(&query.join(" "), json).await,
            Command::Doubts { action } => self.doubts(action, json),
            Command::EndSession => {
                self.context.clear()?;
                self.chat.reset();
                Ok("Session ended.".to_string())
            }
        }
    }

    async fn ask(&self, query: &str, json: bool) -> Result<String> {
        let outcome = self.chat.ask(query, &self.context).await;
        match outcome {
            AskOutcome::Rejected(Rejection::NotLoaded) => bail!(NOT_LOADED_HINT),
            AskOutcome::Rejected(Rejection::EmptyQuery) => bail!("Please enter a question"),
            AskOutcome::Rejected(Rejection::InFlight) => bail!(SessionError::Busy),
            AskOutcome::Answered | AskOutcome::Failed => {}
        }

        if json {
            return Ok(serde_json::to_string_pretty(&self.chat.rendered_transcript())?);
        }
        let text = self
            .chat
            .transcript()
            .iter()
            .map(render::render_message)
            .collect::<Vec<_>>()
            .join("\n");
        Ok(text)
    }

    fn doubts(&self, action: &DoubtCommand, json: bool) -> Result<String> {
        match action {
            DoubtCommand::List => {}
            DoubtCommand::Add { text } => {
                let doubt = self.doubts.add(&text.join(" "))?;
                tracing::info!(id = %doubt.id, "doubt saved");
            }
            DoubtCommand::Remove { id } => self.doubts.remove(*id)?,
            DoubtCommand::Toggle { id } => self.doubts.toggle_resolved(*id)?,
        }

        if json {
            return Ok(serde_json::to_string_pretty(&self.doubts.view()?)?);
        }
        Ok(render::render_doubts(&self.doubts.list()?))
    }

    fn current(&self) -> Result<Arc<AnalysisResult>> {
        self.context.current().map_err(|e| match e {
            SessionError::NotLoaded => anyhow!(NOT_LOADED_HINT),
            other => other.into(),
        })
    }
}

fn read_upload(path: &Path) -> Result<Upload> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| anyhow!("Not a file: {}", path.display()))?;
    // extension check first, the file is only read once it passes
    let file_name = session::submission::validate_upload(Some(Upload {
        file_name,
        bytes: Vec::new(),
    }))?
    .file_name;

    let bytes = fs::read(path).with_context(|| format!("Reading {}", path.display()))?;
    Ok(Upload { file_name, bytes })
}

fn output<T: Serialize>(value: &T, json: bool, text: impl Fn(&T) -> String) -> Result<String> {
    if json {
        Ok(serde_json::to_string_pretty(value)?)
    } else {
        Ok(text(value))
    }
}
