use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashboard_engine::format::escape_markup;
use dashboard_engine::Listing;
use models::Doubt;
use serde::Serialize;
use storage::KeyValueStore;
use uuid::Uuid;

use crate::error::{Result, SessionError};

/// Durable storage key holding the serialized doubt list.
pub const DOUBTS_KEY: &str = "doubts";

pub const EMPTY_DOUBT: &str = "Please enter a doubt or query";
pub const NO_DOUBTS: &str = "No queries added yet";

/// Free-text notes the user keeps across analysis sessions.
///
/// Every mutation is a read-modify-write of the whole list under one key, so
/// two sessions editing at once end with whichever wrote last.
pub struct DoubtStore {
    store: Arc<dyn KeyValueStore>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DoubtRow {
    pub id: Uuid,
    /// Markup-escaped.
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub created_display: String,
    pub resolved: bool,
}

impl DoubtStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Entries in insertion order.
    pub fn list(&self) -> Result<Vec<Doubt>> {
        let Some(raw) = self.store.get(DOUBTS_KEY)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&raw) {
            Ok(doubts) => Ok(doubts),
            Err(e) => {
                // the next successful write replaces the bad value
                tracing::warn!(error = %e, "stored doubts are unreadable, starting from an empty list");
                Ok(Vec::new())
            }
        }
    }

    pub fn add(&self, text: &str) -> Result<Doubt> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SessionError::Validation(EMPTY_DOUBT.to_string()));
        }

        let mut doubts = self.list()?;
        let doubt = Doubt::new(text);
        doubts.push(doubt.clone());
        self.save(&doubts)?;

        tracing::debug!(id = %doubt.id, "doubt added");
        Ok(doubt)
    }

    /// Unknown ids are ignored.
    pub fn remove(&self, id: Uuid) -> Result<()> {
        let mut doubts = self.list()?;
        let Some(pos) = doubts.iter().position(|d| d.id == id) else {
            return Ok(());
        };
        doubts.remove(pos);
        self.save(&doubts)
    }

    /// Unknown ids are ignored.
    pub fn toggle_resolved(&self, id: Uuid) -> Result<()> {
        let mut doubts = self.list()?;
        let Some(doubt) = doubts.iter_mut().find(|d| d.id == id) else {
            return Ok(());
        };
        doubt.resolved = Some(!doubt.is_resolved());
        self.save(&doubts)
    }

    /// Rows ready for display, or the empty-state placeholder.
    pub fn view(&self) -> Result<Listing<DoubtRow>> {
        let rows = self
            .list()?
            .into_iter()
            .map(|d| DoubtRow {
                id: d.id,
                text: escape_markup(&d.text),
                created_at: d.created_at,
                created_display: d.created_at.format("%d %b %Y, %H:%M").to_string(),
                resolved: d.is_resolved(),
            })
            .collect();
        Ok(Listing::from_items(rows, NO_DOUBTS))
    }

    fn save(&self, doubts: &[Doubt]) -> Result<()> {
        let json = serde_json::to_string(doubts)?;
        self.store.set(DOUBTS_KEY, &json)?;
        Ok(())
    }
}
