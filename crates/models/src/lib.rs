use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Analysis result, as produced by the external analysis service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
	#[serde(default)]
	pub total_waste: f64,
	#[serde(default)]
	pub transaction_count: u64,
	#[serde(default)]
	pub category_summary: CategorySummary,
	#[serde(default)]
	pub category_spending: Vec<CategorySpend>,
	#[serde(default)]
	pub top_merchants: Vec<Merchant>,
	#[serde(default)]
	pub repeating_charges: Vec<RepeatingCharge>,
	#[serde(default)]
	pub micro_transactions: Vec<FlaggedLine>,
	#[serde(default)]
	pub fees: Vec<FlaggedLine>,
	#[serde(default)]
	pub penalties: Vec<FlaggedLine>,
	#[serde(default)]
	pub suggestions: Vec<String>,
	#[serde(default)]
	pub alerts: Vec<Alert>,
}

/// The four waste categories every analysis reports on, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WasteCategory {
	RepeatingCharges,
	MicroTransactions,
	Fees,
	Penalties,
}

impl WasteCategory {
	pub const ALL: [WasteCategory; 4] = [
		WasteCategory::RepeatingCharges,
		WasteCategory::MicroTransactions,
		WasteCategory::Fees,
		WasteCategory::Penalties,
	];

	pub fn key(self) -> &'static str {
		match self {
			WasteCategory::RepeatingCharges => "repeating_charges",
			WasteCategory::MicroTransactions => "micro_transactions",
			WasteCategory::Fees => "fees",
			WasteCategory::Penalties => "penalties",
		}
	}

	pub fn label(self) -> &'static str {
		match self {
			WasteCategory::RepeatingCharges => "Repeating Charges",
			WasteCategory::MicroTransactions => "Micro Transactions",
			WasteCategory::Fees => "Fees & Charges",
			WasteCategory::Penalties => "Penalties",
		}
	}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryTally {
	#[serde(default)]
	pub count: u32,
	// older producers named this field `amount`
	#[serde(default, alias = "amount")]
	pub total: f64,
}

/// Fixed-shape summary: a missing key deserializes as an empty tally.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
	#[serde(default)]
	pub repeating_charges: CategoryTally,
	#[serde(default)]
	pub micro_transactions: CategoryTally,
	#[serde(default)]
	pub fees: CategoryTally,
	#[serde(default)]
	pub penalties: CategoryTally,
}

impl CategorySummary {
	pub fn get(&self, category: WasteCategory) -> &CategoryTally {
		match category {
			WasteCategory::RepeatingCharges => &self.repeating_charges,
			WasteCategory::MicroTransactions => &self.micro_transactions,
			WasteCategory::Fees => &self.fees,
			WasteCategory::Penalties => &self.penalties,
		}
	}

	/// Tallies in the fixed display order.
	pub fn entries(&self) -> [(WasteCategory, CategoryTally); 4] {
		WasteCategory::ALL.map(|c| (c, *self.get(c)))
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySpend {
	pub category: String,
	pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Merchant {
	pub name: String,
	#[serde(default)]
	pub count: u32,
	pub amount: f64,
}

/// A merchant charged repeatedly; `count` is at least 1 by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepeatingCharge {
	pub merchant: String,
	pub count: u32,
	pub total: f64,
}

/// A single statement line flagged as a micro transaction, fee or penalty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlaggedLine {
	pub line: String,
	pub amount: f64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub category: Option<String>,
}

// Alerts
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
	Critical,
	High,
	Medium,
	Low,
}

impl Severity {
	pub const ALL: [Severity; 4] = [Severity::Critical, Severity::High, Severity::Medium, Severity::Low];

	/// 0 for critical through 3 for low.
	pub fn rank(self) -> u8 {
		self as u8
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Severity::Critical => "critical",
			Severity::High => "high",
			Severity::Medium => "medium",
			Severity::Low => "low",
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
	pub title: String,
	#[serde(default)]
	pub description: String,
	pub severity: Severity,
	#[serde(default)]
	pub impact: String,
	#[serde(default)]
	pub action: String,
}

// Doubts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doubt {
	pub id: Uuid,
	pub text: String,
	pub created_at: DateTime<Utc>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub resolved: Option<bool>,
}

impl Doubt {
	pub fn new(text: impl Into<String>) -> Self {
		Self {
			id: Uuid::new_v4(),
			text: text.into(),
			created_at: Utc::now(),
			resolved: None,
		}
	}

	pub fn is_resolved(&self) -> bool {
		self.resolved.unwrap_or(false)
	}
}

// Chat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
	User,
	Ai,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
	pub sender: Sender,
	pub text: String,
	#[serde(default)]
	pub is_error: bool,
}

impl ChatMessage {
	pub fn user(text: impl Into<String>) -> Self {
		Self { sender: Sender::User, text: text.into(), is_error: false }
	}

	pub fn ai(text: impl Into<String>) -> Self {
		Self { sender: Sender::Ai, text: text.into(), is_error: false }
	}

	pub fn ai_error(text: impl Into<String>) -> Self {
		Self { sender: Sender::Ai, text: text.into(), is_error: true }
	}
}

// Settings models
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
	pub analysis_endpoint: String,
	pub assistant_endpoint: String,
	pub data_dir: String,
	pub host: String,
	pub port: u16,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			analysis_endpoint: "http://127.0.0.1:5000/analyze".to_string(),
			assistant_endpoint: "http://127.0.0.1:5000/ask".to_string(),
			data_dir: ".leakscope".to_string(),
			host: "127.0.0.1".to_string(),
			port: 3000,
		}
	}
}
