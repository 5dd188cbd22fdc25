use models::{Alert, Severity};
use serde::Serialize;

use crate::Listing;

pub const ALL_CLEAR_PLACEHOLDER: &str = "No alerts for this statement";

/// Severity-driven view over the alerts of one analysis.
#[derive(Debug, Clone, Copy)]
pub struct AlertTriage<'a> {
    alerts: &'a [Alert],
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeverityCounts {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl SeverityCounts {
    pub fn get(&self, severity: Severity) -> usize {
        match severity {
            Severity::Critical => self.critical,
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
        }
    }

    pub fn total(&self) -> usize {
        self.critical + self.high + self.medium + self.low
    }
}

/// Top-level urgency shown in the banner. Low alerts alone still read as clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BannerTier {
    Critical,
    High,
    Medium,
    Clear,
}

impl BannerTier {
    pub fn as_str(self) -> &'static str {
        match self {
            BannerTier::Critical => "critical",
            BannerTier::High => "high",
            BannerTier::Medium => "medium",
            BannerTier::Clear => "clear",
        }
    }

    pub fn headline(self) -> &'static str {
        match self {
            BannerTier::Critical => "Critical issues need your attention",
            BannerTier::High => "High-priority issues found",
            BannerTier::Medium => "A few things worth reviewing",
            BannerTier::Clear => "All clear: no urgent issues found",
        }
    }
}

impl<'a> AlertTriage<'a> {
    pub fn new(alerts: &'a [Alert]) -> Self {
        Self { alerts }
    }

    pub fn severity_counts(&self) -> SeverityCounts {
        let mut counts = SeverityCounts::default();
        for alert in self.alerts {
            match alert.severity {
                Severity::Critical => counts.critical += 1,
                Severity::High => counts.high += 1,
                Severity::Medium => counts.medium += 1,
                Severity::Low => counts.low += 1,
            }
        }
        counts
    }

    /// The most severe level present wins, however many lower alerts there are.
    pub fn banner_tier(&self) -> BannerTier {
        match self.alerts.iter().map(|a| a.severity).min() {
            Some(Severity::Critical) => BannerTier::Critical,
            Some(Severity::High) => BannerTier::High,
            Some(Severity::Medium) => BannerTier::Medium,
            Some(Severity::Low) | None => BannerTier::Clear,
        }
    }

    /// Most severe first. `sort_by_key` is stable, so equal severities keep input order.
    pub fn ordered(&self) -> Vec<&'a Alert> {
        let mut ordered: Vec<&'a Alert> = self.alerts.iter().collect();
        ordered.sort_by_key(|a| a.severity.rank());
        ordered
    }

    pub fn panel(&self) -> AlertPanel {
        let tier = self.banner_tier();
        let rows: Vec<AlertRow> = self.ordered().into_iter().map(AlertRow::from).collect();
        AlertPanel {
            tier,
            headline: tier.headline().to_string(),
            counts: self.severity_counts(),
            alerts: Listing::from_items(rows, ALL_CLEAR_PLACEHOLDER),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertRow {
    pub severity: Severity,
    pub title: String,
    pub description: String,
    pub impact: String,
    pub action: String,
}

impl From<&Alert> for AlertRow {
    fn from(alert: &Alert) -> Self {
        Self {
            severity: alert.severity,
            title: alert.title.clone(),
            description: alert.description.clone(),
            impact: alert.impact.clone(),
            action: alert.action.clone(),
        }
    }
}

/// Banner plus the ordered alert list; an empty list is an explicit all-clear state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertPanel {
    pub tier: BannerTier,
    pub headline: String,
    pub counts: SeverityCounts,
    pub alerts: Listing<AlertRow>,
}
