//! View models for the waste-analysis results pages.
//!
//! Everything here is a pure function of an [`AnalysisResult`]: no storage, no
//! network. Rendering layers (the JSON API, the terminal renderer) consume the
//! structs below as-is.

pub mod aggregation;
pub mod alerts;
pub mod charts;
pub mod format;

pub use aggregation::{AggregationView, Surface, COMPACT_LIST_LIMIT};
pub use alerts::{AlertPanel, AlertTriage, BannerTier, SeverityCounts};
pub use charts::{ChartData, ChartPoint, ChartsView};

use models::AnalysisResult;
use serde::Serialize;

/// A list section that is never silently blank: either rows, or the text to
/// show instead.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Listing<T> {
    Empty { placeholder: String },
    Items { items: Vec<T> },
}

impl<T> Listing<T> {
    pub fn empty(placeholder: &str) -> Self {
        Listing::Empty {
            placeholder: placeholder.to_string(),
        }
    }

    pub fn from_items(items: Vec<T>, placeholder: &str) -> Self {
        if items.is_empty() {
            Self::empty(placeholder)
        } else {
            Listing::Items { items }
        }
    }

    pub fn items(&self) -> &[T] {
        match self {
            Listing::Items { items } => items,
            Listing::Empty { .. } => &[],
        }
    }

    pub fn placeholder(&self) -> Option<&str> {
        match self {
            Listing::Empty { placeholder } => Some(placeholder),
            Listing::Items { .. } => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Listing::Empty { .. })
    }
}

/// Full results page: aggregates, alert banner and both chart series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardPage {
    pub view: AggregationView,
    pub alerts: AlertPanel,
    pub charts: ChartsView,
}

impl DashboardPage {
    pub fn build(result: &AnalysisResult, surface: Surface) -> Self {
        let view = AggregationView::build(result, surface);
        let charts = ChartsView::from_view(&view);
        Self {
            alerts: AlertTriage::new(&result.alerts).panel(),
            charts,
            view,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::{Alert, Severity};

    #[test]
    fn test_listing_serializes_state() {
        let empty: Listing<u32> = Listing::from_items(vec![], "nothing");
        let json = serde_json::to_value(&empty).unwrap();
        assert_eq!(json["state"], "empty");
        assert_eq!(json["placeholder"], "nothing");

        let full = Listing::from_items(vec![1, 2], "nothing");
        let json = serde_json::to_value(&full).unwrap();
        assert_eq!(json["state"], "items");
        assert_eq!(json["items"], serde_json::json!([1, 2]));
        assert_eq!(full.placeholder(), None);
    }

    #[test]
    fn test_dashboard_page_composes_parts() {
        let result = AnalysisResult {
            alerts: vec![Alert {
                title: "Late fee".into(),
                description: "Card paid after due date".into(),
                severity: Severity::High,
                impact: "₹750".into(),
                action: "Enable autopay".into(),
            }],
            ..AnalysisResult::default()
        };
        let page = DashboardPage::build(&result, Surface::Full);
        assert_eq!(page.alerts.tier, BannerTier::High);
        assert!(page.charts.categories.is_no_data());
        assert!(page.charts.merchants.is_no_data());
        assert_eq!(page.view.category_summary.len(), 4);
    }
}
