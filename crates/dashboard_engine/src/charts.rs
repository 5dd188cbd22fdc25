use models::WasteCategory;
use serde::Serialize;

use crate::aggregation::{AggregationView, CategorySummaryRow, RankedMerchant};
use crate::Listing;

pub const MERCHANT_CHART_LIMIT: usize = 5;

pub const NO_CATEGORY_ACTIVITY: &str = "No waste detected in any category";
pub const NO_MERCHANT_DATA: &str = "No merchant data available";

/// One rank per step, darkest first.
pub const MERCHANT_GRADIENT: [&str; 5] = ["#1d4ed8", "#2563eb", "#3b82f6", "#60a5fa", "#93c5fd"];

pub fn category_color(category: WasteCategory) -> &'static str {
    match category {
        WasteCategory::RepeatingCharges => "#ef4444",
        WasteCategory::MicroTransactions => "#eab308",
        WasteCategory::Fees => "#f97316",
        WasteCategory::Penalties => "#a855f7",
    }
}

pub fn merchant_color(index: usize) -> &'static str {
    MERCHANT_GRADIENT[index % MERCHANT_GRADIENT.len()]
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
    pub color: String,
}

/// Either a non-empty series or an explicit signal that there is nothing to plot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ChartData {
    NoData { message: String },
    Series { points: Vec<ChartPoint> },
}

impl ChartData {
    fn from_points(points: Vec<ChartPoint>, message: &str) -> Self {
        if points.is_empty() {
            ChartData::NoData {
                message: message.to_string(),
            }
        } else {
            ChartData::Series { points }
        }
    }

    pub fn points(&self) -> &[ChartPoint] {
        match self {
            ChartData::Series { points } => points,
            ChartData::NoData { .. } => &[],
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, ChartData::NoData { .. })
    }
}

/// Active categories only, in the fixed category order.
pub fn category_series(rows: &[CategorySummaryRow]) -> ChartData {
    let points = rows
        .iter()
        .filter(|r| r.count > 0)
        .map(|r| ChartPoint {
            label: r.label.clone(),
            value: r.total,
            color: category_color(r.category).to_string(),
        })
        .collect();
    ChartData::from_points(points, NO_CATEGORY_ACTIVITY)
}

/// First five merchants as ranked upstream; no re-sorting here.
pub fn merchant_series(merchants: &Listing<RankedMerchant>) -> ChartData {
    let points = merchants
        .items()
        .iter()
        .take(MERCHANT_CHART_LIMIT)
        .enumerate()
        .map(|(i, m)| ChartPoint {
            label: m.name.clone(),
            value: m.amount,
            color: merchant_color(i).to_string(),
        })
        .collect();
    ChartData::from_points(points, NO_MERCHANT_DATA)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartsView {
    pub categories: ChartData,
    pub merchants: ChartData,
}

impl ChartsView {
    pub fn from_view(view: &AggregationView) -> Self {
        Self {
            categories: category_series(&view.category_summary),
            merchants: merchant_series(&view.merchants),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::{category_summary_rows, rank_merchants};
    use models::{AnalysisResult, CategorySummary, CategoryTally, Merchant};

    fn merchants(n: usize) -> Vec<Merchant> {
        (1..=n)
            .map(|i| Merchant {
                name: format!("M{i}"),
                count: 1,
                // deliberately ascending: the adapter must not sort
                amount: i as f64 * 10.0,
            })
            .collect()
    }

    #[test]
    fn test_category_series_skips_inactive() {
        let result = AnalysisResult {
            category_summary: CategorySummary {
                repeating_charges: CategoryTally { count: 2, total: 500.0 },
                micro_transactions: CategoryTally { count: 5, total: 250.0 },
                fees: CategoryTally { count: 0, total: 0.0 },
                penalties: CategoryTally { count: 1, total: 750.0 },
            },
            ..AnalysisResult::default()
        };
        let series = category_series(&category_summary_rows(&result));
        let labels: Vec<&str> = series.points().iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["Repeating Charges", "Micro Transactions", "Penalties"]);
        assert_eq!(series.points()[2].color, category_color(WasteCategory::Penalties));
        assert_eq!(series.points()[1].value, 250.0);
    }

    #[test]
    fn test_category_series_no_data() {
        let series = category_series(&category_summary_rows(&AnalysisResult::default()));
        assert!(series.is_no_data());
        assert!(series.points().is_empty());
    }

    #[test]
    fn test_merchant_series_truncates_to_five_in_order() {
        let series = merchant_series(&rank_merchants(&merchants(7)));
        let labels: Vec<&str> = series.points().iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["M1", "M2", "M3", "M4", "M5"]);
        assert_eq!(series.points()[0].color, MERCHANT_GRADIENT[0]);
        assert_eq!(series.points()[4].color, MERCHANT_GRADIENT[4]);
    }

    #[test]
    fn test_merchant_series_short_and_empty() {
        let series = merchant_series(&rank_merchants(&merchants(2)));
        assert_eq!(series.points().len(), 2);

        let empty = merchant_series(&rank_merchants(&[]));
        assert_eq!(
            empty,
            ChartData::NoData {
                message: NO_MERCHANT_DATA.to_string()
            }
        );
    }

    #[test]
    fn test_gradient_is_cyclic() {
        assert_eq!(merchant_color(5), MERCHANT_GRADIENT[0]);
        assert_eq!(merchant_color(7), MERCHANT_GRADIENT[2]);
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(merchant_series(&rank_merchants(&[]))).unwrap();
        assert_eq!(json["state"], "no_data");
        let json = serde_json::to_value(merchant_series(&rank_merchants(&merchants(1)))).unwrap();
        assert_eq!(json["state"], "series");
        assert_eq!(json["points"][0]["label"], "M1");
    }
}
