use models::{AnalysisResult, CategorySpend, FlaggedLine, Merchant, RepeatingCharge, WasteCategory};
use serde::Serialize;

use crate::format::{format_currency, format_fixed2};
use crate::Listing;

/// Rows shown per list on the summary surface before collapsing the rest.
pub const COMPACT_LIST_LIMIT: usize = 10;

pub const NO_MERCHANTS: &str = "No merchant data available";
pub const NO_CATEGORY_SPENDING: &str = "No category data available";
pub const NO_SUGGESTIONS: &str = "No suggestions available";
pub const NO_REPEATING_CHARGES: &str = "No repeating charges detected";

/// Which rendering surface a view is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Surface {
    /// Preview after upload: long line lists are truncated.
    Compact,
    /// Dashboard: everything is listed.
    Full,
}

impl Surface {
    fn list_limit(self) -> Option<usize> {
        match self {
            Surface::Compact => Some(COMPACT_LIST_LIMIT),
            Surface::Full => None,
        }
    }
}

/// Spending categories with dedicated iconography.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpendingCategory {
    Food,
    Travel,
    Shopping,
    Entertainment,
    Subscriptions,
    Other,
}

pub const DEFAULT_CATEGORY_ICON: &str = "📦";

impl SpendingCategory {
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        [
            SpendingCategory::Food,
            SpendingCategory::Travel,
            SpendingCategory::Shopping,
            SpendingCategory::Entertainment,
            SpendingCategory::Subscriptions,
            SpendingCategory::Other,
        ]
        .into_iter()
        .find(|c| c.name().eq_ignore_ascii_case(name))
    }

    pub fn name(self) -> &'static str {
        match self {
            SpendingCategory::Food => "Food",
            SpendingCategory::Travel => "Travel",
            SpendingCategory::Shopping => "Shopping",
            SpendingCategory::Entertainment => "Entertainment",
            SpendingCategory::Subscriptions => "Subscriptions",
            SpendingCategory::Other => "Other",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            SpendingCategory::Food => "🍔",
            SpendingCategory::Travel => "✈️",
            SpendingCategory::Shopping => "🛍️",
            SpendingCategory::Entertainment => "🎬",
            SpendingCategory::Subscriptions => "📱",
            SpendingCategory::Other => DEFAULT_CATEGORY_ICON,
        }
    }
}

/// Unknown or blank names get the default icon.
pub fn category_icon(name: &str) -> &'static str {
    SpendingCategory::from_name(name)
        .map(SpendingCategory::icon)
        .unwrap_or(DEFAULT_CATEGORY_ICON)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySummaryRow {
    pub category: WasteCategory,
    pub label: String,
    pub count: u32,
    pub total: f64,
    pub total_display: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedMerchant {
    /// 1-based position in the producer's ranking.
    pub rank: usize,
    pub name: String,
    pub count: u32,
    pub count_display: String,
    pub amount: f64,
    pub amount_display: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpendingRow {
    pub category: String,
    pub icon: String,
    pub amount: f64,
    pub amount_display: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepeatingChargeRow {
    pub merchant: String,
    pub count: u32,
    pub occurrences: String,
    pub total: f64,
    pub total_display: String,
    pub average: f64,
    /// Two decimals, no currency symbol.
    pub average_display: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineRow {
    pub line: String,
    pub amount: f64,
    pub amount_display: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// One of the micro transaction / fee / penalty lists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSection {
    pub kind: WasteCategory,
    /// "Found N ... totaling ₹X"; absent when the list is empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    pub rows: Listing<LineRow>,
    /// Entries left out by truncation.
    pub hidden: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub more: Option<String>,
}

/// Everything the results views display, derived from one analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregationView {
    pub surface: Surface,
    pub total_waste: f64,
    pub total_waste_display: String,
    pub transaction_count: u64,
    pub categories_with_activity: usize,
    pub category_summary: Vec<CategorySummaryRow>,
    pub merchants: Listing<RankedMerchant>,
    pub category_spending: Listing<SpendingRow>,
    pub suggestions: Listing<String>,
    pub repeating_charges: Listing<RepeatingChargeRow>,
    pub micro_transactions: LineSection,
    pub fees: LineSection,
    pub penalties: LineSection,
}

impl AggregationView {
    pub fn build(result: &AnalysisResult, surface: Surface) -> Self {
        let limit = surface.list_limit();
        Self {
            surface,
            total_waste: result.total_waste,
            total_waste_display: format_currency(result.total_waste),
            transaction_count: result.transaction_count,
            categories_with_activity: categories_with_activity(result),
            category_summary: category_summary_rows(result),
            merchants: rank_merchants(&result.top_merchants),
            category_spending: spending_rows(&result.category_spending),
            suggestions: Listing::from_items(result.suggestions.clone(), NO_SUGGESTIONS),
            repeating_charges: repeating_charge_rows(&result.repeating_charges),
            micro_transactions: line_section(
                WasteCategory::MicroTransactions,
                &result.micro_transactions,
                limit,
            ),
            fees: line_section(WasteCategory::Fees, &result.fees, limit),
            penalties: line_section(WasteCategory::Penalties, &result.penalties, limit),
        }
    }

    /// Preview surface shown right after an upload.
    pub fn summary(result: &AnalysisResult) -> Self {
        Self::build(result, Surface::Compact)
    }

    /// Full-detail dashboard surface.
    pub fn dashboard(result: &AnalysisResult) -> Self {
        Self::build(result, Surface::Full)
    }
}

/// How many of the four waste categories have at least one entry (0..=4).
pub fn categories_with_activity(result: &AnalysisResult) -> usize {
    result
        .category_summary
        .entries()
        .iter()
        .filter(|(_, tally)| tally.count > 0)
        .count()
}

/// Always four rows, in the fixed category order.
pub fn category_summary_rows(result: &AnalysisResult) -> Vec<CategorySummaryRow> {
    result
        .category_summary
        .entries()
        .into_iter()
        .map(|(category, tally)| CategorySummaryRow {
            category,
            label: category.label().to_string(),
            count: tally.count,
            total: tally.total,
            total_display: format_currency(tally.total),
            active: tally.count > 0,
        })
        .collect()
}

/// Keeps the producer's order; ranks are positions, not recomputed.
pub fn rank_merchants(merchants: &[Merchant]) -> Listing<RankedMerchant> {
    let rows = merchants
        .iter()
        .enumerate()
        .map(|(i, m)| RankedMerchant {
            rank: i + 1,
            name: m.name.clone(),
            count: m.count,
            count_display: format!("{} transactions", m.count),
            amount: m.amount,
            amount_display: format_currency(m.amount),
        })
        .collect();
    Listing::from_items(rows, NO_MERCHANTS)
}

fn spending_rows(spending: &[CategorySpend]) -> Listing<SpendingRow> {
    let rows = spending
        .iter()
        .map(|s| SpendingRow {
            category: s.category.clone(),
            icon: category_icon(&s.category).to_string(),
            amount: s.amount,
            amount_display: format_currency(s.amount),
        })
        .collect();
    Listing::from_items(rows, NO_CATEGORY_SPENDING)
}

/// Average per occurrence, always recomputed from `total` and `count`.
pub fn repeating_charge_average(charge: &RepeatingCharge) -> f64 {
    // count >= 1 for every entry the producer emits
    charge.total / f64::from(charge.count)
}

fn repeating_charge_rows(charges: &[RepeatingCharge]) -> Listing<RepeatingChargeRow> {
    let rows = charges
        .iter()
        .map(|c| {
            let average = repeating_charge_average(c);
            RepeatingChargeRow {
                merchant: c.merchant.clone(),
                count: c.count,
                occurrences: format!("Occurred {} times", c.count),
                total: c.total,
                total_display: format_currency(c.total),
                average,
                average_display: format_fixed2(average),
            }
        })
        .collect();
    Listing::from_items(rows, NO_REPEATING_CHARGES)
}

fn section_wording(kind: WasteCategory) -> (&'static str, &'static str) {
    // (noun used in the headline, empty-state placeholder)
    match kind {
        WasteCategory::MicroTransactions => ("small charges", "No micro transactions detected"),
        WasteCategory::Fees => ("fees", "No fees detected"),
        WasteCategory::Penalties => ("penalties", "No penalties detected"),
        WasteCategory::RepeatingCharges => ("repeating charges", NO_REPEATING_CHARGES),
    }
}

/// Builds a line list; with `limit` set, at most that many rows are kept and a
/// single "...and N more" line stands in for the rest.
pub fn line_section(kind: WasteCategory, lines: &[FlaggedLine], limit: Option<usize>) -> LineSection {
    let (noun, placeholder) = section_wording(kind);

    if lines.is_empty() {
        return LineSection {
            kind,
            headline: None,
            rows: Listing::empty(placeholder),
            hidden: 0,
            more: None,
        };
    }

    let total: f64 = lines.iter().map(|l| l.amount).sum();
    let shown = limit.map_or(lines.len(), |n| n.min(lines.len()));
    let hidden = lines.len() - shown;

    let rows = lines[..shown]
        .iter()
        .map(|l| LineRow {
            line: l.line.clone(),
            amount: l.amount,
            amount_display: format_currency(l.amount),
            category: l.category.clone(),
        })
        .collect();

    LineSection {
        kind,
        headline: Some(format!(
            "Found {} {} totaling {}",
            lines.len(),
            noun,
            format_currency(total)
        )),
        rows: Listing::Items { items: rows },
        hidden,
        more: (hidden > 0).then(|| format!("...and {hidden} more")),
    }
}
