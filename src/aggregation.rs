use crate::config::AuditConfig;
use crate::grouping::OrderedGroups;
use crate::labels::display_label;
use crate::normalizer::SaleEntry;
use crate::utils::{day_label, trailing_days};
use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of days in the trailing activity window.
pub const ACTIVITY_WINDOW_DAYS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTotal {
    pub day: NaiveDate,
    pub total_amount: f64,
    pub count: usize,
}

impl DailyTotal {
    pub fn label(&self) -> String {
        day_label(self.day)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivitySlot {
    pub day: NaiveDate,
    pub total_amount: f64,
    pub count: usize,
    pub is_empty: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub day: NaiveDate,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SellerRanking {
    pub name: String,
    pub total_amount: f64,
    pub count: usize,
    /// Percentage of total revenue.
    pub share: f64,
    /// Daily amounts for this seller, oldest first.
    pub trend: Vec<TrendPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRanking {
    /// Exact product name; the grouping key.
    pub full_name: String,
    pub display_name: String,
    pub total_amount: f64,
    pub count: usize,
    /// Percentage of total revenue.
    pub share: f64,
}

/// Aggregates over one set of sales. Only built for a non-empty set, so
/// `total_count` is always at least 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditReport {
    pub total_revenue: f64,
    pub total_count: usize,
    pub guaranteed_count: usize,
    /// One entry per day that has sales, oldest first.
    pub timeline: Vec<DailyTotal>,
    /// Exactly [`ACTIVITY_WINDOW_DAYS`] slots ending on the latest sale date, oldest first.
    pub activity_window: Vec<ActivitySlot>,
    /// Sorted by `total_amount` descending; ties keep first-seen order.
    pub sellers: Vec<SellerRanking>,
    /// Sorted by `total_amount` descending; ties keep first-seen order.
    pub products: Vec<ProductRanking>,
}

impl AuditReport {
    pub fn average_ticket(&self) -> f64 {
        self.total_revenue / self.total_count as f64
    }

    /// Percentage of sales whose status carries the guarantee marker.
    pub fn guaranteed_pct(&self) -> f64 {
        self.guaranteed_count as f64 / self.total_count as f64 * 100.0
    }

    pub fn top_sellers(&self, n: usize) -> &[SellerRanking] {
        &self.sellers[..n.min(self.sellers.len())]
    }

    pub fn top_products(&self, n: usize) -> &[ProductRanking] {
        &self.products[..n.min(self.products.len())]
    }

    /// Latest sale date, the last day of the activity window.
    pub fn latest_day(&self) -> Option<NaiveDate> {
        self.activity_window.last().map(|slot| slot.day)
    }
}

struct SellerAccumulator {
    total_amount: f64,
    count: usize,
    daily: BTreeMap<NaiveDate, f64>,
}

struct ProductAccumulator {
    total_amount: f64,
    count: usize,
}

pub struct Aggregator<'a> {
    config: &'a AuditConfig,
}

impl<'a> Aggregator<'a> {
    pub fn new(config: &'a AuditConfig) -> Self {
        Self { config }
    }

    /// Builds the report for `entries`, or `None` when there are none.
    ///
    /// Pure: the same entries always give an identical report.
    pub fn aggregate(&self, entries: &[SaleEntry]) -> Option<AuditReport> {
        if entries.is_empty() {
            debug!("No sale entries to aggregate");
            return None;
        }

        let total_revenue = entries.iter().fold(0.0, |sum, e| add_amount(sum, e.amount));
        let guaranteed_count = entries
            .iter()
            .filter(|e| e.is_guaranteed(&self.config.guarantee_marker))
            .count();

        let daily = daily_totals(entries);
        let activity_window = build_activity_window(&daily)?;
        let timeline: Vec<DailyTotal> = daily
            .into_iter()
            .map(|(day, (total_amount, count))| DailyTotal {
                day,
                total_amount,
                count,
            })
            .collect();

        let sellers = self.rank_sellers(entries, total_revenue);
        let products = self.rank_products(entries, total_revenue);

        debug!(
            "Aggregated {} entries into {} sellers and {} products",
            entries.len(),
            sellers.len(),
            products.len()
        );

        Some(AuditReport {
            total_revenue,
            total_count: entries.len(),
            guaranteed_count,
            timeline,
            activity_window,
            sellers,
            products,
        })
    }

    fn rank_sellers(&self, entries: &[SaleEntry], total_revenue: f64) -> Vec<SellerRanking> {
        let mut groups: OrderedGroups<SellerAccumulator> = OrderedGroups::new();

        for entry in entries {
            let acc = groups.entry_or_insert_with(&entry.seller, || SellerAccumulator {
                total_amount: 0.0,
                count: 0,
                daily: BTreeMap::new(),
            });
            acc.total_amount = add_amount(acc.total_amount, entry.amount);
            acc.count += 1;
            let day = acc.daily.entry(entry.date).or_insert(0.0);
            *day = add_amount(*day, entry.amount);
        }

        let mut sellers: Vec<SellerRanking> = groups
            .into_vec()
            .into_iter()
            .map(|(name, acc)| SellerRanking {
                name,
                total_amount: acc.total_amount,
                count: acc.count,
                share: share_of(acc.total_amount, total_revenue),
                trend: acc
                    .daily
                    .into_iter()
                    .map(|(day, amount)| TrendPoint { day, amount })
                    .collect(),
            })
            .collect();

        // Stable sort, so equal totals stay in first-seen order.
        sellers.sort_by(|a, b| b.total_amount.total_cmp(&a.total_amount));
        sellers
    }

    fn rank_products(&self, entries: &[SaleEntry], total_revenue: f64) -> Vec<ProductRanking> {
        let mut groups: OrderedGroups<ProductAccumulator> = OrderedGroups::new();

        for entry in entries {
            let acc = groups.entry_or_insert_with(&entry.product_name, || ProductAccumulator {
                total_amount: 0.0,
                count: 0,
            });
            acc.total_amount = add_amount(acc.total_amount, entry.amount);
            acc.count += 1;
        }

        let mut products: Vec<ProductRanking> = groups
            .into_vec()
            .into_iter()
            .map(|(full_name, acc)| ProductRanking {
                display_name: display_label(&full_name, &self.config.labels),
                full_name,
                total_amount: acc.total_amount,
                count: acc.count,
                share: share_of(acc.total_amount, total_revenue),
            })
            .collect();

        products.sort_by(|a, b| b.total_amount.total_cmp(&a.total_amount));
        products
    }
}

/// Aggregates with the default configuration.
pub fn aggregate(entries: &[SaleEntry]) -> Option<AuditReport> {
    Aggregator::new(&AuditConfig::default()).aggregate(entries)
}

fn daily_totals(entries: &[SaleEntry]) -> BTreeMap<NaiveDate, (f64, usize)> {
    let mut daily: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    for entry in entries {
        let slot = daily.entry(entry.date).or_insert((0.0, 0));
        slot.0 = add_amount(slot.0, entry.amount);
        slot.1 += 1;
    }
    daily
}

fn build_activity_window(daily: &BTreeMap<NaiveDate, (f64, usize)>) -> Option<Vec<ActivitySlot>> {
    let (&max_date, _) = daily.last_key_value()?;

    let window = trailing_days(max_date, ACTIVITY_WINDOW_DAYS)
        .into_iter()
        .map(|day| {
            let (total_amount, count) = daily.get(&day).copied().unwrap_or((0.0, 0));
            ActivitySlot {
                day,
                total_amount,
                count,
                is_empty: count == 0,
            }
        })
        .collect();

    Some(window)
}

/// Sums amounts, saturating at `f64::MAX` so totals stay finite.
fn add_amount(sum: f64, amount: f64) -> f64 {
    (sum + amount).min(f64::MAX)
}

fn share_of(amount: f64, total: f64) -> f64 {
    if total.is_finite() && total > 0.0 {
        amount / total * 100.0
    } else {
        0.0
    }
}
