//! Store efficiency ranking.
//!
//! Door-counter visits and paid orders are merged per (location, day), folded
//! into one aggregate per store and ranked on four metrics. The efficiency
//! score of a store is the mean of its four ranks, so lower is better.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use super::DateWindow;
use super::format::{BEST_COLOR, WORST_COLOR, interpolate_color, round2};

pub const DEFAULT_MIN_VISITORS: i64 = 100;
pub const DEFAULT_MIN_ORDERS: i64 = 5;
pub const CHART_TOP_STORES: usize = 15;

#[derive(Debug, Clone, PartialEq)]
pub struct VisitorRecord {
    pub location: String,
    pub date: NaiveDate,
    pub visitor_count: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SalesRecord {
    pub location: String,
    pub date: NaiveDate,
    pub transaction_count: i64,
    pub revenue: f64,
    pub avg_transaction_value: f64,
    pub unique_customers: i64,
}

/// One store on one day, with whichever side was missing zeroed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailyStoreRecord {
    pub location: String,
    pub date: NaiveDate,
    pub visitors: i64,
    pub transactions: i64,
    pub revenue: f64,
    pub avg_transaction_value: f64,
    pub unique_customers: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct StoreAggregate {
    pub location: String,
    pub visitors: i64,
    pub transactions: i64,
    pub revenue: f64,
    pub unique_customers: i64,
    pub days_active: i64,
    pub avg_transaction_value: f64,
    pub conversion_rate: f64,
    pub revenue_per_visitor: f64,
    pub customers_per_day: f64,
    pub revenue_per_day: f64,
    pub transactions_per_day: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct StoreRanking {
    #[serde(flatten)]
    pub store: StoreAggregate,
    pub conversion_rank: usize,
    pub revenue_per_visitor_rank: usize,
    pub total_revenue_rank: usize,
    pub avg_transaction_rank: usize,
    pub efficiency_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChartDataset {
    pub label: String,
    pub data: Vec<f64>,
    pub background_color: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<ChartDataset>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct RankingSummary {
    pub total_stores: usize,
    pub total_visitors: i64,
    pub total_revenue: f64,
    pub date_range_days: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RankingReport {
    pub rankings: Vec<StoreRanking>,
    pub chart_data: ChartData,
    pub summary: RankingSummary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankingThresholds {
    pub min_visitors: i64,
    pub min_orders: i64,
}

impl Default for RankingThresholds {
    fn default() -> Self {
        Self {
            min_visitors: DEFAULT_MIN_VISITORS,
            min_orders: DEFAULT_MIN_ORDERS,
        }
    }
}

/// Joins both feeds on (location, date). Output is ordered by location, then date.
pub fn merge_daily(visitors: &[VisitorRecord], sales: &[SalesRecord]) -> Vec<DailyStoreRecord> {
    let mut days: BTreeMap<(String, NaiveDate), DailyStoreRecord> = BTreeMap::new();

    for record in visitors {
        let day = days
            .entry((record.location.clone(), record.date))
            .or_insert_with(|| DailyStoreRecord {
                location: record.location.clone(),
                date: record.date,
                ..Default::default()
            });
        day.visitors += record.visitor_count;
    }

    for record in sales {
        let day = days
            .entry((record.location.clone(), record.date))
            .or_insert_with(|| DailyStoreRecord {
                location: record.location.clone(),
                date: record.date,
                ..Default::default()
            });
        day.transactions += record.transaction_count;
        day.revenue += record.revenue;
        day.avg_transaction_value = record.avg_transaction_value;
        day.unique_customers += record.unique_customers;
    }

    days.into_values().collect()
}

#[derive(Default)]
struct StoreAccumulator {
    visitors: i64,
    transactions: i64,
    revenue: f64,
    unique_customers: i64,
    days_active: i64,
    avg_value_sum: f64,
    avg_value_days: i64,
}

/// Folds per-day records into one aggregate per location, ordered by location.
///
/// The average transaction value is the plain mean of the non-zero per-day
/// averages, not a transaction-weighted mean.
pub fn fold_stores(days: &[DailyStoreRecord]) -> Vec<StoreAggregate> {
    let mut stores: BTreeMap<&str, StoreAccumulator> = BTreeMap::new();

    for day in days {
        let acc = stores.entry(day.location.as_str()).or_default();
        acc.visitors += day.visitors;
        acc.transactions += day.transactions;
        acc.revenue += day.revenue;
        acc.unique_customers += day.unique_customers;
        if day.transactions > 0 || day.visitors > 0 {
            acc.days_active += 1;
        }
        if day.avg_transaction_value != 0.0 {
            acc.avg_value_sum += day.avg_transaction_value;
            acc.avg_value_days += 1;
        }
    }

    stores
        .into_iter()
        .map(|(location, acc)| {
            let per_visitor = |value: f64| {
                if acc.visitors > 0 {
                    value / acc.visitors as f64
                } else {
                    0.0
                }
            };
            let per_day = |value: f64| {
                if acc.days_active > 0 {
                    value / acc.days_active as f64
                } else {
                    0.0
                }
            };

            StoreAggregate {
                location: location.to_string(),
                visitors: acc.visitors,
                transactions: acc.transactions,
                revenue: acc.revenue,
                unique_customers: acc.unique_customers,
                days_active: acc.days_active,
                avg_transaction_value: if acc.avg_value_days > 0 {
                    acc.avg_value_sum / acc.avg_value_days as f64
                } else {
                    0.0
                },
                conversion_rate: per_visitor(acc.transactions as f64),
                revenue_per_visitor: per_visitor(acc.revenue),
                customers_per_day: per_day(acc.unique_customers as f64),
                revenue_per_day: per_day(acc.revenue),
                transactions_per_day: per_day(acc.transactions as f64),
            }
        })
        .collect()
}

pub fn is_eligible(store: &StoreAggregate, thresholds: RankingThresholds) -> bool {
    store.visitors > 0
        && store.visitors >= thresholds.min_visitors
        && store.transactions >= thresholds.min_orders
}

/// 1-based rank of every store on one metric, sorted descending. Equal
/// values fall back to location name so the result is deterministic.
fn ranks_by<F>(stores: &[StoreAggregate], metric: F) -> Vec<usize>
where
    F: Fn(&StoreAggregate) -> f64,
{
    let mut order: Vec<usize> = (0..stores.len()).collect();
    order.sort_by(|&a, &b| {
        metric(&stores[b])
            .total_cmp(&metric(&stores[a]))
            .then_with(|| stores[a].location.cmp(&stores[b].location))
    });

    let mut ranks = vec![0; stores.len()];
    for (position, index) in order.into_iter().enumerate() {
        ranks[index] = position + 1;
    }
    ranks
}

/// Filters, ranks and orders stores best first.
pub fn rank_stores(stores: Vec<StoreAggregate>, thresholds: RankingThresholds) -> Vec<StoreRanking> {
    let eligible: Vec<StoreAggregate> = stores
        .into_iter()
        .filter(|store| is_eligible(store, thresholds))
        .collect();

    if eligible.is_empty() {
        return Vec::new();
    }

    let conversion = ranks_by(&eligible, |s| s.conversion_rate);
    let per_visitor = ranks_by(&eligible, |s| s.revenue_per_visitor);
    let revenue = ranks_by(&eligible, |s| s.revenue);
    let avg_transaction = ranks_by(&eligible, |s| s.avg_transaction_value);

    let mut rankings: Vec<StoreRanking> = eligible
        .into_iter()
        .enumerate()
        .map(|(i, store)| {
            let rank_sum = conversion[i] + per_visitor[i] + revenue[i] + avg_transaction[i];
            StoreRanking {
                store,
                conversion_rank: conversion[i],
                revenue_per_visitor_rank: per_visitor[i],
                total_revenue_rank: revenue[i],
                avg_transaction_rank: avg_transaction[i],
                efficiency_score: rank_sum as f64 / 4.0,
            }
        })
        .collect();

    rankings.sort_by(|a, b| {
        a.efficiency_score
            .total_cmp(&b.efficiency_score)
            .then_with(|| a.store.location.cmp(&b.store.location))
    });

    rankings
}

/// Bar chart of the best stores, colored from green (best) to red (worst)
/// by position in the slice.
pub fn efficiency_chart(rankings: &[StoreRanking]) -> ChartData {
    let top = &rankings[..rankings.len().min(CHART_TOP_STORES)];
    if top.is_empty() {
        return ChartData::default();
    }

    let last = (top.len() - 1).max(1) as f64;
    let colors = (0..top.len())
        .map(|i| interpolate_color(BEST_COLOR, WORST_COLOR, i as f64 / last))
        .collect();

    ChartData {
        labels: top.iter().map(|r| r.store.location.clone()).collect(),
        datasets: vec![ChartDataset {
            label: "Efficiency Score".to_string(),
            data: top.iter().map(|r| r.efficiency_score).collect(),
            background_color: colors,
        }],
    }
}

pub fn summarize(rankings: &[StoreRanking], window: DateWindow) -> RankingSummary {
    RankingSummary {
        total_stores: rankings.len(),
        total_visitors: rankings.iter().map(|r| r.store.visitors).sum(),
        total_revenue: round2(rankings.iter().map(|r| r.store.revenue).sum()),
        date_range_days: window.days(),
    }
}

/// Full pipeline from raw feed rows to the response payload.
pub fn build_report(
    visitors: &[VisitorRecord],
    sales: &[SalesRecord],
    thresholds: RankingThresholds,
    window: DateWindow,
) -> RankingReport {
    let days = merge_daily(visitors, sales);
    let rankings = rank_stores(fold_stores(&days), thresholds);
    let chart_data = efficiency_chart(&rankings);
    let summary = summarize(&rankings, window);

    RankingReport {
        rankings,
        chart_data,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn days(from: u32, to: u32) -> DateWindow {
        DateWindow::new(day(from), day(to)).unwrap()
    }

    fn visits(location: &str, d: u32, count: i64) -> VisitorRecord {
        VisitorRecord {
            location: location.to_string(),
            date: day(d),
            visitor_count: count,
        }
    }

    fn sale(location: &str, d: u32, transactions: i64, revenue: f64) -> SalesRecord {
        SalesRecord {
            location: location.to_string(),
            date: day(d),
            transaction_count: transactions,
            revenue,
            avg_transaction_value: if transactions > 0 {
                revenue / transactions as f64
            } else {
                0.0
            },
            unique_customers: transactions,
        }
    }

    const NO_THRESHOLDS: RankingThresholds = RankingThresholds {
        min_visitors: 0,
        min_orders: 0,
    };

    #[test]
    fn test_merge_zeroes_missing_side() {
        let merged = merge_daily(&[visits("A", 1, 40)], &[sale("A", 2, 3, 90.0)]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].date, day(1));
        assert_eq!(merged[0].visitors, 40);
        assert_eq!(merged[0].transactions, 0);
        assert_eq!(merged[1].date, day(2));
        assert_eq!(merged[1].visitors, 0);
        assert_eq!(merged[1].revenue, 90.0);
    }

    #[test]
    fn test_fold_counts_active_days_and_averages_daily_averages() {
        let merged = merge_daily(
            &[visits("A", 1, 10), visits("A", 2, 10)],
            &[sale("A", 1, 1, 100.0), sale("A", 3, 3, 30.0)],
        );
        let stores = fold_stores(&merged);
        assert_eq!(stores.len(), 1);
        let a = &stores[0];
        assert_eq!(a.days_active, 3);
        assert_eq!(a.visitors, 20);
        assert_eq!(a.transactions, 4);
        // mean of 100 and 10, not 130 / 4
        assert_eq!(a.avg_transaction_value, 55.0);
        assert_eq!(a.conversion_rate, 0.2);
        assert_eq!(a.revenue_per_visitor, 6.5);
    }

    #[test]
    fn test_fold_without_visitors_has_zero_rates() {
        let stores = fold_stores(&merge_daily(&[], &[sale("Online", 1, 5, 50.0)]));
        assert_eq!(stores[0].conversion_rate, 0.0);
        assert_eq!(stores[0].revenue_per_visitor, 0.0);
        assert!(rank_stores(stores, NO_THRESHOLDS).is_empty());
    }

    #[test]
    fn test_revenue_per_visitor_scenario() {
        let report = build_report(
            &[visits("North", 1, 100), visits("South", 1, 50)],
            &[sale("North", 1, 10, 1000.0), sale("South", 1, 10, 1000.0)],
            NO_THRESHOLDS,
            days(1, 7),
        );

        let south = report
            .rankings
            .iter()
            .find(|r| r.store.location == "South")
            .unwrap();
        assert_eq!(south.store.revenue_per_visitor, 20.0);
        assert_eq!(south.revenue_per_visitor_rank, 1);
        assert_eq!(south.conversion_rank, 1);
        assert_eq!(report.summary.date_range_days, 7);
        assert_eq!(report.summary.total_visitors, 150);
        assert_eq!(report.summary.total_revenue, 2000.0);
    }

    #[test]
    fn test_thresholds_exclude_small_stores() {
        let report = build_report(
            &[visits("A", 1, 500), visits("B", 1, 50), visits("C", 1, 500)],
            &[
                sale("A", 1, 20, 400.0),
                sale("B", 1, 20, 400.0),
                sale("C", 1, 2, 400.0),
            ],
            RankingThresholds::default(),
            days(1, 1),
        );
        let locations: Vec<_> = report
            .rankings
            .iter()
            .map(|r| r.store.location.as_str())
            .collect();
        assert_eq!(locations, vec!["A"]);
    }

    #[test]
    fn test_ranks_are_permutations_and_scores_ascending() {
        let visitors: Vec<_> = (0..6)
            .map(|i| visits(&format!("S{i}"), 1, 100 + i * 37))
            .collect();
        let sales: Vec<_> = (0..6)
            .map(|i| sale(&format!("S{i}"), 1, 5 + (i * 7) % 11, 250.0 + (i * 91 % 13) as f64 * 40.0))
            .collect();
        let rankings = rank_stores(fold_stores(&merge_daily(&visitors, &sales)), NO_THRESHOLDS);

        let n = rankings.len();
        assert_eq!(n, 6);
        for column in [
            rankings.iter().map(|r| r.conversion_rank).collect::<Vec<_>>(),
            rankings.iter().map(|r| r.revenue_per_visitor_rank).collect(),
            rankings.iter().map(|r| r.total_revenue_rank).collect(),
            rankings.iter().map(|r| r.avg_transaction_rank).collect(),
        ] {
            let mut sorted = column.clone();
            sorted.sort_unstable();
            assert_eq!(sorted, (1..=n).collect::<Vec<_>>());
        }

        for pair in rankings.windows(2) {
            assert!(pair[0].efficiency_score <= pair[1].efficiency_score);
        }
    }

    #[test]
    fn test_ties_break_by_location() {
        let rankings = rank_stores(
            fold_stores(&merge_daily(
                &[visits("Beta", 1, 100), visits("Alpha", 1, 100)],
                &[sale("Beta", 1, 10, 500.0), sale("Alpha", 1, 10, 500.0)],
            )),
            NO_THRESHOLDS,
        );
        assert_eq!(rankings[0].store.location, "Alpha");
        assert_eq!(rankings[0].conversion_rank, 1);
        assert_eq!(rankings[1].conversion_rank, 2);
        assert_eq!(rankings[0].efficiency_score, 1.0);
        assert_eq!(rankings[1].efficiency_score, 2.0);
    }

    #[test]
    fn test_chart_keeps_top_fifteen_green_to_red() {
        let visitors: Vec<_> = (0..20).map(|i| visits(&format!("S{i:02}"), 1, 100)).collect();
        let sales: Vec<_> = (0..20)
            .map(|i| sale(&format!("S{i:02}"), 1, 10 + i, 100.0 * (i + 1) as f64))
            .collect();
        let report = build_report(&visitors, &sales, NO_THRESHOLDS, days(1, 1));

        assert_eq!(report.rankings.len(), 20);
        assert_eq!(report.chart_data.labels.len(), CHART_TOP_STORES);
        let dataset = &report.chart_data.datasets[0];
        assert_eq!(dataset.data.len(), CHART_TOP_STORES);
        assert_eq!(dataset.background_color[0], "rgba(34, 197, 94, 0.8)");
        assert_eq!(dataset.background_color[14], "rgba(239, 68, 68, 0.8)");
        assert_eq!(report.chart_data.labels[0], report.rankings[0].store.location);
    }

    #[test]
    fn test_empty_report_is_valid() {
        let report = build_report(&[], &[], RankingThresholds::default(), days(1, 7));
        assert!(report.rankings.is_empty());
        assert!(report.chart_data.labels.is_empty());
        assert!(report.chart_data.datasets.is_empty());
        assert_eq!(report.summary.total_stores, 0);
        assert_eq!(report.summary.total_revenue, 0.0);
        assert_eq!(report.summary.date_range_days, 7);
    }
}
