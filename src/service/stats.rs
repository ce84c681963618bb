//! Aggregates over the job store: overview, click report and click trend.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::model::{
    percentage, CategoryBreakdown, ClickCategory, ClicksReport, JobFilter, Resolution, Source,
    StatsOverview, TrendPoint,
};

use super::jobs::JobStore;

pub struct StatsAggregator {
    store: Arc<JobStore>,
}

impl StatsAggregator {
    pub fn new(store: Arc<JobStore>) -> Self {
        Self { store }
    }

    pub fn overview(&self, filter: &JobFilter) -> StatsOverview {
        let t = self.store.totals(filter);
        StatsOverview {
            total_jobs: t.total_jobs,
            total_impressions: t.total_impressions,
            total_sheets: t.total_sheets,
            printed_jobs: t.printed_jobs,
            aborted_jobs: t.aborted_jobs,
            success_rate: percentage(t.printed_jobs, t.total_jobs),
        }
    }

    pub fn clicks_report(&self, filter: &JobFilter) -> ClicksReport {
        let mut impressions = [0u64; 4];
        let mut jobs = [0u64; 4];
        self.store.scan(filter, |job| {
            let idx = category_index(job.click_category);
            impressions[idx] = impressions[idx].saturating_add(job.total_impressions);
            jobs[idx] += 1;
        });

        let total_impressions = impressions.iter().fold(0u64, |acc, v| acc.saturating_add(*v));
        let categories = ClickCategory::ALL
            .into_iter()
            .enumerate()
            .map(|(idx, category)| CategoryBreakdown {
                category,
                impressions: impressions[idx],
                jobs: jobs[idx],
                percentage: percentage(impressions[idx], total_impressions),
            })
            .collect();

        ClicksReport {
            total_impressions,
            one_color: impressions[0],
            two_colors: impressions[1],
            epm: impressions[2],
            multicolor: impressions[3],
            total_jobs: jobs.iter().sum(),
            categories,
            data_source: Source::Live,
        }
    }

    /// Impressions per category bucketed by day, month or year, oldest bucket first.
    pub fn clicks_trend(&self, filter: &JobFilter, resolution: Resolution) -> Vec<TrendPoint> {
        let mut buckets: BTreeMap<String, TrendPoint> = BTreeMap::new();
        self.store.scan(filter, |job| {
            let date = job.job_date.format(resolution.format()).to_string();
            buckets
                .entry(date.clone())
                .or_insert_with(|| TrendPoint::new(date))
                .add(job.click_category, job.total_impressions);
        });
        buckets.into_values().collect()
    }
}

fn category_index(category: ClickCategory) -> usize {
    match category {
        ClickCategory::OneColor => 0,
        ClickCategory::TwoColors => 1,
        ClickCategory::Epm => 2,
        ClickCategory::Multicolor => 3,
    }
}
