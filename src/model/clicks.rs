// Package model provides click/impression report types.

use serde::{Deserialize, Serialize};

use super::job::ClickCategory;
use super::yoy::Source;

#[derive(Debug, Clone, Serialize)]
pub struct CategoryBreakdown {
    pub category: ClickCategory,
    pub impressions: u64,
    pub jobs: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClicksReport {
    pub total_impressions: u64,
    pub one_color: u64,
    pub two_colors: u64,
    pub epm: u64,
    pub multicolor: u64,
    pub total_jobs: u64,
    pub categories: Vec<CategoryBreakdown>,
    pub data_source: Source,
}

/// Bucket width of the clicks trend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    #[default]
    Day,
    Month,
    Year,
}

impl Resolution {
    /// Unknown values fall back to daily buckets.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("month") => Resolution::Month,
            Some("year") => Resolution::Year,
            _ => Resolution::Day,
        }
    }

    pub fn format(&self) -> &'static str {
        match self {
            Resolution::Day => "%Y-%m-%d",
            Resolution::Month => "%Y-%m",
            Resolution::Year => "%Y",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    pub date: String,
    #[serde(rename = "1 Color")]
    pub one_color: u64,
    #[serde(rename = "2 Colors")]
    pub two_colors: u64,
    #[serde(rename = "EPM")]
    pub epm: u64,
    #[serde(rename = "Multicolor")]
    pub multicolor: u64,
    pub total: u64,
}

impl TrendPoint {
    pub fn new(date: String) -> Self {
        Self {
            date,
            ..Self::default()
        }
    }

    pub fn add(&mut self, category: ClickCategory, impressions: u64) {
        let slot = match category {
            ClickCategory::OneColor => &mut self.one_color,
            ClickCategory::TwoColors => &mut self.two_colors,
            ClickCategory::Epm => &mut self.epm,
            ClickCategory::Multicolor => &mut self.multicolor,
        };
        *slot = slot.saturating_add(impressions);
        self.total = self.total.saturating_add(impressions);
    }
}
