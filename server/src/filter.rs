//! Validation of the `GET /api/filter` query.

use std::sync::LazyLock;

use chrono::{NaiveDate, TimeZone};
use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

use crate::dates::{day_range, month_range, DateRange};

static DAY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("day pattern compiles"));
static MONTH_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}$").expect("month pattern compiles"));

/// Raw query string of the filter endpoint.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterParams {
    pub date: Option<String>,
    pub month_year: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("Please provide either a date (YYYY-MM-DD) or a monthYear (YYYY-MM)")]
    Missing,

    #[error("Please provide only one of date or monthYear")]
    Conflicting,

    #[error("Invalid date `{0}`. Use YYYY-MM-DD format")]
    InvalidDate(String),

    #[error("Invalid monthYear `{0}`. Use YYYY-MM format")]
    InvalidMonthYear(String),
}

/// A validated filter: one local calendar day or one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    Day(NaiveDate),
    /// Holds the first day of the month.
    Month(NaiveDate),
}

impl Filter {
    /// Empty parameters count as absent.
    pub fn from_params(params: &FilterParams) -> Result<Self, FilterError> {
        let date = params.date.as_deref().filter(|s| !s.is_empty());
        let month_year = params.month_year.as_deref().filter(|s| !s.is_empty());

        match (date, month_year) {
            (Some(_), Some(_)) => Err(FilterError::Conflicting),
            (Some(date), None) => parse_day(date).map(Filter::Day),
            (None, Some(month_year)) => parse_month(month_year).map(Filter::Month),
            (None, None) => Err(FilterError::Missing),
        }
    }

    pub fn range<Tz: TimeZone>(&self, tz: &Tz) -> DateRange {
        match self {
            Filter::Day(day) => day_range(*day, tz),
            Filter::Month(first) => month_range(*first, tz),
        }
    }
}

fn parse_day(text: &str) -> Result<NaiveDate, FilterError> {
    if !DAY_PATTERN.is_match(text) {
        return Err(FilterError::InvalidDate(text.to_string()));
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map_err(|_| FilterError::InvalidDate(text.to_string()))
}

fn parse_month(text: &str) -> Result<NaiveDate, FilterError> {
    let invalid = || FilterError::InvalidMonthYear(text.to_string());
    if !MONTH_PATTERN.is_match(text) {
        return Err(invalid());
    }
    let (year, month) = text.split_once('-').ok_or_else(invalid)?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)
}
