// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::MonthlyTotals;
use crate::period::YearMonth;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Changes smaller than this many percent count as stable.
const STABLE_BAND_PCT: Decimal = Decimal::ONE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Balance,
    Income,
    Expense,
    Savings,
}

impl Metric {
    /// Savings reads as a percentage, the rest as money.
    pub fn value_of(&self, m: &MonthlyTotals) -> Decimal {
        match self {
            Metric::Balance => m.balance,
            Metric::Income => m.income,
            Metric::Expense => m.expense,
            Metric::Savings => m.savings_rate * Decimal::ONE_HUNDRED,
        }
    }
}

impl FromStr for Metric {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "balance" => Ok(Metric::Balance),
            "income" => Ok(Metric::Income),
            "expense" => Ok(Metric::Expense),
            "savings" => Ok(Metric::Savings),
            other => Err(anyhow::anyhow!(
                "Unknown metric '{}' (use balance|income|expense|savings)",
                other
            )),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Metric::Balance => "balance",
            Metric::Income => "income",
            Metric::Expense => "expense",
            Metric::Savings => "savings",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Insight {
    pub metric: Metric,
    pub month: YearMonth,
    pub current: Decimal,
    pub previous: Decimal,
    pub change_pct: Decimal,
    pub trend: Trend,
    pub average: Decimal,
    pub max: Decimal,
    pub min: Decimal,
}

/// Compares the last month of `series` with the one before it and
/// summarizes the whole window. `None` for an empty series.
pub fn insight(metric: Metric, series: &[MonthlyTotals]) -> Option<Insight> {
    let last = series.last()?;
    let values: Vec<Decimal> = series.iter().map(|m| metric.value_of(m)).collect();
    let current = metric.value_of(last);
    let previous = series
        .len()
        .checked_sub(2)
        .map(|i| values[i])
        .unwrap_or(Decimal::ZERO);

    let change_pct = if previous.is_zero() {
        Decimal::ZERO
    } else {
        (current - previous) * Decimal::ONE_HUNDRED / previous.abs()
    };
    let trend = if change_pct.abs() < STABLE_BAND_PCT {
        Trend::Stable
    } else if change_pct > Decimal::ZERO {
        Trend::Up
    } else {
        Trend::Down
    };

    let sum: Decimal = values.iter().sum();
    let average = sum / Decimal::from(values.len());
    let max = values.iter().copied().max().unwrap_or(Decimal::ZERO);
    let min = values.iter().copied().min().unwrap_or(Decimal::ZERO);

    Some(Insight {
        metric,
        month: last.month,
        current,
        previous,
        change_pct,
        trend,
        average,
        max,
        min,
    })
}
