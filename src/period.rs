// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Transaction, TransactionType, WalletId};
use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A calendar month, stored as its first day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct YearMonth(NaiveDate);

impl YearMonth {
    pub fn new(year: i32, month: u32) -> LedgerResult<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(YearMonth)
            .ok_or_else(|| LedgerError::InvalidMonth(format!("{}-{}", year, month)))
    }

    pub fn of(date: NaiveDate) -> Self {
        YearMonth(date - Duration::days(date.day0() as i64))
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.0
    }

    /// Last calendar day, 28 through 31 depending on month and leap year.
    pub fn last_day(&self) -> NaiveDate {
        self.0
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.first_day() && date <= self.last_day()
    }

    pub fn offset(&self, months: i32) -> LedgerResult<Self> {
        let shifted = if months >= 0 {
            self.0.checked_add_months(Months::new(months as u32))
        } else {
            self.0.checked_sub_months(Months::new(months.unsigned_abs()))
        };
        shifted.map(YearMonth).ok_or(LedgerError::DateOverflow(self.0))
    }

    pub fn succ(&self) -> LedgerResult<Self> {
        self.offset(1)
    }

    pub fn pred(&self) -> LedgerResult<Self> {
        self.offset(-1)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for YearMonth {
    type Err = LedgerError;

    fn from_str(s: &str) -> LedgerResult<Self> {
        let s = s.trim();
        NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d")
            .map(YearMonth)
            .map_err(|_| LedgerError::InvalidMonth(s.to_string()))
    }
}

impl TryFrom<String> for YearMonth {
    type Error = LedgerError;

    fn try_from(s: String) -> LedgerResult<Self> {
        s.parse()
    }
}

impl From<YearMonth> for String {
    fn from(ym: YearMonth) -> String {
        ym.to_string()
    }
}

/// Rows of `wallet` dated inside `month`, both ends inclusive, in ledger order.
pub fn select_month(
    ledger: &[Transaction],
    wallet: WalletId,
    month: YearMonth,
) -> Vec<&Transaction> {
    ledger
        .iter()
        .filter(|t| t.wallet == wallet && month.contains(t.date))
        .collect()
}

/// Same as [`select_month`] across every wallet. Card statements span wallets.
pub fn select_month_all_wallets(ledger: &[Transaction], month: YearMonth) -> Vec<&Transaction> {
    ledger.iter().filter(|t| month.contains(t.date)).collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    pub r#type: Option<TransactionType>,
    pub category: Option<String>,
}

impl TransactionFilter {
    pub fn matches(&self, t: &Transaction) -> bool {
        let type_ok = self.r#type.is_none_or(|k| k == t.r#type);
        let category_ok = self.category.as_deref().is_none_or(|c| c == t.category);
        type_ok && category_ok
    }

    pub fn apply<'a>(&self, rows: Vec<&'a Transaction>) -> Vec<&'a Transaction> {
        rows.into_iter().filter(|t| self.matches(t)).collect()
    }
}
