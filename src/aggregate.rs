// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Totals, breakdowns and series computed from materialized rows.
//!
//! Nothing here re-expands an installment purchase. A row counts once,
//! in the month of its own date.

use crate::error::{LedgerError, LedgerResult};
use crate::models::{CardId, CreditCard, Transaction, WalletId};
use crate::period::{YearMonth, select_month};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub income: Decimal,
    pub expense: Decimal,
    pub balance: Decimal,
    /// `balance / income`, or 0 when there is no income.
    pub savings_rate: Decimal,
}

impl Totals {
    pub fn from_rows<'a>(rows: impl IntoIterator<Item = &'a Transaction>) -> Self {
        let mut income = Decimal::ZERO;
        let mut expense = Decimal::ZERO;
        for t in rows {
            if t.is_income() {
                income += t.amount.value();
            } else {
                expense += t.amount.value();
            }
        }
        let balance = income - expense;
        let savings_rate = if income > Decimal::ZERO {
            balance / income
        } else {
            Decimal::ZERO
        };
        Totals {
            income,
            expense,
            balance,
            savings_rate,
        }
    }

    pub fn savings_pct(&self) -> Decimal {
        self.savings_rate * Decimal::ONE_HUNDRED
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryShare {
    pub category: String,
    pub amount: Decimal,
    pub percentage: Decimal,
}

/// Expense rows grouped by category, largest first. Ties sort by name.
pub fn category_breakdown<'a>(
    rows: impl IntoIterator<Item = &'a Transaction>,
) -> Vec<CategoryShare> {
    let mut groups: HashMap<&str, Decimal> = HashMap::new();
    let mut total = Decimal::ZERO;
    for t in rows.into_iter().filter(|t| t.is_expense()) {
        *groups.entry(t.category.as_str()).or_insert(Decimal::ZERO) += t.amount.value();
        total += t.amount.value();
    }

    let mut shares: Vec<CategoryShare> = groups
        .into_iter()
        .map(|(category, amount)| CategoryShare {
            category: category.to_string(),
            amount,
            percentage: if total.is_zero() {
                Decimal::ZERO
            } else {
                amount * Decimal::ONE_HUNDRED / total
            },
        })
        .collect();
    shares.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| a.category.cmp(&b.category)));
    shares
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardExposure {
    pub card: CardId,
    pub month: YearMonth,
    pub amount: Decimal,
}

/// Sum of card-tagged expense rows per `(card, month)`, ordered by card then
/// month.
pub fn card_exposure<'a>(rows: impl IntoIterator<Item = &'a Transaction>) -> Vec<CardExposure> {
    let mut buckets: BTreeMap<(CardId, YearMonth), Decimal> = BTreeMap::new();
    for t in rows.into_iter().filter(|t| t.is_expense()) {
        if let Some(card) = t.card {
            *buckets
                .entry((card, YearMonth::of(t.date)))
                .or_insert(Decimal::ZERO) += t.amount.value();
        }
    }
    buckets
        .into_iter()
        .map(|((card, month), amount)| CardExposure {
            card,
            month,
            amount,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub totals: Totals,
    pub categories: Vec<CategoryShare>,
    pub card_exposure: Vec<CardExposure>,
}

pub fn aggregate<'a>(rows: impl IntoIterator<Item = &'a Transaction>) -> Summary {
    let rows: Vec<&Transaction> = rows.into_iter().collect();
    Summary {
        totals: Totals::from_rows(rows.iter().copied()),
        categories: category_breakdown(rows.iter().copied()),
        card_exposure: card_exposure(rows.iter().copied()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthlyTotals {
    pub month: YearMonth,
    pub income: Decimal,
    pub expense: Decimal,
    pub balance: Decimal,
    pub savings_rate: Decimal,
}

impl MonthlyTotals {
    fn new(month: YearMonth, totals: Totals) -> Self {
        MonthlyTotals {
            month,
            income: totals.income,
            expense: totals.expense,
            balance: totals.balance,
            savings_rate: totals.savings_rate,
        }
    }
}

/// Month-by-month totals for one wallet, oldest first. Cloning restarts the
/// series from wherever the clone was taken.
#[derive(Debug, Clone)]
pub struct TrendSeries<'a> {
    ledger: &'a [Transaction],
    wallet: WalletId,
    next: Option<YearMonth>,
    remaining: usize,
}

impl Iterator for TrendSeries<'_> {
    type Item = MonthlyTotals;

    fn next(&mut self) -> Option<MonthlyTotals> {
        if self.remaining == 0 {
            return None;
        }
        let month = self.next?;
        let rows = select_month(self.ledger, self.wallet, month);
        self.next = month.succ().ok();
        self.remaining -= 1;
        Some(MonthlyTotals::new(month, Totals::from_rows(rows)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.next {
            Some(_) => (0, Some(self.remaining)),
            None => (0, Some(0)),
        }
    }
}

/// The `month_count` months ending with the month of `end_date`.
pub fn trend_series(
    ledger: &[Transaction],
    wallet: WalletId,
    month_count: usize,
    end_date: NaiveDate,
) -> TrendSeries<'_> {
    let start = month_count
        .checked_sub(1)
        .and_then(|back| i32::try_from(back).ok())
        .and_then(|back| YearMonth::of(end_date).offset(-back).ok());
    TrendSeries {
        ledger,
        wallet,
        next: start,
        remaining: if start.is_some() { month_count } else { 0 },
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardUsage {
    pub card: CardId,
    pub name: String,
    pub month: YearMonth,
    pub limit: Decimal,
    pub used: Decimal,
    /// Negative when the month is over the limit.
    pub available: Decimal,
}

fn card_spend_in(card: CardId, rows: &[Transaction], month: YearMonth) -> Decimal {
    rows.iter()
        .filter(|t| t.is_expense() && t.card == Some(card) && month.contains(t.date))
        .map(|t| t.amount.value())
        .sum()
}

pub fn card_usage(card: &CreditCard, ledger: &[Transaction], month: YearMonth) -> CardUsage {
    let used = card_spend_in(card.id, ledger, month);
    let limit = card.limit.value();
    CardUsage {
        card: card.id,
        name: card.name.clone(),
        month,
        limit,
        used,
        available: limit - used,
    }
}

/// Refuses `new_rows` when any month they touch would push `card` past its
/// limit. Rows already in the ledger are never re-judged.
pub fn check_card_limit(
    card: &CreditCard,
    ledger: &[Transaction],
    new_rows: &[Transaction],
) -> LedgerResult<()> {
    let mut requested: BTreeMap<YearMonth, Decimal> = BTreeMap::new();
    for t in new_rows
        .iter()
        .filter(|t| t.is_expense() && t.card == Some(card.id))
    {
        *requested
            .entry(YearMonth::of(t.date))
            .or_insert(Decimal::ZERO) += t.amount.value();
    }

    let limit = card.limit.value();
    for (month, amount) in requested {
        let used = card_spend_in(card.id, ledger, month);
        if used + amount > limit {
            warn!(card = %card.name, %month, %used, %amount, %limit, "card limit exceeded");
            return Err(LedgerError::CardLimitExceeded {
                card: card.name.clone(),
                month: month.to_string(),
                limit,
                used,
                requested: amount,
            });
        }
    }
    Ok(())
}
