// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// Failures raised by the ledger engine when handed input it cannot
/// materialize faithfully.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),
    #[error("Amount {0} has more precision than cents")]
    SubCentAmount(Decimal),
    #[error("Description must not be empty")]
    EmptyDescription,
    #[error("Installment count must be at least 1, got {0}")]
    InvalidInstallmentCount(u32),
    #[error("Cannot split {total} into {count} installments of at least one cent")]
    InstallmentTooSmall { total: Decimal, count: u32 },
    #[error("Unknown recurrence frequency '{0}' (use daily|weekly|monthly|yearly)")]
    UnknownFrequency(String),
    #[error("Unknown transaction type '{0}' (use income|expense)")]
    UnknownTransactionType(String),
    #[error("Recurrence end date given without a frequency")]
    MissingFrequency,
    #[error("Recurrence end {end} is before start {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
    #[error("A transaction cannot be both split into installments and recurring")]
    ConflictingSchedule,
    #[error("Credit cards only apply to expenses")]
    CardOnIncome,
    #[error("Invalid month '{0}', expected YYYY-MM")]
    InvalidMonth(String),
    #[error("Date arithmetic overflowed from {0}")]
    DateOverflow(NaiveDate),
    #[error("Card '{card}' limit {limit} exceeded in {month}: {used} used, {requested} requested")]
    CardLimitExceeded {
        card: String,
        month: String,
        limit: Decimal,
        used: Decimal,
        requested: Decimal,
    },
}

pub type LedgerResult<T> = Result<T, LedgerError>;
