// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Turns one origin entry into the dated ledger rows it stands for.
//!
//! Installment series land one row per calendar month from the base date.
//! Recurring entries land one row per frequency step until the earlier of
//! their end date and the caller's horizon. Month and year steps are
//! anchored on the base date, so a series starting on the 31st clamps to
//! shorter months and returns to the 31st afterwards.

use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    Amount, EntryKind, Frequency, Schedule, Transaction, TransactionDraft, TransactionId,
};
use chrono::{Days, Months, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;

/// Hands out ledger ids. Ids must never repeat, including ids of rows that
/// were deleted since.
pub trait IdSource {
    fn next_id(&mut self) -> TransactionId;
}

#[derive(Debug, Clone)]
pub struct SequentialIds {
    next: i64,
}

impl SequentialIds {
    pub fn starting_at(first: TransactionId) -> Self {
        SequentialIds { next: first.0 }
    }

    pub fn peek(&self) -> TransactionId {
        TransactionId(self.next)
    }
}

impl IdSource for SequentialIds {
    fn next_id(&mut self) -> TransactionId {
        let id = TransactionId(self.next);
        self.next += 1;
        id
    }
}

impl<F> IdSource for F
where
    F: FnMut() -> TransactionId,
{
    fn next_id(&mut self) -> TransactionId {
        self()
    }
}

/// Splits `total` into `count` cent-exact shares. Every share is truncated to
/// cents and the first one absorbs the remainder, so the shares always add up
/// to `total`.
pub fn split_amount(total: Amount, count: u32) -> LedgerResult<Vec<Amount>> {
    if count == 0 {
        return Err(LedgerError::InvalidInstallmentCount(0));
    }
    let total_value = total.value();
    let n = Decimal::from(count);
    if total_value * Decimal::ONE_HUNDRED < n {
        return Err(LedgerError::InstallmentTooSmall {
            total: total_value,
            count,
        });
    }

    let share = (total_value / n).round_dp_with_strategy(2, RoundingStrategy::ToZero);
    let first = share + (total_value - share * n);

    let mut shares = Vec::with_capacity(count as usize);
    shares.push(Amount::new(first)?);
    for _ in 1..count {
        shares.push(Amount::new(share)?);
    }
    Ok(shares)
}

/// Adds calendar months, clamping to the last day of shorter months
/// (Jan 31 + 1 month is Feb 28 or 29).
pub fn add_months_clamped(date: NaiveDate, months: u32) -> LedgerResult<NaiveDate> {
    date.checked_add_months(Months::new(months))
        .ok_or(LedgerError::DateOverflow(date))
}

fn nth_step(base: NaiveDate, frequency: Frequency, k: u32) -> Option<NaiveDate> {
    match frequency {
        Frequency::Daily => base.checked_add_days(Days::new(k as u64)),
        Frequency::Weekly => base.checked_add_days(Days::new(7 * k as u64)),
        Frequency::Monthly => base.checked_add_months(Months::new(k)),
        Frequency::Yearly => k
            .checked_mul(12)
            .and_then(|months| base.checked_add_months(Months::new(months))),
    }
}

/// Materializes an installment series. Row 1 takes `origin_id` and carries no
/// parent; rows 2..n draw fresh ids from `ids` and point back at row 1.
///
/// Drafts that are not an installment schedule, or have a count of 1,
/// come back as a single plain row.
pub fn expand_installments(
    draft: &TransactionDraft,
    origin_id: TransactionId,
    ids: &mut impl IdSource,
) -> LedgerResult<Vec<Transaction>> {
    let count = match draft.schedule {
        Schedule::Installments { count } if count > 1 => count,
        _ => {
            return Ok(vec![draft.materialize(
                origin_id,
                draft.date,
                draft.amount,
                EntryKind::Plain,
            )]);
        }
    };

    let shares = split_amount(draft.amount, count)?;
    let mut rows = Vec::with_capacity(count as usize);
    for (offset, share) in shares.into_iter().enumerate() {
        let offset = offset as u32;
        let date = add_months_clamped(draft.date, offset)?;
        let (id, parent) = if offset == 0 {
            (origin_id, None)
        } else {
            (ids.next_id(), Some(origin_id))
        };
        rows.push(draft.materialize(
            id,
            date,
            share,
            EntryKind::Installment {
                current: offset + 1,
                total: count,
                parent,
            },
        ));
    }
    debug!(origin = %origin_id, rows = rows.len(), "expanded installments");
    Ok(rows)
}

/// Materializes a recurring entry up to `min(end_date, horizon)` inclusive.
/// The first occurrence is always emitted, even when the horizon is earlier
/// than the base date, so the origin itself is never lost.
pub fn expand_recurrence(
    draft: &TransactionDraft,
    horizon: NaiveDate,
    ids: &mut impl IdSource,
) -> LedgerResult<Vec<Transaction>> {
    let (frequency, end_date) = match draft.schedule {
        Schedule::Recurring {
            frequency,
            end_date,
        } => (frequency, end_date),
        _ => {
            return Ok(vec![draft.materialize(
                ids.next_id(),
                draft.date,
                draft.amount,
                EntryKind::Plain,
            )]);
        }
    };
    if let Some(end) = end_date {
        if end < draft.date {
            return Err(LedgerError::EndBeforeStart {
                start: draft.date,
                end,
            });
        }
    }

    let bound = end_date.map_or(horizon, |end| end.min(horizon));
    let origin_id = ids.next_id();
    let mut rows = vec![draft.materialize(
        origin_id,
        draft.date,
        draft.amount,
        EntryKind::Occurrence {
            frequency,
            end_date,
            parent: None,
        },
    )];

    let mut k = 1u32;
    while let Some(date) = nth_step(draft.date, frequency, k).filter(|d| *d <= bound) {
        rows.push(draft.materialize(
            ids.next_id(),
            date,
            draft.amount,
            EntryKind::Occurrence {
                frequency,
                end_date,
                parent: Some(origin_id),
            },
        ));
        k += 1;
    }
    debug!(
        origin = %origin_id,
        rows = rows.len(),
        frequency = %frequency,
        %bound,
        "expanded recurrence"
    );
    Ok(rows)
}

/// Expands any draft according to its schedule. The origin id is the first
/// id drawn from `ids`.
pub fn expand(
    draft: &TransactionDraft,
    horizon: NaiveDate,
    ids: &mut impl IdSource,
) -> LedgerResult<Vec<Transaction>> {
    match draft.schedule {
        Schedule::Recurring { .. } => expand_recurrence(draft, horizon, ids),
        Schedule::Single | Schedule::Installments { .. } => {
            let origin = ids.next_id();
            expand_installments(draft, origin, ids)
        }
    }
}
