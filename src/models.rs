// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{LedgerError, LedgerResult};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(TransactionId);
id_newtype!(WalletId);
id_newtype!(CardId);

/// A strictly positive amount expressed in whole cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> LedgerResult<Self> {
        if value <= Decimal::ZERO {
            return Err(LedgerError::NonPositiveAmount(value));
        }
        if value.normalize().scale() > 2 {
            return Err(LedgerError::SubCentAmount(value));
        }
        Ok(Amount(value))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = LedgerError;

    fn try_from(value: Decimal) -> LedgerResult<Self> {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(a: Amount) -> Decimal {
        a.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl FromStr for TransactionType {
    type Err = LedgerError;

    fn from_str(s: &str) -> LedgerResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(LedgerError::UnknownTransactionType(other.to_string())),
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Yearly => "yearly",
        }
    }
}

impl FromStr for Frequency {
    type Err = LedgerError;

    fn from_str(s: &str) -> LedgerResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "monthly" => Ok(Frequency::Monthly),
            "yearly" => Ok(Frequency::Yearly),
            other => Err(LedgerError::UnknownFrequency(other.to_string())),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an origin entry expands into ledger rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "schedule", rename_all = "snake_case")]
pub enum Schedule {
    Single,
    Installments {
        count: u32,
    },
    Recurring {
        frequency: Frequency,
        end_date: Option<NaiveDate>,
    },
}

/// Where a materialized row sits within the series it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntryKind {
    Plain,
    Installment {
        current: u32,
        total: u32,
        parent: Option<TransactionId>,
    },
    Occurrence {
        frequency: Frequency,
        end_date: Option<NaiveDate>,
        parent: Option<TransactionId>,
    },
}

/// A user-submitted entry that has not been given an id yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionDraft {
    pub r#type: TransactionType,
    pub category: String,
    pub amount: Amount,
    pub description: String,
    pub date: NaiveDate,
    pub wallet: WalletId,
    pub card: Option<CardId>,
    pub schedule: Schedule,
}

impl TransactionDraft {
    pub(crate) fn materialize(
        &self,
        id: TransactionId,
        date: NaiveDate,
        amount: Amount,
        entry: EntryKind,
    ) -> Transaction {
        Transaction {
            id,
            r#type: self.r#type,
            category: self.category.clone(),
            amount,
            description: self.description.clone(),
            date,
            wallet: self.wallet,
            card: self.card,
            entry,
        }
    }
}

/// A concrete, dated ledger row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub r#type: TransactionType,
    pub category: String,
    pub amount: Amount,
    pub description: String,
    pub date: NaiveDate,
    pub wallet: WalletId,
    pub card: Option<CardId>,
    pub entry: EntryKind,
}

impl Transaction {
    pub fn is_income(&self) -> bool {
        self.r#type == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.r#type == TransactionType::Expense
    }

    /// `(current, total)` when the row belongs to an installment series.
    pub fn installment(&self) -> Option<(u32, u32)> {
        match self.entry {
            EntryKind::Installment { current, total, .. } => Some((current, total)),
            _ => None,
        }
    }

    pub fn is_recurring(&self) -> bool {
        matches!(self.entry, EntryKind::Occurrence { .. })
    }

    pub fn frequency(&self) -> Option<Frequency> {
        match self.entry {
            EntryKind::Occurrence { frequency, .. } => Some(frequency),
            _ => None,
        }
    }

    pub fn parent_id(&self) -> Option<TransactionId> {
        match self.entry {
            EntryKind::Plain => None,
            EntryKind::Installment { parent, .. } | EntryKind::Occurrence { parent, .. } => parent,
        }
    }
}

/// The loose shape an entry arrives in from a form, the CLI or a file.
/// `into_draft` is the validation boundary in front of the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRequest {
    pub r#type: TransactionType,
    pub category: String,
    pub amount: Decimal,
    pub description: String,
    pub date: NaiveDate,
    pub wallet: WalletId,
    pub card: Option<CardId>,
    pub installments: Option<u32>,
    pub recurrence: Option<Frequency>,
    pub recurrence_end: Option<NaiveDate>,
}

impl EntryRequest {
    pub fn into_draft(self) -> LedgerResult<TransactionDraft> {
        let amount = Amount::new(self.amount)?;
        let description = self.description.trim().to_string();
        if description.is_empty() {
            return Err(LedgerError::EmptyDescription);
        }
        if self.card.is_some() && self.r#type == TransactionType::Income {
            return Err(LedgerError::CardOnIncome);
        }
        let installments = match self.installments {
            Some(0) => return Err(LedgerError::InvalidInstallmentCount(0)),
            Some(n) => n,
            None => 1,
        };

        let schedule = match (installments > 1, self.recurrence, self.recurrence_end) {
            (true, None, None) => Schedule::Installments {
                count: installments,
            },
            (true, _, _) => return Err(LedgerError::ConflictingSchedule),
            (false, Some(frequency), end_date) => {
                if let Some(end) = end_date {
                    if end < self.date {
                        return Err(LedgerError::EndBeforeStart {
                            start: self.date,
                            end,
                        });
                    }
                }
                Schedule::Recurring {
                    frequency,
                    end_date,
                }
            }
            (false, None, Some(_)) => return Err(LedgerError::MissingFrequency),
            (false, None, None) => Schedule::Single,
        };

        Ok(TransactionDraft {
            r#type: self.r#type,
            category: self.category.trim().to_string(),
            amount,
            description,
            date: self.date,
            wallet: self.wallet,
            card: self.card,
            schedule,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    pub id: WalletId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditCard {
    pub id: CardId,
    pub name: String,
    pub limit: Amount,
}

/// Category names per transaction type, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySet {
    income: Vec<String>,
    expense: Vec<String>,
}

impl CategorySet {
    pub fn defaults() -> Self {
        let own = |names: &[&str]| names.iter().map(|s| s.to_string()).collect();
        CategorySet {
            income: own(&["Salary", "Freelance", "Investments", "Other"]),
            expense: own(&[
                "Housing",
                "Food",
                "Transport",
                "Leisure",
                "Health",
                "Education",
                "Other",
            ]),
        }
    }

    fn bucket_mut(&mut self, kind: TransactionType) -> &mut Vec<String> {
        match kind {
            TransactionType::Income => &mut self.income,
            TransactionType::Expense => &mut self.expense,
        }
    }

    pub fn names(&self, kind: TransactionType) -> &[String] {
        match kind {
            TransactionType::Income => &self.income,
            TransactionType::Expense => &self.expense,
        }
    }

    pub fn contains(&self, kind: TransactionType, name: &str) -> bool {
        self.names(kind).iter().any(|n| n == name)
    }

    /// Returns false when the name is blank or already present.
    pub fn add(&mut self, kind: TransactionType, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || self.contains(kind, name) {
            return false;
        }
        self.bucket_mut(kind).push(name.to_string());
        true
    }

    pub fn remove(&mut self, kind: TransactionType, name: &str) -> bool {
        let bucket = self.bucket_mut(kind);
        let before = bucket.len();
        bucket.retain(|n| n != name);
        bucket.len() != before
    }
}
