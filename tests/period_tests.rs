// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use parcela::models::{
    Amount, EntryKind, Transaction, TransactionId, TransactionType, WalletId,
};
use parcela::period::{TransactionFilter, YearMonth, select_month, select_month_all_wallets};
use rust_decimal::Decimal;

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn row(id: i64, date: &str, wallet: i64, kind: TransactionType, category: &str) -> Transaction {
    Transaction {
        id: TransactionId(id),
        r#type: kind,
        category: category.into(),
        amount: Amount::new(Decimal::from(10)).unwrap(),
        description: format!("row {}", id),
        date: d(date),
        wallet: WalletId(wallet),
        card: None,
        entry: EntryKind::Plain,
    }
}

#[test]
fn month_bounds_include_last_day() {
    let ledger = vec![
        row(1, "2025-01-31", 1, TransactionType::Expense, "Food"),
        row(2, "2025-02-01", 1, TransactionType::Expense, "Food"),
        row(3, "2025-01-01", 1, TransactionType::Income, "Salary"),
        row(4, "2024-12-31", 1, TransactionType::Expense, "Food"),
    ];
    let jan = YearMonth::new(2025, 1).unwrap();
    let ids: Vec<i64> = select_month(&ledger, WalletId(1), jan)
        .iter()
        .map(|t| t.id.0)
        .collect();
    assert_eq!(ids, vec![1, 3]);
}

#[test]
fn february_last_day_follows_leap_years() {
    assert_eq!(YearMonth::new(2024, 2).unwrap().last_day(), d("2024-02-29"));
    assert_eq!(YearMonth::new(2025, 2).unwrap().last_day(), d("2025-02-28"));
    assert_eq!(YearMonth::new(1900, 2).unwrap().last_day(), d("1900-02-28"));
    assert_eq!(YearMonth::new(2000, 2).unwrap().last_day(), d("2000-02-29"));
    assert_eq!(YearMonth::new(2025, 12).unwrap().last_day(), d("2025-12-31"));

    let ledger = vec![row(1, "2024-02-29", 1, TransactionType::Expense, "Food")];
    let feb = YearMonth::new(2024, 2).unwrap();
    assert_eq!(select_month(&ledger, WalletId(1), feb).len(), 1);
}

#[test]
fn selection_is_scoped_to_wallet() {
    let ledger = vec![
        row(1, "2025-03-10", 1, TransactionType::Expense, "Food"),
        row(2, "2025-03-11", 2, TransactionType::Expense, "Food"),
    ];
    let mar = YearMonth::new(2025, 3).unwrap();
    assert_eq!(select_month(&ledger, WalletId(2), mar).len(), 1);
    assert_eq!(select_month(&ledger, WalletId(3), mar).len(), 0);
    assert_eq!(select_month_all_wallets(&ledger, mar).len(), 2);
}

#[test]
fn year_month_parses_and_steps() {
    let ym: YearMonth = "2025-12".parse().unwrap();
    assert_eq!(ym.to_string(), "2025-12");
    assert_eq!(ym.succ().unwrap().to_string(), "2026-01");
    assert_eq!(ym.offset(-12).unwrap().to_string(), "2024-12");
    assert_eq!(YearMonth::of(d("2025-07-19")).to_string(), "2025-07");
    assert!("2025-13".parse::<YearMonth>().is_err());
    assert!(YearMonth::new(2025, 0).is_err());
}

#[test]
fn filter_narrows_by_type_and_category() {
    let ledger = vec![
        row(1, "2025-03-10", 1, TransactionType::Expense, "Food"),
        row(2, "2025-03-11", 1, TransactionType::Expense, "Transport"),
        row(3, "2025-03-12", 1, TransactionType::Income, "Salary"),
    ];
    let all: Vec<&Transaction> = ledger.iter().collect();

    let expenses = TransactionFilter {
        r#type: Some(TransactionType::Expense),
        category: None,
    };
    assert_eq!(expenses.apply(all.clone()).len(), 2);

    let food = TransactionFilter {
        r#type: None,
        category: Some("Food".into()),
    };
    assert_eq!(food.apply(all.clone())[0].id, TransactionId(1));

    assert_eq!(TransactionFilter::default().apply(all).len(), 3);
}
