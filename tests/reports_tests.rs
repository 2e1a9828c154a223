// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use parcela::commands::{cards, reports, transactions, wallets};
use parcela::insights::Trend;
use parcela::{cli, db};
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::str::FromStr;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn run(conn: &mut Connection, args: &[&str]) {
    let argv = std::iter::once("parcela").chain(args.iter().copied());
    let matches = cli::build_cli().get_matches_from(argv);
    match matches.subcommand() {
        Some(("tx", sub)) => transactions::handle(conn, sub).unwrap(),
        Some(("card", sub)) => cards::handle(conn, sub).unwrap(),
        Some(("wallet", sub)) => wallets::handle(conn, sub).unwrap(),
        _ => panic!("unexpected command {:?}", args),
    }
}

fn report(args: &[&str]) -> clap::ArgMatches {
    let argv = ["parcela", "report"]
        .into_iter()
        .chain(args.iter().copied());
    let matches = cli::build_cli().get_matches_from(argv);
    match matches.subcommand() {
        Some(("report", report_m)) => match report_m.subcommand() {
            Some((_, sub)) => sub.clone(),
            None => panic!("no report subcommand"),
        },
        _ => panic!("no report command"),
    }
}

/// January: salary, rent, groceries and the first of three TV installments.
fn seeded() -> Connection {
    let mut conn = db::open_in_memory().unwrap();
    db::seed_defaults(&conn).unwrap();
    run(&mut conn, &["card", "add", "Nubank", "--limit", "2000"]);
    for (date, kind, category, amount) in [
        ("2025-01-05", "income", "Salary", "5000"),
        ("2025-01-06", "expense", "Housing", "1500"),
        ("2025-01-07", "expense", "Food", "500"),
    ] {
        run(
            &mut conn,
            &[
                "tx", "add", "--date", date, "--type", kind, "--category", category, "--amount",
                amount, "--description", category,
            ],
        );
    }
    run(
        &mut conn,
        &[
            "tx", "add", "--date", "2025-01-10", "--type", "expense", "--category", "Leisure",
            "--amount", "300", "--description", "TV", "--card", "Nubank", "--installments", "3",
        ],
    );
    conn
}

#[test]
fn month_summary_uses_only_that_months_rows() {
    let conn = seeded();
    let summary = reports::month_summary(&conn, &report(&["month", "--month", "2025-01"])).unwrap();
    assert_eq!(summary.totals.income, dec("5000"));
    assert_eq!(summary.totals.expense, dec("2100"));
    assert_eq!(summary.totals.balance, dec("2900"));
    assert_eq!(summary.totals.savings_rate, dec("0.58"));

    let names: Vec<&str> = summary
        .categories
        .iter()
        .map(|c| c.category.as_str())
        .collect();
    assert_eq!(names, vec!["Housing", "Food", "Leisure"]);
    let total: Decimal = summary.categories.iter().map(|c| c.percentage).sum();
    assert!((total - Decimal::ONE_HUNDRED).abs() < dec("0.0001"));

    assert_eq!(summary.card_exposure.len(), 1);
    assert_eq!(summary.card_exposure[0].amount, dec("100"));
}

#[test]
fn month_without_income_has_zero_savings_rate() {
    let conn = seeded();
    let summary = reports::month_summary(&conn, &report(&["month", "--month", "2025-02"])).unwrap();
    assert_eq!(summary.totals.income, Decimal::ZERO);
    assert_eq!(summary.totals.expense, dec("100"));
    assert_eq!(summary.totals.savings_rate, Decimal::ZERO);
}

#[test]
fn month_summary_is_scoped_to_wallet() {
    let mut conn = seeded();
    run(&mut conn, &["wallet", "add", "Casa"]);
    run(
        &mut conn,
        &[
            "tx", "add", "--date", "2025-01-08", "--wallet", "Casa", "--type", "expense",
            "--category", "Food", "--amount", "45", "--description", "Bakery",
        ],
    );

    let main = reports::month_summary(&conn, &report(&["month", "--month", "2025-01"])).unwrap();
    assert_eq!(main.totals.expense, dec("2100"));
    let casa = reports::month_summary(
        &conn,
        &report(&["month", "--month", "2025-01", "--wallet", "Casa"]),
    )
    .unwrap();
    assert_eq!(casa.totals.expense, dec("45"));
    assert_eq!(casa.totals.income, Decimal::ZERO);
}

#[test]
fn trend_covers_requested_window() {
    let conn = seeded();
    let rows =
        reports::trend_rows(&conn, &report(&["trend", "--months", "4", "--end", "2025-04"])).unwrap();
    let months: Vec<String> = rows.iter().map(|m| m.month.to_string()).collect();
    assert_eq!(months, vec!["2025-01", "2025-02", "2025-03", "2025-04"]);
    let expenses: Vec<Decimal> = rows.iter().map(|m| m.expense).collect();
    assert_eq!(
        expenses,
        vec![dec("2100"), dec("100"), dec("100"), Decimal::ZERO]
    );
}

#[test]
fn card_report_reads_materialized_rows() {
    let conn = seeded();
    let all = reports::card_rows(&conn, &report(&["cards"])).unwrap();
    let got: Vec<(&str, &str, &str)> = all
        .iter()
        .map(|r| (r.card.as_str(), r.month.as_str(), r.amount.as_str()))
        .collect();
    assert_eq!(
        got,
        vec![
            ("Nubank", "2025-01", "100.00"),
            ("Nubank", "2025-02", "100.00"),
            ("Nubank", "2025-03", "100.00"),
        ]
    );

    let feb = reports::card_rows(&conn, &report(&["cards", "--month", "2025-02"])).unwrap();
    assert_eq!(feb.len(), 1);
    assert_eq!(feb[0].amount, "100.00");
}

#[test]
fn card_usage_per_month() {
    let conn = seeded();
    let usage = cards::usage_rows(&conn, "2025-03".parse().unwrap()).unwrap();
    assert_eq!(usage.len(), 1);
    assert_eq!(usage[0].used, dec("100"));
    assert_eq!(usage[0].available, dec("1900"));
}

#[test]
fn insights_compare_last_two_months() {
    let conn = seeded();
    let i = reports::insight_for(
        &conn,
        &report(&["insights", "--metric", "expense", "--months", "2", "--end", "2025-02"]),
    )
    .unwrap();
    assert_eq!(i.current, dec("100"));
    assert_eq!(i.previous, dec("2100"));
    assert_eq!(i.trend, Trend::Down);
    assert_eq!(i.max, dec("2100"));
    assert_eq!(i.average, dec("1100"));

    let err = reports::insight_for(
        &conn,
        &report(&["insights", "--months", "0", "--end", "2025-02"]),
    );
    assert!(err.is_err());
}
