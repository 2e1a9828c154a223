// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::{MonthlyTotals, Summary, aggregate, card_exposure, trend_series};
use crate::db::{load_cards, load_ledger};
use crate::insights::{Insight, Metric, insight};
use crate::models::Transaction;
use crate::period::{YearMonth, select_month, select_month_all_wallets};
use crate::settings::Settings;
use crate::utils::{
    fmt_money, fmt_pct, id_for_wallet, maybe_print_json, parse_month, pretty_table, today,
};
use anyhow::{Result, anyhow};
use rusqlite::Connection;
use serde::Serialize;
use std::collections::HashMap;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("month", sub)) => month(conn, sub)?,
        Some(("trend", sub)) => trend(conn, sub)?,
        Some(("cards", sub)) => cards(conn, sub)?,
        Some(("insights", sub)) => insights(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn month_or_current(sub: &clap::ArgMatches, id: &str) -> Result<YearMonth> {
    match sub.get_one::<String>(id) {
        Some(s) => parse_month(s),
        None => Ok(YearMonth::of(today())),
    }
}

fn card_names(conn: &Connection) -> Result<HashMap<crate::models::CardId, String>> {
    Ok(load_cards(conn)?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect())
}

pub fn month_summary(conn: &Connection, sub: &clap::ArgMatches) -> Result<Summary> {
    let ledger = load_ledger(conn)?;
    let wallet = id_for_wallet(conn, sub.get_one::<String>("wallet").unwrap())?;
    let month = month_or_current(sub, "month")?;
    Ok(aggregate(select_month(&ledger, wallet, month)))
}

fn month(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let summary = month_summary(conn, sub)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &summary)? {
        return Ok(());
    }
    let symbol = Settings::load(conn)?.currency_symbol;
    let t = &summary.totals;
    println!(
        "{}",
        pretty_table(
            &["Income", "Expense", "Balance", "Savings"],
            vec![vec![
                fmt_money(&t.income, &symbol),
                fmt_money(&t.expense, &symbol),
                fmt_money(&t.balance, &symbol),
                fmt_pct(&t.savings_pct()),
            ]],
        )
    );

    let cats = summary
        .categories
        .iter()
        .map(|c| {
            vec![
                c.category.clone(),
                fmt_money(&c.amount, &symbol),
                fmt_pct(&c.percentage),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Category", "Spent", "Share"], cats));

    if !summary.card_exposure.is_empty() {
        let names = card_names(conn)?;
        let rows = summary
            .card_exposure
            .iter()
            .map(|e| {
                vec![
                    names.get(&e.card).cloned().unwrap_or_else(|| e.card.to_string()),
                    fmt_money(&e.amount, &symbol),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Card", "Billed"], rows));
    }
    Ok(())
}

pub fn trend_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<MonthlyTotals>> {
    let ledger = load_ledger(conn)?;
    let wallet = id_for_wallet(conn, sub.get_one::<String>("wallet").unwrap())?;
    let months = match sub.get_one::<usize>("months") {
        Some(n) => *n,
        None => Settings::load(conn)?.trend_months as usize,
    };
    let end = month_or_current(sub, "end")?;
    Ok(trend_series(&ledger, wallet, months, end.first_day()).collect())
}

fn trend(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let data = trend_rows(conn, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let symbol = Settings::load(conn)?.currency_symbol;
        let rows = data
            .iter()
            .map(|m| {
                vec![
                    m.month.to_string(),
                    fmt_money(&m.income, &symbol),
                    fmt_money(&m.expense, &symbol),
                    fmt_money(&m.balance, &symbol),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Month", "Income", "Expense", "Balance"], rows)
        );
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct CardMonthRow {
    pub card: String,
    pub month: String,
    pub amount: String,
}

/// Card exposure across every wallet, for one month or the whole ledger.
pub fn card_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<CardMonthRow>> {
    let ledger = load_ledger(conn)?;
    let names = card_names(conn)?;
    let rows: Vec<&Transaction> = match sub.get_one::<String>("month") {
        Some(s) => select_month_all_wallets(&ledger, parse_month(s)?),
        None => ledger.iter().collect(),
    };
    Ok(card_exposure(rows)
        .into_iter()
        .map(|e| CardMonthRow {
            card: names.get(&e.card).cloned().unwrap_or_else(|| e.card.to_string()),
            month: e.month.to_string(),
            amount: format!("{:.2}", e.amount),
        })
        .collect())
}

fn cards(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let data = card_rows(conn, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|r| vec![r.card.clone(), r.month.clone(), r.amount.clone()])
            .collect();
        println!("{}", pretty_table(&["Card", "Month", "Billed"], rows));
    }
    Ok(())
}

pub fn insight_for(conn: &Connection, sub: &clap::ArgMatches) -> Result<Insight> {
    let metric: Metric = sub.get_one::<String>("metric").unwrap().parse()?;
    let series = trend_rows(conn, sub)?;
    insight(metric, &series).ok_or_else(|| anyhow!("No months to analyse; use --months >= 1"))
}

fn insights(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let data = insight_for(conn, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let symbol = Settings::load(conn)?.currency_symbol;
        let show = |v: &rust_decimal::Decimal| match data.metric {
            Metric::Savings => fmt_pct(v),
            _ => fmt_money(v, &symbol),
        };
        println!(
            "{}",
            pretty_table(
                &["Metric", "Month", "Current", "Previous", "Change", "Trend", "Avg", "Max", "Min"],
                vec![vec![
                    data.metric.to_string(),
                    data.month.to_string(),
                    show(&data.current),
                    show(&data.previous),
                    fmt_pct(&data.change_pct),
                    format!("{:?}", data.trend).to_lowercase(),
                    show(&data.average),
                    show(&data.max),
                    show(&data.min),
                ]],
            )
        );
    }
    Ok(())
}
