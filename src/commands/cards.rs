// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::{CardUsage, card_usage};
use crate::db::{load_cards, load_ledger};
use crate::models::Amount;
use crate::period::YearMonth;
use crate::settings::Settings;
use crate::utils::{
    card_by_name, fmt_money, maybe_print_json, parse_decimal, parse_month, pretty_table, today,
};
use anyhow::{Result, anyhow};
use rusqlite::{Connection, params};
use tracing::info;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            remove(conn, name)?;
            println!("Removed card '{}'", name);
        }
        Some(("usage", sub)) => usage(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap().trim();
    if name.is_empty() {
        return Err(anyhow!("Card name must not be empty"));
    }
    let limit = Amount::new(parse_decimal(sub.get_one::<String>("limit").unwrap())?)?;
    conn.execute(
        "INSERT INTO cards(name, limit_amount) VALUES (?1, ?2)",
        params![name, limit.value().to_string()],
    )?;
    info!(card = name, %limit, "card added");
    println!("Added card '{}' with limit {}", name, limit);
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let cards = load_cards(conn)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &cards)? {
        let symbol = Settings::load(conn)?.currency_symbol;
        let rows = cards
            .iter()
            .map(|c| vec![c.name.clone(), fmt_money(&c.limit.value(), &symbol)])
            .collect();
        println!("{}", pretty_table(&["Card", "Limit"], rows));
    }
    Ok(())
}

fn remove(conn: &Connection, name: &str) -> Result<()> {
    let card = card_by_name(conn, name)?;
    let used: i64 = conn.query_row(
        "SELECT COUNT(*) FROM transactions WHERE card_id=?1",
        params![card.id.0],
        |r| r.get(0),
    )?;
    if used > 0 {
        return Err(anyhow!(
            "Card '{}' is referenced by {} transactions; delete them first",
            name,
            used
        ));
    }
    conn.execute("DELETE FROM cards WHERE id=?1", params![card.id.0])?;
    info!(card = name, "card removed");
    Ok(())
}

pub fn usage_rows(conn: &Connection, month: YearMonth) -> Result<Vec<CardUsage>> {
    let ledger = load_ledger(conn)?;
    Ok(load_cards(conn)?
        .iter()
        .map(|card| card_usage(card, &ledger, month))
        .collect())
}

fn usage(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let month = match sub.get_one::<String>("month") {
        Some(s) => parse_month(s)?,
        None => YearMonth::of(today()),
    };
    let data = usage_rows(conn, month)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let symbol = Settings::load(conn)?.currency_symbol;
        let rows = data
            .iter()
            .map(|u| {
                vec![
                    u.name.clone(),
                    fmt_money(&u.limit, &symbol),
                    fmt_money(&u.used, &symbol),
                    fmt_money(&u.available, &symbol),
                ]
            })
            .collect();
        println!("Card usage for {}", month);
        println!(
            "{}",
            pretty_table(&["Card", "Limit", "Used", "Available"], rows)
        );
    }
    Ok(())
}
