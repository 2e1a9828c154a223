// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::check_card_limit;
use crate::db::{
    delete_transaction, insert_rows, load_cards, load_categories, load_ledger, load_wallets,
    next_transaction_id,
};
use crate::expansion::{SequentialIds, expand};
use crate::models::{
    CreditCard, EntryRequest, Frequency, Transaction, TransactionDraft, TransactionId,
    TransactionType,
};
use crate::period::{TransactionFilter, select_month};
use crate::settings::Settings;
use crate::utils::{
    card_by_name, id_for_wallet, maybe_print_json, parse_date, parse_decimal, parse_month,
    pretty_table, today,
};
use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use rusqlite::Connection;
use serde::Serialize;
use std::collections::HashMap;
use tracing::info;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => {
            let id = TransactionId(*sub.get_one::<i64>("id").unwrap());
            if !delete_transaction(conn, id)? {
                return Err(anyhow!("Transaction {} not found", id));
            }
            info!(%id, "transaction removed");
            println!("Removed transaction {}", id);
        }
        _ => {}
    }
    Ok(())
}

/// Builds the origin entry described by `tx add` flags, without touching the
/// ledger.
pub fn request_from_matches(
    conn: &Connection,
    sub: &clap::ArgMatches,
) -> Result<(EntryRequest, Option<CreditCard>)> {
    let date = match sub.get_one::<String>("date") {
        Some(s) => parse_date(s)?,
        None => today(),
    };
    let wallet = id_for_wallet(conn, sub.get_one::<String>("wallet").unwrap())?;
    let r#type: TransactionType = sub.get_one::<String>("type").unwrap().parse()?;
    let category = sub.get_one::<String>("category").unwrap().trim().to_string();
    if !load_categories(conn)?.contains(r#type, &category) {
        return Err(anyhow!(
            "Category '{}' is not a known {} category",
            category,
            r#type
        ));
    }
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let card = sub
        .get_one::<String>("card")
        .map(|name| card_by_name(conn, name))
        .transpose()?;
    let recurrence = sub
        .get_one::<String>("recurring")
        .map(|s| s.parse::<Frequency>())
        .transpose()?;
    let recurrence_end = sub
        .get_one::<String>("until")
        .map(|s| parse_date(s))
        .transpose()?;

    let request = EntryRequest {
        r#type,
        category,
        amount,
        description: sub.get_one::<String>("description").unwrap().to_string(),
        date,
        wallet,
        card: card.as_ref().map(|c| c.id),
        installments: sub.get_one::<u32>("installments").copied(),
        recurrence,
        recurrence_end,
    };
    Ok((request, card))
}

/// Expands `draft` and appends its rows in one SQL transaction, after
/// checking the card limit for every month the rows touch.
pub fn record(
    conn: &mut Connection,
    draft: &TransactionDraft,
    card: Option<&CreditCard>,
    horizon: NaiveDate,
) -> Result<Vec<Transaction>> {
    let tx = conn.transaction()?;
    let mut ids = SequentialIds::starting_at(next_transaction_id(&tx)?);
    let rows = expand(draft, horizon, &mut ids)?;
    if let Some(card) = card {
        let ledger = load_ledger(&tx)?;
        check_card_limit(card, &ledger, &rows)?;
    }
    insert_rows(&tx, &rows)?;
    tx.commit()?;
    info!(
        origin = %rows[0].id,
        rows = rows.len(),
        "recorded transaction"
    );
    Ok(rows)
}

fn add(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (request, card) = request_from_matches(conn, sub)?;
    let draft = request.into_draft()?;
    let horizon = match sub.get_one::<String>("horizon") {
        Some(s) => parse_date(s)?,
        None => Settings::load(conn)?.horizon_from(today())?,
    };
    let rows = record(conn, &draft, card.as_ref(), horizon)?;

    let first = &rows[0];
    let last = &rows[rows.len() - 1];
    if rows.len() == 1 {
        println!(
            "Recorded #{} {} {} on {} ({})",
            first.id, first.r#type, first.amount, first.date, first.description
        );
    } else {
        println!(
            "Recorded #{} {} {} as {} entries from {} to {} ({})",
            first.id,
            first.r#type,
            draft.amount,
            rows.len(),
            first.date,
            last.date,
            first.description
        );
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub date: String,
    pub wallet: String,
    pub r#type: String,
    pub category: String,
    pub description: String,
    pub amount: String,
    pub card: String,
    pub series: String,
}

fn series_label(t: &Transaction) -> String {
    if let Some((current, total)) = t.installment() {
        format!("{}/{}", current, total)
    } else if let Some(f) = t.frequency() {
        f.to_string()
    } else {
        String::new()
    }
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let ledger = load_ledger(conn)?;
    let wallet = id_for_wallet(conn, sub.get_one::<String>("wallet").unwrap())?;
    let selected: Vec<&Transaction> = match sub.get_one::<String>("month") {
        Some(month) => select_month(&ledger, wallet, parse_month(month)?),
        None => ledger.iter().filter(|t| t.wallet == wallet).collect(),
    };
    let filter = TransactionFilter {
        r#type: sub
            .get_one::<String>("type")
            .map(|s| s.parse())
            .transpose()?,
        category: sub.get_one::<String>("category").cloned(),
    };
    let mut selected = filter.apply(selected);
    selected.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)));
    if let Some(limit) = sub.get_one::<usize>("limit") {
        selected.truncate(*limit);
    }

    let wallets: HashMap<_, _> = load_wallets(conn)?
        .into_iter()
        .map(|w| (w.id, w.name))
        .collect();
    let cards: HashMap<_, _> = load_cards(conn)?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();

    Ok(selected
        .into_iter()
        .map(|t| TransactionRow {
            id: t.id.0,
            date: t.date.to_string(),
            wallet: wallets.get(&t.wallet).cloned().unwrap_or_default(),
            r#type: t.r#type.to_string(),
            category: t.category.clone(),
            description: t.description.clone(),
            amount: t.amount.to_string(),
            card: t
                .card
                .and_then(|c| cards.get(&c).cloned())
                .unwrap_or_default(),
            series: series_label(t),
        })
        .collect())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.clone(),
                    r.r#type.clone(),
                    r.category.clone(),
                    r.description.clone(),
                    r.amount.clone(),
                    r.card.clone(),
                    r.series.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Type", "Category", "Description", "Amount", "Card", "Series"],
                rows,
            )
        );
    }
    Ok(())
}
