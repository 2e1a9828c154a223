// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::load_ledger;
use crate::models::Transaction;
use crate::utils::id_for_wallet;
use anyhow::{Context, Result, anyhow};
use rusqlite::Connection;
use serde_json::json;
use tracing::info;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(conn, sub),
        _ => Ok(()),
    }
}

fn export_transactions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();

    let mut ledger = load_ledger(conn)?;
    if let Some(name) = sub.get_one::<String>("wallet") {
        let wallet = id_for_wallet(conn, name)?;
        ledger.retain(|t| t.wallet == wallet);
    }

    match fmt.as_str() {
        "csv" => {
            let mut wtr =
                csv::Writer::from_path(out).with_context(|| format!("Create CSV {}", out))?;
            wtr.write_record([
                "id",
                "date",
                "wallet_id",
                "type",
                "category",
                "description",
                "amount",
                "card_id",
                "current_installment",
                "installments",
                "frequency",
                "parent_id",
            ])?;
            for t in &ledger {
                wtr.write_record(csv_record(t))?;
            }
            wtr.flush()?;
        }
        "json" => {
            let items: Vec<_> = ledger
                .iter()
                .map(|t| {
                    json!({
                        "id": t.id,
                        "date": t.date,
                        "wallet_id": t.wallet,
                        "type": t.r#type,
                        "category": t.category,
                        "description": t.description,
                        "amount": t.amount.to_string(),
                        "card_id": t.card,
                        "installment": t.installment().map(|(c, n)| json!({"current": c, "total": n})),
                        "frequency": t.frequency(),
                        "parent_id": t.parent_id(),
                    })
                })
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        other => {
            return Err(anyhow!("Unknown format: {} (use csv|json)", other));
        }
    }
    info!(rows = ledger.len(), path = %out, "exported ledger");
    println!("Exported {} transactions to {}", ledger.len(), out);
    Ok(())
}

fn csv_record(t: &Transaction) -> Vec<String> {
    let opt = |v: Option<String>| v.unwrap_or_default();
    let (current, total) = match t.installment() {
        Some((c, n)) => (Some(c.to_string()), Some(n.to_string())),
        None => (None, None),
    };
    vec![
        t.id.to_string(),
        t.date.to_string(),
        t.wallet.to_string(),
        t.r#type.to_string(),
        t.category.clone(),
        t.description.clone(),
        t.amount.to_string(),
        opt(t.card.map(|c| c.to_string())),
        opt(current),
        opt(total),
        opt(t.frequency().map(|f| f.to_string())),
        opt(t.parent_id().map(|p| p.to_string())),
    ]
}
