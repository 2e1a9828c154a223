// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::load_wallets;
use crate::utils::{id_for_wallet, maybe_print_json, pretty_table};
use anyhow::{Result, anyhow};
use rusqlite::{Connection, params};
use tracing::info;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            if name.is_empty() {
                return Err(anyhow!("Wallet name must not be empty"));
            }
            conn.execute("INSERT INTO wallets(name) VALUES (?1)", params![name])?;
            info!(wallet = name, "wallet added");
            println!("Added wallet '{}'", name);
        }
        Some(("list", sub)) => {
            let wallets = load_wallets(conn)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &wallets)? {
                let rows = wallets
                    .iter()
                    .map(|w| vec![w.id.to_string(), w.name.clone()])
                    .collect();
                println!("{}", pretty_table(&["ID", "Name"], rows));
            }
        }
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            remove(conn, name)?;
            println!("Removed wallet '{}'", name);
        }
        _ => {}
    }
    Ok(())
}

/// Refuses to drop a wallet that still owns ledger rows.
pub fn remove(conn: &Connection, name: &str) -> Result<()> {
    let id = id_for_wallet(conn, name)?;
    let owned: i64 = conn.query_row(
        "SELECT COUNT(*) FROM transactions WHERE wallet_id=?1",
        params![id.0],
        |r| r.get(0),
    )?;
    if owned > 0 {
        return Err(anyhow!(
            "Wallet '{}' still owns {} transactions; delete them first",
            name,
            owned
        ));
    }
    conn.execute("DELETE FROM wallets WHERE id=?1", params![id.0])?;
    info!(wallet = name, "wallet removed");
    Ok(())
}
