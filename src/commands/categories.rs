// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::load_categories;
use crate::models::TransactionType;
use crate::utils::pretty_table;
use anyhow::{Result, anyhow};
use rusqlite::{Connection, params};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let kind: TransactionType = sub.get_one::<String>("type").unwrap().parse()?;
            let name = sub.get_one::<String>("name").unwrap().trim();
            if name.is_empty() {
                return Err(anyhow!("Category name must not be empty"));
            }
            if load_categories(conn)?.contains(kind, name) {
                return Err(anyhow!("Category '{}' already exists for {}", name, kind));
            }
            conn.execute(
                "INSERT INTO categories(kind, name) VALUES (?1, ?2)",
                params![kind.as_str(), name],
            )?;
            println!("Added {} category '{}'", kind, name);
        }
        Some(("list", sub)) => {
            let set = load_categories(conn)?;
            let kinds = match sub.get_one::<String>("type") {
                Some(t) => vec![t.parse::<TransactionType>()?],
                None => vec![TransactionType::Income, TransactionType::Expense],
            };
            let mut data = Vec::new();
            for kind in kinds {
                for name in set.names(kind) {
                    data.push(vec![kind.to_string(), name.clone()]);
                }
            }
            println!("{}", pretty_table(&["Type", "Category"], data));
        }
        Some(("rm", sub)) => {
            let kind: TransactionType = sub.get_one::<String>("type").unwrap().parse()?;
            let name = sub.get_one::<String>("name").unwrap();
            // Rows keep the category name they were recorded with.
            let n = conn.execute(
                "DELETE FROM categories WHERE kind=?1 AND name=?2",
                params![kind.as_str(), name],
            )?;
            if n == 0 {
                return Err(anyhow!("Category '{}' not found for {}", name, kind));
            }
            println!("Removed {} category '{}'", kind, name);
        }
        _ => {}
    }
    Ok(())
}
