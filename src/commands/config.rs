// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::settings::{Settings, set_setting};
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => {
            let s = Settings::load(conn)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &s)? {
                let rows = vec![
                    vec!["horizon_months".into(), s.horizon_months.to_string()],
                    vec!["trend_months".into(), s.trend_months.to_string()],
                    vec!["currency_symbol".into(), s.currency_symbol.clone()],
                ];
                println!("{}", pretty_table(&["Key", "Value"], rows));
            }
        }
        Some(("set", sub)) => {
            let key = sub.get_one::<String>("key").unwrap().replace('-', "_");
            let value = sub.get_one::<String>("value").unwrap();
            set_setting(conn, &key, value)?;
            info!(%key, %value, "setting changed");
            println!("Set {} = {}", key, value.trim());
        }
        _ => {}
    }
    Ok(())
}
