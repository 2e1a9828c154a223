// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use parcela::commands::{config, reports};
use parcela::settings::{Settings, get_setting, set_setting};
use parcela::{cli, db};
use rusqlite::Connection;

fn setup() -> Connection {
    let conn = db::open_in_memory().unwrap();
    db::seed_defaults(&conn).unwrap();
    conn
}

fn config_set(conn: &Connection, key: &str, value: &str) -> anyhow::Result<()> {
    let matches = cli::build_cli().get_matches_from(["parcela", "config", "set", key, value]);
    match matches.subcommand() {
        Some(("config", config_m)) => config::handle(conn, config_m),
        _ => panic!("no config subcommand"),
    }
}

#[test]
fn defaults_apply_when_nothing_is_stored() {
    let conn = setup();
    let s = Settings::load(&conn).unwrap();
    assert_eq!(s, Settings::default());
    assert_eq!(s.horizon_months, 12);
    assert_eq!(s.trend_months, 6);
    assert_eq!(s.currency_symbol, "R$");
}

#[test]
fn set_accepts_dashed_keys() {
    let conn = setup();
    config_set(&conn, "horizon-months", "24").unwrap();
    config_set(&conn, "currency_symbol", " US$ ").unwrap();

    let s = Settings::load(&conn).unwrap();
    assert_eq!(s.horizon_months, 24);
    assert_eq!(s.currency_symbol, "US$");
    assert_eq!(
        get_setting(&conn, "horizon_months").unwrap().as_deref(),
        Some("24")
    );
}

#[test]
fn invalid_values_are_refused() {
    let conn = setup();
    assert!(set_setting(&conn, "horizon_months", "0").is_err());
    assert!(set_setting(&conn, "trend_months", "six").is_err());
    assert!(set_setting(&conn, "currency_symbol", "  ").is_err());
    assert!(config_set(&conn, "theme", "dark").is_err());
    assert_eq!(Settings::load(&conn).unwrap(), Settings::default());
}

#[test]
fn horizon_counts_months_from_today() {
    let s = Settings {
        horizon_months: 1,
        ..Settings::default()
    };
    let today = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
    assert_eq!(
        s.horizon_from(today).unwrap(),
        NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()
    );
}

#[test]
fn trend_window_defaults_to_setting() {
    let conn = setup();
    set_setting(&conn, "trend_months", "3").unwrap();
    let matches =
        cli::build_cli().get_matches_from(["parcela", "report", "trend", "--end", "2025-06"]);
    let Some(("report", report_m)) = matches.subcommand() else {
        panic!("no report subcommand");
    };
    let Some(("trend", trend_m)) = report_m.subcommand() else {
        panic!("no trend subcommand");
    };
    let rows = reports::trend_rows(&conn, trend_m).unwrap();
    let months: Vec<String> = rows.iter().map(|m| m.month.to_string()).collect();
    assert_eq!(months, vec!["2025-04", "2025-05", "2025-06"]);
}
