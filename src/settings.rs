// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::expansion::add_months_clamped;
use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;

pub const HORIZON_MONTHS: &str = "horizon_months";
pub const TREND_MONTHS: &str = "trend_months";
pub const CURRENCY_SYMBOL: &str = "currency_symbol";

pub const KNOWN_KEYS: [&str; 3] = [HORIZON_MONTHS, TREND_MONTHS, CURRENCY_SYMBOL];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    /// How far ahead recurring entries are materialized.
    pub horizon_months: u32,
    /// Window of the trend report.
    pub trend_months: u32,
    pub currency_symbol: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            horizon_months: 12,
            trend_months: 6,
            currency_symbol: "R$".to_string(),
        }
    }
}

impl Settings {
    pub fn load(conn: &Connection) -> Result<Self> {
        let defaults = Settings::default();
        let horizon_months = match get_setting(conn, HORIZON_MONTHS)? {
            Some(v) => parse_months(HORIZON_MONTHS, &v)?,
            None => defaults.horizon_months,
        };
        let trend_months = match get_setting(conn, TREND_MONTHS)? {
            Some(v) => parse_months(TREND_MONTHS, &v)?,
            None => defaults.trend_months,
        };
        let currency_symbol =
            get_setting(conn, CURRENCY_SYMBOL)?.unwrap_or(defaults.currency_symbol);
        Ok(Settings {
            horizon_months,
            trend_months,
            currency_symbol,
        })
    }

    /// The last date recurring entries may be materialized for, counted from
    /// `today`.
    pub fn horizon_from(&self, today: NaiveDate) -> Result<NaiveDate> {
        Ok(add_months_clamped(today, self.horizon_months)?)
    }
}

fn parse_months(key: &str, v: &str) -> Result<u32> {
    let n = v
        .trim()
        .parse::<u32>()
        .with_context(|| format!("Setting {} must be a whole number of months, got '{}'", key, v))?;
    if n == 0 {
        return Err(anyhow!("Setting {} must be at least 1", key));
    }
    Ok(n)
}

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row("SELECT value FROM settings WHERE key=?1", params![key], |r| {
            r.get(0)
        })
        .optional()?;
    Ok(v)
}

/// Validates and stores one setting.
pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    let value = value.trim();
    match key {
        HORIZON_MONTHS | TREND_MONTHS => {
            parse_months(key, value)?;
        }
        CURRENCY_SYMBOL => {
            if value.is_empty() {
                return Err(anyhow!("Setting {} must not be empty", key));
            }
        }
        _ => {
            return Err(anyhow!(
                "Unknown setting '{}' (known: {})",
                key,
                KNOWN_KEYS.join(", ")
            ));
        }
    }
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}
