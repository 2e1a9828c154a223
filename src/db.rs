// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{
    Amount, CardId, CategorySet, CreditCard, EntryKind, Transaction, TransactionId,
    TransactionType, Wallet, WalletId,
};
use crate::utils::{parse_date, parse_decimal};
use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{Connection, params};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.alphavelocity", "Parcela", "parcela"));

pub const DB_ENV: &str = "PARCELA_DB";

pub fn db_path() -> Result<PathBuf> {
    if let Ok(p) = std::env::var(DB_ENV) {
        if !p.trim().is_empty() {
            return Ok(PathBuf::from(p));
        }
    }
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("parcela.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let mut conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&mut conn)?;
    debug!(path = %path.display(), "opened ledger database");
    Ok(conn)
}

pub fn open_in_memory() -> Result<Connection> {
    let mut conn = Connection::open_in_memory()?;
    init_schema(&mut conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS wallets(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS cards(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        limit_amount TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS categories(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        kind TEXT NOT NULL CHECK(kind IN ('income','expense')),
        name TEXT NOT NULL,
        UNIQUE(kind, name)
    );

    -- AUTOINCREMENT keeps sqlite_sequence at the highest id ever issued,
    -- so ids of deleted rows are never handed out again.
    CREATE TABLE IF NOT EXISTS transactions(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        type TEXT NOT NULL CHECK(type IN ('income','expense')),
        category TEXT NOT NULL,
        amount TEXT NOT NULL,
        description TEXT NOT NULL,
        date TEXT NOT NULL,
        wallet_id INTEGER NOT NULL,
        card_id INTEGER,
        entry_kind TEXT NOT NULL CHECK(entry_kind IN ('plain','installment','occurrence')),
        current_installment INTEGER,
        installments INTEGER,
        frequency TEXT,
        recurrence_end TEXT,
        parent_id INTEGER,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY(wallet_id) REFERENCES wallets(id),
        FOREIGN KEY(card_id) REFERENCES cards(id)
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);
    CREATE INDEX IF NOT EXISTS idx_transactions_wallet ON transactions(wallet_id);
    "#,
    )?;
    Ok(())
}

/// Seeds the default wallet and categories the first time a database is
/// opened. Later deletions are respected.
pub fn seed_defaults(conn: &Connection) -> Result<()> {
    let seeded: i64 = conn.query_row(
        "SELECT COUNT(*) FROM settings WHERE key='seeded'",
        [],
        |r| r.get(0),
    )?;
    if seeded > 0 {
        return Ok(());
    }
    let wallets: i64 = conn.query_row("SELECT COUNT(*) FROM wallets", [], |r| r.get(0))?;
    if wallets == 0 {
        conn.execute(
            "INSERT INTO wallets(name) VALUES (?1)",
            params![crate::cli::DEFAULT_WALLET],
        )?;
    }
    let categories: i64 = conn.query_row("SELECT COUNT(*) FROM categories", [], |r| r.get(0))?;
    if categories == 0 {
        let defaults = CategorySet::defaults();
        for kind in [TransactionType::Income, TransactionType::Expense] {
            for name in defaults.names(kind) {
                conn.execute(
                    "INSERT INTO categories(kind, name) VALUES (?1, ?2)",
                    params![kind.as_str(), name],
                )?;
            }
        }
    }
    conn.execute("INSERT INTO settings(key, value) VALUES ('seeded', '1')", [])?;
    debug!("seeded default wallet and categories");
    Ok(())
}

pub fn load_wallets(conn: &Connection) -> Result<Vec<Wallet>> {
    let mut stmt = conn.prepare("SELECT id, name FROM wallets ORDER BY id")?;
    let rows = stmt.query_map([], |r| {
        Ok(Wallet {
            id: WalletId(r.get(0)?),
            name: r.get(1)?,
        })
    })?;
    let mut data = Vec::new();
    for row in rows {
        data.push(row?);
    }
    Ok(data)
}

pub fn load_cards(conn: &Connection) -> Result<Vec<CreditCard>> {
    let mut stmt = conn.prepare("SELECT id, name, limit_amount FROM cards ORDER BY name")?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
        ))
    })?;
    let mut data = Vec::new();
    for row in rows {
        let (id, name, limit_s) = row?;
        let limit = Amount::new(parse_decimal(&limit_s)?)
            .with_context(|| format!("Invalid limit '{}' for card {}", limit_s, name))?;
        data.push(CreditCard {
            id: CardId(id),
            name,
            limit,
        });
    }
    Ok(data)
}

pub fn load_categories(conn: &Connection) -> Result<CategorySet> {
    let mut stmt = conn.prepare("SELECT kind, name FROM categories ORDER BY id")?;
    let rows = stmt.query_map([], |r| Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?)))?;
    let mut set = CategorySet::default();
    for row in rows {
        let (kind, name) = row?;
        set.add(kind.parse()?, &name);
    }
    Ok(set)
}

/// A row as stored, before its text columns are parsed.
struct StoredRow {
    id: i64,
    r#type: String,
    category: String,
    amount: String,
    description: String,
    date: String,
    wallet_id: i64,
    card_id: Option<i64>,
    entry_kind: String,
    current_installment: Option<u32>,
    installments: Option<u32>,
    frequency: Option<String>,
    recurrence_end: Option<String>,
    parent_id: Option<i64>,
}

impl StoredRow {
    fn into_transaction(self) -> Result<Transaction> {
        let amount = Amount::new(parse_decimal(&self.amount)?)
            .with_context(|| format!("Invalid amount '{}' on row {}", self.amount, self.id))?;
        let parent = self.parent_id.map(TransactionId);
        let entry = match self.entry_kind.as_str() {
            "plain" => EntryKind::Plain,
            "installment" => EntryKind::Installment {
                current: self
                    .current_installment
                    .with_context(|| format!("Row {} lacks its installment index", self.id))?,
                total: self
                    .installments
                    .with_context(|| format!("Row {} lacks its installment count", self.id))?,
                parent,
            },
            "occurrence" => EntryKind::Occurrence {
                frequency: self
                    .frequency
                    .as_deref()
                    .with_context(|| format!("Row {} lacks its frequency", self.id))?
                    .parse()?,
                end_date: self.recurrence_end.as_deref().map(parse_date).transpose()?,
                parent,
            },
            other => return Err(anyhow!("Unknown entry kind '{}' on row {}", other, self.id)),
        };
        Ok(Transaction {
            id: TransactionId(self.id),
            r#type: self.r#type.parse()?,
            category: self.category,
            amount,
            description: self.description,
            date: parse_date(&self.date)?,
            wallet: WalletId(self.wallet_id),
            card: self.card_id.map(CardId),
            entry,
        })
    }
}

/// The whole ledger ordered by date, then id.
pub fn load_ledger(conn: &Connection) -> Result<Vec<Transaction>> {
    let mut stmt = conn.prepare(
        "SELECT id, type, category, amount, description, date, wallet_id, card_id,
                entry_kind, current_installment, installments, frequency, recurrence_end, parent_id
         FROM transactions ORDER BY date, id",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok(StoredRow {
            id: r.get(0)?,
            r#type: r.get(1)?,
            category: r.get(2)?,
            amount: r.get(3)?,
            description: r.get(4)?,
            date: r.get(5)?,
            wallet_id: r.get(6)?,
            card_id: r.get(7)?,
            entry_kind: r.get(8)?,
            current_installment: r.get(9)?,
            installments: r.get(10)?,
            frequency: r.get(11)?,
            recurrence_end: r.get(12)?,
            parent_id: r.get(13)?,
        })
    })?;
    let mut data = Vec::new();
    for row in rows {
        data.push(row?.into_transaction()?);
    }
    Ok(data)
}

/// First id that has never been issued for a ledger row.
pub fn next_transaction_id(conn: &Connection) -> Result<TransactionId> {
    let next: i64 = conn.query_row(
        "SELECT MAX(
            COALESCE((SELECT seq FROM sqlite_sequence WHERE name='transactions'), 0),
            COALESCE((SELECT MAX(id) FROM transactions), 0)
         ) + 1",
        [],
        |r| r.get(0),
    )?;
    Ok(TransactionId(next))
}

pub fn insert_rows(conn: &Connection, rows: &[Transaction]) -> Result<()> {
    let mut stmt = conn.prepare(
        "INSERT INTO transactions(id, type, category, amount, description, date, wallet_id, card_id,
             entry_kind, current_installment, installments, frequency, recurrence_end, parent_id)
         VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,?14)",
    )?;
    for t in rows {
        let (kind, current, total, frequency, end) = match t.entry {
            EntryKind::Plain => ("plain", None, None, None, None),
            EntryKind::Installment { current, total, .. } => {
                ("installment", Some(current), Some(total), None, None)
            }
            EntryKind::Occurrence {
                frequency,
                end_date,
                ..
            } => (
                "occurrence",
                None,
                None,
                Some(frequency.as_str()),
                end_date.map(|d| d.to_string()),
            ),
        };
        stmt.execute(params![
            t.id.0,
            t.r#type.as_str(),
            t.category,
            t.amount.value().to_string(),
            t.description,
            t.date.to_string(),
            t.wallet.0,
            t.card.map(|c| c.0),
            kind,
            current,
            total,
            frequency,
            end,
            t.parent_id().map(|p| p.0),
        ])
        .with_context(|| format!("Insert ledger row {}", t.id))?;
    }
    debug!(rows = rows.len(), "inserted ledger rows");
    Ok(())
}

/// Removes one row. Other rows of the same series stay untouched.
pub fn delete_transaction(conn: &Connection, id: TransactionId) -> Result<bool> {
    let n = conn.execute("DELETE FROM transactions WHERE id=?1", params![id.0])?;
    Ok(n > 0)
}
