// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::card_exposure;
use crate::db::{load_cards, load_categories, load_ledger};
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;
use std::collections::{BTreeSet, HashSet};

/// Every issue found, as `(kind, detail)` pairs.
pub fn diagnose(conn: &Connection) -> Result<Vec<(String, String)>> {
    let ledger = load_ledger(conn)?;
    let mut rows = Vec::new();

    // 1) Series rows whose origin was deleted. Expected after single-row
    //    deletes, reported so the user knows the series is partial.
    let ids: HashSet<_> = ledger.iter().map(|t| t.id).collect();
    for t in &ledger {
        if let Some(parent) = t.parent_id() {
            if !ids.contains(&parent) {
                rows.push((
                    "orphaned_series_row".into(),
                    format!("#{} points at deleted #{}", t.id, parent),
                ));
            }
        }
    }

    // 2) Categories that no longer exist in the category set
    let categories = load_categories(conn)?;
    let mut unknown = BTreeSet::new();
    for t in &ledger {
        if !categories.contains(t.r#type, &t.category) {
            unknown.insert((t.r#type, t.category.clone()));
        }
    }
    for (kind, name) in unknown {
        rows.push(("unknown_category".into(), format!("{} '{}'", kind, name)));
    }

    // 3) Months where a card carries more than its limit
    let cards = load_cards(conn)?;
    for exposure in card_exposure(&ledger) {
        if let Some(card) = cards.iter().find(|c| c.id == exposure.card) {
            if exposure.amount > card.limit.value() {
                rows.push((
                    "card_over_limit".into(),
                    format!(
                        "{} {}: {:.2} > {}",
                        card.name, exposure.month, exposure.amount, card.limit
                    ),
                ));
            }
        }
    }
    Ok(rows)
}

pub fn handle(conn: &Connection) -> Result<()> {
    let rows = diagnose(conn)?;
    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        let data = rows.into_iter().map(|(k, d)| vec![k, d]).collect();
        println!("{}", pretty_table(&["Issue", "Detail"], data));
    }
    Ok(())
}
