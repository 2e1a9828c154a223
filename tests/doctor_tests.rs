// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use parcela::commands::{doctor, transactions};
use parcela::{cli, db};
use rusqlite::Connection;

fn setup_with_purchase() -> Connection {
    let mut conn = db::open_in_memory().unwrap();
    db::seed_defaults(&conn).unwrap();
    conn.execute(
        "INSERT INTO cards(name, limit_amount) VALUES ('Nubank', '500')",
        [],
    )
    .unwrap();
    let matches = cli::build_cli().get_matches_from([
        "parcela",
        "tx",
        "add",
        "--date",
        "2025-01-10",
        "--type",
        "expense",
        "--category",
        "Leisure",
        "--amount",
        "300",
        "--description",
        "TV",
        "--card",
        "Nubank",
        "--installments",
        "3",
    ]);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        transactions::handle(&mut conn, tx_m).unwrap();
    } else {
        panic!("no tx subcommand");
    }
    conn
}

fn kinds(rows: &[(String, String)]) -> Vec<&str> {
    rows.iter().map(|(k, _)| k.as_str()).collect()
}

#[test]
fn clean_ledger_has_no_issues() {
    let conn = setup_with_purchase();
    assert!(doctor::diagnose(&conn).unwrap().is_empty());
}

#[test]
fn deleting_the_origin_orphans_later_installments() {
    let conn = setup_with_purchase();
    assert!(db::delete_transaction(&conn, parcela::models::TransactionId(1)).unwrap());
    assert_eq!(db::load_ledger(&conn).unwrap().len(), 2);

    let rows = doctor::diagnose(&conn).unwrap();
    assert_eq!(kinds(&rows), vec!["orphaned_series_row", "orphaned_series_row"]);
    assert!(rows[0].1.contains("#1"));
}

#[test]
fn removed_category_and_lowered_limit_are_reported() {
    let conn = setup_with_purchase();
    conn.execute(
        "DELETE FROM categories WHERE kind='expense' AND name='Leisure'",
        [],
    )
    .unwrap();
    conn.execute("UPDATE cards SET limit_amount='50' WHERE name='Nubank'", [])
        .unwrap();

    let rows = doctor::diagnose(&conn).unwrap();
    assert_eq!(
        kinds(&rows),
        vec![
            "unknown_category",
            "card_over_limit",
            "card_over_limit",
            "card_over_limit",
        ]
    );
    assert!(rows[0].1.contains("Leisure"));
    assert!(rows[1].1.contains("2025-01"));
}
