// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use parcela::commands::{exporter, transactions};
use parcela::{cli, db};
use rusqlite::Connection;
use serde_json::Value;
use tempfile::tempdir;

fn base_conn() -> Connection {
    let mut conn = db::open_in_memory().unwrap();
    db::seed_defaults(&conn).unwrap();
    let matches = cli::build_cli().get_matches_from([
        "parcela",
        "tx",
        "add",
        "--date",
        "2025-01-31",
        "--type",
        "expense",
        "--category",
        "Leisure",
        "--amount",
        "100",
        "--description",
        "Headphones",
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

fn export(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let argv = ["parcela", "export", "transactions"]
        .into_iter()
        .chain(args.iter().copied());
    let matches = cli::build_cli().get_matches_from(argv);
    match matches.subcommand() {
        Some(("export", export_m)) => exporter::handle(conn, export_m),
        _ => panic!("no export subcommand"),
    }
}

#[test]
fn export_transactions_writes_csv_rows() {
    let conn = base_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.csv");
    let out_str = out_path.to_string_lossy().to_string();

    export(&conn, &["--out", &out_str]).unwrap();

    let mut rdr = csv::Reader::from_path(&out_path).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(&headers[0], "id");
    assert_eq!(&headers[11], "parent_id");

    let records: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 3);
    assert_eq!(&records[0][1], "2025-01-31");
    assert_eq!(&records[0][6], "33.34");
    assert_eq!(&records[0][11], "");
    assert_eq!(&records[1][1], "2025-02-28");
    assert_eq!(&records[1][8], "2");
    assert_eq!(&records[1][11], "1");
    assert_eq!(&records[2][6], "33.33");
}

#[test]
fn export_transactions_streams_pretty_json() {
    let conn = base_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.json");
    let out_str = out_path.to_string_lossy().to_string();

    export(&conn, &["--format", "json", "--out", &out_str]).unwrap();

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let parsed: Value = serde_json::from_str(&contents).unwrap();
    let items = parsed.as_array().unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[2]["date"], "2025-03-31");
    assert_eq!(items[2]["installment"]["current"], 3);
    assert_eq!(items[2]["installment"]["total"], 3);
    assert_eq!(items[2]["parent_id"], 1);
    assert_eq!(items[0]["parent_id"], Value::Null);
    assert_eq!(items[0]["amount"], "33.34");
}

#[test]
fn export_rejects_unknown_format() {
    let conn = base_conn();
    let dir = tempdir().unwrap();
    let out_str = dir.path().join("x.xml").to_string_lossy().to_string();
    assert!(export(&conn, &["--format", "xml", "--out", &out_str]).is_err());
}

#[test]
fn export_filters_by_wallet() {
    let conn = base_conn();
    conn.execute("INSERT INTO wallets(name) VALUES ('Casa')", [])
        .unwrap();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("casa.json");
    let out_str = out_path.to_string_lossy().to_string();

    export(&conn, &["--format", "json", "--out", &out_str, "--wallet", "Casa"]).unwrap();
    let parsed: Value =
        serde_json::from_str(&std::fs::read_to_string(&out_path).unwrap()).unwrap();
    assert!(parsed.as_array().unwrap().is_empty());
}
