// Copyright (c) 2025 Casabook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use casabook::{cli, commands::exporter};
use rusqlite::Connection;
use serde_json::json;
use tempfile::tempdir;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    casabook::db::init_schema(&mut conn).unwrap();
    conn.execute(
        "INSERT INTO categories(id,name,kind) VALUES (1,'Groceries','expense')",
        [],
    )
    .unwrap();
    conn
}

fn run_export(conn: &Connection, fmt: &str, out: &str) -> anyhow::Result<()> {
    let matches = cli::build_cli().get_matches_from([
        "casabook",
        "export",
        "transactions",
        "--format",
        fmt,
        "--out",
        out,
    ]);
    if let Some(("export", export_m)) = matches.subcommand() {
        exporter::handle(conn, export_m)
    } else {
        panic!("no export subcommand");
    }
}

#[test]
fn export_transactions_as_pretty_json() {
    let conn = setup();
    conn.execute(
        "INSERT INTO transactions(date,description,amount,kind,category_id) VALUES \
        ('2025-01-02','Corner Shop','12.34','expense',1)",
        [],
    )
    .unwrap();

    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.json");
    let out_str = out_path.to_string_lossy().to_string();

    run_export(&conn, "json", &out_str).unwrap();

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(
        parsed,
        json!([
            {
                "date": "2025-01-02",
                "description": "Corner Shop",
                "amount": "12.34",
                "kind": "expense",
                "category": "Groceries",
                "series_id": null
            }
        ])
    );
}

#[test]
fn export_transactions_rejects_unknown_format() {
    let conn = setup();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.unknown");
    let out_str = out_path.to_string_lossy().to_string();

    assert!(run_export(&conn, "xml", &out_str).is_err());
    assert!(!out_path.exists());
}

#[test]
fn export_transactions_as_csv_includes_series_column() {
    let conn = setup();
    conn.execute(
        "INSERT INTO transactions(date,description,amount,kind,category_id,is_recurring,recurrence_frequency,series_id) VALUES \
        ('2025-01-10','Rent','1200','expense',1,1,'monthly','abc-123')",
        [],
    )
    .unwrap();

    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.csv");
    let out_str = out_path.to_string_lossy().to_string();

    run_export(&conn, "csv", &out_str).unwrap();

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let mut lines = contents.lines();
    assert_eq!(
        lines.next().unwrap(),
        "date,description,amount,kind,category,series_id"
    );
    assert_eq!(
        lines.next().unwrap(),
        "2025-01-10,Rent,1200,expense,Groceries,abc-123"
    );
}
