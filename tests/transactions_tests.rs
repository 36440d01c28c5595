// Copyright (c) 2025 Casabook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use casabook::{cli, commands::transactions};
use rusqlite::{params, Connection};

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

fn run_tx(conn: &mut Connection, args: &[&str]) {
    let mut argv = vec!["casabook"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        transactions::handle(conn, tx_m).unwrap();
    } else {
        panic!("no tx subcommand");
    }
}

#[test]
fn list_limit_respected() {
    let mut conn = setup();
    for i in 1..=3 {
        conn.execute(
            "INSERT INTO transactions(date,description,amount,kind,category_id) VALUES (?1,'P','10','expense',1)",
            params![format!("2025-01-0{}", i)],
        )
        .unwrap();
    }

    let matches = cli::build_cli().get_matches_from(["casabook", "tx", "list", "--limit", "2"]);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = tx_m.subcommand() {
            let rows = transactions::query_rows(&conn, list_m).unwrap();
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[0].date, "2025-01-03");
        } else {
            panic!("no list subcommand");
        }
    } else {
        panic!("no tx subcommand");
    }
}

#[test]
fn add_recurring_expands_a_monthly_series() {
    let mut conn = setup();
    run_tx(
        &mut conn,
        &[
            "tx", "add", "--date", "2025-01-10", "--description", "Rent", "--amount", "1200",
            "--kind", "expense", "--category", "Groceries", "--recurring", "--until", "2025-06-10",
        ],
    );

    let (count, series_count): (i64, i64) = conn
        .query_row(
            "SELECT COUNT(*), COUNT(DISTINCT series_id) FROM transactions WHERE is_recurring=1",
            [],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .unwrap();
    assert_eq!(count, 6);
    assert_eq!(series_count, 1);
}

#[test]
fn list_filters_by_series() {
    let mut conn = setup();
    run_tx(
        &mut conn,
        &[
            "tx", "add", "--date", "2025-01-10", "--description", "Rent", "--amount", "1200",
            "--kind", "expense", "--recurring", "--until", "2025-03-10",
        ],
    );
    run_tx(
        &mut conn,
        &[
            "tx", "add", "--date", "2025-01-20", "--description", "One-off", "--amount", "42",
            "--kind", "expense",
        ],
    );
    let series_id: String = conn
        .query_row(
            "SELECT series_id FROM transactions WHERE series_id IS NOT NULL LIMIT 1",
            [],
            |r| r.get(0),
        )
        .unwrap();

    let matches =
        cli::build_cli().get_matches_from(["casabook", "tx", "list", "--series", &series_id]);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = tx_m.subcommand() {
            let rows = transactions::query_rows(&conn, list_m).unwrap();
            assert_eq!(rows.len(), 3);
            assert!(rows.iter().all(|r| r.series_id == series_id));
        } else {
            panic!("no list subcommand");
        }
    } else {
        panic!("no tx subcommand");
    }
}

#[test]
fn edit_one_occurrence_leaves_siblings_alone() {
    let mut conn = setup();
    run_tx(
        &mut conn,
        &[
            "tx", "add", "--date", "2025-01-10", "--description", "Gym", "--amount", "50",
            "--kind", "expense", "--recurring", "--until", "2025-03-10",
        ],
    );
    let target_id: i64 = conn
        .query_row(
            "SELECT id FROM transactions WHERE date='2025-02-10'",
            [],
            |r| r.get(0),
        )
        .unwrap();

    run_tx(
        &mut conn,
        &["tx", "edit", "--id", &target_id.to_string(), "--amount", "75"],
    );

    let bumped: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM transactions WHERE amount='75'",
            [],
            |r| r.get(0),
        )
        .unwrap();
    let untouched: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM transactions WHERE amount='50'",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(bumped, 1);
    assert_eq!(untouched, 2);
}

#[test]
fn rm_future_scope_via_cli() {
    let mut conn = setup();
    run_tx(
        &mut conn,
        &[
            "tx", "add", "--date", "2025-01-10", "--description", "Rent", "--amount", "1200",
            "--kind", "expense", "--recurring", "--until", "2025-05-10",
        ],
    );
    let target_id: i64 = conn
        .query_row(
            "SELECT id FROM transactions WHERE date='2025-03-10'",
            [],
            |r| r.get(0),
        )
        .unwrap();

    run_tx(
        &mut conn,
        &["tx", "rm", "--id", &target_id.to_string(), "--scope", "future"],
    );

    let mut stmt = conn
        .prepare("SELECT date FROM transactions ORDER BY date")
        .unwrap();
    let dates: Vec<String> = stmt
        .query_map([], |r| r.get::<_, String>(0))
        .unwrap()
        .map(|r| r.unwrap())
        .collect();
    assert_eq!(dates, vec!["2025-01-10", "2025-02-10"]);
}
