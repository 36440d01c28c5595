// Copyright (c) 2025 Casabook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use casabook::{cli, commands::goals};
use rusqlite::Connection;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    casabook::db::init_schema(&mut conn).unwrap();
    conn
}

fn run_goal(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["casabook"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("goal", goal_m)) = matches.subcommand() {
        goals::handle(conn, goal_m)
    } else {
        panic!("no goal subcommand");
    }
}

#[test]
fn funding_accumulates_and_tracks_progress() {
    let conn = setup();
    run_goal(
        &conn,
        &["goal", "add", "--name", "Vacation", "--target", "500"],
    )
    .unwrap();
    run_goal(
        &conn,
        &["goal", "fund", "--name", "Vacation", "--amount", "100"],
    )
    .unwrap();
    run_goal(
        &conn,
        &["goal", "fund", "--name", "Vacation", "--amount", "50"],
    )
    .unwrap();

    let rows = goals::goal_rows(&conn).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].saved, "150.00");
    assert_eq!(rows[0].progress, "30.0%");
}

#[test]
fn funding_unknown_goal_fails() {
    let conn = setup();
    assert!(run_goal(&conn, &["goal", "fund", "--name", "Nope", "--amount", "10"]).is_err());
}

#[test]
fn non_positive_target_rejected() {
    let conn = setup();
    assert!(run_goal(&conn, &["goal", "add", "--name", "Zero", "--target", "0"]).is_err());
    let rows = goals::goal_rows(&conn).unwrap();
    assert!(rows.is_empty());
}
