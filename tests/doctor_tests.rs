// Copyright (c) 2025 Casabook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use casabook::commands::doctor;
use casabook::models::{RecurringIntent, TransactionKind};
use casabook::recurrence;
use casabook::store::SqliteStore;
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    casabook::db::init_schema(&mut conn).unwrap();
    conn
}

#[test]
fn healthy_series_raise_no_issues() {
    let mut conn = setup();
    let intent = RecurringIntent {
        description: "Rent".into(),
        amount: Decimal::new(120000, 2),
        kind: TransactionKind::Expense,
        category_id: None,
        start_date: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2025, 4, 10),
    };
    {
        let mut store = SqliteStore::new(&mut conn);
        recurrence::expand_series(&mut store, &intent).unwrap();
    }

    assert!(doctor::issues(&conn).unwrap().is_empty());
}

#[test]
fn diverging_series_fields_are_flagged() {
    let conn = setup();
    conn.execute_batch(
        "INSERT INTO transactions(date,description,amount,kind,is_recurring,recurrence_frequency,series_id) VALUES
            ('2025-01-10','Rent','1200','expense',1,'monthly','s1'),
            ('2025-02-10','Rent','1300','expense',1,'monthly','s1');",
    )
    .unwrap();

    let issues = doctor::issues(&conn).unwrap();
    assert_eq!(issues, vec![vec!["series_fields_diverge".to_string(), "s1".to_string()]]);
}

#[test]
fn recurrence_flag_mismatches_are_flagged() {
    let conn = setup();
    conn.execute_batch(
        "INSERT INTO transactions(id,date,description,amount,kind,is_recurring,recurrence_frequency,series_id) VALUES
            (1,'2025-01-10','A','10','expense',0,NULL,'s1'),
            (2,'2025-02-10','B','10','expense',1,'monthly',NULL);",
    )
    .unwrap();

    let issues = doctor::issues(&conn).unwrap();
    assert!(issues.contains(&vec![
        "series_missing_recurrence_flags".to_string(),
        "1".to_string()
    ]));
    assert!(issues.contains(&vec!["recurring_without_series".to_string(), "2".to_string()]));
}
