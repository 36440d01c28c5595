// Copyright (c) 2025 Casabook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use casabook::commands::budgets;
use rusqlite::{params, Connection};

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    casabook::db::init_schema(&mut conn).unwrap();
    conn.execute(
        "INSERT INTO categories(id,name,kind) VALUES (1,'Dining','expense'),(2,'Salary','income')",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO budgets(category_id, monthly_limit) VALUES (1,'50.00')",
        [],
    )
    .unwrap();
    conn
}

#[test]
fn report_sums_expenses_for_the_month_only() {
    let conn = setup();
    for (d, amt) in [("2025-08-10", "9.25"), ("2025-08-20", "21.25")] {
        conn.execute(
            "INSERT INTO transactions(date,description,amount,kind,category_id) VALUES (?1,'Meal',?2,'expense',1)",
            params![d, amt],
        )
        .unwrap();
    }
    // Outside the month: ignored
    conn.execute(
        "INSERT INTO transactions(date,description,amount,kind,category_id) VALUES ('2025-07-31','Meal','99','expense',1)",
        [],
    )
    .unwrap();

    let rows = budgets::budget_status(&conn, "2025-08").unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].category, "Dining");
    assert_eq!(rows[0].monthly_limit, "50.00");
    assert_eq!(rows[0].spent, "30.50");
    assert_eq!(rows[0].remaining, "19.50");
}

#[test]
fn income_never_counts_against_a_budget() {
    let conn = setup();
    conn.execute(
        "INSERT INTO transactions(date,description,amount,kind,category_id) VALUES ('2025-08-01','Refund','100','income',1)",
        [],
    )
    .unwrap();

    let rows = budgets::budget_status(&conn, "2025-08").unwrap();
    assert_eq!(rows[0].spent, "0.00");
    assert_eq!(rows[0].remaining, "50.00");
}

#[test]
fn unbudgeted_categories_are_not_reported() {
    let conn = setup();
    conn.execute(
        "INSERT INTO transactions(date,description,amount,kind,category_id) VALUES ('2025-08-01','Pay','100','income',2)",
        [],
    )
    .unwrap();

    let rows = budgets::budget_status(&conn, "2025-08").unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].category, "Dining");
}
