// Copyright (c) 2025 Casabook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection) -> Result<()> {
    let rows = issues(conn)?;
    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}

/// Integrity checks over the series invariants and category references.
pub fn issues(conn: &Connection) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();

    // 1) Series whose members disagree on fields that must be shared
    let mut stmt = conn.prepare(
        "SELECT series_id FROM transactions WHERE series_id IS NOT NULL
         GROUP BY series_id
         HAVING COUNT(DISTINCT description) > 1
             OR COUNT(DISTINCT amount) > 1
             OR COUNT(DISTINCT kind) > 1
             OR COUNT(DISTINCT IFNULL(category_id, -1)) > 1",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let s: String = r.get(0)?;
        rows.push(vec!["series_fields_diverge".into(), s]);
    }

    // 2) Series membership without the recurring flags
    let mut stmt2 = conn.prepare(
        "SELECT id FROM transactions
         WHERE series_id IS NOT NULL AND (is_recurring=0 OR recurrence_frequency IS NULL)",
    )?;
    let mut cur2 = stmt2.query([])?;
    while let Some(r) = cur2.next()? {
        let id: i64 = r.get(0)?;
        rows.push(vec!["series_missing_recurrence_flags".into(), id.to_string()]);
    }

    // 3) Recurring flags without a series
    let mut stmt3 =
        conn.prepare("SELECT id FROM transactions WHERE is_recurring=1 AND series_id IS NULL")?;
    let mut cur3 = stmt3.query([])?;
    while let Some(r) = cur3.next()? {
        let id: i64 = r.get(0)?;
        rows.push(vec!["recurring_without_series".into(), id.to_string()]);
    }

    // 4) Category references pointing nowhere
    let mut stmt4 = conn.prepare(
        "SELECT t.id FROM transactions t
         LEFT JOIN categories c ON t.category_id=c.id
         WHERE t.category_id IS NOT NULL AND c.id IS NULL",
    )?;
    let mut cur4 = stmt4.query([])?;
    while let Some(r) = cur4.next()? {
        let id: i64 = r.get(0)?;
        rows.push(vec!["orphan_category_reference".into(), id.to_string()]);
    }

    Ok(rows)
}
