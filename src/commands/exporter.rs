// Copyright (c) 2025 Casabook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{bail, Result};
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(conn, sub),
        _ => Ok(()),
    }
}

fn export_transactions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    if fmt != "csv" && fmt != "json" {
        bail!("Unknown format: {} (use csv|json)", fmt);
    }
    let out = sub.get_one::<String>("out").unwrap();

    let mut stmt = conn.prepare(
        "SELECT t.date, t.description, t.amount, t.kind, c.name as category, t.series_id
         FROM transactions t
         LEFT JOIN categories c ON t.category_id=c.id
         ORDER BY t.date, t.id",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, Option<String>>(4)?,
            r.get::<_, Option<String>>(5)?,
        ))
    })?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record(["date", "description", "amount", "kind", "category", "series_id"])?;
            for row in rows {
                let (d, desc, amt, kind, cat, series) = row?;
                wtr.write_record([
                    d,
                    desc,
                    amt,
                    kind,
                    cat.unwrap_or_default(),
                    series.unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        _ => {
            let mut items = Vec::new();
            for row in rows {
                let (d, desc, amt, kind, cat, series) = row?;
                items.push(json!({
                    "date": d, "description": desc, "amount": amt, "kind": kind,
                    "category": cat, "series_id": series
                }));
            }
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
    }
    println!("Exported transactions to {}", out);
    Ok(())
}
