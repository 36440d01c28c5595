// Copyright (c) 2025 Casabook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::RecurringIntent;
use crate::recurrence;
use crate::store::{SqliteStore, TransactionStore};
use crate::utils::{
    id_for_category, maybe_print_json, parse_date, parse_decimal, parse_kind, parse_scope,
    pretty_table,
};
use anyhow::{bail, Context, Result};
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let description = sub.get_one::<String>("description").unwrap().to_string();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let kind = parse_kind(sub.get_one::<String>("kind").unwrap())?;
    let category_id = match sub.get_one::<String>("category") {
        Some(name) => Some(id_for_category(conn, name)?),
        None => None,
    };
    if amount <= Decimal::ZERO {
        bail!("Amount must be positive, got {}", amount);
    }

    if sub.get_flag("recurring") {
        let end_date = match sub.get_one::<String>("until") {
            Some(s) => Some(parse_date(s)?),
            None => None,
        };
        let intent = RecurringIntent {
            description: description.clone(),
            amount,
            kind,
            category_id,
            start_date: date,
            end_date,
        };
        let mut store = SqliteStore::new(conn);
        let receipt = recurrence::expand_series(&mut store, &intent)
            .with_context(|| format!("Expand recurring series for '{}'", description))?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM transactions WHERE series_id=?1",
            params![receipt.series_id],
            |r| r.get(0),
        )?;
        println!(
            "Scheduled {} monthly occurrence(s) of '{}' starting {} (series {}, first id {})",
            count, description, date, receipt.series_id, receipt.representative_id
        );
    } else {
        let record = crate::models::NewTransaction {
            date,
            description: description.clone(),
            amount,
            kind,
            category_id,
            is_recurring: false,
            recurrence_frequency: None,
            series_id: None,
        };
        let mut store = SqliteStore::new(conn);
        let id = store.create_one(&record)?;
        println!(
            "Recorded {} {} '{}' on {} (id {})",
            kind.as_str(),
            amount,
            description,
            date,
            id
        );
    }
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.clone(),
                    r.description.clone(),
                    r.amount.clone(),
                    r.kind.clone(),
                    r.category.clone(),
                    if r.series_id.is_empty() {
                        String::new()
                    } else {
                        "monthly".into()
                    },
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Id", "Date", "Description", "Amount", "Kind", "Category", "Recurring"],
                rows,
            )
        );
    }
    Ok(())
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();

    // Whole-field replacement of one record only; siblings in the same series
    // are never updated through here.
    let mut sets: Vec<String> = Vec::new();
    let mut values: Vec<String> = Vec::new();
    if let Some(d) = sub.get_one::<String>("date") {
        sets.push("date=?".into());
        values.push(parse_date(d)?.to_string());
    }
    if let Some(desc) = sub.get_one::<String>("description") {
        sets.push("description=?".into());
        values.push(desc.to_string());
    }
    if let Some(a) = sub.get_one::<String>("amount") {
        let amount = parse_decimal(a)?;
        if amount <= Decimal::ZERO {
            bail!("Amount must be positive, got {}", amount);
        }
        sets.push("amount=?".into());
        values.push(amount.to_string());
    }
    if let Some(cat) = sub.get_one::<String>("category") {
        sets.push("category_id=?".into());
        values.push(id_for_category(conn, cat)?.to_string());
    }
    if sets.is_empty() {
        bail!("Nothing to edit; pass at least one of --date/--description/--amount/--category");
    }

    let sql = format!("UPDATE transactions SET {} WHERE id=?", sets.join(", "));
    values.push(id.to_string());
    let params: Vec<&dyn rusqlite::ToSql> =
        values.iter().map(|v| v as &dyn rusqlite::ToSql).collect();
    let changed = conn.execute(&sql, rusqlite::params_from_iter(params))?;
    if changed == 0 {
        bail!("Transaction {} not found", id);
    }
    println!("Updated transaction {}", id);
    Ok(())
}

fn rm(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let scope = parse_scope(sub.get_one::<String>("scope").unwrap())?;

    let mut store = SqliteStore::new(conn);
    let target = store
        .get(id)?
        .with_context(|| format!("Transaction {} not found", id))?;
    let deleted = recurrence::resolve_deletion_scope(&mut store, &target, scope)?;
    println!("Deleted {} transaction(s)", deleted);
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub date: String,
    pub description: String,
    pub amount: String,
    pub kind: String,
    pub category: String,
    pub series_id: String,
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let mut sql = String::from(
        "SELECT t.id, t.date, t.description, t.amount, t.kind, c.name, t.series_id FROM transactions t LEFT JOIN categories c ON t.category_id=c.id WHERE 1=1",
    );
    let mut params_vec: Vec<String> = Vec::new();

    if let Some(month) = sub.get_one::<String>("month") {
        sql.push_str(" AND substr(t.date,1,7)=?");
        params_vec.push(month.into());
    }
    if let Some(cat) = sub.get_one::<String>("category") {
        sql.push_str(" AND c.name=?");
        params_vec.push(cat.into());
    }
    if let Some(kind) = sub.get_one::<String>("kind") {
        sql.push_str(" AND t.kind=?");
        params_vec.push(kind.into());
    }
    if let Some(series) = sub.get_one::<String>("series") {
        sql.push_str(" AND t.series_id=?");
        params_vec.push(series.into());
    }
    sql.push_str(" ORDER BY t.date DESC, t.id DESC");
    if let Some(limit) = sub.get_one::<usize>("limit") {
        sql.push_str(" LIMIT ?");
        params_vec.push(limit.to_string());
    }

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = if params_vec.is_empty() {
        stmt.query([])?
    } else {
        let params: Vec<&dyn rusqlite::ToSql> = params_vec
            .iter()
            .map(|s| s as &dyn rusqlite::ToSql)
            .collect();
        stmt.query(rusqlite::params_from_iter(params))?
    };

    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        let id: i64 = r.get(0)?;
        let date: String = r.get(1)?;
        let description: String = r.get(2)?;
        let amount: String = r.get(3)?;
        let kind: String = r.get(4)?;
        let category: Option<String> = r.get(5)?;
        let series_id: Option<String> = r.get(6)?;
        data.push(TransactionRow {
            id,
            date,
            description,
            amount,
            kind,
            category: category.unwrap_or_default(),
            series_id: series_id.unwrap_or_default(),
        });
    }
    Ok(data)
}
