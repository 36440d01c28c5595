// Copyright (c) 2025 Casabook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;

use crate::error::CoreError;
use crate::models::{NewTransaction, RecurrenceFrequency, Transaction, TransactionKind};

/// Narrow persistence contract consumed by the recurrence core.
///
/// Batch operations are all-or-nothing: a failure mid-batch leaves the store
/// unchanged. `query_by_series_id` makes no ordering promise; callers sort.
pub trait TransactionStore {
    fn create_one(&mut self, record: &NewTransaction) -> Result<i64, CoreError>;

    /// Persists all records atomically, returning assigned ids in input order.
    fn batch_create(&mut self, records: &[NewTransaction]) -> Result<Vec<i64>, CoreError>;

    fn query_by_series_id(&self, series_id: &str) -> Result<Vec<Transaction>, CoreError>;

    /// Deletes all listed ids atomically.
    fn batch_delete(&mut self, ids: &[i64]) -> Result<(), CoreError>;

    fn delete_one(&mut self, id: i64) -> Result<(), CoreError>;
}

/// SQLite-backed store over the `transactions` table.
pub struct SqliteStore<'a> {
    conn: &'a mut Connection,
}

impl<'a> SqliteStore<'a> {
    pub fn new(conn: &'a mut Connection) -> Self {
        SqliteStore { conn }
    }

    pub fn get(&self, id: i64) -> Result<Option<Transaction>, CoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, date, description, amount, kind, category_id, is_recurring,
                    recurrence_frequency, series_id
             FROM transactions WHERE id=?1",
        )?;
        let record = stmt
            .query_row(params![id], row_to_transaction)
            .optional()?;
        Ok(record)
    }
}

const INSERT_SQL: &str =
    "INSERT INTO transactions(date, description, amount, kind, category_id, is_recurring, recurrence_frequency, series_id)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";

fn bind_insert(stmt: &mut rusqlite::Statement<'_>, r: &NewTransaction) -> rusqlite::Result<usize> {
    stmt.execute(params![
        r.date.to_string(),
        r.description,
        r.amount.to_string(),
        r.kind.as_str(),
        r.category_id,
        r.is_recurring,
        r.recurrence_frequency.map(|f| f.as_str()),
        r.series_id,
    ])
}

fn row_to_transaction(row: &rusqlite::Row<'_>) -> rusqlite::Result<Transaction> {
    let date_s: String = row.get(1)?;
    let amount_s: String = row.get(3)?;
    let kind_s: String = row.get(4)?;
    let freq_s: Option<String> = row.get(7)?;

    let date = NaiveDate::parse_from_str(&date_s, "%Y-%m-%d")
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(e)))?;
    let amount = amount_s
        .parse::<Decimal>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?;
    let kind = TransactionKind::parse(&kind_s).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            4,
            Type::Text,
            format!("unknown transaction kind '{}'", kind_s).into(),
        )
    })?;
    let recurrence_frequency = match freq_s {
        Some(s) => Some(RecurrenceFrequency::parse(&s).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                7,
                Type::Text,
                format!("unknown recurrence frequency '{}'", s).into(),
            )
        })?),
        None => None,
    };

    Ok(Transaction {
        id: row.get(0)?,
        date,
        description: row.get(2)?,
        amount,
        kind,
        category_id: row.get(5)?,
        is_recurring: row.get(6)?,
        recurrence_frequency,
        series_id: row.get(8)?,
    })
}

impl TransactionStore for SqliteStore<'_> {
    fn create_one(&mut self, record: &NewTransaction) -> Result<i64, CoreError> {
        let mut stmt = self.conn.prepare(INSERT_SQL)?;
        bind_insert(&mut stmt, record)?;
        Ok(self.conn.last_insert_rowid())
    }

    fn batch_create(&mut self, records: &[NewTransaction]) -> Result<Vec<i64>, CoreError> {
        let tx = self.conn.transaction()?;
        let mut ids = Vec::with_capacity(records.len());
        {
            let mut stmt = tx.prepare(INSERT_SQL)?;
            for record in records {
                bind_insert(&mut stmt, record)?;
                ids.push(tx.last_insert_rowid());
            }
        }
        tx.commit()?;
        Ok(ids)
    }

    fn query_by_series_id(&self, series_id: &str) -> Result<Vec<Transaction>, CoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, date, description, amount, kind, category_id, is_recurring,
                    recurrence_frequency, series_id
             FROM transactions WHERE series_id=?1",
        )?;
        let rows = stmt.query_map(params![series_id], row_to_transaction)?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    fn batch_delete(&mut self, ids: &[i64]) -> Result<(), CoreError> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare("DELETE FROM transactions WHERE id=?1")?;
            for id in ids {
                stmt.execute(params![id])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn delete_one(&mut self, id: i64) -> Result<(), CoreError> {
        self.conn
            .execute("DELETE FROM transactions WHERE id=?1", params![id])?;
        Ok(())
    }
}
