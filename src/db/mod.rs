mod schema;

use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use crate::models::{Alert, Transaction};

pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        db.seed_settings_row()?;
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let mut db = Self { conn };
        db.migrate()?;
        db.seed_settings_row()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<()> {
        // Check if schema_version table exists
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            // Fresh database - apply full schema
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            return Ok(());
        }

        // Existing database - check version and apply migrations
        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
        }

        Ok(())
    }

    // The settings table is a single fixed-id row; the limit starts unset.
    fn seed_settings_row(&mut self) -> Result<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO settings (id, spending_limit, over_limit) VALUES (1, NULL, 0)",
            [],
        )?;
        Ok(())
    }

    // ── Transactions ──────────────────────────────────────────

    pub(crate) fn insert_transaction(&self, txn: &Transaction) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO transactions (date, description, category, amount, latitude, longitude, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                txn.date,
                txn.description,
                txn.category,
                txn.amount.to_string(),
                txn.latitude,
                txn.longitude,
                txn.created_at,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub(crate) fn get_transactions(
        &self,
        limit: Option<u32>,
        offset: Option<u32>,
        search: Option<&str>,
        month: Option<&str>,
    ) -> Result<Vec<Transaction>> {
        let mut sql = String::from(
            "SELECT id, date, description, category, amount, latitude, longitude, created_at
             FROM transactions WHERE 1=1",
        );
        let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

        if let Some(s) = search {
            sql.push_str(&format!(
                " AND (description LIKE ?{0} OR category LIKE ?{0})",
                param_values.len() + 1
            ));
            param_values.push(Box::new(format!("%{s}%")));
        }
        if let Some(m) = month {
            sql.push_str(&format!(" AND date LIKE ?{}", param_values.len() + 1));
            param_values.push(Box::new(format!("{m}%")));
        }

        sql.push_str(" ORDER BY date DESC, id DESC");

        if let Some(l) = limit {
            sql.push_str(&format!(" LIMIT {l}"));
        }
        if let Some(o) = offset {
            sql.push_str(&format!(" OFFSET {o}"));
        }

        let params_ref: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(|p| p.as_ref()).collect();

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_ref.as_slice(), row_to_transaction)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// The full transaction set, order irrelevant. The limit check always
    /// runs over this.
    pub(crate) fn get_all_transactions(&self) -> Result<Vec<Transaction>> {
        self.get_transactions(None, None, None, None)
    }

    pub(crate) fn get_transaction_by_id(&self, id: i64) -> Result<Option<Transaction>> {
        let result = self.conn.query_row(
            "SELECT id, date, description, category, amount, latitude, longitude, created_at
             FROM transactions WHERE id = ?1",
            params![id],
            row_to_transaction,
        );
        match result {
            Ok(t) => Ok(Some(t)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub(crate) fn update_transaction(&self, id: i64, txn: &Transaction) -> Result<()> {
        self.conn.execute(
            "UPDATE transactions
             SET date = ?1, description = ?2, category = ?3, amount = ?4,
                 latitude = ?5, longitude = ?6
             WHERE id = ?7",
            params![
                txn.date,
                txn.description,
                txn.category,
                txn.amount.to_string(),
                txn.latitude,
                txn.longitude,
                id,
            ],
        )?;
        Ok(())
    }

    pub(crate) fn delete_transaction(&self, id: i64) -> Result<()> {
        self.conn
            .execute("DELETE FROM transactions WHERE id = ?1", params![id])?;
        Ok(())
    }

    pub(crate) fn get_transaction_count(&self) -> Result<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?)
    }

    // ── Settings ──────────────────────────────────────────────

    pub(crate) fn get_spending_limit(&self) -> Result<Option<Decimal>> {
        let raw: Option<String> = self.conn.query_row(
            "SELECT spending_limit FROM settings WHERE id = 1",
            [],
            |row| row.get(0),
        )?;
        Ok(raw.and_then(|s| Decimal::from_str(&s).ok()))
    }

    /// Overwrites the single limit value; no history is kept.
    pub(crate) fn set_spending_limit(&self, limit: Decimal) -> Result<()> {
        self.conn.execute(
            "UPDATE settings SET spending_limit = ?1 WHERE id = 1",
            params![limit.to_string()],
        )?;
        Ok(())
    }

    pub(crate) fn clear_spending_limit(&self) -> Result<()> {
        self.conn
            .execute("UPDATE settings SET spending_limit = NULL WHERE id = 1", [])?;
        Ok(())
    }

    pub(crate) fn get_over_limit_flag(&self) -> Result<bool> {
        Ok(self
            .conn
            .query_row("SELECT over_limit FROM settings WHERE id = 1", [], |row| {
                row.get(0)
            })?)
    }

    pub(crate) fn set_over_limit_flag(&self, over: bool) -> Result<()> {
        self.conn.execute(
            "UPDATE settings SET over_limit = ?1 WHERE id = 1",
            params![over],
        )?;
        Ok(())
    }

    // ── Alerts ────────────────────────────────────────────────

    pub(crate) fn insert_alert(&self, alert: &Alert) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO alerts (title, message, created_at, seen) VALUES (?1, ?2, ?3, ?4)",
            params![alert.title, alert.message, alert.created_at, alert.seen],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub(crate) fn get_alerts(&self) -> Result<Vec<Alert>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, message, created_at, seen FROM alerts
             ORDER BY created_at DESC, id DESC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(Alert {
                id: Some(row.get(0)?),
                title: row.get(1)?,
                message: row.get(2)?,
                created_at: row.get(3)?,
                seen: row.get(4)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn mark_alerts_seen(&self) -> Result<()> {
        self.conn.execute("UPDATE alerts SET seen = 1", [])?;
        Ok(())
    }

    pub(crate) fn clear_alerts(&self) -> Result<usize> {
        Ok(self.conn.execute("DELETE FROM alerts", [])?)
    }
}

fn row_to_transaction(row: &rusqlite::Row) -> rusqlite::Result<Transaction> {
    let amount_str: String = row.get(4)?;
    Ok(Transaction {
        id: Some(row.get(0)?),
        date: row.get(1)?,
        description: row.get(2)?,
        category: row.get(3)?,
        amount: Decimal::from_str(&amount_str).unwrap_or_default(),
        latitude: row.get(5)?,
        longitude: row.get(6)?,
        created_at: row.get(7)?,
    })
}
