//! Repository layer for database operations.
//!
//! This module provides the `Repository` struct for all database operations.
//! Methods are organized across submodules by collection:
//! - `users.rs` - Accounts, shop linkage and admin income
//! - `shops.rs` - Shop creation and product-limit upgrades
//! - `products.rs` - Product CRUD and the inventory ledger
//! - `carts.rs` - Pending cart lines
//! - `sales.rs` - Append-only sale log
//!
//! Every mutation of shared state (stock counters, product limits, admin
//! income, shop ownership) is a single conditional SQL statement so that
//! concurrent requests race only inside SQLite.

mod carts;
mod products;
mod sales;
mod shops;
mod users;

use crate::domain::{Decimal, Email, TimeMs};
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;
use std::str::FromStr;
use tracing::warn;

/// Repository for database operations.
#[derive(Debug, Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Repository { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn decimal_column(row: &SqliteRow, column: &str) -> Result<Decimal, sqlx::Error> {
    let raw: String = row.get(column);
    Decimal::from_str(&raw).map_err(|e| {
        warn!(
            column = %column,
            value = %raw,
            error = %e,
            "Failed to parse decimal column"
        );
        sqlx::Error::Decode(Box::new(e))
    })
}

fn cents_column(row: &SqliteRow, column: &str) -> Decimal {
    Decimal::from_minor_units(row.get(column))
}

fn email_column(row: &SqliteRow, column: &str) -> Result<Email, sqlx::Error> {
    let raw: String = row.get(column);
    Email::from_str(&raw).map_err(|e| sqlx::Error::Decode(Box::new(e)))
}

fn time_column(row: &SqliteRow, column: &str) -> DateTime<Utc> {
    TimeMs::new(row.get(column)).to_datetime()
}
