//! Store seams used by checkout.
//!
//! `Repository` implements all three against SQLite; tests substitute
//! failing implementations to exercise partial checkout outcomes.

use crate::db::Repository;
use crate::domain::{CartLine, Email, SaleLine, SaleValidationError};
use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// Result of committing a batch of sale lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleBatch {
    pub inserted_count: usize,
    pub inserted_ids: Vec<i64>,
}

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("invalid sale line: {0}")]
    Invalid(#[from] SaleValidationError),
    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

/// Append-only sale log.
#[async_trait]
pub trait SalesRecorder: Send + Sync {
    /// Commit all lines or none. Lines are validated before anything is written.
    async fn commit_batch(&self, lines: &[SaleLine]) -> Result<SaleBatch, RecordError>;
}

/// Per-product stock and sales counters.
#[async_trait]
pub trait InventoryLedger: Send + Sync {
    /// Returns whether a product was modified.
    async fn apply_sale(&self, product_id: &str, sold_quantity: i64) -> Result<bool, sqlx::Error>;
}

/// Pending cart lines keyed by (owner, product).
#[async_trait]
pub trait CartStore: Send + Sync {
    async fn upsert_line(&self, line: &CartLine) -> Result<CartLine, sqlx::Error>;
    async fn list_lines(&self, owner: &Email) -> Result<Vec<CartLine>, sqlx::Error>;
    /// Returns the number of removed lines; 0 when absent.
    async fn remove_line(&self, owner: &Email, product_id: &str) -> Result<u64, sqlx::Error>;
}

#[async_trait]
impl SalesRecorder for Repository {
    async fn commit_batch(&self, lines: &[SaleLine]) -> Result<SaleBatch, RecordError> {
        for line in lines {
            line.validate()?;
        }
        let inserted_ids = self.insert_sale_batch(lines).await?;
        Ok(SaleBatch {
            inserted_count: inserted_ids.len(),
            inserted_ids,
        })
    }
}

#[async_trait]
impl InventoryLedger for Repository {
    async fn apply_sale(&self, product_id: &str, sold_quantity: i64) -> Result<bool, sqlx::Error> {
        Repository::apply_sale(self, product_id, sold_quantity).await
    }
}

#[async_trait]
impl CartStore for Repository {
    async fn upsert_line(&self, line: &CartLine) -> Result<CartLine, sqlx::Error> {
        self.upsert_cart_line(line).await
    }

    async fn list_lines(&self, owner: &Email) -> Result<Vec<CartLine>, sqlx::Error> {
        self.cart_lines(owner).await
    }

    async fn remove_line(&self, owner: &Email, product_id: &str) -> Result<u64, sqlx::Error> {
        self.remove_cart_line(owner, product_id).await
    }
}
