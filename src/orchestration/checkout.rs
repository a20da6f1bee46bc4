//! Checkout: turn a cart into committed sales.
//!
//! ```text
//! Received ──commit batch──► Recorded ──apply_sale × N──► Ledgered
//!    │                                                       │
//!    └─► Error (nothing written)          remove_line × N ◄──┘
//!                                                │
//!                                  CartCleared ──► Done
//! ```
//!
//! Only the batch commit can fail the request. Ledger and cart work fans out
//! concurrently per line; each line's result is collected and reported, and a
//! failed line never cancels or rolls back its siblings.

use crate::db::Repository;
use crate::domain::{CartLine, Email, SaleLine};
use crate::orchestration::stores::{
    CartStore, InventoryLedger, RecordError, SaleBatch, SalesRecorder,
};
use chrono::Utc;
use futures::future::join_all;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CheckoutStage {
    Received,
    Recorded,
    Ledgered,
    CartCleared,
    Done,
}

impl fmt::Display for CheckoutStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CheckoutStage::Received => "received",
            CheckoutStage::Recorded => "recorded",
            CheckoutStage::Ledgered => "ledgered",
            CheckoutStage::CartCleared => "cart_cleared",
            CheckoutStage::Done => "done",
        };
        f.write_str(name)
    }
}

/// Inventory result for one line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerOutcome {
    pub product_id: String,
    pub sold_quantity: i64,
    /// False when the product is missing or already depleted.
    pub modified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Cart-clearing result for one line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartOutcome {
    pub product_id: String,
    pub deleted_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutReport {
    pub stage: CheckoutStage,
    pub sales_result: SaleBatch,
    pub ledger_results: Vec<LedgerOutcome>,
    pub cart_results: Vec<CartOutcome>,
}

impl CheckoutReport {
    /// True when every line updated inventory and left the cart without error.
    pub fn fully_applied(&self) -> bool {
        self.ledger_results
            .iter()
            .all(|o| o.modified && o.error.is_none())
            && self.cart_results.iter().all(|o| o.error.is_none())
    }
}

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("failed to record sales: {0}")]
    Record(#[from] RecordError),
}

#[derive(Clone)]
pub struct CheckoutOrchestrator {
    recorder: Arc<dyn SalesRecorder>,
    ledger: Arc<dyn InventoryLedger>,
    carts: Arc<dyn CartStore>,
}

impl CheckoutOrchestrator {
    pub fn new(
        recorder: Arc<dyn SalesRecorder>,
        ledger: Arc<dyn InventoryLedger>,
        carts: Arc<dyn CartStore>,
    ) -> Self {
        Self {
            recorder,
            ledger,
            carts,
        }
    }

    pub fn from_repository(repo: Arc<Repository>) -> Self {
        Self::new(repo.clone(), repo.clone(), repo)
    }

    /// Check out `seller`'s pending cart lines.
    ///
    /// # Errors
    /// Fails only if the sale batch cannot be recorded, in which case no
    /// inventory or cart state was touched.
    pub async fn checkout(
        &self,
        seller: &Email,
        seller_name: Option<&str>,
        lines: Vec<CartLine>,
    ) -> Result<CheckoutReport, CheckoutError> {
        let mut stage = CheckoutStage::Received;
        debug!(seller = %seller, lines = lines.len(), %stage, "Checkout started");

        let sold_at = Utc::now();
        let sales: Vec<SaleLine> = lines
            .iter()
            .map(|line| SaleLine::from_cart(line, seller, seller_name, sold_at))
            .collect();

        let sales_result = self.recorder.commit_batch(&sales).await.map_err(|e| {
            warn!(seller = %seller, error = %e, "Checkout aborted before recording");
            e
        })?;
        stage = CheckoutStage::Recorded;
        debug!(seller = %seller, inserted = sales_result.inserted_count, %stage, "Sales recorded");

        let ledger_results = join_all(sales.iter().map(|sale| self.ledger_one(sale))).await;
        stage = CheckoutStage::Ledgered;
        debug!(seller = %seller, %stage, "Inventory updated");

        let cart_results = join_all(sales.iter().map(|sale| self.clear_one(seller, sale))).await;
        stage = CheckoutStage::CartCleared;
        debug!(seller = %seller, %stage, "Cart cleared");

        stage = CheckoutStage::Done;
        let report = CheckoutReport {
            stage,
            sales_result,
            ledger_results,
            cart_results,
        };
        info!(
            seller = %seller,
            lines = sales.len(),
            fully_applied = report.fully_applied(),
            %stage,
            "Checkout finished"
        );
        Ok(report)
    }

    async fn ledger_one(&self, sale: &SaleLine) -> LedgerOutcome {
        match self
            .ledger
            .apply_sale(&sale.product_id, sale.sold_quantity)
            .await
        {
            Ok(modified) => {
                if !modified {
                    warn!(product_id = %sale.product_id, "Sale recorded but inventory not modified");
                }
                LedgerOutcome {
                    product_id: sale.product_id.clone(),
                    sold_quantity: sale.sold_quantity,
                    modified,
                    error: None,
                }
            }
            Err(e) => {
                warn!(product_id = %sale.product_id, error = %e, "Inventory update failed");
                LedgerOutcome {
                    product_id: sale.product_id.clone(),
                    sold_quantity: sale.sold_quantity,
                    modified: false,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    async fn clear_one(&self, owner: &Email, sale: &SaleLine) -> CartOutcome {
        match self.carts.remove_line(owner, &sale.product_id).await {
            Ok(deleted_count) => CartOutcome {
                product_id: sale.product_id.clone(),
                deleted_count,
                error: None,
            },
            Err(e) => {
                warn!(product_id = %sale.product_id, error = %e, "Cart line removal failed");
                CartOutcome {
                    product_id: sale.product_id.clone(),
                    deleted_count: 0,
                    error: Some(e.to_string()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repo::test_support::{email, seed_product, seed_shop, setup_repo};
    use crate::domain::{Decimal, Product};
    use async_trait::async_trait;
    use std::sync::Mutex;

    fn line_for(owner: &Email, product: &Product) -> CartLine {
        CartLine::snapshot(owner, product, Utc::now())
    }

    async fn add_to_cart(repo: &Repository, owner: &Email, product: &Product, times: usize) {
        for _ in 0..times {
            repo.upsert_cart_line(&line_for(owner, product)).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_checkout_commits_ledgers_and_clears() {
        let (repo, _temp) = setup_repo().await;
        let repo = Arc::new(repo);
        let owner = email("owner@example.com");
        let shop = seed_shop(&repo, &owner).await;
        let lamp = seed_product(&repo, &shop, 5).await;
        let desk = seed_product(&repo, &shop, 1).await;
        add_to_cart(&repo, &owner, &lamp, 2).await;
        add_to_cart(&repo, &owner, &desk, 1).await;

        let orchestrator = CheckoutOrchestrator::from_repository(repo.clone());
        let lines = repo.cart_lines(&owner).await.unwrap();
        let report = orchestrator
            .checkout(&owner, Some("Owner"), lines)
            .await
            .unwrap();

        assert_eq!(report.stage, CheckoutStage::Done);
        assert_eq!(report.sales_result.inserted_count, 2);
        assert!(report.fully_applied());
        assert!(report.cart_results.iter().all(|c| c.deleted_count == 1));

        let lamp_after = repo.get_product(&lamp.id).await.unwrap().unwrap();
        assert_eq!(lamp_after.quantity, 3);
        assert_eq!(lamp_after.sales_count, 2);
        let desk_after = repo.get_product(&desk.id).await.unwrap().unwrap();
        assert_eq!(desk_after.quantity, 0);

        assert!(repo.cart_lines(&owner).await.unwrap().is_empty());

        let sales = repo.sales_for_shop(&shop.id).await.unwrap();
        assert_eq!(sales.len(), 2);
        assert!(sales.iter().all(|s| s.seller_name.as_deref() == Some("Owner")));
        assert!(sales.iter().all(|s| s.sold_by == owner));
    }

    #[tokio::test]
    async fn test_empty_cart_is_trivial_success() {
        let (repo, _temp) = setup_repo().await;
        let orchestrator = CheckoutOrchestrator::from_repository(Arc::new(repo));

        let report = orchestrator
            .checkout(&email("owner@example.com"), None, Vec::new())
            .await
            .unwrap();

        assert_eq!(report.sales_result, SaleBatch::default());
        assert!(report.ledger_results.is_empty());
        assert!(report.cart_results.is_empty());
        assert!(report.fully_applied());
    }

    #[tokio::test]
    async fn test_depleted_and_missing_products_are_not_modified() {
        let (repo, _temp) = setup_repo().await;
        let repo = Arc::new(repo);
        let owner = email("owner@example.com");
        let shop = seed_shop(&repo, &owner).await;
        let empty = seed_product(&repo, &shop, 0).await;
        let gone = seed_product(&repo, &shop, 4).await;
        add_to_cart(&repo, &owner, &empty, 1).await;
        add_to_cart(&repo, &owner, &gone, 1).await;
        repo.delete_product(&gone.id).await.unwrap();

        let orchestrator = CheckoutOrchestrator::from_repository(repo.clone());
        let lines = repo.cart_lines(&owner).await.unwrap();
        let report = orchestrator.checkout(&owner, None, lines).await.unwrap();

        assert_eq!(report.sales_result.inserted_count, 2);
        assert!(report.ledger_results.iter().all(|o| !o.modified));
        assert!(report.ledger_results.iter().all(|o| o.error.is_none()));
        assert!(!report.fully_applied());

        let empty_after = repo.get_product(&empty.id).await.unwrap().unwrap();
        assert_eq!(empty_after.quantity, 0);
        assert_eq!(empty_after.sales_count, 0);
        assert!(repo.cart_lines(&owner).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_checkout_uses_frozen_cart_price() {
        let (repo, _temp) = setup_repo().await;
        let repo = Arc::new(repo);
        let owner = email("owner@example.com");
        let shop = seed_shop(&repo, &owner).await;
        let mut lamp = seed_product(&repo, &shop, 5).await;
        add_to_cart(&repo, &owner, &lamp, 1).await;

        lamp.apply_patch(crate::domain::ProductPatch {
            cost: Some(Decimal::from_int(1000)),
            ..Default::default()
        })
        .unwrap();
        repo.update_product(&lamp, None).await.unwrap();

        let orchestrator = CheckoutOrchestrator::from_repository(repo.clone());
        let lines = repo.cart_lines(&owner).await.unwrap();
        orchestrator.checkout(&owner, None, lines).await.unwrap();

        let sales = repo.sales_for_shop(&shop.id).await.unwrap();
        assert_eq!(sales[0].selling_price, Decimal::from_int(130));
        assert_eq!(sales[0].product_cost, Decimal::from_int(100));
    }

    struct FailingRecorder;

    #[async_trait]
    impl SalesRecorder for FailingRecorder {
        async fn commit_batch(&self, _lines: &[SaleLine]) -> Result<SaleBatch, RecordError> {
            Err(RecordError::Db(sqlx::Error::Protocol("disk full".to_string())))
        }
    }

    /// Fails for one product id, succeeds for the rest, and records every call.
    struct FlakyLedger {
        fail_for: String,
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl InventoryLedger for FlakyLedger {
        async fn apply_sale(&self, product_id: &str, _qty: i64) -> Result<bool, sqlx::Error> {
            self.calls.lock().unwrap().push(product_id.to_string());
            if product_id == self.fail_for {
                Err(sqlx::Error::Protocol("connection reset".to_string()))
            } else {
                Ok(true)
            }
        }
    }

    #[tokio::test]
    async fn test_record_failure_has_no_side_effects() {
        let (repo, _temp) = setup_repo().await;
        let repo = Arc::new(repo);
        let owner = email("owner@example.com");
        let shop = seed_shop(&repo, &owner).await;
        let lamp = seed_product(&repo, &shop, 5).await;
        add_to_cart(&repo, &owner, &lamp, 1).await;

        let orchestrator =
            CheckoutOrchestrator::new(Arc::new(FailingRecorder), repo.clone(), repo.clone());
        let lines = repo.cart_lines(&owner).await.unwrap();
        let result = orchestrator.checkout(&owner, None, lines).await;

        assert!(matches!(result, Err(CheckoutError::Record(_))));
        assert_eq!(repo.get_product(&lamp.id).await.unwrap().unwrap().quantity, 5);
        assert_eq!(repo.cart_lines(&owner).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_ledger_failure_does_not_abort_siblings() {
        let (repo, _temp) = setup_repo().await;
        let repo = Arc::new(repo);
        let owner = email("owner@example.com");
        let shop = seed_shop(&repo, &owner).await;
        let lamp = seed_product(&repo, &shop, 5).await;
        let desk = seed_product(&repo, &shop, 5).await;
        add_to_cart(&repo, &owner, &lamp, 1).await;
        add_to_cart(&repo, &owner, &desk, 1).await;

        let ledger = Arc::new(FlakyLedger {
            fail_for: lamp.id.clone(),
            calls: Mutex::new(Vec::new()),
        });
        let orchestrator = CheckoutOrchestrator::new(repo.clone(), ledger.clone(), repo.clone());
        let lines = repo.cart_lines(&owner).await.unwrap();
        let report = orchestrator.checkout(&owner, None, lines).await.unwrap();

        assert_eq!(ledger.calls.lock().unwrap().len(), 2);
        let failed = report
            .ledger_results
            .iter()
            .find(|o| o.product_id == lamp.id)
            .unwrap();
        assert!(!failed.modified);
        assert!(failed.error.as_deref().unwrap().contains("connection reset"));
        let ok = report
            .ledger_results
            .iter()
            .find(|o| o.product_id == desk.id)
            .unwrap();
        assert!(ok.modified);

        // Recorded sales and cart clearing are kept despite the ledger failure.
        assert_eq!(repo.sales_for_shop(&shop.id).await.unwrap().len(), 2);
        assert!(repo.cart_lines(&owner).await.unwrap().is_empty());
        assert!(!report.fully_applied());
    }

    #[test]
    fn test_report_serializes_camel_case() {
        let report = CheckoutReport {
            stage: CheckoutStage::Done,
            sales_result: SaleBatch {
                inserted_count: 1,
                inserted_ids: vec![7],
            },
            ledger_results: vec![LedgerOutcome {
                product_id: "p-1".to_string(),
                sold_quantity: 1,
                modified: true,
                error: None,
            }],
            cart_results: vec![CartOutcome {
                product_id: "p-1".to_string(),
                deleted_count: 1,
                error: None,
            }],
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["stage"], "done");
        assert_eq!(json["salesResult"]["insertedCount"], 1);
        assert_eq!(json["ledgerResults"][0]["modified"], true);
        assert!(json["ledgerResults"][0].get("error").is_none());
        assert_eq!(json["cartResults"][0]["deletedCount"], 1);
    }
}
