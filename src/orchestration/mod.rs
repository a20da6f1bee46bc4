//! Multi-step workflows over the stores.

pub mod checkout;
pub mod stores;

pub use checkout::{
    CartOutcome, CheckoutError, CheckoutOrchestrator, CheckoutReport, CheckoutStage, LedgerOutcome,
};
pub use stores::{CartStore, InventoryLedger, RecordError, SaleBatch, SalesRecorder};
