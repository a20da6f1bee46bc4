//! Database module for SQLite operations.
//!
//! This module provides:
//! - Database initialization and schema
//! - Repository layer for users, shops, products, carts and sales

pub mod migrations;
pub mod repo;

pub use migrations::init_db;
pub use repo::Repository;
