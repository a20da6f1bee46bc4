//! Pure computation over recorded sales.

pub mod revenue;

pub use revenue::{
    lifetime_sales, profit_after_platform_cut, summarize_shop, AdminSummary, SellerSummary,
    ShopSalesSummary, ANONYMOUS_SELLER,
};
