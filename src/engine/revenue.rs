//! Revenue aggregation for shop owners and the platform admin.
//!
//! Summaries are derived on read from the append-only sale log (per shop) or
//! from the live product counters (platform-wide). Nothing here writes.

use crate::domain::pricing::seller_share;
use crate::domain::{Decimal, SaleLine};
use serde::Serialize;
use std::collections::BTreeMap;

/// Bucket for sale lines recorded without a seller display name.
pub const ANONYMOUS_SELLER: &str = "anonymous";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerSummary {
    pub seller: String,
    pub total_sales: Decimal,
    pub total_invest: Decimal,
    pub total_profit: Decimal,
    pub units_sold: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopSalesSummary {
    pub sellers: Vec<SellerSummary>,
    pub total_sales: Decimal,
    pub total_invest: Decimal,
    pub total_profit: Decimal,
    pub units_sold: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSummary {
    pub total_sales: Decimal,
    pub admin_income: Decimal,
    pub product_count: i64,
    pub shop_count: i64,
    pub user_count: i64,
}

/// Seller's profit once the platform commission is taken, rounded up.
pub fn profit_after_platform_cut(total_sales: Decimal, total_invest: Decimal) -> Decimal {
    total_sales
        .saturating_sub(total_invest)
        .saturating_mul(seller_share())
        .ceil()
}

#[derive(Default)]
struct Totals {
    sales: Decimal,
    invest: Decimal,
    units: i64,
}

impl Totals {
    fn add(&mut self, line: &SaleLine) {
        self.sales = self.sales.saturating_add(line.revenue());
        self.invest = self.invest.saturating_add(line.invested());
        self.units = self.units.saturating_add(line.sold_quantity);
    }
}

fn seller_key(line: &SaleLine) -> &str {
    line.seller_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(ANONYMOUS_SELLER)
}

/// Group a shop's sale lines by seller display name.
///
/// Sellers are returned in name order. The shop-wide profit is computed from
/// the shop-wide totals, so it can differ by rounding from the sum of the
/// per-seller profits.
pub fn summarize_shop(lines: &[SaleLine]) -> ShopSalesSummary {
    let mut by_seller: BTreeMap<String, Totals> = BTreeMap::new();
    let mut overall = Totals::default();

    for line in lines {
        by_seller
            .entry(seller_key(line).to_string())
            .or_default()
            .add(line);
        overall.add(line);
    }

    let sellers = by_seller
        .into_iter()
        .map(|(seller, t)| SellerSummary {
            seller,
            total_profit: profit_after_platform_cut(t.sales, t.invest),
            total_sales: t.sales,
            total_invest: t.invest,
            units_sold: t.units,
        })
        .collect();

    ShopSalesSummary {
        sellers,
        total_profit: profit_after_platform_cut(overall.sales, overall.invest),
        total_sales: overall.sales,
        total_invest: overall.invest,
        units_sold: overall.units,
    }
}

/// Platform-wide sales from the live `(sales_count, selling_price)` counters.
///
/// Uses the current price, so a product repriced after selling is valued at
/// its new price.
pub fn lifetime_sales(counters: &[(i64, Decimal)]) -> Decimal {
    counters
        .iter()
        .map(|(count, price)| Decimal::from_int(*count).saturating_mul(*price))
        .sum()
}
