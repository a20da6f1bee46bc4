use super::{decimal_column, email_column, time_column, Repository};
use crate::domain::{Decimal, Email, Product};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tracing::debug;

const PRODUCT_COLUMNS: &str = r#"
    id, shop_id, owner_email, name, image_url, location, description,
    cost, profit_margin, selling_price, quantity, sales_count, created_at
"#;

impl Repository {
    /// Insert a product only while its shop is below the product limit.
    ///
    /// The count check and the insert are one statement, so concurrent
    /// creations cannot overshoot the limit. Returns false when the limit is
    /// reached (or the shop does not exist).
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub async fn insert_product_within_limit(&self, product: &Product) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO products (
                id, shop_id, owner_email, name, image_url, location, description,
                cost, profit_margin, selling_price, quantity, sales_count, created_at
            )
            SELECT ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?
            WHERE (SELECT COUNT(*) FROM products WHERE shop_id = ?)
                < (SELECT product_limit FROM shops WHERE id = ?)
            "#,
        )
        .bind(&product.id)
        .bind(&product.shop_id)
        .bind(product.owner_email.as_str())
        .bind(&product.name)
        .bind(product.image_url.as_deref())
        .bind(product.location.as_deref())
        .bind(product.description.as_deref())
        .bind(product.cost.to_canonical_string())
        .bind(product.profit_margin.to_canonical_string())
        .bind(product.selling_price.to_canonical_string())
        .bind(product.quantity)
        .bind(product.sales_count)
        .bind(product.created_at.timestamp_millis())
        .bind(&product.shop_id)
        .bind(&product.shop_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn products_for_owner(&self, owner: &Email) -> Result<Vec<Product>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM products WHERE owner_email = ? ORDER BY created_at DESC, id ASC",
            PRODUCT_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(owner.as_str())
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(product_from_row).collect()
    }

    pub async fn get_product(&self, id: &str) -> Result<Option<Product>, sqlx::Error> {
        let sql = format!("SELECT {} FROM products WHERE id = ?", PRODUCT_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(product_from_row).transpose()
    }

    /// Fetch a product only if `owner` owns it.
    pub async fn get_owned_product(
        &self,
        id: &str,
        owner: &Email,
    ) -> Result<Option<Product>, sqlx::Error> {
        Ok(self
            .get_product(id)
            .await?
            .filter(|p| &p.owner_email == owner))
    }

    /// Persist edited product fields and the recomputed price.
    ///
    /// `sales_count` is never written here, and `quantity` only when
    /// `quantity_override` is set, so a concurrent sale's decrement is not
    /// overwritten by a stale read.
    ///
    /// # Errors
    /// Returns an error if the update fails.
    pub async fn update_product(
        &self,
        product: &Product,
        quantity_override: Option<i64>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = ?, image_url = ?, location = ?, description = ?,
                cost = ?, profit_margin = ?, selling_price = ?,
                quantity = COALESCE(?, quantity)
            WHERE id = ? AND owner_email = ?
            "#,
        )
        .bind(&product.name)
        .bind(product.image_url.as_deref())
        .bind(product.location.as_deref())
        .bind(product.description.as_deref())
        .bind(product.cost.to_canonical_string())
        .bind(product.profit_margin.to_canonical_string())
        .bind(product.selling_price.to_canonical_string())
        .bind(quantity_override)
        .bind(&product.id)
        .bind(product.owner_email.as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Returns the number of deleted rows (0 or 1).
    pub async fn delete_product(&self, id: &str) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Inventory ledger: record `sold_quantity` units sold.
    ///
    /// One conditional update: only products with `quantity > 0` are touched.
    /// The guard does not compare against `sold_quantity`, so a sale larger
    /// than the remaining stock still applies and drives `quantity` negative.
    /// Returns whether a product row was modified.
    ///
    /// # Errors
    /// Returns an error if the update fails.
    pub async fn apply_sale(&self, product_id: &str, sold_quantity: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET sales_count = sales_count + ?, quantity = quantity - ?
            WHERE id = ? AND quantity > 0
            "#,
        )
        .bind(sold_quantity)
        .bind(sold_quantity)
        .bind(product_id)
        .execute(&self.pool)
        .await?;

        let modified = result.rows_affected() > 0;
        debug!(product_id = %product_id, sold_quantity, modified, "Applied sale to inventory");
        Ok(modified)
    }

    /// `(sales_count, selling_price)` for every product, for lifetime totals.
    pub async fn product_sales_counters(&self) -> Result<Vec<(i64, Decimal)>, sqlx::Error> {
        let rows = sqlx::query("SELECT sales_count, selling_price FROM products")
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| {
                let price = decimal_column(row, "selling_price")?;
                Ok((row.get::<i64, _>("sales_count"), price))
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()
    }
}

fn product_from_row(row: &SqliteRow) -> Result<Product, sqlx::Error> {
    Ok(Product {
        id: row.get("id"),
        shop_id: row.get("shop_id"),
        owner_email: email_column(row, "owner_email")?,
        name: row.get("name"),
        image_url: row.get("image_url"),
        location: row.get("location"),
        description: row.get("description"),
        cost: decimal_column(row, "cost")?,
        profit_margin: decimal_column(row, "profit_margin")?,
        selling_price: decimal_column(row, "selling_price")?,
        quantity: row.get("quantity"),
        sales_count: row.get("sales_count"),
        created_at: time_column(row, "created_at"),
    })
}
