use super::{decimal_column, email_column, time_column, Repository};
use crate::domain::{CartLine, Email};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

impl Repository {
    /// Add one unit of a product to the owner's cart.
    ///
    /// Inserts `line` as a new single-unit row, or increments the existing
    /// (owner, product) row by exactly one. The stored price snapshot of an
    /// existing row is left as it was. Returns the stored line.
    ///
    /// # Errors
    /// Returns an error if the upsert fails.
    pub async fn upsert_cart_line(&self, line: &CartLine) -> Result<CartLine, sqlx::Error> {
        let row = sqlx::query(
            r#"
            INSERT INTO cart_lines (
                owner_email, product_id, shop_id, product_name,
                product_cost, selling_price, sold_quantity, added_at
            ) VALUES (?, ?, ?, ?, ?, ?, 1, ?)
            ON CONFLICT(owner_email, product_id)
                DO UPDATE SET sold_quantity = sold_quantity + 1
            RETURNING owner_email, product_id, shop_id, product_name,
                      product_cost, selling_price, sold_quantity, added_at
            "#,
        )
        .bind(line.owner_email.as_str())
        .bind(&line.product_id)
        .bind(&line.shop_id)
        .bind(&line.product_name)
        .bind(line.product_cost.to_canonical_string())
        .bind(line.selling_price.to_canonical_string())
        .bind(line.added_at.timestamp_millis())
        .fetch_one(&self.pool)
        .await?;

        cart_line_from_row(&row)
    }

    pub async fn cart_lines(&self, owner: &Email) -> Result<Vec<CartLine>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT owner_email, product_id, shop_id, product_name,
                   product_cost, selling_price, sold_quantity, added_at
            FROM cart_lines
            WHERE owner_email = ?
            ORDER BY added_at ASC, product_id ASC
            "#,
        )
        .bind(owner.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(cart_line_from_row).collect()
    }

    /// Delete the (owner, product) line. Idempotent: returns 0 if it was absent.
    pub async fn remove_cart_line(&self, owner: &Email, product_id: &str) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM cart_lines WHERE owner_email = ? AND product_id = ?")
            .bind(owner.as_str())
            .bind(product_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

fn cart_line_from_row(row: &SqliteRow) -> Result<CartLine, sqlx::Error> {
    Ok(CartLine {
        owner_email: email_column(row, "owner_email")?,
        shop_id: row.get("shop_id"),
        product_id: row.get("product_id"),
        product_name: row.get("product_name"),
        product_cost: decimal_column(row, "product_cost")?,
        selling_price: decimal_column(row, "selling_price")?,
        sold_quantity: row.get("sold_quantity"),
        added_at: time_column(row, "added_at"),
    })
}
