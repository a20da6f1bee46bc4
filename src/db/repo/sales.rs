use super::{decimal_column, email_column, time_column, Repository};
use crate::domain::SaleLine;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tracing::debug;

impl Repository {
    /// Append sale lines in a single transaction.
    ///
    /// Either every line is inserted or none is. Returns the new row ids in
    /// input order. An empty slice is a no-op.
    ///
    /// # Errors
    /// Returns an error if any insert or the commit fails.
    pub async fn insert_sale_batch(&self, lines: &[SaleLine]) -> Result<Vec<i64>, sqlx::Error> {
        if lines.is_empty() {
            return Ok(Vec::new());
        }

        let mut ids = Vec::with_capacity(lines.len());
        let mut tx = self.pool.begin().await?;

        for line in lines {
            let result = sqlx::query(
                r#"
                INSERT INTO sale_lines (
                    shop_id, product_id, product_name, product_cost, selling_price,
                    sold_quantity, sold_by, seller_name, sold_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&line.shop_id)
            .bind(&line.product_id)
            .bind(&line.product_name)
            .bind(line.product_cost.to_canonical_string())
            .bind(line.selling_price.to_canonical_string())
            .bind(line.sold_quantity)
            .bind(line.sold_by.as_str())
            .bind(line.seller_name.as_deref())
            .bind(line.sold_at.timestamp_millis())
            .execute(&mut *tx)
            .await?;

            ids.push(result.last_insert_rowid());
        }

        tx.commit().await?;
        debug!(count = ids.len(), "Sale batch committed");
        Ok(ids)
    }

    /// All sale lines of a shop, most recent first.
    pub async fn sales_for_shop(&self, shop_id: &str) -> Result<Vec<SaleLine>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT shop_id, product_id, product_name, product_cost, selling_price,
                   sold_quantity, sold_by, seller_name, sold_at
            FROM sale_lines
            WHERE shop_id = ?
            ORDER BY sold_at DESC, id DESC
            "#,
        )
        .bind(shop_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(sale_line_from_row).collect()
    }
}

fn sale_line_from_row(row: &SqliteRow) -> Result<SaleLine, sqlx::Error> {
    Ok(SaleLine {
        shop_id: row.get("shop_id"),
        product_id: row.get("product_id"),
        product_name: row.get("product_name"),
        product_cost: decimal_column(row, "product_cost")?,
        selling_price: decimal_column(row, "selling_price")?,
        sold_quantity: row.get("sold_quantity"),
        sold_by: email_column(row, "sold_by")?,
        seller_name: row.get("seller_name"),
        sold_at: time_column(row, "sold_at"),
    })
}
