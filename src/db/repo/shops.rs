use super::{email_column, time_column, Repository};
use crate::domain::{Email, Shop};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tracing::{info, warn};

const SHOP_COLUMNS: &str = r#"
    id, owner_email, owner_name, name, logo_url, description, location, product_limit, created_at
"#;

impl Repository {
    /// Insert a shop unless its owner already has one.
    ///
    /// Ownership uniqueness is enforced by the `UNIQUE(owner_email)` constraint,
    /// so two concurrent requests cannot both succeed. Returns false on conflict.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub async fn create_shop(&self, shop: &Shop) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO shops (
                id, owner_email, owner_name, name, logo_url, description, location,
                product_limit, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(owner_email) DO NOTHING
            "#,
        )
        .bind(&shop.id)
        .bind(shop.owner_email.as_str())
        .bind(shop.owner_name.as_deref())
        .bind(&shop.name)
        .bind(shop.logo_url.as_deref())
        .bind(shop.description.as_deref())
        .bind(shop.location.as_deref())
        .bind(shop.product_limit)
        .bind(shop.created_at.timestamp_millis())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn shop_for_owner(&self, owner: &Email) -> Result<Option<Shop>, sqlx::Error> {
        let sql = format!("SELECT {} FROM shops WHERE owner_email = ?", SHOP_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(owner.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(shop_from_row).transpose()
    }

    pub async fn count_shops(&self) -> Result<i64, sqlx::Error> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM shops")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("n"))
    }

    /// Raise the owner's product limit and credit the price to the admin account.
    ///
    /// Both increments run in one transaction. Returns `Ok(None)` if the owner
    /// has no shop; fails with `RowNotFound` (and changes nothing) if `admin`
    /// is not an admin account.
    ///
    /// # Errors
    /// Returns an error if the transaction fails.
    pub async fn increase_product_limit(
        &self,
        owner: &Email,
        increment: i64,
        admin: &Email,
        price_cents: i64,
    ) -> Result<Option<Shop>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let raised = sqlx::query(
            "UPDATE shops SET product_limit = product_limit + ? WHERE owner_email = ?",
        )
        .bind(increment)
        .bind(owner.as_str())
        .execute(&mut *tx)
        .await?;
        if raised.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        let credited = sqlx::query(
            r#"
            UPDATE users SET income_cents = income_cents + ?
            WHERE email = ? AND role = 'admin'
            "#,
        )
        .bind(price_cents)
        .bind(admin.as_str())
        .execute(&mut *tx)
        .await?;
        if credited.rows_affected() == 0 {
            warn!(admin = %admin, "Admin account missing, product limit not raised");
            tx.rollback().await?;
            return Err(sqlx::Error::RowNotFound);
        }

        let sql = format!("SELECT {} FROM shops WHERE owner_email = ?", SHOP_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(owner.as_str())
            .fetch_one(&mut *tx)
            .await?;
        let shop = shop_from_row(&row)?;

        tx.commit().await?;

        info!(
            shop_id = %shop.id,
            product_limit = shop.product_limit,
            price_cents,
            "Product limit raised"
        );
        Ok(Some(shop))
    }
}

fn shop_from_row(row: &SqliteRow) -> Result<Shop, sqlx::Error> {
    Ok(Shop {
        id: row.get("id"),
        owner_email: email_column(row, "owner_email")?,
        owner_name: row.get("owner_name"),
        name: row.get("name"),
        logo_url: row.get("logo_url"),
        description: row.get("description"),
        location: row.get("location"),
        product_limit: row.get("product_limit"),
        created_at: time_column(row, "created_at"),
    })
}
