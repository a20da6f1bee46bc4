use super::{cents_column, email_column, time_column, Repository};
use crate::domain::{Email, NewUser, Role, ShopLink, TimeMs, User};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::str::FromStr;
use tracing::{info, warn};

const USER_COLUMNS: &str = r#"
    email, name, photo_url, role, shop_id, shop_name, shop_logo, income_cents, created_at
"#;

impl Repository {
    /// Insert a user record. Returns false if the email is already registered.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub async fn insert_user(&self, user: &NewUser) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (email, name, photo_url, role, created_at)
            VALUES (?, ?, ?, 'user', ?)
            ON CONFLICT(email) DO NOTHING
            "#,
        )
        .bind(user.email.as_str())
        .bind(user.name.as_deref())
        .bind(user.photo_url.as_deref())
        .bind(TimeMs::now().as_ms())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Make sure the platform account exists and carries the admin role.
    pub async fn ensure_admin(&self, admin: &Email) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO users (email, role, created_at)
            VALUES (?, 'admin', ?)
            ON CONFLICT(email) DO UPDATE SET role = 'admin'
            "#,
        )
        .bind(admin.as_str())
        .bind(TimeMs::now().as_ms())
        .execute(&self.pool)
        .await?;

        info!(admin = %admin, "Admin account ready");
        Ok(())
    }

    pub async fn get_user(&self, email: &Email) -> Result<Option<User>, sqlx::Error> {
        let sql = format!("SELECT {} FROM users WHERE email = ?", USER_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(email.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    pub async fn list_users(&self) -> Result<Vec<User>, sqlx::Error> {
        let sql = format!("SELECT {} FROM users ORDER BY created_at ASC", USER_COLUMNS);
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

        rows.iter().map(user_from_row).collect()
    }

    pub async fn count_users(&self) -> Result<i64, sqlx::Error> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("n"))
    }

    /// Merge the provided shop linkage fields into a user record.
    ///
    /// Absent fields keep their stored value. Returns false if no such user exists.
    pub async fn link_shop(&self, email: &Email, link: &ShopLink) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET shop_id = COALESCE(?, shop_id),
                shop_name = COALESCE(?, shop_name),
                shop_logo = COALESCE(?, shop_logo)
            WHERE email = ?
            "#,
        )
        .bind(link.shop_id.as_deref())
        .bind(link.shop_name.as_deref())
        .bind(link.shop_logo.as_deref())
        .bind(email.as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Atomically add to the admin account's income.
    ///
    /// Returns false if `admin` is not an admin account.
    pub async fn credit_admin_income(
        &self,
        admin: &Email,
        amount_cents: i64,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE users SET income_cents = income_cents + ?
            WHERE email = ? AND role = 'admin'
            "#,
        )
        .bind(amount_cents)
        .bind(admin.as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn user_from_row(row: &SqliteRow) -> Result<User, sqlx::Error> {
    let role_str: String = row.get("role");
    let role = Role::from_str(&role_str).unwrap_or_else(|_| {
        warn!(role = %role_str, "Unknown role in users table, treating as user");
        Role::User
    });
    let income = (role == Role::Admin).then(|| cents_column(row, "income_cents"));

    Ok(User {
        email: email_column(row, "email")?,
        name: row.get("name"),
        photo_url: row.get("photo_url"),
        role,
        shop_id: row.get("shop_id"),
        shop_name: row.get("shop_name"),
        shop_logo: row.get("shop_logo"),
        income,
        created_at: time_column(row, "created_at"),
    })
}
