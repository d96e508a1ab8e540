//! Database repository for admin account operations.
//!
//! Admin accounts are created only by the startup bootstrap routine, never
//! through the public API, so the surface here is intentionally small.

use crate::database::models::Admin;
use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

pub struct AdminRepository<'a> {
    /// Shared SQLite connection pool
    pool: &'a SqlitePool,
}

impl<'a> AdminRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, admin: &Admin) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO admins (id, name, email, password_hash, role, last_login, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&admin.id)
        .bind(&admin.name)
        .bind(&admin.email)
        .bind(&admin.password_hash)
        .bind(&admin.role)
        .bind(admin.last_login)
        .bind(admin.created_at)
        .bind(admin.updated_at)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<Admin>> {
        let admin = sqlx::query_as::<_, Admin>("SELECT * FROM admins WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(admin)
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<Admin>> {
        let admin = sqlx::query_as::<_, Admin>("SELECT * FROM admins WHERE email = ?")
            .bind(email)
            .fetch_optional(self.pool)
            .await?;

        Ok(admin)
    }

    /// Stamps the last successful login time.
    pub async fn update_last_login(&self, id: &str, at: DateTime<Utc>) -> Result<()> {
        sqlx::query("UPDATE admins SET last_login = ?, updated_at = ? WHERE id = ?")
            .bind(at)
            .bind(at)
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(())
    }
}
