use super::parse_code;
use crate::DbError;
use core_types::{Account, AccountStatus, Role};
use sqlx::postgres::{PgPool, PgRow};
use sqlx::{PgConnection, Row};

/// Data access for login accounts. Credential hashes are handed out only to
/// the session service for verification and never embedded in entities.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts an account row on the caller's connection and returns the
    /// generated user ID. Registration couples this with a profile insert,
    /// so the transaction is owned by the calling repository.
    pub(crate) async fn insert_account(
        conn: &mut PgConnection,
        username: &str,
        password_hash: &str,
        role: Role,
        status: AccountStatus,
    ) -> Result<i64, DbError> {
        let row = sqlx::query(
            "INSERT INTO users (username, password_hash, role, status)
             VALUES ($1, $2, $3, $4)
             RETURNING user_id",
        )
        .bind(username)
        .bind(password_hash)
        .bind(role.as_str())
        .bind(status.as_str())
        .fetch_one(&mut *conn)
        .await?;

        Ok(row.try_get("user_id")?)
    }

    /// Fetches the active account for a username together with its stored
    /// credential hash. Unknown usernames and non-active accounts both come
    /// back as `None`; the caller must not learn which case occurred.
    pub async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<(Account, String)>, DbError> {
        let row = sqlx::query(
            "SELECT user_id, username, password_hash, role, status, created_date, last_login_date
             FROM users
             WHERE username = $1 AND status = 'Active'",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| {
            let hash: String = row.try_get("password_hash")?;
            Ok((map_account(&row)?, hash))
        })
        .transpose()
    }

    /// Stamps the last-login timestamp after a successful authentication.
    pub async fn touch_last_login(&self, user_id: i64) -> Result<(), DbError> {
        sqlx::query("UPDATE users SET last_login_date = NOW() WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

fn map_account(row: &PgRow) -> Result<Account, DbError> {
    Ok(Account {
        user_id: row.try_get("user_id")?,
        username: row.try_get("username")?,
        role: parse_code(row, "role")?,
        status: parse_code(row, "status")?,
        created_date: row.try_get("created_date")?,
        last_login_date: row.try_get("last_login_date")?,
    })
}
