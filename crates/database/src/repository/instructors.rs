use super::users::UserRepository;
use crate::DbError;
use core_types::{Instructor, NewAccount, NewInstructor};
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;

#[derive(Debug, Clone)]
pub struct InstructorRepository {
    pool: PgPool,
}

impl InstructorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the login account and the instructor profile in one
    /// transaction, mirroring student registration.
    pub async fn register(
        &self,
        instructor: &NewInstructor,
        account: &NewAccount,
        password_hash: &str,
    ) -> Result<String, DbError> {
        let mut tx = self.pool.begin().await?;

        let user_id = UserRepository::insert_account(
            &mut tx,
            &account.username,
            password_hash,
            account.role,
            account.status,
        )
        .await?;

        sqlx::query(
            "INSERT INTO instructors
                 (instructor_id, user_id, name, department, email, phone, title)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(&instructor.instructor_id)
        .bind(user_id)
        .bind(&instructor.name)
        .bind(&instructor.department)
        .bind(&instructor.email)
        .bind(&instructor.phone)
        .bind(&instructor.title)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(instructor.instructor_id.clone())
    }

    pub async fn get_by_id(&self, instructor_id: &str) -> Result<Option<Instructor>, DbError> {
        let row = sqlx::query("SELECT * FROM instructors WHERE instructor_id = $1")
            .bind(instructor_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| map_instructor(&row)).transpose()
    }

    pub async fn get_by_user_id(&self, user_id: i64) -> Result<Option<Instructor>, DbError> {
        let row = sqlx::query("SELECT * FROM instructors WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| map_instructor(&row)).transpose()
    }

    pub async fn list_all(&self) -> Result<Vec<Instructor>, DbError> {
        let rows = sqlx::query("SELECT * FROM instructors ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(map_instructor).collect()
    }
}

fn map_instructor(row: &PgRow) -> Result<Instructor, DbError> {
    Ok(Instructor {
        instructor_id: row.try_get("instructor_id")?,
        user_id: row.try_get("user_id")?,
        name: row.try_get("name")?,
        department: row.try_get("department")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        title: row.try_get("title")?,
        created_date: row.try_get("created_date")?,
        updated_date: row.try_get("updated_date")?,
    })
}
