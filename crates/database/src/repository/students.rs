use super::{parse_code_opt, users::UserRepository};
use crate::DbError;
use core_types::{NewAccount, NewStudent, Student};
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;

#[derive(Debug, Clone)]
pub struct StudentRepository {
    pool: PgPool,
}

impl StudentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the login account and the student profile as one
    /// transaction: if the profile insert fails, the account row is rolled
    /// back with it and no partial registration is ever visible.
    pub async fn register(
        &self,
        student: &NewStudent,
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
            "INSERT INTO students
                 (student_id, user_id, name, gender, birth_date, email, phone,
                  college, major, enrollment_year)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(&student.student_id)
        .bind(user_id)
        .bind(&student.name)
        .bind(student.gender.map(|g| g.as_str()))
        .bind(student.birth_date)
        .bind(&student.email)
        .bind(&student.phone)
        .bind(&student.college)
        .bind(&student.major)
        .bind(student.enrollment_year)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(student.student_id.clone())
    }

    pub async fn get_by_id(&self, student_id: &str) -> Result<Option<Student>, DbError> {
        let row = sqlx::query("SELECT * FROM students WHERE student_id = $1")
            .bind(student_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| map_student(&row)).transpose()
    }

    pub async fn get_by_user_id(&self, user_id: i64) -> Result<Option<Student>, DbError> {
        let row = sqlx::query("SELECT * FROM students WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| map_student(&row)).transpose()
    }

    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Student>, DbError> {
        let rows = sqlx::query(
            "SELECT * FROM students ORDER BY student_id LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_student).collect()
    }
}

fn map_student(row: &PgRow) -> Result<Student, DbError> {
    Ok(Student {
        student_id: row.try_get("student_id")?,
        user_id: row.try_get("user_id")?,
        name: row.try_get("name")?,
        gender: parse_code_opt(row, "gender")?,
        birth_date: row.try_get("birth_date")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        college: row.try_get("college")?,
        major: row.try_get("major")?,
        enrollment_year: row.try_get("enrollment_year")?,
        created_date: row.try_get("created_date")?,
        updated_date: row.try_get("updated_date")?,
    })
}
