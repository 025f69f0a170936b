use super::parse_code;
use crate::DbError;
use core_types::{Course, NewCourse};
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;

#[derive(Debug, Clone)]
pub struct CourseRepository {
    pool: PgPool,
}

impl CourseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, course: &NewCourse) -> Result<String, DbError> {
        sqlx::query(
            "INSERT INTO courses
                 (course_id, course_name, credits, department, course_type, description)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(&course.course_id)
        .bind(&course.course_name)
        .bind(course.credits)
        .bind(&course.department)
        .bind(course.course_type.as_str())
        .bind(&course.description)
        .execute(&self.pool)
        .await?;

        Ok(course.course_id.clone())
    }

    pub async fn get_by_id(&self, course_id: &str) -> Result<Option<Course>, DbError> {
        let row = sqlx::query("SELECT * FROM courses WHERE course_id = $1")
            .bind(course_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| map_course(&row)).transpose()
    }

    /// Lists the catalog, optionally restricted to one owning department.
    pub async fn list(&self, department: Option<&str>) -> Result<Vec<Course>, DbError> {
        let rows = match department {
            Some(dept) => {
                sqlx::query("SELECT * FROM courses WHERE department = $1 ORDER BY course_id")
                    .bind(dept)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                sqlx::query("SELECT * FROM courses ORDER BY course_id")
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        rows.iter().map(map_course).collect()
    }

    /// Case-insensitive substring search over course names and descriptions.
    pub async fn search(&self, term: &str) -> Result<Vec<Course>, DbError> {
        let pattern = format!("%{term}%");
        let rows = sqlx::query(
            "SELECT * FROM courses
             WHERE course_name ILIKE $1 OR description ILIKE $1
             ORDER BY course_id",
        )
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_course).collect()
    }
}

fn map_course(row: &PgRow) -> Result<Course, DbError> {
    Ok(Course {
        course_id: row.try_get("course_id")?,
        course_name: row.try_get("course_name")?,
        credits: row.try_get("credits")?,
        department: row.try_get("department")?,
        course_type: parse_code(row, "course_type")?,
        description: row.try_get("description")?,
        created_date: row.try_get("created_date")?,
        updated_date: row.try_get("updated_date")?,
    })
}
