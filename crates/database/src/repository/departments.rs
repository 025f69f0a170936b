use crate::DbError;
use core_types::{Department, NewDepartment};
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;

#[derive(Debug, Clone)]
pub struct DepartmentRepository {
    pool: PgPool,
}

impl DepartmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, department: &NewDepartment) -> Result<String, DbError> {
        sqlx::query(
            "INSERT INTO departments (dept_id, dept_name, dept_head) VALUES ($1, $2, $3)",
        )
        .bind(&department.dept_id)
        .bind(&department.dept_name)
        .bind(&department.dept_head)
        .execute(&self.pool)
        .await?;

        Ok(department.dept_id.clone())
    }

    pub async fn list_all(&self) -> Result<Vec<Department>, DbError> {
        let rows = sqlx::query("SELECT * FROM departments ORDER BY dept_name")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(map_department).collect()
    }
}

fn map_department(row: &PgRow) -> Result<Department, DbError> {
    Ok(Department {
        dept_id: row.try_get("dept_id")?,
        dept_name: row.try_get("dept_name")?,
        dept_head: row.try_get("dept_head")?,
        created_date: row.try_get("created_date")?,
        updated_date: row.try_get("updated_date")?,
    })
}
