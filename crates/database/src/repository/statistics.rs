use crate::DbError;
use core_types::{CourseStatistics, StudentGpa, SystemStatistics};
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;

/// Read-only aggregation queries: GPA via the stored procedure, course
/// statistics via the `course_statistics` view, and campus-wide counts.
#[derive(Debug, Clone)]
pub struct StatisticsRepository {
    pool: PgPool,
}

impl StatisticsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// GPA and credit totals for one student, or `None` for an unknown
    /// student ID. The weighted average itself comes from
    /// `sp_calculate_gpa`; the course counts are a supplementary query.
    pub async fn student_gpa(&self, student_id: &str) -> Result<Option<StudentGpa>, DbError> {
        let summary = sqlx::query(
            "SELECT s.name,
                    COUNT(e.enrollment_id)::BIGINT AS total_courses,
                    COUNT(e.enrollment_id) FILTER (WHERE e.status = 'Completed')::BIGINT
                        AS completed_courses
             FROM students s
             LEFT JOIN enrollments e ON s.student_id = e.student_id
             WHERE s.student_id = $1
             GROUP BY s.student_id, s.name",
        )
        .bind(student_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(summary) = summary else {
            return Ok(None);
        };

        let gpa_row = sqlx::query("SELECT gpa, total_credits FROM sp_calculate_gpa($1)")
            .bind(student_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(Some(StudentGpa {
            student_id: student_id.to_string(),
            student_name: summary.try_get("name")?,
            gpa: gpa_row.try_get("gpa")?,
            total_credits: gpa_row.try_get("total_credits")?,
            total_courses: summary.try_get("total_courses")?,
            completed_courses: summary.try_get("completed_courses")?,
        }))
    }

    pub async fn course_statistics(&self) -> Result<Vec<CourseStatistics>, DbError> {
        let rows = sqlx::query(
            "SELECT course_id, course_name, credits, department, dept_name,
                    total_enrollments, current_enrollments, completed_enrollments,
                    average_grade, pass_count, fail_count, pass_rate
             FROM course_statistics
             ORDER BY course_id",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_course_statistics).collect()
    }

    pub async fn system_statistics(&self) -> Result<SystemStatistics, DbError> {
        let row = sqlx::query(
            "SELECT
                 (SELECT COUNT(*) FROM students)    AS total_students,
                 (SELECT COUNT(*) FROM instructors) AS total_instructors,
                 (SELECT COUNT(*) FROM departments) AS total_departments,
                 (SELECT COUNT(*) FROM courses)     AS total_courses,
                 (SELECT COUNT(*) FROM enrollments) AS total_enrollments",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(SystemStatistics {
            total_students: row.try_get("total_students")?,
            total_instructors: row.try_get("total_instructors")?,
            total_departments: row.try_get("total_departments")?,
            total_courses: row.try_get("total_courses")?,
            total_enrollments: row.try_get("total_enrollments")?,
        })
    }
}

fn map_course_statistics(row: &PgRow) -> Result<CourseStatistics, DbError> {
    Ok(CourseStatistics {
        course_id: row.try_get("course_id")?,
        course_name: row.try_get("course_name")?,
        credits: row.try_get("credits")?,
        department: row.try_get("department")?,
        dept_name: row.try_get("dept_name")?,
        total_enrollments: row.try_get("total_enrollments")?,
        current_enrollments: row.try_get("current_enrollments")?,
        completed_enrollments: row.try_get("completed_enrollments")?,
        average_grade: row.try_get("average_grade")?,
        pass_count: row.try_get("pass_count")?,
        fail_count: row.try_get("fail_count")?,
        pass_rate: row.try_get("pass_rate")?,
    })
}
