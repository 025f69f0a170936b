use super::parse_code;
use crate::DbError;
use core_types::{EnrollmentInfo, EnrollmentStatus, Semester};
use rust_decimal::Decimal;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;

/// Refusal messages produced by `sp_enroll_student`. The migration defining
/// the procedure must stay in lockstep with these constants, since the
/// workflow maps them back to typed outcomes.
pub const MSG_SECTION_FULL: &str = "Section is full";
pub const MSG_ALREADY_ENROLLED: &str = "Already enrolled in this section";
pub const MSG_SECTION_NOT_FOUND: &str = "Section not found";
pub const MSG_STUDENT_NOT_FOUND: &str = "Student not found";

/// Outcome of the atomic enroll stored procedure.
#[derive(Debug, Clone)]
pub struct ProcedureOutcome {
    pub success: bool,
    pub message: String,
}

const ENROLLMENT_INFO_SELECT: &str = r"
    SELECT
        e.enrollment_id,
        e.student_id,
        s.name AS student_name,
        c.course_id,
        c.course_name,
        c.credits,
        sec.section_id,
        sec.semester,
        sec.year,
        sec.time_slot,
        sec.location,
        i.name AS instructor_name,
        e.status,
        e.final_grade,
        e.grade_points,
        e.enrollment_date
    FROM enrollments e
    JOIN students s ON e.student_id = s.student_id
    JOIN sections sec ON e.section_id = sec.section_id
    JOIN courses c ON sec.course_id = c.course_id
    LEFT JOIN instructors i ON sec.instructor_id = i.instructor_id
";

#[derive(Debug, Clone)]
pub struct EnrollmentRepository {
    pool: PgPool,
}

impl EnrollmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Runs the atomic enroll procedure. The procedure locks the section
    /// row, re-checks capacity and the duplicate-enrollment constraint, and
    /// inserts the Enrolled row, all inside one database transaction; the
    /// store, not this process, arbitrates races for the last seat.
    pub async fn enroll(
        &self,
        student_id: &str,
        section_id: i32,
    ) -> Result<ProcedureOutcome, DbError> {
        let row = sqlx::query("SELECT success, message FROM sp_enroll_student($1, $2)")
            .bind(student_id)
            .bind(section_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(ProcedureOutcome {
            success: row.try_get("success")?,
            message: row.try_get("message")?,
        })
    }

    /// Transitions the unique Enrolled row for (student, section) to
    /// Dropped. Returns `false` when no such row exists, which callers
    /// report as a failure rather than a silent no-op.
    pub async fn drop_enrollment(
        &self,
        student_id: &str,
        section_id: i32,
    ) -> Result<bool, DbError> {
        let result = sqlx::query(
            "UPDATE enrollments
             SET status = 'Dropped', updated_date = NOW()
             WHERE student_id = $1 AND section_id = $2 AND status = 'Enrolled'",
        )
        .bind(student_id)
        .bind(section_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Persists the final grade, the derived grade points, and the
    /// resulting terminal status in one statement. Only an Enrolled row may
    /// be graded; Completed, Failed, and Dropped are terminal here.
    pub async fn record_grade(
        &self,
        enrollment_id: i64,
        final_grade: Decimal,
        grade_points: Decimal,
        status: EnrollmentStatus,
    ) -> Result<bool, DbError> {
        let result = sqlx::query(
            "UPDATE enrollments
             SET final_grade = $1, grade_points = $2, status = $3, updated_date = NOW()
             WHERE enrollment_id = $4 AND status = 'Enrolled'",
        )
        .bind(final_grade)
        .bind(grade_points)
        .bind(status.as_str())
        .bind(enrollment_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// A student's enrollment history, optionally narrowed to one term.
    pub async fn for_student(
        &self,
        student_id: &str,
        term: Option<(Semester, i32)>,
    ) -> Result<Vec<EnrollmentInfo>, DbError> {
        let rows = match term {
            Some((semester, year)) => {
                let sql = format!(
                    "{ENROLLMENT_INFO_SELECT}
                     WHERE e.student_id = $1 AND sec.semester = $2 AND sec.year = $3
                     ORDER BY c.course_id"
                );
                sqlx::query(&sql)
                    .bind(student_id)
                    .bind(semester.as_str())
                    .bind(year)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql = format!(
                    "{ENROLLMENT_INFO_SELECT}
                     WHERE e.student_id = $1
                     ORDER BY sec.year DESC, sec.semester, c.course_id"
                );
                sqlx::query(&sql)
                    .bind(student_id)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        rows.iter().map(map_enrollment_info).collect()
    }

    /// The roster for one section, every status included, ordered by name.
    pub async fn for_section(&self, section_id: i32) -> Result<Vec<EnrollmentInfo>, DbError> {
        let sql = format!(
            "{ENROLLMENT_INFO_SELECT}
             WHERE e.section_id = $1
             ORDER BY s.name"
        );
        let rows = sqlx::query(&sql)
            .bind(section_id)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(map_enrollment_info).collect()
    }
}

fn map_enrollment_info(row: &PgRow) -> Result<EnrollmentInfo, DbError> {
    Ok(EnrollmentInfo {
        enrollment_id: row.try_get("enrollment_id")?,
        student_id: row.try_get("student_id")?,
        student_name: row.try_get("student_name")?,
        course_id: row.try_get("course_id")?,
        course_name: row.try_get("course_name")?,
        credits: row.try_get("credits")?,
        section_id: row.try_get("section_id")?,
        semester: parse_code(row, "semester")?,
        year: row.try_get("year")?,
        time_slot: row.try_get("time_slot")?,
        location: row.try_get("location")?,
        instructor_name: row.try_get("instructor_name")?,
        status: parse_code(row, "status")?,
        final_grade: row.try_get("final_grade")?,
        grade_points: row.try_get("grade_points")?,
        enrollment_date: row.try_get("enrollment_date")?,
    })
}
