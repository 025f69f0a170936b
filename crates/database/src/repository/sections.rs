use super::parse_code;
use crate::DbError;
use core_types::{NewSection, SectionInfo, Semester};
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;

/// The joined projection every section read uses: course detail, the
/// assigned instructor, and live seat counts derived from currently
/// Enrolled rows. Seat counts read this way are advisory; the enroll
/// stored procedure recomputes them under a row lock before committing.
const SECTION_INFO_SELECT: &str = r"
    SELECT
        sec.section_id,
        c.course_id,
        c.course_name,
        c.credits,
        c.course_type,
        sec.semester,
        sec.year,
        sec.max_capacity,
        COALESCE(en.current_count, 0)::BIGINT AS current_enrollment,
        (sec.max_capacity - COALESCE(en.current_count, 0))::BIGINT AS available_spots,
        sec.time_slot,
        sec.location,
        i.name AS instructor_name
    FROM sections sec
    JOIN courses c ON sec.course_id = c.course_id
    LEFT JOIN instructors i ON sec.instructor_id = i.instructor_id
    LEFT JOIN (
        SELECT section_id, COUNT(*) AS current_count
        FROM enrollments
        WHERE status = 'Enrolled'
        GROUP BY section_id
    ) en ON sec.section_id = en.section_id
";

#[derive(Debug, Clone)]
pub struct SectionRepository {
    pool: PgPool,
}

impl SectionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, section: &NewSection) -> Result<i32, DbError> {
        let row = sqlx::query(
            "INSERT INTO sections
                 (course_id, instructor_id, semester, year, max_capacity, time_slot, location)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING section_id",
        )
        .bind(&section.course_id)
        .bind(&section.instructor_id)
        .bind(section.semester.as_str())
        .bind(section.year)
        .bind(section.max_capacity)
        .bind(&section.time_slot)
        .bind(&section.location)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.try_get("section_id")?)
    }

    pub async fn get_info(&self, section_id: i32) -> Result<Option<SectionInfo>, DbError> {
        let sql = format!("{SECTION_INFO_SELECT} WHERE sec.section_id = $1");
        let row = sqlx::query(&sql)
            .bind(section_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| map_section_info(&row)).transpose()
    }

    /// All sections offered in a term, with seat availability.
    pub async fn list_for_term(
        &self,
        semester: Semester,
        year: i32,
    ) -> Result<Vec<SectionInfo>, DbError> {
        let sql = format!(
            "{SECTION_INFO_SELECT}
             WHERE sec.semester = $1 AND sec.year = $2
             ORDER BY c.course_id, sec.section_id"
        );
        let rows = sqlx::query(&sql)
            .bind(semester.as_str())
            .bind(year)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(map_section_info).collect()
    }

    /// Sections taught by one instructor, newest term first.
    pub async fn list_for_instructor(
        &self,
        instructor_id: &str,
        term: Option<(Semester, i32)>,
    ) -> Result<Vec<SectionInfo>, DbError> {
        let rows = match term {
            Some((semester, year)) => {
                let sql = format!(
                    "{SECTION_INFO_SELECT}
                     WHERE sec.instructor_id = $1 AND sec.semester = $2 AND sec.year = $3
                     ORDER BY c.course_id, sec.section_id"
                );
                sqlx::query(&sql)
                    .bind(instructor_id)
                    .bind(semester.as_str())
                    .bind(year)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql = format!(
                    "{SECTION_INFO_SELECT}
                     WHERE sec.instructor_id = $1
                     ORDER BY sec.year DESC, sec.semester, c.course_id, sec.section_id"
                );
                sqlx::query(&sql)
                    .bind(instructor_id)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        rows.iter().map(map_section_info).collect()
    }
}

fn map_section_info(row: &PgRow) -> Result<SectionInfo, DbError> {
    Ok(SectionInfo {
        section_id: row.try_get("section_id")?,
        course_id: row.try_get("course_id")?,
        course_name: row.try_get("course_name")?,
        credits: row.try_get("credits")?,
        course_type: parse_code(row, "course_type")?,
        semester: parse_code(row, "semester")?,
        year: row.try_get("year")?,
        max_capacity: row.try_get("max_capacity")?,
        current_enrollment: row.try_get("current_enrollment")?,
        available_spots: row.try_get("available_spots")?,
        time_slot: row.try_get("time_slot")?,
        location: row.try_get("location")?,
        instructor_name: row.try_get("instructor_name")?,
    })
}
