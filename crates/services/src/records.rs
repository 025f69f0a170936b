//! Read-side views over a student's academic history and the
//! administrative aggregates.

use crate::ServiceError;
use core_types::{
    CourseStatistics, EnrollmentInfo, Semester, StudentGpa, SystemStatistics,
};
use database::{EnrollmentRepository, StatisticsRepository};
use rust_decimal::{Decimal, RoundingStrategy};

/// The transcript view: full enrollment history plus the GPA summary.
#[derive(Debug, Clone)]
pub struct Transcript {
    pub enrollments: Vec<EnrollmentInfo>,
    pub summary: StudentGpa,
}

/// Credit-weighted GPA over the graded rows of a history, to two decimal
/// places. Mirrors the aggregation `sp_calculate_gpa` performs in the
/// store, including its half-away-from-zero rounding; `None` when no
/// graded row exists. Enrolled and Dropped rows do not participate.
pub fn weighted_gpa(history: &[EnrollmentInfo]) -> Option<Decimal> {
    let graded: Vec<&EnrollmentInfo> = history
        .iter()
        .filter(|e| e.status.is_graded())
        .collect();

    let credits: Decimal = graded.iter().map(|e| e.credits).sum();
    if credits.is_zero() {
        return None;
    }

    let weighted: Decimal = graded
        .iter()
        .map(|e| e.credits * e.grade_points.unwrap_or_default())
        .sum();
    // Postgres ROUND(x, 2) rounds midpoints away from zero, not to even.
    Some((weighted / credits).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}

pub struct RecordsService {
    enrollments: EnrollmentRepository,
    statistics: StatisticsRepository,
}

impl RecordsService {
    pub fn new(enrollments: EnrollmentRepository, statistics: StatisticsRepository) -> Self {
        Self {
            enrollments,
            statistics,
        }
    }

    /// The student's enrollments for one term, all statuses included.
    pub async fn schedule(
        &self,
        student_id: &str,
        semester: Semester,
        year: i32,
    ) -> Result<Vec<EnrollmentInfo>, ServiceError> {
        Ok(self
            .enrollments
            .for_student(student_id, Some((semester, year)))
            .await?)
    }

    /// The full history with the GPA summary attached.
    pub async fn transcript(&self, student_id: &str) -> Result<Transcript, ServiceError> {
        let summary = self
            .statistics
            .student_gpa(student_id)
            .await?
            .ok_or(ServiceError::NotFound("student"))?;
        let enrollments = self.enrollments.for_student(student_id, None).await?;

        Ok(Transcript {
            enrollments,
            summary,
        })
    }

    pub async fn gpa(&self, student_id: &str) -> Result<StudentGpa, ServiceError> {
        self.statistics
            .student_gpa(student_id)
            .await?
            .ok_or(ServiceError::NotFound("student"))
    }

    /// The roster for one section, every status included.
    pub async fn section_roster(
        &self,
        section_id: i32,
    ) -> Result<Vec<EnrollmentInfo>, ServiceError> {
        Ok(self.enrollments.for_section(section_id).await?)
    }

    pub async fn course_statistics(&self) -> Result<Vec<CourseStatistics>, ServiceError> {
        Ok(self.statistics.course_statistics().await?)
    }

    pub async fn system_statistics(&self) -> Result<SystemStatistics, ServiceError> {
        Ok(self.statistics.system_statistics().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::EnrollmentStatus;
    use rust_decimal_macros::dec;

    fn row(credits: Decimal, points: Option<Decimal>, status: EnrollmentStatus) -> EnrollmentInfo {
        EnrollmentInfo {
            enrollment_id: 1,
            student_id: "S1001".to_string(),
            student_name: "Test Student".to_string(),
            course_id: "CS101".to_string(),
            course_name: "Intro".to_string(),
            credits,
            section_id: 1,
            semester: Semester::Fall,
            year: 2024,
            time_slot: None,
            location: None,
            instructor_name: None,
            status,
            final_grade: None,
            grade_points: points,
            enrollment_date: None,
        }
    }

    #[test]
    fn gpa_is_credit_weighted() {
        // (4*4.0 + 3*3.0 + 2*0.0) / 9 = 2.7777... -> 2.78
        let history = vec![
            row(dec!(4), Some(dec!(4.0)), EnrollmentStatus::Completed),
            row(dec!(3), Some(dec!(3.0)), EnrollmentStatus::Completed),
            row(dec!(2), Some(dec!(0.0)), EnrollmentStatus::Failed),
        ];
        assert_eq!(weighted_gpa(&history), Some(dec!(2.78)));
    }

    #[test]
    fn ungraded_rows_are_excluded() {
        let history = vec![
            row(dec!(3), Some(dec!(4.0)), EnrollmentStatus::Completed),
            row(dec!(5), None, EnrollmentStatus::Enrolled),
            row(dec!(5), Some(dec!(2.0)), EnrollmentStatus::Dropped),
        ];
        assert_eq!(weighted_gpa(&history), Some(dec!(4.00)));
    }

    #[test]
    fn no_graded_rows_means_no_gpa() {
        let history = vec![row(dec!(3), None, EnrollmentStatus::Enrolled)];
        assert_eq!(weighted_gpa(&history), None);
        assert_eq!(weighted_gpa(&[]), None);
    }

    #[test]
    fn midpoints_round_away_from_zero() {
        // (4*4.0 + 2*3.3 + 2*0.0) / 8 = 2.825, which must round to 2.83
        // exactly as the stored aggregation does, not to even (2.82).
        let history = vec![
            row(dec!(4), Some(dec!(4.0)), EnrollmentStatus::Completed),
            row(dec!(2), Some(dec!(3.3)), EnrollmentStatus::Completed),
            row(dec!(2), Some(dec!(0.0)), EnrollmentStatus::Failed),
        ];
        assert_eq!(weighted_gpa(&history), Some(dec!(2.83)));
    }

    #[test]
    fn failed_courses_drag_the_average_down() {
        let history = vec![
            row(dec!(3), Some(dec!(4.0)), EnrollmentStatus::Completed),
            row(dec!(3), Some(dec!(0.0)), EnrollmentStatus::Failed),
        ];
        assert_eq!(weighted_gpa(&history), Some(dec!(2.00)));
    }
}
