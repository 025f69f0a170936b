//! The enrollment allocation workflow.
//!
//! Eligibility is evaluated here, in process, against an advisory snapshot
//! of the student's current-term load and the section's seat counts. The
//! final arbiter is the atomic stored procedure: it re-checks capacity and
//! the duplicate constraint under a row lock, so two clients racing for
//! the last seat can never both win regardless of what this check saw.

use crate::ServiceError;
use configuration::AcademicRules;
use core_types::{grade_points, EnrollmentInfo, EnrollmentStatus, SectionInfo};
use database::repository::enrollments::{
    MSG_ALREADY_ENROLLED, MSG_SECTION_FULL, MSG_SECTION_NOT_FOUND, MSG_STUDENT_NOT_FOUND,
};
use database::{EnrollmentRepository, SectionRepository};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{info, warn};

/// A rule violation that blocks an enrollment outright.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EligibilityError {
    #[error("Section is full")]
    SectionFull,

    #[error("Enrolling would exceed the {limit}-credit semester limit")]
    CreditLimitExceeded { limit: Decimal },

    #[error("Time conflict with an existing enrollment at {time_slot}")]
    TimeConflict { time_slot: String },

    #[error("Already enrolled in this section")]
    AlreadyEnrolled,
}

/// An advisory condition the student should know about but which does not
/// block the enrollment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EligibilityWarning {
    BelowMinimumCredits { minimum: Decimal },
}

impl std::fmt::Display for EligibilityWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BelowMinimumCredits { minimum } => {
                write!(f, "Current load is below the {minimum}-credit semester minimum")
            }
        }
    }
}

/// A committed enrollment together with the advisory warnings raised on
/// the way in.
#[derive(Debug, Clone)]
pub struct EnrollmentReceipt {
    pub section: SectionInfo,
    pub warnings: Vec<EligibilityWarning>,
}

/// Evaluates the enrollment rules for one (student, section) pair.
///
/// `current_term` must hold the student's enrollments for the section's
/// own term; rows in any status may be passed and only Enrolled ones
/// count toward load and conflicts. Rules are checked in a fixed order so
/// a request violating several reports the same one every time: capacity,
/// then the credit ceiling, then the advisory minimum, then time
/// conflicts, then the duplicate check.
pub fn check_eligibility(
    section: &SectionInfo,
    current_term: &[EnrollmentInfo],
    rules: &AcademicRules,
) -> Result<Vec<EligibilityWarning>, EligibilityError> {
    if section.is_full() {
        return Err(EligibilityError::SectionFull);
    }

    let active: Vec<&EnrollmentInfo> = current_term
        .iter()
        .filter(|e| e.status == EnrollmentStatus::Enrolled)
        .collect();

    let current_credits: Decimal = active.iter().map(|e| e.credits).sum();
    if current_credits + section.credits > rules.max_credits_per_semester {
        return Err(EligibilityError::CreditLimitExceeded {
            limit: rules.max_credits_per_semester,
        });
    }

    let mut warnings = Vec::new();
    if active.is_empty() && section.credits < rules.min_credits_per_semester {
        warnings.push(EligibilityWarning::BelowMinimumCredits {
            minimum: rules.min_credits_per_semester,
        });
    }

    // Time slots are opaque strings; two sections conflict only when their
    // slots are exactly equal.
    if let Some(slot) = section.time_slot.as_deref() {
        if let Some(clash) = active
            .iter()
            .find(|e| e.time_slot.as_deref() == Some(slot))
        {
            return Err(EligibilityError::TimeConflict {
                time_slot: clash.time_slot.clone().unwrap_or_default(),
            });
        }
    }

    if active.iter().any(|e| e.section_id == section.section_id) {
        return Err(EligibilityError::AlreadyEnrolled);
    }

    Ok(warnings)
}

/// Validates a final grade and derives the grade points and terminal
/// status it earns at the given passing line. Rejects grades outside
/// [0, 100] before anything touches storage.
pub fn evaluate_grade(
    final_grade: Decimal,
    passing_grade: Decimal,
) -> Result<(Decimal, EnrollmentStatus), ServiceError> {
    if final_grade < Decimal::ZERO || final_grade > Decimal::from(100) {
        return Err(ServiceError::Validation(
            "Grade must be between 0 and 100".to_string(),
        ));
    }

    let points = grade_points(final_grade);
    let status = if final_grade >= passing_grade {
        EnrollmentStatus::Completed
    } else {
        EnrollmentStatus::Failed
    };
    Ok((points, status))
}

/// Drives enrollments, drops, and grade posting.
pub struct EnrollmentService {
    sections: SectionRepository,
    enrollments: EnrollmentRepository,
    rules: AcademicRules,
}

impl EnrollmentService {
    pub fn new(
        sections: SectionRepository,
        enrollments: EnrollmentRepository,
        rules: AcademicRules,
    ) -> Self {
        Self {
            sections,
            enrollments,
            rules,
        }
    }

    /// Enrolls a student in a section.
    ///
    /// Runs the advisory eligibility check first so most failures are
    /// reported without a write, then hands the request to the atomic
    /// stored procedure, which is the only path that creates an Enrolled
    /// row. Procedure refusals are mapped back to the same typed errors
    /// the advisory check raises.
    pub async fn enroll(
        &self,
        student_id: &str,
        section_id: i32,
    ) -> Result<EnrollmentReceipt, ServiceError> {
        let section = self
            .sections
            .get_info(section_id)
            .await?
            .ok_or(ServiceError::NotFound("section"))?;

        let current_term = self
            .enrollments
            .for_student(student_id, Some((section.semester, section.year)))
            .await?;

        let warnings = check_eligibility(&section, &current_term, &self.rules)?;

        let outcome = self.enrollments.enroll(student_id, section_id).await?;
        if outcome.success {
            info!(student_id, section_id, "enrollment committed");
            return Ok(EnrollmentReceipt { section, warnings });
        }

        // The procedure saw something the advisory snapshot missed, most
        // often a race for the last seat.
        warn!(student_id, section_id, reason = %outcome.message, "enrollment refused");
        match outcome.message.as_str() {
            MSG_SECTION_FULL => Err(EligibilityError::SectionFull.into()),
            MSG_ALREADY_ENROLLED => Err(EligibilityError::AlreadyEnrolled.into()),
            MSG_SECTION_NOT_FOUND => Err(ServiceError::NotFound("section")),
            MSG_STUDENT_NOT_FOUND => Err(ServiceError::NotFound("student")),
            _ => Err(ServiceError::Validation(outcome.message)),
        }
    }

    /// Drops the student's active enrollment in a section. Completed,
    /// Failed, and already-Dropped enrollments cannot be dropped.
    pub async fn drop(&self, student_id: &str, section_id: i32) -> Result<(), ServiceError> {
        if self.enrollments.drop_enrollment(student_id, section_id).await? {
            info!(student_id, section_id, "enrollment dropped");
            Ok(())
        } else {
            Err(ServiceError::NotFound("active enrollment"))
        }
    }

    /// Posts a final grade on an active enrollment, deriving grade points
    /// from the institutional scale and the terminal status from the
    /// passing line.
    pub async fn post_grade(
        &self,
        enrollment_id: i64,
        final_grade: Decimal,
    ) -> Result<EnrollmentStatus, ServiceError> {
        let (points, status) = evaluate_grade(final_grade, self.rules.passing_grade)?;

        if self
            .enrollments
            .record_grade(enrollment_id, final_grade, points, status)
            .await?
        {
            info!(enrollment_id, %final_grade, %status, "grade posted");
            Ok(status)
        } else {
            Err(ServiceError::NotFound("active enrollment"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{CourseType, Semester};
    use rust_decimal_macros::dec;

    fn rules() -> AcademicRules {
        AcademicRules {
            min_credits_per_semester: dec!(10),
            max_credits_per_semester: dec!(40),
            passing_grade: dec!(60),
        }
    }

    fn section(section_id: i32, credits: Decimal, available: i64, slot: Option<&str>) -> SectionInfo {
        SectionInfo {
            section_id,
            course_id: format!("CS{section_id}"),
            course_name: "Algorithms".to_string(),
            credits,
            course_type: CourseType::MajorRequired,
            semester: Semester::Fall,
            year: 2024,
            max_capacity: 30,
            current_enrollment: 30 - available,
            available_spots: available,
            time_slot: slot.map(str::to_string),
            location: None,
            instructor_name: None,
        }
    }

    fn enrollment(
        section_id: i32,
        credits: Decimal,
        slot: Option<&str>,
        status: EnrollmentStatus,
    ) -> EnrollmentInfo {
        EnrollmentInfo {
            enrollment_id: section_id as i64,
            student_id: "S1001".to_string(),
            student_name: "Test Student".to_string(),
            course_id: format!("CS{section_id}"),
            course_name: "Algorithms".to_string(),
            credits,
            section_id,
            semester: Semester::Fall,
            year: 2024,
            time_slot: slot.map(str::to_string),
            location: None,
            instructor_name: None,
            status,
            final_grade: None,
            grade_points: None,
            enrollment_date: None,
        }
    }

    #[test]
    fn a_full_section_is_refused_first() {
        let target = section(1, dec!(3), 0, None);
        // Even with a duplicate in the load, capacity is reported.
        let load = vec![enrollment(1, dec!(3), None, EnrollmentStatus::Enrolled)];
        assert_eq!(
            check_eligibility(&target, &load, &rules()),
            Err(EligibilityError::SectionFull)
        );
    }

    #[test]
    fn the_credit_ceiling_is_a_hard_stop() {
        // 38 current credits plus a 4-credit section breaches the 40 cap.
        let load = vec![
            enrollment(1, dec!(20), None, EnrollmentStatus::Enrolled),
            enrollment(2, dec!(18), None, EnrollmentStatus::Enrolled),
        ];
        let target = section(3, dec!(4), 5, None);
        assert_eq!(
            check_eligibility(&target, &load, &rules()),
            Err(EligibilityError::CreditLimitExceeded { limit: dec!(40) })
        );
    }

    #[test]
    fn landing_exactly_on_the_ceiling_is_allowed() {
        let load = vec![enrollment(1, dec!(37), None, EnrollmentStatus::Enrolled)];
        let target = section(2, dec!(3), 5, None);
        assert_eq!(check_eligibility(&target, &load, &rules()), Ok(vec![]));
    }

    #[test]
    fn dropped_rows_do_not_count_toward_the_load() {
        let load = vec![enrollment(1, dec!(38), None, EnrollmentStatus::Dropped)];
        let target = section(2, dec!(4), 5, None);
        assert!(check_eligibility(&target, &load, &rules()).is_ok());
    }

    #[test]
    fn a_small_first_enrollment_raises_the_minimum_warning() {
        let target = section(1, dec!(3), 5, None);
        assert_eq!(
            check_eligibility(&target, &[], &rules()),
            Ok(vec![EligibilityWarning::BelowMinimumCredits { minimum: dec!(10) }])
        );
    }

    #[test]
    fn the_minimum_warning_is_suppressed_once_anything_is_enrolled() {
        let load = vec![enrollment(1, dec!(2), None, EnrollmentStatus::Enrolled)];
        let target = section(2, dec!(3), 5, None);
        assert_eq!(check_eligibility(&target, &load, &rules()), Ok(vec![]));
    }

    #[test]
    fn identical_time_slots_conflict() {
        let load = vec![enrollment(
            1,
            dec!(3),
            Some("MWF 09:00-09:50"),
            EnrollmentStatus::Enrolled,
        )];
        let target = section(2, dec!(3), 5, Some("MWF 09:00-09:50"));
        assert_eq!(
            check_eligibility(&target, &load, &rules()),
            Err(EligibilityError::TimeConflict {
                time_slot: "MWF 09:00-09:50".to_string()
            })
        );
    }

    #[test]
    fn overlapping_but_unequal_slots_do_not_conflict() {
        let load = vec![enrollment(
            1,
            dec!(3),
            Some("MWF 09:00-09:50"),
            EnrollmentStatus::Enrolled,
        )];
        let target = section(2, dec!(3), 5, Some("MWF 09:30-10:20"));
        assert!(check_eligibility(&target, &load, &rules()).is_ok());
    }

    #[test]
    fn a_dropped_slot_does_not_conflict() {
        let load = vec![enrollment(
            1,
            dec!(3),
            Some("MWF 09:00-09:50"),
            EnrollmentStatus::Dropped,
        )];
        let target = section(2, dec!(3), 5, Some("MWF 09:00-09:50"));
        assert!(check_eligibility(&target, &load, &rules()).is_ok());
    }

    #[test]
    fn an_active_duplicate_is_refused() {
        let load = vec![enrollment(7, dec!(3), None, EnrollmentStatus::Enrolled)];
        let target = section(7, dec!(3), 5, None);
        assert_eq!(
            check_eligibility(&target, &load, &rules()),
            Err(EligibilityError::AlreadyEnrolled)
        );
    }

    #[test]
    fn a_dropped_duplicate_may_re_enroll() {
        let load = vec![enrollment(7, dec!(3), None, EnrollmentStatus::Dropped)];
        let target = section(7, dec!(3), 5, None);
        assert!(check_eligibility(&target, &load, &rules()).is_ok());
    }

    #[test]
    fn a_passing_grade_completes_the_course() {
        let (points, status) = evaluate_grade(dec!(75), dec!(60)).unwrap();
        assert_eq!(points, dec!(3.0));
        assert_eq!(status, EnrollmentStatus::Completed);
    }

    #[test]
    fn a_failing_grade_fails_it() {
        let (points, status) = evaluate_grade(dec!(55), dec!(60)).unwrap();
        assert_eq!(points, dec!(0.0));
        assert_eq!(status, EnrollmentStatus::Failed);
    }

    #[test]
    fn the_passing_line_itself_completes() {
        let (points, status) = evaluate_grade(dec!(60), dec!(60)).unwrap();
        assert_eq!(points, dec!(1.0));
        assert_eq!(status, EnrollmentStatus::Completed);
    }

    #[test]
    fn out_of_range_grades_are_rejected() {
        assert!(matches!(
            evaluate_grade(dec!(-0.5), dec!(60)),
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(
            evaluate_grade(dec!(100.5), dec!(60)),
            Err(ServiceError::Validation(_))
        ));
        // The range bounds themselves are valid grades.
        assert!(evaluate_grade(dec!(0), dec!(60)).is_ok());
        assert!(evaluate_grade(dec!(100), dec!(60)).is_ok());
    }
}
