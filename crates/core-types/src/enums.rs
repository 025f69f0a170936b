use crate::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The role an account holds, which gates the operations it may invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Student,
    Instructor,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "Student",
            Role::Instructor => "Instructor",
            Role::Admin => "Admin",
        }
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Student" => Ok(Role::Student),
            "Instructor" => Ok(Role::Instructor),
            "Admin" => Ok(Role::Admin),
            other => Err(CoreError::unknown_code("role", other)),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of an account. Only `Active` accounts may log in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountStatus {
    Active,
    Inactive,
    Pending,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Active => "Active",
            AccountStatus::Inactive => "Inactive",
            AccountStatus::Pending => "Pending",
        }
    }
}

impl FromStr for AccountStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Active" => Ok(AccountStatus::Active),
            "Inactive" => Ok(AccountStatus::Inactive),
            "Pending" => Ok(AccountStatus::Pending),
            other => Err(CoreError::unknown_code("account status", other)),
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
            Gender::Other => "Other",
        }
    }
}

impl FromStr for Gender {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "M" => Ok(Gender::Male),
            "F" => Ok(Gender::Female),
            "Other" => Ok(Gender::Other),
            other => Err(CoreError::unknown_code("gender", other)),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Academic term. A (semester, year) pair identifies one term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Semester {
    Spring,
    Summer,
    Fall,
}

impl Semester {
    pub fn as_str(&self) -> &'static str {
        match self {
            Semester::Spring => "Spring",
            Semester::Summer => "Summer",
            Semester::Fall => "Fall",
        }
    }
}

impl FromStr for Semester {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Spring" => Ok(Semester::Spring),
            "Summer" => Ok(Semester::Summer),
            "Fall" => Ok(Semester::Fall),
            other => Err(CoreError::unknown_code("semester", other)),
        }
    }
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State of one enrollment attempt.
///
/// `Enrolled` is the only state the allocation workflow creates. It can
/// transition to `Dropped` (via a drop) or to `Completed`/`Failed` (via
/// grade posting). The latter three are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnrollmentStatus {
    Enrolled,
    Dropped,
    Completed,
    Failed,
}

impl EnrollmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnrollmentStatus::Enrolled => "Enrolled",
            EnrollmentStatus::Dropped => "Dropped",
            EnrollmentStatus::Completed => "Completed",
            EnrollmentStatus::Failed => "Failed",
        }
    }

    /// Whether a final grade is meaningful in this state.
    pub fn is_graded(&self) -> bool {
        matches!(self, EnrollmentStatus::Completed | EnrollmentStatus::Failed)
    }
}

impl FromStr for EnrollmentStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Enrolled" => Ok(EnrollmentStatus::Enrolled),
            "Dropped" => Ok(EnrollmentStatus::Dropped),
            "Completed" => Ok(EnrollmentStatus::Completed),
            "Failed" => Ok(EnrollmentStatus::Failed),
            other => Err(CoreError::unknown_code("enrollment status", other)),
        }
    }
}

impl fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Catalog category of a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CourseType {
    GeneralRequired,
    MajorRequired,
    MajorElective,
    UniversityElective,
    Practical,
}

impl CourseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CourseType::GeneralRequired => "GeneralRequired",
            CourseType::MajorRequired => "MajorRequired",
            CourseType::MajorElective => "MajorElective",
            CourseType::UniversityElective => "UniversityElective",
            CourseType::Practical => "Practical",
        }
    }
}

impl FromStr for CourseType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GeneralRequired" => Ok(CourseType::GeneralRequired),
            "MajorRequired" => Ok(CourseType::MajorRequired),
            "MajorElective" => Ok(CourseType::MajorElective),
            "UniversityElective" => Ok(CourseType::UniversityElective),
            "Practical" => Ok(CourseType::Practical),
            other => Err(CoreError::unknown_code("course type", other)),
        }
    }
}

impl fmt::Display for CourseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enrollment_status_round_trips_through_text() {
        for status in [
            EnrollmentStatus::Enrolled,
            EnrollmentStatus::Dropped,
            EnrollmentStatus::Completed,
            EnrollmentStatus::Failed,
        ] {
            assert_eq!(status.as_str().parse::<EnrollmentStatus>().unwrap(), status);
        }
    }

    #[test]
    fn unknown_codes_are_rejected() {
        assert!("Waitlisted".parse::<EnrollmentStatus>().is_err());
        assert!("superuser".parse::<Role>().is_err());
        assert!("Winter".parse::<Semester>().is_err());
        assert!("Elective".parse::<CourseType>().is_err());
    }

    #[test]
    fn only_completed_and_failed_carry_grades() {
        assert!(EnrollmentStatus::Completed.is_graded());
        assert!(EnrollmentStatus::Failed.is_graded());
        assert!(!EnrollmentStatus::Enrolled.is_graded());
        assert!(!EnrollmentStatus::Dropped.is_graded());
    }
}
