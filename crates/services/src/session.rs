//! Authentication and per-process session state.

use crate::{ServiceError, password};
use core_types::{Account, Instructor, Role, Student};
use database::{InstructorRepository, StudentRepository, UserRepository};
use serde::Serialize;
use tracing::{info, warn};

/// An authenticated account plus its linked profile (at most one of the
/// two, matching the account's role).
#[derive(Debug, Clone)]
pub struct Session {
    pub account: Account,
    pub student: Option<Student>,
    pub instructor: Option<Instructor>,
}

/// A typed summary of the active session for display purposes.
#[derive(Debug, Clone, Serialize)]
pub struct SessionInfo {
    pub username: String,
    pub role: Role,
    pub display_name: Option<String>,
    pub profile_id: Option<String>,
}

/// Authenticates accounts and tracks the active role for the duration of
/// one interactive process. There is no cross-process persistence: the
/// session dies with the process or on logout.
pub struct SessionService {
    users: UserRepository,
    students: StudentRepository,
    instructors: InstructorRepository,
    current: Option<Session>,
}

impl SessionService {
    pub fn new(
        users: UserRepository,
        students: StudentRepository,
        instructors: InstructorRepository,
    ) -> Self {
        Self {
            users,
            students,
            instructors,
            current: None,
        }
    }

    /// Verifies the credential against the active account with this
    /// username, loads the linked profile, and installs the session.
    ///
    /// Unknown usernames, inactive accounts, and wrong passwords all
    /// produce the same `InvalidCredentials` error.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<&Session, ServiceError> {
        let Some((account, stored_hash)) = self.users.find_credentials(username).await? else {
            return Err(ServiceError::InvalidCredentials);
        };

        if !password::verify(password, &stored_hash) {
            return Err(ServiceError::InvalidCredentials);
        }

        // Best-effort: a failed timestamp update must not block the login.
        if let Err(err) = self.users.touch_last_login(account.user_id).await {
            warn!(user_id = account.user_id, cause = %err, "failed to update last login");
        }

        let (student, instructor) = match account.role {
            Role::Student => (self.students.get_by_user_id(account.user_id).await?, None),
            Role::Instructor => (None, self.instructors.get_by_user_id(account.user_id).await?),
            Role::Admin => (None, None),
        };

        info!(username = %account.username, role = %account.role, "login succeeded");
        Ok(&*self.current.insert(Session {
            account,
            student,
            instructor,
        }))
    }

    /// Clears the active session.
    pub fn logout(&mut self) {
        if let Some(session) = self.current.take() {
            info!(username = %session.account.username, "logged out");
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.current
            .as_ref()
            .is_some_and(|session| session.account.role == role)
    }

    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    pub fn info(&self) -> Option<SessionInfo> {
        self.current.as_ref().map(|session| SessionInfo {
            username: session.account.username.clone(),
            role: session.account.role,
            display_name: session
                .student
                .as_ref()
                .map(|s| s.name.clone())
                .or_else(|| session.instructor.as_ref().map(|i| i.name.clone())),
            profile_id: session
                .student
                .as_ref()
                .map(|s| s.student_id.clone())
                .or_else(|| session.instructor.as_ref().map(|i| i.instructor_id.clone())),
        })
    }
}
