//! Users: global identities, course enrollments and the merged view of both.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::RecordError;
use crate::schema::{FieldDescriptor, Model, Schema};
use crate::{record_accessors, record_model};

static USERNAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\S+$").expect("valid regex"));
static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid regex"));

/// Course role of an enrolled user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Student,
    Ta,
    Instructor,
    CourseAdmin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Student => "student",
            UserRole::Ta => "ta",
            UserRole::Instructor => "instructor",
            UserRole::CourseAdmin => "course_admin",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(UserRole::Student),
            "ta" => Ok(UserRole::Ta),
            "instructor" => Ok(UserRole::Instructor),
            "course_admin" => Ok(UserRole::CourseAdmin),
            _ => Err(RecordError::UnknownRole(s.to_string())),
        }
    }
}

static USER_FIELDS: [FieldDescriptor; 7] = [
    FieldDescriptor::non_neg_int("user_id", 0),
    FieldDescriptor::string("username", ""),
    FieldDescriptor::string("email", ""),
    FieldDescriptor::string("first_name", ""),
    FieldDescriptor::string("last_name", ""),
    FieldDescriptor::boolean("is_admin", false),
    FieldDescriptor::string("student_id", ""),
];
pub static USER: Schema = Schema::new("User", &USER_FIELDS);

static COURSE_USER_FIELDS: [FieldDescriptor; 6] = [
    FieldDescriptor::non_neg_int("course_user_id", 0),
    FieldDescriptor::non_neg_int("user_id", 0),
    FieldDescriptor::non_neg_int("course_id", 0),
    FieldDescriptor::string("role", "student"),
    FieldDescriptor::string("section", ""),
    FieldDescriptor::string("recitation", ""),
];
pub static COURSE_USER: Schema = Schema::new("CourseUser", &COURSE_USER_FIELDS);

static USER_COURSE_FIELDS: [FieldDescriptor; 4] = [
    FieldDescriptor::non_neg_int("course_id", 0),
    FieldDescriptor::string("course_name", ""),
    FieldDescriptor::non_neg_int("user_id", 0),
    FieldDescriptor::string("role", "student"),
];
/// One course a user is enrolled in, as listed for that user.
pub static USER_COURSE: Schema = Schema::new("UserCourse", &USER_COURSE_FIELDS);

static MERGED_USER_FIELDS: [FieldDescriptor; 5] = [
    FieldDescriptor::non_neg_int("course_user_id", 0),
    FieldDescriptor::non_neg_int("course_id", 0),
    FieldDescriptor::string("role", "student"),
    FieldDescriptor::string("section", ""),
    FieldDescriptor::string("recitation", ""),
];
/// A user together with one course enrollment.
pub static MERGED_USER: Schema = Schema::extends("MergedUser", &USER, &MERGED_USER_FIELDS);

fn has_valid_identity<T: Model>(user: &T) -> bool {
    let record = user.record();
    let username = record.get_str("username").unwrap_or_default();
    let email = record.get_str("email").unwrap_or_default();
    USERNAME.is_match(username) && (email.is_empty() || EMAIL.is_match(email))
}

fn has_valid_role<T: Model>(user: &T) -> bool {
    user.record()
        .get_str("role")
        .is_some_and(|role| role.parse::<UserRole>().is_ok())
}

fn is_valid_merged_user(user: &MergedUser) -> bool {
    has_valid_identity(user) && has_valid_role(user)
}

record_model!(
    /// Global user identity.
    User => USER, valid = has_valid_identity
);
record_model!(
    /// Course-scoped role and section of a user.
    CourseUser => COURSE_USER, valid = has_valid_role
);
record_model!(UserCourse => USER_COURSE, valid = has_valid_role);
record_model!(
    /// Read-mostly view combining a `User` with a `CourseUser`.
    MergedUser => MERGED_USER, valid = is_valid_merged_user
);

record_accessors!(User {
    user_id: int,
    username: str,
    email: str,
    first_name: str,
    last_name: str,
    is_admin: bool,
    student_id: str,
});

record_accessors!(CourseUser {
    course_user_id: int,
    user_id: int,
    course_id: int,
    section: str,
    recitation: str,
});

record_accessors!(UserCourse {
    course_id: int,
    course_name: str,
    user_id: int,
});

record_accessors!(MergedUser {
    course_user_id: int,
    user_id: int,
    course_id: int,
    username: str,
    email: str,
    first_name: str,
    last_name: str,
    is_admin: bool,
    student_id: str,
    section: str,
    recitation: str,
});

impl CourseUser {
    pub fn role(&self) -> Option<UserRole> {
        self.inner.get_str("role").and_then(|r| r.parse().ok())
    }
}

impl UserCourse {
    pub fn role(&self) -> Option<UserRole> {
        self.inner.get_str("role").and_then(|r| r.parse().ok())
    }
}

impl MergedUser {
    pub fn role(&self) -> Option<UserRole> {
        self.inner.get_str("role").and_then(|r| r.parse().ok())
    }

    /// The global-identity part of this merged user.
    pub fn user(&self) -> Result<User, crate::schema::FieldError> {
        User::new(&self.to_object_fields(&User::all_field_names()))
    }

    /// The enrollment part of this merged user.
    pub fn course_user(&self) -> Result<CourseUser, crate::schema::FieldError> {
        CourseUser::new(&self.to_object_fields(&CourseUser::all_field_names()))
    }
}
