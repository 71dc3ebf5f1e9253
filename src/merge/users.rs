//! Merged users and the two-phase course enrollment.
//!
//! Enrolling someone who has no global `User` yet takes two server round
//! trips: the `User` is created first, and the identifiers the server assigns
//! are then copied verbatim into the `CourseUser` that is created second.

use serde_json::json;

use crate::constants::assigned_id;
use crate::log_merge_debug;
use crate::merge::{ensure_same_id, FieldSource, Merged, MergeError, Overlay};
use crate::models::users::{CourseUser, MergedUser, User};
use crate::schema::Model;

impl MergedUser {
    /// Combines a user with one of their enrollments.
    ///
    /// The user's fields are the template and the enrollment's fields
    /// overlay them. Both must refer to the same `user_id` when both carry
    /// one.
    pub fn merge(user: &User, course_user: &CourseUser) -> Result<Merged<MergedUser>, MergeError> {
        ensure_same_id("user_id", user.user_id(), course_user.user_id())?;
        let mut overlay = Overlay::new();
        overlay.apply(FieldSource::Template, &user.to_object(), &[]);
        overlay.apply(FieldSource::Override, &course_user.to_object(), &[]);
        overlay.build(|input| Ok(MergedUser::new(input)?))
    }
}

/// What the caller has to create next to enroll a merged user.
#[derive(Debug, Clone, PartialEq)]
pub enum EnrollmentStep {
    /// No global user exists yet; create this one, then call
    /// [`resume_enrollment`] with the result.
    CreateUser(User),
    /// Create this enrollment, then call [`finish_enrollment`].
    CreateCourseUser(CourseUser),
}

/// First step of enrolling `merged` in its course.
pub fn begin_enrollment(merged: &MergedUser) -> Result<EnrollmentStep, MergeError> {
    if assigned_id(merged.user_id()).is_none() {
        log_merge_debug!("'{}' is a new user, creating the user first", merged.username());
        Ok(EnrollmentStep::CreateUser(merged.user()?))
    } else {
        Ok(EnrollmentStep::CreateCourseUser(merged.course_user()?))
    }
}

/// Takes the server-assigned `user_id` and `username` from the created user
/// and returns the enrollment to create.
pub fn resume_enrollment(merged: &mut MergedUser, created: &User) -> Result<CourseUser, MergeError> {
    let user_id = assigned_id(created.user_id()).ok_or(MergeError::Unassigned("user_id"))?;
    merged.set(&json!({
        "user_id": user_id,
        "username": created.username(),
    }))?;
    Ok(merged.course_user()?)
}

/// Records the server-assigned `course_user_id` of the created enrollment.
pub fn finish_enrollment(merged: &mut MergedUser, created: &CourseUser) -> Result<(), MergeError> {
    let course_user_id = assigned_id(created.course_user_id())
        .ok_or(MergeError::Unassigned("course_user_id"))?;
    ensure_same_id("user_id", merged.user_id(), created.user_id())?;
    merged.set(&json!({ "course_user_id": course_user_id }))?;
    log_merge_debug!(
        "enrolled user {} as course user {}",
        merged.user_id(),
        course_user_id
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_student() -> MergedUser {
        MergedUser::new(&json!({
            "username": "bart",
            "email": "bart@springfield.edu",
            "course_id": 3,
            "role": "student"
        }))
        .unwrap()
    }

    #[test]
    fn new_users_are_created_first() {
        let mut merged = new_student();
        let EnrollmentStep::CreateUser(user) = begin_enrollment(&merged).unwrap() else {
            panic!("expected the user to be created first");
        };
        assert_eq!(user.username(), "bart");
        assert_eq!(user.user_id(), 0);

        let created = User::new(&json!({ "user_id": 42, "username": "bart_s" })).unwrap();
        let course_user = resume_enrollment(&mut merged, &created).unwrap();
        assert_eq!(course_user.user_id(), 42);
        assert_eq!(course_user.course_id(), 3);
        assert_eq!(merged.username(), "bart_s");

        let created = CourseUser::new(&json!({ "course_user_id": 7, "user_id": 42 })).unwrap();
        finish_enrollment(&mut merged, &created).unwrap();
        assert_eq!(merged.course_user_id(), 7);
    }

    #[test]
    fn existing_users_go_straight_to_the_enrollment() {
        let mut merged = new_student();
        merged.set(&json!({ "user_id": 9 })).unwrap();
        match begin_enrollment(&merged).unwrap() {
            EnrollmentStep::CreateCourseUser(cu) => assert_eq!(cu.user_id(), 9),
            other => panic!("unexpected step {:?}", other),
        }
    }

    #[test]
    fn resume_needs_an_assigned_user_id() {
        let mut merged = new_student();
        let err = resume_enrollment(&mut merged, &User::default()).unwrap_err();
        assert!(matches!(err, MergeError::Unassigned("user_id")));
    }

    #[test]
    fn merge_requires_matching_user_ids() {
        let user = User::new(&json!({ "user_id": 1, "username": "maggie" })).unwrap();
        let course_user = CourseUser::new(&json!({ "user_id": 2, "course_id": 3 })).unwrap();
        assert!(MergedUser::merge(&user, &course_user).is_err());

        let course_user = CourseUser::new(&json!({ "course_id": 3, "role": "ta" })).unwrap();
        let merged = MergedUser::merge(&user, &course_user).unwrap();
        assert_eq!(merged.value.user_id(), 1);
        assert_eq!(merged.value.course_id(), 3);
        assert_eq!(merged.source("username"), Some(FieldSource::Template));
        assert_eq!(merged.source("role"), Some(FieldSource::Override));
    }
}
