use crate::log_store_debug;
use crate::models::users::{CourseUser, MergedUser, User, UserCourse};
use crate::schema::Model;
use crate::store::{remove_by, replace_by, require_valid, Reducer, StoreError};

/// Users, course enrollments and merged users of the current course, plus
/// the courses of the signed-in user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserState {
    pub users: Vec<User>,
    pub user_courses: Vec<UserCourse>,
    pub course_users: Vec<CourseUser>,
    pub merged_users: Vec<MergedUser>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UserIntent {
    SetUsers(Vec<User>),
    SetUserCourses(Vec<UserCourse>),
    AddUser(User),
    /// Removes the user with the same `user_id`.
    DeleteUser(User),
    SetCourseUsers(Vec<CourseUser>),
    AddCourseUser(CourseUser),
    /// Removes the enrollment with the same `course_user_id`.
    DeleteCourseUser(CourseUser),
    SetMergedUsers(Vec<MergedUser>),
    AddMergedUser(MergedUser),
    /// Replaces the merged user with the same `course_user_id`.
    UpdateMergedUser(MergedUser),
    DeleteMergedUser(MergedUser),
}

impl Reducer for UserState {
    type Intent = UserIntent;

    fn apply(&mut self, intent: UserIntent) -> Result<(), StoreError> {
        match intent {
            UserIntent::SetUsers(users) => self.users = users,
            UserIntent::SetUserCourses(user_courses) => {
                log_store_debug!("loaded {} user courses", user_courses.len());
                self.user_courses = user_courses;
            }
            UserIntent::AddUser(user) => {
                require_valid(user.is_valid(), "The added user is invalid")?;
                self.users.push(user);
            }
            UserIntent::DeleteUser(user) => {
                if !remove_by(&mut self.users, user.user_id(), User::user_id) {
                    log_store_debug!("user {} not present", user.user_id());
                }
            }
            UserIntent::SetCourseUsers(course_users) => self.course_users = course_users,
            UserIntent::AddCourseUser(course_user) => {
                require_valid(course_user.is_valid(), "The added course user is invalid")?;
                self.course_users.push(course_user);
            }
            UserIntent::DeleteCourseUser(course_user) => {
                remove_by(
                    &mut self.course_users,
                    course_user.course_user_id(),
                    CourseUser::course_user_id,
                );
            }
            UserIntent::SetMergedUsers(merged_users) => self.merged_users = merged_users,
            UserIntent::AddMergedUser(merged_user) => {
                require_valid(merged_user.is_valid(), "The added user is invalid")?;
                self.merged_users.push(merged_user);
            }
            UserIntent::UpdateMergedUser(merged_user) => {
                require_valid(merged_user.is_valid(), "The updated user is invalid")?;
                replace_by(
                    &mut self.merged_users,
                    merged_user,
                    "merged user",
                    MergedUser::course_user_id,
                )?;
            }
            UserIntent::DeleteMergedUser(merged_user) => {
                remove_by(
                    &mut self.merged_users,
                    merged_user.course_user_id(),
                    MergedUser::course_user_id,
                );
            }
        }
        Ok(())
    }
}
