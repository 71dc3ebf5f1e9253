use crate::log_store_debug;
use crate::models::problems::{SetProblem, UserProblem};
use crate::schema::Model;
use crate::store::{remove_by, replace_by, require_valid, Reducer, StoreError};

/// Problems of the course's sets and the per-user problems merged from them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SetProblemState {
    pub set_problems: Vec<SetProblem>,
    pub user_problems: Vec<UserProblem>,
}

impl SetProblemState {
    /// Set problems of one set, ordered by problem number.
    pub fn problems_in_set(&self, set_id: i64) -> Vec<&SetProblem> {
        let mut problems: Vec<&SetProblem> = self
            .set_problems
            .iter()
            .filter(|p| p.set_id() == set_id)
            .collect();
        problems.sort_by_key(|p| p.problem_number());
        problems
    }

    /// The number the next problem appended to `set_id` should take, or
    /// `None` when the last problem already holds the largest number.
    pub fn next_problem_number(&self, set_id: i64) -> Option<i64> {
        match self.problems_in_set(set_id).last() {
            Some(last) => last.problem_number().checked_add(1),
            None => Some(1),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SetProblemIntent {
    SetSetProblems(Vec<SetProblem>),
    AddSetProblem(SetProblem),
    /// Replaces the set problem with the same `set_problem_id`.
    UpdateSetProblem(SetProblem),
    DeleteSetProblem(SetProblem),
    SetUserProblems(Vec<UserProblem>),
    AddUserProblem(UserProblem),
    /// Replaces the user problem with the same `user_problem_id`.
    UpdateUserProblem(UserProblem),
    DeleteUserProblem(UserProblem),
}

impl Reducer for SetProblemState {
    type Intent = SetProblemIntent;

    fn apply(&mut self, intent: SetProblemIntent) -> Result<(), StoreError> {
        match intent {
            SetProblemIntent::SetSetProblems(problems) => {
                log_store_debug!("loaded {} set problems", problems.len());
                self.set_problems = problems;
            }
            SetProblemIntent::AddSetProblem(problem) => {
                require_valid(problem.is_valid(), "The added problem is invalid")?;
                self.set_problems.push(problem);
            }
            SetProblemIntent::UpdateSetProblem(problem) => {
                require_valid(problem.is_valid(), "The updated set problem is invalid")?;
                replace_by(
                    &mut self.set_problems,
                    problem,
                    "set problem",
                    SetProblem::set_problem_id,
                )?;
            }
            SetProblemIntent::DeleteSetProblem(problem) => {
                remove_by(
                    &mut self.set_problems,
                    problem.set_problem_id(),
                    SetProblem::set_problem_id,
                );
            }
            SetProblemIntent::SetUserProblems(problems) => {
                log_store_debug!("loaded {} user problems", problems.len());
                self.user_problems = problems;
            }
            SetProblemIntent::AddUserProblem(problem) => {
                require_valid(problem.is_valid(), "The added user problem is invalid")?;
                self.user_problems.push(problem);
            }
            SetProblemIntent::UpdateUserProblem(problem) => {
                require_valid(problem.is_valid(), "The updated user problem is invalid")?;
                replace_by(
                    &mut self.user_problems,
                    problem,
                    "user problem",
                    UserProblem::user_problem_id,
                )?;
            }
            SetProblemIntent::DeleteUserProblem(problem) => {
                remove_by(
                    &mut self.user_problems,
                    problem.user_problem_id(),
                    UserProblem::user_problem_id,
                );
            }
        }
        Ok(())
    }
}
