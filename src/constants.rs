/// Identifier value of a record the server has not stored yet.
///
/// Every `*_id` field defaults to this; a merged user carrying it has no
/// global `User` and must be created before its course enrollment.
pub const UNASSIGNED_ID: i64 = 0;

/// Returns the identifier if the server has assigned one.
pub fn assigned_id(id: i64) -> Option<i64> {
    (id != UNASSIGNED_ID).then_some(id)
}

/// Weight given to a set problem when none is supplied.
pub const DEFAULT_PROBLEM_WEIGHT: f64 = 1.0;

/// Version given to a new user problem or user set.
pub const INITIAL_VERSION: i64 = 1;
