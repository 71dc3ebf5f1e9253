//! In-memory collections of records and the transitions that change them.
//!
//! Each state is changed only by applying an intent. A transition that
//! fails leaves the state exactly as it was.

pub mod set_problems;
pub mod users;

use thiserror::Error;

pub use set_problems::{SetProblemIntent, SetProblemState};
pub use users::{UserIntent, UserState};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The record to add or update fails its business rules
    #[error("{0}")]
    InvalidRecord(String),

    /// An update named a record the state does not hold
    #[error("no {kind} with id {id}")]
    NotFound { kind: &'static str, id: i64 },
}

/// A state that changes by applying intents.
pub trait Reducer: Clone {
    type Intent;

    /// Applies `intent` in place. On error the state is unchanged.
    fn apply(&mut self, intent: Self::Intent) -> Result<(), StoreError>;

    /// The state after `intent`, leaving `self` untouched.
    fn reduce(&self, intent: Self::Intent) -> Result<Self, StoreError> {
        let mut next = self.clone();
        next.apply(intent)?;
        Ok(next)
    }
}

/// Fails with `message` unless `valid`.
pub(crate) fn require_valid(valid: bool, message: &str) -> Result<(), StoreError> {
    if valid {
        Ok(())
    } else {
        crate::log_store_warn!("{}", message);
        Err(StoreError::InvalidRecord(message.to_string()))
    }
}

/// Removes the first element matching `id`; absent ids are a no-op.
pub(crate) fn remove_by<T>(items: &mut Vec<T>, id: i64, key: impl Fn(&T) -> i64) -> bool {
    match items.iter().position(|item| key(item) == id) {
        Some(index) => {
            items.remove(index);
            true
        }
        None => false,
    }
}

/// Replaces the element matching `id` in place.
pub(crate) fn replace_by<T>(
    items: &mut [T],
    item: T,
    kind: &'static str,
    key: impl Fn(&T) -> i64,
) -> Result<(), StoreError> {
    let id = key(&item);
    let slot = items
        .iter_mut()
        .find(|existing| key(existing) == id)
        .ok_or(StoreError::NotFound { kind, id })?;
    *slot = item;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remove_by_ignores_absent_ids() {
        let mut items = vec![1, 2, 3];
        assert!(remove_by(&mut items, 2, |i| *i));
        assert!(!remove_by(&mut items, 7, |i| *i));
        assert_eq!(items, vec![1, 3]);
    }

    #[test]
    fn replace_by_reports_missing_records() {
        let mut items = vec![(1, "a"), (2, "b")];
        replace_by(&mut items, (2, "c"), "pair", |p| p.0).unwrap();
        assert_eq!(items[1], (2, "c"));
        assert_eq!(
            replace_by(&mut items, (5, "d"), "pair", |p| p.0),
            Err(StoreError::NotFound { kind: "pair", id: 5 })
        );
    }
}
