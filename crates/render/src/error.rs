use thiserror::Error;

/// Failures surfaced by a render call.
///
/// A failed render aborts mid-pass and leaves the scene partially updated;
/// there is no rollback. Recovery (typically just re-rendering with fixed
/// inputs) is the caller's responsibility.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DrawError {
    #[error("projection produced a non-finite coordinate for flat {id}")]
    NonFiniteProjection { id: u64 },
}
