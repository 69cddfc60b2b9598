//! Contracts for the external live-query layer.
//!
//! A live query is a handle over a persistent store that can (re)execute
//! itself, expose its current results as a sectioned snapshot, and notify a
//! delegate as the store mutates underneath it. This crate performs no
//! querying of its own: it consumes [`LiveQuery`] strictly as a synchronous
//! snapshot handle, and exposes [`LiveQueryDelegate`] so implementations
//! have a well-defined shape to notify.

use crate::position::Position;

/// A snapshot of one section of a live query's current results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionSnapshot {
    /// The section's name, as derived by the query's grouping.
    pub name: String,
    /// The number of objects currently in the section.
    pub object_count: usize,
}

/// The kind of mutation a live query reports for a section or object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// The section or object was inserted.
    Insert,
    /// The section or object was deleted.
    Delete,
    /// The object moved to a new position.
    Move,
    /// The object's content changed in place.
    Update,
}

/// A live, auto-updating query over a persistent store.
///
/// Implementations are external to this crate. The providers here treat the
/// query as the single source of truth: every positional answer is computed
/// freshly from the query's current snapshot, and nothing is cached.
pub trait LiveQuery: Send + Sync {
    /// The model type the query produces.
    type Item;

    /// (Re)executes the query and loads its snapshot.
    ///
    /// A failure is reported, never retried; whether to re-run the fetch,
    /// surface the failure, or ignore it is the caller's decision.
    fn perform_fetch(&self) -> Result<(), FetchError>;

    /// Returns the number of sections in the current snapshot.
    fn section_count(&self) -> usize;

    /// Returns the snapshot of the section at `index`, or `None` if the
    /// index is out of range of the current snapshot.
    fn section(&self, index: usize) -> Option<SectionSnapshot>;

    /// Returns the object at `at` in the current snapshot.
    ///
    /// # Panics
    ///
    /// Implementations panic if `at` is out of range; asking for an object
    /// outside the snapshot is a contract violation.
    fn object(&self, at: Position) -> Self::Item;
}

/// The delegate capability set a live query notifies as its results change.
///
/// Per recomputation cycle the query emits exactly one
/// [`will_change_content`](LiveQueryDelegate::will_change_content), then
/// zero or more section/object changes in the order it discovers them, then
/// exactly one
/// [`did_change_content`](LiveQueryDelegate::did_change_content).
pub trait LiveQueryDelegate<T>: Send + Sync {
    /// The query is about to report a batch of changes.
    fn will_change_content(&self);

    /// A section was inserted, deleted, or otherwise changed.
    fn section_changed(&self, info: &SectionSnapshot, index: usize, kind: ChangeKind);

    /// An object was inserted, deleted, moved, or updated.
    ///
    /// `at` is the object's position before the change (absent for
    /// insertions); `new_position` is its position after the change (absent
    /// for deletions and in-place updates).
    fn object_changed(
        &self,
        object: &T,
        at: Option<Position>,
        kind: ChangeKind,
        new_position: Option<Position>,
    );

    /// The query finished reporting the current batch of changes.
    fn did_change_content(&self);
}

/// An error produced when a live query fails to (re)execute.
///
/// Carries a diagnostic message and, when available, the store-level error
/// that caused the failure.
#[derive(Debug, thiserror::Error)]
#[error("live query fetch failed: {message}")]
pub struct FetchError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl FetchError {
    /// Creates a fetch error with a diagnostic message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a fetch error wrapping the store-level cause.
    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Returns the diagnostic message.
    pub fn message(&self) -> &str {
        &self.message
    }
}
