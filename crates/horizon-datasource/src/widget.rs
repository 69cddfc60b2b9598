//! Widget-facing contracts.
//!
//! This module defines the two traits at the boundary between this crate
//! and the list-rendering widget it feeds:
//!
//! - [`ListWidget`] is implemented *by* the widget. It is treated as a black
//!   box that owns a reuse pool of cell templates and a data-source slot.
//! - [`DataSource`] is implemented *for* the widget, by this crate. It is
//!   the five-method capability set the widget calls synchronously on its
//!   own thread whenever it lays out, reloads, or scrolls.
//!
//! `DataSource` is deliberately object-safe and free of the provider
//! generics (`Item`, `Section`, `CellFactory`): the widget stores it as
//! `Arc<dyn DataSource<Self>>`, so nothing about the concrete provider can
//! leak into the widget's type. Providers satisfy it through
//! [`DataSourceBridge`](crate::DataSourceBridge).

use std::sync::Arc;

use crate::position::Position;

/// A list-rendering widget that can be driven by a [`DataSource`].
///
/// Implementors own a pool of reusable cells keyed by template identifiers
/// that the application registers ahead of time. This crate never registers
/// templates itself; it only dequeues from the pool.
pub trait ListWidget {
    /// The renderable, recyclable unit representing one item.
    type Cell;

    /// Returns a recycled or freshly instantiated cell for the given reuse
    /// key, or `None` if no template was registered under that key.
    ///
    /// A `None` here is surfaced by the cell factory as a panic: an
    /// unregistered reuse key is a programmer error, not a runtime
    /// condition.
    fn dequeue_reusable_cell(&mut self, reuse_key: &str, at: Position) -> Option<Self::Cell>;

    /// Installs the widget's data source.
    ///
    /// After this call the widget is expected to answer its own layout
    /// queries by calling back into `source`.
    fn set_data_source(&mut self, source: Arc<dyn DataSource<Self>>)
    where
        Self: Sized;
}

/// The data-source capability set consumed by a [`ListWidget`].
///
/// The widget calls these methods synchronously, on its own thread, at
/// times it chooses. Implementations must answer purely positionally; they
/// own no layout state.
pub trait DataSource<W: ListWidget>: Send + Sync {
    /// Returns the number of sections.
    fn number_of_sections(&self) -> usize;

    /// Returns the number of items in the given section.
    ///
    /// # Panics
    ///
    /// Panics if `section` is out of range for providers backed by
    /// in-memory sections.
    fn number_of_items(&self, section: usize) -> usize;

    /// Resolves the item at `at` and returns a dequeued, configured cell
    /// for it.
    ///
    /// # Panics
    ///
    /// Panics if `at` is out of range, or if the factory's reuse key has no
    /// registered template.
    fn cell_for_item(&self, widget: &mut W, at: Position) -> W::Cell;

    /// Returns the header title for the given section, if any.
    fn header_title(&self, section: usize) -> Option<String>;

    /// Returns the footer title for the given section, if any.
    fn footer_title(&self, section: usize) -> Option<String>;
}
