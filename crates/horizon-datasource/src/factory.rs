//! Cell factories.
//!
//! A cell factory turns a model item at a position into a configured cell.
//! Factories never construct cells directly: they dequeue from the widget's
//! reuse pool so the widget's recycling and virtualization invariants hold.
//!
//! [`ReusableCellFactory`] is the closure-based concrete implementation;
//! the [`CellFactory`] trait exists so applications with richer needs (for
//! example a factory that picks between several templates per item) can
//! supply their own.

use std::sync::Arc;

use crate::position::Position;
use crate::widget::ListWidget;

/// Produces and configures cells for a provider.
///
/// The two steps are separate so configuration can be re-applied to an
/// already-visible cell without a fresh dequeue, and so `configure` can be
/// chained functionally (it returns the cell it was given).
pub trait CellFactory: Send + Sync {
    /// The widget type the factory dequeues from.
    type Widget: ListWidget;

    /// The model type backing the cells.
    type Item;

    /// Returns a recycled or freshly instantiated cell for `item`.
    ///
    /// # Panics
    ///
    /// Panics if the factory's template was never registered with the
    /// widget.
    fn cell_for(
        &self,
        item: &Self::Item,
        widget: &mut Self::Widget,
        at: Position,
    ) -> <Self::Widget as ListWidget>::Cell;

    /// Applies item-specific state to `cell` and returns it.
    fn configure(
        &self,
        cell: <Self::Widget as ListWidget>::Cell,
        item: &Self::Item,
        widget: &mut Self::Widget,
        at: Position,
    ) -> <Self::Widget as ListWidget>::Cell;
}

/// Type alias for a cell configurator function.
pub type CellConfigurator<W, T> = Arc<
    dyn Fn(<W as ListWidget>::Cell, &T, &mut W, Position) -> <W as ListWidget>::Cell
        + Send
        + Sync,
>;

/// A [`CellFactory`] that dequeues by reuse key and configures via a
/// closure.
///
/// The reuse key must correspond to a cell template the application has
/// registered with the widget; this crate does not register templates.
///
/// # Example
///
/// ```ignore
/// use horizon_datasource::ReusableCellFactory;
///
/// let factory = ReusableCellFactory::new("contact-row", |cell, contact, _widget, _at| {
///     cell.set_title(&contact.name)
/// });
/// ```
pub struct ReusableCellFactory<W: ListWidget, T> {
    reuse_key: String,
    configurator: CellConfigurator<W, T>,
}

impl<W: ListWidget, T> ReusableCellFactory<W, T> {
    /// Creates a factory that dequeues cells under `reuse_key` and
    /// configures them with `configurator`.
    pub fn new<F>(reuse_key: impl Into<String>, configurator: F) -> Self
    where
        F: Fn(W::Cell, &T, &mut W, Position) -> W::Cell + Send + Sync + 'static,
    {
        Self {
            reuse_key: reuse_key.into(),
            configurator: Arc::new(configurator),
        }
    }

    /// Returns the reuse key the factory dequeues with.
    pub fn reuse_key(&self) -> &str {
        &self.reuse_key
    }
}

impl<W: ListWidget, T> CellFactory for ReusableCellFactory<W, T>
where
    T: Send + Sync,
{
    type Widget = W;
    type Item = T;

    fn cell_for(&self, _item: &T, widget: &mut W, at: Position) -> W::Cell {
        widget
            .dequeue_reusable_cell(&self.reuse_key, at)
            .unwrap_or_else(|| {
                panic!(
                    "no cell template registered for reuse key `{}`",
                    self.reuse_key
                )
            })
    }

    fn configure(&self, cell: W::Cell, item: &T, widget: &mut W, at: Position) -> W::Cell {
        (self.configurator)(cell, item, widget, at)
    }
}
