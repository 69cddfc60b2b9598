//! The erased data-source adapter.
//!
//! Providers are generic over their item, section, and factory types, and
//! generic types cannot be named in the widget's `Arc<dyn DataSource<W>>`
//! slot. [`DataSourceBridge`] closes that gap: a concrete object holding
//! five function values, each capturing the provider, satisfying
//! [`DataSource`] by calling the matching function with its arguments
//! forwarded unchanged.
//!
//! A bridge carries no state of its own and performs no logic or caching.
//! The captured references are weak: the bridge's lifetime is subordinate
//! to its provider's, and the provider must outlive every call into the
//! bridge.

use crate::position::Position;
use crate::widget::{DataSource, ListWidget};

/// Panic message used by provider-built bridges when the weak
/// back-reference no longer resolves.
pub(crate) const PROVIDER_DROPPED: &str = "data source called after its provider was dropped";

type SectionCountFn = Box<dyn Fn() -> usize + Send + Sync>;
type ItemCountFn = Box<dyn Fn(usize) -> usize + Send + Sync>;
type CellFn<W> = Box<dyn Fn(&mut W, Position) -> <W as ListWidget>::Cell + Send + Sync>;
type TitleFn = Box<dyn Fn(usize) -> Option<String> + Send + Sync>;

/// A concrete [`DataSource`] built from five callback functions.
///
/// Each provider builds exactly one bridge, lazily, closing over a weak
/// reference to itself, and hands it out as the widget-visible data-source
/// handle.
pub struct DataSourceBridge<W: ListWidget> {
    number_of_sections: SectionCountFn,
    number_of_items: ItemCountFn,
    cell_for_item: CellFn<W>,
    header_title: TitleFn,
    footer_title: TitleFn,
}

impl<W: ListWidget> DataSourceBridge<W> {
    /// Creates a bridge from the five data-source callbacks.
    pub fn new(
        number_of_sections: impl Fn() -> usize + Send + Sync + 'static,
        number_of_items: impl Fn(usize) -> usize + Send + Sync + 'static,
        cell_for_item: impl Fn(&mut W, Position) -> W::Cell + Send + Sync + 'static,
        header_title: impl Fn(usize) -> Option<String> + Send + Sync + 'static,
        footer_title: impl Fn(usize) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            number_of_sections: Box::new(number_of_sections),
            number_of_items: Box::new(number_of_items),
            cell_for_item: Box::new(cell_for_item),
            header_title: Box::new(header_title),
            footer_title: Box::new(footer_title),
        }
    }
}

impl<W: ListWidget> DataSource<W> for DataSourceBridge<W> {
    fn number_of_sections(&self) -> usize {
        (self.number_of_sections)()
    }

    fn number_of_items(&self, section: usize) -> usize {
        (self.number_of_items)(section)
    }

    fn cell_for_item(&self, widget: &mut W, at: Position) -> W::Cell {
        (self.cell_for_item)(widget, at)
    }

    fn header_title(&self, section: usize) -> Option<String> {
        (self.header_title)(section)
    }

    fn footer_title(&self, section: usize) -> Option<String> {
        (self.footer_title)(section)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    struct NullWidget;

    impl ListWidget for NullWidget {
        type Cell = (usize, usize);

        fn dequeue_reusable_cell(&mut self, _reuse_key: &str, _at: Position) -> Option<Self::Cell> {
            None
        }

        fn set_data_source(&mut self, _source: Arc<dyn DataSource<Self>>) {}
    }

    static_assertions::assert_impl_all!(DataSourceBridge<NullWidget>: Send, Sync);

    #[test]
    fn test_forwards_unchanged() {
        let bridge = DataSourceBridge::<NullWidget>::new(
            || 4,
            |section| section * 10,
            |_widget, at| (at.section(), at.item()),
            |section| Some(format!("header {section}")),
            |_section| None,
        );

        assert_eq!(bridge.number_of_sections(), 4);
        assert_eq!(bridge.number_of_items(3), 30);
        assert_eq!(
            bridge.cell_for_item(&mut NullWidget, Position::new(1, 2)),
            (1, 2)
        );
        assert_eq!(bridge.header_title(0), Some("header 0".to_string()));
        assert_eq!(bridge.footer_title(0), None);
    }
}
