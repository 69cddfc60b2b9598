//! The live-query-backed data-source provider.
//!
//! [`FetchedProvider`] answers the same positional queries as
//! [`DataSourceProvider`](crate::DataSourceProvider), but every answer is
//! computed freshly from a [`LiveQuery`]'s current snapshot. The provider
//! owns no items: the query is the single source of truth, and only item
//! reads are supported.

use std::sync::{Arc, OnceLock, Weak};

use crate::bridge::{DataSourceBridge, PROVIDER_DROPPED};
use crate::factory::CellFactory;
use crate::position::Position;
use crate::query::{FetchError, LiveQuery};
use crate::widget::{DataSource, ListWidget};

/// A data-source provider backed by a live persistent-store query.
///
/// Section and item counts, items, and header titles are all read through
/// the query's snapshot at call time; nothing is cached here. Header titles
/// come from the query's section names; footer titles are always absent,
/// since the query model carries no footer concept.
///
/// Like [`DataSourceProvider`](crate::DataSourceProvider), the provider is
/// constructed into an [`Arc`] and must outlive the widget-facing handle
/// returned by [`data_source`](FetchedProvider::data_source).
pub struct FetchedProvider<W, Q, F>
where
    W: ListWidget,
    Q: LiveQuery,
    F: CellFactory<Widget = W, Item = Q::Item>,
{
    query: Q,
    factory: F,
    bridge: OnceLock<Arc<DataSourceBridge<W>>>,
}

impl<W, Q, F> FetchedProvider<W, Q, F>
where
    W: ListWidget + 'static,
    Q: LiveQuery + 'static,
    F: CellFactory<Widget = W, Item = Q::Item> + 'static,
{
    /// Creates a provider over the given query and factory.
    ///
    /// The query's results are not loaded here; call
    /// [`perform_fetch`](FetchedProvider::perform_fetch) before the widget
    /// starts asking questions.
    pub fn new(query: Q, factory: F) -> Arc<Self> {
        Arc::new(Self {
            query,
            factory,
            bridge: OnceLock::new(),
        })
    }

    /// Creates a provider and immediately installs it as `widget`'s data
    /// source.
    pub fn with_widget(query: Q, factory: F, widget: &mut W) -> Arc<Self> {
        let provider = Self::new(query, factory);
        widget.set_data_source(provider.data_source());
        provider
    }

    /// Returns the widget-visible data-source handle for this provider.
    ///
    /// Built lazily, once; holds only a weak reference back to the
    /// provider. See
    /// [`DataSourceProvider::data_source`](crate::DataSourceProvider::data_source)
    /// for the lifetime contract.
    pub fn data_source(self: &Arc<Self>) -> Arc<dyn DataSource<W>> {
        self.bridge
            .get_or_init(|| Self::build_bridge(Arc::downgrade(self)))
            .clone()
    }

    fn build_bridge(weak: Weak<Self>) -> Arc<DataSourceBridge<W>> {
        Arc::new(DataSourceBridge::new(
            {
                let weak = weak.clone();
                move || weak.upgrade().expect(PROVIDER_DROPPED).number_of_sections()
            },
            {
                let weak = weak.clone();
                move |section| {
                    weak.upgrade()
                        .expect(PROVIDER_DROPPED)
                        .number_of_items(section)
                }
            },
            {
                let weak = weak.clone();
                move |widget, at| {
                    weak.upgrade()
                        .expect(PROVIDER_DROPPED)
                        .cell_for_item(widget, at)
                }
            },
            {
                let weak = weak.clone();
                move |section| weak.upgrade().expect(PROVIDER_DROPPED).header_title(section)
            },
            move |section| weak.upgrade().expect(PROVIDER_DROPPED).footer_title(section),
        ))
    }

    /// (Re)executes the query and loads its snapshot.
    ///
    /// A failure is logged and returned. This provider never retries;
    /// recovery is entirely the caller's decision.
    pub fn perform_fetch(&self) -> Result<(), FetchError> {
        self.query.perform_fetch().inspect_err(|error| {
            tracing::error!(target: "horizon_datasource::fetched", "{error}");
        })
    }

    /// Returns the number of sections in the query's current snapshot.
    pub fn number_of_sections(&self) -> usize {
        self.query.section_count()
    }

    /// Returns the number of objects in the given section, or 0 if the
    /// section is not present in the current snapshot.
    pub fn number_of_items(&self, section: usize) -> usize {
        self.query
            .section(section)
            .map(|info| info.object_count)
            .unwrap_or(0)
    }

    /// Resolves the object at `at`, then dequeues and configures a cell
    /// for it via the factory.
    ///
    /// # Panics
    ///
    /// Panics if `at` is outside the query's current snapshot, or if the
    /// factory's reuse key has no registered template in `widget`.
    pub fn cell_for_item(&self, widget: &mut W, at: Position) -> W::Cell {
        let item = self.query.object(at);
        let cell = self.factory.cell_for(&item, widget, at);
        self.factory.configure(cell, &item, widget, at)
    }

    /// Returns the name of the given section in the current snapshot, if
    /// present.
    pub fn header_title(&self, section: usize) -> Option<String> {
        self.query.section(section).map(|info| info.name)
    }

    /// Always `None`: the query model carries no footer concept.
    pub fn footer_title(&self, _section: usize) -> Option<String> {
        None
    }

    /// Returns the object at `at` in the query's current snapshot.
    ///
    /// # Panics
    ///
    /// Panics if `at` is outside the snapshot.
    pub fn item(&self, at: Position) -> Q::Item {
        self.query.object(at)
    }

    /// Returns the held query handle.
    pub fn query(&self) -> &Q {
        &self.query
    }

    /// Returns the provider's cell factory.
    pub fn factory(&self) -> &F {
        &self.factory
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::ReusableCellFactory;
    use crate::query::SectionSnapshot;
    use parking_lot::RwLock;

    struct FakeListWidget {
        source: Option<Arc<dyn DataSource<Self>>>,
    }

    impl ListWidget for FakeListWidget {
        type Cell = String;

        fn dequeue_reusable_cell(&mut self, reuse_key: &str, _at: Position) -> Option<String> {
            (reuse_key == "row").then(|| String::from("[row]"))
        }

        fn set_data_source(&mut self, source: Arc<dyn DataSource<Self>>) {
            self.source = Some(source);
        }
    }

    /// A query whose snapshot appears only after a successful fetch.
    struct ScriptedQuery {
        fail_with: Option<&'static str>,
        sections: Vec<(&'static str, Vec<&'static str>)>,
        fetched: RwLock<bool>,
    }

    impl ScriptedQuery {
        fn new(sections: Vec<(&'static str, Vec<&'static str>)>) -> Self {
            Self {
                fail_with: None,
                sections,
                fetched: RwLock::new(false),
            }
        }

        fn failing(message: &'static str) -> Self {
            Self {
                fail_with: Some(message),
                sections: Vec::new(),
                fetched: RwLock::new(false),
            }
        }
    }

    impl LiveQuery for ScriptedQuery {
        type Item = String;

        fn perform_fetch(&self) -> Result<(), FetchError> {
            if let Some(message) = self.fail_with {
                return Err(FetchError::new(message));
            }
            *self.fetched.write() = true;
            Ok(())
        }

        fn section_count(&self) -> usize {
            if *self.fetched.read() {
                self.sections.len()
            } else {
                0
            }
        }

        fn section(&self, index: usize) -> Option<SectionSnapshot> {
            if !*self.fetched.read() {
                return None;
            }
            self.sections.get(index).map(|(name, items)| SectionSnapshot {
                name: (*name).to_string(),
                object_count: items.len(),
            })
        }

        fn object(&self, at: Position) -> String {
            self.sections[at.section()].1[at.item()].to_string()
        }
    }

    type Factory = ReusableCellFactory<FakeListWidget, String>;

    fn row_factory() -> Factory {
        ReusableCellFactory::new("row", |cell, item, _widget, at| format!("{cell} {item}@{at}"))
    }

    fn grouped_query() -> ScriptedQuery {
        ScriptedQuery::new(vec![
            ("Inbox", vec!["m0", "m1"]),
            ("Archive", vec!["a0", "a1", "a2"]),
        ])
    }

    #[test]
    fn test_counts_follow_snapshot_after_fetch() {
        let provider = FetchedProvider::new(grouped_query(), row_factory());

        assert_eq!(provider.number_of_sections(), 0);
        provider.perform_fetch().expect("fetch succeeds");

        assert_eq!(provider.number_of_sections(), 2);
        assert_eq!(provider.number_of_items(0), 2);
        assert_eq!(provider.number_of_items(1), 3);
    }

    #[test]
    fn test_header_from_section_name_footer_absent() {
        let provider = FetchedProvider::new(grouped_query(), row_factory());
        provider.perform_fetch().expect("fetch succeeds");

        assert_eq!(provider.header_title(0), Some("Inbox".to_string()));
        assert_eq!(provider.header_title(1), Some("Archive".to_string()));
        assert_eq!(provider.header_title(2), None);
        assert_eq!(provider.footer_title(0), None);
        assert_eq!(provider.footer_title(1), None);
    }

    #[test]
    fn test_cell_resolved_from_snapshot() {
        let provider = FetchedProvider::new(grouped_query(), row_factory());
        provider.perform_fetch().expect("fetch succeeds");
        let mut widget = FakeListWidget { source: None };

        let cell = provider.cell_for_item(&mut widget, Position::new(1, 2));
        assert_eq!(cell, "[row] a2@(1, 2)");
        assert_eq!(provider.item(Position::new(0, 1)), "m1");
    }

    #[test]
    fn test_failed_fetch_is_reported_not_fatal() {
        let provider = FetchedProvider::new(ScriptedQuery::failing("store offline"), row_factory());

        let error = provider.perform_fetch().expect_err("fetch fails");
        assert_eq!(error.message(), "store offline");

        // Positional queries after a failed fetch answer from whatever
        // snapshot exists; they must not panic.
        assert_eq!(provider.number_of_sections(), 0);
        assert_eq!(provider.number_of_items(0), 0);
        assert_eq!(provider.header_title(0), None);
    }

    #[test]
    fn test_with_widget_attaches_data_source() {
        let mut widget = FakeListWidget { source: None };
        let provider =
            FetchedProvider::with_widget(grouped_query(), row_factory(), &mut widget);
        provider.perform_fetch().expect("fetch succeeds");

        let source = widget.source.clone().expect("data source installed");
        assert_eq!(source.number_of_sections(), 2);
        assert_eq!(source.header_title(1), Some("Archive".to_string()));
        assert_eq!(
            source.cell_for_item(&mut widget, Position::new(0, 0)),
            "[row] m0@(0, 0)"
        );
    }

    #[test]
    fn test_data_source_built_once() {
        let provider = FetchedProvider::new(grouped_query(), row_factory());

        let first = provider.data_source();
        let second = provider.data_source();
        assert!(Arc::ptr_eq(&first, &second));
    }
}
