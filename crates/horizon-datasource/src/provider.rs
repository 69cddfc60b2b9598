//! The in-memory sectioned data-source provider.
//!
//! [`DataSourceProvider`] owns an ordered list of sections and a cell
//! factory, and answers every widget query by indexing into them. It is the
//! provider to use when the application already holds its model objects in
//! memory; for store-backed data see
//! [`FetchedProvider`](crate::FetchedProvider).

use std::ops::Deref;
use std::sync::{Arc, OnceLock, Weak};

use parking_lot::{RwLock, RwLockReadGuard};

use crate::bridge::{DataSourceBridge, PROVIDER_DROPPED};
use crate::factory::CellFactory;
use crate::position::Position;
use crate::section::SectionInfo;
use crate::widget::{DataSource, ListWidget};

/// A data-source provider backed by in-memory sections.
///
/// The generic parameters tie the provider together at compile time: the
/// factory's item type must equal the section's item type, and the
/// factory's widget type must equal the widget being served. A provider
/// whose pieces disagree on the item type does not compile.
///
/// Providers are constructed into an [`Arc`] because the widget-facing
/// [`data_source`](DataSourceProvider::data_source) handle reaches back
/// into the provider through a weak reference. The provider must stay alive
/// for as long as the widget may call into that handle.
///
/// All mutation and all widget callbacks are expected to happen on the one
/// thread that owns the widget; the interior locks exist to satisfy the
/// shared-ownership types, not to arbitrate concurrent writers.
///
/// # Example
///
/// ```ignore
/// use horizon_datasource::{DataSourceProvider, ReusableCellFactory, Section};
///
/// let factory = ReusableCellFactory::new("contact-row", |cell, contact, _w, _at| {
///     cell.with_title(&contact.name)
/// });
///
/// let provider = DataSourceProvider::with_widget(
///     vec![Section::new(contacts).with_header_title("Contacts")],
///     factory,
///     &mut list,
/// );
/// ```
pub struct DataSourceProvider<W, S, F>
where
    W: ListWidget,
    S: SectionInfo,
    F: CellFactory<Widget = W, Item = S::Item>,
{
    sections: RwLock<Vec<S>>,
    factory: F,
    bridge: OnceLock<Arc<DataSourceBridge<W>>>,
}

impl<W, S, F> DataSourceProvider<W, S, F>
where
    W: ListWidget + 'static,
    S: SectionInfo + 'static,
    F: CellFactory<Widget = W, Item = S::Item> + 'static,
{
    /// Creates a provider over the given sections and factory.
    pub fn new(sections: Vec<S>, factory: F) -> Arc<Self> {
        Arc::new(Self {
            sections: RwLock::new(sections),
            factory,
            bridge: OnceLock::new(),
        })
    }

    /// Creates a provider and immediately installs it as `widget`'s data
    /// source.
    pub fn with_widget(sections: Vec<S>, factory: F, widget: &mut W) -> Arc<Self> {
        let provider = Self::new(sections, factory);
        widget.set_data_source(provider.data_source());
        provider
    }

    /// Returns the widget-visible data-source handle for this provider.
    ///
    /// The handle is built lazily, once, and shared by every caller. It
    /// holds only a weak reference back to the provider: dropping the
    /// provider while a widget can still call the handle is a contract
    /// violation, and the next call panics.
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

    /// Returns the number of sections.
    pub fn number_of_sections(&self) -> usize {
        self.sections.read().len()
    }

    /// Returns the number of items in the given section.
    ///
    /// # Panics
    ///
    /// Panics if `section` is out of range.
    pub fn number_of_items(&self, section: usize) -> usize {
        self.sections.read()[section].items().len()
    }

    /// Resolves the item at `at`, then dequeues and configures a cell for
    /// it via the factory.
    ///
    /// # Panics
    ///
    /// Panics if `at` is out of range, or if the factory's reuse key has no
    /// registered template in `widget`.
    pub fn cell_for_item(&self, widget: &mut W, at: Position) -> W::Cell {
        let sections = self.sections.read();
        let item = &sections[at.section()].items()[at.item()];
        let cell = self.factory.cell_for(item, widget, at);
        self.factory.configure(cell, item, widget, at)
    }

    /// Returns the header title of the given section, if any.
    ///
    /// # Panics
    ///
    /// Panics if `section` is out of range.
    pub fn header_title(&self, section: usize) -> Option<String> {
        self.sections.read()[section].header_title().map(str::to_owned)
    }

    /// Returns the footer title of the given section, if any.
    ///
    /// # Panics
    ///
    /// Panics if `section` is out of range.
    pub fn footer_title(&self, section: usize) -> Option<String> {
        self.sections.read()[section].footer_title().map(str::to_owned)
    }

    /// Returns read access to the section list.
    pub fn sections(&self) -> impl Deref<Target = Vec<S>> + '_ {
        self.sections.read()
    }

    /// Replaces the whole section list.
    pub fn set_sections(&self, sections: Vec<S>) {
        *self.sections.write() = sections;
    }

    /// Returns read access to the section at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn section(&self, index: usize) -> impl Deref<Target = S> + '_ {
        RwLockReadGuard::map(self.sections.read(), |sections| &sections[index])
    }

    /// Replaces the section at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn set_section(&self, index: usize, section: S) {
        self.sections.write()[index] = section;
    }

    /// Returns the provider's cell factory.
    pub fn factory(&self) -> &F {
        &self.factory
    }
}
