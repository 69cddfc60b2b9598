//! Horizon DataSource - type-safe data-source adapters for list widgets.
//!
//! This crate binds an ordered collection of model objects (optionally
//! grouped into sections, optionally backed by a live persistent-store
//! query) to a list-rendering widget's data-source contract. It performs no
//! querying, sorting, or caching of its own: it indexes into whatever
//! collection or query it is given and relays calls.
//!
//! # Core Types
//!
//! - `Position`: identifies an item as a `(section, item)` pair
//! - `Section` / `SectionInfo`: an ordered group of items with optional titles
//! - `CellFactory` / `ReusableCellFactory`: dequeues and configures cells
//! - `DataSourceProvider`: serves widget queries from in-memory sections
//! - `FetchedProvider`: serves widget queries from a live query's snapshot
//! - `DataSourceBridge`: the erased handle a widget can actually hold
//! - `ChangeRelay` / `BatchUpdate`: forwards live mutation notifications
//!
//! # Architecture Overview
//!
//! ```text
//!             queries                    indexes into
//! ┌────────┐          ┌──────────────┐   ┌──────────────────────┐
//! │ Widget │─────────>│    Bridge    │──>│       Provider       │
//! │        │<─────────│ (DataSource) │   │ (Sections|LiveQuery) │
//! └────────┘  cells   └──────────────┘   └──────────┬───────────┘
//!      ^                                            │
//!      │              ┌──────────────┐              v
//!      └──────────────│ CellFactory  │<─────────────┘
//!        dequeues via └──────────────┘  resolves items
//! ```
//!
//! Mutations flow the other way: the persistent-store query notifies a
//! [`ChangeRelay`], whose callbacks hand the application granular change
//! events (or ready-made [`BatchUpdate`] batches) to apply to the widget.
//!
//! # Example
//!
//! ```ignore
//! use horizon_datasource::{DataSourceProvider, ReusableCellFactory, Section};
//!
//! let factory = ReusableCellFactory::new("contact-row", |cell, contact, _widget, _at| {
//!     cell.with_title(&contact.name)
//! });
//!
//! let provider = DataSourceProvider::with_widget(
//!     vec![
//!         Section::new(friends).with_header_title("Friends"),
//!         Section::new(coworkers).with_header_title("Coworkers"),
//!     ],
//!     factory,
//!     &mut list,
//! );
//!
//! // The widget now answers its layout queries through the provider.
//! // Replacing a section is a positional write:
//! provider.set_section(1, Section::new(new_coworkers).with_header_title("Coworkers"));
//! ```
//!
//! All providers, bridges, and relays expect to run on the one thread that
//! owns the widget. Nothing here blocks, suspends, or spawns work.

mod bridge;
mod factory;
mod fetched;
mod position;
mod provider;
mod query;
mod relay;
mod section;
mod widget;

pub use bridge::DataSourceBridge;
pub use factory::{CellConfigurator, CellFactory, ReusableCellFactory};
pub use fetched::FetchedProvider;
pub use position::Position;
pub use provider::DataSourceProvider;
pub use query::{ChangeKind, FetchError, LiveQuery, LiveQueryDelegate, SectionSnapshot};
pub use relay::{BatchUpdate, ChangeRelay};
pub use section::{Section, SectionInfo};
pub use widget::{DataSource, ListWidget};
