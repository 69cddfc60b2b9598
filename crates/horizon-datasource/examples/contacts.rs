//! Horizon DataSource Contacts Example
//!
//! Console walkthrough of the crate's surface:
//! - A static provider over two in-memory sections
//! - Whole-section replacement and re-rendering
//! - A live-query-backed provider with fetch success and failure
//! - A batching change relay translating store events into UI updates
//!
//! Run with: cargo run -p horizon-datasource --example contacts

use std::sync::Arc;

use parking_lot::RwLock;

use horizon_datasource::{
    ChangeKind, ChangeRelay, DataSource, DataSourceProvider, FetchError, FetchedProvider,
    ListWidget, LiveQuery, LiveQueryDelegate, Position, ReusableCellFactory, Section,
    SectionSnapshot,
};

/// A contact card in the directory.
#[derive(Clone)]
struct Contact {
    name: &'static str,
    phone: &'static str,
}

impl Contact {
    const fn new(name: &'static str, phone: &'static str) -> Self {
        Self { name, phone }
    }
}

/// A console "list widget": cells are strings, templates are key names.
struct ConsoleList {
    templates: Vec<&'static str>,
    source: Option<Arc<dyn DataSource<Self>>>,
}

impl ConsoleList {
    fn new(templates: Vec<&'static str>) -> Self {
        Self {
            templates,
            source: None,
        }
    }

    /// Renders every section the way a real widget would: by asking the
    /// installed data source positional questions.
    fn render(&mut self) {
        let source = self.source.clone().expect("data source installed");
        for section in 0..source.number_of_sections() {
            if let Some(header) = source.header_title(section) {
                println!("== {header} ==");
            }
            for item in 0..source.number_of_items(section) {
                let cell = source.cell_for_item(self, Position::new(section, item));
                println!("  {cell}");
            }
            if let Some(footer) = source.footer_title(section) {
                println!("  ({footer})");
            }
        }
        println!();
    }
}

impl ListWidget for ConsoleList {
    type Cell = String;

    fn dequeue_reusable_cell(&mut self, reuse_key: &str, _at: Position) -> Option<String> {
        self.templates.contains(&reuse_key).then(String::new)
    }

    fn set_data_source(&mut self, source: Arc<dyn DataSource<Self>>) {
        self.source = Some(source);
    }
}

/// An in-memory stand-in for a persistent-store query: groups appear only
/// after a successful fetch, and the store can be taken offline.
struct DirectoryQuery {
    online: bool,
    groups: Vec<(&'static str, Vec<Contact>)>,
    loaded: RwLock<bool>,
}

impl LiveQuery for DirectoryQuery {
    type Item = Contact;

    fn perform_fetch(&self) -> Result<(), FetchError> {
        if !self.online {
            return Err(FetchError::new("directory store offline"));
        }
        *self.loaded.write() = true;
        Ok(())
    }

    fn section_count(&self) -> usize {
        if *self.loaded.read() {
            self.groups.len()
        } else {
            0
        }
    }

    fn section(&self, index: usize) -> Option<SectionSnapshot> {
        if !*self.loaded.read() {
            return None;
        }
        self.groups.get(index).map(|(name, contacts)| SectionSnapshot {
            name: (*name).to_string(),
            object_count: contacts.len(),
        })
    }

    fn object(&self, at: Position) -> Contact {
        self.groups[at.section()].1[at.item()].clone()
    }
}

fn contact_factory() -> ReusableCellFactory<ConsoleList, Contact> {
    ReusableCellFactory::new("contact-row", |_cell, contact: &Contact, _widget, _at| {
        format!("{:<10} {}", contact.name, contact.phone)
    })
}

fn static_provider_demo() {
    println!("--- static provider ---");

    let mut list = ConsoleList::new(vec!["contact-row"]);
    let provider = DataSourceProvider::with_widget(
        vec![
            Section::new(vec![
                Contact::new("Ada", "555-0100"),
                Contact::new("Grace", "555-0101"),
                Contact::new("Edsger", "555-0102"),
            ])
            .with_header_title("Favorites"),
            Section::new(vec![
                Contact::new("Barbara", "555-0200"),
                Contact::new("Donald", "555-0201"),
                Contact::new("Tony", "555-0202"),
            ])
            .with_header_title("Others")
            .with_footer_title("3 contacts"),
        ],
        contact_factory(),
        &mut list,
    );
    list.render();

    println!("--- after replacing the first section ---");
    provider.set_section(
        0,
        Section::new(vec![
            Contact::new("Ada", "555-0100"),
            Contact::new("Katherine", "555-0103"),
        ])
        .with_header_title("Favorites"),
    );
    list.render();
}

fn fetched_provider_demo() {
    println!("--- fetched provider ---");

    let mut list = ConsoleList::new(vec!["contact-row"]);
    let provider = FetchedProvider::with_widget(
        DirectoryQuery {
            online: true,
            groups: vec![
                ("A", vec![Contact::new("Ada", "555-0100")]),
                (
                    "B",
                    vec![
                        Contact::new("Barbara", "555-0200"),
                        Contact::new("Brian", "555-0203"),
                    ],
                ),
            ],
            loaded: RwLock::new(false),
        },
        contact_factory(),
        &mut list,
    );

    provider.perform_fetch().expect("directory store online");
    list.render();

    println!("--- fetch failure is reported, not fatal ---");
    let offline = FetchedProvider::new(
        DirectoryQuery {
            online: false,
            groups: Vec::new(),
            loaded: RwLock::new(false),
        },
        contact_factory(),
    );
    match offline.perform_fetch() {
        Ok(()) => unreachable!("store is offline"),
        Err(error) => println!("fetch failed: {error}"),
    }
    println!("sections after failed fetch: {}\n", offline.number_of_sections());
}

fn change_relay_demo() {
    println!("--- batching change relay ---");

    let relay: ChangeRelay<Contact> = ChangeRelay::batching(|batch| {
        println!("apply {} update(s):", batch.len());
        for update in batch {
            println!("  {update:?}");
        }
    });

    // A store recomputation cycle, as a live query would emit it.
    let moved = Contact::new("Grace", "555-0101");
    relay.will_change_content();
    relay.section_changed(
        &SectionSnapshot {
            name: "G".to_string(),
            object_count: 1,
        },
        1,
        ChangeKind::Insert,
    );
    relay.object_changed(
        &moved,
        Some(Position::new(0, 1)),
        ChangeKind::Move,
        Some(Position::new(1, 0)),
    );
    relay.did_change_content();
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    static_provider_demo();
    fetched_provider_demo();
    change_relay_demo();
}
