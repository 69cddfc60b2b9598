//! The erased observer-delegate adapter.
//!
//! [`ChangeRelay`] is the mutation-side counterpart of
//! [`DataSourceBridge`](crate::DataSourceBridge): a concrete object holding
//! four callback functions and satisfying
//! [`LiveQueryDelegate`](crate::LiveQueryDelegate) by invoking them with
//! arguments forwarded unchanged. It performs no translation of change
//! semantics and must preserve the query's emission order exactly.
//!
//! [`ChangeRelay::batching`] layers the one translation applications
//! usually want on top: accumulating a cycle's changes into
//! [`BatchUpdate`] instructions and delivering them when the cycle closes.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::position::Position;
use crate::query::{ChangeKind, LiveQueryDelegate, SectionSnapshot};

type WillChangeFn = Box<dyn Fn() + Send + Sync>;
type SectionChangedFn = Box<dyn Fn(&SectionSnapshot, usize, ChangeKind) + Send + Sync>;
type ObjectChangedFn<T> =
    Box<dyn Fn(&T, Option<Position>, ChangeKind, Option<Position>) + Send + Sync>;
type DidChangeFn = Box<dyn Fn() + Send + Sync>;

/// A concrete [`LiveQueryDelegate`] built from four callback functions.
///
/// A live query emits exactly one will-change, then its section and object
/// changes in discovery order, then exactly one did-change per
/// recomputation cycle; the relay invokes the matching callback for each,
/// in that order, without reordering, batching, deduplicating, or
/// filtering.
///
/// # Example
///
/// ```ignore
/// use horizon_datasource::ChangeRelay;
///
/// let relay = ChangeRelay::new(
///     || list.begin_updates(),
///     |_info, index, kind| println!("section {index}: {kind:?}"),
///     |message: &Message, at, kind, new| println!("{kind:?} {at:?} -> {new:?}"),
///     || list.end_updates(),
/// );
/// query.set_delegate(relay);
/// ```
pub struct ChangeRelay<T> {
    will_change: WillChangeFn,
    section_changed: SectionChangedFn,
    object_changed: ObjectChangedFn<T>,
    did_change: DidChangeFn,
}

impl<T> ChangeRelay<T> {
    /// Creates a relay from the four observer-delegate callbacks.
    pub fn new<W, S, O, D>(will_change: W, section_changed: S, object_changed: O, did_change: D) -> Self
    where
        W: Fn() + Send + Sync + 'static,
        S: Fn(&SectionSnapshot, usize, ChangeKind) + Send + Sync + 'static,
        O: Fn(&T, Option<Position>, ChangeKind, Option<Position>) + Send + Sync + 'static,
        D: Fn() + Send + Sync + 'static,
    {
        Self {
            will_change: Box::new(will_change),
            section_changed: Box::new(section_changed),
            object_changed: Box::new(object_changed),
            did_change: Box::new(did_change),
        }
    }

    /// Creates a relay that collects each cycle's changes into
    /// [`BatchUpdate`] instructions and hands the completed batch to
    /// `deliver` when the cycle closes.
    ///
    /// Instructions stay in emission order. Section moves and updates map
    /// to [`BatchUpdate::ReloadSection`], since a section has no richer
    /// in-place transition the widget could animate.
    ///
    /// # Panics
    ///
    /// Panics inside the relay if the query emits a change without the
    /// position its kind requires (for example an insertion without a new
    /// position).
    pub fn batching<D>(deliver: D) -> Self
    where
        D: Fn(Vec<BatchUpdate>) + Send + Sync + 'static,
    {
        let pending = Arc::new(Mutex::new(Vec::new()));

        Self::new(
            {
                let pending = pending.clone();
                move || pending.lock().clear()
            },
            {
                let pending = pending.clone();
                move |_info: &SectionSnapshot, index, kind| {
                    let update = match kind {
                        ChangeKind::Insert => BatchUpdate::InsertSection(index),
                        ChangeKind::Delete => BatchUpdate::RemoveSection(index),
                        ChangeKind::Move | ChangeKind::Update => BatchUpdate::ReloadSection(index),
                    };
                    pending.lock().push(update);
                }
            },
            {
                let pending = pending.clone();
                move |_object: &T, at, kind, new_position| {
                    let update = match kind {
                        ChangeKind::Insert => BatchUpdate::InsertItem(
                            new_position.expect("insert change without a new position"),
                        ),
                        ChangeKind::Delete => {
                            BatchUpdate::RemoveItem(at.expect("delete change without a position"))
                        }
                        ChangeKind::Update => {
                            BatchUpdate::ReloadItem(at.expect("update change without a position"))
                        }
                        ChangeKind::Move => BatchUpdate::MoveItem {
                            from: at.expect("move change without a source position"),
                            to: new_position.expect("move change without a destination position"),
                        },
                    };
                    pending.lock().push(update);
                }
            },
            move || deliver(std::mem::take(&mut *pending.lock())),
        )
    }
}

impl<T> LiveQueryDelegate<T> for ChangeRelay<T>
where
    T: Send + Sync,
{
    fn will_change_content(&self) {
        (self.will_change)()
    }

    fn section_changed(&self, info: &SectionSnapshot, index: usize, kind: ChangeKind) {
        (self.section_changed)(info, index, kind)
    }

    fn object_changed(
        &self,
        object: &T,
        at: Option<Position>,
        kind: ChangeKind,
        new_position: Option<Position>,
    ) {
        (self.object_changed)(object, at, kind, new_position)
    }

    fn did_change_content(&self) {
        (self.did_change)()
    }
}

/// One UI batch-update instruction, translated from a live query change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchUpdate {
    /// Insert the section at the given index.
    InsertSection(usize),
    /// Remove the section at the given index.
    RemoveSection(usize),
    /// Reload the section at the given index.
    ReloadSection(usize),
    /// Insert an item at the given position.
    InsertItem(Position),
    /// Remove the item at the given position.
    RemoveItem(Position),
    /// Reload the item at the given position.
    ReloadItem(Position),
    /// Move an item between positions.
    MoveItem {
        /// The item's position before the move.
        from: Position,
        /// The item's position after the move.
        to: Position,
    },
}

static_assertions::assert_impl_all!(ChangeRelay<String>: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(name: &str, object_count: usize) -> SectionSnapshot {
        SectionSnapshot {
            name: name.to_string(),
            object_count,
        }
    }

    #[test]
    fn test_callbacks_invoked_in_emission_order() {
        let events = Arc::new(Mutex::new(Vec::new()));

        let relay: ChangeRelay<String> = ChangeRelay::new(
            {
                let events = events.clone();
                move || events.lock().push("will".to_string())
            },
            {
                let events = events.clone();
                move |info: &SectionSnapshot, index, kind| {
                    events
                        .lock()
                        .push(format!("section {} {index} {kind:?}", info.name))
                }
            },
            {
                let events = events.clone();
                move |object: &String, at, kind, new_position| {
                    events
                        .lock()
                        .push(format!("object {object} {at:?} {kind:?} {new_position:?}"))
                }
            },
            {
                let events = events.clone();
                move || events.lock().push("did".to_string())
            },
        );

        // One scripted recomputation cycle: 1 will-change, 2 section
        // changes, 3 object changes, 1 did-change.
        let delegate: &dyn LiveQueryDelegate<String> = &relay;
        delegate.will_change_content();
        delegate.section_changed(&snapshot("A", 0), 0, ChangeKind::Insert);
        delegate.section_changed(&snapshot("B", 2), 2, ChangeKind::Delete);
        delegate.object_changed(
            &"x".to_string(),
            None,
            ChangeKind::Insert,
            Some(Position::new(0, 0)),
        );
        delegate.object_changed(&"y".to_string(), Some(Position::new(1, 1)), ChangeKind::Delete, None);
        delegate.object_changed(
            &"z".to_string(),
            Some(Position::new(1, 2)),
            ChangeKind::Move,
            Some(Position::new(0, 1)),
        );
        delegate.did_change_content();

        let events = events.lock();
        assert_eq!(
            *events,
            vec![
                "will",
                "section A 0 Insert",
                "section B 2 Delete",
                "object x None Insert Some(Position { section: 0, item: 0 })",
                "object y Some(Position { section: 1, item: 1 }) Delete None",
                "object z Some(Position { section: 1, item: 2 }) Move Some(Position { section: 0, item: 1 })",
                "did",
            ]
        );
    }

    #[test]
    fn test_batching_translates_and_delivers_per_cycle() {
        let batches = Arc::new(Mutex::new(Vec::new()));

        let relay: ChangeRelay<String> = ChangeRelay::batching({
            let batches = batches.clone();
            move |batch| batches.lock().push(batch)
        });

        relay.will_change_content();
        relay.section_changed(&snapshot("A", 1), 1, ChangeKind::Insert);
        relay.section_changed(&snapshot("B", 0), 3, ChangeKind::Update);
        relay.object_changed(
            &"x".to_string(),
            None,
            ChangeKind::Insert,
            Some(Position::new(1, 0)),
        );
        relay.object_changed(
            &"y".to_string(),
            Some(Position::new(0, 2)),
            ChangeKind::Move,
            Some(Position::new(1, 1)),
        );
        relay.object_changed(&"z".to_string(), Some(Position::new(0, 0)), ChangeKind::Update, None);
        relay.did_change_content();

        // A second, smaller cycle must not see the first cycle's updates.
        relay.will_change_content();
        relay.object_changed(&"w".to_string(), Some(Position::new(0, 1)), ChangeKind::Delete, None);
        relay.did_change_content();

        let batches = batches.lock();
        assert_eq!(batches.len(), 2);
        assert_eq!(
            batches[0],
            vec![
                BatchUpdate::InsertSection(1),
                BatchUpdate::ReloadSection(3),
                BatchUpdate::InsertItem(Position::new(1, 0)),
                BatchUpdate::MoveItem {
                    from: Position::new(0, 2),
                    to: Position::new(1, 1),
                },
                BatchUpdate::ReloadItem(Position::new(0, 0)),
            ]
        );
        assert_eq!(batches[1], vec![BatchUpdate::RemoveItem(Position::new(0, 1))]);
    }

    #[test]
    #[should_panic(expected = "insert change without a new position")]
    fn test_batching_rejects_malformed_insert() {
        let relay: ChangeRelay<String> = ChangeRelay::batching(|_batch| {});

        relay.will_change_content();
        relay.object_changed(&"x".to_string(), None, ChangeKind::Insert, None);
    }
}
