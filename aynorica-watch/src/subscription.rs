//! Change notifications for `<root>/.github/`.
//!
//! [`ChangeFeed`] owns a notify watcher and turns raw filesystem events into
//! [`ChangeEvent`]s. Interested parties register a handler with
//! [`Subscribers::subscribe`] and keep the returned [`Subscription`] alive
//! for as long as they want events; dropping it unregisters the handler.
//! Handlers run in no particular order relative to one another.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::{Rc, Weak};

use notify::{recommended_watcher, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use aynorica_core::registry::{brain_dir_at, REGISTRY_FILE};

use crate::error::{io_err, WatchError};

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent {
    /// `aynorica-registry.json` was created or modified.
    Registry,
    /// Any other file under `.github/` was written.
    BrainFile(PathBuf),
}

// ---------------------------------------------------------------------------
// Subscribers
// ---------------------------------------------------------------------------

type Handler<E> = Rc<RefCell<dyn FnMut(&E)>>;

struct Slots<E> {
    next_id: u64,
    handlers: Vec<(u64, Handler<E>)>,
}

/// A set of handlers for events of type `E`. Cloning shares the set.
pub struct Subscribers<E> {
    slots: Rc<RefCell<Slots<E>>>,
}

impl<E> Clone for Subscribers<E> {
    fn clone(&self) -> Self {
        Self {
            slots: Rc::clone(&self.slots),
        }
    }
}

impl<E> Default for Subscribers<E> {
    fn default() -> Self {
        Self {
            slots: Rc::new(RefCell::new(Slots {
                next_id: 0,
                handlers: Vec::new(),
            })),
        }
    }
}

impl<E: 'static> Subscribers<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` until the returned guard is dropped.
    #[must_use = "dropping the subscription unregisters the handler"]
    pub fn subscribe(&self, handler: impl FnMut(&E) + 'static) -> Subscription {
        let handler: Handler<E> = Rc::new(RefCell::new(handler));
        let id = {
            let mut slots = self.slots.borrow_mut();
            let id = slots.next_id;
            slots.next_id += 1;
            slots.handlers.push((id, handler));
            id
        };

        let slots: Weak<RefCell<Slots<E>>> = Rc::downgrade(&self.slots);
        Subscription {
            cancel: Some(Box::new(move || {
                if let Some(slots) = slots.upgrade() {
                    slots.borrow_mut().handlers.retain(|(h, _)| *h != id);
                }
            })),
        }
    }

    /// Call every registered handler with `event`.
    ///
    /// Handlers may subscribe or unsubscribe while running; changes apply
    /// from the next publish.
    pub fn publish(&self, event: &E) {
        let handlers: Vec<Handler<E>> = self
            .slots
            .borrow()
            .handlers
            .iter()
            .map(|(_, h)| Rc::clone(h))
            .collect();
        for handler in handlers {
            (&mut *handler.borrow_mut())(event);
        }
    }

    pub fn len(&self) -> usize {
        self.slots.borrow().handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Keeps a handler registered. Dropping it stops delivery.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Filesystem feed
// ---------------------------------------------------------------------------

/// Watches `<root>/.github/` recursively.
pub struct ChangeFeed {
    _watcher: RecommendedWatcher,
    events: mpsc::UnboundedReceiver<ChangeEvent>,
    subscribers: Subscribers<ChangeEvent>,
    brain_dir: PathBuf,
}

impl ChangeFeed {
    /// Start watching. The `.github/` directory must exist.
    pub fn watch(root: &Path) -> Result<Self, WatchError> {
        let brain_dir = brain_dir_at(root);
        // Canonicalize so that event paths (which arrive as real paths, e.g.
        // /private/var/... on macOS) match the prefix checks.
        let brain_dir = fs::canonicalize(&brain_dir).map_err(|e| io_err(&brain_dir, e))?;

        let (tx, events) = mpsc::unbounded_channel();
        let filter_dir = brain_dir.clone();
        let mut watcher = recommended_watcher(move |event: notify::Result<Event>| {
            let event = match event {
                Ok(event) => event,
                Err(err) => {
                    tracing::warn!(error = %err, "watcher event error");
                    return;
                }
            };
            if !is_relevant_event_kind(&event.kind) {
                return;
            }
            for path in event.paths {
                if let Some(change) = classify(&filter_dir, &path) {
                    let _ = tx.send(change);
                }
            }
        })?;
        watcher.watch(&brain_dir, RecursiveMode::Recursive)?;
        tracing::debug!(path = %brain_dir.display(), "watching brain directory");

        Ok(Self {
            _watcher: watcher,
            events,
            subscribers: Subscribers::new(),
            brain_dir,
        })
    }

    pub fn brain_dir(&self) -> &Path {
        &self.brain_dir
    }

    /// Handle for registering handlers; shares this feed's handler set.
    pub fn subscribers(&self) -> Subscribers<ChangeEvent> {
        self.subscribers.clone()
    }

    /// Next change from the watcher; `None` once the watcher is gone.
    pub async fn recv(&mut self) -> Option<ChangeEvent> {
        self.events.recv().await
    }
}

fn is_relevant_event_kind(kind: &EventKind) -> bool {
    matches!(kind, EventKind::Create(_) | EventKind::Modify(_))
}

fn classify(brain_dir: &Path, path: &Path) -> Option<ChangeEvent> {
    if !path.starts_with(brain_dir) || path.is_dir() {
        return None;
    }
    if path.parent() == Some(brain_dir)
        && path.file_name().and_then(|n| n.to_str()) == Some(REGISTRY_FILE)
    {
        return Some(ChangeEvent::Registry);
    }
    Some(ChangeEvent::BrainFile(path.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn dropping_subscription_stops_delivery() {
        let subscribers = Subscribers::<u32>::new();
        let seen = Rc::new(Cell::new(0));

        let counter = Rc::clone(&seen);
        let sub = subscribers.subscribe(move |n| counter.set(counter.get() + n));
        subscribers.publish(&2);
        assert_eq!(seen.get(), 2);

        drop(sub);
        assert!(subscribers.is_empty());
        subscribers.publish(&5);
        assert_eq!(seen.get(), 2);
    }

    #[test]
    fn every_subscriber_sees_each_event() {
        let subscribers = Subscribers::<&'static str>::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let a = Rc::clone(&log);
        let _first = subscribers.subscribe(move |e| a.borrow_mut().push(format!("a:{e}")));
        let b = Rc::clone(&log);
        let _second = subscribers.subscribe(move |e| b.borrow_mut().push(format!("b:{e}")));

        subscribers.publish(&"saved");
        let mut got = log.borrow().clone();
        got.sort();
        assert_eq!(got, vec!["a:saved", "b:saved"]);
    }

    #[test]
    fn handler_may_unsubscribe_itself() {
        let subscribers = Subscribers::<()>::new();
        let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let calls = Rc::new(Cell::new(0));

        let inner_slot = Rc::clone(&slot);
        let inner_calls = Rc::clone(&calls);
        let sub = subscribers.subscribe(move |_| {
            inner_calls.set(inner_calls.get() + 1);
            inner_slot.borrow_mut().take();
        });
        *slot.borrow_mut() = Some(sub);

        subscribers.publish(&());
        subscribers.publish(&());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn registry_file_is_its_own_event() {
        let brain = Path::new("/ws/.github");
        assert_eq!(
            classify(brain, &brain.join("aynorica-registry.json")),
            Some(ChangeEvent::Registry)
        );
        assert_eq!(
            classify(brain, &brain.join("node-manifest.md")),
            Some(ChangeEvent::BrainFile(brain.join("node-manifest.md")))
        );
        assert_eq!(
            classify(brain, &brain.join("prompts/aynorica-registry.json")),
            Some(ChangeEvent::BrainFile(
                brain.join("prompts/aynorica-registry.json")
            ))
        );
        assert_eq!(classify(brain, Path::new("/ws/src/main.rs")), None);
    }
}
