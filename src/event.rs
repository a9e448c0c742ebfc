//! Change notification.
//!
//! Every chart component owns a [`Notifier`]. Setters that affect appearance call
//! [`Notifier::fire_change`]; listeners run synchronously, last-registered first.
//! Child components forward to their parent, so any mutation anywhere in a chart
//! ends up as a single [`ChangeEvent`] on the chart's notifier, which is the only
//! "model changed, redraw" signal. There is no dirty-region tracking.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Which kind of component originated a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeSource {
    Chart,
    Title,
    Legend,
    Plot,
    Axis,
    Renderer,
    Dataset,
}

/// Coarse classification of a change, as seen by chart listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartChangeType {
    General,
    NewDataset,
    DatasetUpdated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeEvent {
    pub source: ChangeSource,
    pub kind: ChartChangeType,
}

impl ChangeEvent {
    pub fn new(source: ChangeSource, kind: ChartChangeType) -> Self {
        Self { source, kind }
    }
}

/// Emitted around every chart draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartProgressEvent {
    DrawingStarted,
    DrawingFinished,
}

/// Handle returned by `add_listener`, used to unregister.
pub type ListenerId = u64;

/// Ordered listener registry with reverse-registration dispatch.
pub struct ListenerList<E> {
    listeners: RefCell<Vec<(ListenerId, Rc<dyn Fn(&E)>)>>,
    next_id: Cell<ListenerId>,
}

impl<E> Default for ListenerList<E> {
    fn default() -> Self {
        Self {
            listeners: RefCell::new(Vec::new()),
            next_id: Cell::new(1),
        }
    }
}

impl<E> ListenerList<E> {
    pub fn add(&self, f: impl Fn(&E) + 'static) -> ListenerId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.listeners.borrow_mut().push((id, Rc::new(f)));
        id
    }

    pub fn remove(&self, id: ListenerId) -> bool {
        let mut ls = self.listeners.borrow_mut();
        let before = ls.len();
        ls.retain(|(lid, _)| *lid != id);
        ls.len() != before
    }

    pub fn len(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Call every listener, newest first. Listeners may register or remove
    /// listeners while being called; such changes apply to the next dispatch.
    pub fn dispatch(&self, event: &E) {
        let snapshot: Vec<Rc<dyn Fn(&E)>> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, f)| Rc::clone(f))
            .collect();
        for f in snapshot.iter().rev() {
            f(event);
        }
    }
}

impl<E> fmt::Debug for ListenerList<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerList")
            .field("len", &self.len())
            .finish()
    }
}

struct NotifierInner {
    source: ChangeSource,
    listeners: ListenerList<ChangeEvent>,
    notify: Cell<bool>,
}

/// A component's change-event registry plus its "notify" switch.
///
/// `Clone` produces a **fresh** notifier for the same source with no listeners
/// and notification enabled; duplicated components never inherit listeners.
/// Use [`Notifier::share`] to obtain a second handle to the same registry.
pub struct Notifier {
    inner: Rc<NotifierInner>,
}

impl Notifier {
    pub fn new(source: ChangeSource) -> Self {
        Self {
            inner: Rc::new(NotifierInner {
                source,
                listeners: ListenerList::default(),
                notify: Cell::new(true),
            }),
        }
    }

    /// Another handle to this same registry.
    pub fn share(&self) -> Notifier {
        Notifier {
            inner: Rc::clone(&self.inner),
        }
    }

    pub fn source(&self) -> ChangeSource {
        self.inner.source
    }

    pub fn add_listener(&self, f: impl Fn(&ChangeEvent) + 'static) -> ListenerId {
        self.inner.listeners.add(f)
    }

    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.inner.listeners.remove(id)
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.len()
    }

    pub fn is_notify(&self) -> bool {
        self.inner.notify.get()
    }

    /// Suppress or re-enable outward notification. Re-enabling fires exactly one
    /// general change so that batched mutations produce a single redraw.
    pub fn set_notify(&self, notify: bool) {
        let was = self.inner.notify.replace(notify);
        if notify && !was {
            self.fire_change();
        }
    }

    /// Fire a general change from this notifier's source.
    pub fn fire_change(&self) {
        self.fire(&ChangeEvent::new(self.inner.source, ChartChangeType::General));
    }

    /// Dispatch `event` unless notification is suppressed.
    pub fn fire(&self, event: &ChangeEvent) {
        if self.inner.notify.get() {
            self.inner.listeners.dispatch(event);
        }
    }

    /// Register a listener on `child` that re-fires every child event here.
    pub fn forward_from(&self, child: &Notifier) -> ListenerId {
        let parent = self.share();
        child.add_listener(move |e| parent.fire(e))
    }
}

impl Clone for Notifier {
    fn clone(&self) -> Self {
        Notifier::new(self.inner.source)
    }
}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("source", &self.inner.source)
            .field("listeners", &self.inner.listeners.len())
            .field("notify", &self.inner.notify.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_is_last_registered_first() {
        let n = Notifier::new(ChangeSource::Chart);
        let order = Rc::new(RefCell::new(Vec::new()));
        for i in 0..3 {
            let o = Rc::clone(&order);
            n.add_listener(move |_| o.borrow_mut().push(i));
        }
        n.fire_change();
        assert_eq!(*order.borrow(), vec![2, 1, 0]);
    }

    #[test]
    fn clone_starts_without_listeners() {
        let n = Notifier::new(ChangeSource::Title);
        n.add_listener(|_| {});
        let dup = n.clone();
        assert_eq!(dup.listener_count(), 0);
        assert_eq!(n.share().listener_count(), 1);
    }
}
