//! Tree events
//!
//! Attach/detach and dirty notifications. Listeners are typed callbacks kept
//! in one list per event kind and invoked synchronously at the mutation point.

use crate::NodeId;

/// A component was added to a container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentAttachEvent {
    pub container: NodeId,
    pub component: NodeId,
}

/// A component was removed from a container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentDetachEvent {
    pub container: NodeId,
    pub component: NodeId,
}

/// A connector became reachable from the root
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttachEvent {
    pub connector: NodeId,
}

/// A connector is about to leave the root's tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetachEvent {
    pub connector: NodeId,
}

/// A connector went from clean to dirty
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkedDirtyEvent {
    pub connector: NodeId,
}

/// Listener registration handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Callback<E> = Box<dyn FnMut(&E) + Send>;

/// Listeners for one event kind, optionally bound to a source node
pub(crate) struct ListenerList<E> {
    entries: Vec<(ListenerId, Option<NodeId>, Callback<E>)>,
}

impl<E> Default for ListenerList<E> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<E> ListenerList<E> {
    fn add(&mut self, id: ListenerId, source: Option<NodeId>, callback: Callback<E>) {
        self.entries.push((id, source, callback));
    }

    fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _, _)| *entry != id);
        self.entries.len() != before
    }

    /// Deliver to listeners bound to `source` and to unbound listeners
    fn fire(&mut self, source: NodeId, event: &E) {
        for (_, bound, callback) in self.entries.iter_mut() {
            if bound.is_none_or(|b| b == source) {
                callback(event);
            }
        }
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Listener lists of one root
#[derive(Default)]
pub(crate) struct EventRouter {
    next_id: u64,
    component_attach: ListenerList<ComponentAttachEvent>,
    component_detach: ListenerList<ComponentDetachEvent>,
    attach: ListenerList<AttachEvent>,
    detach: ListenerList<DetachEvent>,
    marked_dirty: ListenerList<MarkedDirtyEvent>,
}

impl std::fmt::Debug for EventRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventRouter")
            .field("listeners", &self.len())
            .finish()
    }
}

impl EventRouter {
    fn allocate(&mut self) -> ListenerId {
        self.next_id += 1;
        ListenerId(self.next_id)
    }

    pub fn on_component_attach(&mut self, container: NodeId, callback: Callback<ComponentAttachEvent>) -> ListenerId {
        let id = self.allocate();
        self.component_attach.add(id, Some(container), callback);
        id
    }

    pub fn on_component_detach(&mut self, container: NodeId, callback: Callback<ComponentDetachEvent>) -> ListenerId {
        let id = self.allocate();
        self.component_detach.add(id, Some(container), callback);
        id
    }

    pub fn on_attach(&mut self, connector: NodeId, callback: Callback<AttachEvent>) -> ListenerId {
        let id = self.allocate();
        self.attach.add(id, Some(connector), callback);
        id
    }

    pub fn on_detach(&mut self, connector: NodeId, callback: Callback<DetachEvent>) -> ListenerId {
        let id = self.allocate();
        self.detach.add(id, Some(connector), callback);
        id
    }

    pub fn on_marked_dirty(&mut self, callback: Callback<MarkedDirtyEvent>) -> ListenerId {
        let id = self.allocate();
        self.marked_dirty.add(id, None, callback);
        id
    }

    pub fn remove(&mut self, id: ListenerId) -> bool {
        self.component_attach.remove(id)
            || self.component_detach.remove(id)
            || self.attach.remove(id)
            || self.detach.remove(id)
            || self.marked_dirty.remove(id)
    }

    pub fn component_attached(&mut self, container: NodeId, component: NodeId) {
        self.component_attach
            .fire(container, &ComponentAttachEvent { container, component });
    }

    pub fn component_detached(&mut self, container: NodeId, component: NodeId) {
        self.component_detach
            .fire(container, &ComponentDetachEvent { container, component });
    }

    pub fn attached(&mut self, connector: NodeId) {
        self.attach.fire(connector, &AttachEvent { connector });
    }

    pub fn detached(&mut self, connector: NodeId) {
        self.detach.fire(connector, &DetachEvent { connector });
    }

    pub fn marked_dirty(&mut self, connector: NodeId) {
        self.marked_dirty.fire(connector, &MarkedDirtyEvent { connector });
    }

    pub fn len(&self) -> usize {
        self.component_attach.len()
            + self.component_detach.len()
            + self.attach.len()
            + self.detach.len()
            + self.marked_dirty.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_bound_listener_only_sees_its_source() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut router = EventRouter::default();
        let sink = Arc::clone(&seen);
        router.on_component_attach(NodeId(1), Box::new(move |e| sink.lock().unwrap().push(e.component)));

        router.component_attached(NodeId(1), NodeId(5));
        router.component_attached(NodeId(2), NodeId(6));

        assert_eq!(*seen.lock().unwrap(), vec![NodeId(5)]);
    }

    #[test]
    fn test_remove_listener() {
        let mut router = EventRouter::default();
        let id = router.on_marked_dirty(Box::new(|_| {}));
        assert_eq!(router.len(), 1);
        assert!(router.remove(id));
        assert!(!router.remove(id));
        assert_eq!(router.len(), 0);
    }
}
