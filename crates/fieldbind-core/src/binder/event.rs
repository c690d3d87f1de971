//! Binder events and the listener registry

use crate::field::FieldId;
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

/// Registry key for listeners
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    ValueChange,
    StatusChange,
}

/// Published after a field change has been processed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueChangeEvent<M> {
    pub field: FieldId,
    pub from_client: bool,
    /// Converted value, when conversion succeeded
    pub value: Option<M>,
    /// Whether the buffer was updated
    pub committed: bool,
}

/// Published whenever a status has been dispatched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChangeEvent {
    pub has_validation_errors: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BinderEvent<M> {
    ValueChange(ValueChangeEvent<M>),
    StatusChange(StatusChangeEvent),
}

impl<M> BinderEvent<M> {
    pub fn kind(&self) -> EventKind {
        match self {
            BinderEvent::ValueChange(_) => EventKind::ValueChange,
            BinderEvent::StatusChange(_) => EventKind::StatusChange,
        }
    }
}

pub(crate) type Listener<M> = Rc<dyn Fn(&BinderEvent<M>)>;

/// Listeners per event kind, kept in registration order
pub(crate) struct ListenerRegistry<M> {
    next_id: Cell<u64>,
    listeners: RefCell<HashMap<EventKind, Vec<(u64, Listener<M>)>>>,
}

impl<M> ListenerRegistry<M> {
    pub(crate) fn new() -> Self {
        Self {
            next_id: Cell::new(0),
            listeners: RefCell::new(HashMap::new()),
        }
    }

    pub(crate) fn add(&self, kind: EventKind, listener: Listener<M>) -> u64 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.listeners
            .borrow_mut()
            .entry(kind)
            .or_default()
            .push((id, listener));
        id
    }

    pub(crate) fn remove(&self, kind: EventKind, id: u64) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        match listeners.get_mut(&kind) {
            Some(list) => {
                let before = list.len();
                list.retain(|(existing, _)| *existing != id);
                list.len() != before
            }
            None => false,
        }
    }

    pub(crate) fn count(&self, kind: EventKind) -> usize {
        self.listeners.borrow().get(&kind).map_or(0, Vec::len)
    }

    /// Deliver to a snapshot of the listeners; no borrow is held while they run
    pub(crate) fn fire(&self, event: &BinderEvent<M>) {
        let snapshot: Vec<Listener<M>> = self
            .listeners
            .borrow()
            .get(&event.kind())
            .map(|list| list.iter().map(|(_, listener)| Rc::clone(listener)).collect())
            .unwrap_or_default();
        for listener in snapshot {
            listener(event);
        }
    }
}
