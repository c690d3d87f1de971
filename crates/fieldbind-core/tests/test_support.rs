//! Shared test support utilities for integration tests

#![allow(dead_code)]

use fieldbind_core::validators;
use fieldbind_core::{Binder, MemoryField, StatusChangeEvent, ValueChangeEvent};
use std::cell::RefCell;
use std::rc::Rc;

/// Length check used by the text scenarios
pub const LENGTH_MESSAGE: &str = "Input needs to be between 5 and 10 characters";

pub fn text_field() -> Rc<MemoryField<String>> {
    Rc::new(MemoryField::text())
}

pub fn length_5_to_10() -> fieldbind_core::Validator<String> {
    validators::string_length(LENGTH_MESSAGE, Some(5), Some(10))
}

/// Everything a binder published, in order
#[derive(Debug)]
pub struct EventLog<M> {
    pub values: Vec<ValueChangeEvent<M>>,
    pub statuses: Vec<StatusChangeEvent>,
}

/// Record every event of `binder`; registrations stay alive with the binder
pub fn record_events<M: Clone + 'static>(binder: &Binder<M>) -> Rc<RefCell<EventLog<M>>> {
    let log = Rc::new(RefCell::new(EventLog {
        values: Vec::new(),
        statuses: Vec::new(),
    }));

    let sink = Rc::clone(&log);
    let values = binder.add_value_change_listener(move |event| sink.borrow_mut().values.push(event.clone()));
    let sink = Rc::clone(&log);
    let statuses = binder.add_status_change_listener(move |event| sink.borrow_mut().statuses.push(event.clone()));

    // Dropping a registration does not remove the listener
    drop((values, statuses));
    log
}
