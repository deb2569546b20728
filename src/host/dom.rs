//! Simulated DOM containers and event targets

use std::sync::Mutex;

use crate::core::sync::lock_recover;
use crate::resources::api::{Capability, ContainerHandle, EventHandler, EventTarget, HandleError};
use crate::resources::types::same_arc;

/// Container element holding named child nodes
#[derive(Debug)]
pub struct SimContainer {
    label: String,
    children: Mutex<Vec<String>>,
}

impl SimContainer {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            children: Mutex::new(Vec::new()),
        }
    }

    pub fn with_children<I, S>(self, children: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        lock_recover(&self.children).extend(children.into_iter().map(Into::into));
        self
    }
}

impl ContainerHandle for SimContainer {
    fn label(&self) -> &str {
        &self.label
    }

    fn child_count(&self) -> usize {
        lock_recover(&self.children).len()
    }

    fn remove_first_child(&self) -> Capability {
        let mut children = lock_recover(&self.children);
        if children.is_empty() {
            return Some(Err(HandleError::failed("remove child", "container is empty")));
        }
        children.remove(0);
        Some(Ok(()))
    }
}

/// Event target keeping its listeners in attachment order
pub struct SimEventTarget {
    label: String,
    listeners: Mutex<Vec<(String, EventHandler)>>,
}

impl SimEventTarget {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            listeners: Mutex::new(Vec::new()),
        }
    }

    pub fn listener_count(&self) -> usize {
        lock_recover(&self.listeners).len()
    }

    /// Invoke every handler attached for `event`; returns how many ran
    pub fn dispatch(&self, event: &str) -> usize {
        // Clone out so handlers may touch this target without deadlocking
        let handlers: Vec<EventHandler> = lock_recover(&self.listeners)
            .iter()
            .filter(|(name, _)| name == event)
            .map(|(_, handler)| handler.clone())
            .collect();
        for handler in &handlers {
            handler(event);
        }
        handlers.len()
    }
}

impl std::fmt::Debug for SimEventTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimEventTarget")
            .field("label", &self.label)
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl EventTarget for SimEventTarget {
    fn label(&self) -> &str {
        &self.label
    }

    fn add_event_listener(&self, event: &str, handler: EventHandler) -> Capability {
        lock_recover(&self.listeners).push((event.to_string(), handler));
        Some(Ok(()))
    }

    /// Removing a listener that is not attached is a no-op, as in the DOM
    fn remove_event_listener(&self, event: &str, handler: &EventHandler) -> Capability {
        let mut listeners = lock_recover(&self.listeners);
        if let Some(pos) = listeners
            .iter()
            .position(|(name, h)| name == event && same_arc(h, handler))
        {
            listeners.remove(pos);
        }
        Some(Ok(()))
    }
}
