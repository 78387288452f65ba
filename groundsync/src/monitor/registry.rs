//! Subscription registry for the change monitor.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::bus::DataValue;

/// Error returned by a change callback.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct CallbackError(pub String);

impl CallbackError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Callback invoked with `(name, old, new)` when a dataref changes.
pub type ChangeCallback =
    Arc<dyn Fn(&str, &DataValue, &DataValue) -> Result<(), CallbackError> + Send + Sync>;

/// Handle identifying one registered callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallbackId(pub(crate) u64);

/// One subscribed dataref: last observed value and its callbacks in
/// registration order.
pub(crate) struct Subscription {
    pub(crate) last: Option<DataValue>,
    pub(crate) callbacks: Vec<(CallbackId, ChangeCallback)>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("last", &self.last)
            .field("callbacks", &self.callbacks.len())
            .finish()
    }
}

/// Outcome of recording a fresh observation.
#[derive(Debug, PartialEq)]
pub(crate) enum Observation {
    /// Nothing known before; value stored silently.
    First,
    Unchanged,
    Changed(DataValue),
}

impl Subscription {
    pub(crate) fn new(initial: Option<DataValue>) -> Self {
        Self {
            last: initial,
            callbacks: Vec::new(),
        }
    }

    /// Store `current` as the last observed value and report what it replaced.
    pub(crate) fn observe(&mut self, current: DataValue) -> Observation {
        match self.last.replace(current) {
            None => Observation::First,
            Some(old) if Some(&old) == self.last.as_ref() => Observation::Unchanged,
            Some(old) => Observation::Changed(old),
        }
    }

    pub(crate) fn callbacks(&self) -> Vec<ChangeCallback> {
        self.callbacks.iter().map(|(_, cb)| Arc::clone(cb)).collect()
    }
}

/// Registry keyed by dataref name.
#[derive(Debug, Default)]
pub(crate) struct Registry {
    entries: HashMap<String, Subscription>,
}

impl Registry {
    pub(crate) fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub(crate) fn add(
        &mut self,
        name: &str,
        initial: Option<DataValue>,
        id: CallbackId,
        callback: ChangeCallback,
    ) {
        self.entries
            .entry(name.to_string())
            .or_insert_with(|| Subscription::new(initial))
            .callbacks
            .push((id, callback));
    }

    /// Remove a callback; drops the subscription when it has none left.
    pub(crate) fn remove(&mut self, name: &str, id: CallbackId) -> bool {
        let Some(sub) = self.entries.get_mut(name) else {
            return false;
        };
        let before = sub.callbacks.len();
        sub.callbacks.retain(|(cb_id, _)| *cb_id != id);
        let removed = sub.callbacks.len() != before;
        if sub.callbacks.is_empty() {
            self.entries.remove(name);
        }
        removed
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut Subscription> {
        self.entries.get_mut(name)
    }

    pub(crate) fn get(&self, name: &str) -> Option<&Subscription> {
        self.entries.get(name)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> ChangeCallback {
        Arc::new(|_, _, _| Ok(()))
    }

    #[test]
    fn test_observe_first_then_changes() {
        let mut sub = Subscription::new(None);
        assert_eq!(sub.observe(DataValue::Int(1)), Observation::First);
        assert_eq!(sub.observe(DataValue::Int(1)), Observation::Unchanged);
        assert_eq!(
            sub.observe(DataValue::Int(2)),
            Observation::Changed(DataValue::Int(1))
        );
        assert_eq!(sub.last, Some(DataValue::Int(2)));
    }

    #[test]
    fn test_remove_last_callback_drops_entry() {
        let mut registry = Registry::default();
        registry.add("efb.chocks", None, CallbackId(1), noop());
        registry.add("efb.chocks", None, CallbackId(2), noop());
        assert!(registry.remove("efb.chocks", CallbackId(1)));
        assert!(registry.contains("efb.chocks"));
        assert!(registry.remove("efb.chocks", CallbackId(2)));
        assert!(!registry.contains("efb.chocks"));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_remove_unknown_is_false() {
        let mut registry = Registry::default();
        assert!(!registry.remove("doors.cargo.aft", CallbackId(9)));
    }

    #[test]
    fn test_initial_value_kept_for_existing_entry() {
        let mut registry = Registry::default();
        registry.add("x", Some(DataValue::Int(5)), CallbackId(1), noop());
        registry.add("x", Some(DataValue::Int(7)), CallbackId(2), noop());
        assert_eq!(registry.get("x").unwrap().last, Some(DataValue::Int(5)));
        assert_eq!(registry.get("x").unwrap().callbacks.len(), 2);
    }
}
