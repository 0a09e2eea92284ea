//! Opaque handle table for native objects
//!
//! The module cannot hold host references, so every native object it creates
//! is appended here and referred to by index. Slots are never freed: a destroy
//! request only reaches the native object, and a handle is never handed out
//! twice within a session.

use crate::error::BridgeError;

/// Index into a [`HandleTable`], passed by value across the module boundary
pub type Handle = u32;

/// Append-only arena of native objects
#[derive(Debug)]
pub struct HandleTable<T> {
    slots: Vec<T>,
}

impl<T> HandleTable<T> {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Store `object` and return its handle
    pub fn register(&mut self, object: T) -> Handle {
        let handle = self.slots.len() as Handle;
        self.slots.push(object);
        handle
    }

    /// Look up the object registered under `handle`
    pub fn resolve(&self, handle: Handle) -> Result<&T, BridgeError> {
        self.slots
            .get(handle as usize)
            .ok_or(BridgeError::UnknownHandle(handle))
    }

    /// Number of handles issued so far
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl<T> HandleTable<Option<T>> {
    /// Look up a native object slot, which may hold a null object
    pub fn resolve_object(&self, handle: Handle) -> Result<Option<&T>, BridgeError> {
        Ok(self.resolve(handle)?.as_ref())
    }
}

impl<T> Default for HandleTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles_start_at_zero_and_increase() {
        let mut table = HandleTable::new();
        assert_eq!(table.register("a"), 0);
        assert_eq!(table.register("b"), 1);
        assert_eq!(table.register("c"), 2);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_resolve_returns_registered_object() {
        let mut table = HandleTable::new();
        let handles: Vec<Handle> = (0..16).map(|i| table.register(i * 10)).collect();
        for (i, handle) in handles.into_iter().enumerate() {
            assert_eq!(*table.resolve(handle).unwrap(), i * 10);
        }
    }

    #[test]
    fn test_equal_objects_get_distinct_handles() {
        let mut table = HandleTable::new();
        let first = table.register(Some(5));
        let second = table.register(Some(5));
        assert_ne!(first, second);
        assert_eq!(table.resolve(first).unwrap(), table.resolve(second).unwrap());
    }

    #[test]
    fn test_null_objects_still_consume_a_handle() {
        let mut table: HandleTable<Option<u32>> = HandleTable::new();
        assert_eq!(table.register(None), 0);
        assert_eq!(table.register(Some(9)), 1);
        assert_eq!(*table.resolve(0).unwrap(), None);
    }

    #[test]
    fn test_unknown_handle_is_an_error() {
        let mut table = HandleTable::new();
        table.register(());
        assert_eq!(table.resolve(1), Err(BridgeError::UnknownHandle(1)));
        assert_eq!(
            HandleTable::<()>::new().resolve(0),
            Err(BridgeError::UnknownHandle(0))
        );
    }
}
