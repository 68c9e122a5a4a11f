//! User-selected location
//!
//! A single observable slot holding the place the user explicitly picked.
//! The store is the only writer; everyone else subscribes. It lives for the
//! process and is never persisted.

use crate::model::SelectedLocation;
use std::sync::Arc;
use tokio::sync::watch;

/// Cloneable handle to the selection slot
#[derive(Debug, Clone)]
pub struct SelectionStore {
    sender: Arc<watch::Sender<Option<SelectedLocation>>>,
}

impl SelectionStore {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(None);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Overwrite the selection
    pub fn set(&self, location: SelectedLocation) {
        tracing::debug!(
            latitude = location.latitude,
            longitude = location.longitude,
            "Location selected"
        );
        self.sender.send_replace(Some(location));
    }

    /// Forget the selection
    pub fn clear(&self) {
        self.sender.send_replace(None);
    }

    /// Current selection, if any
    pub fn selected_location(&self) -> Option<SelectedLocation> {
        self.sender.borrow().clone()
    }

    /// Observe selection changes
    pub fn subscribe(&self) -> watch::Receiver<Option<SelectedLocation>> {
        self.sender.subscribe()
    }
}

impl Default for SelectionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_empty() {
        assert!(SelectionStore::new().selected_location().is_none());
    }

    #[test]
    fn test_set_overwrites_and_clear_empties() {
        let store = SelectionStore::new();
        store.set(SelectedLocation::new(37.5, 127.0, Some("A".to_string())));
        store.set(SelectedLocation::new(35.1, 129.0, None));

        let current = store.selected_location().unwrap();
        assert_eq!(current.latitude, 35.1);
        assert!(current.address.is_none());

        store.clear();
        assert!(store.selected_location().is_none());
    }

    #[test]
    fn test_clones_share_the_slot() {
        let store = SelectionStore::new();
        let reader = store.clone();
        store.set(SelectedLocation::new(37.5, 127.0, None));
        assert!(reader.selected_location().is_some());
    }

    #[tokio::test]
    async fn test_subscribers_observe_changes() {
        let store = SelectionStore::new();
        let mut rx = store.subscribe();

        store.set(SelectedLocation::new(37.5, 127.0, Some("서울".to_string())));
        rx.changed().await.unwrap();
        assert_eq!(
            rx.borrow().as_ref().and_then(|s| s.address.clone()),
            Some("서울".to_string())
        );
    }
}
