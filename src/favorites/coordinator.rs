//! Favorites list coordination
//!
//! Owns the working copy of one device's favorites. The server is the
//! source of truth: adds re-fetch the list, deletes only touch the local
//! list after the server confirmed, and reorders are local until
//! [`FavoritesCoordinator::persist_order`] writes every position back.
//!
//! Nothing here returns an error. Failures become a [`Notice`] and a
//! `false` (or a [`PersistReport`] with failures).
//!
//! [`Notice`]: crate::notice::Notice

use crate::constants::messages;
use crate::favorites::FavoritesClient;
use crate::model::{FavoriteLocation, FavoriteLocationRequest, SearchResult};
use crate::notice::Notifier;
use std::sync::Arc;
use tokio::sync::watch;

/// Outcome of writing the local order back to the server
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PersistReport {
    pub updated: usize,
    pub failed: usize,
}

impl PersistReport {
    pub fn is_complete(&self) -> bool {
        self.failed == 0
    }
}

/// Coordinates the favorites list of one device
pub struct FavoritesCoordinator<F> {
    client: Arc<F>,
    device_id: String,
    favorites: watch::Sender<Vec<FavoriteLocation>>,
    edit_mode: watch::Sender<bool>,
    notifier: Notifier,
}

impl<F: FavoritesClient> FavoritesCoordinator<F> {
    pub fn new(client: Arc<F>, device_id: impl Into<String>, notifier: Notifier) -> Self {
        let (favorites, _) = watch::channel(Vec::new());
        let (edit_mode, _) = watch::channel(false);
        Self {
            client,
            device_id: device_id.into(),
            favorites,
            edit_mode,
            notifier,
        }
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// Observe the favorites list
    pub fn subscribe(&self) -> watch::Receiver<Vec<FavoriteLocation>> {
        self.favorites.subscribe()
    }

    /// Observe edit mode
    pub fn subscribe_edit_mode(&self) -> watch::Receiver<bool> {
        self.edit_mode.subscribe()
    }

    /// Snapshot of the working list
    pub fn favorites(&self) -> Vec<FavoriteLocation> {
        self.favorites.borrow().clone()
    }

    /// Replace the working list with the server's
    pub async fn refresh(&self) -> bool {
        match self.client.list(&self.device_id).await {
            Ok(list) => {
                tracing::debug!(count = list.len(), "Favorites refreshed");
                self.favorites.send_replace(list);
                true
            }
            Err(e) => {
                tracing::warn!("Failed to load favorites: {}", e);
                self.notifier.error(e.user_message());
                false
            }
        }
    }

    /// Save a search result as a favorite, then re-fetch
    pub async fn add(&self, candidate: &SearchResult) -> bool {
        let request = FavoriteLocationRequest::from_result(self.device_id.clone(), candidate);

        match self.client.add(&request).await {
            Ok(envelope) => {
                tracing::info!(address = %candidate.address_name, "Favorite added");
                let message = if envelope.message.trim().is_empty() {
                    messages::FAVORITE_ADDED.to_string()
                } else {
                    envelope.message
                };
                self.notifier.info(message);
                self.refresh().await;
                true
            }
            Err(e) => {
                tracing::warn!(address = %candidate.address_name, "Failed to add favorite: {}", e);
                self.notifier.error(e.user_message());
                false
            }
        }
    }

    /// Delete a favorite; the local list changes only once the server agreed
    pub async fn delete(&self, location: &FavoriteLocation) -> bool {
        let result = self
            .client
            .delete(location.latitude, location.longitude, &self.device_id)
            .await;

        match result {
            Ok(()) => {
                self.favorites.send_if_modified(|list| {
                    match list.iter().position(|f| f.is_same(location)) {
                        Some(index) => {
                            list.remove(index);
                            true
                        }
                        None => false,
                    }
                });
                self.notifier.info(messages::FAVORITE_DELETED);
                true
            }
            Err(e) => {
                tracing::warn!(address = %location.address_name, "Failed to delete favorite: {}", e);
                self.notifier.error(e.user_message());
                false
            }
        }
    }

    pub fn is_edit_mode(&self) -> bool {
        *self.edit_mode.borrow()
    }

    /// Whether tapping a row should navigate
    pub fn can_navigate(&self) -> bool {
        !self.is_edit_mode()
    }

    pub fn toggle_edit_mode(&self) {
        self.edit_mode.send_modify(|mode| *mode = !*mode);
    }

    /// Leave edit mode, e.g. when the panel is dismissed
    pub fn exit_edit_mode(&self) {
        self.edit_mode.send_if_modified(|mode| std::mem::replace(mode, false));
    }

    /// Move one row locally and renumber; no network
    ///
    /// Out-of-range indices are ignored.
    pub fn reorder(&self, from: usize, to: usize) -> bool {
        self.favorites.send_if_modified(|list| {
            if from >= list.len() || to >= list.len() || from == to {
                return false;
            }
            let item = list.remove(from);
            list.insert(to, item);
            for (index, favorite) in list.iter_mut().enumerate() {
                favorite.sort_order = index as u32;
            }
            true
        })
    }

    /// Write every position of the local order to the server
    ///
    /// Items are sent one by one in list order. A failed item is logged and
    /// skipped; the rest are still sent.
    pub async fn persist_order(&self) -> PersistReport {
        let snapshot = self.favorites();
        let mut report = PersistReport::default();

        for (index, favorite) in snapshot.iter().enumerate() {
            let result = self
                .client
                .update_sort_order(
                    favorite.latitude,
                    favorite.longitude,
                    &self.device_id,
                    index as u32,
                )
                .await;

            match result {
                Ok(()) => report.updated += 1,
                Err(e) => {
                    tracing::warn!(
                        address = %favorite.address_name,
                        sort_order = index,
                        "Failed to update sort order: {}",
                        e
                    );
                    report.failed += 1;
                }
            }
        }

        if !report.is_complete() {
            self.notifier.error(messages::SORT_ORDER_PARTIAL);
        }
        tracing::debug!(updated = report.updated, failed = report.failed, "Sort order persisted");
        report
    }
}
