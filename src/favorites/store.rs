//! Favorite location storage
//!
//! File-backed store used by the bundled favorites server and the local
//! client. Stored in the XDG data directory (~/.local/share/weather-places/).
//!
//! For every device the stored `sort_order` values stay a permutation of
//! `0..N` after add and remove. `set_sort_order` is a blind last-write-wins
//! overwrite, so a reorder is only dense again once every item was written.

use crate::config::defaults::APP_DIR_NAME;
use crate::error::{Error, Result};
use crate::model::{Coordinates, FavoriteLocation, FavoriteLocationRequest};
use chrono::Utc;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

const STORE_FILE_NAME: &str = "favorites.json";

/// Why a store mutation was rejected
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("이미 즐겨찾기에 등록된 위치입니다.")]
    Duplicate,

    #[error("즐겨찾기는 최대 {0}개까지 등록할 수 있습니다.")]
    LimitReached(usize),

    #[error("즐겨찾기를 찾을 수 없습니다.")]
    NotFound,

    #[error("잘못된 순서 값입니다: {order} (항목 {len}개)")]
    InvalidSortOrder { order: u32, len: usize },

    #[error("잘못된 좌표입니다: {0}")]
    InvalidCoordinates(String),

    #[error("기기 ID가 필요합니다.")]
    MissingDevice,
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        Error::Favorites(err.to_string())
    }
}

/// Entries captured before a mutation, restored if saving it fails
#[derive(Debug)]
pub struct Snapshot(Vec<FavoriteLocation>);

/// Favorites of all devices
#[derive(Debug)]
pub struct FavoriteStore {
    entries: Vec<FavoriteLocation>,
    path: Option<PathBuf>,
    max_per_device: usize,
}

impl FavoriteStore {
    /// Get the data directory path
    pub fn data_dir() -> Result<PathBuf> {
        dirs::data_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine data directory".to_string()))
    }

    /// Get the default store file path
    pub fn store_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join(STORE_FILE_NAME))
    }

    /// Load the store from the default path
    pub fn load(max_per_device: usize) -> Result<Self> {
        Self::load_from(Self::store_path()?, max_per_device)
    }

    /// Load the store from a specific path
    pub fn load_from(path: PathBuf, max_per_device: usize) -> Result<Self> {
        let entries = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| {
                Error::Config(format!("Failed to read favorites file: {}", e))
            })?;

            serde_json::from_str(&content).map_err(|e| {
                Error::Config(format!("Failed to parse favorites file: {}", e))
            })?
        } else {
            Vec::new()
        };

        Ok(Self {
            entries,
            path: Some(path),
            max_per_device,
        })
    }

    /// A store that never touches disk
    pub fn in_memory(max_per_device: usize) -> Self {
        Self {
            entries: Vec::new(),
            path: None,
            max_per_device,
        }
    }

    /// Save the store to disk; no-op for in-memory stores
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Failed to create favorites directory: {}", e))
            })?;
        }

        let content = serde_json::to_string_pretty(&self.entries)?;

        fs::write(path, content).map_err(|e| {
            Error::Config(format!("Failed to write favorites file: {}", e))
        })?;

        Ok(())
    }

    /// Capture the entries ahead of a mutation
    pub fn snapshot(&self) -> Snapshot {
        Snapshot(self.entries.clone())
    }

    /// Save the store, rolling back to `snapshot` when the write fails
    ///
    /// A mutation that could not be persisted must not stay visible.
    pub fn save_or_restore(&mut self, snapshot: Snapshot) -> Result<()> {
        match self.save() {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::warn!("Favorites not saved, rolling back: {}", e);
                self.entries = snapshot.0;
                Err(e)
            }
        }
    }

    /// A device's favorites ordered by sort order
    pub fn list(&self, device_id: &str) -> Vec<FavoriteLocation> {
        let mut items: Vec<FavoriteLocation> = self
            .entries
            .iter()
            .filter(|e| e.device_id == device_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| {
            a.sort_order
                .cmp(&b.sort_order)
                .then_with(|| a.created_at.cmp(&b.created_at))
        });
        items
    }

    /// Number of favorites for a device
    pub fn count_for(&self, device_id: &str) -> usize {
        self.entries.iter().filter(|e| e.device_id == device_id).count()
    }

    /// Add a favorite at the end of the device's list
    ///
    /// The requested sort order is ignored.
    pub fn add(&mut self, request: &FavoriteLocationRequest) -> std::result::Result<FavoriteLocation, StoreError> {
        if request.device_id.trim().is_empty() {
            return Err(StoreError::MissingDevice);
        }
        let coords = request.coordinates();
        coords
            .validate()
            .map_err(|e| StoreError::InvalidCoordinates(e.to_string()))?;

        if self.find(&request.device_id, coords).is_some() {
            return Err(StoreError::Duplicate);
        }

        let count = self.count_for(&request.device_id);
        if count >= self.max_per_device {
            return Err(StoreError::LimitReached(self.max_per_device));
        }

        let favorite = FavoriteLocation {
            device_id: request.device_id.clone(),
            latitude: request.latitude,
            longitude: request.longitude,
            address_name: request.address_name.clone(),
            region_1: request.region_1.clone(),
            region_2: request.region_2.clone(),
            region_3: request.region_3.clone(),
            sort_order: count as u32,
            created_at: Some(Utc::now()),
        };
        self.entries.push(favorite.clone());
        Ok(favorite)
    }

    /// Remove a favorite and close the gap in the device's sort orders
    pub fn remove(&mut self, device_id: &str, coords: Coordinates) -> Option<FavoriteLocation> {
        let idx = self.find(device_id, coords)?;
        let removed = self.entries.remove(idx);
        self.renumber(device_id);
        Some(removed)
    }

    /// Overwrite one favorite's sort order
    pub fn set_sort_order(
        &mut self,
        device_id: &str,
        coords: Coordinates,
        order: u32,
    ) -> std::result::Result<(), StoreError> {
        let len = self.count_for(device_id);
        if order as usize >= len {
            return Err(StoreError::InvalidSortOrder { order, len });
        }
        let idx = self.find(device_id, coords).ok_or(StoreError::NotFound)?;
        self.entries[idx].sort_order = order;
        Ok(())
    }

    /// Total number of stored favorites across devices
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn find(&self, device_id: &str, coords: Coordinates) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.matches(device_id, coords))
    }

    fn renumber(&mut self, device_id: &str) {
        let ordered: Vec<Coordinates> = self
            .list(device_id)
            .iter()
            .map(FavoriteLocation::coordinates)
            .collect();
        for (order, coords) in ordered.iter().enumerate() {
            if let Some(idx) = self.find(device_id, *coords) {
                self.entries[idx].sort_order = order as u32;
            }
        }
    }
}
