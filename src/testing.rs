//! Test doubles shared by unit tests

use crate::error::{Error, Result};
use crate::favorites::local::LocalFavoritesClient;
use crate::favorites::store::FavoriteStore;
use crate::favorites::{Envelope, FavoritesClient};
use crate::geo::GeocodingClient;
use crate::model::{FavoriteLocation, FavoriteLocationRequest, RegionInfo, SearchPage, SearchResult};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// `n` distinct documents whose names start with `prefix`
pub fn documents(prefix: &str, n: usize) -> Vec<SearchResult> {
    (0..n)
        .map(|i| SearchResult {
            address_name: format!("{} {}", prefix, i),
            latitude: 37.0 + i as f64 * 0.001,
            longitude: 127.0 + i as f64 * 0.001,
            region_1: "서울".to_string(),
            region_2: "중구".to_string(),
            region_3: format!("동{}", i),
        })
        .collect()
}

#[derive(Default)]
struct GeocoderState {
    pages: HashMap<(String, u32), SearchPage>,
    failing: HashSet<(String, u32)>,
    delays: HashMap<String, Duration>,
    regions: Vec<RegionInfo>,
    reverse_fails: bool,
    search_calls: Vec<(String, u32, u32)>,
    reverse_calls: usize,
}

/// Scripted geocoder; clones share state
#[derive(Clone, Default)]
pub struct MockGeocoder {
    state: Arc<Mutex<GeocoderState>>,
}

impl MockGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(self, query: &str, page: u32, documents: Vec<SearchResult>, is_end: bool) -> Self {
        let total_count = documents.len() as u32;
        self.state.lock().unwrap().pages.insert(
            (query.to_string(), page),
            SearchPage {
                documents,
                is_end,
                total_count,
            },
        );
        self
    }

    pub fn failing_page(self, query: &str, page: u32) -> Self {
        self.state
            .lock()
            .unwrap()
            .failing
            .insert((query.to_string(), page));
        self
    }

    pub fn with_delay(self, query: &str, delay: Duration) -> Self {
        self.state
            .lock()
            .unwrap()
            .delays
            .insert(query.to_string(), delay);
        self
    }

    pub fn with_regions(self, regions: Vec<RegionInfo>) -> Self {
        self.state.lock().unwrap().regions = regions;
        self
    }

    pub fn failing_reverse(self) -> Self {
        self.state.lock().unwrap().reverse_fails = true;
        self
    }

    pub fn search_calls(&self) -> Vec<(String, u32, u32)> {
        self.state.lock().unwrap().search_calls.clone()
    }

    pub fn reverse_calls(&self) -> usize {
        self.state.lock().unwrap().reverse_calls
    }
}

impl GeocodingClient for MockGeocoder {
    async fn search_by_address(&self, query: &str, page: u32, size: u32) -> Result<SearchPage> {
        let (delay, outcome) = {
            let mut state = self.state.lock().unwrap();
            state.search_calls.push((query.to_string(), page, size));
            let key = (query.to_string(), page);
            let outcome = if state.failing.contains(&key) {
                Err(Error::Network("connection reset".to_string()))
            } else {
                Ok(state.pages.get(&key).cloned().unwrap_or(SearchPage {
                    documents: Vec::new(),
                    is_end: true,
                    total_count: 0,
                }))
            };
            (state.delays.get(query).copied(), outcome)
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        outcome
    }

    async fn reverse_geocode(&self, _longitude: f64, _latitude: f64) -> Result<Vec<RegionInfo>> {
        let mut state = self.state.lock().unwrap();
        state.reverse_calls += 1;
        if state.reverse_fails {
            Err(Error::api(500, None))
        } else {
            Ok(state.regions.clone())
        }
    }
}

/// A recorded favorites API call
#[derive(Debug, Clone, PartialEq)]
pub enum FavoritesCall {
    List(String),
    Add(FavoriteLocationRequest),
    Delete(f64, f64, String),
    UpdateSortOrder(f64, f64, String, u32),
}

#[derive(Default)]
struct FavoritesState {
    calls: Vec<FavoritesCall>,
    list_fails: bool,
    add_error: Option<(u16, Option<String>)>,
    delete_fails: bool,
    sort_fails_for: Vec<f64>,
}

/// In-memory favorites API with failure injection; clones share state
#[derive(Clone)]
pub struct MockFavorites {
    inner: LocalFavoritesClient,
    state: Arc<Mutex<FavoritesState>>,
}

impl MockFavorites {
    pub fn new() -> Self {
        Self {
            inner: LocalFavoritesClient::from_store(FavoriteStore::in_memory(50)),
            state: Arc::default(),
        }
    }

    /// Seed `n` favorites for a device, latitudes 37.0, 37.1, ...
    pub fn with_favorites(self, device_id: &str, n: usize) -> Self {
        {
            let store = self.inner.store();
            let mut store = store.try_write().unwrap();
            for i in 0..n {
                store
                    .add(&FavoriteLocationRequest {
                        device_id: device_id.to_string(),
                        latitude: 37.0 + i as f64 * 0.1,
                        longitude: 127.0,
                        address_name: format!("place {}", i),
                        region_1: "서울".to_string(),
                        region_2: String::new(),
                        region_3: String::new(),
                        sort_order: 0,
                    })
                    .unwrap();
            }
        }
        self
    }

    pub fn failing_list(self) -> Self {
        self.state.lock().unwrap().list_fails = true;
        self
    }

    pub fn failing_add(self, status: u16, message: Option<&str>) -> Self {
        self.state.lock().unwrap().add_error = Some((status, message.map(str::to_string)));
        self
    }

    pub fn failing_delete(self) -> Self {
        self.state.lock().unwrap().delete_fails = true;
        self
    }

    pub fn failing_sort_order_for(self, latitude: f64) -> Self {
        self.state.lock().unwrap().sort_fails_for.push(latitude);
        self
    }

    pub fn calls(&self) -> Vec<FavoritesCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn sort_order_calls(&self) -> Vec<(f64, u32)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                FavoritesCall::UpdateSortOrder(lat, _, _, order) => Some((lat, order)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: FavoritesCall) {
        self.state.lock().unwrap().calls.push(call);
    }
}

impl FavoritesClient for MockFavorites {
    async fn list(&self, device_id: &str) -> Result<Vec<FavoriteLocation>> {
        self.record(FavoritesCall::List(device_id.to_string()));
        let fails = self.state.lock().unwrap().list_fails;
        if fails {
            return Err(Error::Network("timeout".to_string()));
        }
        self.inner.list(device_id).await
    }

    async fn add(&self, request: &FavoriteLocationRequest) -> Result<Envelope<Option<FavoriteLocation>>> {
        self.record(FavoritesCall::Add(request.clone()));
        let injected = self.state.lock().unwrap().add_error.clone();
        if let Some((status, message)) = injected {
            return Err(Error::api(status, message));
        }
        self.inner.add(request).await
    }

    async fn delete(&self, latitude: f64, longitude: f64, device_id: &str) -> Result<()> {
        self.record(FavoritesCall::Delete(latitude, longitude, device_id.to_string()));
        let fails = self.state.lock().unwrap().delete_fails;
        if fails {
            return Err(Error::api(500, Some("삭제 실패".to_string())));
        }
        self.inner.delete(latitude, longitude, device_id).await
    }

    async fn update_sort_order(
        &self,
        latitude: f64,
        longitude: f64,
        device_id: &str,
        sort_order: u32,
    ) -> Result<()> {
        self.record(FavoritesCall::UpdateSortOrder(
            latitude,
            longitude,
            device_id.to_string(),
            sort_order,
        ));
        let fails = self
            .state
            .lock()
            .unwrap()
            .sort_fails_for
            .iter()
            .any(|lat| (lat - latitude).abs() < 1e-9);
        if fails {
            return Err(Error::Network("connection reset".to_string()));
        }
        self.inner
            .update_sort_order(latitude, longitude, device_id, sort_order)
            .await
    }
}
