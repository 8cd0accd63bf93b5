// SPDX-License-Identifier: AGPL-3.0
// Art Catalog Core - Local favorites storage
//
// Favorites are stored as a JSON array under a single storage key.
// Each view owns its own store and calls `synchronize` when it becomes
// active; durable storage is the only shared source of truth.

use crate::storage::KeyValueStorage;
use crate::types::{AppError, Item, ItemId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, Mutex, RwLock};

/// Storage key holding the serialized favorite set
pub const FAVORITES_KEY: &str = "favorites";

/// Favorited items keyed by id, in the order they were favorited.
///
/// Equality ignores order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Item>", into = "Vec<Item>")]
pub struct FavoriteSet {
    items: IndexMap<ItemId, Item>,
}

#[derive(Debug, thiserror::Error)]
#[error("item {0} appears more than once")]
pub struct DuplicateFavorite(ItemId);

impl TryFrom<Vec<Item>> for FavoriteSet {
    type Error = DuplicateFavorite;

    fn try_from(items: Vec<Item>) -> Result<Self, Self::Error> {
        let mut set = IndexMap::with_capacity(items.len());
        for item in items {
            if set.contains_key(&item.id) {
                return Err(DuplicateFavorite(item.id));
            }
            set.insert(item.id.clone(), item);
        }
        Ok(Self { items: set })
    }
}

impl From<FavoriteSet> for Vec<Item> {
    fn from(set: FavoriteSet) -> Self {
        set.items.into_values().collect()
    }
}

impl FavoriteSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.items.contains_key(id)
    }

    pub fn get(&self, id: &ItemId) -> Option<&Item> {
        self.items.get(id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = &ItemId> {
        self.items.keys()
    }

    /// Remove `item` if present, insert it otherwise. Returns whether it is now a favorite.
    pub fn toggle(&mut self, item: &Item) -> bool {
        if self.items.shift_remove(&item.id).is_some() {
            false
        } else {
            self.items.insert(item.id.clone(), item.clone());
            true
        }
    }

    fn from_json(content: &str) -> Result<Self, AppError> {
        serde_json::from_str(content).map_err(|e| AppError::CorruptState(e.to_string()))
    }

    fn to_json(&self) -> Result<String, AppError> {
        serde_json::to_string(self)
            .map_err(|e| AppError::Serialization(format!("Failed to serialize favorites: {}", e)))
    }
}

/// Lifecycle of a favorites store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreStatus {
    /// Nothing has been read from durable storage yet
    Uninitialized,
    /// In-memory copy matches the last successful load or commit
    Loaded,
    /// The last load or write failed; the in-memory copy is the last good state
    Error,
}

/// Change notifications emitted by a store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FavoritesEvent {
    Toggled {
        item_id: ItemId,
        favorited: bool,
        count: usize,
    },
    Cleared,
    Synchronized {
        count: usize,
    },
}

struct StoreState {
    favorites: FavoriteSet,
    status: StoreStatus,
    /// Memory matches durable storage as of the last successful load or commit
    in_sync: bool,
}

/// Favorites store writing through to a [`KeyValueStorage`]
pub struct FavoritesStore<S> {
    storage: S,
    state: RwLock<StoreState>,
    /// Serializes load/toggle/clear across their awaits
    write_lock: Mutex<()>,
    event_tx: broadcast::Sender<FavoritesEvent>,
}

impl<S: KeyValueStorage> FavoritesStore<S> {
    /// Create an uninitialized store; nothing is read until `load`
    pub fn new(storage: S) -> Self {
        let (event_tx, _) = broadcast::channel(32);

        Self {
            storage,
            state: RwLock::new(StoreState {
                favorites: FavoriteSet::new(),
                status: StoreStatus::Uninitialized,
                in_sync: false,
            }),
            write_lock: Mutex::new(()),
            event_tx,
        }
    }

    /// Create a store and load it from durable storage
    pub async fn open(storage: S) -> Result<Self, AppError> {
        let store = Self::new(storage);
        store.load().await?;
        Ok(store)
    }

    /// Subscribe to change notifications
    pub fn subscribe(&self) -> broadcast::Receiver<FavoritesEvent> {
        self.event_tx.subscribe()
    }

    /// Read favorites from durable storage and replace the in-memory copy.
    ///
    /// A missing record is an empty set. A corrupt record fails with
    /// `CorruptState` and leaves the in-memory copy as it was.
    pub async fn load(&self) -> Result<FavoriteSet, AppError> {
        let _guard = self.write_lock.lock().await;
        self.load_locked().await
    }

    /// Re-read durable state; call whenever a view becomes active
    pub async fn synchronize(&self) -> Result<FavoriteSet, AppError> {
        tracing::debug!("Synchronizing favorites from storage");
        self.load().await
    }

    /// Whether `id` is in the in-memory copy
    pub async fn is_favorite(&self, id: &ItemId) -> bool {
        self.state.read().await.favorites.contains(id)
    }

    /// Snapshot of the in-memory copy
    pub async fn favorites(&self) -> FavoriteSet {
        self.state.read().await.favorites.clone()
    }

    pub async fn status(&self) -> StoreStatus {
        self.state.read().await.status
    }

    /// Add `item` if absent, remove it if present.
    ///
    /// The new set is written to storage before the in-memory copy changes;
    /// if the write fails neither copy changes and the call can be retried.
    pub async fn toggle(&self, item: &Item) -> Result<FavoriteSet, AppError> {
        let _guard = self.write_lock.lock().await;

        // Never write over a record memory has not seen; a corrupt one needs `clear`
        let in_sync = self.state.read().await.in_sync;
        if !in_sync {
            self.load_locked().await?;
        }

        let mut next = self.favorites().await;
        let favorited = next.toggle(item);

        self.commit(next.clone()).await?;
        tracing::info!(
            "{} favorite {} ({} total)",
            if favorited { "Added" } else { "Removed" },
            item.id,
            next.len()
        );

        let _ = self.event_tx.send(FavoritesEvent::Toggled {
            item_id: item.id.clone(),
            favorited,
            count: next.len(),
        });
        Ok(next)
    }

    /// Durably empty the favorite set. Also recovers from a corrupt record.
    pub async fn clear(&self) -> Result<FavoriteSet, AppError> {
        let _guard = self.write_lock.lock().await;

        let empty = FavoriteSet::new();
        self.commit(empty.clone()).await?;
        tracing::info!("Cleared favorites");

        let _ = self.event_tx.send(FavoritesEvent::Cleared);
        Ok(empty)
    }

    async fn load_locked(&self) -> Result<FavoriteSet, AppError> {
        let loaded = match self.storage.get(FAVORITES_KEY).await {
            Ok(Some(content)) => FavoriteSet::from_json(&content),
            Ok(None) => {
                tracing::info!("No stored favorites, starting empty");
                Ok(FavoriteSet::new())
            }
            Err(e) => Err(AppError::PersistenceError(format!("Failed to read favorites: {}", e))),
        };

        let mut state = self.state.write().await;
        match loaded {
            Ok(favorites) => {
                tracing::info!("Loaded {} favorites", favorites.len());
                state.favorites = favorites.clone();
                state.status = StoreStatus::Loaded;
                state.in_sync = true;
                drop(state);

                let _ = self.event_tx.send(FavoritesEvent::Synchronized {
                    count: favorites.len(),
                });
                Ok(favorites)
            }
            Err(e) => {
                tracing::error!("Failed to load favorites: {}", e);
                state.status = StoreStatus::Error;
                state.in_sync = false;
                Err(e)
            }
        }
    }

    /// Persist `next`, then install it in memory
    async fn commit(&self, next: FavoriteSet) -> Result<(), AppError> {
        let written = match next.to_json() {
            Ok(content) => self
                .storage
                .set(FAVORITES_KEY, &content)
                .await
                .map_err(|e| AppError::PersistenceError(e.to_string())),
            Err(e) => Err(AppError::PersistenceError(e.to_string())),
        };

        let mut state = self.state.write().await;
        match written {
            Ok(()) => {
                state.favorites = next;
                state.status = StoreStatus::Loaded;
                state.in_sync = true;
                Ok(())
            }
            Err(e) => {
                tracing::error!("Failed to persist favorites: {}", e);
                state.status = StoreStatus::Error;
                Err(e)
            }
        }
    }
}
