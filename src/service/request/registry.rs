use sea_orm::{DatabaseConnection, DbErr};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::{
    data::request::AssistRequestRepository,
    model::request::{AssistRequest, RequestStatus},
};

/// Shared handle to a cached request.
///
/// The mutex doubles as the per-request critical section: lifecycle
/// operations hold it across their guard-then-act sequence, so two
/// interactions racing on the same request serialize.
pub type RequestHandle = Arc<Mutex<AssistRequest>>;

/// Cache and persistence facade for assistance requests.
///
/// The in-memory cache is the source of truth for live requests; storage is
/// written through on acceptance and terminal transitions and is only read to
/// rehydrate requests the cache does not hold (cache misses, process
/// restarts). Entries are keyed by request id; thread lookups scan the cache,
/// which is acceptable at support-request volume.
pub struct RequestRegistry {
    db: DatabaseConnection,
    cache: RwLock<HashMap<Uuid, RequestHandle>>,
}

impl RequestRegistry {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// The connection the registry persists through.
    pub fn database(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Inserts a freshly created request into the cache.
    pub async fn insert(&self, request: AssistRequest) -> RequestHandle {
        let id = request.id;
        let handle = Arc::new(Mutex::new(request));

        let mut cache = self.cache.write().await;
        cache.insert(id, handle.clone());

        handle
    }

    /// Gets a request by id, cache-first unless `force`.
    ///
    /// On a miss the request is rehydrated from its persisted rows and
    /// cached. With `force`, the persisted fields of an already cached
    /// request are refreshed in place; in-memory-only state survives the
    /// refresh.
    ///
    /// # Returns
    /// - `Ok(Some(handle))`: The cached or rehydrated request
    /// - `Ok(None)`: No such request exists
    /// - `Err(DbErr)`: Database error
    pub async fn fetch(&self, id: Uuid, force: bool) -> Result<Option<RequestHandle>, DbErr> {
        if !force {
            let cache = self.cache.read().await;
            if let Some(handle) = cache.get(&id) {
                return Ok(Some(handle.clone()));
            }
        }

        let repo = AssistRequestRepository::new(&self.db);
        let Some(request) = repo.find_by_id(id).await? else {
            return Ok(None);
        };

        Ok(Some(self.merge(request, force).await))
    }

    /// Gets a request by the id of its support thread.
    ///
    /// The cache is scanned first; a miss falls back to the thread-keyed
    /// storage lookup.
    pub async fn fetch_by_thread(&self, thread_id: &str) -> Result<Option<RequestHandle>, DbErr> {
        let handles: Vec<RequestHandle> = {
            let cache = self.cache.read().await;
            cache.values().cloned().collect()
        };
        for handle in handles {
            let matches = {
                let request = handle.lock().await;
                request.thread_id.as_deref() == Some(thread_id)
            };
            if matches {
                return Ok(Some(handle));
            }
        }

        let repo = AssistRequestRepository::new(&self.db);
        let Some(request) = repo.find_by_thread_id(thread_id).await? else {
            return Ok(None);
        };

        Ok(Some(self.merge(request, false).await))
    }

    /// Gets a user's most recent requests, newest first.
    ///
    /// Always reads through to storage and populates the cache per row, so
    /// quota checks see requests from before the current process started.
    pub async fn fetch_user(
        &self,
        user_id: &str,
        limit: u64,
    ) -> Result<Vec<RequestHandle>, DbErr> {
        let repo = AssistRequestRepository::new(&self.db);
        let rows = repo.find_recent_by_user(user_id, limit).await?;

        let mut handles = Vec::with_capacity(rows.len());
        for row in rows {
            handles.push(self.merge(row, false).await);
        }

        Ok(handles)
    }

    /// Gets the user's request that is still searching for an assistant.
    ///
    /// Checks the cache across all guilds first, then storage; used for the
    /// global one-open-request-per-user rule.
    pub async fn searching_request_for(
        &self,
        user_id: &str,
    ) -> Result<Option<RequestHandle>, DbErr> {
        let handles: Vec<RequestHandle> = {
            let cache = self.cache.read().await;
            cache.values().cloned().collect()
        };
        for handle in handles {
            let matches = {
                let request = handle.lock().await;
                request.user_id == user_id && request.status() == RequestStatus::Searching
            };
            if matches {
                return Ok(Some(handle));
            }
        }

        let repo = AssistRequestRepository::new(&self.db);
        let Some(request) = repo.find_searching_by_user(user_id).await? else {
            return Ok(None);
        };

        Ok(Some(self.merge(request, false).await))
    }

    /// Caches a rehydrated request, preferring an existing live entry.
    ///
    /// The cached entity stays authoritative: a plain miss-fill never
    /// overwrites it, and a forced refresh only replaces the persisted
    /// fields while keeping in-memory-only state (the interaction webhook
    /// token) intact.
    async fn merge(&self, request: AssistRequest, refresh: bool) -> RequestHandle {
        let existing = {
            let cache = self.cache.read().await;
            cache.get(&request.id).cloned()
        };

        if let Some(handle) = existing {
            if refresh {
                let mut cached = handle.lock().await;
                let webhook_token = cached.webhook_token.take();
                *cached = request;
                cached.webhook_token = webhook_token;
            }
            return handle;
        }

        let id = request.id;
        let handle = Arc::new(Mutex::new(request));
        let mut cache = self.cache.write().await;
        cache.entry(id).or_insert_with(|| handle.clone()).clone()
    }
}
