// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Caches for derived signing keys.

use crate::utils::Redact;
use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::sync::{Arc, RwLock};

/// Key of a cached signing key: the secret plus its signing scope.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SigningKeyCacheKey {
    /// Secret the key was derived from.
    pub secret: String,
    /// Date stamp like `20220313`.
    pub date: String,
    /// Region of the scope.
    pub region: String,
    /// Service of the scope.
    pub service: String,
}

impl SigningKeyCacheKey {
    /// Create a new cache key.
    pub fn new(secret: &str, date: &str, region: &str, service: &str) -> Self {
        Self {
            secret: secret.to_string(),
            date: date.to_string(),
            region: region.to_string(),
            service: service.to_string(),
        }
    }
}

impl Debug for SigningKeyCacheKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKeyCacheKey")
            .field("secret", &Redact::from(&self.secret))
            .field("date", &self.date)
            .field("region", &self.region)
            .field("service", &self.service)
            .finish()
    }
}

/// SigningKeyCache stores derived signing keys.
///
/// Implementations must be safe for concurrent use. Two callers racing on the
/// same key may both derive it, `insert` keeps whichever value landed first
/// and always returns the value that is now cached.
pub trait SigningKeyCache: Debug + Send + Sync + 'static {
    /// Get a cached key.
    fn get(&self, key: &SigningKeyCacheKey) -> Option<Arc<[u8]>>;

    /// Insert a key if absent, returning the cached value.
    fn insert(&self, key: SigningKeyCacheKey, value: Vec<u8>) -> Arc<[u8]>;
}

/// In-memory signing key cache.
///
/// Keys are never invalidated: a new day produces a new scope and thus a new
/// entry. Use [`InMemoryKeyCache::with_capacity_limit`] for long running
/// processes that sign with many secrets.
#[derive(Default)]
pub struct InMemoryKeyCache {
    keys: RwLock<HashMap<SigningKeyCacheKey, Arc<[u8]>>>,
    limit: Option<usize>,
}

impl Debug for InMemoryKeyCache {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryKeyCache")
            .field("len", &self.len())
            .field("limit", &self.limit)
            .finish()
    }
}

impl InMemoryKeyCache {
    /// Create a new unbounded cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cache that is cleared once it holds `limit` entries.
    pub fn with_capacity_limit(limit: usize) -> Self {
        Self {
            keys: RwLock::default(),
            limit: Some(limit),
        }
    }

    /// Number of cached keys.
    pub fn len(&self) -> usize {
        self.keys.read().expect("lock poisoned").len()
    }

    /// Returns true if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SigningKeyCache for InMemoryKeyCache {
    fn get(&self, key: &SigningKeyCacheKey) -> Option<Arc<[u8]>> {
        self.keys.read().expect("lock poisoned").get(key).cloned()
    }

    fn insert(&self, key: SigningKeyCacheKey, value: Vec<u8>) -> Arc<[u8]> {
        let mut keys = self.keys.write().expect("lock poisoned");
        if let Some(v) = keys.get(&key) {
            return v.clone();
        }

        if self.limit.is_some_and(|limit| keys.len() >= limit) {
            keys.clear();
        }

        let value: Arc<[u8]> = value.into();
        keys.insert(key, value.clone());
        value
    }
}

/// Cache that never stores anything, every signature derives its key again.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopKeyCache;

impl SigningKeyCache for NoopKeyCache {
    fn get(&self, _: &SigningKeyCacheKey) -> Option<Arc<[u8]>> {
        None
    }

    fn insert(&self, _: SigningKeyCacheKey, value: Vec<u8>) -> Arc<[u8]> {
        value.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(date: &str) -> SigningKeyCacheKey {
        SigningKeyCacheKey::new("secret", date, "us-east-1", "s3")
    }

    #[test]
    fn test_in_memory_insert_if_absent() {
        let cache = InMemoryKeyCache::new();
        assert!(cache.get(&key("20220301")).is_none());

        let first = cache.insert(key("20220301"), vec![1, 2, 3]);
        let second = cache.insert(key("20220301"), vec![4, 5, 6]);

        assert_eq!(&*first, &[1, 2, 3]);
        assert_eq!(&*second, &[1, 2, 3]);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_in_memory_capacity_limit() {
        let cache = InMemoryKeyCache::with_capacity_limit(2);
        cache.insert(key("20220301"), vec![1]);
        cache.insert(key("20220302"), vec![2]);
        assert_eq!(cache.len(), 2);

        cache.insert(key("20220303"), vec![3]);
        assert_eq!(cache.len(), 1);
        assert!(cache.get(&key("20220303")).is_some());
    }

    #[test]
    fn test_noop_never_stores() {
        let cache = NoopKeyCache;
        let v = cache.insert(key("20220301"), vec![7]);
        assert_eq!(&*v, &[7]);
        assert!(cache.get(&key("20220301")).is_none());
    }

    #[test]
    fn test_cache_key_debug_redacts_secret() {
        let k = SigningKeyCacheKey::new("a-very-long-secret-value", "20220301", "r", "s");
        assert!(!format!("{k:?}").contains("a-very-long-secret-value"));
    }

    #[tokio::test]
    async fn test_in_memory_racing_inserts_agree() {
        let cache = Arc::new(InMemoryKeyCache::new());

        let tasks = (0..32u8)
            .map(|i| {
                let cache = cache.clone();
                tokio::spawn(async move { cache.insert(key("20220301"), vec![i]) })
            })
            .collect::<Vec<_>>();

        let mut values = Vec::new();
        for task in tasks {
            values.push(task.await.unwrap());
        }

        let cached = cache.get(&key("20220301")).unwrap();
        assert!(values.iter().all(|v| *v == cached));
        assert_eq!(cache.len(), 1);
    }
}
