use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use dataeden_core::{Dialect, Error, Result, Target, redact_address};

use crate::connector::ConnectorRegistry;
use crate::source::DataSource;

/// A pooled data source plus the address it was opened for.
///
/// Cheap to clone. Owned by the [`ConnectionPool`]; callers never close it.
#[derive(Clone)]
pub struct Handle {
    address: String,
    dialect: Dialect,
    source: Arc<dyn DataSource>,
}

impl Handle {
    pub fn new(address: impl Into<String>, dialect: Dialect, source: Arc<dyn DataSource>) -> Self {
        Self {
            address: address.into(),
            dialect,
            source,
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn redacted_address(&self) -> String {
        redact_address(&self.address).redacted
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn source(&self) -> &dyn DataSource {
        self.source.as_ref()
    }
}

impl std::fmt::Debug for Handle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Handle")
            .field("address", &self.redacted_address())
            .field("dialect", &self.dialect)
            .finish()
    }
}

type Slot = Arc<OnceCell<Handle>>;

/// Caches one data source per (address, principal, credential).
///
/// The map lock is held only to find or insert a key's slot; construction
/// runs outside it, inside the slot's once-cell, so concurrent first callers
/// for one key share a single construction. A failed construction leaves the
/// slot empty; the slot is dropped from the map unless another caller is
/// waiting on it, and the next call retries.
#[derive(Debug)]
pub struct ConnectionPool {
    registry: ConnectorRegistry,
    slots: Mutex<HashMap<Target, Slot>>,
}

impl ConnectionPool {
    pub fn new(registry: ConnectorRegistry) -> Self {
        Self {
            registry,
            slots: Mutex::new(HashMap::new()),
        }
    }

    pub fn registry(&self) -> &ConnectorRegistry {
        &self.registry
    }

    /// Return the handle for `target`, constructing it on first use.
    pub async fn acquire(&self, target: &Target) -> Result<Handle> {
        let dialect = Dialect::resolve(&target.address)?;
        let connector = self.registry.connector_for(dialect)?;
        let slot = self.slot(target);

        let initialized = slot
            .get_or_try_init(|| async {
                info!(
                    address = %target.redacted_address(),
                    dialect = %dialect,
                    "opening data source"
                );
                let source = connector.connect(target).await.inspect_err(|err| {
                    warn!(address = %target.redacted_address(), error = %err, "connection failed");
                })?;
                Ok::<_, Error>(Handle::new(target.address.clone(), dialect, source))
            })
            .await;
        let handle = match initialized {
            Ok(handle) => handle,
            Err(err) => {
                self.forget_failed(target, &slot);
                return Err(err);
            }
        };

        debug!(address = %handle.redacted_address(), "reusing data source");
        Ok(handle.clone())
    }

    /// Close every cached data source and empty the cache.
    ///
    /// Meant for shutdown. A construction still in flight is awaited and its
    /// data source closed too, so an `acquire` racing with this call may get
    /// a closed handle. Close failures are logged and do not stop the
    /// remaining closes. Returns the number of data sources that were open.
    pub async fn release_all(&self) -> usize {
        let slots: Vec<(Target, Slot)> = self.lock().drain().collect();
        let mut released = 0;
        for (target, slot) in slots {
            let handle = match slot.get() {
                Some(handle) => handle,
                None => {
                    let pending = slot
                        .get_or_try_init(|| async {
                            Err::<Handle, _>(Error::Connection("pool released".to_string()))
                        })
                        .await;
                    match pending {
                        Ok(handle) => handle,
                        Err(_) => continue,
                    }
                }
            };
            released += 1;
            if let Err(err) = handle.source().close().await {
                warn!(
                    address = %target.redacted_address(),
                    error = %err,
                    "failed to close data source"
                );
            }
        }
        info!(released, "connection pool released");
        released
    }

    /// Number of keys with a live data source.
    pub fn open_handles(&self) -> usize {
        self.lock()
            .values()
            .filter(|slot| slot.initialized())
            .count()
    }

    /// Drop `slot` after a failed construction so rejected credentials do
    /// not stay keyed in the map.
    fn forget_failed(&self, target: &Target, slot: &Slot) {
        let mut slots = self.lock();
        let unshared = slots.get(target).is_some_and(|current| {
            Arc::ptr_eq(current, slot) && !current.initialized() && Arc::strong_count(slot) == 2
        });
        if unshared {
            slots.remove(target);
        }
    }

    fn slot(&self, target: &Target) -> Slot {
        self.lock().entry(target.clone()).or_default().clone()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Target, Slot>> {
        self.slots
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::memory::MemoryConnector;

    fn pool_with(connector: &MemoryConnector) -> ConnectionPool {
        let mut registry = ConnectorRegistry::empty();
        registry.register(Arc::new(connector.clone()));
        ConnectionPool::new(registry)
    }

    #[tokio::test]
    async fn reuses_handle_for_same_key() {
        let connector = MemoryConnector::new(Dialect::PostgreSql);
        let pool = pool_with(&connector);
        let target = Target::new("postgres://db/app", "app", "pw");

        pool.acquire(&target).await.expect("first acquire");
        pool.acquire(&target).await.expect("second acquire");

        assert_eq!(connector.constructions(), 1);
        assert_eq!(pool.open_handles(), 1);
    }

    #[tokio::test]
    async fn different_credentials_get_their_own_handle() {
        let connector = MemoryConnector::new(Dialect::PostgreSql);
        let pool = pool_with(&connector);

        pool.acquire(&Target::new("postgres://db/app", "a", "pw"))
            .await
            .expect("acquire a");
        pool.acquire(&Target::new("postgres://db/app", "b", "pw"))
            .await
            .expect("acquire b");

        assert_eq!(connector.constructions(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_first_acquire_constructs_once() {
        let connector =
            MemoryConnector::new(Dialect::PostgreSql).with_connect_delay(Duration::from_millis(50));
        let pool = Arc::new(pool_with(&connector));
        let target = Target::new("postgres://db/app", "app", "pw");

        let tasks: Vec<_> = (0..16)
            .map(|_| {
                let pool = Arc::clone(&pool);
                let target = target.clone();
                tokio::spawn(async move { pool.acquire(&target).await.map(|_| ()) })
            })
            .collect();
        for task in tasks {
            task.await.expect("join").expect("acquire");
        }

        assert_eq!(connector.constructions(), 1);
    }

    #[tokio::test]
    async fn failed_construction_is_retried() {
        let connector = MemoryConnector::new(Dialect::MySql).failing_first(1);
        let pool = pool_with(&connector);
        let target = Target::new("jdbc:mysql://db/app", "app", "pw");

        let err = pool.acquire(&target).await.expect_err("first attempt fails");
        assert!(matches!(err, Error::Connection(_)));
        assert_eq!(pool.open_handles(), 0);

        pool.acquire(&target).await.expect("second attempt succeeds");
        assert_eq!(connector.constructions(), 2);
        assert_eq!(pool.open_handles(), 1);
    }

    #[tokio::test]
    async fn rejected_credentials_are_not_kept() {
        let connector = MemoryConnector::new(Dialect::PostgreSql).failing_first(100);
        let pool = pool_with(&connector);

        for attempt in 0..100 {
            let target = Target::new("postgres://db/app", "app", format!("guess-{attempt}"));
            pool.acquire(&target).await.expect_err("rejected");
        }

        assert_eq!(connector.constructions(), 100);
        assert_eq!(pool.open_handles(), 0);
        assert!(pool.lock().is_empty());
    }

    #[tokio::test]
    async fn release_all_closes_a_construction_in_flight() {
        let connector =
            MemoryConnector::new(Dialect::PostgreSql).with_connect_delay(Duration::from_millis(50));
        let pool = Arc::new(pool_with(&connector));
        let target = Target::new("postgres://db/app", "app", "pw");

        let pending = {
            let pool = Arc::clone(&pool);
            let target = target.clone();
            tokio::spawn(async move { pool.acquire(&target).await.map(|_| ()) })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert_eq!(pool.release_all().await, 1);
        assert_eq!(connector.close_attempts(), 1);
        pending.await.expect("join").expect("acquire");
        assert!(pool.lock().is_empty());
    }

    #[tokio::test]
    async fn unsupported_and_unregistered_dialects_fail() {
        let connector = MemoryConnector::new(Dialect::PostgreSql);
        let pool = pool_with(&connector);

        let err = pool
            .acquire(&Target::new("jdbc:db2://db/app", "u", "p"))
            .await
            .expect_err("unknown dialect");
        assert!(matches!(err, Error::UnsupportedDialect(_)));

        let err = pool
            .acquire(&Target::new("jdbc:oracle:thin:@db:1521/app", "u", "p"))
            .await
            .expect_err("no oracle connector");
        assert!(matches!(err, Error::Connection(ref message) if message.contains("oracle")));
        assert_eq!(connector.constructions(), 0);
    }

    #[tokio::test]
    async fn release_all_closes_every_handle_despite_failures() {
        let failing = MemoryConnector::new(Dialect::PostgreSql).failing_close();
        let healthy = MemoryConnector::new(Dialect::MySql);
        let mut registry = ConnectorRegistry::empty();
        registry.register(Arc::new(failing.clone()));
        registry.register(Arc::new(healthy.clone()));
        let pool = ConnectionPool::new(registry);

        pool.acquire(&Target::new("postgres://db/a", "u", "p"))
            .await
            .expect("pg");
        pool.acquire(&Target::new("mysql://db/b", "u", "p"))
            .await
            .expect("mysql");

        assert_eq!(pool.release_all().await, 2);
        assert_eq!(failing.close_attempts(), 1);
        assert_eq!(healthy.close_attempts(), 1);
        assert_eq!(pool.open_handles(), 0);

        pool.acquire(&Target::new("mysql://db/b", "u", "p"))
            .await
            .expect("reacquire");
        assert_eq!(healthy.constructions(), 2);
    }
}
