//! In-memory snapshot store.
//!
//! The store owns the canonical collections and is the sole writer of
//! persisted state. Every mutation goes through [`Store::mutate`], which
//! applies the change atomically against a scratch copy and then persists the
//! full snapshot. A failed persist is reported as a warning, never rolled
//! back: in-memory and durable state may diverge until the next successful
//! write.

use tokio::sync::RwLock;

use crate::db::{KvStore, SNAPSHOT_KEY};
use crate::errors::AppError;
use crate::models::{Account, Department, Role, Snapshot};

/// Result of a committed mutation. `warning` carries the persistence
/// warning when the snapshot write failed after the in-memory commit.
pub struct Mutated<T> {
    pub value: T,
    pub warning: Option<String>,
}

/// Owner of the canonical snapshot, guarded for concurrent handlers.
pub struct Store {
    kv: KvStore,
    state: RwLock<Snapshot>,
}

impl Store {
    /// Load the persisted snapshot, seeding defaults when none exists.
    /// A corrupt snapshot falls back to the seeded default with a warning;
    /// only the storage medium itself being unavailable is fatal.
    pub async fn load(kv: KvStore) -> Result<Self, AppError> {
        let snapshot = match kv.get(SNAPSHOT_KEY).await? {
            Some(raw) => match serde_json::from_str::<Snapshot>(&raw) {
                Ok(snapshot) => snapshot,
                Err(err) => {
                    tracing::warn!("Discarding corrupt snapshot, reseeding: {}", err);
                    seed_snapshot()
                }
            },
            None => {
                tracing::info!("No snapshot found, seeding default data");
                seed_snapshot()
            }
        };

        let store = Self {
            kv,
            state: RwLock::new(snapshot),
        };

        // Make the seeded or repaired state durable up front.
        let guard = store.state.read().await;
        if let Some(warning) = store.persist(&guard).await {
            tracing::warn!("Initial persist failed: {}", warning);
        }
        drop(guard);

        Ok(store)
    }

    /// Run a read-only closure against the current snapshot.
    pub async fn read<T>(&self, f: impl FnOnce(&Snapshot) -> T) -> T {
        let guard = self.state.read().await;
        f(&guard)
    }

    /// Apply a mutation and persist the resulting snapshot.
    ///
    /// The closure runs against a scratch copy, so a validation failure
    /// leaves the canonical state untouched and no partial write is ever
    /// observable.
    pub async fn mutate<T>(
        &self,
        f: impl FnOnce(&mut Snapshot) -> Result<T, AppError>,
    ) -> Result<Mutated<T>, AppError> {
        let mut guard = self.state.write().await;
        let mut scratch = guard.clone();
        let value = f(&mut scratch)?;
        *guard = scratch;
        let warning = self.persist(&guard).await;
        Ok(Mutated { value, warning })
    }

    /// Best-effort snapshot write. Returns the warning text on failure.
    async fn persist(&self, snapshot: &Snapshot) -> Option<String> {
        let raw = match serde_json::to_string(snapshot) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!("Snapshot serialization failed: {}", err);
                return Some(format!("Snapshot not persisted: {}", err));
            }
        };
        match self.kv.set(SNAPSHOT_KEY, &raw).await {
            Ok(()) => None,
            Err(err) => {
                tracing::warn!("Snapshot persist failed: {}", err);
                Some(format!("Snapshot not persisted: {}", err))
            }
        }
    }

    /// Key-value access for the session token and verification marker,
    /// persisted separately from the data snapshot.
    pub fn kv(&self) -> &KvStore {
        &self.kv
    }
}

/// Default data set: one verified Admin, one verified User, three
/// departments, no employees or requests.
fn seed_snapshot() -> Snapshot {
    Snapshot {
        accounts: vec![
            Account {
                first_name: "French Cyril".to_string(),
                last_name: "Sambilad".to_string(),
                email: "admin@example.com".to_string(),
                password: "Password123!".to_string(),
                role: Role::Admin,
                verified: true,
            },
            Account {
                first_name: "Regular".to_string(),
                last_name: "User".to_string(),
                email: "user@example.com".to_string(),
                password: "user123".to_string(),
                role: Role::User,
                verified: true,
            },
        ],
        departments: vec![
            Department {
                id: 1,
                name: "Engineering".to_string(),
                description: "Software Development Team".to_string(),
            },
            Department {
                id: 2,
                name: "HR".to_string(),
                description: "Human Resources Department".to_string(),
            },
            Department {
                id: 3,
                name: "Marketing".to_string(),
                description: "Marketing and Communications".to_string(),
            },
        ],
        employees: vec![],
        requests: vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_database;
    use tempfile::TempDir;

    async fn kv_in(dir: &TempDir) -> KvStore {
        let pool = init_database(&dir.path().join("test.sqlite"))
            .await
            .expect("init db");
        KvStore::new(pool)
    }

    #[tokio::test]
    async fn test_load_seeds_defaults() {
        let dir = TempDir::new().unwrap();
        let store = Store::load(kv_in(&dir).await).await.unwrap();

        let (accounts, departments) = store
            .read(|s| (s.accounts.len(), s.departments.len()))
            .await;
        assert_eq!(accounts, 2);
        assert_eq!(departments, 3);

        let admin = store
            .read(|s| s.find_account("admin@example.com").cloned())
            .await
            .unwrap();
        assert_eq!(admin.role, Role::Admin);
        assert!(admin.verified);
    }

    #[tokio::test]
    async fn test_persist_round_trips() {
        let dir = TempDir::new().unwrap();
        let kv = kv_in(&dir).await;

        let store = Store::load(kv.clone()).await.unwrap();
        store
            .mutate(|s| {
                s.departments.push(Department {
                    id: 4,
                    name: "Finance".to_string(),
                    description: "Accounting".to_string(),
                });
                Ok(())
            })
            .await
            .unwrap();
        let before = store.read(|s| s.clone()).await;

        // A fresh store over the same kv must reproduce an equal snapshot.
        let reloaded = Store::load(kv).await.unwrap();
        let after = reloaded.read(|s| s.clone()).await;
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_falls_back_to_seed() {
        let dir = TempDir::new().unwrap();
        let kv = kv_in(&dir).await;
        kv.set(SNAPSHOT_KEY, "{not json").await.unwrap();

        let store = Store::load(kv).await.unwrap();
        let accounts = store.read(|s| s.accounts.len()).await;
        assert_eq!(accounts, 2);
    }

    #[tokio::test]
    async fn test_failed_mutation_leaves_state_untouched() {
        let dir = TempDir::new().unwrap();
        let store = Store::load(kv_in(&dir).await).await.unwrap();

        let result = store
            .mutate(|s| {
                s.accounts.clear();
                Err::<(), _>(AppError::Validation("rejected".to_string()))
            })
            .await;
        assert!(result.is_err());
        assert_eq!(store.read(|s| s.accounts.len()).await, 2);
    }
}
