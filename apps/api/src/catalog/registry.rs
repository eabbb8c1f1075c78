use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

use crate::catalog::session::CatalogSession;

pub type SharedSession = Arc<Mutex<CatalogSession>>;

struct Entry {
    session: SharedSession,
    /// Milliseconds since the registry was created.
    last_used: AtomicU64,
}

/// Live catalog sessions keyed by user. Each session sits behind its own
/// mutex so a user's storage read-modify-write cycles run one at a time.
///
/// Sessions untouched for longer than the idle timeout are dropped by
/// `sweep_idle`; the next request for that user opens a fresh one.
#[derive(Clone)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, Entry>>>,
    epoch: Instant,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            epoch: Instant::now(),
        }
    }
}

impl SessionRegistry {
    fn now_millis(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }

    fn touch(&self, entry: &Entry) -> SharedSession {
        entry.last_used.store(self.now_millis(), Ordering::Relaxed);
        entry.session.clone()
    }

    pub async fn get(&self, user_id: Uuid) -> Option<SharedSession> {
        let sessions = self.sessions.read().await;
        sessions.get(&user_id).map(|entry| self.touch(entry))
    }

    /// Returns the existing session or installs the one built by `create`.
    pub async fn get_or_insert_with(
        &self,
        user_id: Uuid,
        create: impl FnOnce() -> CatalogSession,
    ) -> (SharedSession, bool) {
        if let Some(existing) = self.get(user_id).await {
            return (existing, false);
        }
        let mut sessions = self.sessions.write().await;
        if let Some(existing) = sessions.get(&user_id) {
            return (self.touch(existing), false);
        }
        let session = Arc::new(Mutex::new(create()));
        sessions.insert(
            user_id,
            Entry {
                session: session.clone(),
                last_used: AtomicU64::new(self.now_millis()),
            },
        );
        (session, true)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drops sessions idle for at least `idle`. A session a request still
    /// holds is kept. Returns how many were dropped.
    pub async fn sweep_idle(&self, idle: Duration) -> usize {
        let now = self.now_millis();
        let idle = idle.as_millis() as u64;
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| {
            let last_used = entry.last_used.load(Ordering::Relaxed);
            let in_use = Arc::strong_count(&entry.session) > 1;
            in_use || now.saturating_sub(last_used) < idle
        });
        before - sessions.len()
    }

    /// Runs `sweep_idle` every `every` until the runtime shuts down.
    pub fn spawn_sweeper(&self, idle: Duration, every: Duration) -> JoinHandle<()> {
        let registry = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                let dropped = registry.sweep_idle(idle).await;
                if dropped > 0 {
                    info!("Dropped {dropped} idle catalog sessions");
                } else {
                    debug!("No idle catalog sessions to drop");
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::query::SortMode;

    const IDLE: Duration = Duration::from_secs(30 * 60);

    fn new_session() -> CatalogSession {
        CatalogSession::new(32, SortMode::Recommend)
    }

    #[tokio::test]
    async fn test_get_or_insert_reuses_session() {
        let registry = SessionRegistry::default();
        let user = Uuid::new_v4();

        let (first, created) = registry.get_or_insert_with(user, new_session).await;
        assert!(created);
        first.lock().await.set_keyword("kept");

        let (second, created) = registry
            .get_or_insert_with(user, || CatalogSession::new(10, SortMode::Random))
            .await;
        assert!(!created);
        assert_eq!(second.lock().await.query().keyword, "kept");
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_sessions_are_per_user() {
        let registry = SessionRegistry::default();
        registry.get_or_insert_with(Uuid::new_v4(), new_session).await;
        assert!(registry.get(Uuid::new_v4()).await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_sessions_are_dropped() {
        let registry = SessionRegistry::default();
        let (idle_user, active_user) = (Uuid::new_v4(), Uuid::new_v4());
        registry.get_or_insert_with(idle_user, new_session).await;
        registry.get_or_insert_with(active_user, new_session).await;

        tokio::time::advance(Duration::from_secs(20 * 60)).await;
        assert!(registry.get(active_user).await.is_some());
        assert_eq!(registry.sweep_idle(IDLE).await, 0);

        tokio::time::advance(Duration::from_secs(15 * 60)).await;
        assert_eq!(registry.sweep_idle(IDLE).await, 1);
        assert!(registry.get(idle_user).await.is_none());
        assert!(registry.get(active_user).await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sessions_in_use_survive_sweep() {
        let registry = SessionRegistry::default();
        let user = Uuid::new_v4();
        let (held, _) = registry.get_or_insert_with(user, new_session).await;

        tokio::time::advance(IDLE * 2).await;
        assert_eq!(registry.sweep_idle(IDLE).await, 0);

        drop(held);
        assert_eq!(registry.sweep_idle(IDLE).await, 1);
        assert_eq!(registry.len().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_task_drops_idle_sessions() {
        let registry = SessionRegistry::default();
        registry.get_or_insert_with(Uuid::new_v4(), new_session).await;

        let sweeper = registry.spawn_sweeper(IDLE, Duration::from_secs(60));
        tokio::time::sleep(IDLE + Duration::from_secs(120)).await;
        assert_eq!(registry.len().await, 0);
        sweeper.abort();
    }
}
