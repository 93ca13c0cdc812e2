use metrics::{counter, gauge};
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{MemoryStaging, RouteBackend, RouteWizard};
use crate::{AppError, AppResult};

pub type SharedWizard = Arc<Mutex<RouteWizard>>;

/// Open wizards keyed by session id. Idle sessions expire after the TTL.
#[derive(Clone)]
pub struct WizardSessions {
    cache: Cache<Uuid, SharedWizard>,
    backend: Arc<dyn RouteBackend>,
}

impl WizardSessions {
    pub fn new(backend: Arc<dyn RouteBackend>, idle_ttl: Duration) -> Self {
        let cache = Cache::builder()
            .time_to_idle(idle_ttl)
            .max_capacity(10_000)
            .build();

        Self { cache, backend }
    }

    /// Open a wizard with its own staging slot and load its reference lists.
    pub async fn open(&self) -> (Uuid, SharedWizard) {
        let mut wizard = RouteWizard::open(self.backend.clone(), MemoryStaging::default());
        wizard.load_references().await;

        let id = Uuid::new_v4();
        let wizard = Arc::new(Mutex::new(wizard));
        self.cache.insert(id, wizard.clone()).await;

        counter!("wizard_sessions_opened_total").increment(1);
        gauge!("wizard_sessions_open").set(self.cache.entry_count() as f64);
        tracing::info!(session_id = %id, "Wizard opened");

        (id, wizard)
    }

    pub async fn get(&self, id: Uuid) -> AppResult<SharedWizard> {
        self.cache
            .get(&id)
            .await
            .ok_or_else(|| AppError::NotFound(format!("Wizard session {} not found", id)))
    }

    /// Close and forget a wizard. Its staged customers are discarded.
    pub async fn close(&self, id: Uuid) -> AppResult<()> {
        let wizard = self
            .cache
            .remove(&id)
            .await
            .ok_or_else(|| AppError::NotFound(format!("Wizard session {} not found", id)))?;

        wizard.lock().await.close();

        counter!("wizard_sessions_closed_total").increment(1);
        gauge!("wizard_sessions_open").set(self.cache.entry_count() as f64);
        tracing::info!(session_id = %id, "Wizard closed");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{CreateRouteInput, JobPosition, NamedEntity, Route, Store},
        query::EntityQuery,
        wizard::Stage,
    };
    use async_trait::async_trait;

    struct EmptyBackend;

    #[async_trait]
    impl RouteBackend for EmptyBackend {
        async fn list_stores(&self, _search: Option<&str>) -> AppResult<Vec<Store>> {
            Ok(vec![])
        }

        async fn list_named(&self, _listing: &EntityQuery) -> AppResult<Vec<NamedEntity>> {
            Ok(vec![])
        }

        async fn list_job_positions(&self) -> AppResult<Vec<JobPosition>> {
            Ok(vec![])
        }

        async fn create_route(&self, _input: &CreateRouteInput) -> AppResult<Route> {
            Err(AppError::Internal("not used".to_string()))
        }
    }

    fn sessions() -> WizardSessions {
        WizardSessions::new(Arc::new(EmptyBackend), Duration::from_secs(60))
    }

    #[tokio::test]
    async fn sessions_are_independent() {
        let sessions = sessions();
        let (a, wizard_a) = sessions.open().await;
        let (b, _) = sessions.open().await;
        assert_ne!(a, b);

        wizard_a.lock().await.next().await;

        let wizard_b = sessions.get(b).await.unwrap();
        assert_eq!(wizard_b.lock().await.stage(), Stage::BasicInfo);
        assert_eq!(sessions.get(a).await.unwrap().lock().await.stage(), Stage::Customers);
    }

    #[tokio::test]
    async fn closed_session_is_gone() {
        let sessions = sessions();
        let (id, _) = sessions.open().await;

        sessions.close(id).await.unwrap();

        assert!(matches!(sessions.get(id).await, Err(AppError::NotFound(_))));
        assert!(matches!(sessions.close(id).await, Err(AppError::NotFound(_))));
    }
}
