//! Servicio de ciclo de vida de misiones
//!
//! Único punto que modifica el estado de una misión. Cada transición:
//! carga la misión, consulta la guarda en `TransitionPolicy`, aplica el
//! cambio (estado + una entrada de historial + fecha de modificación) y
//! persiste. Si otra transición escribió antes, devuelve `Conflict`.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::mission::{Mission, MissionStatus, NewMission, MISSION_STARTED_COMMENT};
use crate::repositories::MissionRepository;
use crate::services::mission_transitions::{MissionCommand, TransitionPolicy};
use crate::utils::errors::{not_found_error, validation_error, AppError, AppResult};

pub const VEHICLE_REQUIRED: &str = "vehicle is required for the mission";

pub struct MissionService {
    missions: Arc<dyn MissionRepository>,
    policy: TransitionPolicy,
}

impl MissionService {
    pub fn new(missions: Arc<dyn MissionRepository>, policy: TransitionPolicy) -> Self {
        Self { missions, policy }
    }

    pub fn policy(&self) -> TransitionPolicy {
        self.policy
    }

    /// Crea una misión en PENDING. Requiere una referencia de vehículo.
    pub async fn create(&self, draft: NewMission) -> AppResult<Mission> {
        let vehicle_id = draft.vehicle_id.ok_or_else(|| validation_error(VEHICLE_REQUIRED))?;

        // TODO: detectar solapamiento de ventanas horarias con otras misiones del mismo vehículo
        let mission = Mission::new(vehicle_id, draft, Utc::now());
        let saved = self.missions.save(&mission).await?;

        info!("Misión {} creada para el vehículo {}", saved.id, saved.vehicle_id);
        Ok(saved)
    }

    pub async fn validate(&self, id: Uuid, comment: String, validator_id: Option<Uuid>) -> AppResult<Mission> {
        let mut mission = self.load(id).await?;
        let previous = mission.updated_at;
        let to = self.policy.check(MissionCommand::Validate, mission.status)?;

        let now = Utc::now();
        mission.validator_id = validator_id;
        mission.validation_comment = Some(comment.clone());
        mission.apply_status(to, comment, now);

        self.persist(mission, previous, MissionCommand::Validate).await
    }

    pub async fn start(&self, id: Uuid) -> AppResult<Mission> {
        let mut mission = self.load(id).await?;
        let previous = mission.updated_at;
        let to = self.policy.check(MissionCommand::Start, mission.status)?;

        mission.apply_status(to, MISSION_STARTED_COMMENT, Utc::now());

        self.persist(mission, previous, MissionCommand::Start).await
    }

    pub async fn finish(&self, id: Uuid, comment: String) -> AppResult<Mission> {
        let mut mission = self.load(id).await?;
        let previous = mission.updated_at;
        let to = self.policy.check(MissionCommand::Finish, mission.status)?;

        mission.apply_status(to, comment, Utc::now());

        self.persist(mission, previous, MissionCommand::Finish).await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Mission> {
        self.load(id).await
    }

    pub async fn list_all(&self) -> AppResult<Vec<Mission>> {
        self.missions.find_all().await
    }

    pub async fn list_by_status(&self, status: MissionStatus) -> AppResult<Vec<Mission>> {
        self.missions.find_by_status(status).await
    }

    pub async fn list_in_progress(&self) -> AppResult<Vec<Mission>> {
        self.list_by_status(MissionStatus::InProgress).await
    }

    /// Misiones cuyo inicio cae en `[from, to]`
    pub async fn list_by_period(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> AppResult<Vec<Mission>> {
        self.missions.find_by_start_between(from, to).await
    }

    async fn load(&self, id: Uuid) -> AppResult<Mission> {
        self.missions
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Mission", &id.to_string()))
    }

    /// Escribe la transición sólo si la misión no cambió desde que se cargó.
    async fn persist(&self, mission: Mission, previous: DateTime<Utc>, command: MissionCommand) -> AppResult<Mission> {
        let saved = self
            .missions
            .update(&mission, previous)
            .await?
            .ok_or_else(|| AppError::Conflict(format!("mission {} was modified concurrently", mission.id)))?;
        info!("Misión {}: {} -> {}", saved.id, command.as_str(), saved.status);
        debug!("Historial de la misión {}: {} entradas", saved.id, saved.history.len());
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MemoryStore;
    use crate::services::mission_transitions::START_REQUIRES_VALIDATED;
    use chrono::Duration;

    fn service(policy: TransitionPolicy) -> MissionService {
        MissionService::new(Arc::new(MemoryStore::new()), policy)
    }

    fn draft() -> NewMission {
        NewMission {
            vehicle_id: Some(Uuid::new_v4()),
            driver_id: Some(Uuid::new_v4()),
            start_at: Some(Utc::now()),
            end_at: Some(Utc::now() + Duration::hours(4)),
            route: Some("Paris - Lyon".to_string()),
            description: Some("Livraison de pièces".to_string()),
        }
    }

    fn assert_history_consistent(mission: &Mission) {
        let entries = mission.history.entries();
        assert_eq!(entries.last().map(|e| e.status), Some(mission.status));
        for pair in entries.windows(2) {
            assert!(pair[1].changed_at >= pair[0].changed_at);
        }
    }

    #[tokio::test]
    async fn test_create_requires_vehicle() {
        let service = service(TransitionPolicy::Permissive);
        let result = service.create(NewMission::default()).await;

        assert!(matches!(result, Err(AppError::Validation(ref msg)) if msg == VEHICLE_REQUIRED));
        assert!(service.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_starts_pending_with_one_entry() {
        let service = service(TransitionPolicy::Permissive);
        let mission = service.create(draft()).await.unwrap();

        assert_eq!(mission.status, MissionStatus::Pending);
        assert_eq!(mission.history.len(), 1);
        assert_eq!(mission.history.entries()[0].comment, "mission created");
        assert_eq!(service.get(mission.id).await.unwrap().id, mission.id);
    }

    #[tokio::test]
    async fn test_full_lifecycle() {
        let service = service(TransitionPolicy::Permissive);
        let mission = service.create(draft()).await.unwrap();
        let validator = Uuid::new_v4();

        let validated = service
            .validate(mission.id, "OK pour départ".to_string(), Some(validator))
            .await
            .unwrap();
        assert_eq!(validated.status, MissionStatus::Validated);
        assert_eq!(validated.validator_id, Some(validator));
        assert_eq!(validated.validation_comment.as_deref(), Some("OK pour départ"));
        assert_eq!(validated.history.len(), 2);
        assert_history_consistent(&validated);

        let started = service.start(mission.id).await.unwrap();
        assert_eq!(started.status, MissionStatus::InProgress);
        assert_eq!(started.history.len(), 3);
        assert_eq!(started.history.last().unwrap().comment, MISSION_STARTED_COMMENT);
        assert_history_consistent(&started);

        let finished = service.finish(mission.id, "RAS".to_string()).await.unwrap();
        assert_eq!(finished.status, MissionStatus::Completed);
        assert_eq!(finished.history.len(), 4);
        assert_eq!(finished.history.last().unwrap().comment, "RAS");
        assert!(finished.updated_at >= finished.created_at);
        assert_history_consistent(&finished);
    }

    #[tokio::test]
    async fn test_start_requires_validated() {
        let service = service(TransitionPolicy::Permissive);
        let mission = service.create(draft()).await.unwrap();

        let result = service.start(mission.id).await;
        assert!(matches!(
            result,
            Err(AppError::InvalidTransition { ref reason, .. }) if reason == START_REQUIRES_VALIDATED
        ));

        let unchanged = service.get(mission.id).await.unwrap();
        assert_eq!(unchanged.status, MissionStatus::Pending);
        assert_eq!(unchanged.history.len(), 1);
    }

    #[tokio::test]
    async fn test_start_twice_is_rejected() {
        let service = service(TransitionPolicy::Permissive);
        let mission = service.create(draft()).await.unwrap();
        service.validate(mission.id, "ok".to_string(), None).await.unwrap();
        service.start(mission.id).await.unwrap();

        assert!(matches!(
            service.start(mission.id).await,
            Err(AppError::InvalidTransition { .. })
        ));
    }

    #[tokio::test]
    async fn test_permissive_validate_and_finish_accept_any_status() {
        let service = service(TransitionPolicy::Permissive);
        let mission = service.create(draft()).await.unwrap();

        // Terminar una misión todavía pendiente está permitido
        let finished = service.finish(mission.id, "annulée sur place".to_string()).await.unwrap();
        assert_eq!(finished.status, MissionStatus::Completed);

        // Y volver a validarla también
        let revalidated = service.validate(mission.id, "reprise".to_string(), None).await.unwrap();
        assert_eq!(revalidated.status, MissionStatus::Validated);
        assert_eq!(revalidated.history.len(), 3);
        assert_history_consistent(&revalidated);
    }

    #[tokio::test]
    async fn test_strict_policy_guards_every_edge() {
        let service = service(TransitionPolicy::Strict);
        let mission = service.create(draft()).await.unwrap();

        assert!(matches!(
            service.finish(mission.id, "trop tôt".to_string()).await,
            Err(AppError::InvalidTransition { .. })
        ));

        service.validate(mission.id, "ok".to_string(), None).await.unwrap();
        assert!(matches!(
            service.validate(mission.id, "encore".to_string(), None).await,
            Err(AppError::InvalidTransition { .. })
        ));

        service.start(mission.id).await.unwrap();
        let finished = service.finish(mission.id, "fin".to_string()).await.unwrap();
        assert_eq!(finished.status, MissionStatus::Completed);
        assert_eq!(finished.history.len(), 4);
    }

    #[tokio::test]
    async fn test_transitions_on_unknown_mission() {
        let service = service(TransitionPolicy::Permissive);
        let id = Uuid::new_v4();

        assert!(matches!(service.validate(id, "x".to_string(), None).await, Err(AppError::NotFound(_))));
        assert!(matches!(service.start(id).await, Err(AppError::NotFound(_))));
        assert!(matches!(service.finish(id, "x".to_string()).await, Err(AppError::NotFound(_))));
        assert!(matches!(service.get(id).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_queries_by_status_and_period() {
        let service = service(TransitionPolicy::Permissive);
        let base = Utc::now();

        let mut early = draft();
        early.start_at = Some(base - Duration::days(10));
        let mut inside = draft();
        inside.start_at = Some(base);
        let mut boundary = draft();
        boundary.start_at = Some(base + Duration::days(2));

        let early = service.create(early).await.unwrap();
        let inside = service.create(inside).await.unwrap();
        let boundary = service.create(boundary).await.unwrap();

        service.validate(inside.id, "ok".to_string(), None).await.unwrap();
        service.start(inside.id).await.unwrap();

        let in_progress = service.list_in_progress().await.unwrap();
        assert_eq!(in_progress.len(), 1);
        assert_eq!(in_progress[0].id, inside.id);

        let pending = service.list_by_status(MissionStatus::Pending).await.unwrap();
        assert_eq!(pending.len(), 2);

        let period = service
            .list_by_period(base - Duration::days(1), base + Duration::days(2))
            .await
            .unwrap();
        let ids: Vec<Uuid> = period.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![inside.id, boundary.id]);
        assert!(!ids.contains(&early.id));
    }

    /// Devuelve siempre la misma copia en `find_by_id`, como un lector que llegó tarde.
    struct StaleReads {
        store: MemoryStore,
        snapshot: Mission,
    }

    #[async_trait::async_trait]
    impl MissionRepository for StaleReads {
        async fn save(&self, mission: &Mission) -> AppResult<Mission> {
            MissionRepository::save(&self.store, mission).await
        }

        async fn update(&self, mission: &Mission, previous_updated_at: DateTime<Utc>) -> AppResult<Option<Mission>> {
            MissionRepository::update(&self.store, mission, previous_updated_at).await
        }

        async fn find_by_id(&self, _id: Uuid) -> AppResult<Option<Mission>> {
            Ok(Some(self.snapshot.clone()))
        }

        async fn find_by_status(&self, status: MissionStatus) -> AppResult<Vec<Mission>> {
            MissionRepository::find_by_status(&self.store, status).await
        }

        async fn find_by_start_between(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> AppResult<Vec<Mission>> {
            MissionRepository::find_by_start_between(&self.store, from, to).await
        }

        async fn find_all(&self) -> AppResult<Vec<Mission>> {
            MissionRepository::find_all(&self.store).await
        }
    }

    #[tokio::test]
    async fn test_concurrent_transition_is_rejected() {
        let store = MemoryStore::new();
        let mission = Mission::new(Uuid::new_v4(), draft(), Utc::now() - Duration::minutes(1));
        MissionRepository::save(&store, &mission).await.unwrap();

        let repo = StaleReads { store, snapshot: mission.clone() };
        let service = MissionService::new(Arc::new(repo), TransitionPolicy::Permissive);

        let first = service.validate(mission.id, "ok".to_string(), None).await.unwrap();
        assert_eq!(first.status, MissionStatus::Validated);

        let second = service.validate(mission.id, "again".to_string(), None).await;
        assert!(matches!(second, Err(AppError::Conflict(_))));
    }
}
