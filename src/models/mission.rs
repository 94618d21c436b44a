//! Modelo de Mission
//!
//! Una misión es un viaje programado de un vehículo con conductor, ventana
//! horaria y flujo de aprobación. El estado sólo cambia a través de
//! `MissionService`; cada cambio queda reflejado en el historial.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Type;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Estado de la misión - mapea al ENUM mission_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "mission_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MissionStatus {
    Pending,
    Validated,
    InProgress,
    Completed,
    Cancelled,
}

impl MissionStatus {
    pub const ALL: [MissionStatus; 5] = [
        MissionStatus::Pending,
        MissionStatus::Validated,
        MissionStatus::InProgress,
        MissionStatus::Completed,
        MissionStatus::Cancelled,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            MissionStatus::Pending => "PENDING",
            MissionStatus::Validated => "VALIDATED",
            MissionStatus::InProgress => "IN_PROGRESS",
            MissionStatus::Completed => "COMPLETED",
            MissionStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for MissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MissionStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown mission status '{}'", s))
    }
}

/// Entrada del historial de estados. Inmutable una vez añadida.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusHistoryEntry {
    pub status: MissionStatus,
    pub comment: String,
    pub changed_at: DateTime<Utc>,
}

/// Historial de estados de una misión: sólo admite añadir al final.
///
/// El orden de inserción es el orden cronológico; `record` nunca deja un
/// timestamp anterior al de la última entrada.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct StatusHistory(Vec<StatusHistoryEntry>);

impl StatusHistory {
    pub fn record(&mut self, status: MissionStatus, comment: impl Into<String>, at: DateTime<Utc>) {
        let changed_at = match self.last() {
            Some(last) if last.changed_at > at => last.changed_at,
            _ => at,
        };
        self.0.push(StatusHistoryEntry {
            status,
            comment: comment.into(),
            changed_at,
        });
    }

    pub fn entries(&self) -> &[StatusHistoryEntry] {
        &self.0
    }

    pub fn last(&self) -> Option<&StatusHistoryEntry> {
        self.0.last()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Datos de entrada para crear una misión
#[derive(Debug, Clone, Default)]
pub struct NewMission {
    pub vehicle_id: Option<Uuid>,
    pub driver_id: Option<Uuid>,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub route: Option<String>,
    pub description: Option<String>,
}

/// Mission principal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mission {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub driver_id: Option<Uuid>,
    pub validator_id: Option<Uuid>,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub route: Option<String>,
    pub description: Option<String>,
    pub status: MissionStatus,
    pub validation_comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub history: StatusHistory,
}

pub const MISSION_CREATED_COMMENT: &str = "mission created";
pub const MISSION_STARTED_COMMENT: &str = "mission started";

impl Mission {
    /// Construye una misión en PENDING con la primera entrada del historial.
    pub fn new(vehicle_id: Uuid, draft: NewMission, now: DateTime<Utc>) -> Self {
        let mut history = StatusHistory::default();
        history.record(MissionStatus::Pending, MISSION_CREATED_COMMENT, now);

        Self {
            id: Uuid::new_v4(),
            vehicle_id,
            driver_id: draft.driver_id,
            validator_id: None,
            start_at: draft.start_at,
            end_at: draft.end_at,
            route: draft.route,
            description: draft.description,
            status: MissionStatus::Pending,
            validation_comment: None,
            created_at: now,
            updated_at: now,
            history,
        }
    }

    /// Cambia de estado y registra exactamente una entrada en el historial.
    pub fn apply_status(&mut self, status: MissionStatus, comment: impl Into<String>, now: DateTime<Utc>) {
        self.status = status;
        self.history.record(status, comment, now);
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_new_mission_seeds_history() {
        let now = Utc::now();
        let mission = Mission::new(Uuid::new_v4(), NewMission::default(), now);

        assert_eq!(mission.status, MissionStatus::Pending);
        assert_eq!(mission.history.len(), 1);
        let entry = &mission.history.entries()[0];
        assert_eq!(entry.status, MissionStatus::Pending);
        assert_eq!(entry.comment, MISSION_CREATED_COMMENT);
        assert_eq!(entry.changed_at, now);
        assert_eq!(mission.created_at, mission.updated_at);
    }

    #[test]
    fn test_history_never_goes_back_in_time() {
        let now = Utc::now();
        let mut history = StatusHistory::default();
        history.record(MissionStatus::Pending, "created", now);
        history.record(MissionStatus::Validated, "ok", now - Duration::seconds(5));

        let entries = history.entries();
        assert_eq!(entries.len(), 2);
        assert!(entries[1].changed_at >= entries[0].changed_at);
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("in_progress".parse::<MissionStatus>(), Ok(MissionStatus::InProgress));
        assert_eq!("VALIDATED".parse::<MissionStatus>(), Ok(MissionStatus::Validated));
        assert!("EN_COURS".parse::<MissionStatus>().is_err());
    }

    #[test]
    fn test_status_serializes_screaming_case() {
        let json = serde_json::to_string(&MissionStatus::InProgress).unwrap();
        assert_eq!(json, "\"IN_PROGRESS\"");
    }
}
