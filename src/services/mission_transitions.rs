//! Tabla de transiciones de misión
//!
//! Cada comando de ciclo de vida tiene una regla (estados de origen
//! admitidos, estado destino, mensaje de rechazo). Toda la lógica de guardas
//! vive aquí: `MissionService` sólo consulta `TransitionPolicy::check`.
//!
//! En modo `Permissive` sólo `start` está protegido (VALIDATED -> IN_PROGRESS);
//! `validate` y `finish` aceptan cualquier estado de origen. `Strict` añade
//! las guardas que faltan sobre la cadena PENDING -> VALIDATED -> IN_PROGRESS -> COMPLETED.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::models::mission::MissionStatus;
use crate::utils::errors::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionCommand {
    Validate,
    Start,
    Finish,
}

impl MissionCommand {
    pub const fn as_str(&self) -> &'static str {
        match self {
            MissionCommand::Validate => "validate",
            MissionCommand::Start => "start",
            MissionCommand::Finish => "finish",
        }
    }

    const fn index(&self) -> usize {
        match self {
            MissionCommand::Validate => 0,
            MissionCommand::Start => 1,
            MissionCommand::Finish => 2,
        }
    }
}

/// Regla de transición. `allowed_from == None` significa "cualquier estado".
#[derive(Debug, Clone, Copy)]
pub struct TransitionRule {
    pub command: MissionCommand,
    pub allowed_from: Option<&'static [MissionStatus]>,
    pub to: MissionStatus,
    pub rejection: &'static str,
}

impl TransitionRule {
    pub fn permits(&self, from: MissionStatus) -> bool {
        self.allowed_from.map_or(true, |allowed| allowed.contains(&from))
    }
}

pub const START_REQUIRES_VALIDATED: &str = "mission must be validated before starting";

const FROM_PENDING: &[MissionStatus] = &[MissionStatus::Pending];
const FROM_VALIDATED: &[MissionStatus] = &[MissionStatus::Validated];
const FROM_IN_PROGRESS: &[MissionStatus] = &[MissionStatus::InProgress];

// Orden de las tablas: Validate, Start, Finish (ver `MissionCommand::index`)
const PERMISSIVE_RULES: [TransitionRule; 3] = [
    TransitionRule {
        command: MissionCommand::Validate,
        allowed_from: None,
        to: MissionStatus::Validated,
        rejection: "mission cannot be validated",
    },
    TransitionRule {
        command: MissionCommand::Start,
        allowed_from: Some(FROM_VALIDATED),
        to: MissionStatus::InProgress,
        rejection: START_REQUIRES_VALIDATED,
    },
    TransitionRule {
        command: MissionCommand::Finish,
        allowed_from: None,
        to: MissionStatus::Completed,
        rejection: "mission cannot be finished",
    },
];

const STRICT_RULES: [TransitionRule; 3] = [
    TransitionRule {
        command: MissionCommand::Validate,
        allowed_from: Some(FROM_PENDING),
        to: MissionStatus::Validated,
        rejection: "only pending missions can be validated",
    },
    TransitionRule {
        command: MissionCommand::Start,
        allowed_from: Some(FROM_VALIDATED),
        to: MissionStatus::InProgress,
        rejection: START_REQUIRES_VALIDATED,
    },
    TransitionRule {
        command: MissionCommand::Finish,
        allowed_from: Some(FROM_IN_PROGRESS),
        to: MissionStatus::Completed,
        rejection: "only missions in progress can be finished",
    },
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionPolicy {
    #[default]
    Permissive,
    Strict,
}

impl TransitionPolicy {
    pub fn rules(&self) -> &'static [TransitionRule] {
        match self {
            TransitionPolicy::Permissive => &PERMISSIVE_RULES,
            TransitionPolicy::Strict => &STRICT_RULES,
        }
    }

    pub fn rule_for(&self, command: MissionCommand) -> &'static TransitionRule {
        &self.rules()[command.index()]
    }

    /// Comprueba la guarda del comando y devuelve el estado destino.
    pub fn check(&self, command: MissionCommand, from: MissionStatus) -> AppResult<MissionStatus> {
        let rule = self.rule_for(command);
        if rule.permits(from) {
            Ok(rule.to)
        } else {
            Err(AppError::InvalidTransition {
                from: from.to_string(),
                to: rule.to.to_string(),
                reason: rule.rejection.to_string(),
            })
        }
    }
}

impl FromStr for TransitionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "permissive" => Ok(TransitionPolicy::Permissive),
            "strict" => Ok(TransitionPolicy::Strict),
            other => Err(format!("unknown transition policy '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permissive_only_guards_start() {
        let policy = TransitionPolicy::Permissive;

        for from in MissionStatus::ALL {
            assert_eq!(policy.check(MissionCommand::Validate, from).unwrap(), MissionStatus::Validated);
            assert_eq!(policy.check(MissionCommand::Finish, from).unwrap(), MissionStatus::Completed);

            let start = policy.check(MissionCommand::Start, from);
            if from == MissionStatus::Validated {
                assert_eq!(start.unwrap(), MissionStatus::InProgress);
            } else {
                assert!(matches!(
                    start,
                    Err(AppError::InvalidTransition { ref reason, .. }) if reason == START_REQUIRES_VALIDATED
                ));
            }
        }
    }

    #[test]
    fn test_strict_follows_the_chain() {
        let policy = TransitionPolicy::Strict;

        assert!(policy.check(MissionCommand::Validate, MissionStatus::Pending).is_ok());
        assert!(policy.check(MissionCommand::Validate, MissionStatus::Completed).is_err());
        assert!(policy.check(MissionCommand::Start, MissionStatus::Validated).is_ok());
        assert!(policy.check(MissionCommand::Start, MissionStatus::Pending).is_err());
        assert!(policy.check(MissionCommand::Finish, MissionStatus::InProgress).is_ok());
        assert!(policy.check(MissionCommand::Finish, MissionStatus::Validated).is_err());
    }

    #[test]
    fn test_every_command_has_a_rule() {
        for policy in [TransitionPolicy::Permissive, TransitionPolicy::Strict] {
            for command in [MissionCommand::Validate, MissionCommand::Start, MissionCommand::Finish] {
                assert_eq!(policy.rule_for(command).command, command);
            }
        }
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("STRICT".parse::<TransitionPolicy>(), Ok(TransitionPolicy::Strict));
        assert_eq!(" permissive ".parse::<TransitionPolicy>(), Ok(TransitionPolicy::Permissive));
        assert!("lenient".parse::<TransitionPolicy>().is_err());
    }
}
