use thiserror::Error;

use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind, NotFoundKind};

/// Crate-level error returned by engine operations.
///
/// The engine is format-agnostic at its boundary, so this type carries a
/// stable string code plus a human-readable detail instead of any transport
/// status. Hosting layers map codes onto their wire format.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Validation error: {detail}")]
    Validation { code: &'static str, detail: String },
    #[error("Not found: {detail}")]
    NotFound { code: &'static str, detail: String },
    #[error("Conflict: {detail}")]
    Conflict { code: &'static str, detail: String },
    #[error("Internal error: {detail}")]
    Internal { detail: String },
    #[error("Configuration error: {detail}")]
    Config { detail: String },
}

impl EngineError {
    /// Stable machine-readable code for any error variant.
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::Validation { code, .. } => code,
            EngineError::NotFound { code, .. } => code,
            EngineError::Conflict { code, .. } => code,
            EngineError::Internal { .. } => "INTERNAL",
            EngineError::Config { .. } => "CONFIG_ERROR",
        }
    }

    /// Human-readable detail for any error variant.
    pub fn detail(&self) -> &str {
        match self {
            EngineError::Validation { detail, .. } => detail,
            EngineError::NotFound { detail, .. } => detail,
            EngineError::Conflict { detail, .. } => detail,
            EngineError::Internal { detail } => detail,
            EngineError::Config { detail } => detail,
        }
    }

    pub fn invalid(code: &'static str, detail: impl Into<String>) -> Self {
        Self::Validation {
            code,
            detail: detail.into(),
        }
    }

    pub fn not_found(code: &'static str, detail: impl Into<String>) -> Self {
        Self::NotFound {
            code,
            detail: detail.into(),
        }
    }

    pub fn conflict(code: &'static str, detail: impl Into<String>) -> Self {
        Self::Conflict {
            code,
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal {
            detail: detail.into(),
        }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }
}

impl From<DomainError> for EngineError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(_, detail) => EngineError::Validation {
                code: "RULE_VIOLATION",
                detail,
            },
            DomainError::NotFound(kind, detail) => EngineError::NotFound {
                code: match kind {
                    NotFoundKind::Game => "GAME_NOT_FOUND",
                    NotFoundKind::PendingGame => "PENDING_GAME_NOT_FOUND",
                    NotFoundKind::Connection => "CONNECTION_NOT_FOUND",
                    _ => "NOT_FOUND",
                },
                detail,
            },
            DomainError::Conflict(kind, detail) => EngineError::Conflict {
                code: match kind {
                    ConflictKind::GameAlreadyEnded => "GAME_ALREADY_ENDED",
                    ConflictKind::SeatTaken => "SEAT_TAKEN",
                    ConflictKind::NoDrawOffer => "NO_DRAW_OFFER",
                    _ => "CONFLICT",
                },
                detail,
            },
            DomainError::Infra(kind, detail) => match kind {
                InfraErrorKind::DataCorruption => EngineError::Internal { detail },
                _ => EngineError::Internal { detail },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::domain::ValidationKind;

    #[test]
    fn domain_not_found_maps_to_stable_code() {
        let err: EngineError =
            DomainError::not_found(NotFoundKind::Game, "no game for code QXZP").into();
        assert_eq!(err.code(), "GAME_NOT_FOUND");
        assert_eq!(err.detail(), "no game for code QXZP");
    }

    #[test]
    fn invariant_maps_to_internal() {
        let err: EngineError = DomainError::invariant("card not in hand").into();
        assert_eq!(err.code(), "INTERNAL");
        assert!(err.detail().contains("Invariant violated"));
    }

    #[test]
    fn validation_keeps_detail() {
        let err: EngineError =
            DomainError::validation(ValidationKind::IllegalMove, "must attack").into();
        assert_eq!(err.code(), "RULE_VIOLATION");
        assert_eq!(err.detail(), "must attack");
    }
}
