//! Common error infrastructure for grindstone-core.
//!
//! Hot-path lookups (unknown item, unknown effect, missing target) never
//! produce errors: they degrade to an empty record and the mechanic silently
//! does nothing. Errors are reserved for two situations:
//!
//! - **Construction-time validation**: zone definitions, enemy templates and
//!   spawn tables that can never work are rejected before play starts
//! - **Deferred result processing**: a queued result that can no longer be
//!   applied is reported, logged and skipped without stopping the flush
//!
//! # Design Principles
//!
//! - **Severity Classification**: Errors are categorized for recovery strategies
//! - **Rich Context**: Errors carry the entity and timestamp they concern
//! - **Never crash the frame loop**: no error aborts an update in progress

use crate::state::{EntityId, Millis};

/// Severity level of an error, used for categorization and recovery strategies.
///
/// Errors are classified by their recoverability and expected handling:
/// - **Recoverable**: Temporary conditions that may succeed on a later frame
/// - **Validation**: Invalid input that should be rejected without retry
/// - **Internal**: Unexpected state inconsistencies that require investigation
/// - **Fatal**: Unrecoverable configuration errors
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - the same request may succeed later.
    ///
    /// Examples: zone requirements not met yet
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: non-positive weight, unknown zone id
    Validation,

    /// Internal error - unexpected state inconsistency.
    ///
    /// Examples: a queued result whose target already left the zone
    /// These indicate bugs and should be investigated.
    Internal,

    /// Fatal error - the data set cannot drive a simulation.
    ///
    /// Examples: empty spawn table, spawn table naming an unknown enemy
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates a bug or broken data.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Contextual information attached to errors for debugging and diagnostics.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ErrorContext {
    /// Entity the failed operation concerned (if applicable).
    pub entity: Option<EntityId>,

    /// Session clock when the error was raised.
    pub at: Millis,

    /// Optional static message providing additional context.
    pub message: Option<&'static str>,
}

impl ErrorContext {
    /// Creates a new error context stamped with the given time.
    #[must_use]
    pub const fn new(at: Millis) -> Self {
        Self {
            entity: None,
            at,
            message: None,
        }
    }

    /// Attaches an entity to this context (builder pattern).
    #[must_use]
    pub const fn with_entity(mut self, entity: EntityId) -> Self {
        self.entity = Some(entity);
        self
    }

    /// Attaches a static message to this context (builder pattern).
    #[must_use]
    pub const fn with_message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }
}

/// Common trait for all grindstone-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Include `ErrorContext` in variants raised during play
/// - Classify severity based on recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns the context information for this error, if available.
    fn context(&self) -> Option<&ErrorContext> {
        None
    }

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Errors raised while building or flushing a zone.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum CombatError {
    #[error("unknown zone '{zone}'")]
    UnknownZone { zone: String },

    #[error("zone '{zone}' spawns enemies but its spawn table is empty")]
    EmptySpawnTable { zone: String },

    #[error("zone '{zone}' spawn table references unknown enemy '{enemy}'")]
    UnknownEnemy { zone: String, enemy: String },

    #[error("zone '{zone}' spawn table references unknown resource node '{node}'")]
    UnknownResourceNode { zone: String, node: String },

    #[error("enemy template '{enemy}' has non-positive weight {weight}")]
    InvalidWeight { enemy: String, weight: f64 },

    #[error("queued result targets an entity that is no longer in the zone")]
    StaleTarget { context: ErrorContext },
}

impl GameError for CombatError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::EmptySpawnTable { .. }
            | Self::UnknownEnemy { .. }
            | Self::UnknownResourceNode { .. } => ErrorSeverity::Fatal,
            Self::UnknownZone { .. } | Self::InvalidWeight { .. } => ErrorSeverity::Validation,
            Self::StaleTarget { .. } => ErrorSeverity::Internal,
        }
    }

    fn context(&self) -> Option<&ErrorContext> {
        match self {
            Self::StaleTarget { context } => Some(context),
            _ => None,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownZone { .. } => "UNKNOWN_ZONE",
            Self::EmptySpawnTable { .. } => "EMPTY_SPAWN_TABLE",
            Self::UnknownEnemy { .. } => "UNKNOWN_ENEMY",
            Self::UnknownResourceNode { .. } => "UNKNOWN_RESOURCE_NODE",
            Self::InvalidWeight { .. } => "INVALID_WEIGHT",
            Self::StaleTarget { .. } => "STALE_TARGET",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_errors_are_fatal() {
        let err = CombatError::EmptySpawnTable {
            zone: "graveyard".into(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Fatal);
        assert!(err.severity().is_internal());
        assert_eq!(err.error_code(), "EMPTY_SPAWN_TABLE");
    }

    #[test]
    fn stale_target_exposes_context() {
        let err = CombatError::StaleTarget {
            context: ErrorContext::new(Millis(1200)).with_entity(EntityId(7)),
        };
        let ctx = err.context().expect("context attached");
        assert_eq!(ctx.entity, Some(EntityId(7)));
        assert_eq!(ctx.at, Millis(1200));
    }
}
