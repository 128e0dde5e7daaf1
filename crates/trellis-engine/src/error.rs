// File: src/error.rs
// Purpose: Two-tier error taxonomy for route data execution

use http::StatusCode;
use serde_json::Value as JsonValue;
use thiserror::Error;

/// Deliberate non-success response produced by a route handler.
///
/// Routed to the nearest catch boundary. Never confused with a
/// structural fault from the fetch layer.
#[derive(Debug, Clone)]
pub struct CatchSignal {
    pub status: StatusCode,
    pub status_text: String,
    pub payload: JsonValue,
}

/// Errors surfaced by loader and action execution.
///
/// Invariant violations (engine misuse, like querying a revalidation
/// predicate before the module is loaded) are not represented here: they
/// panic, and application-level boundaries are not meant to catch them.
#[derive(Debug, Error)]
pub enum RouteDataError {
    /// Fault value produced by the fetch layer, surfaced unchanged to
    /// the nearest error boundary.
    #[error(transparent)]
    Structural(#[from] anyhow::Error),

    /// Boundary response carrying status, status text, and payload.
    #[error("route responded {} {}", .0.status.as_u16(), .0.status_text)]
    Catch(CatchSignal),
}

impl RouteDataError {
    /// Whether this is a catch-boundary signal.
    pub fn is_catch(&self) -> bool {
        matches!(self, Self::Catch(_))
    }

    /// The catch signal, if this is one.
    pub fn catch_signal(&self) -> Option<&CatchSignal> {
        match self {
            Self::Catch(signal) => Some(signal),
            Self::Structural(_) => None,
        }
    }
}
