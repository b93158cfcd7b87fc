//! Request lifecycle state machine
//!
//! ```text
//! Received -> Resolved -> Validated -> Executing -> Committed
//!     |           |           |                 \-> Aborted
//!     +-----------+-----------+--> Rejected
//! ```
//!
//! Committed, Aborted and Rejected are terminal. There is no retry edge.

use std::fmt;

use thiserror::Error;

use super::errors::GatewayError;
use crate::observability::{log_event_with_fields, Event};

/// Where a request is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    Received,
    Resolved,
    Validated,
    Executing,
    Committed,
    Aborted,
    Rejected,
}

/// An edge the state machine does not allow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Forbidden request transition {from} -> {to}")]
pub struct ForbiddenTransition {
    pub from: RequestState,
    pub to: RequestState,
}

impl RequestState {
    pub fn state_name(&self) -> &'static str {
        match self {
            Self::Received => "Received",
            Self::Resolved => "Resolved",
            Self::Validated => "Validated",
            Self::Executing => "Executing",
            Self::Committed => "Committed",
            Self::Aborted => "Aborted",
            Self::Rejected => "Rejected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Committed | Self::Aborted | Self::Rejected)
    }

    /// Event logged on entering this state
    pub fn event(&self) -> Event {
        match self {
            Self::Received => Event::RequestReceived,
            Self::Resolved => Event::RequestResolved,
            Self::Validated => Event::RequestValidated,
            Self::Executing => Event::RequestExecuting,
            Self::Committed => Event::RequestCommitted,
            Self::Aborted => Event::RequestAborted,
            Self::Rejected => Event::RequestRejected,
        }
    }

    /// Move to `next` if the edge exists
    pub fn transition(self, next: RequestState) -> Result<RequestState, ForbiddenTransition> {
        use RequestState::*;

        let allowed = matches!(
            (self, next),
            (Received, Resolved)
                | (Resolved, Validated)
                | (Validated, Executing)
                | (Executing, Committed)
                | (Executing, Aborted)
                | (Received | Resolved | Validated, Rejected)
        );

        if allowed {
            Ok(next)
        } else {
            Err(ForbiddenTransition {
                from: self,
                to: next,
            })
        }
    }
}

impl fmt::Display for RequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.state_name())
    }
}

/// One request's trip through the state machine. Logs every transition.
#[derive(Debug)]
pub struct RequestLifecycle {
    endpoint: String,
    method: String,
    state: RequestState,
}

impl RequestLifecycle {
    pub fn begin(endpoint: &str, method: &str) -> Self {
        let lifecycle = Self {
            endpoint: endpoint.to_string(),
            method: method.to_string(),
            state: RequestState::Received,
        };
        lifecycle.log(&[]);
        lifecycle
    }

    pub fn state(&self) -> RequestState {
        self.state
    }

    pub fn advance(&mut self, next: RequestState) -> Result<(), GatewayError> {
        self.state = self.state.transition(next)?;
        self.log(&[]);
        Ok(())
    }

    /// Close the request after `err`: Aborted once execution has started,
    /// Rejected before that. A request already in a terminal state is left
    /// alone.
    pub fn fail(&mut self, err: &GatewayError) -> RequestState {
        let next = if self.state == RequestState::Executing {
            RequestState::Aborted
        } else {
            RequestState::Rejected
        };

        if let Ok(state) = self.state.transition(next) {
            self.state = state;
            let reason = err.to_string();
            self.log(&[("kind", err.kind()), ("reason", reason.as_str())]);
        }
        self.state
    }

    fn log(&self, extra: &[(&str, &str)]) {
        let mut fields = vec![
            ("endpoint", self.endpoint.as_str()),
            ("method", self.method.as_str()),
            ("state", self.state.state_name()),
        ];
        fields.extend_from_slice(extra);
        log_event_with_fields(self.state.event(), &fields);
    }
}
