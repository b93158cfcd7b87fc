//! Observable events
//!
//! Every log line carries one of these as its `event` field.

use std::fmt;

use super::logger::Severity;

/// Observable gateway events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Boot & lifecycle
    BootStart,
    ConfigLoaded,
    StoreReady,
    Serving,
    ShutdownComplete,

    // Endpoint registry
    EndpointRegistered,
    RegistrationFailed,

    // Request lifecycle, one per state
    RequestReceived,
    RequestResolved,
    RequestValidated,
    RequestExecuting,
    RequestCommitted,
    RequestAborted,
    RequestRejected,

    // Read path
    ReadServed,

    // Backup
    BackupStart,
    BackupComplete,
    BackupFailed,

    // Sessions
    SessionStarted,
    SessionEnded,
    SessionsEvicted,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::BootStart => "SQLGATE_STARTUP_BEGIN",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::StoreReady => "STORE_READY",
            Event::Serving => "SQLGATE_SERVING",
            Event::ShutdownComplete => "SHUTDOWN_COMPLETE",

            Event::EndpointRegistered => "ENDPOINT_REGISTERED",
            Event::RegistrationFailed => "ENDPOINT_REGISTRATION_FAILED",

            Event::RequestReceived => "REQUEST_RECEIVED",
            Event::RequestResolved => "REQUEST_RESOLVED",
            Event::RequestValidated => "REQUEST_VALIDATED",
            Event::RequestExecuting => "REQUEST_EXECUTING",
            Event::RequestCommitted => "REQUEST_COMMITTED",
            Event::RequestAborted => "REQUEST_ABORTED",
            Event::RequestRejected => "REQUEST_REJECTED",

            Event::ReadServed => "READ_SERVED",

            Event::BackupStart => "BACKUP_BEGIN",
            Event::BackupComplete => "BACKUP_COMPLETE",
            Event::BackupFailed => "BACKUP_FAILED",

            Event::SessionStarted => "SESSION_STARTED",
            Event::SessionEnded => "SESSION_ENDED",
            Event::SessionsEvicted => "SESSIONS_EVICTED",
        }
    }

    /// Default severity for this event
    pub fn severity(&self) -> Severity {
        match self {
            Event::RequestReceived
            | Event::RequestResolved
            | Event::RequestValidated
            | Event::RequestExecuting => Severity::Trace,
            Event::RequestRejected => Severity::Warn,
            Event::RequestAborted | Event::RegistrationFailed | Event::BackupFailed => {
                Severity::Error
            }
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
