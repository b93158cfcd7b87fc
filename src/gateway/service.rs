//! The gateway orchestrator
//!
//! Drives one request through resolution, validation and execution,
//! recording each step on its [`RequestLifecycle`].

use std::sync::Arc;

use serde_json::Value;

use super::errors::{GatewayError, GatewayResult};
use super::lifecycle::{RequestLifecycle, RequestState};
use crate::endpoints::{
    Access, CredentialGate, EndpointDefinition, EndpointKey, EndpointRegistration,
    EndpointRegistry,
};
use crate::engine::{BatchOutcome, ExecutionEngine};
use crate::observability::{log_event_with_fields, Event, MetricsRegistry};
use crate::schema::{SchemaCatalog, SchemaValidator, ValidationFailure};
use crate::template::{RowBatch, RowPayload, Template};

/// Payload of a write invocation
#[derive(Debug, Clone, PartialEq)]
pub enum InvocationBody {
    /// One field map, applied once
    Single(RowPayload),
    /// `{ "rows": [ ... ] }`
    Batch(Vec<RowPayload>),
}

impl InvocationBody {
    /// Classify a JSON body. An object whose `rows` member is an array is
    /// the batch form and every element must be an object; any other
    /// object is the single form.
    pub fn from_json(body: Value) -> GatewayResult<Self> {
        let mut object = match body {
            Value::Object(object) => object,
            _ => {
                return Err(GatewayError::MalformedRequest(
                    "body must be a JSON object".to_string(),
                ))
            }
        };

        let rows = match object.remove("rows") {
            Some(Value::Array(rows)) => rows,
            Some(other) => {
                object.insert("rows".to_string(), other);
                return Ok(InvocationBody::Single(object));
            }
            None => return Ok(InvocationBody::Single(object)),
        };

        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(index, row)| match row {
                Value::Object(row) => Ok(row),
                _ => Err(GatewayError::MalformedRequest(format!(
                    "rows[{}] must be a JSON object",
                    index
                ))),
            })
            .collect::<GatewayResult<Vec<_>>>()?;
        Ok(InvocationBody::Batch(rows))
    }
}

/// A write request against a registered endpoint
#[derive(Debug, Clone)]
pub struct Invocation {
    pub endpoint: String,
    pub method: String,
    pub credential: Option<String>,
    pub body: InvocationBody,
}

/// A read request. `fields` is the merged id segment and query string.
#[derive(Debug, Clone)]
pub struct ReadRequest {
    pub endpoint: String,
    pub credential: Option<String>,
    pub fields: RowPayload,
}

/// Request orchestrator shared by every handler
pub struct Gateway {
    registry: Arc<dyn EndpointRegistry>,
    catalog: Arc<SchemaCatalog>,
    engine: ExecutionEngine,
    metrics: Arc<MetricsRegistry>,
}

impl Gateway {
    pub fn new(
        registry: Arc<dyn EndpointRegistry>,
        catalog: Arc<SchemaCatalog>,
        engine: ExecutionEngine,
        metrics: Arc<MetricsRegistry>,
    ) -> Self {
        Self {
            registry,
            catalog,
            engine,
            metrics,
        }
    }

    pub fn metrics(&self) -> &Arc<MetricsRegistry> {
        &self.metrics
    }

    /// Run a write invocation to a terminal state
    pub fn invoke(&self, invocation: Invocation) -> GatewayResult<BatchOutcome> {
        self.metrics.increment_requests_received();
        let mut lifecycle = RequestLifecycle::begin(&invocation.endpoint, &invocation.method);

        let result = self.run_invocation(&mut lifecycle, invocation);
        match &result {
            Ok(outcome) => {
                self.metrics.increment_requests_committed();
                self.metrics.add_rows_applied(outcome.rows_applied as u64);
            }
            Err(err) => self.record_failure(&mut lifecycle, err),
        }
        result
    }

    /// Run a read request and return its rows
    pub fn read(&self, request: ReadRequest) -> GatewayResult<Vec<RowPayload>> {
        self.metrics.increment_requests_received();
        let mut lifecycle = RequestLifecycle::begin(&request.endpoint, "GET");

        let result = self.run_read(&mut lifecycle, &request);
        match &result {
            Ok(rows) => {
                self.metrics.increment_reads_served();
                let count = rows.len().to_string();
                log_event_with_fields(
                    Event::ReadServed,
                    &[("endpoint", request.endpoint.as_str()), ("rows", count.as_str())],
                );
            }
            Err(err) => self.record_failure(&mut lifecycle, err),
        }
        result
    }

    /// Register a new endpoint definition
    pub fn register(&self, registration: EndpointRegistration) -> GatewayResult<i64> {
        let name = registration.endpoint_name.clone();
        let method = registration.method.clone();

        match self.registry.register(registration) {
            Ok(id) => {
                self.metrics.increment_endpoints_registered();
                let id_str = id.to_string();
                log_event_with_fields(
                    Event::EndpointRegistered,
                    &[
                        ("endpoint", name.as_str()),
                        ("method", method.as_str()),
                        ("id", id_str.as_str()),
                    ],
                );
                Ok(id)
            }
            Err(err) if err.is_client_error() => {
                Err(GatewayError::MalformedRequest(err.to_string()))
            }
            Err(err) => {
                let reason = err.to_string();
                log_event_with_fields(
                    Event::RegistrationFailed,
                    &[("endpoint", name.as_str()), ("reason", reason.as_str())],
                );
                Err(GatewayError::RegistrationFailed(err))
            }
        }
    }

    /// Every registered definition in id order
    pub fn endpoints(&self) -> GatewayResult<Vec<EndpointDefinition>> {
        self.registry
            .list()
            .map_err(|e| GatewayError::Internal(e.to_string()))
    }

    fn run_invocation(
        &self,
        lifecycle: &mut RequestLifecycle,
        invocation: Invocation,
    ) -> GatewayResult<BatchOutcome> {
        let definition = self.resolve(
            &invocation.endpoint,
            &invocation.method,
            invocation.credential.as_deref(),
        )?;
        lifecycle.advance(RequestState::Resolved)?;

        let descriptor = self.catalog.get(&invocation.endpoint);
        let batch = match invocation.body {
            InvocationBody::Batch(rows) => {
                let batch = RowBatch::new(rows).ok_or(ValidationFailure::EmptyBatch)?;
                SchemaValidator::validate(&invocation.endpoint, descriptor, &batch)?;
                batch
            }
            InvocationBody::Single(row) => {
                let batch = RowBatch::single(row);
                if descriptor.is_some() {
                    SchemaValidator::validate(&invocation.endpoint, descriptor, &batch)?;
                }
                batch
            }
        };
        lifecycle.advance(RequestState::Validated)?;

        lifecycle.advance(RequestState::Executing)?;
        let template = Template::new(definition.sql_template);
        let outcome = self.engine.execute(&template, &batch)?;
        lifecycle.advance(RequestState::Committed)?;

        Ok(outcome)
    }

    fn run_read(
        &self,
        lifecycle: &mut RequestLifecycle,
        request: &ReadRequest,
    ) -> GatewayResult<Vec<RowPayload>> {
        let definition = self.resolve(&request.endpoint, "GET", request.credential.as_deref())?;
        lifecycle.advance(RequestState::Resolved)?;

        // Reads carry no schema check.
        lifecycle.advance(RequestState::Validated)?;

        lifecycle.advance(RequestState::Executing)?;
        let template = Template::new(definition.sql_template);
        let rows = self.engine.query(&template, &request.fields)?;
        lifecycle.advance(RequestState::Committed)?;

        Ok(rows)
    }

    /// Resolve the triple, then apply the credential gate to the result.
    fn resolve(
        &self,
        endpoint: &str,
        method: &str,
        credential: Option<&str>,
    ) -> GatewayResult<EndpointDefinition> {
        let credential = credential
            .filter(|c| !c.is_empty())
            .ok_or(GatewayError::AuthRejected)?;

        let key = EndpointKey::new(endpoint, method);
        let definition = self
            .registry
            .resolve(&key, credential)
            .map_err(GatewayError::from_resolution)?
            .ok_or(GatewayError::NotResolved)?;

        match CredentialGate::check(&definition, credential) {
            Access::Allowed => Ok(definition),
            Access::Denied => Err(GatewayError::NotResolved),
        }
    }

    fn record_failure(&self, lifecycle: &mut RequestLifecycle, err: &GatewayError) {
        match lifecycle.fail(err) {
            RequestState::Aborted => self.metrics.increment_requests_aborted(),
            _ => self.metrics.increment_requests_rejected(),
        }
    }
}
