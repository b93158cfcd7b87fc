//! Credential gate
//!
//! Exact, case-sensitive comparison of the supplied credential against the
//! one stored with the endpoint. Runs in constant time with respect to the
//! contents so response timing does not leak prefixes.

use subtle::ConstantTimeEq;

use super::definition::EndpointDefinition;

/// Outcome of a credential check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allowed,
    Denied,
}

pub struct CredentialGate;

impl CredentialGate {
    pub fn check(definition: &EndpointDefinition, supplied: &str) -> Access {
        if constant_time_str_eq(&definition.credential, supplied) {
            Access::Allowed
        } else {
            Access::Denied
        }
    }
}

/// Constant-time string equality. Length differences return early.
pub fn constant_time_str_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
