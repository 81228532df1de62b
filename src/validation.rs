// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Domain and namespace validation, and namespace derivation from a domain.

use crate::constants::namespace::{DERIVED_MAX_LEN, PREFIX};
use std::fmt;
use thiserror::Error;

const MAX_LABEL_LEN: usize = 63;
const MAX_DOMAIN_LEN: usize = 253;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid domain '{value}': {reason}")]
    InvalidDomain { value: String, reason: String },

    #[error("invalid namespace '{value}': {reason}")]
    InvalidNamespace { value: String, reason: String },
}

/// A hostname that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domain(String);

/// A DNS-1123 label usable as a Kubernetes namespace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace(String);

impl Domain {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Namespace {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The validated domain and the namespace the deployment goes into
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub domain: Domain,
    pub namespace: Namespace,
}

/// Validate a hostname: dot-separated labels of 1-63 alphanumerics with internal hyphens.
pub fn validate_domain(value: &str) -> Result<Domain, ValidationError> {
    let invalid = |reason: &str| ValidationError::InvalidDomain {
        value: value.to_string(),
        reason: reason.to_string(),
    };

    if value.is_empty() {
        return Err(invalid("must not be empty"));
    }
    if value.len() > MAX_DOMAIN_LEN {
        return Err(invalid("longer than 253 characters"));
    }

    for label in value.split('.') {
        if label.is_empty() {
            return Err(invalid("contains an empty label"));
        }
        if label.len() > MAX_LABEL_LEN {
            return Err(invalid("label longer than 63 characters"));
        }
        if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(invalid("labels may only contain letters, digits and hyphens"));
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err(invalid("labels must not start or end with a hyphen"));
        }
    }

    Ok(Domain(value.to_string()))
}

/// Validate a namespace as a single DNS-1123 label.
pub fn validate_namespace(value: &str) -> Result<Namespace, ValidationError> {
    let invalid = |reason: &str| ValidationError::InvalidNamespace {
        value: value.to_string(),
        reason: reason.to_string(),
    };

    if value.is_empty() {
        return Err(invalid("must not be empty"));
    }
    if value.len() > MAX_LABEL_LEN {
        return Err(invalid("longer than 63 characters"));
    }
    if !value
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(invalid("may only contain lowercase letters, digits and hyphens"));
    }
    if value.starts_with('-') || value.ends_with('-') {
        return Err(invalid("must start and end with a letter or digit"));
    }

    Ok(Namespace(value.to_string()))
}

/// Derive the namespace for a domain: `wordpress-` followed by the domain with every
/// non-alphanumeric character replaced by a hyphen, truncated to 20 characters.
pub fn derive_namespace(domain: &Domain) -> Namespace {
    let derived: String = domain
        .as_str()
        .to_ascii_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .take(DERIVED_MAX_LEN)
        .collect();

    Namespace(format!("{}{}", PREFIX, derived.trim_end_matches('-')))
}

/// Validate the command-line inputs, deriving the namespace when none was given.
pub fn resolve_target(domain: &str, namespace: Option<&str>) -> Result<Target, ValidationError> {
    let domain = validate_domain(domain)?;
    let namespace = match namespace {
        Some(ns) => validate_namespace(ns)?,
        None => derive_namespace(&domain),
    };

    Ok(Target { domain, namespace })
}
