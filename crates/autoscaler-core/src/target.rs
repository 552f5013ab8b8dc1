//! Scale target references.
//!
//! A target is `<resource>/<name>` where `<resource>` is either a known
//! workload kind (`deployment`, `replicaset`, `statefulset`,
//! `replicationcontroller`, matched by prefix) or a qualified
//! `resource.group` / `resource.version.group` form. This is a syntactic
//! pre-check only; nothing here talks to the API server.

use std::fmt;

use thiserror::Error;

/// Kinds accepted without a group qualifier. Matched as prefixes, so plurals
/// such as `deployments` pass as well.
const KNOWN_KIND_PREFIXES: [&str; 4] = [
    "deployment",
    "replicaset",
    "statefulset",
    "replicationcontroller",
];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TargetError {
    #[error("--target parameter cannot be empty")]
    Empty,

    #[error("--target must include resource and name")]
    MissingResourceOrName,

    #[error("--target must include valid resource {0:?}")]
    InvalidResource(Vec<String>),
}

/// A target split into its resource and name parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetRef {
    resource: String,
    name: String,
}

impl TargetRef {
    /// Parse a target reference. The input is taken as-is; callers that want
    /// case-insensitive matching lowercase it first.
    pub fn parse(target: &str) -> Result<Self, TargetError> {
        if target.is_empty() {
            return Err(TargetError::Empty);
        }

        let (resource, name) = match target.split('/').collect::<Vec<_>>().as_slice() {
            [resource, name] => (*resource, *name),
            _ => return Err(TargetError::MissingResourceOrName),
        };

        let segments: Vec<&str> = resource.split('.').collect();
        let qualified = segments.len() == 2 || segments.len() == 3;
        let known_kind = KNOWN_KIND_PREFIXES
            .iter()
            .any(|prefix| resource.starts_with(prefix));

        if !qualified && !known_kind {
            return Err(TargetError::InvalidResource(
                segments.into_iter().map(String::from).collect(),
            ));
        }

        Ok(Self {
            resource: resource.to_string(),
            name: name.to_string(),
        })
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// May be empty: only the presence of the separator is checked.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The resource part split on `.`, e.g. `["myresource", "mygroup"]`.
    pub fn resource_segments(&self) -> Vec<&str> {
        self.resource.split('.').collect()
    }
}

impl fmt::Display for TargetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.resource, self.name)
    }
}

/// Returns whether `target` names a legal scale target, logging the reason
/// when it does not.
pub fn is_target_format_valid(target: &str) -> bool {
    match TargetRef::parse(target) {
        Ok(_) => true,
        Err(e) => {
            tracing::error!(flag = "--target", value = %target, "{e}");
            false
        }
    }
}
