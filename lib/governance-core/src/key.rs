//! Rule identifiers and storage path resolution

use crate::{GovernanceError, Result};
use governance_api::v1::{CONDITION_RULE_SUFFIX, TAG_RULE_SUFFIX};
use governance_api::{Scope, TargetRef};

/// Kind of rule stored under a path
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RuleKind {
    /// Condition routes and the access lists sharing their document
    ConditionRoute,
    TagRoute,
}

impl RuleKind {
    fn suffix(&self) -> &'static str {
        match self {
            RuleKind::ConditionRoute => CONDITION_RULE_SUFFIX,
            RuleKind::TagRoute => TAG_RULE_SUFFIX,
        }
    }
}

/// Escape path separators so an identifier can be used as a single path segment
pub fn escape_key(identifier: &str) -> String {
    identifier.replace('/', "*")
}

/// Reverse of [`escape_key`]
pub fn unescape_key(key: &str) -> String {
    key.replace('*', "/")
}

/// Resolve the configuration store path of a rule
pub fn resolve_path(identifier: &str, kind: RuleKind) -> Result<String> {
    if identifier.trim().is_empty() {
        return Err(GovernanceError::InvalidRequest(
            "rule identifier must not be empty".to_string(),
        ));
    }
    Ok(format!("{}{}", escape_key(identifier), kind.suffix()))
}

/// A fully qualified service: interface plus optional version and group
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ServiceRef {
    pub interface: String,
    pub version: Option<String>,
    pub group: Option<String>,
}

impl ServiceRef {
    pub fn new(interface: impl Into<String>) -> Self {
        Self {
            interface: interface.into(),
            version: None,
            group: None,
        }
    }

    /// Rule identifier in `interface:version:group` form. Missing parts stay
    /// as empty segments so the identifier shape is stable.
    pub fn id(&self) -> String {
        format!(
            "{}:{}:{}",
            self.interface,
            self.version.as_deref().unwrap_or_default(),
            self.group.as_deref().unwrap_or_default()
        )
    }

    /// Split an identifier back into its parts. Escaped separators in the
    /// interface are restored.
    pub fn from_id(id: &str) -> Self {
        let mut parts = id.split(':');
        let interface = unescape_key(parts.next().unwrap_or_default());
        let version = parts.next().filter(|v| !v.is_empty()).map(str::to_string);
        let group = parts.next().filter(|g| !g.is_empty()).map(str::to_string);
        Self {
            interface,
            version,
            group,
        }
    }
}

/// Validated rule target
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RuleTarget {
    Service(ServiceRef),
    Application(String),
}

impl RuleTarget {
    /// Validate a caller supplied target: exactly one of service and
    /// application must be set and non-empty
    pub fn from_ref(target: &TargetRef) -> Result<Self> {
        let service = non_empty(&target.service);
        let application = non_empty(&target.application);

        match (service, application) {
            (Some(interface), None) => Ok(RuleTarget::Service(ServiceRef {
                interface: interface.to_string(),
                version: non_empty(&target.service_version).map(str::to_string),
                group: non_empty(&target.service_group).map(str::to_string),
            })),
            (None, Some(application)) => Ok(RuleTarget::Application(application.to_string())),
            (Some(_), Some(_)) => Err(GovernanceError::InvalidRequest(
                "only one of service and application may be set".to_string(),
            )),
            (None, None) => Err(GovernanceError::InvalidRequest(
                "either service or application must be set".to_string(),
            )),
        }
    }

    /// Rebuild a target from a rule identifier and the scope of its document
    pub fn from_id(id: &str, scope: Scope) -> Self {
        match scope {
            Scope::Service => RuleTarget::Service(ServiceRef::from_id(id)),
            Scope::Application => RuleTarget::Application(id.to_string()),
        }
    }

    pub fn id(&self) -> String {
        match self {
            RuleTarget::Service(service) => service.id(),
            RuleTarget::Application(name) => name.clone(),
        }
    }

    /// Document key: the identifier with `/` escaped
    pub fn key(&self) -> String {
        escape_key(&self.id())
    }

    pub fn scope(&self) -> Scope {
        match self {
            RuleTarget::Service(_) => Scope::Service,
            RuleTarget::Application(_) => Scope::Application,
        }
    }

    pub fn path(&self, kind: RuleKind) -> Result<String> {
        resolve_path(&self.id(), kind)
    }

    /// API shape of the target
    pub fn to_ref(&self) -> TargetRef {
        match self {
            RuleTarget::Service(service) => TargetRef {
                service: Some(service.interface.clone()),
                service_version: service.version.clone(),
                service_group: service.group.clone(),
                application: None,
            },
            RuleTarget::Application(name) => TargetRef::application(name.clone()),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
