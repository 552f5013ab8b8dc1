use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::error::{AutoscalerError, AutoscalerResult};
use crate::params::DefaultParams;
use crate::target::{TargetError, TargetRef};

/// Environment variable holding the autoscaler's own namespace, set through
/// the downward API.
pub const NAMESPACE_ENV_VAR: &str = "MY_POD_NAMESPACE";

pub const DEFAULT_POLL_PERIOD_SECONDS: i64 = 10;

/// Source of environment values used while building defaults.
pub trait EnvSource {
    fn var(&self, key: &str) -> Option<String>;
}

/// Reads the real process environment.
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Startup configuration of the autoscaler.
#[derive(Debug, Clone, Serialize)]
pub struct AutoScalerConfig {
    /// `kind/name` or `resource.group[.version]/name`.
    pub target: String,
    /// ConfigMap holding the scaling parameters.
    pub config_map: String,
    pub namespace: String,
    /// Written to the ConfigMap when it does not exist yet.
    pub default_params: DefaultParams,
    pub poll_period_seconds: i64,
    pub print_version: bool,
    /// Comma separated `key=value` label selectors, passed through untouched.
    pub node_labels: String,
    /// Consecutive polling failures tolerated before exiting; 0 is unlimited.
    pub max_sync_failures: i64,
}

impl Default for AutoScalerConfig {
    fn default() -> Self {
        Self {
            target: String::new(),
            config_map: String::new(),
            namespace: String::new(),
            default_params: DefaultParams::default(),
            poll_period_seconds: DEFAULT_POLL_PERIOD_SECONDS,
            print_version: false,
            node_labels: String::new(),
            max_sync_failures: 0,
        }
    }
}

/// A single failed check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    Target(TargetError),
    EmptyConfigMap,
    EmptyNamespace,
    PollPeriodTooShort(i64),
}

impl Violation {
    /// The flag to fix.
    pub fn flag(&self) -> &'static str {
        match self {
            Self::Target(_) => "--target",
            Self::EmptyConfigMap => "--configmap",
            Self::EmptyNamespace => "--namespace",
            Self::PollPeriodTooShort(_) => "--poll-period-seconds",
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Target(e) => write!(f, "{e}"),
            Self::EmptyConfigMap => write!(f, "--configmap parameter cannot be empty"),
            Self::EmptyNamespace => {
                write!(f, "--namespace parameter not set and failed to fallback")
            }
            Self::PollPeriodTooShort(_) => {
                write!(f, "--poll-period-seconds cannot be less than 1")
            }
        }
    }
}

impl AutoScalerConfig {
    /// Defaults with the namespace taken from the process environment.
    pub fn new() -> Self {
        Self::from_env(&ProcessEnv)
    }

    /// Defaults with the namespace looked up in `env`. Missing means empty.
    pub fn from_env(env: &impl EnvSource) -> Self {
        Self {
            namespace: env.var(NAMESPACE_ENV_VAR).unwrap_or_default(),
            ..Self::default()
        }
    }

    /// Lowercase the target and run every check, collecting all failures.
    pub fn violations(&mut self) -> Vec<Violation> {
        self.target = self.target.to_lowercase();

        let mut violations = Vec::new();
        if let Err(e) = TargetRef::parse(&self.target) {
            violations.push(Violation::Target(e));
        }
        if self.config_map.is_empty() {
            violations.push(Violation::EmptyConfigMap);
        }
        if self.namespace.is_empty() {
            violations.push(Violation::EmptyNamespace);
        }
        if self.poll_period_seconds < 1 {
            violations.push(Violation::PollPeriodTooShort(self.poll_period_seconds));
        }
        violations
    }

    /// Validate the flags, logging every violation before failing once.
    pub fn validate_flags(&mut self) -> AutoscalerResult<()> {
        let violations = self.violations();
        for violation in &violations {
            tracing::error!(flag = violation.flag(), "{violation}");
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(AutoscalerError::Validation(
                "failed to validate all input parameters".into(),
            ))
        }
    }

    /// Parsed target. Only meaningful once the flags have been validated.
    pub fn target_ref(&self) -> Result<TargetRef, TargetError> {
        TargetRef::parse(&self.target)
    }

    pub fn poll_period(&self) -> Duration {
        Duration::from_secs(self.poll_period_seconds.max(0) as u64)
    }

    /// `None` when failures are unlimited.
    pub fn max_sync_failures_limit(&self) -> Option<u64> {
        if self.max_sync_failures > 0 {
            Some(self.max_sync_failures as u64)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> AutoScalerConfig {
        AutoScalerConfig {
            target: "deployment/x".into(),
            config_map: "cm".into(),
            namespace: "ns".into(),
            poll_period_seconds: 10,
            ..Default::default()
        }
    }

    #[test]
    fn valid_config_passes() {
        let mut config = valid_config();
        assert!(config.violations().is_empty());
        assert!(config.validate_flags().is_ok());
    }

    #[test]
    fn every_violation_is_reported() {
        let mut config = AutoScalerConfig {
            target: String::new(),
            config_map: String::new(),
            namespace: String::new(),
            poll_period_seconds: 0,
            ..Default::default()
        };

        assert_eq!(
            config.violations(),
            vec![
                Violation::Target(TargetError::Empty),
                Violation::EmptyConfigMap,
                Violation::EmptyNamespace,
                Violation::PollPeriodTooShort(0),
            ]
        );

        let err = config.validate_flags().unwrap_err();
        assert!(matches!(err, AutoscalerError::Validation(_)));
        assert_eq!(err.to_string(), "failed to validate all input parameters");
    }

    #[test]
    fn target_is_lowercased() {
        let mut config = AutoScalerConfig {
            target: "Deployment/Foo".into(),
            ..valid_config()
        };
        config.validate_flags().unwrap();
        assert_eq!(config.target, "deployment/foo");
        assert_eq!(config.target_ref().unwrap().name(), "foo");
    }

    #[test]
    fn bad_target_alone_fails() {
        let mut config = AutoScalerConfig {
            target: "pod/x".into(),
            ..valid_config()
        };
        let violations = config.violations();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].flag(), "--target");
        assert!(config.validate_flags().is_err());
    }

    #[test]
    fn negative_poll_period_fails() {
        let mut config = AutoScalerConfig {
            poll_period_seconds: -5,
            ..valid_config()
        };
        assert_eq!(config.violations(), vec![Violation::PollPeriodTooShort(-5)]);
    }

    #[test]
    fn namespace_falls_back_to_env() {
        let env = HashMap::from([(NAMESPACE_ENV_VAR.to_string(), "kube-system".to_string())]);
        let config = AutoScalerConfig::from_env(&env);
        assert_eq!(config.namespace, "kube-system");
        assert_eq!(config.poll_period_seconds, DEFAULT_POLL_PERIOD_SECONDS);
        assert!(!config.print_version);
        assert!(config.default_params.is_empty());
    }

    #[test]
    fn missing_env_leaves_namespace_empty() {
        let mut config = AutoScalerConfig::from_env(&HashMap::<String, String>::new());
        config.target = "deployment/x".into();
        config.config_map = "cm".into();

        assert!(config.namespace.is_empty());
        assert_eq!(config.violations(), vec![Violation::EmptyNamespace]);
    }

    #[test]
    fn node_labels_are_not_validated() {
        let mut config = AutoScalerConfig {
            node_labels: "not a selector,,=".into(),
            ..valid_config()
        };
        assert!(config.violations().is_empty());
    }

    #[test]
    fn violation_messages_name_the_flag() {
        assert_eq!(
            Violation::EmptyConfigMap.to_string(),
            "--configmap parameter cannot be empty"
        );
        assert_eq!(
            Violation::EmptyNamespace.to_string(),
            "--namespace parameter not set and failed to fallback"
        );
        assert_eq!(
            Violation::PollPeriodTooShort(0).to_string(),
            "--poll-period-seconds cannot be less than 1"
        );
        assert_eq!(
            Violation::Target(TargetError::Empty).to_string(),
            "--target parameter cannot be empty"
        );
    }

    #[test]
    fn derived_settings() {
        let mut config = valid_config();
        assert_eq!(config.poll_period(), Duration::from_secs(10));
        assert_eq!(config.max_sync_failures_limit(), None);

        config.max_sync_failures = 3;
        assert_eq!(config.max_sync_failures_limit(), Some(3));

        config.max_sync_failures = -1;
        assert_eq!(config.max_sync_failures_limit(), None);
    }
}
