//! Configuration surface of the cluster-proportional autoscaler: flag
//! defaults, the scale target parser and the `--default-params` codec.

pub mod config;
pub mod error;
pub mod params;
pub mod target;

pub use config::{AutoScalerConfig, EnvSource, ProcessEnv, Violation};
pub use error::{AutoscalerError, AutoscalerResult};
pub use params::DefaultParams;
pub use target::{is_target_format_valid, TargetError, TargetRef};
