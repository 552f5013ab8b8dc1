use clap::Parser;

use autoscaler_core::config::{EnvSource, DEFAULT_POLL_PERIOD_SECONDS};
use autoscaler_core::{AutoScalerConfig, DefaultParams};

#[derive(Parser, Debug)]
#[command(
    name = "cluster-proportional-autoscaler",
    about = "Scales a workload in proportion to the size of the cluster",
    disable_version_flag = true,
    args_override_self = true
)]
pub struct Args {
    /// Target to scale. In format: deployment/*, replicaset/*, statefulset/* or resource.group (not case sensitive).
    #[arg(long, default_value = "")]
    pub target: String,

    /// ConfigMap containing our scaling parameters.
    #[arg(long = "configmap", default_value = "")]
    pub config_map: String,

    /// Namespace for all operations, fallback to the namespace of this autoscaler(through MY_POD_NAMESPACE env) if not specified.
    #[arg(long)]
    pub namespace: Option<String>,

    /// The time, in seconds, to check cluster status and perform autoscale.
    #[arg(long, default_value_t = DEFAULT_POLL_PERIOD_SECONDS, allow_negative_numbers = true)]
    pub poll_period_seconds: i64,

    /// Print the version and exit.
    #[arg(long = "version")]
    pub print_version: bool,

    /// Default parameters(JSON format) for auto-scaling. Will create/re-create a ConfigMap with this default params if ConfigMap is not present.
    #[arg(long, value_name = DefaultParams::TYPE_NAME)]
    pub default_params: Option<DefaultParams>,

    /// NodeLabels for filtering search of nodes and its cpus by LabelSelectors. Input format is a comma separated list of keyN=valueN LabelSelectors. Usage example: --nodelabels=label1=value1,label2=value2.
    #[arg(long = "nodelabels", default_value = "")]
    pub node_labels: String,

    /// Number of consecutive polling failures before exiting. Default value of 0 will allow for unlimited retries.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub max_sync_failures: i64,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Overlay the parsed flags on the defaults derived from `env`.
    pub fn into_config(self, env: &impl EnvSource) -> AutoScalerConfig {
        let mut config = AutoScalerConfig::from_env(env);
        config.target = self.target;
        config.config_map = self.config_map;
        if let Some(namespace) = self.namespace {
            config.namespace = namespace;
        }
        config.poll_period_seconds = self.poll_period_seconds;
        config.print_version = self.print_version;
        if let Some(params) = self.default_params {
            config.default_params = params;
        }
        config.node_labels = self.node_labels;
        config.max_sync_failures = self.max_sync_failures;
        config
    }
}
