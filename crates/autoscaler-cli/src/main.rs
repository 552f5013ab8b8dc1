use clap::Parser;

use autoscaler_core::ProcessEnv;

mod args;

fn main() -> anyhow::Result<()> {
    let args = args::Args::parse();

    let filter = match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = args.into_config(&ProcessEnv);

    if config.print_version {
        println!(
            "{} version: {}",
            env!("CARGO_BIN_NAME"),
            env!("CARGO_PKG_VERSION")
        );
        return Ok(());
    }

    config.validate_flags()?;

    let scale_target = config.target_ref()?;
    tracing::info!(
        scale_target = %scale_target,
        configmap = %config.config_map,
        namespace = %config.namespace,
        poll_period = ?config.poll_period(),
        max_sync_failures = ?config.max_sync_failures_limit(),
        "Autoscaler configuration validated"
    );
    tracing::debug!(
        config = %serde_json::to_string(&config)?,
        default_params = %config.default_params,
        "Effective configuration"
    );

    Ok(())
}
