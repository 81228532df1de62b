// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{Context, Result};
use tracing::{error, info};

use kubepress::cli::{self, DeployArgs, USAGE_EXIT_CODE};
use kubepress::config::Config;
use kubepress::deploy::deploy;
use kubepress::kubernetes::{create_client, KubeCluster};
use kubepress::public_ip::http_client;
use kubepress::runtime::ensure_runtime;
use kubepress::validation::resolve_target;

fn main() {
    let args: DeployArgs = match cli::parse(std::env::args_os()) {
        Ok(args) => args,
        Err(usage) => {
            eprint!("{}", usage);
            std::process::exit(USAGE_EXIT_CODE);
        }
    };

    cli::init_tracing();

    let outcome = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")
        .and_then(|rt| rt.block_on(run(args)));

    if let Err(e) = outcome {
        error!("Deployment failed: {:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(args: DeployArgs) -> Result<()> {
    // Reject bad input before touching the host or the cluster
    let target = resolve_target(&args.domain, args.namespace.as_deref())?;
    info!(
        "Deploying WordPress for {} into namespace {}",
        target.domain, target.namespace
    );

    let mut config = Config::from_env()?;
    args.apply_to(&mut config);

    ensure_runtime(&config.runtime).await?;

    let client = create_client(&config.cluster_config()).await?;
    info!("Connected to Kubernetes cluster");
    let cluster = KubeCluster::new(client);

    let http = http_client().context("Failed to build HTTP client")?;
    let outcome = deploy(&cluster, &target, &config, &http).await?;

    println!("{}", outcome.report.render());
    info!(
        "Deployment complete: {} steps, credentials saved to {}",
        outcome.completed_steps.len(),
        outcome.report_path.display()
    );
    Ok(())
}
