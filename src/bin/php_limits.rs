// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::Result;
use tracing::{error, info};

use kubepress::cli::{self, PhpLimitsArgs, USAGE_EXIT_CODE};
use kubepress::config::Config;
use kubepress::kubernetes::{create_client, KubeCluster};
use kubepress::php_limits::{patch_php_limits, PhpLimits};

#[tokio::main]
async fn main() {
    let args: PhpLimitsArgs = match cli::parse(std::env::args_os()) {
        Ok(args) => args,
        Err(usage) => {
            eprint!("{}", usage);
            std::process::exit(USAGE_EXIT_CODE);
        }
    };

    cli::init_tracing();

    if let Err(e) = run(args).await {
        error!("Failed to update PHP limits: {:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(args: PhpLimitsArgs) -> Result<()> {
    // Reject a malformed namespace before touching the cluster
    let namespace = args.validated_namespace()?;

    let mut cluster_config = Config::from_env()?.cluster_config();
    if let Some(kubeconfig) = args.kubeconfig {
        cluster_config.kubeconfig = Some(kubeconfig);
    }

    let client = create_client(&cluster_config).await?;
    let cluster = KubeCluster::new(client);

    let limits = PhpLimits::default();
    let pod = patch_php_limits(&cluster, &namespace, &args.selector, &limits).await?;

    println!("Updated PHP limits in pod {}/{}:", namespace, pod);
    print!("{}", limits.render());
    info!("Restart the WordPress deployment for Apache to load the new limits");
    Ok(())
}
