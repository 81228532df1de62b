// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! End-to-end WordPress deployment: render, write, apply, report.

use crate::config::Config;
use crate::credentials::Credentials;
use crate::error::Result;
use crate::kubernetes::ClusterOps;
use crate::manifests::render;
use crate::plan::{deployment_plan, run};
use crate::public_ip::resolve_public_ip;
use crate::report::{CredentialReport, DeploymentDir};
use crate::validation::Target;
use std::path::PathBuf;
use tracing::{info, instrument, warn};

/// Result of a successful deployment
#[derive(Debug)]
pub struct DeployOutcome {
    pub report: CredentialReport,
    pub report_path: PathBuf,
    pub completed_steps: Vec<&'static str>,
}

/// Deploy WordPress for a validated target
#[instrument(skip_all, fields(domain = %target.domain, namespace = %target.namespace))]
pub async fn deploy(
    cluster: &dyn ClusterOps,
    target: &Target,
    config: &Config,
    http: &reqwest::Client,
) -> Result<DeployOutcome> {
    let credentials = Credentials::generate();
    let manifests = render(target, &credentials, &config.workload);

    let dir = DeploymentDir::for_domain(&config.deploy_dir, &target.domain);
    dir.write_manifests(&manifests)?;
    info!("Manifests written to {}", dir.path().display());

    let plan = deployment_plan(target, &manifests, &config.timeouts)?;
    let completed_steps = run(cluster, &plan).await.into_result()?;

    let resources = match cluster.namespace_resources(target.namespace.as_str()).await {
        Ok(resources) => resources,
        Err(e) => {
            warn!("Could not list resources in {}: {}", target.namespace, e);
            Vec::new()
        }
    };

    let public_ip = resolve_public_ip(http, &config.public_ip_url).await;

    let report = CredentialReport {
        domain: target.domain.clone(),
        namespace: target.namespace.clone(),
        credentials,
        public_ip,
        resources,
    };
    let report_path = dir.write_report(&report)?;

    Ok(DeployOutcome {
        report,
        report_path,
        completed_steps,
    })
}
