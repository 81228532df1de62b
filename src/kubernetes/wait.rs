// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Blocking waits on readiness conditions reported by the cluster

use crate::error::{KubepressError, Result};
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Node;
use kube::{api::ListParams, Api, Client};
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, instrument, warn};

/// Wait until at least one node reports `Ready=True`.
/// API errors are retried until the timeout, the API server may still be starting.
#[instrument(skip(client))]
pub async fn wait_for_nodes_ready(client: &Client, timeout: Duration, poll: Duration) -> Result<()> {
    let nodes: Api<Node> = Api::all(client.clone());
    let start = Instant::now();

    loop {
        match nodes.list(&ListParams::default()).await {
            Ok(list) if list.items.iter().any(is_node_ready) => {
                info!("Cluster node is ready");
                return Ok(());
            }
            Ok(_) => debug!("No ready node yet"),
            Err(e) => warn!("Error listing nodes: {}, retrying...", e),
        }

        if start.elapsed() >= timeout {
            return Err(KubepressError::ClusterNotReady(format!(
                "no node became ready within {}s",
                timeout.as_secs()
            )));
        }
        sleep(poll).await;
    }
}

/// Wait until a deployment reports `Available=True`
#[instrument(skip(client))]
pub async fn wait_for_deployment(
    client: &Client,
    namespace: &str,
    name: &str,
    timeout: Duration,
    poll: Duration,
) -> Result<()> {
    let deployments: Api<Deployment> = Api::namespaced(client.clone(), namespace);
    let start = Instant::now();

    info!("Waiting up to {}s for deployment {} to become available", timeout.as_secs(), name);

    loop {
        match deployments.get(name).await {
            Ok(d) if is_deployment_available(&d) => {
                info!("Deployment {} is available", name);
                return Ok(());
            }
            Ok(_) => debug!("Deployment {} not yet available", name),
            Err(kube::Error::Api(err)) if err.code == 404 => debug!("Deployment {} not found yet", name),
            Err(e) => return Err(e.into()),
        }

        if start.elapsed() >= timeout {
            return Err(KubepressError::DeploymentTimeout {
                name: name.to_string(),
                secs: timeout.as_secs(),
            });
        }
        sleep(poll).await;
    }
}

pub fn is_node_ready(node: &Node) -> bool {
    node.status
        .as_ref()
        .and_then(|s| s.conditions.as_ref())
        .is_some_and(|conditions| {
            conditions
                .iter()
                .any(|c| c.type_ == "Ready" && c.status == "True")
        })
}

pub fn is_deployment_available(deployment: &Deployment) -> bool {
    deployment
        .status
        .as_ref()
        .and_then(|s| s.conditions.as_ref())
        .is_some_and(|conditions| {
            conditions
                .iter()
                .any(|c| c.type_ == "Available" && c.status == "True")
        })
}
