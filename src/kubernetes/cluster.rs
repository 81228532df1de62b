// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! The operations this tool needs from the cluster, and their kube-rs implementation.

use super::apply::apply_manifest;
use super::exec::{exec_in_pod, find_running_pod, ExecOutput};
use super::namespaces::apply_namespace;
use super::status::{namespace_resources, ResourceStatus};
use super::wait::{wait_for_deployment, wait_for_nodes_ready};
use crate::constants::wait::POLL_INTERVAL_SECS;
use crate::error::Result;
use crate::manifests::Manifest;
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Namespace;
use kube::Client;
use std::time::Duration;

/// Cluster operations used by the deployment plan
#[async_trait]
pub trait ClusterOps: Send + Sync {
    async fn wait_for_nodes_ready(&self, timeout: Duration) -> Result<()>;

    /// Idempotent create-or-update of the namespace
    async fn apply_namespace(&self, namespace: &Namespace) -> Result<()>;

    /// Idempotent create-or-update of every object in the manifest
    async fn apply(&self, manifest: &Manifest) -> Result<()>;

    async fn wait_for_deployment(&self, namespace: &str, name: &str, timeout: Duration) -> Result<()>;

    async fn namespace_resources(&self, namespace: &str) -> Result<Vec<ResourceStatus>>;
}

/// Pod lookup and remote command execution
#[async_trait]
pub trait PodExec: Send + Sync {
    async fn find_pod(&self, namespace: &str, selector: &str) -> Result<Option<String>>;

    async fn exec(
        &self,
        namespace: &str,
        pod: &str,
        container: Option<&str>,
        command: &[String],
    ) -> Result<ExecOutput>;
}

/// `ClusterOps` and `PodExec` backed by a kube-rs client
#[derive(Clone)]
pub struct KubeCluster {
    client: Client,
    poll_interval: Duration,
}

impl KubeCluster {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            poll_interval: Duration::from_secs(POLL_INTERVAL_SECS),
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

#[async_trait]
impl ClusterOps for KubeCluster {
    async fn wait_for_nodes_ready(&self, timeout: Duration) -> Result<()> {
        wait_for_nodes_ready(&self.client, timeout, self.poll_interval).await
    }

    async fn apply_namespace(&self, namespace: &Namespace) -> Result<()> {
        apply_namespace(&self.client, namespace).await
    }

    async fn apply(&self, manifest: &Manifest) -> Result<()> {
        apply_manifest(&self.client, manifest).await
    }

    async fn wait_for_deployment(&self, namespace: &str, name: &str, timeout: Duration) -> Result<()> {
        wait_for_deployment(&self.client, namespace, name, timeout, self.poll_interval).await
    }

    async fn namespace_resources(&self, namespace: &str) -> Result<Vec<ResourceStatus>> {
        namespace_resources(&self.client, namespace).await
    }
}

#[async_trait]
impl PodExec for KubeCluster {
    async fn find_pod(&self, namespace: &str, selector: &str) -> Result<Option<String>> {
        find_running_pod(&self.client, namespace, selector).await
    }

    async fn exec(
        &self,
        namespace: &str,
        pod: &str,
        container: Option<&str>,
        command: &[String],
    ) -> Result<ExecOutput> {
        exec_in_pod(&self.client, namespace, pod, container, command).await
    }
}
