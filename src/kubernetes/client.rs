// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Cluster client creation from explicit connection settings

use crate::config::ClusterConfig;
use crate::error::{KubepressError, Result};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config as KConfig};
use tracing::{debug, info, instrument};

/// Create a Kubernetes client from the given connection settings
#[instrument(skip(config))]
pub async fn create_client(config: &ClusterConfig) -> Result<Client> {
    let kube_config = load_kube_config(config).await?;
    info!("Connecting to cluster at {}", kube_config.cluster_url);

    Client::try_from(kube_config)
        .map_err(|e| KubepressError::KubeconfigError(format!("Failed to create client: {}", e)))
}

/// Resolve the client configuration: an explicit kubeconfig file when one is set,
/// otherwise the standard in-cluster / `~/.kube/config` inference.
pub async fn load_kube_config(config: &ClusterConfig) -> Result<KConfig> {
    let options = KubeConfigOptions {
        context: config.context.clone(),
        ..Default::default()
    };

    match &config.kubeconfig {
        Some(path) => {
            debug!("Loading kubeconfig from {}", path.display());
            let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
                KubepressError::KubeconfigError(format!(
                    "Failed to read kubeconfig {}: {}",
                    path.display(),
                    e
                ))
            })?;
            config_from_kubeconfig(&contents, &options).await
        }
        None if options.context.is_some() => KConfig::from_kubeconfig(&options)
            .await
            .map_err(|e| KubepressError::KubeconfigError(format!("Failed to load kubeconfig: {}", e))),
        None => KConfig::infer()
            .await
            .map_err(|e| KubepressError::KubeconfigError(format!("Failed to infer config: {}", e))),
    }
}

/// Build a client configuration from kubeconfig YAML
async fn config_from_kubeconfig(kubeconfig: &str, options: &KubeConfigOptions) -> Result<KConfig> {
    let kubeconfig_parsed: Kubeconfig = serde_yaml::from_str(kubeconfig)
        .map_err(|e| KubepressError::KubeconfigError(format!("Failed to parse kubeconfig: {}", e)))?;

    KConfig::from_custom_kubeconfig(kubeconfig_parsed, options)
        .await
        .map_err(|e| KubepressError::KubeconfigError(format!("Failed to create config: {}", e)))
}
