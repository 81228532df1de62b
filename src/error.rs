// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use thiserror::Error;

use crate::validation::ValidationError;

#[derive(Error, Debug)]
pub enum KubepressError {
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    #[error("Prerequisite missing: {0}")]
    PrerequisiteMissing(String),

    #[error("External command failed: {0}")]
    ExternalCommandFailure(String),

    #[error("Cluster not ready: {0}")]
    ClusterNotReady(String),

    #[error("Deployment {name} not available after {secs}s")]
    DeploymentTimeout { name: String, secs: u64 },

    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("Failed to load kubeconfig: {0}")]
    KubeconfigError(String),

    #[error("Failed to render manifest: {0}")]
    RenderError(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid deployment plan: {0}")]
    InvalidPlan(String),
}

pub type Result<T> = std::result::Result<T, KubepressError>;
