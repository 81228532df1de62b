// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Cluster runtime bootstrap

use crate::config::RuntimeConfig;
use crate::error::{KubepressError, Result};
use tokio::process::Command;
use tracing::{info, instrument};

/// Make sure the cluster runtime is installed, running its installer when allowed.
#[instrument(skip(config))]
pub async fn ensure_runtime(config: &RuntimeConfig) -> Result<()> {
    if tokio::fs::try_exists(&config.kubeconfig).await? {
        info!("Cluster runtime present ({})", config.kubeconfig.display());
        return Ok(());
    }

    if !config.install {
        return Err(KubepressError::PrerequisiteMissing(format!(
            "cluster runtime kubeconfig {} not found and runtime installation is disabled",
            config.kubeconfig.display()
        )));
    }

    info!("Cluster runtime not found, running installer: {}", config.installer);
    let status = Command::new("sh")
        .arg("-c")
        .arg(&config.installer)
        .status()
        .await?;

    if !status.success() {
        return Err(KubepressError::ExternalCommandFailure(format!(
            "runtime installer exited with {}",
            status
        )));
    }

    info!("Cluster runtime installed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn runtime(kubeconfig: PathBuf, install: bool, installer: &str) -> RuntimeConfig {
        RuntimeConfig {
            install,
            kubeconfig,
            installer: installer.to_string(),
        }
    }

    #[tokio::test]
    async fn test_present_runtime_is_left_alone() {
        let file = tempfile::NamedTempFile::new().unwrap();
        // The installer would fail if it ran
        let config = runtime(file.path().to_path_buf(), true, "exit 1");

        ensure_runtime(&config).await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_runtime_without_install_is_a_missing_prerequisite() {
        let dir = tempfile::tempdir().unwrap();
        let config = runtime(dir.path().join("k3s.yaml"), false, "true");

        let err = ensure_runtime(&config).await.unwrap_err();
        assert!(matches!(err, KubepressError::PrerequisiteMissing(_)));
    }

    #[tokio::test]
    async fn test_installer_runs_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let kubeconfig = dir.path().join("k3s.yaml");
        let installer = format!("touch {}", kubeconfig.display());
        let config = runtime(kubeconfig.clone(), true, &installer);

        ensure_runtime(&config).await.unwrap();
        assert!(kubeconfig.exists());
    }

    #[tokio::test]
    async fn test_failing_installer_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let config = runtime(dir.path().join("k3s.yaml"), true, "exit 3");

        let err = ensure_runtime(&config).await.unwrap_err();
        assert!(matches!(err, KubepressError::ExternalCommandFailure(_)));
    }
}
