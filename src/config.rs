// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Tool configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Base directory holding one deployment directory per domain
    pub deploy_dir: PathBuf,
    pub cluster: ClusterConfig,
    pub runtime: RuntimeConfig,
    pub workload: WorkloadConfig,
    pub timeouts: Timeouts,
    /// "What is my IP" service queried for the credential summary
    pub public_ip_url: Url,
}

/// How to reach the cluster API. Passed explicitly to the client constructor.
#[derive(Debug, Clone, Default)]
pub struct ClusterConfig {
    pub kubeconfig: Option<PathBuf>,
    pub context: Option<String>,
}

/// Cluster runtime bootstrap settings
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Run the installer when the runtime kubeconfig is missing
    pub install: bool,
    /// Kubeconfig written by the runtime once installed
    pub kubeconfig: PathBuf,
    /// Shell command that installs the runtime
    pub installer: String,
}

/// Images, storage and ingress settings baked into the rendered manifests
#[derive(Debug, Clone)]
pub struct WorkloadConfig {
    pub mysql_image: String,
    pub wordpress_image: String,
    pub storage_class: Option<String>,
    pub mysql_storage: String,
    pub wordpress_storage: String,
    pub ingress_class: Option<String>,
    /// cert-manager ClusterIssuer; `None` disables TLS on the ingress
    pub cluster_issuer: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct Timeouts {
    pub nodes: Duration,
    pub database: Duration,
    pub application: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            install: false,
            kubeconfig: PathBuf::from("/etc/rancher/k3s/k3s.yaml"),
            installer: "curl -sfL https://get.k3s.io | sh -".to_string(),
        }
    }
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            mysql_image: "mysql:8.0".to_string(),
            wordpress_image: "wordpress:6-php8.2-apache".to_string(),
            storage_class: Some("local-path".to_string()),
            mysql_storage: "10Gi".to_string(),
            wordpress_storage: "10Gi".to_string(),
            ingress_class: Some("traefik".to_string()),
            cluster_issuer: Some("letsencrypt-prod".to_string()),
        }
    }
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            nodes: Duration::from_secs(120),
            database: Duration::from_secs(300),
            application: Duration::from_secs(300),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup. Unset keys fall back to defaults,
    /// empty values disable optional settings.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let runtime_defaults = RuntimeConfig::default();
        let workload_defaults = WorkloadConfig::default();
        let timeout_defaults = Timeouts::default();

        let string_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let optional = |key: &str, default: Option<String>| match lookup(key) {
            Some(v) if v.is_empty() => None,
            Some(v) => Some(v),
            None => default,
        };
        let secs = |key: &str, default: Duration| -> Result<Duration> {
            match lookup(key) {
                Some(v) => v
                    .parse::<u64>()
                    .map(Duration::from_secs)
                    .with_context(|| format!("{} must be a number of seconds, got '{}'", key, v)),
                None => Ok(default),
            }
        };

        let install: bool = match lookup("KUBEPRESS_INSTALL_RUNTIME") {
            Some(v) => v
                .parse()
                .with_context(|| format!("KUBEPRESS_INSTALL_RUNTIME must be true or false, got '{}'", v))?,
            None => runtime_defaults.install,
        };

        let public_ip_url = string_or("KUBEPRESS_PUBLIC_IP_URL", "https://api.ipify.org");
        let public_ip_url = Url::parse(&public_ip_url)
            .with_context(|| format!("KUBEPRESS_PUBLIC_IP_URL is not a valid URL: {}", public_ip_url))?;

        Ok(Config {
            deploy_dir: PathBuf::from(string_or("KUBEPRESS_DEPLOY_DIR", "./deployments")),
            cluster: ClusterConfig {
                kubeconfig: optional("KUBEPRESS_KUBECONFIG", None).map(PathBuf::from),
                context: optional("KUBEPRESS_KUBE_CONTEXT", None),
            },
            runtime: RuntimeConfig {
                install,
                kubeconfig: lookup("KUBEPRESS_RUNTIME_KUBECONFIG")
                    .map(PathBuf::from)
                    .unwrap_or(runtime_defaults.kubeconfig),
                installer: lookup("KUBEPRESS_RUNTIME_INSTALLER").unwrap_or(runtime_defaults.installer),
            },
            workload: WorkloadConfig {
                mysql_image: string_or("KUBEPRESS_MYSQL_IMAGE", &workload_defaults.mysql_image),
                wordpress_image: string_or("KUBEPRESS_WORDPRESS_IMAGE", &workload_defaults.wordpress_image),
                storage_class: optional("KUBEPRESS_STORAGE_CLASS", workload_defaults.storage_class),
                mysql_storage: string_or("KUBEPRESS_MYSQL_STORAGE", &workload_defaults.mysql_storage),
                wordpress_storage: string_or(
                    "KUBEPRESS_WORDPRESS_STORAGE",
                    &workload_defaults.wordpress_storage,
                ),
                ingress_class: optional("KUBEPRESS_INGRESS_CLASS", workload_defaults.ingress_class),
                cluster_issuer: optional("KUBEPRESS_CLUSTER_ISSUER", workload_defaults.cluster_issuer),
            },
            timeouts: Timeouts {
                nodes: secs("KUBEPRESS_NODE_TIMEOUT_SECS", timeout_defaults.nodes)?,
                database: secs("KUBEPRESS_DB_TIMEOUT_SECS", timeout_defaults.database)?,
                application: secs("KUBEPRESS_APP_TIMEOUT_SECS", timeout_defaults.application)?,
            },
            public_ip_url,
        })
    }

    /// The cluster connection settings to use. Without an explicit kubeconfig the
    /// runtime's own kubeconfig is used.
    pub fn cluster_config(&self) -> ClusterConfig {
        let mut cluster = self.cluster.clone();
        if cluster.kubeconfig.is_none() {
            cluster.kubeconfig = Some(self.runtime.kubeconfig.clone());
        }
        cluster
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.deploy_dir, PathBuf::from("./deployments"));
        assert!(config.cluster.kubeconfig.is_none());
        assert!(!config.runtime.install);
        assert_eq!(config.workload.mysql_image, "mysql:8.0");
        assert_eq!(config.workload.cluster_issuer.as_deref(), Some("letsencrypt-prod"));
        assert_eq!(config.timeouts.database, Duration::from_secs(300));
        assert_eq!(config.public_ip_url.as_str(), "https://api.ipify.org/");
    }

    #[test]
    fn test_overrides_are_applied() {
        let config = config_from(&[
            ("KUBEPRESS_DEPLOY_DIR", "/srv/sites"),
            ("KUBEPRESS_KUBECONFIG", "/tmp/kubeconfig"),
            ("KUBEPRESS_WORDPRESS_IMAGE", "wordpress:6.5"),
            ("KUBEPRESS_APP_TIMEOUT_SECS", "42"),
        ])
        .unwrap();

        assert_eq!(config.deploy_dir, PathBuf::from("/srv/sites"));
        assert_eq!(config.cluster.kubeconfig, Some(PathBuf::from("/tmp/kubeconfig")));
        assert_eq!(config.workload.wordpress_image, "wordpress:6.5");
        assert_eq!(config.timeouts.application, Duration::from_secs(42));
    }

    #[test]
    fn test_empty_value_disables_optional_setting() {
        let config = config_from(&[("KUBEPRESS_CLUSTER_ISSUER", ""), ("KUBEPRESS_STORAGE_CLASS", "")]).unwrap();

        assert!(config.workload.cluster_issuer.is_none());
        assert!(config.workload.storage_class.is_none());
    }

    #[test]
    fn test_invalid_timeout_is_rejected() {
        assert!(config_from(&[("KUBEPRESS_DB_TIMEOUT_SECS", "soon")]).is_err());
    }

    #[test]
    fn test_invalid_install_flag_is_rejected() {
        assert!(config_from(&[("KUBEPRESS_INSTALL_RUNTIME", "maybe")]).is_err());
    }

    #[test]
    fn test_cluster_config_defaults_to_runtime_kubeconfig() {
        let config = config_from(&[]).unwrap();

        assert!(!config.runtime.install);
        assert_eq!(
            config.cluster_config().kubeconfig,
            Some(PathBuf::from("/etc/rancher/k3s/k3s.yaml"))
        );
    }

    #[tokio::test]
    async fn test_present_runtime_kubeconfig_is_used_for_the_client() {
        let dir = tempfile::tempdir().unwrap();
        let k3s = dir.path().join("k3s.yaml");
        std::fs::write(&k3s, "apiVersion: v1\nkind: Config\n").unwrap();
        let config = config_from(&[("KUBEPRESS_RUNTIME_KUBECONFIG", k3s.to_str().unwrap())]).unwrap();

        crate::runtime::ensure_runtime(&config.runtime).await.unwrap();

        assert_eq!(config.cluster_config().kubeconfig, Some(k3s));
    }

    #[test]
    fn test_cluster_config_follows_runtime_kubeconfig_override() {
        let config = config_from(&[("KUBEPRESS_RUNTIME_KUBECONFIG", "/opt/k3s/k3s.yaml")]).unwrap();

        assert_eq!(
            config.cluster_config().kubeconfig,
            Some(PathBuf::from("/opt/k3s/k3s.yaml"))
        );
    }

    #[test]
    fn test_cluster_config_uses_runtime_kubeconfig_when_installing() {
        let config = config_from(&[("KUBEPRESS_INSTALL_RUNTIME", "true")]).unwrap();

        assert_eq!(
            config.cluster_config().kubeconfig,
            Some(PathBuf::from("/etc/rancher/k3s/k3s.yaml"))
        );
    }

    #[test]
    fn test_cluster_config_prefers_explicit_kubeconfig() {
        let config = config_from(&[
            ("KUBEPRESS_INSTALL_RUNTIME", "true"),
            ("KUBEPRESS_KUBECONFIG", "/home/me/.kube/config"),
        ])
        .unwrap();

        assert_eq!(
            config.cluster_config().kubeconfig,
            Some(PathBuf::from("/home/me/.kube/config"))
        );
    }
}
