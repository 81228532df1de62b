// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Command-line arguments for both binaries

use crate::config::Config;
use crate::constants::php::DEFAULT_SELECTOR;
use crate::validation::{validate_namespace, Namespace, ValidationError};
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

/// Exit code for usage errors, including `--help`
pub const USAGE_EXIT_CODE: i32 = 2;

/// Provision WordPress with MySQL on a k3s cluster
#[derive(Debug, Parser, PartialEq, Eq)]
#[command(name = "kubepress", version)]
pub struct DeployArgs {
    /// Domain the site is served on, e.g. blog.example.com
    pub domain: String,

    /// Namespace to deploy into; derived from the domain when omitted
    pub namespace: Option<String>,

    /// Base directory for generated manifests and credentials
    #[arg(long)]
    pub deploy_dir: Option<PathBuf>,

    /// Kubeconfig file to use instead of the k3s kubeconfig
    #[arg(long)]
    pub kubeconfig: Option<PathBuf>,

    /// Install the cluster runtime when it is missing
    #[arg(long)]
    pub install_runtime: bool,
}

impl DeployArgs {
    /// Apply command-line overrides on top of the environment configuration
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(dir) = &self.deploy_dir {
            config.deploy_dir = dir.clone();
        }
        if let Some(kubeconfig) = &self.kubeconfig {
            config.cluster.kubeconfig = Some(kubeconfig.clone());
        }
        if self.install_runtime {
            config.runtime.install = true;
        }
    }
}

/// Log to stderr so the credential summary on stdout stays clean. `RUST_LOG`
/// overrides the default `info` level.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Raise PHP upload and memory limits in a running WordPress pod
#[derive(Debug, Parser, PartialEq, Eq)]
#[command(name = "kubepress-php-limits", version)]
pub struct PhpLimitsArgs {
    /// Namespace the WordPress deployment runs in
    pub namespace: String,

    /// Label selector of the WordPress pod
    #[arg(long, default_value = DEFAULT_SELECTOR)]
    pub selector: String,

    /// Kubeconfig file to use instead of the k3s kubeconfig
    #[arg(long)]
    pub kubeconfig: Option<PathBuf>,
}

impl PhpLimitsArgs {
    /// The namespace argument, checked before anything talks to the cluster
    pub fn validated_namespace(&self) -> Result<Namespace, ValidationError> {
        validate_namespace(&self.namespace)
    }
}

/// Parse arguments. Help, version and every parse error come back as the text to
/// print, so callers exit nonzero for all of them.
pub fn parse<T, I, S>(args: I) -> Result<T, String>
where
    T: Parser,
    I: IntoIterator<Item = S>,
    S: Into<OsString> + Clone,
{
    T::try_parse_from(args).map_err(|e| e.render().to_string())
}
