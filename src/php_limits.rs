// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Raise PHP upload, memory and execution limits inside a running WordPress pod.

use crate::constants::php::{BACKUP_PATH, CONTAINER, INI_PATH, MODE, OWNER};
use crate::error::{KubepressError, Result};
use crate::kubernetes::PodExec;
use crate::validation::Namespace;
use tracing::{info, instrument};

/// Limits written to the PHP configuration file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhpLimits {
    pub upload_max_filesize: String,
    pub post_max_size: String,
    pub memory_limit: String,
    pub max_execution_time: u32,
    pub max_input_time: u32,
}

impl Default for PhpLimits {
    fn default() -> Self {
        Self {
            upload_max_filesize: "64M".to_string(),
            post_max_size: "64M".to_string(),
            memory_limit: "256M".to_string(),
            max_execution_time: 300,
            max_input_time: 300,
        }
    }
}

impl PhpLimits {
    /// Contents of the ini file
    pub fn render(&self) -> String {
        format!(
            "file_uploads = On\n\
             upload_max_filesize = {}\n\
             post_max_size = {}\n\
             memory_limit = {}\n\
             max_execution_time = {}\n\
             max_input_time = {}\n",
            self.upload_max_filesize,
            self.post_max_size,
            self.memory_limit,
            self.max_execution_time,
            self.max_input_time
        )
    }
}

fn sh(script: &str, args: &[&str]) -> Vec<String> {
    let mut command = vec!["sh".to_string(), "-c".to_string(), script.to_string(), "sh".to_string()];
    command.extend(args.iter().map(|a| a.to_string()));
    command
}

/// Locate the WordPress pod and rewrite its PHP limits, keeping a backup of the old file.
/// Returns the patched pod's name.
#[instrument(skip(exec, limits))]
pub async fn patch_php_limits(
    exec: &dyn PodExec,
    namespace: &Namespace,
    selector: &str,
    limits: &PhpLimits,
) -> Result<String> {
    let namespace = namespace.as_str();
    let pod = exec.find_pod(namespace, selector).await?.ok_or_else(|| {
        KubepressError::PrerequisiteMissing(format!(
            "no running pod matching '{}' in namespace {}",
            selector, namespace
        ))
    })?;
    info!("Patching PHP limits in pod {}/{}", namespace, pod);

    let container = Some(CONTAINER);

    // Content and paths are passed as positional arguments, never spliced into the script
    exec.exec(
        namespace,
        &pod,
        container,
        &sh("if [ -f \"$1\" ]; then cp \"$1\" \"$2\"; fi", &[INI_PATH, BACKUP_PATH]),
    )
    .await?;

    let contents = limits.render();
    exec.exec(
        namespace,
        &pod,
        container,
        &sh("printf '%s' \"$1\" > \"$2\"", &[contents.as_str(), INI_PATH]),
    )
    .await?;

    exec.exec(
        namespace,
        &pod,
        container,
        &sh("chown \"$1\" \"$3\" && chmod \"$2\" \"$3\"", &[OWNER, MODE, INI_PATH]),
    )
    .await?;

    info!("PHP limits updated in {} (backup at {})", INI_PATH, BACKUP_PATH);
    Ok(pod)
}
