// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Pod lookup and remote command execution

use crate::error::{KubepressError, Result};
use k8s_openapi::api::core::v1::Pod;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::Status;
use kube::{
    api::{AttachParams, ListParams},
    Api, Client, ResourceExt,
};
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, instrument};

/// Output of a command run inside a container
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Name of the first running pod matching a label selector
#[instrument(skip(client))]
pub async fn find_running_pod(client: &Client, namespace: &str, selector: &str) -> Result<Option<String>> {
    let pods: Api<Pod> = Api::namespaced(client.clone(), namespace);
    let list = pods.list(&ListParams::default().labels(selector)).await?;

    Ok(first_running_pod(&list.items))
}

pub fn first_running_pod(pods: &[Pod]) -> Option<String> {
    pods.iter()
        .find(|p| {
            p.metadata.deletion_timestamp.is_none()
                && p.status
                    .as_ref()
                    .and_then(|s| s.phase.as_deref())
                    .is_some_and(|phase| phase == "Running")
        })
        .map(|p| p.name_any())
}

/// Run a command in a pod's container and wait for it to finish.
/// A non-success exit status is reported as `ExternalCommandFailure`.
#[instrument(skip(client, command), fields(command = %command.join(" ")))]
pub async fn exec_in_pod(
    client: &Client,
    namespace: &str,
    pod: &str,
    container: Option<&str>,
    command: &[String],
) -> Result<ExecOutput> {
    let pods: Api<Pod> = Api::namespaced(client.clone(), namespace);

    let mut params = AttachParams::default().stdout(true).stderr(true);
    if let Some(container) = container {
        params = params.container(container);
    }

    let mut attached = pods.exec(pod, command.to_vec(), &params).await?;

    let stdout = attached.stdout();
    let stderr = attached.stderr();
    let status = attached.take_status();

    let (stdout, stderr) = futures::try_join!(read_all(stdout), read_all(stderr))?;
    let status = match status {
        Some(status) => status.await,
        None => None,
    };

    attached
        .join()
        .await
        .map_err(|e| KubepressError::ExternalCommandFailure(format!("exec in pod {} failed: {}", pod, e)))?;

    let output = ExecOutput { stdout, stderr };
    if !exec_succeeded(status.as_ref()) {
        let reason = status
            .and_then(|s| s.message)
            .unwrap_or_else(|| output.stderr.trim().to_string());
        return Err(KubepressError::ExternalCommandFailure(format!(
            "`{}` in pod {} failed: {}",
            command.join(" "),
            pod,
            reason
        )));
    }

    debug!("Command finished: {}", output.stdout.trim());
    Ok(output)
}

/// Whether the exec status channel reported success
pub fn exec_succeeded(status: Option<&Status>) -> bool {
    status.and_then(|s| s.status.as_deref()) == Some("Success")
}

async fn read_all<R: AsyncRead + Unpin>(reader: Option<R>) -> std::io::Result<String> {
    let mut out = String::new();
    if let Some(mut reader) = reader {
        reader.read_to_string(&mut out).await?;
    }
    Ok(out)
}
