// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Status listing of the resources in a namespace

use crate::error::Result;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{PersistentVolumeClaim, Pod, Service};
use k8s_openapi::api::networking::v1::Ingress;
use kube::{api::ListParams, Api, Client, ResourceExt};
use std::fmt;
use tracing::instrument;

/// One line of the namespace status summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceStatus {
    pub kind: &'static str,
    pub name: String,
    pub status: String,
}

impl fmt::Display for ResourceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}: {}", self.kind, self.name, self.status)
    }
}

/// List deployments, pods, services, volume claims and ingresses in a namespace
#[instrument(skip(client))]
pub async fn namespace_resources(client: &Client, namespace: &str) -> Result<Vec<ResourceStatus>> {
    let lp = ListParams::default();
    let mut out = Vec::new();

    let deployments: Api<Deployment> = Api::namespaced(client.clone(), namespace);
    out.extend(deployments.list(&lp).await?.items.iter().map(deployment_status));

    let pods: Api<Pod> = Api::namespaced(client.clone(), namespace);
    out.extend(pods.list(&lp).await?.items.iter().map(pod_status));

    let services: Api<Service> = Api::namespaced(client.clone(), namespace);
    out.extend(services.list(&lp).await?.items.iter().map(service_status));

    let claims: Api<PersistentVolumeClaim> = Api::namespaced(client.clone(), namespace);
    out.extend(claims.list(&lp).await?.items.iter().map(claim_status));

    let ingresses: Api<Ingress> = Api::namespaced(client.clone(), namespace);
    out.extend(ingresses.list(&lp).await?.items.iter().map(ingress_status));

    Ok(out)
}

fn deployment_status(d: &Deployment) -> ResourceStatus {
    let desired = d.spec.as_ref().and_then(|s| s.replicas).unwrap_or(1);
    let ready = d.status.as_ref().and_then(|s| s.ready_replicas).unwrap_or(0);
    ResourceStatus {
        kind: "Deployment",
        name: d.name_any(),
        status: format!("{}/{} ready", ready, desired),
    }
}

fn pod_status(p: &Pod) -> ResourceStatus {
    ResourceStatus {
        kind: "Pod",
        name: p.name_any(),
        status: p
            .status
            .as_ref()
            .and_then(|s| s.phase.clone())
            .unwrap_or_else(|| "Unknown".to_string()),
    }
}

fn service_status(s: &Service) -> ResourceStatus {
    let spec = s.spec.as_ref();
    let type_ = spec.and_then(|s| s.type_.clone()).unwrap_or_else(|| "ClusterIP".to_string());
    let ip = spec.and_then(|s| s.cluster_ip.clone()).unwrap_or_else(|| "-".to_string());
    ResourceStatus {
        kind: "Service",
        name: s.name_any(),
        status: format!("{} {}", type_, ip),
    }
}

fn claim_status(c: &PersistentVolumeClaim) -> ResourceStatus {
    ResourceStatus {
        kind: "PersistentVolumeClaim",
        name: c.name_any(),
        status: c
            .status
            .as_ref()
            .and_then(|s| s.phase.clone())
            .unwrap_or_else(|| "Pending".to_string()),
    }
}

fn ingress_status(i: &Ingress) -> ResourceStatus {
    let hosts: Vec<String> = i
        .spec
        .as_ref()
        .and_then(|s| s.rules.as_ref())
        .map(|rules| rules.iter().filter_map(|r| r.host.clone()).collect())
        .unwrap_or_default();
    ResourceStatus {
        kind: "Ingress",
        name: i.name_any(),
        status: hosts.join(","),
    }
}
