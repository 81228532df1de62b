// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Ordered deployment steps and the sequential runner that executes them.

use crate::config::Timeouts;
use crate::constants::names;
use crate::error::{KubepressError, Result};
use crate::kubernetes::ClusterOps;
use crate::manifests::{manifest_names, namespace_object, Manifest, ManifestSet};
use crate::validation::Target;
use k8s_openapi::api::core::v1::Namespace;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{error, info};

/// What a step does against the cluster
#[derive(Debug, Clone)]
pub enum StepAction {
    WaitForNodes { timeout: Duration },
    ApplyNamespace(Namespace),
    Apply(Manifest),
    WaitForDeployment {
        namespace: String,
        name: String,
        timeout: Duration,
    },
}

#[derive(Debug, Clone)]
pub struct Step {
    pub name: &'static str,
    pub depends_on: Vec<&'static str>,
    pub action: StepAction,
}

/// Steps in execution order. Every dependency precedes the step that needs it.
#[derive(Debug, Clone)]
pub struct Plan {
    steps: Vec<Step>,
}

impl Plan {
    pub fn new(steps: Vec<Step>) -> Result<Self> {
        let mut seen = HashSet::new();
        for step in &steps {
            if let Some(missing) = step.depends_on.iter().find(|d| !seen.contains(*d)) {
                return Err(KubepressError::InvalidPlan(format!(
                    "step '{}' depends on '{}', which does not run before it",
                    step.name, missing
                )));
            }
            if !seen.insert(step.name) {
                return Err(KubepressError::InvalidPlan(format!(
                    "duplicate step '{}'",
                    step.name
                )));
            }
        }
        Ok(Self { steps })
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
}

/// Outcome of running a plan
#[derive(Debug)]
pub struct RunReport {
    pub completed: Vec<&'static str>,
    pub failed: Option<(&'static str, KubepressError)>,
}

impl RunReport {
    pub fn into_result(self) -> Result<Vec<&'static str>> {
        match self.failed {
            Some((_, e)) => Err(e),
            None => Ok(self.completed),
        }
    }
}

/// Step names of the deployment plan
pub mod step_names {
    pub const CLUSTER_READY: &str = "cluster-ready";
    pub const NAMESPACE: &str = "namespace";
    pub const SECRET: &str = "secret";
    pub const MYSQL_STORAGE: &str = "mysql-storage";
    pub const WORDPRESS_STORAGE: &str = "wordpress-storage";
    pub const DATABASE: &str = "database";
    pub const DATABASE_READY: &str = "database-ready";
    pub const APPLICATION: &str = "application";
    pub const APPLICATION_READY: &str = "application-ready";
    pub const INGRESS: &str = "ingress";
}

/// Build the plan: cluster-ready, namespace, secret, storage, database, application, ingress
pub fn deployment_plan(target: &Target, manifests: &ManifestSet, timeouts: &Timeouts) -> Result<Plan> {
    use step_names::*;

    let manifest = |name: &str| -> Result<Manifest> {
        manifests
            .get(name)
            .cloned()
            .ok_or_else(|| KubepressError::InvalidPlan(format!("manifest '{}' was not rendered", name)))
    };
    let namespace = target.namespace.to_string();

    Plan::new(vec![
        Step {
            name: CLUSTER_READY,
            depends_on: vec![],
            action: StepAction::WaitForNodes {
                timeout: timeouts.nodes,
            },
        },
        Step {
            name: NAMESPACE,
            depends_on: vec![CLUSTER_READY],
            action: StepAction::ApplyNamespace(namespace_object(&target.namespace)),
        },
        Step {
            name: SECRET,
            depends_on: vec![NAMESPACE],
            action: StepAction::Apply(manifest(manifest_names::SECRET)?),
        },
        Step {
            name: MYSQL_STORAGE,
            depends_on: vec![NAMESPACE],
            action: StepAction::Apply(manifest(manifest_names::MYSQL_STORAGE)?),
        },
        Step {
            name: WORDPRESS_STORAGE,
            depends_on: vec![NAMESPACE],
            action: StepAction::Apply(manifest(manifest_names::WORDPRESS_STORAGE)?),
        },
        Step {
            name: DATABASE,
            depends_on: vec![SECRET, MYSQL_STORAGE],
            action: StepAction::Apply(manifest(manifest_names::DATABASE)?),
        },
        Step {
            name: DATABASE_READY,
            depends_on: vec![DATABASE],
            action: StepAction::WaitForDeployment {
                namespace: namespace.clone(),
                name: names::MYSQL.to_string(),
                timeout: timeouts.database,
            },
        },
        Step {
            name: APPLICATION,
            depends_on: vec![SECRET, WORDPRESS_STORAGE, DATABASE_READY],
            action: StepAction::Apply(manifest(manifest_names::APPLICATION)?),
        },
        Step {
            name: APPLICATION_READY,
            depends_on: vec![APPLICATION],
            action: StepAction::WaitForDeployment {
                namespace,
                name: names::WORDPRESS.to_string(),
                timeout: timeouts.application,
            },
        },
        Step {
            name: INGRESS,
            depends_on: vec![APPLICATION],
            action: StepAction::Apply(manifest(manifest_names::INGRESS)?),
        },
    ])
}

/// Run the steps in order, stopping at the first failure. Nothing is rolled back.
pub async fn run(cluster: &dyn ClusterOps, plan: &Plan) -> RunReport {
    let mut completed = Vec::new();

    for step in plan.steps() {
        info!("Step {}: starting", step.name);
        let result = match &step.action {
            StepAction::WaitForNodes { timeout } => cluster.wait_for_nodes_ready(*timeout).await,
            StepAction::ApplyNamespace(ns) => cluster.apply_namespace(ns).await,
            StepAction::Apply(manifest) => cluster.apply(manifest).await,
            StepAction::WaitForDeployment {
                namespace,
                name,
                timeout,
            } => cluster.wait_for_deployment(namespace, name, *timeout).await,
        };

        match result {
            Ok(()) => {
                info!("Step {}: done", step.name);
                completed.push(step.name);
            }
            Err(e) => {
                error!(
                    "Step {} failed: {} (completed: {})",
                    step.name,
                    e,
                    completed.join(", ")
                );
                return RunReport {
                    completed,
                    failed: Some((step.name, e)),
                };
            }
        }
    }

    RunReport {
        completed,
        failed: None,
    }
}
