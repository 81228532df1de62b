// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Typed Kubernetes objects for a WordPress deployment.
//!
//! Rendering is pure: objects are built from the validated target, the generated
//! credentials and the workload settings, then serialized to YAML.

use crate::config::WorkloadConfig;
use crate::constants::{database, labels, names, secret_keys, FIELD_MANAGER};
use crate::credentials::Credentials;
use crate::error::Result;
use crate::validation::{Namespace, Target};
use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec, DeploymentStrategy};
use k8s_openapi::api::core::v1::{
    Container, ContainerPort, EnvVar, EnvVarSource, ExecAction, Namespace as NamespaceObject,
    PersistentVolumeClaim, PersistentVolumeClaimSpec, PersistentVolumeClaimVolumeSource, PodSpec,
    PodTemplateSpec, Probe, ResourceRequirements, Secret, SecretKeySelector, Service, ServicePort,
    ServiceSpec, TCPSocketAction, Volume, VolumeMount, VolumeResourceRequirements,
};
use k8s_openapi::api::networking::v1::{
    HTTPIngressPath, HTTPIngressRuleValue, Ingress, IngressBackend, IngressRule,
    IngressServiceBackend, IngressSpec, IngressTLS, ServiceBackendPort,
};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use k8s_openapi::{ByteString, Resource};
use kube::api::ObjectMeta;
use kube::ResourceExt;
use serde::Serialize;
use std::collections::BTreeMap;

const WORDPRESS_PORT: i32 = 80;

/// One Kubernetes object inside a manifest
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Object {
    Secret(Secret),
    PersistentVolumeClaim(PersistentVolumeClaim),
    Deployment(Deployment),
    Service(Service),
    Ingress(Ingress),
}

impl Object {
    pub fn kind(&self) -> &'static str {
        match self {
            Object::Secret(_) => Secret::KIND,
            Object::PersistentVolumeClaim(_) => PersistentVolumeClaim::KIND,
            Object::Deployment(_) => Deployment::KIND,
            Object::Service(_) => Service::KIND,
            Object::Ingress(_) => Ingress::KIND,
        }
    }

    pub fn name(&self) -> String {
        match self {
            Object::Secret(o) => o.name_any(),
            Object::PersistentVolumeClaim(o) => o.name_any(),
            Object::Deployment(o) => o.name_any(),
            Object::Service(o) => o.name_any(),
            Object::Ingress(o) => o.name_any(),
        }
    }
}

/// A named group of objects written to one file and applied together
#[derive(Debug, Clone)]
pub struct Manifest {
    pub name: &'static str,
    pub file_name: &'static str,
    pub objects: Vec<Object>,
}

impl Manifest {
    /// Render as a multi-document YAML string
    pub fn to_yaml(&self) -> Result<String> {
        let mut out = String::new();
        for object in &self.objects {
            out.push_str("---\n");
            out.push_str(&serde_yaml::to_string(object)?);
        }
        Ok(out)
    }
}

/// The rendered manifests, in apply order
#[derive(Debug, Clone)]
pub struct ManifestSet {
    pub manifests: Vec<Manifest>,
}

impl ManifestSet {
    pub fn get(&self, name: &str) -> Option<&Manifest> {
        self.manifests.iter().find(|m| m.name == name)
    }
}

/// Manifest names, in the order they are applied
pub mod manifest_names {
    pub const SECRET: &str = "secret";
    pub const MYSQL_STORAGE: &str = "mysql-storage";
    pub const WORDPRESS_STORAGE: &str = "wordpress-storage";
    pub const DATABASE: &str = "database";
    pub const APPLICATION: &str = "application";
    pub const INGRESS: &str = "ingress";
}

/// Render every manifest for a deployment
pub fn render(target: &Target, credentials: &Credentials, workload: &WorkloadConfig) -> ManifestSet {
    let ns = &target.namespace;

    ManifestSet {
        manifests: vec![
            Manifest {
                name: manifest_names::SECRET,
                file_name: "secret.yaml",
                objects: vec![Object::Secret(secret(ns, credentials))],
            },
            Manifest {
                name: manifest_names::MYSQL_STORAGE,
                file_name: "mysql-pvc.yaml",
                objects: vec![Object::PersistentVolumeClaim(volume_claim(
                    ns,
                    names::MYSQL_PVC,
                    names::MYSQL,
                    &workload.mysql_storage,
                    workload.storage_class.as_deref(),
                ))],
            },
            Manifest {
                name: manifest_names::WORDPRESS_STORAGE,
                file_name: "wordpress-pvc.yaml",
                objects: vec![Object::PersistentVolumeClaim(volume_claim(
                    ns,
                    names::WORDPRESS_PVC,
                    names::WORDPRESS,
                    &workload.wordpress_storage,
                    workload.storage_class.as_deref(),
                ))],
            },
            Manifest {
                name: manifest_names::DATABASE,
                file_name: "mysql.yaml",
                objects: vec![
                    Object::Deployment(mysql_deployment(ns, workload)),
                    Object::Service(service(ns, names::MYSQL, Tier::Database, database::PORT)),
                ],
            },
            Manifest {
                name: manifest_names::APPLICATION,
                file_name: "wordpress.yaml",
                objects: vec![
                    Object::Deployment(wordpress_deployment(ns, workload)),
                    Object::Service(service(ns, names::WORDPRESS, Tier::Frontend, WORDPRESS_PORT)),
                ],
            },
            Manifest {
                name: manifest_names::INGRESS,
                file_name: "ingress.yaml",
                objects: vec![Object::Ingress(ingress(target, workload))],
            },
        ],
    }
}

/// The namespace object, applied before any manifest
pub fn namespace_object(namespace: &Namespace) -> NamespaceObject {
    NamespaceObject {
        metadata: ObjectMeta {
            name: Some(namespace.to_string()),
            labels: Some(managed_labels()),
            ..Default::default()
        },
        ..Default::default()
    }
}

#[derive(Clone, Copy)]
enum Tier {
    Database,
    Frontend,
}

impl Tier {
    fn as_str(self) -> &'static str {
        match self {
            Tier::Database => "database",
            Tier::Frontend => "frontend",
        }
    }
}

fn managed_labels() -> BTreeMap<String, String> {
    BTreeMap::from([(labels::MANAGED_BY.to_string(), FIELD_MANAGER.to_string())])
}

/// Labels shared by a deployment's selector, its pod template and its service
fn selector_labels(app: &str, tier: Tier) -> BTreeMap<String, String> {
    BTreeMap::from([
        (labels::APP.to_string(), app.to_string()),
        (labels::TIER.to_string(), tier.as_str().to_string()),
    ])
}

fn object_labels(app: &str, tier: Option<Tier>) -> BTreeMap<String, String> {
    let mut out = managed_labels();
    out.insert(labels::APP.to_string(), app.to_string());
    if let Some(tier) = tier {
        out.insert(labels::TIER.to_string(), tier.as_str().to_string());
    }
    out
}

fn metadata(ns: &Namespace, name: &str, object_labels: BTreeMap<String, String>) -> ObjectMeta {
    ObjectMeta {
        name: Some(name.to_string()),
        namespace: Some(ns.to_string()),
        labels: Some(object_labels),
        ..Default::default()
    }
}

fn secret(ns: &Namespace, credentials: &Credentials) -> Secret {
    Secret {
        metadata: metadata(ns, names::SECRET, object_labels(names::WORDPRESS, None)),
        type_: Some("Opaque".to_string()),
        data: Some(BTreeMap::from([
            (
                secret_keys::ROOT_PASSWORD.to_string(),
                ByteString(credentials.root_password.as_bytes().to_vec()),
            ),
            (
                secret_keys::USER_PASSWORD.to_string(),
                ByteString(credentials.user_password.as_bytes().to_vec()),
            ),
        ])),
        ..Default::default()
    }
}

fn volume_claim(
    ns: &Namespace,
    name: &str,
    app: &str,
    size: &str,
    storage_class: Option<&str>,
) -> PersistentVolumeClaim {
    PersistentVolumeClaim {
        metadata: metadata(ns, name, object_labels(app, None)),
        spec: Some(PersistentVolumeClaimSpec {
            access_modes: Some(vec!["ReadWriteOnce".to_string()]),
            storage_class_name: storage_class.map(str::to_string),
            resources: Some(VolumeResourceRequirements {
                requests: Some(BTreeMap::from([(
                    "storage".to_string(),
                    Quantity(size.to_string()),
                )])),
                ..Default::default()
            }),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn secret_env(name: &str, key: &str) -> EnvVar {
    EnvVar {
        name: name.to_string(),
        value_from: Some(EnvVarSource {
            secret_key_ref: Some(SecretKeySelector {
                name: names::SECRET.to_string(),
                key: key.to_string(),
                optional: Some(false),
            }),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn env_var(name: &str, value: &str) -> EnvVar {
    EnvVar {
        name: name.to_string(),
        value: Some(value.to_string()),
        ..Default::default()
    }
}

fn resources(cpu_request: &str, memory_request: &str, cpu_limit: &str, memory_limit: &str) -> ResourceRequirements {
    ResourceRequirements {
        requests: Some(BTreeMap::from([
            ("cpu".to_string(), Quantity(cpu_request.to_string())),
            ("memory".to_string(), Quantity(memory_request.to_string())),
        ])),
        limits: Some(BTreeMap::from([
            ("cpu".to_string(), Quantity(cpu_limit.to_string())),
            ("memory".to_string(), Quantity(memory_limit.to_string())),
        ])),
        ..Default::default()
    }
}

/// Single-replica deployment with a `Recreate` strategy, since its volume is ReadWriteOnce
fn deployment(
    ns: &Namespace,
    app: &str,
    tier: Tier,
    container: Container,
    claim_name: &str,
) -> Deployment {
    let pod_labels = selector_labels(app, tier);

    Deployment {
        metadata: metadata(ns, app, object_labels(app, Some(tier))),
        spec: Some(DeploymentSpec {
            replicas: Some(1),
            selector: LabelSelector {
                match_labels: Some(pod_labels.clone()),
                ..Default::default()
            },
            strategy: Some(DeploymentStrategy {
                type_: Some("Recreate".to_string()),
                ..Default::default()
            }),
            template: PodTemplateSpec {
                metadata: Some(ObjectMeta {
                    labels: Some(pod_labels),
                    ..Default::default()
                }),
                spec: Some(PodSpec {
                    containers: vec![container],
                    volumes: Some(vec![Volume {
                        name: format!("{}-data", app),
                        persistent_volume_claim: Some(PersistentVolumeClaimVolumeSource {
                            claim_name: claim_name.to_string(),
                            read_only: None,
                        }),
                        ..Default::default()
                    }]),
                    ..Default::default()
                }),
            },
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn mysql_deployment(ns: &Namespace, workload: &WorkloadConfig) -> Deployment {
    let container = Container {
        name: names::MYSQL.to_string(),
        image: Some(workload.mysql_image.clone()),
        env: Some(vec![
            secret_env("MYSQL_ROOT_PASSWORD", secret_keys::ROOT_PASSWORD),
            env_var("MYSQL_DATABASE", database::NAME),
            env_var("MYSQL_USER", database::USER),
            secret_env("MYSQL_PASSWORD", secret_keys::USER_PASSWORD),
        ]),
        ports: Some(vec![ContainerPort {
            name: Some(names::MYSQL.to_string()),
            container_port: database::PORT,
            ..Default::default()
        }]),
        volume_mounts: Some(vec![VolumeMount {
            name: format!("{}-data", names::MYSQL),
            mount_path: "/var/lib/mysql".to_string(),
            ..Default::default()
        }]),
        readiness_probe: Some(Probe {
            exec: Some(ExecAction {
                command: Some(vec![
                    "sh".to_string(),
                    "-c".to_string(),
                    "mysqladmin ping -h 127.0.0.1 -uroot -p\"$MYSQL_ROOT_PASSWORD\"".to_string(),
                ]),
            }),
            initial_delay_seconds: Some(20),
            period_seconds: Some(10),
            timeout_seconds: Some(5),
            ..Default::default()
        }),
        liveness_probe: Some(Probe {
            tcp_socket: Some(TCPSocketAction {
                port: IntOrString::Int(database::PORT),
                host: None,
            }),
            initial_delay_seconds: Some(60),
            period_seconds: Some(20),
            ..Default::default()
        }),
        resources: Some(resources("250m", "512Mi", "1", "1Gi")),
        ..Default::default()
    };

    deployment(ns, names::MYSQL, Tier::Database, container, names::MYSQL_PVC)
}

fn wordpress_deployment(ns: &Namespace, workload: &WorkloadConfig) -> Deployment {
    let container = Container {
        name: names::WORDPRESS.to_string(),
        image: Some(workload.wordpress_image.clone()),
        env: Some(vec![
            env_var("WORDPRESS_DB_HOST", &format!("{}:{}", names::MYSQL, database::PORT)),
            env_var("WORDPRESS_DB_NAME", database::NAME),
            env_var("WORDPRESS_DB_USER", database::USER),
            secret_env("WORDPRESS_DB_PASSWORD", secret_keys::USER_PASSWORD),
        ]),
        ports: Some(vec![ContainerPort {
            name: Some("http".to_string()),
            container_port: WORDPRESS_PORT,
            ..Default::default()
        }]),
        volume_mounts: Some(vec![VolumeMount {
            name: format!("{}-data", names::WORDPRESS),
            mount_path: "/var/www/html".to_string(),
            ..Default::default()
        }]),
        readiness_probe: Some(Probe {
            tcp_socket: Some(TCPSocketAction {
                port: IntOrString::Int(WORDPRESS_PORT),
                host: None,
            }),
            initial_delay_seconds: Some(10),
            period_seconds: Some(10),
            ..Default::default()
        }),
        liveness_probe: Some(Probe {
            tcp_socket: Some(TCPSocketAction {
                port: IntOrString::Int(WORDPRESS_PORT),
                host: None,
            }),
            initial_delay_seconds: Some(60),
            period_seconds: Some(20),
            ..Default::default()
        }),
        resources: Some(resources("100m", "256Mi", "500m", "512Mi")),
        ..Default::default()
    };

    deployment(ns, names::WORDPRESS, Tier::Frontend, container, names::WORDPRESS_PVC)
}

fn service(ns: &Namespace, app: &str, tier: Tier, port: i32) -> Service {
    Service {
        metadata: metadata(ns, app, object_labels(app, Some(tier))),
        spec: Some(ServiceSpec {
            selector: Some(selector_labels(app, tier)),
            ports: Some(vec![ServicePort {
                port,
                target_port: Some(IntOrString::Int(port)),
                protocol: Some("TCP".to_string()),
                ..Default::default()
            }]),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn ingress(target: &Target, workload: &WorkloadConfig) -> Ingress {
    let host = target.domain.to_string();
    let mut meta = metadata(
        &target.namespace,
        names::INGRESS,
        object_labels(names::WORDPRESS, None),
    );

    let tls = workload.cluster_issuer.as_ref().map(|issuer| {
        meta.annotations = Some(BTreeMap::from([(
            "cert-manager.io/cluster-issuer".to_string(),
            issuer.clone(),
        )]));
        vec![IngressTLS {
            hosts: Some(vec![host.clone()]),
            secret_name: Some(format!("{}-tls", target.namespace)),
        }]
    });

    Ingress {
        metadata: meta,
        spec: Some(IngressSpec {
            ingress_class_name: workload.ingress_class.clone(),
            rules: Some(vec![IngressRule {
                host: Some(host),
                http: Some(HTTPIngressRuleValue {
                    paths: vec![HTTPIngressPath {
                        path: Some("/".to_string()),
                        path_type: "Prefix".to_string(),
                        backend: IngressBackend {
                            service: Some(IngressServiceBackend {
                                name: names::WORDPRESS.to_string(),
                                port: Some(ServiceBackendPort {
                                    number: Some(WORDPRESS_PORT),
                                    name: None,
                                }),
                            }),
                            resource: None,
                        },
                    }],
                }),
            }]),
            tls,
            ..Default::default()
        }),
        ..Default::default()
    }
}
