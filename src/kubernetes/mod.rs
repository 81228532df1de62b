// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes utilities for client creation, applying manifests, readiness waits and pod exec.

pub mod apply;
pub mod client;
pub mod cluster;
pub mod exec;
pub mod namespaces;
pub mod status;
pub mod wait;

pub use client::create_client;
pub use cluster::{ClusterOps, KubeCluster, PodExec};
pub use exec::ExecOutput;
pub use status::ResourceStatus;
