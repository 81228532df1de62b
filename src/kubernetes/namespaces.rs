// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Namespace management utilities

use crate::constants::FIELD_MANAGER;
use crate::error::Result;
use k8s_openapi::api::core::v1::Namespace;
use kube::{
    api::{Patch, PatchParams},
    Api, Client, ResourceExt,
};
use tracing::{info, instrument};

/// Create or update a namespace with server-side apply
#[instrument(skip(client, namespace), fields(namespace = %namespace.name_any()))]
pub async fn apply_namespace(client: &Client, namespace: &Namespace) -> Result<()> {
    let namespaces: Api<Namespace> = Api::all(client.clone());
    let name = namespace.name_any();

    let pp = PatchParams::apply(FIELD_MANAGER).force();
    namespaces
        .patch(&name, &pp, &Patch::Apply(namespace))
        .await?;

    info!("Namespace {} applied", name);
    Ok(())
}
