// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Server-side apply of rendered manifests

use crate::constants::FIELD_MANAGER;
use crate::error::Result;
use crate::manifests::{Manifest, Object};
use kube::{
    api::{Patch, PatchParams},
    Api, Client, Resource, ResourceExt,
};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Debug;
use tracing::{info, instrument};

/// Apply every object of a manifest, in order
#[instrument(skip(client, manifest), fields(manifest = manifest.name))]
pub async fn apply_manifest(client: &Client, manifest: &Manifest) -> Result<()> {
    for object in &manifest.objects {
        match object {
            Object::Secret(o) => apply_object(client, o).await?,
            Object::PersistentVolumeClaim(o) => apply_object(client, o).await?,
            Object::Deployment(o) => apply_object(client, o).await?,
            Object::Service(o) => apply_object(client, o).await?,
            Object::Ingress(o) => apply_object(client, o).await?,
        }
        info!(
            "Applied {} {} from {}",
            object.kind(),
            object.name(),
            manifest.file_name
        );
    }
    Ok(())
}

/// Create or update a namespaced object with server-side apply
async fn apply_object<K>(client: &Client, object: &K) -> Result<()>
where
    K: Resource<Scope = k8s_openapi::NamespaceResourceScope>
        + Clone
        + Debug
        + Serialize
        + DeserializeOwned,
    K::DynamicType: Default,
{
    let namespace = object.namespace().unwrap_or_default();
    let api: Api<K> = Api::namespaced(client.clone(), &namespace);

    let pp = PatchParams::apply(FIELD_MANAGER).force();
    api.patch(&object.name_any(), &pp, &Patch::Apply(object))
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorkloadConfig;
    use crate::credentials::Credentials;
    use crate::error::KubepressError;
    use crate::manifests::{manifest_names, render};
    use crate::test_utils::{deployment_json, MockService};
    use crate::validation::resolve_target;

    fn database_manifest() -> Manifest {
        let target = resolve_target("blog.example.com", Some("blog")).unwrap();
        let set = render(&target, &Credentials::generate(), &WorkloadConfig::default());
        set.get(manifest_names::DATABASE).unwrap().clone()
    }

    #[tokio::test]
    async fn test_apply_manifest_patches_each_object_in_order() {
        let service = serde_json::json!({
            "apiVersion": "v1",
            "kind": "Service",
            "metadata": { "name": "mysql", "namespace": "blog" }
        });
        let mock = MockService::new()
            .on_patch(
                "/apis/apps/v1/namespaces/blog/deployments/mysql",
                200,
                &deployment_json("blog", "mysql", false).to_string(),
            )
            .on_patch("/api/v1/namespaces/blog/services/mysql", 200, &service.to_string());
        let client = mock.clone().into_client();

        apply_manifest(&client, &database_manifest()).await.unwrap();

        let paths: Vec<_> = mock.requests().into_iter().map(|r| (r.method, r.path)).collect();
        assert_eq!(
            paths,
            vec![
                (
                    "PATCH".to_string(),
                    "/apis/apps/v1/namespaces/blog/deployments/mysql".to_string()
                ),
                (
                    "PATCH".to_string(),
                    "/api/v1/namespaces/blog/services/mysql".to_string()
                ),
            ]
        );
    }

    #[tokio::test]
    async fn test_apply_manifest_stops_on_first_failure() {
        // Only the service endpoint exists; the deployment apply gets a 404
        let mock = MockService::new().on_patch("/api/v1/namespaces/blog/services/mysql", 200, "{}");
        let client = mock.clone().into_client();

        let err = apply_manifest(&client, &database_manifest()).await.unwrap_err();

        assert!(matches!(err, KubepressError::KubeError(_)));
        assert_eq!(mock.requests().len(), 1);
    }
}
