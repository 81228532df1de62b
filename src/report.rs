// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Per-domain deployment directory: rendered manifests and the credential summary.

use crate::constants::files::CREDENTIALS;
use crate::credentials::Credentials;
use crate::error::Result;
use crate::kubernetes::ResourceStatus;
use crate::manifests::ManifestSet;
use crate::validation::{Domain, Namespace};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Directory holding everything generated for one domain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentDir(PathBuf);

impl DeploymentDir {
    pub fn for_domain(base: &Path, domain: &Domain) -> Self {
        Self(base.join(domain.as_str()))
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    pub fn credentials_path(&self) -> PathBuf {
        self.0.join(CREDENTIALS)
    }

    /// Write every manifest to its file, replacing earlier runs
    pub fn write_manifests(&self, set: &ManifestSet) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(&self.0)?;

        let mut written = Vec::with_capacity(set.manifests.len());
        for manifest in &set.manifests {
            let path = self.0.join(manifest.file_name);
            std::fs::write(&path, manifest.to_yaml()?)?;
            debug!("Wrote {}", path.display());
            written.push(path);
        }
        Ok(written)
    }

    /// Write the credential summary, readable by the owner only on Unix
    pub fn write_report(&self, report: &CredentialReport) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.0)?;
        let path = self.credentials_path();
        std::fs::write(&path, report.render())?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600))?;
        }

        info!("Credentials written to {}", path.display());
        Ok(path)
    }
}

/// Everything the operator needs after a successful deployment
#[derive(Debug, Clone)]
pub struct CredentialReport {
    pub domain: Domain,
    pub namespace: Namespace,
    pub credentials: Credentials,
    pub public_ip: String,
    pub resources: Vec<ResourceStatus>,
}

impl CredentialReport {
    pub fn render(&self) -> String {
        let ns = &self.namespace;
        let mut lines = vec![
            format!("WordPress deployment for {}", self.domain),
            String::new(),
            format!("Namespace:              {}", ns),
            format!("URL:                    https://{}", self.domain),
            format!("External IP:            {}", self.public_ip),
            String::new(),
            format!("MySQL root password:    {}", self.credentials.root_password),
            format!("MySQL user password:    {}", self.credentials.user_password),
        ];

        if !self.resources.is_empty() {
            lines.push(String::new());
            lines.push("Resources:".to_string());
            lines.extend(self.resources.iter().map(|r| format!("  {}", r)));
        }

        lines.extend([
            String::new(),
            "Next steps:".to_string(),
            format!("  Point a DNS A record for {} at {}", self.domain, self.public_ip),
            format!("  Check status:       kubectl get all -n {}", ns),
            format!("  Follow logs:        kubectl logs -n {} deployment/wordpress -f", ns),
            format!("  Raise PHP limits:   kubepress-php-limits {}", ns),
        ]);

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorkloadConfig;
    use crate::manifests::render;
    use crate::validation::resolve_target;

    fn make_report() -> CredentialReport {
        let target = resolve_target("blog.example.com", None).unwrap();
        CredentialReport {
            domain: target.domain,
            namespace: target.namespace,
            credentials: Credentials {
                root_password: "rootpw".to_string(),
                user_password: "userpw".to_string(),
            },
            public_ip: "203.0.113.9".to_string(),
            resources: vec![ResourceStatus {
                kind: "Deployment",
                name: "wordpress".to_string(),
                status: "1/1 ready".to_string(),
            }],
        }
    }

    #[test]
    fn test_deployment_dir_is_per_domain() {
        let domain = resolve_target("blog.example.com", None).unwrap().domain;
        let dir = DeploymentDir::for_domain(Path::new("/srv/deployments"), &domain);

        assert_eq!(dir.path(), Path::new("/srv/deployments/blog.example.com"));
        assert_eq!(
            dir.credentials_path(),
            PathBuf::from("/srv/deployments/blog.example.com/credentials.txt")
        );
    }

    #[test]
    fn test_render_contains_credentials_and_hints() {
        let text = make_report().render();

        assert!(text.contains("rootpw"));
        assert!(text.contains("userpw"));
        assert!(text.contains("203.0.113.9"));
        assert!(text.contains("kubectl get all -n wordpress-blog-example-com"));
        assert!(text.contains("Deployment/wordpress: 1/1 ready"));
    }

    #[test]
    fn test_render_layout() {
        let mut report = make_report();
        report.resources.clear();
        let text = report.render();

        assert!(text.starts_with("WordPress deployment for blog.example.com\n\n"));
        assert!(text.ends_with("kubepress-php-limits wordpress-blog-example-com\n"));
        assert!(!text.contains("Resources:"));
        assert!(text.contains("MySQL root password:    rootpw\nMySQL user password:    userpw\n"));
    }

    #[test]
    fn test_render_lists_resources_under_heading() {
        let text = make_report().render();

        assert!(text.contains("\nResources:\n  Deployment/wordpress: 1/1 ready\n"));
    }

    #[test]
    fn test_write_manifests_writes_six_files() {
        let base = tempfile::tempdir().unwrap();
        let target = resolve_target("blog.example.com", None).unwrap();
        let set = render(&target, &Credentials::generate(), &WorkloadConfig::default());
        let dir = DeploymentDir::for_domain(base.path(), &target.domain);

        let written = dir.write_manifests(&set).unwrap();

        let names: Vec<_> = written
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec![
                "secret.yaml",
                "mysql-pvc.yaml",
                "wordpress-pvc.yaml",
                "mysql.yaml",
                "wordpress.yaml",
                "ingress.yaml",
            ]
        );
        let ingress = std::fs::read_to_string(dir.path().join("ingress.yaml")).unwrap();
        assert!(ingress.contains("host: blog.example.com"));
    }

    #[test]
    fn test_write_report_overwrites_previous_run() {
        let base = tempfile::tempdir().unwrap();
        let mut report = make_report();
        let dir = DeploymentDir::for_domain(base.path(), &report.domain);

        dir.write_report(&report).unwrap();
        report.credentials.root_password = "second-run".to_string();
        let path = dir.write_report(&report).unwrap();

        let contents = std::fs::read_to_string(path).unwrap();
        assert!(contents.contains("second-run"));
        assert!(!contents.contains("rootpw"));
    }

    #[cfg(unix)]
    #[test]
    fn test_write_report_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let base = tempfile::tempdir().unwrap();
        let report = make_report();
        let dir = DeploymentDir::for_domain(base.path(), &report.domain);

        let path = dir.write_report(&report).unwrap();
        let mode = std::fs::metadata(path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
