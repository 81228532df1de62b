// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// The field manager name used for server-side apply
pub const FIELD_MANAGER: &str = "kubepress";

/// Labels stamped on every rendered object
pub mod labels {
    pub const MANAGED_BY: &str = "app.kubernetes.io/managed-by";
    pub const APP: &str = "app";
    pub const TIER: &str = "tier";
}

/// Names of the rendered Kubernetes objects. Later objects reference earlier
/// ones by these names.
pub mod names {
    pub const SECRET: &str = "wordpress-secrets";
    pub const MYSQL: &str = "mysql";
    pub const WORDPRESS: &str = "wordpress";
    pub const MYSQL_PVC: &str = "mysql-pv-claim";
    pub const WORDPRESS_PVC: &str = "wordpress-pv-claim";
    pub const INGRESS: &str = "wordpress";
}

/// Keys inside the generated secret
pub mod secret_keys {
    pub const ROOT_PASSWORD: &str = "mysql-root-password";
    pub const USER_PASSWORD: &str = "mysql-password";
}

/// Database settings shared by the MySQL and WordPress containers
pub mod database {
    pub const NAME: &str = "wordpress";
    pub const USER: &str = "wordpress";
    pub const PORT: i32 = 3306;
}

/// Generated passwords
pub mod passwords {
    pub const LENGTH: usize = 25;
}

/// Namespace derivation
pub mod namespace {
    pub const PREFIX: &str = "wordpress-";
    /// Maximum length of the domain-derived part, before the prefix is added
    pub const DERIVED_MAX_LEN: usize = 20;
}

/// Readiness polling
pub mod wait {
    pub const POLL_INTERVAL_SECS: u64 = 5;
}

/// Files written into the per-domain deployment directory
pub mod files {
    pub const CREDENTIALS: &str = "credentials.txt";
}

/// PHP configuration patched inside the WordPress container
pub mod php {
    pub const CONTAINER: &str = "wordpress";
    pub const DEFAULT_SELECTOR: &str = "app=wordpress";
    pub const INI_PATH: &str = "/usr/local/etc/php/conf.d/uploads.ini";
    pub const BACKUP_PATH: &str = "/usr/local/etc/php/conf.d/uploads.ini.bak";
    pub const OWNER: &str = "www-data:www-data";
    pub const MODE: &str = "644";
}

/// Placeholder written instead of the external address when it can't be resolved
pub const PUBLIC_IP_PLACEHOLDER: &str = "YOUR_SERVER_IP";
