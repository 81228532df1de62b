// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Externally visible address lookup

use crate::constants::PUBLIC_IP_PLACEHOLDER;
use std::net::IpAddr;
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

const LOOKUP_TIMEOUT_SECS: u64 = 10;

/// HTTP client used for the lookup
pub fn http_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(LOOKUP_TIMEOUT_SECS))
        .build()
}

/// Ask a "what is my IP" service for this host's public address.
/// Any failure falls back to a placeholder instead of aborting.
pub async fn resolve_public_ip(client: &reqwest::Client, url: &Url) -> String {
    match lookup(client, url).await {
        Ok(ip) => {
            info!("Public IP resolved: {}", ip);
            ip.to_string()
        }
        Err(e) => {
            warn!("Could not resolve public IP via {}: {}", url, e);
            PUBLIC_IP_PLACEHOLDER.to_string()
        }
    }
}

async fn lookup(client: &reqwest::Client, url: &Url) -> anyhow::Result<IpAddr> {
    let body = client
        .get(url.clone())
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    Ok(parse_ip(&body)?)
}

fn parse_ip(body: &str) -> Result<IpAddr, std::net::AddrParseError> {
    body.trim().parse()
}
