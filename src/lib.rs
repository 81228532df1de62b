// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
pub mod cli;
pub mod config;
pub mod constants;
pub mod credentials;
pub mod deploy;
pub mod error;
pub mod kubernetes;
pub mod manifests;
pub mod php_limits;
pub mod plan;
pub mod public_ip;
pub mod report;
pub mod runtime;
pub mod validation;

#[cfg(test)]
pub mod test_utils;
