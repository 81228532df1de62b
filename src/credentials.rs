// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Password generation for the database accounts.

use crate::constants::passwords::LENGTH;
use rand::distr::Alphanumeric;
use rand::Rng;

/// Passwords generated for one deployment run
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub root_password: String,
    pub user_password: String,
}

impl Credentials {
    /// Generate two distinct random passwords
    pub fn generate() -> Self {
        let root_password = generate_password(LENGTH);
        let mut user_password = generate_password(LENGTH);
        while user_password == root_password {
            user_password = generate_password(LENGTH);
        }

        Self {
            root_password,
            user_password,
        }
    }
}

// Keep passwords out of debug logs
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("root_password", &"<redacted>")
            .field("user_password", &"<redacted>")
            .finish()
    }
}

/// Random alphanumeric string from the thread-local CSPRNG
pub fn generate_password(length: usize) -> String {
    let mut rng = rand::rng();
    std::iter::repeat_with(|| rng.sample(Alphanumeric) as char)
        .take(length)
        .collect()
}
