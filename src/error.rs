// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors

use crate::Role;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read '{path}'")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config")]
    Parse(#[from] toml::de::Error),

    #[error("invalid `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Failures of the demo coordinators. Protocol operations themselves
/// cannot fail; these are startup and worker-lifetime failures.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to spawn {role} worker {index}")]
    Spawn {
        role: Role,
        index: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("{role} worker {index} panicked")]
    WorkerPanicked { role: Role, index: usize },
}
