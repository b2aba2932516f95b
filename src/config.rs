// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Runtime parameters for the three protocols. Every option defaults to the
// value the classic demos hardcode, so an empty file is a valid config.

use std::path::Path;

use serde::Deserialize;

use crate::{ConfigError, Pacing};

#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub channel: ChannelConfig,
    #[serde(default)]
    pub gate: GateConfig,
    #[serde(default)]
    pub table: TableConfig,
    #[serde(default)]
    pub pacing: PacingConfig,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ChannelConfig {
    /// Ring slots; one is always left empty.
    #[serde(default = "defaults::capacity")]
    pub capacity: usize,
    #[serde(default = "defaults::producer_count")]
    pub producer_count: usize,
    #[serde(default = "defaults::consumer_count")]
    pub consumer_count: usize,
    #[serde(default = "defaults::per_producer_quota")]
    pub per_producer_quota: usize,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct GateConfig {
    #[serde(default = "defaults::reader_count")]
    pub reader_count: usize,
    #[serde(default = "defaults::writer_count")]
    pub writer_count: usize,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TableConfig {
    #[serde(default = "defaults::worker_count")]
    pub worker_count: usize,
    #[serde(default = "defaults::per_worker_round_quota")]
    pub per_worker_round_quota: usize,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PacingConfig {
    /// Base delay; each pause lasts 1..=5 ticks. Zero disables sleeping.
    #[serde(default = "defaults::tick_ms")]
    pub tick_ms: u64,
}

mod defaults {
    pub fn capacity() -> usize {
        21
    }

    pub fn producer_count() -> usize {
        10
    }

    pub fn consumer_count() -> usize {
        7
    }

    pub fn per_producer_quota() -> usize {
        10
    }

    pub fn reader_count() -> usize {
        20
    }

    pub fn writer_count() -> usize {
        4
    }

    pub fn worker_count() -> usize {
        5
    }

    pub fn per_worker_round_quota() -> usize {
        10
    }

    pub fn tick_ms() -> u64 {
        100
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            capacity: defaults::capacity(),
            producer_count: defaults::producer_count(),
            consumer_count: defaults::consumer_count(),
            per_producer_quota: defaults::per_producer_quota(),
        }
    }
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            reader_count: defaults::reader_count(),
            writer_count: defaults::writer_count(),
        }
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            worker_count: defaults::worker_count(),
            per_worker_round_quota: defaults::per_worker_round_quota(),
        }
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            tick_ms: defaults::tick_ms(),
        }
    }
}

impl PacingConfig {
    pub fn pacing(&self) -> Pacing {
        Pacing::from_millis(self.tick_ms)
    }
}

fn at_least(field: &'static str, value: usize, min: usize) -> Result<(), ConfigError> {
    if value < min {
        return Err(ConfigError::Invalid {
            field,
            reason: format!("must be at least {min}, got {value}"),
        });
    }
    Ok(())
}

impl ChannelConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        at_least("capacity", self.capacity, crate::circ::MIN_SLOTS)?;
        at_least("producer_count", self.producer_count, 1)?;
        at_least("consumer_count", self.consumer_count, 1)?;
        Ok(())
    }
}

impl GateConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        at_least("reader_count", self.reader_count, 1)?;
        at_least("writer_count", self.writer_count, 1)?;
        Ok(())
    }
}

impl TableConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        at_least("worker_count", self.worker_count, 2)?;
        Ok(())
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::parse(&text)?;
        Ok(config)
    }

    /// Parse and validate a TOML document.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.channel.validate()?;
        self.gate.validate()?;
        self.table.validate()?;
        Ok(())
    }
}
