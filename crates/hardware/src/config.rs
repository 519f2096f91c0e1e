//! Configuration for a cache hierarchy.
//!
//! This module defines the configuration structures used to assemble a
//! [`System`](crate::soc::System). It provides:
//! 1. **Defaults:** Baseline address width and cache geometry.
//! 2. **Structures:** Memory preload images and the ordered list of cache levels.
//! 3. **Enums:** Replacement policy selection.
//!
//! Configuration is read from JSON, or use `Config::default()` for a single small L1.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cache::CacheGeometry;
use crate::common::ConfigError;
use crate::common::constants::MAX_ADDRESS_WIDTH;

/// Default configuration constants.
mod defaults {
    /// Address width in bits (256-byte address space).
    pub const ADDRESS_WIDTH: u32 = crate::common::constants::DEFAULT_ADDRESS_WIDTH;

    /// Name of the default cache level.
    pub const CACHE_NAME: &str = "L1";

    /// Line offset bits (4-byte lines).
    pub const OFFSET_BITS: u32 = 2;

    /// Set index bits (4 sets).
    pub const SET_BITS: u32 = 2;

    /// Associativity.
    pub const WAYS: usize = 2;

    /// Seed for the random replacement policy.
    pub const SEED: u64 = 0x1234_5678;
}

/// Cache replacement policy algorithms.
///
/// Specifies the algorithm used to select which way to evict when a new line
/// must be installed in a set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReplacementPolicy {
    /// Least Recently Used: invalid ways first, then the oldest stamp.
    #[default]
    #[serde(alias = "Lru", alias = "lru")]
    Lru,
    /// Uniform random over all ways, regardless of validity.
    #[serde(alias = "Random", alias = "random")]
    Random,
    /// Most Recently Used: invalid ways first, then the newest stamp.
    ///
    /// Effective for cyclic access patterns larger than a set.
    #[serde(alias = "Mru", alias = "mru")]
    Mru,
}

/// One contiguous image copied into memory before the first transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryImage {
    /// Address of the first byte.
    pub base: u64,
    /// Image contents.
    pub bytes: Vec<u8>,
}

/// Backing memory configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Images loaded in order; later images overwrite earlier ones.
    #[serde(default)]
    pub preload: Vec<MemoryImage>,
}

/// Configuration for one cache level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Level name used in logs and labels
    #[serde(default = "CacheConfig::default_name")]
    pub name: String,
    /// Line offset bits; the line holds `2^offset_bits` bytes
    #[serde(default = "CacheConfig::default_offset_bits")]
    pub offset_bits: u32,
    /// Set index bits; the cache has `2^set_bits` sets
    #[serde(default = "CacheConfig::default_set_bits")]
    pub set_bits: u32,
    /// Associativity
    #[serde(default = "CacheConfig::default_ways")]
    pub ways: usize,
    /// Victim selection algorithm
    #[serde(default)]
    pub policy: ReplacementPolicy,
    /// Seed for `Random` (ignored by the other policies)
    #[serde(default = "CacheConfig::default_seed")]
    pub seed: u64,
}

impl CacheConfig {
    fn default_name() -> String {
        defaults::CACHE_NAME.to_owned()
    }

    const fn default_offset_bits() -> u32 {
        defaults::OFFSET_BITS
    }

    const fn default_set_bits() -> u32 {
        defaults::SET_BITS
    }

    const fn default_ways() -> usize {
        defaults::WAYS
    }

    const fn default_seed() -> u64 {
        defaults::SEED
    }

    /// Checks this level's geometry against `address_width`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] describing the first violated constraint.
    pub fn geometry(&self, address_width: u32) -> Result<CacheGeometry, ConfigError> {
        if self.ways == 0 {
            return Err(ConfigError::ZeroWays(self.name.clone()));
        }
        CacheGeometry::new(address_width, self.offset_bits, self.set_bits, self.ways)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            name: Self::default_name(),
            offset_bits: defaults::OFFSET_BITS,
            set_bits: defaults::SET_BITS,
            ways: defaults::WAYS,
            policy: ReplacementPolicy::default(),
            seed: defaults::SEED,
        }
    }
}

/// Root configuration structure.
///
/// # Examples
///
/// Creating a default configuration:
///
/// ```
/// use cachebus_core::config::Config;
///
/// let config = Config::default();
/// assert_eq!(config.address_width, 8);
/// assert_eq!(config.caches.len(), 1);
/// assert_eq!(config.caches[0].ways, 2);
/// ```
///
/// Deserializing a two-level hierarchy:
///
/// ```
/// use cachebus_core::config::{Config, ReplacementPolicy};
///
/// let json = r#"{
///     "address_width": 8,
///     "memory": { "preload": [ { "base": 16, "bytes": [221, 204, 187, 170] } ] },
///     "caches": [
///         { "name": "L1", "offset_bits": 1, "set_bits": 1, "ways": 2, "policy": "Lru" },
///         { "name": "L2", "offset_bits": 2, "set_bits": 2, "ways": 4, "policy": "Random", "seed": 7 }
///     ]
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.caches[1].policy, ReplacementPolicy::Random);
/// assert_eq!(config.memory.preload[0].bytes, vec![0xDD, 0xCC, 0xBB, 0xAA]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Address width in bits; memory holds `2^address_width` bytes
    #[serde(default = "Config::default_address_width")]
    pub address_width: u32,
    /// Backing memory settings
    #[serde(default)]
    pub memory: MemoryConfig,
    /// Cache levels, closest to the master first
    #[serde(default = "Config::default_caches")]
    pub caches: Vec<CacheConfig>,
}

impl Config {
    const fn default_address_width() -> u32 {
        defaults::ADDRESS_WIDTH
    }

    fn default_caches() -> Vec<CacheConfig> {
        vec![CacheConfig::default()]
    }

    /// Parses a configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] if the text is not a valid configuration.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reads and parses a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read and
    /// [`ConfigError::Json`] if it does not parse.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Checks every constraint without building anything.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found: an illegal address width, an
    /// illegal cache geometry, or a preload image that does not fit.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.address_width == 0 || self.address_width > MAX_ADDRESS_WIDTH {
            return Err(ConfigError::AddressWidth(self.address_width));
        }
        for cache in &self.caches {
            let _ = cache.geometry(self.address_width)?;
        }
        let size = 1usize << self.address_width;
        for image in &self.memory.preload {
            let fits = usize::try_from(image.base)
                .ok()
                .and_then(|base| base.checked_add(image.bytes.len()))
                .is_some_and(|end| end <= size);
            if !fits {
                return Err(ConfigError::PreloadOutOfRange {
                    base: image.base,
                    len: image.bytes.len(),
                    size,
                });
            }
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            address_width: defaults::ADDRESS_WIDTH,
            memory: MemoryConfig::default(),
            caches: Self::default_caches(),
        }
    }
}
