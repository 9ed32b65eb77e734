//! Default configuration values

use super::schema::Config;
use crate::models::{KindReference, KindReferenceError};
use crate::related::default_resource_kinds;

pub fn default_config() -> Config {
    Config::default()
}

/// Kinds to fetch when a CSV declares none
///
/// Uses `defaultResourceKinds` from the config when set, else the builtin defaults.
pub fn fallback_resource_kinds(config: &Config) -> Result<Vec<KindReference>, KindReferenceError> {
    if config.default_resource_kinds.is_empty() {
        return Ok(default_resource_kinds());
    }
    config
        .default_resource_kinds
        .iter()
        .map(|s| KindReference::parse(s))
        .collect()
}
