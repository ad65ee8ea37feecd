//! Engine configuration.
//!
//! Configuration is written in TOML. Every section is optional:
//!
//! ```toml
//! [scan]
//! ignored_suffixes = ["~", ".orig"]
//! skip_hidden = true
//!
//! [ids]
//! dynamic_base = 0x7f800000
//!
//! [log]
//! filter = "resdex_repository=debug,info"
//!
//! # Values injected by the build, as a build script would.
//! [[values]]
//! type = "string"
//! name = "build_flavor"
//! value = "demo"
//!
//! [[values]]
//! type = "string"
//! name = "build_flavor"
//! value = "démo"
//! qualifiers = "fr"
//! ```

use std::path::Path;

use resdex_primitives::{Qualifiers, ResourceId, ResourceItem, ResourceType, ResourceValue};
use serde::Deserialize;

use crate::error::{ConfigError, IdError};

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
	pub scan: ScanOptions,
	pub ids: IdOptions,
	pub log: LogOptions,
	pub values: Vec<ValueEntry>,
}

/// Which files a folder leaf skips.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanOptions {
	/// File name suffixes of editor backups and temporary files.
	pub ignored_suffixes: Vec<String>,
	/// Skip files whose name starts with `.`.
	pub skip_hidden: bool,
}

impl Default for ScanOptions {
	fn default() -> Self {
		Self {
			ignored_suffixes: vec!["~".into(), ".tmp".into(), ".swp".into()],
			skip_hidden: true,
		}
	}
}

impl ScanOptions {
	/// Returns true if a file with this name is not a resource file.
	pub fn is_ignored(&self, file_name: &str) -> bool {
		(self.skip_hidden && file_name.starts_with('.'))
			|| self
				.ignored_suffixes
				.iter()
				.any(|suffix| file_name.ends_with(suffix.as_str()))
	}
}

/// Dynamic id allocation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IdOptions {
	/// Seed of the dynamic id counter; the first minted id is one above it.
	pub dynamic_base: i32,
}

impl Default for IdOptions {
	fn default() -> Self {
		Self {
			dynamic_base: ResourceId::DYNAMIC_MIN,
		}
	}
}

impl IdOptions {
	pub fn validate(&self) -> Result<(), IdError> {
		if (ResourceId::DYNAMIC_MIN..ResourceId::DYNAMIC_MAX).contains(&self.dynamic_base) {
			Ok(())
		} else {
			Err(IdError::InvalidBase {
				base: self.dynamic_base,
			})
		}
	}
}

/// Logging settings for binaries embedding the engine.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogOptions {
	/// `tracing-subscriber` env-filter directives.
	pub filter: String,
}

impl Default for LogOptions {
	fn default() -> Self {
		Self {
			filter: "info".into(),
		}
	}
}

/// One build-injected value.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValueEntry {
	#[serde(rename = "type")]
	pub ty: String,
	pub name: String,
	pub value: String,
	#[serde(default)]
	pub qualifiers: String,
}

impl ValueEntry {
	pub fn to_item(&self) -> Result<ResourceItem, ConfigError> {
		let ty: ResourceType = self.ty.parse()?;
		Ok(ResourceItem::new(
			ty,
			&self.name,
			Qualifiers::new(&self.qualifiers),
			ResourceValue::text(&self.value),
		))
	}
}

impl EngineConfig {
	/// Parses and validates a TOML document.
	pub fn parse(input: &str) -> Result<Self, ConfigError> {
		let config: Self = toml::from_str(input)?;
		config.ids.validate()?;
		for entry in &config.values {
			entry.ty.parse::<ResourceType>()?;
		}
		Ok(config)
	}

	/// Reads and parses a TOML file.
	pub fn load(path: &Path) -> Result<Self, ConfigError> {
		let input = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		Self::parse(&input)
	}

	/// Converts the `[[values]]` entries to items, in file order.
	pub fn build_values(&self) -> Result<Vec<ResourceItem>, ConfigError> {
		self.values.iter().map(ValueEntry::to_item).collect()
	}
}
