use std::path::PathBuf;

use resdex_primitives::ResourceId;
use thiserror::Error;

/// Failure to read a resource directory.
#[derive(Debug, Error)]
pub enum ScanError {
	#[error("resource directory not found: {0}")]
	NotADirectory(PathBuf),

	#[error("I/O error reading {path}: {error}")]
	Io {
		path: PathBuf,
		error: std::io::Error,
	},
}

/// A resource file the parser collaborator could not read.
///
/// Never fatal: the leaf drops the file's items and keeps going.
#[derive(Debug, Clone, Error)]
#[error("failed to parse {path}: {message}")]
pub struct ParseError {
	pub path: PathBuf,
	pub message: String,
}

impl ParseError {
	pub fn new(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
		Self {
			path: path.into(),
			message: message.into(),
		}
	}
}

/// Errors from id allocation and id tables.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
	/// Every id in the dynamic range has been handed out.
	#[error("dynamic id range exhausted after {last}")]
	Exhausted { last: ResourceId },

	/// A compiled table entry used an id from the reserved dynamic range.
	#[error("{id} lies in the dynamic id range and cannot be a compiled id")]
	NotCompiled { id: ResourceId },

	/// A configured dynamic base lies outside the dynamic range.
	#[error("dynamic id base {base:#010x} is outside the dynamic range")]
	InvalidBase { base: i32 },
}

/// Errors that can occur when loading engine configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("I/O error reading {path}: {error}")]
	Io {
		path: PathBuf,
		error: std::io::Error,
	},

	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),

	#[error("unknown resource type in [[values]]: {0}")]
	UnknownType(#[from] resdex_primitives::ParseResourceTypeError),

	#[error(transparent)]
	Ids(#[from] IdError),
}
