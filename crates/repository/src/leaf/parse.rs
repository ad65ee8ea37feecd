use std::path::Path;
use std::sync::Arc;

use resdex_primitives::{Qualifiers, ResourceFolderType, ResourceType, ResourceValue};

use crate::error::ParseError;

/// A resource file handed to a [`ValuesParser`].
#[derive(Debug, Clone, Copy)]
pub struct ResourceFile<'a> {
	pub path: &'a Path,
	pub folder: ResourceFolderType,
	pub qualifiers: &'a Qualifiers,
}

/// One declaration read from a values file. The leaf attaches qualifiers and source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedItem {
	pub ty: ResourceType,
	pub name: String,
	pub value: ResourceValue,
}

impl ParsedItem {
	pub fn new(ty: ResourceType, name: impl Into<String>, value: ResourceValue) -> Self {
		Self {
			ty,
			name: name.into(),
			value,
		}
	}
}

/// Turns resource files into declarations.
///
/// File parsing lives outside the engine; a [`FolderRepository`](crate::FolderRepository)
/// calls this collaborator for every file whose contents declare resources. An error
/// drops that one file's declarations and is logged, never propagated.
pub trait ValuesParser: Send + Sync {
	/// Reads the declarations of a file in a `values` folder.
	fn parse_values(&self, file: &ResourceFile<'_>) -> Result<Vec<ParsedItem>, ParseError>;

	/// Collects inline `@+id/` names from a file in an id-generating folder.
	fn parse_ids(&self, file: &ResourceFile<'_>) -> Result<Vec<String>, ParseError> {
		let _ = file;
		Ok(Vec::new())
	}
}

/// Parser that declares nothing: only file resources are indexed.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoValues;

impl ValuesParser for NoValues {
	fn parse_values(&self, _file: &ResourceFile<'_>) -> Result<Vec<ParsedItem>, ParseError> {
		Ok(Vec::new())
	}
}

/// Parser for a plain line format, one declaration per line:
///
/// ```text
/// # comment
/// string/app_name = My App
/// color/accent = @color/teal
/// styleable/MyView = textColor, textSize
/// id/spacer
/// ```
///
/// A value starting with `@` is a reference. Files in id-generating folders are searched
/// for `@+id/<name>` tokens.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineParser;

impl LineParser {
	fn parse_line(line: &str) -> Result<Option<ParsedItem>, String> {
		let line = line.trim();
		if line.is_empty() || line.starts_with('#') {
			return Ok(None);
		}
		let (key, value) = match line.split_once('=') {
			Some((key, value)) => (key.trim(), Some(value.trim())),
			None => (line, None),
		};
		let (ty, name) = key
			.split_once('/')
			.ok_or_else(|| format!("expected `type/name`, found `{key}`"))?;
		let ty: ResourceType = ty.trim().parse().map_err(|e| format!("{e}"))?;
		let name = name.trim();
		if name.is_empty() {
			return Err(format!("empty resource name in `{key}`"));
		}

		let value = match value {
			None | Some("") => ResourceValue::Empty,
			Some(text) if ty == ResourceType::Styleable => ResourceValue::Styleable(
				text.split(',')
					.map(str::trim)
					.filter(|attr| !attr.is_empty())
					.map(Arc::from)
					.collect(),
			),
			Some(text) if text.starts_with('@') => ResourceValue::Reference(Arc::from(text)),
			Some(text) => ResourceValue::text(text),
		};
		Ok(Some(ParsedItem::new(ty, name, value)))
	}
}

impl ValuesParser for LineParser {
	fn parse_values(&self, file: &ResourceFile<'_>) -> Result<Vec<ParsedItem>, ParseError> {
		let text = read(file.path)?;
		let mut items = Vec::new();
		for (number, line) in text.lines().enumerate() {
			match Self::parse_line(line) {
				Ok(Some(item)) => items.push(item),
				Ok(None) => {}
				Err(message) => {
					return Err(ParseError::new(file.path, format!("line {}: {message}", number + 1)));
				}
			}
		}
		Ok(items)
	}

	fn parse_ids(&self, file: &ResourceFile<'_>) -> Result<Vec<String>, ParseError> {
		let text = read(file.path)?;
		Ok(text
			.split("@+id/")
			.skip(1)
			.map(|rest| {
				rest.chars()
					.take_while(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '.')
					.collect::<String>()
			})
			.filter(|name| !name.is_empty())
			.collect())
	}
}

fn read(path: &Path) -> Result<String, ParseError> {
	std::fs::read_to_string(path).map_err(|error| ParseError::new(path, error.to_string()))
}
