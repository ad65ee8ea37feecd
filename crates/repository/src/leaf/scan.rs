//! Directory walking for [`FolderRepository`](super::FolderRepository).
//!
//! # Role
//!
//! Maps files under a resource directory to declarations. Only the immediate
//! `<folder-type>[-<qualifiers>]` subdirectories of the root are considered, and only the
//! regular files directly inside them.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use resdex_primitives::{
	Qualifiers, ResourceFolderType, ResourceItem, ResourceType, ResourceValue, SourceLocation,
};
use tracing::{trace, warn};

use super::parse::{ResourceFile, ValuesParser};
use crate::config::ScanOptions;
use crate::error::ScanError;

/// Declarations contributed by each file, keyed by path.
pub(crate) type FileIndex = BTreeMap<PathBuf, Vec<Arc<ResourceItem>>>;

pub(crate) struct Scanner<'a> {
	pub(crate) root: &'a Path,
	pub(crate) parser: &'a dyn ValuesParser,
	pub(crate) options: &'a ScanOptions,
}

impl Scanner<'_> {
	/// Scans every resource folder under the root.
	pub(crate) fn scan_root(&self, files: &mut FileIndex) -> Result<(), ScanError> {
		if !self.root.is_dir() {
			return Err(ScanError::NotADirectory(self.root.to_path_buf()));
		}
		let entries = fs::read_dir(self.root).map_err(|error| ScanError::Io {
			path: self.root.to_path_buf(),
			error,
		})?;

		let mut folders: Vec<PathBuf> = entries
			.filter_map(Result::ok)
			.map(|entry| entry.path())
			.filter(|path| path.is_dir())
			.collect();
		folders.sort();

		for folder in folders {
			self.scan_folder(&folder, files);
		}
		Ok(())
	}

	/// Scans one immediate subdirectory of the root. Non-resource folders are skipped.
	pub(crate) fn scan_folder(&self, folder: &Path, files: &mut FileIndex) {
		let Some((kind, qualifiers)) = folder_kind(folder) else {
			trace!(folder = %folder.display(), "not a resource folder");
			return;
		};

		let entries = match fs::read_dir(folder) {
			Ok(entries) => entries,
			Err(error) => {
				warn!(folder = %folder.display(), %error, "unreadable resource folder skipped");
				return;
			}
		};

		let mut paths: Vec<PathBuf> = entries
			.filter_map(Result::ok)
			.map(|entry| entry.path())
			.filter(|path| path.is_file())
			.collect();
		paths.sort();

		for path in paths {
			if let Some(items) = self.scan_file(&path, kind, &qualifiers) {
				files.insert(path, items);
			}
		}
	}

	/// Re-reads whatever lives at `path` after a change event.
	///
	/// Every declaration previously contributed by `path` (or by files below it) is dropped
	/// first, so removals, additions and edits are handled alike.
	pub(crate) fn rescan_path(&self, path: &Path, files: &mut FileIndex) {
		files.retain(|file, _| !file.starts_with(path));

		if path == self.root {
			if let Err(error) = self.scan_root(files) {
				warn!(%error, "resource directory rescan failed");
			}
			return;
		}

		if path.parent() == Some(self.root) {
			if path.is_dir() {
				self.scan_folder(path, files);
			}
			return;
		}

		let Some(folder) = path.parent() else {
			return;
		};
		if folder.parent() != Some(self.root) || !path.is_file() {
			trace!(path = %path.display(), "change outside resource folders ignored");
			return;
		}
		let Some((kind, qualifiers)) = folder_kind(folder) else {
			return;
		};
		if let Some(items) = self.scan_file(path, kind, &qualifiers) {
			files.insert(path.to_path_buf(), items);
		}
	}

	/// Reads the declarations of one file. `None` if the file is not a resource file.
	fn scan_file(
		&self,
		path: &Path,
		kind: ResourceFolderType,
		qualifiers: &Qualifiers,
	) -> Option<Vec<Arc<ResourceItem>>> {
		let file_name = path.file_name()?.to_str()?;
		if self.options.is_ignored(file_name) {
			return None;
		}

		let source = SourceLocation::File(Arc::from(path));
		let file = ResourceFile {
			path,
			folder: kind,
			qualifiers,
		};
		let stamp = |item: ResourceItem| {
			Arc::new(
				item.with_qualifiers(qualifiers.clone())
					.with_source(source.clone()),
			)
		};

		let Some(ty) = kind.file_resource_type() else {
			return Some(match self.parser.parse_values(&file) {
				Ok(parsed) => parsed
					.into_iter()
					.map(|p| stamp(ResourceItem::new(p.ty, &p.name, Qualifiers::DEFAULT, p.value)))
					.collect(),
				Err(error) => {
					warn!(%error, "malformed values file skipped");
					Vec::new()
				}
			});
		};

		let name = resource_name(file_name);
		if name.is_empty() {
			return None;
		}
		let mut items = vec![stamp(ResourceItem::new(
			ty,
			name,
			Qualifiers::DEFAULT,
			ResourceValue::File(Arc::from(path)),
		))];

		if kind.is_id_generating() {
			match self.parser.parse_ids(&file) {
				Ok(ids) => items.extend(ids.iter().map(|id| {
					stamp(ResourceItem::new(
						ResourceType::Id,
						id,
						Qualifiers::DEFAULT,
						ResourceValue::Empty,
					))
				})),
				Err(error) => warn!(%error, "inline ids of malformed file skipped"),
			}
		}
		Some(items)
	}
}

fn folder_kind(folder: &Path) -> Option<(ResourceFolderType, Qualifiers)> {
	ResourceFolderType::from_folder_name(folder.file_name()?.to_str()?)
}

/// Resource name of a file: the file name up to its first `.`.
///
/// `ic_launcher.9.png` → `ic_launcher`.
pub(crate) fn resource_name(file_name: &str) -> &str {
	file_name.split('.').next().unwrap_or(file_name)
}
