use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use resdex_repository::{
	CompiledIdTable, DynamicIdAllocator, EngineConfig, ExactMatcher, FallbackMatcher,
	FolderRegistry, LineParser, ModuleRoots, QualifierMatcher, Qualifiers, RepositoryManager,
	ResourceIdResolver, ResourceRepository, ResourceType, Selection, resolve_value,
};
use tracing::{debug, info};

use crate::cli::Command;

/// One module, its local dependencies and the leaves behind them.
pub struct Session {
	registry: FolderRegistry,
	app: RepositoryManager,
}

impl Session {
	/// Scans every directory and wires the module tree.
	pub fn open(config: &EngineConfig, res: &[PathBuf], deps: &[PathBuf]) -> anyhow::Result<Self> {
		let registry = FolderRegistry::new(Arc::new(LineParser), config.scan.clone());

		let mut dependencies = Vec::with_capacity(deps.len());
		for dir in deps {
			let leaf = registry
				.get_or_create(dir)
				.with_context(|| format!("scanning dependency {}", dir.display()))?;
			let name = dir
				.parent()
				.and_then(|module| module.file_name())
				.map(|name| name.to_string_lossy().into_owned())
				.unwrap_or_else(|| dir.display().to_string());
			dependencies.push(Arc::new(RepositoryManager::new(
				&name,
				ModuleRoots {
					folders: vec![leaf],
					..ModuleRoots::default()
				},
				ResourceIdResolver::default(),
			)));
		}

		let folders = res
			.iter()
			.map(|dir| {
				registry
					.get_or_create(dir)
					.with_context(|| format!("scanning {}", dir.display()))
			})
			.collect::<anyhow::Result<Vec<_>>>()?;

		let ids = ResourceIdResolver::new(
			CompiledIdTable::new(),
			DynamicIdAllocator::with_base(config.ids.dynamic_base)?,
		);
		let app = RepositoryManager::new(
			"app",
			ModuleRoots {
				folders,
				dependencies,
				libraries: Vec::new(),
			},
			ids,
		);
		app.set_build_values(config.build_values()?);
		info!(
			folders = registry.len(),
			build_values = config.values.len(),
			"resource tree ready"
		);

		Ok(Self { registry, app })
	}

	pub fn run(&self, command: &Command, out: &mut impl Write) -> anyhow::Result<()> {
		let repo = self.app.app_resources();
		debug!(?command, generation = repo.modification_count(), "running command");
		match command {
			Command::Dump { ty } => {
				let types = match ty {
					Some(ty) => vec![parse_type(ty)?],
					None => repo.types_present().into_iter().collect(),
				};
				for ty in types {
					for items in repo.items_of_type(ty).values() {
						for item in items {
							writeln!(out, "{}\t{}\t{}", item.reference(), item.qualifiers(), item.value())?;
						}
					}
				}
			}
			Command::Resolve {
				reference,
				qualifiers,
				exact,
			} => {
				let (ty, name) = parse_reference(reference)?;
				let matcher: &dyn QualifierMatcher = if *exact { &ExactMatcher } else { &FallbackMatcher };
				match resolve_value(repo.as_ref(), ty, name, &Qualifiers::new(qualifiers), matcher) {
					Selection::Resolved(item) => writeln!(out, "{}", item.value())?,
					Selection::NoMatch => bail!("{reference} has no variant for `{qualifiers}`"),
					Selection::Missing => bail!("{reference} is not declared"),
				}
			}
			Command::Types => {
				for ty in repo.types_present() {
					writeln!(out, "{ty}")?;
				}
			}
			Command::Id { reference } => {
				let (ty, name) = parse_reference(reference)?;
				if !repo.has_item(ty, name) {
					bail!("{reference} is not declared");
				}
				let id = self.app.ids().id_for(ty, name)?;
				let kind = if id.is_dynamic() { "dynamic" } else { "compiled" };
				writeln!(out, "{id}\t{kind}")?;
			}
		}
		Ok(())
	}

	/// Number of scanned resource directories.
	pub fn folder_count(&self) -> usize {
		self.registry.len()
	}
}

impl Drop for Session {
	fn drop(&mut self) {
		self.app.dispose();
		self.registry.reset();
	}
}

fn parse_type(ty: &str) -> anyhow::Result<ResourceType> {
	ty.parse().with_context(|| format!("`{ty}` is not a resource type"))
}

/// Splits `@type/name` or `type/name`.
pub fn parse_reference(reference: &str) -> anyhow::Result<(ResourceType, &str)> {
	let trimmed = reference.strip_prefix('@').unwrap_or(reference);
	let Some((ty, name)) = trimmed.split_once('/') else {
		bail!("expected `type/name`, found `{reference}`");
	};
	if name.is_empty() {
		bail!("empty resource name in `{reference}`");
	}
	Ok((parse_type(ty)?, name))
}
