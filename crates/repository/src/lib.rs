#![cfg_attr(doc, allow(rustdoc::private_intra_doc_links))]
//! Hierarchical resource repositories.
//!
//! # Purpose
//!
//! Resources are declared in many places: per-module resource folders, precompiled library
//! packages and values injected by the build. This crate combines the per-source item sets
//! into one merged, incrementally updated view per module, project and application.
//!
//! # Mental Model
//!
//! 1. **Leaves:** a [`FolderRepository`], [`PackageRepository`] or [`SyntheticRepository`]
//!    owns the items of exactly one source and a monotonic modification count that moves
//!    once per applied batch of changes.
//! 2. **Composites:** a [`CompositeRepository`] owns an ordered child list (later children
//!    take precedence) and lazily caches the merged view per [`ResourceType`].
//! 3. **Staleness:** a composite polls its children's modification counts on every query.
//!    Any change discards the whole cache and bumps the composite's own count, which its
//!    own parents observe the same way. Nothing is recomputed eagerly.
//! 4. **Selection:** [`resolve_value`] hands the merged candidate list to an external
//!    [`QualifierMatcher`].
//!
//! # Precedence Contract
//!
//! - Later children win. For non-`Id` types an item from a lower-precedence child is kept
//!   only if no higher-precedence item of the same name carries equal qualifiers.
//! - `Id` declarations are never suppressed.
//!
//! - Enforced in: [`crate::composite::merge::merge_into`]
//! - Tested by: [`crate::invariants::test_merge_precedence`], [`crate::invariants::test_id_non_suppression`]
//!
//! # Concurrency
//!
//! - **Reads:** any thread. Leaf contents are published through `ArcSwap`; a composite
//!   holds its cache lock only while checking or storing, never while calling children.
//! - **Writes:** a leaf rescan runs under that leaf's scan lock. A composite only caches a
//!   merge if no child moved while it was computed.
//!
//! # Invariants
//!
//! - Modification counts never decrease.
//!   - Enforced in: [`crate::node::ModificationTracker`], [`crate::composite::cache::CacheState::observe`]
//!   - Tested by: [`crate::invariants::test_monotonic_generation`]
//!
//! - A composite with one child answers exactly like the child.
//!   - Enforced in: [`CompositeRepository::items_of_type`]
//!   - Tested by: [`crate::invariants::test_single_child_equivalence`]
//!
//! - A change deep in the tree is visible at the root on the next query.
//!   - Enforced in: [`crate::composite::cache::CacheState::observe`]
//!   - Tested by: [`crate::invariants::test_invalidation_propagation`]
//!
//! - Dynamic ids are stable, unique and outside the compiled range.
//!   - Enforced in: [`crate::ids::DynamicIdAllocator::get_or_assign`]
//!   - Tested by: [`crate::invariants::test_dynamic_id_stability`]

pub mod composite;
pub mod config;
pub mod error;
pub mod ids;
pub mod leaf;
pub mod manager;
pub mod node;
pub mod registry;
pub mod select;

pub use composite::CompositeRepository;
pub use config::{EngineConfig, IdOptions, LogOptions, ScanOptions, ValueEntry};
pub use error::{ConfigError, IdError, ParseError, ScanError};
pub use ids::{CompiledIdTable, DynamicIdAllocator, ResourceIdResolver};
pub use leaf::{
	FolderRepository, LineParser, NoValues, PackageRepository, ParsedItem, ResourceChange, ResourceFile,
	SyntheticRepository, ValuesParser,
};
pub use manager::{ModuleRoots, RepositoryManager};
pub use node::{ItemList, ModificationTracker, ResourceItemMap, ResourceRepository};
pub use registry::FolderRegistry;
pub use resdex_primitives::{
	LocaleQualifier, Qualifiers, ResourceFolderType, ResourceId, ResourceItem, ResourceType, ResourceValue,
	SourceLocation,
};
pub use select::{ExactMatcher, FallbackMatcher, QualifierMatcher, Selection, resolve_value};

#[cfg(any(test, doc))]
pub(crate) mod invariants;

#[cfg(test)]
pub(crate) mod test_fixtures;
