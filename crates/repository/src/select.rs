//! Qualifier-based value selection.
//!
//! The engine only supplies the complete candidate list for one resource; picking the
//! variant that suits a device configuration is a [`QualifierMatcher`]'s job.

use std::sync::Arc;

use resdex_primitives::{Qualifiers, ResourceItem, ResourceType};

use crate::node::ResourceRepository;

/// Picks the best variant of one resource for a target configuration.
///
/// Implementations must be pure: the same candidates and target always give the same
/// answer.
pub trait QualifierMatcher: Send + Sync {
	fn best_match<'a>(
		&self,
		candidates: &'a [Arc<ResourceItem>],
		target: &Qualifiers,
	) -> Option<&'a Arc<ResourceItem>>;
}

impl<F> QualifierMatcher for F
where
	F: for<'a> Fn(&'a [Arc<ResourceItem>], &Qualifiers) -> Option<&'a Arc<ResourceItem>>
		+ Send
		+ Sync,
{
	fn best_match<'a>(
		&self,
		candidates: &'a [Arc<ResourceItem>],
		target: &Qualifiers,
	) -> Option<&'a Arc<ResourceItem>> {
		self(candidates, target)
	}
}

/// Accepts only a variant whose qualifiers equal the target exactly.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactMatcher;

impl QualifierMatcher for ExactMatcher {
	fn best_match<'a>(
		&self,
		candidates: &'a [Arc<ResourceItem>],
		target: &Qualifiers,
	) -> Option<&'a Arc<ResourceItem>> {
		candidates.iter().find(|item| item.qualifiers() == target)
	}
}

/// Exact match first, then the default-configuration variant.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackMatcher;

impl QualifierMatcher for FallbackMatcher {
	fn best_match<'a>(
		&self,
		candidates: &'a [Arc<ResourceItem>],
		target: &Qualifiers,
	) -> Option<&'a Arc<ResourceItem>> {
		ExactMatcher
			.best_match(candidates, target)
			.or_else(|| candidates.iter().find(|item| item.qualifiers().is_default()))
	}
}

/// Outcome of selecting one resource for a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
	/// The matcher picked this variant.
	Resolved(Arc<ResourceItem>),
	/// The resource exists but no variant suits the configuration.
	NoMatch,
	/// No variant of the resource is declared at all.
	Missing,
}

impl Selection {
	pub fn item(&self) -> Option<&Arc<ResourceItem>> {
		match self {
			Self::Resolved(item) => Some(item),
			Self::NoMatch | Self::Missing => None,
		}
	}
}

/// Fetches every variant of `(ty, name)` from `repo` and lets `matcher` choose.
pub fn resolve_value(
	repo: &dyn ResourceRepository,
	ty: ResourceType,
	name: &str,
	target: &Qualifiers,
	matcher: &dyn QualifierMatcher,
) -> Selection {
	let candidates = repo.items(ty, name);
	if candidates.is_empty() {
		return Selection::Missing;
	}
	match matcher.best_match(&candidates, target) {
		Some(item) => Selection::Resolved(Arc::clone(item)),
		None => Selection::NoMatch,
	}
}
