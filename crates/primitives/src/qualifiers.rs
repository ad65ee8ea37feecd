use std::fmt;
use std::sync::Arc;

/// Configuration qualifier token attached to one variant of a resource.
///
/// This is the folder suffix after the first `-` (`values-fr-rCA` → `fr-rCA`), kept as an
/// opaque string. The empty token is the default configuration. Equality is exact string
/// equality; compatibility and best-match rules belong to a matcher outside this crate.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Qualifiers(Option<Arc<str>>);

impl Qualifiers {
	/// The default (unqualified) configuration.
	pub const DEFAULT: Qualifiers = Qualifiers(None);

	/// Creates a qualifier token. An empty string yields [`Qualifiers::DEFAULT`].
	pub fn new(token: &str) -> Self {
		if token.is_empty() {
			Self::DEFAULT
		} else {
			Self(Some(Arc::from(token)))
		}
	}

	/// Splits a resource folder name into its base name and qualifier token.
	///
	/// `"values-fr"` → `("values", fr)`, `"layout"` → `("layout", default)`.
	pub fn split_folder_name(folder: &str) -> (&str, Qualifiers) {
		match folder.split_once('-') {
			Some((base, rest)) => (base, Self::new(rest)),
			None => (folder, Self::DEFAULT),
		}
	}

	/// Returns the raw token; empty for the default configuration.
	pub fn as_str(&self) -> &str {
		self.0.as_deref().unwrap_or("")
	}

	/// Returns true for the default configuration.
	pub fn is_default(&self) -> bool {
		self.0.is_none()
	}

	/// Returns the locale named by the token, if any.
	///
	/// The locale follows any `mcc`/`mnc` network codes and is either a legacy
	/// `ll[-rRR]` pair (`fr-rCA`) or a `b+` tag (`b+sr+Latn+RS`).
	pub fn locale(&self) -> Option<LocaleQualifier<'_>> {
		let mut segments = self.as_str().split('-').skip_while(|s| is_network_code(s));
		let first = segments.next()?;

		if let Some(tag) = first.strip_prefix("b+") {
			let mut subtags = tag.split('+');
			let language = subtags.next().filter(|l| is_language(l))?;
			return Some(LocaleQualifier {
				language,
				region: subtags.find(|s| is_region(s)),
			});
		}

		if !is_language(first) || NOT_LANGUAGES.contains(&first) {
			return None;
		}
		let region = segments
			.next()
			.and_then(|s| s.strip_prefix('r'))
			.filter(|r| is_region(r));
		Some(LocaleQualifier {
			language: first,
			region,
		})
	}
}

/// Language and optional region of a qualifier token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LocaleQualifier<'a> {
	/// ISO 639 language code.
	pub language: &'a str,
	/// ISO 3166 region code or UN M.49 area code.
	pub region: Option<&'a str>,
}

impl fmt::Display for LocaleQualifier<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.region {
			Some(region) => write!(f, "{}-{region}", self.language),
			None => f.write_str(self.language),
		}
	}
}

/// Qualifier values shaped like a language code.
const NOT_LANGUAGES: &[&str] = &["car"];

fn is_network_code(segment: &str) -> bool {
	(segment.starts_with("mcc") || segment.starts_with("mnc"))
		&& segment.len() > 3
		&& segment[3..].bytes().all(|b| b.is_ascii_digit())
}

fn is_language(segment: &str) -> bool {
	(2..=3).contains(&segment.len()) && segment.bytes().all(|b| b.is_ascii_lowercase())
}

fn is_region(segment: &str) -> bool {
	match segment.len() {
		2 => segment.bytes().all(|b| b.is_ascii_alphabetic()),
		3 => segment.bytes().all(|b| b.is_ascii_digit()),
		_ => false,
	}
}

impl Default for Qualifiers {
	fn default() -> Self {
		Self::DEFAULT
	}
}

impl From<&str> for Qualifiers {
	fn from(token: &str) -> Self {
		Self::new(token)
	}
}

impl fmt::Debug for Qualifiers {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.is_default() {
			f.write_str("Qualifiers(default)")
		} else {
			write!(f, "Qualifiers({:?})", self.as_str())
		}
	}
}

impl fmt::Display for Qualifiers {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.is_default() {
			f.write_str("default")
		} else {
			f.write_str(self.as_str())
		}
	}
}
