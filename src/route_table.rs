//! Authentication route table
//!
//! Maps a logical route module (`session`, `password`, ...) to the ordered
//! actions it supports. The table is defined once and never mutated.
//!
//! # Examples
//!
//! ```
//! use reinhardt_auth_urls::route_table::{Action, RouteTable};
//!
//! let table = RouteTable::builtin();
//! let actions = table.get("session").unwrap();
//! assert_eq!(actions, &[Action::Default, Action::named("new"), Action::named("destroy")]);
//! ```

use crate::error::{UrlHelperError, UrlHelperResult};
use indexmap::IndexMap;
use std::fmt;

/// A route action. `Default` is the unprefixed action (`session_path`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Action {
	/// The unprefixed action.
	Default,
	/// A named action such as `new` or `edit`.
	Named(String),
}

impl Action {
	/// Creates a named action.
	pub fn named(name: impl Into<String>) -> Self {
		Self::Named(name.into())
	}

	/// Returns the accessor name prefix: `""` for the default action,
	/// `"new_"` for `new`.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_auth_urls::route_table::Action;
	///
	/// assert_eq!(Action::Default.prefix(), "");
	/// assert_eq!(Action::named("edit").prefix(), "edit_");
	/// ```
	pub fn prefix(&self) -> String {
		match self {
			Self::Default => String::new(),
			Self::Named(name) => format!("{}_", name),
		}
	}
}

impl fmt::Display for Action {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Default => write!(f, "default"),
			Self::Named(name) => write!(f, "{}", name),
		}
	}
}

impl From<&str> for Action {
	fn from(s: &str) -> Self {
		Action::named(s)
	}
}

/// Whether an accessor produces a relative path or an absolute url.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteKind {
	/// `*_path` accessors.
	Path,
	/// `*_url` accessors.
	Url,
}

impl RouteKind {
	/// Both kinds, in generation order.
	pub const ALL: [RouteKind; 2] = [RouteKind::Path, RouteKind::Url];

	/// Name suffix without the leading underscore.
	pub fn suffix(self) -> &'static str {
		match self {
			Self::Path => "path",
			Self::Url => "url",
		}
	}

	/// Kind of a route or accessor name, from its suffix.
	///
	/// ```
	/// use reinhardt_auth_urls::route_table::RouteKind;
	///
	/// assert_eq!(RouteKind::of_name("new_user_session_url"), Some(RouteKind::Url));
	/// assert_eq!(RouteKind::of_name("session"), None);
	/// ```
	pub fn of_name(name: &str) -> Option<Self> {
		if name.ends_with("_path") {
			Some(Self::Path)
		} else if name.ends_with("_url") {
			Some(Self::Url)
		} else {
			None
		}
	}
}

impl fmt::Display for RouteKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.suffix())
	}
}

/// Ordered, read-only table of route modules and their actions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteTable {
	entries: IndexMap<String, Vec<Action>>,
}

impl RouteTable {
	/// Creates a table builder.
	pub fn builder() -> RouteTableBuilder {
		RouteTableBuilder::default()
	}

	/// The standard authentication route table.
	///
	/// `omniauth_callback` has no actions, so no accessors are generated for it.
	pub fn builtin() -> Self {
		Self::builder()
			.module("session", [Action::Default, "new".into(), "destroy".into()])
			.module("omniauth_callback", Vec::new())
			.module("password", [Action::Default, "new".into(), "edit".into()])
			.module(
				"registration",
				[Action::Default, "new".into(), "edit".into(), "cancel".into()],
			)
			.module("confirmation", [Action::Default, "new".into()])
			.module("unlock", [Action::Default, "new".into()])
			.build()
	}

	/// Looks up the actions of a module.
	///
	/// # Errors
	///
	/// Returns `UrlHelperError::UnknownModule` if the module is not in the table.
	pub fn get(&self, module: &str) -> UrlHelperResult<&[Action]> {
		self.entries
			.get(module)
			.map(Vec::as_slice)
			.ok_or_else(|| UrlHelperError::UnknownModule(module.to_string()))
	}

	/// Returns true if the module is in the table.
	pub fn contains(&self, module: &str) -> bool {
		self.entries.contains_key(module)
	}

	/// Iterates `(module, actions)` in definition order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &[Action])> {
		self.entries
			.iter()
			.map(|(module, actions)| (module.as_str(), actions.as_slice()))
	}

	/// Module names in definition order.
	pub fn modules(&self) -> impl Iterator<Item = &str> {
		self.entries.keys().map(String::as_str)
	}

	/// Number of modules.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns true if the table has no modules.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Returns the sub-table of the given modules, in table order.
	///
	/// Names that are not in the table are ignored.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_auth_urls::route_table::RouteTable;
	///
	/// let table = RouteTable::builtin();
	/// let subset = table.slice(["unlock", "session", "nope"]);
	/// assert_eq!(subset.modules().collect::<Vec<_>>(), vec!["session", "unlock"]);
	/// ```
	pub fn slice<I, S>(&self, modules: I) -> RouteTable
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let wanted: Vec<S> = modules.into_iter().collect();
		let entries = self
			.entries
			.iter()
			.filter(|(module, _)| wanted.iter().any(|w| w.as_ref() == module.as_str()))
			.map(|(module, actions)| (module.clone(), actions.clone()))
			.collect();

		RouteTable { entries }
	}
}

/// Builder for `RouteTable`.
#[derive(Debug, Default)]
pub struct RouteTableBuilder {
	entries: IndexMap<String, Vec<Action>>,
}

impl RouteTableBuilder {
	/// Adds a module. Adding the same module twice replaces its actions but
	/// keeps its original position.
	pub fn module<I>(mut self, name: impl Into<String>, actions: I) -> Self
	where
		I: IntoIterator<Item = Action>,
	{
		self.entries
			.insert(name.into(), actions.into_iter().collect());
		self
	}

	/// Builds the table.
	pub fn build(self) -> RouteTable {
		RouteTable {
			entries: self.entries,
		}
	}
}
