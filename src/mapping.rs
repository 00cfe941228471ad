//! Authentication scope mappings
//!
//! A [`Mapping`] records one mounted authentication scope: its name, the
//! resource class it authenticates and the route modules it needs helpers
//! for. The [`MappingRegistry`] owns every mapping of the process, keyed by
//! scope name, and keeps a class-name index built at registration time so
//! that scope resolution is a map probe per ancestor level.

use crate::resource::ResourceClass;
use crate::route_table::RouteTable;
use indexmap::{IndexMap, IndexSet};

/// One mounted authentication scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mapping {
	scope_name: String,
	class_name: String,
	used_helpers: IndexSet<String>,
}

impl Mapping {
	/// Creates a mapping for `class_name` mounted under `scope_name`.
	///
	/// The mapping uses every module of [`RouteTable::builtin`] until
	/// [`with_helpers`](Self::with_helpers) narrows it.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_auth_urls::mapping::Mapping;
	///
	/// let mapping = Mapping::new("user", "User").skip_helpers(["unlock"]);
	/// assert_eq!(mapping.scope_name(), "user");
	/// assert!(mapping.uses_helper("session"));
	/// assert!(!mapping.uses_helper("unlock"));
	/// ```
	pub fn new(scope_name: impl Into<String>, class_name: impl Into<String>) -> Self {
		Self {
			scope_name: scope_name.into(),
			class_name: class_name.into(),
			used_helpers: RouteTable::builtin().modules().map(String::from).collect(),
		}
	}

	/// Creates a mapping for a class descriptor, scoped under the class's
	/// default scope name (`AdminUser` -> `admin_user`).
	pub fn for_class(class: &ResourceClass) -> Self {
		Self::new(class.default_scope(), class.name())
	}

	/// Replaces the modules this mapping needs helpers for.
	pub fn with_helpers<I, S>(mut self, modules: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.used_helpers = modules.into_iter().map(Into::into).collect();
		self
	}

	/// Removes modules from the helpers this mapping needs.
	pub fn skip_helpers<I, S>(mut self, modules: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		for module in modules {
			self.used_helpers.shift_remove(module.as_ref());
		}
		self
	}

	/// Scope name, e.g. `user`.
	pub fn scope_name(&self) -> &str {
		&self.scope_name
	}

	/// Name of the resource class this mapping is registered for.
	pub fn class_name(&self) -> &str {
		&self.class_name
	}

	/// Modules this mapping needs helpers for, in configuration order.
	pub fn used_helpers(&self) -> &IndexSet<String> {
		&self.used_helpers
	}

	/// Returns true if this mapping needs helpers for `module`.
	pub fn uses_helper(&self, module: &str) -> bool {
		self.used_helpers.contains(module)
	}
}

/// Registry of mappings keyed by scope name, in registration order.
#[derive(Debug, Clone, Default)]
pub struct MappingRegistry {
	mappings: IndexMap<String, Mapping>,
	// class name -> scope of the first mapping registered for it
	class_index: IndexMap<String, String>,
}

impl MappingRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a mapping and returns the one it replaced, if any.
	///
	/// Replacing a scope keeps its original registration position.
	pub fn register(&mut self, mapping: Mapping) -> Option<Mapping> {
		tracing::debug!(
			scope = %mapping.scope_name,
			class = %mapping.class_name,
			helpers = mapping.used_helpers.len(),
			"registering authentication mapping"
		);

		let previous = self.mappings.insert(mapping.scope_name.clone(), mapping);
		self.rebuild_class_index();
		previous
	}

	/// Removes the mapping for a scope.
	pub fn remove(&mut self, scope_name: &str) -> Option<Mapping> {
		let removed = self.mappings.shift_remove(scope_name);
		if removed.is_some() {
			self.rebuild_class_index();
		}
		removed
	}

	/// Removes every mapping.
	pub fn clear(&mut self) {
		self.mappings.clear();
		self.class_index.clear();
	}

	/// Looks up a mapping by scope name.
	pub fn get(&self, scope_name: &str) -> Option<&Mapping> {
		self.mappings.get(scope_name)
	}

	/// Returns the registered scope name equal to `scope_name`, if any.
	pub fn scope(&self, scope_name: &str) -> Option<&str> {
		self.mappings
			.get_key_value(scope_name)
			.map(|(scope, _)| scope.as_str())
	}

	/// Returns the scope registered for exactly this class name.
	pub fn scope_for_class(&self, class_name: &str) -> Option<&str> {
		self.class_index.get(class_name).map(String::as_str)
	}

	/// Iterates mappings in registration order.
	pub fn iter(&self) -> impl Iterator<Item = &Mapping> {
		self.mappings.values()
	}

	/// Scope names in registration order.
	pub fn scopes(&self) -> impl Iterator<Item = &str> {
		self.mappings.keys().map(String::as_str)
	}

	/// Number of registered mappings.
	pub fn len(&self) -> usize {
		self.mappings.len()
	}

	/// Returns true if no mapping is registered.
	pub fn is_empty(&self) -> bool {
		self.mappings.is_empty()
	}

	/// Union of the used helpers of every mapping, first occurrence order.
	pub fn used_helpers(&self) -> IndexSet<&str> {
		self.mappings
			.values()
			.flat_map(|mapping| mapping.used_helpers.iter().map(String::as_str))
			.collect()
	}

	fn rebuild_class_index(&mut self) {
		self.class_index.clear();
		for mapping in self.mappings.values() {
			self.class_index
				.entry(mapping.class_name.clone())
				.or_insert_with(|| mapping.scope_name.clone());
		}
	}
}

impl FromIterator<Mapping> for MappingRegistry {
	fn from_iter<I: IntoIterator<Item = Mapping>>(iter: I) -> Self {
		let mut registry = Self::new();
		for mapping in iter {
			registry.register(mapping);
		}
		registry
	}
}
