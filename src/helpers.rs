//! URL helper generation
//!
//! One [`UrlHelper`] is generated per `(action, module, path|url)` for the
//! route modules actually used by the registered mappings, and installed in
//! a [`HelperNamespace`] under its accessor name:
//!
//! ```text
//! new_session_path(user)      => new_user_session_path
//! session_url(admin)          => admin_session_url
//! edit_password_path(user)    => edit_user_password_path
//! ```

use crate::context::{RouteArgs, RouteContextProvider, RouteEnvironment};
use crate::error::{UrlHelperError, UrlHelperResult};
use crate::mapping::MappingRegistry;
use crate::resolver::ScopeResolver;
use crate::resource::ResourceRef;
use crate::route_table::{Action, RouteKind, RouteTable};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

static GENERATED_NAME: Lazy<Regex> =
	Lazy::new(|| Regex::new(r"_(path|url)$").expect("valid accessor name pattern"));

/// A generated accessor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlHelper {
	name: String,
	action: Action,
	module: String,
	kind: RouteKind,
}

impl UrlHelper {
	/// Creates the accessor for `action` of `module`.
	///
	/// ```
	/// use reinhardt_auth_urls::helpers::UrlHelper;
	/// use reinhardt_auth_urls::route_table::{Action, RouteKind};
	///
	/// let helper = UrlHelper::new(Action::named("new"), "session", RouteKind::Path);
	/// assert_eq!(helper.name(), "new_session_path");
	/// assert_eq!(helper.target_name("admin"), "new_admin_session_path");
	/// ```
	pub fn new(action: Action, module: impl Into<String>, kind: RouteKind) -> Self {
		let module = module.into();
		let name = format!("{}{}_{}", action.prefix(), module, kind.suffix());
		Self {
			name,
			action,
			module,
			kind,
		}
	}

	/// Accessor name, e.g. `new_session_path`.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Route action.
	pub fn action(&self) -> &Action {
		&self.action
	}

	/// Route module.
	pub fn module(&self) -> &str {
		&self.module
	}

	/// Path or url.
	pub fn kind(&self) -> RouteKind {
		self.kind
	}

	/// Name of the scoped route function this accessor dispatches to.
	pub fn target_name(&self, scope: &str) -> String {
		format!(
			"{}{}_{}_{}",
			self.action.prefix(),
			scope,
			self.module,
			self.kind.suffix()
		)
	}

	/// Invokes the accessor.
	///
	/// Resolves `resource` to a scope, obtains the route context of `env`
	/// and calls the scoped route function with `args`, returning its result
	/// unchanged.
	///
	/// # Errors
	///
	/// - `ScopeResolution` if `resource` matches no mapping
	/// - `UnknownRouter` if `env` exposes no router under the provider's name
	/// - `MissingRouteFunction` if the route context lacks the scoped function
	/// - any error returned by the route function itself
	pub fn call<E>(
		&self,
		mappings: &MappingRegistry,
		provider: &RouteContextProvider,
		env: &E,
		resource: ResourceRef<'_>,
		args: &RouteArgs,
	) -> UrlHelperResult<String>
	where
		E: RouteEnvironment + ?Sized,
	{
		let scope = ScopeResolver::new(mappings).find_scope(resource)?;
		let context = provider.get_route_context(env)?;
		let target = self.target_name(scope);

		tracing::trace!(helper = %self.name, %target, "dispatching url helper");

		context
			.call_route(&target, args)
			.unwrap_or(Err(UrlHelperError::MissingRouteFunction { name: target }))
	}
}

/// Accessors installed by name.
#[derive(Debug, Clone, Default)]
pub struct HelperNamespace {
	helpers: IndexMap<String, UrlHelper>,
}

impl HelperNamespace {
	/// Creates an empty namespace.
	pub fn new() -> Self {
		Self::default()
	}

	/// Installs an accessor, silently replacing one with the same name.
	pub fn install(&mut self, helper: UrlHelper) -> Option<UrlHelper> {
		self.helpers.insert(helper.name.clone(), helper)
	}

	/// Looks up an accessor.
	///
	/// # Errors
	///
	/// Returns `UrlHelperError::HelperNotFound` if nothing is installed under `name`.
	pub fn get(&self, name: &str) -> UrlHelperResult<&UrlHelper> {
		self.helpers
			.get(name)
			.ok_or_else(|| UrlHelperError::HelperNotFound(name.to_string()))
	}

	/// Returns true if an accessor is installed under `name`.
	pub fn contains(&self, name: &str) -> bool {
		self.helpers.contains_key(name)
	}

	/// Installed accessor names, in installation order.
	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.helpers.keys().map(String::as_str)
	}

	/// Iterates installed accessors.
	pub fn iter(&self) -> impl Iterator<Item = &UrlHelper> {
		self.helpers.values()
	}

	/// Number of installed accessors.
	pub fn len(&self) -> usize {
		self.helpers.len()
	}

	/// Returns true if nothing is installed.
	pub fn is_empty(&self) -> bool {
		self.helpers.is_empty()
	}

	/// Removes every installed accessor whose name ends in `_path` or `_url`,
	/// regardless of which generation installed it. Returns how many were
	/// removed.
	pub fn remove_helpers(&mut self) -> usize {
		let before = self.helpers.len();
		self.helpers
			.retain(|name, _| !GENERATED_NAME.is_match(name));
		let removed = before - self.helpers.len();

		tracing::debug!(removed, "removed url helpers");
		removed
	}
}

/// Builds accessors from a route table for the modules used by a mapping
/// registry.
#[derive(Debug, Clone, Copy)]
pub struct HelperGenerator<'a> {
	table: &'a RouteTable,
	mappings: &'a MappingRegistry,
}

impl<'a> HelperGenerator<'a> {
	/// Creates a generator.
	pub fn new(table: &'a RouteTable, mappings: &'a MappingRegistry) -> Self {
		Self { table, mappings }
	}

	/// Modules used by any registered mapping, restricted to the route
	/// table, in table order.
	pub fn effective_subset(&self) -> RouteTable {
		let used = self.mappings.used_helpers();
		for module in used.iter().filter(|module| !self.table.contains(module)) {
			tracing::warn!(module = %module, "mapping uses a module unknown to the route table");
		}
		self.table.slice(used)
	}

	/// Installs accessors for `subset`, or for the effective subset when
	/// `None`. Returns the number of accessors installed.
	pub fn generate_helpers(
		&self,
		namespace: &mut HelperNamespace,
		subset: Option<&RouteTable>,
	) -> usize {
		match subset {
			Some(routes) => install_routes(namespace, routes),
			None => install_routes(namespace, &self.effective_subset()),
		}
	}

	/// Installs accessors for the named modules of the route table.
	///
	/// # Errors
	///
	/// Returns `UrlHelperError::UnknownModule` for the first name missing
	/// from the route table. Nothing is installed in that case.
	pub fn generate_modules<I, S>(
		&self,
		namespace: &mut HelperNamespace,
		modules: I,
	) -> UrlHelperResult<usize>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut builder = RouteTable::builder();
		for module in modules {
			let module = module.as_ref();
			let actions = self.table.get(module)?;
			builder = builder.module(module, actions.iter().cloned());
		}
		Ok(install_routes(namespace, &builder.build()))
	}
}

fn install_routes(namespace: &mut HelperNamespace, routes: &RouteTable) -> usize {
	let mut installed = 0;
	for (module, actions) in routes.iter() {
		for kind in RouteKind::ALL {
			for action in actions {
				namespace.install(UrlHelper::new(action.clone(), module, kind));
				installed += 1;
			}
		}
	}

	tracing::debug!(
		installed,
		modules = routes.len(),
		total = namespace.len(),
		"generated url helpers"
	);
	installed
}
