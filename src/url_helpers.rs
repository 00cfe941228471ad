//! URL helper registry
//!
//! [`UrlHelpers`] owns the route table, the mapping registry and the
//! installed accessors. Its lifecycle is:
//!
//! 1. [`UrlHelpers::init`] at bootstrap: register the configured mappings and
//!    generate their helpers.
//! 2. [`UrlHelpers::call`] from request handling.
//! 3. [`UrlHelpers::reload`] (or [`regenerate_helpers`](UrlHelpers::regenerate_helpers)
//!    after [`register_mapping`](UrlHelpers::register_mapping)) on reconfiguration.
//!
//! Generation and removal take `&mut self`. Hosts that handle requests while
//! reconfiguring must serialize access themselves.
//!
//! # Examples
//!
//! ```
//! use reinhardt_auth_urls::prelude::*;
//! use std::sync::Arc;
//!
//! let settings = UrlHelperSettings::new()
//!     .with_mapping(MappingSettings::new("user", "User").with_helpers(["session"]))
//!     .with_mapping(MappingSettings::new("admin", "Admin").with_helpers(["session"]));
//! let helpers = UrlHelpers::init(&settings).unwrap();
//!
//! let routes = NamedRoutes::new()
//!     .with_route("user_session_path", "/users/sign_in")
//!     .with_route("admin_session_path", "/admin/sign_in");
//! let env = RequestContext::new().with_router("main_app", Arc::new(routes));
//!
//! let args = RouteArgs::new();
//! assert_eq!(helpers.call("session_path", &env, "user", &args).unwrap(), "/users/sign_in");
//! assert_eq!(helpers.call("session_path", &env, "admin", &args).unwrap(), "/admin/sign_in");
//! assert!(helpers.call("session_path", &env, "guest", &args).is_err());
//! ```

use crate::context::{RouteArgs, RouteContext, RouteContextProvider, RouteEnvironment};
use crate::error::UrlHelperResult;
use crate::helpers::{HelperGenerator, HelperNamespace, UrlHelper};
use crate::mapping::{Mapping, MappingRegistry};
use crate::resolver::ScopeResolver;
use crate::resource::ResourceRef;
use crate::route_table::RouteTable;
use crate::settings::{DefaultUrlOptions, UrlHelperSettings};
use std::sync::Arc;

/// Owner of the route table, the mappings and the generated accessors.
#[derive(Debug, Clone)]
pub struct UrlHelpers {
	table: RouteTable,
	mappings: MappingRegistry,
	namespace: HelperNamespace,
	provider: RouteContextProvider,
	url_options: DefaultUrlOptions,
}

impl UrlHelpers {
	/// Creates a registry over `table` with no mappings and no accessors.
	pub fn new(table: RouteTable) -> Self {
		Self {
			table,
			mappings: MappingRegistry::new(),
			namespace: HelperNamespace::new(),
			provider: RouteContextProvider::default(),
			url_options: DefaultUrlOptions::default(),
		}
	}

	/// Creates a registry over the builtin table with accessors for every
	/// builtin module, before any mapping is known.
	pub fn bootstrap() -> Self {
		let mut helpers = Self::new(RouteTable::builtin());
		let table = helpers.table.clone();
		helpers.generate_helpers(Some(&table));
		helpers
	}

	/// Builds a registry from settings and generates the helpers used by the
	/// configured mappings.
	///
	/// # Errors
	///
	/// Returns `UrlHelperError::InvalidSettings` if the settings do not validate.
	pub fn init(settings: &UrlHelperSettings) -> UrlHelperResult<Self> {
		let mut helpers = Self::new(RouteTable::builtin());
		helpers.reload(settings)?;
		Ok(helpers)
	}

	/// Sets the router name accessors dispatch to.
	pub fn with_router_name(mut self, router_name: impl Into<String>) -> Self {
		self.provider = RouteContextProvider::new(router_name);
		self
	}

	/// The route table.
	pub fn route_table(&self) -> &RouteTable {
		&self.table
	}

	/// The mapping registry.
	pub fn mappings(&self) -> &MappingRegistry {
		&self.mappings
	}

	/// The installed accessors.
	pub fn namespace(&self) -> &HelperNamespace {
		&self.namespace
	}

	/// The route context provider.
	pub fn provider(&self) -> &RouteContextProvider {
		&self.provider
	}

	/// Url options from the settings, for building the host's route context.
	pub fn url_options(&self) -> &DefaultUrlOptions {
		&self.url_options
	}

	/// Registers a mapping. Accessors are not regenerated; call
	/// [`regenerate_helpers`](Self::regenerate_helpers) once configuration is done.
	pub fn register_mapping(&mut self, mapping: Mapping) -> Option<Mapping> {
		self.mappings.register(mapping)
	}

	/// Resolves a resource reference to its scope name.
	pub fn find_scope<'r>(&self, resource: impl Into<ResourceRef<'r>>) -> UrlHelperResult<&str> {
		ScopeResolver::new(&self.mappings).find_scope(resource.into())
	}

	/// Generates accessors for `subset`, or for the modules used by the
	/// registered mappings when `None`. Existing accessors with the same
	/// name are replaced.
	pub fn generate_helpers(&mut self, subset: Option<&RouteTable>) -> usize {
		HelperGenerator::new(&self.table, &self.mappings)
			.generate_helpers(&mut self.namespace, subset)
	}

	/// Generates accessors for the named modules.
	///
	/// # Errors
	///
	/// Returns `UrlHelperError::UnknownModule` if a module is not in the route table.
	pub fn generate_modules<I, S>(&mut self, modules: I) -> UrlHelperResult<usize>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		HelperGenerator::new(&self.table, &self.mappings)
			.generate_modules(&mut self.namespace, modules)
	}

	/// Removes every generated accessor.
	pub fn remove_helpers(&mut self) -> usize {
		self.namespace.remove_helpers()
	}

	/// Removes every accessor and generates the ones the current mappings use.
	pub fn regenerate_helpers(&mut self) -> usize {
		self.remove_helpers();
		self.generate_helpers(None)
	}

	/// Replaces router name, url options and mappings with `settings` and
	/// regenerates the accessors.
	///
	/// # Errors
	///
	/// Returns `UrlHelperError::InvalidSettings` if the settings do not
	/// validate; the registry is left unchanged in that case.
	pub fn reload(&mut self, settings: &UrlHelperSettings) -> UrlHelperResult<usize> {
		settings.validate()?;

		self.provider = RouteContextProvider::new(&settings.router_name);
		self.url_options = settings.default_url_options.clone();
		self.mappings = settings.build_mappings().into_iter().collect();

		let installed = self.regenerate_helpers();
		tracing::debug!(
			router = %settings.router_name,
			scopes = self.mappings.len(),
			installed,
			"url helpers configured"
		);
		Ok(installed)
	}

	/// Looks up an installed accessor.
	pub fn helper(&self, name: &str) -> UrlHelperResult<&UrlHelper> {
		self.namespace.get(name)
	}

	/// Installed accessor names.
	pub fn helper_names(&self) -> impl Iterator<Item = &str> {
		self.namespace.names()
	}

	/// Returns true if an accessor is installed under `name`.
	pub fn has_helper(&self, name: &str) -> bool {
		self.namespace.contains(name)
	}

	/// Invokes the accessor `name` for `resource`, forwarding `args`.
	///
	/// # Errors
	///
	/// Returns `UrlHelperError::HelperNotFound` if no such accessor is
	/// installed, otherwise any error of [`UrlHelper::call`].
	pub fn call<'r, E, R>(
		&self,
		name: &str,
		env: &E,
		resource: R,
		args: &RouteArgs,
	) -> UrlHelperResult<String>
	where
		E: RouteEnvironment + ?Sized,
		R: Into<ResourceRef<'r>>,
	{
		self.namespace
			.get(name)?
			.call(&self.mappings, &self.provider, env, resource.into(), args)
	}

	/// The route context of `env`, resolved and cached on first use.
	pub fn route_context<E>(&self, env: &E) -> UrlHelperResult<Arc<dyn RouteContext>>
	where
		E: RouteEnvironment + ?Sized,
	{
		self.provider.get_route_context(env)
	}
}

impl Default for UrlHelpers {
	fn default() -> Self {
		Self::new(RouteTable::builtin())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::UrlHelperError;
	use crate::settings::MappingSettings;
	use rstest::rstest;

	#[rstest]
	fn test_bootstrap_generates_every_builtin_helper() {
		let helpers = UrlHelpers::bootstrap();
		// 3 + 0 + 3 + 4 + 2 + 2 actions, path and url each
		assert_eq!(helpers.namespace().len(), 28);
		assert!(helpers.has_helper("cancel_registration_url"));
		assert!(helpers.mappings().is_empty());
	}

	#[rstest]
	fn test_init_generates_only_used_modules() {
		let settings = UrlHelperSettings::new()
			.with_mapping(MappingSettings::new("user", "User").with_helpers(["confirmation"]));
		let helpers = UrlHelpers::init(&settings).unwrap();

		assert_eq!(
			helpers.helper_names().collect::<Vec<_>>(),
			vec![
				"confirmation_path",
				"new_confirmation_path",
				"confirmation_url",
				"new_confirmation_url"
			]
		);
	}

	#[rstest]
	fn test_register_mapping_needs_regeneration() {
		let mut helpers = UrlHelpers::default();
		helpers.register_mapping(Mapping::new("user", "User").with_helpers(["unlock"]));
		assert!(!helpers.has_helper("unlock_path"));

		helpers.regenerate_helpers();
		assert!(helpers.has_helper("unlock_path"));
	}

	#[rstest]
	fn test_reload_drops_helpers_of_removed_modules() {
		let mut helpers = UrlHelpers::init(
			&UrlHelperSettings::new()
				.with_mapping(MappingSettings::new("user", "User").with_helpers(["session", "unlock"])),
		)
		.unwrap();
		assert!(helpers.has_helper("new_unlock_path"));

		helpers
			.reload(
				&UrlHelperSettings::new()
					.with_router_name("accounts")
					.with_mapping(MappingSettings::new("user", "User").with_helpers(["session"])),
			)
			.unwrap();

		assert!(!helpers.has_helper("new_unlock_path"));
		assert!(helpers.has_helper("new_session_path"));
		assert_eq!(helpers.provider().router_name(), "accounts");
	}

	#[rstest]
	fn test_reload_with_invalid_settings_keeps_state() {
		let mut helpers = UrlHelpers::init(
			&UrlHelperSettings::new().with_mapping(MappingSettings::new("user", "User")),
		)
		.unwrap();
		let before = helpers.namespace().len();

		let err = helpers
			.reload(&UrlHelperSettings::new().with_mapping(MappingSettings::new("user", "")))
			.unwrap_err();

		assert!(matches!(err, UrlHelperError::InvalidSettings(_)));
		assert_eq!(helpers.namespace().len(), before);
		assert!(helpers.find_scope("user").is_ok());
	}

	#[rstest]
	fn test_call_unknown_helper() {
		let helpers = UrlHelpers::default();
		let env = crate::context::RequestContext::new();
		let err = helpers
			.call("session_path", &env, "user", &RouteArgs::new())
			.unwrap_err();
		assert!(matches!(err, UrlHelperError::HelperNotFound(_)));
	}
}
