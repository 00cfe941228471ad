//! Route context resolution
//!
//! A calling environment (typically one request) exposes one or more routers
//! by name. The accessor dispatches to the router selected by the configured
//! router name, resolved once per environment and cached on it.
//!
//! The cache has no invalidation: an environment that outlives a router
//! change keeps returning the router it resolved first.

use crate::error::{UrlHelperError, UrlHelperResult};
use indexmap::IndexMap;
use once_cell::sync::OnceCell;
use std::fmt;
use std::sync::Arc;

/// Router name used when the settings do not name one.
pub const DEFAULT_ROUTER_NAME: &str = "main_app";

/// Extra arguments forwarded verbatim from an accessor to the route function.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteArgs {
	positional: Vec<String>,
	keyword: IndexMap<String, String>,
}

impl RouteArgs {
	/// Creates empty arguments.
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a positional argument.
	pub fn arg(mut self, value: impl Into<String>) -> Self {
		self.positional.push(value.into());
		self
	}

	/// Sets a keyword argument.
	pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.keyword.insert(name.into(), value.into());
		self
	}

	/// Positional arguments in call order.
	pub fn positional(&self) -> &[String] {
		&self.positional
	}

	/// Keyword arguments in insertion order.
	pub fn keyword(&self) -> &IndexMap<String, String> {
		&self.keyword
	}

	/// Returns true if there are no arguments.
	pub fn is_empty(&self) -> bool {
		self.positional.is_empty() && self.keyword.is_empty()
	}
}

/// The router proxy exposing the concrete scoped route functions
/// (`new_user_session_path`, `user_password_url`, ...).
pub trait RouteContext: Send + Sync {
	/// Invokes the route function `name`. Returns `None` when no such
	/// function exists.
	fn call_route(&self, name: &str, args: &RouteArgs) -> Option<UrlHelperResult<String>>;
}

/// Per-environment slot holding the resolved route context.
#[derive(Default)]
pub struct RouteContextCache {
	cell: OnceCell<Arc<dyn RouteContext>>,
}

impl RouteContextCache {
	/// Creates an empty cache.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the cached route context, if resolved.
	pub fn get(&self) -> Option<&Arc<dyn RouteContext>> {
		self.cell.get()
	}

	/// Returns true once a route context has been cached.
	pub fn is_resolved(&self) -> bool {
		self.cell.get().is_some()
	}
}

impl fmt::Debug for RouteContextCache {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RouteContextCache")
			.field("resolved", &self.is_resolved())
			.finish()
	}
}

/// The environment an accessor is called from.
pub trait RouteEnvironment {
	/// Returns the router registered under `name`.
	fn router(&self, name: &str) -> Option<Arc<dyn RouteContext>>;

	/// Cache slot for the resolved route context.
	fn route_context_cache(&self) -> &RouteContextCache;
}

/// Resolves and caches the route context of a calling environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteContextProvider {
	router_name: String,
}

impl RouteContextProvider {
	/// Creates a provider that asks environments for `router_name`.
	pub fn new(router_name: impl Into<String>) -> Self {
		Self {
			router_name: router_name.into(),
		}
	}

	/// Configured router name.
	pub fn router_name(&self) -> &str {
		&self.router_name
	}

	/// Returns the route context of `env`, resolving it on first use.
	///
	/// Repeated calls for the same environment return the same `Arc`.
	///
	/// # Errors
	///
	/// Returns `UrlHelperError::UnknownRouter` if the environment exposes no
	/// router under the configured name. Nothing is cached in that case.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_auth_urls::context::{RequestContext, RouteContextProvider};
	/// use reinhardt_auth_urls::routes::NamedRoutes;
	/// use std::sync::Arc;
	///
	/// let env = RequestContext::new().with_router("main_app", Arc::new(NamedRoutes::new()));
	/// let provider = RouteContextProvider::default();
	///
	/// let first = provider.get_route_context(&env).unwrap();
	/// let second = provider.get_route_context(&env).unwrap();
	/// assert!(Arc::ptr_eq(&first, &second));
	/// ```
	pub fn get_route_context<E>(&self, env: &E) -> UrlHelperResult<Arc<dyn RouteContext>>
	where
		E: RouteEnvironment + ?Sized,
	{
		env.route_context_cache()
			.cell
			.get_or_try_init(|| {
				tracing::debug!(router = %self.router_name, "resolving route context");
				env.router(&self.router_name)
					.ok_or_else(|| UrlHelperError::UnknownRouter(self.router_name.clone()))
			})
			.cloned()
	}
}

impl Default for RouteContextProvider {
	fn default() -> Self {
		Self::new(DEFAULT_ROUTER_NAME)
	}
}

/// Calling environment holding routers by name.
#[derive(Default)]
pub struct RequestContext {
	routers: IndexMap<String, Arc<dyn RouteContext>>,
	cache: RouteContextCache,
}

impl RequestContext {
	/// Creates an environment without routers.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a router under `name`.
	pub fn with_router(mut self, name: impl Into<String>, router: Arc<dyn RouteContext>) -> Self {
		self.routers.insert(name.into(), router);
		self
	}
}

impl RouteEnvironment for RequestContext {
	fn router(&self, name: &str) -> Option<Arc<dyn RouteContext>> {
		self.routers.get(name).cloned()
	}

	fn route_context_cache(&self) -> &RouteContextCache {
		&self.cache
	}
}

impl fmt::Debug for RequestContext {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RequestContext")
			.field("routers", &self.routers.keys().collect::<Vec<_>>())
			.field("cache", &self.cache)
			.finish()
	}
}
