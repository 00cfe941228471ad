//! # Reinhardt Auth URLs
//!
//! Scope-aware URL helpers for authentication routes.
//!
//! The same logical route (`session`, `password`, `confirmation`, ...) can be
//! mounted under several authentication scopes at once (`user`, `admin`).
//! Instead of calling `new_admin_session_path` directly, application code
//! calls the generic accessor `new_session_path` with a resource reference,
//! and the accessor picks the scoped route:
//!
//! ```text
//! new_session_path(user)       => new_user_session_path
//! session_path(admin)          => admin_session_path
//! destroy_session_path(user)   => destroy_user_session_path
//!
//! new_password_path(user)      => new_user_password_path
//! password_path(user)          => user_password_path
//! edit_password_path(user)     => edit_user_password_path
//!
//! new_confirmation_path(user)  => new_user_confirmation_path
//! confirmation_path(user)      => user_confirmation_path
//! ```
//!
//! A resource reference is a scope name, a model instance or a model class.
//! Instances and classes resolve to the scope of the nearest registered
//! ancestor class.
//!
//! ## Components
//!
//! - [`route_table`] - modules and their actions
//! - [`mapping`] - mounted scopes and the classes they authenticate
//! - [`resolver`] - resource reference to scope name
//! - [`helpers`] - accessor generation, removal and dispatch
//! - [`context`] - per-environment router resolution and caching
//! - [`routes`] - a name-to-pattern router usable as the route context
//! - [`settings`] - TOML configuration
//! - [`url_helpers`] - the registry tying everything together
//!
//! ## Quick Example
//!
//! ```
//! use reinhardt_auth_urls::prelude::*;
//! use std::sync::Arc;
//!
//! static USER: ResourceClass = ResourceClass::new("User");
//! static EDITOR: ResourceClass = ResourceClass::with_parent("Editor", &USER);
//!
//! let mut helpers = UrlHelpers::default();
//! helpers.register_mapping(Mapping::for_class(&USER).with_helpers(["password"]));
//! helpers.regenerate_helpers();
//!
//! let routes = NamedRoutes::new().with_route("new_user_password_path", "/users/password/new");
//! let env = RequestContext::new().with_router("main_app", Arc::new(routes));
//!
//! let path = helpers
//!     .call("new_password_path", &env, &EDITOR, &RouteArgs::new())
//!     .unwrap();
//! assert_eq!(path, "/users/password/new");
//! ```

pub mod context;
pub mod error;
pub mod helpers;
pub mod mapping;
pub mod resolver;
pub mod resource;
pub mod route_table;
pub mod routes;
pub mod settings;
pub mod url_helpers;

pub use context::{
	RequestContext, RouteArgs, RouteContext, RouteContextCache, RouteContextProvider,
	RouteEnvironment,
};
pub use error::{UrlHelperError, UrlHelperResult};
pub use helpers::{HelperGenerator, HelperNamespace, UrlHelper};
pub use mapping::{Mapping, MappingRegistry};
pub use resolver::ScopeResolver;
pub use resource::{Resource, ResourceClass, ResourceRef};
pub use route_table::{Action, RouteKind, RouteTable};
pub use routes::NamedRoutes;
pub use settings::{DefaultUrlOptions, MappingSettings, UrlHelperSettings};
pub use url_helpers::UrlHelpers;

/// Commonly used types.
pub mod prelude {
	pub use crate::context::{
		RequestContext, RouteArgs, RouteContext, RouteContextProvider, RouteEnvironment,
	};
	pub use crate::error::{UrlHelperError, UrlHelperResult};
	pub use crate::helpers::UrlHelper;
	pub use crate::mapping::{Mapping, MappingRegistry};
	pub use crate::resource::{Resource, ResourceClass, ResourceRef};
	pub use crate::route_table::{Action, RouteKind, RouteTable};
	pub use crate::routes::NamedRoutes;
	pub use crate::settings::{DefaultUrlOptions, MappingSettings, UrlHelperSettings};
	pub use crate::url_helpers::UrlHelpers;
}
