//! URL helper error types.
//!
//! Every failure in this crate reflects a static configuration mismatch, so
//! none of these errors are retried or recovered locally.

use thiserror::Error;

/// Result type for URL helper operations.
pub type UrlHelperResult<T> = Result<T, UrlHelperError>;

/// URL helper errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum UrlHelperError {
	/// The resource reference matches no registered mapping.
	#[error("could not find a valid mapping for {reference}")]
	ScopeResolution {
		/// Description of the unresolved reference.
		reference: String,
	},

	/// The scoped route function is not exposed by the route context.
	#[error("route function '{name}' is not defined on the route context")]
	MissingRouteFunction {
		/// Fully scoped route function name.
		name: String,
	},

	/// Helper generation was requested for a module absent from the route table.
	#[error("unknown route module: {0}")]
	UnknownModule(String),

	/// No accessor is installed under the given name.
	#[error("accessor not found: {0}")]
	HelperNotFound(String),

	/// The calling environment exposes no router under the configured name.
	#[error("router '{0}' is not available in the calling environment")]
	UnknownRouter(String),

	/// A placeholder of the route pattern received no value.
	#[error("route '{route}' is missing parameter '{param}'")]
	MissingRouteParameter {
		/// Route function name.
		route: String,
		/// Placeholder name.
		param: String,
	},

	/// A parameter value contains path separators, query delimiters or escapes.
	#[error("route '{route}' received an invalid value for '{param}'")]
	InvalidRouteParameter {
		/// Route function name.
		route: String,
		/// Parameter name.
		param: String,
	},

	/// Settings were parsed but are not usable.
	#[error("invalid url helper settings: {0}")]
	InvalidSettings(String),

	/// TOML parsing error.
	#[error("settings parse error: {0}")]
	SettingsParse(#[from] toml::de::Error),

	/// IO error.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
}

impl UrlHelperError {
	pub(crate) fn scope_resolution(reference: impl Into<String>) -> Self {
		Self::ScopeResolution {
			reference: reference.into(),
		}
	}

	/// Returns true for errors raised while resolving a resource to a scope.
	pub fn is_scope_resolution(&self) -> bool {
		matches!(self, Self::ScopeResolution { .. })
	}
}
