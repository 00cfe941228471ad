//! URL helper settings
//!
//! Settings can be built in code or loaded from TOML:
//!
//! ```toml
//! router_name = "main_app"
//!
//! [default_url_options]
//! protocol = "https"
//! host = "example.com"
//!
//! [[mappings]]
//! scope = "user"
//! class = "User"
//! skip_helpers = ["unlock"]
//!
//! [[mappings]]
//! scope = "admin"
//! class = "Admin"
//! helpers = ["session"]
//! ```

use crate::context::DEFAULT_ROUTER_NAME;
use crate::error::{UrlHelperError, UrlHelperResult};
use crate::mapping::Mapping;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level URL helper settings.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UrlHelperSettings {
	/// Name of the router accessors dispatch to.
	pub router_name: String,

	/// Host information used by `*_url` route functions.
	pub default_url_options: DefaultUrlOptions,

	/// Mounted authentication scopes.
	pub mappings: Vec<MappingSettings>,
}

impl Default for UrlHelperSettings {
	fn default() -> Self {
		Self {
			router_name: DEFAULT_ROUTER_NAME.to_string(),
			default_url_options: DefaultUrlOptions::default(),
			mappings: Vec::new(),
		}
	}
}

impl UrlHelperSettings {
	/// Create new settings with defaults
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a mapping.
	pub fn with_mapping(mut self, mapping: MappingSettings) -> Self {
		self.mappings.push(mapping);
		self
	}

	/// Sets the router name.
	pub fn with_router_name(mut self, router_name: impl Into<String>) -> Self {
		self.router_name = router_name.into();
		self
	}

	/// Parses and validates settings from a TOML document.
	pub fn from_toml_str(source: &str) -> UrlHelperResult<Self> {
		let settings: Self = toml::from_str(source)?;
		settings.validate()?;
		Ok(settings)
	}

	/// Reads, parses and validates a TOML settings file.
	pub fn from_file(path: impl AsRef<Path>) -> UrlHelperResult<Self> {
		let path = path.as_ref();
		tracing::debug!(path = %path.display(), "loading url helper settings");
		let source = std::fs::read_to_string(path)?;
		Self::from_toml_str(&source)
	}

	/// Validate settings
	///
	pub fn validate(&self) -> UrlHelperResult<()> {
		if self.router_name.trim().is_empty() {
			return Err(UrlHelperError::InvalidSettings(
				"router_name must not be empty".to_string(),
			));
		}

		if self.default_url_options.host.trim().is_empty() {
			return Err(UrlHelperError::InvalidSettings(
				"default_url_options.host must not be empty".to_string(),
			));
		}

		let mut seen = IndexSet::new();
		for mapping in &self.mappings {
			if !is_identifier(&mapping.scope) {
				return Err(UrlHelperError::InvalidSettings(format!(
					"scope '{}' is not a valid identifier",
					mapping.scope
				)));
			}
			if mapping.class.trim().is_empty() {
				return Err(UrlHelperError::InvalidSettings(format!(
					"scope '{}' has no class",
					mapping.scope
				)));
			}
			if !seen.insert(mapping.scope.as_str()) {
				return Err(UrlHelperError::InvalidSettings(format!(
					"scope '{}' is configured more than once",
					mapping.scope
				)));
			}
		}

		Ok(())
	}

	/// Builds the configured mappings, in configuration order.
	pub fn build_mappings(&self) -> Vec<Mapping> {
		self.mappings.iter().map(MappingSettings::to_mapping).collect()
	}
}

/// Host information for absolute urls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultUrlOptions {
	/// Url scheme
	pub protocol: String,
	/// Host name
	pub host: String,
	/// Port, omitted from urls when unset
	pub port: Option<u16>,
}

impl Default for DefaultUrlOptions {
	fn default() -> Self {
		Self {
			protocol: "http".to_string(),
			host: "localhost".to_string(),
			port: None,
		}
	}
}

impl DefaultUrlOptions {
	/// Creates options for `host` over http.
	pub fn new(host: impl Into<String>) -> Self {
		Self {
			host: host.into(),
			..Self::default()
		}
	}

	/// Sets the protocol.
	pub fn with_protocol(mut self, protocol: impl Into<String>) -> Self {
		self.protocol = protocol.into();
		self
	}

	/// Sets the port.
	pub fn with_port(mut self, port: u16) -> Self {
		self.port = Some(port);
		self
	}

	/// Scheme, host and port, without a trailing slash.
	///
	/// ```
	/// use reinhardt_auth_urls::settings::DefaultUrlOptions;
	///
	/// let options = DefaultUrlOptions::new("example.com").with_port(8443).with_protocol("https");
	/// assert_eq!(options.base_url(), "https://example.com:8443");
	/// ```
	pub fn base_url(&self) -> String {
		match self.port {
			Some(port) => format!("{}://{}:{}", self.protocol, self.host, port),
			None => format!("{}://{}", self.protocol, self.host),
		}
	}
}

/// One configured authentication scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingSettings {
	/// Scope name
	pub scope: String,
	/// Resource class name
	pub class: String,
	/// Modules to generate helpers for; every builtin module when unset
	#[serde(default)]
	pub helpers: Option<Vec<String>>,
	/// Modules to leave out
	#[serde(default)]
	pub skip_helpers: Vec<String>,
}

impl MappingSettings {
	/// Creates settings for `class` mounted under `scope`.
	pub fn new(scope: impl Into<String>, class: impl Into<String>) -> Self {
		Self {
			scope: scope.into(),
			class: class.into(),
			helpers: None,
			skip_helpers: Vec::new(),
		}
	}

	/// Restricts the modules to generate helpers for.
	pub fn with_helpers<I, S>(mut self, modules: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.helpers = Some(modules.into_iter().map(Into::into).collect());
		self
	}

	/// Leaves modules out.
	pub fn skip_helpers<I, S>(mut self, modules: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.skip_helpers
			.extend(modules.into_iter().map(Into::into));
		self
	}

	/// Builds the mapping.
	pub fn to_mapping(&self) -> Mapping {
		let mapping = Mapping::new(&self.scope, &self.class);
		let mapping = match &self.helpers {
			Some(helpers) => mapping.with_helpers(helpers.iter().cloned()),
			None => mapping,
		};
		mapping.skip_helpers(&self.skip_helpers)
	}
}

fn is_identifier(name: &str) -> bool {
	let mut chars = name.chars();
	match chars.next() {
		Some(first) if first.is_ascii_alphabetic() || first == '_' => {
			chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
		}
		_ => false,
	}
}
