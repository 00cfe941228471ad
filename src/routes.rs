//! Named route table
//!
//! [`NamedRoutes`] is a [`RouteContext`] backed by a map of scoped route
//! names to path patterns such as `/users/password/{token}/edit`. It is what a
//! host fills from its own route registration so that accessors have
//! concrete route functions to dispatch to.
//!
//! Registering `user_session_path` also provides `user_session_url`, which
//! prefixes the path with the configured scheme, host and port.
//!
//! Placeholder values and query pairs are percent-encoded.

use crate::context::{RouteArgs, RouteContext};
use crate::error::{UrlHelperError, UrlHelperResult};
use crate::route_table::RouteKind;
use crate::settings::DefaultUrlOptions;
use indexmap::IndexMap;

/// Characters rejected in placeholder values: path separators, query and
/// fragment delimiters, and pre-encoded sequences.
const FORBIDDEN_PATH_CHARS: &[char] = &['/', '?', '#', '%'];

/// Route functions keyed by their scoped name.
///
/// # Examples
///
/// ```
/// use reinhardt_auth_urls::context::{RouteArgs, RouteContext};
/// use reinhardt_auth_urls::routes::NamedRoutes;
///
/// let routes = NamedRoutes::new()
///     .with_route("user_session_path", "/users/sign_in")
///     .with_route("edit_user_password_path", "/users/password/{token}/edit");
///
/// let url = routes
///     .call_route("user_session_url", &RouteArgs::new())
///     .unwrap()
///     .unwrap();
/// assert_eq!(url, "http://localhost/users/sign_in");
///
/// let path = routes
///     .call_route("edit_user_password_path", &RouteArgs::new().param("token", "abc"))
///     .unwrap()
///     .unwrap();
/// assert_eq!(path, "/users/password/abc/edit");
/// ```
#[derive(Debug, Clone, Default)]
pub struct NamedRoutes {
	routes: IndexMap<String, String>,
	url_options: DefaultUrlOptions,
}

impl NamedRoutes {
	/// Creates an empty table using the default url options.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the url options used by `*_url` functions.
	pub fn with_url_options(mut self, options: DefaultUrlOptions) -> Self {
		self.url_options = options;
		self
	}

	/// Adds a route function.
	pub fn with_route(mut self, name: impl Into<String>, pattern: impl Into<String>) -> Self {
		self.register(name, pattern);
		self
	}

	/// Registers a route function, replacing any previous pattern.
	pub fn register(&mut self, name: impl Into<String>, pattern: impl Into<String>) {
		self.routes.insert(name.into(), pattern.into());
	}

	/// Registered route names, in registration order.
	pub fn route_names(&self) -> impl Iterator<Item = &str> {
		self.routes.keys().map(String::as_str)
	}

	/// The url options used by `*_url` functions.
	pub fn url_options(&self) -> &DefaultUrlOptions {
		&self.url_options
	}

	/// Returns true if `name` can be called, directly or as the `_url` form
	/// of a registered `_path` route.
	pub fn has_route(&self, name: &str) -> bool {
		self.lookup(name).is_some()
	}

	fn lookup(&self, name: &str) -> Option<(&str, RouteKind)> {
		let kind = RouteKind::of_name(name)?;
		if let Some(pattern) = self.routes.get(name) {
			return Some((pattern.as_str(), kind));
		}

		match kind {
			RouteKind::Path => None,
			RouteKind::Url => {
				let base = name.strip_suffix("_url")?;
				self.routes
					.get(&format!("{}_path", base))
					.map(|pattern| (pattern.as_str(), kind))
			}
		}
	}

	fn build(
		&self,
		name: &str,
		pattern: &str,
		kind: RouteKind,
		args: &RouteArgs,
	) -> UrlHelperResult<String> {
		let placeholders = placeholders(pattern);
		let mut positional = args.positional().iter();
		let mut values: IndexMap<&str, String> = IndexMap::with_capacity(placeholders.len());

		for param in placeholders {
			let value = args
				.keyword()
				.get(param)
				.or_else(|| positional.next())
				.ok_or_else(|| UrlHelperError::MissingRouteParameter {
					route: name.to_string(),
					param: param.to_string(),
				})?;
			if value.contains(FORBIDDEN_PATH_CHARS) {
				return Err(UrlHelperError::InvalidRouteParameter {
					route: name.to_string(),
					param: param.to_string(),
				});
			}
			values.insert(param, urlencoding::encode(value).into_owned());
		}

		let surplus = positional.count();
		if surplus > 0 {
			tracing::trace!(route = name, surplus, "ignoring surplus positional arguments");
		}

		let mut path = fill_placeholders(pattern, &values);

		let query = args
			.keyword()
			.iter()
			.filter(|(key, _)| !values.contains_key(key.as_str()))
			.map(|(key, value)| {
				format!("{}={}", urlencoding::encode(key), urlencoding::encode(value))
			})
			.collect::<Vec<_>>();
		if !query.is_empty() {
			path.push('?');
			path.push_str(&query.join("&"));
		}

		Ok(match kind {
			RouteKind::Path => path,
			RouteKind::Url => format!("{}{}", self.url_options.base_url(), path),
		})
	}
}

impl RouteContext for NamedRoutes {
	fn call_route(&self, name: &str, args: &RouteArgs) -> Option<UrlHelperResult<String>> {
		let (pattern, kind) = self.lookup(name)?;
		Some(self.build(name, pattern, kind, args))
	}
}

// Distinct `{name}` placeholders in order of first appearance.
fn placeholders(pattern: &str) -> Vec<&str> {
	let mut names: Vec<&str> = Vec::new();
	let mut rest = pattern;

	while let Some(open) = rest.find('{') {
		let Some(len) = rest[open + 1..].find('}') else {
			break;
		};
		let name = &rest[open + 1..open + 1 + len];
		if !name.is_empty() && !names.contains(&name) {
			names.push(name);
		}
		rest = &rest[open + len + 2..];
	}

	names
}

// Placeholders without a value are kept verbatim.
fn fill_placeholders(pattern: &str, values: &IndexMap<&str, String>) -> String {
	let mut path = String::with_capacity(pattern.len());
	let mut rest = pattern;

	while let Some(open) = rest.find('{') {
		let Some(len) = rest[open + 1..].find('}') else {
			break;
		};
		let close = open + len + 2;
		path.push_str(&rest[..open]);
		match values.get(&rest[open + 1..close - 1]) {
			Some(value) => path.push_str(value),
			None => path.push_str(&rest[open..close]),
		}
		rest = &rest[close..];
	}

	path.push_str(rest);
	path
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::{fixture, rstest};

	#[fixture]
	fn routes() -> NamedRoutes {
		NamedRoutes::new()
			.with_url_options(DefaultUrlOptions::new("auth.example.com").with_protocol("https"))
			.with_route("user_session_path", "/users/sign_in")
			.with_route("user_confirmation_path", "/users/{id}/confirmation")
			.with_route("admin_unlock_url", "/admin/unlock")
	}

	fn call(routes: &NamedRoutes, name: &str, args: RouteArgs) -> UrlHelperResult<String> {
		routes.call_route(name, &args).expect("route exists")
	}

	#[rstest]
	fn test_path_and_derived_url(routes: NamedRoutes) {
		assert_eq!(call(&routes, "user_session_path", RouteArgs::new()).unwrap(), "/users/sign_in");
		assert_eq!(
			call(&routes, "user_session_url", RouteArgs::new()).unwrap(),
			"https://auth.example.com/users/sign_in"
		);
	}

	#[rstest]
	fn test_explicit_url_registration_has_no_path(routes: NamedRoutes) {
		assert!(routes.has_route("admin_unlock_url"));
		assert!(!routes.has_route("admin_unlock_path"));
		assert_eq!(
			call(&routes, "admin_unlock_url", RouteArgs::new()).unwrap(),
			"https://auth.example.com/admin/unlock"
		);
	}

	#[rstest]
	fn test_missing_function(routes: NamedRoutes) {
		assert!(routes.call_route("guest_session_path", &RouteArgs::new()).is_none());
		assert!(!routes.has_route("user_session"));
	}

	#[rstest]
	#[case(RouteArgs::new().param("id", "7"))]
	#[case(RouteArgs::new().arg("7"))]
	fn test_placeholder_from_keyword_or_positional(routes: NamedRoutes, #[case] args: RouteArgs) {
		assert_eq!(
			call(&routes, "user_confirmation_path", args).unwrap(),
			"/users/7/confirmation"
		);
	}

	#[rstest]
	fn test_extra_keywords_become_query(routes: NamedRoutes) {
		let args = RouteArgs::new()
			.param("id", "7")
			.param("confirmation_token", "abc")
			.param("locale", "ja");
		assert_eq!(
			call(&routes, "user_confirmation_path", args).unwrap(),
			"/users/7/confirmation?confirmation_token=abc&locale=ja"
		);
	}

	#[rstest]
	fn test_missing_parameter(routes: NamedRoutes) {
		let err = call(&routes, "user_confirmation_path", RouteArgs::new()).unwrap_err();
		assert!(matches!(
			err,
			UrlHelperError::MissingRouteParameter { ref param, .. } if param == "id"
		));
	}

	#[rstest]
	#[case("../etc")]
	#[case("7?admin=1")]
	#[case("%2F")]
	fn test_invalid_parameter(routes: NamedRoutes, #[case] value: &str) {
		let err = call(&routes, "user_confirmation_path", RouteArgs::new().param("id", value))
			.unwrap_err();
		assert!(matches!(err, UrlHelperError::InvalidRouteParameter { .. }));
	}

	#[rstest]
	fn test_query_pairs_are_percent_encoded(routes: NamedRoutes) {
		let args = RouteArgs::new()
			.param("return_to", "a b=c+d")
			.param("name", "é")
			.param("next page", "x&y%");
		let path = call(&routes, "user_session_path", args).unwrap();

		assert!(!path.contains(' '));
		assert_eq!(
			path,
			"/users/sign_in?return_to=a%20b%3Dc%2Bd&name=%C3%A9&next%20page=x%26y%25"
		);
	}

	#[rstest]
	fn test_placeholder_value_is_percent_encoded(routes: NamedRoutes) {
		let args = RouteArgs::new().param("id", "jean marc");
		assert_eq!(
			call(&routes, "user_confirmation_path", args).unwrap(),
			"/users/jean%20marc/confirmation"
		);
	}

	#[rstest]
	fn test_repeated_placeholder_takes_one_value() {
		let routes = NamedRoutes::new().with_route("user_merge_path", "/users/{id}/merge/{id}/{token}");
		let args = RouteArgs::new().arg("7").arg("abc");
		assert_eq!(
			call(&routes, "user_merge_path", args).unwrap(),
			"/users/7/merge/7/abc"
		);
	}

	#[rstest]
	#[case("/users/{id}/confirm/{token}", vec!["id", "token"])]
	#[case("/a/{id}/{id}", vec!["id"])]
	#[case("/a/{}/b", vec![])]
	#[case("/a/{open", vec![])]
	fn test_placeholders(#[case] pattern: &str, #[case] expected: Vec<&str>) {
		assert_eq!(placeholders(pattern), expected);
	}

	#[rstest]
	fn test_fill_keeps_unknown_placeholders() {
		let mut values = IndexMap::new();
		values.insert("id", "1".to_string());
		assert_eq!(fill_placeholders("/a/{id}/{other}", &values), "/a/1/{other}");
	}
}
