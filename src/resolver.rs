//! Scope resolution
//!
//! Turns a [`ResourceRef`] into the name of the scope it is mounted under.

use crate::error::{UrlHelperError, UrlHelperResult};
use crate::mapping::MappingRegistry;
use crate::resource::{ResourceClass, ResourceRef};

/// Resolves resource references against a mapping registry.
///
/// Resolution is a pure function of the registry state: nothing is cached.
///
/// # Examples
///
/// ```
/// use reinhardt_auth_urls::mapping::{Mapping, MappingRegistry};
/// use reinhardt_auth_urls::resolver::ScopeResolver;
/// use reinhardt_auth_urls::resource::ResourceClass;
///
/// static USER: ResourceClass = ResourceClass::new("User");
/// static STAFF: ResourceClass = ResourceClass::with_parent("Staff", &USER);
///
/// let mut registry = MappingRegistry::new();
/// registry.register(Mapping::new("user", "User"));
///
/// let resolver = ScopeResolver::new(&registry);
/// assert_eq!(resolver.find_scope("user".into()).unwrap(), "user");
/// assert_eq!(resolver.find_scope((&STAFF).into()).unwrap(), "user");
/// assert!(resolver.find_scope("guest".into()).is_err());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ScopeResolver<'a> {
	registry: &'a MappingRegistry,
}

impl<'a> ScopeResolver<'a> {
	/// Creates a resolver over `registry`.
	pub fn new(registry: &'a MappingRegistry) -> Self {
		Self { registry }
	}

	/// Finds the scope name for a resource reference.
	///
	/// - A scope name resolves to itself when registered.
	/// - An instance with an explicit [`auth_scope`](crate::resource::Resource::auth_scope)
	///   resolves that scope name; otherwise its class is resolved.
	/// - A class resolves to the scope of the nearest ancestor (itself first)
	///   that has a mapping.
	///
	/// # Errors
	///
	/// Returns `UrlHelperError::ScopeResolution` when nothing matches.
	pub fn find_scope(&self, reference: ResourceRef<'_>) -> UrlHelperResult<&'a str> {
		let resolved = match reference {
			ResourceRef::Scope(scope) => self.registry.scope(scope),
			ResourceRef::Instance(resource) => match resource.auth_scope() {
				Some(scope) => self.registry.scope(scope),
				None => self.scope_for_class(resource.resource_class()),
			},
			ResourceRef::Class(class) => self.scope_for_class(class),
		};

		resolved.ok_or_else(|| UrlHelperError::scope_resolution(reference.to_string()))
	}

	fn scope_for_class(&self, class: &ResourceClass) -> Option<&'a str> {
		class
			.ancestors()
			.find_map(|ancestor| self.registry.scope_for_class(ancestor.name()))
	}
}
