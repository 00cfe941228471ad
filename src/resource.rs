//! Resource references
//!
//! Accessors accept a scope name, a model instance or a model class. Model
//! classes are described by static [`ResourceClass`] descriptors linked to
//! their parent, which gives scope resolution an explicit ancestor chain.
//!
//! # Examples
//!
//! ```
//! use reinhardt_auth_urls::resource::{Resource, ResourceClass, ResourceRef};
//!
//! static USER: ResourceClass = ResourceClass::new("User");
//! static STAFF: ResourceClass = ResourceClass::with_parent("Staff", &USER);
//!
//! struct Staff;
//!
//! impl Resource for Staff {
//!     fn resource_class(&self) -> &'static ResourceClass {
//!         &STAFF
//!     }
//! }
//!
//! let staff = Staff;
//! let names: Vec<_> = STAFF.ancestors().map(|c| c.name()).collect();
//! assert_eq!(names, vec!["Staff", "User"]);
//! assert!(matches!(ResourceRef::instance(&staff), ResourceRef::Instance(_)));
//! ```

use std::fmt;

/// Static descriptor of a model class and its parent class.
#[derive(Debug, PartialEq, Eq)]
pub struct ResourceClass {
	name: &'static str,
	parent: Option<&'static ResourceClass>,
}

impl ResourceClass {
	/// Describes a root class.
	pub const fn new(name: &'static str) -> Self {
		Self { name, parent: None }
	}

	/// Describes a class that extends `parent`.
	pub const fn with_parent(name: &'static str, parent: &'static ResourceClass) -> Self {
		Self {
			name,
			parent: Some(parent),
		}
	}

	/// Class name.
	pub fn name(&self) -> &'static str {
		self.name
	}

	/// Parent class, if any.
	pub fn parent(&self) -> Option<&'static ResourceClass> {
		self.parent
	}

	/// Iterates this class and then its ancestors, nearest first.
	pub fn ancestors(&self) -> impl Iterator<Item = &ResourceClass> {
		std::iter::successors(Some(self), |class| class.parent)
	}

	/// Returns true if this class is `other` or extends it.
	pub fn is_a(&self, other: &ResourceClass) -> bool {
		self.ancestors().any(|class| class.name == other.name)
	}

	/// Default scope name for this class: the class name in snake_case, with
	/// a run of capitals kept as one word.
	///
	/// ```
	/// use reinhardt_auth_urls::resource::ResourceClass;
	///
	/// assert_eq!(ResourceClass::new("AdminUser").default_scope(), "admin_user");
	/// assert_eq!(ResourceClass::new("APIKey").default_scope(), "api_key");
	/// ```
	pub fn default_scope(&self) -> String {
		let chars: Vec<char> = self.name.chars().collect();
		let mut scope = String::with_capacity(chars.len() + 4);

		for (i, &ch) in chars.iter().enumerate() {
			if ch.is_uppercase() && i > 0 {
				let prev = chars[i - 1];
				let next_is_lower = chars.get(i + 1).is_some_and(|c| c.is_lowercase());
				if !prev.is_uppercase() || next_is_lower {
					scope.push('_');
				}
			}
			scope.extend(ch.to_lowercase());
		}
		scope
	}
}

impl fmt::Display for ResourceClass {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.name)
	}
}

/// A model instance that can be passed to an accessor.
pub trait Resource {
	/// Class descriptor of this instance.
	fn resource_class(&self) -> &'static ResourceClass;

	/// Explicit scope of this instance. When set, it takes precedence over
	/// class-based resolution.
	fn auth_scope(&self) -> Option<&str> {
		None
	}
}

/// Call-time resource argument of an accessor.
#[derive(Clone, Copy)]
pub enum ResourceRef<'a> {
	/// An explicit scope name, such as `"user"`.
	Scope(&'a str),
	/// A model instance.
	Instance(&'a dyn Resource),
	/// A model class.
	Class(&'a ResourceClass),
}

impl<'a> ResourceRef<'a> {
	/// Wraps a model instance.
	pub fn instance<R: Resource>(resource: &'a R) -> Self {
		Self::Instance(resource)
	}
}

impl<'a> From<&'a str> for ResourceRef<'a> {
	fn from(scope: &'a str) -> Self {
		Self::Scope(scope)
	}
}

impl<'a> From<&'a String> for ResourceRef<'a> {
	fn from(scope: &'a String) -> Self {
		Self::Scope(scope.as_str())
	}
}

impl<'a> From<&'a ResourceClass> for ResourceRef<'a> {
	fn from(class: &'a ResourceClass) -> Self {
		Self::Class(class)
	}
}

impl<'a> From<&'a dyn Resource> for ResourceRef<'a> {
	fn from(resource: &'a dyn Resource) -> Self {
		Self::Instance(resource)
	}
}

impl fmt::Display for ResourceRef<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Scope(scope) => write!(f, "scope '{}'", scope),
			Self::Instance(resource) => {
				write!(f, "instance of {}", resource.resource_class().name())
			}
			Self::Class(class) => write!(f, "class {}", class.name()),
		}
	}
}

impl fmt::Debug for ResourceRef<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "ResourceRef({})", self)
	}
}
