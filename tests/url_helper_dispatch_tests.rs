// Accessor dispatch tests
// Covers scope resolution, target naming and argument forwarding end to end.

use support::Recorder;
use reinhardt_auth_urls::prelude::*;
use rstest::{fixture, rstest};
use std::sync::Arc;

mod support {
	use reinhardt_auth_urls::prelude::*;
	use std::sync::Mutex;

	/// Route context that records every call and answers with the route name.
	#[derive(Default)]
	pub struct Recorder {
		pub routes: Vec<String>,
		pub calls: Mutex<Vec<(String, RouteArgs)>>,
	}

	impl Recorder {
		pub fn with_routes(routes: &[&str]) -> Self {
			Self {
				routes: routes.iter().map(|r| r.to_string()).collect(),
				calls: Mutex::new(Vec::new()),
			}
		}

		pub fn calls(&self) -> Vec<(String, RouteArgs)> {
			self.calls.lock().unwrap().clone()
		}

		fn has_route(&self, name: &str) -> bool {
			self.routes.iter().any(|r| r == name)
		}
	}

	impl RouteContext for Recorder {

		fn call_route(&self, name: &str, args: &RouteArgs) -> Option<UrlHelperResult<String>> {
			if !self.has_route(name) {
				return None;
			}
			self.calls
				.lock()
				.unwrap()
				.push((name.to_string(), args.clone()));
			Some(Ok(format!("<{}>", name)))
		}
	}
}

static USER: ResourceClass = ResourceClass::new("User");
static SOME_USER_SUBCLASS: ResourceClass = ResourceClass::with_parent("SomeUserSubclass", &USER);
static ADMIN: ResourceClass = ResourceClass::new("Admin");
static GUEST: ResourceClass = ResourceClass::new("Guest");

struct Model(&'static ResourceClass);

impl Resource for Model {
	fn resource_class(&self) -> &'static ResourceClass {
		self.0
	}
}

#[fixture]
fn session_only() -> UrlHelpers {
	let table = RouteTable::builder()
		.module(
			"session",
			[Action::Default, Action::named("new"), Action::named("destroy")],
		)
		.build();

	let mut helpers = UrlHelpers::new(table);
	helpers.register_mapping(Mapping::new("user", "User").with_helpers(["session"]));
	helpers.register_mapping(Mapping::new("admin", "Admin").with_helpers(["session"]));
	helpers.generate_helpers(None);
	helpers
}

#[fixture]
fn builtin() -> UrlHelpers {
	UrlHelpers::init(
		&UrlHelperSettings::new()
			.with_mapping(MappingSettings::new("user", "User"))
			.with_mapping(MappingSettings::new("admin", "Admin").with_helpers(["session"])),
	)
	.unwrap()
}

fn env_with(recorder: Recorder) -> (RequestContext, Arc<Recorder>) {
	let recorder = Arc::new(recorder);
	let env = RequestContext::new().with_router("main_app", recorder.clone());
	(env, recorder)
}

#[rstest]
fn test_same_route_under_two_scopes(session_only: UrlHelpers) {
	let (env, recorder) = env_with(Recorder::with_routes(&[
		"user_session_path",
		"admin_session_path",
	]));
	let args = RouteArgs::new();

	assert_eq!(
		session_only.call("session_path", &env, "user", &args).unwrap(),
		"<user_session_path>"
	);
	assert_eq!(
		session_only.call("session_path", &env, "admin", &args).unwrap(),
		"<admin_session_path>"
	);

	let names: Vec<_> = recorder.calls().into_iter().map(|(name, _)| name).collect();
	assert_eq!(names, vec!["user_session_path", "admin_session_path"]);
}

#[rstest]
fn test_unknown_scope_fails_before_dispatch(session_only: UrlHelpers) {
	let (env, recorder) = env_with(Recorder::with_routes(&["guest_session_path"]));

	let err = session_only
		.call("session_path", &env, "guest", &RouteArgs::new())
		.unwrap_err();

	assert!(err.is_scope_resolution());
	assert!(err.to_string().contains("guest"));
	assert!(recorder.calls().is_empty());
}

#[rstest]
fn test_subclass_instance_resolves_to_parent_scope(builtin: UrlHelpers) {
	let (env, _) = env_with(Recorder::with_routes(&["new_user_password_path"]));
	let instance = Model(&SOME_USER_SUBCLASS);

	let result = builtin
		.call(
			"new_password_path",
			&env,
			ResourceRef::instance(&instance),
			&RouteArgs::new(),
		)
		.unwrap();
	assert_eq!(result, "<new_user_password_path>");
}

#[rstest]
#[case(&USER, "user")]
#[case(&SOME_USER_SUBCLASS, "user")]
#[case(&ADMIN, "admin")]
fn test_class_references(
	builtin: UrlHelpers,
	#[case] class: &'static ResourceClass,
	#[case] scope: &str,
) {
	assert_eq!(builtin.find_scope(class).unwrap(), scope);
}

#[rstest]
fn test_unregistered_class_fails(builtin: UrlHelpers) {
	let (env, _) = env_with(Recorder::with_routes(&["guest_session_path"]));
	let err = builtin
		.call("session_path", &env, &GUEST, &RouteArgs::new())
		.unwrap_err();
	assert!(matches!(err, UrlHelperError::ScopeResolution { .. }));
}

#[rstest]
fn test_arguments_forwarded_verbatim(builtin: UrlHelpers) {
	let (env, recorder) = env_with(Recorder::with_routes(&["edit_user_password_url"]));
	let args = RouteArgs::new()
		.arg("first")
		.arg("second")
		.param("reset_password_token", "t0k3n")
		.param("locale", "fr");

	builtin
		.call("edit_password_url", &env, "user", &args)
		.unwrap();

	let calls = recorder.calls();
	assert_eq!(calls.len(), 1);
	assert_eq!(calls[0].0, "edit_user_password_url");
	assert_eq!(calls[0].1, args);
	assert_eq!(calls[0].1.positional(), &["first".to_string(), "second".to_string()]);
	assert_eq!(
		calls[0].1.keyword().keys().collect::<Vec<_>>(),
		vec!["reset_password_token", "locale"]
	);
}

#[rstest]
fn test_every_scope_and_action_dispatches_to_exact_name(builtin: UrlHelpers) {
	let mut expected = Vec::new();
	for mapping in builtin.mappings().iter() {
		for (module, actions) in builtin.route_table().iter() {
			if !mapping.uses_helper(module) {
				continue;
			}
			for kind in RouteKind::ALL {
				for action in actions {
					let accessor = UrlHelper::new(action.clone(), module, kind);
					expected.push((
						mapping.scope_name().to_string(),
						accessor.name().to_string(),
						format!(
							"{}{}_{}_{}",
							action.prefix(),
							mapping.scope_name(),
							module,
							kind
						),
					));
				}
			}
		}
	}
	assert!(!expected.is_empty());

	let targets: Vec<&str> = expected.iter().map(|(_, _, t)| t.as_str()).collect();
	let (env, recorder) = env_with(Recorder::with_routes(&targets));

	for (scope, accessor, target) in &expected {
		let result = builtin
			.call(accessor, &env, scope.as_str(), &RouteArgs::new())
			.unwrap();
		assert_eq!(&result, &format!("<{}>", target));
	}
	assert_eq!(recorder.calls().len(), expected.len());
}

#[rstest]
fn test_missing_route_function(builtin: UrlHelpers) {
	let (env, _) = env_with(Recorder::with_routes(&["user_session_path"]));
	let err = builtin
		.call("new_unlock_path", &env, "user", &RouteArgs::new())
		.unwrap_err();
	assert!(matches!(
		err,
		UrlHelperError::MissingRouteFunction { ref name } if name == "new_user_unlock_path"
	));
}

#[rstest]
fn test_scope_without_module_fails_at_dispatch(builtin: UrlHelpers) {
	// unlock accessors exist because user uses them; admin has no unlock routes
	let (env, _) = env_with(Recorder::with_routes(&[]));
	let err = builtin
		.call("unlock_path", &env, "admin", &RouteArgs::new())
		.unwrap_err();
	assert!(matches!(err, UrlHelperError::MissingRouteFunction { .. }));
}

#[rstest]
fn test_route_context_cached_per_environment(builtin: UrlHelpers) {
	let (env, _) = env_with(Recorder::with_routes(&["user_session_path"]));

	let first = builtin.route_context(&env).unwrap();
	builtin
		.call("session_path", &env, "user", &RouteArgs::new())
		.unwrap();
	let second = builtin.route_context(&env).unwrap();

	assert!(Arc::ptr_eq(&first, &second));
}

#[rstest]
fn test_unknown_router(builtin: UrlHelpers) {
	let env = RequestContext::new().with_router("engine", Arc::new(Recorder::default()));
	let err = builtin
		.call("session_path", &env, "user", &RouteArgs::new())
		.unwrap_err();
	assert!(matches!(err, UrlHelperError::UnknownRouter(_)));
}
