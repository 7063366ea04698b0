//! # Registry Module
//!
//! Named, grouped route registrations with reverse lookup.
//!
//! ## Overview
//!
//! A registration associates a route type with a human readable name, a
//! default pattern and a group. Several types may share one name inside a
//! group; they are kept as an ordered candidate list. Reverse lookup walks
//! every name of a group in first-registration order, and every candidate of
//! a name in registration order, returning the first type that parses the
//! URL.
//!
//! ## Lifecycle
//!
//! Registrations are expected to happen at startup, before lookups begin.
//! The registry is still guarded by an `RwLock` so late registration from
//! another thread is safe. Entries are never removed.
//!
//! The process-wide registry is reachable through [`global`] and the free
//! functions of this module; [`Registry::new`] builds an isolated one.

use crate::deserialize::from_url_with;
use crate::error::{Result, RouteError};
use crate::field::{check_placeholders, validate_fields};
use crate::pattern::compile;
use crate::serialize::to_relative_url_with;
use crate::typed::Route;
use once_cell::sync::Lazy;
use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, warn};

/// Group used when a registration does not name one.
pub const DEFAULT_GROUP: &str = "default";

/// Options accepted by [`Registry::register`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteOptions {
    /// Registry group; `None` selects [`DEFAULT_GROUP`]
    pub group: Option<String>,
}

impl RouteOptions {
    /// Options selecting `group`.
    #[must_use]
    pub fn group(group: impl Into<String>) -> Self {
        Self {
            group: Some(group.into()),
        }
    }

    fn group_name(&self) -> &str {
        self.group.as_deref().unwrap_or(DEFAULT_GROUP)
    }
}

type ErasedParse = fn(&str, &str) -> Result<Box<dyn Any + Send>>;

fn parse_erased<R: Route>(url: &str, pattern: &str) -> Result<Box<dyn Any + Send>> {
    from_url_with::<R>(url, pattern).map(|route| Box::new(route) as Box<dyn Any + Send>)
}

#[derive(Clone)]
struct Candidate {
    type_id: TypeId,
    type_name: &'static str,
    pattern: String,
    parse: ErasedParse,
}

struct NamedRoute {
    name: String,
    candidates: Vec<Candidate>,
}

/// Reverse mapping from a type to its most recent registration.
struct TypeEntry {
    name: String,
    pattern: String,
}

#[derive(Default)]
struct RegistryState {
    groups: HashMap<String, Vec<NamedRoute>>,
    types: HashMap<TypeId, TypeEntry>,
}

/// One registered type under a route name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteType {
    pub type_name: &'static str,
    pub pattern: String,
}

/// A route name and its registered variants, in registration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinedRoute {
    pub name: String,
    pub variants: Vec<RouteType>,
}

/// Result of a successful reverse lookup.
pub struct MatchedRoute {
    pub group: String,
    pub name: String,
    /// `std::any::type_name` of the matching route type
    pub type_name: &'static str,
    instance: Box<dyn Any + Send>,
}

impl MatchedRoute {
    /// Whether the parsed instance is an `R`.
    #[must_use]
    pub fn is<R: Route>(&self) -> bool {
        self.instance.is::<R>()
    }

    /// Borrow the parsed instance as an `R`.
    #[must_use]
    pub fn downcast_ref<R: Route>(&self) -> Option<&R> {
        self.instance.downcast_ref::<R>()
    }

    /// Take the parsed instance as an `R`, or get `self` back unchanged.
    ///
    /// # Errors
    ///
    /// Returns `self` when the instance is of another type.
    pub fn downcast<R: Route>(self) -> std::result::Result<R, Self> {
        match self.instance.downcast::<R>() {
            Ok(route) => Ok(*route),
            Err(instance) => Err(Self { instance, ..self }),
        }
    }
}

impl std::fmt::Debug for MatchedRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchedRoute")
            .field("group", &self.group)
            .field("name", &self.name)
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

/// Route registry. See the module documentation.
#[derive(Default)]
pub struct Registry {
    state: RwLock<RegistryState>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, RegistryState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RegistryState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register `R` under `name` with a default `pattern`.
    ///
    /// The pattern and the field table are validated here so that a broken
    /// route fails at startup rather than on first use. Registering the same
    /// type under the same name and group again is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::InvalidPattern`],
    /// [`RouteError::InvalidAnnotation`], or [`RouteError::MissingPathField`]
    /// when a placeholder has no path field to fill it.
    pub fn register<R: Route>(
        &self,
        name: &str,
        pattern: &str,
        options: &RouteOptions,
    ) -> Result<()> {
        let compiled = compile(pattern)?;
        let fields = R::fields();
        validate_fields(&fields)?;
        check_placeholders(&fields, compiled.placeholders())?;

        let group = options.group_name();
        let type_id = TypeId::of::<R>();
        let mut state = self.write();

        let routes = state.groups.entry(group.to_string()).or_default();
        let index = match routes.iter().position(|route| route.name == name) {
            Some(index) => index,
            None => {
                routes.push(NamedRoute {
                    name: name.to_string(),
                    candidates: Vec::new(),
                });
                routes.len() - 1
            }
        };
        let named = &mut routes[index];
        if named.candidates.iter().any(|c| c.type_id == type_id) {
            warn!(
                route = type_name::<R>(),
                name = %name,
                group = %group,
                "Route already registered, ignoring"
            );
            return Ok(());
        }
        named.candidates.push(Candidate {
            type_id,
            type_name: type_name::<R>(),
            pattern: pattern.to_string(),
            parse: parse_erased::<R>,
        });

        state.types.insert(
            type_id,
            TypeEntry {
                name: name.to_string(),
                pattern: pattern.to_string(),
            },
        );

        info!(
            route = type_name::<R>(),
            name = %name,
            pattern = %pattern,
            group = %group,
            "Route registered"
        );
        Ok(())
    }

    /// Register `R` using its [`Route::declaration`].
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::Unregistered`] when `R` declares nothing, plus
    /// the errors of [`Registry::register`].
    pub fn register_declared<R: Route>(&self) -> Result<()> {
        let declaration = R::declaration().ok_or_else(|| RouteError::Unregistered {
            type_name: type_name::<R>(),
        })?;
        let options = RouteOptions {
            group: declaration.group.map(str::to_string),
        };
        self.register::<R>(declaration.name, declaration.pattern, &options)
    }

    /// Pattern of the latest registration of `R`.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::Unregistered`] when `R` was never registered.
    pub fn route_path<R: Route>(&self) -> Result<String> {
        self.with_entry::<R, _>(|entry| entry.pattern.clone())
    }

    /// Name of the latest registration of `R`.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::Unregistered`] when `R` was never registered.
    pub fn route_name<R: Route>(&self) -> Result<String> {
        self.with_entry::<R, _>(|entry| entry.name.clone())
    }

    /// [`Registry::route_name`] for the type of `route`.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::Unregistered`] when the type was never registered.
    pub fn route_name_of<R: Route>(&self, _route: &R) -> Result<String> {
        self.route_name::<R>()
    }

    fn with_entry<R: Route, T>(&self, read: impl FnOnce(&TypeEntry) -> T) -> Result<T> {
        self.read()
            .types
            .get(&TypeId::of::<R>())
            .map(read)
            .ok_or_else(|| RouteError::Unregistered {
                type_name: type_name::<R>(),
            })
    }

    /// Every name of `group` (default group when `None`) with its variants.
    #[must_use]
    pub fn defined_routes(&self, group: Option<&str>) -> Vec<DefinedRoute> {
        let group = group.unwrap_or(DEFAULT_GROUP);
        self.read()
            .groups
            .get(group)
            .map(|routes| {
                routes
                    .iter()
                    .map(|route| DefinedRoute {
                        name: route.name.clone(),
                        variants: route
                            .candidates
                            .iter()
                            .map(|c| RouteType {
                                type_name: c.type_name,
                                pattern: c.pattern.clone(),
                            })
                            .collect(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Find the first registered route of `group` that parses `url`.
    ///
    /// Candidates are tried in registration order. A candidate that fails to
    /// parse is skipped; `None` means every candidate failed.
    #[must_use]
    pub fn lookup(&self, url: &str, group: Option<&str>) -> Option<MatchedRoute> {
        let group = group.unwrap_or(DEFAULT_GROUP);
        // Snapshot so user code in `Route::fields` never runs under the lock.
        let routes: Vec<(String, Vec<Candidate>)> = self
            .read()
            .groups
            .get(group)
            .map(|routes| {
                routes
                    .iter()
                    .map(|route| (route.name.clone(), route.candidates.clone()))
                    .collect()
            })
            .unwrap_or_default();

        for (name, candidates) in routes {
            for candidate in candidates {
                match (candidate.parse)(url, &candidate.pattern) {
                    Ok(instance) => {
                        debug!(
                            url = %url,
                            group = %group,
                            name = %name,
                            route = candidate.type_name,
                            "Route lookup matched"
                        );
                        return Some(MatchedRoute {
                            group: group.to_string(),
                            name,
                            type_name: candidate.type_name,
                            instance,
                        });
                    }
                    Err(err) if !err.is_mismatch() => {
                        warn!(
                            url = %url,
                            name = %name,
                            route = candidate.type_name,
                            error = %err,
                            "Route candidate is misconfigured"
                        );
                    }
                    Err(err) => {
                        debug!(
                            url = %url,
                            name = %name,
                            route = candidate.type_name,
                            error = %err,
                            "Route candidate rejected"
                        );
                    }
                }
            }
        }
        debug!(url = %url, group = %group, "No route matched");
        None
    }

    /// Parse `url` into `R` using its registered pattern.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::Unregistered`] when `R` was never registered,
    /// plus the errors of [`from_url_with`].
    pub fn from_url<R: Route>(&self, url: &str) -> Result<R> {
        let pattern = self.route_path::<R>()?;
        from_url_with(url, &pattern)
    }

    /// Serialize `route` using its registered pattern.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::Unregistered`] when `R` was never registered,
    /// plus the errors of [`to_relative_url_with`].
    pub fn to_relative_url<R: Route>(&self, route: &R) -> Result<String> {
        let pattern = self.route_path::<R>()?;
        to_relative_url_with(route, &pattern)
    }
}

static REGISTRY: Lazy<Registry> = Lazy::new(Registry::new);

/// The process-wide registry.
#[must_use]
pub fn global() -> &'static Registry {
    &REGISTRY
}

/// Register `R` in the process-wide registry.
///
/// # Errors
///
/// See [`Registry::register`].
pub fn route<R: Route>(name: &str, pattern: &str, options: &RouteOptions) -> Result<()> {
    global().register::<R>(name, pattern, options)
}

/// Register `R` in the process-wide registry from its declaration.
///
/// # Errors
///
/// See [`Registry::register_declared`].
pub fn register_declared<R: Route>() -> Result<()> {
    global().register_declared::<R>()
}

/// # Errors
///
/// See [`Registry::route_path`].
pub fn route_path<R: Route>() -> Result<String> {
    global().route_path::<R>()
}

/// # Errors
///
/// See [`Registry::route_name`].
pub fn route_name<R: Route>() -> Result<String> {
    global().route_name::<R>()
}

/// # Errors
///
/// See [`Registry::route_name_of`].
pub fn route_name_of<R: Route>(route: &R) -> Result<String> {
    global().route_name_of(route)
}

#[must_use]
pub fn defined_routes(group: Option<&str>) -> Vec<DefinedRoute> {
    global().defined_routes(group)
}

/// Reverse lookup in the process-wide registry.
#[must_use]
pub fn lookup(url: &str, group: Option<&str>) -> Option<MatchedRoute> {
    global().lookup(url, group)
}

/// # Errors
///
/// See [`Registry::from_url`].
pub fn from_url<R: Route>(url: &str) -> Result<R> {
    global().from_url(url)
}

/// # Errors
///
/// See [`Registry::to_relative_url`].
pub fn to_relative_url<R: Route>(route: &R) -> Result<String> {
    global().to_relative_url(route)
}
