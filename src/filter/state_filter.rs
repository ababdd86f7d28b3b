//! Filtering a state tree by address patterns

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, trace};

use super::cache::TargetParser;
use super::matcher::relevant;
use super::result::FilterResult;
use crate::addrs::{ModuleInstance, Target};
use crate::error::{FilterError, Result};
use crate::state::{Module, State};

/// Configuration for the state filter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Let a module pattern also select every module instance nested under
    /// it. By default only the exact module instance is selected.
    pub include_nested_modules: bool,
}

/// Finds the objects in a [`State`] that match a set of address patterns
///
/// The filter borrows the state for its whole lifetime, so the state cannot
/// change underneath it. Filtering is read-only; one filter may be used from
/// many threads at once.
///
/// # Examples
///
/// ```
/// use statefilter::addrs::{InstanceKey, ModuleInstance, Resource};
/// use statefilter::state::{InstanceObject, State};
/// use statefilter::StateFilter;
///
/// let mut state = State::new();
/// let web = Resource::managed("aws_instance", "web");
/// state.set_resource_instance_current(
///     &web.absolute(ModuleInstance::root()).instance(InstanceKey::Int(0)),
///     Some(InstanceObject::new(r#"{"id":"i-1"}"#)),
/// );
///
/// let filter = StateFilter::new(&state);
/// let results = filter.filter(&["aws_instance.web"]).unwrap();
/// assert_eq!(results.len(), 1);
/// assert_eq!(results[0].address, "aws_instance.web[0]");
/// ```
#[derive(Debug, Clone)]
pub struct StateFilter<'a> {
    state: &'a State,
    config: FilterConfig,
    parser: Arc<TargetParser>,
}

impl<'a> StateFilter<'a> {
    pub fn new(state: &'a State) -> Self {
        Self::with_config(state, FilterConfig::default())
    }

    pub fn with_config(state: &'a State, config: FilterConfig) -> Self {
        Self {
            state,
            config,
            parser: Arc::new(TargetParser::default()),
        }
    }

    /// Uses a shared parser so pattern parses are cached across filters
    pub fn with_parser(mut self, parser: Arc<TargetParser>) -> Self {
        self.parser = parser;
        self
    }

    pub fn state(&self) -> &'a State {
        self.state
    }

    /// Finds every object matched by any of `patterns`
    ///
    /// Each pattern may be a module instance, resource or resource instance
    /// address. No patterns selects every resource instance in the state.
    /// Results are deduplicated by address and sorted by address, then with
    /// modules ahead of resource instances.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::Parse`] for the first pattern that is not a
    /// valid address. No filtering happens in that case.
    pub fn filter<S: AsRef<str>>(&self, patterns: &[S]) -> Result<Vec<FilterResult<'a>>> {
        let mut targets = patterns
            .iter()
            .map(|p| self.parse_pattern(p.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        if targets.is_empty() {
            targets.push(Target::Module(ModuleInstance::root()));
        }

        Ok(self.filter_targets(&targets))
    }

    /// Lists every resource instance in the state
    pub fn filter_all(&self) -> Result<Vec<FilterResult<'a>>> {
        self.filter::<&str>(&[])
    }

    /// Same as [`filter`](Self::filter) with already parsed targets
    ///
    /// Parsing is the only fallible step, so this cannot fail. An empty
    /// `targets` slice yields no results.
    pub fn filter_targets(&self, targets: &[Target]) -> Vec<FilterResult<'a>> {
        let mut result_set: HashMap<(String, u8), FilterResult<'a>> = HashMap::new();
        for target in targets {
            for r in self.filter_single(target) {
                result_set.insert((r.address.clone(), r.sort_rank()), r);
            }
        }

        let mut results: Vec<_> = result_set.into_values().collect();
        results.sort();

        debug!(
            targets = targets.len(),
            results = results.len(),
            "filtered state"
        );

        results
    }

    fn parse_pattern(&self, pattern: &str) -> Result<Target> {
        self.parser.parse(pattern).map_err(|source| FilterError::Parse {
            pattern: pattern.to_string(),
            source,
        })
    }

    fn filter_single(&self, target: &Target) -> Vec<FilterResult<'a>> {
        let root = ModuleInstance::root();
        let scope = match target {
            Target::Module(addr) => addr,
            _ => &root,
        };

        let modules: Vec<&'a Module> = self
            .state
            .modules()
            .filter(|m| self.in_scope(scope, &m.addr))
            .collect();

        let mut results = Vec::new();
        for m in modules {
            // Module results only come from a specific non-root module target
            if !scope.is_root() {
                results.push(FilterResult::module(m));
            }

            for r in m.resources() {
                let addr = r.addr.absolute(m.addr.clone());
                for (key, instance) in &r.instances {
                    if relevant(target, &addr, key) {
                        results.push(FilterResult::resource_instance(
                            addr.instance(key.clone()).to_string(),
                            instance,
                        ));
                    }
                }
            }
        }

        trace!(address = %target, matched = results.len(), "filtered single address");
        results
    }

    fn in_scope(&self, scope: &ModuleInstance, addr: &ModuleInstance) -> bool {
        scope.is_root()
            || scope == addr
            || (self.config.include_nested_modules && scope.is_ancestor_of(addr))
    }
}
