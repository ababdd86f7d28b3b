//! Address module for naming objects in a state tree.
//!
//! This module provides:
//! - Module instance paths (e.g., `module.network[0].module.subnet`)
//! - Resource, resource instance and their module-qualified forms
//! - Parsers for the three address syntaxes accepted as filter patterns
//! - Canonical string rendering used as the identity of filter results

mod parser;
mod types;

pub use parser::{
    parse_abs_resource_instance_str, parse_abs_resource_str, parse_module_instance_str,
    parse_target,
};
pub use types::{
    AbsResource, AbsResourceInstance, AddressError, AddressKind, InstanceKey, ModuleInstance,
    ModuleInstanceStep, Resource, ResourceInstance, ResourceMode, Target,
};
