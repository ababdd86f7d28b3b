//! Filter results and their display ordering

use std::cmp::Ordering;
use std::fmt;

use crate::state::{Module, ResourceInstance};

/// The object a filter result refers to
#[derive(Debug, Clone, Copy)]
pub enum FilterValue<'a> {
    Module(&'a Module),
    ResourceInstance(&'a ResourceInstance),
}

impl<'a> FilterValue<'a> {
    /// Rank used to order results that share an address
    pub fn sort_rank(&self) -> u8 {
        match self {
            FilterValue::Module(_) => 0,
            FilterValue::ResourceInstance(_) => 1,
        }
    }

    pub fn as_module(&self) -> Option<&'a Module> {
        match *self {
            FilterValue::Module(m) => Some(m),
            FilterValue::ResourceInstance(_) => None,
        }
    }

    pub fn as_resource_instance(&self) -> Option<&'a ResourceInstance> {
        match *self {
            FilterValue::ResourceInstance(is) => Some(is),
            FilterValue::Module(_) => None,
        }
    }
}

/// A single match from a filter operation
///
/// `address` is the canonical address of the matched object and is its
/// identity: results compare and order by address, then by kind.
#[derive(Debug, Clone)]
pub struct FilterResult<'a> {
    pub address: String,
    pub value: FilterValue<'a>,
}

impl<'a> FilterResult<'a> {
    pub fn module(module: &'a Module) -> Self {
        Self {
            address: module.addr.to_string(),
            value: FilterValue::Module(module),
        }
    }

    pub fn resource_instance(address: String, instance: &'a ResourceInstance) -> Self {
        Self {
            address,
            value: FilterValue::ResourceInstance(instance),
        }
    }

    pub fn sort_rank(&self) -> u8 {
        self.value.sort_rank()
    }

    pub fn is_module(&self) -> bool {
        matches!(self.value, FilterValue::Module(_))
    }

    pub fn is_resource_instance(&self) -> bool {
        matches!(self.value, FilterValue::ResourceInstance(_))
    }
}

impl PartialEq for FilterResult<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.address == other.address && self.sort_rank() == other.sort_rank()
    }
}

impl Eq for FilterResult<'_> {}

impl PartialOrd for FilterResult<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FilterResult<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.address
            .cmp(&other.address)
            .then_with(|| self.sort_rank().cmp(&other.sort_rank()))
    }
}

impl fmt::Display for FilterResult<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            FilterValue::Module(_) => write!(f, "module: {}", self.address),
            FilterValue::ResourceInstance(_) => write!(f, "resource instance: {}", self.address),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::addrs::{InstanceKey, ModuleInstance};

    #[test]
    fn test_orders_by_address_first() {
        let module = Module::new(ModuleInstance::root().child("b", InstanceKey::NoKey));
        let instance = ResourceInstance::default();

        let mut results = vec![
            FilterResult::module(&module),
            FilterResult::resource_instance("aws_instance.web".to_string(), &instance),
            FilterResult::resource_instance("aws_instance.app".to_string(), &instance),
        ];
        results.sort();

        let addresses: Vec<_> = results.iter().map(|r| r.address.as_str()).collect();
        assert_eq!(addresses, vec!["aws_instance.app", "aws_instance.web", "module.b"]);
    }

    #[test]
    fn test_module_before_instance_on_equal_address() {
        let module = Module::new(ModuleInstance::root().child("a", InstanceKey::NoKey));
        let instance = ResourceInstance::default();

        let mut results = vec![
            FilterResult::resource_instance("module.a".to_string(), &instance),
            FilterResult::module(&module),
        ];
        results.sort();

        assert!(results[0].is_module());
        assert!(results[1].is_resource_instance());
    }

    #[test]
    fn test_display() {
        let module = Module::new(ModuleInstance::root().child("a", InstanceKey::Int(0)));
        assert_eq!(FilterResult::module(&module).to_string(), "module: module.a[0]");

        let instance = ResourceInstance::default();
        let result = FilterResult::resource_instance("aws_instance.web".to_string(), &instance);
        assert_eq!(result.to_string(), "resource instance: aws_instance.web");
        assert!(result.value.as_resource_instance().is_some());
        assert!(result.value.as_module().is_none());
    }
}
