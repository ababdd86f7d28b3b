//! In-memory state tree: modules containing resources containing instances
//!
//! The tree is owned by whoever loads the snapshot. The filter only ever
//! borrows it, so the borrow checker rules out mutation while a filter over
//! the tree is alive.

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::addrs::{self, AbsResourceInstance, InstanceKey, ModuleInstance};

/// A point-in-time snapshot of managed objects, keyed by module instance
#[derive(Debug, Clone, PartialEq)]
pub struct State {
    modules: IndexMap<ModuleInstance, Module>,
}

impl State {
    /// Creates an empty state that holds only the root module
    pub fn new() -> Self {
        let mut modules = IndexMap::new();
        modules.insert(ModuleInstance::root(), Module::new(ModuleInstance::root()));
        Self { modules }
    }

    /// Iterates over all module instances in insertion order
    pub fn modules(&self) -> impl Iterator<Item = &Module> {
        self.modules.values()
    }

    pub fn module(&self, addr: &ModuleInstance) -> Option<&Module> {
        self.modules.get(addr)
    }

    pub fn root_module(&self) -> Option<&Module> {
        self.modules.get(&ModuleInstance::root())
    }

    /// Returns the module with the given address, creating it if needed
    pub fn ensure_module(&mut self, addr: ModuleInstance) -> &mut Module {
        self.modules
            .entry(addr)
            .or_insert_with_key(|addr| Module::new(addr.clone()))
    }

    pub fn resource_instance(&self, addr: &AbsResourceInstance) -> Option<&ResourceInstance> {
        self.module(&addr.module)?
            .resource(&addr.resource.resource)?
            .instance(&addr.resource.key)
    }

    /// Sets the current object of a resource instance, creating the module,
    /// resource and instance as needed. `None` clears the current object.
    pub fn set_resource_instance_current(
        &mut self,
        addr: &AbsResourceInstance,
        object: Option<InstanceObject>,
    ) {
        self.ensure_module(addr.module.clone())
            .ensure_resource(&addr.resource.resource)
            .ensure_instance(addr.resource.key.clone())
            .current = object;
    }

    /// Records a deposed object for a resource instance
    pub fn set_resource_instance_deposed(
        &mut self,
        addr: &AbsResourceInstance,
        deposed_key: impl Into<String>,
        object: InstanceObject,
    ) {
        self.ensure_module(addr.module.clone())
            .ensure_resource(&addr.resource.resource)
            .ensure_instance(addr.resource.key.clone())
            .deposed
            .insert(deposed_key.into(), object);
    }

    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    /// Counts resource instances across every module
    pub fn resource_instance_count(&self) -> usize {
        self.modules()
            .flat_map(Module::resources)
            .map(|r| r.instances.len())
            .sum()
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

/// One module instance and the resources declared in it
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    pub addr: ModuleInstance,
    resources: IndexMap<addrs::Resource, Resource>,
}

impl Module {
    pub fn new(addr: ModuleInstance) -> Self {
        Self {
            addr,
            resources: IndexMap::new(),
        }
    }

    pub fn resources(&self) -> impl Iterator<Item = &Resource> {
        self.resources.values()
    }

    pub fn resource(&self, addr: &addrs::Resource) -> Option<&Resource> {
        self.resources.get(addr)
    }

    pub fn ensure_resource(&mut self, addr: &addrs::Resource) -> &mut Resource {
        self.resources
            .entry(addr.clone())
            .or_insert_with(|| Resource::new(addr.clone()))
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

/// A resource and all of its instances within one module
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    pub addr: addrs::Resource,
    pub instances: IndexMap<InstanceKey, ResourceInstance>,
}

impl Resource {
    pub fn new(addr: addrs::Resource) -> Self {
        Self {
            addr,
            instances: IndexMap::new(),
        }
    }

    pub fn instance(&self, key: &InstanceKey) -> Option<&ResourceInstance> {
        self.instances.get(key)
    }

    pub fn ensure_instance(&mut self, key: InstanceKey) -> &mut ResourceInstance {
        self.instances.entry(key).or_default()
    }
}

/// The objects recorded for one resource instance
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResourceInstance {
    pub current: Option<InstanceObject>,
    pub deposed: IndexMap<String, InstanceObject>,
}

impl ResourceInstance {
    pub fn has_current(&self) -> bool {
        self.current.is_some()
    }

    pub fn has_objects(&self) -> bool {
        self.current.is_some() || !self.deposed.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ObjectStatus {
    #[default]
    Ready,
    Tainted,
}

/// A single remote object and its serialized attributes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceObject {
    #[serde(default)]
    pub status: ObjectStatus,

    /// Attribute values as a JSON document
    #[serde(rename = "attributes_json")]
    pub attrs_json: String,
}

impl InstanceObject {
    pub fn new(attrs_json: impl Into<String>) -> Self {
        Self {
            status: ObjectStatus::Ready,
            attrs_json: attrs_json.into(),
        }
    }

    pub fn tainted(mut self) -> Self {
        self.status = ObjectStatus::Tainted;
        self
    }

    /// Decodes the attribute JSON into `T`
    pub fn decode_attrs<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.attrs_json)
    }
}
