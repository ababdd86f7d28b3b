//! Address types for modules, resources and resource instances

use serde::{Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// The kind of address a parser was attempting to read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressKind {
    ModuleInstance,
    Resource,
    ResourceInstance,
}

impl fmt::Display for AddressKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressKind::ModuleInstance => write!(f, "module instance"),
            AddressKind::Resource => write!(f, "resource"),
            AddressKind::ResourceInstance => write!(f, "resource instance"),
        }
    }
}

/// Errors that can occur while parsing an address
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("address is empty")]
    Empty,

    #[error("invalid {kind} address: unexpected input at offset {offset}")]
    Syntax { kind: AddressKind, offset: usize },
}

/// Discriminator for one instance of a possibly repeated object
///
/// `NoKey` is used for objects that are not repeated at all. Integer keys
/// come from `count`-style repetition and string keys from `for_each`-style
/// repetition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum InstanceKey {
    #[default]
    NoKey,
    Int(i64),
    Str(String),
}

impl InstanceKey {
    pub fn is_no_key(&self) -> bool {
        matches!(self, InstanceKey::NoKey)
    }
}

impl fmt::Display for InstanceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstanceKey::NoKey => Ok(()),
            InstanceKey::Int(i) => write!(f, "[{}]", i),
            InstanceKey::Str(s) => {
                f.write_str("[\"")?;
                for c in s.chars() {
                    match c {
                        '\\' => f.write_str("\\\\")?,
                        '"' => f.write_str("\\\"")?,
                        '\n' => f.write_str("\\n")?,
                        c => write!(f, "{}", c)?,
                    }
                }
                f.write_str("\"]")
            }
        }
    }
}

impl From<i64> for InstanceKey {
    fn from(i: i64) -> Self {
        InstanceKey::Int(i)
    }
}

impl From<&str> for InstanceKey {
    fn from(s: &str) -> Self {
        InstanceKey::Str(s.to_string())
    }
}

/// One `module.<name>[<key>]` step of a module instance path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleInstanceStep {
    pub name: String,
    pub key: InstanceKey,
}

/// Path of module calls from the root module to one module instance
///
/// The empty path is the root module instance.
///
/// # Examples
///
/// ```
/// use statefilter::addrs::{InstanceKey, ModuleInstance};
///
/// let child = ModuleInstance::root()
///     .child("network", InstanceKey::Int(0))
///     .child("subnet", InstanceKey::NoKey);
/// assert_eq!(child.to_string(), "module.network[0].module.subnet");
/// assert!(ModuleInstance::root().is_ancestor_of(&child));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ModuleInstance(Vec<ModuleInstanceStep>);

impl ModuleInstance {
    /// Returns the root module instance
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn steps(&self) -> &[ModuleInstanceStep] {
        &self.0
    }

    /// Returns the address of a module instance called from this one
    pub fn child(&self, name: impl Into<String>, key: InstanceKey) -> Self {
        let mut steps = self.0.clone();
        steps.push(ModuleInstanceStep {
            name: name.into(),
            key,
        });
        Self(steps)
    }

    /// Returns the calling module instance, or `None` for the root
    pub fn parent(&self) -> Option<Self> {
        let (_, rest) = self.0.split_last()?;
        Some(Self(rest.to_vec()))
    }

    /// Checks if this module instance strictly contains `other`
    pub fn is_ancestor_of(&self, other: &ModuleInstance) -> bool {
        self.0.len() < other.0.len() && other.0.starts_with(&self.0)
    }

    /// Returns the address of a resource declared in this module instance
    pub fn resource(
        &self,
        mode: ResourceMode,
        type_name: impl Into<String>,
        name: impl Into<String>,
    ) -> AbsResource {
        Resource::new(mode, type_name, name).absolute(self.clone())
    }
}

impl From<Vec<ModuleInstanceStep>> for ModuleInstance {
    fn from(steps: Vec<ModuleInstanceStep>) -> Self {
        Self(steps)
    }
}

impl fmt::Display for ModuleInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "module.{}{}", step.name, step.key)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceMode {
    Managed,
    Data,
}

/// A resource identity within a single module, without instance key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Resource {
    pub mode: ResourceMode,
    pub type_name: String,
    pub name: String,
}

impl Resource {
    pub fn new(mode: ResourceMode, type_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            mode,
            type_name: type_name.into(),
            name: name.into(),
        }
    }

    pub fn managed(type_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(ResourceMode::Managed, type_name, name)
    }

    pub fn data(type_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(ResourceMode::Data, type_name, name)
    }

    pub fn absolute(&self, module: ModuleInstance) -> AbsResource {
        AbsResource {
            module,
            resource: self.clone(),
        }
    }

    pub fn instance(&self, key: InstanceKey) -> ResourceInstance {
        ResourceInstance {
            resource: self.clone(),
            key,
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mode {
            ResourceMode::Managed => write!(f, "{}.{}", self.type_name, self.name),
            ResourceMode::Data => write!(f, "data.{}.{}", self.type_name, self.name),
        }
    }
}

/// A resource plus instance key, without module qualification
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceInstance {
    pub resource: Resource,
    pub key: InstanceKey,
}

impl ResourceInstance {
    pub fn absolute(&self, module: ModuleInstance) -> AbsResourceInstance {
        AbsResourceInstance {
            module,
            resource: self.clone(),
        }
    }
}

impl fmt::Display for ResourceInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.resource, self.key)
    }
}

/// A resource qualified by the module instance that holds it
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AbsResource {
    pub module: ModuleInstance,
    pub resource: Resource,
}

impl AbsResource {
    pub fn instance(&self, key: InstanceKey) -> AbsResourceInstance {
        AbsResourceInstance {
            module: self.module.clone(),
            resource: self.resource.instance(key),
        }
    }
}

impl fmt::Display for AbsResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.module.is_root() {
            write!(f, "{}", self.resource)
        } else {
            write!(f, "{}.{}", self.module, self.resource)
        }
    }
}

/// A fully qualified resource instance: module, resource and instance key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AbsResourceInstance {
    pub module: ModuleInstance,
    pub resource: ResourceInstance,
}

impl AbsResourceInstance {
    /// Returns the containing resource, dropping the instance key
    pub fn contained_resource(&self) -> AbsResource {
        self.resource.resource.absolute(self.module.clone())
    }
}

impl fmt::Display for AbsResourceInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.module.is_root() {
            write!(f, "{}", self.resource)
        } else {
            write!(f, "{}.{}", self.module, self.resource)
        }
    }
}

/// An address that can be used to select objects from a state tree
///
/// A resource or resource instance target whose module is the root module is
/// treated as module-agnostic by the filter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target {
    Module(ModuleInstance),
    Resource(AbsResource),
    ResourceInstance(AbsResourceInstance),
}

impl Target {
    pub fn kind(&self) -> AddressKind {
        match self {
            Target::Module(_) => AddressKind::ModuleInstance,
            Target::Resource(_) => AddressKind::Resource,
            Target::ResourceInstance(_) => AddressKind::ResourceInstance,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Module(addr) => fmt::Display::fmt(addr, f),
            Target::Resource(addr) => fmt::Display::fmt(addr, f),
            Target::ResourceInstance(addr) => fmt::Display::fmt(addr, f),
        }
    }
}

impl From<ModuleInstance> for Target {
    fn from(addr: ModuleInstance) -> Self {
        Target::Module(addr)
    }
}

impl From<AbsResource> for Target {
    fn from(addr: AbsResource) -> Self {
        Target::Resource(addr)
    }
}

impl From<AbsResourceInstance> for Target {
    fn from(addr: AbsResourceInstance) -> Self {
        Target::ResourceInstance(addr)
    }
}

macro_rules! serialize_as_string {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Serialize for $ty {
                fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
                where
                    S: Serializer,
                {
                    serializer.collect_str(self)
                }
            }
        )*
    };
}

serialize_as_string!(ModuleInstance, AbsResource, AbsResourceInstance, Target);
