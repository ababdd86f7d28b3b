//! Relevance test between a target address and a candidate resource instance

use crate::addrs::{AbsResource, InstanceKey, Target};

/// Decides whether the resource instance `addr[key]` is selected by `target`
///
/// - A resource target qualified by a module must equal `addr` exactly. An
///   unqualified one matches the bare resource in any module.
/// - A resource instance target works the same way with the key included.
/// - A module target matches everything; module scoping has already been
///   applied by the time candidates reach this test.
pub fn relevant(target: &Target, addr: &AbsResource, key: &InstanceKey) -> bool {
    match target {
        Target::Resource(filter) => {
            if !filter.module.is_root() {
                return filter == addr;
            }
            filter.resource == addr.resource
        }
        Target::ResourceInstance(filter) => {
            if !filter.module.is_root() {
                return filter.module == addr.module
                    && filter.resource.resource == addr.resource
                    && &filter.resource.key == key;
            }
            filter.resource.resource == addr.resource && &filter.resource.key == key
        }
        Target::Module(_) => true,
    }
}
