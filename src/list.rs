//! Resource listing on top of the state filter
//!
//! Produces the addresses a "list state entries" command prints: resource
//! instances only, optionally narrowed to objects whose `id` attribute
//! equals a given value.

use serde_json::{Map, Value};

use crate::error::{FilterError, Result};
use crate::filter::{FilterResult, StateFilter};
use crate::state::{ResourceInstance, State};

/// Lists resource instance addresses matching `patterns`
///
/// Module results are skipped. When `lookup_id` is a non-empty string, only
/// instances whose current object has that `id` are kept; instances without
/// a current object have an empty id.
///
/// # Examples
///
/// ```
/// use statefilter::addrs::AbsResourceInstance;
/// use statefilter::state::{InstanceObject, State};
/// use statefilter::list_resource_addresses;
///
/// let mut state = State::new();
/// for (addr, id) in [("aws_instance.a", "i-1"), ("aws_instance.b", "i-2")] {
///     let addr: AbsResourceInstance = addr.parse().unwrap();
///     let attrs = format!(r#"{{"id":"{}"}}"#, id);
///     state.set_resource_instance_current(&addr, Some(InstanceObject::new(attrs)));
/// }
///
/// let all = list_resource_addresses::<&str>(&state, &[], None).unwrap();
/// assert_eq!(all, vec!["aws_instance.a", "aws_instance.b"]);
///
/// let by_id = list_resource_addresses::<&str>(&state, &[], Some("i-2")).unwrap();
/// assert_eq!(by_id, vec!["aws_instance.b"]);
/// ```
pub fn list_resource_addresses<S: AsRef<str>>(
    state: &State,
    patterns: &[S],
    lookup_id: Option<&str>,
) -> Result<Vec<String>> {
    let results = StateFilter::new(state).filter(patterns)?;
    select_resource_addresses(&results, lookup_id)
}

/// Applies the listing rules to results that were already filtered
pub fn select_resource_addresses(
    results: &[FilterResult<'_>],
    lookup_id: Option<&str>,
) -> Result<Vec<String>> {
    let lookup_id = lookup_id.filter(|id| !id.is_empty());

    let mut addresses = Vec::new();
    for result in results {
        let Some(instance) = result.value.as_resource_instance() else {
            continue;
        };

        if let Some(wanted) = lookup_id {
            if instance_id(&result.address, instance)? != wanted {
                continue;
            }
        }

        addresses.push(result.address.clone());
    }

    Ok(addresses)
}

/// Reads the string `id` attribute of the current object, or `""`
fn instance_id(address: &str, instance: &ResourceInstance) -> Result<String> {
    let Some(current) = &instance.current else {
        return Ok(String::new());
    };

    // A `null` attribute object decodes as no attributes at all
    let attrs: Option<Map<String, Value>> =
        current.decode_attrs().map_err(|e| FilterError::Attributes {
            address: address.to_string(),
            reason: e.to_string(),
        })?;

    Ok(attrs
        .as_ref()
        .and_then(|attrs| attrs.get("id"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::addrs::AbsResourceInstance;
    use crate::state::InstanceObject;

    fn put(state: &mut State, addr: &str, attrs: Option<&str>) {
        let addr: AbsResourceInstance = addr.parse().unwrap();
        state.set_resource_instance_current(&addr, attrs.map(InstanceObject::new));
    }

    fn fixture() -> State {
        let mut state = State::new();
        put(&mut state, "aws_instance.web[0]", Some(r#"{"id":"i-abc"}"#));
        put(&mut state, "aws_instance.web[1]", Some(r#"{"id":"i-def"}"#));
        put(&mut state, "module.app.aws_instance.web", Some(r#"{"id":"i-abc"}"#));
        put(&mut state, "aws_eip.numeric", Some(r#"{"id":42}"#));
        put(&mut state, "aws_eip.pending", None);
        state
    }

    #[test]
    fn test_module_results_are_skipped() {
        let state = fixture();
        let listed = list_resource_addresses(&state, &["module.app"], None).unwrap();
        assert_eq!(listed, vec!["module.app.aws_instance.web"]);
    }

    #[test]
    fn test_lookup_id() {
        let state = fixture();
        let listed = list_resource_addresses::<&str>(&state, &[], Some("i-abc")).unwrap();
        assert_eq!(
            listed,
            vec!["aws_instance.web[0]", "module.app.aws_instance.web"]
        );
    }

    #[test]
    fn test_empty_lookup_id_lists_everything() {
        let state = fixture();
        let listed = list_resource_addresses::<&str>(&state, &[], Some("")).unwrap();
        assert_eq!(listed.len(), 5);
    }

    #[test]
    fn test_non_string_id_never_matches() {
        let state = fixture();
        let listed = list_resource_addresses(&state, &["aws_eip.numeric"], Some("42")).unwrap();
        assert!(listed.is_empty());
    }

    #[test]
    fn test_broken_attributes_error() {
        let mut state = fixture();
        put(&mut state, "aws_instance.broken", Some("{not json"));

        let err = list_resource_addresses::<&str>(&state, &[], Some("i-abc")).unwrap_err();
        assert!(matches!(err, FilterError::Attributes { ref address, .. } if address == "aws_instance.broken"));

        // Attributes are only decoded when an id is requested
        assert!(list_resource_addresses::<&str>(&state, &[], None).is_ok());
    }

    #[test]
    fn test_null_attributes_have_empty_id() {
        let mut state = State::new();
        put(&mut state, "aws_instance.a", Some("null"));

        let listed = list_resource_addresses::<&str>(&state, &[], Some("x"));
        assert_eq!(listed, Ok(vec![]));

        let listed = list_resource_addresses::<&str>(&state, &[], None).unwrap();
        assert_eq!(listed, vec!["aws_instance.a"]);
    }

    #[test]
    fn test_parse_error_propagates() {
        let state = fixture();
        let err = list_resource_addresses(&state, &["not a valid address!!"], None).unwrap_err();
        assert!(matches!(err, FilterError::Parse { .. }));
    }
}
