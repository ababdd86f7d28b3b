//! Parsers for module, resource and resource instance addresses
//!
//! Grammar (no whitespace is allowed anywhere):
//!
//! ```text
//! ident     = [A-Za-z_][A-Za-z0-9_-]*
//! key       = "[" digits "]" | "[" quoted-string "]"
//! step      = "module." ident key?
//! module    = step ("." step)*
//! resource  = "data." ident "." ident | ident "." ident
//! abs_res   = (module ".")? resource
//! abs_inst  = abs_res key?
//! ```
//!
//! Every entry point must consume its entire input.

use std::str::FromStr;

use nom::{
    branch::alt,
    bytes::complete::{escaped_transform, is_not, tag, take_while},
    character::complete::{char, digit1, satisfy},
    combinator::{all_consuming, map, map_res, opt, recognize, value, verify},
    multi::many0,
    sequence::{delimited, pair, preceded, terminated},
    Finish, IResult,
};

use super::types::{
    AbsResource, AbsResourceInstance, AddressError, AddressKind, InstanceKey, ModuleInstance,
    ModuleInstanceStep, Resource, Target,
};

/// Parses a module instance address such as `module.network[0].module.subnet`
///
/// # Examples
///
/// ```
/// use statefilter::addrs::parse_module_instance_str;
///
/// let addr = parse_module_instance_str("module.network[0]").unwrap();
/// assert_eq!(addr.steps().len(), 1);
/// assert!(parse_module_instance_str("aws_instance.web").is_err());
/// ```
pub fn parse_module_instance_str(input: &str) -> Result<ModuleInstance, AddressError> {
    run(AddressKind::ModuleInstance, input, module_path)
}

/// Parses a resource address, optionally qualified by a module path
pub fn parse_abs_resource_str(input: &str) -> Result<AbsResource, AddressError> {
    run(AddressKind::Resource, input, abs_resource)
}

/// Parses a resource instance address, optionally qualified by a module path
///
/// A missing instance key parses as [`InstanceKey::NoKey`].
pub fn parse_abs_resource_instance_str(input: &str) -> Result<AbsResourceInstance, AddressError> {
    run(AddressKind::ResourceInstance, input, abs_resource_instance)
}

/// Parses a filter pattern into a [`Target`]
///
/// Tries module instance syntax, then resource syntax, then resource
/// instance syntax, and returns the first that succeeds. When none do, the
/// resource instance error is returned since it is the most general form.
///
/// # Examples
///
/// ```
/// use statefilter::addrs::{parse_target, Target};
///
/// assert!(matches!(parse_target("module.app").unwrap(), Target::Module(_)));
/// assert!(matches!(parse_target("aws_instance.web").unwrap(), Target::Resource(_)));
/// assert!(matches!(parse_target("aws_instance.web[0]").unwrap(), Target::ResourceInstance(_)));
/// ```
pub fn parse_target(input: &str) -> Result<Target, AddressError> {
    if let Ok(addr) = parse_module_instance_str(input) {
        return Ok(Target::Module(addr));
    }
    if let Ok(addr) = parse_abs_resource_str(input) {
        return Ok(Target::Resource(addr));
    }
    parse_abs_resource_instance_str(input).map(Target::ResourceInstance)
}

impl FromStr for ModuleInstance {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_module_instance_str(s)
    }
}

impl FromStr for AbsResource {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_abs_resource_str(s)
    }
}

impl FromStr for AbsResourceInstance {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_abs_resource_instance_str(s)
    }
}

impl FromStr for Target {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_target(s)
    }
}

fn run<'a, O>(
    kind: AddressKind,
    input: &'a str,
    parser: impl FnMut(&'a str) -> IResult<&'a str, O>,
) -> Result<O, AddressError> {
    if input.is_empty() {
        return Err(AddressError::Empty);
    }

    all_consuming(parser)(input)
        .finish()
        .map(|(_, out)| out)
        .map_err(|e| AddressError::Syntax {
            kind,
            offset: input.len() - e.input.len(),
        })
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        satisfy(|c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-'),
    ))(input)
}

fn string_literal(input: &str) -> IResult<&str, String> {
    delimited(
        char('"'),
        map(
            opt(escaped_transform(
                is_not("\\\""),
                '\\',
                alt((
                    value("\\", char('\\')),
                    value("\"", char('"')),
                    value("\n", char('n')),
                )),
            )),
            Option::unwrap_or_default,
        ),
        char('"'),
    )(input)
}

fn instance_key(input: &str) -> IResult<&str, InstanceKey> {
    delimited(
        char('['),
        alt((
            map(map_res(digit1, |s: &str| s.parse::<i64>()), InstanceKey::Int),
            map(string_literal, InstanceKey::Str),
        )),
        char(']'),
    )(input)
}

fn module_step(input: &str) -> IResult<&str, ModuleInstanceStep> {
    map(
        preceded(tag("module."), pair(identifier, opt(instance_key))),
        |(name, key)| ModuleInstanceStep {
            name: name.to_string(),
            key: key.unwrap_or_default(),
        },
    )(input)
}

fn module_path(input: &str) -> IResult<&str, ModuleInstance> {
    map(
        pair(module_step, many0(preceded(char('.'), module_step))),
        |(first, rest)| {
            let mut steps = Vec::with_capacity(rest.len() + 1);
            steps.push(first);
            steps.extend(rest);
            ModuleInstance::from(steps)
        },
    )(input)
}

fn resource(input: &str) -> IResult<&str, Resource> {
    alt((
        map(
            preceded(tag("data."), pair(identifier, preceded(char('.'), identifier))),
            |(type_name, name)| Resource::data(type_name, name),
        ),
        // "module" and "data" are reserved and never name a managed resource type
        map(
            pair(
                verify(identifier, |s: &str| s != "module" && s != "data"),
                preceded(char('.'), identifier),
            ),
            |(type_name, name)| Resource::managed(type_name, name),
        ),
    ))(input)
}

fn abs_resource(input: &str) -> IResult<&str, AbsResource> {
    map(
        pair(opt(terminated(module_path, char('.'))), resource),
        |(module, resource)| resource.absolute(module.unwrap_or_default()),
    )(input)
}

fn abs_resource_instance(input: &str) -> IResult<&str, AbsResourceInstance> {
    map(pair(abs_resource, opt(instance_key)), |(addr, key)| {
        addr.instance(key.unwrap_or_default())
    })(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::addrs::ResourceMode;
    use test_case::test_case;

    #[test_case("module.a" => AddressKind::ModuleInstance ; "module")]
    #[test_case("module.a[0].module.b[\"x\"]" => AddressKind::ModuleInstance ; "nested keyed module")]
    #[test_case("module.my-mod" => AddressKind::ModuleInstance ; "hyphenated module")]
    #[test_case("aws_instance.web" => AddressKind::Resource ; "unqualified resource")]
    #[test_case("data.aws_ami.ubuntu" => AddressKind::Resource ; "data resource")]
    #[test_case("module.a.aws_instance.web" => AddressKind::Resource ; "qualified resource")]
    #[test_case("module_thing.web" => AddressKind::Resource ; "type with module prefix")]
    #[test_case("aws_instance.web[0]" => AddressKind::ResourceInstance ; "indexed instance")]
    #[test_case("module.a[1].aws_instance.web[\"k\"]" => AddressKind::ResourceInstance ; "qualified keyed instance")]
    fn test_target_kind(input: &str) -> AddressKind {
        parse_target(input).unwrap().kind()
    }

    #[test_case("" ; "empty")]
    #[test_case("not a valid address!!" ; "spaces and punctuation")]
    #[test_case("module." ; "dangling module keyword")]
    #[test_case("module.a." ; "trailing dot")]
    #[test_case("module.a[0][1]" ; "double key")]
    #[test_case("aws_instance" ; "missing name")]
    #[test_case("aws_instance.web[" ; "unterminated key")]
    #[test_case("aws_instance.web[-1]" ; "negative index")]
    #[test_case("aws_instance.web[\"open]" ; "unterminated string key")]
    #[test_case("data.aws_ami" ; "data without name")]
    #[test_case("1abc.web" ; "leading digit")]
    fn test_invalid_targets(input: &str) {
        assert!(parse_target(input).is_err(), "{:?} should not parse", input);
    }

    #[test]
    fn test_empty_input_error() {
        assert_eq!(parse_target(""), Err(AddressError::Empty));
    }

    #[test]
    fn test_syntax_error_reports_offset() {
        let err = parse_module_instance_str("module.a.").unwrap_err();
        assert_eq!(
            err,
            AddressError::Syntax {
                kind: AddressKind::ModuleInstance,
                offset: 8
            }
        );
    }

    #[test]
    fn test_module_path_is_not_a_resource() {
        assert!(parse_abs_resource_str("module.a").is_err());
        assert!(parse_abs_resource_instance_str("module.a[0]").is_err());
    }

    #[test]
    fn test_unqualified_resource_has_root_module() {
        let addr = parse_abs_resource_str("aws_instance.web").unwrap();
        assert!(addr.module.is_root());
        assert_eq!(addr.resource.mode, ResourceMode::Managed);
        assert_eq!(addr.resource.type_name, "aws_instance");
        assert_eq!(addr.resource.name, "web");
    }

    #[test]
    fn test_qualified_resource() {
        let addr = parse_abs_resource_str("module.a[2].module.b.data.aws_ami.ubuntu").unwrap();
        assert_eq!(addr.module.to_string(), "module.a[2].module.b");
        assert_eq!(addr.resource, Resource::data("aws_ami", "ubuntu"));
    }

    #[test]
    fn test_resource_instance_without_key() {
        let addr = parse_abs_resource_instance_str("aws_instance.web").unwrap();
        assert!(addr.resource.key.is_no_key());
    }

    #[test]
    fn test_string_key_escapes() {
        let addr = parse_abs_resource_instance_str(r#"aws_instance.web["a\"b\\c"]"#).unwrap();
        assert_eq!(addr.resource.key, InstanceKey::Str("a\"b\\c".to_string()));
        assert_eq!(addr.to_string(), r#"aws_instance.web["a\"b\\c"]"#);
    }

    #[test]
    fn test_empty_string_key() {
        let addr = parse_abs_resource_instance_str(r#"aws_instance.web[""]"#).unwrap();
        assert_eq!(addr.resource.key, InstanceKey::Str(String::new()));
    }

    #[test]
    fn test_integer_key_is_normalized() {
        let addr: AbsResourceInstance = "aws_instance.web[007]".parse().unwrap();
        assert_eq!(addr.resource.key, InstanceKey::Int(7));
        assert_eq!(addr.to_string(), "aws_instance.web[7]");
    }
}
