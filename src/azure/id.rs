//! ARM Resource Identifiers
//!
//! Parses ARM resource id strings into an immutable tree of
//! `{name, type, parent}` nodes rooted at a subscription (or at the
//! tenant for `/providers/...` ids).

use std::fmt;
use thiserror::Error;

pub const SUBSCRIPTION_TYPE: &str = "Microsoft.Resources/subscriptions";
pub const RESOURCE_GROUP_TYPE: &str = "Microsoft.Resources/resourceGroups";

/// Errors raised while parsing a resource id string
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    #[error("resource id is empty")]
    Empty,

    #[error("resource id must start with /subscriptions or /providers")]
    UnsupportedScope,

    #[error("resource id is missing the {0} segment")]
    MissingSegment(&'static str),

    #[error("unexpected segment '{0}' outside of a provider namespace")]
    UnexpectedSegment(String),
}

/// Parsed ARM resource id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceId {
    id: String,
    name: String,
    resource_type: String,
    parent: Option<Box<ResourceId>>,
}

impl ResourceId {
    /// Build a node by hand. The parser is the usual entry point.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        resource_type: impl Into<String>,
        parent: Option<ResourceId>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            resource_type: resource_type.into(),
            parent: parent.map(Box::new),
        }
    }

    /// Parse an id such as
    /// `/subscriptions/s/resourceGroups/rg/providers/Microsoft.Sql/servers/srv/databases/db`
    pub fn parse(input: &str) -> Result<Self, IdError> {
        let trimmed = input.trim().trim_matches('/');
        if trimmed.is_empty() {
            return Err(IdError::Empty);
        }
        let segments: Vec<&str> = trimmed.split('/').collect();

        let mut pos;
        let mut current: Option<ResourceId>;

        if segments[0].eq_ignore_ascii_case("subscriptions") {
            let sub = segment(&segments, 1, "subscription id")?;
            current = Some(ResourceId::new(
                join(&segments[..2]),
                sub,
                SUBSCRIPTION_TYPE,
                None,
            ));
            pos = 2;

            if segments
                .get(2)
                .is_some_and(|s| s.eq_ignore_ascii_case("resourceGroups"))
            {
                let rg = segment(&segments, 3, "resource group name")?;
                current = Some(ResourceId::new(
                    join(&segments[..4]),
                    rg,
                    RESOURCE_GROUP_TYPE,
                    current,
                ));
                pos = 4;
            }
        } else if segments[0].eq_ignore_ascii_case("providers") {
            current = None;
            pos = 0;
        } else {
            return Err(IdError::UnsupportedScope);
        }

        while pos < segments.len() {
            if segments[pos].eq_ignore_ascii_case("providers") {
                let namespace = segment(&segments, pos + 1, "provider namespace")?;
                let kind = segment(&segments, pos + 2, "resource type")?;
                let name = segment(&segments, pos + 3, "resource name")?;
                pos += 4;
                current = Some(ResourceId::new(
                    join(&segments[..pos]),
                    name,
                    format!("{}/{}", namespace, kind),
                    current,
                ));
                continue;
            }

            let parent = match current {
                Some(parent) if !parent.is_scope_root() => parent,
                _ => return Err(IdError::UnexpectedSegment(segments[pos].to_string())),
            };
            let kind = segments[pos];
            let name = segment(&segments, pos + 1, "child resource name")?;
            pos += 2;
            current = Some(ResourceId::new(
                join(&segments[..pos]),
                name,
                format!("{}/{}", parent.resource_type, kind),
                Some(parent),
            ));
        }

        current.ok_or(IdError::MissingSegment("resource type"))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    pub fn parent(&self) -> Option<&ResourceId> {
        self.parent.as_deref()
    }

    /// Resource groups and subscriptions bound every ancestor walk
    pub fn is_scope_root(&self) -> bool {
        self.resource_type.eq_ignore_ascii_case(RESOURCE_GROUP_TYPE)
            || self.resource_type.eq_ignore_ascii_case(SUBSCRIPTION_TYPE)
    }

    pub fn as_str(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

fn segment<'a>(segments: &[&'a str], idx: usize, what: &'static str) -> Result<&'a str, IdError> {
    match segments.get(idx) {
        Some(&s) if !s.is_empty() => Ok(s),
        _ => Err(IdError::MissingSegment(what)),
    }
}

fn join(segments: &[&str]) -> String {
    format!("/{}", segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RG: &str = "/subscriptions/0000/resourceGroups/rg-demo";

    #[test]
    fn test_parse_top_level_resource() {
        let id = ResourceId::parse(&format!(
            "{}/providers/Microsoft.Network/publicIPPrefixes/pip-prefix",
            RG
        ))
        .unwrap();

        assert_eq!(id.name(), "pip-prefix");
        assert_eq!(id.resource_type(), "Microsoft.Network/publicIPPrefixes");

        let rg = id.parent().unwrap();
        assert_eq!(rg.resource_type(), RESOURCE_GROUP_TYPE);
        assert_eq!(rg.name(), "rg-demo");
        assert_eq!(rg.as_str(), RG);
        assert!(rg.is_scope_root());

        let sub = rg.parent().unwrap();
        assert_eq!(sub.resource_type(), SUBSCRIPTION_TYPE);
        assert!(sub.parent().is_none());
    }

    #[test]
    fn test_parse_child_resource() {
        let raw = format!("{}/providers/Microsoft.Sql/servers/sql-1/databases/db-1", RG);
        let id = ResourceId::parse(&raw).unwrap();

        assert_eq!(id.name(), "db-1");
        assert_eq!(id.resource_type(), "Microsoft.Sql/servers/databases");
        assert_eq!(id.to_string(), raw);

        let server = id.parent().unwrap();
        assert_eq!(server.resource_type(), "Microsoft.Sql/servers");
        assert_eq!(
            server.as_str(),
            format!("{}/providers/Microsoft.Sql/servers/sql-1", RG)
        );
    }

    #[test]
    fn test_parse_extension_resource() {
        let raw = format!(
            "{}/providers/Microsoft.Sql/servers/sql-1/providers/Microsoft.Insights/diagnosticSettings/diag",
            RG
        );
        let id = ResourceId::parse(&raw).unwrap();

        assert_eq!(id.resource_type(), "Microsoft.Insights/diagnosticSettings");
        assert_eq!(id.parent().unwrap().resource_type(), "Microsoft.Sql/servers");
    }

    #[test]
    fn test_parse_resource_group_and_subscription() {
        let rg = ResourceId::parse(RG).unwrap();
        assert_eq!(rg.resource_type(), RESOURCE_GROUP_TYPE);

        let sub = ResourceId::parse("/subscriptions/0000").unwrap();
        assert_eq!(sub.resource_type(), SUBSCRIPTION_TYPE);
    }

    #[test]
    fn test_parse_tenant_scope_has_no_root() {
        let id = ResourceId::parse("/providers/Microsoft.Management/managementGroups/mg-1").unwrap();
        assert_eq!(id.resource_type(), "Microsoft.Management/managementGroups");
        assert!(id.parent().is_none());
        assert!(!id.is_scope_root());
    }

    #[test]
    fn test_parse_rejects_malformed_ids() {
        assert_eq!(ResourceId::parse(""), Err(IdError::Empty));
        assert_eq!(ResourceId::parse("/tenants/x"), Err(IdError::UnsupportedScope));
        assert!(matches!(
            ResourceId::parse("/subscriptions/"),
            Err(IdError::MissingSegment("subscription id"))
        ));
        assert!(matches!(
            ResourceId::parse(&format!("{}/providers/Microsoft.Network", RG)),
            Err(IdError::MissingSegment(_))
        ));
        assert!(matches!(
            ResourceId::parse(&format!("{}/deployments/d1", RG)),
            Err(IdError::UnexpectedSegment(_))
        ));
    }
}
