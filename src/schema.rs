//! Resource and provider schemas, plus the diagnostics reported against them.
//!
//! A schema lists the attributes of the provider block or of one resource
//! type. The same description drives validation, planning and the
//! `GetSchema` answer sent to the host.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Value type of an attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    String,
    Bool,
    /// Ordered list with a single element type.
    List(Box<AttributeType>),
}

impl AttributeType {
    pub fn list(element_type: AttributeType) -> Self {
        Self::List(Box::new(element_type))
    }
}

/// Who sets an attribute: the configuration, the provider, or either.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Required,
    Optional,
    /// Read-only, filled in from API responses.
    Computed,
    /// May be configured; the provider fills it in otherwise.
    OptionalComputed,
}

/// Protocol flags of an attribute. Derived from [`Presence`], plus `sensitive`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AttributeFlags {
    pub required: bool,
    pub optional: bool,
    pub computed: bool,
    /// Hidden from plan output and logs.
    pub sensitive: bool,
}

impl From<Presence> for AttributeFlags {
    fn from(presence: Presence) -> Self {
        let (required, optional, computed) = match presence {
            Presence::Required => (true, false, false),
            Presence::Optional => (false, true, false),
            Presence::Computed => (false, false, true),
            Presence::OptionalComputed => (false, true, true),
        };
        Self {
            required,
            optional,
            computed,
            sensitive: false,
        }
    }
}

impl AttributeFlags {
    /// Whether only the provider can set the attribute.
    pub fn is_computed_only(&self) -> bool {
        self.computed && !self.optional && !self.required
    }
}

/// A check applied to a present string value after its type has been validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValueValidator {
    /// The value must be one of a fixed set.
    OneOf { values: Vec<String> },
    /// The value must be a UUID.
    Uuid,
    /// The value must be JSON text. Plans compare such values by their parsed form.
    JsonText,
}

impl ValueValidator {
    pub fn one_of(values: &[&str]) -> Self {
        Self::OneOf {
            values: values.iter().map(|v| v.to_string()).collect(),
        }
    }
}

/// One attribute of a schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    #[serde(rename = "type")]
    pub attr_type: AttributeType,
    #[serde(flatten)]
    pub flags: AttributeFlags,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Planned in when the configuration leaves the attribute unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validators: Vec<ValueValidator>,
}

impl Attribute {
    pub fn new(attr_type: AttributeType, presence: Presence) -> Self {
        Self {
            attr_type,
            flags: presence.into(),
            description: None,
            default: None,
            validators: Vec::new(),
        }
    }

    pub fn required_string() -> Self {
        Self::new(AttributeType::String, Presence::Required)
    }

    pub fn optional_string() -> Self {
        Self::new(AttributeType::String, Presence::Optional)
    }

    pub fn computed_string() -> Self {
        Self::new(AttributeType::String, Presence::Computed)
    }

    /// A string that can be configured, such as an ID used to adopt an existing object.
    pub fn optional_computed_string() -> Self {
        Self::new(AttributeType::String, Presence::OptionalComputed)
    }

    pub fn required_bool() -> Self {
        Self::new(AttributeType::Bool, Presence::Required)
    }

    pub fn optional_bool() -> Self {
        Self::new(AttributeType::Bool, Presence::Optional)
    }

    pub fn optional_string_list() -> Self {
        Self::new(AttributeType::list(AttributeType::String), Presence::Optional)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_default(mut self, default: serde_json::Value) -> Self {
        self.default = Some(default);
        self
    }

    pub fn with_validator(mut self, validator: ValueValidator) -> Self {
        self.validators.push(validator);
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.flags.sensitive = true;
        self
    }

    /// Whether values of this attribute are JSON text.
    pub fn is_json_text(&self) -> bool {
        self.validators.contains(&ValueValidator::JsonText)
    }
}

/// Attributes by name, in name order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Block {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, Attribute>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Schema for a resource type or for the provider block.
///
/// `version` is bumped whenever stored state needs migrating; see
/// [`crate::ProviderService::upgrade_resource_state`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Schema {
    #[serde(default)]
    pub version: u64,
    #[serde(flatten)]
    pub block: Block,
}

impl Schema {
    pub fn new(version: u64) -> Self {
        Self {
            version,
            block: Block::default(),
        }
    }

    pub fn v0() -> Self {
        Self::new(0)
    }

    pub fn with_attribute(mut self, name: impl Into<String>, attr: Attribute) -> Self {
        self.block.attributes.insert(name.into(), attr);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.block.description = Some(description.into());
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.block.attributes.get(name)
    }
}

/// Everything reported by `GetSchema`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ProviderSchema {
    #[serde(default)]
    pub provider: Schema,
    /// Resource schemas by type name.
    #[serde(default)]
    pub resources: BTreeMap<String, Schema>,
}

impl ProviderSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_provider_config(mut self, schema: Schema) -> Self {
        self.provider = schema;
        self
    }

    pub fn with_resource(mut self, name: impl Into<String>, schema: Schema) -> Self {
        self.resources.insert(name.into(), schema);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    /// The operation failed.
    Error,
    /// The operation went through but something needs attention.
    Warning,
}

/// A message for the host to show the user, optionally tied to an attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: DiagnosticSeverity,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Attribute path, e.g. `tags.1`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
}

impl Diagnostic {
    fn new(severity: DiagnosticSeverity, summary: impl Into<String>) -> Self {
        Self {
            severity,
            summary: summary.into(),
            detail: None,
            attribute: None,
        }
    }

    pub fn error(summary: impl Into<String>) -> Self {
        Self::new(DiagnosticSeverity::Error, summary)
    }

    pub fn warning(summary: impl Into<String>) -> Self {
        Self::new(DiagnosticSeverity::Warning, summary)
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == DiagnosticSeverity::Error
    }
}
