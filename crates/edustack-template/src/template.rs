//! Template assembly: resources, parameters, outputs, exports.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::value::Value;

/// Errors raised while assembling or serializing a template.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// Two resources, parameters, or outputs share a logical id.
    #[error("duplicate logical id in template: {id}")]
    DuplicateLogicalId {
        /// The conflicting logical id.
        id: String,
    },

    /// Property serialization failed.
    #[error("failed to serialize template section: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Marker trait tying a typed property struct to its resource type string.
pub trait ResourceProperties: Serialize + Sized {
    /// The provisioning engine's resource type identifier.
    const TYPE: &'static str;

    /// Convert the properties into a [`Resource`].
    ///
    /// # Errors
    /// Returns an error if the properties fail to serialize.
    fn into_resource(self) -> Result<Resource, TemplateError> {
        Resource::new(Self::TYPE, self)
    }
}

/// A key/value tag attached to a taggable resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Tag {
    /// Tag key.
    pub key: String,
    /// Tag value.
    pub value: String,
}

impl Tag {
    /// The conventional `Name` tag.
    #[must_use]
    pub fn name(value: impl Into<String>) -> Self {
        Self {
            key: "Name".to_owned(),
            value: value.into(),
        }
    }
}

/// Retention behavior applied when a resource leaves the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeletionPolicy {
    /// Tear the resource down.
    Delete,
    /// Keep the resource after the stack is destroyed.
    Retain,
}

/// One declared resource: type, serialized properties, dependencies.
#[derive(Debug, Clone, Serialize)]
pub struct Resource {
    /// Resource type identifier.
    #[serde(rename = "Type")]
    pub resource_type: String,

    /// Serialized resource properties.
    #[serde(rename = "Properties")]
    pub properties: serde_json::Value,

    /// Logical ids this resource must be created after.
    #[serde(rename = "DependsOn", skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,

    /// Retention behavior on destroy.
    #[serde(rename = "DeletionPolicy", skip_serializing_if = "Option::is_none")]
    pub deletion_policy: Option<DeletionPolicy>,
}

impl Resource {
    /// Create a resource from a type string and serializable properties.
    ///
    /// # Errors
    /// Returns an error if the properties fail to serialize.
    pub fn new(resource_type: &str, properties: impl Serialize) -> Result<Self, TemplateError> {
        Ok(Self {
            resource_type: resource_type.to_owned(),
            properties: serde_json::to_value(properties)?,
            depends_on: Vec::new(),
            deletion_policy: None,
        })
    }

    /// Add an explicit creation-order dependency.
    #[must_use]
    pub fn depends_on(mut self, logical_id: impl Into<String>) -> Self {
        self.depends_on.push(logical_id.into());
        self
    }

    /// Set the retention behavior.
    #[must_use]
    pub fn with_deletion_policy(mut self, policy: DeletionPolicy) -> Self {
        self.deletion_policy = Some(policy);
        self
    }
}

/// A template input parameter.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Parameter {
    /// Parameter type (plain or SSM-resolved).
    #[serde(rename = "Type")]
    pub parameter_type: String,

    /// Default value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,

    /// Human-readable description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Parameter {
    /// An SSM-resolved AMI id parameter with the given parameter-store path
    /// as its default.
    #[must_use]
    pub fn ssm_ami(default_path: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            parameter_type: "AWS::SSM::Parameter::Value<AWS::EC2::Image::Id>".to_owned(),
            default: Some(default_path.into()),
            description: Some(description.into()),
        }
    }
}

/// Named export attached to an output.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Export {
    /// The cross-stack wire name.
    pub name: String,
}

/// A stack output, optionally exported for cross-stack consumption.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Output {
    /// The output value.
    pub value: Value,

    /// Human-readable description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Export declaration, when the value crosses stack boundaries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export: Option<Export>,
}

impl Output {
    /// An output without an export.
    #[must_use]
    pub fn plain(value: Value) -> Self {
        Self {
            value,
            description: None,
            export: None,
        }
    }

    /// An output exported under the given wire name.
    #[must_use]
    pub fn exported(value: Value, export_name: impl Into<String>) -> Self {
        Self {
            value,
            description: None,
            export: Some(Export {
                name: export_name.into(),
            }),
        }
    }

    /// Attach a description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A complete declarative resource-graph template.
///
/// Sections are keyed by logical id in `BTreeMap`s so serialization is
/// deterministic.
#[derive(Debug, Clone, Serialize)]
pub struct Template {
    /// Wire format version accepted by the provisioning engine.
    #[serde(rename = "AWSTemplateFormatVersion")]
    format_version: &'static str,

    /// Human-readable template description.
    #[serde(rename = "Description")]
    description: String,

    /// Input parameters.
    #[serde(rename = "Parameters", skip_serializing_if = "BTreeMap::is_empty")]
    parameters: BTreeMap<String, Parameter>,

    /// Declared resources.
    #[serde(rename = "Resources")]
    resources: BTreeMap<String, Resource>,

    /// Outputs and exports.
    #[serde(rename = "Outputs", skip_serializing_if = "BTreeMap::is_empty")]
    outputs: BTreeMap<String, Output>,
}

impl Template {
    /// Create an empty template.
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            format_version: "2010-09-09",
            description: description.into(),
            parameters: BTreeMap::new(),
            resources: BTreeMap::new(),
            outputs: BTreeMap::new(),
        }
    }

    /// Add a resource under a logical id.
    ///
    /// # Errors
    /// Returns [`TemplateError::DuplicateLogicalId`] if the id is taken.
    pub fn add_resource(
        &mut self,
        logical_id: impl Into<String>,
        resource: Resource,
    ) -> Result<(), TemplateError> {
        let id = logical_id.into();
        if self.resources.contains_key(&id) {
            return Err(TemplateError::DuplicateLogicalId { id });
        }
        self.resources.insert(id, resource);
        Ok(())
    }

    /// Add an input parameter under a logical id.
    ///
    /// # Errors
    /// Returns [`TemplateError::DuplicateLogicalId`] if the id is taken.
    pub fn add_parameter(
        &mut self,
        logical_id: impl Into<String>,
        parameter: Parameter,
    ) -> Result<(), TemplateError> {
        let id = logical_id.into();
        if self.parameters.contains_key(&id) {
            return Err(TemplateError::DuplicateLogicalId { id });
        }
        self.parameters.insert(id, parameter);
        Ok(())
    }

    /// Add an output under a logical id.
    ///
    /// # Errors
    /// Returns [`TemplateError::DuplicateLogicalId`] if the id is taken.
    pub fn add_output(
        &mut self,
        logical_id: impl Into<String>,
        output: Output,
    ) -> Result<(), TemplateError> {
        let id = logical_id.into();
        if self.outputs.contains_key(&id) {
            return Err(TemplateError::DuplicateLogicalId { id });
        }
        self.outputs.insert(id, output);
        Ok(())
    }

    /// The resource section, keyed by logical id.
    #[must_use]
    pub fn resources(&self) -> &BTreeMap<String, Resource> {
        &self.resources
    }

    /// The output section, keyed by logical id.
    #[must_use]
    pub fn outputs(&self) -> &BTreeMap<String, Output> {
        &self.outputs
    }

    /// Export names this template consumes via `Fn::ImportValue`, sorted
    /// and deduplicated.
    #[must_use]
    pub fn imported_exports(&self) -> Vec<String> {
        let mut found = BTreeSet::new();
        for resource in self.resources.values() {
            collect_json_imports(&resource.properties, &mut found);
        }
        let mut buffer = Vec::new();
        for output in self.outputs.values() {
            output.value.collect_imports(&mut buffer);
        }
        found.extend(buffer);
        found.into_iter().collect()
    }

    /// Export names this template publishes through its outputs.
    #[must_use]
    pub fn exported_names(&self) -> Vec<String> {
        self.outputs
            .values()
            .filter_map(|o| o.export.as_ref().map(|e| e.name.clone()))
            .collect()
    }

    /// Serialize the template to pretty-printed JSON.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, TemplateError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Walk serialized properties looking for `{"Fn::ImportValue": "<name>"}`.
fn collect_json_imports(value: &serde_json::Value, out: &mut BTreeSet<String>) {
    match value {
        serde_json::Value::Object(map) => {
            if map.len() == 1 {
                if let Some(serde_json::Value::String(name)) = map.get("Fn::ImportValue") {
                    out.insert(name.clone());
                    return;
                }
            }
            for nested in map.values() {
                collect_json_imports(nested, out);
            }
        }
        serde_json::Value::Array(items) => {
            for item in items {
                collect_json_imports(item, out);
            }
        }
        _ => {}
    }
}
