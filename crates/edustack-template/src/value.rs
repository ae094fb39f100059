//! The intrinsic-function value tree.
//!
//! Template properties are either literal strings or deferred references
//! resolved by the provisioning engine at apply time. [`Value`] models both;
//! serialization produces the engine's `{"Fn::*": ...}` object forms.

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

/// A template property value: a literal or an intrinsic function call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// A literal string.
    String(String),
    /// `{"Ref": "<logical id>"}` — reference to a resource or parameter.
    Ref(String),
    /// `{"Fn::GetAtt": ["<logical id>", "<attribute>"]}`.
    GetAtt(String, String),
    /// `{"Fn::ImportValue": "<export name>"}` — cross-stack import.
    ImportValue(String),
    /// `{"Fn::Sub": "<template string>"}`.
    Sub(String),
    /// `{"Fn::Join": ["<sep>", [...]]}`.
    Join(String, Vec<Value>),
    /// `{"Fn::Select": ["<index>", <value>]}`.
    Select(u32, Box<Value>),
    /// `{"Fn::GetAZs": ""}` — availability zones of the target region.
    GetAzs,
    /// `{"Fn::Base64": <value>}`.
    Base64(Box<Value>),
}

impl Value {
    /// Literal string value.
    #[must_use]
    pub fn literal(s: impl Into<String>) -> Self {
        Self::String(s.into())
    }

    /// Reference to a resource or parameter by logical id.
    #[must_use]
    pub fn reference(logical_id: impl Into<String>) -> Self {
        Self::Ref(logical_id.into())
    }

    /// Attribute of a resource by logical id.
    #[must_use]
    pub fn get_att(logical_id: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::GetAtt(logical_id.into(), attribute.into())
    }

    /// Cross-stack import by export name.
    #[must_use]
    pub fn import(export_name: impl Into<String>) -> Self {
        Self::ImportValue(export_name.into())
    }

    /// The `n`-th availability zone of the target region.
    #[must_use]
    pub fn availability_zone(index: u32) -> Self {
        Self::Select(index, Box::new(Self::GetAzs))
    }

    /// Collect every `Fn::ImportValue` name in this value tree.
    pub fn collect_imports(&self, out: &mut Vec<String>) {
        match self {
            Self::ImportValue(name) => out.push(name.clone()),
            Self::Join(_, parts) => {
                for part in parts {
                    part.collect_imports(out);
                }
            }
            Self::Select(_, inner) | Self::Base64(inner) => inner.collect_imports(out),
            Self::String(_) | Self::Ref(_) | Self::GetAtt(..) | Self::Sub(_) | Self::GetAzs => {}
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::String(s) => serializer.serialize_str(s),
            Self::Ref(id) => single_entry(serializer, "Ref", id),
            Self::GetAtt(id, attr) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Fn::GetAtt", &[id.as_str(), attr.as_str()])?;
                map.end()
            }
            Self::ImportValue(name) => single_entry(serializer, "Fn::ImportValue", name),
            Self::Sub(template) => single_entry(serializer, "Fn::Sub", template),
            Self::Join(separator, parts) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Fn::Join", &JoinArgs { separator, parts })?;
                map.end()
            }
            Self::Select(index, of) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Fn::Select", &SelectArgs { index: *index, of })?;
                map.end()
            }
            Self::GetAzs => single_entry(serializer, "Fn::GetAZs", ""),
            Self::Base64(inner) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Fn::Base64", inner)?;
                map.end()
            }
        }
    }
}

fn single_entry<S: Serializer>(serializer: S, key: &str, value: &str) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(1))?;
    map.serialize_entry(key, value)?;
    map.end()
}

struct JoinArgs<'a> {
    separator: &'a str,
    parts: &'a [Value],
}

impl Serialize for JoinArgs<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(2))?;
        seq.serialize_element(self.separator)?;
        seq.serialize_element(self.parts)?;
        seq.end()
    }
}

struct SelectArgs<'a> {
    index: u32,
    of: &'a Value,
}

impl Serialize for SelectArgs<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // The engine expects the index as a string.
        let mut seq = serializer.serialize_seq(Some(2))?;
        seq.serialize_element(&self.index.to_string())?;
        seq.serialize_element(self.of)?;
        seq.end()
    }
}
