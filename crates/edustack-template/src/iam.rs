//! IAM resource properties and policy documents.

use std::collections::BTreeMap;

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

use crate::template::ResourceProperties;
use crate::value::Value;

/// Policy language version accepted by the engine.
const POLICY_VERSION: &str = "2012-10-17";

/// The principal a statement applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    /// A service principal (`ec2.amazonaws.com`, ...).
    Service(String),
    /// A federated identity provider, referenced by ARN.
    Federated(Value),
    /// Any principal (`"*"`). Used by the public-read bucket policies.
    Any,
}

impl Serialize for Principal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Service(service) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Service", service)?;
                map.end()
            }
            Self::Federated(provider) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Federated", provider)?;
                map.end()
            }
            Self::Any => serializer.serialize_str("*"),
        }
    }
}

/// Condition block: operator → (context key → expected value).
pub type Condition = BTreeMap<String, BTreeMap<String, Value>>;

/// One policy statement: effect, principal, actions, resources, conditions.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Statement {
    /// `Allow` (grants in this model are additive only; nothing emits Deny).
    pub effect: String,
    /// The principal the statement applies to (trust policies only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal: Option<Principal>,
    /// Granted actions.
    pub action: Vec<String>,
    /// Resources the actions apply to (trust policies omit this).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub resource: Vec<Value>,
    /// Conditions gating the statement.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
}

impl Statement {
    /// An allow statement granting `actions` on `resources`.
    #[must_use]
    pub fn allow(actions: &[&str], resources: Vec<Value>) -> Self {
        Self {
            effect: "Allow".to_owned(),
            principal: None,
            action: actions.iter().map(|a| (*a).to_owned()).collect(),
            resource: resources,
            condition: None,
        }
    }

    /// Attach a single-operator condition block.
    #[must_use]
    pub fn with_condition(
        mut self,
        operator: &str,
        entries: impl IntoIterator<Item = (String, Value)>,
    ) -> Self {
        let mut keys = BTreeMap::new();
        keys.extend(entries);
        let mut condition = Condition::new();
        condition.insert(operator.to_owned(), keys);
        self.condition = Some(condition);
        self
    }
}

/// A policy document: version + statements.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    /// Policy language version.
    pub version: String,
    /// Statements.
    pub statement: Vec<Statement>,
}

impl PolicyDocument {
    /// A document from a list of statements.
    #[must_use]
    pub fn new(statement: Vec<Statement>) -> Self {
        Self {
            version: POLICY_VERSION.to_owned(),
            statement,
        }
    }

    /// Trust policy allowing a service principal to assume the role.
    #[must_use]
    pub fn service_assume_role(service: impl Into<String>) -> Self {
        Self::new(vec![Statement {
            effect: "Allow".to_owned(),
            principal: Some(Principal::Service(service.into())),
            action: vec!["sts:AssumeRole".to_owned()],
            resource: Vec::new(),
            condition: None,
        }])
    }

    /// Trust policy allowing a federated web identity to assume the role
    /// when every `StringEquals` condition entry matches.
    #[must_use]
    pub fn web_identity_assume_role(
        provider: Value,
        string_equals: impl IntoIterator<Item = (String, Value)>,
    ) -> Self {
        let statement = Statement {
            effect: "Allow".to_owned(),
            principal: Some(Principal::Federated(provider)),
            action: vec!["sts:AssumeRoleWithWebIdentity".to_owned()],
            resource: Vec::new(),
            condition: None,
        }
        .with_condition("StringEquals", string_equals);
        Self::new(vec![statement])
    }
}

/// An inline policy attached to a role.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct InlinePolicy {
    /// Policy name, unique within the role.
    pub policy_name: String,
    /// The policy document.
    pub policy_document: PolicyDocument,
}

/// `AWS::IAM::Role` properties.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Role {
    /// Physical role name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_name: Option<String>,
    /// Who may assume the role.
    pub assume_role_policy_document: PolicyDocument,
    /// Attached managed policies, by ARN.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub managed_policy_arns: Vec<String>,
    /// Inline policies.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub policies: Vec<InlinePolicy>,
}

impl ResourceProperties for Role {
    const TYPE: &'static str = "AWS::IAM::Role";
}

/// `AWS::IAM::Policy` properties: a standalone policy attached to
/// existing roles, including roles imported from other stacks.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Policy {
    /// Policy name.
    pub policy_name: String,
    /// The policy document.
    pub policy_document: PolicyDocument,
    /// Role names the policy attaches to.
    pub roles: Vec<Value>,
}

impl ResourceProperties for Policy {
    const TYPE: &'static str = "AWS::IAM::Policy";
}

/// `AWS::IAM::InstanceProfile` properties.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct InstanceProfile {
    /// Role names the profile carries.
    pub roles: Vec<Value>,
}

impl ResourceProperties for InstanceProfile {
    const TYPE: &'static str = "AWS::IAM::InstanceProfile";
}

/// `AWS::IAM::OIDCProvider` properties.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct OidcProvider {
    /// Token issuer URL.
    pub url: String,
    /// Accepted audiences.
    pub client_id_list: Vec<String>,
    /// Issuer certificate thumbprints.
    pub thumbprint_list: Vec<String>,
}

impl ResourceProperties for OidcProvider {
    const TYPE: &'static str = "AWS::IAM::OIDCProvider";
}
