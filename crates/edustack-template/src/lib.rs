//! Typed CloudFormation template model for edustack.
//!
//! The provisioning engine accepts a declarative resource graph as a JSON
//! template. This crate models that wire format with typed structs so the
//! stack definitions never assemble raw JSON by hand: a [`Template`] holds
//! [`Resource`]s, [`Output`]s, and [`Parameter`]s, and dynamic values flow
//! through the [`Value`] intrinsic tree (`Ref`, `Fn::GetAtt`,
//! `Fn::ImportValue`, ...).
//!
//! The model is write-only: templates are serialized for the engine, never
//! parsed back. Cross-stack analysis (which exports a template consumes and
//! publishes) is provided by [`Template::imported_exports`] and
//! [`Template::exported_names`].

pub mod ec2;
pub mod iam;
pub mod lambda;
pub mod rds;
pub mod s3;

mod template;
mod value;

pub use template::{
    DeletionPolicy, Export, Output, Parameter, Resource, ResourceProperties, Tag, Template,
    TemplateError,
};
pub use value::Value;
