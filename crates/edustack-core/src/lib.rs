//! Core types, environment configuration, and the cross-stack contract for
//! edustack.
//!
//! This crate provides the foundational building blocks shared by the stack
//! definitions and the CLI: validated domain newtypes, the environment
//! configuration registry, deterministic resource naming, and the typed
//! registry of cross-stack export names.

mod config;
mod error;
mod exports;
mod naming;
mod types;

pub use config::{ArtifactStoreGrant, EnvConfig, EnvRegistry};
pub use error::{ConfigError, CoreResult};
pub use exports::ExportKey;
pub use naming::{ResourceName, bucket_name, resource_name};
pub use types::{AccountId, Arn, AwsRegion, CidrBlock, Environment};
