//! Stack definitions and cross-stack composition for the edustack platform.
//!
//! Three stacks describe the platform's infrastructure:
//!
//! - [`NetworkStack`] — network, platform host, and database;
//! - [`DeliveryStack`] — CI federated-identity trust and deploy roles;
//! - [`MediaStack`] — media buckets, transcoding identities, and the two
//!   event-driven functions.
//!
//! Stacks deploy independently and exchange values through named exports.
//! The [`App`] composition root holds the stacks together with their
//! explicit ordering constraints and validates at synthesis time that every
//! import is published by a declared dependency — a misdeclared ordering is
//! an error before anything reaches the provisioning engine.

pub mod actions;
pub mod constants;

mod app;
mod delivery;
mod error;
mod media;
mod network;
mod stack;

pub use app::App;
pub use delivery::{DeliveryStack, DeliveryStackProps, FrontendSite};
pub use error::SynthError;
pub use media::{MediaStack, MediaStackProps};
pub use network::NetworkStack;
pub use stack::{StackArtifact, StackDefinition, export_output, import};
