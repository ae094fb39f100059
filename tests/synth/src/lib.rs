//! End-to-end synthesis tests for the edustack platform.
//!
//! Synthesis is pure, so unlike live-service integration tests these run
//! hermetically: assemble the full app, synthesize for a known
//! environment, and assert on the produced templates and the cross-stack
//! contract.

use edustack_core::{EnvConfig, EnvRegistry};
use edustack_stacks::{
    App, DeliveryStack, DeliveryStackProps, FrontendSite, MediaStack, MediaStackProps,
    NetworkStack, StackArtifact, SynthError,
};

mod test_contract;
mod test_templates;

/// The full platform app with its declared ordering constraints.
///
/// # Panics
/// Panics if the composition itself is invalid; tests treat that as a
/// failed assertion.
#[must_use]
pub fn platform_app() -> App {
    let mut app = App::new();
    app.add_stack(NetworkStack).expect("register network stack");
    app.add_stack(DeliveryStack::new(
        DeliveryStackProps::builder()
            .service_repo("edukit/platform")
            .deploy_repo("edukit/platform-deploy")
            .frontend(FrontendSite::builder().repository("edukit/platform-web").build())
            .build(),
    ))
    .expect("register delivery stack");
    app.add_stack(MediaStack::new(MediaStackProps::builder().build()))
        .expect("register media stack");

    app.depends_on(DeliveryStack::ID, NetworkStack::ID)
        .expect("declare delivery ordering");
    app.depends_on(MediaStack::ID, DeliveryStack::ID)
        .expect("declare media ordering");
    app.depends_on(MediaStack::ID, NetworkStack::ID)
        .expect("declare media ordering");
    app
}

/// The resolved configuration for an environment key.
///
/// # Panics
/// Panics when the key is unknown; tests for the failure path call the
/// registry directly.
#[must_use]
pub fn config_for(env: &str) -> EnvConfig {
    EnvRegistry::builtin()
        .resolve(env)
        .expect("environment is configured")
        .clone()
}

/// Synthesize the full app for an environment.
///
/// # Errors
/// Returns the synthesis error unchanged, for failure-path assertions.
pub fn synth_platform(env: &str) -> Result<Vec<StackArtifact>, SynthError> {
    platform_app().synth_all(&config_for(env))
}

/// The template of one stack from a synthesized artifact list, as JSON.
///
/// # Panics
/// Panics if the stack id is absent or the template fails to serialize.
#[must_use]
pub fn template_json(artifacts: &[StackArtifact], stack_id: &str) -> serde_json::Value {
    let artifact = artifacts
        .iter()
        .find(|a| a.stack_id == stack_id)
        .unwrap_or_else(|| panic!("stack {stack_id} not found"));
    let raw = artifact
        .template
        .to_json_pretty()
        .expect("template serializes");
    serde_json::from_str(&raw).expect("template is valid JSON")
}
