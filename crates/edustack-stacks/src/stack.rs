//! The stack abstraction and the typed export/import helpers.

use edustack_core::{EnvConfig, ExportKey};
use edustack_template::{Output, Template, Value};

use crate::error::SynthError;

/// A named, independently deployable unit of declared infrastructure.
///
/// Synthesis is pure: a definition turns a resolved environment
/// configuration into a template, with no I/O, clock, or randomness.
pub trait StackDefinition: std::fmt::Debug {
    /// Stable stack identifier, used for ordering constraints and file names.
    fn id(&self) -> &str;

    /// Synthesize the stack's template for an environment.
    fn synth(&self, config: &EnvConfig) -> Result<Template, SynthError>;
}

/// Consume a cross-stack export. The typed key is the whole point: producer
/// and consumer cannot disagree on the wire name.
#[must_use]
pub fn import(key: ExportKey) -> Value {
    Value::import(key.wire_name())
}

/// Publish a value under a cross-stack export key.
#[must_use]
pub fn export_output(value: Value, key: ExportKey) -> Output {
    Output::exported(value, key.wire_name())
}

/// The result of synthesizing one stack.
#[derive(Debug)]
pub struct StackArtifact {
    /// The stack's identifier.
    pub stack_id: String,
    /// The synthesized template.
    pub template: Template,
    /// Export names the template publishes.
    pub exports: Vec<String>,
    /// Export names the template consumes.
    pub imports: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_tie_import_and_export_to_the_same_wire_name() {
        let output = export_output(Value::literal("10.1.2.3"), ExportKey::Ec2PublicIp);
        let consumed = import(ExportKey::Ec2PublicIp);

        let mut imports = Vec::new();
        consumed.collect_imports(&mut imports);
        assert_eq!(imports, vec![output.export.unwrap().name]);
    }
}
