//! Synthesis error types.

/// Errors raised while composing or synthesizing the stack graph.
#[derive(Debug, thiserror::Error)]
pub enum SynthError {
    /// A stack id was registered twice.
    #[error("duplicate stack id: {id}")]
    DuplicateStackId {
        /// The conflicting stack id.
        id: String,
    },

    /// An operation referenced a stack id that was never registered.
    #[error("unknown stack id: {id}")]
    UnknownStack {
        /// The unregistered stack id.
        id: String,
    },

    /// An ordering constraint names a stack that was never registered.
    #[error("stack {stack} declares a dependency on unknown stack {dependency}")]
    UnknownDependency {
        /// The stack declaring the constraint.
        stack: String,
        /// The missing dependency target.
        dependency: String,
    },

    /// The declared ordering constraints contain a cycle.
    #[error("ordering constraints form a cycle involving stack {stack}")]
    DependencyCycle {
        /// A stack on the cycle.
        stack: String,
    },

    /// Two stacks publish the same export name.
    #[error("export {name} is published by both {first} and {second}")]
    DuplicateExport {
        /// The conflicting export name.
        name: String,
        /// The stack that published it first.
        first: String,
        /// The stack that published it again.
        second: String,
    },

    /// A stack imports an export no declared dependency publishes.
    ///
    /// Ordering is enforced by explicit constraints, never inferred from
    /// data flow, so an import satisfied only by an undeclared stack is
    /// still an error.
    #[error(
        "stack {stack} imports {import}, which no declared dependency publishes \
         (declare an ordering constraint on the exporting stack)"
    )]
    UnresolvedImport {
        /// The importing stack.
        stack: String,
        /// The export name being imported.
        import: String,
    },

    /// A template consumes an export name outside the typed contract.
    #[error("stack {stack}: {source}")]
    ContractViolation {
        /// The offending stack.
        stack: String,
        /// The underlying contract error.
        source: edustack_core::ConfigError,
    },

    /// Configuration or naming failure during synthesis.
    #[error(transparent)]
    Config(#[from] edustack_core::ConfigError),

    /// Template assembly failure.
    #[error(transparent)]
    Template(#[from] edustack_template::TemplateError),
}
