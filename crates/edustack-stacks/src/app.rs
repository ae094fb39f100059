//! The composition root: stacks plus their explicit ordering constraints.
//!
//! Stacks exchange values through named exports that only exist once the
//! exporting stack has deployed, so deploy order matters and is declared
//! explicitly with [`App::depends_on`] — never inferred from data flow.
//! [`App::synth_all`] validates the declarations: a stack may only import
//! what a (transitive) declared dependency exports.

use std::collections::{BTreeMap, BTreeSet};

use edustack_core::{EnvConfig, ExportKey};
use tracing::{debug, info};

use crate::error::SynthError;
use crate::stack::{StackArtifact, StackDefinition};

#[derive(Debug)]
struct Entry {
    definition: Box<dyn StackDefinition>,
    depends_on: Vec<String>,
}

/// An ordered collection of stacks with explicit inter-stack ordering
/// constraints.
#[derive(Debug, Default)]
pub struct App {
    entries: Vec<Entry>,
}

impl App {
    /// Create an empty app.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a stack.
    ///
    /// # Errors
    /// Returns [`SynthError::DuplicateStackId`] if the id is taken.
    pub fn add_stack(
        &mut self,
        definition: impl StackDefinition + 'static,
    ) -> Result<(), SynthError> {
        let id = definition.id().to_owned();
        if self.position(&id).is_some() {
            return Err(SynthError::DuplicateStackId { id });
        }
        debug!(stack = %id, "registered stack");
        self.entries.push(Entry {
            definition: Box::new(definition),
            depends_on: Vec::new(),
        });
        Ok(())
    }

    /// Declare that `stack` deploys after `dependency`.
    ///
    /// # Errors
    /// Returns an error if either id is unknown.
    pub fn depends_on(&mut self, stack: &str, dependency: &str) -> Result<(), SynthError> {
        if self.position(dependency).is_none() {
            return Err(SynthError::UnknownDependency {
                stack: stack.to_owned(),
                dependency: dependency.to_owned(),
            });
        }
        let position = self
            .position(stack)
            .ok_or_else(|| SynthError::UnknownStack {
                id: stack.to_owned(),
            })?;
        let entry = &mut self.entries[position];
        let dependency = dependency.to_owned();
        if !entry.depends_on.contains(&dependency) {
            debug!(stack = %stack, dependency = %dependency, "declared ordering constraint");
            entry.depends_on.push(dependency);
        }
        Ok(())
    }

    /// Synthesize every stack in declared-dependency order and validate the
    /// cross-stack contract.
    ///
    /// # Errors
    /// Returns an error on ordering cycles, duplicate exports, imports that
    /// no declared dependency publishes, export names outside the typed
    /// contract, or per-stack synthesis failures.
    pub fn synth_all(&self, config: &EnvConfig) -> Result<Vec<StackArtifact>, SynthError> {
        let order = self.topological_order()?;

        // Transitive declared dependencies, computed in topological order.
        let mut reachable: BTreeMap<usize, BTreeSet<usize>> = BTreeMap::new();
        for &index in &order {
            let mut set = BTreeSet::new();
            for dep_id in &self.entries[index].depends_on {
                let dep = self
                    .position(dep_id)
                    .unwrap_or_else(|| unreachable!("dependency validated on declaration"));
                set.insert(dep);
                if let Some(transitive) = reachable.get(&dep) {
                    set.extend(transitive);
                }
            }
            reachable.insert(index, set);
        }

        let mut export_owner: BTreeMap<String, String> = BTreeMap::new();
        let mut exports_by_stack: BTreeMap<usize, Vec<String>> = BTreeMap::new();
        let mut artifacts = Vec::with_capacity(order.len());

        for &index in &order {
            let entry = &self.entries[index];
            let stack_id = entry.definition.id().to_owned();
            let template = entry.definition.synth(config)?;

            let exports = template.exported_names();
            for name in &exports {
                ExportKey::parse(name).map_err(|source| SynthError::ContractViolation {
                    stack: stack_id.clone(),
                    source,
                })?;
                if let Some(first) = export_owner.insert(name.clone(), stack_id.clone()) {
                    return Err(SynthError::DuplicateExport {
                        name: name.clone(),
                        first,
                        second: stack_id,
                    });
                }
            }

            let imports = template.imported_exports();
            let available: BTreeSet<&String> = reachable[&index]
                .iter()
                .filter_map(|dep| exports_by_stack.get(dep))
                .flatten()
                .collect();
            for import in &imports {
                ExportKey::parse(import).map_err(|source| SynthError::ContractViolation {
                    stack: stack_id.clone(),
                    source,
                })?;
                if !available.contains(import) {
                    return Err(SynthError::UnresolvedImport {
                        stack: stack_id,
                        import: import.clone(),
                    });
                }
            }

            info!(
                stack = %stack_id,
                exports = ?exports,
                imports = ?imports,
                "synthesized stack"
            );

            exports_by_stack.insert(index, exports.clone());
            artifacts.push(StackArtifact {
                stack_id,
                template,
                exports,
                imports,
            });
        }

        Ok(artifacts)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.definition.id() == id)
    }

    /// Deterministic topological order: among ready stacks, registration
    /// order wins.
    fn topological_order(&self) -> Result<Vec<usize>, SynthError> {
        let n = self.entries.len();
        let mut remaining: Vec<usize> = (0..n).collect();
        let mut emitted: BTreeSet<usize> = BTreeSet::new();
        let mut order = Vec::with_capacity(n);

        while !remaining.is_empty() {
            let ready = remaining.iter().copied().find(|&index| {
                self.entries[index].depends_on.iter().all(|dep| {
                    self.position(dep)
                        .is_some_and(|dep_index| emitted.contains(&dep_index))
                })
            });
            match ready {
                Some(index) => {
                    emitted.insert(index);
                    order.push(index);
                    remaining.retain(|&i| i != index);
                }
                None => {
                    let stuck = remaining[0];
                    return Err(SynthError::DependencyCycle {
                        stack: self.entries[stuck].definition.id().to_owned(),
                    });
                }
            }
        }

        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use edustack_template::{Output, Template, Value};

    use super::*;
    use crate::stack::{export_output, import};

    fn config() -> EnvConfig {
        edustack_core::EnvRegistry::builtin()
            .resolve("dev")
            .unwrap()
            .clone()
    }

    /// A minimal stack publishing and consuming configurable exports.
    #[derive(Debug)]
    struct FakeStack {
        id: &'static str,
        exports: Vec<ExportKey>,
        imports: Vec<ExportKey>,
    }

    impl StackDefinition for FakeStack {
        fn id(&self) -> &str {
            self.id
        }

        fn synth(&self, _config: &EnvConfig) -> Result<Template, SynthError> {
            let mut template = Template::new(self.id);
            for (n, key) in self.exports.iter().enumerate() {
                template.add_output(
                    format!("Export{n}"),
                    export_output(Value::literal("v"), *key),
                )?;
            }
            for (n, key) in self.imports.iter().enumerate() {
                template.add_output(format!("Import{n}"), Output::plain(import(*key)))?;
            }
            Ok(template)
        }
    }

    fn producer(id: &'static str, exports: Vec<ExportKey>) -> FakeStack {
        FakeStack {
            id,
            exports,
            imports: Vec::new(),
        }
    }

    fn consumer(id: &'static str, imports: Vec<ExportKey>) -> FakeStack {
        FakeStack {
            id,
            exports: Vec::new(),
            imports,
        }
    }

    #[test]
    fn test_should_synthesize_in_declared_order() {
        let mut app = App::new();
        app.add_stack(consumer("late", vec![ExportKey::Ec2PublicIp])).unwrap();
        app.add_stack(producer("early", vec![ExportKey::Ec2PublicIp])).unwrap();
        app.depends_on("late", "early").unwrap();

        let artifacts = app.synth_all(&config()).unwrap();
        let ids: Vec<&str> = artifacts.iter().map(|a| a.stack_id.as_str()).collect();
        assert_eq!(ids, vec!["early", "late"]);
    }

    #[test]
    fn test_should_reject_import_without_declared_ordering() {
        let mut app = App::new();
        app.add_stack(producer("early", vec![ExportKey::Ec2PublicIp])).unwrap();
        app.add_stack(consumer("late", vec![ExportKey::Ec2PublicIp])).unwrap();
        // No depends_on: the exporter would happen to deploy first, but the
        // ordering was never declared.
        let err = app.synth_all(&config()).unwrap_err();
        assert!(matches!(err, SynthError::UnresolvedImport { .. }), "{err}");
    }

    #[test]
    fn test_should_resolve_imports_through_transitive_dependencies() {
        let mut app = App::new();
        app.add_stack(producer("base", vec![ExportKey::Ec2RoleName])).unwrap();
        app.add_stack(producer("middle", vec![ExportKey::GitActionRoleName])).unwrap();
        app.add_stack(consumer("top", vec![ExportKey::Ec2RoleName])).unwrap();
        app.depends_on("middle", "base").unwrap();
        app.depends_on("top", "middle").unwrap();

        let artifacts = app.synth_all(&config()).unwrap();
        assert_eq!(artifacts.len(), 3);
    }

    #[test]
    fn test_should_detect_dependency_cycle() {
        let mut app = App::new();
        app.add_stack(producer("a", Vec::new())).unwrap();
        app.add_stack(producer("b", Vec::new())).unwrap();
        app.depends_on("a", "b").unwrap();
        app.depends_on("b", "a").unwrap();

        let err = app.synth_all(&config()).unwrap_err();
        assert!(matches!(err, SynthError::DependencyCycle { .. }), "{err}");
    }

    #[test]
    fn test_should_reject_duplicate_export() {
        let mut app = App::new();
        app.add_stack(producer("a", vec![ExportKey::Ec2InstanceId])).unwrap();
        app.add_stack(producer("b", vec![ExportKey::Ec2InstanceId])).unwrap();

        let err = app.synth_all(&config()).unwrap_err();
        assert!(matches!(err, SynthError::DuplicateExport { .. }), "{err}");
    }

    #[test]
    fn test_should_reject_duplicate_stack_id() {
        let mut app = App::new();
        app.add_stack(producer("a", Vec::new())).unwrap();
        let err = app.add_stack(producer("a", Vec::new())).unwrap_err();
        assert!(matches!(err, SynthError::DuplicateStackId { .. }), "{err}");
    }

    #[test]
    fn test_should_reject_unknown_dependency_target() {
        let mut app = App::new();
        app.add_stack(producer("a", Vec::new())).unwrap();
        let err = app.depends_on("a", "ghost").unwrap_err();
        assert!(matches!(err, SynthError::UnknownDependency { .. }), "{err}");
    }
}
