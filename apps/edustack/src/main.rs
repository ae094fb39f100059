//! edustack — synthesis CLI for the platform's infrastructure.
//!
//! The composition root: resolves the environment configuration once,
//! instantiates the three stacks with their explicit ordering constraints,
//! and synthesizes the declarative templates the provisioning engine
//! deploys.
//!
//! # Usage
//!
//! ```text
//! edustack synth --env dev --out out
//! edustack list-exports --env dev
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use edustack_core::EnvRegistry;
use edustack_stacks::{
    App, DeliveryStack, DeliveryStackProps, FrontendSite, MediaStack, MediaStackProps,
    NetworkStack, StackArtifact,
};

/// Platform service repository trusted for deploys.
const SERVICE_REPO: &str = "edukit/platform";

/// Infrastructure repository trusted for pipeline deploys.
const DEPLOY_REPO: &str = "edukit/platform-deploy";

/// Front-end repository trusted to publish the static site.
const FRONTEND_REPO: &str = "edukit/platform-web";

#[derive(Debug, Parser)]
#[command(name = "edustack", about = "Synthesize the platform's infrastructure templates")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Synthesize templates for an environment.
    Synth {
        /// Environment key to synthesize for.
        #[arg(long, default_value = "dev")]
        env: String,
        /// Output directory for the template files.
        #[arg(long, default_value = "out")]
        out: PathBuf,
    },
    /// Print the cross-stack export contract for an environment.
    ListExports {
        /// Environment key to synthesize for.
        #[arg(long, default_value = "dev")]
        env: String,
    },
}

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` value.
fn init_tracing() -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_owned());
        EnvFilter::try_new(&level).with_context(|| format!("invalid log level filter: {level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    Ok(())
}

/// Assemble the platform app: three stacks, deployed network → delivery →
/// media, with the ordering declared explicitly.
fn platform_app() -> Result<App> {
    let mut app = App::new();
    app.add_stack(NetworkStack)?;
    app.add_stack(DeliveryStack::new(
        DeliveryStackProps::builder()
            .service_repo(SERVICE_REPO)
            .deploy_repo(DEPLOY_REPO)
            .frontend(FrontendSite::builder().repository(FRONTEND_REPO).build())
            .build(),
    ))?;
    app.add_stack(MediaStack::new(MediaStackProps::builder().build()))?;

    app.depends_on(DeliveryStack::ID, NetworkStack::ID)?;
    app.depends_on(MediaStack::ID, DeliveryStack::ID)?;
    // The media stack imports the host address and role from the network
    // stack; the ordering must be declared, not inferred.
    app.depends_on(MediaStack::ID, NetworkStack::ID)?;
    Ok(app)
}

/// Synthesize every stack for the environment.
fn synthesize(env: &str) -> Result<Vec<StackArtifact>> {
    let registry = EnvRegistry::builtin();
    let config = registry.resolve(env)?;
    let artifacts = platform_app()?.synth_all(config)?;
    Ok(artifacts)
}

/// Write each artifact as `<stack-id>.template.json` under `out`.
fn write_artifacts(artifacts: &[StackArtifact], out: &Path) -> Result<()> {
    fs::create_dir_all(out)
        .with_context(|| format!("failed to create output directory {}", out.display()))?;
    for artifact in artifacts {
        let path = out.join(format!("{}.template.json", artifact.stack_id));
        let json = artifact.template.to_json_pretty()?;
        fs::write(&path, json)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(
            stack = %artifact.stack_id,
            path = %path.display(),
            exports = ?artifact.exports,
            "wrote template"
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing()?;

    match cli.command {
        Command::Synth { env, out } => {
            let artifacts = synthesize(&env)?;
            write_artifacts(&artifacts, &out)?;
            info!(environment = %env, stacks = artifacts.len(), "synthesis complete");
        }
        Command::ListExports { env } => {
            let artifacts = synthesize(&env)?;
            for artifact in &artifacts {
                println!("{}", artifact.stack_id);
                for export in &artifact.exports {
                    println!("  exports {export}");
                }
                for import in &artifact.imports {
                    println!("  imports {import}");
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_synthesize_three_stacks_in_order() {
        let artifacts = synthesize("dev").unwrap();
        let ids: Vec<&str> = artifacts.iter().map(|a| a.stack_id.as_str()).collect();
        assert_eq!(ids, vec!["edu-network", "edu-delivery", "edu-media"]);
    }

    #[test]
    fn test_should_fail_for_unknown_environment() {
        assert!(synthesize("staging").is_err());
    }

    #[test]
    fn test_should_write_template_files() {
        let artifacts = synthesize("dev").unwrap();
        let dir = tempfile::tempdir().unwrap();
        write_artifacts(&artifacts, dir.path()).unwrap();

        for stack in ["edu-network", "edu-delivery", "edu-media"] {
            let path = dir.path().join(format!("{stack}.template.json"));
            let raw = fs::read_to_string(&path).unwrap();
            let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
            assert_eq!(json["AWSTemplateFormatVersion"], "2010-09-09");
        }
    }
}
