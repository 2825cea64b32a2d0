//! Command-line probe over `crx_core`.
//!
//! # Responsibility
//! - Load manifests from disk and print what the loader derived.
//! - Compare two manifests for a privilege increase.
//! - Keep output deterministic JSON so scripts can diff it.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use crx_core::{
    generate_id, init_logging, load_extension, privilege_increase_reason, Extension, LoadRequest,
    LoaderConfig, Location, LoggingConfig,
};
use log::info;
use serde_json::{json, Value};

#[derive(Debug, Parser)]
#[command(name = "crx", version, about = "Inspect extension manifests")]
struct Cli {
    /// Write rotated logs to this absolute directory.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Load a manifest and print a JSON summary.
    Inspect {
        manifest: PathBuf,
        #[command(flatten)]
        load: LoadArgs,
    },
    /// Report whether `new` asks for more than `old`.
    Compare {
        old: PathBuf,
        new: PathBuf,
        #[command(flatten)]
        load: LoadArgs,
    },
    /// Print the extension id derived from a seed string.
    Id { seed: String },
}

#[derive(Debug, clap::Args)]
struct LoadArgs {
    /// Extension root directory.
    #[arg(long)]
    root: PathBuf,
    /// internal|external_pref|external_registry|external_pref_download|load|component
    #[arg(long, default_value = "load")]
    location: String,
    #[arg(long)]
    require_key: bool,
    /// Loader configuration as a JSON file.
    #[arg(long)]
    config: Option<PathBuf>,
}

impl LoadArgs {
    fn request(&self) -> Result<LoadRequest, String> {
        let location = Location::parse(&self.location)
            .ok_or_else(|| format!("unknown location `{}`", self.location))?;
        Ok(LoadRequest::new(self.root.clone(), location).with_require_key(self.require_key))
    }

    fn config(&self) -> Result<LoaderConfig, String> {
        match &self.config {
            None => Ok(LoaderConfig::default()),
            Some(path) => {
                LoaderConfig::from_json_str(&read_text(path)?).map_err(|err| err.to_string())
            }
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = &cli.log_dir {
        if let Err(err) = init_logging(&LoggingConfig::with_default_level(log_dir.clone())) {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    }

    match run(&cli.command) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: &Command) -> Result<String, String> {
    match command {
        Command::Inspect { manifest, load } => {
            let extension = load_from_file(manifest, load)?;
            pretty(&summarize(&extension))
        }
        Command::Compare { old, new, load } => {
            let old = load_from_file(old, load)?;
            let new = load_from_file(new, load)?;
            let reason = privilege_increase_reason(&old, &new);
            info!(
                "event=cli_compare module=cli status=ok increase={}",
                reason.is_some()
            );
            pretty(&json!({
                "privilege_increase": reason.is_some(),
                "reason": reason.as_ref().map(|reason| reason.code()),
                "detail": reason.as_ref().map(|reason| reason.to_string()),
            }))
        }
        Command::Id { seed } => Ok(generate_id(seed.as_bytes())),
    }
}

fn load_from_file(path: &Path, load: &LoadArgs) -> Result<Extension, String> {
    let manifest: Value = serde_json::from_str(&read_text(path)?)
        .map_err(|err| format!("{}: invalid JSON: {err}", path.display()))?;
    load_extension(&manifest, &load.request()?, &load.config()?).map_err(|err| {
        format!(
            "{}: {} [{}] {err}",
            path.display(),
            err.field(),
            err.code()
        )
    })
}

fn read_text(path: &Path) -> Result<String, String> {
    fs::read_to_string(path).map_err(|err| format!("{}: {err}", path.display()))
}

fn summarize(extension: &Extension) -> Value {
    let effective_hosts: Vec<String> = extension
        .effective_host_permissions()
        .patterns()
        .iter()
        .map(ToString::to_string)
        .collect();
    let messages: Vec<String> = extension
        .permission_messages()
        .iter()
        .map(ToString::to_string)
        .collect();
    json!({
        "id": extension.id(),
        "name": extension.name(),
        "version": extension.version().to_string(),
        "location": extension.location().as_str(),
        "is_theme": extension.is_theme(),
        "is_app": extension.is_app(),
        "api_permissions": extension.api_permissions(),
        "effective_hosts": effective_hosts,
        "all_hosts": extension.has_effective_access_to_all_hosts(),
        "messages": messages,
    })
}

fn pretty(value: &Value) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::{run, Command, LoadArgs};
    use std::fs;
    use std::path::Path;

    fn write(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        fs::write(&path, contents).expect("write fixture");
        path
    }

    fn load_args(root: &Path) -> LoadArgs {
        LoadArgs {
            root: root.to_path_buf(),
            location: "internal".to_string(),
            require_key: false,
            config: None,
        }
    }

    #[test]
    fn inspect_prints_summary() {
        let dir = tempfile::tempdir().expect("temp dir");
        let manifest = write(
            dir.path(),
            "manifest.json",
            r#"{"name": "CLI", "version": "1.0", "permissions": ["tabs", "http://a.com/*"]}"#,
        );
        let output = run(&Command::Inspect {
            manifest,
            load: load_args(dir.path()),
        })
        .expect("inspect");
        let summary: serde_json::Value = serde_json::from_str(&output).expect("json");
        assert_eq!(summary["name"], "CLI");
        assert_eq!(summary["api_permissions"][0], "tabs");
        assert_eq!(summary["effective_hosts"][0], "http://a.com/*");
        assert_eq!(summary["messages"][0], "Your data on a.com");
    }

    #[test]
    fn compare_reports_increase() {
        let dir = tempfile::tempdir().expect("temp dir");
        let old = write(dir.path(), "old.json", r#"{"name": "C", "version": "1"}"#);
        let new = write(
            dir.path(),
            "new.json",
            r#"{"name": "C", "version": "2", "permissions": ["geolocation"]}"#,
        );
        let output = run(&Command::Compare {
            old,
            new,
            load: load_args(dir.path()),
        })
        .expect("compare");
        let result: serde_json::Value = serde_json::from_str(&output).expect("json");
        assert_eq!(result["privilege_increase"], true);
        assert_eq!(result["reason"], "new_warnings");
    }

    #[test]
    fn invalid_manifest_reports_field_and_code() {
        let dir = tempfile::tempdir().expect("temp dir");
        let manifest = write(dir.path(), "manifest.json", r#"{"name": "", "version": "1"}"#);
        let message = run(&Command::Inspect {
            manifest,
            load: load_args(dir.path()),
        })
        .expect_err("blank name");
        assert!(message.contains("[invalid_name]"));
    }

    #[test]
    fn id_is_derived_from_seed() {
        let id = run(&Command::Id {
            seed: "seed".to_string(),
        })
        .expect("id");
        assert_eq!(id, crx_core::generate_id(b"seed"));
    }
}
