//! Check command implementation.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use glob::Pattern;
use matlint_core::{Config, Engine, FilesConfig, Report, Severity, SourceInput, Verdict};
use matlint_rules::{build_registry, standard_rules, Preset};
use matlint_syntax::MatlabProvider;

use super::{EXIT_ERROR, EXIT_FAIL};
use crate::config_resolver;
use crate::OutputFormat;

/// Arguments of `matlint check`.
#[derive(Debug, Clone)]
pub struct CheckArgs {
    /// File or directory to check.
    pub path: PathBuf,
    /// How to print the report.
    pub format: OutputFormat,
    /// Comma-separated rule ids or names.
    pub rules: Option<String>,
    /// Extra exclude globs on top of `[files] exclude`.
    pub exclude: Vec<String>,
    /// Preset name overriding the config.
    pub preset: Option<String>,
    /// Failure threshold overriding the config.
    pub fail_on: Option<Severity>,
}

/// Runs the check command and returns the process exit status.
pub fn run(args: &CheckArgs, explicit_config: Option<&Path>) -> Result<ExitCode> {
    let source = config_resolver::resolve(&args.path, explicit_config);
    let config = config_resolver::load(&source)?;

    let preset = select_preset(args.preset.as_deref(), &config)?;
    let only = requested_rules(args.rules.as_deref());
    let engine = build_engine(&config, preset, only.as_deref())?;

    let root = checked_root(&args.path, &config.files);
    let files = discover_files(&root, &config.files, &args.exclude)?;
    if files.is_empty() {
        tracing::warn!("No MATLAB files found under {}", root.display());
    }

    let inputs = read_sources(&root, &files);

    tracing::info!(
        "Checking {} file(s) with {} rule(s), preset {}",
        inputs.len(),
        engine.registry().len(),
        preset
    );

    let report = engine.run(&inputs);
    super::output::print(&report, args.format, &inputs)?;

    let fail_on = args.fail_on.or(config.fail_on).unwrap_or(Severity::Must);
    Ok(ExitCode::from(exit_status(&report, fail_on)))
}

fn build_engine(config: &Config, preset: Preset, only: Option<&[String]>) -> Result<Engine> {
    let registry =
        build_registry(config, preset, only).context("Failed to build the rule set")?;

    Engine::builder()
        .registry(Arc::new(registry))
        .known_rules(standard_rules().iter().map(|r| r.id))
        .provider(MatlabProvider::new())
        .config(config)
        .build()
        .context("Failed to build engine")
}

fn select_preset(flag: Option<&str>, config: &Config) -> Result<Preset> {
    match flag.or(config.preset.as_deref()) {
        None => Ok(Preset::default()),
        Some(name) => match Preset::parse(name) {
            Some(preset) => Ok(preset),
            None => bail!("Unknown preset '{name}' (expected minimal, recommended or strict)"),
        },
    }
}

/// Maps `--rules` entries to rule ids, accepting names as well.
///
/// Unrecognised entries are passed through so registry construction can
/// reject them.
fn requested_rules(filter: Option<&str>) -> Option<Vec<String>> {
    let filter = filter?;
    let catalog = standard_rules();
    let ids = filter
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|entry| {
            catalog
                .iter()
                .find(|r| r.id.eq_ignore_ascii_case(entry) || r.name == entry)
                .map_or_else(|| entry.to_string(), |r| r.id.to_string())
        })
        .collect();
    Some(ids)
}

/// `[files] root` applies only when checking the current directory.
fn checked_root(path: &Path, files: &FilesConfig) -> PathBuf {
    if path == Path::new(".") {
        files.root.clone()
    } else {
        path.to_path_buf()
    }
}

/// Collects the files to check under `root`, sorted by path.
///
/// A file `root` is returned as is, whatever its extension.
pub(crate) fn discover_files(
    root: &Path,
    files: &FilesConfig,
    extra_excludes: &[String],
) -> Result<Vec<PathBuf>> {
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }
    if !root.is_dir() {
        bail!("No such file or directory: {}", root.display());
    }

    let excludes = files
        .exclude
        .iter()
        .chain(extra_excludes)
        .map(|p| Pattern::new(p).with_context(|| format!("Invalid exclude pattern '{p}'")))
        .collect::<Result<Vec<_>>>()?;

    let mut builder = ignore::WalkBuilder::new(root);
    builder
        .hidden(false)
        .git_ignore(files.respect_gitignore)
        .git_exclude(files.respect_gitignore)
        .require_git(false)
        .ignore(false)
        .parents(files.respect_gitignore)
        .filter_entry(|entry| entry.file_name() != ".git");

    let mut found = Vec::new();
    for entry in builder.build() {
        let entry = entry.with_context(|| format!("Failed to walk {}", root.display()))?;
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }

        let path = entry.path();
        let matches_ext = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| files.extensions.iter().any(|want| want == ext));
        if !matches_ext {
            continue;
        }

        let rel = path.strip_prefix(root).unwrap_or(path);
        if let Some(pattern) = excludes.iter().find(|p| p.matches_path(rel)) {
            tracing::debug!("Excluded {} by '{}'", rel.display(), pattern);
            continue;
        }

        found.push(path.to_path_buf());
    }

    found.sort();
    Ok(found)
}

/// Reads files into engine inputs, with paths shown relative to `root`.
///
/// A file that cannot be read or decoded still becomes an input, so the
/// engine reports it and checks the rest.
fn read_sources(root: &Path, files: &[PathBuf]) -> Vec<SourceInput> {
    files
        .iter()
        .map(|path| {
            let shown = match path.strip_prefix(root) {
                Ok(rel) if !rel.as_os_str().is_empty() => rel,
                _ => path.as_path(),
            };
            match std::fs::read(path) {
                Ok(bytes) => SourceInput::from_bytes(shown, bytes),
                Err(err) => SourceInput::unreadable(shown, err.to_string()),
            }
        })
        .collect()
}

/// Exit status for a finished report.
pub(crate) fn exit_status(report: &Report, fail_on: Severity) -> u8 {
    if report.verdict == Verdict::Indeterminate {
        EXIT_ERROR
    } else if report.has_findings_at(fail_on) {
        EXIT_FAIL
    } else {
        0
    }
}
