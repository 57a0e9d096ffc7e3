//! Report rendering for the check command.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;
use matlint_core::{offset_for, Finding, FindingDiagnostic, Report, Severity, SourceInput, Verdict};
use miette::NamedSource;

use crate::OutputFormat;

/// Prints a report in the requested format.
///
/// `sources` supplies the text for `pretty` snippets.
pub fn print(report: &Report, format: OutputFormat, sources: &[SourceInput]) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(report),
        OutputFormat::Json => return print_json(report),
        OutputFormat::Compact => print!("{}", render_compact(report)),
        OutputFormat::Pretty => print_pretty(report, sources),
    }
    Ok(())
}

fn severity_label(severity: Severity) -> &'static str {
    match severity {
        Severity::Must => "\x1b[31mMUST\x1b[0m",
        Severity::Should => "\x1b[33mSHOULD\x1b[0m",
        Severity::May => "\x1b[34mMAY\x1b[0m",
        Severity::Info => "\x1b[36mINFO\x1b[0m",
    }
}

fn summary_color(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::Pass => "\x1b[32m",
        Verdict::Fail => "\x1b[31m",
        Verdict::Indeterminate => "\x1b[33m",
    }
}

fn print_text(report: &Report) {
    for finding in &report.findings {
        println!(
            "{} at {}:{}:{}",
            finding.rule_id,
            finding.location.file.display(),
            finding.location.line,
            finding.location.column,
        );
        println!("  {}: {}", severity_label(finding.severity), finding.message);
        if finding.kind.is_engine_generated() {
            println!("  = kind: {}", finding.kind);
        }
        if let Some(help) = &finding.help {
            println!("  = help: {help}");
        }
        println!();
    }

    println!(
        "{}{}\x1b[0m",
        summary_color(report.verdict),
        report.summary_line()
    );
}

fn print_json(report: &Report) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    println!("{json}");
    Ok(())
}

/// One `path:line:col: SEV [ID] message` line per finding.
pub(crate) fn render_compact(report: &Report) -> String {
    report
        .findings
        .iter()
        .map(|f| format!("{f}\n"))
        .collect()
}

fn print_pretty(report: &Report, sources: &[SourceInput]) {
    let texts: HashMap<&Path, &str> = sources
        .iter()
        .map(|s| (s.path.as_path(), s.text.as_str()))
        .collect();

    for finding in &report.findings {
        match texts.get(finding.location.file.as_path()) {
            Some(text) => println!("{:?}", diagnostic(finding, text)),
            None => print!("{}", finding.format()),
        }
    }

    println!("{}", report.summary_line());
}

fn diagnostic(finding: &Finding, text: &str) -> miette::Report {
    let offset = offset_for(text, finding.location.line, finding.location.column);
    let name = finding.location.file.display().to_string();
    miette::Report::new(FindingDiagnostic::new(finding, offset))
        .with_source_code(NamedSource::new(name, text.to_string()))
}
