//! Rule engine: runs the registry against source units.

use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{Config, RuleConfig};
use crate::registry::RuleRegistry;
use crate::report::{aggregate, Report, UnitFindings};
use crate::rule::{CheckContext, CheckFault, CheckFn, RuleDefinition};
use crate::source::{ParseError, SourceUnit, SyntaxProvider};
use crate::suppression::{extract_suppressions, filter, suppression_defects};
use crate::types::{Finding, FindingKind, Location, Severity};

/// Rule id attached to `UnparseableSource` findings.
pub const PARSE_RULE_ID: &str = "parse";

/// Errors that can occur while building an engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// No syntax provider was configured.
    #[error("no syntax provider configured")]
    MissingProvider,
}

/// Cooperative cancellation flag shared between a caller and an engine.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// Creates a token that is not cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation; takes effect before the next rule invocation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Returns true once cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// A source text waiting to be analysed.
#[derive(Debug, Clone)]
pub struct SourceInput {
    /// Unit path or synthetic id.
    pub path: PathBuf,
    /// Source text. Lossily decoded when the input is unreadable.
    pub text: String,
    /// Why the source could not be read, if it could not.
    pub unreadable: Option<ParseError>,
}

impl SourceInput {
    /// Creates a new input.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
            unreadable: None,
        }
    }

    /// Creates an input from raw file contents.
    ///
    /// Bytes that are not valid UTF-8 make the input unreadable, located at
    /// the first invalid byte.
    #[must_use]
    pub fn from_bytes(path: impl Into<PathBuf>, bytes: Vec<u8>) -> Self {
        match String::from_utf8(bytes) {
            Ok(text) => Self::new(path, text),
            Err(err) => {
                let bytes = err.as_bytes();
                let valid = &bytes[..err.utf8_error().valid_up_to()];
                let line = valid.iter().filter(|&&b| b == b'\n').count() + 1;
                let line_start = valid.iter().rposition(|&b| b == b'\n').map_or(0, |i| i + 1);
                let column = String::from_utf8_lossy(&valid[line_start..]).chars().count() + 1;
                let reason = ParseError::new(
                    format!(
                        "not valid UTF-8 (byte 0x{:02X})",
                        bytes[err.utf8_error().valid_up_to()]
                    ),
                    line,
                    column,
                );
                Self {
                    path: path.into(),
                    text: String::from_utf8_lossy(bytes).into_owned(),
                    unreadable: Some(reason),
                }
            }
        }
    }

    /// Creates an input for a file that could not be read at all.
    #[must_use]
    pub fn unreadable(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: String::new(),
            unreadable: Some(ParseError::new(reason, 1, 1)),
        }
    }
}

/// Raw result of running the rules over one unit.
#[derive(Debug, Clone, Default)]
pub struct UnitAnalysis {
    /// Unsorted, unsuppressed findings.
    pub findings: Vec<Finding>,
    /// False if cancellation stopped the run early.
    pub completed: bool,
}

/// Builder for configuring an [`Engine`].
#[derive(Default)]
pub struct EngineBuilder {
    registry: Option<Arc<RuleRegistry>>,
    known_rules: HashSet<String>,
    provider: Option<Arc<dyn SyntaxProvider>>,
    rule_options: HashMap<String, RuleConfig>,
    rule_timeout: Option<Duration>,
    parallel_rules: bool,
    cancellation: Option<CancellationToken>,
}

impl EngineBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the rule registry.
    #[must_use]
    pub fn registry(mut self, registry: Arc<RuleRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Declares rule ids that exist but may be absent from the registry.
    ///
    /// Suppressions naming these ids are not reported as unknown, so a rule
    /// switched off by a preset or configuration can stay suppressed.
    #[must_use]
    pub fn known_rules<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.known_rules.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Sets the syntax provider.
    #[must_use]
    pub fn provider<P: SyntaxProvider + 'static>(mut self, provider: P) -> Self {
        self.provider = Some(Arc::new(provider));
        self
    }

    /// Applies engine settings and rule options from configuration.
    #[must_use]
    pub fn config(mut self, config: &Config) -> Self {
        self.rule_options.clone_from(&config.rules);
        self.rule_timeout = config.engine.rule_timeout();
        self.parallel_rules = config.engine.parallel_rules;
        self
    }

    /// Bounds the time a single rule check may take.
    #[must_use]
    pub fn rule_timeout(mut self, timeout: Duration) -> Self {
        self.rule_timeout = Some(timeout);
        self
    }

    /// Runs the rules of one unit on the thread pool.
    #[must_use]
    pub fn parallel_rules(mut self, parallel: bool) -> Self {
        self.parallel_rules = parallel;
        self
    }

    /// Shares a cancellation token with the engine.
    #[must_use]
    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Builds the engine.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::MissingProvider`] if no provider was set.
    pub fn build(self) -> Result<Engine, EngineError> {
        let provider = self.provider.ok_or(EngineError::MissingProvider)?;
        Ok(Engine {
            registry: self.registry.unwrap_or_default(),
            known_rules: Arc::new(self.known_rules),
            provider,
            rule_options: Arc::new(self.rule_options),
            rule_timeout: self.rule_timeout,
            parallel_rules: self.parallel_rules,
            cancellation: self.cancellation.unwrap_or_default(),
        })
    }
}

/// Runs every applicable rule against source units.
///
/// Use [`Engine::builder()`] to construct an instance. The engine only reads
/// its registry, so one engine can analyse many units concurrently.
pub struct Engine {
    registry: Arc<RuleRegistry>,
    known_rules: Arc<HashSet<String>>,
    provider: Arc<dyn SyntaxProvider>,
    rule_options: Arc<HashMap<String, RuleConfig>>,
    rule_timeout: Option<Duration>,
    parallel_rules: bool,
    cancellation: CancellationToken,
}

/// Why a single check produced no usable result.
enum RunFailure {
    Fault(CheckFault),
    Panic(String),
    Timeout(Duration),
}

impl std::fmt::Display for RunFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fault(fault) => write!(f, "check failed: {fault}"),
            Self::Panic(msg) => write!(f, "check panicked: {msg}"),
            Self::Timeout(limit) => write!(f, "check did not finish within {}ms", limit.as_millis()),
        }
    }
}

impl Engine {
    /// Creates a new builder for configuring an engine.
    #[must_use]
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// The registry this engine runs.
    #[must_use]
    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Runs every applicable rule against `unit`.
    ///
    /// Findings come back unsorted and unsuppressed. A failing rule yields
    /// one [`FindingKind::EngineFault`] finding and never stops the others.
    #[must_use]
    pub fn analyze(&self, unit: &SourceUnit) -> UnitAnalysis {
        let runnable: Vec<&RuleDefinition> = self
            .registry
            .all()
            .filter(|rule| rule.is_runnable_on(unit))
            .collect();

        debug!(
            "Analyzing {} with {} of {} rules",
            unit.path().display(),
            runnable.len(),
            self.registry.len()
        );

        // Timed checks run on detached threads and need an owned unit.
        let shared = self.rule_timeout.map(|_| Arc::new(unit.clone()));

        if self.parallel_rules {
            let results: Vec<Option<Vec<Finding>>> = runnable
                .par_iter()
                .map(|rule| {
                    if self.cancellation.is_cancelled() {
                        return None;
                    }
                    Some(self.run_rule(rule, unit, shared.as_ref()))
                })
                .collect();
            let completed = results.iter().all(Option::is_some);
            UnitAnalysis {
                findings: results.into_iter().flatten().flatten().collect(),
                completed,
            }
        } else {
            let mut analysis = UnitAnalysis {
                findings: Vec::new(),
                completed: true,
            };
            for rule in runnable {
                if self.cancellation.is_cancelled() {
                    analysis.completed = false;
                    break;
                }
                analysis
                    .findings
                    .extend(self.run_rule(rule, unit, shared.as_ref()));
            }
            analysis
        }
    }

    /// True if `id` names a registered or declared rule.
    #[must_use]
    pub fn is_known_rule(&self, id: &str) -> bool {
        self.registry.contains(id) || self.known_rules.contains(id)
    }

    /// Analyses a parsed unit and applies its suppressions.
    #[must_use]
    pub fn check_unit(&self, unit: &SourceUnit) -> UnitFindings {
        let analysis = self.analyze(unit);
        let suppressions = extract_suppressions(unit);
        let defects = suppression_defects(&suppressions, |id| self.is_known_rule(id), unit.path());

        let mut findings = filter(analysis.findings, &suppressions);
        findings.extend(defects);

        let result = UnitFindings::new(unit.path(), findings);
        if analysis.completed {
            result
        } else {
            result.incomplete()
        }
    }

    /// Parses and analyses one source text.
    ///
    /// A parse failure yields a single `UnparseableSource` finding.
    #[must_use]
    pub fn check_source(&self, text: &str, path: &Path) -> UnitFindings {
        match self.provider.parse(text, path) {
            Ok(unit) => self.check_unit(&unit),
            Err(err) => {
                warn!("Failed to parse {}: {}", path.display(), err);
                UnitFindings::new(path, vec![unparseable_finding(path, text, &err)])
            }
        }
    }

    /// Analyses a batch of sources in parallel and aggregates the results.
    ///
    /// Always produces a report; units skipped after cancellation are
    /// recorded as incomplete and make the verdict indeterminate.
    #[must_use]
    pub fn run(&self, sources: &[SourceInput]) -> Report {
        info!("Starting analysis of {} unit(s)", sources.len());

        let units: Vec<UnitFindings> = sources
            .par_iter()
            .map(|source| {
                if self.cancellation.is_cancelled() {
                    return UnitFindings::new(&source.path, Vec::new()).incomplete();
                }
                if let Some(reason) = &source.unreadable {
                    warn!("Failed to read {}: {}", source.path.display(), reason.message);
                    let finding = unreadable_finding(&source.path, &source.text, reason);
                    return UnitFindings::new(&source.path, vec![finding]);
                }
                self.check_source(&source.text, &source.path)
            })
            .collect();

        let report = aggregate(units);
        info!(
            "Analysis complete: {} finding(s) in {} unit(s), verdict {}",
            report.findings.len(),
            report.units_checked,
            report.verdict
        );
        report
    }

    fn run_rule(
        &self,
        rule: &RuleDefinition,
        unit: &SourceUnit,
        shared: Option<&Arc<SourceUnit>>,
    ) -> Vec<Finding> {
        let Some(check) = rule.check else {
            return Vec::new();
        };

        let outcome = match (self.rule_timeout, shared) {
            (Some(limit), Some(shared)) => self.run_timed(rule, check, Arc::clone(shared), limit),
            _ => {
                let default = RuleConfig::default();
                let options = self.rule_options.get(rule.id).unwrap_or(&default);
                let ctx = CheckContext::new(rule, unit.path(), options);
                run_guarded(check, unit, &ctx)
            }
        };

        let outcome = outcome.and_then(|findings| validate_findings(rule, unit, findings));
        match outcome {
            Ok(findings) => findings,
            Err(failure) => {
                warn!(
                    "Rule {} faulted on {}: {}",
                    rule.id,
                    unit.path().display(),
                    failure
                );
                vec![fault_finding(rule, unit.path(), &failure)]
            }
        }
    }

    fn run_timed(
        &self,
        rule: &RuleDefinition,
        check: CheckFn,
        unit: Arc<SourceUnit>,
        limit: Duration,
    ) -> Result<Vec<Finding>, RunFailure> {
        let (tx, rx) = mpsc::channel();
        let rule = rule.clone();
        let options = Arc::clone(&self.rule_options);

        let spawned = thread::Builder::new()
            .name(format!("matlint-{}", rule.id))
            .spawn(move || {
                let default = RuleConfig::default();
                let rule_options = options.get(rule.id).unwrap_or(&default);
                let ctx = CheckContext::new(&rule, unit.path(), rule_options);
                // The receiver is gone once the deadline passed.
                let _ = tx.send(run_guarded(check, &unit, &ctx));
            });

        if let Err(e) = spawned {
            return Err(RunFailure::Fault(CheckFault::new(format!(
                "could not start worker thread: {e}"
            ))));
        }

        match rx.recv_timeout(limit) {
            Ok(outcome) => outcome,
            Err(RecvTimeoutError::Timeout) => Err(RunFailure::Timeout(limit)),
            Err(RecvTimeoutError::Disconnected) => Err(RunFailure::Panic(
                "worker exited without a result".to_string(),
            )),
        }
    }
}

/// Runs a check, converting both errors and panics into failures.
fn run_guarded(
    check: CheckFn,
    unit: &SourceUnit,
    ctx: &CheckContext<'_>,
) -> Result<Vec<Finding>, RunFailure> {
    match panic::catch_unwind(AssertUnwindSafe(|| check(unit, ctx))) {
        Ok(Ok(findings)) => Ok(findings),
        Ok(Err(fault)) => Err(RunFailure::Fault(fault)),
        Err(payload) => Err(RunFailure::Panic(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Rejects findings that break the finding contract.
fn validate_findings(
    rule: &RuleDefinition,
    unit: &SourceUnit,
    findings: Vec<Finding>,
) -> Result<Vec<Finding>, RunFailure> {
    for f in &findings {
        let problem = if f.kind != FindingKind::Rule {
            Some(format!("rule emitted a '{}' finding", f.kind))
        } else if f.rule_id != rule.id {
            Some(format!("finding attributed to rule '{}'", f.rule_id))
        } else if f.location.file != unit.path() {
            Some(format!(
                "finding located in another unit '{}'",
                f.location.file.display()
            ))
        } else if !unit.contains_line(f.location.line) || f.location.column == 0 {
            Some(format!(
                "finding location {}:{} is outside the unit ({} lines)",
                f.location.line,
                f.location.column,
                unit.line_count()
            ))
        } else {
            None
        };

        if let Some(problem) = problem {
            return Err(RunFailure::Fault(CheckFault::new(problem)));
        }
    }
    Ok(findings)
}

fn fault_finding(rule: &RuleDefinition, path: &Path, failure: &RunFailure) -> Finding {
    Finding::engine(
        FindingKind::EngineFault,
        rule.id,
        Severity::Must,
        Location::new(path, 1, 1),
        format!("rule {} ({}) {failure}", rule.id, rule.name),
    )
    .with_help("this is a defect in the rule, not in the analysed code")
}

fn unparseable_finding(path: &Path, text: &str, err: &ParseError) -> Finding {
    let line_count = text.lines().count().max(1);
    Finding::engine(
        FindingKind::UnparseableSource,
        PARSE_RULE_ID,
        Severity::Must,
        Location::new(path, err.line.clamp(1, line_count), err.column.max(1)),
        format!("source could not be parsed: {}", err.message),
    )
}

fn unreadable_finding(path: &Path, text: &str, reason: &ParseError) -> Finding {
    let line_count = text.lines().count().max(1);
    Finding::engine(
        FindingKind::UnparseableSource,
        PARSE_RULE_ID,
        Severity::Must,
        Location::new(path, reason.line.clamp(1, line_count), reason.column.max(1)),
        format!("source could not be read: {}", reason.message),
    )
    .with_help("save the file as UTF-8")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Verdict;
    use crate::rule::{Applicability, Category};
    use crate::source::{Node, NodeKind, Span, Token, TokenKind};
    use std::collections::BTreeSet;

    /// Line-based provider: one statement per non-empty line, `%` starts a
    /// comment, and any line reading `!!` is a syntax error.
    struct LineProvider;

    impl SyntaxProvider for LineProvider {
        fn language_id(&self) -> &'static str {
            "lines"
        }

        fn extensions(&self) -> &'static [&'static str] {
            &["txt"]
        }

        fn parse(&self, source: &str, path: &Path) -> Result<SourceUnit, ParseError> {
            let mut tokens = Vec::new();
            let mut root = Node::new(NodeKind::Script, Span::default(), 0..0);
            for (i, line) in source.lines().enumerate() {
                let line_no = i + 1;
                if line.trim() == "!!" {
                    return Err(ParseError::new("unexpected '!!'", line_no, 1));
                }
                if let Some(pos) = line.find('%') {
                    tokens.push(Token::new(TokenKind::Comment, &line[pos..], line_no, pos + 1));
                }
                if !line.trim().is_empty() {
                    let span = Span {
                        start_line: line_no,
                        start_column: 1,
                        end_line: line_no,
                    };
                    root.children.push(Node::new(NodeKind::Statement, span, 0..0));
                }
            }
            Ok(SourceUnit::new(path, source, tokens, root))
        }
    }

    fn flag_bad(unit: &SourceUnit, ctx: &CheckContext<'_>) -> Result<Vec<Finding>, CheckFault> {
        Ok(unit
            .numbered_lines()
            .filter_map(|(n, l)| l.find("bad").map(|c| ctx.finding(n, c + 1, "bad word")))
            .collect())
    }

    fn flag_long(unit: &SourceUnit, ctx: &CheckContext<'_>) -> Result<Vec<Finding>, CheckFault> {
        let max = ctx.int_option("max", 10);
        Ok(unit
            .numbered_lines()
            .filter(|(_, l)| l.len() > max)
            .map(|(n, _)| ctx.finding(n, max + 1, "long line"))
            .collect())
    }

    fn panics(_: &SourceUnit, _: &CheckContext<'_>) -> Result<Vec<Finding>, CheckFault> {
        panic!("unexpected tree shape")
    }

    fn errors(unit: &SourceUnit, _: &CheckContext<'_>) -> Result<Vec<Finding>, CheckFault> {
        Err(CheckFault::unexpected_shape(unit.root(), "a function"))
    }

    fn out_of_bounds(unit: &SourceUnit, ctx: &CheckContext<'_>) -> Result<Vec<Finding>, CheckFault> {
        Ok(vec![ctx.finding(unit.line_count() + 5, 1, "past the end")])
    }

    fn sleeps(_: &SourceUnit, _: &CheckContext<'_>) -> Result<Vec<Finding>, CheckFault> {
        thread::sleep(Duration::from_secs(2));
        Ok(Vec::new())
    }

    fn only_try(_: &SourceUnit, ctx: &CheckContext<'_>) -> Result<Vec<Finding>, CheckFault> {
        Ok(vec![ctx.finding(1, 1, "try seen")])
    }

    fn must_rule() -> RuleDefinition {
        RuleDefinition::new("B001", "no-bad", Severity::Must, Category::Naming).check(flag_bad)
    }

    fn should_rule() -> RuleDefinition {
        RuleDefinition::new("L001", "long", Severity::Should, Category::Layout).check(flag_long)
    }

    fn engine_with(rules: Vec<RuleDefinition>) -> Engine {
        let registry = RuleRegistry::from_rules(rules).expect("valid rules");
        Engine::builder()
            .registry(Arc::new(registry))
            .provider(LineProvider)
            .build()
            .expect("engine builds")
    }

    fn parse(text: &str) -> SourceUnit {
        LineProvider.parse(text, Path::new("t.txt")).expect("parses")
    }

    fn as_set(findings: &[Finding]) -> BTreeSet<String> {
        findings.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn build_requires_provider() {
        assert!(matches!(
            Engine::builder().build(),
            Err(EngineError::MissingProvider)
        ));
    }

    #[test]
    fn analyze_collects_findings_from_all_rules() {
        let engine = engine_with(vec![must_rule(), should_rule()]);
        let analysis = engine.analyze(&parse("ok\nthis is bad code\n"));
        assert!(analysis.completed);
        let ids: BTreeSet<&str> = analysis.findings.iter().map(|f| f.rule_id.as_str()).collect();
        assert_eq!(ids, BTreeSet::from(["B001", "L001"]));
    }

    #[test]
    fn analyze_is_deterministic_across_modes() {
        let text = "bad\nfine\nanother bad line here\n";
        let sequential = engine_with(vec![must_rule(), should_rule()]);
        let registry = Arc::new(
            RuleRegistry::from_rules(vec![must_rule(), should_rule()]).expect("valid"),
        );
        let parallel = Engine::builder()
            .registry(registry)
            .provider(LineProvider)
            .parallel_rules(true)
            .build()
            .expect("engine builds");

        let unit = parse(text);
        let a = as_set(&sequential.analyze(&unit).findings);
        let b = as_set(&sequential.analyze(&unit).findings);
        let c = as_set(&parallel.analyze(&unit).findings);
        assert_eq!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn rules_skip_units_without_matching_nodes() {
        let rule = RuleDefinition::new("T001", "try-only", Severity::Must, Category::ErrorHandling)
            .applies_to(Applicability::Kinds(&[NodeKind::Try]))
            .check(only_try);
        let engine = engine_with(vec![rule]);
        assert!(engine.analyze(&parse("x\n")).findings.is_empty());
    }

    #[test]
    fn panicking_rule_is_isolated() {
        let bad = RuleDefinition::new("P001", "panics", Severity::Should, Category::Layout)
            .check(panics);
        let engine = engine_with(vec![bad, must_rule()]);
        let analysis = engine.analyze(&parse("bad\n"));

        let faults: Vec<&Finding> = analysis
            .findings
            .iter()
            .filter(|f| f.kind == FindingKind::EngineFault)
            .collect();
        assert_eq!(faults.len(), 1);
        assert_eq!(faults[0].rule_id, "P001");
        assert!(faults[0].message.contains("unexpected tree shape"));
        assert!(analysis.findings.iter().any(|f| f.rule_id == "B001"));
    }

    #[test]
    fn erroring_rule_is_isolated() {
        let bad = RuleDefinition::new("P002", "errors", Severity::May, Category::Layout)
            .check(errors);
        let engine = engine_with(vec![bad]);
        let analysis = engine.analyze(&parse("x\n"));
        assert_eq!(analysis.findings.len(), 1);
        assert_eq!(analysis.findings[0].kind, FindingKind::EngineFault);
        assert!(analysis.findings[0].message.contains("expected a function"));
    }

    #[test]
    fn out_of_bounds_location_becomes_fault() {
        let bad = RuleDefinition::new("P003", "oob", Severity::May, Category::Layout)
            .check(out_of_bounds);
        let engine = engine_with(vec![bad]);
        let analysis = engine.analyze(&parse("x\ny\n"));
        assert_eq!(analysis.findings.len(), 1);
        assert_eq!(analysis.findings[0].kind, FindingKind::EngineFault);
        assert_eq!(analysis.findings[0].location.line, 1);
    }

    #[test]
    fn slow_rule_times_out() {
        let slow = RuleDefinition::new("P004", "slow", Severity::May, Category::Layout)
            .check(sleeps);
        let registry = RuleRegistry::from_rules(vec![slow, must_rule()]).expect("valid");
        let engine = Engine::builder()
            .registry(Arc::new(registry))
            .provider(LineProvider)
            .rule_timeout(Duration::from_millis(150))
            .build()
            .expect("engine builds");

        let analysis = engine.analyze(&parse("bad\n"));
        let fault = analysis
            .findings
            .iter()
            .find(|f| f.kind == FindingKind::EngineFault)
            .expect("timeout fault");
        assert_eq!(fault.rule_id, "P004");
        assert!(fault.message.contains("did not finish within 150ms"));
        assert!(analysis.findings.iter().any(|f| f.rule_id == "B001"));
    }

    #[test]
    fn rule_options_reach_checks() {
        let config = Config::parse("[rules.L001]\nmax = 3\n").expect("valid config");
        let registry = RuleRegistry::from_rules(vec![should_rule()]).expect("valid");
        let engine = Engine::builder()
            .registry(Arc::new(registry))
            .provider(LineProvider)
            .config(&config)
            .build()
            .expect("engine builds");
        let analysis = engine.analyze(&parse("abcd\nab\n"));
        assert_eq!(analysis.findings.len(), 1);
        assert_eq!(analysis.findings[0].location.column, 4);
    }

    #[test]
    fn check_source_reports_parse_failure_only() {
        let engine = engine_with(vec![must_rule()]);
        let result = engine.check_source("bad\n!!\nbad\n", Path::new("broken.txt"));
        assert_eq!(result.findings.len(), 1);
        assert_eq!(result.findings[0].kind, FindingKind::UnparseableSource);
        assert_eq!(result.findings[0].location.line, 2);
    }

    #[test]
    fn check_unit_applies_line_suppressions() {
        let engine = engine_with(vec![must_rule()]);
        let result = engine.check_source("bad %#ok<B001>\nbad\n", Path::new("t.txt"));
        assert_eq!(result.findings.len(), 1);
        assert_eq!(result.findings[0].location.line, 2);
    }

    #[test]
    fn check_unit_surfaces_suppression_defects() {
        let engine = engine_with(vec![must_rule()]);
        let result = engine.check_source("x %#ok<*B001>\ny %#ok<Z999>\n", Path::new("t.txt"));
        let kinds: Vec<FindingKind> = result.findings.iter().map(|f| f.kind).collect();
        assert!(kinds.contains(&FindingKind::WideSuppressionRejected));
        assert!(kinds.contains(&FindingKind::UnknownSuppressionTarget));
    }

    #[test]
    fn suppressing_a_known_but_unregistered_rule_is_not_a_defect() {
        let registry = RuleRegistry::from_rules(vec![must_rule()]).expect("valid");
        let engine = Engine::builder()
            .registry(Arc::new(registry))
            .known_rules(["B001", "L001"])
            .provider(LineProvider)
            .build()
            .expect("engine builds");

        assert!(engine.is_known_rule("L001"));
        let result = engine.check_source("long line here %#ok<L001>\n", Path::new("t.txt"));
        assert!(result.findings.is_empty());

        let result = engine.check_source("x %#ok<Z999>\n", Path::new("t.txt"));
        assert_eq!(result.findings.len(), 1);
        assert_eq!(result.findings[0].kind, FindingKind::UnknownSuppressionTarget);
    }

    #[test]
    fn cancelled_run_returns_partial_indeterminate_report() {
        let token = CancellationToken::new();
        let registry = RuleRegistry::from_rules(vec![must_rule()]).expect("valid");
        let engine = Engine::builder()
            .registry(Arc::new(registry))
            .provider(LineProvider)
            .cancellation(token.clone())
            .build()
            .expect("engine builds");

        token.cancel();
        let report = engine.run(&[SourceInput::new("a.txt", "bad\n")]);
        assert_eq!(report.verdict, Verdict::Indeterminate);
        assert_eq!(report.units_checked, 1);

        let analysis = engine.analyze(&parse("bad\n"));
        assert!(!analysis.completed);
    }

    #[test]
    fn unreadable_input_does_not_stop_the_batch() {
        let engine = engine_with(vec![must_rule()]);
        let latin1 = b"ok\n% caf\xe9\nbad\n".to_vec();
        let report = engine.run(&[
            SourceInput::from_bytes("legacy.txt", latin1),
            SourceInput::unreadable("locked.txt", "permission denied"),
            SourceInput::new("z.txt", "bad\n"),
        ]);

        assert_eq!(report.units_checked, 3);
        assert_eq!(report.verdict, Verdict::Fail);
        let seen: Vec<String> = report.findings.iter().map(ToString::to_string).collect();
        assert_eq!(
            seen,
            vec![
                "legacy.txt:2:6: MUST [parse] source could not be read: not valid UTF-8 (byte 0xE9)",
                "locked.txt:1:1: MUST [parse] source could not be read: permission denied",
                "z.txt:1:1: MUST [B001] bad word",
            ]
        );
    }

    #[test]
    fn valid_utf8_bytes_are_a_normal_input() {
        let input = SourceInput::from_bytes("a.txt", "caf\u{e9}\n".as_bytes().to_vec());
        assert!(input.unreadable.is_none());
        assert_eq!(input.text, "caf\u{e9}\n");
    }

    #[test]
    fn run_aggregates_batch() {
        let engine = engine_with(vec![must_rule(), should_rule()]);
        let report = engine.run(&[
            SourceInput::new("b.txt", "fine\n"),
            SourceInput::new("a.txt", "bad\n"),
            SourceInput::new("c.txt", "!!\n"),
        ]);
        assert_eq!(report.units_checked, 3);
        assert_eq!(report.verdict, Verdict::Fail);
        let files: Vec<String> = report
            .findings
            .iter()
            .map(|f| f.location.file.display().to_string())
            .collect();
        assert_eq!(files, vec!["a.txt", "c.txt"]);
    }
}
