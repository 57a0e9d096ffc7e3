//! # matlint-core
//!
//! Core framework for checking MATLAB source against a catalog of
//! severity-leveled style rules.
//!
//! This crate provides:
//!
//! - [`RuleDefinition`] records and the [`RuleRegistry`] that holds them
//! - [`SyntaxProvider`], the interface a parser implements to produce [`SourceUnit`]s
//! - [`Engine`] for running rules with fault isolation, timeouts and cancellation
//! - [`suppression`] for `%#ok<ID>` directives
//! - [`aggregate`] and [`Report`] for deterministic, ordered results
//!
//! ## Example
//!
//! ```ignore
//! use matlint_core::{Engine, RuleRegistry, SourceInput};
//! use std::sync::Arc;
//!
//! let registry = RuleRegistry::from_rules(my_rules())?;
//! let engine = Engine::builder()
//!     .registry(Arc::new(registry))
//!     .provider(MyProvider)
//!     .build()?;
//!
//! let report = engine.run(&[SourceInput::new("loadData.m", text)]);
//! println!("{}", report.format_text());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod engine;
mod registry;
mod report;
mod rule;
mod source;
mod types;

pub mod suppression;

pub use config::{Config, ConfigError, EngineConfig, FilesConfig, RuleConfig};
pub use engine::{
    CancellationToken, Engine, EngineBuilder, EngineError, SourceInput, UnitAnalysis,
    PARSE_RULE_ID,
};
pub use registry::{RegistryError, RuleRegistry};
pub use report::{aggregate, Report, Summary, UnitFindings, Verdict};
pub use rule::{Applicability, Category, CheckContext, CheckFault, CheckFn, RuleDefinition};
pub use source::{
    Ident, Node, NodeKind, ParseError, SourceUnit, Span, SyntaxProvider, Token, TokenKind, Walk,
};
pub use suppression::{Suppression, SuppressionScope, SuppressionTarget};
pub use types::{offset_for, Finding, FindingDiagnostic, FindingKind, Location, Severity};
