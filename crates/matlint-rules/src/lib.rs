//! # matlint-rules
//!
//! Built-in MATLAB style rules for matlint.
//!
//! Each rule is a [`RuleDefinition`] record: id, severity, category,
//! applicability and a check function. Judgement rules that cannot be
//! checked mechanically are registered as advisory and never run.
//!
//! ## Available Rules
//!
//! | Code | Name | Severity |
//! |------|------|----------|
//! | N001 | `function-name-case` | MUST |
//! | N002 | `variable-name-case` | SHOULD |
//! | N003 | `loop-variable-imaginary` | SHOULD |
//! | N004 | `shadowed-builtin` | SHOULD |
//! | N005 | `class-name-case` | SHOULD |
//! | N006 | `negated-boolean-name` | MAY |
//! | N007 | `descriptive-names` | SHOULD (advisory) |
//! | L001 | `line-length` | SHOULD |
//! | L002 | `no-tabs` | MUST |
//! | L003 | `trailing-whitespace` | SHOULD |
//! | L004 | `function-header-comment` | SHOULD |
//! | L005 | `function-length` | MAY |
//! | L006 | `one-statement-per-line` | SHOULD |
//! | L007 | `comments-restate-code` | MAY (advisory) |
//! | S001 | `no-global` | MUST |
//! | S002 | `no-eval` | SHOULD |
//! | S003 | `switch-otherwise` | SHOULD |
//! | S004 | `no-clear-all` | SHOULD |
//! | E001 | `no-empty-catch` | MUST |
//! | E002 | `error-identifier` | SHOULD |
//! | E003 | `catch-identifier` | SHOULD |
//! | E004 | `try-for-control-flow` | SHOULD (advisory) |
//! | G001 | `no-gcf-gca` | SHOULD |
//! | G002 | `no-findobj-handles` | MAY |
//!
//! ## Usage
//!
//! ```ignore
//! use matlint_core::{Config, Engine};
//! use matlint_rules::{build_registry, Preset};
//! use matlint_syntax::MatlabProvider;
//! use std::sync::Arc;
//!
//! let registry = build_registry(&Config::default(), Preset::Recommended, None)?;
//! let engine = Engine::builder()
//!     .registry(Arc::new(registry))
//!     .provider(MatlabProvider::new())
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod catalog;
mod presets;
mod scan;

pub mod error_handling;
pub mod gui;
pub mod layout;
pub mod naming;
pub mod statements;

pub use catalog::{build_registry, standard_rules};
pub use presets::Preset;

/// Re-export core types for convenience.
pub use matlint_core::{RuleDefinition, RuleRegistry, Severity};
