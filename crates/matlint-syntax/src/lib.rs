//! # matlint-syntax
//!
//! MATLAB lexer and block parser for matlint.
//!
//! Produces [`matlint_core::SourceUnit`]s through the
//! [`matlint_core::SyntaxProvider`] interface:
//!
//! - [`lexer::tokenize`] splits source into tokens, keeping comments,
//!   continuations and newlines
//! - [`parser::parse`] nests statements into functions, classes and
//!   control-flow blocks
//! - [`MatlabProvider`] ties the two together

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod lexer;
mod matlab;
pub mod parser;

pub use matlab::MatlabProvider;
