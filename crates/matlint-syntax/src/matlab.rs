//! MATLAB syntax provider.

use std::path::Path;

use matlint_core::{NodeKind, ParseError, SourceUnit, SyntaxProvider};
use tracing::debug;

use crate::{lexer, parser};

/// Parses `.m` files into [`SourceUnit`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatlabProvider;

impl MatlabProvider {
    /// Creates a new MATLAB provider.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl SyntaxProvider for MatlabProvider {
    fn language_id(&self) -> &'static str {
        "matlab"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["m"]
    }

    fn parse(&self, source: &str, path: &Path) -> Result<SourceUnit, ParseError> {
        let tokens = lexer::tokenize(source)?;
        let root = parser::parse(&tokens, source.lines().count())?;
        debug!(
            path = %path.display(),
            tokens = tokens.len(),
            functions = root.walk().filter(|n| n.kind == NodeKind::Function).count(),
            "Parsed unit"
        );
        Ok(SourceUnit::new(path, source, tokens, root))
    }
}
