//! The result type produced by one compile-to-phase invocation.
//!
//! A [`CompilationResult`] is a tagged variant rather than an exception or a
//! nullable-field bundle: callers pattern-match on `Success`/`Partial`/
//! `Failure` instead of interrogating an AST field that might be absent
//! alongside an error list that might be empty.

use std::fmt;
use std::sync::Arc;

use groovy_diagnostics_codes::{ErrorCode, ErrorKind};

/// One diagnostic produced during compilation: a message, a location, the
/// source it came from, and a kind/code pair for stable downstream matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilationError {
    pub message: String,
    pub line: usize,
    pub column: usize,
    pub source_name: String,
    pub kind: ErrorKind,
    pub code: ErrorCode,
}

impl CompilationError {
    /// Build an error, inferring its stable code from the message text via
    /// the pattern-matching rules in `groovy-diagnostics-codes`.
    pub fn new(
        message: impl Into<String>,
        line: usize,
        column: usize,
        source_name: impl Into<String>,
        kind: ErrorKind,
    ) -> Self {
        let message = message.into();
        let code = ErrorCode::from_message(&message, kind);
        Self { message, line, column, source_name: source_name.into(), kind, code }
    }

    /// The synthetic error used when the driver itself threw rather than
    /// producing a diagnostic: the core never lets the underlying exception
    /// escape, it folds it into a single "compilation failed" record.
    pub fn compilation_failed(message: impl Into<String>, source_name: impl Into<String>) -> Self {
        Self::new(format!("Compilation failed: {}", message.into()), 0, 0, source_name, ErrorKind::Syntax)
    }

    pub fn is_warning(&self) -> bool {
        self.kind == ErrorKind::Warning
    }
}

impl fmt::Display for CompilationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}: {} [{}]",
            self.source_name, self.line, self.column, self.message, self.code
        )
    }
}

impl std::error::Error for CompilationError {}

/// Outcome of compiling a source unit to a requested phase.
///
/// Generic over the opaque AST handle type so this crate does not need to
/// know about any particular compiler driver's AST representation; the
/// handle is always held behind an `Arc` so cache eviction and result
/// sharing never require cloning the AST itself.
pub enum CompilationResult<Ast> {
    /// An AST was produced and every diagnostic is a warning.
    Success { ast: Arc<Ast>, warnings: Vec<CompilationError> },
    /// An AST was produced but at least one diagnostic is a non-warning
    /// error; the AST is still useful to callers such as hover/definition.
    Partial { ast: Arc<Ast>, diagnostics: Vec<CompilationError> },
    /// No AST was produced; at least one diagnostic is present.
    Failure { diagnostics: Vec<CompilationError> },
}

impl<Ast> CompilationResult<Ast> {
    /// Classify a raw (ast, diagnostics) pair into the appropriate variant.
    ///
    /// This is the single funnel every constructor in this crate goes
    /// through, so the `is_successful ⟺ (has AST ∧ no non-warning errors)`
    /// invariant holds by construction rather than by convention.
    pub fn classify(ast: Option<Arc<Ast>>, diagnostics: Vec<CompilationError>) -> Self {
        match ast {
            Some(ast) => {
                if diagnostics.iter().any(|e| !e.is_warning()) {
                    CompilationResult::Partial { ast, diagnostics }
                } else {
                    CompilationResult::Success { ast, warnings: diagnostics }
                }
            }
            None => CompilationResult::Failure { diagnostics },
        }
    }

    /// A synthetic failure for a precondition violation (e.g. empty source),
    /// never touching the driver.
    pub fn synthetic_failure(error: CompilationError) -> Self {
        CompilationResult::Failure { diagnostics: vec![error] }
    }

    pub fn ast(&self) -> Option<&Arc<Ast>> {
        match self {
            CompilationResult::Success { ast, .. } => Some(ast),
            CompilationResult::Partial { ast, .. } => Some(ast),
            CompilationResult::Failure { .. } => None,
        }
    }

    /// Non-warning diagnostics, in emission order.
    pub fn errors(&self) -> Vec<&CompilationError> {
        match self {
            CompilationResult::Success { .. } => Vec::new(),
            CompilationResult::Partial { diagnostics, .. }
            | CompilationResult::Failure { diagnostics } => {
                diagnostics.iter().filter(|e| !e.is_warning()).collect()
            }
        }
    }

    /// Warning diagnostics, in emission order.
    pub fn warnings(&self) -> Vec<&CompilationError> {
        match self {
            CompilationResult::Success { warnings, .. } => warnings.iter().collect(),
            CompilationResult::Partial { diagnostics, .. }
            | CompilationResult::Failure { diagnostics } => {
                diagnostics.iter().filter(|e| e.is_warning()).collect()
            }
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors().is_empty()
    }

    pub fn is_successful(&self) -> bool {
        matches!(self, CompilationResult::Success { .. })
    }

    pub fn first_error(&self) -> Option<&CompilationError> {
        self.errors().into_iter().next()
    }
}

impl<Ast> Clone for CompilationResult<Ast> {
    fn clone(&self) -> Self {
        match self {
            CompilationResult::Success { ast, warnings } => {
                CompilationResult::Success { ast: Arc::clone(ast), warnings: warnings.clone() }
            }
            CompilationResult::Partial { ast, diagnostics } => CompilationResult::Partial {
                ast: Arc::clone(ast),
                diagnostics: diagnostics.clone(),
            },
            CompilationResult::Failure { diagnostics } => {
                CompilationResult::Failure { diagnostics: diagnostics.clone() }
            }
        }
    }
}

impl<Ast> fmt::Debug for CompilationResult<Ast> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompilationResult::Success { warnings, .. } => {
                f.debug_struct("Success").field("warnings", warnings).finish()
            }
            CompilationResult::Partial { diagnostics, .. } => {
                f.debug_struct("Partial").field("diagnostics", diagnostics).finish()
            }
            CompilationResult::Failure { diagnostics } => {
                f.debug_struct("Failure").field("diagnostics", diagnostics).finish()
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    struct DummyAst;

    fn err(kind: ErrorKind) -> CompilationError {
        CompilationError::new("message", 1, 1, "Test.groovy", kind)
    }

    #[test]
    fn success_requires_ast_and_no_non_warning_errors() {
        let result = CompilationResult::classify(Some(Arc::new(DummyAst)), vec![err(ErrorKind::Warning)]);
        assert!(result.is_successful());
        assert!(!result.has_errors());
        assert_eq!(result.warnings().len(), 1);
    }

    #[test]
    fn partial_requires_ast_and_at_least_one_non_warning_error() {
        let result = CompilationResult::classify(
            Some(Arc::new(DummyAst)),
            vec![err(ErrorKind::Warning), err(ErrorKind::Semantic)],
        );
        assert!(!result.is_successful());
        assert!(result.has_errors());
        assert!(result.ast().is_some());
        assert_eq!(result.errors().len(), 1);
        assert_eq!(result.warnings().len(), 1);
    }

    #[test]
    fn failure_has_no_ast() {
        let result: CompilationResult<DummyAst> =
            CompilationResult::classify(None, vec![err(ErrorKind::Syntax)]);
        assert!(!result.is_successful());
        assert!(result.has_errors());
        assert!(result.ast().is_none());
    }

    #[test]
    fn synthetic_failure_for_empty_source() {
        let error = CompilationError::new(
            "Source code cannot be null/empty",
            0,
            0,
            "Empty.groovy",
            ErrorKind::Syntax,
        );
        let result: CompilationResult<DummyAst> = CompilationResult::synthetic_failure(error);
        assert!(matches!(result, CompilationResult::Failure { .. }));
        assert_eq!(result.first_error().unwrap().message, "Source code cannot be null/empty");
    }

    #[test]
    fn warnings_never_demote_success() {
        let many_warnings: Vec<_> = (0..5).map(|_| err(ErrorKind::Warning)).collect();
        let result = CompilationResult::classify(Some(Arc::new(DummyAst)), many_warnings);
        assert!(result.is_successful());
    }
}
