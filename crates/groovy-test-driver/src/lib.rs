//! A deterministic, in-crate [`CompilerDriver`] implementation used to
//! exercise the incremental compilation core without a real Groovy
//! toolchain: no JVM, no classpath, no network.
//!
//! The driver recognizes a small subset of Groovy class syntax (see
//! [`parse`]) and deterministically reports the phase/error/dependency
//! shapes the rest of the workspace needs to test against.

// This crate's regex table is compiled once from string literals known valid
// at compile time, and its capture-group accesses are guarded by the same
// pattern that produced the enclosing match; `unwrap`/`expect` here can never
// observe the `None`/`Err` case they'd otherwise guard against.
#![allow(clippy::unwrap_used, clippy::expect_used)]

mod ast;
mod parse;

use std::sync::Arc;

use groovy_compilation_result::CompilationError;
use groovy_compiler_port::{CompilerConfig, CompilerDriver, DriverSession};
use groovy_diagnostics_codes::ErrorKind;
use groovy_phase::Phase;

pub use ast::GroovyAst;
pub use parse::{parse, SyntaxProblem};

/// A [`CompilerDriver`] that parses source with the in-crate recognizer
/// instead of delegating to a real Groovy compiler.
#[derive(Debug, Default)]
pub struct GroovyTestDriver;

impl CompilerDriver for GroovyTestDriver {
    type Ast = GroovyAst;
    type Session = TestDriverSession;

    fn new_session(
        &self,
        _config: &CompilerConfig,
        logical_name: &str,
        source: &str,
    ) -> Result<Self::Session, CompilationError> {
        Ok(TestDriverSession {
            logical_name: logical_name.to_string(),
            source: source.to_string(),
            phase_reached: None,
            ast: None,
            errors: Vec::new(),
            warnings: Vec::new(),
        })
    }
}

/// A single compile session for the deterministic test driver. Parsing
/// happens once, the first time the session is advanced past
/// [`Phase::Parsing`]; advancing further just records the deeper phase
/// reached, since this driver has nothing further to compute.
pub struct TestDriverSession {
    logical_name: String,
    source: String,
    phase_reached: Option<Phase>,
    ast: Option<Arc<GroovyAst>>,
    errors: Vec<CompilationError>,
    warnings: Vec<CompilationError>,
}

impl TestDriverSession {
    fn parse_once(&mut self) {
        if self.phase_reached.is_some() {
            return;
        }
        match parse(&self.source) {
            Ok(ast) => {
                self.ast = Some(Arc::new(ast));
            }
            Err(problem) => {
                self.errors.push(CompilationError::new(
                    problem.message,
                    problem.line,
                    problem.column,
                    self.logical_name.clone(),
                    ErrorKind::Syntax,
                ));
            }
        }
    }
}

impl DriverSession for TestDriverSession {
    type Ast = GroovyAst;

    fn advance_to(&mut self, phase: Phase) -> bool {
        if phase >= Phase::Parsing {
            self.parse_once();
        }
        self.phase_reached = Some(match self.phase_reached {
            Some(reached) if reached >= phase => reached,
            _ => phase,
        });
        true
    }

    fn ast(&self) -> Option<Arc<GroovyAst>> {
        if self.phase_reached.is_some_and(Phase::may_lack_ast) {
            return None;
        }
        self.ast.clone()
    }

    fn errors(&self) -> &[CompilationError] {
        &self.errors
    }

    fn warnings(&self) -> &[CompilationError] {
        &self.warnings
    }
}
