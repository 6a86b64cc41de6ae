//! The port the incremental compilation core consumes from an underlying
//! Groovy compiler driver.
//!
//! Production code never talks to a concrete Groovy toolchain directly: it
//! goes through [`CompilerDriver`], a thin trait boundary. This keeps the
//! driver swappable (a real Groovy compiler embedding, a WASM sandbox, a
//! deterministic test double) and gives the core a single seam at which to
//! enforce "no driver exception ever escapes the facade" — see
//! [`compile_with_driver`].

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use groovy_compilation_result::CompilationError;
use groovy_phase::Phase;

/// Configuration threaded opaquely from the service facade down to the
/// driver. The core never inspects these fields; it only constructs a
/// default and passes it through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerConfig {
    pub encoding: String,
    pub modern_syntax: bool,
    pub invokedynamic: bool,
    pub preserve_groovydoc: bool,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            encoding: "UTF-8".to_string(),
            modern_syntax: true,
            invokedynamic: true,
            preserve_groovydoc: true,
        }
    }
}

impl CompilerConfig {
    /// A configuration variant tuned for ad-hoc script compilation (same
    /// defaults today; kept distinct so callers have a stable name to
    /// migrate to if script-specific flags diverge later).
    pub fn for_script() -> Self {
        Self::default()
    }
}

/// A single compile session for one (logical name, source) pair, advanced
/// incrementally toward a target phase.
pub trait DriverSession {
    type Ast;

    /// Advance the session to `phase`. Idempotent: advancing to a phase at
    /// or below the one already reached is a no-op. Returns whether the
    /// session is in a usable state afterward (an AST may still be absent
    /// below `Phase::Conversion` without this being `false`).
    fn advance_to(&mut self, phase: Phase) -> bool;

    /// The AST produced so far, if any.
    fn ast(&self) -> Option<Arc<Self::Ast>>;

    /// Errors emitted so far, in emission order.
    fn errors(&self) -> &[CompilationError];

    /// Warnings emitted so far, in emission order.
    fn warnings(&self) -> &[CompilationError];
}

/// The adapter a concrete Groovy driver implements to plug into the core.
pub trait CompilerDriver: Send + Sync {
    type Ast;
    type Session: DriverSession<Ast = Self::Ast>;

    /// Create a new session for `source` under `logical_name`. Any failure
    /// to even start a session (rather than a compile-time diagnostic) is
    /// surfaced as a single `CompilationError`, never as a panic or an
    /// escaping exception.
    fn new_session(
        &self,
        config: &CompilerConfig,
        logical_name: &str,
        source: &str,
    ) -> Result<Self::Session, CompilationError>;
}

/// Drive `driver` to `phase` for `(logical_name, source)`, returning the AST
/// (if any) plus separated error/warning lists.
///
/// This is the single place a driver's internal panic is caught and folded
/// into a synthetic "compilation failed" error rather than being allowed to
/// unwind through the service facade: the facade itself never catches a
/// general panic, it only ever sees this function's already-safe return
/// value.
pub fn compile_with_driver<D: CompilerDriver>(
    driver: &D,
    config: &CompilerConfig,
    logical_name: &str,
    source: &str,
    phase: Phase,
) -> (Option<Arc<D::Ast>>, Vec<CompilationError>, Vec<CompilationError>) {
    let mut session = match driver.new_session(config, logical_name, source) {
        Ok(session) => session,
        Err(error) => {
            tracing::warn!(logical_name, error = %error, "driver failed to start a session");
            return (None, vec![error], Vec::new());
        }
    };

    let advanced = panic::catch_unwind(AssertUnwindSafe(|| session.advance_to(phase)));
    match advanced {
        Ok(_) => {
            let ast = session.ast();
            let errors = session.errors().to_vec();
            let warnings = session.warnings().to_vec();
            (ast, errors, warnings)
        }
        Err(_) => {
            tracing::warn!(logical_name, "driver panicked while advancing to {phase}");
            (None, vec![CompilationError::compilation_failed("driver panicked", logical_name)], Vec::new())
        }
    }
}
