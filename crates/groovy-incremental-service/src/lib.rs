//! The Incremental Compilation Service facade.
//!
//! [`IncrementalCompilationService`] is the single entry point the rest of a
//! Groovy language server talks to: it coordinates the TTL+LRU cache, the
//! dependency graph, and a pluggable [`CompilerDriver`] behind one
//! concurrency-safe surface. No other crate in this workspace talks to the
//! driver port directly.

mod config;
mod error;
mod fingerprint;
mod state;

use std::sync::Arc;

use dashmap::DashMap;
use groovy_compilation_result::{CompilationError, CompilationResult};
use groovy_compiler_port::{compile_with_driver, CompilerConfig, CompilerDriver};
use groovy_dependency_graph::{extract_dependencies, DependencyGraph, DependencyRelation, DependencySource};
use groovy_diagnostics_codes::ErrorKind;
use groovy_incremental_cache::{CacheConfig, NewEntry, TtlLruCache};
use groovy_phase::Phase;
use parking_lot::Mutex;

pub use config::ServiceConfig;
pub use error::ServiceError;
pub use state::ModuleState;

/// Coordinates a [`CompilerDriver`], a TTL+LRU cache, and a dependency
/// graph behind one facade. Generic over the driver so production code and
/// tests (via `groovy-test-driver`) share every other line of logic.
pub struct IncrementalCompilationService<D: CompilerDriver>
where
    D::Ast: DependencySource + Send + Sync + 'static,
{
    driver: D,
    compiler_config: CompilerConfig,
    cache: TtlLruCache<CompilationResult<D::Ast>>,
    graph: DependencyGraph,
    write_locks: DashMap<String, Arc<Mutex<()>>>,
    states: DashMap<String, ModuleState>,
}

impl<D: CompilerDriver> IncrementalCompilationService<D>
where
    D::Ast: DependencySource + Send + Sync + 'static,
{
    /// Construct a service with a driver, the documented defaults for
    /// compiler configuration, and a validated cache configuration.
    pub fn new(driver: D, config: ServiceConfig) -> Result<Self, ServiceError> {
        config.validate()?;
        Ok(Self {
            driver,
            compiler_config: CompilerConfig::default(),
            cache: TtlLruCache::new(CacheConfig { max_entries: config.max_cache_entries, ttl: config.cache_ttl }),
            graph: DependencyGraph::new(),
            write_locks: DashMap::new(),
            states: DashMap::new(),
        })
    }

    /// The current advisory lifecycle state for `name`.
    pub fn state_of(&self, name: &str) -> ModuleState {
        self.states.get(name).map(|s| *s).unwrap_or(ModuleState::Absent)
    }

    /// Backwards-compatible entry point: equivalent to
    /// [`Self::compile_to_phase_with_result`], discarding diagnostics on
    /// success.
    pub fn compile_to_phase(&self, name: &str, source: &str, phase: Phase) -> Option<Arc<D::Ast>> {
        self.compile_to_phase_with_result(name, source, phase).ast().cloned()
    }

    /// The full compile-to-phase protocol: validate, consult the cache,
    /// build under a per-name writer slot on miss, classify, extract
    /// dependencies, admit the result, and return it.
    pub fn compile_to_phase_with_result(
        &self,
        name: &str,
        source: &str,
        phase: Phase,
    ) -> CompilationResult<D::Ast> {
        let span = tracing::info_span!("compile_to_phase_with_result", logical_name = name, phase = %phase);
        let _guard = span.enter();

        if source.trim().is_empty() {
            tracing::debug!(logical_name = name, "rejecting empty source");
            return CompilationResult::synthetic_failure(CompilationError::new(
                "Source code cannot be null/empty",
                0,
                0,
                name,
                ErrorKind::Syntax,
            ));
        }

        let fingerprint = fingerprint::fingerprint_of(source);

        if let Some(cached) = self.cache.get(name, phase, fingerprint) {
            tracing::debug!(logical_name = name, "cache hit");
            return cached;
        }
        tracing::debug!(logical_name = name, "cache miss");

        let write_lock = self.write_lock_for(name);
        let _write_guard = write_lock.lock();

        // Double-checked: another caller may have admitted a satisfying
        // entry while we waited for the writer slot.
        if let Some(cached) = self.cache.get(name, phase, fingerprint) {
            tracing::debug!(logical_name = name, "cache hit after acquiring writer slot");
            return cached;
        }

        self.states.insert(name.to_string(), ModuleState::InFlight);

        let (ast, errors, warnings) =
            compile_with_driver(&self.driver, &self.compiler_config, name, source, phase);

        let mut diagnostics = errors;
        diagnostics.extend(warnings);

        // A request for a phase below `Conversion` may legitimately produce no
        // AST on otherwise clean source (§4.A). Without a diagnostic attached,
        // that would classify as a `Failure` carrying zero errors, breaking
        // the "every failure carries at least one error" invariant; attach an
        // informational one so the contract holds without claiming the source
        // itself is broken.
        if ast.is_none() && diagnostics.is_empty() && phase.may_lack_ast() {
            diagnostics.push(CompilationError::new(
                format!("No AST is produced at phase '{phase}'"),
                0,
                0,
                name,
                ErrorKind::Warning,
            ));
        }

        let result = CompilationResult::classify(ast.clone(), diagnostics);

        if let Some(ast) = ast.as_ref() {
            if phase.supports_dependency_extraction() {
                let deps = extract_dependencies(ast.as_ref());
                tracing::info!(logical_name = name, edge_count = deps.len(), "updating dependency graph");
                self.graph.record(name, &deps);
            }
        }

        self.cache.put(name, NewEntry { fingerprint, phase, value: result.clone() });

        self.states.insert(
            name.to_string(),
            if result.is_successful() || result.ast().is_some() {
                ModuleState::CachedAtPhase(phase)
            } else {
                ModuleState::Absent
            },
        );

        result
    }

    /// Invalidate `name`'s cache entry, then recompile `new_source` at
    /// `original_phase`. The Rust driver port carries no phase metadata
    /// alongside an AST handle, so callers supply the phase their original
    /// AST was produced at explicitly rather than it being inferred.
    pub fn update_module(&self, name: &str, original_phase: Phase, new_source: &str) -> Option<Arc<D::Ast>> {
        self.invalidate(name);
        self.compile_to_phase(name, new_source, original_phase)
    }

    /// Transitive set of modules depending (directly or indirectly) on
    /// `name`. Empty if `name` was never compiled or was recently cleared.
    pub fn affected(&self, name: &str) -> Vec<String> {
        self.graph.affected(name)
    }

    /// Alias for [`Self::affected`], named to match the external interface.
    pub fn get_affected_modules(&self, name: &str) -> Vec<String> {
        self.affected(name)
    }

    /// The extractor's mapping for an already-produced AST, exposed
    /// directly for testability and tooling.
    pub fn get_dependencies(&self, ast: &D::Ast) -> std::collections::HashMap<String, DependencyRelation> {
        extract_dependencies(ast)
    }

    /// Remove the cache entry and outgoing graph edges for `name`, and
    /// return its advisory state to absent.
    pub fn invalidate(&self, name: &str) {
        self.cache.invalidate(name);
        self.graph.invalidate(name);
        self.states.insert(name.to_string(), ModuleState::Absent);
    }

    /// Named to match the external interface's `clear-cache(name)`; same
    /// effect as [`Self::invalidate`].
    pub fn clear_cache(&self, name: &str) {
        self.invalidate(name);
    }

    /// Remove every cache entry and every graph edge.
    pub fn clear_all(&self) {
        self.cache.clear();
        self.graph.clear();
        self.states.clear();
    }

    /// Named to match the external interface's `clear-all-caches()`; same
    /// effect as [`Self::clear_all`].
    pub fn clear_all_caches(&self) {
        self.clear_all();
    }

    fn write_lock_for(&self, name: &str) -> Arc<Mutex<()>> {
        self.write_locks.entry(name.to_string()).or_insert_with(|| Arc::new(Mutex::new(()))).clone()
    }
}
