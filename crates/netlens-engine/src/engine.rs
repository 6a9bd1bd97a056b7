//! The interfaces engine: shared state for queries, derivations, assertions
//! and summaries.

use crate::accessor::TableAccessor;
use crate::config::EngineConfig;
use crate::portmode::{BuiltinInterpreter, ConfigInterpreter};
use crate::schema::SchemaRegistry;

/// Analytic engine over the interfaces table and the tables it correlates
/// with.
///
/// Holds read-only handles only; every operation materializes fresh output
/// from the accessor.
pub struct InterfacesEngine<A> {
    pub(crate) accessor: A,
    pub(crate) config: EngineConfig,
    pub(crate) schema: SchemaRegistry,
    pub(crate) interpreter: Box<dyn ConfigInterpreter>,
}

impl<A: TableAccessor> InterfacesEngine<A> {
    /// Creates an engine using the built-in configuration interpreter.
    pub fn new(accessor: A, config: EngineConfig) -> Self {
        Self {
            accessor,
            config,
            schema: SchemaRegistry::default(),
            interpreter: Box::new(BuiltinInterpreter),
        }
    }

    /// Replaces the configuration interpreter used for portmode derivation.
    pub fn with_interpreter(mut self, interpreter: impl ConfigInterpreter + 'static) -> Self {
        self.interpreter = Box::new(interpreter);
        self
    }

    pub fn accessor(&self) -> &A {
        &self.accessor
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn schema(&self) -> &SchemaRegistry {
        &self.schema
    }
}

impl<A> std::fmt::Debug for InterfacesEngine<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterfacesEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
