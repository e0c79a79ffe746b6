//! Compile-settings registry
//!
//! Maps node type guids to the strategy that compiles them. A node type
//! has at most one function generator (how its shared basic function is
//! emitted) and exactly one call generator (how each call site is emitted).
//!
//! # Usage
//!
//! ```ignore
//! let mut registry = CompileSettingsRegistry::new();
//! registry.register("std-add", NodeCompileSettings::operator(BinaryOperator::Add));
//! registry.register(
//!     "std-print",
//!     NodeCompileSettings::simple_call(FunctionBody::source("console.log(value);")),
//! );
//!
//! let compiler = GraphCompiler::new(Arc::new(registry), CompilerConfig::default());
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use blueprint_graph::{NodeInstance, PortId};

use crate::ast::{BinaryOperator, Block, Expr, Stmt};
use crate::error::GeneratorError;

/// Per-node-type record collected while compiling a document
///
/// One record exists per distinct node type used anywhere in the
/// document; its basic function is emitted exactly once.
#[derive(Debug, Clone)]
pub struct CompileNodeBasic {
    /// Synthesized function name (prefix included)
    pub name: String,
    /// First instance that introduced the type
    pub node: NodeInstance,
    pub function_generator: FunctionGenerator,
    /// Input data port guids, in declaration order
    pub params: Vec<PortId>,
    /// Output data port guids, in declaration order
    pub output_params: Vec<PortId>,
    pub entry_execute: Vec<PortId>,
    pub exit_execute: Vec<PortId>,
}

/// Builder callback producing the body of a simple-call function
pub type BodyBuilder = Arc<dyn Fn(&CompileNodeBasic) -> Result<Block, GeneratorError> + Send + Sync>;

/// Body of a generated basic function
#[derive(Clone)]
pub enum FunctionBody {
    /// Verbatim source, spliced as-is
    Source(String),
    Builder(BodyBuilder),
}

impl FunctionBody {
    pub fn source(code: impl Into<String>) -> Self {
        Self::Source(code.into())
    }

    pub fn builder<F>(f: F) -> Self
    where
        F: Fn(&CompileNodeBasic) -> Result<Block, GeneratorError> + Send + Sync + 'static,
    {
        Self::Builder(Arc::new(f))
    }

    /// Produce the statements of the body
    pub fn build(&self, basic: &CompileNodeBasic) -> Result<Block, GeneratorError> {
        match self {
            Self::Source(code) => Ok(Block::from(vec![Stmt::Raw(code.clone())])),
            Self::Builder(f) => f(basic),
        }
    }
}

impl fmt::Debug for FunctionBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source(code) => f.debug_tuple("Source").field(code).finish(),
            Self::Builder(_) => f.write_str("Builder(..)"),
        }
    }
}

/// How the shared basic function of a node type is emitted
#[derive(Debug, Clone)]
pub enum FunctionGenerator {
    /// Stateful: receives the execution context and may be re-entered
    /// across suspensions. Emitted as `c<guid>`.
    ContextNode { body: Option<FunctionBody> },
    /// Stateless: wraps one callback, exposing the declared outputs as temp
    /// writes through the context's simple-call helper. Emitted as `f<guid>`.
    SimpleCall { body: FunctionBody },
}

impl FunctionGenerator {
    pub fn is_context(&self) -> bool {
        matches!(self, Self::ContextNode { .. })
    }
}

/// Builds one statement for a `SimpleStatement` call site
pub trait StatementGenerator: Send + Sync {
    fn generate(&self, node: &NodeInstance, inputs: Vec<Expr>) -> Result<Stmt, GeneratorError>;
}

/// Builds an expression for a custom immediate node
pub trait ImmediateExprGenerator: Send + Sync {
    fn generate(&self, node: &NodeInstance, inputs: Vec<Expr>) -> Result<Expr, GeneratorError>;
}

/// Whether a branch runs inline or in a fresh nested context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BranchNesting {
    #[default]
    Inline,
    /// Synchronous nested call
    Nested,
    /// Asynchronous nested call with a completion callback
    AsyncNested,
}

/// Plan for one execute output of a branch node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchPlan {
    pub port: PortId,
    pub nesting: BranchNesting,
}

/// A branch whose downstream block has been compiled and wrapped
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedBranch {
    pub port: PortId,
    pub nesting: BranchNesting,
    pub block: Block,
}

/// Two-phase generator for nodes with several labeled execute outputs
pub trait BranchGenerator: Send + Sync {
    /// Phase 1: decide the nesting of each branch. Branches start inline.
    fn plan(
        &self,
        _node: &NodeInstance,
        _inputs: &[Expr],
        _branches: &mut [BranchPlan],
    ) -> Result<(), GeneratorError> {
        Ok(())
    }

    /// Body of the starter function of an asynchronous branch.
    /// `body` is the compiled branch block. The default starts at once.
    fn async_starter(
        &self,
        _node: &NodeInstance,
        _port: &str,
        _body: &Block,
    ) -> Result<Block, GeneratorError> {
        let finish = crate::ast::call(crate::ast::ident("finishCb"), Vec::new());
        Ok(Block::from(vec![crate::ast::expr_stmt(finish)]))
    }

    /// Phase 2: emit the controlling statements gluing the branches together
    fn generate(
        &self,
        node: &NodeInstance,
        inputs: Vec<Expr>,
        branches: Vec<PreparedBranch>,
    ) -> Result<Vec<Stmt>, GeneratorError>;
}

/// Expression strategy of a pure node
#[derive(Clone)]
pub enum ImmediateGenerator {
    /// Fold all inputs right-to-left with one binary operator
    Operator(BinaryOperator),
    Custom(Arc<dyn ImmediateExprGenerator>),
}

impl fmt::Debug for ImmediateGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Operator(op) => f.debug_tuple("Operator").field(op).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// How each call site of a node type is emitted
#[derive(Clone, Default)]
pub enum CallGenerator {
    /// Call the basic function with (context, uid, inputs...)
    #[default]
    SimpleCall,
    SimpleStatement {
        generator: Arc<dyn StatementGenerator>,
        /// Write the statement's value to the first data output's temp slot
        bind_return: bool,
        /// Emit the debug check before the statement instead of after
        debug_before: bool,
    },
    BranchStatement { generator: Arc<dyn BranchGenerator> },
    /// Pure node, only ever inlined into its consumers
    Immediate(ImmediateGenerator),
}

impl fmt::Debug for CallGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SimpleCall => f.write_str("SimpleCall"),
            Self::SimpleStatement {
                bind_return,
                debug_before,
                ..
            } => f
                .debug_struct("SimpleStatement")
                .field("bind_return", bind_return)
                .field("debug_before", debug_before)
                .finish_non_exhaustive(),
            Self::BranchStatement { .. } => f.write_str("BranchStatement(..)"),
            Self::Immediate(generator) => f.debug_tuple("Immediate").field(generator).finish(),
        }
    }
}

/// Compile settings of one node type
#[derive(Debug, Clone, Default)]
pub struct NodeCompileSettings {
    pub function_generator: Option<FunctionGenerator>,
    pub call_generator: CallGenerator,
}

impl NodeCompileSettings {
    /// Stateless node compiled through a simple-call basic function
    pub fn simple_call(body: FunctionBody) -> Self {
        Self {
            function_generator: Some(FunctionGenerator::SimpleCall { body }),
            call_generator: CallGenerator::SimpleCall,
        }
    }

    /// Stateful node compiled through a context basic function
    pub fn context_node(body: Option<FunctionBody>) -> Self {
        Self {
            function_generator: Some(FunctionGenerator::ContextNode { body }),
            call_generator: CallGenerator::SimpleCall,
        }
    }

    /// Pure binary operator node
    pub fn operator(op: BinaryOperator) -> Self {
        Self {
            function_generator: None,
            call_generator: CallGenerator::Immediate(ImmediateGenerator::Operator(op)),
        }
    }

    pub fn immediate(generator: Arc<dyn ImmediateExprGenerator>) -> Self {
        Self {
            function_generator: None,
            call_generator: CallGenerator::Immediate(ImmediateGenerator::Custom(generator)),
        }
    }

    pub fn statement(generator: Arc<dyn StatementGenerator>, bind_return: bool, debug_before: bool) -> Self {
        Self {
            function_generator: None,
            call_generator: CallGenerator::SimpleStatement {
                generator,
                bind_return,
                debug_before,
            },
        }
    }

    pub fn branch(generator: Arc<dyn BranchGenerator>) -> Self {
        Self {
            function_generator: None,
            call_generator: CallGenerator::BranchStatement { generator },
        }
    }

    pub fn is_immediate(&self) -> bool {
        matches!(self.call_generator, CallGenerator::Immediate(_))
    }

    pub fn is_context(&self) -> bool {
        self.function_generator
            .as_ref()
            .is_some_and(FunctionGenerator::is_context)
    }
}

/// Registry of compile settings keyed by node type guid
///
/// Registries are plain values: each compiler gets its own, and
/// registries compose by merging.
pub struct CompileSettingsRegistry {
    entries: HashMap<String, NodeCompileSettings>,
}

impl CompileSettingsRegistry {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Register (or replace) the settings of a node type
    pub fn register(&mut self, type_guid: impl Into<String>, settings: NodeCompileSettings) {
        self.entries.insert(type_guid.into(), settings);
    }

    pub fn get(&self, type_guid: &str) -> Option<&NodeCompileSettings> {
        self.entries.get(type_guid)
    }

    pub fn has(&self, type_guid: &str) -> bool {
        self.entries.contains_key(type_guid)
    }

    /// List all registered type guids
    pub fn node_types(&self) -> Vec<&str> {
        self.entries.keys().map(|s| s.as_str()).collect()
    }

    /// Merge another registry into this one
    ///
    /// Entries from `other` override entries in `self` with the same guid.
    pub fn merge(&mut self, other: CompileSettingsRegistry) {
        self.entries.extend(other.entries);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CompileSettingsRegistry {
    fn default() -> Self {
        Self::new()
    }
}
