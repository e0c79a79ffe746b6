//! Blueprint Compiler - node graphs to program text
//!
//! Compiles a [`blueprint_graph::Document`] into the source of a program
//! that runs on a cooperative, context-based host runtime. The pieces:
//!
//! - [`ast`] and [`printer`]: the syntax tree and its two text layouts
//! - [`settings`]: per node type compile strategies, held in an explicit
//!   [`CompileSettingsRegistry`]
//! - [`compiler`]: the [`GraphCompiler`] that walks graphs and emits code
//! - [`cache`]: compiled artifacts keyed by document and build mode
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use blueprint_compiler::{CompileSettingsRegistry, CompilerConfig, GraphCompiler};
//!
//! let registry = Arc::new(CompileSettingsRegistry::new());
//! let mut compiler = GraphCompiler::new(registry, CompilerConfig::default());
//! let source = compiler.compile(&document, true)?;
//! ```

pub mod ast;
pub mod cache;
pub mod compiler;
pub mod config;
pub mod error;
pub mod literal;
pub mod manifest;
pub mod names;
pub mod printer;
pub mod settings;
pub mod visited;

pub use ast::{BinaryOperator, Block, Expr, Program, Stmt};
pub use cache::{CacheStats, CompiledArtifact};
pub use compiler::GraphCompiler;
pub use config::{CompilerConfig, ConfigError, Keywords};
pub use error::{CompileError, CompileErrorKind, GeneratorError, Result};
pub use manifest::{ManifestEntry, SettingsManifest};
pub use printer::{print_program, PrintOptions};
pub use settings::{
    BranchGenerator, BranchNesting, BranchPlan, CallGenerator, CompileNodeBasic,
    CompileSettingsRegistry, FunctionBody, FunctionGenerator, ImmediateExprGenerator,
    ImmediateGenerator, NodeCompileSettings, PreparedBranch, StatementGenerator,
};
