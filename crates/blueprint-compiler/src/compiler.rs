//! Graph compiler
//!
//! Turns a blueprint document into program text in two passes per graph:
//!
//! 1. Collect one [`CompileNodeBasic`] per distinct node type used anywhere
//!    in the document; each becomes one shared basic function.
//! 2. Walk the call graph from the entry node, emitting statements in
//!    traversal order. Data inputs are resolved backwards from each
//!    consumer: pure (immediate) producers are folded into the consumer's
//!    argument expression, everything else is read from the temp store.
//!
//! Debug builds add breakpoint checks after every call site, route
//! literals and folded values through the temp store so the inspector can
//! see them, and emit the entry function as a generator.

use std::collections::HashMap;
use std::sync::Arc;

use blueprint_graph::{validate_document, Document, Graph, GraphType, NodeInstance, Port};

use crate::ast::{self, BinaryOperator, Block, DeclKind, Expr, Program, Stmt};
use crate::cache::{self, ArtifactCache, CacheStats, CompiledArtifact};
use crate::config::CompilerConfig;
use crate::error::{CompileError, GeneratorError, Result};
use crate::literal::literal;
use crate::names;
use crate::printer::{is_identifier, print_program, PrintOptions};
use crate::settings::{
    BranchNesting, BranchPlan, CallGenerator, CompileNodeBasic, CompileSettingsRegistry,
    FunctionGenerator, ImmediateGenerator, PreparedBranch,
};
use crate::visited::VisitedScope;

/// Compiles documents against one compile-settings registry
pub struct GraphCompiler {
    registry: Arc<CompileSettingsRegistry>,
    config: CompilerConfig,
    cache: ArtifactCache,
}

impl GraphCompiler {
    pub fn new(registry: Arc<CompileSettingsRegistry>, config: CompilerConfig) -> Self {
        Self {
            registry,
            config,
            cache: ArtifactCache::new(),
        }
    }

    pub fn registry(&self) -> &CompileSettingsRegistry {
        &self.registry
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Compile a document to program text
    ///
    /// An unchanged document compiled again in the same mode reuses the
    /// cached artifact.
    pub fn compile(&mut self, document: &Document, dev: bool) -> Result<String> {
        Ok(self.compile_artifact(document, dev)?.source.clone())
    }

    /// Compile a document, returning the full artifact
    pub fn compile_artifact(&mut self, document: &Document, dev: bool) -> Result<Arc<CompiledArtifact>> {
        let fingerprint = cache::fingerprint(document)?;
        if let Some(artifact) = self.cache.lookup(&document.id, dev, fingerprint) {
            log::debug!("Reusing compiled artifact for document '{}' (dev: {})", document.id, dev);
            return Ok(artifact);
        }

        log::debug!("Compiling document '{}' (dev: {})", document.id, dev);
        let session = CompileSession::new(&self.registry, &self.config, dev);
        let (program, basics) = session.compile_document(document)?;
        let options = if dev {
            PrintOptions::pretty(self.config.indent_width)
        } else {
            PrintOptions::compact()
        };
        let artifact = Arc::new(CompiledArtifact {
            source: print_program(&program, options),
            program,
            basics,
            fingerprint,
        });
        self.cache.store(&document.id, dev, Arc::clone(&artifact));
        Ok(artifact)
    }

    /// Drop every cached artifact
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

/// State of one compile call
struct CompileSession<'a> {
    registry: &'a CompileSettingsRegistry,
    config: &'a CompilerConfig,
    dev: bool,
    basics: Vec<CompileNodeBasic>,
    basic_index: HashMap<String, usize>,
}

impl<'a> CompileSession<'a> {
    fn new(registry: &'a CompileSettingsRegistry, config: &'a CompilerConfig, dev: bool) -> Self {
        Self {
            registry,
            config,
            dev,
            basics: Vec::new(),
            basic_index: HashMap::new(),
        }
    }

    fn compile_document(mut self, document: &Document) -> Result<(Program, Vec<CompileNodeBasic>)> {
        let errors = validate_document(document);
        if !errors.is_empty() {
            let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            return Err(CompileError::bad_param(format!(
                "Document '{}' is malformed: {}",
                document.id,
                messages.join("; ")
            )));
        }

        let kw = &self.config.keywords;
        let mut body = vec![ast::decl(DeclKind::Const, kw.debug_build.clone(), Expr::Bool(self.dev))];
        if let Some(code) = self.config.helper_code.as_ref().filter(|c| !c.trim().is_empty()) {
            body.push(Stmt::Raw(code.clone()));
        }
        if self.dev {
            if let Some(code) = self.config.debug_helper_code.as_ref().filter(|c| !c.trim().is_empty()) {
                body.push(Stmt::Raw(code.clone()));
            }
        }

        if let Some(main) = &document.main_graph {
            self.compile_graph(main, &mut body)?;
        }

        for basic in &self.basics {
            body.push(self.build_basic_function(basic)?);
        }

        Ok((Program { body }, self.basics))
    }

    /// Compile a graph after its children, appending top-level output to `out`
    fn compile_graph(&mut self, graph: &Graph, out: &mut Vec<Stmt>) -> Result<()> {
        for child in &graph.children {
            self.compile_graph(child, out)?;
        }
        self.collect_basics(graph);

        match graph.graph_type {
            GraphType::Main => {
                let entry = graph
                    .find_node_by_type(&self.config.main_entry_type)
                    .ok_or_else(|| CompileError::NoEntryNode(format!("No main entry node in graph '{}'", graph.id)))?;

                let mut body = Block::new();
                body.extend(self.debug_function_check(graph));
                body.extend(self.graph_variables(graph)?);
                self.build_node_tree(graph, &mut VisitedScope::new(), &mut body, entry)?;

                let context = self.config.keywords.context.clone();
                out.push(ast::function_decl("main", vec![context], body, self.dev));
                out.push(self.entry_hook(graph));
            }
            GraphType::Function | GraphType::Static | GraphType::Constructor => {
                if graph.find_node_by_type(&self.config.graph_entry_type).is_none() {
                    return Err(CompileError::NoEntryNode(format!(
                        "No graph entry node in graph '{}'",
                        graph.id
                    )));
                }
                if graph.graph_type == GraphType::Static {
                    log::debug!("Static graph '{}' has an empty body", graph.id);
                } else {
                    log::warn!(
                        "Graph '{}' of type {:?} is not emitted",
                        graph.id,
                        graph.graph_type
                    );
                }
            }
            GraphType::Class | GraphType::Subgraph => {
                log::warn!(
                    "Graph '{}' of type {:?} is not emitted",
                    graph.id,
                    graph.graph_type
                );
            }
        }
        Ok(())
    }

    fn collect_basics(&mut self, graph: &Graph) {
        for node in &graph.nodes {
            if self.basic_index.contains_key(&node.type_guid) {
                continue;
            }
            let Some(generator) = self
                .registry
                .get(&node.type_guid)
                .and_then(|s| s.function_generator.as_ref())
            else {
                continue;
            };

            let ids = |ports: Vec<&Port>| ports.into_iter().map(|p| p.id.clone()).collect::<Vec<_>>();
            let basic = CompileNodeBasic {
                name: names::basic_function_name(&node.type_guid, generator.is_context()),
                node: node.clone(),
                function_generator: generator.clone(),
                params: ids(node.data_inputs().collect()),
                output_params: ids(node.data_outputs().collect()),
                entry_execute: ids(node.execute_inputs().collect()),
                exit_execute: ids(node.execute_outputs().collect()),
            };
            log::debug!("Node type '{}' compiles to {}", node.type_guid, basic.name);
            self.basic_index.insert(node.type_guid.clone(), self.basics.len());
            self.basics.push(basic);
        }
    }

    fn build_basic_function(&self, basic: &CompileNodeBasic) -> Result<Stmt> {
        let kw = &self.config.keywords;
        if let Some(bad) = basic.params.iter().find(|p| !is_identifier(p)) {
            return Err(CompileError::bad_param(format!(
                "Input port '{}' of {} is not a valid parameter name",
                bad,
                basic.node.describe()
            )));
        }
        let wrap = |e: GeneratorError| CompileError::ast_build(basic.node.describe(), e);

        match &basic.function_generator {
            FunctionGenerator::ContextNode { body } => {
                let body = match body {
                    Some(body) => body.build(basic).map_err(wrap)?,
                    None => Block::new(),
                };
                let mut params = vec![kw.context.clone(), kw.uid.clone()];
                params.extend(basic.params.iter().cloned());
                Ok(ast::function_decl(basic.name.clone(), params, body, false))
            }
            FunctionGenerator::SimpleCall { body } => {
                let inner = body.build(basic).map_err(wrap)?;
                let outputs = basic
                    .output_params
                    .iter()
                    .map(|p| ast::binary(BinaryOperator::Add, ast::ident(kw.uid.clone()), ast::string(format!(":{}", p))))
                    .collect();
                let call = ast::method_call(
                    ast::ident(kw.context.clone()),
                    kw.make_simple_call.clone(),
                    vec![Expr::Array(outputs), ast::function_expr(None, Vec::new(), inner, false)],
                );

                let mut params = vec![kw.context.clone(), kw.uid.clone()];
                params.extend(basic.params.iter().cloned());
                Ok(ast::function_decl(
                    basic.name.clone(),
                    params,
                    Block::from(vec![Stmt::Return(Some(call))]),
                    false,
                ))
            }
        }
    }

    /// Emit the call site of `node`, then recurse into its successors
    fn build_node_tree(
        &self,
        graph: &Graph,
        scope: &mut VisitedScope<'_>,
        out: &mut Block,
        node: &NodeInstance,
    ) -> Result<()> {
        let Some(settings) = self.registry.get(&node.type_guid) else {
            if self.is_entry_type(&node.type_guid) && !scope.is_visited(&node.id) {
                scope.mark(&node.id);
                out.extend(self.debug_node_check(graph, node));
                return self.build_successors(graph, scope, out, node);
            }
            log::warn!(
                "Node {} does not have compile settings but is on the call path; skipped",
                node.describe()
            );
            return Ok(());
        };

        if scope.is_visited(&node.id) {
            if !settings.is_context() {
                return Err(CompileError::IllegalCyclicCall(node.describe()));
            }
            log::debug!("Context node {} re-entered through a cycle; not emitted", node.describe());
            return Ok(());
        }
        scope.mark(&node.id);

        let kw = &self.config.keywords;
        let wrap = |e: GeneratorError| CompileError::ast_build(node.describe(), e);

        match &settings.call_generator {
            CallGenerator::SimpleCall => {
                let Some(generator) = &settings.function_generator else {
                    return Err(CompileError::bad_param(format!(
                        "Node {} is called but has no function generator",
                        node.describe()
                    )));
                };
                let mut args = vec![ast::ident(kw.context.clone()), ast::string(node.id.clone())];
                args.extend(self.resolve_inputs(graph, scope, node)?);
                let callee = ast::ident(names::basic_function_name(&node.type_guid, generator.is_context()));
                let call = ast::call(callee, args);

                if generator.is_context() {
                    out.push(ast::decl(DeclKind::Const, names::context_instance_name(&node.id), call));
                } else {
                    out.push(ast::expr_stmt(call));
                }
                out.extend(self.debug_node_check(graph, node));
                self.build_successors(graph, scope, out, node)
            }
            CallGenerator::SimpleStatement {
                generator,
                bind_return,
                debug_before,
            } => {
                let inputs = self.resolve_inputs(graph, scope, node)?;
                let mut stmt = generator.generate(node, inputs).map_err(wrap)?;

                if *bind_return {
                    if let Some(port) = node.data_outputs().next() {
                        let Stmt::Expr(value) = stmt else {
                            return Err(CompileError::bad_param(format!(
                                "Node {} binds a return value but its statement is not an expression",
                                node.describe()
                            )));
                        };
                        stmt = ast::expr_stmt(ast::method_call(
                            ast::ident(kw.context.clone()),
                            kw.make_temp.clone(),
                            vec![ast::string(names::temp_key(&node.id, &port.id)), value],
                        ));
                    }
                }

                if *debug_before {
                    out.extend(self.debug_node_check(graph, node));
                    out.push(stmt);
                } else {
                    out.push(stmt);
                    out.extend(self.debug_node_check(graph, node));
                }
                self.build_successors(graph, scope, out, node)
            }
            CallGenerator::BranchStatement { generator } => {
                let inputs = self.resolve_inputs(graph, scope, node)?;
                let mut plans: Vec<BranchPlan> = node
                    .execute_outputs()
                    .map(|p| BranchPlan {
                        port: p.id.clone(),
                        nesting: BranchNesting::Inline,
                    })
                    .collect();
                generator.plan(node, &inputs, &mut plans).map_err(wrap)?;

                let mut prepared = Vec::with_capacity(plans.len());
                for plan in plans {
                    let mut block = Block::new();
                    for connector in graph.connectors_from(&node.id, &plan.port) {
                        let target = self.find_node(graph, &connector.to.node)?;
                        let mut branch_scope = scope.child();
                        self.build_node_tree(graph, &mut branch_scope, &mut block, target)?;
                    }

                    let block = match plan.nesting {
                        BranchNesting::Inline => block,
                        BranchNesting::Nested => Block::from(vec![ast::expr_stmt(ast::method_call(
                            ast::ident(kw.context.clone()),
                            kw.make_nest_call.clone(),
                            vec![ast::function_expr(None, vec![kw.context.clone()], block, self.dev)],
                        ))]),
                        BranchNesting::AsyncNested => {
                            let starter = generator.async_starter(node, &plan.port, &block).map_err(wrap)?;
                            Block::from(vec![ast::expr_stmt(ast::method_call(
                                ast::ident(kw.context.clone()),
                                kw.make_async_nest_call.clone(),
                                vec![
                                    ast::function_expr(None, vec!["finishCb".to_string()], starter, false),
                                    ast::function_expr(None, vec![kw.context.clone()], block, self.dev),
                                ],
                            ))])
                        }
                    };
                    prepared.push(PreparedBranch {
                        port: plan.port,
                        nesting: plan.nesting,
                        block,
                    });
                }

                out.extend(self.debug_node_check(graph, node));
                out.extend(generator.generate(node, inputs, prepared).map_err(wrap)?);
                Ok(())
            }
            CallGenerator::Immediate(_) => Err(CompileError::bad_param(format!(
                "Immediate node {} cannot be reached through an execute connector",
                node.describe()
            ))),
        }
    }

    /// Recurse into every execute successor, in port declaration order
    fn build_successors(
        &self,
        graph: &Graph,
        scope: &mut VisitedScope<'_>,
        out: &mut Block,
        node: &NodeInstance,
    ) -> Result<()> {
        for connector in graph.execute_successors(node) {
            let target = self.find_node(graph, &connector.to.node)?;
            self.build_node_tree(graph, scope, out, target)?;
        }
        Ok(())
    }

    fn resolve_inputs(&self, graph: &Graph, scope: &mut VisitedScope<'_>, node: &NodeInstance) -> Result<Vec<Expr>> {
        node.data_inputs()
            .map(|port| self.resolve_port(graph, scope, node, port))
            .collect()
    }

    /// Expression for the value arriving at one data input
    fn resolve_port(
        &self,
        graph: &Graph,
        scope: &mut VisitedScope<'_>,
        node: &NodeInstance,
        port: &Port,
    ) -> Result<Expr> {
        let kw = &self.config.keywords;

        let Some(connector) = graph.connectors_into(&node.id, &port.id).next() else {
            let what = format!("Port {} ({}) default value", port.name, names::temp_key(&node.id, &port.id));
            let value = literal(&what, port.default_value.as_ref())?;
            if self.dev {
                return Ok(self.make_temp(names::temp_key(&node.id, &port.id), value));
            }
            return Ok(value);
        };

        let producer = self.find_node(graph, &connector.from.node)?;
        let settings = self.registry.get(&producer.type_guid).ok_or_else(|| {
            CompileError::bad_param(format!(
                "Node {} does not have compile settings but is on a parameter path",
                producer.describe()
            ))
        })?;
        let key = names::temp_key(&producer.id, &connector.from.port);

        let generator = match &settings.call_generator {
            CallGenerator::Immediate(generator) if !scope.is_immediate_visited(&producer.id) => generator,
            _ => {
                return Ok(ast::method_call(
                    ast::ident(kw.context.clone()),
                    kw.get_temp.clone(),
                    vec![ast::string(key)],
                ));
            }
        };
        scope.mark_immediate(&producer.id);

        let nested = self.resolve_inputs(graph, scope, producer)?;
        let value = match generator {
            ImmediateGenerator::Operator(op) => fold(*op, nested).ok_or_else(|| {
                CompileError::bad_param(format!(
                    "Node {} needs at least two inputs to fold with '{}'",
                    producer.describe(),
                    op
                ))
            })?,
            ImmediateGenerator::Custom(custom) => custom
                .generate(producer, nested)
                .map_err(|e| CompileError::ast_build(producer.describe(), e))?,
        };

        if graph.fan_out(&producer.id, &connector.from.port) > 1 || self.dev {
            return Ok(self.make_temp(key, value));
        }
        Ok(value)
    }

    fn make_temp(&self, key: String, value: Expr) -> Expr {
        let kw = &self.config.keywords;
        ast::method_call(
            ast::ident(kw.context.clone()),
            kw.make_temp.clone(),
            vec![ast::string(key), value],
        )
    }

    /// `if (debugNode(context, graph, node, "")) yield { ... };`
    fn debug_node_check(&self, graph: &Graph, node: &NodeInstance) -> Vec<Stmt> {
        if !self.dev {
            return Vec::new();
        }
        let kw = &self.config.keywords;
        let test = ast::method_call(
            ast::ident(kw.debug_connector.clone()),
            "debugNode",
            vec![
                ast::ident(kw.context.clone()),
                ast::string(graph.id.clone()),
                ast::string(node.id.clone()),
                ast::string(""),
            ],
        );
        let brk = Expr::Yield(Box::new(ast::object(vec![
            ("type", ast::ident(kw.debug_break.clone())),
            ("uid", ast::string(node.id.clone())),
            ("graphUid", ast::string(graph.id.clone())),
        ])));
        vec![ast::if_stmt(test, Block::from(vec![ast::expr_stmt(brk)]))]
    }

    fn debug_function_check(&self, graph: &Graph) -> Vec<Stmt> {
        if !self.dev {
            return Vec::new();
        }
        let kw = &self.config.keywords;
        let test = ast::method_call(
            ast::ident(kw.debug_connector.clone()),
            "debugFunction",
            vec![ast::string(graph.id.clone())],
        );
        let brk = Expr::Yield(Box::new(ast::object(vec![
            ("type", ast::ident(kw.debug_break.clone())),
            ("uid", ast::string(graph.id.clone())),
        ])));
        vec![ast::if_stmt(test, Block::from(vec![ast::expr_stmt(brk)]))]
    }

    /// Variable declarations, registered with the inspector in debug builds
    fn graph_variables(&self, graph: &Graph) -> Result<Vec<Stmt>> {
        let kw = &self.config.keywords;
        let mut stmts = Vec::new();
        for variable in &graph.variables {
            let name = names::variable_name(&variable.name);
            let what = format!("Variable {}", variable.name);
            stmts.push(ast::decl(
                DeclKind::Var,
                name.clone(),
                literal(&what, Some(&variable.default_value))?,
            ));
            if self.dev {
                stmts.push(ast::expr_stmt(ast::method_call(
                    ast::ident(kw.debug_connector.clone()),
                    "addDebugVariable",
                    vec![
                        ast::ident(kw.context.clone()),
                        ast::string(name.clone()),
                        Expr::Arrow {
                            params: Vec::new(),
                            body: Box::new(ast::ident(name)),
                        },
                    ],
                )));
            }
        }
        Ok(stmts)
    }

    /// Debug builds install an entry hook, release builds start at once
    fn entry_hook(&self, graph: &Graph) -> Stmt {
        let kw = &self.config.keywords;
        let start = ast::ident(kw.start_run_function.clone());
        if !self.dev {
            return ast::expr_stmt(ast::call(start, vec![ast::ident("main")]));
        }
        let body = Block::from(vec![ast::expr_stmt(ast::call(
            start,
            vec![ast::ident("main"), ast::object(vec![("uid", ast::string(graph.id.clone()))])],
        ))]);
        ast::expr_stmt(Expr::Assign {
            target: Box::new(ast::member(ast::ident(kw.debug_connector.clone()), "debuggerEntry")),
            value: Box::new(ast::function_expr(Some("debuggerEntry"), Vec::new(), body, false)),
        })
    }

    fn is_entry_type(&self, type_guid: &str) -> bool {
        type_guid == self.config.main_entry_type || type_guid == self.config.graph_entry_type
    }

    fn find_node<'g>(&self, graph: &'g Graph, node_id: &str) -> Result<&'g NodeInstance> {
        graph.find_node(node_id).ok_or_else(|| {
            CompileError::bad_param(format!("Graph '{}' has no node '{}'", graph.id, node_id))
        })
    }
}

/// Fold operands right to left: `[a, b, c]` becomes `a op (b op c)`
fn fold(op: BinaryOperator, mut operands: Vec<Expr>) -> Option<Expr> {
    let mut acc = operands.pop()?;
    if operands.is_empty() {
        return None;
    }
    while let Some(operand) = operands.pop() {
        acc = ast::binary(op, operand, acc);
    }
    Some(acc)
}
