//! Debug runner
//!
//! Loads compiled program text into a [`Realm`] and mediates the debugging
//! session: run, pause, step and stop. The runner never executes node
//! semantics itself. It answers the program's lifecycle callbacks and
//! breakpoint queries and reports to the session owner through an
//! [`EventSink`].
//!
//! State machine: `idle -> running -> paused -> running | idle`. Every
//! transition is reported once.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use blueprint_graph::{BreakpointState, Document, Graph, GraphId, NodeId};
use parking_lot::Mutex;

use crate::config::RunnerConfig;
use crate::error::{DebuggerError, Result, RuntimeError};
use crate::events::{EventSink, RunnerEvent, RunnerState};
use crate::protocol::{
    ContextState, CoreConnector, DebugConnector, DebugContext, DebugProvider, HostCapabilities, Realm,
};
use crate::snapshot::PauseSnapshot;

#[derive(Default)]
struct Session {
    state: RunnerState,
    /// The program reported begin and has not been stopped
    running: bool,
    main_started: bool,
    active: Option<Arc<dyn DebugContext>>,
    live: Vec<Arc<dyn DebugContext>>,
    graphs: HashMap<GraphId, Arc<Graph>>,
    connector: Option<Arc<DebugConnector>>,
}

/// State shared with the loaded program through the provider and core connector
struct RunnerShared {
    config: RunnerConfig,
    sink: Arc<dyn EventSink>,
    session: Mutex<Session>,
    breakpoints: Mutex<HashMap<(GraphId, NodeId), BreakpointState>>,
    breakpoints_disabled: AtomicBool,
    stopping: AtomicBool,
}

impl RunnerShared {
    fn emit(&self, event: RunnerEvent) {
        if let Err(e) = self.sink.send(event) {
            log::warn!("Failed to deliver runner event: {}", e);
        }
    }

    fn set_state(&self, state: RunnerState) {
        {
            let mut session = self.session.lock();
            if session.state == state {
                return;
            }
            session.state = state;
        }
        log::info!("Runner {:?}", state);
        self.emit(RunnerEvent::StateChanged(state));
    }

    fn active(&self) -> Option<Arc<dyn DebugContext>> {
        self.session.lock().active.clone()
    }

    fn snapshot(&self, trigger: &Arc<dyn DebugContext>) -> PauseSnapshot {
        let (live, graphs) = {
            let session = self.session.lock();
            (session.live.clone(), session.graphs.clone())
        };
        PauseSnapshot::capture(trigger, &live, &graphs)
    }

    /// Tear down every live context and return to idle
    fn stop(&self) {
        if self.stopping.swap(true, Ordering::SeqCst) {
            return;
        }
        let connector = {
            let mut session = self.session.lock();
            session.running = false;
            session.connector.clone()
        };
        if let Some(connector) = connector {
            connector.stop();
        }
        {
            let mut session = self.session.lock();
            session.active = None;
            session.live.clear();
        }
        self.set_state(RunnerState::Idle);
        self.stopping.store(false, Ordering::SeqCst);
    }

    fn breakpoint_at(&self, graph_id: &str, node_id: &str) -> BreakpointState {
        let key = (graph_id.to_string(), node_id.to_string());
        if let Some(state) = self.breakpoints.lock().get(&key) {
            return *state;
        }
        self.session
            .lock()
            .graphs
            .get(graph_id)
            .and_then(|g| g.find_node(node_id))
            .map(|n| n.breakpoint)
            .unwrap_or_default()
    }
}

impl DebugProvider for RunnerShared {
    fn create(&self, context: Arc<dyn DebugContext>) {
        let mut session = self.session.lock();
        if session.live.is_empty() {
            session.active = Some(Arc::clone(&context));
        }
        log::debug!("Context {} created for graph '{}'", context.id(), context.graph_id());
        session.live.push(context);
    }

    fn state_changed(&self, context: Arc<dyn DebugContext>, state: ContextState) {
        match state {
            ContextState::Active => {
                self.session.lock().active = Some(context);
                self.set_state(RunnerState::Running);
            }
            ContextState::Completed => {
                let id = context.id();
                let empty = {
                    let mut session = self.session.lock();
                    if session.active.as_ref().is_some_and(|a| a.id() == id) {
                        session.active = None;
                    }
                    session.live.retain(|c| c.id() != id);
                    session.live.is_empty()
                };
                log::debug!("Context {} completed", id);
                if empty {
                    self.stop();
                }
            }
            ContextState::Paused => {
                let running = self.session.lock().running;
                if running {
                    let snapshot = self.snapshot(&context);
                    self.emit(RunnerEvent::Paused { snapshot });
                    self.set_state(RunnerState::Paused);
                }
            }
            ContextState::Inactive => {}
        }
    }

    fn exception(&self, context: Arc<dyn DebugContext>, error: RuntimeError) {
        log::warn!("Context {} raised: {}", context.id(), error);
        let snapshot = self.snapshot(&context);
        self.emit(RunnerEvent::Exception { snapshot, error });
        self.set_state(RunnerState::Paused);
    }

    fn check_break_node(&self, graph_id: &str, node_id: &str) -> bool {
        if self.breakpoints_disabled.load(Ordering::SeqCst) {
            return false;
        }
        self.breakpoint_at(graph_id, node_id) == BreakpointState::Enable
    }

    fn check_debug_function(&self, _graph_id: &str) -> bool {
        false
    }
}

impl CoreConnector for RunnerShared {
    fn begin(&self) {
        self.session.lock().running = true;
    }

    fn exit(&self) {
        self.stop();
    }

    fn platform(&self) -> String {
        self.config.platform.clone()
    }
}

/// Interactive debugging session over one loaded program
pub struct DebugRunner {
    shared: Arc<RunnerShared>,
    realm: Mutex<Box<dyn Realm>>,
}

impl DebugRunner {
    pub fn new(config: RunnerConfig, realm: Box<dyn Realm>, sink: Arc<dyn EventSink>) -> Self {
        Self {
            shared: Arc::new(RunnerShared {
                config,
                sink,
                session: Mutex::new(Session::default()),
                breakpoints: Mutex::new(HashMap::new()),
                breakpoints_disabled: AtomicBool::new(false),
                stopping: AtomicBool::new(false),
            }),
            realm: Mutex::new(realm),
        }
    }

    /// Load compiled program text for `document`, replacing any previous program
    pub fn load(&self, document: &Document, source: &str) -> Result<()> {
        let had_program = self.shared.session.lock().connector.is_some();
        if had_program {
            self.shared.stop();
        }

        let connector = Arc::new(DebugConnector::new());
        {
            let mut session = self.shared.session.lock();
            session.running = false;
            session.main_started = false;
            session.active = None;
            session.live.clear();
            session.graphs = document
                .graph_map()
                .into_iter()
                .map(|(id, graph)| (id, Arc::new(graph.clone())))
                .collect();
            session.connector = Some(Arc::clone(&connector));
        }

        let provider: Arc<dyn DebugProvider> = self.shared.clone();
        let core: Arc<dyn CoreConnector> = self.shared.clone();
        let host = HostCapabilities {
            provider,
            connector,
            core,
        };
        self.realm
            .lock()
            .evaluate(source, host)
            .map_err(|e| DebuggerError::Load(e.to_string()))?;

        log::info!("Loaded program for document '{}'", document.id);
        Ok(())
    }

    /// Resume the active context, or start the program through its debug entry
    pub fn run(&self) {
        log::info!("Run requested");
        self.shared.set_state(RunnerState::Running);
        self.shared.session.lock().main_started = true;

        if let Some(active) = self.shared.active() {
            self.shared.emit(RunnerEvent::Resumed);
            active.resume(false);
            return;
        }

        let connector = self.connector();
        if let Some(connector) = connector {
            connector.set_connected(true);
            connector.set_paused(false);
            connector.set_step_mode(false);
            if !connector.invoke_entry() {
                log::warn!("Loaded program installed no debug entry");
            }
        }

        match self.shared.active() {
            Some(active) => {
                self.shared.emit(RunnerEvent::Resumed);
                active.resume(false);
            }
            None => self.no_active_context(),
        }
    }

    /// Ask the running program to suspend at its next check point
    pub fn pause(&self) {
        log::info!("Pause requested");
        if let Some(connector) = self.connector() {
            connector.pause();
        }
    }

    /// Resume the active context for one check point
    pub fn step(&self) {
        match self.shared.active() {
            Some(active) => {
                self.shared.set_state(RunnerState::Running);
                self.shared.emit(RunnerEvent::Resumed);
                active.resume(true);
            }
            None => self.no_active_context(),
        }
    }

    /// Tear down every live context; calling it again is a no-op
    pub fn stop(&self) {
        log::info!("Stop requested");
        self.shared.stop();
    }

    pub fn state(&self) -> RunnerState {
        self.shared.session.lock().state
    }

    /// Whether the debug entry has been invoked since the last load
    pub fn is_started(&self) -> bool {
        self.shared.session.lock().main_started
    }

    /// Override a node's breakpoint flag; `None` restores the document's flag
    pub fn set_breakpoint(&self, graph_id: &str, node_id: &str, state: Option<BreakpointState>) {
        let key = (graph_id.to_string(), node_id.to_string());
        let mut breakpoints = self.shared.breakpoints.lock();
        match state {
            Some(state) => {
                breakpoints.insert(key, state);
            }
            None => {
                breakpoints.remove(&key);
            }
        }
    }

    pub fn set_breakpoints_disabled(&self, disabled: bool) {
        self.shared.breakpoints_disabled.store(disabled, Ordering::SeqCst);
    }

    pub fn breakpoints_disabled(&self) -> bool {
        self.shared.breakpoints_disabled.load(Ordering::SeqCst)
    }

    pub fn active_context(&self) -> Option<Arc<dyn DebugContext>> {
        self.shared.active()
    }

    pub fn live_contexts(&self) -> Vec<Arc<dyn DebugContext>> {
        self.shared.session.lock().live.clone()
    }

    pub fn connector(&self) -> Option<Arc<DebugConnector>> {
        self.shared.session.lock().connector.clone()
    }

    fn no_active_context(&self) {
        log::warn!("No active context to run");
        self.shared.emit(RunnerEvent::NoActiveContext);
        self.shared.session.lock().running = false;
        self.shared.set_state(RunnerState::Idle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{ProgramRuntime, Step};
    use crate::events::{EventError, VecEventSink};
    use crate::protocol::RealmError;
    use blueprint_compiler::{CompileSettingsRegistry, CompilerConfig, FunctionBody, GraphCompiler, NodeCompileSettings};
    use blueprint_graph::{DocumentBuilder, GraphBuilder, GraphType, NodeInstance, Port};

    const ENTRY: &str = "core-script-entry";

    /// Instruction recovered from compiled program text
    #[derive(Debug, Clone)]
    enum Planned {
        Function(String),
        Node(String, String),
        Variable(String),
        Print(String),
        Fail(String),
    }

    impl Planned {
        fn to_step(&self) -> Step {
            match self.clone() {
                Self::Function(graph) => Step::debug_function(graph),
                Self::Node(graph, node) => Step::debug_node(graph, node),
                Self::Variable(name) => Step::declare(name, serde_json::json!(0)),
                Self::Print(id) => Step::exec(move |ctx| {
                    ctx.make_temp(format!("{}:done", id), serde_json::json!(true));
                    Ok(())
                }),
                Self::Fail(id) => Step::exec(move |_| Err(RuntimeError::node(id, "boom"))),
            }
        }
    }

    const MARKERS: [&str; 5] = [
        "_DEBUG_CONNECTOR.debugFunction(\"",
        "_DEBUG_CONNECTOR.debugNode(context, \"",
        "_DEBUG_CONNECTOR.addDebugVariable(context, \"",
        "fstdprint(context, \"",
        "fstdfail(context, \"",
    ];

    fn quoted(rest: &str) -> (String, &str) {
        let end = rest.find('"').unwrap_or(rest.len());
        (rest[..end].to_string(), &rest[end..])
    }

    /// Recover the main graph's instructions in emission order
    fn plan(source: &str) -> Vec<Planned> {
        let mut plan = Vec::new();
        let mut rest = source;
        loop {
            let next = MARKERS
                .iter()
                .enumerate()
                .filter_map(|(i, m)| rest.find(m).map(|pos| (pos, i)))
                .min();
            let Some((pos, marker)) = next else {
                return plan;
            };
            rest = &rest[pos + MARKERS[marker].len()..];
            let (first, after) = quoted(rest);
            rest = after;
            plan.push(match marker {
                0 => Planned::Function(first),
                1 => {
                    let (node, after) = quoted(rest.trim_start_matches("\", \""));
                    rest = after;
                    Planned::Node(first, node)
                }
                2 => Planned::Variable(first),
                3 => Planned::Print(first),
                _ => Planned::Fail(first),
            });
        }
    }

    /// Realm that recognizes compiled output and replays it on the runtime
    #[derive(Default)]
    struct ScriptedRealm {
        runtime: Arc<Mutex<Option<ProgramRuntime>>>,
    }

    impl Realm for ScriptedRealm {
        fn evaluate(&mut self, source: &str, host: HostCapabilities) -> std::result::Result<(), RealmError> {
            if !source.starts_with("const _DEBUG_BUILD") {
                return Err("not a compiled program".into());
            }
            let runtime = ProgramRuntime::new(host.clone());
            if source.contains("_DEBUG_CONNECTOR.debuggerEntry = ") {
                let plan = plan(source);
                let weak = runtime.downgrade();
                host.connector.install_entry(Arc::new(move || {
                    if let Some(runtime) = weak.upgrade() {
                        runtime.start("main", plan.iter().map(Planned::to_step).collect());
                    }
                }));
            }
            *self.runtime.lock() = Some(runtime);
            Ok(())
        }
    }

    /// Realm whose entry runs a fixed step list
    struct FixedRealm {
        steps: fn() -> Vec<Step>,
    }

    impl Realm for FixedRealm {
        fn evaluate(&mut self, _source: &str, host: HostCapabilities) -> std::result::Result<(), RealmError> {
            let runtime = ProgramRuntime::new(host.clone());
            let steps = self.steps;
            host.connector.install_entry(Arc::new(move || {
                runtime.start("main", steps());
            }));
            Ok(())
        }
    }

    fn registry() -> Arc<CompileSettingsRegistry> {
        let mut registry = CompileSettingsRegistry::new();
        registry.register("std-print", NodeCompileSettings::simple_call(FunctionBody::source("console.log(value);")));
        registry.register("std-fail", NodeCompileSettings::simple_call(FunctionBody::source("throw new Error(\"boom\");")));
        Arc::new(registry)
    }

    fn node(id: &str, type_guid: &str) -> NodeInstance {
        NodeInstance::new(id, type_guid)
            .input(Port::execute("in"))
            .input(Port::data("value", "any").with_default(1.0))
            .output(Port::execute("out"))
    }

    /// entry -> first -> second
    fn document(first: NodeInstance, second: NodeInstance) -> Document {
        let (a, b) = (first.id.clone(), second.id.clone());
        let main = GraphBuilder::new("main", GraphType::Main)
            .add_node(NodeInstance::new("entry", ENTRY).output(Port::execute("out")))
            .add_node(first)
            .add_node(second)
            .connect("entry", "out", &a, "in")
            .connect(&a, "out", &b, "in")
            .build();
        DocumentBuilder::new("doc", "Test").main_graph(main).build()
    }

    fn compile(document: &Document, dev: bool) -> String {
        GraphCompiler::new(registry(), CompilerConfig::default())
            .compile(document, dev)
            .unwrap()
    }

    struct Harness {
        runner: DebugRunner,
        sink: Arc<VecEventSink>,
        runtime: Arc<Mutex<Option<ProgramRuntime>>>,
    }

    fn load(document: &Document, dev: bool) -> Harness {
        let _ = env_logger::builder().is_test(true).try_init();
        let realm = ScriptedRealm::default();
        let runtime = Arc::clone(&realm.runtime);
        let sink = Arc::new(VecEventSink::new());
        let runner = DebugRunner::new(RunnerConfig::default(), Box::new(realm), sink.clone());
        runner.load(document, &compile(document, dev)).unwrap();
        Harness { runner, sink, runtime }
    }

    fn runtime_contexts(harness: &Harness) -> usize {
        harness
            .runtime
            .lock()
            .as_ref()
            .map(|r| r.contexts().len())
            .unwrap_or(0)
    }

    #[test]
    fn test_plan_follows_emission_order() {
        let doc = document(node("p1", "std-print"), node("p2", "std-print"));
        let planned: Vec<String> = plan(&compile(&doc, true)).iter().map(|p| format!("{:?}", p)).collect();
        assert_eq!(
            planned,
            vec![
                "Function(\"main\")",
                "Node(\"main\", \"entry\")",
                "Print(\"p1\")",
                "Node(\"main\", \"p1\")",
                "Print(\"p2\")",
                "Node(\"main\", \"p2\")",
            ]
        );
    }

    #[test]
    fn test_breakpoint_pauses_then_step_completes() {
        let doc = document(
            node("p1", "std-print"),
            node("p2", "std-print").with_breakpoint(BreakpointState::Enable),
        );
        let harness = load(&doc, true);

        harness.runner.run();
        assert_eq!(harness.runner.state(), RunnerState::Paused);
        assert!(harness.runner.is_started());

        let events = harness.sink.events();
        let snapshot = events.iter().rev().find_map(RunnerEvent::snapshot).unwrap();
        let current = snapshot.current().unwrap();
        assert_eq!(current.run_stack.len(), 1);
        assert_eq!(current.run_stack[0].node_id, "p2");
        assert_eq!(current.run_stack[0].node.as_ref().unwrap().type_guid, "std-print");
        assert_eq!(current.graph_id, "main");

        harness.runner.step();
        assert_eq!(harness.runner.state(), RunnerState::Idle);
        assert!(harness.runner.live_contexts().is_empty());
        assert_eq!(runtime_contexts(&harness), 0);
        assert_eq!(
            harness.sink.states(),
            vec![RunnerState::Running, RunnerState::Paused, RunnerState::Running, RunnerState::Idle]
        );
    }

    #[test]
    fn test_exception_pauses_with_error() {
        let doc = document(node("p1", "std-print"), node("f1", "std-fail"));
        let harness = load(&doc, true);

        harness.runner.run();
        assert_eq!(harness.runner.state(), RunnerState::Paused);

        let events = harness.sink.events();
        let (snapshot, error) = events
            .iter()
            .find_map(|e| match e {
                RunnerEvent::Exception { snapshot, error } => Some((snapshot, error)),
                _ => None,
            })
            .unwrap();
        assert_eq!(*error, RuntimeError::node("f1", "boom"));
        assert_eq!(snapshot.contexts.len(), 1);

        harness.runner.stop();
        assert_eq!(harness.runner.state(), RunnerState::Idle);
        assert!(harness.runner.live_contexts().is_empty());
        assert!(harness.runner.active_context().is_none());
        assert_eq!(runtime_contexts(&harness), 0);

        // idempotent
        harness.runner.stop();
        assert_eq!(harness.runner.state(), RunnerState::Idle);
        assert_eq!(harness.sink.states().last(), Some(&RunnerState::Idle));
    }

    #[test]
    fn test_no_active_context_is_reported() {
        let doc = document(node("p1", "std-print"), node("p2", "std-print"));
        // release builds install no debug entry
        let harness = load(&doc, false);

        harness.runner.run();
        assert!(harness
            .sink
            .events()
            .iter()
            .any(|e| matches!(e, RunnerEvent::NoActiveContext)));
        assert_eq!(harness.runner.state(), RunnerState::Idle);

        harness.sink.clear();
        harness.runner.step();
        assert!(matches!(harness.sink.events().as_slice(), [RunnerEvent::NoActiveContext]));
    }

    #[test]
    fn test_disabled_breakpoints_run_to_completion() {
        let doc = document(
            node("p1", "std-print").with_breakpoint(BreakpointState::Enable),
            node("p2", "std-print").with_breakpoint(BreakpointState::Enable),
        );
        let harness = load(&doc, true);
        harness.runner.set_breakpoints_disabled(true);

        harness.runner.run();
        assert_eq!(harness.runner.state(), RunnerState::Idle);
        assert_eq!(harness.sink.states(), vec![RunnerState::Running, RunnerState::Idle]);
    }

    #[test]
    fn test_breakpoint_override() {
        let doc = document(
            node("p1", "std-print"),
            node("p2", "std-print").with_breakpoint(BreakpointState::Enable),
        );
        let harness = load(&doc, true);
        harness.runner.set_breakpoint("main", "p1", Some(BreakpointState::Enable));
        harness.runner.set_breakpoint("main", "p2", Some(BreakpointState::Disable));

        harness.runner.run();
        let snapshot = harness.sink.events().iter().rev().find_map(|e| e.snapshot().cloned()).unwrap();
        assert_eq!(snapshot.current().unwrap().run_stack[0].node_id, "p1");

        harness.runner.run();
        assert_eq!(harness.runner.state(), RunnerState::Idle);
    }

    #[test]
    fn test_pause_then_resume() {
        let doc = document(
            node("p1", "std-print").with_breakpoint(BreakpointState::Enable),
            node("p2", "std-print"),
        );
        let harness = load(&doc, true);
        harness.runner.run();
        assert_eq!(harness.runner.state(), RunnerState::Paused);

        // a pending pause request breaks at the very next check
        harness.runner.pause();
        harness.runner.run();
        assert_eq!(harness.runner.state(), RunnerState::Paused);
        let snapshot = harness.sink.events().iter().rev().find_map(|e| e.snapshot().cloned()).unwrap();
        assert_eq!(snapshot.current().unwrap().run_stack[0].node_id, "p2");

        harness.runner.run();
        assert_eq!(harness.runner.state(), RunnerState::Idle);
    }

    #[test]
    fn test_reload_tears_down_previous_program() {
        let doc = document(
            node("p1", "std-print").with_breakpoint(BreakpointState::Enable),
            node("p2", "std-print"),
        );
        let harness = load(&doc, true);
        harness.runner.run();
        assert_eq!(harness.runner.live_contexts().len(), 1);

        harness.runner.load(&doc, &compile(&doc, true)).unwrap();
        assert!(harness.runner.live_contexts().is_empty());
        assert!(!harness.runner.is_started());
        assert_eq!(harness.runner.state(), RunnerState::Idle);
    }

    #[test]
    fn test_load_rejects_foreign_text() {
        let doc = document(node("p1", "std-print"), node("p2", "std-print"));
        let harness = load(&doc, true);
        let err = harness.runner.load(&doc, "print('hello')").unwrap_err();
        assert!(matches!(err, DebuggerError::Load(_)));
    }

    #[test]
    fn test_parent_stays_active_after_nested_call() {
        let doc = document(
            node("after", "std-print").with_breakpoint(BreakpointState::Enable),
            node("last", "std-print"),
        );
        let sink = Arc::new(VecEventSink::new());
        let realm = FixedRealm {
            steps: || {
                vec![
                    Step::Nest(vec![Step::debug_node("main", "inner")]),
                    Step::debug_node("main", "after"),
                    Step::debug_node("main", "last"),
                ]
            },
        };
        let runner = DebugRunner::new(RunnerConfig::default(), Box::new(realm), sink.clone());
        runner.load(&doc, "").unwrap();

        runner.run();
        assert_eq!(runner.state(), RunnerState::Paused);
        let live = runner.live_contexts();
        assert_eq!(live.len(), 1);
        let active = runner.active_context().unwrap();
        assert_eq!(active.id(), live[0].id());

        runner.step();
        assert_eq!(runner.state(), RunnerState::Paused);
        let snapshot = sink.events().iter().rev().find_map(|e| e.snapshot().cloned()).unwrap();
        assert_eq!(snapshot.current().unwrap().run_stack[0].node_id, "last");

        runner.run();
        assert_eq!(runner.state(), RunnerState::Idle);
        assert!(runner.live_contexts().is_empty());
        assert!(!sink.events().iter().any(|e| matches!(e, RunnerEvent::NoActiveContext)));
    }

    struct ClosedSink;

    impl EventSink for ClosedSink {
        fn send(&self, _event: RunnerEvent) -> std::result::Result<(), EventError> {
            Err(EventError {
                message: "sink closed".to_string(),
            })
        }
    }

    #[test]
    fn test_undeliverable_events_do_not_stall_the_run() {
        let _ = env_logger::builder().is_test(true).try_init();
        let doc = document(
            node("p1", "std-print").with_breakpoint(BreakpointState::Enable),
            node("p2", "std-print"),
        );
        let runner = DebugRunner::new(RunnerConfig::default(), Box::new(ScriptedRealm::default()), Arc::new(ClosedSink));
        runner.load(&doc, &compile(&doc, true)).unwrap();

        runner.run();
        assert_eq!(runner.state(), RunnerState::Paused);
        runner.run();
        assert_eq!(runner.state(), RunnerState::Idle);
    }

    #[test]
    fn test_core_connector_platform() {
        let sink = Arc::new(VecEventSink::new());
        let config = RunnerConfig {
            platform: "editor".to_string(),
        };
        let runner = DebugRunner::new(config, Box::new(ScriptedRealm::default()), sink);
        assert_eq!(CoreConnector::platform(&*runner.shared), "editor");
    }
}
