//! Reference execution-context runtime
//!
//! A realm backs a loaded program with this runtime: each logical call
//! stack is an [`ExecutionContext`] holding a queue of [`Step`]s, driven one
//! step at a time by `resume`. Contexts suspend only at debug check points
//! and at nested-call boundaries. Nested calls create child contexts whose
//! completion resumes the parent.
//!
//! No lock is held while calling out to the provider, so provider callbacks
//! may resume, pause or stop contexts.

use std::collections::{BTreeMap, VecDeque};
use std::fmt;
use std::sync::{Arc, Weak};

use blueprint_graph::{GraphId, NodeId};
use parking_lot::Mutex;
use serde_json::Value;
use uuid::Uuid;

use crate::error::RuntimeError;
use crate::protocol::{ContextState, DebugContext, HostCapabilities, LiveValue};

/// Code of one generated statement
pub type StepFn = Box<dyn FnOnce(&ExecutionContext) -> Result<(), RuntimeError> + Send>;

/// Starter of an asynchronous nested call; runs the body by finishing the completion
pub type AsyncStarter = Box<dyn FnOnce(AsyncCompletion) + Send>;

/// One unit of work in a context's continuation
pub enum Step {
    Exec(StepFn),
    /// Node check point: records the node and breaks when asked to
    DebugNode { graph: GraphId, node: NodeId },
    /// Function entry check point
    DebugFunction { graph: GraphId },
    DeclareVariable { name: String, value: Value },
    /// Synchronous nested call in a child context
    Nest(Vec<Step>),
    /// Asynchronous nested call; the parent waits for the completion
    AsyncNest { starter: AsyncStarter, body: Vec<Step> },
}

impl Step {
    pub fn exec<F>(f: F) -> Self
    where
        F: FnOnce(&ExecutionContext) -> Result<(), RuntimeError> + Send + 'static,
    {
        Self::Exec(Box::new(f))
    }

    pub fn debug_node(graph: impl Into<String>, node: impl Into<String>) -> Self {
        Self::DebugNode {
            graph: graph.into(),
            node: node.into(),
        }
    }

    pub fn debug_function(graph: impl Into<String>) -> Self {
        Self::DebugFunction { graph: graph.into() }
    }

    pub fn declare(name: impl Into<String>, value: Value) -> Self {
        Self::DeclareVariable {
            name: name.into(),
            value,
        }
    }

    pub fn async_nest<F>(starter: F, body: Vec<Step>) -> Self
    where
        F: FnOnce(AsyncCompletion) + Send + 'static,
    {
        Self::AsyncNest {
            starter: Box::new(starter),
            body,
        }
    }
}

impl fmt::Debug for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exec(_) => f.write_str("Exec(..)"),
            Self::DebugNode { graph, node } => f
                .debug_struct("DebugNode")
                .field("graph", graph)
                .field("node", node)
                .finish(),
            Self::DebugFunction { graph } => f.debug_struct("DebugFunction").field("graph", graph).finish(),
            Self::DeclareVariable { name, value } => f
                .debug_struct("DeclareVariable")
                .field("name", name)
                .field("value", value)
                .finish(),
            Self::Nest(body) => f.debug_tuple("Nest").field(body).finish(),
            Self::AsyncNest { body, .. } => f.debug_struct("AsyncNest").field("body", body).finish_non_exhaustive(),
        }
    }
}

enum Flow {
    Continue,
    Suspend,
}

#[derive(Default)]
struct ContextInner {
    state: ContextState,
    node_stack: Vec<NodeId>,
    temps: BTreeMap<String, Value>,
    variables: BTreeMap<String, Value>,
    queue: VecDeque<Step>,
    /// Inside its own resume loop
    running: bool,
    step_mode: bool,
    /// Suspended until a nested child completes
    waiting: bool,
    /// A nested child completed before the parent left its resume loop
    child_done: bool,
}

/// One logical call stack of a running program
pub struct ExecutionContext {
    id: Uuid,
    graph_id: GraphId,
    parent: Option<Arc<ExecutionContext>>,
    me: Weak<ExecutionContext>,
    runtime: Weak<RuntimeShared>,
    host: HostCapabilities,
    inner: Mutex<ContextInner>,
}

impl ExecutionContext {
    /// Stable unique id of this call
    pub fn uid(&self) -> String {
        self.id.to_string()
    }

    pub fn graph(&self) -> &str {
        &self.graph_id
    }

    pub fn host(&self) -> &HostCapabilities {
        &self.host
    }

    pub fn parent_context(&self) -> Option<&Arc<ExecutionContext>> {
        self.parent.as_ref()
    }

    pub fn current_state(&self) -> ContextState {
        self.inner.lock().state
    }

    /// Write a temp slot, returning the value
    pub fn make_temp(&self, key: impl Into<String>, value: Value) -> Value {
        self.inner.lock().temps.insert(key.into(), value.clone());
        value
    }

    pub fn get_temp(&self, key: &str) -> Result<Value, RuntimeError> {
        self.inner
            .lock()
            .temps
            .get(key)
            .cloned()
            .ok_or_else(|| RuntimeError::MissingTemp(key.to_string()))
    }

    /// Run a stateless node body, writing its results to the output keys in order
    pub fn make_simple_call<F>(&self, outputs: &[String], body: F) -> Result<(), RuntimeError>
    where
        F: FnOnce() -> Result<Vec<Value>, RuntimeError>,
    {
        let values = body()?;
        let mut inner = self.inner.lock();
        for (key, value) in outputs.iter().zip(values) {
            inner.temps.insert(key.clone(), value);
        }
        Ok(())
    }

    pub fn set_variable(&self, name: &str, value: Value) {
        self.inner.lock().variables.insert(name.to_string(), value);
    }

    pub fn variable(&self, name: &str) -> Option<Value> {
        self.inner.lock().variables.get(name).cloned()
    }

    /// Drive the continuation until it completes, fails or suspends
    pub fn run(self: &Arc<Self>, step: bool) {
        {
            let mut inner = self.inner.lock();
            if inner.running || inner.waiting || inner.state == ContextState::Completed {
                return;
            }
            inner.running = true;
            inner.step_mode = step;
        }
        self.announce_active();

        loop {
            let next = self.inner.lock().queue.pop_front();
            let Some(next) = next else {
                self.finish();
                return;
            };
            if let Flow::Suspend = self.run_step(next) {
                return;
            }
        }
    }

    fn run_step(self: &Arc<Self>, step: Step) -> Flow {
        match step {
            Step::Exec(f) => match f(self.as_ref()) {
                Ok(()) => Flow::Continue,
                Err(e) => {
                    self.fail(e);
                    Flow::Suspend
                }
            },
            Step::DebugNode { graph, node } => {
                let step_mode = {
                    let mut inner = self.inner.lock();
                    match inner.node_stack.last_mut() {
                        Some(top) => *top = node.clone(),
                        None => inner.node_stack.push(node.clone()),
                    }
                    inner.step_mode
                };
                let brk = self.host.connector.take_pause_request()
                    || step_mode
                    || self.host.provider.check_break_node(&graph, &node);
                self.check_point(brk)
            }
            Step::DebugFunction { graph } => {
                let step_mode = self.inner.lock().step_mode;
                let brk = self.host.connector.take_pause_request()
                    || step_mode
                    || self.host.provider.check_debug_function(&graph);
                self.check_point(brk)
            }
            Step::DeclareVariable { name, value } => {
                self.inner.lock().variables.insert(name, value);
                Flow::Continue
            }
            Step::Nest(body) => {
                let Some(runtime) = self.runtime.upgrade() else {
                    self.fail(RuntimeError::Other("runtime stopped".to_string()));
                    return Flow::Suspend;
                };
                let step_mode = self.begin_wait();
                let child = runtime.spawn(self.graph_id.clone(), Some(Arc::clone(self)), body);
                child.run(step_mode);
                self.end_wait()
            }
            Step::AsyncNest { starter, body } => {
                self.begin_wait();
                starter(AsyncCompletion {
                    parent: Arc::clone(self),
                    body,
                });
                self.end_wait()
            }
        }
    }

    fn check_point(self: &Arc<Self>, brk: bool) -> Flow {
        if !brk {
            return Flow::Continue;
        }
        self.inner.lock().running = false;
        self.set_state(ContextState::Paused);
        Flow::Suspend
    }

    fn begin_wait(&self) -> bool {
        let mut inner = self.inner.lock();
        inner.waiting = true;
        inner.child_done = false;
        inner.step_mode
    }

    /// Continue when the child already completed, otherwise suspend until it does
    fn end_wait(self: &Arc<Self>) -> Flow {
        {
            let mut inner = self.inner.lock();
            if !inner.child_done {
                inner.running = false;
                return Flow::Suspend;
            }
            inner.waiting = false;
            inner.child_done = false;
        }
        self.announce_active();
        Flow::Continue
    }

    fn child_finished(self: &Arc<Self>, step: bool) {
        {
            let mut inner = self.inner.lock();
            if !inner.waiting {
                return;
            }
            if inner.running {
                inner.child_done = true;
                return;
            }
            inner.waiting = false;
        }
        self.run(step);
    }

    fn finish(self: &Arc<Self>) {
        let step_mode = {
            let mut inner = self.inner.lock();
            inner.running = false;
            if inner.state == ContextState::Completed {
                return;
            }
            inner.step_mode
        };
        self.set_state(ContextState::Completed);
        if let Some(runtime) = self.runtime.upgrade() {
            runtime.remove(&self.id);
        }
        if let Some(parent) = &self.parent {
            parent.child_finished(step_mode);
        }
    }

    fn fail(self: &Arc<Self>, error: RuntimeError) {
        {
            let mut inner = self.inner.lock();
            inner.queue.clear();
            inner.running = false;
            inner.state = ContextState::Paused;
        }
        log::debug!("Context {} failed: {}", self.id, error);
        self.host.provider.exception(self.as_debug(), error);
    }

    /// Discard the continuation without reporting
    fn kill(&self) {
        let mut inner = self.inner.lock();
        inner.queue.clear();
        inner.running = false;
        inner.waiting = false;
        inner.state = ContextState::Completed;
    }

    fn set_state(self: &Arc<Self>, state: ContextState) {
        {
            let mut inner = self.inner.lock();
            if inner.state == state {
                return;
            }
            inner.state = state;
        }
        self.host.provider.state_changed(self.as_debug(), state);
    }

    /// Report `Active` even when already active: the provider's current
    /// context may have been a child that just completed
    fn announce_active(self: &Arc<Self>) {
        self.inner.lock().state = ContextState::Active;
        self.host.provider.state_changed(self.as_debug(), ContextState::Active);
    }

    fn as_debug(self: &Arc<Self>) -> Arc<dyn DebugContext> {
        Arc::clone(self) as Arc<dyn DebugContext>
    }

    fn live_values(&self, variables: bool) -> Vec<LiveValue> {
        let keys: Vec<String> = {
            let inner = self.inner.lock();
            let map = if variables { &inner.variables } else { &inner.temps };
            map.keys().cloned().collect()
        };
        keys.into_iter()
            .map(|key| {
                let me = self.me.clone();
                let slot = key.clone();
                LiveValue::new(
                    key,
                    Arc::new(move || {
                        me.upgrade()
                            .and_then(|ctx| {
                                let inner = ctx.inner.lock();
                                let map = if variables { &inner.variables } else { &inner.temps };
                                map.get(&slot).cloned()
                            })
                            .unwrap_or(Value::Null)
                    }),
                )
            })
            .collect()
    }
}

impl DebugContext for ExecutionContext {
    fn id(&self) -> String {
        self.uid()
    }

    fn graph_id(&self) -> GraphId {
        self.graph_id.clone()
    }

    fn state(&self) -> ContextState {
        self.current_state()
    }

    fn parent(&self) -> Option<Arc<dyn DebugContext>> {
        self.parent.clone().map(|p| p as Arc<dyn DebugContext>)
    }

    fn node_stack(&self) -> Vec<NodeId> {
        self.inner.lock().node_stack.clone()
    }

    fn variables(&self) -> Vec<LiveValue> {
        self.live_values(true)
    }

    fn temps(&self) -> Vec<LiveValue> {
        self.live_values(false)
    }

    fn resume(&self, step: bool) {
        if let Some(me) = self.me.upgrade() {
            me.run(step);
        }
    }
}

impl fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("ExecutionContext")
            .field("id", &self.id)
            .field("graph_id", &self.graph_id)
            .field("state", &inner.state)
            .field("node_stack", &inner.node_stack)
            .field("pending", &inner.queue.len())
            .finish()
    }
}

/// Handle finishing an asynchronous nested call
///
/// Finishing runs the nested body in a child context; when the child
/// completes, the waiting parent resumes.
pub struct AsyncCompletion {
    parent: Arc<ExecutionContext>,
    body: Vec<Step>,
}

impl AsyncCompletion {
    pub fn finish(self) {
        let Some(runtime) = self.parent.runtime.upgrade() else {
            log::warn!("Async call finished after its runtime stopped");
            return;
        };
        if self.parent.current_state() == ContextState::Completed {
            log::debug!("Async call finished after its parent was torn down");
            return;
        }
        let child = runtime.spawn(self.parent.graph_id.clone(), Some(Arc::clone(&self.parent)), self.body);
        child.run(false);
    }
}

struct RuntimeShared {
    host: HostCapabilities,
    contexts: Mutex<Vec<Arc<ExecutionContext>>>,
}

impl RuntimeShared {
    fn spawn(self: &Arc<Self>, graph_id: GraphId, parent: Option<Arc<ExecutionContext>>, steps: Vec<Step>) -> Arc<ExecutionContext> {
        let context = Arc::new_cyclic(|me| ExecutionContext {
            id: Uuid::new_v4(),
            graph_id,
            parent,
            me: me.clone(),
            runtime: Arc::downgrade(self),
            host: self.host.clone(),
            inner: Mutex::new(ContextInner {
                queue: steps.into(),
                ..ContextInner::default()
            }),
        });
        self.contexts.lock().push(Arc::clone(&context));
        log::debug!("Created context {} for graph '{}'", context.id, context.graph_id);
        self.host.provider.create(context.as_debug());
        context
    }

    fn remove(&self, id: &Uuid) {
        self.contexts.lock().retain(|c| c.id != *id);
    }

    fn stop_all(&self) {
        let contexts: Vec<Arc<ExecutionContext>> = self.contexts.lock().drain(..).collect();
        for context in &contexts {
            context.kill();
        }
        if !contexts.is_empty() {
            log::debug!("Tore down {} context(s)", contexts.len());
        }
    }
}

/// Live contexts of one loaded program
///
/// Creating a runtime installs the connector's pause and stop hooks;
/// [`ProgramRuntime::start`] is the program's start primitive.
#[derive(Clone)]
pub struct ProgramRuntime {
    shared: Arc<RuntimeShared>,
}

/// Non-owning handle to a [`ProgramRuntime`]
#[derive(Clone)]
pub struct WeakProgramRuntime {
    shared: Weak<RuntimeShared>,
}

impl WeakProgramRuntime {
    pub fn upgrade(&self) -> Option<ProgramRuntime> {
        self.shared.upgrade().map(|shared| ProgramRuntime { shared })
    }
}

impl ProgramRuntime {
    pub fn new(host: HostCapabilities) -> Self {
        let shared = Arc::new(RuntimeShared {
            host,
            contexts: Mutex::new(Vec::new()),
        });

        let weak = Arc::downgrade(&shared);
        shared.host.connector.install_stop_hook(Arc::new(move || {
            if let Some(shared) = weak.upgrade() {
                shared.stop_all();
            }
        }));
        shared
            .host
            .connector
            .install_pause_hook(Arc::new(|| log::debug!("Pause requested")));

        Self { shared }
    }

    pub fn host(&self) -> &HostCapabilities {
        &self.shared.host
    }

    pub fn downgrade(&self) -> WeakProgramRuntime {
        WeakProgramRuntime {
            shared: Arc::downgrade(&self.shared),
        }
    }

    /// Create the root context of a run; the session owner resumes it
    pub fn start(&self, graph_id: impl Into<String>, steps: Vec<Step>) -> Arc<ExecutionContext> {
        self.shared.host.core.begin();
        self.shared.spawn(graph_id.into(), None, steps)
    }

    pub fn contexts(&self) -> Vec<Arc<ExecutionContext>> {
        self.shared.contexts.lock().clone()
    }

    /// Tear down every live context
    pub fn stop_all(&self) {
        self.shared.stop_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{CoreConnector, DebugConnector, DebugProvider};
    use std::sync::atomic::{AtomicBool, Ordering};

    #[derive(Debug, Clone, PartialEq)]
    enum Seen {
        Created(String),
        State(String, ContextState),
        Exception(String),
    }

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<Seen>>,
        ids: Mutex<Vec<String>>,
        breakpoints: Vec<(String, String)>,
    }

    impl Recorder {
        fn name(&self, id: &str) -> String {
            let ids = self.ids.lock();
            let index = ids.iter().position(|i| i == id).unwrap_or(usize::MAX);
            format!("ctx{}", index)
        }

        fn seen(&self) -> Vec<Seen> {
            self.seen.lock().clone()
        }
    }

    impl DebugProvider for Recorder {
        fn create(&self, context: Arc<dyn DebugContext>) {
            self.ids.lock().push(context.id());
            let name = self.name(&context.id());
            self.seen.lock().push(Seen::Created(name));
        }

        fn state_changed(&self, context: Arc<dyn DebugContext>, state: ContextState) {
            let name = self.name(&context.id());
            self.seen.lock().push(Seen::State(name, state));
        }

        fn exception(&self, context: Arc<dyn DebugContext>, error: RuntimeError) {
            let name = self.name(&context.id());
            self.seen.lock().push(Seen::Exception(format!("{}: {}", name, error)));
        }

        fn check_break_node(&self, graph_id: &str, node_id: &str) -> bool {
            self.breakpoints
                .iter()
                .any(|(g, n)| g == graph_id && n == node_id)
        }

        fn check_debug_function(&self, _graph_id: &str) -> bool {
            false
        }
    }

    struct Core {
        begun: AtomicBool,
    }

    impl CoreConnector for Core {
        fn begin(&self) {
            self.begun.store(true, Ordering::SeqCst);
        }

        fn exit(&self) {}

        fn platform(&self) -> String {
            "test".to_string()
        }
    }

    fn runtime(recorder: Arc<Recorder>) -> (ProgramRuntime, Arc<Core>) {
        let core = Arc::new(Core {
            begun: AtomicBool::new(false),
        });
        let host = HostCapabilities {
            provider: recorder,
            connector: Arc::new(DebugConnector::new()),
            core: core.clone(),
        };
        (ProgramRuntime::new(host), core)
    }

    use ContextState::{Active, Completed, Paused};

    #[test]
    fn test_runs_to_completion() {
        let recorder = Arc::new(Recorder::default());
        let (runtime, core) = runtime(recorder.clone());

        let root = runtime.start(
            "main",
            vec![
                Step::declare("v1", serde_json::json!(0)),
                Step::exec(|ctx| {
                    ctx.make_temp("n1:out", serde_json::json!(42));
                    ctx.set_variable("v1", serde_json::json!(1));
                    Ok(())
                }),
                Step::debug_node("main", "n1"),
            ],
        );
        assert!(core.begun.load(Ordering::SeqCst));
        root.run(false);

        assert_eq!(root.current_state(), Completed);
        assert_eq!(root.get_temp("n1:out").unwrap(), serde_json::json!(42));
        assert_eq!(root.variable("v1"), Some(serde_json::json!(1)));
        assert!(runtime.contexts().is_empty());
        assert_eq!(
            recorder.seen(),
            vec![
                Seen::Created("ctx0".into()),
                Seen::State("ctx0".into(), Active),
                Seen::State("ctx0".into(), Completed),
            ]
        );
    }

    #[test]
    fn test_breakpoint_then_step() {
        let recorder = Arc::new(Recorder {
            breakpoints: vec![("main".into(), "n1".into())],
            ..Recorder::default()
        });
        let (runtime, _) = runtime(recorder.clone());

        let root = runtime.start(
            "main",
            vec![
                Step::debug_node("main", "n1"),
                Step::debug_node("main", "n2"),
                Step::debug_node("main", "n3"),
            ],
        );
        root.run(false);
        assert_eq!(root.current_state(), Paused);
        assert_eq!(DebugContext::node_stack(&*root), vec!["n1".to_string()]);

        // one check point per step
        root.run(true);
        assert_eq!(root.current_state(), Paused);
        assert_eq!(DebugContext::node_stack(&*root), vec!["n2".to_string()]);

        root.run(false);
        assert_eq!(root.current_state(), Completed);
    }

    #[test]
    fn test_pause_request_breaks_at_next_check() {
        let recorder = Arc::new(Recorder::default());
        let (runtime, _) = runtime(recorder);

        let root = runtime.start(
            "main",
            vec![
                Step::exec(|ctx| {
                    ctx.host().connector.pause();
                    Ok(())
                }),
                Step::debug_node("main", "n1"),
                Step::debug_node("main", "n2"),
            ],
        );
        root.run(false);
        assert_eq!(root.current_state(), Paused);
        assert_eq!(DebugContext::node_stack(&*root), vec!["n1".to_string()]);

        root.run(false);
        assert_eq!(root.current_state(), Completed);
    }

    #[test]
    fn test_exception_discards_continuation() {
        let recorder = Arc::new(Recorder::default());
        let (runtime, _) = runtime(recorder.clone());

        let reached = Arc::new(AtomicBool::new(false));
        let flag = reached.clone();
        let root = runtime.start(
            "main",
            vec![
                Step::exec(|_| Err(RuntimeError::node("n1", "boom"))),
                Step::exec(move |_| {
                    flag.store(true, Ordering::SeqCst);
                    Ok(())
                }),
            ],
        );
        root.run(false);

        assert!(!reached.load(Ordering::SeqCst));
        assert_eq!(root.current_state(), Paused);
        assert!(recorder
            .seen()
            .contains(&Seen::Exception("ctx0: Node n1 failed: boom".into())));

        runtime.stop_all();
        assert_eq!(root.current_state(), Completed);
        assert!(runtime.contexts().is_empty());
    }

    #[test]
    fn test_nested_call_completes_before_parent_continues() {
        let recorder = Arc::new(Recorder {
            breakpoints: vec![("main".into(), "inner".into())],
            ..Recorder::default()
        });
        let (runtime, _) = runtime(recorder.clone());

        let root = runtime.start(
            "main",
            vec![
                Step::Nest(vec![
                    Step::debug_node("main", "inner"),
                    Step::exec(|ctx| {
                        ctx.make_temp("inner:out", serde_json::json!("done"));
                        Ok(())
                    }),
                ]),
                Step::debug_node("main", "after"),
            ],
        );
        root.run(false);

        // the child is paused inside the nested call, the parent waits
        let contexts = runtime.contexts();
        assert_eq!(contexts.len(), 2);
        let child = contexts
            .iter()
            .find(|c| c.parent_context().is_some())
            .cloned()
            .unwrap();
        assert_eq!(child.current_state(), Paused);
        assert_eq!(root.current_state(), Active);

        child.run(false);
        assert_eq!(child.current_state(), Completed);
        assert_eq!(root.current_state(), Completed);
        assert_eq!(DebugContext::node_stack(&*root), vec!["after".to_string()]);
        assert!(runtime.contexts().is_empty());
    }

    #[test]
    fn test_async_nest_waits_for_completion() {
        let recorder = Arc::new(Recorder::default());
        let (runtime, _) = runtime(recorder);

        let pending: Arc<Mutex<Option<AsyncCompletion>>> = Arc::new(Mutex::new(None));
        let stash = pending.clone();
        let root = runtime.start(
            "main",
            vec![
                Step::async_nest(
                    move |completion| *stash.lock() = Some(completion),
                    vec![Step::exec(|ctx| {
                        ctx.make_temp("later:out", serde_json::json!(true));
                        Ok(())
                    })],
                ),
                Step::debug_node("main", "after"),
            ],
        );
        root.run(false);
        assert_eq!(root.current_state(), Active);
        assert_eq!(runtime.contexts().len(), 1);

        let completion = pending.lock().take().unwrap();
        completion.finish();
        assert_eq!(root.current_state(), Completed);
        assert!(runtime.contexts().is_empty());
    }

    #[test]
    fn test_live_values_follow_context() {
        let recorder = Arc::new(Recorder {
            breakpoints: vec![("main".into(), "n1".into())],
            ..Recorder::default()
        });
        let (runtime, _) = runtime(recorder);

        let root = runtime.start(
            "main",
            vec![
                Step::declare("v1", serde_json::json!(1)),
                Step::debug_node("main", "n1"),
                Step::exec(|ctx| {
                    ctx.set_variable("v1", serde_json::json!(2));
                    Ok(())
                }),
                Step::debug_node("main", "n2"),
            ],
        );
        root.run(false);
        let variables = DebugContext::variables(&*root);
        assert_eq!(variables.len(), 1);
        assert_eq!(variables[0].read(), serde_json::json!(1));

        root.run(true);
        assert_eq!(variables[0].read(), serde_json::json!(2));
    }

    #[test]
    fn test_simple_call_writes_outputs() {
        let recorder = Arc::new(Recorder::default());
        let (runtime, _) = runtime(recorder);
        let root = runtime.start("main", Vec::new());

        let outputs = vec![format!("{}:sum", "add1"), format!("{}:carry", "add1")];
        root.make_simple_call(&outputs, || Ok(vec![serde_json::json!(3), serde_json::json!(false)]))
            .unwrap();
        assert_eq!(root.get_temp("add1:sum").unwrap(), serde_json::json!(3));
        assert_eq!(root.get_temp("add1:carry").unwrap(), serde_json::json!(false));
        assert!(matches!(root.get_temp("missing"), Err(RuntimeError::MissingTemp(_))));
    }
}
