//! Host capabilities the compiled program reaches through
//!
//! A loaded program talks to its host through four fixed objects:
//!
//! 1. the debug provider ([`DebugProvider`]): context lifecycle callbacks
//!    and breakpoint queries, implemented by the runner
//! 2. the debug connector ([`DebugConnector`]): flags, hooks and the log sink
//! 3. the core connector ([`CoreConnector`]): begin/exit and platform id
//! 4. the execution context ([`DebugContext`]): passed to every generated
//!    function
//!
//! The isolation primitive itself is the embedder's [`Realm`].

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use blueprint_graph::{GraphId, NodeId};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::RuntimeError;

/// Lifecycle state of an execution context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextState {
    #[default]
    Inactive,
    Active,
    Paused,
    Completed,
}

/// Reads the current value of a variable or temp slot
pub type ValueAccessor = Arc<dyn Fn() -> serde_json::Value + Send + Sync>;

/// A named live value; reading it reflects the value at read time
#[derive(Clone)]
pub struct LiveValue {
    pub key: String,
    accessor: ValueAccessor,
}

impl LiveValue {
    pub fn new(key: impl Into<String>, accessor: ValueAccessor) -> Self {
        Self {
            key: key.into(),
            accessor,
        }
    }

    pub fn read(&self) -> serde_json::Value {
        (self.accessor)()
    }
}

impl fmt::Debug for LiveValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveValue")
            .field("key", &self.key)
            .field("value", &self.read())
            .finish()
    }
}

/// One logical call stack of the running program
pub trait DebugContext: Send + Sync {
    /// Unique id of this context
    fn id(&self) -> String;
    /// Graph whose code this context runs
    fn graph_id(&self) -> GraphId;
    fn state(&self) -> ContextState;
    fn parent(&self) -> Option<Arc<dyn DebugContext>>;
    /// Ids of the execute nodes on this context's stack, outermost first
    fn node_stack(&self) -> Vec<NodeId>;
    fn variables(&self) -> Vec<LiveValue>;
    fn temps(&self) -> Vec<LiveValue>;
    /// Continue execution; in step mode, pause again at the next check point
    fn resume(&self, step: bool);
}

/// Lifecycle callbacks and breakpoint queries answered by the session owner
pub trait DebugProvider: Send + Sync {
    /// A context was created
    fn create(&self, context: Arc<dyn DebugContext>);
    /// A context entered `state`
    fn state_changed(&self, context: Arc<dyn DebugContext>, state: ContextState);
    /// A context failed; its remaining work is discarded
    fn exception(&self, context: Arc<dyn DebugContext>, error: RuntimeError);
    fn check_break_node(&self, graph_id: &str, node_id: &str) -> bool;
    fn check_debug_function(&self, graph_id: &str) -> bool;
}

/// Lifecycle notifications from the program
pub trait CoreConnector: Send + Sync {
    fn begin(&self);
    fn exit(&self);
    fn platform(&self) -> String;
}

pub type Hook = Arc<dyn Fn() + Send + Sync>;

/// Console level of a program log message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsoleLevel {
    Log,
    Info,
    Warn,
    Error,
}

/// Flags and hooks shared between the runner and the loaded program
///
/// The program installs its debug entry hook here; the runtime installs
/// the pause and stop hooks; the runner flips the flags.
#[derive(Default)]
pub struct DebugConnector {
    connected: AtomicBool,
    paused: AtomicBool,
    step_mode: AtomicBool,
    entry: Mutex<Option<Hook>>,
    pause_hook: Mutex<Option<Hook>>,
    stop_hook: Mutex<Option<Hook>>,
}

impl DebugConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    pub fn set_connected(&self, value: bool) {
        self.connected.store(value, Ordering::SeqCst);
    }

    /// Whether a pause has been requested and not yet taken
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    pub fn set_paused(&self, value: bool) {
        self.paused.store(value, Ordering::SeqCst);
    }

    /// Take a pending pause request
    pub fn take_pause_request(&self) -> bool {
        self.paused.swap(false, Ordering::SeqCst)
    }

    pub fn is_step_mode(&self) -> bool {
        self.step_mode.load(Ordering::SeqCst)
    }

    pub fn set_step_mode(&self, value: bool) {
        self.step_mode.store(value, Ordering::SeqCst);
    }

    /// Install the program's debug entry hook
    pub fn install_entry(&self, hook: Hook) {
        *self.entry.lock() = Some(hook);
    }

    pub fn has_entry(&self) -> bool {
        self.entry.lock().is_some()
    }

    /// Invoke the debug entry hook; false when the program installed none
    pub fn invoke_entry(&self) -> bool {
        let hook = self.entry.lock().clone();
        match hook {
            Some(hook) => {
                hook();
                true
            }
            None => false,
        }
    }

    pub fn install_pause_hook(&self, hook: Hook) {
        *self.pause_hook.lock() = Some(hook);
    }

    pub fn install_stop_hook(&self, hook: Hook) {
        *self.stop_hook.lock() = Some(hook);
    }

    /// Request a pause at the next check point
    pub fn pause(&self) {
        self.set_paused(true);
        let hook = self.pause_hook.lock().clone();
        if let Some(hook) = hook {
            hook();
        }
    }

    /// Tear down the running program
    pub fn stop(&self) {
        self.set_paused(false);
        self.set_step_mode(false);
        let hook = self.stop_hook.lock().clone();
        if let Some(hook) = hook {
            hook();
        }
    }

    /// Program console output
    pub fn console(&self, level: ConsoleLevel, tag: &str, message: &str) {
        match level {
            ConsoleLevel::Log => log::debug!(target: "blueprint::program", "[{}] {}", tag, message),
            ConsoleLevel::Info => log::info!(target: "blueprint::program", "[{}] {}", tag, message),
            ConsoleLevel::Warn => log::warn!(target: "blueprint::program", "[{}] {}", tag, message),
            ConsoleLevel::Error => log::error!(target: "blueprint::program", "[{}] {}", tag, message),
        }
    }

    pub fn report_error(&self, error: &dyn std::error::Error) {
        log::error!(target: "blueprint::program", "{}", error);
    }
}

impl fmt::Debug for DebugConnector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DebugConnector")
            .field("connected", &self.is_connected())
            .field("paused", &self.is_paused())
            .field("step_mode", &self.is_step_mode())
            .field("entry", &self.has_entry())
            .finish()
    }
}

/// Everything the realm exposes to a loaded program
#[derive(Clone)]
pub struct HostCapabilities {
    pub provider: Arc<dyn DebugProvider>,
    pub connector: Arc<DebugConnector>,
    pub core: Arc<dyn CoreConnector>,
}

/// Error returned by a realm that could not load a program
pub type RealmError = Box<dyn std::error::Error + Send + Sync>;

/// Isolated evaluation realm
///
/// Evaluating a program replaces whatever the realm held before. The
/// program reaches the host only through `host`.
pub trait Realm: Send {
    fn evaluate(&mut self, source: &str, host: HostCapabilities) -> Result<(), RealmError>;
}
