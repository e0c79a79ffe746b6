//! Blueprint Debugger - interactive sessions over compiled blueprint programs
//!
//! A compiled program is loaded into an embedder-supplied [`Realm`] and
//! reaches its host only through the capabilities in [`protocol`]. The
//! [`DebugRunner`] answers the program's lifecycle callbacks and breakpoint
//! queries and drives run / pause / step / stop.
//!
//! [`context`] is a reference runtime a realm can back generated code with:
//! execution contexts as explicit step queues, suspended only at debug
//! check points and nested-call boundaries.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use blueprint_debugger::{DebugRunner, RunnerConfig, VecEventSink};
//!
//! let sink = Arc::new(VecEventSink::new());
//! let runner = DebugRunner::new(RunnerConfig::default(), Box::new(my_realm), sink.clone());
//! runner.load(&document, &source)?;
//! runner.run();
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod events;
pub mod protocol;
pub mod runner;
pub mod snapshot;

pub use config::RunnerConfig;
pub use context::{AsyncCompletion, ExecutionContext, ProgramRuntime, Step, StepFn, WeakProgramRuntime};
pub use error::{DebuggerError, Result, RuntimeError};
pub use events::{EventError, EventSink, NullEventSink, RunnerEvent, RunnerState, VecEventSink};
pub use protocol::{
    ConsoleLevel, ContextState, CoreConnector, DebugConnector, DebugContext, DebugProvider, HostCapabilities,
    LiveValue, Realm, RealmError,
};
pub use runner::DebugRunner;
pub use snapshot::{ContextSnapshot, ContextView, PauseSnapshot, StackFrame, ValueView};
