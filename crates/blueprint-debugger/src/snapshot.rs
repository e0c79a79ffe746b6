//! Pause snapshots
//!
//! A snapshot lists the triggering context with its parent chain first,
//! then every other parentless live context. Run stacks are resolved
//! against the loaded document's graphs.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use blueprint_graph::{Graph, GraphId, NodeId, NodeInstance};
use serde::Serialize;

use crate::protocol::{ContextState, DebugContext, LiveValue};

/// One entry of a context's run stack
#[derive(Debug, Clone)]
pub struct StackFrame {
    pub node_id: NodeId,
    /// The node as it appears in the document; absent when the id no longer resolves
    pub node: Option<NodeInstance>,
}

#[derive(Debug, Clone)]
pub struct ContextSnapshot {
    pub context_id: String,
    pub graph_id: GraphId,
    pub graph: Option<Arc<Graph>>,
    pub state: ContextState,
    pub variables: Vec<LiveValue>,
    pub temps: Vec<LiveValue>,
    pub run_stack: Vec<StackFrame>,
    pub parent: Option<Box<ContextSnapshot>>,
}

impl ContextSnapshot {
    fn capture(
        context: &Arc<dyn DebugContext>,
        graphs: &HashMap<GraphId, Arc<Graph>>,
        added: &mut HashSet<String>,
    ) -> Self {
        let context_id = context.id();
        added.insert(context_id.clone());

        let graph_id = context.graph_id();
        let graph = graphs.get(&graph_id).cloned();
        if graph.is_none() {
            log::warn!("Context {} runs unknown graph '{}'", context_id, graph_id);
        }

        let run_stack = context
            .node_stack()
            .into_iter()
            .map(|node_id| {
                let node = graph.as_ref().and_then(|g| g.find_node(&node_id)).cloned();
                if node.is_none() {
                    log::warn!("Node '{}' not found in graph '{}'", node_id, graph_id);
                }
                StackFrame { node_id, node }
            })
            .collect();

        let parent = context
            .parent()
            .map(|p| Box::new(Self::capture(&p, graphs, added)));

        Self {
            context_id,
            graph_id,
            graph,
            state: context.state(),
            variables: context.variables(),
            temps: context.temps(),
            run_stack,
            parent,
        }
    }

    /// Read every live value now
    pub fn resolve(&self) -> ContextView {
        ContextView {
            context_id: self.context_id.clone(),
            graph_id: self.graph_id.clone(),
            state: self.state,
            variables: self.variables.iter().map(ValueView::read).collect(),
            temps: self.temps.iter().map(ValueView::read).collect(),
            run_stack: self.run_stack.iter().map(|f| f.node_id.clone()).collect(),
            parent: self.parent.as_ref().map(|p| Box::new(p.resolve())),
        }
    }
}

/// Contexts captured when execution paused or failed
#[derive(Debug, Clone, Default)]
pub struct PauseSnapshot {
    pub contexts: Vec<ContextSnapshot>,
}

impl PauseSnapshot {
    pub fn capture(
        trigger: &Arc<dyn DebugContext>,
        live: &[Arc<dyn DebugContext>],
        graphs: &HashMap<GraphId, Arc<Graph>>,
    ) -> Self {
        let mut added = HashSet::new();
        let mut contexts = vec![ContextSnapshot::capture(trigger, graphs, &mut added)];

        for context in live {
            if context.parent().is_some() || added.contains(&context.id()) {
                continue;
            }
            contexts.push(ContextSnapshot::capture(context, graphs, &mut added));
        }

        Self { contexts }
    }

    /// The context that triggered the pause
    pub fn current(&self) -> Option<&ContextSnapshot> {
        self.contexts.first()
    }

    pub fn resolve(&self) -> Vec<ContextView> {
        self.contexts.iter().map(ContextSnapshot::resolve).collect()
    }
}

/// A value read out of a snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueView {
    pub key: String,
    pub value: serde_json::Value,
}

impl ValueView {
    fn read(live: &LiveValue) -> Self {
        Self {
            key: live.key.clone(),
            value: live.read(),
        }
    }
}

/// Serializable view of a captured context
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextView {
    pub context_id: String,
    pub graph_id: GraphId,
    pub state: ContextState,
    pub variables: Vec<ValueView>,
    pub temps: Vec<ValueView>,
    pub run_stack: Vec<NodeId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<Box<ContextView>>,
}
