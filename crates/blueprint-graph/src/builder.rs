//! Fluent builders for graphs and documents
//!
//! Provides a fluent API for constructing blueprint graphs programmatically.

use crate::types::{Connector, Document, Graph, GraphType, NodeInstance, PortRef, Variable};

/// Fluent builder for constructing graphs
///
/// # Example
///
/// ```ignore
/// let graph = GraphBuilder::new("main", GraphType::Main)
///     .add_node(NodeInstance::new("entry", "core.entry").output(Port::execute("out")))
///     .add_node(NodeInstance::new("log-1", "std.log").input(Port::execute("in")))
///     .connect("entry", "out", "log-1", "in")
///     .build();
/// ```
pub struct GraphBuilder {
    graph: Graph,
    connector_counter: usize,
}

impl GraphBuilder {
    /// Create a new graph builder
    pub fn new(id: impl Into<String>, graph_type: GraphType) -> Self {
        Self {
            graph: Graph::new(id, graph_type),
            connector_counter: 0,
        }
    }

    /// Set the display name
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.graph.name = name.into();
        self
    }

    /// Add a node instance
    pub fn add_node(mut self, node: NodeInstance) -> Self {
        self.graph.nodes.push(node);
        self
    }

    /// Declare a graph variable
    pub fn add_variable(mut self, variable: Variable) -> Self {
        self.graph.variables.push(variable);
        self
    }

    /// Nest a child graph
    pub fn add_child(mut self, child: Graph) -> Self {
        self.graph.children.push(child);
        self
    }

    /// Connect an output port to an input port (auto-generates connector ID)
    pub fn connect(
        mut self,
        from_node: impl Into<String>,
        from_port: impl Into<String>,
        to_node: impl Into<String>,
        to_port: impl Into<String>,
    ) -> Self {
        self.connector_counter += 1;
        self.graph.connectors.push(Connector {
            id: format!("connector-{}", self.connector_counter),
            from: PortRef::new(from_node, from_port),
            to: PortRef::new(to_node, to_port),
        });
        self
    }

    /// Build the graph without validation
    pub fn build(self) -> Graph {
        self.graph
    }
}

/// Fluent builder for documents
pub struct DocumentBuilder {
    document: Document,
}

impl DocumentBuilder {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            document: Document::new(id, name),
        }
    }

    /// Set the main graph
    pub fn main_graph(mut self, graph: Graph) -> Self {
        self.document.main_graph = Some(graph);
        self
    }

    pub fn build(self) -> Document {
        self.document
    }
}
