//! Blueprint Graph - document model for visual node programs
//!
//! A blueprint document is a tree of graphs. Each graph owns its nodes and
//! the connectors between their ports. Ports are either *execute* ports
//! (control flow) or *data* ports (values).
//!
//! The model is arena-shaped: connectors refer to ports by `(node id, port
//! id)` pairs rather than by reference, so a graph can be serialized,
//! cloned and traversed with explicit visited sets.
//!
//! # Example
//!
//! ```ignore
//! use blueprint_graph::{GraphBuilder, GraphType, NodeInstance, Port};
//!
//! let graph = GraphBuilder::new("g-main", GraphType::Main)
//!     .add_node(NodeInstance::new("entry", "core.entry").output(Port::execute("out")))
//!     .add_node(NodeInstance::new("print-1", "std.print").input(Port::execute("in")))
//!     .connect("entry", "out", "print-1", "in")
//!     .build();
//! ```

pub mod builder;
pub mod types;
pub mod validation;

pub use builder::{DocumentBuilder, GraphBuilder};
pub use types::{
    BreakpointState, Connector, ConnectorId, Document, Graph, GraphId, GraphType, NodeId,
    NodeInstance, Port, PortDirection, PortId, PortKind, PortRef, PortValue, Variable,
};
pub use validation::{validate_document, validate_graph, ValidationError};
