//! Structural validation for blueprint graphs
//!
//! Checks connector endpoints, port directions, port kinds and node id
//! uniqueness. Cycles are not rejected here: whether a cycle is legal
//! depends on the compile settings of the nodes it passes through.

use std::collections::HashSet;

use crate::types::{Connector, Document, Graph, PortDirection, PortKind};

/// Validation error with location context
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Two nodes in the same graph share an id
    DuplicateNode { graph_id: String, node_id: String },
    /// A connector references a node that is not in the graph
    UnknownNode {
        connector_id: String,
        node_id: String,
    },
    /// A connector references a port the node does not declare
    /// in the expected direction
    UnknownPort {
        connector_id: String,
        node_id: String,
        port_id: String,
    },
    /// A connector joins an execute port to a data port
    KindMismatch { connector_id: String },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateNode { graph_id, node_id } => {
                write!(f, "Graph '{}' contains node '{}' more than once", graph_id, node_id)
            }
            Self::UnknownNode {
                connector_id,
                node_id,
            } => {
                write!(
                    f,
                    "Connector '{}' references unknown node '{}'",
                    connector_id, node_id
                )
            }
            Self::UnknownPort {
                connector_id,
                node_id,
                port_id,
            } => {
                write!(
                    f,
                    "Connector '{}' references unknown port '{}' on node '{}'",
                    connector_id, port_id, node_id
                )
            }
            Self::KindMismatch { connector_id } => {
                write!(
                    f,
                    "Connector '{}' joins an execute port to a data port",
                    connector_id
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate one graph (not its children)
///
/// Returns all validation errors found (not just the first).
pub fn validate_graph(graph: &Graph) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    validate_unique_nodes(graph, &mut errors);
    for connector in &graph.connectors {
        validate_connector(graph, connector, &mut errors);
    }

    errors
}

/// Validate every graph in a document
pub fn validate_document(document: &Document) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if let Some(main) = &document.main_graph {
        main.walk(&mut |graph| errors.extend(validate_graph(graph)));
    }
    errors
}

fn validate_unique_nodes(graph: &Graph, errors: &mut Vec<ValidationError>) {
    let mut seen: HashSet<&str> = HashSet::new();
    for node in &graph.nodes {
        if !seen.insert(node.id.as_str()) {
            errors.push(ValidationError::DuplicateNode {
                graph_id: graph.id.clone(),
                node_id: node.id.clone(),
            });
        }
    }
}

/// Check that both ends exist, point the right way and carry the same kind
fn validate_connector(graph: &Graph, connector: &Connector, errors: &mut Vec<ValidationError>) {
    let mut kinds: Vec<PortKind> = Vec::with_capacity(2);

    for (end, direction) in [
        (&connector.from, PortDirection::Output),
        (&connector.to, PortDirection::Input),
    ] {
        let Some(node) = graph.find_node(&end.node) else {
            errors.push(ValidationError::UnknownNode {
                connector_id: connector.id.clone(),
                node_id: end.node.clone(),
            });
            continue;
        };
        match node.find_port(&end.port, direction) {
            Some(port) => kinds.push(port.kind),
            None => errors.push(ValidationError::UnknownPort {
                connector_id: connector.id.clone(),
                node_id: end.node.clone(),
                port_id: end.port.clone(),
            }),
        }
    }

    if kinds.len() == 2 && kinds[0] != kinds[1] {
        errors.push(ValidationError::KindMismatch {
            connector_id: connector.id.clone(),
        });
    }
}
