//! Core types for blueprint documents
//!
//! These types define the structure of a blueprint document: graphs,
//! node instances, their ports, and the connectors between ports.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Unique identifier for a node instance
pub type NodeId = String;

/// Identifier of a port, unique within its node
pub type PortId = String;

/// Unique identifier for a graph
pub type GraphId = String;

/// Unique identifier for a connector
pub type ConnectorId = String;

/// Direction of a port relative to its node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortDirection {
    Input,
    Output,
}

/// What a port carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortKind {
    /// Control flow
    Execute,
    /// A value
    Data,
}

/// A literal value stored on a port or variable
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum PortValue {
    #[default]
    Undefined,
    Null,
    Boolean(bool),
    Number(f64),
    /// Arbitrary precision integer in decimal form
    BigInt(String),
    String(String),
    /// Structured value embedded through its serialized form
    Structured(serde_json::Value),
    /// Host value without a serialized form, named by its type
    Opaque(String),
}

impl From<serde_json::Value> for PortValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => PortValue::Null,
            serde_json::Value::Bool(b) => PortValue::Boolean(b),
            serde_json::Value::Number(n) => match n.as_f64() {
                Some(f) => PortValue::Number(f),
                None => PortValue::BigInt(n.to_string()),
            },
            serde_json::Value::String(s) => PortValue::String(s),
            other => PortValue::Structured(other),
        }
    }
}

/// Breakpoint flag on a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakpointState {
    #[default]
    None,
    Enable,
    Disable,
}

/// A port on a node instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Port {
    /// Port guid, unique within the node type
    pub id: PortId,
    /// Human-readable name
    pub name: String,
    pub direction: PortDirection,
    pub kind: PortKind,
    /// Declared value type (empty for execute ports)
    #[serde(default)]
    pub data_type: String,
    /// Literal used when the port is not connected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<PortValue>,
}

impl Port {
    /// Create an execute (control flow) port
    pub fn execute(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            direction: PortDirection::Input,
            kind: PortKind::Execute,
            data_type: String::new(),
            default_value: None,
        }
    }

    /// Create a data port of the given declared type
    pub fn data(id: impl Into<String>, data_type: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            direction: PortDirection::Input,
            kind: PortKind::Data,
            data_type: data_type.into(),
            default_value: None,
        }
    }

    /// Set the display name
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the literal used when the port is unconnected
    pub fn with_default(mut self, value: impl Into<PortValue>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn is_execute(&self) -> bool {
        self.kind == PortKind::Execute
    }
}

impl From<bool> for PortValue {
    fn from(value: bool) -> Self {
        PortValue::Boolean(value)
    }
}

impl From<f64> for PortValue {
    fn from(value: f64) -> Self {
        PortValue::Number(value)
    }
}

impl From<&str> for PortValue {
    fn from(value: &str) -> Self {
        PortValue::String(value.to_string())
    }
}

/// A node instance in a graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeInstance {
    /// Unique identifier for this instance
    pub id: NodeId,
    /// Guid of the node type (shared by every instance of the type)
    pub type_guid: String,
    /// Human-readable name
    #[serde(default)]
    pub name: String,
    /// Ordered input ports
    #[serde(default)]
    pub inputs: Vec<Port>,
    /// Ordered output ports
    #[serde(default)]
    pub outputs: Vec<Port>,
    #[serde(default)]
    pub breakpoint: BreakpointState,
}

impl NodeInstance {
    pub fn new(id: impl Into<String>, type_guid: impl Into<String>) -> Self {
        let type_guid = type_guid.into();
        Self {
            id: id.into(),
            name: type_guid.clone(),
            type_guid,
            inputs: Vec::new(),
            outputs: Vec::new(),
            breakpoint: BreakpointState::None,
        }
    }

    /// Set the display name
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Append an input port
    pub fn input(mut self, mut port: Port) -> Self {
        port.direction = PortDirection::Input;
        self.inputs.push(port);
        self
    }

    /// Append an output port
    pub fn output(mut self, mut port: Port) -> Self {
        port.direction = PortDirection::Output;
        self.outputs.push(port);
        self
    }

    pub fn with_breakpoint(mut self, state: BreakpointState) -> Self {
        self.breakpoint = state;
        self
    }

    pub fn find_input(&self, port_id: &str) -> Option<&Port> {
        self.inputs.iter().find(|p| p.id == port_id)
    }

    pub fn find_output(&self, port_id: &str) -> Option<&Port> {
        self.outputs.iter().find(|p| p.id == port_id)
    }

    /// Find a port in either direction
    pub fn find_port(&self, port_id: &str, direction: PortDirection) -> Option<&Port> {
        match direction {
            PortDirection::Input => self.find_input(port_id),
            PortDirection::Output => self.find_output(port_id),
        }
    }

    /// Input data ports, in declaration order
    pub fn data_inputs(&self) -> impl Iterator<Item = &Port> {
        self.inputs.iter().filter(|p| !p.is_execute())
    }

    /// Output data ports, in declaration order
    pub fn data_outputs(&self) -> impl Iterator<Item = &Port> {
        self.outputs.iter().filter(|p| !p.is_execute())
    }

    /// Input execute ports, in declaration order
    pub fn execute_inputs(&self) -> impl Iterator<Item = &Port> {
        self.inputs.iter().filter(|p| p.is_execute())
    }

    /// Output execute ports, in declaration order
    pub fn execute_outputs(&self) -> impl Iterator<Item = &Port> {
        self.outputs.iter().filter(|p| p.is_execute())
    }

    /// Short description used in diagnostics: `name (id, type)`
    pub fn describe(&self) -> String {
        format!("{} ({}, {})", self.name, self.id, self.type_guid)
    }
}

/// One end of a connector
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortRef {
    pub node: NodeId,
    pub port: PortId,
}

impl PortRef {
    pub fn new(node: impl Into<String>, port: impl Into<String>) -> Self {
        Self {
            node: node.into(),
            port: port.into(),
        }
    }
}

/// A directed edge from an output port to an input port
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connector {
    pub id: ConnectorId,
    /// Producer (output) end
    pub from: PortRef,
    /// Consumer (input) end
    pub to: PortRef,
}

/// Declared kind of a graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphType {
    Main,
    Function,
    Static,
    Constructor,
    Class,
    Subgraph,
}

/// A variable declared on a graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    pub name: String,
    #[serde(default)]
    pub default_value: PortValue,
}

impl Variable {
    pub fn new(name: impl Into<String>, default_value: impl Into<PortValue>) -> Self {
        Self {
            name: name.into(),
            default_value: default_value.into(),
        }
    }
}

/// A graph: nodes, connectors, variables and nested child graphs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Graph {
    pub id: GraphId,
    #[serde(default)]
    pub name: String,
    pub graph_type: GraphType,
    #[serde(default)]
    pub nodes: Vec<NodeInstance>,
    #[serde(default)]
    pub connectors: Vec<Connector>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variables: Vec<Variable>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Graph>,
}

impl Graph {
    /// Create a new empty graph
    pub fn new(id: impl Into<String>, graph_type: GraphType) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            graph_type,
            nodes: Vec::new(),
            connectors: Vec::new(),
            variables: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Find a node by ID
    pub fn find_node(&self, id: &str) -> Option<&NodeInstance> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Find a node by ID (mutable)
    pub fn find_node_mut(&mut self, id: &str) -> Option<&mut NodeInstance> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    /// First node whose type guid matches
    pub fn find_node_by_type(&self, type_guid: &str) -> Option<&NodeInstance> {
        self.nodes.iter().find(|n| n.type_guid == type_guid)
    }

    /// Connectors leaving the given output port
    pub fn connectors_from<'a>(
        &'a self,
        node_id: &'a str,
        port_id: &'a str,
    ) -> impl Iterator<Item = &'a Connector> + 'a {
        self.connectors
            .iter()
            .filter(move |c| c.from.node == node_id && c.from.port == port_id)
    }

    /// Connectors arriving at the given input port
    pub fn connectors_into<'a>(
        &'a self,
        node_id: &'a str,
        port_id: &'a str,
    ) -> impl Iterator<Item = &'a Connector> + 'a {
        self.connectors
            .iter()
            .filter(move |c| c.to.node == node_id && c.to.port == port_id)
    }

    /// Number of consumers of an output port
    pub fn fan_out(&self, node_id: &str, port_id: &str) -> usize {
        self.connectors_from(node_id, port_id).count()
    }

    /// Connectors leaving the node's execute outputs, in port declaration order
    pub fn execute_successors<'a>(&'a self, node: &'a NodeInstance) -> Vec<&'a Connector> {
        node.execute_outputs()
            .flat_map(|port| self.connectors_from(&node.id, &port.id))
            .collect()
    }

    /// Find a descendant graph by ID (depth-first)
    pub fn find_child(&self, id: &str) -> Option<&Graph> {
        for child in &self.children {
            if child.id == id {
                return Some(child);
            }
            if let Some(found) = child.find_child(id) {
                return Some(found);
            }
        }
        None
    }

    /// Visit this graph and every descendant, children before parents
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Graph)) {
        for child in &self.children {
            child.walk(visit);
        }
        visit(self);
    }
}

/// A blueprint document
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub main_graph: Option<Graph>,
}

impl Document {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            main_graph: None,
        }
    }

    /// Find the main graph or any of its descendants by ID
    pub fn find_graph(&self, id: &str) -> Option<&Graph> {
        let main = self.main_graph.as_ref()?;
        if main.id == id {
            return Some(main);
        }
        main.find_child(id)
    }

    /// Flat map of every graph in the document by ID
    pub fn graph_map(&self) -> HashMap<GraphId, &Graph> {
        let mut map = HashMap::new();
        if let Some(main) = &self.main_graph {
            main.walk(&mut |g| {
                map.insert(g.id.clone(), g);
            });
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_graph() -> Graph {
        let mut graph = Graph::new("g", GraphType::Main);
        graph.nodes.push(
            NodeInstance::new("a", "t.branch")
                .output(Port::execute("then"))
                .output(Port::execute("else"))
                .output(Port::data("value", "number")),
        );
        graph.nodes.push(NodeInstance::new("b", "t.print").input(Port::execute("in")));
        graph.nodes.push(NodeInstance::new("c", "t.print").input(Port::execute("in")));
        graph.connectors.push(Connector {
            id: "c1".to_string(),
            from: PortRef::new("a", "else"),
            to: PortRef::new("c", "in"),
        });
        graph.connectors.push(Connector {
            id: "c2".to_string(),
            from: PortRef::new("a", "then"),
            to: PortRef::new("b", "in"),
        });
        graph
    }

    #[test]
    fn test_execute_successors_follow_port_order() {
        let graph = make_graph();
        let node = graph.find_node("a").unwrap();
        let targets: Vec<&str> = graph
            .execute_successors(node)
            .iter()
            .map(|c| c.to.node.as_str())
            .collect();
        assert_eq!(targets, vec!["b", "c"]);
    }

    #[test]
    fn test_port_direction_set_by_node() {
        let node = NodeInstance::new("n", "t").input(Port::data("x", "number")).output(Port::data("y", "number"));
        assert_eq!(node.inputs[0].direction, PortDirection::Input);
        assert_eq!(node.outputs[0].direction, PortDirection::Output);
        assert_eq!(node.data_outputs().count(), 1);
        assert_eq!(node.execute_outputs().count(), 0);
    }

    #[test]
    fn test_fan_out() {
        let graph = make_graph();
        assert_eq!(graph.fan_out("a", "then"), 1);
        assert_eq!(graph.fan_out("a", "value"), 0);
    }

    #[test]
    fn test_graph_map_includes_children() {
        let mut main = Graph::new("main", GraphType::Main);
        let mut func = Graph::new("func", GraphType::Function);
        func.children.push(Graph::new("inner", GraphType::Static));
        main.children.push(func);
        let doc = Document {
            id: "doc".to_string(),
            name: "Doc".to_string(),
            main_graph: Some(main),
        };

        let map = doc.graph_map();
        assert_eq!(map.len(), 3);
        assert!(doc.find_graph("inner").is_some());
        assert!(doc.find_graph("missing").is_none());
    }

    #[test]
    fn test_port_value_from_json() {
        assert_eq!(PortValue::from(serde_json::json!(null)), PortValue::Null);
        assert_eq!(PortValue::from(serde_json::json!(2)), PortValue::Number(2.0));
        assert_eq!(
            PortValue::from(serde_json::json!({"x": 1})),
            PortValue::Structured(serde_json::json!({"x": 1}))
        );
    }

    #[test]
    fn test_document_json_shape() {
        let json = serde_json::json!({
            "id": "doc",
            "mainGraph": {
                "id": "main",
                "graphType": "main",
                "nodes": [{
                    "id": "n1",
                    "typeGuid": "core-entry",
                    "outputs": [{"id": "out", "name": "Out", "direction": "output", "kind": "execute"}],
                    "breakpoint": "enable"
                }]
            }
        });
        let doc: Document = serde_json::from_value(json).unwrap();
        let main = doc.main_graph.unwrap();
        assert_eq!(main.nodes[0].breakpoint, BreakpointState::Enable);
        assert!(main.nodes[0].outputs[0].is_execute());
    }
}
