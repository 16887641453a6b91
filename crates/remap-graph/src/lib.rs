#![forbid(unsafe_code)]

//! remap pipeline-topology vocabulary.
//!
//! This crate is **contract-only**: no pixels, no device handles, no shader
//! math. It describes the wiring of a multisampled sample-map pipeline:
//! per-sample chains (scene position → sub-pixel offset → sample map) fanned
//! into a single resampling/averaging node.
//!
//! Execution is intentionally minimal: `compile()` returns a lightweight
//! `Plan` that preserves ordering and connectivity, leaving evaluation to
//! runtime crates. Topology is a pure function of the structural parameters
//! (sample count); rebuilding on a structural change means building a fresh
//! `Graph`, never mutating a compiled one.
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_debug_implementations)]

use remap_core::EngineError;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PortId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortDir {
    In,
    Out,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Endpoint {
    pub node: NodeId,
    pub port: PortId,
    pub dir: PortDir,
}

#[derive(Debug, Clone)]
pub struct Edge {
    pub from: Endpoint, // Out
    pub to: Endpoint,   // In
}

/// High-level class of a node in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeClass {
    Source,
    Processor,
    Combiner,
    Output,
}

/// Node kinds of the sample-map pipeline.
///
/// Keep this enum small: the pattern needs exactly the stages below, and new
/// kinds should only be added when a runtime can realize them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    // Sources
    /// Emits the 2D coordinate of the pixel being rendered.
    ScenePosition,
    /// Host-provided addressable input image.
    SourceImage,
    /// Output-only shader that computes a color directly (no resampling).
    GenerativeShader,

    // Processors
    /// Adds a per-sample sub-pixel offset to incoming positions.
    OffsetAdd,
    /// Evaluates a sample-map shader: position in, source position out.
    SampleMap,

    // Combiners
    /// Fetches the source image at each sample-map position and averages.
    ///
    /// Ports: src, map0..map{N-1}, out. `maps` is the fan-in width and is
    /// fixed at node creation; changing it means rebuilding the graph.
    Resample { maps: u8 },

    // Outputs
    PixelsOut,
}

impl NodeKind {
    pub fn class(&self) -> NodeClass {
        use NodeKind::*;
        match self {
            ScenePosition | SourceImage | GenerativeShader => NodeClass::Source,
            OffsetAdd | SampleMap => NodeClass::Processor,
            Resample { .. } => NodeClass::Combiner,
            PixelsOut => NodeClass::Output,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Port {
    pub id: PortId,
    pub name: String,
    pub dir: PortDir,
}

#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    pub ports: Vec<Port>,
}

#[derive(Debug, Default)]
pub struct Graph {
    next_node: u32,
    next_port: u32,
    nodes: HashMap<NodeId, Node>,
    edges: Vec<Edge>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn add_node(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.next_node);
        self.next_node += 1;

        // Port conventions by class; Resample overrides them for its
        // sample-count-sized fan-in.
        let ports = match kind {
            NodeKind::Resample { maps } => {
                let mut ports = vec![self.new_port("src", PortDir::In)];
                for i in 0..maps {
                    ports.push(self.new_port(format!("map{i}"), PortDir::In));
                }
                ports.push(self.new_port("out", PortDir::Out));
                ports
            }
            _ => match kind.class() {
                NodeClass::Source => vec![self.new_port("out", PortDir::Out)],
                NodeClass::Processor => vec![
                    self.new_port("in", PortDir::In),
                    self.new_port("out", PortDir::Out),
                ],
                NodeClass::Combiner => unreachable!("combiners declare their own ports"),
                NodeClass::Output => vec![self.new_port("in", PortDir::In)],
            },
        };

        let node = Node { id, kind, ports };
        self.nodes.insert(id, node);
        id
    }

    fn new_port(&mut self, name: impl Into<String>, dir: PortDir) -> Port {
        let id = PortId(self.next_port);
        self.next_port += 1;
        Port {
            id,
            name: name.into(),
            dir,
        }
    }

    pub fn find_port(&self, node: NodeId, name: &str, dir: PortDir) -> Option<PortId> {
        self.nodes.get(&node).and_then(|n| {
            n.ports
                .iter()
                .find(|p| p.dir == dir && p.name == name)
                .map(|p| p.id)
        })
    }

    /// Connect `from` (Out) → `to` (In).
    pub fn connect(&mut self, from: Endpoint, to: Endpoint) -> Result<(), EngineError> {
        if from.dir != PortDir::Out {
            return Err(EngineError::other("connect: from endpoint must be Out"));
        }
        if to.dir != PortDir::In {
            return Err(EngineError::other("connect: to endpoint must be In"));
        }
        if !self.nodes.contains_key(&from.node) || !self.nodes.contains_key(&to.node) {
            return Err(EngineError::other("connect: node not found"));
        }

        // Ensure the referenced ports actually belong to the specified nodes.
        {
            let from_ok = self
                .nodes
                .get(&from.node)
                .and_then(|n| n.ports.iter().find(|p| p.id == from.port))
                .is_some();
            if !from_ok {
                return Err(EngineError::other("connect: from port not found on node"));
            }
            let to_ok = self
                .nodes
                .get(&to.node)
                .and_then(|n| n.ports.iter().find(|p| p.id == to.port))
                .is_some();
            if !to_ok {
                return Err(EngineError::other("connect: to port not found on node"));
            }
        }
        // Prevent multiple drivers of the same input.
        if self.edges.iter().any(|e| e.to == to) {
            return Err(EngineError::other("connect: input already connected"));
        }
        self.edges.push(Edge { from, to });
        Ok(())
    }

    /// Convenience: connect by port names using the default conventions.
    pub fn connect_named(
        &mut self,
        from_node: NodeId,
        from_port: &str,
        to_node: NodeId,
        to_port: &str,
    ) -> Result<(), EngineError> {
        let from_pid = self
            .find_port(from_node, from_port, PortDir::Out)
            .ok_or_else(|| EngineError::other("connect_named: from port not found"))?;
        let to_pid = self
            .find_port(to_node, to_port, PortDir::In)
            .ok_or_else(|| EngineError::other("connect_named: to port not found"))?;

        self.connect(
            Endpoint {
                node: from_node,
                port: from_pid,
                dir: PortDir::Out,
            },
            Endpoint {
                node: to_node,
                port: to_pid,
                dir: PortDir::In,
            },
        )
    }

    /// Compile a graph into a lightweight plan: validation + stable ordering.
    ///
    /// Validation requires every In port of Combiner and Output nodes to be
    /// driven. A Resample node with an unconnected map input would silently
    /// bias the average, so it is rejected here rather than at render time.
    pub fn compile(&self) -> Result<Plan, EngineError> {
        for n in self.nodes.values() {
            let class = n.kind.class();
            if class != NodeClass::Combiner && class != NodeClass::Output {
                continue;
            }
            for p in n.ports.iter().filter(|p| p.dir == PortDir::In) {
                let to = Endpoint {
                    node: n.id,
                    port: p.id,
                    dir: PortDir::In,
                };
                if !self.edges.iter().any(|e| e.to == to) {
                    return Err(EngineError::other(format!(
                        "compile: input '{}' not connected",
                        p.name
                    )));
                }
            }
        }

        // Emit nodes in insertion order (NodeId sequence) and edges.
        let mut nodes: Vec<NodeId> = self.nodes.keys().copied().collect();
        nodes.sort_by_key(|id| id.0);

        Ok(Plan {
            nodes,
            edges: self.edges.clone(),
        })
    }
}

/// A minimal compiled representation of the graph.
/// Runtimes can interpret this directly or translate it into backend-specific schedules.
#[derive(Debug, Clone)]
pub struct Plan {
    pub nodes: Vec<NodeId>,
    pub edges: Vec<Edge>,
}

// -------------------------------------------------------------------------------------------------
// Fan-out builder
// -------------------------------------------------------------------------------------------------

/// Node ids of a freshly built multisample fan-out, in stage order.
///
/// All per-sample vectors have length `sample_count = quality * quality`.
/// Index i of each vector belongs to the same chain.
#[derive(Debug)]
pub struct FanoutTopology {
    pub graph: Graph,
    pub scene_positions: Vec<NodeId>,
    pub offset_adds: Vec<NodeId>,
    pub sample_maps: Vec<NodeId>,
    pub source: NodeId,
    pub resample: NodeId,
    pub output: NodeId,
}

/// Builds the multisample sample-map topology for a quality level:
///
/// ```text
/// [ScenePosition] -> [OffsetAdd] -> [SampleMap] --map_i--> [Resample] -> [PixelsOut]
///      (x N)            (x N)         (x N)        [SourceImage] --src--^
/// ```
///
/// One ScenePosition node per chain (rather than one shared node) keeps each
/// chain independently evaluable by a runtime, matching the fan-out width to
/// the sample count.
///
/// Precondition: `quality >= 1`. The caller validates quality at the config
/// boundary; an out-of-range value here is a programming error.
pub fn build_sample_map_fanout(quality: u32) -> Result<FanoutTopology, EngineError> {
    assert!(quality >= 1, "quality must be >= 1");
    let sample_count = (quality * quality) as usize;
    assert!(
        sample_count <= u8::MAX as usize,
        "sample count exceeds Resample fan-in width"
    );

    let mut graph = Graph::new();

    let source = graph.add_node(NodeKind::SourceImage);
    let resample = graph.add_node(NodeKind::Resample {
        maps: sample_count as u8,
    });
    let output = graph.add_node(NodeKind::PixelsOut);

    let mut scene_positions = Vec::with_capacity(sample_count);
    let mut offset_adds = Vec::with_capacity(sample_count);
    let mut sample_maps = Vec::with_capacity(sample_count);

    for i in 0..sample_count {
        let scene = graph.add_node(NodeKind::ScenePosition);
        let offset = graph.add_node(NodeKind::OffsetAdd);
        let map = graph.add_node(NodeKind::SampleMap);

        graph.connect_named(scene, "out", offset, "in")?;
        graph.connect_named(offset, "out", map, "in")?;
        graph.connect_named(map, "out", resample, &format!("map{i}"))?;

        scene_positions.push(scene);
        offset_adds.push(offset);
        sample_maps.push(map);
    }

    graph.connect_named(source, "out", resample, "src")?;
    graph.connect_named(resample, "out", output, "in")?;

    Ok(FanoutTopology {
        graph,
        scene_positions,
        offset_adds,
        sample_maps,
        source,
        resample,
        output,
    })
}
