//! A small capacity-limited flow network with FIFO push-relabel maximum flow.
//!
//! Capacities are real-valued. Every edge is stored as a forward arc and its
//! reverse residual arc at indices `2i` and `2i + 1`; only forward arcs carry
//! a payload.

use std::collections::VecDeque;

const EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(usize);

#[derive(Debug, Clone)]
struct Arc {
    to: usize,
    capacity: f64,
    flow: f64,
}

impl Arc {
    #[inline]
    fn residual(&self) -> f64 {
        self.capacity - self.flow
    }
}

#[derive(Debug, Clone)]
pub struct FlowNetwork<E> {
    adjacency: Vec<Vec<usize>>,
    arcs: Vec<Arc>,
    payloads: Vec<Option<E>>,
}

impl<E> Default for FlowNetwork<E> {
    fn default() -> Self {
        Self {
            adjacency: Vec::new(),
            arcs: Vec::new(),
            payloads: Vec::new(),
        }
    }
}

impl<E> FlowNetwork<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_vertex(&mut self) -> VertexId {
        self.adjacency.push(Vec::new());
        VertexId(self.adjacency.len() - 1)
    }

    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.payloads.len()
    }

    /// Adds a directed edge of the given capacity. Negative capacities are
    /// treated as zero.
    pub fn connect(
        &mut self,
        from: VertexId,
        to: VertexId,
        capacity: f64,
        payload: Option<E>,
    ) -> EdgeId {
        let index = self.arcs.len();
        self.arcs.push(Arc {
            to: to.0,
            capacity: capacity.max(0.0),
            flow: 0.0,
        });
        self.arcs.push(Arc {
            to: from.0,
            capacity: 0.0,
            flow: 0.0,
        });
        self.adjacency[from.0].push(index);
        self.adjacency[to.0].push(index + 1);
        self.payloads.push(payload);
        EdgeId(index / 2)
    }

    pub fn flow(&self, edge: EdgeId) -> f64 {
        self.arcs[2 * edge.0].flow.max(0.0)
    }

    pub fn capacity(&self, edge: EdgeId) -> f64 {
        self.arcs[2 * edge.0].capacity
    }

    /// Payload-carrying edges with the flow they carry after the last solve.
    pub fn edges(&self) -> impl Iterator<Item = (&E, f64)> {
        self.payloads.iter().enumerate().filter_map(|(i, payload)| {
            payload
                .as_ref()
                .map(|payload| (payload, self.flow(EdgeId(i))))
        })
    }

    /// Consumes the network, returning payloads with their flows.
    pub fn into_edges(self) -> impl Iterator<Item = (E, f64)> {
        let flows: Vec<f64> = (0..self.payloads.len())
            .map(|i| self.arcs[2 * i].flow.max(0.0))
            .collect();
        self.payloads
            .into_iter()
            .zip(flows)
            .filter_map(|(payload, flow)| payload.map(|payload| (payload, flow)))
    }

    /// Computes a maximum flow from `source` to `sink` and returns its value.
    ///
    /// Any flow from a previous solve is discarded first.
    pub fn max_flow(&mut self, source: VertexId, sink: VertexId) -> f64 {
        let n = self.adjacency.len();
        let (s, t) = (source.0, sink.0);
        if s == t || s >= n || t >= n {
            return 0.0;
        }
        for arc in &mut self.arcs {
            arc.flow = 0.0;
        }

        let mut height = vec![0usize; n];
        let mut excess = vec![0.0f64; n];
        let mut cursor = vec![0usize; n];
        let mut queued = vec![false; n];
        let mut active = VecDeque::new();

        height[s] = n;
        for k in 0..self.adjacency[s].len() {
            let a = self.adjacency[s][k];
            let delta = self.arcs[a].residual();
            if delta > EPSILON {
                let v = self.push(a, delta, &mut excess, s);
                if v != t && !queued[v] {
                    queued[v] = true;
                    active.push_back(v);
                }
            }
        }

        while let Some(u) = active.pop_front() {
            queued[u] = false;
            while excess[u] > EPSILON {
                if cursor[u] == self.adjacency[u].len() {
                    let lowest = self.adjacency[u]
                        .iter()
                        .filter(|&&a| self.arcs[a].residual() > EPSILON)
                        .map(|&a| height[self.arcs[a].to])
                        .min();
                    match lowest {
                        Some(h) if h < 2 * n => {
                            height[u] = h + 1;
                            cursor[u] = 0;
                        }
                        _ => break,
                    }
                    continue;
                }

                let a = self.adjacency[u][cursor[u]];
                let v = self.arcs[a].to;
                let residual = self.arcs[a].residual();
                if residual > EPSILON && height[u] == height[v] + 1 {
                    let delta = excess[u].min(residual);
                    self.push(a, delta, &mut excess, u);
                    if v != s && v != t && !queued[v] {
                        queued[v] = true;
                        active.push_back(v);
                    }
                } else {
                    cursor[u] += 1;
                }
            }
        }

        excess[t]
    }

    fn push(&mut self, arc: usize, delta: f64, excess: &mut [f64], from: usize) -> usize {
        self.arcs[arc].flow += delta;
        self.arcs[arc ^ 1].flow -= delta;
        let to = self.arcs[arc].to;
        excess[from] -= delta;
        excess[to] += delta;
        to
    }
}
