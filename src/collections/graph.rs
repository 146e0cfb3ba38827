use std::collections::VecDeque;

use crate::collections::dynarray::DynArray;
use crate::core::error::{Error, ErrorKind, Result};

/// Adjacency-list graph, directed or undirected.
///
/// Undirected mode mirrors every edge insert/remove on both endpoints;
/// `add_edge` is idempotent so parallel edges never appear. Vertex ids
/// are dense indices assigned by insertion order.
pub struct Graph<T> {
    directed: bool,
    adjacency: DynArray<DynArray<usize>>,
    vertex_data: DynArray<T>,
}

impl<T> Graph<T> {
    pub fn new(directed: bool) -> Self {
        Graph {
            directed,
            adjacency: DynArray::new(),
            vertex_data: DynArray::new(),
        }
    }

    pub fn with_vertices(directed: bool, count: usize) -> Self
    where
        T: Default,
    {
        let mut graph = Self::new(directed);
        for _ in 0..count {
            graph.add_vertex(T::default());
        }
        graph
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_data.len()
    }

    /// Total number of edges; a mirrored undirected pair counts once.
    pub fn edge_count(&self) -> usize {
        let half_edges: usize = self.adjacency.iter().map(|list| list.len()).sum();
        if self.directed {
            half_edges
        } else {
            half_edges / 2
        }
    }

    /// Add a vertex and return its id.
    pub fn add_vertex(&mut self, data: T) -> usize {
        self.vertex_data.push(data);
        self.adjacency.push(DynArray::new());
        self.vertex_data.len() - 1
    }

    /// Add an edge. Idempotent; mirrored when undirected.
    pub fn add_edge(&mut self, from: usize, to: usize) -> Result<()> {
        self.check_vertex(from)?;
        self.check_vertex(to)?;
        Self::link(&mut self.adjacency[from], to);
        if !self.directed {
            Self::link(&mut self.adjacency[to], from);
        }
        Ok(())
    }

    /// Remove an edge if present; mirrored when undirected.
    pub fn remove_edge(&mut self, from: usize, to: usize) -> Result<()> {
        self.check_vertex(from)?;
        self.check_vertex(to)?;
        Self::unlink(&mut self.adjacency[from], to);
        if !self.directed {
            Self::unlink(&mut self.adjacency[to], from);
        }
        Ok(())
    }

    /// Edge presence; invalid endpoints are simply absent edges.
    pub fn has_edge(&self, from: usize, to: usize) -> bool {
        if from >= self.vertex_count() || to >= self.vertex_count() {
            return false;
        }
        self.adjacency[from].contains(&to)
    }

    pub fn neighbors(&self, vertex: usize) -> Result<&[usize]> {
        self.check_vertex(vertex)?;
        Ok(&self.adjacency[vertex])
    }

    pub fn vertex_data(&self, vertex: usize) -> Result<&T> {
        self.check_vertex(vertex)?;
        Ok(&self.vertex_data[vertex])
    }

    pub fn set_vertex_data(&mut self, vertex: usize, data: T) -> Result<()> {
        self.check_vertex(vertex)?;
        self.vertex_data[vertex] = data;
        Ok(())
    }

    /// Breadth-first visit order from `start`. Each reachable vertex
    /// appears exactly once.
    pub fn bfs(&self, start: usize) -> Result<Vec<usize>> {
        self.check_vertex(start)?;
        let mut visited = vec![false; self.vertex_count()];
        let mut order = Vec::new();
        let mut queue = VecDeque::new();
        visited[start] = true;
        queue.push_back(start);
        while let Some(current) = queue.pop_front() {
            order.push(current);
            for &neighbor in self.adjacency[current].iter() {
                if !visited[neighbor] {
                    visited[neighbor] = true;
                    queue.push_back(neighbor);
                }
            }
        }
        Ok(order)
    }

    /// Depth-first visit order from `start`, matching the recursive
    /// traversal: neighbors are pushed in reverse so the first-listed
    /// neighbor is explored first.
    pub fn dfs(&self, start: usize) -> Result<Vec<usize>> {
        self.check_vertex(start)?;
        let mut visited = vec![false; self.vertex_count()];
        let mut order = Vec::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            if visited[current] {
                continue;
            }
            visited[current] = true;
            order.push(current);
            for &neighbor in self.adjacency[current].iter().rev() {
                if !visited[neighbor] {
                    stack.push(neighbor);
                }
            }
        }
        Ok(order)
    }

    fn link(list: &mut DynArray<usize>, to: usize) {
        if !list.contains(&to) {
            list.push(to);
        }
    }

    fn unlink(list: &mut DynArray<usize>, to: usize) {
        if let Some(position) = list.iter().position(|&v| v == to) {
            list.remove(position);
        }
    }

    fn check_vertex(&self, vertex: usize) -> Result<()> {
        if vertex >= self.vertex_count() {
            return Err(Error::new(
                ErrorKind::IndexOutOfRange,
                format!(
                    "vertex {vertex} out of range for {} vertices",
                    self.vertex_count()
                ),
            ));
        }
        Ok(())
    }
}
