use std::ops::Range;

use super::Vertex;

/// Vertices submitted between `begin` and `end`.
#[derive(Debug, Default)]
pub struct MeshAccumulator {
    vertices: Vec<Vertex>,
}

impl MeshAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `vertices` and returns the index range they occupy.
    pub fn push(&mut self, vertices: &[Vertex]) -> Range<u32> {
        let start = self.vertices.len() as u32;
        self.vertices.extend_from_slice(vertices);
        start..self.vertices.len() as u32
    }

    pub fn as_slice(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Drops the vertices, keeping the allocation for the next frame.
    pub fn clear(&mut self) {
        self.vertices.clear();
    }
}
