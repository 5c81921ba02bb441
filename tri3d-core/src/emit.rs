/// Output buffers for projected primitives
///
/// Three parallel arrays are filled per frame: `positions` (3 floats per
/// vertex), `colors` (RGBA, 4 floats per vertex) and `indices` (connectivity).
/// The caller owns the buffers and resets them at the start of each frame; the
/// pipeline only appends.
use serde::Deserialize;

use crate::vector::Vec3;

pub const POSITION_STRIDE: usize = 3;
pub const COLOR_STRIDE: usize = 4;

#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    #[error("output buffer exhausted: {required} vertices needed, capacity is {capacity}")]
    OutputBufferExhausted { required: usize, capacity: usize },
}

/// How connectivity is emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Each triangle becomes a closed loop of three line segments (6 indices).
    #[default]
    Wireframe,
    /// Each triangle becomes one filled triangle (3 indices).
    Solid,
}

impl RenderMode {
    pub fn indices_per_triangle(self) -> usize {
        match self {
            Self::Wireframe => 6,
            Self::Solid => 3,
        }
    }
}

impl std::str::FromStr for RenderMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "wireframe" | "wire" => Ok(Self::Wireframe),
            "solid" => Ok(Self::Solid),
            _ => Err(format!("unknown render mode: {s}")),
        }
    }
}

/// Caller-owned, bounded output buffers
#[derive(Debug, Clone)]
pub struct FrameBuffers {
    positions: Vec<f32>,
    colors: Vec<f32>,
    indices: Vec<u32>,
    max_vertices: usize,
}

impl FrameBuffers {
    /// Pre-allocate room for `max_vertices` vertices.
    ///
    /// Nothing is ever written past that bound.
    pub fn with_capacity(max_vertices: usize) -> Self {
        Self {
            positions: Vec::with_capacity(max_vertices * POSITION_STRIDE),
            colors: Vec::with_capacity(max_vertices * COLOR_STRIDE),
            indices: Vec::with_capacity(max_vertices * 2),
            max_vertices,
        }
    }

    pub fn reset(&mut self) {
        self.positions.clear();
        self.colors.clear();
        self.indices.clear();
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / POSITION_STRIDE
    }

    pub fn position_count(&self) -> usize {
        self.positions.len()
    }

    pub fn color_count(&self) -> usize {
        self.colors.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Append one triangle with a flat RGBA color.
    ///
    /// Either the whole triangle is written or, if it would exceed the vertex
    /// capacity, nothing is.
    pub fn push_triangle(
        &mut self,
        vertices: &[Vec3; 3],
        color: [f32; 4],
        mode: RenderMode,
    ) -> Result<(), EmitError> {
        let base = self.vertex_count();
        let required = base + 3;
        if required > self.max_vertices {
            return Err(EmitError::OutputBufferExhausted {
                required,
                capacity: self.max_vertices,
            });
        }

        for vertex in vertices {
            self.positions.extend_from_slice(&vertex.to_array());
            self.colors.extend_from_slice(&color);
        }

        let base = base as u32;
        match mode {
            RenderMode::Wireframe => {
                self.indices
                    .extend_from_slice(&[base, base + 1, base + 1, base + 2, base + 2, base]);
            }
            RenderMode::Solid => {
                self.indices.extend_from_slice(&[base, base + 1, base + 2]);
            }
        }

        Ok(())
    }
}
