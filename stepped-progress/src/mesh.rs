//! Triangle-mesh backend.
//!
//! [`MeshCanvas`] tessellates every layer of a [`Scene`] into coloured
//! triangles with lyon, ready to be uploaded to a GPU vertex buffer. The
//! progress mask gets its own mesh so a renderer can write it to a stencil
//! buffer and clip the masked layers against it.

use bytemuck::{Pod, Zeroable};
use lyon_path::{
    Path,
    math::{Point, Transform},
};
use lyon_tessellation::{
    BuffersBuilder, FillOptions, FillTessellator, FillVertex, StrokeOptions, StrokeTessellator,
    StrokeVertex, VertexBuffers,
};
use tracing::trace;

use crate::{
    color::Color,
    error::{Result, SteppedProgressError},
    scene::{LayerRole, Scene, VectorCanvas},
};

/// Default flattening tolerance in logical pixels.
pub const DEFAULT_TOLERANCE: f32 = 0.1;

/// Vertex of a tessellated layer.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    /// Position in output coordinates.
    pub position: [f32; 2],
    /// Linear RGBA colour.
    pub color: [f32; 4],
}

impl MeshVertex {
    fn new(position: Point, color: Color, transform: Option<&Transform>) -> Self {
        let position = match transform {
            Some(transform) => transform.transform_point(position),
            None => position,
        };
        Self {
            position: position.to_array(),
            color: color.to_array(),
        }
    }
}

/// Indexed triangle list.
pub type Mesh = VertexBuffers<MeshVertex, u32>;

/// The triangles of one shape layer.
#[derive(Clone, Debug)]
pub struct MeshLayer {
    /// Role of the source layer.
    pub role: LayerRole,
    /// Triangles of the fill followed by the stroke. Transparent paints
    /// produce no triangles.
    pub mesh: Mesh,
    /// Whether the layer must be clipped by the mask mesh.
    pub masked: bool,
}

impl MeshLayer {
    /// Vertex data as raw bytes for upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.mesh.vertices)
    }

    /// Index data as raw bytes for upload.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.mesh.indices)
    }
}

/// A [`VectorCanvas`] producing triangle meshes.
#[derive(Clone, Debug)]
pub struct MeshCanvas {
    tolerance: f32,
    transform: Option<Transform>,
    layers: Vec<MeshLayer>,
    mask: Mesh,
}

impl Default for MeshCanvas {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE)
    }
}

impl MeshCanvas {
    /// A canvas flattening curves with `tolerance`.
    pub fn new(tolerance: f32) -> Self {
        Self {
            tolerance,
            transform: None,
            layers: Vec::new(),
            mask: VertexBuffers::new(),
        }
    }

    /// Tessellated layers of the presented scene, bottom to top.
    pub fn layers(&self) -> &[MeshLayer] {
        &self.layers
    }

    /// The layer with `role`, if presented.
    pub fn layer(&self, role: LayerRole) -> Option<&MeshLayer> {
        self.layers.iter().find(|layer| layer.role == role)
    }

    /// Tessellated progress mask. Empty when nothing is revealed.
    pub fn mask(&self) -> &Mesh {
        &self.mask
    }

    /// Total number of vertices across layers and mask.
    pub fn vertex_count(&self) -> usize {
        self.layers
            .iter()
            .map(|layer| layer.mesh.vertices.len())
            .sum::<usize>()
            + self.mask.vertices.len()
    }

    fn tessellate_fill(&self, path: &Path, color: Color, buffers: &mut Mesh) -> Result<()> {
        let options = FillOptions::default().with_tolerance(self.tolerance);
        let transform = self.transform.as_ref();

        FillTessellator::new().tessellate_path(
            path,
            &options,
            &mut BuffersBuilder::new(buffers, |vertex: FillVertex| {
                MeshVertex::new(vertex.position(), color, transform)
            }),
        )?;

        Ok(())
    }

    fn tessellate_stroke(
        &self,
        path: &Path,
        color: Color,
        width: f32,
        buffers: &mut Mesh,
    ) -> Result<()> {
        let options = StrokeOptions::default()
            .with_tolerance(self.tolerance)
            .with_line_width(width);
        let transform = self.transform.as_ref();

        StrokeTessellator::new().tessellate_path(
            path,
            &options,
            &mut BuffersBuilder::new(buffers, |vertex: StrokeVertex| {
                MeshVertex::new(vertex.position(), color, transform)
            }),
        )?;

        Ok(())
    }
}

impl VectorCanvas for MeshCanvas {
    type Error = SteppedProgressError;

    fn present(&mut self, scene: &Scene) -> Result<()> {
        if scene.layers.is_empty() {
            return Err(SteppedProgressError::EmptyScene);
        }

        self.transform = scene.transform;
        let mut layers = Vec::with_capacity(scene.layers.len());
        for layer in &scene.layers {
            let mut mesh = VertexBuffers::new();
            if let Some(fill) = layer.fill.filter(|fill| !fill.is_transparent()) {
                self.tessellate_fill(&layer.path, fill, &mut mesh)?;
            }
            if let Some(stroke) = layer.stroke.filter(|stroke| !stroke.color.is_transparent()) {
                self.tessellate_stroke(&layer.path, stroke.color, stroke.width, &mut mesh)?;
            }
            trace!(
                role = ?layer.role,
                vertices = mesh.vertices.len(),
                "tessellated layer"
            );
            layers.push(MeshLayer {
                role: layer.role,
                mesh,
                masked: layer.masked,
            });
        }
        self.layers = layers;

        let mask = if scene.mask.is_instant() {
            &scene.mask.to
        } else {
            &scene.mask.from
        };
        self.update_mask(mask)
    }

    fn update_mask(&mut self, mask: &Path) -> Result<()> {
        let mut mesh = VertexBuffers::new();
        self.tessellate_fill(mask, Color::WHITE, &mut mesh)?;
        self.mask = mesh;
        Ok(())
    }
}
