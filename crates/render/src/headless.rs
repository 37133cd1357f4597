use glam::{Vec2, Vec3};

use crate::adapter::{MeshBuffers, RenderAdapter};

/// Upload and draw counters kept by [`HeadlessAdapter`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdapterStats {
    pub mesh_uploads: u64,
    pub position_writes: u64,
    pub texcoord_writes: u64,
    pub draws: u64,
}

/// CPU-side adapter with no GPU behind it.
///
/// Keeps copies of every buffer it is handed and counts calls. Used by the
/// CLI, benches and tests where no device exists. The program handle is just
/// a label.
#[derive(Debug, Default)]
pub struct HeadlessAdapter {
    positions: Vec<Vec3>,
    texcoords: Vec<Vec2>,
    indices: Vec<u16>,
    stats: AdapterStats,
    last_program: Option<String>,
    last_draw_indices: u32,
}

impl HeadlessAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn texcoords(&self) -> &[Vec2] {
        &self.texcoords
    }

    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    pub fn stats(&self) -> AdapterStats {
        self.stats
    }

    pub fn last_program(&self) -> Option<&str> {
        self.last_program.as_deref()
    }

    /// Index count of the most recent draw.
    pub fn last_draw_indices(&self) -> u32 {
        self.last_draw_indices
    }

    /// Human-readable description of the buffers as last uploaded.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "=== Headless frame (draws={}, uploads={}) ===\n",
            self.stats.draws, self.stats.mesh_uploads
        ));
        out.push_str(&format!(
            "Vertices: {}  Indices: {}\n",
            self.positions.len(),
            self.indices.len()
        ));
        out.push_str(&format!(
            "Writes: positions={} texcoords={}\n",
            self.stats.position_writes, self.stats.texcoord_writes
        ));
        if let Some((min, max)) = bounds(&self.positions) {
            out.push_str(&format!(
                "Position bounds: ({:.2}, {:.2}) .. ({:.2}, {:.2})\n",
                min.x, min.y, max.x, max.y
            ));
        }
        let uv: Vec<Vec3> = self.texcoords.iter().map(|t| t.extend(0.0)).collect();
        if let Some((min, max)) = bounds(&uv) {
            out.push_str(&format!(
                "Texcoord bounds: ({:.3}, {:.3}) .. ({:.3}, {:.3})\n",
                min.x, min.y, max.x, max.y
            ));
        }
        out
    }
}

impl RenderAdapter for HeadlessAdapter {
    type Program = String;
    type Target = ();

    fn upload_mesh(&mut self, mesh: &MeshBuffers<'_>) {
        self.positions = mesh.positions.to_vec();
        self.texcoords = mesh.texcoords.to_vec();
        self.indices = mesh.indices.to_vec();
        self.stats.mesh_uploads += 1;
    }

    fn write_positions(&mut self, positions: &[Vec3]) {
        self.positions.clear();
        self.positions.extend_from_slice(positions);
        self.stats.position_writes += 1;
    }

    fn write_texcoords(&mut self, texcoords: &[Vec2]) {
        self.texcoords.clear();
        self.texcoords.extend_from_slice(texcoords);
        self.stats.texcoord_writes += 1;
    }

    fn draw(&mut self, program: &String, _target: &(), mesh: &MeshBuffers<'_>) {
        self.stats.draws += 1;
        self.last_draw_indices = mesh.index_count();
        if self.last_program.as_deref() != Some(program.as_str()) {
            self.last_program = Some(program.clone());
        }
        tracing::trace!(program = %program, indices = mesh.index_count(), "headless draw");
    }
}

fn bounds(points: &[Vec3]) -> Option<(Vec3, Vec3)> {
    let first = *points.first()?;
    Some(
        points
            .iter()
            .fold((first, first), |(lo, hi), p| (lo.min(*p), hi.max(*p))),
    )
}
