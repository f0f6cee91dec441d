mod assembly;
mod color;
mod fragment;
mod frame;
mod primitives;
mod rasterizer;
mod uniforms;
mod vertex;

use std::sync::{mpsc, Arc};

use log::debug;
use nalgebra::Vector3;
use threadpool::ThreadPool;

pub use assembly::assemble;
pub use color::{Color, BLACK, WHITE};
pub use fragment::{FragmentShader, Identity};
pub use frame::{FrameTarget, FAR};
pub use primitives::{Fragment, Triangle, Vertex};
pub use rasterizer::{barycentric, is_inside, BoundingBox, Rasterizer};
pub use uniforms::{Lighting, TransformContext, Uniforms};
pub use vertex::VertexStage;

/// Color given to every input point before the vertex stage.
pub const PLACEHOLDER_COLOR: Color = WHITE;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("vertex count {len} is not a multiple of 3")]
    IncompleteTriangle { len: usize },
}

/// Counters of what happened to the geometry during one frame.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameStats {
    pub triangles: usize,  // Triangles after assembly.
    pub clipped: usize,    // Dropped because a vertex sat on the camera plane.
    pub degenerate: usize, // Dropped for having no area on screen.
    pub fragments: usize,  // Produced by the rasterizer.
    pub written: usize,    // Passed the depth test at the time they were composited.
}

impl FrameStats {
    fn add(&mut self, other: &FrameStats) {
        self.triangles += other.triangles;
        self.clipped += other.clipped;
        self.degenerate += other.degenerate;
        self.fragments += other.fragments;
        self.written += other.written;
    }
}

/// Forward rasterization pipeline: vertex stage, primitive assembly, rasterizer, fragment stage
/// and depth tested compositing.
pub struct Pipeline {
    shader: Arc<dyn FragmentShader>,
    pool: Option<ThreadPool>,
}

impl Pipeline {
    /// Single threaded pipeline with the identity fragment shader.
    pub fn new() -> Self {
        return Self {
            shader: Arc::new(Identity),
            pool: None,
        };
    }

    pub fn with_shader<S: FragmentShader + 'static>(mut self, shader: S) -> Self {
        self.shader = Arc::new(shader);
        return self;
    }

    /// Spreads rasterization over `workers` threads, 0 and 1 mean render on the calling thread.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.pool = match workers {
            0 | 1 => None,
            n => Some(ThreadPool::with_name("raster".into(), n)),
        };
        return self;
    }

    pub fn workers(&self) -> usize {
        return self.pool.as_ref().map_or(1, |pool| pool.max_count());
    }

    /// Renders a flat per-triangle list of points into the target.
    /// The target is not cleared here, call `FrameTarget::begin_frame` first.
    pub fn render(
        &self,
        points: &[Vector3<f32>],
        uniforms: &Uniforms,
        target: &mut FrameTarget,
    ) -> Result<FrameStats, PipelineError> {
        let vertex_stage = VertexStage::new(&uniforms.transform);
        let transformed: Vec<Option<Vertex>> = points
            .iter()
            .map(|position| vertex_stage.transform(&Vertex::new(*position, PLACEHOLDER_COLOR)))
            .collect();

        let groups = assemble(&transformed)?;
        let mut stats = FrameStats { triangles: groups.len(), ..Default::default() };
        let triangles: Vec<Triangle> = groups
            .into_iter()
            .filter_map(Triangle::from_clipped)
            .collect();
        stats.clipped = stats.triangles - triangles.len();

        let rasterizer = Rasterizer::new(uniforms.lighting).with_target_bounds(target.width, target.height);
        let raster_stats = match &self.pool {
            Some(pool) if triangles.len() > 1 => {
                self.render_parallel(pool, triangles, uniforms.lighting, target)
            }
            _ => draw_triangles(&rasterizer, self.shader.as_ref(), &triangles, target),
        };
        stats.add(&raster_stats);

        debug!(
            "frame: {} triangles, {} clipped, {} degenerate, {} fragments, {} written",
            stats.triangles, stats.clipped, stats.degenerate, stats.fragments, stats.written
        );
        return Ok(stats);
    }

    /// Every job draws a contiguous chunk of triangles into its own target, the targets are then
    /// merged in chunk order so ties resolve exactly like they do on a single thread.
    fn render_parallel(
        &self,
        pool: &ThreadPool,
        triangles: Vec<Triangle>,
        lighting: Lighting,
        target: &mut FrameTarget,
    ) -> FrameStats {
        let (width, height) = (target.width, target.height);
        let chunk_size = (triangles.len() + pool.max_count() - 1) / pool.max_count();
        let triangles = Arc::new(triangles);
        let n_chunks = (triangles.len() + chunk_size - 1) / chunk_size;

        let (sender, receiver) = mpsc::channel();
        for chunk_index in 0..n_chunks {
            let sender = sender.clone();
            let triangles = Arc::clone(&triangles);
            let shader = Arc::clone(&self.shader);
            pool.execute(move || {
                let begin = chunk_index * chunk_size;
                let end = (begin + chunk_size).min(triangles.len());
                let rasterizer = Rasterizer::new(lighting).with_target_bounds(width, height);
                let mut local = FrameTarget::new(width, height);
                let stats = draw_triangles(&rasterizer, shader.as_ref(), &triangles[begin..end], &mut local);
                // Receiver outlives the jobs, nothing to do if it somehow went away.
                let _ = sender.send((chunk_index, local, stats));
            });
        }
        drop(sender);

        let mut chunks: Vec<(usize, FrameTarget, FrameStats)> = receiver.iter().collect();
        chunks.sort_by_key(|(chunk_index, _, _)| *chunk_index);

        let mut stats = FrameStats::default();
        for (_, local, chunk_stats) in &chunks {
            target.merge(local);
            stats.add(chunk_stats);
        }
        return stats;
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        return Self::new();
    }
}

/// Rasterizes, shades and composites triangles one after another into the target.
fn draw_triangles(
    rasterizer: &Rasterizer,
    shader: &dyn FragmentShader,
    triangles: &[Triangle],
    target: &mut FrameTarget,
) -> FrameStats {
    let mut stats = FrameStats::default();
    let mut fragments = Vec::new();
    for triangle in triangles {
        fragments.clear();
        if !rasterizer.rasterize_into(triangle, &mut fragments) {
            stats.degenerate += 1;
            continue;
        }
        stats.fragments += fragments.len();
        for fragment in &fragments {
            if target.composite(&shader.shade(*fragment)) {
                stats.written += 1;
            }
        }
    }
    return stats;
}
