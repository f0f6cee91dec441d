pub mod util;
pub mod pipeline;
pub mod model;
pub mod export;

pub use pipeline::{
    Color, Fragment, FragmentShader, FrameStats, FrameTarget, Identity, Lighting, Pipeline,
    PipelineError, TransformContext, Triangle, Uniforms, Vertex,
};
