//! CPU meshing: per-face tessellation with corner lighting and packed vertices.
#![forbid(unsafe_code)]

mod alpha;
mod build;
mod face;
mod mesh;
mod scratch;
mod vertex;

pub use alpha::{face_center_key, sort_alpha_faces};
pub use build::{build_chunk_mesh, triangulate};
pub use face::{Face, QUAD_CORNERS};
pub use mesh::{ChunkMeshCpu, Mesh, RenderState};
pub use scratch::{MAX_ALPHA_VERTICES, MAX_SLICE_VERTICES, MeshScratch};
pub use vertex::{Vertex, quantize_uv};
