use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::info;
use nalgebra as na;
use na::{vector, Rotation3, Vector3};
use obj::raw::object::Polygon;
use obj::raw::parse_obj;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid OBJ data: {0}")]
    Parse(#[from] obj::ObjError),

    #[error("face refers to vertex {index}, but there are only {len}")]
    IndexOutOfRange { index: usize, len: usize },
}

/// One corner of a face, 0-based indices into the position, texture and normal lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceVertex {
    pub position: usize,
    pub tex_coord: Option<usize>,
    pub normal: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Face {
    pub vertices: Vec<FaceVertex>,
}

/// Vertex positions and faces of an OBJ model.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub positions: Vec<Vector3<f32>>,
    pub faces: Vec<Face>,
}

impl From<Polygon> for Face {
    fn from(polygon: Polygon) -> Self {
        let vertices = match polygon {
            Polygon::P(indices) => indices
                .into_iter()
                .map(|position| FaceVertex { position, tex_coord: None, normal: None })
                .collect(),
            Polygon::PT(indices) => indices
                .into_iter()
                .map(|(position, tex_coord)| FaceVertex { position, tex_coord: Some(tex_coord), normal: None })
                .collect(),
            Polygon::PN(indices) => indices
                .into_iter()
                .map(|(position, normal)| FaceVertex { position, tex_coord: None, normal: Some(normal) })
                .collect(),
            Polygon::PTN(indices) => indices
                .into_iter()
                .map(|(position, tex_coord, normal)| FaceVertex {
                    position,
                    tex_coord: Some(tex_coord),
                    normal: Some(normal),
                })
                .collect(),
        };
        return Face { vertices };
    }
}

impl Mesh {
    /// Loads an OBJ file. On failure nothing is returned, there is no partially read mesh.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Mesh, LoadError> {
        let mesh = Mesh::from_reader(BufReader::new(File::open(path.as_ref())?))?;
        info!(
            "loaded {}: {} vertices, {} faces",
            path.as_ref().display(),
            mesh.positions.len(),
            mesh.faces.len()
        );
        return Ok(mesh);
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Mesh, LoadError> {
        let raw = parse_obj(reader)?;
        let positions = raw
            .positions
            .iter()
            .map(|&(x, y, z, _w)| vector![x, y, z])
            .collect();
        let faces = raw.polygons.into_iter().map(Face::from).collect();
        return Ok(Mesh { positions, faces });
    }

    /// Rotates every position by Euler angles in degrees, applied as Rx * Ry * Rz.
    pub fn rotate(&mut self, angles_deg: Vector3<f32>) {
        let rotation = Rotation3::from_axis_angle(&Vector3::x_axis(), angles_deg.x.to_radians())
            * Rotation3::from_axis_angle(&Vector3::y_axis(), angles_deg.y.to_radians())
            * Rotation3::from_axis_angle(&Vector3::z_axis(), angles_deg.z.to_radians());
        for position in &mut self.positions {
            *position = rotation * *position;
        }
    }

    /// Flat list of positions, three per triangle, ready to go into the pipeline.
    /// Faces with more than 3 corners are split into a fan around the first corner, faces with
    /// less are skipped.
    pub fn vertex_array(&self) -> Result<Vec<Vector3<f32>>, LoadError> {
        let mut vertex_array = Vec::new();
        for face in &self.faces {
            if face.vertices.len() < 3 {
                continue;
            }
            let corners = face
                .vertices
                .iter()
                .map(|vertex| self.position(vertex.position))
                .collect::<Result<Vec<_>, _>>()?;
            for i in 1..corners.len() - 1 {
                vertex_array.extend_from_slice(&[corners[0], corners[i], corners[i + 1]]);
            }
        }
        return Ok(vertex_array);
    }

    fn position(&self, index: usize) -> Result<Vector3<f32>, LoadError> {
        return self
            .positions
            .get(index)
            .copied()
            .ok_or(LoadError::IndexOutOfRange { index, len: self.positions.len() });
    }
}
