//! Head mesh loading from binary glTF and derived geometry.
//!
//! Only what the face needs is read: the first primitive of the first mesh,
//! its `POSITION` attribute and (optional) triangle indices. Buffers must
//! live in the GLB binary chunk.

use super::eyes::EyeAnchors;
use fnv::FnvHashSet;
use glam::Vec3;
use gltf::accessor::{DataType, Dimensions};
use gltf::buffer::Source;
use gltf::{Accessor, Gltf, Semantic};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("invalid glTF: {0}")]
    Gltf(#[from] gltf::Error),
    #[error("glTF has no mesh primitive")]
    NoPrimitive,
    #[error("mesh has no {0} attribute")]
    MissingAttribute(&'static str),
    #[error("accessor {index}: {reason}")]
    Accessor { index: usize, reason: String },
    #[error("mesh has {count} vertices, vertex {index} is out of range")]
    TooFewVertices { count: usize, index: usize },
}

impl AssetError {
    fn accessor(acc: &Accessor<'_>, reason: impl Into<String>) -> Self {
        Self::Accessor {
            index: acc.index(),
            reason: reason.into(),
        }
    }
}

/// CPU-side head geometry.
#[derive(Clone, Debug, Default)]
pub struct HeadMesh {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub indices: Vec<u32>,
}

impl HeadMesh {
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>) -> Self {
        let mut mesh = Self {
            normals: vec![Vec3::ZERO; positions.len()],
            positions,
            indices,
        };
        mesh.compute_vertex_normals();
        mesh
    }

    /// Parse a `.glb` container.
    pub fn from_glb(bytes: &[u8]) -> Result<Self, AssetError> {
        let gltf = Gltf::from_slice(bytes)?;
        let blob = gltf.blob.as_deref();
        let prim = gltf
            .meshes()
            .next()
            .and_then(|m| m.primitives().next())
            .ok_or(AssetError::NoPrimitive)?;
        let reader = prim.reader(|buffer| match buffer.source() {
            Source::Bin => blob,
            Source::Uri(_) => None,
        });

        let pos_acc = prim
            .get(&Semantic::Positions)
            .ok_or(AssetError::MissingAttribute("POSITION"))?;
        expect_layout(&pos_acc, &[DataType::F32], Dimensions::Vec3)?;
        let positions: Vec<Vec3> = reader
            .read_positions()
            .ok_or_else(|| AssetError::accessor(&pos_acc, "data outside the binary chunk"))?
            .map(Vec3::from_array)
            .collect();

        let indices = match prim.indices() {
            Some(acc) => {
                expect_layout(
                    &acc,
                    &[DataType::U8, DataType::U16, DataType::U32],
                    Dimensions::Scalar,
                )?;
                let raw = reader
                    .read_indices()
                    .ok_or_else(|| AssetError::accessor(&acc, "data outside the binary chunk"))?
                    .into_u32();
                let mut out = Vec::with_capacity(acc.count());
                for v in raw {
                    if v as usize >= positions.len() {
                        return Err(AssetError::accessor(
                            &acc,
                            format!("index {v} exceeds vertex count {}", positions.len()),
                        ));
                    }
                    out.push(v);
                }
                out
            }
            None => (0..positions.len() as u32).collect(),
        };
        Ok(Self::new(positions, indices))
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Area-weighted smooth normals.
    pub fn compute_vertex_normals(&mut self) {
        let mut normals = vec![Vec3::ZERO; self.positions.len()];
        for tri in self.indices.chunks_exact(3) {
            let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            let (Some(pa), Some(pb), Some(pc)) =
                (self.positions.get(a), self.positions.get(b), self.positions.get(c))
            else {
                continue;
            };
            let n = (*pc - *pb).cross(*pa - *pb);
            normals[a] += n;
            normals[b] += n;
            normals[c] += n;
        }
        for n in &mut normals {
            *n = n.normalize_or_zero();
        }
        self.normals = normals;
    }

    /// Unique undirected triangle edges as a line list.
    pub fn wire_edges(&self) -> Vec<u32> {
        let mut seen: FnvHashSet<(u32, u32)> = FnvHashSet::default();
        let mut lines = Vec::with_capacity(self.indices.len() * 2);
        for tri in self.indices.chunks_exact(3) {
            for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
                let key = if a < b { (a, b) } else { (b, a) };
                if seen.insert(key) {
                    lines.push(a);
                    lines.push(b);
                }
            }
        }
        lines
    }

    /// Local positions of the eye reference vertices.
    pub fn eye_anchors(&self, left: usize, right: usize) -> Result<EyeAnchors, AssetError> {
        let get = |index: usize| {
            self.positions
                .get(index)
                .copied()
                .ok_or(AssetError::TooFewVertices {
                    count: self.positions.len(),
                    index,
                })
        };
        Ok(EyeAnchors {
            left: get(left)?,
            right: get(right)?,
        })
    }
}

/// Reject accessors the typed readers cannot decode.
fn expect_layout(
    acc: &Accessor<'_>,
    types: &[DataType],
    dims: Dimensions,
) -> Result<(), AssetError> {
    if !types.contains(&acc.data_type()) || acc.dimensions() != dims {
        return Err(AssetError::accessor(
            acc,
            format!(
                "unsupported layout {:?} {:?}",
                acc.data_type(),
                acc.dimensions()
            ),
        ));
    }
    if acc.count() == 0 {
        return Err(AssetError::accessor(acc, "empty"));
    }
    Ok(())
}
