// Host-side tests for the binary glTF loader and derived head geometry.

use glam::Vec3;
use operator_face::core::mesh::{AssetError, HeadMesh};

/// Assemble a `.glb` from a JSON document and a binary payload.
fn glb(json: &str, bin: Option<&[u8]>) -> Vec<u8> {
    fn pad(mut bytes: Vec<u8>, fill: u8) -> Vec<u8> {
        while bytes.len() % 4 != 0 {
            bytes.push(fill);
        }
        bytes
    }
    let json = pad(json.as_bytes().to_vec(), b' ');
    let bin = bin.map(|b| pad(b.to_vec(), 0));
    let total = 12 + 8 + json.len() + bin.as_ref().map_or(0, |b| 8 + b.len());

    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(b"glTF");
    out.extend_from_slice(&2u32.to_le_bytes());
    out.extend_from_slice(&(total as u32).to_le_bytes());
    out.extend_from_slice(&(json.len() as u32).to_le_bytes());
    out.extend_from_slice(&0x4E4F_534Au32.to_le_bytes());
    out.extend_from_slice(&json);
    if let Some(bin) = bin {
        out.extend_from_slice(&(bin.len() as u32).to_le_bytes());
        out.extend_from_slice(&0x004E_4942u32.to_le_bytes());
        out.extend_from_slice(&bin);
    }
    out
}

fn positions_bytes(points: &[[f32; 3]]) -> Vec<u8> {
    points
        .iter()
        .flat_map(|p| p.iter().flat_map(|c| c.to_le_bytes()))
        .collect()
}

const TRIANGLE: [[f32; 3]; 3] = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];

/// Minimal glTF 2.0 document around one primitive and a single buffer.
fn document(primitive: &str, accessors: &str, views: &str, buffer_len: usize) -> String {
    format!(
        r#"{{
            "asset": {{"version": "2.0"}},
            "meshes": [{{"primitives": [{primitive}]}}],
            "accessors": [{accessors}],
            "bufferViews": [{views}],
            "buffers": [{{"byteLength": {buffer_len}}}]
        }}"#
    )
}

const POSITIONS: &str = r#"{"bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
    "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0]}"#;

fn indexed_triangle(indices: [u16; 3]) -> Vec<u8> {
    let mut bin = positions_bytes(&TRIANGLE);
    for i in indices {
        bin.extend_from_slice(&i.to_le_bytes());
    }
    let json = document(
        r#"{"attributes": {"POSITION": 0}, "indices": 1}"#,
        &format!(r#"{POSITIONS}, {{"bufferView": 1, "componentType": 5123, "count": 3, "type": "SCALAR"}}"#),
        r#"{"buffer": 0, "byteOffset": 0, "byteLength": 36},
           {"buffer": 0, "byteOffset": 36, "byteLength": 6}"#,
        42,
    );
    glb(&json, Some(&bin))
}

fn plain_triangle(view: &str, bin: &[u8]) -> Vec<u8> {
    let json = document(r#"{"attributes": {"POSITION": 0}}"#, POSITIONS, view, bin.len());
    glb(&json, Some(bin))
}

#[test]
fn parses_indexed_triangle() {
    let mesh = HeadMesh::from_glb(&indexed_triangle([0, 1, 2])).expect("valid glb");
    assert_eq!(mesh.vertex_count(), 3);
    assert_eq!(mesh.indices, vec![0, 1, 2]);
    assert_eq!(mesh.positions[1], Vec3::X);
    for n in &mesh.normals {
        assert!(n.abs_diff_eq(Vec3::Z, 1e-6), "counter-clockwise face points +Z, got {n}");
    }
}

#[test]
fn non_indexed_mesh_gets_sequential_indices() {
    let bin = positions_bytes(&TRIANGLE);
    let bytes = plain_triangle(r#"{"buffer": 0, "byteLength": 36}"#, &bin);
    let mesh = HeadMesh::from_glb(&bytes).expect("valid glb");
    assert_eq!(mesh.indices, vec![0, 1, 2]);
}

#[test]
fn strided_positions_are_read() {
    // position followed by 4 bytes of padding per vertex
    let mut bin = Vec::new();
    for p in TRIANGLE {
        bin.extend(positions_bytes(&[p]));
        bin.extend_from_slice(&[0xAA; 4]);
    }
    let bytes = plain_triangle(r#"{"buffer": 0, "byteLength": 48, "byteStride": 16}"#, &bin);
    let mesh = HeadMesh::from_glb(&bytes).expect("valid glb");
    assert_eq!(mesh.positions[2], Vec3::Y);
}

#[test]
fn rejects_corrupt_containers() {
    let mut bad_magic = indexed_triangle([0, 1, 2]);
    bad_magic[3] = b'X';
    let mut bad_version = indexed_triangle([0, 1, 2]);
    bad_version[4..8].copy_from_slice(&1u32.to_le_bytes());
    let bytes = indexed_triangle([0, 1, 2]);
    let truncated = bytes[..bytes.len() - 10].to_vec();

    for (name, input) in [
        ("magic", bad_magic),
        ("version", bad_version),
        ("truncated", truncated),
        ("header only", b"glTF".to_vec()),
        ("empty", Vec::new()),
    ] {
        let err = HeadMesh::from_glb(&input).unwrap_err();
        assert!(matches!(err, AssetError::Gltf(_)), "{name}: {err:?}");
        assert!(err.to_string().starts_with("invalid glTF"), "{name}: {err}");
    }
}

#[test]
fn oversized_chunk_length_is_an_error() {
    let mut bytes = indexed_triangle([0, 1, 2]);
    // JSON chunk claims to run far past the end of the file
    bytes[12..16].copy_from_slice(&u32::MAX.to_le_bytes());
    let err = HeadMesh::from_glb(&bytes).unwrap_err();
    assert!(matches!(err, AssetError::Gltf(_)), "{err:?}");
}

#[test]
fn malformed_json_is_reported() {
    let err = HeadMesh::from_glb(&glb("{not json", None)).unwrap_err();
    assert!(matches!(err, AssetError::Gltf(_)), "{err:?}");
}

#[test]
fn document_without_mesh_is_rejected() {
    let json = r#"{"asset": {"version": "2.0"}}"#;
    assert!(matches!(
        HeadMesh::from_glb(&glb(json, None)),
        Err(AssetError::NoPrimitive)
    ));
}

#[test]
fn missing_binary_chunk_is_rejected() {
    let json = document(
        r#"{"attributes": {"POSITION": 0}}"#,
        POSITIONS,
        r#"{"buffer": 0, "byteLength": 36}"#,
        36,
    );
    let err = HeadMesh::from_glb(&glb(&json, None)).unwrap_err();
    assert!(
        matches!(err, AssetError::Gltf(_) | AssetError::Accessor { index: 0, .. }),
        "{err:?}"
    );
}

#[test]
fn out_of_range_index_is_rejected() {
    let err = HeadMesh::from_glb(&indexed_triangle([0, 1, 7])).unwrap_err();
    match err {
        AssetError::Accessor { index, reason } => {
            assert_eq!(index, 1);
            assert!(reason.contains("exceeds vertex count"), "{reason}");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn buffer_view_past_bin_end_is_rejected() {
    let bin = positions_bytes(&TRIANGLE);
    let bytes = plain_triangle(r#"{"buffer": 0, "byteOffset": 12, "byteLength": 36}"#, &bin);
    let err = HeadMesh::from_glb(&bytes).unwrap_err();
    assert!(
        matches!(err, AssetError::Gltf(_) | AssetError::Accessor { index: 0, .. }),
        "{err:?}"
    );
}

#[test]
fn wrong_position_layout_is_rejected() {
    let bin = positions_bytes(&TRIANGLE);
    let json = document(
        r#"{"attributes": {"POSITION": 0}}"#,
        r#"{"bufferView": 0, "componentType": 5123, "count": 3, "type": "VEC3",
            "min": [0, 0, 0], "max": [1, 1, 0]}"#,
        r#"{"buffer": 0, "byteLength": 36}"#,
        36,
    );
    let err = HeadMesh::from_glb(&glb(&json, Some(&bin))).unwrap_err();
    assert!(
        matches!(err, AssetError::Gltf(_) | AssetError::Accessor { index: 0, .. }),
        "{err:?}"
    );
}

#[test]
fn shared_edges_are_drawn_once() {
    let quad = HeadMesh::new(
        vec![Vec3::ZERO, Vec3::X, Vec3::new(1.0, 1.0, 0.0), Vec3::Y],
        vec![0, 1, 2, 2, 3, 0],
    );
    let lines = quad.wire_edges();
    assert_eq!(lines.len(), 10, "quad has 5 unique edges");
    let mut edges: Vec<(u32, u32)> = lines
        .chunks_exact(2)
        .map(|e| (e[0].min(e[1]), e[0].max(e[1])))
        .collect();
    edges.sort_unstable();
    edges.dedup();
    assert_eq!(edges.len(), 5);
}

#[test]
fn normals_are_unit_or_zero() {
    let mut mesh = HeadMesh::new(
        vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::Z, Vec3::splat(5.0)],
        vec![0, 1, 2, 0, 2, 3, 0, 3, 1],
    );
    for (i, n) in mesh.normals.iter().enumerate() {
        let len = n.length();
        if i == 4 {
            assert_eq!(len, 0.0, "unreferenced vertex has no normal");
        } else {
            assert!((len - 1.0).abs() < 1e-5, "vertex {i}: |n| = {len}");
        }
    }
    let before = mesh.normals.clone();
    mesh.compute_vertex_normals();
    assert_eq!(before, mesh.normals);
}

#[test]
fn eye_anchors_need_both_reference_vertices() {
    let positions: Vec<Vec3> = (0..5_249).map(|i| Vec3::splat(i as f32)).collect();
    let mesh = HeadMesh::new(positions, vec![]);
    let anchors = mesh.eye_anchors(5248, 558).expect("5249 vertices is enough");
    assert_eq!(anchors.left, Vec3::splat(5248.0));
    assert_eq!(anchors.right, Vec3::splat(558.0));

    let short = HeadMesh::new(vec![Vec3::ZERO; 5_248], vec![]);
    assert!(matches!(
        short.eye_anchors(5248, 558),
        Err(AssetError::TooFewVertices {
            count: 5_248,
            index: 5_248
        })
    ));
}
