// Host-side checks on the bundled WGSL sources.

use operator_face::core::{POST_WGSL, SCENE_WGSL};

fn function_body<'a>(src: &'a str, name: &str) -> &'a str {
    let start = src
        .find(&format!("fn {name}("))
        .unwrap_or_else(|| panic!("missing fn {name}"));
    let rest = &src[start..];
    let end = rest.find("\n}").unwrap_or(rest.len());
    &rest[..end]
}

#[test]
fn occluder_is_placed_by_its_own_matrix() {
    let occluder = function_body(SCENE_WGSL, "vs_occluder");
    assert!(occluder.contains("u.occluder"), "{occluder}");
    assert!(!occluder.contains("u.model"), "{occluder}");

    let wire = function_body(SCENE_WGSL, "vs_mesh");
    assert!(wire.contains("u.model"), "{wire}");
}

#[test]
fn scene_uniform_layout_matches_host_struct() {
    // view_proj, model, occluder, color: 3 * 64 + 16 bytes
    let start = SCENE_WGSL.find("struct SceneUniforms").expect("uniform struct");
    let block = &SCENE_WGSL[start..start + SCENE_WGSL[start..].find("};").expect("end")];
    let fields: Vec<&str> = block
        .lines()
        .filter_map(|l| l.trim().split_once(':').map(|(name, _)| name))
        .collect();
    assert_eq!(fields, vec!["view_proj", "model", "occluder", "color"]);
}

#[test]
fn pipeline_entry_points_exist() {
    for entry in ["vs_disc", "fs_disc", "fs_wire", "fs_occluder"] {
        assert!(SCENE_WGSL.contains(&format!("fn {entry}(")), "scene missing {entry}");
    }
    for entry in ["vs_fullscreen", "fs_bright"] {
        assert!(POST_WGSL.contains(&format!("fn {entry}(")), "post missing {entry}");
    }
}
