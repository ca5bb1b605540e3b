use super::helpers::{DEPTH_FORMAT, HDR_FORMAT};
use crate::core::mesh::HeadMesh;
use crate::core::rig::{EyeLayers, EyeVisual, FaceRig};
use glam::{Mat4, Vec3};
use smallvec::SmallVec;
use wgpu::util::DeviceExt;

/// Eye discs per frame: two eyes with three layers each.
pub(crate) const DISC_CAPACITY: usize = 2 * EyeLayers::COUNT;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct SceneUniforms {
    pub(crate) view_proj: [[f32; 4]; 4],
    pub(crate) model: [[f32; 4]; 4],
    pub(crate) occluder: [[f32; 4]; 4],
    pub(crate) color: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct DiscInstance {
    pub(crate) model: [[f32; 4]; 4],
    pub(crate) color: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct MeshVertex {
    position: [f32; 3],
    normal: [f32; 3],
}

pub(crate) struct SceneResources {
    pub(crate) occluder_pipeline: wgpu::RenderPipeline,
    pub(crate) wire_pipeline: wgpu::RenderPipeline,
    pub(crate) disc_pipeline: wgpu::RenderPipeline,
    pub(crate) uniform_buffer: wgpu::Buffer,
    pub(crate) bind_group: wgpu::BindGroup,
    pub(crate) disc_buffer: wgpu::Buffer,
}

/// GPU copies of the head geometry.
pub(crate) struct HeadBuffers {
    pub(crate) vertices: wgpu::Buffer,
    pub(crate) triangles: wgpu::Buffer,
    pub(crate) triangle_count: u32,
    pub(crate) lines: wgpu::Buffer,
    pub(crate) line_count: u32,
}

const MESH_ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];
const DISC_ATTRS: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
    2 => Float32x4,
    3 => Float32x4,
    4 => Float32x4,
    5 => Float32x4,
    6 => Float32x4
];

fn mesh_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<MeshVertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &MESH_ATTRS,
    }
}

fn disc_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<DiscInstance>() as u64,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &DISC_ATTRS,
    }
}

const ADDITIVE: wgpu::BlendState = wgpu::BlendState {
    color: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
    alpha: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
};

struct ScenePipelineDesc<'a> {
    label: &'a str,
    vs: &'a str,
    fs: &'a str,
    buffers: &'a [wgpu::VertexBufferLayout<'a>],
    topology: wgpu::PrimitiveTopology,
    blend: Option<wgpu::BlendState>,
    write_mask: wgpu::ColorWrites,
    depth_write: bool,
    depth_compare: wgpu::CompareFunction,
}

fn make_scene_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    desc: ScenePipelineDesc<'_>,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(desc.label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some(desc.vs),
            buffers: desc.buffers,
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState {
            topology: desc.topology,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: desc.depth_write,
            depth_compare: desc.depth_compare,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(desc.fs),
            targets: &[Some(wgpu::ColorTargetState {
                format: HDR_FORMAT,
                blend: desc.blend,
                write_mask: desc.write_mask,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        cache: None,
        multiview: None,
    })
}

pub(crate) fn create_scene_resources(device: &wgpu::Device) -> SceneResources {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("scene_shader"),
        source: wgpu::ShaderSource::Wgsl(crate::core::SCENE_WGSL.into()),
    });
    let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("scene_bgl"),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    });
    let pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("scene_pl"),
        bind_group_layouts: &[&bgl],
        push_constant_ranges: &[],
    });

    // Depth only: renderOrder 0, invisible
    let occluder_pipeline = make_scene_pipeline(
        device,
        &pl,
        &shader,
        ScenePipelineDesc {
            label: "occluder_pipeline",
            vs: "vs_occluder",
            fs: "fs_occluder",
            buffers: &[mesh_layout()],
            topology: wgpu::PrimitiveTopology::TriangleList,
            blend: None,
            write_mask: wgpu::ColorWrites::empty(),
            depth_write: true,
            depth_compare: wgpu::CompareFunction::Less,
        },
    );
    let wire_pipeline = make_scene_pipeline(
        device,
        &pl,
        &shader,
        ScenePipelineDesc {
            label: "wire_pipeline",
            vs: "vs_mesh",
            fs: "fs_wire",
            buffers: &[mesh_layout()],
            topology: wgpu::PrimitiveTopology::LineList,
            blend: Some(wgpu::BlendState::ALPHA_BLENDING),
            write_mask: wgpu::ColorWrites::ALL,
            depth_write: false,
            depth_compare: wgpu::CompareFunction::LessEqual,
        },
    );
    // Eyes ignore depth so they glow through the occluder
    let disc_pipeline = make_scene_pipeline(
        device,
        &pl,
        &shader,
        ScenePipelineDesc {
            label: "disc_pipeline",
            vs: "vs_disc",
            fs: "fs_disc",
            buffers: &[disc_layout()],
            topology: wgpu::PrimitiveTopology::TriangleList,
            blend: Some(ADDITIVE),
            write_mask: wgpu::ColorWrites::ALL,
            depth_write: false,
            depth_compare: wgpu::CompareFunction::Always,
        },
    );

    let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("scene_uniforms"),
        size: std::mem::size_of::<SceneUniforms>() as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("scene_bg"),
        layout: &bgl,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: uniform_buffer.as_entire_binding(),
        }],
    });
    let disc_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("disc_instances"),
        size: (std::mem::size_of::<DiscInstance>() * DISC_CAPACITY) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    SceneResources {
        occluder_pipeline,
        wire_pipeline,
        disc_pipeline,
        uniform_buffer,
        bind_group,
        disc_buffer,
    }
}

pub(crate) fn upload_head(device: &wgpu::Device, mesh: &HeadMesh) -> HeadBuffers {
    let verts: Vec<MeshVertex> = mesh
        .positions
        .iter()
        .zip(mesh.normals.iter())
        .map(|(p, n)| MeshVertex {
            position: p.to_array(),
            normal: n.to_array(),
        })
        .collect();
    let lines = mesh.wire_edges();
    let vertices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("head_vertices"),
        contents: bytemuck::cast_slice(&verts),
        usage: wgpu::BufferUsages::VERTEX,
    });
    let triangles = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("head_triangles"),
        contents: bytemuck::cast_slice(&mesh.indices),
        usage: wgpu::BufferUsages::INDEX,
    });
    let line_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("head_lines"),
        contents: bytemuck::cast_slice(&lines),
        usage: wgpu::BufferUsages::INDEX,
    });
    HeadBuffers {
        vertices,
        triangles,
        triangle_count: mesh.indices.len() as u32,
        lines: line_buf,
        line_count: lines.len() as u32,
    }
}

pub(crate) fn head_uniforms(view_proj: Mat4, rig: &FaceRig, rgb: [f32; 3]) -> SceneUniforms {
    SceneUniforms {
        view_proj: view_proj.to_cols_array_2d(),
        model: rig.head.matrix().to_cols_array_2d(),
        occluder: rig.occlusion.matrix().to_cols_array_2d(),
        color: [rgb[0], rgb[1], rgb[2], rig.wireframe_opacity],
    }
}

/// Flatten both eyes into disc instances, layer order preserved.
pub(crate) fn pack_discs(rig: &FaceRig) -> SmallVec<[DiscInstance; DISC_CAPACITY]> {
    let mut out = SmallVec::new();
    for eye in [&rig.left_eye, &rig.right_eye] {
        pack_eye(eye, &mut out);
    }
    out
}

fn pack_eye(eye: &EyeVisual, out: &mut SmallVec<[DiscInstance; DISC_CAPACITY]>) {
    let base = eye.transform.matrix();
    for layer in eye.layers.back_to_front() {
        let local = Mat4::from_translation(Vec3::new(0.0, 0.0, layer.z_offset))
            * Mat4::from_scale(Vec3::new(layer.radius, layer.radius, 1.0));
        out.push(DiscInstance {
            model: (base * local).to_cols_array_2d(),
            color: [layer.rgb[0], layer.rgb[1], layer.rgb[2], layer.opacity],
        });
    }
}
