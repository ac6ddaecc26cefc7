//! WGSL sources for the scene.

/// Lit, instanced mesh shader used for the walls, the ball and the arrow.
pub const MESH_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
    camera_pos: vec4<f32>,
    light_dir: vec4<f32>,
    time: f32,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct InstanceInput {
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
    @location(6) color: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
    @location(2) color: vec4<f32>,
};

@vertex
fn vs_main(v: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    let world_pos = model * vec4<f32>(v.position, 1.0);

    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * world_pos;
    out.world_pos = world_pos.xyz;
    out.world_normal = (model * vec4<f32>(v.normal, 0.0)).xyz;
    out.color = instance.color;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    var n = normalize(in.world_normal);
    let to_camera = normalize(uniforms.camera_pos.xyz - in.world_pos);
    // Culling is off, so light back faces as if seen from the front
    if dot(n, to_camera) < 0.0 {
        n = -n;
    }

    let to_light = normalize(-uniforms.light_dir.xyz);
    let diffuse = max(dot(n, to_light), 0.0);
    let half_dir = normalize(to_light + to_camera);
    let specular = pow(max(dot(n, half_dir), 0.0), 32.0) * 0.25;

    let ambient = 0.3;
    let lit = in.color.rgb * (ambient + (1.0 - ambient) * diffuse) + vec3<f32>(specular);
    return vec4<f32>(lit, in.color.a);
}
"#;

/// Billboard shader for the trail. Older points are drawn fainter.
pub const TRAIL_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
    camera_pos: vec4<f32>,
    light_dir: vec4<f32>,
    time: f32,
};

struct TrailParams {
    color: vec4<f32>,
    num_points: u32,
    point_size: f32,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

@group(0) @binding(1)
var<storage, read> points: array<vec4<f32>>;

@group(0) @binding(2)
var<uniform> params: TrailParams;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) alpha: f32,
    @location(1) uv: vec2<f32>,
};

@vertex
fn vs_main(
    @builtin(vertex_index) vertex_index: u32,
    @builtin(instance_index) instance_index: u32,
) -> VertexOutput {
    var quad_vertices = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>(-1.0,  1.0),
        vec2<f32>(-1.0,  1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>( 1.0,  1.0),
    );
    let quad_pos = quad_vertices[vertex_index];

    // Points are stored oldest first
    let count = max(params.num_points, 1u);
    let point_idx = min(instance_index, count - 1u);
    let age = f32(count - 1u - point_idx) / f32(count);

    let pos = points[point_idx].xyz;
    var clip_pos = uniforms.view_proj * vec4<f32>(pos, 1.0);
    clip_pos.x += quad_pos.x * params.point_size * clip_pos.w;
    clip_pos.y += quad_pos.y * params.point_size * clip_pos.w;

    var out: VertexOutput;
    out.clip_position = clip_pos;
    out.alpha = 1.0 - age * 0.8;
    out.uv = quad_pos;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let dist = length(in.uv);
    if dist > 1.0 {
        discard;
    }
    let circle_alpha = 1.0 - smoothstep(0.5, 1.0, dist);
    return vec4<f32>(params.color.rgb, params.color.a * circle_alpha * in.alpha);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use naga::front::wgsl;
    use naga::valid::{Capabilities, ValidationFlags, Validator};

    fn validate(source: &str) {
        let module = match wgsl::parse_str(source) {
            Ok(module) => module,
            Err(err) => panic!("{}", err.emit_to_string(source)),
        };
        let mut validator = Validator::new(ValidationFlags::all(), Capabilities::all());
        if let Err(err) = validator.validate(&module) {
            panic!("validation failed: {:?}", err);
        }
    }

    #[test]
    fn test_mesh_shader_is_valid() {
        validate(MESH_SHADER);
    }

    #[test]
    fn test_trail_shader_is_valid() {
        validate(TRAIL_SHADER);
    }

    #[test]
    fn test_entry_points_present() {
        for src in [MESH_SHADER, TRAIL_SHADER] {
            assert!(src.contains("fn vs_main"));
            assert!(src.contains("fn fs_main"));
        }
    }
}
