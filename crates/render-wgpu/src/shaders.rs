/// WGSL shader for the textured ripple grid.
///
/// Vertex inputs match the `a_position` (location 0) and `a_texcoord`
/// (location 1) attributes. Texture coordinates have v pointing up, so the
/// fragment stage flips v to sample images stored top row first.
pub const RIPPLE_SHADER: &str = r#"
struct Uniforms {
    mvp_matrix: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

@group(1) @binding(0)
var surface_texture: texture_2d<f32>;
@group(1) @binding(1)
var surface_sampler: sampler;

struct VertexInput {
    @location(0) a_position: vec3<f32>,
    @location(1) a_texcoord: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) texcoord: vec2<f32>,
};

@vertex
fn vs_main(vertex: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = uniforms.mvp_matrix * vec4<f32>(vertex.a_position, 1.0);
    out.texcoord = vertex.a_texcoord;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let uv = vec2<f32>(in.texcoord.x, 1.0 - in.texcoord.y);
    return textureSample(surface_texture, surface_sampler, uv);
}
"#;
