/// Prefix a WGSL body with the camera uniform both pipelines bind at
/// group 0.
macro_rules! with_camera {
    ($body:literal) => {
        concat!(
            "struct Camera {\n    view_proj: mat4x4<f32>,\n};\n\n",
            "@group(0) @binding(0)\nvar<uniform> camera: Camera;\n",
            $body
        )
    };
}

/// Instanced shapes. The light sits in front of the play plane and a little
/// above, so camera-facing sides stay bright and tops read lighter than
/// bottoms.
pub const SHAPE_SHADER: &str = with_camera!(
    r#"
struct Corner {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct Placement {
    @location(2) col0: vec4<f32>,
    @location(3) col1: vec4<f32>,
    @location(4) col2: vec4<f32>,
    @location(5) col3: vec4<f32>,
    @location(6) color: vec4<f32>,
};

struct Shaded {
    @builtin(position) clip: vec4<f32>,
    @location(0) normal: vec3<f32>,
    @location(1) color: vec4<f32>,
};

@vertex
fn vs_shape(corner: Corner, placement: Placement) -> Shaded {
    let model = mat4x4<f32>(placement.col0, placement.col1, placement.col2, placement.col3);
    var out: Shaded;
    out.clip = camera.view_proj * model * vec4<f32>(corner.position, 1.0);
    out.normal = normalize((model * vec4<f32>(corner.normal, 0.0)).xyz);
    out.color = placement.color;
    return out;
}

@fragment
fn fs_shape(in: Shaded) -> @location(0) vec4<f32> {
    let sun = normalize(vec3<f32>(-0.3, 0.6, 1.0));
    let shade = 0.35 + 0.65 * max(dot(in.normal, sun), 0.0);
    return vec4<f32>(in.color.rgb * shade, in.color.a);
}
"#
);

/// Flat-coloured lines for the backdrop grid.
pub const GRID_SHADER: &str = with_camera!(
    r#"
struct Line {
    @location(0) position: vec3<f32>,
    @location(1) color: vec4<f32>,
};

struct Painted {
    @builtin(position) clip: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_grid(line: Line) -> Painted {
    var out: Painted;
    out.clip = camera.view_proj * vec4<f32>(line.position, 1.0);
    out.color = line.color;
    return out;
}

@fragment
fn fs_grid(in: Painted) -> @location(0) vec4<f32> {
    return in.color;
}
"#
);
