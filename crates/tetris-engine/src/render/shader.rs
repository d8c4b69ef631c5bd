//! Shader program builder.
//!
//! WGSL stages are compiled (parsed + validated) on the CPU before any GPU object
//! is created, so a broken shader surfaces as a [`ShaderError`] carrying the
//! compiler diagnostic instead of a device-level failure later on.
//!
//! Linking checks the vertex → fragment interface and records the uniform
//! bindings the program declares.

use std::fmt;

use naga::valid::{Capabilities, ValidationFlags, Validator};

/// Vertex stage of the quad program.
pub const QUAD_VERTEX_SHADER: &str = include_str!("shaders/quad_vs.wgsl");
/// Fragment stage of the quad program.
pub const QUAD_FRAGMENT_SHADER: &str = include_str!("shaders/quad_fs.wgsl");

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderKind {
    Vertex,
    Fragment,
}

impl ShaderKind {
    /// Human-readable stage name used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            ShaderKind::Vertex => "vertex shader",
            ShaderKind::Fragment => "fragment shader",
        }
    }

    fn stage(self) -> naga::ShaderStage {
        match self {
            ShaderKind::Vertex => naga::ShaderStage::Vertex,
            ShaderKind::Fragment => naga::ShaderStage::Fragment,
        }
    }
}

impl fmt::Display for ShaderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Shader build failure with the compiler or linker diagnostic.
#[derive(Debug, Clone, PartialEq)]
pub enum ShaderError {
    Compile { kind: ShaderKind, message: String },
    Link { message: String },
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compile { kind, message } => write!(f, "compilation of {kind} failed: {message}"),
            Self::Link { message } => write!(f, "linking of shader program failed: {message}"),
        }
    }
}

impl std::error::Error for ShaderError {}

/// Location of a uniform in the bind group model.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct UniformSlot {
    pub group: u32,
    pub binding: u32,
}

/// A compiled, not yet linked, shader stage.
#[derive(Debug)]
pub struct ShaderStage {
    kind: ShaderKind,
    source: String,
    entry_point: String,
    module: naga::Module,
}

impl ShaderStage {
    #[inline]
    pub fn kind(&self) -> ShaderKind {
        self.kind
    }

    #[inline]
    pub fn entry_point(&self) -> &str {
        &self.entry_point
    }

    fn entry(&self) -> Option<&naga::EntryPoint> {
        self.module
            .entry_points
            .iter()
            .find(|ep| ep.name == self.entry_point)
    }
}

/// Compiles one stage from WGSL source.
///
/// The module must declare an entry point for `kind`; the first one found is used.
pub fn compile(kind: ShaderKind, source: &str) -> Result<ShaderStage, ShaderError> {
    let compile_error = |message: String| ShaderError::Compile { kind, message };

    let module = naga::front::wgsl::parse_str(source)
        .map_err(|e| compile_error(e.emit_to_string(source)))?;

    Validator::new(ValidationFlags::all(), Capabilities::empty())
        .validate(&module)
        .map_err(|e| compile_error(e.emit_to_string(source)))?;

    let entry_point = module
        .entry_points
        .iter()
        .find(|ep| ep.stage == kind.stage())
        .map(|ep| ep.name.clone())
        .ok_or_else(|| compile_error(format!("no {kind} entry point declared")))?;

    log::debug!("compiled {kind} (entry point `{entry_point}`)");

    Ok(ShaderStage {
        kind,
        source: source.to_owned(),
        entry_point,
        module,
    })
}

/// Linked vertex + fragment program.
///
/// Holds the validated sources and entry points; the per-stage modules are
/// released when linking finishes.
#[derive(Debug, Clone)]
pub struct ShaderProgram {
    vertex_source: String,
    vertex_entry: String,
    fragment_source: String,
    fragment_entry: String,
    vertex_inputs: Vec<VertexInput>,
    uniforms: Vec<(String, UniformSlot)>,
}

/// One `@location` input of the vertex stage.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexInput {
    pub name: String,
    pub location: u32,
    /// `None` when the WGSL type has no vertex attribute format.
    pub format: Option<wgpu::VertexFormat>,
}

impl ShaderProgram {
    #[inline]
    pub fn vertex_source(&self) -> &str {
        &self.vertex_source
    }

    #[inline]
    pub fn vertex_entry(&self) -> &str {
        &self.vertex_entry
    }

    #[inline]
    pub fn fragment_source(&self) -> &str {
        &self.fragment_source
    }

    #[inline]
    pub fn fragment_entry(&self) -> &str {
        &self.fragment_entry
    }

    #[inline]
    pub fn vertex_inputs(&self) -> &[VertexInput] {
        &self.vertex_inputs
    }

    /// Checks that `attributes` supply every vertex input with its declared format.
    ///
    /// Attributes the shader does not read are allowed.
    pub fn check_vertex_layout(&self, attributes: &[wgpu::VertexAttribute]) -> Result<(), ShaderError> {
        let link_error = |message: String| Err(ShaderError::Link { message });

        for input in &self.vertex_inputs {
            let Some(attr) = attributes.iter().find(|a| a.shader_location == input.location) else {
                return link_error(format!(
                    "vertex input `{}` at location {} has no matching vertex attribute",
                    input.name, input.location
                ));
            };
            match input.format {
                None => {
                    return link_error(format!(
                        "vertex input `{}` at location {} has a type no vertex format can feed",
                        input.name, input.location
                    ));
                }
                Some(format) if format != attr.format => {
                    return link_error(format!(
                        "vertex input `{}` at location {} reads {format:?}, vertex buffer supplies {:?}",
                        input.name, input.location, attr.format
                    ));
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    /// Returns where the uniform `name` is bound, if the program declares it.
    pub fn uniform_binding(&self, name: &str) -> Option<UniformSlot> {
        self.uniforms
            .iter()
            .find(|(n, _)| n == name)
            .map(|&(_, slot)| slot)
    }
}

/// Links a vertex and a fragment stage into a program.
///
/// Both stages are consumed whether or not linking succeeds.
pub fn link(vertex: ShaderStage, fragment: ShaderStage) -> Result<ShaderProgram, ShaderError> {
    let link_error = |message: String| ShaderError::Link { message };

    if vertex.kind != ShaderKind::Vertex || fragment.kind != ShaderKind::Fragment {
        return Err(link_error(format!(
            "expected (vertex shader, fragment shader), got ({}, {})",
            vertex.kind, fragment.kind
        )));
    }

    let (Some(vs_entry), Some(fs_entry)) = (vertex.entry(), fragment.entry()) else {
        return Err(link_error("entry point missing after compilation".to_owned()));
    };

    let outputs = collect_locations(
        &vertex.module,
        vs_entry
            .function
            .result
            .iter()
            .map(|r| (None, r.ty, r.binding.as_ref())),
    );
    let inputs = collect_locations(
        &fragment.module,
        fs_entry
            .function
            .arguments
            .iter()
            .map(|a| (a.name.as_deref(), a.ty, a.binding.as_ref())),
    );

    for input in &inputs {
        let Some(output) = outputs.iter().find(|o| o.location == input.location) else {
            return Err(link_error(format!(
                "fragment input `{}` at location {} is not written by the vertex stage",
                input.name, input.location
            )));
        };
        if is_plain_value(&output.inner) && is_plain_value(&input.inner) && output.inner != input.inner {
            return Err(link_error(format!(
                "type mismatch at location {}: vertex writes {:?}, fragment reads {:?}",
                input.location, output.inner, input.inner
            )));
        }
    }

    let vertex_inputs = collect_locations(
        &vertex.module,
        vs_entry
            .function
            .arguments
            .iter()
            .map(|a| (a.name.as_deref(), a.ty, a.binding.as_ref())),
    )
    .into_iter()
    .map(|l| VertexInput {
        format: vertex_format(&l.inner),
        name: l.name,
        location: l.location,
    })
    .collect();

    let mut uniforms = uniform_slots(&vertex.module);
    for (name, slot) in uniform_slots(&fragment.module) {
        match uniforms.iter().find(|(n, _)| *n == name) {
            Some((_, existing)) if *existing != slot => {
                return Err(link_error(format!(
                    "uniform `{name}` bound at {existing:?} in the vertex stage and {slot:?} in the fragment stage"
                )));
            }
            Some(_) => {}
            None => uniforms.push((name, slot)),
        }
    }

    log::debug!(
        "linked shader program ({} → {}, {} uniform(s))",
        vertex.entry_point,
        fragment.entry_point,
        uniforms.len()
    );

    Ok(ShaderProgram {
        vertex_source: vertex.source,
        vertex_entry: vertex.entry_point,
        fragment_source: fragment.source,
        fragment_entry: fragment.entry_point,
        vertex_inputs,
        uniforms,
    })
}

/// Compiles and links the built-in quad program.
pub fn build_quad_program() -> Result<ShaderProgram, ShaderError> {
    let vertex = compile(ShaderKind::Vertex, QUAD_VERTEX_SHADER)?;
    let fragment = compile(ShaderKind::Fragment, QUAD_FRAGMENT_SHADER)?;
    link(vertex, fragment)
}

// ── interface helpers ─────────────────────────────────────────────────────

struct Located {
    name: String,
    location: u32,
    inner: naga::TypeInner,
}

/// Flattens `@location` bindings, descending one level into structs.
fn collect_locations<'m>(
    module: &naga::Module,
    items: impl Iterator<Item = (Option<&'m str>, naga::Handle<naga::Type>, Option<&'m naga::Binding>)>,
) -> Vec<Located> {
    let mut out = Vec::new();
    for (name, ty, binding) in items {
        match binding {
            Some(naga::Binding::Location { location, .. }) => out.push(Located {
                name: name.unwrap_or("<unnamed>").to_owned(),
                location: *location,
                inner: module.types[ty].inner.clone(),
            }),
            Some(_) => {}
            None => {
                if let naga::TypeInner::Struct { members, .. } = &module.types[ty].inner {
                    for member in members {
                        if let Some(naga::Binding::Location { location, .. }) = &member.binding {
                            out.push(Located {
                                name: member.name.clone().unwrap_or_else(|| "<unnamed>".to_owned()),
                                location: *location,
                                inner: module.types[member.ty].inner.clone(),
                            });
                        }
                    }
                }
            }
        }
    }
    out
}

fn is_plain_value(inner: &naga::TypeInner) -> bool {
    matches!(inner, naga::TypeInner::Scalar(_) | naga::TypeInner::Vector { .. })
}

fn vertex_format(inner: &naga::TypeInner) -> Option<wgpu::VertexFormat> {
    use naga::{Scalar, TypeInner, VectorSize};

    match *inner {
        TypeInner::Scalar(Scalar::F32) => Some(wgpu::VertexFormat::Float32),
        TypeInner::Vector { size, scalar: Scalar::F32 } => Some(match size {
            VectorSize::Bi => wgpu::VertexFormat::Float32x2,
            VectorSize::Tri => wgpu::VertexFormat::Float32x3,
            VectorSize::Quad => wgpu::VertexFormat::Float32x4,
        }),
        _ => None,
    }
}

fn uniform_slots(module: &naga::Module) -> Vec<(String, UniformSlot)> {
    module
        .global_variables
        .iter()
        .filter(|(_, var)| matches!(var.space, naga::AddressSpace::Uniform))
        .filter_map(|(_, var)| {
            let name = var.name.clone()?;
            let binding = var.binding.as_ref()?;
            Some((name, UniformSlot { group: binding.group, binding: binding.binding }))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const VS_WITHOUT_COLOR: &str = r#"
@vertex
fn vs_main(@location(0) p: vec2<f32>) -> @builtin(position) vec4<f32> {
    return vec4<f32>(p, 0.0, 1.0);
}
"#;

    const VS_SCALAR_OUT: &str = r#"
struct Out {
    @builtin(position) pos: vec4<f32>,
    @location(0) shade: f32,
};

@vertex
fn vs_main(@location(0) p: vec2<f32>) -> Out {
    var o: Out;
    o.pos = vec4<f32>(p, 0.0, 1.0);
    o.shade = 1.0;
    return o;
}
"#;

    // ── compile ───────────────────────────────────────────────────────────

    #[test]
    fn builtin_stages_compile() {
        let vs = compile(ShaderKind::Vertex, QUAD_VERTEX_SHADER).unwrap();
        let fs = compile(ShaderKind::Fragment, QUAD_FRAGMENT_SHADER).unwrap();
        assert_eq!(vs.entry_point(), "vs_main");
        assert_eq!(fs.entry_point(), "fs_main");
        assert_eq!(vs.kind(), ShaderKind::Vertex);
    }

    #[test]
    fn syntax_error_reports_stage() {
        let err = compile(ShaderKind::Vertex, "fn vs_main( {").unwrap_err();
        let ShaderError::Compile { kind, message } = &err else {
            panic!("expected compile error, got {err:?}");
        };
        assert_eq!(*kind, ShaderKind::Vertex);
        assert!(!message.is_empty());
        assert!(err.to_string().starts_with("compilation of vertex shader failed"));
    }

    #[test]
    fn wrong_stage_is_a_compile_error() {
        let err = compile(ShaderKind::Vertex, QUAD_FRAGMENT_SHADER).unwrap_err();
        assert_eq!(
            err,
            ShaderError::Compile {
                kind: ShaderKind::Vertex,
                message: "no vertex shader entry point declared".to_owned(),
            }
        );
    }

    // ── link ──────────────────────────────────────────────────────────────

    #[test]
    fn quad_program_links_with_projection_uniform() {
        let program = build_quad_program().unwrap();
        assert_eq!(
            program.uniform_binding("u_projection"),
            Some(UniformSlot { group: 0, binding: 0 })
        );
        assert_eq!(program.uniform_binding("u_view"), None);
        assert_eq!(program.vertex_entry(), "vs_main");
        assert_eq!(program.fragment_entry(), "fs_main");
    }

    #[test]
    fn quad_program_records_vertex_inputs() {
        let program = build_quad_program().unwrap();
        let inputs: Vec<_> = program.vertex_inputs().iter().map(|i| (i.location, i.format)).collect();
        assert_eq!(
            inputs,
            vec![
                (0, Some(wgpu::VertexFormat::Float32x2)),
                (1, Some(wgpu::VertexFormat::Float32x3)),
            ]
        );

        let attrs = wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x3];
        assert!(program.check_vertex_layout(&attrs).is_ok());

        let missing = wgpu::vertex_attr_array![0 => Float32x2];
        let err = program.check_vertex_layout(&missing).unwrap_err();
        assert!(err.to_string().contains("`in_color` at location 1"), "{err}");
    }

    #[test]
    fn unwritten_fragment_input_fails_link() {
        let vs = compile(ShaderKind::Vertex, VS_WITHOUT_COLOR).unwrap();
        let fs = compile(ShaderKind::Fragment, QUAD_FRAGMENT_SHADER).unwrap();
        let err = link(vs, fs).unwrap_err();
        let ShaderError::Link { message } = &err else {
            panic!("expected link error, got {err:?}");
        };
        assert!(message.contains("location 0"), "{message}");
    }

    #[test]
    fn mismatched_types_fail_link() {
        let vs = compile(ShaderKind::Vertex, VS_SCALAR_OUT).unwrap();
        let fs = compile(ShaderKind::Fragment, QUAD_FRAGMENT_SHADER).unwrap();
        let err = link(vs, fs).unwrap_err();
        assert!(err.to_string().contains("type mismatch"), "{err}");
    }

    #[test]
    fn swapped_stages_fail_link() {
        let vs = compile(ShaderKind::Vertex, QUAD_VERTEX_SHADER).unwrap();
        let fs = compile(ShaderKind::Fragment, QUAD_FRAGMENT_SHADER).unwrap();
        assert!(matches!(link(fs, vs), Err(ShaderError::Link { .. })));
    }

    #[test]
    fn kind_names() {
        assert_eq!(ShaderKind::Vertex.to_string(), "vertex shader");
        assert_eq!(ShaderKind::Fragment.name(), "fragment shader");
    }
}
