use std::fmt;

use super::shader::ShaderError;

/// Failure while creating or driving a [`Renderer`](super::Renderer).
///
/// Contract violations (full batch, bad quad arguments, calls out of order) are
/// not represented here; they panic.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderError {
    /// Renderer configuration rejected before any GPU object was created.
    InvalidConfig(String),
    /// Shader stage failed to compile or the program failed to link.
    Shader(ShaderError),
    /// Linked program does not declare a uniform the renderer binds.
    MissingUniform { name: &'static str },
    /// Requested allocation exceeds the device limit.
    BufferTooLarge { label: &'static str, size: u64, max: u64 },
    /// A graphics call was rejected by the backend.
    Backend { call: &'static str, message: String },
}

impl RenderError {
    pub(crate) fn backend(call: &'static str, message: impl Into<String>) -> Self {
        Self::Backend { call, message: message.into() }
    }
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig(msg) => write!(f, "invalid renderer config: {msg}"),
            Self::Shader(err) => write!(f, "{err}"),
            Self::MissingUniform { name } => {
                write!(f, "shader program has no uniform named `{name}`")
            }
            Self::BufferTooLarge { label, size, max } => write!(
                f,
                "buffer `{label}` needs {size} bytes, device allows at most {max}"
            ),
            Self::Backend { call, message } => write!(f, "`{call}` failed: {message}"),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Shader(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ShaderError> for RenderError {
    fn from(err: ShaderError) -> Self {
        Self::Shader(err)
    }
}
