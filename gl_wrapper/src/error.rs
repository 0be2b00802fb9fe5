use gl::types::GLenum;
use thiserror::Error;

/// Upper bound on errors drained per check; some drivers keep reporting without a current context.
const MAX_ERRORS: usize = 32;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("{location}: OpenGL error {}", format_codes(.codes))]
pub struct GlError {
    pub location: String,
    pub codes: Vec<GLenum>,
}

pub fn error_name(code: GLenum) -> &'static str {
    match code {
        gl::INVALID_ENUM => "GL_INVALID_ENUM",
        gl::INVALID_VALUE => "GL_INVALID_VALUE",
        gl::INVALID_OPERATION => "GL_INVALID_OPERATION",
        gl::INVALID_FRAMEBUFFER_OPERATION => "GL_INVALID_FRAMEBUFFER_OPERATION",
        gl::OUT_OF_MEMORY => "GL_OUT_OF_MEMORY",
        gl::STACK_UNDERFLOW => "GL_STACK_UNDERFLOW",
        gl::STACK_OVERFLOW => "GL_STACK_OVERFLOW",
        _ => "unknown",
    }
}

fn format_codes(codes: &[GLenum]) -> String {
    codes
        .iter()
        .map(|&code| format!("{} (0x{code:04X})", error_name(code)))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Drains the GL error queue. `location` names the call site in the report.
pub fn check_errors(location: &str) -> Result<(), GlError> {
    let mut codes = Vec::new();

    while codes.len() < MAX_ERRORS {
        let code = unsafe { gl::GetError() };

        if code == gl::NO_ERROR {
            break;
        }

        log::error!("{location}: OpenGL error {}", error_name(code));
        codes.push(code);
    }

    if codes.is_empty() {
        Ok(())
    } else {
        Err(GlError {
            location: location.to_string(),
            codes,
        })
    }
}
