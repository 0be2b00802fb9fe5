use gl::types::{GLchar, GLenum, GLint, GLsizei, GLuint};
use std::ffi::{CStr, CString};
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::activation;
use crate::uniform::UniformValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex = gl::VERTEX_SHADER as isize,
    Fragment = gl::FRAGMENT_SHADER as isize,
}

impl Display for ShaderStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ShaderStage::Vertex => write!(f, "vertex"),
            ShaderStage::Fragment => write!(f, "fragment"),
        }
    }
}

pub struct ProgramBuilder {
    name: String,
    vert: String,
    frag: String,
}

impl ProgramBuilder {
    pub fn new(vert_src: &str, frag_src: &str) -> Self {
        Self {
            name: "program".to_string(),
            vert: vert_src.to_string(),
            frag: frag_src.to_string(),
        }
    }

    /// Reads both stages from text files. The program is named after the vertex shader file.
    pub fn from_files<P: AsRef<Path>, Q: AsRef<Path>>(
        vert_path: P,
        frag_path: Q,
    ) -> Result<Self, PBError> {
        let vert_path = vert_path.as_ref();

        let name = vert_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_else(|| "program".to_string());

        Ok(Self {
            name,
            vert: read_source(vert_path)?,
            frag: read_source(frag_path.as_ref())?,
        })
    }

    /// Name used in diagnostics.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn build(self) -> Result<Program, PBError> {
        let vert = self.source(ShaderStage::Vertex, &self.vert)?;
        let frag = self.source(ShaderStage::Fragment, &self.frag)?;

        let vert = compile(ShaderStage::Vertex, &vert)
            .map_err(|log| self.compile_error(ShaderStage::Vertex, log))?;

        let frag = match compile(ShaderStage::Fragment, &frag) {
            Ok(frag) => frag,
            Err(log) => {
                unsafe { gl::DeleteShader(vert) };
                return Err(self.compile_error(ShaderStage::Fragment, log));
            }
        };

        let mut success: GLint = 0;

        unsafe {
            let program = gl::CreateProgram();
            gl::AttachShader(program, vert);
            gl::AttachShader(program, frag);
            gl::LinkProgram(program);

            gl::DetachShader(program, vert);
            gl::DetachShader(program, frag);
            gl::DeleteShader(vert);
            gl::DeleteShader(frag);

            gl::GetProgramiv(program, gl::LINK_STATUS, &mut success);
            if success != gl::TRUE as GLint {
                let log = info_log(program, gl::GetProgramiv, gl::GetProgramInfoLog);
                gl::DeleteProgram(program);

                return Err(PBError::Linking {
                    name: self.name,
                    log,
                });
            }

            log::debug!("built program {} ({program})", self.name);

            Ok(Program {
                id: program,
                name: self.name,
            })
        }
    }

    fn source(&self, stage: ShaderStage, src: &str) -> Result<CString, PBError> {
        CString::new(src).map_err(|_| PBError::InvalidSource {
            name: self.name.clone(),
            stage,
        })
    }

    fn compile_error(&self, stage: ShaderStage, log: String) -> PBError {
        PBError::Compilation {
            name: self.name.clone(),
            stage,
            log,
        }
    }
}

fn read_source(path: &Path) -> Result<String, PBError> {
    std::fs::read_to_string(path).map_err(|source| PBError::Io {
        path: path.to_owned(),
        source,
    })
}

/// Returns the shader id, or the info log when compilation fails.
fn compile(stage: ShaderStage, src: &CStr) -> Result<GLuint, String> {
    let mut success: GLint = 0;

    unsafe {
        let shader = gl::CreateShader(stage as GLenum);

        gl::ShaderSource(shader, 1, &src.as_ptr(), std::ptr::null());
        gl::CompileShader(shader);

        gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut success);
        if success != gl::TRUE as GLint {
            let log = info_log(shader, gl::GetShaderiv, gl::GetShaderInfoLog);
            gl::DeleteShader(shader);

            return Err(log);
        }

        Ok(shader)
    }
}

unsafe fn info_log(
    id: GLuint,
    get_iv: unsafe fn(GLuint, GLenum, *mut GLint),
    get_log: unsafe fn(GLuint, GLsizei, *mut GLsizei, *mut GLchar),
) -> String {
    let mut len: GLint = 0;
    get_iv(id, gl::INFO_LOG_LENGTH, &mut len);

    let mut buf = vec![0_u8; len.max(1) as usize];
    let mut written: GLsizei = 0;

    get_log(
        id,
        buf.len() as GLsizei,
        &mut written,
        buf.as_mut_ptr() as *mut GLchar,
    );

    buf.truncate(written.max(0) as usize);

    log_to_string(&buf)
}

/// Drivers differ on whether the NUL terminator is counted, so cut at the first one.
fn log_to_string(buf: &[u8]) -> String {
    let data = buf.split(|&b| b == 0).next().unwrap_or(buf);

    String::from_utf8_lossy(data).trim_end().to_string()
}

#[derive(Debug, Error)]
pub enum PBError {
    #[error("could not read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{name}: {stage} shader source contains a NUL byte")]
    InvalidSource { name: String, stage: ShaderStage },
    #[error("{name}: {stage} shader failed to compile:\n{log}")]
    Compilation {
        name: String,
        stage: ShaderStage,
        log: String,
    },
    #[error("{name}: program failed to link:\n{log}")]
    Linking { name: String, log: String },
}

pub struct Program {
    id: GLuint,
    name: String,
}

impl Program {
    pub fn id(&self) -> GLuint {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Makes this the program in use until the returned guard is dropped, after which the
    /// previously active program is bound again.
    pub fn activate(&self) -> ActiveProgram<'_> {
        activation::activate(self.id);

        ActiveProgram { program: self }
    }

    pub fn is_active(&self) -> bool {
        activation::current_program() == self.id
    }

    /// Writes `value` to the uniform called `name`.
    ///
    /// Like `glUniform*`, this targets the program in use, so the program has to be active.
    /// Names the driver does not know about are skipped.
    pub fn set_uniform<T: UniformValue + ?Sized>(&self, name: &str, value: &T) {
        if !self.is_active() {
            log::warn!("{}: setting uniform {name:?} while not active", self.name);
        }

        match self.uniform_location(name) {
            Some(location) => value.upload(location),
            None => log::debug!("{}: no active uniform named {name:?}", self.name),
        }
    }

    /// `None` when the driver reports no active uniform called `name`.
    pub fn uniform_location(&self, name: &str) -> Option<GLint> {
        let c_name = CString::new(name).ok()?;
        let location = unsafe { gl::GetUniformLocation(self.id, c_name.as_ptr()) };

        (location >= 0).then_some(location)
    }
}

impl Drop for Program {
    fn drop(&mut self) {
        unsafe { gl::DeleteProgram(self.id) }
    }
}

#[must_use = "the program is deactivated as soon as the guard is dropped"]
pub struct ActiveProgram<'a> {
    program: &'a Program,
}

impl ActiveProgram<'_> {
    pub fn program(&self) -> &Program {
        self.program
    }

    pub fn set_uniform<T: UniformValue + ?Sized>(&self, name: &str, value: &T) {
        self.program.set_uniform(name, value)
    }

    pub fn deactivate(self) {}
}

impl Drop for ActiveProgram<'_> {
    fn drop(&mut self) {
        activation::deactivate(self.program.id);
    }
}
