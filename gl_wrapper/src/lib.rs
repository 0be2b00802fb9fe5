pub mod activation;
pub mod error;
pub mod program;
pub mod uniform;

pub use error::{check_errors, GlError};
pub use program::{ActiveProgram, PBError, Program, ProgramBuilder, ShaderStage};
pub use uniform::UniformValue;
