use std::path::Path;

use gl_wrapper::{check_errors, GlError, PBError, ProgramBuilder};
use thiserror::Error;

use crate::config::ProgramEntry;

#[derive(Debug, Error)]
pub enum CheckError {
    #[error(transparent)]
    Build(#[from] PBError),
    #[error(transparent)]
    Gl(#[from] GlError),
}

/// Builds one program, activates it and uploads its configured uniforms.
pub fn check_program(base: &Path, entry: &ProgramEntry) -> Result<(), CheckError> {
    let (vert, frag) = entry.shader_paths(base);

    let program = ProgramBuilder::from_files(vert, frag)?
        .with_name(&entry.name)
        .build()?;

    check_errors(&format!("{}: build", entry.name))?;

    let active = program.activate();

    for (name, value) in &entry.uniforms {
        let Some(location) = active.program().uniform_location(name) else {
            log::warn!("{}: uniform {name:?} is not used by the program", entry.name);
            continue;
        };

        value.upload(location);
        check_errors(&format!("{}: uniform {name}", entry.name))?;
    }

    active.deactivate();

    check_errors(&format!("{}: deactivate", entry.name))?;

    Ok(())
}
