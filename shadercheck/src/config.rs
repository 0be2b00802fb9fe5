use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use gl::types::GLint;
use gl_wrapper::UniformValue;
use linalg::{Mat4, Vec2, Vec3, Vec4};
use serde::Deserialize;
use thiserror::Error;

#[derive(Deserialize, Debug)]
pub struct Config {
    #[serde(rename = "program", default)]
    pub programs: Vec<ProgramEntry>,
}

#[derive(Deserialize, Debug)]
pub struct ProgramEntry {
    pub name: String,
    pub vertex: PathBuf,
    pub fragment: PathBuf,
    #[serde(default)]
    pub uniforms: BTreeMap<String, Uniform>,
}

/// A uniform value as written in the config. Integers stay integers, so float uniforms need a
/// decimal point (`1.0`, not `1`).
#[derive(Deserialize, Debug, PartialEq)]
#[serde(untagged)]
pub enum Uniform {
    Bool(bool),
    Int(i32),
    Float(f32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat4(Mat4),
}

impl Uniform {
    /// Uploads to `location` of the program in use.
    pub fn upload(&self, location: GLint) {
        match self {
            Uniform::Bool(v) => v.upload(location),
            Uniform::Int(v) => v.upload(location),
            Uniform::Float(v) => v.upload(location),
            Uniform::Vec2(v) => v.upload(location),
            Uniform::Vec3(v) => v.upload(location),
            Uniform::Vec4(v) => v.upload(location),
            Uniform::Mat4(v) => v.upload(location),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config structure: {0}")]
    Format(#[from] toml::de::Error),
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        let config = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;

        Ok(toml::from_str(&config)?)
    }
}

impl ProgramEntry {
    /// Shader paths are relative to the directory holding the config file.
    pub fn shader_paths(&self, base: &Path) -> (PathBuf, PathBuf) {
        (base.join(&self.vertex), base.join(&self.fragment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"
        [[program]]
        name = "phong"
        vertex = "shaders/phong.vert"
        fragment = "shaders/phong.frag"

        [program.uniforms]
        lightDir = [0.0, 1.0, 0.0]
        shininess = 32.0
        texUnit = 0
        useTexture = true
        screenSize = [1280.0, 720.0]
        colour = [1.0, 0.5, 0.25, 1.0]
        MV = [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, -5.0],
            [0.0, 0.0, 0.0, 1.0],
        ]

        [[program]]
        name = "flat"
        vertex = "flat.vert"
        fragment = "flat.frag"
    "#;

    #[test]
    fn parses_programs_and_uniforms() {
        let config: Config = toml::from_str(CONFIG).unwrap();

        assert_eq!(config.programs.len(), 2);

        let phong = &config.programs[0];
        assert_eq!(phong.name, "phong");
        assert_eq!(
            phong.uniforms["lightDir"],
            Uniform::Vec3(Vec3::new(0.0, 1.0, 0.0))
        );
        assert_eq!(phong.uniforms["shininess"], Uniform::Float(32.0));
        assert_eq!(phong.uniforms["texUnit"], Uniform::Int(0));
        assert_eq!(phong.uniforms["useTexture"], Uniform::Bool(true));
        assert_eq!(
            phong.uniforms["screenSize"],
            Uniform::Vec2(Vec2::new(1280.0, 720.0))
        );
        assert_eq!(
            phong.uniforms["colour"],
            Uniform::Vec4(Vec4::new(1.0, 0.5, 0.25, 1.0))
        );
        assert_eq!(
            phong.uniforms["MV"],
            Uniform::Mat4(linalg::transform::translate_xyz(0.0, 0.0, -5.0))
        );

        assert!(config.programs[1].uniforms.is_empty());
    }

    #[test]
    fn shader_paths_are_relative_to_config() {
        let config: Config = toml::from_str(CONFIG).unwrap();
        let (vert, frag) = config.programs[0].shader_paths(Path::new("assets"));

        assert_eq!(vert, Path::new("assets/shaders/phong.vert"));
        assert_eq!(frag, Path::new("assets/shaders/phong.frag"));
    }

    #[test]
    fn rejects_unsupported_uniform() {
        let res = toml::from_str::<Config>(
            r#"
            [[program]]
            name = "bad"
            vertex = "a.vert"
            fragment = "a.frag"
            uniforms = { weights = [1.0, 2.0, 3.0, 4.0, 5.0] }
            "#,
        );

        assert!(res.is_err());
    }

    #[test]
    fn missing_file() {
        let err = Config::load("does/not/exist.toml").unwrap_err();

        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
