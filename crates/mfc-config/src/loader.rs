//! Reading task configuration files
//!
//! The format follows the file extension. Relative local-connection paths
//! are resolved against the directory holding the config file.

use std::path::{Path, PathBuf};

use mfc_core::{Connection, ProjectConfig};

use crate::error::{ConfigError, ConfigFormat};
use crate::raw::RawTaskConfig;
use crate::validate::{validate, TaskConfig};

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase) {
            Some(ext) if ext == "yaml" || ext == "yml" => Ok(ConfigFormat::Yaml),
            Some(ext) if ext == "json" => Ok(ConfigFormat::Json),
            _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// Parse without validating
pub fn parse(content: &str, format: ConfigFormat) -> Result<RawTaskConfig, ConfigError> {
    let parsed = match format {
        ConfigFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
        ConfigFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
    };
    parsed.map_err(|reason| ConfigError::Parse { format, reason })
}

pub fn from_yaml(yaml: &str) -> Result<TaskConfig, ConfigError> {
    validate(parse(yaml, ConfigFormat::Yaml)?)
}

pub fn from_json(json: &str) -> Result<TaskConfig, ConfigError> {
    validate(parse(json, ConfigFormat::Json)?)
}

fn resolve_local_paths(projects: &mut [ProjectConfig], base: &Path) {
    let resolve = |path: &mut PathBuf| {
        if path.is_relative() {
            *path = base.join(&*path);
        }
    };

    for project in projects {
        if let Connection::Local {
            build_info_file,
            file_list_file,
        } = &mut project.connection
        {
            resolve(build_info_file);
            resolve(file_list_file);
        }
    }
}

/// Read a config file without validating it
pub fn load_raw(path: impl AsRef<Path>) -> Result<RawTaskConfig, ConfigError> {
    let path = path.as_ref();
    let format = ConfigFormat::from_path(path)?;
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut raw = parse(&content, format)?;
    if let Some(base) = path.parent() {
        resolve_local_paths(&mut raw.target_projects, base);
        resolve_local_paths(&mut raw.baseline_projects, base);
    }
    Ok(raw)
}

/// Read and validate a config file
pub fn load(path: impl AsRef<Path>) -> Result<TaskConfig, ConfigError> {
    validate(load_raw(path)?)
}
