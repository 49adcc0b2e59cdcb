//! kn-project: run configuration file format and validation.

pub mod schema;
pub mod validate;

pub use schema::*;
pub use validate::{ValidationError, validate_config};

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported configuration format: {path}")]
    UnsupportedFormat { path: String },
}

/// Parse YAML text. Enums are written as single-key maps
/// (`hydro: {relativistic: ...}`) rather than YAML tags.
pub fn from_yaml_str(content: &str) -> ProjectResult<Configuration> {
    let config: Configuration = serde_yaml::with::singleton_map_recursive::deserialize(
        serde_yaml::Deserializer::from_str(content),
    )?;
    Ok(config)
}

pub fn to_yaml_string(config: &Configuration) -> ProjectResult<String> {
    let mut buffer = Vec::new();
    {
        let mut serializer = serde_yaml::Serializer::new(&mut buffer);
        serde_yaml::with::singleton_map_recursive::serialize(config, &mut serializer)?;
    }
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

pub fn load_yaml(path: &std::path::Path) -> ProjectResult<Configuration> {
    let content = std::fs::read_to_string(path)?;
    let config = from_yaml_str(&content)?;
    validate_config(&config)?;
    Ok(config)
}

pub fn save_yaml(path: &std::path::Path, config: &Configuration) -> ProjectResult<()> {
    validate_config(config)?;
    let content = to_yaml_string(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &std::path::Path) -> ProjectResult<Configuration> {
    let content = std::fs::read_to_string(path)?;
    let config: Configuration = serde_json::from_str(&content)?;
    validate_config(&config)?;
    Ok(config)
}

pub fn save_json(path: &std::path::Path, config: &Configuration) -> ProjectResult<()> {
    validate_config(config)?;
    let content = serde_json::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load a configuration, choosing the format from the file extension.
pub fn load(path: &std::path::Path) -> ProjectResult<Configuration> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => load_yaml(path),
        Some("json") => load_json(path),
        _ => Err(ProjectError::UnsupportedFormat {
            path: path.display().to_string(),
        }),
    }
}
