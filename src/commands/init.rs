use crate::commands::Out;
use crate::pipeline::Preset;
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the config file at `path` from `preset`.
///
/// # Errors
/// - Returns an error if the file exists and `force` is false, or if any file operation fails.
pub async fn init(path: &Path, preset: Preset, force: bool) -> Result<Out<()>> {
    let config = Config::create(path, preset, force)
        .await
        .context("Unable to create the config file")?;
    Ok(format!(
        "Successfully created the {preset} config at {}",
        config.path().display()
    )
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        let out = init(&path, Preset::Open, false).await.unwrap();
        assert!(out.message().contains("open config"));
        assert!(path.is_file());
        assert!(init(&path, Preset::Open, false).await.is_err());
    }
}
