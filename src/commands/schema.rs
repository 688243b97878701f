use crate::commands::Out;
use crate::{Config, Result};

/// The JSON schema of the config file.
pub async fn schema() -> Result<Out<schemars::Schema>> {
    Ok(Out::new("Config file schema", Config::schema()))
}
