// --- File: crates/clinic_config/src/lib.rs ---
use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

pub mod models;
pub use models::*;

/// Default prefix for configuration environment variables.
pub const DEFAULT_PREFIX: &str = "CLINIC";

/// Separator between prefix, section and key, e.g. `CLINIC__API__BASE_URL`.
pub const CONFIG_SEPARATOR: &str = "__";

/// Loads the layered configuration for the running environment.
///
/// Sources, later ones winning: `config/default`, `config/{RUN_ENV}`, then
/// `CLINIC__*` environment variables. The config directory can be moved with
/// `CLINIC_CONFIG_DIR`; `RUN_ENV` defaults to `debug`.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());
    let config_dir = env::var("CLINIC_CONFIG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config"));

    load_config_from(&config_dir, &run_env, DEFAULT_PREFIX)
}

/// Loads configuration from an explicit directory, environment name and
/// variable prefix.
pub fn load_config_from(
    config_dir: &Path,
    run_env: &str,
    prefix: &str,
) -> Result<AppConfig, ConfigError> {
    let default_path = config_dir.join("default");
    let env_path = config_dir.join(run_env);

    debug!(
        "Loading config from {} and {}",
        default_path.display(),
        env_path.display()
    );

    let builder = Config::builder()
        .add_source(File::with_name(&default_path.to_string_lossy()).required(false))
        .add_source(File::with_name(&env_path.to_string_lossy()).required(false))
        .add_source(
            Environment::with_prefix(prefix)
                .separator(CONFIG_SEPARATOR)
                .try_parsing(true),
        );

    let config: AppConfig = builder.build()?.try_deserialize()?;
    config
        .clinic
        .slot_policy()
        .map_err(|err| ConfigError::Message(format!("invalid clinic hours: {err}")))?;
    Ok(config)
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Loads the dotenv file into the process environment, once.
///
/// `DOTENV_OVERRIDE` names an alternative file; otherwise `.env` is used.
/// A missing file is not an error.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path = env::var("DOTENV_OVERRIDE").unwrap_or_else(|_| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });

    dotenv_path
}
