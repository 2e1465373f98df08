use clap::Parser;
use once_cell::sync::Lazy;
use tracing::warn;

pub const DEFAULT_SCHEMA: &str = "public";

#[derive(Parser, Debug, Clone)]
#[command(name = "pgenum")]
#[command(about = "pgenum - Rust enums on native PostgreSQL ENUM columns", long_about = None)]
pub struct Config {
    #[arg(long, default_value = "info", env = "PGENUM_LOG_LEVEL")]
    pub log_level: String,

    #[arg(long, default_value = DEFAULT_SCHEMA, env = "PGENUM_DEFAULT_SCHEMA", help = "Schema used to qualify enum type names given without one")]
    pub default_schema: String,

    #[arg(long, default_value_t = true, action = clap::ArgAction::Set, env = "PGENUM_VERIFY_CATALOG", help = "Reject registrations whose server enum type lacks some of the family's labels")]
    pub verify_catalog: bool,

    #[arg(long, default_value = "64", env = "PGENUM_REGISTRY_CAPACITY", help = "Initial number of enum families the registry reserves room for")]
    pub registry_capacity: usize,
}

impl Config {
    /// Resolve the configuration from PGENUM_* environment variables only.
    ///
    /// The host process's command line belongs to the application embedding
    /// this crate, so it is never parsed here.
    pub fn from_env() -> Self {
        match Config::try_parse_from(["pgenum"]) {
            Ok(config) => config,
            Err(e) => {
                warn!("Ignoring invalid pgenum environment configuration: {}", e);
                Config::default()
            }
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_level: "info".to_string(),
            default_schema: DEFAULT_SCHEMA.to_string(),
            verify_catalog: true,
            registry_capacity: 64,
        }
    }
}

// Global configuration instance
pub static CONFIG: Lazy<Config> = Lazy::new(Config::from_env);
