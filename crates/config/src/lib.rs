// Configuration loading

pub mod settings;

pub use settings::{
    ConfigError, ImportConfig, load_dotenv,
    DEFAULT_ARCHITECTS_CSV, DEFAULT_BUILDINGS_CSV,
    DEFAULT_ARCHITECTS_ENDPOINT, DEFAULT_BUILDINGS_ENDPOINT,
};
