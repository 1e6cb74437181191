use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::questionnaire::DEFAULT_REQUIRED_TURNS;
use crate::quota::DEFAULT_FREE_RECOMMENDATIONS;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub llm: LlmConfig,
    pub server: ServerConfig,
    pub catalog: CatalogConfig,
    pub buyer: BuyerConfig,
    pub places: PlacesConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct LlmConfig {
    pub provider: LlmProvider,
    pub api_key: Option<SecretString>,
    pub base_url: Option<String>,
    pub model: String,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    pub graceful_shutdown_secs: u64,
}

#[derive(Clone, Debug)]
pub struct CatalogConfig {
    pub csv_path: PathBuf,
}

#[derive(Clone, Debug)]
pub struct BuyerConfig {
    pub free_recommendations: u32,
    pub questionnaire_turns: usize,
    pub honor_explicit_requests: bool,
}

#[derive(Clone, Debug)]
pub struct PlacesConfig {
    pub mode: PlacesMode,
    pub api_key: Option<SecretString>,
    pub base_url: String,
    pub radius_meters: u32,
    pub keyword: String,
    pub max_results: usize,
    pub region: String,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LlmProvider {
    #[serde(rename = "openai")]
    OpenAi,
    Ollama,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacesMode {
    Live,
    Fixture,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub database_url: Option<String>,
    pub log_level: Option<String>,
    pub llm_provider: Option<LlmProvider>,
    pub llm_model: Option<String>,
    pub llm_api_key: Option<String>,
    pub llm_base_url: Option<String>,
    pub server_port: Option<u16>,
    pub catalog_path: Option<PathBuf>,
    pub places_mode: Option<PlacesMode>,
    pub places_api_key: Option<String>,
    pub places_base_url: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "sqlite://carmatch.db?mode=rwc".to_string(),
                max_connections: 5,
                timeout_secs: 30,
            },
            llm: LlmConfig {
                provider: LlmProvider::OpenAi,
                api_key: None,
                base_url: None,
                model: "gpt-4o".to_string(),
                timeout_secs: 60,
            },
            server: ServerConfig {
                bind_address: "127.0.0.1".to_string(),
                port: 3000,
                graceful_shutdown_secs: 15,
            },
            catalog: CatalogConfig { csv_path: PathBuf::from("data/cars.csv") },
            buyer: BuyerConfig {
                free_recommendations: DEFAULT_FREE_RECOMMENDATIONS,
                questionnaire_turns: DEFAULT_REQUIRED_TURNS,
                honor_explicit_requests: false,
            },
            places: PlacesConfig {
                mode: PlacesMode::Fixture,
                api_key: None,
                base_url: "https://maps.googleapis.com/maps/api".to_string(),
                radius_meters: 15_000,
                keyword: "מוסך".to_string(),
                max_results: 10,
                region: "il".to_string(),
                timeout_secs: 10,
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

fn secret_value(value: String) -> SecretString {
    value.into()
}

impl std::str::FromStr for LlmProvider {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "openai" | "open_ai" => Ok(Self::OpenAi),
            "ollama" => Ok(Self::Ollama),
            other => Err(ConfigError::Validation(format!(
                "unsupported llm provider `{other}` (expected openai|ollama)"
            ))),
        }
    }
}

impl std::str::FromStr for PlacesMode {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "live" => Ok(Self::Live),
            "fixture" => Ok(Self::Fixture),
            other => Err(ConfigError::Validation(format!(
                "unsupported places mode `{other}` (expected live|fixture)"
            ))),
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("carmatch.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(database) = patch.database {
            if let Some(url) = database.url {
                self.database.url = url;
            }
            if let Some(max_connections) = database.max_connections {
                self.database.max_connections = max_connections;
            }
            if let Some(timeout_secs) = database.timeout_secs {
                self.database.timeout_secs = timeout_secs;
            }
        }

        if let Some(llm) = patch.llm {
            if let Some(provider) = llm.provider {
                self.llm.provider = provider;
            }
            if let Some(llm_api_key_value) = llm.api_key {
                self.llm.api_key = Some(secret_value(llm_api_key_value));
            }
            if let Some(base_url) = llm.base_url {
                self.llm.base_url = Some(base_url);
            }
            if let Some(model) = llm.model {
                self.llm.model = model;
            }
            if let Some(timeout_secs) = llm.timeout_secs {
                self.llm.timeout_secs = timeout_secs;
            }
        }

        if let Some(server) = patch.server {
            if let Some(bind_address) = server.bind_address {
                self.server.bind_address = bind_address;
            }
            if let Some(port) = server.port {
                self.server.port = port;
            }
            if let Some(graceful_shutdown_secs) = server.graceful_shutdown_secs {
                self.server.graceful_shutdown_secs = graceful_shutdown_secs;
            }
        }

        if let Some(catalog) = patch.catalog {
            if let Some(csv_path) = catalog.csv_path {
                self.catalog.csv_path = csv_path;
            }
        }

        if let Some(buyer) = patch.buyer {
            if let Some(free_recommendations) = buyer.free_recommendations {
                self.buyer.free_recommendations = free_recommendations;
            }
            if let Some(questionnaire_turns) = buyer.questionnaire_turns {
                self.buyer.questionnaire_turns = questionnaire_turns;
            }
            if let Some(honor_explicit_requests) = buyer.honor_explicit_requests {
                self.buyer.honor_explicit_requests = honor_explicit_requests;
            }
        }

        if let Some(places) = patch.places {
            if let Some(mode) = places.mode {
                self.places.mode = mode;
            }
            if let Some(places_api_key_value) = places.api_key {
                self.places.api_key = Some(secret_value(places_api_key_value));
            }
            if let Some(base_url) = places.base_url {
                self.places.base_url = base_url;
            }
            if let Some(radius_meters) = places.radius_meters {
                self.places.radius_meters = radius_meters;
            }
            if let Some(keyword) = places.keyword {
                self.places.keyword = keyword;
            }
            if let Some(max_results) = places.max_results {
                self.places.max_results = max_results;
            }
            if let Some(region) = places.region {
                self.places.region = region;
            }
            if let Some(timeout_secs) = places.timeout_secs {
                self.places.timeout_secs = timeout_secs;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("CARMATCH_DATABASE_URL") {
            self.database.url = value;
        }
        if let Some(value) = read_env("CARMATCH_DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections =
                parse_u32("CARMATCH_DATABASE_MAX_CONNECTIONS", &value)?;
        }
        if let Some(value) = read_env("CARMATCH_DATABASE_TIMEOUT_SECS") {
            self.database.timeout_secs = parse_u64("CARMATCH_DATABASE_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("CARMATCH_LLM_PROVIDER") {
            self.llm.provider = value.parse()?;
        }
        // OPENAI_API_KEY is what the hosted deployment already exports.
        let llm_api_key = read_env("CARMATCH_LLM_API_KEY").or_else(|| read_env("OPENAI_API_KEY"));
        if let Some(value) = llm_api_key {
            self.llm.api_key = Some(secret_value(value));
        }
        if let Some(value) = read_env("CARMATCH_LLM_BASE_URL") {
            self.llm.base_url = Some(value);
        }
        if let Some(value) = read_env("CARMATCH_LLM_MODEL") {
            self.llm.model = value;
        }
        if let Some(value) = read_env("CARMATCH_LLM_TIMEOUT_SECS") {
            self.llm.timeout_secs = parse_u64("CARMATCH_LLM_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("CARMATCH_SERVER_BIND_ADDRESS") {
            self.server.bind_address = value;
        }
        if let Some(value) = read_env("CARMATCH_SERVER_PORT") {
            self.server.port = parse_u16("CARMATCH_SERVER_PORT", &value)?;
        }
        if let Some(value) = read_env("CARMATCH_SERVER_GRACEFUL_SHUTDOWN_SECS") {
            self.server.graceful_shutdown_secs =
                parse_u64("CARMATCH_SERVER_GRACEFUL_SHUTDOWN_SECS", &value)?;
        }

        if let Some(value) = read_env("CARMATCH_CATALOG_CSV_PATH") {
            self.catalog.csv_path = PathBuf::from(value);
        }

        if let Some(value) = read_env("CARMATCH_BUYER_FREE_RECOMMENDATIONS") {
            self.buyer.free_recommendations =
                parse_u32("CARMATCH_BUYER_FREE_RECOMMENDATIONS", &value)?;
        }
        if let Some(value) = read_env("CARMATCH_BUYER_QUESTIONNAIRE_TURNS") {
            self.buyer.questionnaire_turns =
                parse_usize("CARMATCH_BUYER_QUESTIONNAIRE_TURNS", &value)?;
        }
        if let Some(value) = read_env("CARMATCH_BUYER_HONOR_EXPLICIT_REQUESTS") {
            self.buyer.honor_explicit_requests =
                parse_bool("CARMATCH_BUYER_HONOR_EXPLICIT_REQUESTS", &value)?;
        }

        if let Some(value) = read_env("CARMATCH_PLACES_MODE") {
            self.places.mode = value.parse()?;
        }
        if let Some(value) = read_env("CARMATCH_PLACES_API_KEY") {
            self.places.api_key = Some(secret_value(value));
        }
        if let Some(value) = read_env("CARMATCH_PLACES_BASE_URL") {
            self.places.base_url = value;
        }
        if let Some(value) = read_env("CARMATCH_PLACES_RADIUS_METERS") {
            self.places.radius_meters = parse_u32("CARMATCH_PLACES_RADIUS_METERS", &value)?;
        }
        if let Some(value) = read_env("CARMATCH_PLACES_KEYWORD") {
            self.places.keyword = value;
        }
        if let Some(value) = read_env("CARMATCH_PLACES_MAX_RESULTS") {
            self.places.max_results = parse_usize("CARMATCH_PLACES_MAX_RESULTS", &value)?;
        }
        if let Some(value) = read_env("CARMATCH_PLACES_REGION") {
            self.places.region = value;
        }
        if let Some(value) = read_env("CARMATCH_PLACES_TIMEOUT_SECS") {
            self.places.timeout_secs = parse_u64("CARMATCH_PLACES_TIMEOUT_SECS", &value)?;
        }

        let log_level =
            read_env("CARMATCH_LOGGING_LEVEL").or_else(|| read_env("CARMATCH_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("CARMATCH_LOGGING_FORMAT").or_else(|| read_env("CARMATCH_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(database_url) = overrides.database_url {
            self.database.url = database_url;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(llm_provider) = overrides.llm_provider {
            self.llm.provider = llm_provider;
        }
        if let Some(llm_model) = overrides.llm_model {
            self.llm.model = llm_model;
        }
        if let Some(llm_api_key) = overrides.llm_api_key {
            self.llm.api_key = Some(secret_value(llm_api_key));
        }
        if let Some(llm_base_url) = overrides.llm_base_url {
            self.llm.base_url = Some(llm_base_url);
        }
        if let Some(server_port) = overrides.server_port {
            self.server.port = server_port;
        }
        if let Some(catalog_path) = overrides.catalog_path {
            self.catalog.csv_path = catalog_path;
        }
        if let Some(places_mode) = overrides.places_mode {
            self.places.mode = places_mode;
        }
        if let Some(places_api_key) = overrides.places_api_key {
            self.places.api_key = Some(secret_value(places_api_key));
        }
        if let Some(places_base_url) = overrides.places_base_url {
            self.places.base_url = places_base_url;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_database(&self.database)?;
        validate_llm(&self.llm)?;
        validate_server(&self.server)?;
        validate_buyer(&self.buyer)?;
        validate_places(&self.places)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("carmatch.toml"), PathBuf::from("config/carmatch.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_database(database: &DatabaseConfig) -> Result<(), ConfigError> {
    let url = database.url.trim();
    let sqlite_url =
        url.starts_with("sqlite://") || url.starts_with("sqlite::") || url == ":memory:";
    if !sqlite_url {
        return Err(ConfigError::Validation(
            "database.url must be a sqlite URL (`sqlite://...`, `sqlite::...`, or `:memory:`)"
                .to_string(),
        ));
    }

    if database.max_connections == 0 {
        return Err(ConfigError::Validation(
            "database.max_connections must be greater than zero".to_string(),
        ));
    }

    if database.timeout_secs == 0 || database.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "database.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    Ok(())
}

fn validate_llm(llm: &LlmConfig) -> Result<(), ConfigError> {
    if llm.timeout_secs == 0 || llm.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "llm.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    if llm.model.trim().is_empty() {
        return Err(ConfigError::Validation("llm.model must not be empty".to_string()));
    }

    match llm.provider {
        LlmProvider::OpenAi => {
            let missing = llm
                .api_key
                .as_ref()
                .map(|value| value.expose_secret().trim().is_empty())
                .unwrap_or(true);
            if missing {
                return Err(ConfigError::Validation(
                    "llm.api_key is required for the openai provider (set CARMATCH_LLM_API_KEY or OPENAI_API_KEY)"
                        .to_string(),
                ));
            }
        }
        LlmProvider::Ollama => {
            let missing =
                llm.base_url.as_ref().map(|value| value.trim().is_empty()).unwrap_or(true);
            if missing {
                return Err(ConfigError::Validation(
                    "llm.base_url is required for ollama provider".to_string(),
                ));
            }
        }
    }

    if let Some(base_url) = &llm.base_url {
        validate_http_url("llm.base_url", base_url)?;
    }

    Ok(())
}

fn validate_server(server: &ServerConfig) -> Result<(), ConfigError> {
    if server.port == 0 {
        return Err(ConfigError::Validation("server.port must be greater than zero".to_string()));
    }

    if server.graceful_shutdown_secs == 0 {
        return Err(ConfigError::Validation(
            "server.graceful_shutdown_secs must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

fn validate_buyer(buyer: &BuyerConfig) -> Result<(), ConfigError> {
    if buyer.questionnaire_turns == 0 {
        return Err(ConfigError::Validation(
            "buyer.questionnaire_turns must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

fn validate_places(places: &PlacesConfig) -> Result<(), ConfigError> {
    if places.max_results == 0 || places.max_results > 20 {
        return Err(ConfigError::Validation(
            "places.max_results must be in range 1..=20".to_string(),
        ));
    }

    if places.radius_meters == 0 || places.radius_meters > 50_000 {
        return Err(ConfigError::Validation(
            "places.radius_meters must be in range 1..=50000".to_string(),
        ));
    }

    if places.timeout_secs == 0 || places.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "places.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    if places.mode == PlacesMode::Live {
        let missing = places
            .api_key
            .as_ref()
            .map(|value| value.expose_secret().trim().is_empty())
            .unwrap_or(true);
        if missing {
            return Err(ConfigError::Validation(
                "places.api_key is required when places.mode is `live`".to_string(),
            ));
        }
        validate_http_url("places.base_url", &places.base_url)?;
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn validate_http_url(key: &str, value: &str) -> Result<(), ConfigError> {
    if !value.starts_with("http://") && !value.starts_with("https://") {
        return Err(ConfigError::Validation(format!("{key} must start with http:// or https://")));
    }
    Ok(())
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u16(key: &str, value: &str) -> Result<u16, ConfigError> {
    value.parse::<u16>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.parse::<u32>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_usize(key: &str, value: &str) -> Result<usize, ConfigError> {
    value.parse::<usize>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    value.parse::<bool>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    database: Option<DatabasePatch>,
    llm: Option<LlmPatch>,
    server: Option<ServerPatch>,
    catalog: Option<CatalogPatch>,
    buyer: Option<BuyerPatch>,
    places: Option<PlacesPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct DatabasePatch {
    url: Option<String>,
    max_connections: Option<u32>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct LlmPatch {
    provider: Option<LlmProvider>,
    api_key: Option<String>,
    base_url: Option<String>,
    model: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerPatch {
    bind_address: Option<String>,
    port: Option<u16>,
    graceful_shutdown_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct CatalogPatch {
    csv_path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct BuyerPatch {
    free_recommendations: Option<u32>,
    questionnaire_turns: Option<usize>,
    honor_explicit_requests: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct PlacesPatch {
    mode: Option<PlacesMode>,
    api_key: Option<String>,
    base_url: Option<String>,
    radius_meters: Option<u32>,
    keyword: Option<String>,
    max_results: Option<usize>,
    region: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
