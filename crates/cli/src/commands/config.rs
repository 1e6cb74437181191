use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use carmatch_core::config::{AppConfig, LoadOptions};
use secrecy::SecretString;
use toml::Value;

struct ConfigField {
    key: &'static str,
    value: String,
    env_keys: &'static [&'static str],
}

impl ConfigField {
    fn new(key: &'static str, value: impl ToString, env_keys: &'static [&'static str]) -> Self {
        Self { key, value: value.to_string(), env_keys }
    }
}

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for field in effective_fields(&config) {
        let source = field_source(
            field.key,
            field.env_keys,
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        );
        lines.push(render_line(field.key, &field.value, source));
    }

    lines.join("\n")
}

fn effective_fields(config: &AppConfig) -> Vec<ConfigField> {
    vec![
        ConfigField::new("database.url", &config.database.url, &["CARMATCH_DATABASE_URL"]),
        ConfigField::new(
            "database.max_connections",
            config.database.max_connections,
            &["CARMATCH_DATABASE_MAX_CONNECTIONS"],
        ),
        ConfigField::new(
            "database.timeout_secs",
            config.database.timeout_secs,
            &["CARMATCH_DATABASE_TIMEOUT_SECS"],
        ),
        ConfigField::new(
            "llm.provider",
            format!("{:?}", config.llm.provider),
            &["CARMATCH_LLM_PROVIDER"],
        ),
        ConfigField::new("llm.model", &config.llm.model, &["CARMATCH_LLM_MODEL"]),
        ConfigField::new(
            "llm.base_url",
            config.llm.base_url.as_deref().unwrap_or("<unset>"),
            &["CARMATCH_LLM_BASE_URL"],
        ),
        ConfigField::new(
            "llm.api_key",
            redact_secret(config.llm.api_key.as_ref()),
            &["CARMATCH_LLM_API_KEY", "OPENAI_API_KEY"],
        ),
        ConfigField::new(
            "llm.timeout_secs",
            config.llm.timeout_secs,
            &["CARMATCH_LLM_TIMEOUT_SECS"],
        ),
        ConfigField::new(
            "server.bind_address",
            &config.server.bind_address,
            &["CARMATCH_SERVER_BIND_ADDRESS"],
        ),
        ConfigField::new("server.port", config.server.port, &["CARMATCH_SERVER_PORT"]),
        ConfigField::new(
            "catalog.csv_path",
            config.catalog.csv_path.display(),
            &["CARMATCH_CATALOG_CSV_PATH"],
        ),
        ConfigField::new(
            "buyer.free_recommendations",
            config.buyer.free_recommendations,
            &["CARMATCH_BUYER_FREE_RECOMMENDATIONS"],
        ),
        ConfigField::new(
            "buyer.questionnaire_turns",
            config.buyer.questionnaire_turns,
            &["CARMATCH_BUYER_QUESTIONNAIRE_TURNS"],
        ),
        ConfigField::new(
            "buyer.honor_explicit_requests",
            config.buyer.honor_explicit_requests,
            &["CARMATCH_BUYER_HONOR_EXPLICIT_REQUESTS"],
        ),
        ConfigField::new(
            "places.mode",
            format!("{:?}", config.places.mode),
            &["CARMATCH_PLACES_MODE"],
        ),
        ConfigField::new(
            "places.api_key",
            redact_secret(config.places.api_key.as_ref()),
            &["CARMATCH_PLACES_API_KEY"],
        ),
        ConfigField::new(
            "places.radius_meters",
            config.places.radius_meters,
            &["CARMATCH_PLACES_RADIUS_METERS"],
        ),
        ConfigField::new("places.keyword", &config.places.keyword, &["CARMATCH_PLACES_KEYWORD"]),
        ConfigField::new(
            "places.max_results",
            config.places.max_results,
            &["CARMATCH_PLACES_MAX_RESULTS"],
        ),
        ConfigField::new(
            "logging.level",
            &config.logging.level,
            &["CARMATCH_LOGGING_LEVEL", "CARMATCH_LOG_LEVEL"],
        ),
        ConfigField::new(
            "logging.format",
            format!("{:?}", config.logging.format),
            &["CARMATCH_LOGGING_FORMAT", "CARMATCH_LOG_FORMAT"],
        ),
    ]
}

fn detect_config_path() -> Option<PathBuf> {
    [PathBuf::from("carmatch.toml"), PathBuf::from("config/carmatch.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

fn redact_secret(secret: Option<&SecretString>) -> &'static str {
    if secret.is_some() {
        "<redacted>"
    } else {
        "<unset>"
    }
}
