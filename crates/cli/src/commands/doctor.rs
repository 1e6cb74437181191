use carmatch_core::catalog::CarCatalog;
use carmatch_core::config::{AppConfig, LlmProvider, LoadOptions, PlacesMode};
use carmatch_db::{connect_with_settings, ping};
use serde::Serialize;

use crate::commands::{block_on_runtime, CommandResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Warn,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

const DEPENDENT_CHECKS: [&str; 4] =
    ["llm_readiness", "places_readiness", "catalog_readable", "database_connectivity"];

/// Exit code 0 when nothing failed; warnings do not fail the run.
pub fn run(json_output: bool) -> CommandResult {
    let report = build_report();
    let exit_code = if report.overall_status == CheckStatus::Fail { 1 } else { 0 };

    let output = if json_output {
        serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        })
    } else {
        render_human(&report)
    };

    CommandResult { exit_code, output }
}

fn build_report() -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.push(check_llm(&config));
            checks.push(check_places(&config));
            checks.push(check_catalog(&config));
            checks.push(check_database_connectivity(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            checks.extend(DEPENDENT_CHECKS.iter().map(|&name| DoctorCheck {
                name,
                status: CheckStatus::Skipped,
                details: "skipped because configuration did not load".to_string(),
            }));
        }
    }

    let any_fail = checks.iter().any(|check| check.status == CheckStatus::Fail);
    let any_warn = checks.iter().any(|check| check.status == CheckStatus::Warn);
    let (overall_status, summary) = match (any_fail, any_warn) {
        (true, _) => (CheckStatus::Fail, "doctor: one or more readiness checks failed"),
        (false, true) => (CheckStatus::Warn, "doctor: ready with warnings"),
        (false, false) => (CheckStatus::Pass, "doctor: all readiness checks passed"),
    };

    DoctorReport { overall_status, summary: summary.to_string(), checks }
}

fn check_llm(config: &AppConfig) -> DoctorCheck {
    let details = match config.llm.provider {
        LlmProvider::OpenAi => format!(
            "openai model `{}` at {}",
            config.llm.model,
            config.llm.base_url.as_deref().unwrap_or("the default endpoint")
        ),
        LlmProvider::Ollama => format!(
            "ollama model `{}` at {}",
            config.llm.model,
            config.llm.base_url.as_deref().unwrap_or("<unset>")
        ),
    };
    DoctorCheck { name: "llm_readiness", status: CheckStatus::Pass, details }
}

fn check_places(config: &AppConfig) -> DoctorCheck {
    match config.places.mode {
        PlacesMode::Live => DoctorCheck {
            name: "places_readiness",
            status: CheckStatus::Pass,
            details: format!("live lookups against {}", config.places.base_url),
        },
        PlacesMode::Fixture => DoctorCheck {
            name: "places_readiness",
            status: CheckStatus::Warn,
            details: "fixture mode serves sample repair shops only".to_string(),
        },
    }
}

fn check_catalog(config: &AppConfig) -> DoctorCheck {
    let catalog = CarCatalog::new(&config.catalog.csv_path);
    match catalog.try_load() {
        Ok(cars) if cars.is_empty() => DoctorCheck {
            name: "catalog_readable",
            status: CheckStatus::Warn,
            details: format!("{} has no car rows", catalog.path().display()),
        },
        Ok(cars) => DoctorCheck {
            name: "catalog_readable",
            status: CheckStatus::Pass,
            details: format!("{} cars in {}", cars.len(), catalog.path().display()),
        },
        Err(error) => DoctorCheck {
            name: "catalog_readable",
            status: CheckStatus::Fail,
            details: error.to_string(),
        },
    }
}

fn check_database_connectivity(config: &AppConfig) -> DoctorCheck {
    let runtime = match block_on_runtime() {
        Ok(runtime) => runtime,
        Err(details) => {
            return DoctorCheck {
                name: "database_connectivity",
                status: CheckStatus::Fail,
                details,
            };
        }
    };

    let result = runtime.block_on(async {
        let pool = connect_with_settings(
            &config.database.url,
            config.database.max_connections,
            config.database.timeout_secs,
        )
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;
        let probe = ping(&pool).await.map_err(|error| format!("database probe failed: {error}"));
        pool.close().await;
        probe
    });

    match result {
        Ok(()) => DoctorCheck {
            name: "database_connectivity",
            status: CheckStatus::Pass,
            details: format!("connected using `{}`", config.database.url),
        },
        Err(error) => {
            DoctorCheck { name: "database_connectivity", status: CheckStatus::Fail, details: error }
        }
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Warn => "warn",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
