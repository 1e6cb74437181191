use carmatch_core::config::{AppConfig, LoadOptions};
use carmatch_db::{connect_with_settings, migrations};
use serde_json::json;

use crate::commands::{block_on_runtime, CommandResult};

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "migrate",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    let runtime = match block_on_runtime() {
        Ok(runtime) => runtime,
        Err(message) => return CommandResult::failure("migrate", "runtime_init", message, 3),
    };

    let result = runtime.block_on(async {
        let pool = connect_with_settings(
            &config.database.url,
            config.database.max_connections,
            config.database.timeout_secs,
        )
        .await
        .map_err(|error| ("db_connectivity", error.to_string(), 4u8))?;
        migrations::run_pending(&pool)
            .await
            .map_err(|error| ("migration", error.to_string(), 5u8))?;
        pool.close().await;
        Ok::<(), (&'static str, String, u8)>(())
    });

    match result {
        Ok(()) => CommandResult::success_with_details(
            "migrate",
            "applied pending migrations",
            Some(json!({
                "database_url": config.database.url,
                "known_migrations": migrations::MIGRATOR.iter().count(),
            })),
        ),
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("migrate", error_class, message, exit_code)
        }
    }
}
