//! Integration tests for configuration loading and validation
//!
//! Tests that modify environment variables hold ENV_MUTEX so they do not
//! interfere with each other.

use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;
use wikigen::config::load_config;
use wikigen::core::imaging::EmptyImagePolicy;

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Helper function to clean up environment variables
fn cleanup_env_vars() {
    std::env::remove_var("WIKIGEN_APPLICATION_LOG_LEVEL");
    std::env::remove_var("WIKIGEN_EXPORT_OUTPUT_DIR");
    std::env::remove_var("WIKIGEN_IMAGES_BATCH_SIZE");
    std::env::remove_var("WIKIGEN_HOST_WARMUP_TICKS");
    std::env::remove_var("TEST_WIKIGEN_DATA");
}

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_complete_config() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let file = write_config(
        r#"
[application]
log_level = "debug"

[export]
output_dir = "site/wiki"
catalog = "data/catalog.json"
assets_dir = "data/assets"
write_summary = false
pretty = false

[images]
item_size = 128
item_supersample = 2
block_size = 64
block_supersample = 1
batch_size = 50
progress_log_interval = 500
empty_image = "transparent"

[host]
warmup_ticks = 0
frame_interval_ms = 5

[jobs]
research_effects = false
configuration_excluded_mods = ["neoforge"]

[logging]
local_enabled = false
local_rotation = "hourly"
"#,
    );

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.application.log_level, "debug");
    assert_eq!(config.export.output_dir, "site/wiki");
    assert!(!config.export.write_summary);
    assert!(!config.export.pretty);
    assert_eq!(config.images.item_size, 128);
    assert_eq!(config.images.block_supersample, 1);
    assert_eq!(config.images.batch_size, 50);
    assert_eq!(config.images.empty_image, EmptyImagePolicy::Transparent);
    assert_eq!(config.host.warmup_ticks, 0);
    assert!(!config.jobs.is_enabled("research_effects"));
    assert!(config.jobs.is_enabled("research"));
    assert_eq!(config.jobs.configuration_excluded_mods, vec!["neoforge"]);
    assert_eq!(config.logging.local_rotation, "hourly");
}

#[test]
fn test_env_overrides_take_precedence() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    std::env::set_var("WIKIGEN_EXPORT_OUTPUT_DIR", "/tmp/override");
    std::env::set_var("WIKIGEN_IMAGES_BATCH_SIZE", "3");
    std::env::set_var("WIKIGEN_HOST_WARMUP_TICKS", "not-a-number");

    let file = write_config("[images]\nbatch_size = 40\n[host]\nwarmup_ticks = 7\n");
    let config = load_config(file.path()).unwrap();

    assert_eq!(config.export.output_dir, "/tmp/override");
    assert_eq!(config.images.batch_size, 3);
    // Unparseable overrides are ignored
    assert_eq!(config.host.warmup_ticks, 7);

    cleanup_env_vars();
}

#[test]
fn test_env_var_substitution() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    std::env::set_var("TEST_WIKIGEN_DATA", "/srv/data");
    let file = write_config(
        "[export]\n# catalog = \"${UNSET_IN_COMMENT}\"\ncatalog = \"${TEST_WIKIGEN_DATA}/catalog.json\"\n",
    );
    let config = load_config(file.path()).unwrap();
    assert_eq!(config.export.catalog, "/srv/data/catalog.json");

    cleanup_env_vars();
}

#[test]
fn test_missing_env_var_is_an_error() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let file = write_config("[export]\ncatalog = \"${TEST_WIKIGEN_DATA}/catalog.json\"\n");
    let err = load_config(file.path()).unwrap_err();
    assert!(err.to_string().contains("TEST_WIKIGEN_DATA"));
}

#[test]
fn test_invalid_values_are_rejected() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    for contents in [
        "[application]\nlog_level = \"chatty\"\n",
        "[images]\nbatch_size = 0\n",
        "[images]\nitem_supersample = 0\n",
        "[images]\nempty_image = \"blur\"\n",
        "[logging]\nlocal_rotation = \"weekly\"\n",
    ] {
        let file = write_config(contents);
        assert!(load_config(file.path()).is_err(), "accepted: {contents}");
    }
}
