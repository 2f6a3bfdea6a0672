//! Tests for config module.

use super::*;
use std::collections::HashMap;

fn load(vars: &[(&'static str, &'static str)]) -> Result<Config, ConfigError> {
    let env: HashMap<&str, &str> = vars.iter().copied().collect();
    Config::load_from(&env)
}

fn load_and_validate(vars: &[(&'static str, &'static str)]) -> Result<Config, ConfigError> {
    let config = load(vars)?;
    config.validate()?;
    Ok(config)
}

/// Production settings that satisfy every production rule.
fn production_env() -> Vec<(&'static str, &'static str)> {
    vec![
        ("ENVIRONMENT", "production"),
        ("DEBUG", "False"),
        ("SECRET_KEY", "prod_secret"),
        ("ALLOWED_HOSTS", "api.example.com"),
        ("DB_PASSWORD", "db_password"),
        ("REDIS_PASSWORD", "redis_password"),
    ]
}

fn with(
    mut base: Vec<(&'static str, &'static str)>,
    overrides: &[(&'static str, &'static str)],
) -> Vec<(&'static str, &'static str)> {
    for (key, value) in overrides {
        base.retain(|(k, _)| k != key);
        base.push((*key, *value));
    }
    base
}

// ==================== Defaults ====================

#[test]
fn test_defaults_without_environment() {
    let cfg = load(&[]).unwrap();

    assert_eq!(cfg.app.name, "logging_service");
    assert_eq!(cfg.app.environment, Environment::Development);
    assert!(cfg.app.debug);
    assert_eq!(cfg.app.log_level, "INFO");
    assert_eq!(cfg.server.host, "0.0.0.0");
    assert_eq!(cfg.server.port, 8000);
}

#[test]
fn test_defaults_for_every_section() {
    let cfg = load(&[]).unwrap();

    assert_eq!(cfg.logging.format, "json");
    assert_eq!(cfg.logging.output, "stdout");
    assert_eq!(cfg.logging.file_path, None);
    assert_eq!(cfg.logging.rotation_size, "10MB");
    assert_eq!(cfg.logging.retention_days, 30);

    assert_eq!(cfg.database.host, "localhost");
    assert_eq!(cfg.database.port, 5432);
    assert_eq!(cfg.database.name, "logging_db");
    assert_eq!(cfg.database.user, "logger");
    assert_eq!(cfg.database.password, "");

    assert_eq!(cfg.redis.host, "localhost");
    assert_eq!(cfg.redis.port, 6379);
    assert_eq!(cfg.redis.db, 0);
    assert_eq!(cfg.redis.password, "");

    assert_eq!(cfg.security.secret_key, "");
    assert_eq!(cfg.security.allowed_hosts, vec!["localhost"]);
    assert_eq!(cfg.security.cors_origins, vec!["http://localhost:3000"]);

    assert!(cfg.rate_limit.enabled);
    assert_eq!(cfg.rate_limit.default_rule, "100/minute");

    assert!(cfg.monitoring.metrics_enabled);
    assert_eq!(cfg.monitoring.metrics_port, 9090);

    assert_eq!(cfg.dependencies.service_url, "http://localhost:8001");
    assert_eq!(cfg.dependencies.timeout_secs, 30);

    assert!(!cfg.features.batch_processing);
    assert!(cfg.features.async_logging);

    assert_eq!(cfg.performance.worker_processes, 4);
    assert_eq!(cfg.performance.thread_pool_size, 10);
    assert_eq!(cfg.performance.max_queue_size, 1000);

    assert!(cfg.backup.enabled);
    assert_eq!(cfg.backup.retention_days, 7);
    assert_eq!(cfg.backup.s3_bucket, "logging-service-backups");
}

#[test]
fn test_defaults_pass_validation() {
    assert!(load_and_validate(&[]).is_ok());
}

#[test]
fn test_schema_lists_every_variable_once() {
    let mut names: Vec<&str> = schema::ALL.iter().map(|v| v.name).collect();
    assert_eq!(names.len(), 37);
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), 37);
}

#[test]
fn test_schema_only_log_file_path_is_optional() {
    let optional: Vec<&str> = schema::ALL
        .iter()
        .filter(|v| v.default.is_none())
        .map(|v| v.name)
        .collect();
    assert_eq!(optional, vec!["LOG_FILE_PATH"]);
}

#[test]
fn test_load_is_idempotent() {
    let vars = [("APP_NAME", "svc"), ("PORT", "9000"), ("ALLOWED_HOSTS", "a,b")];
    assert_eq!(load(&vars).unwrap(), load(&vars).unwrap());
}

// ==================== Environment overrides ====================

#[test]
fn test_load_environment_variables() {
    let cfg = load(&[
        ("APP_NAME", "test_service"),
        ("ENVIRONMENT", "testing"),
        ("DEBUG", "False"),
        ("LOG_LEVEL", "DEBUG"),
        ("HOST", "127.0.0.1"),
        ("PORT", "9000"),
    ])
    .unwrap();

    assert_eq!(cfg.app.name, "test_service");
    assert_eq!(cfg.app.environment, Environment::Testing);
    assert!(!cfg.app.debug);
    assert_eq!(cfg.app.log_level, "DEBUG");
    assert_eq!(cfg.server.host, "127.0.0.1");
    assert_eq!(cfg.server.port, 9000);
}

#[test]
fn test_unknown_environment_is_kept() {
    let cfg = load(&[("ENVIRONMENT", "qa-eu")]).unwrap();
    assert_eq!(cfg.app.environment, Environment::Other("qa-eu".to_string()));
    assert_eq!(cfg.app.environment.to_string(), "qa-eu");
}

#[test]
fn test_environment_match_is_case_sensitive() {
    let cfg = load(&[("ENVIRONMENT", "Production"), ("DEBUG", "True")]).unwrap();
    assert!(!cfg.app.environment.is_production());
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_feature_flags() {
    let cfg = load(&[
        ("ENABLE_BATCH_PROCESSING", "true"),
        ("ENABLE_ASYNC_LOGGING", "false"),
    ])
    .unwrap();

    assert!(cfg.features.batch_processing);
    assert!(!cfg.features.async_logging);
}

#[test]
fn test_flag_is_case_insensitive() {
    let cfg = load(&[("DEBUG", "TRUE"), ("BACKUP_ENABLED", "tRuE")]).unwrap();
    assert!(cfg.app.debug);
    assert!(cfg.backup.enabled);
}

#[test]
fn test_flag_only_accepts_true() {
    let cfg = load(&[
        ("DEBUG", "1"),
        ("RATE_LIMIT_ENABLED", "yes"),
        ("ENABLE_METRICS", ""),
    ])
    .unwrap();
    assert!(!cfg.app.debug);
    assert!(!cfg.rate_limit.enabled);
    assert!(!cfg.monitoring.metrics_enabled);
}

#[test]
fn test_performance_settings() {
    let cfg = load(&[
        ("WORKER_PROCESSES", "8"),
        ("THREAD_POOL_SIZE", "20"),
        ("MAX_QUEUE_SIZE", "2000"),
    ])
    .unwrap();

    assert_eq!(cfg.performance.worker_processes, 8);
    assert_eq!(cfg.performance.thread_pool_size, 20);
    assert_eq!(cfg.performance.max_queue_size, 2000);
}

#[test]
fn test_security_lists() {
    let cfg = load(&[
        ("ALLOWED_HOSTS", "test1.com,test2.com"),
        ("CORS_ORIGINS", "http://test1.com,http://test2.com"),
    ])
    .unwrap();

    assert_eq!(cfg.security.allowed_hosts, vec!["test1.com", "test2.com"]);
    assert_eq!(
        cfg.security.cors_origins,
        vec!["http://test1.com", "http://test2.com"]
    );
}

#[test]
fn test_list_entries_are_not_trimmed() {
    let cfg = load(&[("ALLOWED_HOSTS", "a.com, b.com,,c.com")]).unwrap();
    assert_eq!(cfg.security.allowed_hosts, vec!["a.com", " b.com", "", "c.com"]);
}

#[test]
fn test_log_file_path_set_but_empty() {
    let cfg = load(&[("LOG_FILE_PATH", "")]).unwrap();
    assert_eq!(cfg.logging.file_path, Some(String::new()));
    assert_eq!(cfg.logging.file_path(), None);
}

#[test]
fn test_redis_urls() {
    let cfg = load(&[("REDIS_PASSWORD", "p@ss"), ("REDIS_DB", "2")]).unwrap();
    assert_eq!(cfg.redis.url(), "redis://:p%40ss@localhost:6379/2");
    assert_eq!(cfg.redis.redacted_url(), "redis://:***@localhost:6379/2");

    let cfg = load(&[]).unwrap();
    assert_eq!(cfg.redis.url(), "redis://localhost:6379/0");
}

// ==================== Integer parsing ====================

#[test]
fn test_negative_port_is_accepted() {
    let cfg = load_and_validate(&[("PORT", "-1")]).unwrap();
    assert_eq!(cfg.server.port, -1);
}

#[test]
fn test_out_of_range_port_is_accepted() {
    let cfg = load_and_validate(&[("METRICS_PORT", "99999")]).unwrap();
    assert_eq!(cfg.monitoring.metrics_port, 99999);
}

#[test]
fn test_integer_surrounding_whitespace() {
    let cfg = load(&[("PORT", " 9000 ")]).unwrap();
    assert_eq!(cfg.server.port, 9000);
}

#[test]
fn test_invalid_integer_fails_load() {
    let err = load(&[("PORT", "abc")]).unwrap_err();

    assert_eq!(err.kind(), ConfigErrorKind::InvalidValue);
    assert_eq!(err.field(), "PORT");
    match err {
        ConfigError::InvalidValue { value, .. } => assert_eq!(value, "abc"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_invalid_integer_message_names_field_and_value() {
    let err = load(&[("BACKUP_RETENTION_DAYS", "7d")]).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("BACKUP_RETENTION_DAYS"));
    assert!(message.contains("\"7d\""));
}

#[test]
fn test_empty_integer_fails_load() {
    let err = load(&[("REDIS_DB", "")]).unwrap_err();
    assert_eq!(err.field(), "REDIS_DB");
}

/// Source whose PORT value is set but unreadable.
struct UnreadablePort;

impl EnvSource for UnreadablePort {
    fn get(&self, name: &'static str) -> Result<Option<String>, ConfigError> {
        if name == "PORT" {
            Err(ConfigError::invalid_value(name, "80\u{FFFD}", "not valid unicode"))
        } else {
            Ok(None)
        }
    }
}

#[test]
fn test_unreadable_value_fails_load_instead_of_defaulting() {
    let err = Config::load_from(&UnreadablePort).unwrap_err();
    assert_eq!(err.kind(), ConfigErrorKind::InvalidValue);
    assert_eq!(err.field(), "PORT");
}

#[test]
fn test_dependency_timeout() {
    let cfg = load(&[("DEPENDENT_SERVICE_TIMEOUT", "5")]).unwrap();
    assert_eq!(cfg.dependencies.timeout().as_secs(), 5);

    let cfg = load(&[("DEPENDENT_SERVICE_TIMEOUT", "-5")]).unwrap();
    assert_eq!(cfg.dependencies.timeout().as_secs(), 0);
}

// ==================== Production validation ====================

#[test]
fn test_validate_production_passes_when_complete() {
    assert!(load_and_validate(&production_env()).is_ok());
}

#[test]
fn test_validate_production_requires_secret_key() {
    let vars = with(production_env(), &[("SECRET_KEY", "")]);
    let err = load_and_validate(&vars).unwrap_err();
    assert_eq!(err.to_string(), "SECRET_KEY must be set in production");
    assert_eq!(err.kind(), ConfigErrorKind::InvariantViolation);
    assert_eq!(err.field(), "SECRET_KEY");
}

#[test]
fn test_validate_production_rejects_debug() {
    let vars = with(production_env(), &[("DEBUG", "True")]);
    let err = load_and_validate(&vars).unwrap_err();
    assert_eq!(err.to_string(), "DEBUG should be False in production");
}

#[test]
fn test_validate_production_rejects_localhost() {
    let vars = with(production_env(), &[("ALLOWED_HOSTS", "localhost")]);
    let err = load_and_validate(&vars).unwrap_err();
    assert_eq!(
        err.to_string(),
        "localhost should not be in ALLOWED_HOSTS in production"
    );
}

#[test]
fn test_validate_production_localhost_must_match_exactly() {
    let vars = with(production_env(), &[("ALLOWED_HOSTS", "api.com, localhost")]);
    assert!(load_and_validate(&vars).is_ok());
}

#[test]
fn test_validate_production_requires_db_password() {
    let vars = with(production_env(), &[("DB_PASSWORD", "")]);
    let err = load_and_validate(&vars).unwrap_err();
    assert_eq!(err.to_string(), "Database password must be set in production");
}

#[test]
fn test_validate_production_requires_redis_password() {
    let vars = with(production_env(), &[("REDIS_PASSWORD", "")]);
    let err = load_and_validate(&vars).unwrap_err();
    assert_eq!(err.to_string(), "Redis password must be set in production");
}

#[test]
fn test_validate_reports_first_violation_only() {
    // Secret key, debug, hosts and passwords are all wrong; the secret key rule runs first.
    let err = load_and_validate(&[("ENVIRONMENT", "production")]).unwrap_err();
    assert_eq!(err.to_string(), "SECRET_KEY must be set in production");

    let err = load_and_validate(&[("ENVIRONMENT", "production"), ("SECRET_KEY", "k")])
        .unwrap_err();
    assert_eq!(err.to_string(), "DEBUG should be False in production");
}

#[test]
fn test_validate_production_rules_run_before_logging_rules() {
    let vars = with(production_env(), &[("DEBUG", "True"), ("LOG_FORMAT", "xml")]);
    let err = load_and_validate(&vars).unwrap_err();
    assert_eq!(err.to_string(), "DEBUG should be False in production");
}

#[test]
fn test_validate_skips_production_rules_elsewhere() {
    for environment in ["development", "testing", "staging", "anything"] {
        let vars = [("ENVIRONMENT", environment), ("DEBUG", "True")];
        let cfg = load(&vars).unwrap();
        assert!(cfg.validate().is_ok(), "{environment} should not apply production rules");
    }
}

// ==================== Logging validation ====================

#[test]
fn test_validate_invalid_log_format() {
    let err = load_and_validate(&[("LOG_FORMAT", "invalid")]).unwrap_err();
    assert_eq!(err.to_string(), "Invalid LOG_FORMAT");
    assert_eq!(err.field(), "LOG_FORMAT");
}

#[test]
fn test_validate_invalid_log_format_in_production() {
    let vars = with(production_env(), &[("LOG_FORMAT", "invalid")]);
    let err = load_and_validate(&vars).unwrap_err();
    assert_eq!(err.to_string(), "Invalid LOG_FORMAT");
}

#[test]
fn test_validate_log_format_is_case_sensitive() {
    let err = load_and_validate(&[("LOG_FORMAT", "JSON")]).unwrap_err();
    assert_eq!(err.to_string(), "Invalid LOG_FORMAT");
}

#[test]
fn test_validate_invalid_log_output() {
    let err = load_and_validate(&[("LOG_OUTPUT", "syslog")]).unwrap_err();
    assert_eq!(err.to_string(), "Invalid LOG_OUTPUT");
}

#[test]
fn test_validate_file_output_requires_path() {
    let err = load_and_validate(&[("LOG_OUTPUT", "file")]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "LOG_FILE_PATH must be set when LOG_OUTPUT is file"
    );

    let err = load_and_validate(&[("LOG_OUTPUT", "file"), ("LOG_FILE_PATH", "")]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "LOG_FILE_PATH must be set when LOG_OUTPUT is file"
    );
}

#[test]
fn test_validate_file_output_with_path() {
    let cfg = load_and_validate(&[
        ("LOG_FORMAT", "text"),
        ("LOG_OUTPUT", "file"),
        ("LOG_FILE_PATH", "/var/log/service.log"),
    ])
    .unwrap();
    assert_eq!(cfg.logging.log_format(), Some(LogFormat::Text));
    assert_eq!(cfg.logging.log_output(), Some(LogOutput::File));
    assert_eq!(cfg.logging.file_path(), Some("/var/log/service.log"));
}

#[test]
fn test_validate_does_not_mutate() {
    let cfg = load(&[("LOG_FORMAT", "invalid")]).unwrap();
    let before = cfg.clone();
    let _ = cfg.validate();
    assert_eq!(cfg, before);
}
