use happy_thoughts::config::{
    AppConfig, RedisStoreSection, ServerConfig, StoreBackendKind, StoreSection,
};
use happy_thoughts::storage::StorageConfig;

#[test]
fn defaults_point_at_local_redis() {
    let config = AppConfig::default();

    assert_eq!(config.server.port, 8080);
    assert_eq!(config.listen_addr(), "0.0.0.0:8080");
    assert_eq!(config.store.backend, StoreBackendKind::Redis);

    match config.storage_runtime().expect("defaults should be valid") {
        StorageConfig::Redis { url, key_prefix } => {
            assert_eq!(url, "redis://127.0.0.1:6379/");
            assert_eq!(key_prefix, "happy-thoughts");
        }
        other => panic!("Unexpected storage config: {other:?}"),
    }
}

#[test]
fn redis_backend_requires_redis_section() {
    let config = AppConfig {
        store: StoreSection {
            backend: StoreBackendKind::Redis,
            redis: None,
            ..Default::default()
        },
        ..Default::default()
    };

    assert!(
        config.storage_runtime().is_err(),
        "Expected redis backend without a redis section to fail validation"
    );
}

#[test]
fn redis_key_prefix_is_trimmed_and_required() {
    let mut config = AppConfig {
        store: StoreSection {
            redis: Some(RedisStoreSection {
                url: "redis://cache:6379/2".into(),
                key_prefix: " feed ".into(),
            }),
            ..Default::default()
        },
        ..Default::default()
    };

    match config.storage_runtime().unwrap() {
        StorageConfig::Redis { key_prefix, .. } => assert_eq!(key_prefix, "feed"),
        other => panic!("Unexpected storage config: {other:?}"),
    }

    if let Some(redis) = config.store.redis.as_mut() {
        redis.key_prefix = "   ".into();
    }
    assert!(config.storage_runtime().is_err());
}

#[test]
fn memory_backend_needs_no_redis() {
    let config = AppConfig {
        store: StoreSection {
            backend: StoreBackendKind::Memory,
            redis: None,
            ..Default::default()
        },
        ..Default::default()
    };

    assert!(matches!(
        config.storage_runtime().unwrap(),
        StorageConfig::Memory
    ));
}

#[test]
fn zero_limits_are_rejected() {
    let config = AppConfig {
        server: ServerConfig {
            body_limit_bytes: 0,
            ..Default::default()
        },
        ..Default::default()
    };
    assert!(config.validate().is_err());

    let config = AppConfig {
        store: StoreSection {
            timeout_ms: 0,
            ..Default::default()
        },
        ..Default::default()
    };
    assert!(config.validate().is_err());
}

fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn empty_environment_yields_defaults() {
    let config = AppConfig::from_sources(None, Vec::new()).unwrap();

    assert_eq!(config.server.port, 8080);
    assert_eq!(config.server.body_limit_bytes, 16 * 1024);
    assert_eq!(config.store.backend, StoreBackendKind::Redis);
    assert_eq!(config.logging.level, "info");
}

#[test]
fn bare_port_and_redis_url_override_defaults() {
    let config = AppConfig::from_sources(
        None,
        vars(&[("PORT", "9090"), ("REDIS_URL", "redis://cache:6379/3")]),
    )
    .unwrap();

    assert_eq!(config.listen_addr(), "0.0.0.0:9090");
    match config.storage_runtime().unwrap() {
        StorageConfig::Redis { url, key_prefix } => {
            assert_eq!(url, "redis://cache:6379/3");
            assert_eq!(key_prefix, "happy-thoughts");
        }
        other => panic!("Unexpected storage config: {other:?}"),
    }
}

#[test]
fn bare_port_wins_over_prefixed_port() {
    let config = AppConfig::from_sources(
        None,
        vars(&[("HAPPY_THOUGHTS_SERVER__PORT", "7000"), ("PORT", "7001")]),
    )
    .unwrap();

    assert_eq!(config.server.port, 7001);
}

#[test]
fn nested_prefixed_variables_are_applied() {
    let config = AppConfig::from_sources(
        None,
        vars(&[
            ("HAPPY_THOUGHTS_SERVER__BODY_LIMIT_BYTES", "1024"),
            ("HAPPY_THOUGHTS_STORE__TIMEOUT_MS", "250"),
            ("HAPPY_THOUGHTS_STORE__REDIS__KEY_PREFIX", "feed"),
        ]),
    )
    .unwrap();

    assert_eq!(config.server.body_limit_bytes, 1024);
    assert_eq!(config.store.timeout_ms, 250);
    match config.storage_runtime().unwrap() {
        StorageConfig::Redis { url, key_prefix } => {
            assert_eq!(url, "redis://127.0.0.1:6379/");
            assert_eq!(key_prefix, "feed");
        }
        other => panic!("Unexpected storage config: {other:?}"),
    }
}

#[test]
fn memory_backend_can_be_selected_from_environment() {
    let config =
        AppConfig::from_sources(None, vars(&[("HAPPY_THOUGHTS_STORE__BACKEND", "memory")]))
            .unwrap();

    assert_eq!(config.store.backend, StoreBackendKind::Memory);
    assert!(matches!(
        config.storage_runtime().unwrap(),
        StorageConfig::Memory
    ));
}

#[test]
fn invalid_port_is_rejected() {
    assert!(AppConfig::from_sources(None, vars(&[("PORT", "eighty")])).is_err());
    assert!(AppConfig::from_sources(None, vars(&[("PORT", "0")])).is_err());
}

#[test]
fn unrelated_variables_are_ignored() {
    let config = AppConfig::from_sources(
        None,
        vars(&[("HOME", "/root"), ("SERVER__PORT", "1234")]),
    )
    .unwrap();

    assert_eq!(config.server.port, 8080);
}
