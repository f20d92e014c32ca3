use super::{load_settings_from, log_filter, Settings};

use std::{
    collections::HashMap,
    env, fs,
    path::Path,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| vars.get(key).cloned()
}

fn temp_file(label: &str, contents: &str) -> std::path::PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let path = env::temp_dir().join(format!("watch_server_{label}_{suffix}.toml"));
    fs::write(&path, contents).expect("write settings");
    path
}

#[test]
fn defaults_apply_without_file_or_env() {
    let settings = load_settings_from(Path::new("/nonexistent/server.toml"), env_from(&[]));
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.default_topic, "watch:lobby");
    assert_eq!(settings.tick_interval(), Duration::from_secs(1));
}

#[test]
fn file_values_override_defaults() {
    let path = temp_file(
        "file",
        r#"
bind_addr = "0.0.0.0:9000"
default_topic = "watch:kitchen"
tick_interval_ms = 250
"#,
    );

    let settings = load_settings_from(&path, env_from(&[]));
    assert_eq!(settings.server_bind, "0.0.0.0:9000");
    assert_eq!(settings.default_topic, "watch:kitchen");
    assert_eq!(settings.tick_interval_ms, 250);

    fs::remove_file(path).expect("cleanup");
}

#[test]
fn env_overrides_file() {
    let path = temp_file("env", "bind_addr = \"0.0.0.0:9000\"\n");

    let settings = load_settings_from(
        &path,
        env_from(&[
            ("SERVER_BIND", "127.0.0.1:1"),
            ("APP__BIND_ADDR", "127.0.0.1:2"),
            ("APP__TICK_INTERVAL_MS", "50"),
        ]),
    );
    assert_eq!(settings.server_bind, "127.0.0.1:2");
    assert_eq!(settings.tick_interval_ms, 50);

    fs::remove_file(path).expect("cleanup");
}

#[test]
fn invalid_values_keep_previous_setting() {
    let path = temp_file("invalid", "this is = = not toml");

    let settings = load_settings_from(&path, env_from(&[("APP__TICK_INTERVAL_MS", "soon")]));
    assert_eq!(settings, Settings::default());

    fs::remove_file(path).expect("cleanup");
}

#[test]
fn zero_tick_interval_is_clamped() {
    let settings = Settings {
        tick_interval_ms: 0,
        ..Settings::default()
    };
    assert_eq!(settings.tick_interval(), Duration::from_millis(1));
}

#[test]
fn log_filter_prefers_rust_log_directives() {
    assert_eq!(log_filter(Some("debug".into())).to_string(), "debug");
    assert_eq!(log_filter(None).to_string(), "info");
}
