use super::*;

fn no_env(_: &str) -> Option<String> {
    None
}

#[test]
fn defaults_apply_without_file_or_env() {
    assert_eq!(resolve_settings(None, no_env), Settings::default());
}

#[test]
fn file_values_override_defaults() {
    let settings = resolve_settings(Some("bind_addr = \"0.0.0.0:9000\"\nseed = false\n"), no_env);
    assert_eq!(settings.bind_addr, "0.0.0.0:9000");
    assert!(!settings.seed);
}

#[test]
fn unparsable_file_is_ignored() {
    let settings = resolve_settings(Some("bind_addr = "), no_env);
    assert_eq!(settings, Settings::default());
}

#[test]
fn app_prefixed_env_wins_over_short_name() {
    let settings = resolve_settings(Some("bind_addr = \"0.0.0.0:9000\""), |key| match key {
        "MOCK_API_BIND" => Some("127.0.0.1:7000".to_string()),
        "APP__BIND_ADDR" => Some("127.0.0.1:7001".to_string()),
        "MOCK_API_SEED" => Some("off".to_string()),
        _ => None,
    });
    assert_eq!(settings.bind_addr, "127.0.0.1:7001");
    assert!(!settings.seed);
}

#[test]
fn unknown_seed_flag_keeps_previous_value() {
    let settings = resolve_settings(None, |key| (key == "APP__SEED").then(|| "maybe".to_string()));
    assert!(settings.seed);
}
