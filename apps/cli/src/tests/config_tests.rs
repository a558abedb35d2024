use super::*;

fn no_env(_: &str) -> Option<String> {
    None
}

#[test]
fn defaults_point_at_local_mock_api() {
    let settings = resolve_settings(None, no_env);
    assert_eq!(settings, Settings::default());
    let images = settings.image_urls().expect("image urls");
    assert_eq!(images.base(), "http://127.0.0.1:5000/uploads");
}

#[test]
fn file_values_override_defaults() {
    let file = r#"
api_url = "https://desa-ansang.example/api"
image_base_url = "https://cdn.desa-ansang.example/uploads/"
request_timeout_secs = 30
"#;
    let settings = resolve_settings(Some(file), no_env);
    assert_eq!(settings.api_url, "https://desa-ansang.example/api");
    assert_eq!(settings.request_timeout_secs, 30);
    let images = settings.image_urls().expect("image urls");
    assert_eq!(
        images.url_for(Some("a.jpg")).as_deref(),
        Some("https://cdn.desa-ansang.example/uploads/a.jpg")
    );
}

#[test]
fn env_overrides_file_and_app_prefix_wins() {
    let settings = resolve_settings(Some("api_url = \"http://file\""), |key| match key {
        "ANSANG_API_URL" => Some("http://short".to_string()),
        "APP__API_URL" => Some("http://prefixed".to_string()),
        "ANSANG_API_TOKEN" => Some("  ".to_string()),
        "APP__REQUEST_TIMEOUT_SECS" => Some("bukan-angka".to_string()),
        _ => None,
    });
    assert_eq!(settings.api_url, "http://prefixed");
    assert_eq!(settings.api_token, None);
    assert_eq!(settings.request_timeout_secs, 15);
}

#[test]
fn command_line_overrides_win() {
    let mut settings = resolve_settings(None, |key| {
        (key == "ANSANG_API_TOKEN").then(|| "from-env".to_string())
    });
    settings.apply(&Overrides {
        api_url: Some("http://flag:8080".to_string()),
        image_base_url: None,
        api_token: Some("from-flag".to_string()),
    });
    assert_eq!(settings.api_url, "http://flag:8080");
    assert_eq!(settings.api_token.as_deref(), Some("from-flag"));

    let config = settings.client_config().expect("client config");
    assert_eq!(config.api_base_url.as_str(), "http://flag:8080/");
    assert_eq!(config.api_token.as_deref(), Some("from-flag"));
}

#[test]
fn non_http_urls_are_rejected() {
    let settings = Settings {
        api_url: "ftp://desa".to_string(),
        ..Settings::default()
    };
    assert!(settings.client_config().is_err());

    let settings = Settings {
        api_url: "bukan url".to_string(),
        ..Settings::default()
    };
    assert!(settings.client_config().is_err());
}

#[test]
fn zero_timeout_is_raised_to_one_second() {
    let settings = Settings {
        request_timeout_secs: 0,
        ..Settings::default()
    };
    let config = settings.client_config().expect("client config");
    assert_eq!(config.request_timeout, Duration::from_secs(1));
}

#[test]
fn explicit_missing_config_file_is_an_error() {
    let missing = std::env::temp_dir().join("ansang-tidak-ada-12345.toml");
    assert!(load_settings(Some(&missing), &Overrides::default()).is_err());
}
