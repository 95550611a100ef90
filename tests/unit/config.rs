use super::*;

#[test]
fn defaults_are_valid() {
    let cfg = ClientConfig::default();
    cfg.validate().unwrap();
    assert_eq!(cfg.timeout(), Duration::from_secs(180));
    assert_eq!(cfg.new_curve().unwrap().len(), 5);
    assert!(cfg.audio.precheck);
    assert_eq!(cfg.audio.volume, 0.5);
}

#[test]
fn partial_json_keeps_defaults() {
    let cfg = ClientConfig::from_json_str(
        r#"{ "server": "https://eq.example.com/app", "min_controls": 3, "audio": { "precheck": false } }"#,
    )
    .unwrap();
    assert_eq!(cfg.timeout_secs, 180);
    assert_eq!(cfg.min_controls, 3);
    assert!(!cfg.audio.precheck);
    assert_eq!(cfg.audio.primary_path, "music");
    assert_eq!(
        cfg.server_url().unwrap().as_str(),
        "https://eq.example.com/app/"
    );

    let mut curve = cfg.new_curve().unwrap();
    assert_eq!(curve.resize(1), 3);
}

#[test]
fn invalid_values_are_rejected() {
    assert!(ClientConfig::from_json_str(r#"{ "server": "not a url" }"#).is_err());
    assert!(ClientConfig::from_json_str(r#"{ "timeout_secs": 0 }"#).is_err());
    assert!(ClientConfig::from_json_str(r#"{ "min_controls": 11 }"#).is_err());
    assert!(ClientConfig::from_json_str(r#"{ "audio": { "volume": 2.0 } }"#).is_err());
    assert!(matches!(
        ClientConfig::from_json_str("{"),
        Err(AdeqError::Serde(_))
    ));
}

#[test]
fn from_path_reports_missing_file() {
    let err = ClientConfig::from_path(Path::new("/definitely/not/here.json")).unwrap_err();
    assert!(err.to_string().contains("read config"));
}
