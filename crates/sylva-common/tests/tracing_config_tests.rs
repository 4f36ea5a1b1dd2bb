use super::*;

#[test]
fn test_log_format_parse() {
    assert_eq!(LogFormat::parse("tree"), LogFormat::Tree);
    assert_eq!(LogFormat::parse(" JSON "), LogFormat::Json);
    assert_eq!(LogFormat::parse("text"), LogFormat::Text);
    assert_eq!(LogFormat::parse("yaml"), LogFormat::Text);
}

#[test]
fn test_nothing_installed_without_log_vars() {
    assert_eq!(TracingConfig::from_vars(None, None, Some("tree")), None);
}

#[test]
fn test_bare_level_targets_sylva_crates() {
    let config = TracingConfig::from_vars(Some("debug"), None, None).unwrap();
    assert_eq!(config.format, LogFormat::Text);
    assert_eq!(
        config.directives,
        "warn,sylva_common=debug,sylva_syntax=debug,sylva_collections=debug,sylva_ide=debug"
    );
    assert!(EnvFilter::builder().parse(&config.directives).is_ok());

    let config = TracingConfig::from_vars(Some("TRACE"), None, None).unwrap();
    assert!(config.directives.contains("sylva_syntax=trace"));
}

#[test]
fn test_off_stays_off() {
    let config = TracingConfig::from_vars(Some("off"), None, None).unwrap();
    assert_eq!(config.directives, "off");
}

#[test]
fn test_full_directives_pass_through() {
    let config = TracingConfig::from_vars(Some("sylva_syntax::node_cache=trace"), None, Some("json")).unwrap();
    assert_eq!(config.directives, "sylva_syntax::node_cache=trace");
    assert_eq!(config.format, LogFormat::Json);
}

#[test]
fn test_sylva_log_wins_over_rust_log() {
    let config = TracingConfig::from_vars(Some("info"), Some("criterion=debug"), None).unwrap();
    assert!(config.directives.contains("sylva_ide=info"));

    // RUST_LOG is used verbatim, a bare level included.
    let config = TracingConfig::from_vars(None, Some("debug"), Some("tree")).unwrap();
    assert_eq!(config.directives, "debug");
    assert_eq!(config.format, LogFormat::Tree);
}
