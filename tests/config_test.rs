use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use eduguard_chat::{ChatConfig, ChatError, ServerConfig};

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| map.get(name).cloned()
}

#[test]
fn test_defaults_without_variables() {
    let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
    assert_eq!(config, ServerConfig::default());
    assert_eq!(config.port, 8080);
    assert_eq!(config.chat, ChatConfig::default());
    assert_eq!(config.chat.reply_delay_ms, 1500);
    assert_eq!(config.chat.follow_up_delay_ms, 2000);
    assert_eq!(config.chat.quick_action_delay_ms, 1000);
    assert_eq!(config.session_idle_timeout(), Duration::from_secs(1800));
    assert_eq!(config.session_sweep_interval(), Duration::from_secs(60));
}

#[test]
fn test_overrides() {
    let config = ServerConfig::from_lookup(lookup(&[
        ("EDUGUARD_HOST", "0.0.0.0"),
        ("EDUGUARD_PORT", " 9090 "),
        ("EDUGUARD_REPLY_BOOK", "scripts/counselor.json"),
        ("EDUGUARD_REPLY_DELAY_MS", "0"),
        ("EDUGUARD_FOLLOW_UP_DELAY_MS", "250"),
    ]))
    .unwrap();

    assert_eq!(config.host, "0.0.0.0");
    assert_eq!(config.port, 9090);
    assert_eq!(config.reply_book, Some(PathBuf::from("scripts/counselor.json")));
    assert_eq!(config.chat.reply_delay_ms, 0);
    assert_eq!(config.chat.follow_up_delay_ms, 250);
    assert_eq!(config.chat.quick_action_delay_ms, 1000);
}

#[test]
fn test_malformed_number_is_rejected() {
    let err = ServerConfig::from_lookup(lookup(&[("EDUGUARD_PORT", "eighty")])).unwrap_err();
    assert!(matches!(err, ChatError::Config(_)));
    assert!(err.to_string().contains("EDUGUARD_PORT"));
}

#[test]
fn test_session_timeouts() {
    let config = ServerConfig::from_lookup(lookup(&[
        ("EDUGUARD_SESSION_IDLE_SECS", "600"),
        ("EDUGUARD_SESSION_SWEEP_SECS", "15"),
    ]))
    .unwrap();

    assert_eq!(config.session_idle_timeout(), Duration::from_secs(600));
    assert_eq!(config.session_sweep_interval(), Duration::from_secs(15));
}

#[test]
fn test_zero_sweep_interval_is_rejected() {
    let err =
        ServerConfig::from_lookup(lookup(&[("EDUGUARD_SESSION_SWEEP_SECS", "0")])).unwrap_err();
    assert!(matches!(err, ChatError::Config(_)));
    assert!(err.to_string().contains("EDUGUARD_SESSION_SWEEP_SECS"));
}
