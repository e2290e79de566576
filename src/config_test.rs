use std::collections::HashMap;

use super::*;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    move |key: &str| map.get(key).cloned()
}

// =============================================================================
// Defaults
// =============================================================================

#[test]
fn from_lookup_defaults() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[("HOME", "/home/alice")])).unwrap();
    assert_eq!(cfg.api_url, DEFAULT_API_URL);
    assert_eq!(cfg.token_file, PathBuf::from("/home/alice/.local/state/chatroom/session.json"));
    assert_eq!(cfg.connect_timeout, Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS));
    assert_eq!(cfg.log_level, DEFAULT_LOG_LEVEL);
}

#[test]
fn token_file_prefers_xdg_state_home() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[("HOME", "/home/alice"), ("XDG_STATE_HOME", "/var/state")]))
        .unwrap();
    assert_eq!(cfg.token_file, PathBuf::from("/var/state/chatroom/session.json"));
}

#[test]
fn token_file_falls_back_to_cwd_without_home() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[])).unwrap();
    assert_eq!(cfg.token_file, PathBuf::from("./chatroom/session.json"));
}

// =============================================================================
// Overrides
// =============================================================================

#[test]
fn from_lookup_parses_overrides() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[
        ("CHAT_API_URL", "https://chat.example.test/"),
        ("CHAT_TOKEN_FILE", "/tmp/token.json"),
        ("CHAT_CONNECT_TIMEOUT_SECS", "3"),
        ("CHAT_LOG", "chatroom=debug"),
    ]))
    .unwrap();
    assert_eq!(cfg.api_url, "https://chat.example.test");
    assert_eq!(cfg.token_file, PathBuf::from("/tmp/token.json"));
    assert_eq!(cfg.connect_timeout, Duration::from_secs(3));
    assert_eq!(cfg.log_level, "chatroom=debug");
}

#[test]
fn invalid_timeout_falls_back_to_default() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[("CHAT_CONNECT_TIMEOUT_SECS", "soon")])).unwrap();
    assert_eq!(cfg.connect_timeout, Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS));
}

#[test]
fn blank_api_url_uses_default() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[("CHAT_API_URL", "   ")])).unwrap();
    assert_eq!(cfg.api_url, DEFAULT_API_URL);
}

#[test]
fn non_http_api_url_is_rejected() {
    let err = ClientConfig::from_lookup(lookup_from(&[("CHAT_API_URL", "ftp://files")])).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { key: "CHAT_API_URL", .. }));
}

#[test]
fn with_api_url_trims_trailing_slashes() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[])).unwrap();
    let cfg = cfg.with_api_url("http://localhost:9000//").unwrap();
    assert_eq!(cfg.api_url, "http://localhost:9000");
}
