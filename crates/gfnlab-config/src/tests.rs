#[cfg(test)]
mod tests {
    use super::super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_default_server_binds_localhost() {
        let server = ServerConfig::default();
        let addr = server.socket_addr().unwrap();
        assert_eq!(addr.to_string(), "127.0.0.1:8000");
        assert_eq!(server.static_dir, "static");
    }

    #[test]
    fn test_mail_disabled_by_default() {
        let mail = MailConfig::default();
        assert!(!mail.is_enabled());
        assert_eq!(mail.subject, "Sieve Analysis Result – GFN");
        assert!(mail.timeout_secs > 0);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [server]
            port = 9100

            [mail]
            endpoint = "https://mail.example.test/v3/messages"
            api_key = "key-123"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.host, "127.0.0.1");
        assert!(config.mail.is_enabled());
        let key = config.mail.resolved_api_key().unwrap();
        assert_eq!(key.expose_secret(), "key-123");
        assert!(config.catalog.path.is_none());
    }

    #[test]
    fn test_api_key_is_redacted() {
        let config: Config = toml::from_str("[mail]\napi_key = \"key-s3cr3t\"\n").unwrap();
        assert!(!format!("{config:?}").contains("key-s3cr3t"));
        assert!(!toml::to_string(&config).unwrap().contains("key-s3cr3t"));
    }

    #[test]
    fn test_host_name_is_resolved() {
        let server = ServerConfig { host: "localhost".to_string(), port: 8123, ..ServerConfig::default() };
        let addr = server.socket_addr().unwrap();
        assert!(addr.ip().is_loopback());
        assert_eq!(addr.port(), 8123);
    }

    #[test]
    fn test_empty_endpoint_is_disabled() {
        let config: Config = toml::from_str("[mail]\nendpoint = \"\"\n").unwrap();
        assert!(!config.mail.is_enabled());
    }

    #[test]
    fn test_bad_address_is_reported() {
        let server = ServerConfig { host: "not a host".to_string(), ..ServerConfig::default() };
        assert!(matches!(server.socket_addr(), Err(ConfigError::Address(_))));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let err = Config::from_file("/nonexistent/gfnlab.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
