use crate::config::ServerConfig;
use crate::constants::PORT_ENV_VAR;
use crate::errors::{AppError, AppResult};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;

// CLI metadata constants
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
const APP_ABOUT: &str = env!("CARGO_PKG_DESCRIPTION");

/// Builds the command-line definition.
///
/// - `--config <FILE>`: TOML file with server settings
/// - `--host <ADDR>`: address to bind, overrides the file
/// - `--port <PORT>`: port to bind, also read from `PORT`; overrides the file
pub fn build_command() -> Command<'static> {
    Command::new("job-xml-converter")
        .version(APP_VERSION)
        .about(APP_ABOUT)
        .after_help("Example:\n  PORT=8080 job-xml-converter --config server.toml")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Path to a TOML config file")
                .value_parser(clap::value_parser!(PathBuf))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("host")
                .long("host")
                .help("Address to bind, e.g. 0.0.0.0 or 127.0.0.1")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .env(PORT_ENV_VAR)
                .help("Port to listen on")
                .value_parser(clap::value_parser!(u16))
                .action(ArgAction::Set),
        )
}

/// Parses the process arguments into a validated configuration.
///
/// Exits the process on `--help`, `--version` or a usage error, like clap does.
pub fn parse_args() -> AppResult<ServerConfig> {
    let matches = build_command().get_matches();
    config_from_matches(&matches)
}

/// Resolves the configuration: defaults, then the TOML file, then flags/env.
pub fn config_from_matches(matches: &ArgMatches) -> AppResult<ServerConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => ServerConfig::from_toml_file(path)?,
        None => ServerConfig::default(),
    };

    if let Some(host) = matches.get_one::<String>("host") {
        config.host = host.clone();
    }
    if let Some(&port) = matches.get_one::<u16>("port") {
        config.port = port;
    }

    config.validate().map_err(|e| match e {
        AppError::InvalidInput(msg) => AppError::InvalidInput(format!("Invalid settings: {msg}")),
        other => other,
    })?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn no_arguments_yield_defaults() {
        let matches = build_command()
            .try_get_matches_from(vec!["job-xml-converter"])
            .unwrap();
        let config = config_from_matches(&matches).unwrap();
        // PORT may be set in the environment running the tests
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.fetch_timeout_secs, 30);
    }

    #[test]
    fn flags_override_config_file() {
        let mut tmp = NamedTempFile::new().unwrap();
        write!(
            tmp,
            r#"
            host = "127.0.0.1"
            port = 7000
            fetch_timeout_secs = 5
            "#,
        )
        .unwrap();

        let matches = build_command()
            .try_get_matches_from(vec![
                "job-xml-converter",
                "--config",
                tmp.path().to_str().unwrap(),
                "--port",
                "9001",
            ])
            .unwrap();
        let config = config_from_matches(&matches).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 9001);
        assert_eq!(config.fetch_timeout_secs, 5);
    }

    #[test]
    fn invalid_port_is_rejected() {
        let result =
            build_command().try_get_matches_from(vec!["job-xml-converter", "--port", "99999"]);
        assert!(result.is_err());
    }

    #[test]
    fn invalid_host_is_rejected() {
        let matches = build_command()
            .try_get_matches_from(vec!["job-xml-converter", "--host", "not an ip"])
            .unwrap();
        let err = config_from_matches(&matches).unwrap_err();
        assert!(err.to_string().contains("Invalid settings"));
    }
}
