use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use url::Url;

use crate::errors::AppError;

pub const DEFAULT_DATA_FILE: &str = "busho.json";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000/graphql";

#[derive(Debug, Clone)]
pub struct Config {
    pub data_file: PathBuf,
    pub host: String,
    pub port: u16,
    /// Report duplicate ids and missing records as errors instead of
    /// returning the unchanged list.
    pub strict_mutations: bool,
    pub graphiql: bool,
    pub endpoint: Url,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            strict_mutations: false,
            graphiql: true,
            endpoint: Url::parse(DEFAULT_ENDPOINT).expect("DEFAULT_ENDPOINT must be a valid URL"),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let data_file = lookup("BUSHO_DATA_FILE")
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.data_file);
        let host = lookup("HOST")
            .filter(|value| !value.is_empty())
            .unwrap_or(defaults.host);
        let port = parse_var(&lookup, "PORT", defaults.port)?;
        let strict_mutations = parse_flag(&lookup, "BUSHO_STRICT_MUTATIONS", defaults.strict_mutations)?;
        let graphiql = parse_flag(&lookup, "BUSHO_GRAPHIQL", defaults.graphiql)?;
        let endpoint = match lookup("BUSHO_ENDPOINT") {
            Some(raw) => Url::parse(&raw)
                .map_err(|err| AppError::ConfigError(format!("BUSHO_ENDPOINT: {}", err)))?,
            None => defaults.endpoint,
        };

        Ok(Config {
            data_file,
            host,
            port,
            strict_mutations,
            graphiql,
            endpoint,
        })
    }

    pub fn bind_addr(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|err| AppError::ConfigError(format!("{}: {}", key, err))),
        None => Ok(default),
    }
}

fn parse_flag<F>(lookup: &F, key: &str, default: bool) -> Result<bool, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).map(|raw| raw.trim().to_ascii_lowercase()) {
        None => Ok(default),
        Some(value) => match value.as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(AppError::ConfigError(format!("{}: expected a boolean, got {:?}", key, value))),
        },
    }
}
