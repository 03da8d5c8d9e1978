//! Search backend settings: YAML environments with environment-variable
//! fallback, resolved into one validated [`Connection`].

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use log::{info, warn};
use serde::Deserialize;
use url::Url;

use crate::error::ToolError;

/// Top-level YAML key holding the list of search environments.
pub const CONFIG_GROUP: &str = "elasticsearch";

/// Environment used when none is named.
pub const DEFAULT_ENVIRONMENT: &str = "default";

fn settings_error(message: impl Into<String>) -> ToolError {
    ToolError::Settings {
        message: message.into(),
    }
}

/// Settings as written in a config file or the environment, unvalidated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RawSettings {
    /// Environment name.
    pub name: Option<String>,
    /// Cluster URLs.
    pub hosts: Option<Vec<String>>,
    /// Elastic Cloud deployment id.
    pub cloud_id: Option<String>,
    /// Elastic Cloud credentials as `user:pass`.
    pub cloud_auth: Option<String>,
    /// Basic auth user.
    pub username: Option<String>,
    /// Basic auth password.
    pub password: Option<String>,
    /// API key as `id:key`.
    pub api_key: Option<String>,
    /// Verify TLS certificates (default true).
    pub ssl_verify: Option<bool>,
    /// Index pattern used when a query names none.
    pub default_index: Option<String>,
}

impl RawSettings {
    /// Reads settings from environment variables through `lookup`.
    ///
    /// `ES_HOSTS` is comma separated; `ES_SSL_VERIFY` is a JSON boolean.
    pub fn from_env<F>(lookup: F) -> Result<Self, ToolError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let ssl_verify = lookup("ES_SSL_VERIFY")
            .map(|raw| parse_flag(&raw))
            .transpose()?;

        Ok(Self {
            name: None,
            hosts: lookup("ES_HOSTS").map(|csv| split_csv(&csv)),
            cloud_id: lookup("CLOUD_ID"),
            cloud_auth: lookup("CLOUD_AUTH"),
            username: lookup("ES_USER"),
            password: lookup("ES_PASS"),
            api_key: lookup("ES_APIKEY"),
            ssl_verify,
            default_index: lookup("ES_INDEX"),
        })
    }

    /// Returns `self` with every field set in `over` replaced by it.
    pub fn overlay(self, over: RawSettings) -> Self {
        Self {
            name: over.name.or(self.name),
            hosts: over.hosts.or(self.hosts),
            cloud_id: over.cloud_id.or(self.cloud_id),
            cloud_auth: over.cloud_auth.or(self.cloud_auth),
            username: over.username.or(self.username),
            password: over.password.or(self.password),
            api_key: over.api_key.or(self.api_key),
            ssl_verify: over.ssl_verify.or(self.ssl_verify),
            default_index: over.default_index.or(self.default_index),
        }
    }
}

/// Picks the entry called `name` from `group` in the YAML file at `path`.
///
/// A missing file yields `Ok(None)`. A file without a matching entry is an
/// error; with several matches the first wins.
pub fn choose_entry(
    path: &Path,
    group: &str,
    name: &str,
) -> Result<Option<RawSettings>, ToolError> {
    if !path.exists() {
        return Ok(None);
    }
    info!("reading configuration from {}", path.display());

    let text = std::fs::read_to_string(path)?;
    let groups: BTreeMap<String, serde_yaml::Value> = serde_yaml::from_str(&text)
        .map_err(|e| settings_error(format!("{}: {}", path.display(), e)))?;

    let entries: Vec<RawSettings> = match groups.get(group) {
        Some(value) => serde_yaml::from_value(value.clone())
            .map_err(|e| settings_error(format!("{}: group '{}': {}", path.display(), group, e)))?,
        None => Vec::new(),
    };

    entries
        .into_iter()
        .find(|entry| entry.name.as_deref() == Some(name))
        .map(Some)
        .ok_or_else(|| {
            settings_error(format!(
                "no environment named '{}' in group '{}' of {}",
                name,
                group,
                path.display()
            ))
        })
}

/// Basic auth credentials. `Debug` hides the password.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// User name.
    pub username: String,
    /// Password.
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// An API key split into id and secret. `Debug` hides the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey {
    /// Key id.
    pub id: String,
    /// Key secret.
    pub key: String,
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKey")
            .field("id", &self.id)
            .field("key", &"<redacted>")
            .finish()
    }
}

/// Where to connect and how to authenticate. Exactly one of each.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Connection {
    /// Explicit hosts with basic auth.
    HostsBasic {
        /// Cluster URLs.
        hosts: Vec<Url>,
        /// Credentials.
        credentials: Credentials,
    },
    /// Explicit hosts with an API key.
    HostsApiKey {
        /// Cluster URLs.
        hosts: Vec<Url>,
        /// API key.
        api_key: ApiKey,
    },
    /// Elastic Cloud with basic auth.
    CloudBasic {
        /// Deployment id.
        cloud_id: String,
        /// Credentials.
        credentials: Credentials,
    },
    /// Elastic Cloud with an API key.
    CloudApiKey {
        /// Deployment id.
        cloud_id: String,
        /// API key.
        api_key: ApiKey,
    },
}

enum Auth {
    Basic(Credentials),
    ApiKey(ApiKey),
}

fn split_pair(raw: &str, field: &str, shape: &str) -> Result<(String, String), ToolError> {
    raw.split_once(':')
        .map(|(a, b)| (a.to_string(), b.to_string()))
        .ok_or_else(|| settings_error(format!("{} must look like '{}'", field, shape)))
}

fn split_csv(csv: &str) -> Vec<String> {
    csv.split(',').map(|h| h.trim().to_string()).collect()
}

fn parse_flag(raw: &str) -> Result<bool, ToolError> {
    serde_json::from_str(raw.trim())
        .map_err(|_| settings_error(format!("ES_SSL_VERIFY is not a boolean: {raw:?}")))
}

fn parse_host(raw: &str) -> Result<Url, ToolError> {
    let url = match Url::parse(raw) {
        Ok(url) => url,
        Err(e) => return Err(settings_error(format!("invalid host {:?}: {}", raw, e))),
    };
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(settings_error(format!(
            "invalid host {:?}: scheme must be http or https, not {}",
            raw, other
        ))),
    }
}

/// Validated search settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Environment name, if one was given.
    pub name: Option<String>,
    /// Endpoint and authentication.
    pub connection: Connection,
    /// Verify TLS certificates.
    pub ssl_verify: bool,
    /// Index pattern overriding the query tool's default.
    pub default_index: Option<String>,
}

impl Settings {
    /// Validates raw settings.
    ///
    /// `cloud_auth` wins over `username`/`password` with a warning. Mixing
    /// basic auth with an API key, giving no credentials, or giving both
    /// hosts and a cloud id is an error.
    pub fn resolve(raw: RawSettings) -> Result<Self, ToolError> {
        let has_userpass = raw.username.is_some() && raw.password.is_some();
        if raw.cloud_auth.is_some() && has_userpass {
            warn!("using 'cloud_auth' when 'username/password' are also set");
        }
        if (raw.cloud_auth.is_some() || has_userpass) && raw.api_key.is_some() {
            return Err(settings_error(
                "cannot use api_key together with username/password or cloud_auth",
            ));
        }

        let auth = if let Some(cloud_auth) = &raw.cloud_auth {
            let (username, password) = split_pair(cloud_auth, "cloud_auth", "user:pass")?;
            Auth::Basic(Credentials { username, password })
        } else if let (Some(username), Some(password)) = (raw.username, raw.password) {
            Auth::Basic(Credentials { username, password })
        } else if let Some(api_key) = &raw.api_key {
            let (id, key) = split_pair(api_key, "api_key", "id:key")?;
            Auth::ApiKey(ApiKey { id, key })
        } else {
            return Err(settings_error(
                "no credentials: set cloud_auth, username and password, or api_key",
            ));
        };

        let connection = match (raw.hosts, raw.cloud_id) {
            (Some(_), Some(_)) => return Err(settings_error("hosts and cloud_id are exclusive")),
            (None, None) => return Err(settings_error("no endpoint: set hosts or cloud_id")),
            (Some(hosts), None) => {
                if hosts.is_empty() {
                    return Err(settings_error("hosts must not be empty"));
                }
                let hosts = hosts
                    .iter()
                    .map(|h| parse_host(h))
                    .collect::<Result<Vec<_>, _>>()?;
                match auth {
                    Auth::Basic(credentials) => Connection::HostsBasic { hosts, credentials },
                    Auth::ApiKey(api_key) => Connection::HostsApiKey { hosts, api_key },
                }
            }
            (None, Some(cloud_id)) => match auth {
                Auth::Basic(credentials) => Connection::CloudBasic { cloud_id, credentials },
                Auth::ApiKey(api_key) => Connection::CloudApiKey { cloud_id, api_key },
            },
        };

        Ok(Self {
            name: raw.name,
            connection,
            ssl_verify: raw.ssl_verify.unwrap_or(true),
            default_index: raw.default_index,
        })
    }

    /// Loads settings for `environment`: the config file entry (if the file
    /// exists) layered over environment variables read through `lookup`.
    pub fn load<F>(config: Option<&Path>, environment: &str, lookup: F) -> Result<Self, ToolError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut raw = RawSettings::from_env(lookup)?;
        if let Some(path) = config {
            if let Some(entry) = choose_entry(path, CONFIG_GROUP, environment)? {
                raw = raw.overlay(entry);
            }
        }
        Self::resolve(raw)
    }

    /// Returns the configured default index, or `fallback`.
    pub fn index_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.default_index.as_deref().unwrap_or(fallback)
    }
}
