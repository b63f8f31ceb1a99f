//! JSON Descriptor Repository
//!
//! Reads and writes deployment descriptors stored as
//! `.rollout.<environment>.json` in the project root.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::domain::entities::{
    DeploymentDescriptor, ServerTarget, DEFAULT_APP_PORT, DEFAULT_BUILD_PROFILE,
    DEFAULT_ENTRY_POINT, DEFAULT_SSH_PORT,
};
use crate::domain::services::shell::is_env_name;
use crate::error::{RolloutError, RolloutResult};

const FILE_PREFIX: &str = ".rollout.";
const FILE_SUFFIX: &str = ".json";

/// Descriptor file name for an environment
pub fn descriptor_file_name(environment: &str) -> String {
    format!("{}{}{}", FILE_PREFIX, environment, FILE_SUFFIX)
}

/// Environment encoded in a descriptor file name
fn environment_of(file_name: &str) -> Option<&str> {
    file_name
        .strip_prefix(FILE_PREFIX)?
        .strip_suffix(FILE_SUFFIX)
        .filter(|env| !env.is_empty())
}

// ---------------------------------------------------------------------------
// On-disk records
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DescriptorRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    environment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    build_env: Option<String>,
    #[serde(default)]
    server: ServerRecord,
    #[serde(default)]
    deploy: DeployRecord,
    #[serde(default)]
    processes: BTreeMap<String, ProcessRecord>,
    #[serde(default)]
    env: BTreeMap<String, Value>,
    #[serde(default)]
    advanced: AdvancedRecord,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServerRecord {
    #[serde(default)]
    host: String,
    #[serde(default)]
    user: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    port: Option<Value>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    password: String,
    #[serde(default, alias = "sshKey", skip_serializing_if = "Option::is_none")]
    key_path: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeployRecord {
    #[serde(default)]
    path: String,
    #[serde(default)]
    pre_deploy: Vec<String>,
    #[serde(default)]
    post_deploy: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    entry_point: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProcessRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    command: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AdvancedRecord {
    #[serde(default = "enabled")]
    use_pm2: bool,
    #[serde(default = "enabled")]
    optimize_npm: bool,
}

impl Default for AdvancedRecord {
    fn default() -> Self {
        Self {
            use_pm2: true,
            optimize_npm: true,
        }
    }
}

fn enabled() -> bool {
    true
}

/// Render a JSON scalar the way it would be written in a shell env file
fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Command-line overrides applied after loading
#[derive(Debug, Clone, Default)]
pub struct DescriptorOverrides {
    pub host: Option<String>,
    pub user: Option<String>,
    pub path: Option<String>,
}

/// Parse descriptor JSON
///
/// `file` is only used in error messages; `fallback_name` names the app when
/// neither `name` nor `processes` does.
pub fn parse_descriptor(
    text: &str,
    file: &Path,
    fallback_name: &str,
    overrides: &DescriptorOverrides,
) -> RolloutResult<DeploymentDescriptor> {
    parse_with_environment(text, file, fallback_name, DEFAULT_BUILD_PROFILE, overrides)
}

fn parse_with_environment(
    text: &str,
    file: &Path,
    fallback_name: &str,
    fallback_environment: &str,
    overrides: &DescriptorOverrides,
) -> RolloutResult<DeploymentDescriptor> {
    let invalid = |message: String| RolloutError::InvalidDescriptor {
        file: file.to_path_buf(),
        message,
    };
    let mut record: DescriptorRecord =
        serde_json::from_str(text).map_err(|e| invalid(e.to_string()))?;

    if let Some(host) = &overrides.host {
        record.server.host = host.clone();
    }
    if let Some(user) = &overrides.user {
        record.server.user = user.clone();
    }
    if let Some(path) = &overrides.path {
        record.deploy.path = path.clone();
    }

    if record.server.host.trim().is_empty() {
        return Err(invalid("server.host is required".into()));
    }
    if record.deploy.path.trim().is_empty() {
        return Err(invalid("deploy.path is required".into()));
    }

    let ssh_port = match &record.server.port {
        None | Some(Value::Null) => DEFAULT_SSH_PORT,
        Some(value) => scalar(value)
            .parse::<u16>()
            .map_err(|_| invalid(format!("server.port '{}' is not a port number", scalar(value))))?,
    };

    let app_port = match record.env.get("PORT") {
        None => DEFAULT_APP_PORT,
        Some(value) => scalar(value)
            .parse::<u16>()
            .map_err(|_| invalid(format!("env.PORT '{}' is not a port number", scalar(value))))?,
    };

    let (process_name, process) = match record.processes.iter().next() {
        Some((name, process)) => (Some(name.clone()), Some(process)),
        None => (None, None),
    };
    let app_name = record
        .name
        .clone()
        .filter(|n| !n.trim().is_empty())
        .or(process_name)
        .unwrap_or_else(|| fallback_name.to_string());

    let mut server = ServerTarget::new(record.server.host.trim(), record.server.user.trim());
    server.port = ssh_port;
    server.encrypted_password = record.server.password.clone();
    server.key_path = record
        .server
        .key_path
        .as_deref()
        .filter(|p| !p.trim().is_empty())
        .map(expand_home);

    let environment = record
        .environment
        .clone()
        .filter(|e| !e.trim().is_empty())
        .unwrap_or_else(|| fallback_environment.to_string());
    let build_profile = record
        .build_env
        .clone()
        .unwrap_or_else(|| DEFAULT_BUILD_PROFILE.to_string());

    let mut descriptor = DeploymentDescriptor::new(server, record.deploy.path.trim(), app_name)
        .with_environment(environment)
        .with_build_profile(build_profile)
        .with_app_port(app_port)
        .with_pre_commands(record.deploy.pre_deploy.clone())
        .with_post_commands(record.deploy.post_deploy.clone())
        .with_entry_point(
            record
                .deploy
                .entry_point
                .clone()
                .unwrap_or_else(|| DEFAULT_ENTRY_POINT.to_string()),
        )
        .with_supervisor(record.advanced.use_pm2)
        .with_optimize_install(record.advanced.optimize_npm);

    for (key, value) in &record.env {
        if !is_env_name(key) {
            return Err(invalid(format!(
                "env key '{}' is not a shell variable name ([A-Za-z_][A-Za-z0-9_]*)",
                key
            )));
        }
        descriptor = descriptor.with_env(key.clone(), scalar(value));
    }
    if let Some(command) = process.and_then(|p| p.command.clone()) {
        if !command.trim().is_empty() {
            descriptor = descriptor.with_start_command(command);
        }
    }

    Ok(descriptor)
}

/// Expand a leading `~/` against the local home directory
fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(path)),
        None => PathBuf::from(path),
    }
}

// ---------------------------------------------------------------------------
// Repository
// ---------------------------------------------------------------------------

/// Values for a starter descriptor
#[derive(Debug, Clone)]
pub struct DescriptorTemplate {
    pub environment: String,
    pub host: String,
    pub user: String,
    pub path: Option<String>,
    pub app_name: String,
    pub encrypted_password: String,
}

/// Descriptor files in one project directory
#[derive(Debug, Clone)]
pub struct JsonDescriptorRepository {
    root: PathBuf,
}

impl JsonDescriptorRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, environment: &str) -> PathBuf {
        self.root.join(descriptor_file_name(environment))
    }

    /// Environments that have a descriptor file, sorted
    pub fn environments(&self) -> RolloutResult<Vec<String>> {
        let mut found = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name();
            if let Some(env) = name.to_str().and_then(environment_of) {
                found.push(env.to_string());
            }
        }
        found.sort();
        Ok(found)
    }

    /// Pick the descriptor file: the requested environment, or the only one
    pub fn select(&self, environment: Option<&str>) -> RolloutResult<PathBuf> {
        if let Some(env) = environment {
            let path = self.path_for(env);
            if path.is_file() {
                return Ok(path);
            }
            return Err(RolloutError::DescriptorNotFound {
                dir: self.root.clone(),
            });
        }

        let mut environments = self.environments()?;
        match environments.len() {
            0 => Err(RolloutError::DescriptorNotFound {
                dir: self.root.clone(),
            }),
            1 => Ok(self.path_for(&environments.remove(0))),
            _ => Err(RolloutError::AmbiguousDescriptor {
                names: environments
                    .iter()
                    .map(|env| descriptor_file_name(env))
                    .collect(),
            }),
        }
    }

    /// Select, read and parse a descriptor
    pub fn load(
        &self,
        environment: Option<&str>,
        overrides: &DescriptorOverrides,
    ) -> RolloutResult<DeploymentDescriptor> {
        let path = self.select(environment)?;
        debug!(file = %path.display(), "loading descriptor");
        let text = fs::read_to_string(&path)?;
        let fallback = self
            .root
            .canonicalize()
            .ok()
            .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .unwrap_or_else(|| "app".to_string());
        let environment = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(environment_of)
            .unwrap_or(DEFAULT_BUILD_PROFILE)
            .to_string();
        parse_with_environment(&text, &path, &fallback, &environment, overrides)
    }

    /// Write a starter descriptor; refuses to overwrite unless `force`
    pub fn init(&self, template: &DescriptorTemplate, force: bool) -> RolloutResult<PathBuf> {
        let path = self.path_for(&template.environment);
        if path.exists() && !force {
            return Err(RolloutError::InvalidDescriptor {
                file: path,
                message: "already exists (use --force to overwrite)".into(),
            });
        }

        let app = template.app_name.clone();
        let mut env = BTreeMap::new();
        env.insert("PORT".to_string(), Value::from(DEFAULT_APP_PORT));

        let mut processes = BTreeMap::new();
        processes.insert(
            app.clone(),
            ProcessRecord { command: None },
        );

        let record = DescriptorRecord {
            name: Some(app.clone()),
            environment: Some(template.environment.clone()),
            build_env: Some(DEFAULT_BUILD_PROFILE.to_string()),
            server: ServerRecord {
                host: template.host.clone(),
                user: template.user.clone(),
                port: Some(Value::from(DEFAULT_SSH_PORT)),
                password: template.encrypted_password.clone(),
                key_path: None,
            },
            deploy: DeployRecord {
                path: template
                    .path
                    .clone()
                    .unwrap_or_else(|| format!("/var/www/{}", app)),
                pre_deploy: Vec::new(),
                post_deploy: Vec::new(),
                entry_point: Some(DEFAULT_ENTRY_POINT.to_string()),
            },
            processes,
            env,
            advanced: AdvancedRecord::default(),
        };

        let mut text = serde_json::to_string_pretty(&record)?;
        text.push('\n');
        fs::write(&path, text)?;
        debug!(file = %path.display(), "descriptor written");
        Ok(path)
    }
}
