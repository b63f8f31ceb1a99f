//! Deployment Descriptor Entity
//!
//! Everything one run needs to know about where and how to deploy. Built
//! once by the descriptor repository (or tests) and never mutated during a
//! run.

use std::collections::BTreeMap;
use std::path::PathBuf;

/// Default SSH port
pub const DEFAULT_SSH_PORT: u16 = 22;
/// Default application port when `env.PORT` is absent
pub const DEFAULT_APP_PORT: u16 = 3000;
/// Default server entry point inside the artifact
pub const DEFAULT_ENTRY_POINT: &str = ".output/server/index.mjs";
/// Default build profile
pub const DEFAULT_BUILD_PROFILE: &str = "production";

/// Remote host and login
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerTarget {
    pub host: String,
    pub user: String,
    pub port: u16,
    /// Vault ciphertext; empty means "no password, use keys or agent"
    pub encrypted_password: String,
    pub key_path: Option<PathBuf>,
}

impl ServerTarget {
    pub fn new(host: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            user: user.into(),
            port: DEFAULT_SSH_PORT,
            encrypted_password: String::new(),
            key_path: None,
        }
    }

    /// `user@host`, or just `host` when no user is set
    pub fn destination(&self) -> String {
        if self.user.is_empty() {
            self.host.clone()
        } else {
            format!("{}@{}", self.user, self.host)
        }
    }

    pub fn has_password(&self) -> bool {
        !self.encrypted_password.is_empty()
    }
}

/// Immutable description of one deployment target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentDescriptor {
    /// Environment name (`production`, `staging`, ...)
    pub environment: String,
    pub server: ServerTarget,
    /// Absolute deployment directory on the remote host
    pub remote_path: String,
    /// Name the process supervisor registers the app under
    pub app_name: String,
    /// Build profile injected as `NODE_ENV`
    pub build_profile: String,
    /// Port the app listens on (always written to the runtime env file)
    pub app_port: u16,
    /// User-declared variables, ordered so composition is deterministic
    pub env: BTreeMap<String, String>,
    /// Remote commands run before install/service actions
    pub pre_commands: Vec<String>,
    /// Remote commands run after a successful deployment
    pub post_commands: Vec<String>,
    /// Explicit supervisor start command (used when the app is not registered)
    pub start_command: Option<String>,
    /// Server entry point relative to `remote_path`
    pub entry_point: String,
    /// Manage the app through the process supervisor
    pub use_supervisor: bool,
    /// Incremental installs (reuse caches) instead of clean ones
    pub optimize_install: bool,
}

impl DeploymentDescriptor {
    pub fn new(
        server: ServerTarget,
        remote_path: impl Into<String>,
        app_name: impl Into<String>,
    ) -> Self {
        Self {
            environment: DEFAULT_BUILD_PROFILE.to_string(),
            server,
            remote_path: remote_path.into(),
            app_name: app_name.into(),
            build_profile: DEFAULT_BUILD_PROFILE.to_string(),
            app_port: DEFAULT_APP_PORT,
            env: BTreeMap::new(),
            pre_commands: Vec::new(),
            post_commands: Vec::new(),
            start_command: None,
            entry_point: DEFAULT_ENTRY_POINT.to_string(),
            use_supervisor: true,
            optimize_install: true,
        }
    }

    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }

    pub fn with_build_profile(mut self, profile: impl Into<String>) -> Self {
        self.build_profile = profile.into();
        self
    }

    pub fn with_app_port(mut self, port: u16) -> Self {
        self.app_port = port;
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn with_pre_commands(mut self, commands: Vec<String>) -> Self {
        self.pre_commands = commands;
        self
    }

    pub fn with_post_commands(mut self, commands: Vec<String>) -> Self {
        self.post_commands = commands;
        self
    }

    pub fn with_start_command(mut self, command: impl Into<String>) -> Self {
        self.start_command = Some(command.into());
        self
    }

    pub fn with_entry_point(mut self, entry_point: impl Into<String>) -> Self {
        self.entry_point = entry_point.into();
        self
    }

    pub fn with_supervisor(mut self, enabled: bool) -> Self {
        self.use_supervisor = enabled;
        self
    }

    pub fn with_optimize_install(mut self, enabled: bool) -> Self {
        self.optimize_install = enabled;
        self
    }

    pub fn with_encrypted_password(mut self, ciphertext: impl Into<String>) -> Self {
        self.server.encrypted_password = ciphertext.into();
        self
    }

    /// Build-time environment overlay: profile first, then user variables
    pub fn build_env(&self) -> Vec<(String, String)> {
        let mut overlay = vec![("NODE_ENV".to_string(), self.build_profile.clone())];
        overlay.extend(self.env.iter().map(|(k, v)| (k.clone(), v.clone())));
        overlay
    }

    /// Runtime variables written to the remote env file
    ///
    /// `PORT` is always present and always the numeric app port; a `PORT`
    /// entry in `env` is superseded.
    pub fn runtime_env(&self) -> Vec<(String, String)> {
        let mut vars = vec![("PORT".to_string(), self.app_port.to_string())];
        vars.extend(
            self.env
                .iter()
                .filter(|(k, _)| k.as_str() != "PORT")
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        vars
    }

    /// Public URL of the deployed app
    pub fn app_url(&self) -> String {
        format!("http://{}:{}", self.server.host, self.app_port)
    }

    /// Remote path of a file inside the deployment directory
    pub fn remote_file(&self, name: &str) -> String {
        format!("{}/{}", self.remote_path.trim_end_matches('/'), name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor() -> DeploymentDescriptor {
        DeploymentDescriptor::new(ServerTarget::new("example.com", "deploy"), "/srv/app", "shop")
    }

    #[test]
    fn destination_includes_user() {
        assert_eq!(descriptor().server.destination(), "deploy@example.com");
        assert_eq!(ServerTarget::new("host", "").destination(), "host");
    }

    #[test]
    fn build_env_starts_with_profile() {
        let d = descriptor()
            .with_build_profile("staging")
            .with_env("API_URL", "https://api");
        let overlay = d.build_env();
        assert_eq!(overlay[0], ("NODE_ENV".to_string(), "staging".to_string()));
        assert!(overlay.contains(&("API_URL".to_string(), "https://api".to_string())));
    }

    #[test]
    fn runtime_env_always_has_numeric_port_first() {
        let d = descriptor().with_app_port(8080).with_env("PORT", "9999");
        let vars = d.runtime_env();
        assert_eq!(vars[0], ("PORT".to_string(), "8080".to_string()));
        assert_eq!(vars.iter().filter(|(k, _)| k == "PORT").count(), 1);
    }

    #[test]
    fn remote_file_joins_without_double_slash() {
        let mut d = descriptor();
        d.remote_path = "/srv/app/".to_string();
        assert_eq!(d.remote_file(".lockhash"), "/srv/app/.lockhash");
    }

    #[test]
    fn app_url_uses_host_and_port() {
        assert_eq!(descriptor().with_app_port(4000).app_url(), "http://example.com:4000");
    }
}
