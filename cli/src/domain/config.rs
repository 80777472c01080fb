//! Provisioning configuration schema.
//!
//! Pure types only — loading from the process environment lives in
//! `crate::infra::config`.

use std::path::{Component, Path, PathBuf};

use serde::Deserialize;

/// Default HTTP port published by the application container.
pub const DEFAULT_APP_PORT: u16 = 5000;

/// Fallback login user when neither `KIOSK_SERVICE_USER` nor `SUDO_USER` is set.
pub const DEFAULT_SERVICE_USER: &str = "pi";

/// Provisioning settings, deserialized from `KIOSK_*` environment variables.
///
/// Every field is optional in the environment; [`ProvisionConfig::resolve`]
/// fills the values whose defaults depend on other fields.
#[derive(Debug, Clone, Deserialize)]
pub struct ProvisionConfig {
    /// Project checkout containing the Dockerfile and templates.
    #[serde(default = "default_project_dir")]
    pub project_dir: PathBuf,

    /// Compose service, container and unit name prefix.
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// Port published by the application container.
    #[serde(default = "default_app_port")]
    pub app_port: u16,

    /// Desktop login user that owns the kiosk session.
    #[serde(default)]
    pub service_user: Option<String>,

    /// Home directory of `service_user`.
    #[serde(default)]
    pub home_dir: Option<PathBuf>,

    /// Directory systemd loads units from.
    #[serde(default = "default_unit_dir")]
    pub unit_dir: PathBuf,

    /// Whether to install the kiosk browser session.
    #[serde(default = "default_true")]
    pub kiosk: bool,

    /// Whether to probe the provider APIs with the collected keys.
    #[serde(default = "default_true")]
    pub validate_keys: bool,

    /// Script (relative to `project_dir`) run by the hardware unit.
    #[serde(default = "default_hardware_entrypoint")]
    pub hardware_entrypoint: String,

    /// Log file for the hardware unit. Defaults to `/var/log/<app>-hardware.log`.
    #[serde(default)]
    pub hardware_log: Option<PathBuf>,

    #[serde(default = "default_memory_limit")]
    pub memory_limit: String,

    #[serde(default = "default_cpu_limit")]
    pub cpu_limit: String,

    #[serde(default = "default_memory_reservation")]
    pub memory_reservation: String,

    #[serde(default = "default_cpu_reservation")]
    pub cpu_reservation: String,

    /// Path appended to the base URL for the health probe.
    #[serde(default = "default_health_path")]
    pub health_path: String,
}

impl Default for ProvisionConfig {
    fn default() -> Self {
        Self {
            project_dir: default_project_dir(),
            app_name: default_app_name(),
            app_port: default_app_port(),
            service_user: None,
            home_dir: None,
            unit_dir: default_unit_dir(),
            kiosk: true,
            validate_keys: true,
            hardware_entrypoint: default_hardware_entrypoint(),
            hardware_log: None,
            memory_limit: default_memory_limit(),
            cpu_limit: default_cpu_limit(),
            memory_reservation: default_memory_reservation(),
            cpu_reservation: default_cpu_reservation(),
            health_path: default_health_path(),
        }
    }
}

impl ProvisionConfig {
    /// Fill the dependent defaults: service user (from `sudo_user`, then
    /// `pi`), home directory and hardware log path.
    #[must_use]
    pub fn resolve(mut self, sudo_user: Option<String>) -> Self {
        let user = self
            .service_user
            .take()
            .or(sudo_user.filter(|u| !u.is_empty() && u != "root"))
            .unwrap_or_else(|| DEFAULT_SERVICE_USER.to_string());
        if self.home_dir.is_none() {
            self.home_dir = Some(PathBuf::from("/home").join(&user));
        }
        if self.hardware_log.is_none() {
            self.hardware_log = Some(PathBuf::from(format!(
                "/var/log/{}-hardware.log",
                self.app_name
            )));
        }
        self.service_user = Some(user);
        self
    }

    /// Join a relative `project_dir` onto `cwd`, dropping `.` components.
    /// Units and the kiosk launcher embed this path, and systemd only
    /// accepts an absolute `WorkingDirectory=`.
    #[must_use]
    pub fn anchored(mut self, cwd: &Path) -> Self {
        if self.project_dir.is_relative() {
            self.project_dir = cwd
                .join(&self.project_dir)
                .components()
                .filter(|c| !matches!(c, Component::CurDir))
                .collect();
        }
        self
    }

    /// Login user; `pi` until [`ProvisionConfig::resolve`] has run.
    #[must_use]
    pub fn user(&self) -> &str {
        self.service_user.as_deref().unwrap_or(DEFAULT_SERVICE_USER)
    }

    /// Home directory of the login user.
    #[must_use]
    pub fn home(&self) -> PathBuf {
        self.home_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("/home").join(self.user()))
    }

    /// `~/.config/autostart` of the login user.
    #[must_use]
    pub fn autostart_dir(&self) -> PathBuf {
        self.home().join(".config").join("autostart")
    }

    /// `~/.local/bin` of the login user.
    #[must_use]
    pub fn script_dir(&self) -> PathBuf {
        self.home().join(".local").join("bin")
    }

    /// Log file written by the hardware unit.
    #[must_use]
    pub fn hardware_log_path(&self) -> PathBuf {
        self.hardware_log
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("/var/log/{}-hardware.log", self.app_name)))
    }

    /// Base URL used when `config.json` carries no `base_url`.
    #[must_use]
    pub fn default_base_url(&self) -> String {
        format!("http://localhost:{}", self.app_port)
    }
}

fn default_project_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_app_name() -> String {
    "kiosk-app".to_string()
}

fn default_app_port() -> u16 {
    DEFAULT_APP_PORT
}

fn default_unit_dir() -> PathBuf {
    PathBuf::from("/etc/systemd/system")
}

fn default_true() -> bool {
    true
}

fn default_hardware_entrypoint() -> String {
    "hardware_service.py".to_string()
}

fn default_memory_limit() -> String {
    "2g".to_string()
}

fn default_cpu_limit() -> String {
    "2.0".to_string()
}

fn default_memory_reservation() -> String {
    "512m".to_string()
}

fn default_cpu_reservation() -> String {
    "0.5".to_string()
}

fn default_health_path() -> String {
    "/health".to_string()
}
