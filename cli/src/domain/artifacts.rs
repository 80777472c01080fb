//! Artifact descriptions — which template renders where, with which variables.
//!
//! Pure functions only. Each function returns the variables for one
//! template; the caller renders and writes.

use std::path::{Path, PathBuf};

use crate::domain::config::ProvisionConfig;
use crate::domain::template::Variables;

// ── Template names ────────────────────────────────────────────────────────────

pub const DOCKERIGNORE: &str = "dockerignore";
pub const COMPOSE: &str = "docker-compose.yml";
pub const APP_UNIT: &str = "app.service";
pub const HARDWARE_UNIT: &str = "hardware.service";
pub const LOADING_PAGE: &str = "loading.html";
pub const KIOSK_DESKTOP: &str = "kiosk.desktop";
pub const BLANKING_SCRIPT: &str = "disable-blanking.sh";
pub const BLANKING_DESKTOP: &str = "disable-blanking.desktop";

/// Compose manifest file name inside the project directory.
pub const COMPOSE_FILE: &str = "docker-compose.yml";

// ── Service units ─────────────────────────────────────────────────────────────

/// systemd `Restart=` policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestartPolicy {
    No,
    OnFailure,
    Always,
}

impl RestartPolicy {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::No => "no",
            Self::OnFailure => "on-failure",
            Self::Always => "always",
        }
    }
}

/// A systemd unit rendered from one of the unit templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceUnit {
    /// Unit name without the `.service` suffix.
    pub name: String,
    pub template: &'static str,
    pub description: String,
    pub working_dir: PathBuf,
    pub start_command: String,
    /// Empty when the unit has no explicit stop command.
    pub stop_command: String,
    pub restart: RestartPolicy,
    pub user: String,
    pub log_file: Option<PathBuf>,
}

impl ServiceUnit {
    /// File name under the unit directory.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}.service", self.name)
    }

    /// Template variables for this unit.
    #[must_use]
    pub fn variables(&self) -> Variables {
        let mut vars = Variables::new();
        vars.insert("UNIT_DESCRIPTION", self.description.clone());
        vars.insert("WORKING_DIR", self.working_dir.display().to_string());
        vars.insert("START_COMMAND", self.start_command.clone());
        vars.insert("STOP_COMMAND", self.stop_command.clone());
        vars.insert("RESTART_POLICY", self.restart.as_str().to_string());
        vars.insert("SERVICE_USER", self.user.clone());
        vars.insert(
            "LOG_FILE",
            self.log_file
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
        );
        vars
    }
}

/// One-shot unit wrapping `docker compose up/down` for the app stack.
#[must_use]
pub fn app_unit(cfg: &ProvisionConfig) -> ServiceUnit {
    ServiceUnit {
        name: cfg.app_name.clone(),
        template: APP_UNIT,
        description: format!("{} container stack", cfg.app_name),
        working_dir: cfg.project_dir.clone(),
        start_command: "/usr/bin/docker compose up -d".to_string(),
        stop_command: "/usr/bin/docker compose down".to_string(),
        restart: RestartPolicy::No,
        user: "root".to_string(),
        log_file: None,
    }
}

/// Long-running unit for the hardware interaction process.
#[must_use]
pub fn hardware_unit(cfg: &ProvisionConfig) -> ServiceUnit {
    ServiceUnit {
        name: format!("{}-hardware", cfg.app_name),
        template: HARDWARE_UNIT,
        description: format!("{} hardware controller", cfg.app_name),
        working_dir: cfg.project_dir.clone(),
        start_command: format!(
            "/usr/bin/python3 {}",
            cfg.project_dir.join(&cfg.hardware_entrypoint).display()
        ),
        stop_command: String::new(),
        restart: RestartPolicy::OnFailure,
        user: cfg.user().to_string(),
        log_file: Some(cfg.hardware_log_path()),
    }
}

// ── Compose manifest ──────────────────────────────────────────────────────────

/// Variables for the compose manifest.
#[must_use]
pub fn compose_variables(cfg: &ProvisionConfig) -> Variables {
    let mut vars = Variables::new();
    vars.insert("APP_NAME", cfg.app_name.clone());
    vars.insert("APP_PORT", cfg.app_port.to_string());
    vars.insert("MEMORY_LIMIT", cfg.memory_limit.clone());
    vars.insert("CPU_LIMIT", cfg.cpu_limit.clone());
    vars.insert("MEMORY_RESERVATION", cfg.memory_reservation.clone());
    vars.insert("CPU_RESERVATION", cfg.cpu_reservation.clone());
    vars.insert("HEALTH_PATH", cfg.health_path.clone());
    vars
}

// ── Kiosk ─────────────────────────────────────────────────────────────────────

/// A browser that can run in kiosk mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrowserCandidate {
    pub binary: &'static str,
    pub kiosk_args: &'static [&'static str],
}

const CHROMIUM_ARGS: &[&str] = &[
    "--kiosk",
    "--noerrdialogs",
    "--disable-infobars",
    "--disable-session-crashed-bubble",
    "--incognito",
    "--check-for-update-interval=31536000",
];

/// Browsers in order of preference.
pub const BROWSERS: &[BrowserCandidate] = &[
    BrowserCandidate {
        binary: "chromium-browser",
        kiosk_args: CHROMIUM_ARGS,
    },
    BrowserCandidate {
        binary: "chromium",
        kiosk_args: CHROMIUM_ARGS,
    },
    BrowserCandidate {
        binary: "google-chrome",
        kiosk_args: CHROMIUM_ARGS,
    },
    BrowserCandidate {
        binary: "firefox",
        kiosk_args: &["--kiosk"],
    },
];

/// Pick the first candidate `locate` can resolve to an executable path.
pub fn select_browser(
    candidates: &[BrowserCandidate],
    locate: impl Fn(&str) -> Option<PathBuf>,
) -> Option<(BrowserCandidate, PathBuf)> {
    candidates
        .iter()
        .find_map(|c| locate(c.binary).map(|path| (*c, path)))
}

/// `Exec=` line for the kiosk autostart entry.
#[must_use]
pub fn kiosk_command(browser: &Path, candidate: &BrowserCandidate, page: &Path) -> String {
    let mut parts = vec![browser.display().to_string()];
    parts.extend(candidate.kiosk_args.iter().map(|a| (*a).to_string()));
    parts.push(format!("file://{}", page.display()));
    parts.join(" ")
}

/// Loading page location inside the project directory.
#[must_use]
pub fn loading_page_path(cfg: &ProvisionConfig) -> PathBuf {
    cfg.project_dir.join("kiosk").join("loading.html")
}

/// Screen-blanking helper script location.
#[must_use]
pub fn blanking_script_path(cfg: &ProvisionConfig) -> PathBuf {
    cfg.script_dir()
        .join(format!("{}-disable-blanking.sh", cfg.app_name))
}

/// Variables shared by the kiosk templates.
#[must_use]
pub fn kiosk_variables(cfg: &ProvisionConfig, app_url: &str, browser_command: &str) -> Variables {
    let mut vars = Variables::new();
    vars.insert("APP_NAME", cfg.app_name.clone());
    vars.insert("APP_URL", app_url.to_string());
    vars.insert("BROWSER_COMMAND", browser_command.to_string());
    vars.insert(
        "BLANKING_SCRIPT",
        blanking_script_path(cfg).display().to_string(),
    );
    vars
}
