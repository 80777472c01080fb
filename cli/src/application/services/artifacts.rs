//! Application service — render embedded templates to disk.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::path::{Path, PathBuf};

use crate::application::ports::{LocalFs, ProgressReporter, TemplateSource};
use crate::application::services::secrets::PUBLIC_FILE_MODE;
use crate::domain::artifacts::{self, COMPOSE_FILE, ServiceUnit};
use crate::domain::template::{Variables, render_template};
use crate::domain::{ArtifactError, ProvisionConfig};

/// Renders templates from a [`TemplateSource`] into files on a [`LocalFs`].
pub struct ArtifactWriter<'a, T, F> {
    templates: &'a T,
    fs: &'a F,
}

impl<'a, T: TemplateSource, F: LocalFs> ArtifactWriter<'a, T, F> {
    pub fn new(templates: &'a T, fs: &'a F) -> Self {
        Self { templates, fs }
    }

    /// Render `template` with `vars` and write it atomically to `dest`,
    /// creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns `UnknownTemplate`, `UnboundVariable`, or `Write`.
    pub fn render(
        &self,
        template: &str,
        vars: &Variables,
        dest: &Path,
        mode: u32,
    ) -> Result<PathBuf, ArtifactError> {
        let text = self.templates.template(template)?;
        let rendered = render_template(template, text, vars)?;

        let write_err = |e: anyhow::Error| ArtifactError::Write {
            path: dest.to_path_buf(),
            source: e
                .downcast::<std::io::Error>()
                .unwrap_or_else(std::io::Error::other),
        };
        if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.fs.create_dir_all(parent).map_err(write_err)?;
        }
        self.fs
            .write_atomic(dest, &rendered, mode)
            .map_err(write_err)?;

        tracing::debug!(template, dest = %dest.display(), "artifact rendered");
        Ok(dest.to_path_buf())
    }

    /// Write `.dockerignore` and the compose manifest into the project.
    ///
    /// # Errors
    ///
    /// Returns the first rendering or write failure.
    pub fn generate_build_artifacts(
        &self,
        cfg: &ProvisionConfig,
        reporter: &impl ProgressReporter,
    ) -> Result<Vec<PathBuf>, ArtifactError> {
        let written = vec![
            self.render(
                artifacts::DOCKERIGNORE,
                &Variables::new(),
                &cfg.project_dir.join(".dockerignore"),
                PUBLIC_FILE_MODE,
            )?,
            self.render(
                artifacts::COMPOSE,
                &artifacts::compose_variables(cfg),
                &cfg.project_dir.join(COMPOSE_FILE),
                PUBLIC_FILE_MODE,
            )?,
        ];
        for path in &written {
            reporter.success(&format!("wrote {}", path.display()));
        }
        Ok(written)
    }

    /// Render a systemd unit into `unit_dir`.
    ///
    /// # Errors
    ///
    /// Returns the rendering or write failure.
    pub fn write_unit(&self, unit: &ServiceUnit, unit_dir: &Path) -> Result<PathBuf, ArtifactError> {
        self.render(
            unit.template,
            &unit.variables(),
            &unit_dir.join(unit.file_name()),
            PUBLIC_FILE_MODE,
        )
    }
}
