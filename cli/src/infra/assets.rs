//! Embedded artifact templates — everything under `cli/templates/` is
//! compiled into the binary with `include_dir!`.

use include_dir::{Dir, include_dir};

use crate::application::ports::TemplateSource;
use crate::domain::ArtifactError;

static TEMPLATES: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/templates");

/// Production `TemplateSource` backed by the embedded directory.
pub struct EmbeddedTemplates;

impl TemplateSource for EmbeddedTemplates {
    fn template(&self, name: &str) -> Result<&'static str, ArtifactError> {
        TEMPLATES
            .get_file(name)
            .and_then(|f| f.contents_utf8())
            .ok_or_else(|| ArtifactError::UnknownTemplate(name.to_string()))
    }
}
