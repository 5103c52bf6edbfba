pub mod index;
pub mod report;
pub mod template;

use adsreport_core::AppConfig;
use thiserror::Error;

pub use index::IndexRenderer;
pub use report::{RenderedReport, ReportInput, ReportRenderer};
pub use template::{Template, Values};

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template {template} has no value for placeholder {{{placeholder}}}")]
    MissingValue {
        template: &'static str,
        placeholder: String,
    },

    #[error("template {template} has no placeholder {{{placeholder}}}")]
    UnknownPlaceholder {
        template: &'static str,
        placeholder: String,
    },
}

/// Agency name and link shown in page headers and footers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branding {
    pub agency_name: String,
    pub agency_url: String,
}

impl Branding {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            agency_name: config.agency_name.clone(),
            agency_url: config.agency_url.clone(),
        }
    }
}
