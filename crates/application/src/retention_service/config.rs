use pharmadesk_core::{AppError, AppResult};
use pharmadesk_domain::RetentionYears;

/// Retention windows fixed for the life of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionConfig {
    /// Minimum record age before archival.
    pub retention_years: RetentionYears,
    /// Minimum time archived before purge.
    pub archive_grace_years: RetentionYears,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            retention_years: RetentionYears::default_retention(),
            archive_grace_years: RetentionYears::default_archive_grace(),
        }
    }
}

impl RetentionConfig {
    /// Creates a configuration from validated year counts.
    #[must_use]
    pub fn new(retention_years: RetentionYears, archive_grace_years: RetentionYears) -> Self {
        Self {
            retention_years,
            archive_grace_years,
        }
    }

    /// Builds a configuration from raw setting values.
    ///
    /// Missing or blank values fall back to the defaults. Values that do not
    /// parse as a year count are rejected instead of silently defaulted.
    pub fn from_raw(
        retention_years: Option<&str>,
        archive_grace_years: Option<&str>,
    ) -> AppResult<Self> {
        let defaults = Self::default();

        Ok(Self {
            retention_years: parse_years(
                "AUDIT_RETENTION_YEARS",
                retention_years,
                defaults.retention_years,
            )?,
            archive_grace_years: parse_years(
                "AUDIT_ARCHIVE_GRACE_YEARS",
                archive_grace_years,
                defaults.archive_grace_years,
            )?,
        })
    }
}

fn parse_years(
    name: &str,
    value: Option<&str>,
    default: RetentionYears,
) -> AppResult<RetentionYears> {
    let Some(value) = value.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(default);
    };

    let years = value.parse::<u16>().map_err(|error| {
        AppError::Validation(format!("invalid {name} value '{value}': {error}"))
    })?;

    RetentionYears::new(years)
        .map_err(|error| AppError::Validation(format!("invalid {name} value '{value}': {error}")))
}
