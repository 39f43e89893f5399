//! Configuration validation utilities

use crate::schema::LintSettings;
use types::SuppressionSet;

const MIN_REASONABLE_LINE_LENGTH: u32 = 40;
const MAX_REASONABLE_LINE_LENGTH: u32 = 200;

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate complete configuration
    pub fn validate(settings: &LintSettings) -> ValidationReport {
        let mut report = ValidationReport::new();

        Self::validate_lengths(settings, &mut report);
        Self::validate_codes(settings, &mut report);
        Self::validate_per_file_ignores(settings, &mut report);

        // Cross-validation checks
        Self::validate_selection_overlap(settings, &mut report);

        report
    }

    fn validate_lengths(settings: &LintSettings, report: &mut ValidationReport) {
        if settings.max_line_length == 0 {
            report.add_error("max-line-length", "Maximum line length cannot be 0");
        } else if settings.max_line_length < MIN_REASONABLE_LINE_LENGTH {
            report.add_warning(
                "max-line-length",
                &format!("Maximum line length {} is very low", settings.max_line_length),
            );
        } else if settings.max_line_length > MAX_REASONABLE_LINE_LENGTH {
            report.add_warning(
                "max-line-length",
                &format!("Maximum line length {} is very high", settings.max_line_length),
            );
        }

        if settings.max_doc_length == Some(0) {
            report.add_error("max-doc-length", "Maximum doc length cannot be 0");
        }
    }

    fn validate_codes(settings: &LintSettings, report: &mut ValidationReport) {
        let lists = [
            ("ignore", &settings.ignore),
            ("extend-ignore", &settings.extend_ignore),
            ("select", &settings.select),
            ("extend-select", &settings.extend_select),
        ];
        for (field, codes) in lists {
            Self::check_code_shapes(field, codes, report);
        }
    }

    fn validate_per_file_ignores(settings: &LintSettings, report: &mut ValidationReport) {
        for entry in settings.per_file_ignores.iter() {
            if entry.codes.is_empty() {
                report.add_warning(
                    "per-file-ignores",
                    &format!("Pattern '{}' lists no codes", entry.pattern),
                );
            }
            Self::check_code_shapes("per-file-ignores", &entry.codes, report);
        }
    }

    fn validate_selection_overlap(settings: &LintSettings, report: &mut ValidationReport) {
        let selected = settings.selected();
        let sources = [
            ("ignore", &settings.ignore),
            ("extend-ignore", &settings.extend_ignore),
        ];
        for (field, ignored) in sources {
            for code in selected.intersection(ignored).iter() {
                report.add_warning(field, &format!("Code {} is both selected and ignored", code));
            }
        }
    }

    fn check_code_shapes(field: &str, codes: &SuppressionSet, report: &mut ValidationReport) {
        for code in codes.iter().filter(|code| !code.is_well_formed()) {
            report.add_error(
                field,
                &format!(
                    "Error code '{}' does not match ^[A-Z]{{1,3}}[0-9]{{0,3}}$",
                    code
                ),
            );
        }
    }
}

/// Validation report containing errors and warnings
#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

/// A validation issue (error or warning)
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    pub field: String,
    pub message: String,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn add_error(&mut self, field: &str, message: &str) {
        self.errors.push(ValidationIssue {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    pub fn add_warning(&mut self, field: &str, message: &str) {
        self.warnings.push(ValidationIssue {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }

    pub fn summary(&self) -> String {
        format!("Validation: {} errors, {} warnings", self.errors.len(), self.warnings.len())
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}
