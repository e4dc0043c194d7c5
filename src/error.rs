use thiserror::Error;

/// Failures raised by the normalizer and classifier.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("column '{column}' (mapped as {role}) is not present in the input")]
    Schema { column: String, role: &'static str },

    #[error("grand total value is zero; value shares are undefined")]
    DivisionByZero,

    #[error("grand total value {total} is not a finite number; value shares are undefined")]
    NonFiniteTotal { total: f64 },

    #[error("row {row}: column '{column}' holds '{raw}', which is not a number")]
    InvalidNumber {
        row: usize,
        column: String,
        raw: String,
    },

    #[error("tier thresholds {a}/{b}/{c} must be non-negative and sum to 100")]
    InvalidThresholds { a: f64, b: f64, c: f64 },
}

impl AnalysisError {
    /// Short remediation hint shown under the error message.
    pub fn hint(&self) -> &'static str {
        match self {
            AnalysisError::Schema { .. } => {
                "check the [columns] mapping in your config or pass --item-col/--qty-col/--value-col"
            }
            AnalysisError::DivisionByZero => {
                "the input has no line items with a non-zero value after cleaning"
            }
            AnalysisError::NonFiniteTotal { .. } => {
                "line values are too large to sum; check the value column for corrupt cells"
            }
            AnalysisError::InvalidNumber { .. } => "fix the cell in the input file and re-run",
            AnalysisError::InvalidThresholds { .. } => "use thresholds such as 80/15/5",
        }
    }
}
