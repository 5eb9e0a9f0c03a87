//! Line range entry.

use crate::context::FlowConfig;
use crate::error::FlowError;

/// A validated, inclusive line range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    /// First line
    pub from: i64,
    /// Last line
    pub to: i64,
}

/// Validate raw `from`/`to` input.
///
/// Checks run in a fixed order and stop at the first failure: presence,
/// numeric, bounds, ordering. An out-of-range pair is therefore reported as
/// a bounds error even when it is also reversed.
pub fn validate_lines(from: &str, to: &str, config: &FlowConfig) -> Result<LineRange, FlowError> {
    let (from, to) = (from.trim(), to.trim());
    if from.is_empty() || to.is_empty() {
        return Err(FlowError::MissingLines);
    }

    let (Ok(from), Ok(to)) = (from.parse::<i64>(), to.parse::<i64>()) else {
        return Err(FlowError::NonNumericLines);
    };

    let bounds = config.line_min..=config.line_max;
    if !bounds.contains(&from) || !bounds.contains(&to) {
        return Err(FlowError::LinesOutOfRange {
            min: config.line_min,
            max: config.line_max,
        });
    }

    if from > to {
        return Err(FlowError::FromGreaterThanTo);
    }

    Ok(LineRange { from, to })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(from: &str, to: &str) -> Result<LineRange, FlowError> {
        validate_lines(from, to, &FlowConfig::default())
    }

    #[test]
    fn test_empty_fields() {
        assert_eq!(check("", "3"), Err(FlowError::MissingLines));
        assert_eq!(check("2", "   "), Err(FlowError::MissingLines));
    }

    #[test]
    fn test_non_numeric() {
        assert_eq!(check("a", "3"), Err(FlowError::NonNumericLines));
        assert_eq!(check("2", "3.5"), Err(FlowError::NonNumericLines));
        assert_eq!(check("5abc", "7"), Err(FlowError::NonNumericLines));
    }

    #[test]
    fn test_bounds_checked_before_order() {
        assert_eq!(
            check("25", "10"),
            Err(FlowError::LinesOutOfRange { min: 1, max: 20 })
        );
        assert_eq!(
            check("0", "5"),
            Err(FlowError::LinesOutOfRange { min: 1, max: 20 })
        );
    }

    #[test]
    fn test_from_greater_than_to() {
        assert_eq!(check("5", "3"), Err(FlowError::FromGreaterThanTo));
    }

    #[test]
    fn test_valid_ranges() {
        assert_eq!(check(" 1 ", "20"), Ok(LineRange { from: 1, to: 20 }));
        assert_eq!(check("7", "7"), Ok(LineRange { from: 7, to: 7 }));
    }
}
