//! Terminal output utilities.
//!
//! Provides formatting helpers for terminal output.

/// Width of the left-hand label column of the report.
pub const LABEL_WIDTH: usize = 13;

/// Format a `Label = value` report line with the label padded to [`LABEL_WIDTH`].
///
/// # Arguments
/// * `label` - The field label
/// * `value` - The value to print after the `=`
pub fn format_field<T: ToString>(label: &str, value: T) -> String {
    let value_str = value.to_string();
    format!("{label:<width$} = {value_str}", width = LABEL_WIDTH)
}

/// Indentation that lines continuation rows up with the values of [`format_field`],
/// plus a few columns so the binary dump stands out.
pub fn continuation_indent() -> String {
    " ".repeat(LABEL_WIDTH + 6)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_field_short() {
        assert_eq!(format_field("Address", "10.0.0.1"), "Address       = 10.0.0.1");
    }

    #[test]
    fn test_format_field_exact() {
        assert_eq!(format_field("Wildcard Mask", "0.0.0.255"), "Wildcard Mask = 0.0.0.255");
    }

    #[test]
    fn test_format_field_long() {
        assert_eq!(format_field("A very long label", 1), "A very long label = 1");
    }

    #[test]
    fn test_format_field_number() {
        assert_eq!(format_field("Hosts Bits", 8), "Hosts Bits    = 8");
    }

    #[test]
    fn test_continuation_indent() {
        assert_eq!(continuation_indent().len(), 19);
    }
}
