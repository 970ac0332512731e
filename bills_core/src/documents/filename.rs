//! Upload filename sanitization

/// Reduces a client-supplied filename to a bare name safe to store and echo
/// back in download headers.
///
/// Directory separators and traversal segments are stripped rather than
/// rejected. A name with nothing usable left after cleaning becomes
/// `"unnamed"` so the upload still succeeds.
pub fn sanitize_file_name(raw: &str) -> String {
    let cleaned: String = raw.chars().filter(|c| *c != '\0').collect();

    let name = cleaned
        .split(['/', '\\'])
        .filter(|segment| !segment.is_empty() && *segment != "." && *segment != "..")
        .last()
        .unwrap_or("");

    if name.is_empty() {
        "unnamed".to_string()
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_name_unchanged() {
        assert_eq!(sanitize_file_name("invoice.pdf"), "invoice.pdf");
        assert_eq!(sanitize_file_name("Rechnung 2024-01.xlsx"), "Rechnung 2024-01.xlsx");
    }

    #[test]
    fn test_traversal_segments_stripped() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("..\\..\\share\\bill.xls"), "bill.xls");
        assert_eq!(sanitize_file_name("uploads/2024/invoice.pdf"), "invoice.pdf");
        assert_eq!(sanitize_file_name("C:\\Users\\chef\\bill.pdf"), "bill.pdf");
    }

    #[test]
    fn test_trailing_separator_keeps_last_segment() {
        assert_eq!(sanitize_file_name("reports/"), "reports");
    }

    #[test]
    fn test_nul_bytes_removed() {
        assert_eq!(sanitize_file_name("inv\0oice.pdf"), "invoice.pdf");
    }

    #[test]
    fn test_degenerate_names_fall_back() {
        assert_eq!(sanitize_file_name(""), "unnamed");
        assert_eq!(sanitize_file_name("/"), "unnamed");
        assert_eq!(sanitize_file_name("../.."), "unnamed");
        assert_eq!(sanitize_file_name("."), "unnamed");
        assert_eq!(sanitize_file_name("\0"), "unnamed");
    }
}
