use super::record::MarkRecord;
use std::path::Path;

const MARK_COLUMN_HINTS: [&str; 2] = ["mark", "score"];

pub(crate) fn normalize_header(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    cleaned.trim().to_string()
}

/// Picks the first column whose name mentions a mark or score, otherwise the first column.
pub(crate) fn resolve_mark_column(first_row: &MarkRecord) -> Option<&str> {
    let mut columns = first_row.columns().peekable();
    let fallback = *columns.peek()?;

    Some(
        columns
            .find(|column| {
                let lowered = column.to_lowercase();
                MARK_COLUMN_HINTS.iter().any(|hint| lowered.contains(hint))
            })
            .unwrap_or(fallback),
    )
}

/// `"uploads/Maths-III.xlsx"` becomes `"Maths-III"`. The stem is kept verbatim since subjects
/// are matched by exact name.
pub fn subject_label_from_file_name(file_name: &str) -> String {
    let base = Path::new(file_name)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(file_name);
    base.split('.').next().unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_mark_or_score_columns() {
        let row = MarkRecord::new()
            .with("Roll", "17")
            .with("Name", "Asha")
            .with("Total Marks", 71.0);
        assert_eq!(resolve_mark_column(&row), Some("Total Marks"));

        let row = MarkRecord::new().with("USN", "1CS19").with("SCORE", 40.0);
        assert_eq!(resolve_mark_column(&row), Some("SCORE"));
    }

    #[test]
    fn first_matching_column_wins() {
        let row = MarkRecord::new()
            .with("Internal Score", 20.0)
            .with("Marks", 60.0);
        assert_eq!(resolve_mark_column(&row), Some("Internal Score"));
    }

    #[test]
    fn falls_back_to_first_column() {
        let row = MarkRecord::new().with("Result", 55.0).with("Name", "Ravi");
        assert_eq!(resolve_mark_column(&row), Some("Result"));
        assert_eq!(resolve_mark_column(&MarkRecord::new()), None);
    }

    #[test]
    fn subject_label_strips_extension_and_directories() {
        assert_eq!(subject_label_from_file_name("Maths.xlsx"), "Maths");
        assert_eq!(
            subject_label_from_file_name("uploads/Data Structures.v2.csv"),
            "Data Structures"
        );
        assert_eq!(subject_label_from_file_name("COA"), "COA");
        assert_eq!(subject_label_from_file_name(".csv"), "");
    }

    #[test]
    fn subject_label_keeps_inner_whitespace() {
        assert_eq!(
            subject_label_from_file_name("Data  Structures.csv"),
            "Data  Structures"
        );
        assert_eq!(subject_label_from_file_name(" COA .csv"), " COA ");
    }

    #[test]
    fn header_normalization_drops_bom() {
        assert_eq!(normalize_header("\u{feff} Marks "), "Marks");
    }
}
