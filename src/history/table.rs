use crate::common::constants::HISTORY_COLUMNS;
use crate::common::UtmRecord;

/// Renders records as a plain-text table with a header row.
pub fn render_table(records: &[UtmRecord]) -> String {
    let rows: Vec<Vec<String>> = records.iter().map(UtmRecord::to_row).collect();

    let mut widths: Vec<usize> = HISTORY_COLUMNS.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let format_line = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(format_line(HISTORY_COLUMNS.to_vec()));
    lines.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    for row in &rows {
        lines.push(format_line(row.iter().map(String::as_str).collect()));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::UtmParams;

    #[test]
    fn test_render_empty_has_header() {
        let table = render_table(&[]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("base_url | source | medium"));
        assert!(lines[0].ends_with("generated_link"));
    }

    #[test]
    fn test_render_pads_columns() {
        let record = UtmRecord::new(
            "https://example.com/".to_string(),
            UtmParams {
                source: "newsletter".to_string(),
                medium: "email".to_string(),
                campaign: "promo".to_string(),
                ..Default::default()
            },
        );
        let table = render_table(&[record.clone()]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("base_url             | source     |"));
        assert!(lines[2].starts_with("https://example.com/ | newsletter |"));
        assert!(lines[2].ends_with(&record.generated_link));
    }
}
