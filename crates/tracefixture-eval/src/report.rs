use crate::model::IntegrityReport;

/// Render a deterministic markdown summary of an integrity report.
pub fn render_report(report: &IntegrityReport, max_examples: usize) -> String {
    let mut lines = Vec::new();

    lines.push("# Fixture Integrity Report".to_string());
    lines.push(String::new());
    lines.push(format!("- dataset: {}", report.dataset_dir.display()));
    lines.push(format!("- report_version: {}", report.report_version));
    lines.push(String::new());

    lines.push("## Tables".to_string());
    lines.push("| file | present | rows | distinct_ids |".to_string());
    lines.push("| --- | --- | --- | --- |".to_string());
    for table in &report.tables {
        let (rows, ids) = if table.present {
            (table.rows.to_string(), table.distinct_ids.to_string())
        } else {
            ("-".to_string(), "-".to_string())
        };
        lines.push(format!(
            "| {} | {} | {} | {} |",
            table.table.file_name(),
            if table.present { "yes" } else { "no" },
            rows,
            ids
        ));
    }
    lines.push(String::new());

    if report.is_clean() {
        lines.push("No violations found.".to_string());
        return lines.join("\n");
    }

    lines.push("## Violations by code".to_string());
    for (code, count) in &report.violations_by_code {
        lines.push(format!("- {code}: {count}"));
    }
    lines.push(String::new());

    lines.push("## Top violations".to_string());
    for violation in report.violations.iter().take(max_examples) {
        let row = violation
            .row_index
            .map(|row| format!(" row {row}"))
            .unwrap_or_default();
        lines.push(format!(
            "- [{}] {}{}: {}",
            violation.code,
            violation.table.file_name(),
            row,
            violation.message
        ));
    }
    if report.violations.len() > max_examples {
        lines.push(format!(
            "- ... {} more",
            report.violations.len() - max_examples
        ));
    }
    lines.join("\n")
}
