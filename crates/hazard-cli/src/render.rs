//! Plain-text rendering of verified reports.

use hazard_domain::VerifiedReport;

/// Sidebar-style heading
pub fn summary_heading(count: usize) -> String {
    if count == 0 {
        "No verified reports to display.".to_string()
    } else {
        format!("{count} verified reports in your area")
    }
}

/// One line per report
pub fn report_line(report: &VerifiedReport) -> String {
    let reported = report
        .created_at
        .map(|at| at.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "----------".to_string());
    format!(
        "{reported}  [{:<8}] [{:<9}] ({})  {}",
        report.priority_label(),
        report.status_label(),
        report.position(),
        report.description
    )
}
