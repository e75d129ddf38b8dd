//! Text rendering for run reports.

use super::{RunReport, Stage, StageOutcome};
use std::fmt::Write;

const RULE: &str =
    "======================================================================";

/// Print the report to stdout.
pub fn print_report(report: &RunReport) {
    print!("{}", render_text(report));
}

/// Render the report as the text shown at the end of a run.
pub fn render_text(report: &RunReport) -> String {
    let mut out = String::new();

    if report.succeeded() {
        render_success(report, &mut out);
    } else {
        render_failure(report, &mut out);
    }

    out
}

fn render_success(report: &RunReport, out: &mut String) {
    let url = report.remote_url.as_deref().unwrap_or("(unknown)");

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "SUCCESS! Project published");
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out);
    let _ = writeln!(out, "Repository URL: {}", url);
    let _ = writeln!(
        out,
        "Branch:         {} (tracking {}/{})",
        report.branch, report.remote, report.branch
    );

    render_warnings(report, out);

    let _ = writeln!(out);
    let _ = writeln!(out, "Next steps:");
    let steps = [
        "Open the repository page and check that your files arrived".to_string(),
        "Add a description, topics and a license on the hosting page".to_string(),
        "Enable discussions or create issue templates".to_string(),
        "Invite collaborators".to_string(),
        format!(
            "Publish later changes with: git add -A && git commit && git push ({} is already upstream)",
            report.branch
        ),
    ];
    for (i, step) in steps.iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", i + 1, step);
    }
}

fn render_failure(report: &RunReport, out: &mut String) {
    let Some(failure) = report.failure() else {
        return;
    };

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", RULE);
    match failure.error {
        Some(kind) => {
            let _ = writeln!(
                out,
                "FAILED at stage '{}' ({})",
                failure.stage, kind
            );
        }
        None => {
            let _ = writeln!(out, "FAILED at stage '{}'", failure.stage);
        }
    }
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out);

    if let Some(code) = failure.exit_code {
        let _ = writeln!(out, "git exited with code {}", code);
    }
    for line in failure.diagnostic.lines() {
        let _ = writeln!(out, "  {}", line);
    }

    render_warnings(report, out);

    if !failure.remediation.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Troubleshooting:");
        for (i, hint) in failure.remediation.iter().enumerate() {
            let _ = writeln!(out, "  {}. {}", i + 1, hint);
        }
    }
}

fn render_warnings(report: &RunReport, out: &mut String) {
    let up_to_date = report
        .stage(Stage::Push)
        .filter(|r| r.outcome == StageOutcome::Unchanged);

    let notes: Vec<String> = report
        .soft_failures()
        .map(|r| {
            let kind = r.error.map(|k| k.to_string()).unwrap_or_default();
            format!("{}: {} - {}", r.stage, kind, r.diagnostic)
        })
        .chain(up_to_date.map(|r| format!("{}: nothing new to push ({})", r.stage, r.diagnostic)))
        .collect();

    if notes.is_empty() {
        return;
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Warnings:");
    for note in notes {
        let _ = writeln!(out, "  - {}", note);
    }
}
