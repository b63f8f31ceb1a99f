use rollout::DeployReport;

use crate::ui::blocks::summary::ResultSummary;

pub fn render_deploy_summary(
    report: &DeployReport,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    let mut summary = if report.has_warnings() {
        ResultSummary::partial("Deploy Complete With Warnings")
    } else {
        ResultSummary::success("Deploy Complete")
    };

    summary.add_stat("URL", report.url.as_str());
    summary.add_stat("Transfer", report.strategy.name());
    summary.add_stat(
        "Dependencies",
        if report.installed {
            "installed on host"
        } else {
            "unchanged, install skipped"
        },
    );
    if let Some(fingerprint) = &report.fingerprint {
        summary.add_stat("Lock fingerprint", fingerprint.short());
    }
    summary.add_stat("Elapsed", format_elapsed(report.elapsed.as_millis()));

    for failure in &report.post_command_failures {
        summary.add_warning(format!("post-deploy command failed: {}", failure));
    }
    summary.with_next_step("rollout ps  (or rollout logs) to check the app");

    summary.render(supports_color, supports_unicode)
}

fn format_elapsed(ms: u128) -> String {
    if ms < 1_000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.1}s", ms as f64 / 1_000.0)
    } else {
        format!("{}m {}s", ms / 60_000, (ms % 60_000) / 1_000)
    }
}
