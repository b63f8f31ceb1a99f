use rollout::application::ProcessInfo;

use crate::ui::primitives::text::ColoredText;

const HEADERS: [&str; 5] = ["ID", "NAME", "STATUS", "CPU", "MEMORY"];

pub fn render_process_table(processes: &[ProcessInfo], supports_color: bool) -> String {
    if processes.is_empty() {
        return format!(
            "{}\n",
            ColoredText::dim("No processes are managed by pm2 on this host.").render(supports_color)
        );
    }

    let rows: Vec<[String; 5]> = processes
        .iter()
        .map(|p| {
            [
                p.id.to_string(),
                p.name.clone(),
                p.status.clone(),
                format!("{:.1}%", p.cpu),
                format_bytes(p.memory),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header: Vec<String> = HEADERS
        .iter()
        .zip(widths)
        .map(|(h, w)| format!("{:<w$}", h, w = w))
        .collect();
    out.push_str(
        &ColoredText::plain(header.join("  ").trim_end())
            .bold()
            .render(supports_color),
    );
    out.push('\n');

    for (row, process) in rows.iter().zip(processes) {
        let cells: Vec<String> = row
            .iter()
            .zip(widths)
            .enumerate()
            .map(|(i, (cell, w))| {
                let padded = format!("{:<w$}", cell, w = w);
                if i == 2 {
                    status_text(&process.status, padded).render(supports_color)
                } else {
                    padded
                }
            })
            .collect();
        out.push_str(cells.join("  ").trim_end());
        out.push('\n');
    }
    out
}

fn status_text(status: &str, padded: String) -> ColoredText {
    match status {
        "online" => ColoredText::success(padded),
        "stopped" | "stopping" => ColoredText::warning(padded),
        "errored" => ColoredText::error(padded),
        _ => ColoredText::plain(padded),
    }
}

fn format_bytes(bytes: u64) -> String {
    const MB: f64 = 1024.0 * 1024.0;
    if bytes == 0 {
        return "0".to_string();
    }
    format!("{:.1}mb", bytes as f64 / MB)
}
