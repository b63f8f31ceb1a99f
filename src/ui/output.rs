use rollout::config::ConfigWarning;

use crate::ui::blocks::warning::WarningLine;
use crate::ui::context::UiContext;

pub fn print_config_warnings(ui: &UiContext, warnings: &[ConfigWarning]) {
    if ui.json {
        return;
    }
    for w in warnings {
        eprint!("{}", render_config_warning(w, ui.color, ui.unicode));
    }
}

fn render_config_warning(w: &ConfigWarning, supports_color: bool, supports_unicode: bool) -> String {
    let location = match w.line {
        Some(line) => format!("{}:{}", w.file.display(), line),
        None => w.file.display().to_string(),
    };
    let mut line = WarningLine::new(format!("Unknown config key '{}' in {}", w.key, location));
    if let Some(suggestion) = &w.suggestion {
        line = line.with_hint(format!("Did you mean '{}'?", suggestion));
    }
    line.render(supports_color, supports_unicode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn warning_includes_location_and_suggestion() {
        let w = ConfigWarning {
            key: "connection.timout_secs".to_string(),
            file: PathBuf::from(".rollout/config.toml"),
            line: Some(3),
            suggestion: Some("timeout_secs".to_string()),
        };
        let rendered = render_config_warning(&w, false, false);
        assert!(rendered.contains("'connection.timout_secs' in .rollout/config.toml:3"));
        assert!(rendered.contains("Did you mean 'timeout_secs'?"));
    }
}
