use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::ColoredText;

/// Single-line warning, e.g. an unknown config key
#[derive(Debug, Clone)]
pub struct WarningLine {
    message: String,
    hint: Option<String>,
}

impl WarningLine {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn render(&self, supports_color: bool, supports_unicode: bool) -> String {
        let mut out = format!(
            "{} {}\n",
            Icon::Warning.colored(supports_color, supports_unicode),
            ColoredText::warning(self.message.as_str()).render(supports_color)
        );
        if let Some(hint) = &self.hint {
            out.push_str(&format!(
                "  {} {}\n",
                Icon::Arrow.colored(supports_color, supports_unicode),
                ColoredText::dim(hint.as_str()).render(supports_color)
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_hint_on_second_line() {
        let rendered = WarningLine::new("unknown key 'timout'")
            .with_hint("did you mean 'timeout'?")
            .render(false, false);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "[WARN] unknown key 'timout'");
        assert_eq!(lines[1], "  [>] did you mean 'timeout'?");
    }
}
