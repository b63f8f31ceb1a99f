use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::ColoredText;
use crate::ui::widgets::r#box::{Box, BoxStyle};

#[derive(Debug, Clone)]
pub struct ResultSummary {
    title: String,
    success: bool,
    stats: Vec<(String, String)>,
    warnings: Vec<String>,
    next_step: Option<String>,
}

impl ResultSummary {
    pub fn success(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            success: true,
            stats: Vec::new(),
            warnings: Vec::new(),
            next_step: None,
        }
    }

    pub fn partial(title: impl Into<String>) -> Self {
        Self {
            success: false,
            ..Self::success(title)
        }
    }

    pub fn add_stat(&mut self, label: impl Into<String>, value: impl Into<String>) {
        self.stats.push((label.into(), value.into()));
    }

    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn with_next_step(&mut self, hint: impl Into<String>) {
        self.next_step = Some(hint.into());
    }

    pub fn render(&self, supports_color: bool, supports_unicode: bool) -> String {
        let (style, icon) = if self.success {
            (BoxStyle::Success, Icon::Success)
        } else {
            (BoxStyle::Warning, Icon::Warning)
        };

        let title = if self.success {
            ColoredText::success(self.title.as_str())
        } else {
            ColoredText::warning(self.title.as_str())
        }
        .bold()
        .render(supports_color);

        let header = format!(
            "{} {}",
            icon.colored(supports_color, supports_unicode),
            title
        );

        let mut b = Box::with_title(header).style(style);
        b.add_empty();

        for (label, value) in &self.stats {
            b.add_line(format!(
                "{} {}",
                ColoredText::dim(format!("{}:", label)).render(supports_color),
                value
            ));
        }

        if !self.warnings.is_empty() {
            b.add_empty();
            for warning in &self.warnings {
                b.add_line(format!(
                    "{} {}",
                    Icon::Warning.colored(supports_color, supports_unicode),
                    warning
                ));
            }
        }

        if let Some(next_step) = &self.next_step {
            b.add_empty();
            b.add_line(format!(
                "{} {} {}",
                Icon::Arrow.colored(supports_color, supports_unicode),
                ColoredText::dim("Next:").render(supports_color),
                next_step
            ));
        }

        b.render(supports_color, supports_unicode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_success_icon_in_title() {
        let mut summary = ResultSummary::success("Deploy Complete");
        summary.add_stat("URL", "http://example.com:3000");

        let rendered = summary.render(false, false);
        assert!(rendered.contains("[OK] Deploy Complete"));
        assert!(rendered.contains("URL: http://example.com:3000"));
    }

    #[test]
    fn partial_summary_lists_warnings() {
        let mut summary = ResultSummary::partial("Deploy Complete With Warnings");
        summary.add_warning("post-deploy command failed: curl -fsS localhost");

        let rendered = summary.render(false, false);
        assert!(rendered.contains("[WARN] Deploy Complete With Warnings"));
        assert!(rendered.contains("[WARN] post-deploy command failed"));
    }
}
