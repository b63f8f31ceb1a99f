use crossterm::style::Stylize;
use unicode_width::UnicodeWidthStr;

use rollout::domain::services::ansi::sanitize;

use crate::ui::primitives::border::BorderSet;
use crate::ui::theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoxStyle {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Default, Clone)]
pub struct Box {
    title: Option<String>,
    content: Vec<String>,
    style: BoxStyle,
}

impl Box {
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn style(mut self, style: BoxStyle) -> Self {
        self.style = style;
        self
    }

    pub fn add_line(&mut self, line: impl Into<String>) {
        let line = line.into();
        for part in line.lines() {
            self.content.push(part.to_string());
        }
    }

    pub fn add_empty(&mut self) {
        self.content.push(String::new());
    }

    pub fn render(&self, supports_color: bool, supports_unicode: bool) -> String {
        let mut lines = Vec::new();
        if let Some(title) = &self.title {
            lines.push(title.clone());
        }
        lines.extend(self.content.iter().cloned());

        let inner_width = lines
            .iter()
            .map(|l| visible_width(l))
            .max()
            .unwrap_or(0)
            .saturating_add(2)
            .max(2);

        let borders = BorderSet::new(supports_unicode);
        let v = borders.vertical;

        let mut out = String::new();
        out.push_str(&color_border(&borders.top(inner_width), supports_color, self.style));
        out.push('\n');

        for line in &lines {
            let w = visible_width(line);
            out.push_str(&color_border(v, supports_color, self.style));
            out.push(' ');
            out.push_str(line);
            out.push_str(&" ".repeat(inner_width.saturating_sub(1).saturating_sub(w)));
            out.push_str(&color_border(v, supports_color, self.style));
            out.push('\n');
        }

        out.push_str(&color_border(
            &borders.bottom(inner_width),
            supports_color,
            self.style,
        ));
        out.push('\n');
        out
    }
}

fn color_border(s: &str, supports_color: bool, style: BoxStyle) -> String {
    if !supports_color {
        return s.to_string();
    }

    let color = match style {
        BoxStyle::Info => theme::colors::INFO,
        BoxStyle::Success => theme::colors::SUCCESS,
        BoxStyle::Warning => theme::colors::WARNING,
        BoxStyle::Error => theme::colors::ERROR,
    };
    format!("{}", s.with(color))
}

/// Display width with styling escapes removed
fn visible_width(s: &str) -> usize {
    sanitize(s).width()
}
