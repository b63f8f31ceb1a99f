use crossterm::style::{Color, Stylize};

use crate::ui::theme;

/// Text tagged with one of the theme's semantic colors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColoredText {
    text: String,
    color: Option<Color>,
    bold: bool,
}

impl ColoredText {
    fn styled(text: impl Into<String>, color: Option<Color>) -> Self {
        Self {
            text: text.into(),
            color,
            bold: false,
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::styled(text, Some(theme::colors::SUCCESS))
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::styled(text, Some(theme::colors::ERROR))
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::styled(text, Some(theme::colors::WARNING))
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::styled(text, Some(theme::colors::INFO))
    }

    pub fn dim(text: impl Into<String>) -> Self {
        Self::styled(text, Some(theme::colors::DIM))
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::styled(text, None)
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn render(&self, supports_color: bool) -> String {
        if !supports_color || (self.color.is_none() && !self.bold) {
            return self.text.clone();
        }

        let mut styled = self.text.as_str().stylize();
        if let Some(color) = self.color {
            styled = styled.with(color);
        }
        if self.bold {
            styled = styled.bold();
        }
        format!("{}", styled)
    }
}
