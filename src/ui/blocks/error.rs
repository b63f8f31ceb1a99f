use std::path::PathBuf;

use crate::ui::primitives::text::ColoredText;
use crate::ui::widgets::r#box::{Box, BoxStyle};

#[derive(Debug, Clone)]
pub struct ErrorBlock {
    title: String,
    file: Option<PathBuf>,
    message: String,
    fix: Option<String>,
}

impl ErrorBlock {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            file: None,
            message: message.into(),
            fix: None,
        }
    }

    pub fn with_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn with_fix(mut self, fix: impl Into<String>) -> Self {
        self.fix = Some(fix.into());
        self
    }

    pub fn render(&self, supports_color: bool, supports_unicode: bool) -> String {
        let title = ColoredText::error(format!("ERROR: {}", self.title))
            .bold()
            .render(supports_color);
        let mut b = Box::with_title(title).style(BoxStyle::Error);

        if let Some(file) = &self.file {
            b.add_line(file.display().to_string());
        }
        b.add_empty();
        b.add_line(self.message.clone());

        if let Some(fix) = &self.fix {
            b.add_empty();
            b.add_line(format!("FIX: {}", fix));
        }

        b.render(supports_color, supports_unicode)
    }
}
