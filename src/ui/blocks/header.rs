//! Run header: icon, title, then aligned `label  value` rows

use unicode_width::UnicodeWidthStr;

use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::ColoredText;

#[derive(Debug, Clone)]
pub struct CommandHeader {
    icon: Icon,
    title: String,
    fields: Vec<(&'static str, String)>,
}

impl CommandHeader {
    pub fn new(icon: Icon, title: impl Into<String>) -> Self {
        Self {
            icon,
            title: title.into(),
            fields: Vec::new(),
        }
    }

    /// Add a row; empty values are left out
    pub fn field(mut self, label: &'static str, value: impl Into<String>) -> Self {
        let value = value.into();
        if !value.trim().is_empty() {
            self.fields.push((label, value));
        }
        self
    }

    pub fn render(&self, supports_color: bool, supports_unicode: bool) -> String {
        let mut out = format!(
            "{} {}\n",
            self.icon.colored(supports_color, supports_unicode),
            ColoredText::info(self.title.as_str())
                .bold()
                .render(supports_color)
        );
        let label_width = self.fields.iter().map(|(l, _)| l.width()).max().unwrap_or(0);
        for (label, value) in &self.fields {
            let padded = format!("{:<width$}", label, width = label_width);
            out.push_str(&format!(
                "  {}  {}\n",
                ColoredText::dim(padded.as_str()).render(supports_color),
                value
            ));
        }
        out
    }
}
