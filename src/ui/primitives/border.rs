//! Box-drawing glyphs for framed output

use crate::ui::theme;

/// Frame glyphs for one terminal capability level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderSet {
    top_left: &'static str,
    top_right: &'static str,
    bottom_left: &'static str,
    bottom_right: &'static str,
    horizontal: &'static str,
    pub vertical: &'static str,
}

impl BorderSet {
    /// Rounded glyphs on unicode terminals, `+-|` elsewhere
    pub fn new(supports_unicode: bool) -> Self {
        if supports_unicode {
            Self {
                top_left: theme::borders::TOP_LEFT,
                top_right: theme::borders::TOP_RIGHT,
                bottom_left: theme::borders::BOTTOM_LEFT,
                bottom_right: theme::borders::BOTTOM_RIGHT,
                horizontal: theme::borders::HORIZONTAL,
                vertical: theme::borders::VERTICAL,
            }
        } else {
            Self {
                top_left: theme::borders_ascii::TOP_LEFT,
                top_right: theme::borders_ascii::TOP_RIGHT,
                bottom_left: theme::borders_ascii::BOTTOM_LEFT,
                bottom_right: theme::borders_ascii::BOTTOM_RIGHT,
                horizontal: theme::borders_ascii::HORIZONTAL,
                vertical: theme::borders_ascii::VERTICAL,
            }
        }
    }

    /// Top edge spanning `inner` columns
    pub fn top(&self, inner: usize) -> String {
        self.edge(self.top_left, self.top_right, inner)
    }

    /// Bottom edge spanning `inner` columns
    pub fn bottom(&self, inner: usize) -> String {
        self.edge(self.bottom_left, self.bottom_right, inner)
    }

    fn edge(&self, left: &str, right: &str, inner: usize) -> String {
        format!("{}{}{}", left, self.horizontal.repeat(inner), right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_edges() {
        let set = BorderSet::new(false);
        assert_eq!(set.top(3), "+---+");
        assert_eq!(set.bottom(0), "++");
        assert_eq!(set.vertical, "|");
    }

    #[test]
    fn unicode_edges_are_rounded() {
        let set = BorderSet::new(true);
        assert_eq!(set.top(1), "╭─╮");
        assert_eq!(set.bottom(1), "╰─╯");
    }
}
