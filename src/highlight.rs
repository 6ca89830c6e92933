use inksac::prelude::*;

#[derive(Debug, Clone, Copy)]
pub struct SyntaxHighlighter {
    color_support: ColorSupport,
}

impl SyntaxHighlighter {
    /// `enabled = false` forces plain output regardless of the terminal.
    pub fn new(enabled: bool) -> Self {
        let support = if enabled {
            check_color_support().unwrap_or(ColorSupport::NoColor)
        } else {
            ColorSupport::NoColor
        };
        Self {
            color_support: support,
        }
    }

    pub fn is_plain(&self) -> bool {
        matches!(self.color_support, ColorSupport::NoColor)
    }

    pub fn highlight_error(&self, error: &str) -> String {
        if self.is_plain() {
            return error.to_string();
        }

        let error_style = Style::builder().foreground(Color::Red).bold().build();

        error.style(error_style).to_string()
    }

    pub fn highlight_hint(&self, hint: &str) -> String {
        if self.is_plain() {
            return hint.to_string();
        }

        let hint_style = Style::builder()
            .foreground(Color::RGB(128, 128, 128))
            .build();

        hint.style(hint_style).to_string()
    }
}
