use inksac::prelude::*;

#[derive(Debug, Clone, Copy)]
pub struct OutputStyler {
    color_support: ColorSupport,
}

impl Default for OutputStyler {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputStyler {
    pub fn new() -> Self {
        let support = check_color_support().unwrap_or(ColorSupport::NoColor);
        Self {
            color_support: support,
        }
    }

    pub fn prompt(&self, prompt: &str) -> String {
        if matches!(self.color_support, ColorSupport::NoColor) {
            return prompt.to_string();
        }

        let prompt_style = Style::builder()
            .foreground(Color::Green)
            .bold()
            .build();

        prompt.to_string().style(prompt_style).to_string()
    }

    pub fn error(&self, error: &str) -> String {
        if matches!(self.color_support, ColorSupport::NoColor) {
            return error.to_string();
        }

        let error_style = Style::builder()
            .foreground(Color::Red)
            .bold()
            .build();

        error.to_string().style(error_style).to_string()
    }
}
