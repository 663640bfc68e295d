//! Output styles using owo-colors stylesheet pattern

use owo_colors::Style;

/// Centralized stylesheet for CLI output colors.
#[derive(Default, Clone)]
pub struct Styles {
    /// Success messages (green)
    pub success: Style,
    /// Warning messages (yellow)
    pub warning: Style,
    /// Error messages (red)
    pub error: Style,
    /// Info messages (blue)
    pub info: Style,
    /// Dimmed/secondary text
    pub dim: Style,
    /// Bold text
    pub bold: Style,
    /// Headers/section titles
    pub header: Style,
    /// Core layer label
    pub core: Style,
    /// Org layer label
    pub org: Style,
    /// Custom layer label
    pub custom: Style,
}

impl Styles {
    /// Apply colors to the stylesheet.
    pub fn colorize(&mut self) {
        self.success = Style::new().green();
        self.warning = Style::new().yellow();
        self.error = Style::new().red();
        self.info = Style::new().blue();
        self.dim = Style::new().dimmed();
        self.bold = Style::new().bold();
        self.header = Style::new().bold().cyan();
        self.core = Style::new().truecolor(37, 56, 144);
        self.org = Style::new().truecolor(26, 107, 160);
        self.custom = Style::new().truecolor(26, 151, 179);
    }

    /// Style for a layer label.
    #[must_use]
    pub fn layer(&self, layer: crate::domain::Layer) -> Style {
        match layer {
            crate::domain::Layer::Core => self.core,
            crate::domain::Layer::Org => self.org,
            crate::domain::Layer::Custom => self.custom,
        }
    }
}
