//! Light and dark colour schemes.

use crate::domain::Theme;

/// 24-bit colour. Hosts convert this into their own colour types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(0xff, 0xff, 0xff);

    pub fn hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    /// Page background behind the card.
    pub page: Rgb,
    /// Card / chart background.
    pub card: Rgb,
    pub text: Rgb,
    pub bar: Rgb,
    pub hover: Rgb,
    /// Outline drawn around the hovered bar.
    pub hover_stroke: Rgb,
    pub axis: Rgb,
    pub grid: Rgb,
    pub grid_opacity: f64,
    pub button: Rgb,
    pub button_text: Rgb,
    pub active_button: Rgb,
    pub active_button_text: Rgb,
    pub tooltip_bg: Rgb,
    pub tooltip_border: Rgb,
    pub spinner: Rgb,
    pub error_bg: Rgb,
    pub error_border: Rgb,
    pub error_text: Rgb,
    pub retry_button: Rgb,
}

impl Palette {
    pub fn light() -> Self {
        Self {
            page: Rgb(0xff, 0xff, 0xff),
            card: Rgb(0xff, 0xff, 0xff),
            text: Rgb(0x1f, 0x29, 0x37),
            bar: Rgb(0x46, 0x82, 0xb4), // steelblue
            hover: Rgb(0xff, 0xa5, 0x00), // orange
            hover_stroke: Rgb::WHITE,
            axis: Rgb(0x37, 0x41, 0x51),
            grid: Rgb(0xe5, 0xe7, 0xeb),
            grid_opacity: 0.3,
            button: Rgb(0xe5, 0xe7, 0xeb),
            button_text: Rgb(0x1f, 0x29, 0x37),
            active_button: Rgb(0x3b, 0x82, 0xf6),
            active_button_text: Rgb::WHITE,
            tooltip_bg: Rgb(0xff, 0xff, 0xff),
            tooltip_border: Rgb(0xe5, 0xe7, 0xeb),
            spinner: Rgb(0x3b, 0x82, 0xf6),
            error_bg: Rgb(0xfe, 0xe2, 0xe2),
            error_border: Rgb(0xf8, 0x71, 0x71),
            error_text: Rgb(0xb9, 0x1c, 0x1c),
            retry_button: Rgb(0xef, 0x44, 0x44),
        }
    }

    pub fn dark() -> Self {
        Self {
            page: Rgb(0x11, 0x18, 0x27),
            card: Rgb(0x1f, 0x29, 0x37),
            text: Rgb(0xf3, 0xf4, 0xf6),
            bar: Rgb(0x4f, 0x46, 0xe5),
            hover: Rgb(0xf5, 0x9e, 0x0b),
            axis: Rgb(0xf3, 0xf4, 0xf6),
            grid: Rgb(0x4b, 0x55, 0x63),
            button: Rgb(0x37, 0x41, 0x51),
            button_text: Rgb(0xe5, 0xe7, 0xeb),
            active_button: Rgb(0x25, 0x63, 0xeb),
            tooltip_bg: Rgb(0x1f, 0x29, 0x37),
            tooltip_border: Rgb(0x37, 0x41, 0x51),
            ..Self::light()
        }
    }

    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self::light(),
            Theme::Dark => Self::dark(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_formatting() {
        assert_eq!(Palette::light().bar.hex(), "#4682b4");
        assert_eq!(Palette::dark().hover.hex(), "#f59e0b");
    }

    #[test]
    fn themes_differ_only_in_colours() {
        let light = Palette::for_theme(Theme::Light);
        let dark = Palette::for_theme(Theme::Dark);
        assert_ne!(light.bar, dark.bar);
        assert_eq!(light.grid_opacity, dark.grid_opacity);
        assert_eq!(dark.error_bg, light.error_bg);
    }
}
