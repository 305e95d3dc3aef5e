//! Plotters-powered scene renderer for Ratatui.
//!
//! The scene is already laid out in canvas pixels, so the Plotters chart just
//! uses the canvas as its coordinate system (flipping y, since Plotters grows
//! upwards). Text is drawn separately on the Ratatui buffer, where terminal
//! cells give crisper labels than Plotters' glyph approximation.
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use plotters::prelude::*;
// The ratatui `Color` import below shadows the prelude's trait of the same name.
use plotters::style::Color as _;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::chart::{Rgb, Scene};

/// Render-only view of a scene; all geometry is computed before `render()`.
pub struct ScenePlottersChart<'a> {
    pub scene: &'a Scene,
    /// Dataset index of the hovered bar.
    pub hovered: Option<usize>,
}

fn rgb(c: Rgb) -> RGBColor {
    RGBColor(c.0, c.1, c.2)
}

impl<'a> Widget for ScenePlottersChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a chart.
        // In that case, we render a small hint rather than panicking.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let w = self.scene.dimensions.width;
        let h = self.scene.dimensions.height;
        if !(w.is_finite() && h.is_finite()) || w <= 0.0 || h <= 0.0 {
            return;
        }

        let scene = self.scene;
        let hovered = self.hovered;
        let flip = move |y: f64| h - y;

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(0)
                .build_cartesian_2d(0.0..w, 0.0..h)?;

            chart.draw_series(scene.grid.iter().map(|l| {
                PathElement::new(
                    vec![(l.x1, flip(l.y1)), (l.x2, flip(l.y2))],
                    rgb(l.color).mix(l.opacity).stroke_width(1),
                )
            }))?;

            chart.draw_series(scene.axis_lines.iter().map(|l| {
                PathElement::new(
                    vec![(l.x1, flip(l.y1)), (l.x2, flip(l.y2))],
                    rgb(l.color).stroke_width(1),
                )
            }))?;

            chart.draw_series(scene.bars.iter().map(|b| {
                let fill = if hovered == Some(b.index) {
                    b.hover_fill
                } else {
                    b.fill
                };
                Rectangle::new(
                    [(b.rect.x, flip(b.rect.y)), (b.rect.right(), flip(b.rect.bottom()))],
                    rgb(fill).filled(),
                )
            }))?;

            // Outline for the hovered bar, drawn last so it sits on top.
            if let Some(bar) = hovered.and_then(|i| scene.bar(i)) {
                chart.draw_series(std::iter::once(Rectangle::new(
                    [(bar.rect.x, flip(bar.rect.y)), (bar.rect.right(), flip(bar.rect.bottom()))],
                    rgb(bar.hover_stroke).stroke_width(1),
                )))?;
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::chart::{Palette, build_scene};
    use crate::domain::{Dataset, Dimensions, Record};

    fn scene() -> Scene {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let ds = Dataset::from_sorted(
            [1000, 2000, 1500]
                .iter()
                .enumerate()
                .map(|(i, &c)| Record {
                    date: start + chrono::Duration::days(i as i64),
                    new_cases: c,
                    new_deaths: 0,
                })
                .collect(),
        );
        build_scene(&ds, &Palette::dark(), Dimensions::new(1200.0, 600.0))
    }

    fn text(buf: &Buffer) -> String {
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn draws_bars_into_the_buffer() {
        let scene = scene();
        let area = Rect::new(0, 0, 60, 20);
        let mut buf = Buffer::empty(area);
        ScenePlottersChart {
            scene: &scene,
            hovered: Some(1),
        }
        .render(area, &mut buf);

        assert!(buf.content().iter().any(|c| c.symbol() != " "));
        assert!(!text(&buf).contains("too small"));
    }

    #[test]
    fn tiny_area_shows_hint() {
        let scene = scene();
        let area = Rect::new(0, 0, 50, 4);
        let mut buf = Buffer::empty(area);
        ScenePlottersChart {
            scene: &scene,
            hovered: None,
        }
        .render(area, &mut buf);

        assert!(text(&buf).contains("Chart area too small"));
    }
}
