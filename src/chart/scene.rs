//! Declarative chart scene.
//!
//! `build_scene` maps `(dataset, palette, dimensions)` to a `Scene`: plain
//! geometry in canvas coordinates (origin top-left, y grows downwards).
//! Hosts (the TUI, the SVG writer) only draw what the scene describes, and a
//! redraw always starts from a freshly built scene.

use crate::domain::{CHART_MARGIN, Dataset, Dimensions, Margin};

use super::palette::{Palette, Rgb};
use super::scale::{LinearScale, TimeScale};

pub const CHART_TITLE: &str = "COVID-19 Daily New Cases in the US";
pub const X_AXIS_TITLE: &str = "Date";
pub const Y_AXIS_TITLE: &str = "Daily New Cases";

/// Headroom above the tallest bar.
pub const Y_HEADROOM: f64 = 1.1;
/// Bars taller than this share of the maximum get a value label.
pub const LABEL_THRESHOLD: f64 = 0.2;
pub const BAR_GAP: f64 = 2.0;
pub const MIN_BAR_WIDTH: f64 = 2.0;
pub const BAR_RADIUS: f64 = 2.0;

pub const GRID_TICKS: usize = 10;
pub const Y_AXIS_TICKS: usize = 5;
pub const X_AXIS_TICKS: usize = 10;
/// Outward tick mark length.
pub const TICK_SIZE: f64 = 6.0;
pub const X_LABEL_ROTATION: f64 = -45.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn contains_x(&self, x: f64) -> bool {
        x >= self.x && x <= self.right()
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.contains_x(x) && y >= self.y && y <= self.bottom()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextMark {
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub anchor: Anchor,
    /// Degrees, clockwise positive.
    pub rotation: f64,
    pub font_px: f64,
    pub color: Rgb,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineMark {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub color: Rgb,
    pub opacity: f64,
}

/// A labelled axis position (absolute x for the date axis, absolute y for the value axis).
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub pos: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarMark {
    /// Index into the dataset.
    pub index: usize,
    pub rect: Rect,
    pub radius: f64,
    pub fill: Rgb,
    pub hover_fill: Rgb,
    pub hover_stroke: Rgb,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub dimensions: Dimensions,
    /// Plot area in canvas coordinates.
    pub plot: Rect,
    pub background: Rgb,
    pub title: String,
    /// Upper bound of the value domain (lower bound is always 0).
    pub y_max: f64,
    pub bar_width: f64,
    pub grid: Vec<LineMark>,
    /// Domain lines and tick marks of both axes.
    pub axis_lines: Vec<LineMark>,
    pub axis_color: Rgb,
    pub x_ticks: Vec<Tick>,
    pub y_ticks: Vec<Tick>,
    pub bars: Vec<BarMark>,
    pub value_labels: Vec<TextMark>,
    pub axis_titles: Vec<TextMark>,
}

impl Scene {
    /// Index of the bar whose horizontal extent contains `x`.
    pub fn bar_at(&self, x: f64) -> Option<usize> {
        self.bars.iter().find(|b| b.rect.contains_x(x)).map(|b| b.index)
    }

    /// Index of the bar whose rectangle contains `(x, y)`, for hosts that
    /// track the pointer precisely.
    pub fn bar_at_point(&self, x: f64, y: f64) -> Option<usize> {
        self.bars.iter().find(|b| b.rect.contains(x, y)).map(|b| b.index)
    }

    pub fn bar(&self, index: usize) -> Option<&BarMark> {
        self.bars.iter().find(|b| b.index == index)
    }
}

/// `250000` -> `"250k"`, `500` -> `"0.5k"`.
pub fn format_thousands_tick(v: f64) -> String {
    format!("{}k", v / 1000.0)
}

/// Rounded value label: `12_600` -> `"13k"`.
pub fn format_value_label(cases: i64) -> String {
    format!("{}k", (cases as f64 / 1000.0).round() as i64)
}

/// Build the scene for `dataset` on a canvas of `dimensions`.
pub fn build_scene(dataset: &Dataset, palette: &Palette, dimensions: Dimensions) -> Scene {
    build_scene_with_margin(dataset, palette, dimensions, &CHART_MARGIN)
}

pub fn build_scene_with_margin(
    dataset: &Dataset,
    palette: &Palette,
    dimensions: Dimensions,
    margin: &Margin,
) -> Scene {
    let bounded = dimensions.bounded(margin);
    let plot = Rect {
        x: margin.left,
        y: margin.top,
        width: bounded.width,
        height: bounded.height,
    };

    let mut scene = Scene {
        dimensions,
        plot,
        background: palette.card,
        title: CHART_TITLE.to_string(),
        y_max: 0.0,
        bar_width: 0.0,
        grid: Vec::new(),
        axis_lines: Vec::new(),
        axis_color: palette.axis,
        x_ticks: Vec::new(),
        y_ticks: Vec::new(),
        bars: Vec::new(),
        value_labels: Vec::new(),
        axis_titles: Vec::new(),
    };

    let (Some(extent), Some(max_cases)) = (dataset.date_extent(), dataset.max_cases()) else {
        return scene;
    };

    let xs = TimeScale::new(extent, [0.0, bounded.width]);
    scene.y_max = if max_cases > 0 {
        max_cases as f64 * Y_HEADROOM
    } else {
        1.0
    };
    let ys = LinearScale::new([0.0, scene.y_max], [bounded.height, 0.0]);

    // Grid: one horizontal line per default tick, across the plot.
    for v in ys.ticks(GRID_TICKS) {
        let y = plot.y + ys.to_px(v);
        scene.grid.push(LineMark {
            x1: plot.x,
            y1: y,
            x2: plot.right(),
            y2: y,
            color: palette.grid,
            opacity: palette.grid_opacity,
        });
    }

    // Value axis.
    scene.axis_lines.push(LineMark {
        x1: plot.x,
        y1: plot.y,
        x2: plot.x,
        y2: plot.bottom(),
        color: palette.axis,
        opacity: 1.0,
    });
    for v in ys.ticks(Y_AXIS_TICKS) {
        let y = plot.y + ys.to_px(v);
        scene.axis_lines.push(LineMark {
            x1: plot.x - TICK_SIZE,
            y1: y,
            x2: plot.x,
            y2: y,
            color: palette.axis,
            opacity: 1.0,
        });
        scene.y_ticks.push(Tick {
            pos: y,
            label: format_thousands_tick(v),
        });
    }

    // Date axis along the bottom of the plot.
    scene.axis_lines.push(LineMark {
        x1: plot.x,
        y1: plot.bottom(),
        x2: plot.right(),
        y2: plot.bottom(),
        color: palette.axis,
        opacity: 1.0,
    });
    for date in xs.ticks(X_AXIS_TICKS) {
        let x = plot.x + xs.to_px(date);
        scene.axis_lines.push(LineMark {
            x1: x,
            y1: plot.bottom(),
            x2: x,
            y2: plot.bottom() + TICK_SIZE,
            color: palette.axis,
            opacity: 1.0,
        });
        scene.x_ticks.push(Tick {
            pos: x,
            label: date.format("%b %d").to_string(),
        });
    }

    let n = dataset.len() as f64;
    scene.bar_width = (bounded.width / n - BAR_GAP).max(MIN_BAR_WIDTH);
    let label_threshold = max_cases as f64 * LABEL_THRESHOLD;

    for (index, record) in dataset.records().iter().enumerate() {
        let x = plot.x + xs.to_px(record.date);
        let top = ys.to_px(record.new_cases.max(0) as f64);
        let rect = Rect {
            x,
            y: plot.y + top,
            width: scene.bar_width,
            height: (bounded.height - top).max(0.0),
        };
        scene.bars.push(BarMark {
            index,
            rect,
            radius: BAR_RADIUS,
            fill: palette.bar,
            hover_fill: palette.hover,
            hover_stroke: palette.hover_stroke,
        });

        if max_cases > 0 && record.new_cases as f64 > label_threshold {
            scene.value_labels.push(TextMark {
                x: x + scene.bar_width / 2.0,
                y: rect.y - 5.0,
                text: format_value_label(record.new_cases),
                anchor: Anchor::Middle,
                rotation: 0.0,
                font_px: 10.0,
                color: palette.axis,
            });
        }
    }

    scene.axis_titles.push(TextMark {
        x: plot.x + bounded.width / 2.0,
        y: plot.y + bounded.height + margin.top + 30.0,
        text: X_AXIS_TITLE.to_string(),
        anchor: Anchor::Middle,
        rotation: 0.0,
        font_px: 14.0,
        color: palette.axis,
    });
    scene.axis_titles.push(TextMark {
        x: 15.0,
        y: plot.y + bounded.height / 2.0,
        text: Y_AXIS_TITLE.to_string(),
        anchor: Anchor::Middle,
        rotation: -90.0,
        font_px: 14.0,
        color: palette.axis,
    });

    scene
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::Record;

    fn dataset(cases: &[i64]) -> Dataset {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        Dataset::from_sorted(
            cases
                .iter()
                .enumerate()
                .map(|(i, &c)| Record {
                    date: start + chrono::Duration::days(i as i64),
                    new_cases: c,
                    new_deaths: c / 100,
                })
                .collect(),
        )
    }

    fn fixed() -> Dimensions {
        Dimensions::new(1200.0, 600.0)
    }

    #[test]
    fn two_record_scenario() {
        let scene = build_scene(&dataset(&[1000, 2000]), &Palette::light(), fixed());
        assert_eq!(scene.y_max, 2200.0);
        assert_eq!(scene.bars.len(), 2);
        assert_eq!(scene.plot, Rect { x: 80.0, y: 40.0, width: 1080.0, height: 480.0 });

        // First bar at the left edge, last at the right edge of the plot.
        assert_eq!(scene.bars[0].rect.x, 80.0);
        assert_eq!(scene.bars[1].rect.x, 1160.0);
        assert_eq!(scene.bar_width, 538.0);

        // 2000 of 2200 -> top at 480 * (1 - 2000/2200)
        let expected_top = 40.0 + 480.0 - 480.0 * 2000.0 / 2200.0;
        assert!((scene.bars[1].rect.y - expected_top).abs() < 1e-9);
        assert!((scene.bars[1].rect.bottom() - 520.0).abs() < 1e-9);

        let labels: Vec<_> = scene.y_ticks.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["0k", "0.5k", "1k", "1.5k", "2k"]);
    }

    #[test]
    fn bar_width_formula_with_floor() {
        let scene = build_scene(&dataset(&[1; 30]), &Palette::light(), fixed());
        assert_eq!(scene.bar_width, 1080.0 / 30.0 - 2.0);

        let narrow = build_scene(&dataset(&[1; 90]), &Palette::light(), Dimensions::new(300.0, 200.0));
        assert_eq!(narrow.bar_width, 2.0);
    }

    #[test]
    fn labels_only_above_twenty_percent() {
        let scene = build_scene(&dataset(&[100, 200, 201, 1000]), &Palette::light(), fixed());
        let texts: Vec<_> = scene.value_labels.iter().map(|l| l.text.as_str()).collect();
        // threshold = 200: 200 is not strictly above it
        assert_eq!(texts, vec!["0k", "1k"]);
        let label = &scene.value_labels[1];
        let bar = &scene.bars[3];
        assert_eq!(label.x, bar.rect.x + scene.bar_width / 2.0);
        assert_eq!(label.y, bar.rect.y - 5.0);
    }

    #[test]
    fn value_label_rounds_half_up() {
        assert_eq!(format_value_label(2500), "3k");
        assert_eq!(format_value_label(12_400), "12k");
        assert_eq!(format_thousands_tick(1500.0), "1.5k");
        assert_eq!(format_thousands_tick(0.0), "0k");
    }

    #[test]
    fn grid_spans_plot_width() {
        let scene = build_scene(&dataset(&[1000, 2000]), &Palette::dark(), fixed());
        assert_eq!(scene.grid.len(), 12);
        for line in &scene.grid {
            assert_eq!((line.x1, line.x2), (80.0, 1160.0));
            assert_eq!(line.opacity, 0.3);
            assert_eq!(line.color, Palette::dark().grid);
        }
    }

    #[test]
    fn date_ticks_are_formatted() {
        let scene = build_scene(&dataset(&[5; 30]), &Palette::light(), fixed());
        assert_eq!(scene.x_ticks[0].label, "Jan 01");
        assert_eq!(scene.x_ticks[1].label, "Jan 03");
        assert_eq!(scene.x_ticks[0].pos, 80.0);
    }

    #[test]
    fn theme_only_changes_colours() {
        let ds = dataset(&[10, 20, 30]);
        let light = build_scene(&ds, &Palette::light(), fixed());
        let dark = build_scene(&ds, &Palette::dark(), fixed());
        assert_eq!(light.y_max, dark.y_max);
        let rects = |s: &Scene| s.bars.iter().map(|b| b.rect).collect::<Vec<_>>();
        assert_eq!(rects(&light), rects(&dark));
        assert_ne!(light.bars[0].fill, dark.bars[0].fill);
    }

    #[test]
    fn empty_dataset_draws_nothing() {
        let scene = build_scene(&Dataset::default(), &Palette::light(), fixed());
        assert!(scene.bars.is_empty());
        assert!(scene.grid.is_empty());
        assert!(scene.x_ticks.is_empty());
        assert!(scene.axis_titles.is_empty());
    }

    #[test]
    fn hit_testing_by_column() {
        let scene = build_scene(&dataset(&[1, 2, 3]), &Palette::light(), fixed());
        let b1 = &scene.bars[1];
        assert_eq!(scene.bar_at(b1.rect.x + 1.0), Some(1));
        assert_eq!(scene.bar_at(10.0), None);
    }

    #[test]
    fn point_hit_testing_respects_bar_height() {
        let scene = build_scene(&dataset(&[1000, 2000]), &Palette::light(), fixed());
        let short = scene.bars[0].rect;
        let x = short.x + 1.0;

        assert_eq!(scene.bar_at_point(x, short.y + 1.0), Some(0));
        assert_eq!(scene.bar_at_point(x, short.bottom()), Some(0));
        // Above the short bar: same column, no hit.
        assert_eq!(scene.bar_at_point(x, short.y - 5.0), None);
        assert_eq!(scene.bar_at(x), Some(0));
    }

    #[test]
    fn zero_and_negative_counts_stay_on_the_baseline() {
        let scene = build_scene(&dataset(&[0, -5, 10]), &Palette::light(), fixed());
        assert_eq!(scene.bars[0].rect.height, 0.0);
        assert_eq!(scene.bars[1].rect.height, 0.0);
        assert_eq!(scene.bars[1].rect.y, scene.plot.bottom());

        let flat = build_scene(&dataset(&[0, 0]), &Palette::light(), fixed());
        assert_eq!(flat.y_max, 1.0);
        assert!(flat.value_labels.is_empty());
    }
}
