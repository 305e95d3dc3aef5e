//! Standalone SVG rendering of a `Scene`.
//!
//! The output works in any browser without scripts: hover recolouring is a
//! CSS rule and each bar carries a native `<title>` tooltip.

use std::fmt::Write;

use crate::domain::Dataset;

use super::scene::{Anchor, LineMark, Scene, TextMark, X_LABEL_ROTATION};
use super::tooltip::TooltipContent;

/// Serialize `scene` to an SVG document. `dataset` supplies tooltip text.
pub fn render_svg(scene: &Scene, dataset: &Dataset) -> String {
    let mut out = String::new();
    let w = scene.dimensions.width;
    let h = scene.dimensions.height;

    let hover = scene.bars.first().map(|b| (b.hover_fill, b.hover_stroke));

    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif">"#
    );
    let _ = writeln!(out, "<title>{}</title>", escape(&scene.title));
    if let Some((fill, stroke)) = hover {
        let _ = writeln!(
            out,
            "<style>.bar:hover {{ fill: {}; stroke: {}; stroke-width: 1; }}</style>",
            fill.hex(),
            stroke.hex()
        );
    }
    let _ = writeln!(
        out,
        r#"<rect width="100%" height="100%" fill="{}"/>"#,
        scene.background.hex()
    );

    out.push_str("<g class=\"grid\">\n");
    for line in &scene.grid {
        write_line(&mut out, line);
    }
    out.push_str("</g>\n<g class=\"axes\">\n");
    for line in &scene.axis_lines {
        write_line(&mut out, line);
    }
    out.push_str("</g>\n");

    let axis = scene.axis_color.hex();
    let label_y = scene.plot.bottom() + 9.0;
    out.push_str("<g class=\"x-axis\" font-size=\"10\">\n");
    for tick in &scene.x_ticks {
        let _ = writeln!(
            out,
            r#"<text x="{x}" y="{label_y}" dx="-0.8em" dy="0.5em" text-anchor="end" fill="{axis}" transform="rotate({X_LABEL_ROTATION} {x} {label_y})">{}</text>"#,
            escape(&tick.label),
            x = tick.pos,
        );
    }
    out.push_str("</g>\n<g class=\"y-axis\" font-size=\"10\">\n");
    let label_x = scene.plot.x - 9.0;
    for tick in &scene.y_ticks {
        let _ = writeln!(
            out,
            r#"<text x="{label_x}" y="{}" dy="0.32em" text-anchor="end" fill="{axis}">{}</text>"#,
            tick.pos,
            escape(&tick.label)
        );
    }
    out.push_str("</g>\n");

    for bar in &scene.bars {
        let r = bar.rect;
        let _ = write!(
            out,
            r#"<g class="bar-group"><rect class="bar" x="{}" y="{}" width="{}" height="{}" rx="{}" fill="{}">"#,
            r.x,
            r.y,
            r.width,
            r.height,
            bar.radius,
            bar.fill.hex()
        );
        if let Some(record) = dataset.get(bar.index) {
            let tip = TooltipContent::for_record(record).to_plain();
            let _ = write!(out, "<title>{}</title>", escape(&tip));
        }
        out.push_str("</rect></g>\n");
    }

    for text in scene.value_labels.iter().chain(&scene.axis_titles) {
        write_text(&mut out, text);
    }

    out.push_str("</svg>\n");
    out
}

fn write_line(out: &mut String, line: &LineMark) {
    let _ = writeln!(
        out,
        r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-opacity="{}"/>"#,
        line.x1,
        line.y1,
        line.x2,
        line.y2,
        line.color.hex(),
        line.opacity
    );
}

fn write_text(out: &mut String, text: &TextMark) {
    let anchor = match text.anchor {
        Anchor::Start => "start",
        Anchor::Middle => "middle",
        Anchor::End => "end",
    };
    let transform = if text.rotation != 0.0 {
        format!(r#" transform="rotate({} {} {})""#, text.rotation, text.x, text.y)
    } else {
        String::new()
    };
    let _ = writeln!(
        out,
        r#"<text x="{}" y="{}" text-anchor="{anchor}" font-size="{}" fill="{}"{transform}>{}</text>"#,
        text.x,
        text.y,
        text.font_px,
        text.color.hex(),
        escape(&text.text)
    );
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::chart::{Palette, build_scene};
    use crate::domain::{Dimensions, Record};

    fn two_days() -> Dataset {
        Dataset::from_sorted(vec![
            Record {
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                new_cases: 1000,
                new_deaths: 10,
            },
            Record {
                date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                new_cases: 2000,
                new_deaths: 20,
            },
        ])
    }

    #[test]
    fn svg_contains_bars_tooltips_and_hover_rule() {
        let ds = two_days();
        let scene = build_scene(&ds, &Palette::light(), Dimensions::new(1200.0, 600.0));
        let svg = render_svg(&scene, &ds);

        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches("class=\"bar\"").count(), 2);
        assert!(svg.contains("fill: #ffa500"));
        assert!(svg.contains("January 02, 2024\nNew Cases: 2,000\nDeaths: 20"));
        assert!(svg.contains(">Daily New Cases</text>"));
        assert!(svg.contains("rotate(-45"));
    }

    #[test]
    fn empty_scene_is_still_valid_svg() {
        let ds = Dataset::default();
        let scene = build_scene(&ds, &Palette::dark(), Dimensions::new(400.0, 240.0));
        let svg = render_svg(&scene, &ds);
        assert!(!svg.contains("<style>"));
        assert!(svg.contains("#1f2937"));
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape("a<b & \"c\">"), "a&lt;b &amp; &quot;c&quot;&gt;");
    }
}
