//! Ratatui-based terminal UI.
//!
//! Hosts a `ChartWidget`: range buttons and theme toggle in the header, the
//! bar chart in the body, loading/error overlays on top of it, and a tooltip
//! that follows the mouse (or the arrow keys).

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseEvent,
        MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph},
};
use tracing::info;

use crate::chart::{Palette, Rgb, Scene, TooltipContent, TooltipGeometry};
use crate::cli::TuiArgs;
use crate::data::DailySource;
use crate::domain::{DayRange, Dimensions, Theme};
use crate::error::{AppError, EXIT_DATA};
use crate::widget::{ChartWidget, Completion, FetchRequest, Fetcher, Phase, WidgetConfig};

mod plotters_chart;

use plotters_chart::ScenePlottersChart;

/// Virtual canvas pixels per terminal column, used by the measured layout.
const CELL_PX: f64 = 10.0;

/// Tooltip size and offsets in terminal cells.
const TOOLTIP: TooltipGeometry = TooltipGeometry {
    width: 26.0,
    offset_x: 2.0,
    offset_y: 1.0,
};
const TOOLTIP_HEIGHT: u16 = 5;

const SPINNER: [char; 8] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧'];

/// Start the TUI.
pub fn run(args: &TuiArgs, source: Arc<dyn DailySource>) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(EXIT_DATA, format!("Failed to initialize terminal: {e}")))?;
    let size = terminal
        .size()
        .map_err(|e| AppError::new(EXIT_DATA, format!("Failed to read terminal size: {e}")))?;

    let mut app = App::new(args, source);
    app.start(Rect::new(0, 0, size.width, size.height));
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen, mouse) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode()
            .map_err(|e| AppError::new(EXIT_DATA, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture) {
            let _ = disable_raw_mode();
            return Err(AppError::new(
                EXIT_DATA,
                format!("Failed to enter alternate screen: {e}"),
            ));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
    }
}

struct App {
    widget: ChartWidget,
    fetcher: Fetcher,
    status: String,
    /// Where the chart was last drawn; used to map mouse positions.
    chart_rect: Option<Rect>,
    viewport: Rect,
    spinner: usize,
}

impl App {
    fn new(args: &TuiArgs, source: Arc<dyn DailySource>) -> Self {
        let widget = ChartWidget::new(WidgetConfig {
            range: args.source.days,
            theme: if args.dark { Theme::Dark } else { Theme::Light },
            layout: args.layout,
            tooltip: TOOLTIP,
        });
        let status = format!("Source: {}", source.describe());
        Self {
            widget,
            fetcher: Fetcher::new(source),
            status,
            chart_rect: None,
            viewport: Rect::default(),
            spinner: 0,
        }
    }

    /// Measure the container, then mount.
    fn start(&mut self, size: Rect) {
        self.viewport = size;
        let req = self.widget.resize(container_width(size));
        self.issue(req);
        let req = self.widget.mount();
        self.issue(req);
    }

    fn issue(&mut self, request: Option<FetchRequest>) {
        if let Some(req) = request {
            self.status = format!("Loading last {} days...", req.range.days());
            self.fetcher.spawn(req);
        }
    }

    fn apply(&mut self, done: Completion) {
        match done.result {
            Ok(out) => {
                let summary = format!(
                    "{} records ({} rows read, {} dropped)",
                    out.dataset.len(),
                    out.rows_read,
                    out.rows_dropped
                );
                if self.widget.complete(done.generation, Ok(out.dataset)) {
                    self.status = summary;
                }
            }
            Err(err) => {
                if self.widget.complete(done.generation, Err(err)) {
                    self.status = "Load failed. Press r to retry.".to_string();
                }
            }
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            while let Some(done) = self.fetcher.try_next() {
                self.apply(done);
                needs_redraw = true;
            }
            if self.widget.is_loading() {
                self.spinner = self.spinner.wrapping_add(1);
                needs_redraw = true;
            }

            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(EXIT_DATA, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(EXIT_DATA, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read()
                .map_err(|e| AppError::new(EXIT_DATA, format!("Event read error: {e}")))?
            {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Mouse(mouse) => {
                    needs_redraw = self.handle_mouse(mouse);
                }
                Event::Resize(w, h) => {
                    self.viewport = Rect::new(0, 0, w, h);
                    let req = self.widget.resize(container_width(self.viewport));
                    self.issue(req);
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        info!("tui closed");
        Ok(())
    }

    /// Returns `true` when the app should quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Char(c @ '1'..='3') => {
                let range = match c {
                    '1' => DayRange::Last30,
                    '2' => DayRange::Last60,
                    _ => DayRange::Last90,
                };
                let req = self.widget.set_range(range);
                self.issue(req);
            }
            KeyCode::Char('t') => {
                let req = self.widget.toggle_theme();
                self.issue(req);
            }
            KeyCode::Char('r') => {
                let req = self.widget.retry();
                self.issue(req);
            }
            KeyCode::Left => self.step_hover(-1),
            KeyCode::Right => self.step_hover(1),
            KeyCode::Esc => self.widget.clear_hover(),
            _ => {}
        }
        false
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> bool {
        if !matches!(mouse.kind, MouseEventKind::Moved | MouseEventKind::Drag(_)) {
            return false;
        }
        let before = self.widget.hovered();
        match self.chart_rect {
            Some(rect) if contains(rect, mouse.column, mouse.row) => {
                let dims = self.widget.dimensions();
                // Sample the centre of the cell.
                let col = (mouse.column - rect.x) as f64 + 0.5;
                let canvas_x = col / rect.width as f64 * dims.width;
                self.widget.hover_at(
                    canvas_x,
                    (mouse.column as f64, mouse.row as f64),
                    self.viewport.width as f64,
                );
            }
            _ => self.widget.clear_hover(),
        }
        // The tooltip follows the pointer even over the same bar.
        before.is_some() || self.widget.hovered().is_some()
    }

    fn step_hover(&mut self, delta: isize) {
        let Some(scene) = self.widget.scene() else {
            return;
        };
        let Some(rect) = self.chart_rect else {
            return;
        };
        let n = scene.bars.len();
        if n == 0 {
            return;
        }
        let next = match self.widget.hovered() {
            Some(i) => (i as isize + delta).clamp(0, n as isize - 1) as usize,
            None if delta < 0 => n - 1,
            None => 0,
        };
        let Some(bar) = scene.bar(next) else {
            return;
        };
        let (col, row) = to_cell(
            rect,
            scene.dimensions,
            bar.rect.x + bar.rect.width / 2.0,
            bar.rect.y,
        );
        self.widget
            .hover_index(next, (col as f64, row as f64), self.viewport.width as f64);
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        self.viewport = size;
        let palette = self.widget.palette();

        frame.render_widget(
            Block::default().style(Style::default().bg(color(palette.page))),
            size,
        );

        let [header, body, footer] = areas(size);
        self.draw_header(frame, header, &palette);
        self.draw_body(frame, body, &palette);
        self.draw_footer(frame, footer, &palette);
        self.draw_tooltip(frame, &palette);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect, palette: &Palette) {
        let mut spans = vec![
            Span::styled(
                "COVID-19 Daily New Cases in the US",
                Style::default()
                    .fg(color(palette.text))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("   "),
        ];

        for (i, range) in DayRange::ALL.into_iter().enumerate() {
            let active = range == self.widget.range();
            let (bg, fg) = if active {
                (palette.active_button, palette.active_button_text)
            } else {
                (palette.button, palette.button_text)
            };
            spans.push(Span::styled(
                format!(" {} {} ", i + 1, range.label()),
                Style::default().bg(color(bg)).fg(color(fg)),
            ));
            spans.push(Span::raw(" "));
        }

        let theme_label = match self.widget.theme() {
            Theme::Light => " t dark mode ",
            Theme::Dark => " t light mode ",
        };
        spans.push(Span::styled(
            theme_label,
            Style::default()
                .bg(color(palette.button))
                .fg(color(palette.button_text)),
        ));

        let p = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .style(Style::default().bg(color(palette.card))),
        );
        frame.render_widget(p, area);
    }

    fn draw_body(&mut self, frame: &mut ratatui::Frame<'_>, area: Rect, palette: &Palette) {
        let block = Block::default()
            .borders(Borders::ALL)
            .style(Style::default().bg(color(palette.card)));
        let inner = block.inner(area);
        frame.render_widget(block, area);
        self.chart_rect = Some(inner);

        match self.widget.scene() {
            Some(scene) => {
                let widget = ScenePlottersChart {
                    scene: &scene,
                    hovered: self.widget.hovered(),
                };
                frame.render_widget(widget, inner);
                draw_scene_text(frame, inner, &scene, palette);
            }
            None if self.widget.phase() == &Phase::Idle => {
                let msg = Paragraph::new("Waiting for data...")
                    .style(Style::default().fg(color(palette.text)));
                frame.render_widget(msg, inner);
            }
            None => {}
        }

        match self.widget.phase() {
            Phase::Loading => self.draw_loading(frame, inner, palette),
            Phase::Errored(msg) => draw_error(frame, inner, msg, palette),
            Phase::Idle | Phase::Ready => {}
        }
    }

    fn draw_loading(&self, frame: &mut ratatui::Frame<'_>, area: Rect, palette: &Palette) {
        let rect = centered(area, 20, 3);
        let spin = SPINNER[self.spinner % SPINNER.len()];
        let p = Paragraph::new(format!("{spin} Loading..."))
            .alignment(Alignment::Center)
            .style(Style::default().fg(color(palette.spinner)).bg(color(palette.card)))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(Clear, rect);
        frame.render_widget(p, rect);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect, palette: &Palette) {
        let help = "1/2/3 range  t theme  r retry  ←/→ inspect  Esc clear  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(color(palette.text))),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(
            Block::default()
                .borders(Borders::ALL)
                .style(Style::default().bg(color(palette.card))),
        );
        frame.render_widget(p, area);
    }

    fn draw_tooltip(&self, frame: &mut ratatui::Frame<'_>, palette: &Palette) {
        let Some(tip) = self.widget.tooltip() else {
            return;
        };
        let content = TooltipContent::for_record(&tip.record);
        let area = frame.area();

        let width = (TOOLTIP.width as u16).min(area.width);
        let height = TOOLTIP_HEIGHT.min(area.height);
        let x = (tip.left.max(0.0) as u16).min(area.width.saturating_sub(width));
        let y = (tip.top.max(0.0) as u16).min(area.height.saturating_sub(height));
        let rect = Rect::new(x, y, width, height);

        let inner_width = width.saturating_sub(2) as usize;
        let mut lines = vec![Line::from(Span::styled(
            content.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ))];
        for (key, value) in &content.rows {
            let pad = inner_width.saturating_sub(key.len() + value.len());
            lines.push(Line::from(format!("{key}{:pad$}{value}", "")));
        }

        let p = Paragraph::new(Text::from(lines))
            .style(
                Style::default()
                    .bg(color(palette.tooltip_bg))
                    .fg(color(palette.text)),
            )
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color(palette.tooltip_border))),
            );
        frame.render_widget(Clear, rect);
        frame.render_widget(p, rect);
    }
}

fn draw_error(frame: &mut ratatui::Frame<'_>, area: Rect, msg: &str, palette: &Palette) {
    let width = (msg.chars().count() as u16 + 4).min(area.width);
    let rect = centered(area, width, 4);
    let text = Text::from(vec![
        Line::from(msg.to_string()),
        Line::from(Span::styled(
            " r Retry ",
            Style::default()
                .bg(color(palette.retry_button))
                .fg(Color::White),
        )),
    ]);
    let p = Paragraph::new(text)
        .alignment(Alignment::Center)
        .style(
            Style::default()
                .bg(color(palette.error_bg))
                .fg(color(palette.error_text)),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color(palette.error_border))),
        );
    frame.render_widget(Clear, rect);
    frame.render_widget(p, rect);
}

/// Tick labels, value labels and axis titles, placed on terminal cells.
fn draw_scene_text(frame: &mut ratatui::Frame<'_>, chart: Rect, scene: &Scene, palette: &Palette) {
    if chart.width < 20 || chart.height < 8 {
        return;
    }
    let buf = frame.buffer_mut();
    let axis = Style::default().fg(color(scene.axis_color)).bg(color(palette.card));
    let dims = scene.dimensions;
    let right = chart.x + chart.width;
    let bottom = chart.y + chart.height;

    for tick in &scene.y_ticks {
        let (col, row) = to_cell(chart, dims, scene.plot.x, tick.pos);
        let len = tick.label.len() as u16;
        if row >= bottom || col < chart.x + len + 1 {
            continue;
        }
        buf.set_string(col - len - 1, row, &tick.label, axis);
    }

    // Date labels end at their tick, like the rotated labels they stand in for.
    let (_, axis_row) = to_cell(chart, dims, 0.0, scene.plot.bottom());
    let label_row = axis_row + 1;
    if label_row < bottom {
        let mut next_free = chart.x;
        for tick in &scene.x_ticks {
            let (col, _) = to_cell(chart, dims, tick.pos, 0.0);
            let len = tick.label.len() as u16;
            let start = (col + 1).saturating_sub(len);
            if start < next_free || start + len > right {
                continue;
            }
            buf.set_string(start, label_row, &tick.label, axis);
            next_free = start + len + 1;
        }
    }

    let mut next_free = chart.x;
    for label in &scene.value_labels {
        let (col, row) = to_cell(chart, dims, label.x, label.y);
        let len = label.text.len() as u16;
        let start = col.saturating_sub(len / 2);
        if row < chart.y || start < next_free || start + len > right {
            continue;
        }
        buf.set_string(start, row, &label.text, axis);
        next_free = start + len + 1;
    }

    for title in &scene.axis_titles {
        let (col, row) = to_cell(chart, dims, title.x, title.y);
        let len = title.text.chars().count() as u16;
        if title.rotation == 0.0 {
            let row = row.min(bottom - 1);
            buf.set_string(col.saturating_sub(len / 2).max(chart.x), row, &title.text, axis);
        } else {
            // Vertical text in place of the rotated title.
            let top = row.saturating_sub(len / 2).max(chart.y);
            for (i, ch) in title.text.chars().enumerate() {
                let r = top + i as u16;
                if r >= bottom {
                    break;
                }
                buf.set_string(chart.x, r, ch.to_string(), axis);
            }
        }
    }
}

/// Header, body and footer areas.
fn areas(size: Rect) -> [Rect; 3] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(size);
    [chunks[0], chunks[1], chunks[2]]
}

/// Width of the chart container in virtual pixels for a terminal of `size`.
fn container_width(size: Rect) -> f64 {
    let [_, body, _] = areas(size);
    let inner = Block::default().borders(Borders::ALL).inner(body);
    inner.width as f64 * CELL_PX
}

/// Canvas coordinates -> terminal cell inside `chart`.
fn to_cell(chart: Rect, dims: Dimensions, x: f64, y: f64) -> (u16, u16) {
    let fx = if dims.width > 0.0 { x / dims.width } else { 0.0 };
    let fy = if dims.height > 0.0 { y / dims.height } else { 0.0 };
    let col = chart.x as f64 + (fx * chart.width as f64).floor();
    let row = chart.y as f64 + (fy * chart.height as f64).floor();
    (
        col.clamp(chart.x as f64, (chart.x + chart.width.saturating_sub(1)) as f64) as u16,
        row.clamp(chart.y as f64, (chart.y + chart.height.saturating_sub(1)) as f64) as u16,
    )
}

fn contains(rect: Rect, col: u16, row: u16) -> bool {
    col >= rect.x && col < rect.x + rect.width && row >= rect.y && row < rect.y + rect.height
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

fn color(c: Rgb) -> Color {
    Color::Rgb(c.0, c.1, c.2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_cell_maps_canvas_corners() {
        let chart = Rect::new(2, 4, 100, 20);
        let dims = Dimensions::new(1000.0, 600.0);
        assert_eq!(to_cell(chart, dims, 0.0, 0.0), (2, 4));
        assert_eq!(to_cell(chart, dims, 500.0, 300.0), (52, 14));
        assert_eq!(to_cell(chart, dims, 1000.0, 600.0), (101, 23));
    }

    #[test]
    fn container_width_tracks_terminal() {
        // 120 columns minus the two border cells.
        assert_eq!(container_width(Rect::new(0, 0, 120, 40)), 1180.0);
    }

    #[test]
    fn centered_rect_fits() {
        let r = centered(Rect::new(0, 0, 10, 10), 20, 4);
        assert_eq!(r, Rect::new(0, 3, 10, 4));
    }

    #[test]
    fn contains_is_half_open() {
        let r = Rect::new(5, 5, 10, 2);
        assert!(contains(r, 5, 5));
        assert!(!contains(r, 15, 5));
        assert!(!contains(r, 5, 7));
    }
}
