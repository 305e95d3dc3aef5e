//! Host-agnostic widget state.
//!
//! `ChartWidget` owns the view state (range, theme, layout, hover) and the
//! load lifecycle:
//!
//! ```text
//! Idle -> Loading -> Ready
//!            \-> Errored -> (retry) -> Loading
//! ```
//!
//! Every transition into `Loading` hands back a `FetchRequest` for the host
//! to run. Requests carry a generation number and only the newest
//! generation's completion is applied, so a slow response for an old range
//! can never overwrite a newer one.

use tracing::{debug, warn};

use crate::chart::{
    Palette, Scene, Tooltip, TooltipGeometry, build_scene, canvas_dimensions, place_tooltip,
};
use crate::domain::{Dataset, DayRange, Dimensions, LayoutStrategy, Theme};
use crate::error::AppError;

pub mod fetcher;

pub use fetcher::{Completion, Fetcher};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Ready,
    Errored(String),
}

/// Work the host must perform: load `range` and report back with `generation`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchRequest {
    pub generation: u64,
    pub range: DayRange,
}

#[derive(Debug, Clone, Copy)]
pub struct WidgetConfig {
    pub range: DayRange,
    pub theme: Theme,
    pub layout: LayoutStrategy,
    pub tooltip: TooltipGeometry,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            range: DayRange::Last30,
            theme: Theme::Light,
            layout: LayoutStrategy::Fixed,
            tooltip: TooltipGeometry::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChartWidget {
    range: DayRange,
    theme: Theme,
    layout: LayoutStrategy,
    container_width: Option<f64>,
    tooltip_geometry: TooltipGeometry,
    phase: Phase,
    generation: u64,
    /// Last successfully loaded dataset; kept while reloading or after errors.
    dataset: Option<Dataset>,
    tooltip: Option<Tooltip>,
}

impl ChartWidget {
    pub fn new(config: WidgetConfig) -> Self {
        Self {
            range: config.range,
            theme: config.theme,
            layout: config.layout,
            container_width: None,
            tooltip_geometry: config.tooltip,
            phase: Phase::Idle,
            generation: 0,
            dataset: None,
            tooltip: None,
        }
    }

    pub fn range(&self) -> DayRange {
        self.range
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn layout(&self) -> LayoutStrategy {
        self.layout
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            Phase::Errored(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    pub fn palette(&self) -> Palette {
        Palette::for_theme(self.theme)
    }

    pub fn dimensions(&self) -> Dimensions {
        canvas_dimensions(self.layout, self.container_width)
    }

    /// Scene for the current dataset, palette and dimensions.
    pub fn scene(&self) -> Option<Scene> {
        let dataset = self.dataset.as_ref()?;
        Some(build_scene(dataset, &self.palette(), self.dimensions()))
    }

    /// First load. Only valid from `Idle`.
    pub fn mount(&mut self) -> Option<FetchRequest> {
        if self.phase != Phase::Idle {
            return None;
        }
        Some(self.begin_fetch())
    }

    pub fn set_range(&mut self, range: DayRange) -> Option<FetchRequest> {
        if range == self.range {
            return None;
        }
        self.range = range;
        Some(self.begin_fetch())
    }

    pub fn toggle_theme(&mut self) -> Option<FetchRequest> {
        self.theme = self.theme.toggled();
        Some(self.begin_fetch())
    }

    /// Report the container width. Only measured layouts react; each report
    /// re-measures and reloads, even when the width is unchanged.
    pub fn resize(&mut self, container_width: f64) -> Option<FetchRequest> {
        if self.layout != LayoutStrategy::Measured {
            return None;
        }
        self.container_width = Some(container_width);
        Some(self.begin_fetch())
    }

    /// User-initiated reload after a failure.
    pub fn retry(&mut self) -> Option<FetchRequest> {
        match self.phase {
            Phase::Errored(_) => Some(self.begin_fetch()),
            _ => None,
        }
    }

    fn begin_fetch(&mut self) -> FetchRequest {
        self.generation += 1;
        self.phase = Phase::Loading;
        self.tooltip = None;
        debug!(generation = self.generation, range = self.range.days(), "fetch requested");
        FetchRequest {
            generation: self.generation,
            range: self.range,
        }
    }

    /// Apply a finished load. Returns `false` when the result was superseded.
    pub fn complete(&mut self, generation: u64, result: Result<Dataset, AppError>) -> bool {
        if generation != self.generation {
            debug!(generation, current = self.generation, "dropping stale fetch result");
            return false;
        }
        match result {
            Ok(dataset) => {
                self.dataset = Some(dataset);
                self.phase = Phase::Ready;
            }
            Err(err) => {
                warn!(error = %err, "failed to fetch COVID data");
                self.phase = Phase::Errored(err.user_message().to_string());
            }
        }
        self.tooltip = None;
        true
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.as_ref()
    }

    pub fn hovered(&self) -> Option<usize> {
        self.tooltip.as_ref().map(|t| t.index)
    }

    /// Hover whatever bar lies under canvas x-coordinate `canvas_x`.
    ///
    /// `pointer` and `viewport_width` are in the host's units and only
    /// position the tooltip.
    pub fn hover_at(&mut self, canvas_x: f64, pointer: (f64, f64), viewport_width: f64) -> Option<usize> {
        let index = self.scene().and_then(|s| s.bar_at(canvas_x));
        self.hover_hit(index, pointer, viewport_width)
    }

    /// Like `hover_at`, but the canvas point must lie on the bar itself.
    pub fn hover_at_point(
        &mut self,
        canvas: (f64, f64),
        pointer: (f64, f64),
        viewport_width: f64,
    ) -> Option<usize> {
        let index = self.scene().and_then(|s| s.bar_at_point(canvas.0, canvas.1));
        self.hover_hit(index, pointer, viewport_width)
    }

    fn hover_hit(&mut self, index: Option<usize>, pointer: (f64, f64), viewport_width: f64) -> Option<usize> {
        match index {
            Some(index) => self.hover_index(index, pointer, viewport_width),
            None => {
                self.clear_hover();
                None
            }
        }
    }

    /// Hover bar `index` directly (keyboard navigation).
    pub fn hover_index(&mut self, index: usize, pointer: (f64, f64), viewport_width: f64) -> Option<usize> {
        if self.phase != Phase::Ready {
            return None;
        }
        let record = *self.dataset.as_ref()?.get(index)?;
        let (left, top) = place_tooltip(pointer, viewport_width, &self.tooltip_geometry);
        self.tooltip = Some(Tooltip {
            index,
            record,
            left,
            top,
        });
        Some(index)
    }

    pub fn clear_hover(&mut self) {
        self.tooltip = None;
    }
}
