//! The owning state object behind an interactive overlay.
//!
//! `Overlay` holds the annotation tree, the flat symbol records, the filter
//! range, the granularity, zoom and viewport, and the boundary cache. The
//! UI-facing operations mutate it; the derived outputs (records, boundaries,
//! visible subset, axis labels) are read back from it.
//!
//! Filtering always completes before any matching runs: the records are
//! re-flagged eagerly in `set_filter_range`, and boundaries are computed
//! lazily from whatever flags are current.

use tracing::debug;

use crate::api::Payload;
use crate::boundary::{Boundary, BoundaryCache, CacheKey, VisibleBoundary, visible_boundaries};
use crate::error::Result;
use crate::filter::{
    FilterBounds, FilterRange, FilterSummary, SymbolRecord, apply_filter, build_records,
    records_from_raw,
};
use crate::model::{Document, Granularity};
use crate::params::OverlayParams;
use crate::text::{TextOptions, document_text, export_text, filtered_text};
use crate::transform::{
    AxisLabel, ContainerSize, ScrollTracker, ViewportRect, ZoomState, system_height, system_width,
    x_axis_labels, y_axis_labels,
};

/// Overlay state for one recognition result.
#[derive(Debug)]
pub struct Overlay {
    params: OverlayParams,
    document: Document,
    records: Vec<SymbolRecord>,
    bounds: FilterBounds,
    range: FilterRange,
    summary: FilterSummary,
    granularity: Granularity,
    zoom: ZoomState,
    scroll: (f64, f64),
    container: ContainerSize,
    viewport: ViewportRect,
    tracker: ScrollTracker,
    cache: BoundaryCache,
    revision: u64,
    image_size: Option<(f64, f64)>,
    show_bounds: bool,
}

impl Overlay {
    /// Creates an overlay over `document`, filtering with the widest range
    /// its symbols allow.
    pub fn new(document: Document, params: OverlayParams) -> Result<Self> {
        params.validate()?;
        let bounds = FilterBounds::from_document(&document, None, params.min_vertices);
        let range = bounds.full_range();
        let records = build_records(&document, &range, params.min_vertices);
        let mut overlay = Self {
            zoom: ZoomState::new(&params),
            tracker: ScrollTracker::new(params.scroll_invalidate_threshold),
            params,
            document,
            records,
            bounds,
            range,
            summary: FilterSummary::default(),
            granularity: Granularity::default(),
            scroll: (0.0, 0.0),
            container: ContainerSize::default(),
            viewport: ViewportRect::default(),
            cache: BoundaryCache::new(),
            revision: 0,
            image_size: None,
            show_bounds: true,
        };
        overlay.summary = overlay.count_accepted();
        Ok(overlay)
    }

    /// Creates an overlay from a loaded payload, using its precomputed
    /// symbol records when present.
    pub fn from_payload(payload: Payload, params: OverlayParams) -> Result<Self> {
        let mut overlay = Self::new(payload.document, params)?;
        if let Some(raw) = payload.raw_symbols {
            overlay.records = records_from_raw(raw, &overlay.range);
            overlay.summary = overlay.count_accepted();
        }
        Ok(overlay)
    }

    fn count_accepted(&self) -> FilterSummary {
        FilterSummary {
            total: self.records.len(),
            accepted: self.records.iter().filter(|r| r.is_filtered).count(),
        }
    }

    fn bump_revision(&mut self) {
        self.revision += 1;
        self.cache.invalidate();
    }

    pub fn params(&self) -> &OverlayParams {
        &self.params
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Replaces the tree, rebuilding records and resetting the filter range
    /// to the new tree's bounds.
    pub fn set_document(&mut self, document: Document) {
        self.bounds =
            FilterBounds::from_document(&document, self.image_size, self.params.min_vertices);
        self.range = self.bounds.full_range();
        self.records = build_records(&document, &self.range, self.params.min_vertices);
        self.document = document;
        self.summary = self.count_accepted();
        self.bump_revision();
        debug!(revision = self.revision, symbols = self.records.len(), "document replaced");
    }

    /// Sets the source image size used for the coordinate system and the
    /// fallback filter bounds. The filter range resets to the new bounds.
    pub fn set_image_size(&mut self, width: f64, height: f64) -> FilterSummary {
        self.image_size = Some((width, height));
        self.bounds =
            FilterBounds::from_document(&self.document, self.image_size, self.params.min_vertices);
        self.reset_filter()
    }

    fn image_dimensions(&self) -> (f64, f64) {
        self.image_size
            .or_else(|| self.document.page_dimensions())
            .unwrap_or((0.0, 0.0))
    }

    // ========================================================================
    // Filtering
    // ========================================================================

    /// Re-flags every record against `range`.
    pub fn set_filter_range(&mut self, range: FilterRange) -> FilterSummary {
        self.range = range;
        self.summary = apply_filter(&mut self.records, &self.range);
        self.bump_revision();
        self.summary
    }

    /// Restores the widest range the current bounds allow.
    pub fn reset_filter(&mut self) -> FilterSummary {
        self.set_filter_range(self.bounds.full_range())
    }

    pub fn filter_range(&self) -> &FilterRange {
        &self.range
    }

    pub fn filter_bounds(&self) -> &FilterBounds {
        &self.bounds
    }

    pub fn filter_summary(&self) -> FilterSummary {
        self.summary
    }

    /// All symbol records with their current filter flags.
    pub fn filtered_symbols(&self) -> &[SymbolRecord] {
        &self.records
    }

    // ========================================================================
    // Granularity and zoom
    // ========================================================================

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn set_granularity(&mut self, level: Granularity) {
        self.granularity = level;
    }

    /// Parses and sets a granularity by name.
    pub fn set_granularity_str(&mut self, level: &str) -> Result<()> {
        self.granularity = level.parse()?;
        Ok(())
    }

    pub fn zoom(&self) -> f64 {
        self.zoom.level()
    }

    pub fn set_zoom(&mut self, level: f64) -> f64 {
        self.zoom.set(level);
        self.refresh_viewport();
        self.zoom()
    }

    pub fn zoom_in(&mut self) -> f64 {
        self.zoom.zoom_in();
        self.refresh_viewport();
        self.zoom()
    }

    pub fn zoom_out(&mut self) -> f64 {
        self.zoom.zoom_out();
        self.refresh_viewport();
        self.zoom()
    }

    // ========================================================================
    // Viewport
    // ========================================================================

    fn refresh_viewport(&mut self) {
        self.viewport =
            ViewportRect::from_scroll(self.scroll.0, self.scroll.1, self.container, self.zoom());
    }

    /// Records a scroll or resize. Returns true when the accumulated scroll
    /// distance forced a cache invalidation.
    pub fn update_viewport(
        &mut self,
        scroll_top: f64,
        scroll_left: f64,
        container: ContainerSize,
    ) -> bool {
        self.scroll = (scroll_top, scroll_left);
        self.container = container;
        self.refresh_viewport();

        let moved = self.tracker.observe(scroll_top, scroll_left);
        if moved {
            self.cache.invalidate();
        }
        moved
    }

    pub fn viewport(&self) -> &ViewportRect {
        &self.viewport
    }

    /// Hides or shows boundaries; hidden boundaries are never reported
    /// visible.
    pub fn set_show_bounds(&mut self, show: bool) {
        self.show_bounds = show;
    }

    // ========================================================================
    // Boundaries
    // ========================================================================

    /// Forces the next boundary request to recompute.
    pub fn invalidate_cache(&mut self) {
        self.bump_revision();
    }

    /// Boundaries for the current granularity and zoom.
    ///
    /// A recompute re-anchors the scroll tracker at the current position.
    pub fn boundaries(&mut self) -> &[Boundary] {
        let key = CacheKey::new(self.granularity, self.zoom.level(), self.revision);
        if self.cache.key() != Some(key) {
            self.tracker.reset(self.scroll.0, self.scroll.1);
        }
        let (document, records, params) = (&self.document, &self.records, &self.params);
        self.cache.get_or_compute(key, || {
            crate::boundary::compute_boundaries(document, key.level, records, key.zoom.0, params)
        })
    }

    /// The boundaries overlapping the padded viewport.
    pub fn visible_boundaries(&mut self) -> Vec<VisibleBoundary<'_>> {
        if !self.show_bounds {
            return Vec::new();
        }
        let viewport = self.viewport;
        let padding = self.params.viewport_padding;
        let y_axis_offset = self.params.y_axis_offset;
        visible_boundaries(self.boundaries(), &viewport, padding, y_axis_offset)
    }

    // ========================================================================
    // Coordinate grid
    // ========================================================================

    pub fn system_width(&self) -> f64 {
        system_width(self.image_dimensions().0, &self.params)
    }

    pub fn system_height(&self) -> f64 {
        system_height(self.image_dimensions().1, &self.params)
    }

    pub fn x_axis_labels(&self) -> Vec<AxisLabel> {
        x_axis_labels(self.image_dimensions().0, &self.params)
    }

    pub fn y_axis_labels(&self) -> Vec<AxisLabel> {
        y_axis_labels(self.image_dimensions().1, &self.params)
    }

    // ========================================================================
    // Text
    // ========================================================================

    /// Reconstructed text of every node at the current granularity.
    pub fn text(&self) -> String {
        document_text(
            &self.document,
            self.granularity,
            &self.records,
            self.zoom.level(),
            &self.params,
        )
    }

    /// Accepted records joined by their break hints.
    pub fn filtered_text(&self) -> String {
        filtered_text(&self.records)
    }

    /// Accepted records laid out in the requested mode and language.
    pub fn export_text(&self, options: &TextOptions) -> String {
        export_text(&self.document, &self.records, options, self.params.min_vertices)
    }
}
