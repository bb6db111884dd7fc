use crate::config::DashboardConfig;
use crate::data::{
    self, Field, RefreshPolicy, Snapshot, SourceCache, StatisticMode, Timeseries,
};
use crate::derive::{
    self, cells_to_units, GridPlan, LevelEntry, Lookback, RankedRegion, StateMeta, TOP_DISTRICTS,
};
use crate::regions;
use crate::session::SessionStorage;
use crate::state::{HighlightCoordinator, RegionHighlight, Span, StatisticSelector, VisibilityLatch};
use crate::ui::{self, LeftColumn, RightColumn};
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;

/// Days of deltas behind each minigraph
const MINIGRAPH_DAYS: usize = 20;

/// Everything the panels need for one frame
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub region: String,
    pub region_name: String,
    pub last_updated: Option<String>,
    pub mode: StatisticMode,
    pub highlight: RegionHighlight,
    pub level: Option<[LevelEntry; 4]>,
    /// Ranked list panel: top five, or everything when expanded
    pub districts: Vec<RankedRegion>,
    pub list_grid: GridPlan,
    /// Map panel: every district in rank order
    pub map_tiles: Vec<RankedRegion>,
    pub map_grid: GridPlan,
    pub expanded: bool,
    pub has_overflow: bool,
    pub lookback: Lookback,
    /// Only ever true for modes that support the claim
    pub quiet_streak: bool,
    pub delta_bars: Vec<(String, i64)>,
    pub minigraphs: Vec<(StatisticMode, Vec<i64>)>,
    /// `None` until the explorer has been activated
    pub explorer: Option<Vec<(String, i64)>>,
    /// `None` until the meta panel is activated and both datasets are present
    pub meta: Option<StateMeta>,
    pub scroll: u16,
    pub snapshot_loaded: bool,
    pub timeseries_loaded: bool,
}

impl DashboardView {
    /// Highlighted sub-region, if it names a district of the current region
    pub fn matched_highlight(&self) -> Option<&str> {
        let name = self.highlight.sub_region.as_deref()?;
        self.map_tiles.iter().any(|t| t.name == name).then_some(name)
    }
}

/// Application state for one dashboard view
pub struct App {
    route: String,
    snapshot: SourceCache<Snapshot>,
    timeseries: SourceCache<Timeseries>,
    pub selector: StatisticSelector,
    pub highlight: HighlightCoordinator,
    expanded: bool,
    scroll: u16,
    width: u16,
    height: u16,
    meta_latch: VisibilityLatch,
    explorer_latch: VisibilityLatch,
    pub should_quit: bool,
}

impl App {
    pub fn new(
        config: &DashboardConfig,
        route: &str,
        session: Rc<SessionStorage>,
        width: u16,
        height: u16,
    ) -> Self {
        let route = regions::normalize_code(route);
        Self {
            snapshot: SourceCache::new(
                config.snapshot_path.clone(),
                RefreshPolicy::live(config.refresh_interval()),
                data::load_snapshot,
            ),
            timeseries: SourceCache::new(
                config.timeseries_path.clone(),
                RefreshPolicy::once(),
                data::load_timeseries,
            ),
            selector: StatisticSelector::new(session),
            highlight: HighlightCoordinator::new(route.clone()),
            route,
            expanded: false,
            scroll: 0,
            width,
            height,
            meta_latch: VisibilityLatch::new(),
            explorer_latch: VisibilityLatch::new(),
            should_quit: false,
        }
    }

    /// Initial load of both sources
    pub fn mount(&mut self, now: Instant) {
        self.snapshot.mount(now);
        self.timeseries.mount(now);
    }

    /// Called every loop iteration; only the live snapshot has a timer
    pub fn tick(&mut self, now: Instant) {
        self.snapshot.tick(now);
        self.timeseries.tick(now);
    }

    pub fn on_focus(&mut self, now: Instant) {
        self.snapshot.on_focus(now);
        self.timeseries.on_focus(now);
    }

    pub fn reload_snapshot(&mut self, now: Instant) {
        self.snapshot.invalidate(now);
    }

    pub fn reload_timeseries(&mut self, now: Instant) {
        self.timeseries.invalidate(now);
    }

    pub fn route(&self) -> &str {
        &self.route
    }

    /// Route to another parent region and run the highlight sync effect
    pub fn navigate(&mut self, code: &str) {
        let code = regions::normalize_code(code);
        if code == self.route {
            return;
        }
        tracing::info!(target: "region_pulse::app", from = %self.route, to = %code, "route.changed");
        self.route = code;
        self.scroll = 0;
        self.highlight.on_parent_region_context_change(&self.route);
    }

    /// Step to the previous/next region present in the snapshot
    pub fn cycle_region(&mut self, step: isize) {
        let Some(snapshot) = self.snapshot.current() else {
            return;
        };
        let codes: Vec<&str> = snapshot.keys().collect();
        if codes.is_empty() {
            return;
        }
        let len = codes.len() as isize;
        let next = match codes.iter().position(|c| *c == self.route) {
            Some(idx) => (idx as isize + step).rem_euclid(len),
            None => 0,
        };
        let code = codes[next as usize].to_string();
        self.navigate(&code);
    }

    pub fn set_mode(&mut self, mode: StatisticMode) {
        self.selector.set(mode);
    }

    pub fn cycle_mode(&mut self) {
        self.selector.cycle();
    }

    pub fn toggle_expanded(&mut self) {
        self.expanded = !self.expanded;
    }

    /// Move the map highlight through the districts in rank order
    pub fn step_highlight(&mut self, step: isize) {
        let order: Vec<String> = self.ranked(None).into_iter().map(|r| r.name).collect();
        self.highlight.step_highlight(&order, step);
    }

    pub fn clear_highlight(&mut self) {
        self.highlight.clear_highlight();
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.clamp_scroll();
    }

    pub fn scroll_by(&mut self, rows: i32) {
        self.scroll = (self.scroll as i32 + rows).clamp(0, u16::MAX as i32) as u16;
        self.clamp_scroll();
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Feed the current layout to the activation latches
    pub fn observe_visibility(&mut self) {
        let body = ui::body_rows(self.height);
        let left = self.left_column();
        let was_active = self.meta_latch.is_activated();
        if self.meta_latch.observe(left.meta_anchor, Span::new(self.scroll, body)) && !was_active {
            tracing::debug!(target: "region_pulse::app", region = %self.route, "meta.activated");
        }

        // The explorer also waits for its data
        if self.timeseries.current().is_some() {
            let right = self.right_column();
            self.explorer_latch.observe(right.explorer, Span::new(0, body));
        }
    }

    pub fn meta_activated(&self) -> bool {
        self.meta_latch.is_activated()
    }

    pub fn explorer_activated(&self) -> bool {
        self.explorer_latch.is_activated()
    }

    pub fn view(&self) -> DashboardView {
        let snapshot = self.snapshot.current();
        let timeseries = self.timeseries.current();
        let mode = self.selector.get();
        let lookback = Lookback::from_expanded(self.expanded);
        let region = self.snapshot_region_ref(&snapshot);

        let map_tiles = self.ranked(None);
        let districts = if self.expanded {
            map_tiles.clone()
        } else {
            map_tiles.iter().take(TOP_DISTRICTS).cloned().collect()
        };

        let quiet_streak = match &timeseries {
            Some(ts) if mode.supports_streak() => {
                derive::is_quiet_streak(ts, &self.route, mode, lookback.days())
            }
            _ => false,
        };

        let series = |field: Field, m: StatisticMode, window: Option<usize>| {
            timeseries
                .as_deref()
                .map(|ts| derive::daily_series(ts, &self.route, m, field, window))
                .unwrap_or_default()
        };

        let minigraphs = StatisticMode::ALL
            .iter()
            .map(|&m| {
                let values = series(Field::Delta, m, Some(MINIGRAPH_DAYS))
                    .into_iter()
                    .map(|(_, v)| v)
                    .collect();
                (m, values)
            })
            .collect();

        let explorer = self
            .explorer_latch
            .is_activated()
            .then(|| series(Field::Total, mode, None));

        let meta = match (&snapshot, &timeseries) {
            (Some(s), Some(ts)) if self.meta_latch.is_activated() => {
                derive::summarize(s, ts, &self.route)
            }
            _ => None,
        };

        DashboardView {
            region: self.route.clone(),
            region_name: regions::region_name(&self.route).to_string(),
            last_updated: region.and_then(|r| r.meta.last_updated.clone()),
            mode,
            highlight: self.highlight.get(),
            level: snapshot.as_deref().and_then(|s| derive::level(s, &self.route)),
            list_grid: derive::plan_rows(districts.len(), cells_to_units(self.right_width())),
            districts,
            map_grid: self.map_grid(),
            map_tiles,
            expanded: self.expanded,
            has_overflow: snapshot
                .as_deref()
                .is_some_and(|s| derive::has_overflow(s, &self.route)),
            lookback,
            quiet_streak,
            delta_bars: series(Field::Delta, mode, Some(lookback.days())),
            minigraphs,
            explorer,
            meta,
            scroll: self.scroll,
            snapshot_loaded: snapshot.is_some(),
            timeseries_loaded: timeseries.is_some(),
        }
    }

    fn snapshot_region_ref<'a>(
        &self,
        snapshot: &'a Option<Arc<Snapshot>>,
    ) -> Option<&'a data::RegionSnapshot> {
        snapshot.as_deref().and_then(|s| s.get(&self.route))
    }

    fn ranked(&self, limit: Option<usize>) -> Vec<RankedRegion> {
        self.snapshot
            .current()
            .map(|s| derive::rank(&s, &self.route, self.selector.get(), limit))
            .unwrap_or_default()
    }

    fn map_grid(&self) -> GridPlan {
        let count = self
            .snapshot
            .current()
            .map(|s| derive::district_count(&s, &self.route))
            .unwrap_or(0);
        let (left_width, _) = ui::column_widths(self.width);
        derive::plan_rows(count, cells_to_units(left_width))
    }

    /// The district list lives in the right column
    fn right_width(&self) -> u16 {
        ui::column_widths(self.width).1
    }

    fn left_column(&self) -> LeftColumn {
        LeftColumn::new(self.map_grid().rows)
    }

    fn right_column(&self) -> RightColumn {
        let list_rows = if self.expanded {
            let count = self
                .snapshot
                .current()
                .map(|s| derive::district_count(&s, &self.route))
                .unwrap_or(0);
            derive::plan_rows(count, cells_to_units(self.right_width())).rows
        } else {
            TOP_DISTRICTS
        };
        RightColumn::new(list_rows, ui::body_rows(self.height))
    }

    fn clamp_scroll(&mut self) {
        let max = self
            .left_column()
            .height()
            .saturating_sub(ui::body_rows(self.height));
        self.scroll = self.scroll.min(max);
    }
}
