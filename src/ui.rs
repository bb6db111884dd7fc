use crate::app::DashboardView;
use crate::chart::{plot_series, BrailleCanvas};
use crate::data::StatisticMode;
use crate::derive::{RankedRegion, TOP_DISTRICTS};
use crate::state::Span as Rows;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph, Widget},
    Frame,
};

const HEADER_ROWS: u16 = 1;
const STATUS_ROWS: u16 = 1;

const SWITCHER_ROWS: u16 = 5;
const MINIGRAPH_ROWS: u16 = 6;
const TILE_ROWS: u16 = 2;
const META_ROWS: u16 = 10;

const BAR_GRAPH_ROWS: u16 = 9;
const TOGGLE_ROWS: u16 = 1;

/// Rows available to the two columns
pub fn body_rows(height: u16) -> u16 {
    height.saturating_sub(HEADER_ROWS + STATUS_ROWS)
}

/// (left, right) column widths in cells
pub fn column_widths(width: u16) -> (u16, u16) {
    let left = (width as u32 * 55 / 100) as u16;
    (left, width - left)
}

/// Scrollable left column, in content rows
#[derive(Debug, Clone, Copy)]
pub struct LeftColumn {
    pub switcher: Rows,
    pub minigraphs: Rows,
    pub map: Rows,
    /// Zero-height marker where the meta panel begins
    pub meta_anchor: Rows,
    pub meta: Rows,
}

impl LeftColumn {
    pub fn new(map_grid_rows: usize) -> Self {
        let switcher = Rows::new(0, SWITCHER_ROWS);
        let minigraphs = Rows::new(switcher.start + switcher.len, MINIGRAPH_ROWS);
        let map_len = 2 + (map_grid_rows.max(1) as u16).saturating_mul(TILE_ROWS);
        let map = Rows::new(minigraphs.start + minigraphs.len, map_len);
        let meta_start = map.start.saturating_add(map.len);
        Self {
            switcher,
            minigraphs,
            map,
            meta_anchor: Rows::new(meta_start, 0),
            meta: Rows::new(meta_start, META_ROWS),
        }
    }

    pub fn height(&self) -> u16 {
        self.meta.start.saturating_add(self.meta.len)
    }
}

/// Fixed right column; the explorer takes whatever is left
#[derive(Debug, Clone, Copy)]
pub struct RightColumn {
    pub district_bar: Rows,
    pub bar_graph: Rows,
    pub toggle: Rows,
    pub explorer: Rows,
}

impl RightColumn {
    pub fn new(list_rows: usize, body_rows: u16) -> Self {
        // Borders plus one line for the all-clear banner
        let district_bar = Rows::new(0, 3 + list_rows.max(1) as u16);
        let bar_graph = Rows::new(district_bar.len, BAR_GRAPH_ROWS);
        let toggle = Rows::new(bar_graph.start + bar_graph.len, TOGGLE_ROWS);
        let explorer_start = toggle.start + toggle.len;
        Self {
            district_bar,
            bar_graph,
            toggle,
            explorer: Rows::new(explorer_start, body_rows.saturating_sub(explorer_start)),
        }
    }
}

/// Render the whole dashboard
pub fn render(frame: &mut Frame, view: &DashboardView) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_ROWS),
            Constraint::Min(3),
            Constraint::Length(STATUS_ROWS),
        ])
        .split(area);

    let (left_width, _) = column_widths(chunks[1].width);
    let body = chunks[1];
    let left = Rect::new(body.x, body.y, left_width, body.height);
    let right = Rect::new(body.x + left_width, body.y, body.width - left_width, body.height);

    render_header(frame, view, chunks[0]);
    render_left(frame, view, left);
    render_right(frame, view, right);
    render_status_bar(frame, view, chunks[2]);
}

/// Screen rect for a content span of a column scrolled by `scroll` rows.
/// Sections scrolled partly off the top are skipped; ones running off the bottom are clipped.
fn place(column: Rect, rows: Rows, scroll: u16) -> Option<Rect> {
    if rows.len == 0 || rows.start < scroll {
        return None;
    }
    let top = rows.start - scroll;
    if top >= column.height {
        return None;
    }
    let height = rows.len.min(column.height - top);
    Some(Rect::new(column.x, column.y + top, column.width, height))
}

fn render_left(frame: &mut Frame, view: &DashboardView, column: Rect) {
    let layout = LeftColumn::new(view.map_grid.rows);

    if let Some(rect) = place(column, layout.switcher, view.scroll) {
        render_switcher(frame, view, rect);
    }
    if let Some(rect) = place(column, layout.minigraphs, view.scroll) {
        render_minigraphs(frame, view, rect);
    }
    if let Some(rect) = place(column, layout.map, view.scroll) {
        render_map(frame, view, rect);
    }
    if let Some(rect) = place(column, layout.meta, view.scroll) {
        render_meta(frame, view, rect);
    }
}

fn render_right(frame: &mut Frame, view: &DashboardView, column: Rect) {
    let list_rows = if view.expanded {
        view.list_grid.rows
    } else {
        TOP_DISTRICTS
    };
    let layout = RightColumn::new(list_rows, column.height);

    if let Some(rect) = place(column, layout.district_bar, 0) {
        render_district_bar(frame, view, rect);
    }
    if let Some(rect) = place(column, layout.bar_graph, 0) {
        render_bar_graph(frame, view, rect);
    }
    if let Some(rect) = place(column, layout.toggle, 0) {
        render_toggle(frame, view, rect);
    }
    if let Some(rect) = place(column, layout.explorer, 0) {
        render_explorer(frame, view, rect);
    }
}

fn mode_color(mode: StatisticMode) -> Color {
    match mode {
        StatisticMode::Confirmed => Color::Red,
        StatisticMode::Active => Color::Blue,
        StatisticMode::Recovered => Color::Green,
        StatisticMode::Deceased => Color::Gray,
    }
}

fn panel(title: String, color: Color) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            title,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
}

fn render_header(frame: &mut Frame, view: &DashboardView, area: Rect) {
    let mut spans = vec![Span::styled(
        format!(" Coronavirus Outbreak in {} ", view.region_name),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )];
    if let Some(updated) = &view.last_updated {
        spans.push(Span::styled(
            format!("updated {updated}"),
            Style::default().fg(Color::DarkGray),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Statistic switcher with the headline figure for each mode
fn render_switcher(frame: &mut Frame, view: &DashboardView, area: Rect) {
    let block = panel(" Statistic ".to_string(), Color::Cyan);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let cells = Layout::horizontal([Constraint::Ratio(1, 4); 4]).split(inner);
    for (i, mode) in StatisticMode::ALL.into_iter().enumerate() {
        let color = mode_color(mode);
        let mut label_style = Style::default().fg(color);
        if mode == view.mode {
            label_style = label_style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
        }
        let entry = view.level.as_ref().map(|level| level[i]);
        let total = entry.map(|e| format_count(e.total)).unwrap_or_else(|| "-".to_string());
        let delta = match entry {
            Some(e) if mode.shows_delta() && e.delta > 0 => format!("+{}", format_count(e.delta)),
            _ => String::new(),
        };
        let lines = vec![
            Line::from(Span::styled(format!("{} {}", i + 1, mode.as_str()), label_style)),
            Line::from(Span::styled(total, Style::default().fg(color).add_modifier(Modifier::BOLD))),
            Line::from(Span::styled(delta, Style::default().fg(color))),
        ];
        frame.render_widget(Paragraph::new(lines), cells[i]);
    }
}

fn render_minigraphs(frame: &mut Frame, view: &DashboardView, area: Rect) {
    let block = panel(" Daily change ".to_string(), Color::Cyan);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let cells = Layout::horizontal([Constraint::Ratio(1, 4); 4]).split(inner);
    for (i, (mode, values)) in view.minigraphs.iter().enumerate().take(cells.len()) {
        let cell = cells[i];
        // Leave a gap between graphs
        let plot = Rect::new(cell.x, cell.y, cell.width.saturating_sub(1), cell.height);
        frame.render_widget(
            SeriesWidget {
                values,
                color: mode_color(*mode),
            },
            plot,
        );
    }
}

/// District tiles, largest first, laid out by the grid plan
fn render_map(frame: &mut Frame, view: &DashboardView, area: Rect) {
    let block = panel(format!(" Districts · {} ", view.mode), mode_color(view.mode));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if view.map_tiles.is_empty() {
        let message = if view.snapshot_loaded {
            "No district breakdown"
        } else {
            "Loading…"
        };
        frame.render_widget(
            Paragraph::new(Span::styled(message, Style::default().fg(Color::DarkGray))),
            inner,
        );
        return;
    }

    let plan = view.map_grid;
    let tile_width = inner.width / plan.columns.max(1) as u16;
    let max = view.map_tiles.first().map(|t| t.total).unwrap_or(0).max(1);
    let color = mode_color(view.mode);

    for (index, tile) in view.map_tiles.iter().enumerate() {
        let (col, row) = plan.cell(index);
        let x = inner.x + col as u16 * tile_width;
        let y = inner.y + row as u16 * TILE_ROWS;
        if y + TILE_ROWS > inner.y + inner.height {
            continue;
        }
        let rect = Rect::new(x, y, tile_width.saturating_sub(1), TILE_ROWS);

        let share = tile.total as f64 / max as f64;
        let mut style = Style::default().fg(color);
        if share >= 0.5 {
            style = style.add_modifier(Modifier::BOLD);
        } else if share < 0.1 {
            style = style.add_modifier(Modifier::DIM);
        }
        if view.highlight.matches(&tile.name) {
            style = style.add_modifier(Modifier::REVERSED);
        }

        let lines = vec![
            Line::from(Span::styled(tile.name.clone(), style)),
            Line::from(Span::styled(format_count(tile.total), style)),
        ];
        frame.render_widget(Paragraph::new(lines), rect);
    }
}

fn render_meta(frame: &mut Frame, view: &DashboardView, area: Rect) {
    let Some(meta) = &view.meta else {
        // Not activated yet, or data still loading
        return;
    };
    let block = panel(format!(" {} at a glance ", view.region_name), Color::Cyan);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let figure = |value: Option<f64>, suffix: &str| match value {
        Some(v) => format!("{v:.2}{suffix}"),
        None => "-".to_string(),
    };
    let label = Style::default().fg(Color::DarkGray);
    let row = |name: &'static str, value: String| {
        Line::from(vec![Span::styled(format!("{name:<24}"), label), Span::raw(value)])
    };

    let lines = vec![
        row(
            "Population",
            meta.population.map(|p| format_count(p as i64)).unwrap_or_else(|| "-".to_string()),
        ),
        row("Confirmed per million", figure(meta.confirmed_per_million, "")),
        row("Tests per million", figure(meta.tests_per_million, "")),
        row("Active ratio", figure(meta.active_ratio, "%")),
        row("Recovery ratio", figure(meta.recovery_ratio, "%")),
        row("Case fatality ratio", figure(meta.case_fatality_ratio, "%")),
        row("Avg. growth rate", figure(meta.growth_rate, "% per day")),
        row(
            "Last updated",
            meta.last_updated.clone().unwrap_or_else(|| "-".to_string()),
        ),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

fn district_entry(entry: &RankedRegion, view: &DashboardView) -> Line<'static> {
    let color = mode_color(view.mode);
    let mut name_style = Style::default();
    if view.highlight.matches(&entry.name) {
        name_style = name_style.add_modifier(Modifier::REVERSED);
    }
    let mut spans = vec![
        Span::styled(
            format!("{:>9} ", format_count(entry.total)),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::styled(entry.name.clone(), name_style),
    ];
    if let Some(delta) = entry.delta_indicator(view.mode) {
        spans.push(Span::styled(
            format!(" ↑{}", format_count(delta)),
            Style::default().fg(color),
        ));
    }
    Line::from(spans)
}

fn render_district_bar(frame: &mut Frame, view: &DashboardView, area: Rect) {
    let title = if view.expanded { " All districts " } else { " Top districts " };
    let block = panel(title.to_string(), mode_color(view.mode));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if view.districts.is_empty() {
        let message = if view.snapshot_loaded {
            "No district data for this region"
        } else {
            "Loading…"
        };
        frame.render_widget(
            Paragraph::new(Span::styled(message, Style::default().fg(Color::DarkGray))),
            inner,
        );
    } else if view.expanded {
        let plan = view.list_grid;
        let column_width = inner.width / plan.columns.max(1) as u16;
        for (index, entry) in view.districts.iter().enumerate() {
            let (col, row) = plan.cell(index);
            let y = inner.y + row as u16;
            if y >= inner.y + inner.height.saturating_sub(1) {
                continue;
            }
            let rect = Rect::new(inner.x + col as u16 * column_width, y, column_width, 1);
            frame.render_widget(Paragraph::new(district_entry(entry, view)), rect);
        }
    } else {
        let lines: Vec<Line> = view.districts.iter().map(|e| district_entry(e, view)).collect();
        frame.render_widget(Paragraph::new(lines), inner);
    }

    if view.quiet_streak && inner.height > 0 {
        let banner = Rect::new(inner.x, inner.y + inner.height - 1, inner.width, 1);
        let color = if view.mode == StatisticMode::Confirmed {
            Color::Green
        } else {
            Color::Gray
        };
        frame.render_widget(
            Paragraph::new(Span::styled(
                format!("☺ No new {} cases in the past five days", view.mode),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
            banner,
        );
    }
}

/// Daily deltas over the lookback window
fn render_bar_graph(frame: &mut Frame, view: &DashboardView, area: Rect) {
    let color = mode_color(view.mode);
    let block = panel(format!(" Last {} days ", view.lookback.days()), color);

    let bars: Vec<Bar> = view
        .delta_bars
        .iter()
        .map(|(date, delta)| {
            let day = date.rsplit('-').next().unwrap_or(date).to_string();
            Bar::default()
                .value((*delta).max(0) as u64)
                .text_value(format_count(*delta))
                .label(Line::from(day))
                .style(Style::default().fg(color))
                .value_style(Style::default().fg(Color::White))
        })
        .collect();

    let count = bars.len().max(1) as u16;
    let bar_width = (area.width.saturating_sub(2) / count).saturating_sub(1).clamp(1, 8);
    let max = view
        .delta_bars
        .iter()
        .map(|(_, d)| (*d).max(0) as u64)
        .max()
        .unwrap_or(0)
        .max(1);

    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .max(max)
        .bar_gap(1)
        .bar_width(bar_width);
    frame.render_widget(chart, area);
}

fn render_toggle(frame: &mut Frame, view: &DashboardView, area: Rect) {
    if !view.has_overflow {
        return;
    }
    let label = if view.expanded { " [v] View less" } else { " [v] View all" };
    frame.render_widget(
        Paragraph::new(Span::styled(label, Style::default().fg(Color::Yellow))),
        area,
    );
}

/// Cumulative series for the selected statistic, titled with the highlight
fn render_explorer(frame: &mut Frame, view: &DashboardView, area: Rect) {
    let color = mode_color(view.mode);
    let title = match view.matched_highlight() {
        Some(district) => format!(" {} › {} · {} ", view.region_name, district, view.mode),
        None => format!(" {} · {} ", view.region_name, view.mode),
    };
    let block = panel(title, color);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(series) = &view.explorer else {
        frame.render_widget(
            Paragraph::new(Span::styled("Loading timeseries…", Style::default().fg(Color::DarkGray))),
            inner,
        );
        return;
    };
    if series.is_empty() || inner.height < 2 {
        return;
    }

    let plot = Rect::new(inner.x, inner.y, inner.width, inner.height - 1);
    let values: Vec<i64> = series.iter().map(|(_, v)| *v).collect();
    frame.render_widget(SeriesWidget { values: &values, color }, plot);

    let first = &series[0].0;
    let (last_date, last_value) = &series[series.len() - 1];
    let axis = Line::from(vec![
        Span::styled(first.clone(), Style::default().fg(Color::DarkGray)),
        Span::raw(" … "),
        Span::styled(last_date.clone(), Style::default().fg(Color::DarkGray)),
        Span::styled(format!("  {}", format_count(*last_value)), Style::default().fg(color)),
    ]);
    let axis_rect = Rect::new(inner.x, inner.y + inner.height - 1, inner.width, 1);
    frame.render_widget(Paragraph::new(axis), axis_rect);
}

/// Braille line plot of a series
struct SeriesWidget<'a> {
    values: &'a [i64],
    color: Color,
}

impl Widget for SeriesWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut canvas = BrailleCanvas::new(area.width as usize, area.height as usize);
        plot_series(&mut canvas, self.values);

        for (row_idx, row) in canvas.rows().enumerate() {
            let y = area.y + row_idx as u16;
            for (col_idx, ch) in row.chars().enumerate() {
                // Blank braille cells leave the background alone
                if ch == '\u{2800}' {
                    continue;
                }
                let x = area.x + col_idx as u16;
                buf[(x, y)].set_char(ch).set_fg(self.color);
            }
        }
    }
}

fn render_status_bar(frame: &mut Frame, view: &DashboardView, area: Rect) {
    let dim = Style::default().fg(Color::DarkGray);
    let mut spans = vec![
        Span::styled(" Region: ", dim),
        Span::styled(view.region.clone(), Style::default().fg(Color::Yellow)),
        Span::styled(" | Mode: ", dim),
        Span::styled(view.mode.as_str(), Style::default().fg(mode_color(view.mode))),
    ];
    if !view.timeseries_loaded {
        spans.push(Span::styled(" | timeseries pending", Style::default().fg(Color::Magenta)));
    }
    spans.push(Span::styled(
        " | m/1-4:mode ←→:district esc:clear v:view [ ]:region PgUp/PgDn:scroll r/R:reload q:quit",
        dim,
    ));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Group digits the Indian way: 12,34,567
pub fn format_count(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let (head, tail) = if digits.len() > 3 {
        digits.split_at(digits.len() - 3)
    } else {
        ("", digits.as_str())
    };

    let mut groups: Vec<&str> = Vec::new();
    let mut rest = head;
    while rest.len() > 2 {
        let (left, right) = rest.split_at(rest.len() - 2);
        groups.push(right);
        rest = left;
    }
    if !rest.is_empty() {
        groups.push(rest);
    }
    groups.reverse();
    groups.push(tail);

    let sign = if value < 0 { "-" } else { "" };
    format!("{sign}{}", groups.join(","))
}
