use std::f64::consts::{FRAC_PI_2, TAU};

use eframe::egui::{Color32, RichText, Stroke, Ui};
use egui_plot::{
    Bar, BarChart as PlotBarChart, Legend, Line, LineStyle, MarkerShape, Plot, PlotPoint,
    PlotPoints, Points, Polygon, Text, VLine,
};

use crate::charts::{
    BOTTOM_COLOR, BarChart, ChoroplethChart, HeatmapChart, Marker, RadarChart, RankingChart,
    ScatterChart, TOP_COLOR, TimeSeriesChart,
};
use crate::color::{ContinuousScale, generate_palette, series_color, to_color32};
use crate::geo::WorldShapes;

const CHART_HEIGHT: f32 = 320.0;

/// Columns of the tile grid drawn when no country outlines are loaded.
const TILE_COLUMNS: usize = 16;

fn marker_shape(marker: Marker) -> MarkerShape {
    match marker {
        Marker::Circle => MarkerShape::Circle,
        Marker::Square => MarkerShape::Square,
    }
}

fn square(x: f64, y: f64, half: f64) -> PlotPoints<'static> {
    PlotPoints::new(vec![
        [x - half, y - half],
        [x + half, y - half],
        [x + half, y + half],
        [x - half, y + half],
    ])
}

/// Axis formatter that shows `labels[i]` at integer position `i`.
fn category_labels(labels: Vec<String>) -> impl Fn(egui_plot::GridMark, &std::ops::RangeInclusive<f64>) -> String {
    move |mark, _range| {
        let v = mark.value;
        if v.fract().abs() > 1e-6 || v < 0.0 {
            return String::new();
        }
        labels.get(v as usize).cloned().unwrap_or_default()
    }
}

fn empty_notice(ui: &mut Ui, title: &str) {
    ui.strong(title);
    ui.label(RichText::new("No data for this selection.").weak());
}

// ---------------------------------------------------------------------------
// Choropleth
// ---------------------------------------------------------------------------

/// Render the map. Returns the code of a clicked country.
pub fn choropleth(ui: &mut Ui, chart: &ChoroplethChart, shapes: &WorldShapes) -> Option<String> {
    ui.strong(&chart.title);
    let Some(range) = chart.range else {
        ui.label(RichText::new("No data for this selection.").weak());
        return None;
    };
    let scale = ContinuousScale::viridis(range.min, range.max);
    if shapes.is_empty() {
        return tile_map(ui, chart, &scale, (range.min, range.max));
    }

    let response = Plot::new("choropleth")
        .height(420.0)
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .allow_scroll(false)
        .include_x(-180.0)
        .include_x(180.0)
        .include_y(-60.0)
        .include_y(85.0)
        .label_formatter(|_, _| String::new())
        .show(ui, |plot_ui| {
            for region in &chart.regions {
                let Some(shape) = shapes.get(&region.code) else {
                    continue;
                };
                let fill = scale.color_for(region.value);
                for ring in &shape.rings {
                    plot_ui.polygon(
                        Polygon::new(PlotPoints::new(ring.clone()))
                            .fill_color(fill)
                            .stroke(Stroke::new(0.5, Color32::WHITE)),
                    );
                }
            }
            plot_ui.pointer_coordinate()
        });

    let hovered = response
        .inner
        .and_then(|p| shapes.hit([p.x, p.y]))
        .and_then(|code| chart.regions.iter().find(|r| r.code == code));
    let clicked = response.response.clicked();
    if let Some(region) = hovered {
        response
            .response
            .on_hover_text(format!("{}\n{}: {:.2}", region.country, chart.unit, region.value));
    }
    color_legend(ui, &scale, range.min, range.max, &chart.unit);

    if clicked {
        hovered.map(|r| r.code.clone())
    } else {
        None
    }
}

/// One coloured tile per country, ordered by code.
fn tile_map(
    ui: &mut Ui,
    chart: &ChoroplethChart,
    scale: &ContinuousScale,
    (lo, hi): (f64, f64),
) -> Option<String> {
    let mut regions: Vec<_> = chart.regions.iter().collect();
    regions.sort_by(|a, b| a.code.cmp(&b.code));
    let position = |i: usize| ((i % TILE_COLUMNS) as f64, -((i / TILE_COLUMNS) as f64));

    let response = Plot::new("choropleth_tiles")
        .height(420.0)
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .allow_scroll(false)
        .label_formatter(|_, _| String::new())
        .show(ui, |plot_ui| {
            for (i, region) in regions.iter().enumerate() {
                let (x, y) = position(i);
                plot_ui.polygon(
                    Polygon::new(square(x, y, 0.45))
                        .fill_color(scale.color_for(region.value))
                        .stroke(Stroke::new(0.5, Color32::WHITE)),
                );
                plot_ui.text(Text::new(PlotPoint::new(x, y), RichText::new(&region.code).small()).color(Color32::WHITE));
            }
            plot_ui.pointer_coordinate()
        });

    let hovered = response.inner.and_then(|p| {
        let col = p.x.round();
        let row = (-p.y).round();
        if col < 0.0 || row < 0.0 || col >= TILE_COLUMNS as f64 {
            return None;
        }
        regions.get(row as usize * TILE_COLUMNS + col as usize).copied()
    });
    let clicked = response.response.clicked();
    if let Some(region) = hovered {
        response
            .response
            .on_hover_text(format!("{}\n{}: {:.2}", region.country, chart.unit, region.value));
    }
    color_legend(ui, scale, lo, hi, &chart.unit);

    if clicked {
        hovered.map(|r| r.code.clone())
    } else {
        None
    }
}

/// Horizontal colour bar with end labels.
fn color_legend(ui: &mut Ui, scale: &ContinuousScale, lo: f64, hi: f64, unit: &str) {
    const STEPS: usize = 24;
    ui.horizontal(|ui: &mut Ui| {
        ui.label(format!("{lo:.2}"));
        ui.spacing_mut().item_spacing.x = 0.0;
        for i in 0..STEPS {
            let v = lo + (hi - lo) * i as f64 / (STEPS - 1) as f64;
            ui.label(RichText::new("█").color(scale.color_for(v)));
        }
        ui.spacing_mut().item_spacing.x = 6.0;
        ui.label(format!("{hi:.2}  {unit}"));
    });
}

// ---------------------------------------------------------------------------
// Bar charts
// ---------------------------------------------------------------------------

pub fn bar_chart(ui: &mut Ui, id: &str, chart: &BarChart) {
    if chart.bars.is_empty() {
        empty_notice(ui, &chart.title);
        return;
    }
    ui.strong(&chart.title);
    let colors = generate_palette(chart.bars.len());
    let labels: Vec<String> = chart.bars.iter().map(|b| b.label.clone()).collect();

    Plot::new(id)
        .height(CHART_HEIGHT)
        .allow_scroll(false)
        .allow_drag(false)
        .include_y(0.0)
        .y_axis_label(chart.y_label.clone())
        .x_axis_formatter(category_labels(labels))
        .show(ui, |plot_ui| {
            for (i, (bar, color)) in chart.bars.iter().zip(colors).enumerate() {
                let x = i as f64;
                plot_ui.bar_chart(
                    PlotBarChart::new(vec![Bar::new(x, bar.value).width(0.7).fill(color)])
                        .name(&bar.label)
                        .color(color),
                );
                plot_ui.text(Text::new(PlotPoint::new(x, bar.value), format!("{:.2}", bar.value)));
            }
        });
}

pub fn ranking(ui: &mut Ui, chart: &RankingChart) {
    if chart.top.is_empty() {
        empty_notice(ui, &chart.title);
        return;
    }
    ui.strong(&chart.title);

    // One empty slot separates the two groups.
    let mut labels: Vec<String> = chart.top.iter().map(|c| c.code.clone()).collect();
    labels.push(String::new());
    labels.extend(chart.bottom.iter().map(|c| c.code.clone()));

    let bars = |countries: &[crate::charts::RankedCountry], offset: usize, color: Color32| {
        countries
            .iter()
            .enumerate()
            .map(|(i, c)| {
                Bar::new((offset + i) as f64, c.value)
                    .width(0.8)
                    .fill(color)
                    .name(format!("{} ({})", c.country, c.code))
            })
            .collect::<Vec<_>>()
    };
    let top_color = to_color32(TOP_COLOR).gamma_multiply(0.6);
    let bottom_color = to_color32(BOTTOM_COLOR).gamma_multiply(0.6);
    let top = bars(&chart.top, 0, top_color);
    let bottom = bars(&chart.bottom, chart.top.len() + 1, bottom_color);

    Plot::new("ranking")
        .height(CHART_HEIGHT + 60.0)
        .legend(Legend::default())
        .allow_scroll(false)
        .include_y(0.0)
        .y_axis_label(chart.y_label.clone())
        .x_axis_label("Countries (averages)")
        .x_axis_formatter(category_labels(labels))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(PlotBarChart::new(top).name("Top 10 countries").color(top_color));
            plot_ui.bar_chart(PlotBarChart::new(bottom).name("Bottom 10 countries").color(bottom_color));
        });
}

// ---------------------------------------------------------------------------
// Line charts
// ---------------------------------------------------------------------------

pub fn time_series(ui: &mut Ui, id: &str, chart: &TimeSeriesChart) {
    if chart.is_empty() {
        empty_notice(ui, &chart.title);
        return;
    }
    ui.strong(&chart.title);

    let mut plot = Plot::new(id)
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .allow_scroll(false)
        .x_axis_label(chart.x_label.clone())
        .y_axis_label(chart.y_label.clone())
        .x_axis_formatter(|mark, _range| format!("{:.0}", mark.value));
    if let Some((lo, hi)) = chart.y_range {
        plot = plot.include_y(lo).include_y(hi);
    }

    plot.show(ui, |plot_ui| {
        for (i, series) in chart.series.iter().enumerate() {
            let color = series_color(i, series.color);
            plot_ui.line(
                Line::new(PlotPoints::new(series.points.clone()))
                    .name(&series.name)
                    .color(color)
                    .width(2.0),
            );
            plot_ui.points(
                Points::new(PlotPoints::new(series.points.clone()))
                    .name(&series.name)
                    .color(color)
                    .shape(marker_shape(series.marker))
                    .radius(3.5),
            );
        }
        if let Some(x) = chart.marker_x {
            plot_ui.vline(
                VLine::new(x)
                    .color(Color32::RED.gamma_multiply(0.5))
                    .style(LineStyle::dashed_loose()),
            );
        }
    });
}

// ---------------------------------------------------------------------------
// Radar
// ---------------------------------------------------------------------------

/// Cartesian position of `r` on the `k`-th of `n` axes, first axis up.
fn polar(r: f64, k: usize, n: usize) -> [f64; 2] {
    let angle = FRAC_PI_2 - TAU * k as f64 / n as f64;
    [r * angle.cos(), r * angle.sin()]
}

pub fn radar(ui: &mut Ui, chart: &RadarChart) {
    ui.strong(&chart.title);
    if chart.traces.is_empty() {
        ui.label(RichText::new("No data for this year.").weak());
        return;
    }
    let n = chart.axes.len();

    Plot::new("radar")
        .height(CHART_HEIGHT + 80.0)
        .data_aspect(1.0)
        .legend(Legend::default())
        .show_axes(false)
        .show_grid(false)
        .allow_scroll(false)
        .allow_drag(false)
        .include_x(-1.5)
        .include_x(1.5)
        .include_y(-1.3)
        .include_y(1.3)
        .show(ui, |plot_ui| {
            let grid = Color32::LIGHT_GRAY;
            for level in [0.25, 0.5, 0.75, 1.0] {
                let ring: Vec<[f64; 2]> = (0..=n).map(|k| polar(level, k % n, n)).collect();
                plot_ui.line(Line::new(PlotPoints::new(ring)).color(grid).width(0.5));
            }
            for (k, axis) in chart.axes.iter().enumerate() {
                plot_ui.line(
                    Line::new(PlotPoints::new(vec![[0.0, 0.0], polar(1.0, k, n)]))
                        .color(grid)
                        .width(0.4),
                );
                let [x, y] = polar(1.15, k, n);
                plot_ui.text(Text::new(PlotPoint::new(x, y), *axis));
            }

            for trace in &chart.traces {
                let color = to_color32(trace.color);
                let outline: Vec<[f64; 2]> = trace
                    .values
                    .iter()
                    .enumerate()
                    .map(|(k, &v)| polar(v, k, n))
                    .collect();
                plot_ui.polygon(
                    Polygon::new(PlotPoints::new(outline.clone()))
                        .name(&trace.name)
                        .fill_color(color.gamma_multiply(0.3))
                        .stroke(Stroke::new(1.5, color)),
                );
                plot_ui.points(
                    Points::new(PlotPoints::new(outline))
                        .name(&trace.name)
                        .color(color)
                        .shape(marker_shape(trace.marker))
                        .radius(4.0),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Correlation views
// ---------------------------------------------------------------------------

pub fn scatter(ui: &mut Ui, id: &str, chart: &ScatterChart) {
    if chart.points.is_empty() {
        empty_notice(ui, &chart.title);
        return;
    }
    ui.strong(&chart.title);

    let named: Vec<(String, f64, f64)> = chart
        .points
        .iter()
        .map(|p| (p.country.clone(), p.x, p.y))
        .collect();
    let coords: Vec<[f64; 2]> = chart.points.iter().map(|p| [p.x, p.y]).collect();
    let x_label = chart.x_label.clone();
    let y_label = chart.y_label.clone();

    Plot::new(id)
        .height(CHART_HEIGHT)
        .allow_scroll(false)
        .x_axis_label(chart.x_label.clone())
        .y_axis_label(chart.y_label.clone())
        .label_formatter(move |_, value| {
            let country = named
                .iter()
                .find(|(_, x, y)| (x - value.x).abs() < 1e-9 && (y - value.y).abs() < 1e-9)
                .map(|(c, _, _)| format!("{c}\n"))
                .unwrap_or_default();
            format!("{country}{x_label}: {:.3}\n{y_label}: {:.3}", value.x, value.y)
        })
        .show(ui, |plot_ui| {
            plot_ui.points(
                Points::new(PlotPoints::new(coords.clone()))
                    .color(series_color(0, None))
                    .radius(3.0)
                    .filled(true),
            );
            if let Some(fit) = chart.trend {
                let (lo, hi) = coords
                    .iter()
                    .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| (lo.min(p[0]), hi.max(p[0])));
                plot_ui.line(
                    Line::new(PlotPoints::new(vec![[lo, fit.predict(lo)], [hi, fit.predict(hi)]]))
                        .color(series_color(1, None))
                        .width(2.0)
                        .name("OLS trend"),
                );
            }
        });
}

pub fn heatmap(ui: &mut Ui, chart: &HeatmapChart) {
    ui.strong(&chart.title);
    let scale = ContinuousScale::red_blue(chart.range.0, chart.range.1);
    let x_labels: Vec<String> = chart.labels.iter().map(|l| l.to_string()).collect();
    // Row i is drawn at y = -i so the first label sits at the top.
    let y_labels = x_labels.clone();

    Plot::new("correlation_matrix")
        .height(CHART_HEIGHT + 220.0)
        .data_aspect(1.0)
        .show_grid(false)
        .allow_scroll(false)
        .allow_drag(false)
        .x_axis_label("Variables")
        .y_axis_label("Variables")
        .x_axis_formatter(category_labels(x_labels))
        .y_axis_formatter(move |mark, _range| {
            let v = -mark.value;
            if v.fract().abs() > 1e-6 || v < 0.0 {
                return String::new();
            }
            y_labels.get(v as usize).cloned().unwrap_or_default()
        })
        .label_formatter(|_, _| String::new())
        .show(ui, |plot_ui| {
            for (i, row) in chart.cells.iter().enumerate() {
                for (j, cell) in row.iter().enumerate() {
                    let (x, y) = (j as f64, -(i as f64));
                    let (fill, text) = match cell {
                        Some(r) => (scale.color_for(*r), format!("{r:.2}")),
                        None => (Color32::from_gray(220), String::new()),
                    };
                    plot_ui.polygon(Polygon::new(square(x, y, 0.5)).fill_color(fill).stroke(Stroke::NONE));
                    if !text.is_empty() {
                        let ink = if cell.is_some_and(|r| r.abs() > 0.6) {
                            Color32::WHITE
                        } else {
                            Color32::BLACK
                        };
                        plot_ui.text(Text::new(PlotPoint::new(x, y), RichText::new(text).small()).color(ink));
                    }
                }
            }
        });
    color_legend(ui, &scale, chart.range.0, chart.range.1, "Correlation");
}
