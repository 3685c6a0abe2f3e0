use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::charts::{comparison, correlation, intro};
use crate::data::loader::DEFAULT_EXPORT_FILE;
use crate::data::model::{Indicator, MentalHealthTable};
use crate::state::AppState;
use crate::ui::plot;

const INDICATOR_NOTES: [(&str, &str); 3] = [
    (
        "Freedom Index",
        "Composite index evaluating political rights, civil liberties, and overall democratic freedom. \
         Higher values represent countries where individuals enjoy more personal and societal freedoms.",
    ),
    (
        "Alcohol Consumption",
        "Average annual liters of pure alcohol consumed per adult (15+). \
         A health and behavioral indicator often correlated with social patterns and well-being.",
    ),
    (
        "Gender Inequality Index",
        "Measures inequality in reproductive health, empowerment, and labor market participation. \
         Higher values indicate greater inequality between men and women.",
    ),
];

fn section_heading(ui: &mut Ui, title: &str, blurb: &str) {
    ui.add_space(12.0);
    ui.heading(RichText::new(title).strong());
    ui.label(RichText::new(blurb).weak());
    ui.separator();
}

fn illness_combo(ui: &mut Ui, id: &str, selected: &mut Indicator) {
    egui::ComboBox::from_id_salt(id)
        .selected_text(selected.label())
        .show_ui(ui, |ui: &mut Ui| {
            for ind in Indicator::ILLNESSES {
                ui.selectable_value(selected, ind, ind.label());
            }
        });
}

// ---------------------------------------------------------------------------
// Left side panel – indicator notes and dataset summary
// ---------------------------------------------------------------------------

/// Render the left information panel.
pub fn side_panel(ui: &mut Ui, state: &AppState) {
    ui.heading("World Mental Health");
    ui.separator();

    ui.strong("Indicators");
    for (name, text) in INDICATOR_NOTES {
        ui.label(RichText::new(name).strong());
        ui.label(RichText::new(text).small());
        ui.add_space(4.0);
    }
    ui.separator();

    ui.strong("Dataset");
    match &state.table {
        Some(table) => {
            ui.label(format!("{} country-year rows", table.len()));
            if let Some((lo, hi)) = table.year_range() {
                ui.label(format!("Years {lo}–{hi}"));
            }
            ui.label(format!("{} countries", table.country_options().len()));
            ui.label(format!("Composite: {}", table.composite_mode));
        }
        None => {
            ui.label("No dataset loaded.");
        }
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open data folder…").clicked() {
                open_folder_dialog(state);
                ui.close_menu();
            }
            if ui.button("Open merged snapshot…").clicked() {
                open_snapshot_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.table.is_some(), egui::Button::new("Export merged table…"))
                .clicked()
            {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();
        ui.label(RichText::new("World Mental Health Analysis").strong());

        if let Some(msg) = &state.status_message {
            ui.separator();
            let color = if msg.starts_with("Error") {
                Color32::RED
            } else {
                Color32::GRAY
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// Central dashboard
// ---------------------------------------------------------------------------

/// Render the three dashboard sections.
pub fn dashboard(ui: &mut Ui, table: &MentalHealthTable, state: &mut AppState) {
    if table.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label("The loaded dataset has no rows.");
        });
        return;
    }
    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            intro_section(ui, table, state);
            comparison_section(ui, table, state);
            correlation_section(ui, table, state);
        });
}

fn intro_section(ui: &mut Ui, table: &MentalHealthTable, state: &mut AppState) {
    section_heading(
        ui,
        "Mental Health Disorders by Country",
        "Select a disorder and a year to see how its prevalence varies across the world, \
         continents and income groups. Click a country on the map to analyse it below.",
    );

    ui.horizontal(|ui: &mut Ui| {
        ui.label("Disorder:");
        illness_combo(ui, "illness", &mut state.illness);
        if let Some((lo, hi)) = table.year_range() {
            ui.label("Year:");
            ui.add(egui::Slider::new(&mut state.year, lo..=hi));
        }
    });

    let map = intro::choropleth(table, state.illness, state.year);
    if let Some(code) = plot::choropleth(ui, &map, &state.shapes) {
        log::debug!("map click selected {code}");
        state.select_primary(Some(code));
    }

    let continents = intro::continent_bars(table, state.illness, state.year);
    let income = intro::income_bars(table, state.illness, state.year);
    ui.columns(2, |cols: &mut [Ui]| {
        plot::bar_chart(&mut cols[0], "continent_bars", &continents);
        plot::bar_chart(&mut cols[1], "income_bars", &income);
    });

    plot::ranking(ui, &intro::global_evolution(table, state.illness, state.year));
}

fn comparison_section(ui: &mut Ui, table: &MentalHealthTable, state: &mut AppState) {
    section_heading(
        ui,
        "Temporal evolution and comparison",
        "Analyse one country in detail or compare it with another on several mental health indicators.",
    );

    let options = table.country_options();
    let name_of = |code: &Option<String>| {
        code.as_deref()
            .map(|c| table.code_to_name(c))
            .unwrap_or_default()
    };

    ui.horizontal(|ui: &mut Ui| {
        ui.label("Country:");
        let mut primary = state.primary.clone();
        egui::ComboBox::from_id_salt("primary_country")
            .selected_text(name_of(&primary))
            .width(200.0)
            .show_ui(ui, |ui: &mut Ui| {
                ui.selectable_value(&mut primary, None, "None");
                for (code, country) in &options {
                    ui.selectable_value(&mut primary, Some(code.clone()), country);
                }
            });
        if primary != state.primary {
            state.select_primary(primary);
        }

        let control = comparison::compare_options(table, state.primary.as_deref());
        ui.label("Compare with:");
        let mut compare = state.compare.clone();
        ui.add_enabled_ui(!control.disabled, |ui: &mut Ui| {
            egui::ComboBox::from_id_salt("compare_country")
                .selected_text(name_of(&compare))
                .width(200.0)
                .show_ui(ui, |ui: &mut Ui| {
                    ui.selectable_value(&mut compare, None, "None");
                    for (code, country) in &control.options {
                        ui.selectable_value(&mut compare, Some(code.clone()), country);
                    }
                });
        });
        if compare != state.compare {
            state.select_compare(compare);
        }
    });

    if !comparison::analysis_visible(state.primary.as_deref()) {
        ui.label(RichText::new("Select a country to show its time series and radar chart.").weak());
        return;
    }

    ui.horizontal_wrapped(|ui: &mut Ui| {
        ui.label("Factor(s):");
        for ind in Indicator::ILLNESSES {
            let selected = state.indicators.contains(&ind);
            if ui.selectable_label(selected, ind.label()).clicked() {
                state.toggle_indicator(ind);
            }
        }
    });

    let charts = comparison::time_series(
        table,
        state.primary.as_deref(),
        state.compare.as_deref(),
        &state.indicators,
    );
    if charts.is_empty() {
        ui.label(RichText::new("Select at least one factor to show its time series.").weak());
    }
    for (i, chart) in charts.iter().enumerate() {
        plot::time_series(ui, &format!("time_series_{i}"), chart);
    }

    ui.separator();
    let window = state.window();
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Radar year:");
        ui.add(egui::Slider::new(&mut state.radar_year, window.min..=window.max));
    });
    if let Some(chart) = comparison::radar(
        table,
        state.primary.as_deref(),
        state.compare.as_deref(),
        state.radar_year,
    ) {
        ui.columns(2, |cols: &mut [Ui]| {
            plot::radar(&mut cols[0], &chart);
            raw_values_table(&mut cols[1], table, state);
        });
    }
}

/// Raw socioeconomic values behind the radar chart.
fn raw_values_table(ui: &mut Ui, table: &MentalHealthTable, state: &AppState) {
    let codes: Vec<&str> = [state.primary.as_deref(), state.compare.as_deref()]
        .into_iter()
        .flatten()
        .collect();
    let rows: Vec<_> = codes
        .iter()
        .map(|code| {
            table
                .rows_for_year(state.radar_year)
                .find(|r| r.has_code(code))
        })
        .collect();

    ui.strong(format!("Values in {}", state.radar_year));
    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto().at_least(160.0))
        .columns(Column::auto().at_least(90.0), codes.len())
        .header(20.0, |mut header| {
            header.col(|ui: &mut Ui| {
                ui.strong("Indicator");
            });
            for code in &codes {
                header.col(|ui: &mut Ui| {
                    ui.strong(table.code_to_name(code));
                });
            }
        })
        .body(|mut body| {
            for ind in Indicator::SOCIOECONOMIC {
                body.row(18.0, |mut row| {
                    row.col(|ui: &mut Ui| {
                        ui.label(ind.label());
                    });
                    for r in &rows {
                        row.col(|ui: &mut Ui| {
                            match r.and_then(|r| r.value(ind)) {
                                Some(v) => ui.label(format!("{v:.3}")),
                                None => ui.label(RichText::new("n/a").weak()),
                            };
                        });
                    }
                });
            }
        });
}

fn correlation_section(ui: &mut Ui, table: &MentalHealthTable, state: &mut AppState) {
    section_heading(
        ui,
        "Global Correlations",
        "How mental health indicators relate to unemployment, freedom and other socioeconomic \
         variables. The year slider updates every correlation plot and the matrix.",
    );

    let window = state.window();
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Year:");
        ui.add(egui::Slider::new(&mut state.correlation_year, window.min..=window.max));
    });
    let year = state.correlation_year;

    let scatters = correlation::scatter_plots(table, year, window);
    for (pair_no, pair) in scatters.chunks(2).enumerate() {
        ui.columns(2, |cols: &mut [Ui]| {
            for (col, chart) in cols.iter_mut().zip(pair) {
                plot::scatter(col, &format!("scatter_{pair_no}_{}", chart.title), chart);
            }
        });
    }

    plot::time_series(
        ui,
        "correlation_over_time",
        &correlation::correlation_over_time(table, year, window),
    );
    plot::heatmap(ui, &correlation::correlation_matrix(table, year, window));
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_folder_dialog(state: &mut AppState) {
    if let Some(dir) = rfd::FileDialog::new()
        .set_title("Open folder with the five source CSVs")
        .pick_folder()
    {
        state.load_path(&dir);
    }
}

pub fn open_snapshot_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open merged table")
        .add_filter("Supported files", &["parquet", "pq", "csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}

pub fn export_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export merged table")
        .set_file_name(DEFAULT_EXPORT_FILE)
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet"])
        .save_file();

    if let Some(path) = file {
        state.export(&path);
    }
}
