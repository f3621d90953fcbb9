use eframe::egui::{ComboBox, DragValue, Grid, ScrollArea, Ui};
use strum::IntoEnumIterator;

use crate::config::PLOT_CONFIG;
use crate::domain::level::{Level, LevelKind};
use crate::engine::MarketStatus;
use crate::ui::app::LevelScoutApp;
use crate::ui::styles::UiStyleExt;
use crate::utils::time_utils::epoch_ms_to_date;

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;

// ============================================================================
// Sidebar: level adjustments, zone/magnet inputs, snapshots
// ============================================================================

pub fn sidebar(app: &mut LevelScoutApp, ui: &mut Ui) {
    ui.label_header("Level Adjustments");

    for kind in LevelKind::iter() {
        ui.label_subheader(format!("{} Levels", kind));
        // Render from a copy: removals requested mid-listing are buffered and
        // applied after the pass, so indices stay valid while we iterate.
        let levels: Vec<Level> = app.engine.store.levels(kind).to_vec();
        for (index, level) in levels.iter().enumerate() {
            ui.horizontal(|ui| {
                let tag = if level.major { " (major)" } else { "" };
                ui.label(format!("{:.2}{}", level.price, tag));
                if ui.small_button("✖").clicked() {
                    app.pending_removals.push((kind, index));
                }
            });
        }
        ui.add_space(4.0);
    }

    // Add-level form
    ui.horizontal(|ui| {
        ComboBox::from_id_salt("add_level_kind")
            .selected_text(app.add_kind.to_string())
            .show_ui(ui, |ui| {
                for kind in LevelKind::iter() {
                    ui.selectable_value(&mut app.add_kind, kind, kind.to_string());
                }
            });
        ui.text_edit_singleline(&mut app.add_price_input);
        ui.checkbox(&mut app.add_major, "major");
    });
    if ui.button("Add level").clicked() {
        match app.add_price_input.trim().parse::<f64>() {
            Ok(price) => {
                if app.engine.add_level(app.add_kind, price, app.add_major) {
                    app.add_price_input.clear();
                    #[cfg(debug_assertions)]
                    if DEBUG_FLAGS.print_ui_interactions {
                        log::info!("[ui] added {} level at {:.2}", app.add_kind, price);
                    }
                }
            }
            Err(_) => {
                app.engine.last_error =
                    Some(format!("'{}' is not a price", app.add_price_input));
            }
        }
    }

    ui.separator();

    // Zone and magnet
    ui.label_subheader("Dynamic Zone");
    ui.horizontal(|ui| {
        ui.label_subdued("Top:");
        ui.add(DragValue::new(&mut app.zone_top_input).speed(0.25));
        ui.label_subdued("Bottom:");
        ui.add(DragValue::new(&mut app.zone_bottom_input).speed(0.25));
    });
    if ui.button("Apply zone").clicked() {
        app.engine
            .set_dynamic_zone(app.zone_top_input, app.zone_bottom_input);
    }

    ui.label_subheader("Magnet Price");
    ui.horizontal(|ui| {
        ui.add(DragValue::new(&mut app.magnet_input).speed(0.25));
        if ui.button("Set").clicked() {
            app.engine.set_magnet_price(app.magnet_input);
        }
    });

    if ui.button("Reset to computed").clicked() {
        app.engine.reset_to_computed();
        app.sync_inputs_from_store();
    }

    ui.separator();
    snapshot_controls(app, ui);
}

fn snapshot_controls(app: &mut LevelScoutApp, ui: &mut Ui) {
    ui.label_subheader("Snapshots");

    ui.horizontal(|ui| {
        ui.text_edit_singleline(&mut app.snapshot_name);
        if ui.button("Save").clicked() {
            let name = app.snapshot_name.clone();
            if app.engine.save_snapshot(&name) {
                app.refresh_snapshot_names();
            }
        }
    });

    let names = app.snapshot_names.clone();
    for name in names {
        ui.horizontal(|ui| {
            ui.label(&name);
            if ui.small_button("Load").clicked() {
                if app.engine.load_snapshot(&name) {
                    app.sync_inputs_from_store();
                    app.snapshot_name = name.clone();
                }
            }
        });
    }
    if ui.small_button("↻ Refresh list").clicked() {
        app.refresh_snapshot_names();
    }
}

// ============================================================================
// Tabs
// ============================================================================

pub fn overview_tab(app: &LevelScoutApp, ui: &mut Ui) {
    ui.label_header("Market Overview");

    let engine = &app.engine;
    let status = engine.market_status();
    let status_color = match status {
        MarketStatus::Bullish => PLOT_CONFIG.support_line_color,
        MarketStatus::Bearish => PLOT_CONFIG.resistance_line_color,
        _ => eframe::egui::Color32::GRAY,
    };
    ui.metric("Market Status", status.label(), status_color);

    if let Some(close) = engine.last_close() {
        ui.metric(
            "Last Close",
            &format!("{:.2}", close),
            eframe::egui::Color32::WHITE,
        );
    }

    let zone = engine.store.zone();
    if zone.is_set() {
        ui.metric(
            "Dynamic Zone Top",
            &format!("{:.2}", zone.top),
            PLOT_CONFIG.zone_fill_color,
        );
        ui.metric(
            "Dynamic Zone Bottom",
            &format!("{:.2}", zone.bottom),
            PLOT_CONFIG.zone_fill_color,
        );
    }
    ui.metric(
        "Magnet Price",
        &format!("{:.2}", engine.store.magnet()),
        PLOT_CONFIG.magnet_color,
    );

    ui.add_space(8.0);
    ui.label_subheader("Session Stats");
    if let Some(rsi) = engine.indicators.rsi_last {
        ui.metric("RSI", &format!("{:.1}", rsi), eframe::egui::Color32::WHITE);
    }
    if let Some(macd) = engine.indicators.macd_last {
        ui.metric("MACD", &format!("{:.2}", macd), eframe::egui::Color32::WHITE);
    }
    if let Some(change) = engine.indicators.pct_change_last {
        let color = if change >= 0.0 {
            PLOT_CONFIG.support_line_color
        } else {
            PLOT_CONFIG.resistance_line_color
        };
        ui.metric("Day Change", &format!("{:+.2}%", change), color);
    }

    if engine.computed.is_empty() {
        ui.add_space(8.0);
        ui.label_warning("Insufficient price data — levels unavailable.");
    }
}

pub fn key_levels_tab(app: &LevelScoutApp, ui: &mut Ui) {
    ui.label_header("Key Levels");
    let store = &app.engine.store;

    ui.columns(2, |columns| {
        columns[0].label_subheader("Resistance Levels");
        // Highest first for display; storage stays ascending
        for (i, level) in store
            .levels(LevelKind::Resistance)
            .iter()
            .rev()
            .enumerate()
        {
            columns[0].label(format_level_row("Resistance", i, level));
        }

        columns[1].label_subheader("Support Levels");
        for (i, level) in store.levels(LevelKind::Support).iter().enumerate() {
            columns[1].label(format_level_row("Support", i, level));
        }
    });

    ui.add_space(8.0);
    let zone = store.zone();
    ui.label_subheader("Dynamic Zone");
    if zone.is_set() {
        ui.label(format!("Top: {:.2}", zone.top));
        ui.label(format!("Bottom: {:.2}", zone.bottom));
    } else {
        ui.label_subdued("not set");
    }

    ui.label_subheader("Magnet Price");
    ui.label(format!("{:.2}", store.magnet()));
}

fn format_level_row(kind: &str, index: usize, level: &Level) -> String {
    let tag = if level.major { "  ●" } else { "" };
    format!("{} {}: {:.2}{}", kind, index + 1, level.price, tag)
}

pub fn plan_tab(app: &mut LevelScoutApp, ui: &mut Ui) {
    ui.label_header("Trading Plan");

    let busy = app.plan_request_pending();
    if ui
        .add_enabled(!busy, eframe::egui::Button::new("Generate plan"))
        .clicked()
    {
        app.start_plan_generation();
    }
    if busy {
        ui.spinner();
    }

    ui.add_space(8.0);
    if let Some(text) = &app.plan_text {
        ScrollArea::vertical().show(ui, |ui| {
            ui.label(text.clone());
        });
    } else {
        ui.label_subdued("No plan generated yet.");
    }
}

pub fn recap_tab(app: &mut LevelScoutApp, ui: &mut Ui) {
    ui.label_header("Daily Recap");

    let busy = app.recap_request_pending();
    if ui
        .add_enabled(!busy, eframe::egui::Button::new("Generate recap"))
        .clicked()
    {
        app.start_recap_generation();
    }
    if busy {
        ui.spinner();
    }

    ui.add_space(8.0);
    if let Some(text) = &app.recap_text {
        ScrollArea::vertical().show(ui, |ui| {
            ui.label(text.clone());
        });
    } else {
        ui.label_subdued("No recap generated yet.");
    }
}

pub fn news_tab(app: &LevelScoutApp, ui: &mut Ui) {
    ui.label_header("News & Calendar");
    let engine = &app.engine;

    ScrollArea::vertical().show(ui, |ui| {
        ui.label_subheader("Headlines");
        if engine.headlines.is_empty() {
            ui.label_subdued("no data");
        }
        for headline in &engine.headlines {
            ui.label(eframe::egui::RichText::new(headline.title.as_str()).strong());
            if !headline.summary.is_empty() {
                ui.label_subdued(headline.summary.as_str());
            }
            if !headline.url.is_empty() {
                ui.hyperlink_to("source", &headline.url);
            }
            ui.add_space(4.0);
        }

        ui.separator();
        ui.label_subheader("Economic Calendar");
        if engine.calendar.is_empty() {
            ui.label_subdued("no data");
        } else {
            Grid::new("calendar_grid").striped(true).show(ui, |ui| {
                ui.label_subdued("Date");
                ui.label_subdued("Event");
                ui.label_subdued("Impact");
                ui.label_subdued("Actual");
                ui.label_subdued("Forecast");
                ui.label_subdued("Previous");
                ui.end_row();

                for event in &engine.calendar {
                    ui.label(&event.date);
                    ui.label(&event.event);
                    ui.label(&event.impact);
                    ui.label(&event.actual);
                    ui.label(&event.forecast);
                    ui.label(&event.previous);
                    ui.end_row();
                }
            });
        }
    });
}

// ============================================================================
// Status bar
// ============================================================================

pub fn status_bar(app: &LevelScoutApp, ui: &mut Ui) {
    ui.horizontal(|ui| {
        let engine = &app.engine;
        ui.label_subdued(format!(
            "{} · {} bars · {}",
            engine.symbol,
            engine.series.len(),
            engine.data_source
        ));
        if let Some(ts) = engine.series.last_timestamp_ms() {
            ui.label_subdued(format!("last bar {}", epoch_ms_to_date(ts)));
        }
        if let Some(error) = &engine.last_error {
            ui.label_error(error);
        }
    });
}
