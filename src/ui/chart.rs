use eframe::egui::{Stroke, Ui};
use egui_plot::{HLine, Line, LineStyle, Plot, PlotPoints, Polygon};

use crate::config::PLOT_CONFIG;
use crate::domain::bar::BarDirection;
use crate::domain::level::LevelKind;
use crate::engine::ScoutEngine;

/// Candlestick chart with the curated levels, dynamic zone, and magnet
/// overlaid. X axis is the bar index (daily bars skip weekends, so a time
/// axis would leave gaps).
pub fn candlestick_chart(engine: &ScoutEngine, ui: &mut Ui) {
    let series = &engine.series;
    if series.is_empty() {
        ui.label("No price history available.");
        return;
    }

    let x_max = series.len() as f64;

    Plot::new("price_chart")
        .legend(egui_plot::Legend::default())
        .view_aspect(PLOT_CONFIG.plot_aspect_ratio)
        .show(ui, |plot_ui| {
            // 1. Candles
            for idx in 0..series.len() {
                let bar = series.bar(idx);
                let x = idx as f64;
                let color = match bar.direction() {
                    BarDirection::Bullish => PLOT_CONFIG.bull_candle_color,
                    BarDirection::Bearish => PLOT_CONFIG.bear_candle_color,
                };

                // Wick from low to high
                plot_ui.line(
                    Line::new("", PlotPoints::new(vec![[x, bar.low], [x, bar.high]]))
                        .color(color)
                        .width(1.0),
                );

                // Body as a filled rectangle
                let (body_low, body_high) = bar.body_range();
                let half = PLOT_CONFIG.candle_half_width;
                plot_ui.polygon(
                    Polygon::new(
                        "",
                        PlotPoints::new(vec![
                            [x - half, body_low],
                            [x + half, body_low],
                            [x + half, body_high],
                            [x - half, body_high],
                        ]),
                    )
                    .fill_color(color)
                    .stroke(Stroke::NONE),
                );
            }

            // 2. Indicator overlays
            indicator_line(plot_ui, &engine.indicators.sma_short, "SMA short", PLOT_CONFIG.sma_short_color);
            indicator_line(plot_ui, &engine.indicators.sma_long, "SMA long", PLOT_CONFIG.sma_long_color);
            indicator_line(plot_ui, &engine.indicators.vwap, "VWAP", PLOT_CONFIG.vwap_color);

            // 3. Curated levels
            for level in engine.store.levels(LevelKind::Support) {
                plot_ui.hline(
                    HLine::new("Support", level.price)
                        .color(PLOT_CONFIG.support_line_color)
                        .width(level_width(level.major)),
                );
            }
            for level in engine.store.levels(LevelKind::Resistance) {
                plot_ui.hline(
                    HLine::new("Resistance", level.price)
                        .color(PLOT_CONFIG.resistance_line_color)
                        .width(level_width(level.major)),
                );
            }

            // 4. Dynamic zone: dashed bounds plus a translucent band
            let zone = engine.store.zone();
            if zone.is_set() && zone.is_valid() {
                plot_ui.polygon(
                    Polygon::new(
                        "Dynamic Zone",
                        PlotPoints::new(vec![
                            [0.0, zone.bottom],
                            [x_max, zone.bottom],
                            [x_max, zone.top],
                            [0.0, zone.top],
                        ]),
                    )
                    .fill_color(
                        PLOT_CONFIG
                            .zone_fill_color
                            .linear_multiply(PLOT_CONFIG.zone_fill_opacity_pct),
                    )
                    .stroke(Stroke::NONE),
                );
                plot_ui.hline(
                    HLine::new("Dynamic Zone", zone.top)
                        .color(PLOT_CONFIG.zone_fill_color)
                        .style(LineStyle::dashed_loose()),
                );
                plot_ui.hline(
                    HLine::new("Dynamic Zone", zone.bottom)
                        .color(PLOT_CONFIG.zone_fill_color)
                        .style(LineStyle::dashed_loose()),
                );
            }

            // 5. Magnet price
            let magnet = engine.store.magnet();
            if magnet > 0.0 {
                plot_ui.hline(
                    HLine::new("Magnet", magnet)
                        .color(PLOT_CONFIG.magnet_color)
                        .width(PLOT_CONFIG.magnet_line_width)
                        .style(LineStyle::dotted_loose()),
                );
            }
        });
}

fn indicator_line(
    plot_ui: &mut egui_plot::PlotUi,
    values: &[Option<f64>],
    name: &str,
    color: eframe::egui::Color32,
) {
    let points: Vec<[f64; 2]> = values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|y| [i as f64, y]))
        .collect();
    if points.len() < 2 {
        return;
    }
    plot_ui.line(Line::new(name, PlotPoints::new(points)).color(color).width(1.0));
}

fn level_width(major: bool) -> f32 {
    // Major levels read heavier; the flag means nothing beyond display
    if major {
        PLOT_CONFIG.level_line_width * 2.0
    } else {
        PLOT_CONFIG.level_line_width
    }
}
