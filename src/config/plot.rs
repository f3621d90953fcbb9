//! Chart and UI color configuration

use eframe::egui::Color32;

pub struct PlotConfig {
    pub bull_candle_color: Color32,
    pub bear_candle_color: Color32,
    pub support_line_color: Color32,
    pub resistance_line_color: Color32,
    pub magnet_color: Color32,
    pub zone_fill_color: Color32,
    pub sma_short_color: Color32,
    pub sma_long_color: Color32,
    pub vwap_color: Color32,
    // UI accents (headers, warnings) shared with the panel styling
    pub heading_color: Color32,
    pub subheading_color: Color32,
    /// Width of the support/resistance overlay lines
    pub level_line_width: f32,
    /// Width of the magnet price line
    pub magnet_line_width: f32,
    /// Candle body half-width in x-axis units (bars are 1.0 apart)
    pub candle_half_width: f64,
    /// Transparency for the dynamic-zone rectangle (0.0 invisible, 1.0 opaque)
    pub zone_fill_opacity_pct: f32,
    /// Plot aspect ratio (width:height)
    pub plot_aspect_ratio: f32,
}

pub const PLOT_CONFIG: PlotConfig = PlotConfig {
    bull_candle_color: Color32::from_rgb(0, 200, 120),
    bear_candle_color: Color32::from_rgb(220, 60, 60),
    support_line_color: Color32::from_rgb(0, 170, 90),   // Green
    resistance_line_color: Color32::from_rgb(230, 80, 80), // Red
    magnet_color: Color32::from_rgb(255, 215, 0),        // Gold
    zone_fill_color: Color32::from_rgb(70, 130, 180),    // Steel blue
    sma_short_color: Color32::from_rgb(0, 191, 255),     // Deep sky blue
    sma_long_color: Color32::from_rgb(255, 165, 0),      // Orange
    vwap_color: Color32::from_rgb(186, 85, 211),         // Violet
    heading_color: Color32::YELLOW,
    subheading_color: Color32::ORANGE,
    level_line_width: 1.5,
    magnet_line_width: 2.5,
    candle_half_width: 0.3,
    zone_fill_opacity_pct: 0.2,
    plot_aspect_ratio: 2.0,
};
