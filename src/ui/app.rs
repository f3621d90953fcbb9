use eframe::egui;
use poll_promise::Promise;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

use crate::domain::level::LevelKind;
use crate::engine::ScoutEngine;
use crate::narrative::NarrativeError;
use crate::ui::{chart, panels};

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum Tab {
    #[strum(serialize = "Market Overview")]
    Overview,
    #[strum(serialize = "Key Levels")]
    Levels,
    #[strum(serialize = "Trading Plan")]
    Plan,
    #[strum(serialize = "Recap")]
    Recap,
    #[strum(serialize = "Chart")]
    Chart,
    #[strum(serialize = "News")]
    News,
}

pub struct LevelScoutApp {
    pub engine: ScoutEngine,
    pub active_tab: Tab,

    // Sidebar editor state
    pub add_kind: LevelKind,
    pub add_price_input: String,
    pub add_major: bool,
    pub zone_top_input: f64,
    pub zone_bottom_input: f64,
    pub magnet_input: f64,
    pub snapshot_name: String,
    pub snapshot_names: Vec<String>,

    /// Removals requested during the current render pass; applied after the
    /// pass so a delete never corrupts the listing being iterated.
    pub pending_removals: Vec<(LevelKind, usize)>,

    // Narrative generation runs on worker threads so a slow service cannot
    // freeze the frame loop.
    plan_promise: Option<Promise<Result<String, NarrativeError>>>,
    recap_promise: Option<Promise<Result<String, NarrativeError>>>,
    pub plan_text: Option<String>,
    pub recap_text: Option<String>,
}

impl LevelScoutApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, mut engine: ScoutEngine) -> Self {
        let snapshot_names = engine.snapshot_names();
        let zone = engine.store.zone();
        let magnet = engine.store.magnet();

        Self {
            engine,
            active_tab: Tab::Overview,
            add_kind: LevelKind::Support,
            add_price_input: String::new(),
            add_major: false,
            zone_top_input: zone.top,
            zone_bottom_input: zone.bottom,
            magnet_input: magnet,
            snapshot_name: String::new(),
            snapshot_names,
            pending_removals: Vec::new(),
            plan_promise: None,
            recap_promise: None,
            plan_text: None,
            recap_text: None,
        }
    }

    /// Pull the editable inputs back in line with the store (after a load or
    /// reset changed it underneath them).
    pub fn sync_inputs_from_store(&mut self) {
        let zone = self.engine.store.zone();
        self.zone_top_input = zone.top;
        self.zone_bottom_input = zone.bottom;
        self.magnet_input = self.engine.store.magnet();
    }

    pub fn refresh_snapshot_names(&mut self) {
        self.snapshot_names = self.engine.snapshot_names();
    }

    // --- NARRATIVE PROMISES ---

    pub fn plan_request_pending(&self) -> bool {
        self.plan_promise.is_some()
    }

    pub fn recap_request_pending(&self) -> bool {
        self.recap_promise.is_some()
    }

    pub fn start_plan_generation(&mut self) {
        if self.plan_promise.is_some() {
            return;
        }
        let service = self.engine.narrative.clone();
        let symbol = self.engine.symbol.clone();
        let levels = self.engine.curated_levels();

        self.plan_promise = Some(Promise::spawn_thread("narrative_plan", move || {
            service.trading_plan(&symbol, &levels)
        }));
    }

    pub fn start_recap_generation(&mut self) {
        if self.recap_promise.is_some() {
            return;
        }
        let service = self.engine.narrative.clone();
        let symbol = self.engine.symbol.clone();
        let series = self.engine.series.clone();

        self.recap_promise = Some(Promise::spawn_thread("narrative_recap", move || {
            service.daily_recap(&symbol, &series)
        }));
    }

    fn poll_narrative(&mut self, ctx: &egui::Context) {
        let plan_outcome = self
            .plan_promise
            .as_ref()
            .and_then(|promise| promise.ready().map(narrative_or_placeholder));
        if let Some(text) = plan_outcome {
            self.plan_text = Some(text);
            self.plan_promise = None;
        }

        let recap_outcome = self
            .recap_promise
            .as_ref()
            .and_then(|promise| promise.ready().map(narrative_or_placeholder));
        if let Some(text) = recap_outcome {
            self.recap_text = Some(text);
            self.recap_promise = None;
        }

        if self.plan_promise.is_some() || self.recap_promise.is_some() {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }

    fn apply_pending_removals(&mut self) {
        if self.pending_removals.is_empty() {
            return;
        }
        let removals = std::mem::take(&mut self.pending_removals);

        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_ui_interactions {
            log::info!("[ui] applying {} buffered level removals", removals.len());
        }
        self.engine.remove_levels(&removals);
    }
}

/// A failed generation becomes visible placeholder text, never a fault.
fn narrative_or_placeholder(result: &Result<String, NarrativeError>) -> String {
    match result {
        Ok(text) => text.clone(),
        Err(e) => format!("Narrative unavailable — {e}"),
    }
}

impl eframe::App for LevelScoutApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_narrative(ctx);

        egui::TopBottomPanel::top("tab_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(format!("{} Dashboard", self.engine.symbol));
                ui.separator();
                for tab in Tab::iter() {
                    ui.selectable_value(&mut self.active_tab, tab, tab.to_string());
                }
            });
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            panels::status_bar(self, ui);
        });

        egui::SidePanel::left("level_sidebar")
            .resizable(true)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    panels::sidebar(self, ui);
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| match self.active_tab {
            Tab::Overview => panels::overview_tab(self, ui),
            Tab::Levels => panels::key_levels_tab(self, ui),
            Tab::Plan => panels::plan_tab(self, ui),
            Tab::Recap => panels::recap_tab(self, ui),
            Tab::Chart => chart::candlestick_chart(&self.engine, ui),
            Tab::News => panels::news_tab(self, ui),
        });

        // All buffered deletions land here, after every listing finished its pass
        self.apply_pending_removals();
    }
}
