#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use std::path::PathBuf;

use clap::Parser;
use eframe::NativeOptions;
use tokio::runtime::Runtime;

use level_scout::config::PERSISTENCE;
use level_scout::data::{
    SOURCE_API, fetch_calendar, fetch_headlines, load_market_data, write_series_cache_async,
};
use level_scout::engine::ScoutEngine;
use level_scout::narrative::service_from_env;
use level_scout::store::FsSnapshotStore;
use level_scout::{Cli, run_app};

fn main() -> eframe::Result {
    // A. Init Logging
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panicked: {:?}", panic_info);
    }));
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    // B. Parse Args
    let args = Cli::parse();
    #[cfg(debug_assertions)]
    log::info!("Parsed arguments: {:?}", args);

    // C. Data Loading (Blocking)
    let rt = Runtime::new().expect("Failed to create Tokio runtime");
    let (series, data_source) = rt.block_on(load_market_data(&args));
    let (headlines, calendar) = rt.block_on(async { tokio::join!(fetch_headlines(), fetch_calendar()) });

    // D. Background Cache Write
    if data_source == SOURCE_API {
        let cache_data = series.clone();
        rt.spawn(async move {
            if let Err(e) = write_series_cache_async(cache_data).await {
                log::error!("⚠️  Failed to write cache: {}", e);
            }
        });
    }

    // E. Run Native App
    let engine = ScoutEngine::new(
        args.symbol.clone(),
        series,
        data_source,
        headlines,
        calendar,
        service_from_env(),
        Box::new(FsSnapshotStore::default_location()),
    );

    let options = NativeOptions {
        persistence_path: Some(PathBuf::from(PERSISTENCE.app_state_path)),
        ..Default::default()
    };

    eframe::run_native(
        "Level Scout - Map. Mark. Trade.",
        options,
        Box::new(move |cc| Ok(run_app(cc, engine))),
    )
}
