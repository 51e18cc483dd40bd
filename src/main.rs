mod app;
mod assistant;
mod catalog;
mod event;
mod selection;
mod theme;

use app::PetalApp;
use catalog::fetch::CatalogFetcher;
use eframe::egui;
use std::path::PathBuf;
use std::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn catalog_source() -> PathBuf {
    std::env::var_os("PETAL_CATALOG")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("products.json"))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "petal=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let source = catalog_source();
    tracing::info!(source = %source.display(), "starting with catalog source");

    let (tx, rx) = mpsc::channel();
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("petal-runtime")
        .build()?;

    let fetcher = CatalogFetcher::new(source, tx, runtime.handle().clone());
    fetcher.fetch();

    let app = PetalApp::new(rx, fetcher);
    let _runtime = runtime;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1180.0, 760.0])
            .with_min_inner_size([960.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Petal",
        native_options,
        Box::new(move |_creation_context| Ok(Box::new(app))),
    )?;

    Ok(())
}
