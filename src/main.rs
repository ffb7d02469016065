mod app;
mod data;
mod state;
mod ui;

use anyhow::{ensure, Result};
use app::RustyTableApp;
use clap::Parser;
use data::loader::Source;
use eframe::egui;

#[derive(Parser, Debug)]
#[command(version, about = "Filterable, sortable table viewer for delimited text")]
struct Args {
    /// File path or http(s) URL to open on startup
    source: Option<String>,

    /// Field delimiter (single ASCII character); defaults from the file extension
    #[arg(long, short = 'd')]
    delimiter: Option<char>,
}

fn delimiter_byte(c: char) -> Result<u8> {
    ensure!(
        c.is_ascii() && c != '"' && c != '\n' && c != '\r',
        "delimiter must be a single ASCII character other than a quote or newline, got {c:?}"
    );
    Ok(c as u8)
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let delimiter = args.delimiter.map(delimiter_byte).transpose()?;
    let initial = args.source.as_deref().map(Source::parse);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Rusty Table",
        options,
        Box::new(move |cc| {
            let mut app = RustyTableApp::new(delimiter);
            if let Some(source) = initial {
                app.open(source, &cc.egui_ctx);
            }
            Ok(Box::new(app))
        }),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
