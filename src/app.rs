use std::sync::mpsc::{channel, Receiver, Sender};

use eframe::egui;

use crate::data::loader::{spawn_load, LoadMessage, Source};
use crate::state::AppState;
use crate::ui::{panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct RustyTableApp {
    pub state: AppState,
    /// Delimiter override from the command line.
    pub delimiter: Option<u8>,
    /// Contents of the URL box in the top bar.
    pub url_input: String,
    tx: Sender<LoadMessage>,
    rx: Receiver<LoadMessage>,
}

impl RustyTableApp {
    pub fn new(delimiter: Option<u8>) -> Self {
        let (tx, rx) = channel();
        Self {
            state: AppState::default(),
            delimiter,
            url_input: String::new(),
            tx,
            rx,
        }
    }

    /// Start loading `source` in the background. Any load still in flight
    /// is superseded.
    pub fn open(&mut self, source: Source, ctx: &egui::Context) {
        let mut options = source.parse_options();
        if let Some(d) = self.delimiter {
            options = options.with_delimiter(d);
        }
        let generation = self.state.begin_load(source.clone());
        let ctx = ctx.clone();
        spawn_load(source, options, generation, self.tx.clone(), move || {
            ctx.request_repaint()
        });
    }

    /// Apply any finished loads.
    fn poll_loads(&mut self) {
        while let Ok(msg) = self.rx.try_recv() {
            self.state.finish_load(msg.generation, msg.result);
        }
    }
}

impl eframe::App for RustyTableApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_loads();

        // ---- Top panel: menu bar ----
        let requested = egui::TopBottomPanel::top("top_bar")
            .show(ctx, |ui| {
                panels::top_bar(ui, &mut self.state, &mut self.url_input)
            })
            .inner;
        if let Some(source) = requested {
            self.open(source, ctx);
        }

        // ---- Central panel: table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            table::data_table(ui, &mut self.state);
        });
    }
}
