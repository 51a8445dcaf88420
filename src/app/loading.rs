//! Background load lifecycle for `NeoApp`.
//!
//! The primary fetch runs on its own thread and is polled every frame
//! (`check_fetch`). Once it lands, one lookahead task per displayed record is
//! queued and its results are applied as they arrive (`poll_lookahead`).

use std::sync::mpsc;

use eframe::egui;

use neo_viz::net::lookahead::NextApproachLoader;
use neo_viz::NeoEngine;

use super::NeoApp;

impl NeoApp {
    /// Start a fresh load with the current configuration.
    pub fn reload(&mut self, ctx: &egui::Context) {
        if self.loading {
            return;
        }
        if let Err(e) = self.config.validate() {
            self.error = Some(format!("[{}] {}", e.phase(), e));
            return;
        }
        self.loading = true;
        self.error = None;
        // In-flight lookups from the previous load are orphaned with it
        self.lookahead = None;

        let (tx, rx) = mpsc::channel();
        self.fetch_rx = Some(rx);

        let config = self.config.clone();
        let ctx = ctx.clone();

        std::thread::spawn(move || {
            let outcome = NeoEngine::new(config).and_then(|engine| {
                let result = engine.load()?;
                Ok((result, engine.source()))
            });
            let _ = tx.send(outcome);
            ctx.request_repaint();
        });
    }

    /// Poll the fetch channel and swap in the new records when they arrive.
    pub fn check_fetch(&mut self, ctx: &egui::Context) {
        let Some(rx) = &self.fetch_rx else {
            return;
        };
        let Ok(outcome) = rx.try_recv() else {
            return;
        };

        self.fetch_rx = None;
        self.loading = false;

        match outcome {
            Ok((result, source)) => {
                let repaint = ctx.clone();
                match NextApproachLoader::new(
                    source,
                    result.config.lookahead_workers,
                    result.config.lookahead_years,
                    result.context.window_end(),
                ) {
                    Ok(loader) => {
                        let mut loader = loader.with_notify(move || repaint.request_repaint());
                        loader.request_all(&result.records);
                        self.lookahead = Some(loader);
                    }
                    Err(e) => log::warn!("next-approach lookups disabled: {}", e),
                }

                self.scene = Some(result.scene());
                self.result = Some(result);
                self.tooltips.hide();
            }
            Err(e) => {
                log::error!("load failed: {}", e);
                self.error = Some(format!("[{}] {}", e.phase(), e));
                self.result = None;
                self.scene = None;
            }
        }
    }

    /// Apply finished next-approach lookups; only the tooltip text changes.
    pub fn poll_lookahead(&mut self) {
        let (Some(loader), Some(result)) = (self.lookahead.as_mut(), self.result.as_mut()) else {
            return;
        };
        if loader.apply_ready(&mut result.records) > 0 {
            self.scene = Some(result.scene());
        }
    }

    /// Lookups still outstanding, for the status line.
    pub fn pending_lookups(&self) -> usize {
        self.lookahead.as_ref().map(|l| l.pending()).unwrap_or(0)
    }
}
