//! Figure Viewer Application
//! Native window showing a rendered figure with a small toolbar.

use crate::gui::ChartViewer;
use egui::{RichText, TopBottomPanel};
use image::RgbImage;
use std::path::PathBuf;

/// Main viewer window.
pub struct FigureApp {
    chart_viewer: ChartViewer,
    /// PNG copy handed to the system viewer, written on demand.
    png_path: Option<PathBuf>,
    status: String,
}

impl FigureApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, image: RgbImage) -> Self {
        Self {
            chart_viewer: ChartViewer::new(image),
            png_path: None,
            status: "Ready".to_string(),
        }
    }

    /// Hand the figure to the system image viewer.
    fn handle_open_external(&mut self, image: &RgbImage) {
        let path = self
            .png_path
            .get_or_insert_with(|| std::env::temp_dir().join("broken-axis-figure.png"))
            .clone();

        match image
            .save(&path)
            .map_err(|e| e.to_string())
            .and_then(|()| open::that(&path).map_err(|e| e.to_string()))
        {
            Ok(()) => self.status = format!("Opened {}", path.display()),
            Err(e) => self.status = format!("Open error: {}", e),
        }
    }
}

impl eframe::App for FigureApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut open_external = false;

        TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if let Some((w, h)) = self.chart_viewer.size() {
                    ui.label(RichText::new(format!("{} x {} px", w, h)).size(12.0));
                }
                if ui.button("Open in system viewer").clicked() {
                    open_external = true;
                }
                ui.label(RichText::new(&self.status).size(12.0).weak());
            });
        });

        if open_external {
            if let Some(image) = self.chart_viewer.image().cloned() {
                self.handle_open_external(&image);
            }
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ctx, ui);
        });
    }
}
