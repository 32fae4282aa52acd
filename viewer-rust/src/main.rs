mod app;
mod io;
mod model;

use app::{configure_fonts, ViewerApp};
use std::path::PathBuf;

fn main() -> eframe::Result<()> {
    let mut args = std::env::args().skip(1);

    let records_dir = args
        .next()
        .map(PathBuf::from)
        .or_else(|| {
            rfd::FileDialog::new()
                .set_title("Select records folder")
                .pick_folder()
        });
    let Some(records_dir) = records_dir else {
        eprintln!("No records folder selected");
        return Ok(());
    };

    let images_dir = args
        .next()
        .map(PathBuf::from)
        .or_else(|| {
            rfd::FileDialog::new()
                .set_title("Select images folder")
                .pick_folder()
        });
    let Some(images_dir) = images_dir else {
        eprintln!("No images folder selected");
        return Ok(());
    };

    let app = match ViewerApp::new(&records_dir, &images_dir) {
        Ok(app) => app,
        Err(err) => {
            eprintln!("Failed to open review store: {err:#}");
            return Ok(());
        }
    };

    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "Medical Report Viewer",
        options,
        Box::new(move |cc| {
            configure_fonts(&cc.egui_ctx);
            Box::new(app)
        }),
    )
}
