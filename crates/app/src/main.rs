//! RegionSnap - drag a rectangle over the desktop and save it as PNG

#![cfg_attr(windows, windows_subsystem = "windows")]

mod config;

use anyhow::Context;
use capture::CaptureOutcome;
use config::AppConfig;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let result = run();
    if let Err(ref err) = result {
        log::error!("{:#}", err);
        platform::report_error(err);
    }
    result
}

fn run() -> anyhow::Result<()> {
    let config = AppConfig::load().context("Invalid configuration")?;
    log::info!(
        "Output {}, bounds policy {:?}",
        config.output_path.display(),
        config.bounds_policy
    );

    match platform::run(&config)? {
        Some(CaptureOutcome::Saved(path)) => log::info!("Saved {}", path.display()),
        Some(CaptureOutcome::Skipped) => log::info!("Empty selection, nothing saved"),
        None => log::info!("Overlay closed without a selection"),
    }
    Ok(())
}

#[cfg(windows)]
mod platform {
    use crate::config::AppConfig;
    use anyhow::Context;
    use capture::{gdi, CaptureOutcome, RegionCapturer};
    use export::PngWriter;
    use overlay::{OverlayError, OverlayWindow};
    use std::sync::Arc;
    use windows::Win32::UI::HiDpi::{
        SetProcessDpiAwarenessContext, DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2,
    };

    /// One selection session: enumerate, freeze, select, capture
    pub fn run(config: &AppConfig) -> anyhow::Result<Option<CaptureOutcome>> {
        // Physical pixels everywhere
        unsafe {
            let _ = SetProcessDpiAwarenessContext(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2);
        }

        let surfaces = gdi::list_display_surfaces().context("Cannot enumerate displays")?;
        let bounds = capture::compute_with(&surfaces, config.bounds_policy)?;
        log::info!("Virtual desktop {:?}", bounds);

        let snapshot = Arc::new(
            gdi::snapshot_desktop(bounds.to_rect()).context("Cannot read the screen")?,
        );
        let capturer = RegionCapturer::new(
            Arc::clone(&snapshot),
            PngWriter::new(),
            config.output_path.clone(),
        );

        match OverlayWindow::run(bounds, snapshot, Box::new(capturer)) {
            Ok(outcome) => Ok(Some(outcome)),
            Err(OverlayError::Closed) => Ok(None),
            Err(err) => Err(err).context("Capture failed"),
        }
    }

    pub fn report_error(err: &anyhow::Error) {
        rfd::MessageDialog::new()
            .set_level(rfd::MessageLevel::Error)
            .set_title("RegionSnap")
            .set_description(format!("{:#}", err))
            .set_buttons(rfd::MessageButtons::Ok)
            .show();
    }
}

#[cfg(not(windows))]
mod platform {
    use crate::config::AppConfig;
    use capture::CaptureOutcome;

    pub fn run(_config: &AppConfig) -> anyhow::Result<Option<CaptureOutcome>> {
        anyhow::bail!("RegionSnap captures through GDI and only runs on Windows")
    }

    pub fn report_error(_err: &anyhow::Error) {}
}
