use std::path::{Path, PathBuf};
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;

use livecheck_core::capture::domain::frame_source::FrameSource;
use livecheck_core::capture::infrastructure::ffmpeg_file_source::FfmpegFileSource;
use livecheck_core::capture::infrastructure::nokhwa_camera_source::{
    list_cameras, request_camera_access, NokhwaCameraSource,
};
use livecheck_core::detection::domain::detector_params::DetectorParams;
use livecheck_core::detection::infrastructure::cascade_face_detector::CascadeFaceDetector;
use livecheck_core::liveness::domain::threshold::{
    SharedThreshold, DEFAULT_THRESHOLD, THRESHOLD_RANGE,
};
use livecheck_core::pipeline::analyze_frame_use_case::AnalyzeFrameUseCase;
use livecheck_core::pipeline::capture_backend::SendError;
use livecheck_core::pipeline::capture_logger::SummaryCaptureLogger;
use livecheck_core::pipeline::capture_loop::{CaptureLoop, FrameUpdate, LoopEnd};
use livecheck_core::pipeline::infrastructure::camera_backend::resolve_cascade;
use livecheck_core::shared::constants::{
    DEFAULT_CAMERA_INDEX, DEFAULT_MIN_NEIGHBORS, DEFAULT_SCALE_FACTOR, IMAGE_EXTENSIONS,
    STOPPED_TEXT,
};
use livecheck_core::shared::frame::Frame;

/// Face liveness check for a webcam, a video or an image.
#[derive(Parser)]
#[command(name = "livecheck")]
struct Cli {
    /// Input video or image file. Reads the camera when omitted.
    input: Option<PathBuf>,

    /// Camera index to read when no input file is given.
    #[arg(long, default_value_t = DEFAULT_CAMERA_INDEX)]
    camera: u32,

    /// Laplacian variance a face must exceed to count as live (10-150).
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    threshold: u32,

    /// Pyramid step between detection scales (> 1.0).
    #[arg(long, default_value_t = DEFAULT_SCALE_FACTOR)]
    scale_factor: f64,

    /// Overlapping detections a face needs (0 disables grouping).
    #[arg(long, default_value_t = DEFAULT_MIN_NEIGHBORS)]
    min_neighbors: u32,

    /// Smallest face side in pixels (0 = cascade window size).
    #[arg(long, default_value_t = 0)]
    min_size: u32,

    /// Haar cascade XML to use instead of the automatic lookup.
    #[arg(long)]
    cascade: Option<PathBuf>,

    /// Stop after this many frames.
    #[arg(long)]
    max_frames: Option<usize>,

    /// Save the last annotated frame to this image file.
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// List available cameras and exit.
    #[arg(long)]
    list_cameras: bool,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), SendError> {
    let cli = Cli::parse();

    if cli.list_cameras {
        request_camera_access();
        for camera in list_cameras()? {
            println!("{camera}");
        }
        return Ok(());
    }

    validate(&cli)?;
    let params = DetectorParams {
        scale_factor: cli.scale_factor,
        min_neighbors: cli.min_neighbors,
        min_size: cli.min_size,
    };
    let cascade = resolve_cascade(cli.cascade.as_ref())?;
    let detector = CascadeFaceDetector::from_file(&cascade, params)?;

    let mut source = open_source(&cli)?;
    let cancelled = Arc::new(AtomicBool::new(false));
    let mut capture = CaptureLoop::new(
        AnalyzeFrameUseCase::new(Box::new(detector)),
        SharedThreshold::new(cli.threshold),
        cancelled.clone(),
        Box::new(SummaryCaptureLogger::default()),
    );

    let mut processed = 0usize;
    let mut last: Option<FrameUpdate> = None;
    let end = capture.run(&mut *source, &mut |update| {
        processed += 1;
        print_update(&update);
        if cli.max_frames.is_some_and(|max| processed >= max) {
            cancelled.store(true, Ordering::Relaxed);
        }
        last = Some(update);
    });
    drop(source);

    match &end {
        LoopEnd::ReadFailed(reason) => log::warn!("Capture ended early: {reason}"),
        other => log::info!("Capture ended: {other:?}"),
    }
    println!("{STOPPED_TEXT}");

    if let Some(path) = &cli.snapshot {
        let update = last.ok_or("no frame was captured, nothing to snapshot")?;
        save_snapshot(&update.frame, path)?;
        log::info!("Snapshot written to {}", path.display());
    }

    Ok(())
}

fn open_source(cli: &Cli) -> Result<Box<dyn FrameSource>, SendError> {
    match &cli.input {
        Some(path) => Ok(Box::new(FfmpegFileSource::open(path)?)),
        None => {
            request_camera_access();
            Ok(Box::new(NokhwaCameraSource::open(cli.camera)?))
        }
    }
}

fn print_update(update: &FrameUpdate) {
    println!("frame {}: {}", update.frame.index(), update.result_text());
    if update.report.faces.len() > 1 {
        for (i, face) in update.report.faces.iter().enumerate() {
            let r = face.region;
            println!(
                "  face {} at ({}, {}) {}x{}: {}",
                i + 1,
                r.x,
                r.y,
                r.width,
                r.height,
                face.overlay_text()
            );
        }
    }
}

fn save_snapshot(frame: &Frame, path: &Path) -> Result<(), SendError> {
    let image = image::RgbImage::from_raw(frame.width(), frame.height(), frame.data().to_vec())
        .ok_or("frame buffer does not match its dimensions")?;
    image.save(path)?;
    Ok(())
}

fn validate(cli: &Cli) -> Result<(), SendError> {
    if let Some(input) = &cli.input {
        if !input.exists() {
            return Err(format!("Input file not found: {}", input.display()).into());
        }
    }
    if !THRESHOLD_RANGE.contains(&cli.threshold) {
        return Err(format!(
            "Threshold must be between {} and {}, got {}",
            THRESHOLD_RANGE.start(),
            THRESHOLD_RANGE.end(),
            cli.threshold
        )
        .into());
    }
    if cli.scale_factor.is_nan() || cli.scale_factor <= 1.0 {
        return Err(format!(
            "Scale factor must be greater than 1.0, got {}",
            cli.scale_factor
        )
        .into());
    }
    if cli.max_frames == Some(0) {
        return Err("--max-frames must be at least 1".into());
    }
    if let Some(snapshot) = &cli.snapshot {
        if !is_image(snapshot) {
            return Err(format!(
                "Snapshot must be an image file ({}), got {}",
                IMAGE_EXTENSIONS.join(", "),
                snapshot.display()
            )
            .into());
        }
    }
    Ok(())
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}
