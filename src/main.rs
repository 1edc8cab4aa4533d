// Local harness: webcam frames in, composed presenter output in a window.
//
// The mouse stands in for the hand landmark detector. Move it to place the
// index fingertip; digit keys pick the finger pose:
//   0 fist (no gesture)   1 pointer   2 draw   3 previous   4 next   5 clear
// The whiteboard is toggled from the Board button like any other control.
// ESC quits.

mod camera;
mod window;

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use gesture_deck::codec::{decode_display, encode_jpeg};
use gesture_deck::config::{DISPLAY_HEIGHT, DISPLAY_WIDTH, PROCESS_HEIGHT, PROCESS_WIDTH};
use gesture_deck::deck::decode_pages;
use gesture_deck::draw::draw_text_5x7;
use gesture_deck::landmarks::{FingerStates, HandDetector, KeypointSet};
use gesture_deck::types::{Canvas, Rgb};
use gesture_deck::{Error, Presenter};
use tracing::{info, warn};

use camera::CameraCapture;
use window::Display;

/// Finger poses selectable from the keyboard, in digit-key order.
const POSES: [FingerStates; 6] = [
    FingerStates::from_bits(0b00000),
    FingerStates::from_bits(0b01000),
    FingerStates::from_bits(0b01100),
    FingerStates::from_bits(0b11000),
    FingerStates::from_bits(0b11100),
    FingerStates::from_bits(0b11111),
];

#[derive(Parser)]
#[command(name = "gesture-deck", version, about = "Hand-gesture slide presenter and whiteboard")]
struct Args {
    /// Slide images, in order (PNG, JPEG, ...)
    deck: Vec<PathBuf>,

    /// Camera device index
    #[arg(long, short = 'c', default_value_t = 0)]
    camera: u32,

    /// Run without a webcam, feeding a flat grey frame instead
    #[arg(long)]
    no_camera: bool,
}

/// Hand detector driven by the mouse and keyboard.
struct MouseHand {
    at: Option<(f32, f32)>,
    pose: FingerStates,
}

impl HandDetector for MouseHand {
    fn detect(&mut self, _frame: &Canvas) -> Option<KeypointSet> {
        let (x, y) = self.at?;
        Some(KeypointSet::synthetic(
            x / DISPLAY_WIDTH as f32,
            y / DISPLAY_HEIGHT as f32,
            self.pose,
        ))
    }
}

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut presenter = Presenter::new(MouseHand {
        at: None,
        pose: POSES[0],
    });

    if !args.deck.is_empty() {
        let files = args
            .deck
            .iter()
            .map(|p| fs::read(p).map_err(|e| Error::DeckConversion(format!("Read {}: {e}", p.display()))))
            .collect::<Result<Vec<_>, _>>()?;
        let pages = decode_pages(files.iter().map(Vec::as_slice))?;
        presenter.load_pages(pages)?;
    }

    let mut cam = if args.no_camera {
        None
    } else {
        match CameraCapture::new(args.camera, PROCESS_WIDTH, PROCESS_HEIGHT) {
            Ok(cam) => {
                let (w, h) = cam.resolution();
                info!(w, h, "using camera {}", args.camera);
                Some(cam)
            }
            Err(e) => {
                warn!(error = %e, "no camera; using a blank feed");
                None
            }
        }
    };
    let grey = Canvas::filled(PROCESS_WIDTH as usize, PROCESS_HEIGHT as usize, Rgb::new(128, 128, 128));
    let mut tick: u64 = 0;

    let mut display = Display::new("Gesture Deck", DISPLAY_WIDTH, DISPLAY_HEIGHT)?;

    let mut last_report = Instant::now();
    let mut frames: u32 = 0;

    while display.is_open() && !display.esc_pressed() {
        let bytes = match cam.as_mut() {
            Some(cam) => encode_jpeg(&cam.next_frame()?)?,
            None => {
                // Identical bytes would be served from the frame cache; stamp a counter.
                let mut frame = grey.clone();
                draw_text_5x7(&mut frame, 4, 4, &tick.to_string(), 1, Rgb::WHITE);
                tick += 1;
                encode_jpeg(&frame)?
            }
        };

        if let Some(i) = display.pose_pressed() {
            presenter.detector_mut().pose = POSES[i];
        }
        presenter.detector_mut().at = display.mouse_pos();

        if let Some(result) = presenter.process_frame(&bytes) {
            let out = decode_display(&result.frame)?;
            display.present(&out)?;
        }

        frames += 1;
        let elapsed = last_report.elapsed();
        if elapsed >= Duration::from_secs(1) {
            info!(
                fps = %format!("{:.1}", frames as f32 / elapsed.as_secs_f32()),
                slide = %presenter.presentation().label(),
                "frame loop"
            );
            frames = 0;
            last_report = Instant::now();
        }
    }

    Ok(())
}
