//! Per-frame pipeline for one session:
//! decode -> detect -> hit-test UI or classify/debounce/dispatch -> composite
//! overlay -> panel + status line -> encode.
//!
//! A bad frame never costs state: decode errors return `None` before anything
//! is touched, and nothing here panics on input.

use std::collections::{HashMap, VecDeque};
use std::time::Instant;

use tracing::{debug, warn};
use xxhash_rust::xxh3::Xxh3;

use crate::annotate::{Annotator, Tool, composite};
use crate::codec;
use crate::config::{FPS_WINDOW, FRAME_CACHE_SIZE, POINTER_COLOR, POINTER_RADIUS};
use crate::debounce::{Action, Debouncer};
use crate::deck::DeckConverter;
use crate::draw::{draw_text_5x7, fill_disc};
use crate::error::Error;
use crate::gesture::classify;
use crate::landmarks::{HandDetector, KeypointSet};
use crate::presentation::Presentation;
use crate::types::{Canvas, Rgb};
use crate::ui::{Control, ControlPanel, HitResult, UiCommand};

/// What goes back to the client for one inbound frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameResult {
    /// JPEG of the composed display.
    pub frame: Vec<u8>,
    /// 0-based.
    pub current_slide: usize,
    pub total_slides: usize,
}

/// Smoothed frames-per-second over the last `FPS_WINDOW` frames.
pub struct FrameRate {
    samples: VecDeque<f32>,
    last: Instant,
}

impl FrameRate {
    pub fn new(start: Instant) -> Self {
        Self {
            samples: VecDeque::with_capacity(FPS_WINDOW),
            last: start,
        }
    }

    pub fn tick(&mut self, now: Instant) {
        let dt = now.saturating_duration_since(self.last).as_secs_f32();
        self.last = now;
        if dt <= 0.0 {
            return;
        }
        if self.samples.len() == FPS_WINDOW {
            self.samples.pop_front();
        }
        self.samples.push_back(1.0 / dt);
    }

    pub fn average(&self) -> Option<u32> {
        if self.samples.is_empty() {
            return None;
        }
        Some((self.samples.iter().sum::<f32>() / self.samples.len() as f32).round() as u32)
    }
}

pub struct Presenter<D> {
    detector: D,
    deck: Presentation,
    debouncer: Debouncer,
    annotator: Annotator,
    panel: ControlPanel,
    fps: FrameRate,
    cache: HashMap<u64, FrameResult>,
}

impl<D: HandDetector> Presenter<D> {
    pub fn new(detector: D) -> Self {
        Self::with_annotator(detector, Annotator::new())
    }

    pub fn with_annotator(detector: D, annotator: Annotator) -> Self {
        let deck = Presentation::new();
        let panel = ControlPanel::new(deck.size().0);
        Self {
            detector,
            deck,
            debouncer: Debouncer::new(),
            annotator,
            panel,
            fps: FrameRate::new(Instant::now()),
            cache: HashMap::new(),
        }
    }

    pub fn presentation(&self) -> &Presentation {
        &self.deck
    }

    pub fn debouncer(&self) -> &Debouncer {
        &self.debouncer
    }

    pub fn annotator(&self) -> &Annotator {
        &self.annotator
    }

    pub fn annotator_mut(&mut self) -> &mut Annotator {
        &mut self.annotator
    }

    pub fn panel(&self) -> &ControlPanel {
        &self.panel
    }

    pub fn detector_mut(&mut self) -> &mut D {
        &mut self.detector
    }

    /// Run one inbound frame through the pipeline. `None` means the frame was
    /// dropped; the session carries on with the next one.
    pub fn process_frame(&mut self, bytes: &[u8]) -> Option<FrameResult> {
        match self.try_process(bytes) {
            Ok(result) => Some(result),
            Err(e) => {
                warn!(error = %e, len = bytes.len(), "frame dropped");
                None
            }
        }
    }

    fn try_process(&mut self, bytes: &[u8]) -> Result<FrameResult, Error> {
        // Spray output differs on every run, so a replay would be wrong.
        let cacheable = !self.annotator.brush().style.is_stochastic();
        let key = self.cache_key(bytes);
        if cacheable {
            if let Some(hit) = self.cache.get(&key) {
                debug!(key, "frame cache hit");
                return Ok(hit.clone());
            }
        }

        let frame = codec::decode_frame(bytes)?;
        self.fps.tick(Instant::now());
        let hand = self.detector.detect(&frame);
        let display = self.step(hand.as_ref());

        let result = FrameResult {
            frame: codec::encode_jpeg(&display)?,
            current_slide: self.deck.current_index(),
            total_slides: self.deck.slide_count(),
        };

        if cacheable {
            if self.cache.len() >= FRAME_CACHE_SIZE {
                self.cache.clear();
            }
            self.cache.insert(key, result.clone());
        }
        Ok(result)
    }

    /// Hash of the inbound bytes plus every piece of state a frame reads or
    /// advances. A hit therefore only replays a frame whose processing would
    /// leave the session exactly as it found it.
    fn cache_key(&self, bytes: &[u8]) -> u64 {
        let mut h = Xxh3::new();
        h.update(bytes);

        let deck = &self.deck;
        h.update(&[deck.mode() as u8]);
        h.update(&(deck.current_index() as u64).to_le_bytes());
        h.update(&deck.revision().to_le_bytes());

        let d = &self.debouncer;
        h.update(&[d.last_gesture().map_or(u8::MAX, |g| g as u8), d.is_latched() as u8]);
        h.update(&d.cooldown().to_le_bytes());
        h.update(&d.navigation_lock().to_le_bytes());

        let brush = self.annotator.brush();
        h.update(&[brush.style as u8, self.annotator.tool() as u8]);
        h.update(&brush.color.packed().to_le_bytes());
        h.update(&brush.thickness.to_le_bytes());
        match self.annotator.anchor() {
            Some(p) => {
                h.update(&[1]);
                h.update(&p.x.to_le_bytes());
                h.update(&p.y.to_le_bytes());
            }
            None => h.update(&[0]),
        }

        for control in [Control::Eraser, Control::Whiteboard, Control::Style] {
            if let Some(hover) = self.panel.hover(control) {
                h.update(&[hover.hovering as u8]);
                h.update(&hover.cooldown.to_le_bytes());
            }
        }
        h.digest()
    }

    /// Advance all session state by one frame and compose the display.
    pub fn step(&mut self, hand: Option<&KeypointSet>) -> Canvas {
        let (width, height) = self.deck.size();
        let mut marker = None;

        if let Some(hand) = hand {
            let pointer = hand.pointer(width, height);
            match self.panel.hit_test(pointer) {
                HitResult::Consumed(command) => {
                    if let Some(command) = command {
                        self.apply(command);
                    }
                }
                HitResult::Outside => {
                    let gesture = classify(hand);
                    let dispatch = self.debouncer.step(gesture, pointer, self.deck.nav_context());
                    if dispatch.lift_pen {
                        self.annotator.lift();
                    }
                    match dispatch.action {
                        Some(Action::Stroke(p)) => {
                            if let Some(surface) = self.deck.active_drawing_mut() {
                                self.annotator.stroke_to(surface, p);
                            }
                        }
                        Some(Action::Pointer(p)) => marker = Some(p),
                        Some(Action::Next) => {
                            self.deck.next();
                        }
                        Some(Action::Previous) => {
                            self.deck.previous();
                        }
                        Some(Action::Clear) => self.annotator.clear_active(&mut self.deck),
                        None => {}
                    }
                }
            }
        }

        let background = self.deck.background();
        let mut out = match self.deck.active_drawing() {
            Some(drawing) if !drawing.is_empty() => composite(background, drawing),
            _ => background.clone(),
        };

        if let Some(p) = marker {
            fill_disc(&mut out, p, POINTER_RADIUS, POINTER_COLOR);
        }

        let brush = self.annotator.brush();
        self.panel.sync(&brush, self.annotator.tool(), self.deck.mode());
        self.panel.render(&mut out, &brush);

        if let Some(fps) = self.fps.average() {
            let status = format!("{} - FPS: {fps}", self.deck.label());
            draw_text_5x7(&mut out, 10, height as i32 - 34, &status, 2, Rgb::WHITE);
        }

        self.panel.tick();
        out
    }

    fn apply(&mut self, command: UiCommand) {
        debug!(?command, "ui command");
        match command {
            UiCommand::SelectBrush => self.annotator.set_tool(Tool::Brush),
            UiCommand::ToggleEraser => {
                self.annotator.toggle_eraser();
            }
            UiCommand::ToggleWhiteboard => self.toggle_whiteboard(),
            UiCommand::ClearActive => self.annotator.clear_active(&mut self.deck),
            UiCommand::CycleStyle => {
                self.annotator.cycle_style();
            }
            UiCommand::SetColor(c) => self.annotator.set_color(c),
            UiCommand::SetThickness(t) => self.annotator.set_thickness(t),
        }
    }

    /// Switch between the slide deck and the whiteboard. The pen is lifted so
    /// a stroke never joins points from two surfaces. Only the Board control
    /// reaches this.
    pub(crate) fn toggle_whiteboard(&mut self) {
        self.deck.toggle_whiteboard();
        self.annotator.lift();
    }

    pub fn clear_active(&mut self) {
        self.annotator.clear_active(&mut self.deck);
    }

    /// Convert and install a new deck. On failure the current deck stays.
    pub fn load_deck(&mut self, document: &[u8], converter: &impl DeckConverter) -> Result<usize, Error> {
        let pages = converter.convert(document).inspect_err(|e| {
            warn!(error = %e, bytes = document.len(), "deck conversion failed");
        })?;
        self.load_pages(pages)
    }

    pub fn load_pages(&mut self, pages: Vec<image::RgbImage>) -> Result<usize, Error> {
        let count = self.deck.load_pages(pages).inspect_err(|e| {
            warn!(error = %e, "deck load rejected");
        })?;
        self.annotator.lift();
        self.cache.clear();
        Ok(count)
    }
}
