//! Control panel drawn across the top band of the display, and pointer
//! hit-testing against it.
//!
//! Controls that flip state (eraser, whiteboard, style) only act when the
//! pointer *enters* them and their hover cooldown has run out, so resting a
//! fingertip on a button does not toggle it every frame.

use crate::annotate::Tool;
use crate::brush::{Brush, BrushStyle};
use crate::config::{BRUSH_SIZES, CONTROL_HEIGHT, HOVER_COOLDOWN, PALETTE};
use crate::draw::{draw_text_5x7, fill_rect, text_width};
use crate::presentation::Mode;
use crate::types::{Canvas, Point, Rgb};

const BUTTON_WIDTH: i32 = 60;
const BUTTON_SPACING: i32 = 5;
const SWATCH_WIDTH: i32 = 30;
const SWATCH_PITCH: i32 = 35;
const ROW_Y: i32 = 5;
const PANEL_MARGIN: i32 = 100;

const PANEL_COLOR: Rgb = Rgb::new(50, 50, 50);
const BUTTON_COLOR: Rgb = Rgb::new(100, 100, 100);
const ACTIVE_COLOR: Rgb = Rgb::new(255, 100, 100);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    Brush,
    Eraser,
    Style,
    Clear,
    Whiteboard,
    Color(Rgb),
    Size(u32),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UiCommand {
    SelectBrush,
    ToggleEraser,
    ToggleWhiteboard,
    ClearActive,
    CycleStyle,
    SetColor(Rgb),
    SetThickness(u32),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitResult {
    /// Pointer is not on any control; gestures should handle it.
    Outside,
    /// Pointer is on a control, which may or may not have acted this frame.
    Consumed(Option<UiCommand>),
}

impl HitResult {
    pub fn consumed(&self) -> bool {
        matches!(self, HitResult::Consumed(_))
    }
}

#[derive(Clone, Debug)]
pub struct UiElement {
    pub id: String,
    pub control: Control,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub color: Rgb,
    pub label: &'static str,
    pub active: bool,
}

impl UiElement {
    /// Edges inclusive.
    pub fn contains(&self, p: Point) -> bool {
        self.x <= p.x && p.x <= self.x + self.width && self.y <= p.y && p.y <= self.y + self.height
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HoverState {
    pub hovering: bool,
    pub cooldown: u32,
}

impl HoverState {
    /// Pointer is over the control this frame; true when it should act.
    fn enter(&mut self) -> bool {
        let fire = !self.hovering && self.cooldown == 0;
        self.hovering = true;
        if fire {
            self.cooldown = HOVER_COOLDOWN;
        }
        fire
    }

    fn leave(&mut self) {
        self.hovering = false;
    }

    fn tick(&mut self) {
        self.cooldown = self.cooldown.saturating_sub(1);
    }
}

pub struct ControlPanel {
    width: i32,
    elements: Vec<UiElement>,
    eraser: HoverState,
    whiteboard: HoverState,
    style: HoverState,
}

impl ControlPanel {
    /// Lay the controls out centred across a display `width` pixels wide.
    pub fn new(width: usize) -> Self {
        let tools = [
            (Control::Brush, "brush", "Brush"),
            (Control::Eraser, "eraser", "Eraser"),
            (Control::Style, "style", "Style"),
            (Control::Clear, "clear", "Clear"),
            (Control::Whiteboard, "whiteboard", "Board"),
        ];
        let count = (tools.len() + PALETTE.len() + BRUSH_SIZES.len()) as i32;
        let total = tools.len() as i32 * BUTTON_WIDTH
            + (PALETTE.len() + BRUSH_SIZES.len()) as i32 * SWATCH_WIDTH
            + (count - 1) * BUTTON_SPACING;
        let mut x = (width as i32 - total) / 2;
        let height = CONTROL_HEIGHT - 10;

        let mut elements = Vec::with_capacity(count as usize);
        for (control, id, label) in tools {
            elements.push(UiElement {
                id: id.to_string(),
                control,
                x,
                y: ROW_Y,
                width: BUTTON_WIDTH,
                height,
                color: BUTTON_COLOR,
                label,
                active: false,
            });
            x += BUTTON_WIDTH + BUTTON_SPACING;
        }
        for (name, color) in PALETTE {
            elements.push(UiElement {
                id: format!("color_{name}"),
                control: Control::Color(color),
                x,
                y: ROW_Y,
                width: SWATCH_WIDTH,
                height,
                color,
                label: "",
                active: false,
            });
            x += SWATCH_PITCH;
        }
        for (size, label) in BRUSH_SIZES.into_iter().zip(["S", "M", "L"]) {
            elements.push(UiElement {
                id: format!("size_{size}"),
                control: Control::Size(size),
                x,
                y: ROW_Y,
                width: SWATCH_WIDTH,
                height,
                color: BUTTON_COLOR,
                label,
                active: false,
            });
            x += SWATCH_PITCH;
        }

        Self {
            width: width as i32,
            elements,
            eraser: HoverState::default(),
            whiteboard: HoverState::default(),
            style: HoverState::default(),
        }
    }

    pub fn elements(&self) -> &[UiElement] {
        &self.elements
    }

    pub fn element(&self, id: &str) -> Option<&UiElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    fn hover_mut(&mut self, control: Control) -> Option<&mut HoverState> {
        match control {
            Control::Eraser => Some(&mut self.eraser),
            Control::Whiteboard => Some(&mut self.whiteboard),
            Control::Style => Some(&mut self.style),
            _ => None,
        }
    }

    fn leave_all_except(&mut self, keep: Option<Control>) {
        for control in [Control::Eraser, Control::Whiteboard, Control::Style] {
            if Some(control) != keep {
                if let Some(h) = self.hover_mut(control) {
                    h.leave();
                }
            }
        }
    }

    /// Test the pointer against the panel; the first control containing it wins.
    pub fn hit_test(&mut self, p: Point) -> HitResult {
        let hit = if p.y > CONTROL_HEIGHT {
            None
        } else {
            self.elements.iter().find(|e| e.contains(p)).map(|e| e.control)
        };
        self.leave_all_except(hit);
        let Some(control) = hit else {
            return HitResult::Outside;
        };

        let command = match control {
            Control::Brush => Some(UiCommand::SelectBrush),
            Control::Clear => Some(UiCommand::ClearActive),
            Control::Color(c) => Some(UiCommand::SetColor(c)),
            Control::Size(s) => Some(UiCommand::SetThickness(s)),
            Control::Eraser | Control::Whiteboard | Control::Style => {
                let fire = self.hover_mut(control).is_some_and(HoverState::enter);
                fire.then_some(match control {
                    Control::Eraser => UiCommand::ToggleEraser,
                    Control::Whiteboard => UiCommand::ToggleWhiteboard,
                    _ => UiCommand::CycleStyle,
                })
            }
        };
        HitResult::Consumed(command)
    }

    /// Advance hover cooldowns by one frame.
    pub fn tick(&mut self) {
        self.eraser.tick();
        self.whiteboard.tick();
        self.style.tick();
    }

    pub fn hover(&self, control: Control) -> Option<HoverState> {
        match control {
            Control::Eraser => Some(self.eraser),
            Control::Whiteboard => Some(self.whiteboard),
            Control::Style => Some(self.style),
            _ => None,
        }
    }

    /// Refresh highlight flags from the session state.
    pub fn sync(&mut self, brush: &Brush, tool: Tool, mode: Mode) {
        for e in &mut self.elements {
            e.active = match e.control {
                Control::Brush => tool == Tool::Brush,
                Control::Eraser => tool == Tool::Eraser,
                Control::Whiteboard => mode == Mode::Whiteboard,
                Control::Color(c) => c == brush.color,
                Control::Size(s) => s == brush.thickness,
                Control::Style | Control::Clear => false,
            };
        }
    }

    pub fn render(&self, fb: &mut Canvas, brush: &Brush) {
        fill_rect(fb, PANEL_MARGIN, 0, self.width - 2 * PANEL_MARGIN, CONTROL_HEIGHT, PANEL_COLOR);

        for e in &self.elements {
            let swatch = matches!(e.control, Control::Color(_));
            if swatch && e.active {
                // White frame around the selected colour.
                fill_rect(fb, e.x - 2, e.y - 2, e.width + 5, e.height + 5, Rgb::WHITE);
            }
            let color = if e.active && !swatch { ACTIVE_COLOR } else { e.color };
            fill_rect(fb, e.x, e.y, e.width + 1, e.height + 1, color);

            let label = if e.control == Control::Style { style_label(brush.style) } else { e.label };
            if !label.is_empty() {
                let tx = e.x + (e.width - text_width(label, 1)).max(0) / 2;
                let ty = e.y + (e.height - 7) / 2;
                draw_text_5x7(fb, tx, ty, label, 1, Rgb::WHITE);
            }
        }
    }
}

/// The style button shows the current style, abbreviated to fit.
fn style_label(style: BrushStyle) -> &'static str {
    match style {
        BrushStyle::Normal => "Style",
        BrushStyle::Spray => "Spray",
        BrushStyle::Calligraphy => "Nib",
        BrushStyle::Neon => "Neon",
    }
}
