//! Software-rendered overlay window using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌──────────────────────────────┬─────────────────────┐
//! │                              │  FINGERS            │
//! │   [hand skeleton overlay]    │  [T][I][M][R][P]    │
//! │                              │                     │
//! │                              │  pose: peace        │
//! │                              │  last: volume up    │
//! │                              │                     │
//! │  status bar                                        │
//! │  key legend                                        │
//! └──────────────────────────────┴─────────────────────┘
//! ```
//!
//! In simulation mode the window doubles as the input device: pose keys are
//! forwarded as [`SimInput`] to the sim frame source.

use minifb::{Key, KeyRepeat, Window, WindowOptions};

use std::sync::mpsc::Sender;

use hand_model::{Gesture, LandmarkFrame, LANDMARK_COUNT};

use crate::app::AppState;
use crate::pipeline::action_label;
use crate::source::{SimInput, SimKey};

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

pub const WIN_W: usize = 960;
pub const WIN_H: usize = 540;

const PANEL_X: usize = 20;
const PANEL_Y: usize = 50;
const PANEL_W: usize = 440;
const PANEL_H: usize = 420;

const SIDE_X: usize = 500;
const CELL_W: usize = 56;
const CELL_H: usize = 56;
const CELL_GAP: usize = 10;
const CELLS_Y: usize = 90;

const STATUS_Y: usize = WIN_H - 56;

const BG_COLOR: u32 = 0xFF1A1A2E;
const PANEL_BG: u32 = 0xFF16213E;
const TEXT_BG: u32 = 0xFF0F3460;
const BONE_COLOR: u32 = 0xFF5577AA;
const JOINT_COLOR: u32 = 0xFFAADDFF;
const TIP_COLOR: u32 = 0xFFFFD700;
const EXTENDED_COLOR: u32 = 0xFF4CAF7D;
const FLEXED_COLOR: u32 = 0xFF2A2A3E;

/// Bone segments of the 21-point hand, as landmark index pairs.
const HAND_CONNECTIONS: [(usize, usize); 21] = [
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 4), // thumb
    (0, 5),
    (5, 6),
    (6, 7),
    (7, 8), // index
    (5, 9),
    (9, 10),
    (10, 11),
    (11, 12), // middle
    (9, 13),
    (13, 14),
    (14, 15),
    (15, 16), // ring
    (13, 17),
    (0, 17),
    (17, 18),
    (18, 19),
    (19, 20), // pinky
];

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window: Window,
    buf: Vec<u32>,
    sim_tx: Sender<SimInput>,
    sim_mode: bool,
}

impl Visualizer {
    pub fn new(sim_tx: Sender<SimInput>, sim_mode: bool) -> anyhow::Result<Self> {
        let mut window = Window::new(
            "Gesture Control — Hand Landmark Overlay",
            WIN_W,
            WIN_H,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        )
        .map_err(|e| anyhow::anyhow!("opening overlay window: {e}"))?;

        window.limit_update_rate(Some(std::time::Duration::from_millis(16))); // ~60fps

        Ok(Visualizer {
            window,
            buf: vec![BG_COLOR; WIN_W * WIN_H],
            sim_tx,
            sim_mode,
        })
    }

    /// Returns false when the window should close.
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// Poll keyboard inputs and translate to SimInput events.
    pub fn poll_input(&mut self) -> bool {
        if !self.window.is_open() {
            return false;
        }

        if self.window.is_key_pressed(Key::Q, KeyRepeat::No) {
            let _ = self.sim_tx.send(SimInput::KeyDown(SimKey::Quit));
            return false;
        }

        if !self.sim_mode {
            // Frames come from the external detector; keys only quit.
            return true;
        }

        // Pose keys repeat while held — the debouncer is what keeps a held
        // pose from re-firing, not the keyboard.
        let held = [
            (Key::U, SimKey::ThumbsUp),
            (Key::D, SimKey::ThumbsDown),
            (Key::P, SimKey::Peace),
            (Key::T, SimKey::ThreeFingers),
            (Key::F, SimKey::Fist),
            (Key::O, SimKey::OpenPalm),
            (Key::X, SimKey::Point),
            (Key::N, SimKey::HandAway),
        ];
        for (key, sim) in held {
            if self.window.is_key_pressed(key, KeyRepeat::Yes) {
                let _ = self.sim_tx.send(SimInput::KeyDown(sim));
            }
        }

        true
    }

    /// Render one frame.
    pub fn render(&mut self, app: &AppState) {
        self.buf.fill(BG_COLOR);

        // ── Hand panel ────────────────────────────────────────────────────
        self.fill_rect(PANEL_X, PANEL_Y, PANEL_W, PANEL_H, PANEL_BG);
        self.draw_label("hand", PANEL_X, PANEL_Y - 14, 0xFF888888);
        match app.hand() {
            Some(frame) => self.draw_skeleton(frame),
            None => self.draw_label(
                "no hand",
                PANEL_X + PANEL_W / 2 - 14,
                PANEL_Y + PANEL_H / 2,
                0xFF666688,
            ),
        }

        // ── Finger-state cells ────────────────────────────────────────────
        self.draw_label("fingers", SIDE_X, CELLS_Y - 14, 0xFFAADDFF);
        let states = app
            .finger_state()
            .map(|s| s.as_array())
            .unwrap_or([false; 5]);
        for (i, (&extended, name)) in states.iter().zip(["t", "i", "m", "r", "p"]).enumerate() {
            let x = SIDE_X + i * (CELL_W + CELL_GAP);
            let color = if extended { EXTENDED_COLOR } else { FLEXED_COLOR };
            self.fill_rect(x, CELLS_Y, CELL_W, CELL_H, color);
            self.draw_border(x, CELLS_Y, CELL_W, CELL_H, 0xFF000000);
            self.draw_label(name, x + CELL_W / 2 - 1, CELLS_Y + CELL_H / 2 - 2, 0xFF000000);
        }

        // ── Pose / last action ────────────────────────────────────────────
        let pose = match app.finger_state() {
            Some(s) => format!("pose: {}", Gesture::classify(s)),
            None => "pose: -".to_string(),
        };
        self.draw_label(&pose, SIDE_X, CELLS_Y + CELL_H + 24, 0xFFEEEEEE);

        let last = match app.last_dispatched() {
            Some(g) => format!("last: {} ({} total)", action_label(g), app.dispatches()),
            None => "last: -".to_string(),
        };
        self.draw_label(&last, SIDE_X, CELLS_Y + CELL_H + 44, 0xFFFFD700);

        // ── Status bar ────────────────────────────────────────────────────
        self.fill_rect(0, STATUS_Y, WIN_W, 24, TEXT_BG);
        self.draw_label(&app.status, 10, STATUS_Y + 8, 0xFFEEEEEE);

        // ── Key legend ────────────────────────────────────────────────────
        let legend = if self.sim_mode {
            "u=thumbs up  d=thumbs down  p=peace  t=three  f=fist  o=palm  x=point  n=away  q=quit"
        } else {
            "q=quit  (frames from external detector)"
        };
        self.draw_label(legend, 10, WIN_H - 16, 0xFF888888);

        self.window.update_with_buffer(&self.buf, WIN_W, WIN_H).ok();
    }

    // ── Skeleton ──────────────────────────────────────────────────────────

    /// Map a normalized landmark into panel pixels.
    fn project(&self, x: f32, y: f32) -> (usize, usize) {
        let px = PANEL_X as f32 + x.clamp(0.0, 1.0) * (PANEL_W - 1) as f32;
        let py = PANEL_Y as f32 + y.clamp(0.0, 1.0) * (PANEL_H - 1) as f32;
        (px as usize, py as usize)
    }

    fn draw_skeleton(&mut self, frame: &LandmarkFrame) {
        for &(a, b) in &HAND_CONNECTIONS {
            let (x0, y0) = self.project(frame[a].x, frame[a].y);
            let (x1, y1) = self.project(frame[b].x, frame[b].y);
            self.draw_line(x0, y0, x1, y1, BONE_COLOR);
        }

        for idx in 0..LANDMARK_COUNT {
            let (x, y) = self.project(frame[idx].x, frame[idx].y);
            // Fingertips get a larger gold marker
            if matches!(idx, 4 | 8 | 12 | 16 | 20) {
                self.fill_rect(x.saturating_sub(2), y.saturating_sub(2), 5, 5, TIP_COLOR);
            } else {
                self.fill_rect(x.saturating_sub(1), y.saturating_sub(1), 3, 3, JOINT_COLOR);
            }
        }
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y + h).min(WIN_H) {
            for col in x..(x + w).min(WIN_W) {
                self.buf[row * WIN_W + col] = color;
            }
        }
    }

    fn draw_border(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for col in x..(x + w).min(WIN_W) {
            if y < WIN_H {
                self.buf[y * WIN_W + col] = color;
            }
            if y + h - 1 < WIN_H {
                self.buf[(y + h - 1) * WIN_W + col] = color;
            }
        }
        for row in y..(y + h).min(WIN_H) {
            if x < WIN_W {
                self.buf[row * WIN_W + x] = color;
            }
            if x + w - 1 < WIN_W {
                self.buf[row * WIN_W + x + w - 1] = color;
            }
        }
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < WIN_W && y < WIN_H {
            self.buf[y * WIN_W + x] = color;
        }
    }

    /// Bresenham line between two panel points.
    fn draw_line(&mut self, x0: usize, y0: usize, x1: usize, y1: usize, color: u32) {
        let (mut x0, mut y0) = (x0 as isize, y0 as isize);
        let (x1, y1) = (x1 as isize, y1 as isize);

        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            if x0 >= 0 && y0 >= 0 {
                self.set_pixel(x0 as usize, y0 as usize, color);
            }
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    /// Minimal bitmap font — 3×5 characters for label rendering.
    fn draw_label(&mut self, text: &str, x: usize, y: usize, color: u32) {
        let mut cx = x;
        for ch in text.chars() {
            let glyph = char_glyph(ch);
            for (row, &bits) in glyph.iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) != 0 {
                        self.set_pixel(cx + col, y + row, color);
                    }
                }
            }
            cx += 4; // 3 wide + 1 gap
            if cx + 4 > WIN_W {
                break;
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

fn char_glyph(c: char) -> [u8; 5] {
    match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'a' | 'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'b' | 'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'c' | 'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'd' | 'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' | 'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' | 'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' | 'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'h' | 'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' | 'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'j' | 'J' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'k' | 'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'l' | 'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' | 'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'n' | 'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'o' | 'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'p' | 'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'q' | 'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'r' | 'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' | 'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        't' | 'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' | 'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'v' | 'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'w' | 'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'x' | 'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'y' | 'Y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'z' | 'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        '#' => [0b101, 0b111, 0b101, 0b111, 0b101],
        '(' => [0b001, 0b010, 0b010, 0b010, 0b001],
        ')' => [0b100, 0b010, 0b010, 0b010, 0b100],
        '[' => [0b011, 0b010, 0b010, 0b010, 0b011],
        ']' => [0b110, 0b010, 0b010, 0b010, 0b110],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _ => [0b000, 0b000, 0b010, 0b000, 0b000], // fallback dot
    }
}
