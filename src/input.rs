//! Input model: tools, modifier keys, buttons, and the gesture state machines.
//!
//! `Tool` is the user's active mode. `UiState` is the persistent selection and
//! tool visible to the renderer. Two state machines track in-flight gestures
//! between input events:
//!
//! - `ArrowDraft` is the multi-stage arrow drawing machine
//!   (`Idle → Started → Ended → Idle`). It only tracks geometry; committing the
//!   finished arrow is the editor's job.
//! - `InputState` tracks direct-manipulation drags. The dragged position lives
//!   in a `DragPreview` here, outside the document, and is merged into the
//!   element only when the gesture ends.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::doc::ElementRef;
use crate::geom::{self, Point};
use crate::hit::HitPart;

/// Which tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Pointer / selection tool (default).
    #[default]
    Select,
    /// Click to place a player.
    Player,
    /// Click-click-click to draw a curved arrow.
    Arrow,
    /// Click to place a text annotation.
    Text,
}

impl Tool {
    /// Whether this tool places new elements rather than manipulating existing ones.
    #[must_use]
    pub fn is_drawing(self) -> bool {
        !matches!(self, Self::Select)
    }
}

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Command on macOS.
    #[must_use]
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Primary,
    Middle,
    Secondary,
}

/// A keyboard key as reported by the browser (e.g. `"Escape"`, `"Delete"`, `"z"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    /// Whether this key names `name`, ignoring ASCII case.
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.0.eq_ignore_ascii_case(name)
    }
}

/// Persistent UI state visible to the renderer.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Currently active tool.
    pub tool: Tool,
    /// The selected element, if any.
    pub selected: Option<ElementRef>,
}

// =============================================================
// Arrow drawing
// =============================================================

/// How many clicks finish an arrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArrowClicks {
    /// Start, end, then confirm the curve after adjusting its control point.
    #[default]
    Three,
    /// Start then end; the curve is derived automatically.
    Two,
}

/// Observable stage of the arrow drawing machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArrowDrawState {
    #[default]
    Idle,
    Started,
    Ended,
}

/// The provisional arrow shown while drawing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TempArrow {
    pub start: Point,
    pub end: Point,
    pub control: Point,
}

impl TempArrow {
    /// Chord length between start and end.
    #[must_use]
    pub fn length(&self) -> f64 {
        geom::distance(self.start, self.end)
    }
}

/// Arrow drawing state machine.
///
/// While `Started`, the end follows the pointer and the preview control point
/// is derived from the chord. Once `Ended`, the control point belongs to the
/// user until the arrow is completed or cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ArrowDraft {
    #[default]
    Idle,
    Started {
        start: Point,
        end: Point,
    },
    Ended {
        start: Point,
        end: Point,
        control: Point,
    },
}

impl ArrowDraft {
    #[must_use]
    pub fn state(&self) -> ArrowDrawState {
        match self {
            Self::Idle => ArrowDrawState::Idle,
            Self::Started { .. } => ArrowDrawState::Started,
            Self::Ended { .. } => ArrowDrawState::Ended,
        }
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Start point of the draft, if drawing.
    #[must_use]
    pub fn start_point(&self) -> Option<Point> {
        match *self {
            Self::Idle => None,
            Self::Started { start, .. } | Self::Ended { start, .. } => Some(start),
        }
    }

    /// The provisional arrow to render. `preview_ratio` derives the control
    /// point while the end is still following the pointer.
    #[must_use]
    pub fn temp_arrow(&self, preview_ratio: f64) -> Option<TempArrow> {
        match *self {
            Self::Idle => None,
            Self::Started { start, end } => {
                Some(TempArrow { start, end, control: geom::proportional_control(start, end, preview_ratio) })
            }
            Self::Ended { start, end, control } => Some(TempArrow { start, end, control }),
        }
    }

    /// Begin a new draft at `p`, discarding any draft already in progress.
    pub fn start(&mut self, p: Point) {
        *self = Self::Started { start: p, end: p };
    }

    /// Move the live end point. Only valid while `Started`.
    pub fn track(&mut self, p: Point) -> bool {
        match self {
            Self::Started { end, .. } => {
                *end = p;
                true
            }
            _ => false,
        }
    }

    /// Fix the end point and control point. Only valid while `Started`.
    pub fn end(&mut self, p: Point, control: Point) -> bool {
        match *self {
            Self::Started { start, .. } => {
                *self = Self::Ended { start, end: p, control };
                true
            }
            _ => false,
        }
    }

    /// Move the control point. Only valid while `Ended`.
    pub fn adjust_control(&mut self, p: Point) -> bool {
        match self {
            Self::Ended { control, .. } => {
                *control = p;
                true
            }
            _ => false,
        }
    }

    /// Take the finished arrow and return to `Idle`. Only valid while `Ended`.
    pub fn finish(&mut self) -> Option<TempArrow> {
        match *self {
            Self::Ended { start, end, control } => {
                *self = Self::Idle;
                Some(TempArrow { start, end, control })
            }
            _ => None,
        }
    }

    /// Abandon any draft. Returns false if there was nothing to cancel.
    pub fn cancel(&mut self) -> bool {
        if self.is_idle() {
            return false;
        }
        *self = Self::Idle;
        true
    }
}

// =============================================================
// Direct manipulation
// =============================================================

/// Provisional position of an element being dragged.
///
/// Kept outside the document so pointer moves never touch history.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragPreview {
    pub element: ElementRef,
    /// Which part moves. For an arrow `Body`, `position` is the new start point.
    pub handle: HitPart,
    pub position: Point,
}

/// Internal state for the direct-manipulation gesture machine.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InputState {
    /// No drag in progress.
    #[default]
    Idle,
    /// The user is dragging an element or one of its handles.
    Dragging {
        /// Current provisional position.
        preview: DragPreview,
        /// Pointer position minus the anchor at grab time, so the element
        /// does not jump to the pointer.
        grab_dx: f64,
        grab_dy: f64,
        /// Whether the pointer has moved since the grab.
        moved: bool,
    },
}
