//! Editor core for the soccer tactics drawing board.
//!
//! This crate owns everything about a tactic that has real invariants: the
//! document of players, curved arrows and text labels, the pointer-driven
//! interaction state machine (including multi-stage arrow drawing with an
//! editable control point), and the linear undo/redo history that snapshots
//! the whole document on every committed mutation. Painting the pitch and the
//! property panels live in the host; the host feeds input events in and reads
//! a [`editor::RenderView`] back out.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`editor`] | The [`editor::EditorSession`] single writer and its host [`editor::Action`]s |
//! | [`doc`] | Players, arrows, text annotations, patches, and the [`doc::Tactic`] aggregate |
//! | [`history`] | Bounded snapshot stack driving undo/redo |
//! | [`input`] | Tools, input event types, and the gesture / arrow-drawing states |
//! | [`hit`] | Hit-testing pointer positions against document elements |
//! | [`geom`] | Points, quadratic Bézier helpers, and curve distance |
//! | [`formation`] | Formation templates and the formation applier |
//! | [`persistence`] | Save/load contract against an external tactic store |
//! | [`config`] | Environment-driven editor configuration |
//! | [`consts`] | Shared numeric constants and default colours |

pub mod config;
pub mod consts;
pub mod doc;
pub mod editor;
pub mod formation;
pub mod geom;
pub mod hit;
pub mod history;
pub mod input;
pub mod persistence;
