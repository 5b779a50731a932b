//! Editor session: the single writer over one tactic board.
//!
//! DESIGN
//! ======
//! `EditorSession` owns the live document, the selection and active tool, the
//! arrow drawing machine, the in-flight drag preview, and the undo history.
//! Every structural mutation goes through one private `commit` that pushes
//! exactly one history snapshot after the change is applied. Drawing previews
//! and drag previews live outside the document, so high-frequency pointer
//! moves never touch history; only the terminal event of a gesture commits.
//!
//! The host constructs one session per board and feeds it either direct
//! operations (`add_player`, `complete_arrow`, ...) or raw input events
//! (`on_pointer_down`, `on_key_down`, ...), which return [`Action`]s describing
//! what changed. Rendering reads [`EditorSession::view`].
//!
//! ERROR HANDLING
//! ==============
//! Updates and removals of unknown ids return [`EditorError::NotFound`] and
//! leave history untouched. Out-of-order drawing events are ignored.
//! Non-finite coordinates are rejected before they reach the document.

#[cfg(test)]
#[path = "editor_test.rs"]
mod editor_test;

use std::borrow::Cow;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::EditorConfig;
use crate::consts::{
    ARROW_COLOR, AWAY_COLOR, DEFAULT_FONT_SIZE, DEFAULT_TEXT, DUPLICATE_OFFSET, HOME_COLOR, MAX_JERSEY_NUMBER,
    NEUTRAL_COLOR, TEXT_COLOR,
};
use crate::doc::{
    Arrow, ArrowPatch, ArrowStyle, ArrowTemplate, ArrowType, CanvasSize, Document, ElementId, ElementKind,
    ElementPatch, ElementRef, Player, PlayerPatch, Tactic, Team, TextAnnotation, TextPatch,
};
use crate::formation::{self, FormationTemplate};
use crate::geom::{self, Point};
use crate::hit::{self, HitPart};
use crate::history::History;
use crate::input::{
    ArrowClicks, ArrowDraft, ArrowDrawState, Button, DragPreview, InputState, Key, Modifiers, TempArrow, Tool,
    UiState,
};

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    ElementCreated(ElementRef),
    ElementUpdated(ElementRef),
    ElementDeleted(ElementRef),
    SelectionChanged(Option<ElementRef>),
    ToolChanged(Tool),
    HistoryChanged { can_undo: bool, can_redo: bool },
    /// A text annotation was placed; the host should open its inline editor.
    EditTextRequested { id: ElementId, text: String },
    RenderNeeded,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EditorError {
    #[error("element not found: {0}")]
    NotFound(ElementRef),
    #[error("coordinates must be finite")]
    InvalidCoordinate,
    #[error("unknown formation: {0}")]
    UnknownFormation(String),
}

// =============================================================
// Tool defaults
// =============================================================

/// Properties given to newly created elements.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDefaults {
    /// Team for new players; `None` places teamless tokens.
    pub team: Option<Team>,
    pub home_color: String,
    pub away_color: String,
    pub neutral_color: String,
    /// Shirt number given to the next player added.
    pub next_number: u32,
    pub arrow_color: String,
    pub arrow_width: f64,
    pub arrow_style: ArrowStyle,
    pub text_color: String,
    pub font_size: f64,
}

impl Default for ToolDefaults {
    fn default() -> Self {
        Self {
            team: Some(Team::Home),
            home_color: HOME_COLOR.to_string(),
            away_color: AWAY_COLOR.to_string(),
            neutral_color: NEUTRAL_COLOR.to_string(),
            next_number: 1,
            arrow_color: ARROW_COLOR.to_string(),
            arrow_width: 3.0,
            arrow_style: ArrowStyle::Solid,
            text_color: TEXT_COLOR.to_string(),
            font_size: DEFAULT_FONT_SIZE,
        }
    }
}

impl ToolDefaults {
    /// Colour for a player on `team`.
    #[must_use]
    pub fn player_color(&self, team: Option<Team>) -> &str {
        match team {
            Some(Team::Home) => &self.home_color,
            Some(Team::Away) => &self.away_color,
            None => &self.neutral_color,
        }
    }

    /// Hand out the next shirt number, wrapping after 99.
    fn take_number(&mut self) -> String {
        let n = self.next_number.clamp(1, MAX_JERSEY_NUMBER);
        self.next_number = if n >= MAX_JERSEY_NUMBER { 1 } else { n + 1 };
        n.to_string()
    }
}

// =============================================================
// Render view
// =============================================================

/// Read-only snapshot of everything a renderer needs.
///
/// `document` already has any drag preview merged in; it is borrowed from the
/// session unless a drag is in progress.
#[derive(Debug, Clone)]
pub struct RenderView<'a> {
    pub document: Cow<'a, Document>,
    pub selected: Option<ElementRef>,
    pub tool: Tool,
    pub arrow_state: ArrowDrawState,
    pub temp_arrow: Option<TempArrow>,
    pub drag_preview: Option<DragPreview>,
    pub canvas: CanvasSize,
}

// =============================================================
// Session
// =============================================================

/// One editable tactic board.
#[derive(Debug, Clone)]
pub struct EditorSession {
    doc: Document,
    tactic_id: Option<Uuid>,
    title: String,
    description: String,
    is_public: bool,
    ui: UiState,
    draft: ArrowDraft,
    input: InputState,
    history: History,
    canvas: CanvasSize,
    config: EditorConfig,
    /// Properties for newly created elements, edited by the host's tool panels.
    pub defaults: ToolDefaults,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl EditorSession {
    /// Create an empty board. History starts with one snapshot of the empty document.
    #[must_use]
    pub fn new(config: EditorConfig) -> Self {
        let doc = Document::new();
        Self {
            history: History::new(&doc, config.max_history),
            doc,
            tactic_id: None,
            title: String::new(),
            description: String::new(),
            is_public: false,
            ui: UiState::default(),
            draft: ArrowDraft::Idle,
            input: InputState::Idle,
            canvas: CanvasSize::default(),
            config,
            defaults: ToolDefaults::default(),
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn document(&self) -> &Document {
        &self.doc
    }

    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    #[must_use]
    pub fn tool(&self) -> Tool {
        self.ui.tool
    }

    /// The selected element, tagged with its kind.
    #[must_use]
    pub fn selection(&self) -> Option<ElementRef> {
        self.ui.selected
    }

    #[must_use]
    pub fn selected_id(&self) -> Option<ElementId> {
        self.ui.selected.map(|s| s.id)
    }

    #[must_use]
    pub fn arrow_state(&self) -> ArrowDrawState {
        self.draft.state()
    }

    #[must_use]
    pub fn temp_arrow(&self) -> Option<TempArrow> {
        self.draft.temp_arrow(self.config.control_offset_ratio)
    }

    #[must_use]
    pub fn drag_preview(&self) -> Option<DragPreview> {
        match self.input {
            InputState::Dragging { preview, .. } => Some(preview),
            InputState::Idle => None,
        }
    }

    #[must_use]
    pub fn canvas(&self) -> CanvasSize {
        self.canvas
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Everything the renderer needs, with any drag preview merged in.
    #[must_use]
    pub fn view(&self) -> RenderView<'_> {
        let document = match self.drag_preview() {
            Some(preview) => match preview_patch(&self.doc, &preview) {
                Some(patch) => {
                    let mut merged = self.doc.clone();
                    merged.apply_patch(&preview.element.id, &patch);
                    Cow::Owned(merged)
                }
                None => Cow::Borrowed(&self.doc),
            },
            None => Cow::Borrowed(&self.doc),
        };
        RenderView {
            document,
            selected: self.ui.selected,
            tool: self.ui.tool,
            arrow_state: self.draft.state(),
            temp_arrow: self.temp_arrow(),
            drag_preview: self.drag_preview(),
            canvas: self.canvas,
        }
    }

    // --- Host inputs ---

    /// Record the measured canvas size. Owned by the host, not history tracked.
    pub fn set_canvas_size(&mut self, width: f64, height: f64) {
        self.canvas = CanvasSize::new(width, height);
    }

    /// Switch the active tool. Leaving the arrow tool abandons any draft.
    pub fn set_tool(&mut self, tool: Tool) {
        if tool != Tool::Arrow {
            self.draft.cancel();
        }
        self.input = InputState::Idle;
        self.ui.tool = tool;
    }

    // --- Selection ---

    /// Select the element with `id`, or clear the selection with `None`.
    ///
    /// Re-selecting the current element and selecting an unknown id are
    /// no-ops. Selecting anything while a drawing tool is active switches back
    /// to the select tool. Returns whether the selection changed.
    pub fn select_element(&mut self, id: Option<ElementId>) -> bool {
        match id {
            None => self.clear_selection(),
            Some(id) => match self.doc.locate(&id) {
                Some(element) => self.select(element),
                None => false,
            },
        }
    }

    /// Select a tagged element. See [`EditorSession::select_element`].
    pub fn select(&mut self, element: ElementRef) -> bool {
        if self.ui.selected == Some(element) || !self.doc.contains(element) {
            return false;
        }
        self.ui.selected = Some(element);
        if self.ui.tool.is_drawing() {
            self.set_tool(Tool::Select);
        }
        true
    }

    /// Clear the selection. Returns whether anything was selected.
    pub fn clear_selection(&mut self) -> bool {
        self.ui.selected.take().is_some()
    }

    // --- Players ---

    /// Place a player with the current team, colour and shirt number, and select it.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InvalidCoordinate`] if `x` or `y` is not finite.
    pub fn add_player(&mut self, x: f64, y: f64) -> Result<Player, EditorError> {
        ensure_finite(Point::new(x, y))?;
        let team = self.defaults.team;
        let number = self.defaults.take_number();
        let player = Player::new(x, y, number, self.defaults.player_color(team), team);
        self.doc.players.push(player.clone());
        self.ui.selected = Some(ElementRef::player(player.id));
        self.commit("add player");
        debug!(id = %player.id, number = %player.number, "player added");
        Ok(player)
    }

    /// Apply a sparse update to a player.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::NotFound`] for unknown ids and
    /// [`EditorError::InvalidCoordinate`] for non-finite positions.
    pub fn update_player(&mut self, id: ElementId, patch: PlayerPatch) -> Result<(), EditorError> {
        self.update_element(id, &ElementPatch::Player(patch))
    }

    /// Delete a player, clearing the selection if it was selected.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::NotFound`] for unknown ids.
    pub fn remove_player(&mut self, id: ElementId) -> Result<(), EditorError> {
        self.remove_element(ElementRef::player(id))
    }

    // --- Arrows ---

    /// Insert an arrow built from `template` between `start` and `end`, and select it.
    ///
    /// Sequence arrows are numbered one past the highest number on the board.
    /// Returns `None` without touching history if the arrow would be degenerate
    /// or any bend point is not finite.
    pub fn add_arrow_from_template(&mut self, template: &ArrowTemplate, start: Point, end: Point) -> Option<Arrow> {
        if !start.is_finite() || !end.is_finite() || geom::distance(start, end) <= self.config.min_arrow_length {
            return None;
        }
        if !template.control_points.iter().all(|&(x, y)| x.is_finite() && y.is_finite()) {
            warn!(points = template.control_points.len(), "rejected template with non-finite bend points");
            return None;
        }
        let next_seq = self.doc.max_sequence_number().map_or(1, |n| n + 1);
        let arrow = template.instantiate(start, end, Some(next_seq));
        Some(self.insert_arrow(arrow, "add template arrow"))
    }

    /// Apply a sparse update to an arrow. The degenerate-length check does not
    /// apply to edits.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::NotFound`] for unknown ids and
    /// [`EditorError::InvalidCoordinate`] for non-finite points.
    pub fn update_arrow(&mut self, id: ElementId, patch: ArrowPatch) -> Result<(), EditorError> {
        self.update_element(id, &ElementPatch::Arrow(patch))
    }

    /// Delete an arrow, clearing the selection if it was selected.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::NotFound`] for unknown ids.
    pub fn remove_arrow(&mut self, id: ElementId) -> Result<(), EditorError> {
        self.remove_element(ElementRef::arrow(id))
    }

    // --- Arrow drawing ---

    /// Begin drawing an arrow at `(x, y)`. Any draft in progress is discarded.
    pub fn start_arrow(&mut self, x: f64, y: f64) -> bool {
        let p = Point::new(x, y);
        if !p.is_finite() {
            return false;
        }
        self.draft.start(p);
        true
    }

    /// Move the live end point of a started arrow.
    pub fn update_temp_arrow(&mut self, x: f64, y: f64) -> bool {
        let p = Point::new(x, y);
        p.is_finite() && self.draft.track(p)
    }

    /// Fix the end point of a started arrow.
    ///
    /// With three-click drawing the arrow moves to `Ended` with a default
    /// control point bowed out by a sixth of the chord. With two-click drawing
    /// the control point is offset by a fixed amount and the arrow is
    /// completed immediately.
    pub fn end_arrow(&mut self, x: f64, y: f64) -> bool {
        let end = Point::new(x, y);
        let Some(start) = self.draft.start_point() else {
            return false;
        };
        if !end.is_finite() || self.draft.state() != ArrowDrawState::Started {
            return false;
        }
        match self.config.arrow_clicks {
            ArrowClicks::Three => {
                let control = geom::proportional_control(start, end, self.config.control_offset_ratio);
                self.draft.end(end, control)
            }
            ArrowClicks::Two => {
                let control = geom::fixed_control(start, end, self.config.two_click_curve_offset);
                self.draft.end(end, control);
                self.complete_arrow();
                true
            }
        }
    }

    /// Move the control point of an ended arrow.
    pub fn update_arrow_control(&mut self, x: f64, y: f64) -> bool {
        let p = Point::new(x, y);
        p.is_finite() && self.draft.adjust_control(p)
    }

    /// Commit an ended arrow with the current arrow defaults.
    ///
    /// Arrows no longer than the degenerate threshold are discarded without a
    /// snapshot. A committed arrow is selected and the tool returns to select.
    pub fn complete_arrow(&mut self) -> Option<Arrow> {
        let temp = self.draft.finish()?;
        if temp.length() <= self.config.min_arrow_length {
            debug!(length = temp.length(), "degenerate arrow discarded");
            return None;
        }
        let arrow = Arrow::new(
            temp.start,
            temp.end,
            temp.control,
            self.defaults.arrow_color.clone(),
            self.defaults.arrow_width,
            self.defaults.arrow_style,
        );
        let arrow = self.insert_arrow(arrow, "complete arrow");
        self.ui.tool = Tool::Select;
        Some(arrow)
    }

    /// Abandon any arrow being drawn. Not a document mutation.
    pub fn cancel_arrow(&mut self) -> bool {
        self.draft.cancel()
    }

    // --- Text ---

    /// Place a text annotation with default content, and select it.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InvalidCoordinate`] if `x` or `y` is not finite.
    pub fn add_text(&mut self, x: f64, y: f64) -> Result<TextAnnotation, EditorError> {
        ensure_finite(Point::new(x, y))?;
        let text = TextAnnotation::new(x, y, DEFAULT_TEXT, self.defaults.text_color.clone(), self.defaults.font_size);
        self.doc.text_annotations.push(text.clone());
        self.ui.selected = Some(ElementRef::text(text.id));
        self.commit("add text");
        debug!(id = %text.id, "text added");
        Ok(text)
    }

    /// Apply a sparse update to a text annotation.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::NotFound`] for unknown ids and
    /// [`EditorError::InvalidCoordinate`] for non-finite positions.
    pub fn update_text(&mut self, id: ElementId, patch: TextPatch) -> Result<(), EditorError> {
        self.update_element(id, &ElementPatch::Text(patch))
    }

    /// Delete a text annotation, clearing the selection if it was selected.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::NotFound`] for unknown ids.
    pub fn remove_text(&mut self, id: ElementId) -> Result<(), EditorError> {
        self.remove_element(ElementRef::text(id))
    }

    // --- Generic element operations ---

    /// Apply `patch` to element `id` of the patch's kind, then snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::NotFound`] for unknown ids and
    /// [`EditorError::InvalidCoordinate`] for non-finite coordinates.
    pub fn update_element(&mut self, id: ElementId, patch: &ElementPatch) -> Result<(), EditorError> {
        if !patch.coordinates_finite() {
            warn!(%id, "rejected update with non-finite coordinates");
            return Err(EditorError::InvalidCoordinate);
        }
        if !self.doc.apply_patch(&id, patch) {
            return Err(EditorError::NotFound(ElementRef { kind: patch.kind(), id }));
        }
        self.commit("update element");
        Ok(())
    }

    /// Delete an element, clearing the selection if it was selected.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::NotFound`] if the element does not exist.
    pub fn remove_element(&mut self, element: ElementRef) -> Result<(), EditorError> {
        if !self.doc.remove(element) {
            return Err(EditorError::NotFound(element));
        }
        if self.ui.selected == Some(element) {
            self.ui.selected = None;
        }
        self.cancel_drag_of(element);
        self.commit("remove element");
        debug!(%element, "element removed");
        Ok(())
    }

    /// Delete the selected element. Returns what was deleted.
    pub fn delete_selected(&mut self) -> Option<ElementRef> {
        let element = self.ui.selected?;
        match self.remove_element(element) {
            Ok(()) => Some(element),
            Err(_) => None,
        }
    }

    /// Copy the selected element with a small offset and select the copy.
    pub fn duplicate_selected(&mut self) -> Option<ElementRef> {
        let selected = self.ui.selected?;
        let copy = match selected.kind {
            ElementKind::Player => {
                let mut p = self.doc.player(&selected.id)?.clone();
                p.id = Uuid::new_v4();
                p.x += DUPLICATE_OFFSET;
                p.y += DUPLICATE_OFFSET;
                let r = ElementRef::player(p.id);
                self.doc.players.push(p);
                r
            }
            ElementKind::Arrow => {
                let mut a = self.doc.arrow(&selected.id)?.clone();
                a.id = Uuid::new_v4();
                a.translate(DUPLICATE_OFFSET, DUPLICATE_OFFSET);
                if a.arrow_type == Some(ArrowType::Sequence) {
                    a.sequence_number = Some(self.doc.max_sequence_number().map_or(1, |n| n + 1));
                }
                let r = ElementRef::arrow(a.id);
                self.doc.arrows.push(a);
                r
            }
            ElementKind::Text => {
                let mut t = self.doc.text(&selected.id)?.clone();
                t.id = Uuid::new_v4();
                t.x += DUPLICATE_OFFSET;
                t.y += DUPLICATE_OFFSET;
                let r = ElementRef::text(t.id);
                self.doc.text_annotations.push(t);
                r
            }
        };
        self.ui.selected = Some(copy);
        self.commit("duplicate element");
        Some(copy)
    }

    /// Remove every element. Returns false, without a snapshot, if the board was already empty.
    pub fn clear_board(&mut self) -> bool {
        if self.doc.is_empty() {
            return false;
        }
        self.doc.clear();
        self.ui.selected = None;
        self.input = InputState::Idle;
        self.commit("clear board");
        true
    }

    // --- Formations ---

    /// Replace `team`'s players with `template` laid out on the current canvas.
    ///
    /// Players of the other team and teamless players are untouched. Returns
    /// the number of players placed.
    pub fn apply_formation(&mut self, template: &FormationTemplate, team: Team) -> usize {
        let players = formation::place(
            template,
            team,
            self.canvas,
            self.config.orientation,
            self.defaults.player_color(Some(team)),
        );
        let removed = self.doc.remove_team(team);
        if let Some(sel) = self.ui.selected {
            if !self.doc.contains(sel) {
                self.ui.selected = None;
            }
        }
        if let Some(preview) = self.drag_preview() {
            if !self.doc.contains(preview.element) {
                self.input = InputState::Idle;
            }
        }
        let placed = players.len();
        self.doc.players.extend(players);
        self.commit("apply formation");
        debug!(formation = %template.name, ?team, removed, placed, "formation applied");
        placed
    }

    /// Apply a built-in formation by name.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::UnknownFormation`] if no built-in formation matches.
    pub fn apply_formation_named(&mut self, name: &str, team: Team) -> Result<usize, EditorError> {
        let template = formation::find(name).ok_or_else(|| EditorError::UnknownFormation(name.to_string()))?;
        Ok(self.apply_formation(&template, team))
    }

    // --- History ---

    /// Restore the previous snapshot. Abandons any drawing or drag in progress.
    pub fn undo(&mut self) -> bool {
        self.draft.cancel();
        self.input = InputState::Idle;
        let Some(snapshot) = self.history.undo() else {
            return false;
        };
        self.doc = snapshot.clone();
        self.drop_stale_selection();
        debug!(index = self.history.index(), "undo");
        true
    }

    /// Re-apply the next snapshot. Abandons any drawing or drag in progress.
    pub fn redo(&mut self) -> bool {
        self.draft.cancel();
        self.input = InputState::Idle;
        let Some(snapshot) = self.history.redo() else {
            return false;
        };
        self.doc = snapshot.clone();
        self.drop_stale_selection();
        debug!(index = self.history.index(), "redo");
        true
    }

    // --- Tactic metadata ---

    #[must_use]
    pub fn tactic_id(&self) -> Option<Uuid> {
        self.tactic_id
    }

    /// Record the id the store assigned.
    pub fn set_tactic_id(&mut self, id: Uuid) {
        self.tactic_id = Some(id);
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    #[must_use]
    pub fn is_public(&self) -> bool {
        self.is_public
    }

    pub fn set_public(&mut self, is_public: bool) {
        self.is_public = is_public;
    }

    /// The saveable aggregate: metadata plus a copy of the document.
    #[must_use]
    pub fn to_tactic(&self) -> Tactic {
        Tactic {
            id: self.tactic_id,
            title: self.title.clone(),
            description: self.description.clone(),
            is_public: self.is_public,
            document: self.doc.clone(),
        }
    }

    /// Replace the board with `tactic` and reset history to a single snapshot of it.
    pub fn load_tactic(&mut self, tactic: Tactic) {
        self.tactic_id = tactic.id;
        self.title = tactic.title;
        self.description = tactic.description;
        self.is_public = tactic.is_public;
        self.doc = tactic.document;
        self.history.reset(&self.doc);
        self.ui = UiState::default();
        self.draft = ArrowDraft::Idle;
        self.input = InputState::Idle;
        let next = self.doc.players.iter().filter_map(Player::jersey_number).max().map_or(1, |n| n + 1);
        self.defaults.next_number = if next > MAX_JERSEY_NUMBER { 1 } else { next };
    }

    // --- Direct manipulation ---

    /// Start dragging `part` of `element`, grabbed at `pointer`.
    pub fn begin_drag(&mut self, element: ElementRef, part: HitPart, pointer: Point) -> bool {
        if !pointer.is_finite() {
            return false;
        }
        let Some(anchor) = self.drag_anchor(element, part) else {
            return false;
        };
        self.input = InputState::Dragging {
            preview: DragPreview { element, handle: part, position: anchor },
            grab_dx: pointer.x - anchor.x,
            grab_dy: pointer.y - anchor.y,
            moved: false,
        };
        true
    }

    /// Move the drag preview. Never touches the document or history.
    pub fn drag_to(&mut self, pointer: Point) -> bool {
        if !pointer.is_finite() {
            return false;
        }
        match &mut self.input {
            InputState::Dragging { preview, grab_dx, grab_dy, moved } => {
                preview.position = Point::new(pointer.x - *grab_dx, pointer.y - *grab_dy);
                *moved = true;
                true
            }
            InputState::Idle => false,
        }
    }

    /// Finish the drag, merging the preview into the element with one snapshot.
    ///
    /// Returns the updated element, or `None` if nothing was dragged or the
    /// pointer never moved.
    pub fn end_drag(&mut self) -> Option<ElementRef> {
        let InputState::Dragging { preview, moved, .. } = std::mem::take(&mut self.input) else {
            return None;
        };
        if !moved {
            return None;
        }
        let patch = preview_patch(&self.doc, &preview)?;
        match self.update_element(preview.element.id, &patch) {
            Ok(()) => Some(preview.element),
            Err(e) => {
                warn!(element = %preview.element, error = %e, "drag commit failed");
                None
            }
        }
    }

    /// Abandon the drag without changing the document.
    pub fn cancel_drag(&mut self) -> bool {
        !matches!(std::mem::take(&mut self.input), InputState::Idle)
    }

    // --- Input events ---

    /// Route a pointer press according to the active tool.
    pub fn on_pointer_down(&mut self, pt: Point, button: Button, _modifiers: Modifiers) -> Vec<Action> {
        if button != Button::Primary || !pt.is_finite() {
            return Vec::new();
        }
        match self.ui.tool {
            Tool::Player => match self.add_player(pt.x, pt.y) {
                Ok(p) => self.created_actions(ElementRef::player(p.id)),
                Err(_) => Vec::new(),
            },
            Tool::Text => match self.add_text(pt.x, pt.y) {
                Ok(t) => {
                    let mut actions = self.created_actions(ElementRef::text(t.id));
                    actions.push(Action::EditTextRequested { id: t.id, text: t.text });
                    actions
                }
                Err(_) => Vec::new(),
            },
            Tool::Arrow => self.arrow_click(pt),
            Tool::Select => self.select_press(pt),
        }
    }

    /// Update live previews: the drawing arrow or the dragged element.
    pub fn on_pointer_move(&mut self, pt: Point, _modifiers: Modifiers) -> Vec<Action> {
        let changed = match self.draft.state() {
            ArrowDrawState::Started => self.update_temp_arrow(pt.x, pt.y),
            ArrowDrawState::Ended if self.config.arrow_clicks == ArrowClicks::Three => {
                self.update_arrow_control(pt.x, pt.y)
            }
            _ => self.drag_to(pt),
        };
        if changed { vec![Action::RenderNeeded] } else { Vec::new() }
    }

    /// Commit a drag on release.
    pub fn on_pointer_up(&mut self, pt: Point, button: Button, _modifiers: Modifiers) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }
        if !matches!(self.input, InputState::Dragging { .. }) {
            return Vec::new();
        }
        self.drag_to(pt);
        match self.end_drag() {
            Some(element) => vec![Action::ElementUpdated(element), self.history_action(), Action::RenderNeeded],
            None => vec![Action::RenderNeeded],
        }
    }

    /// Keyboard shortcuts.
    ///
    /// - `Escape`: cancel drawing, else cancel a drag, else clear selection
    /// - `Delete` / `Backspace`: delete the selection
    /// - `Ctrl/Cmd+Z`: undo; `Ctrl/Cmd+Shift+Z` or `Ctrl/Cmd+Y`: redo
    /// - `Ctrl/Cmd+D`: duplicate the selection
    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        if key.is("Escape") {
            if self.cancel_arrow() || self.cancel_drag() {
                return vec![Action::RenderNeeded];
            }
            if self.clear_selection() {
                return vec![Action::SelectionChanged(None), Action::RenderNeeded];
            }
            return Vec::new();
        }
        if key.is("Delete") || key.is("Backspace") {
            return match self.delete_selected() {
                Some(element) => vec![
                    Action::ElementDeleted(element),
                    Action::SelectionChanged(None),
                    self.history_action(),
                    Action::RenderNeeded,
                ],
                None => Vec::new(),
            };
        }
        if modifiers.command() {
            let restored = if key.is("z") && !modifiers.shift {
                Some(self.undo())
            } else if key.is("z") || key.is("y") {
                Some(self.redo())
            } else {
                None
            };
            if let Some(changed) = restored {
                return if changed {
                    vec![self.history_action(), Action::SelectionChanged(self.ui.selected), Action::RenderNeeded]
                } else {
                    Vec::new()
                };
            }
            if key.is("d") {
                return match self.duplicate_selected() {
                    Some(copy) => self.created_actions(copy),
                    None => Vec::new(),
                };
            }
        }
        Vec::new()
    }

    // --- Internals ---

    fn commit(&mut self, reason: &'static str) {
        self.history.snapshot(&self.doc);
        debug!(reason, index = self.history.index(), len = self.history.len(), "history snapshot");
    }

    fn insert_arrow(&mut self, arrow: Arrow, reason: &'static str) -> Arrow {
        self.doc.arrows.push(arrow.clone());
        self.ui.selected = Some(ElementRef::arrow(arrow.id));
        self.commit(reason);
        debug!(id = %arrow.id, length = arrow.length(), "arrow added");
        arrow
    }

    fn drop_stale_selection(&mut self) {
        if let Some(sel) = self.ui.selected {
            if !self.doc.contains(sel) {
                self.ui.selected = None;
            }
        }
    }

    fn cancel_drag_of(&mut self, element: ElementRef) {
        if self.drag_preview().is_some_and(|p| p.element == element) {
            self.input = InputState::Idle;
        }
    }

    fn drag_anchor(&self, element: ElementRef, part: HitPart) -> Option<Point> {
        match element.kind {
            ElementKind::Player => self.doc.player(&element.id).map(Player::position),
            ElementKind::Text => self.doc.text(&element.id).map(TextAnnotation::position),
            ElementKind::Arrow => {
                let arrow = self.doc.arrow(&element.id)?;
                Some(match part {
                    HitPart::Body | HitPart::ArrowStart => arrow.start(),
                    HitPart::ArrowEnd => arrow.end(),
                    HitPart::ArrowControl => arrow.control(),
                })
            }
        }
    }

    fn arrow_click(&mut self, pt: Point) -> Vec<Action> {
        match self.draft.state() {
            ArrowDrawState::Idle => {
                self.start_arrow(pt.x, pt.y);
                vec![Action::RenderNeeded]
            }
            ArrowDrawState::Started => {
                let before = self.doc.arrows.len();
                self.end_arrow(pt.x, pt.y);
                if self.doc.arrows.len() > before { self.completed_actions() } else { vec![Action::RenderNeeded] }
            }
            ArrowDrawState::Ended => {
                self.update_arrow_control(pt.x, pt.y);
                match self.complete_arrow() {
                    Some(_) => self.completed_actions(),
                    None => vec![Action::RenderNeeded],
                }
            }
        }
    }

    fn completed_actions(&self) -> Vec<Action> {
        match self.ui.selected {
            Some(element) => {
                let mut actions = self.created_actions(element);
                actions.insert(2, Action::ToolChanged(self.ui.tool));
                actions
            }
            None => vec![Action::RenderNeeded],
        }
    }

    fn select_press(&mut self, pt: Point) -> Vec<Action> {
        match hit::hit_test(pt, &self.doc, self.ui.selected) {
            Some(hit) => {
                let changed = self.select(hit.element);
                self.begin_drag(hit.element, hit.part, pt);
                if changed {
                    vec![Action::SelectionChanged(Some(hit.element)), Action::RenderNeeded]
                } else {
                    Vec::new()
                }
            }
            None => {
                if self.clear_selection() {
                    vec![Action::SelectionChanged(None), Action::RenderNeeded]
                } else {
                    Vec::new()
                }
            }
        }
    }

    fn created_actions(&self, element: ElementRef) -> Vec<Action> {
        vec![
            Action::ElementCreated(element),
            Action::SelectionChanged(Some(element)),
            self.history_action(),
            Action::RenderNeeded,
        ]
    }

    fn history_action(&self) -> Action {
        Action::HistoryChanged { can_undo: self.history.can_undo(), can_redo: self.history.can_redo() }
    }
}

/// The patch that moves `preview.element` to the previewed position.
fn preview_patch(doc: &Document, preview: &DragPreview) -> Option<ElementPatch> {
    let pos = preview.position;
    match preview.element.kind {
        ElementKind::Player => Some(ElementPatch::Player(PlayerPatch::position(pos))),
        ElementKind::Text => Some(ElementPatch::Text(TextPatch::position(pos))),
        ElementKind::Arrow => {
            let arrow = doc.arrow(&preview.element.id)?;
            Some(ElementPatch::Arrow(match preview.handle {
                HitPart::Body => ArrowPatch::translated(arrow, pos.x - arrow.start_x, pos.y - arrow.start_y),
                HitPart::ArrowStart => ArrowPatch::start(pos),
                HitPart::ArrowEnd => ArrowPatch::end(pos),
                HitPart::ArrowControl => ArrowPatch::control(pos),
            }))
        }
    }
}

fn ensure_finite(p: Point) -> Result<(), EditorError> {
    if p.is_finite() {
        return Ok(());
    }
    warn!(x = p.x, y = p.y, "rejected non-finite position");
    Err(EditorError::InvalidCoordinate)
}
