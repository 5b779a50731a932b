
use clap::Parser;
use tactic_board::config::{ConfigError, EditorConfig};
use tactic_board::doc::Team;
use tactic_board::editor::{EditorError, EditorSession};
use tactic_board::input::ArrowDrawState;
use tactic_board::persistence::{self, MemoryStore, StoreError};

#[derive(Debug, thiserror::Error)]
enum DemoError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("editor error: {0}")]
    Editor(#[from] EditorError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("arrow was too short to keep")]
    DegenerateArrow,
    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),
}

/// Sketch a tactic on an in-memory board, save it, reload it, and print the stored JSON.
#[derive(Parser, Debug)]
#[command(name = "tactic-board", about = "Tactic board editor demo")]
struct Cli {
    #[arg(long, default_value = "4-4-2")]
    home: String,

    #[arg(long, default_value = "4-3-3")]
    away: String,

    #[arg(long, default_value = "Demo tactic")]
    title: String,

    #[arg(long, env = "TACTIC_CANVAS_WIDTH", default_value_t = 1050.0)]
    width: f64,

    #[arg(long, env = "TACTIC_CANVAS_HEIGHT", default_value_t = 680.0)]
    height: f64,

    /// Pretty-print the saved tactic.
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> Result<(), DemoError> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    let config = EditorConfig::from_env()?;

    let mut session = EditorSession::new(config);
    session.set_canvas_size(cli.width, cli.height);
    session.set_title(cli.title);
    session.apply_formation_named(&cli.home, Team::Home)?;
    session.apply_formation_named(&cli.away, Team::Away)?;

    let (w, h) = (cli.width, cli.height);
    draw_arrow(&mut session, (w * 0.25, h * 0.5), (w * 0.45, h * 0.3))?;
    let note = session.add_text(w * 0.5, h * 0.05)?;
    session.update_text(
        note.id,
        tactic_board::doc::TextPatch { text: Some("Switch play early".into()), ..Default::default() },
    )?;

    let store = MemoryStore::new();
    let id = persistence::save_session(&store, &mut session).await?;

    let mut reloaded = EditorSession::new(config);
    persistence::load_session(&store, &mut reloaded, id).await?;
    tracing::info!(
        %id,
        players = reloaded.document().players.len(),
        arrows = reloaded.document().arrows.len(),
        "tactic reloaded"
    );

    let tactic = reloaded.to_tactic();
    let json = if cli.pretty { serde_json::to_string_pretty(&tactic)? } else { serde_json::to_string(&tactic)? };
    println!("{json}");
    Ok(())
}

/// Draw one arrow with whichever click mode the session is configured for.
/// Two-click sessions commit on `end_arrow`; three-click ones need a confirm.
fn draw_arrow(session: &mut EditorSession, start: (f64, f64), end: (f64, f64)) -> Result<(), DemoError> {
    let before = session.document().arrows.len();
    session.start_arrow(start.0, start.1);
    session.end_arrow(end.0, end.1);
    if session.arrow_state() == ArrowDrawState::Ended {
        session.complete_arrow();
    }
    if session.document().arrows.len() > before { Ok(()) } else { Err(DemoError::DegenerateArrow) }
}
