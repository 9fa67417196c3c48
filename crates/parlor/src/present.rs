//! Presentation adapter: turns session views into chat-ready messages.
//!
//! The presenter never touches game rules. It reads a [`ViewState`] and
//! produces a [`RenderedView`]: a title, the board as emoji rows, a footer,
//! and one control per legal target. Clicking a control yields its id,
//! which goes back to the registry as a move request.

use std::collections::HashMap;

use parlor_board::BoardError;
use parlor_protocol::{
    Cell, GameStatus, MoveIntent, ParticipantId, SessionId, Target, Variant,
    ViewState,
};
use parlor_registry::{AbandonReason, RegistryError, SessionNotice};
use parlor_session::MoveError;
use serde::{Deserialize, Serialize};

use crate::command::{CommandError, COMMAND_PREFIX};
use crate::ParlorError;

// ---------------------------------------------------------------------------
// Display names
// ---------------------------------------------------------------------------

/// Resolves participants to the label shown in titles and footers.
pub trait DisplayNames: Send + Sync + 'static {
    fn display_label(&self, participant: ParticipantId) -> String;
}

/// Labels every participant with a platform mention, `<@id>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MentionNames;

impl DisplayNames for MentionNames {
    fn display_label(&self, participant: ParticipantId) -> String {
        format!("<@{}>", participant.0)
    }
}

/// A fixed name table. Unknown participants fall back to a mention.
impl DisplayNames for HashMap<ParticipantId, String> {
    fn display_label(&self, participant: ParticipantId) -> String {
        self.get(&participant)
            .cloned()
            .unwrap_or_else(|| MentionNames.display_label(participant))
    }
}

// ---------------------------------------------------------------------------
// Rendered output
// ---------------------------------------------------------------------------

/// One clickable button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Control {
    /// The [`MoveIntent`] id echoed back on click.
    pub id: String,
    pub label: String,
    pub disabled: bool,
    /// Button row in the message layout.
    pub row: usize,
}

/// A session view ready to post or edit into a chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedView {
    pub session: SessionId,
    pub title: String,
    /// Board rows, top to bottom, one emoji per cell.
    pub board: Vec<String>,
    pub footer: Option<String>,
    pub controls: Vec<Control>,
}

impl RenderedView {
    /// `true` once every control is disabled.
    pub fn is_locked(&self) -> bool {
        self.controls.iter().all(|c| c.disabled)
    }

    /// Finds the control whose label is `label`.
    pub fn control(&self, label: &str) -> Option<&Control> {
        self.controls.iter().find(|c| c.label == label)
    }
}

/// A short reply shown only to the user who caused it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub text: String,
    pub ephemeral: bool,
}

impl Feedback {
    fn ephemeral(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ephemeral: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Presenter
// ---------------------------------------------------------------------------

/// Renders views and error feedback.
pub struct Presenter<D: DisplayNames> {
    names: D,
    win_reward: i64,
}

impl<D: DisplayNames> Presenter<D> {
    /// `win_reward` is only used for the win footer; crediting happens in
    /// the registry.
    pub fn new(names: D, win_reward: i64) -> Self {
        Self { names, win_reward }
    }

    pub fn names(&self) -> &D {
        &self.names
    }

    /// Renders `view` for session `session`.
    pub fn render(&self, session: SessionId, view: &ViewState) -> RenderedView {
        let terminal = view.is_terminal();
        let (title, footer) = match view.status {
            GameStatus::InProgress => (
                title(view.variant).to_string(),
                Some(format!(
                    "{}'s turn",
                    self.names.display_label(view.current_participant())
                )),
            ),
            GameStatus::WonBy(winner) => {
                let label = self.names.display_label(winner);
                let footer = (self.win_reward != 0)
                    .then(|| format!("💰 {label} earned {} coins", self.win_reward));
                (format!("🎉 {label} wins!"), footer)
            }
            GameStatus::Drawn => (draw_banner(view.variant).to_string(), None),
            GameStatus::Abandoned => ("⏰ Game expired.".to_string(), None),
        };

        let board: Vec<String> = view
            .board
            .iter()
            .map(|row| row.iter().map(|c| symbol(view.variant, *c)).collect::<String>())
            .collect();

        RenderedView {
            session,
            title,
            board,
            footer,
            controls: controls(session, view, terminal),
        }
    }

    /// Renders the view carried by a registry notice.
    ///
    /// Abandon notices also say why the game ended.
    pub fn render_notice(&self, notice: &SessionNotice) -> RenderedView {
        let mut out = self.render(notice.session(), notice.view());
        if let SessionNotice::Abandoned { reason, .. } = notice {
            let (title, footer) = match reason {
                AbandonReason::IdleTimeout => ("⏰ Game expired.", "No move was made in time."),
                AbandonReason::Shutdown => ("🛑 Game closed.", "The game was stopped."),
            };
            out.title = title.to_string();
            out.footer = Some(footer.to_string());
        }
        out
    }

    /// The ephemeral reply for a failed command or interaction.
    pub fn feedback(&self, err: &ParlorError) -> Feedback {
        feedback(err)
    }
}

fn title(variant: Variant) -> &'static str {
    match variant {
        Variant::ConnectFour => "🎮 Connect4",
        Variant::TicTacToe => "❌⭕ TicTacToe",
    }
}

fn draw_banner(variant: Variant) -> &'static str {
    match variant {
        Variant::ConnectFour => "🤝 Draw!",
        Variant::TicTacToe => "🤝 It's a draw!",
    }
}

/// The emoji for one cell.
pub fn symbol(variant: Variant, cell: Cell) -> &'static str {
    match (variant, cell) {
        (Variant::ConnectFour, Cell::Empty) => "⚪",
        (Variant::ConnectFour, Cell::PlayerOne) => "🔴",
        (Variant::ConnectFour, Cell::PlayerTwo) => "🟡",
        (Variant::TicTacToe, Cell::Empty) => "⬜",
        (Variant::TicTacToe, Cell::PlayerOne) => "❌",
        (Variant::TicTacToe, Cell::PlayerTwo) => "⭕",
    }
}

fn controls(session: SessionId, view: &ViewState, terminal: bool) -> Vec<Control> {
    let id = |target: Target| MoveIntent { session, target }.to_string();
    let cols = view.variant.cols();

    if view.variant.has_gravity() {
        // A column is playable while its top cell is empty.
        (0..cols)
            .map(|col| Control {
                id: id(Target::Column(col)),
                label: (col + 1).to_string(),
                disabled: terminal
                    || !view.cell(0, col).is_some_and(Cell::is_empty),
                row: 0,
            })
            .collect()
    } else {
        (0..view.variant.rows())
            .flat_map(|row| (0..cols).map(move |col| (row, col)))
            .map(|(row, col)| {
                let cell = view.cell(row, col).unwrap_or_default();
                Control {
                    id: id(Target::Cell { row, col }),
                    label: symbol(view.variant, cell).to_string(),
                    disabled: terminal || !cell.is_empty(),
                    row,
                }
            })
            .collect()
    }
}

fn feedback(err: &ParlorError) -> Feedback {
    let text = match err {
        ParlorError::Registry(RegistryError::SelfChallenge(_)) => {
            "❌ You can't play against yourself!".to_string()
        }
        ParlorError::Registry(RegistryError::UnknownSession(_)) => {
            "This game is no longer active.".to_string()
        }
        ParlorError::Registry(RegistryError::DuplicateSession(_)) => {
            "This game is already running.".to_string()
        }
        ParlorError::Registry(RegistryError::Move(m)) => match m {
            MoveError::NotYourTurn(_) => "Not your turn!".to_string(),
            MoveError::GameAlreadyOver(_) => "❌ Game already ended.".to_string(),
            MoveError::IllegalMove(BoardError::ColumnFull(_)) => {
                "⚠️ Column is full!".to_string()
            }
            MoveError::IllegalMove(BoardError::CellOccupied(_)) => {
                "Cell already taken!".to_string()
            }
            MoveError::IllegalMove(_) => "⚠️ That move isn't on this board.".to_string(),
        },
        ParlorError::Protocol(_) => "⚠️ That button isn't part of a game.".to_string(),
        ParlorError::Command(CommandError::MissingOpponent(variant)) => format!(
            "Usage: `{COMMAND_PREFIX}{} <opponent>`",
            variant.command_name()
        ),
        ParlorError::Command(CommandError::InvalidOpponent(raw)) => {
            format!("❌ I couldn't find `{raw}`.")
        }
        ParlorError::Command(_) => format!(
            "Usage: `{COMMAND_PREFIX}connect4 <opponent>` or `{COMMAND_PREFIX}tictactoe <opponent>`"
        ),
    };
    Feedback::ephemeral(text)
}
