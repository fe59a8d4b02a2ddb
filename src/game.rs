use tracing::debug;

use crate::board::{Board, FlipRecord};
use crate::error::GameError;
use crate::types::{Color, GameResult, GameSnapshot, Outcome, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    GameOver(Outcome),
}

/// One recorded history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    Move(FlipRecord),
    /// The given color had no legal destination and was skipped.
    Pass(Color),
}

/// What a successful move did to the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlyReport {
    pub record: FlipRecord,
    /// Set when the opponent was skipped right after this move.
    pub passed: Option<Color>,
    pub status: GameStatus,
}

/// Turn bookkeeping around a [`Board`]: mover, passes, termination and a
/// replayable history.
#[derive(Debug, Clone)]
pub struct GameState {
    board: Board,
    current: Color,
    status: GameStatus,
    history: Vec<Turn>,
    /// Number of history entries currently applied to `board`.
    cursor: usize,
}

impl GameState {
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            current: Color::Black,
            status: GameStatus::InProgress,
            history: Vec::new(),
            cursor: 0,
        }
    }

    /// Starts from an arbitrary position. A blocked mover hands the turn
    /// over; a position where nobody can move is finished immediately.
    pub fn from_position(board: Board, mover: Color) -> Self {
        let mut game = Self {
            board,
            current: mover,
            status: GameStatus::InProgress,
            history: Vec::new(),
            cursor: 0,
        };
        if !board.has_legal_move(mover) {
            if board.has_legal_move(-mover) {
                game.current = -mover;
            } else {
                game.finish();
            }
        }
        game
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_player(&self) -> Color {
        self.current
    }

    /// The color whose move is next. Differs from
    /// [`GameState::current_player`] only after stepping back over a
    /// recorded pass: the blocked color is shown, its opponent plays.
    pub fn mover(&self) -> Color {
        if self.pass_pending() {
            -self.current
        } else {
            self.current
        }
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_over(&self) -> bool {
        matches!(self.status, GameStatus::GameOver(_))
    }

    pub fn winner(&self) -> Option<Outcome> {
        match self.status {
            GameStatus::GameOver(outcome) => Some(outcome),
            GameStatus::InProgress => None,
        }
    }

    pub fn score(&self) -> (u8, u8) {
        self.board.score()
    }

    pub fn legal_moves(&self, color: Color) -> Vec<Position> {
        self.board.legal_moves(color)
    }

    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Plays `pos` for the current mover. Returns `false` without side
    /// effects when the move is rejected.
    pub fn apply_move(&mut self, pos: Position) -> bool {
        self.try_apply(self.mover(), pos).is_ok()
    }

    /// Bounds-checked variant of [`GameState::apply_move`] for raw coordinates.
    pub fn place(&mut self, row: i32, col: i32) -> Result<PlyReport, GameError> {
        let pos = Position::checked(row, col).ok_or(GameError::OutOfBounds { row, col })?;
        self.try_apply(self.mover(), pos)
    }

    pub fn try_apply(&mut self, color: Color, pos: Position) -> Result<PlyReport, GameError> {
        if self.is_over() {
            return Err(GameError::GameOver);
        }
        let mover = self.mover();
        if color != mover {
            return Err(GameError::NotYourTurn {
                expected: mover,
                got: color,
            });
        }

        let record = self
            .board
            .apply_move(pos, color)
            .ok_or(GameError::IllegalMove {
                position: pos,
                color,
            })?;
        if self.pass_pending() {
            self.step_forward();
        }
        self.history.truncate(self.cursor);
        self.push(Turn::Move(record));
        debug!(color = %color, position = %pos, flipped = record.len(), "move applied");

        self.enter_after_move(color);

        let mut passed = None;
        if !self.is_over() && !self.board.has_legal_move(self.current) {
            let skipped = self.current;
            self.push(Turn::Pass(skipped));
            self.current = -skipped;
            passed = Some(skipped);
            debug!(color = %skipped, "no legal move, turn passes");
        }

        Ok(PlyReport {
            record,
            passed,
            status: self.status,
        })
    }

    /// Retracts the last move, together with the pass it forced, and
    /// drops any entries left ahead of the replay cursor.
    pub fn undo(&mut self) -> bool {
        let applied = &self.history[..self.cursor];
        if !applied.iter().any(|turn| matches!(turn, Turn::Move(_))) {
            return false;
        }
        self.history.truncate(self.cursor);
        while matches!(self.history.last(), Some(Turn::Pass(_))) {
            self.step_back();
            self.history.pop();
        }
        if !matches!(self.history.last(), Some(Turn::Move(_))) {
            return false;
        }
        self.step_back();
        self.history.pop();
        true
    }

    /// Rewinds one history entry, keeping it for [`GameState::step_forward`].
    pub fn step_back(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        match self.history[self.cursor] {
            Turn::Move(record) => {
                self.board.undo_move(&record);
                self.current = record.color;
            }
            Turn::Pass(skipped) => {
                self.current = skipped;
            }
        }
        self.status = GameStatus::InProgress;
        true
    }

    /// Re-applies the next recorded history entry.
    pub fn step_forward(&mut self) -> bool {
        let Some(&turn) = self.history.get(self.cursor) else {
            return false;
        };
        match turn {
            Turn::Move(record) => {
                let Some(replayed) = self.board.apply_move(record.position, record.color) else {
                    return false;
                };
                debug_assert_eq!(replayed, record, "replay diverged from history");
                self.cursor += 1;
                self.enter_after_move(record.color);
            }
            Turn::Pass(skipped) => {
                self.cursor += 1;
                self.current = -skipped;
            }
        }
        true
    }

    pub fn can_step_forward(&self) -> bool {
        self.cursor < self.history.len()
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let (black_count, white_count) = self.board.score();
        let applied = &self.history[..self.cursor];
        let (is_pass, flipped) = match applied.last() {
            Some(Turn::Move(record)) => (false, record.positions()),
            Some(Turn::Pass(_)) => (true, Vec::new()),
            None => (false, Vec::new()),
        };
        let last_move = applied.iter().rev().find_map(|turn| match turn {
            Turn::Move(record) => Some(record.position),
            Turn::Pass(_) => None,
        });

        GameSnapshot {
            board: self.board.to_array().iter().map(|cell| cell.code()).collect(),
            current_player: self.mover(),
            black_count,
            white_count,
            is_game_over: self.is_over(),
            is_pass,
            flipped,
            last_move,
        }
    }

    pub fn result(&self) -> Option<GameResult> {
        let outcome = self.winner()?;
        let (black_count, white_count) = self.board.score();
        Some(GameResult {
            outcome,
            black_count,
            white_count,
        })
    }

    /// The cursor sits right before a recorded pass of the color to move.
    fn pass_pending(&self) -> bool {
        !self.is_over() && self.history.get(self.cursor) == Some(&Turn::Pass(self.current))
    }

    fn push(&mut self, turn: Turn) {
        self.history.push(turn);
        self.cursor += 1;
    }

    /// Hands the turn to the opponent of `mover`, or ends the game when
    /// neither side can move.
    fn enter_after_move(&mut self, mover: Color) {
        self.current = -mover;
        self.status = GameStatus::InProgress;
        if !self.board.has_legal_move(-mover) && !self.board.has_legal_move(mover) {
            self.finish();
        }
    }

    fn finish(&mut self) {
        let (black_count, white_count) = self.board.score();
        let outcome = Outcome::from_counts(black_count, white_count);
        self.status = GameStatus::GameOver(outcome);
        debug!(?outcome, black_count, white_count, "game over");
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
