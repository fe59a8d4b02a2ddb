use serde::Serialize;
use tracing::debug;
use wasm_bindgen::prelude::*;

use crate::config::MatchConfig;
use crate::controller::MatchController;

#[wasm_bindgen]
pub fn wasm_ready() -> bool {
    true
}

/// Browser-facing handle over one match.
#[wasm_bindgen]
pub struct OthelloGame {
    controller: MatchController,
}

#[wasm_bindgen]
impl OthelloGame {
    /// `config` is a `MatchConfig` object; `undefined`/`null` selects the default seats.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<OthelloGame, JsError> {
        let config: MatchConfig = if config.is_undefined() || config.is_null() {
            MatchConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)?
        };
        let controller = MatchController::from_config(&config)?;
        Ok(Self { controller })
    }

    pub fn state(&self) -> Result<JsValue, JsError> {
        to_js(&self.controller.game().snapshot())
    }

    #[wasm_bindgen(js_name = legalMoves)]
    pub fn legal_moves(&self) -> Result<JsValue, JsError> {
        let game = self.controller.game();
        to_js(&game.legal_moves(game.mover()))
    }

    #[wasm_bindgen(js_name = isAgentTurn)]
    pub fn is_agent_turn(&self) -> bool {
        self.controller.is_agent_turn()
    }

    /// Plays a human move. Returns `false` when the move is rejected.
    pub fn place(&mut self, row: i32, col: i32) -> bool {
        match self.controller.human_move(row, col) {
            Ok(_) => true,
            Err(err) => {
                debug!(row, col, error = %err, "move rejected");
                false
            }
        }
    }

    /// Lets the seated agent play. Resolves to the played position, or
    /// `null` when the agent produced no move.
    #[wasm_bindgen(js_name = aiMove)]
    pub fn ai_move(&mut self) -> Result<JsValue, JsError> {
        let played = self
            .controller
            .agent_move()?
            .map(|report| report.record.position);
        to_js(&played)
    }

    pub fn undo(&mut self) -> bool {
        self.controller.game_mut().undo()
    }

    #[wasm_bindgen(js_name = stepBack)]
    pub fn step_back(&mut self) -> bool {
        self.controller.game_mut().step_back()
    }

    #[wasm_bindgen(js_name = stepForward)]
    pub fn step_forward(&mut self) -> bool {
        self.controller.game_mut().step_forward()
    }

    #[wasm_bindgen(js_name = isOver)]
    pub fn is_over(&self) -> bool {
        self.controller.game().is_over()
    }

    pub fn result(&self) -> Result<JsValue, JsError> {
        to_js(&self.controller.game().result())
    }

    pub fn restart(&mut self) {
        self.controller.restart();
    }
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsError> {
    Ok(serde_wasm_bindgen::to_value(value)?)
}
