//! LLM Gateway
//!
//! Adapters between the battle and an LLM. Defines the schema for LLM
//! inputs (`PromptContext`) and outputs (`LlmDecision`).

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::runtime::Runtime;

use crate::battle::ai::{EnemyDecision, EnemyPolicy, PolicyView};
use crate::battle::hex::Cell;
use crate::core::error::{Result, SkirmishError};
use crate::llm::client::LlmClient;
use crate::llm::parser::parse_reply;

// =========================================================================
//  INPUT SCHEMA (Rust -> LLM)
// =========================================================================

/// Structured context for the LLM prompt
#[derive(Serialize)]
pub struct PromptContext {
    pub turn: u32,
    pub grid: String,           // "10x10"
    pub you: CombatantSummary,  // the enemy, from the LLM's seat
    pub foe: CombatantSummary,  // the player
    pub distance: u32,
    pub hexes_per_turn: u32,
    pub abilities: Vec<String>,
}

#[derive(Serialize)]
pub struct CombatantSummary {
    pub name: String,
    pub position: String, // "col,row"
    pub hp: String,       // "60/75"
}

impl PromptContext {
    pub fn from_view(view: &PolicyView) -> Self {
        let summary = |f: &crate::battle::ai::FighterView| CombatantSummary {
            name: f.name.clone(),
            position: format!("{},{}", f.position.col, f.position.row),
            hp: format!("{}/{}", f.hp, f.max_hp),
        };
        let affordable = if view.step_cost > 0.0 {
            (view.enemy.movement_budget as f64 / view.step_cost).floor() as u32
        } else {
            view.steps_per_turn
        };
        Self {
            turn: view.turn,
            grid: format!("{}x{}", view.bounds.cols, view.bounds.rows),
            you: summary(&view.enemy),
            foe: summary(&view.player),
            distance: view.distance,
            hexes_per_turn: affordable.min(view.steps_per_turn),
            abilities: view.abilities.iter().map(|a| a.summary.clone()).collect(),
        }
    }
}

// =========================================================================
//  OUTPUT SCHEMA (LLM -> Rust)
// =========================================================================

/// The expected JSON output from the LLM
#[derive(Serialize, Deserialize, Debug)]
pub struct LlmDecision {
    /// Chain-of-thought reasoning
    #[serde(default)]
    pub reasoning: String,
    /// "move" or "attack"
    pub action: String,
    /// "col,row"
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub ability: Option<String>,
}

impl LlmDecision {
    /// Convert to an engine decision
    pub fn to_decision(&self) -> std::result::Result<EnemyDecision, String> {
        let target = self.target.as_deref().map(parse_coord).transpose()?;
        match self.action.to_lowercase().as_str() {
            "move" => {
                let target = target.ok_or("Move without a target")?;
                Ok(EnemyDecision::Move { target })
            }
            "attack" => {
                let ability = self.ability.clone().ok_or("Attack without an ability")?;
                Ok(EnemyDecision::Attack { ability, target })
            }
            _ => Err(format!("Unknown action: {}", self.action)),
        }
    }
}

fn parse_coord(s: &str) -> std::result::Result<Cell, String> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 2 {
        return Err(format!("Invalid coordinate format: {}", s));
    }
    let col = parts[0].trim().parse().map_err(|_| format!("Invalid column: {}", parts[0]))?;
    let row = parts[1].trim().parse().map_err(|_| format!("Invalid row: {}", parts[1]))?;
    Ok(Cell::new(col, row))
}

// =========================================================================
//  POLICY
// =========================================================================

/// Enemy policy that asks an LLM for each turn
pub struct LlmEnemyPolicy {
    client: LlmClient,
    runtime: Arc<Runtime>,
}

impl LlmEnemyPolicy {
    pub fn new(client: LlmClient, runtime: Arc<Runtime>) -> Self {
        Self { client, runtime }
    }

    pub fn from_env(runtime: Arc<Runtime>) -> Result<Self> {
        Ok(Self::new(LlmClient::from_env()?, runtime))
    }

    fn user_prompt(view: &PolicyView) -> Result<String> {
        let context = serde_json::to_string_pretty(&PromptContext::from_view(view))?;
        Ok(format!("BATTLE STATE:\n{}\n\nChoose your action as JSON:", context))
    }
}

impl EnemyPolicy for LlmEnemyPolicy {
    fn name(&self) -> &str {
        self.client.model()
    }

    fn decide(&mut self, view: &PolicyView) -> Result<EnemyDecision> {
        let user = Self::user_prompt(view)?;
        let reply = self.runtime.block_on(self.client.complete(DECISION_SYSTEM_PROMPT, &user))?;
        let decision: LlmDecision = parse_reply(&reply)?;
        tracing::debug!(reasoning = %decision.reasoning, action = %decision.action, "LLM decision");
        decision.to_decision().map_err(SkirmishError::LlmError)
    }
}

/// System prompt for enemy turns
const DECISION_SYSTEM_PROMPT: &str = r#"You control a monster in a turn-based duel on a hex grid.
Each turn you either ATTACK with one of your abilities or MOVE toward a cell.

RULES:
- An ability can only be used if the distance to your foe is at most its range.
- You move at most "hexes_per_turn" hexes; you cannot enter your foe's cell.
- Positions are "col,row". Distance is counted in hex steps.

OUTPUT FORMAT (JSON only, no explanation outside the JSON):
{
  "reasoning": "one short sentence",
  "action": "attack" | "move",
  "ability": "ability name (attack only)",
  "target": "col,row"
}

Examples:
{"reasoning": "The wizard is in bow range.", "action": "attack", "ability": "Bow Attack", "target": "2,5"}
{"reasoning": "Too far away, closing in.", "action": "move", "target": "7,5"}
"#;
