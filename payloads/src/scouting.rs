//! Row types for the scouting list views.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A player row in the players list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub id_player: i64,
    pub player_name: String,
    pub position_player: Option<String>,
    pub team_name: Option<String>,
    pub nationality_1: Option<String>,
    pub age: Option<u32>,
    pub player_rating: Option<f64>,
    /// Market value in euros.
    pub player_trfm_value: Option<f64>,
    pub team_competition: Option<String>,
}

impl PlayerSummary {
    pub fn item_id(&self) -> String {
        self.id_player.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoutSummary {
    pub id_scout: String,
    pub scout_name: String,
    pub nationality: Option<String>,
    pub total_reports: u32,
    pub scout_elo: Option<f64>,
    pub scout_level: Option<String>,
}

impl ScoutSummary {
    pub fn item_id(&self) -> String {
        self.id_scout.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub id_report: String,
    pub player_name: String,
    pub scout_name: String,
    pub report_type: Option<String>,
    /// 1-5 stars, if the scout rated the player.
    pub rating: Option<u8>,
    pub created_at: Timestamp,
}

impl ReportSummary {
    pub fn item_id(&self) -> String {
        self.id_report.clone()
    }
}
