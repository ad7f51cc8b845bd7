//! Deterministic scouting data for the mock endpoints.
//!
//! Used by the dev-server to give the UI enough rows to scroll through, and
//! by tests that want realistic multi-page datasets without writing them out.

use crate::MockStore;
use jiff::{Span, Timestamp};
use payloads::scouting::{PlayerSummary, ReportSummary, ScoutSummary};
use uuid::Uuid;

const FIRST_NAMES: &[&str] = &[
    "Lionel", "Kylian", "Erling", "Jude", "Pedri", "Vinicius", "Bukayo",
    "Jamal", "Florian", "Rodrygo", "Martin", "Alexis",
];
const LAST_NAMES: &[&str] = &[
    "Messi", "Mbappe", "Haaland", "Bellingham", "Gonzalez", "Junior", "Saka",
    "Musiala", "Wirtz", "Goes", "Odegaard", "Mac Allister",
];
const NATIONALITIES: &[&str] = &[
    "Argentina", "France", "Norway", "England", "Spain", "Brazil", "Germany",
];
const POSITIONS: &[&str] = &["GK", "CB", "FB", "DM", "CM", "AM", "W", "ST"];
const TEAMS: &[(&str, &str)] = &[
    ("Inter Miami", "MLS"),
    ("Real Madrid", "LaLiga"),
    ("Manchester City", "Premier League"),
    ("Barcelona", "LaLiga"),
    ("Arsenal", "Premier League"),
    ("Bayern Munich", "Bundesliga"),
    ("Leverkusen", "Bundesliga"),
];
const SCOUT_LEVELS: &[&str] = &["Junior", "Senior", "Elite"];
const REPORT_TYPES: &[&str] = &["Live", "Video", "Follow-up"];

pub const PLAYER_COUNT: usize = 240;
pub const SCOUT_COUNT: usize = 60;
pub const REPORT_COUNT: usize = 300;

/// The rows served by the dev-server.
pub struct DevDataset {
    pub players: Vec<PlayerSummary>,
    pub scouts: Vec<ScoutSummary>,
    pub reports: Vec<ReportSummary>,
}

impl DevDataset {
    pub fn create() -> Self {
        let players = players(PLAYER_COUNT);
        let scouts = scouts(SCOUT_COUNT);
        let reports = reports(REPORT_COUNT, &players, &scouts);
        Self {
            players,
            scouts,
            reports,
        }
    }

    /// Replace everything in `store` with this dataset.
    pub fn load_into(&self, store: &MockStore) {
        store.set_players(self.players.clone());
        store.set_scouts(self.scouts.clone());
        store.set_reports(self.reports.clone());
    }

    pub fn print_summary(&self) {
        tracing::info!("📋 Development dataset:");
        tracing::info!("   ⚽ {} players", self.players.len());
        tracing::info!("   🔭 {} scouts", self.scouts.len());
        tracing::info!("   📝 {} reports", self.reports.len());
        if let Some(top) = self.players.iter().max_by(|a, b| {
            a.player_rating
                .unwrap_or(0.0)
                .total_cmp(&b.player_rating.unwrap_or(0.0))
        }) {
            tracing::info!("   🏆 Top rated: {}", top.player_name);
        }
    }
}

fn pick<T: Copy>(values: &[T], n: usize) -> T {
    values[n % values.len()]
}

/// Player `n`, with ids starting at 1000.
pub fn player(n: usize) -> PlayerSummary {
    let (team, competition) = pick(TEAMS, n * 3);
    PlayerSummary {
        id_player: 1000 + n as i64,
        player_name: format!(
            "{} {}",
            pick(FIRST_NAMES, n),
            pick(LAST_NAMES, n / FIRST_NAMES.len() + n)
        ),
        position_player: Some(pick(POSITIONS, n * 5).to_string()),
        team_name: Some(team.to_string()),
        nationality_1: Some(pick(NATIONALITIES, n * 3).to_string()),
        age: Some(17 + (n % 20) as u32),
        // Every tenth player is unrated
        player_rating: (n % 10 != 0).then(|| 50.0 + ((n * 37) % 450) as f64 / 10.0),
        player_trfm_value: Some(((n * 7919) % 150_000_000) as f64),
        team_competition: Some(competition.to_string()),
    }
}

pub fn players(count: usize) -> Vec<PlayerSummary> {
    (0..count).map(player).collect()
}

/// Scout `n`, keyed by a stable uuid.
pub fn scout(n: usize) -> ScoutSummary {
    ScoutSummary {
        id_scout: Uuid::from_u128(0x5c00_0000 + n as u128).to_string(),
        scout_name: format!("Scout {} {}", pick(LAST_NAMES, n * 5), n),
        nationality: Some(pick(NATIONALITIES, n).to_string()),
        total_reports: ((n * 13) % 90) as u32,
        scout_elo: Some(1200.0 + ((n * 53) % 800) as f64),
        scout_level: Some(pick(SCOUT_LEVELS, n).to_string()),
    }
}

pub fn scouts(count: usize) -> Vec<ScoutSummary> {
    (0..count).map(scout).collect()
}

pub fn reports(
    count: usize,
    players: &[PlayerSummary],
    scouts: &[ScoutSummary],
) -> Vec<ReportSummary> {
    let start: Timestamp = "2025-01-01T00:00:00Z"
        .parse()
        .unwrap_or(Timestamp::UNIX_EPOCH);
    (0..count)
        .map(|n| ReportSummary {
            id_report: Uuid::from_u128(0x7e00_0000 + n as u128).to_string(),
            player_name: players
                .get(n % players.len().max(1))
                .map(|p| p.player_name.clone())
                .unwrap_or_default(),
            scout_name: scouts
                .get(n % scouts.len().max(1))
                .map(|s| s.scout_name.clone())
                .unwrap_or_default(),
            report_type: Some(pick(REPORT_TYPES, n).to_string()),
            rating: (n % 4 != 0).then_some((n % 5) as u8 + 1),
            created_at: start
                .checked_add(Span::new().hours(n as i64 * 7))
                .unwrap_or(start),
        })
        .collect()
}
