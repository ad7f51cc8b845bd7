pub mod not_found;
pub mod players;
pub mod reports;
pub mod scouts;

pub use not_found::NotFoundPage;
pub use players::PlayersPage;
pub use reports::ReportsPage;
pub use scouts::ScoutsPage;
