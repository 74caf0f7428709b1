pub mod clock;
pub mod error;
pub mod fall;
pub mod ledger;
pub mod matcher;
pub mod powerup;
pub mod progression;
pub mod scheduler;
pub mod session;
pub mod spawn;
pub mod tuning;

pub use powerup::{PowerUp, UnlockPolicy};
pub use progression::Phase;
pub use session::{GameEvent, GameSession, GameSummary, Notice, SessionSettings, Submission};
pub use spawn::{SpawnRequest, SpawnTicket};
pub use tuning::Tuning;
