pub mod google;
pub mod players;
pub mod session;

pub use google::{GoogleIdTokenVerifier, VerifiedIdentity};
pub use players::PlayersService;
pub use session::SessionService;
