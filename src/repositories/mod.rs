pub mod player;
pub mod third_party_identity;

pub use player::{PlayerRepository, PlayerStore};
pub use third_party_identity::{CreateLinkError, IdentityStore, ThirdPartyIdentityRepository};
