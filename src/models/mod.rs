pub mod player;
pub mod third_party_identity;

pub use player::Player;
pub use third_party_identity::{Provider, ThirdPartyIdentity};
