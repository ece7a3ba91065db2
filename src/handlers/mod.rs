pub mod health;
pub mod player;
pub mod sign_in;

pub use health::health_check;
pub use player::player_info;
pub use sign_in::sign_in;
