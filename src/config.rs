use secrecy::SecretBox;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub database_url: SecretBox<String>,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,

    // セッション設定
    /// セッショントークン署名シークレット（機密情報 - ログ出力禁止）
    pub session_secret: SecretBox<String>,
    /// セッショントークンの有効期間（秒）
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: i64,

    // Google IDトークン検証設定
    /// IDトークンの aud クレームと照合する Google OAuth クライアントID
    pub google_client_id: String,
}

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_SESSION_TTL_SECS: i64 = 86400;

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_session_ttl_secs() -> i64 {
    DEFAULT_SESSION_TTL_SECS
}

impl Config {
    pub fn load() -> Result<Self, envy::Error> {
        envy::from_env()
    }
}
