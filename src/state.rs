use std::sync::Arc;

use secrecy::ExposeSecret;
use sqlx::PgPool;

use crate::config::Config;
use crate::repositories::{PlayerRepository, ThirdPartyIdentityRepository};
use crate::services::{GoogleIdTokenVerifier, PlayersService, SessionService};

/// アプリケーション共有状態
///
/// axum の State として全ハンドラーで共有される。
/// Clone は必須（axum が内部で clone するため）。
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL コネクションプール
    pub db_pool: PgPool,
    /// アプリケーション設定（Arc で共有）
    pub config: Arc<Config>,
    /// プレイヤー解決・サインインサービス
    pub players_service: PlayersService,
    /// セッショントークンサービス
    pub session_service: SessionService,
    /// Google IDトークンベリファイア
    pub google_verifier: GoogleIdTokenVerifier,
}

impl AppState {
    /// 新しい AppState を作成
    pub fn new(db_pool: PgPool, config: Config) -> Self {
        let config = Arc::new(config);

        let session_service = SessionService::new(
            config.session_secret.expose_secret(),
            config.session_ttl_secs,
        );

        let players_service = PlayersService::new(
            PlayerRepository::new(db_pool.clone()),
            ThirdPartyIdentityRepository::new(db_pool.clone()),
            session_service.clone(),
        );

        let google_verifier = GoogleIdTokenVerifier::new(config.google_client_id.clone());

        Self {
            db_pool,
            config,
            players_service,
            session_service,
            google_verifier,
        }
    }
}
