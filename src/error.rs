use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use uuid::Uuid;

use crate::models::Provider;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("バリデーションエラー: {0}")]
    Validation(String),

    #[error("データベースエラー")]
    Database(#[from] sqlx::Error),

    #[error("内部エラー")]
    Internal(#[from] anyhow::Error),

    #[error("IDトークンが無効です: {0}")]
    IdTokenInvalid(String),

    #[error("外部認証サービスエラー")]
    IdProviderUnavailable,

    #[error("プレイヤーが見つかりません")]
    PlayerNotFound,

    /// 紐付けが壊れている（参照先プレイヤー行の欠落、または
    /// 競合直後に紐付け自体が見つからない）。データ不整合。
    #[error("プレイヤー紐付けが壊れています: {provider}/{external_id}")]
    PlayerLinkBroken {
        provider: Provider,
        external_id: String,
        /// 紐付けが指していたプレイヤーID（紐付け自体が消えていた場合は None）
        player_id: Option<Uuid>,
    },

    #[error("セッショントークンが無効です")]
    SessionTokenInvalid(jsonwebtoken::errors::Error),

    #[error("セッショントークンがありません")]
    SessionTokenMissing,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::Database(e) => {
                tracing::error!(error = ?e, "データベースエラー");
                // 呼び出し側が再試行を判断できるよう 503 を返す
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "一時的なエラーが発生しました。しばらくしてから再試行してください".to_string(),
                )
            }
            Self::Internal(e) => {
                tracing::error!(error = ?e, "内部エラー");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "内部エラーが発生しました".to_string(),
                )
            }
            Self::IdTokenInvalid(e) => {
                tracing::warn!(error = %e, "IDトークン検証失敗");
                (
                    StatusCode::UNAUTHORIZED,
                    "サインインに失敗しました".to_string(),
                )
            }
            Self::IdProviderUnavailable => (
                StatusCode::BAD_GATEWAY,
                "外部認証サービスとの通信に失敗しました".to_string(),
            ),
            Self::PlayerNotFound => (
                StatusCode::UNAUTHORIZED,
                "サインインし直してください".to_string(),
            ),
            Self::PlayerLinkBroken {
                provider,
                external_id,
                player_id,
            } => {
                // 整合性違反。自動修復はせず運用者向けにログのみ残す
                tracing::error!(
                    provider = %provider,
                    external_id = %external_id,
                    player_id = ?player_id,
                    "データ不整合: プレイヤー紐付けが壊れている"
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "内部エラーが発生しました".to_string(),
                )
            }
            Self::SessionTokenInvalid(e) => {
                tracing::warn!(error = ?e, "セッショントークン検証失敗");
                (StatusCode::UNAUTHORIZED, "認証が必要です".to_string())
            }
            Self::SessionTokenMissing => {
                (StatusCode::UNAUTHORIZED, "認証が必要です".to_string())
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
