use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::Provider;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub provider: Provider,
    /// プロバイダ発行の IDトークン（検証前なので未信頼）
    pub id_token: String,
    /// 新規作成時のスクリーンネーム候補（任意）
    #[serde(default)]
    pub screen_name_hint: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SignInResponse {
    pub session_token: String,
}

const SCREEN_NAME_MIN_BYTES: usize = 2;
const SCREEN_NAME_MAX_BYTES: usize = 20;
const DEFAULT_SCREEN_NAME: &str = "player";

/// サインインハンドラー
///
/// POST /api/sign-in
///
/// IDトークンの検証はプロバイダごとのベリファイアに委譲し、
/// コアには検証済みの (provider, external_id) のみを渡す。
pub async fn sign_in(
    State(state): State<AppState>,
    Json(request): Json<SignInRequest>,
) -> Result<Json<SignInResponse>, AppError> {
    let identity = match request.provider {
        Provider::Google => state.google_verifier.verify(&request.id_token).await?,
    };

    let hint = screen_name_hint(request.screen_name_hint.as_deref(), identity.name.as_deref())?;

    let session_token = state
        .players_service
        .sign_in(identity.provider, &identity.external_id, &hint)
        .await?;

    tracing::info!(provider = %identity.provider, "サインイン成功");

    Ok(Json(SignInResponse { session_token }))
}

/// スクリーンネーム候補の決定
///
/// 優先順: リクエストのヒント → IDトークンの name クレーム → 既定値。
/// ヒントは新規作成時にのみ使われ、既存プレイヤーの名前は変更しない。
fn screen_name_hint(
    request_hint: Option<&str>,
    token_name: Option<&str>,
) -> Result<String, AppError> {
    if let Some(hint) = request_hint {
        let hint = hint.trim();
        if !hint.is_empty() {
            if hint.len() < SCREEN_NAME_MIN_BYTES {
                return Err(AppError::Validation(
                    "スクリーンネームは2バイト以上で入力してください".to_string(),
                ));
            }
            if hint.len() > SCREEN_NAME_MAX_BYTES {
                return Err(AppError::Validation(
                    "スクリーンネームは20バイト以内で入力してください".to_string(),
                ));
            }
            return Ok(hint.to_string());
        }
    }

    let fallback = token_name
        .map(str::trim)
        .filter(|name| (SCREEN_NAME_MIN_BYTES..=SCREEN_NAME_MAX_BYTES).contains(&name.len()));

    Ok(fallback.unwrap_or(DEFAULT_SCREEN_NAME).to_string())
}
