use axum::{
    Json,
    extract::State,
    http::{HeaderMap, header::AUTHORIZATION},
};

use crate::error::AppError;
use crate::models::Player;
use crate::state::AppState;

/// プレイヤー情報ハンドラー
///
/// GET /api/player
///
/// Authorization ヘッダーのセッショントークンを検証し、
/// その subject のプレイヤーを返す。
pub async fn player_info(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Player>, AppError> {
    let token = bearer_token(&headers)?;
    let claims = state.session_service.verify(token)?;
    let player = state.players_service.player_by_id(claims.sub).await?;

    Ok(Json(player))
}

/// Authorization ヘッダーから Bearer トークンを取り出す
fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(AppError::SessionTokenMissing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token_extracts_token() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_bearer_token_fails_without_header() {
        let headers = HeaderMap::new();
        assert!(matches!(
            bearer_token(&headers),
            Err(AppError::SessionTokenMissing)
        ));
    }

    #[test]
    fn test_bearer_token_fails_without_bearer_prefix() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert!(matches!(
            bearer_token(&headers),
            Err(AppError::SessionTokenMissing)
        ));
    }
}
