use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;

use crate::state::AppState;

/// ヘルスチェックレスポンス
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
    pub version: &'static str,
}

/// ヘルスチェックハンドラー
///
/// GET /api/health
///
/// ロードバランサーやモニタリングツールから呼び出される。
/// データベースへの疎通確認を含み、到達できない場合は 503 を返す。
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let db_ok = sqlx::query("SELECT 1")
        .execute(&state.db_pool)
        .await
        .is_ok();

    if !db_ok {
        tracing::warn!("ヘルスチェック: データベース疎通失敗");
    }

    health_response(db_ok)
}

/// 疎通結果からレスポンスを組み立てる
fn health_response(db_ok: bool) -> (StatusCode, Json<HealthResponse>) {
    let status = if db_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let body = HealthResponse {
        status: if db_ok { "ok" } else { "degraded" },
        database: if db_ok { "ok" } else { "unavailable" },
        version: env!("CARGO_PKG_VERSION"),
    };

    (status, Json(body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_response_ok_when_database_reachable() {
        let (status, Json(body)) = health_response(true);
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.status, "ok");
        assert_eq!(body.database, "ok");
        assert_eq!(body.version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_health_response_degraded_when_database_unreachable() {
        let (status, Json(body)) = health_response(false);
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.status, "degraded");
        assert_eq!(body.database, "unavailable");
    }
}
