use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::AppError;

/// セッショントークンのクレーム
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// 有効期限（UNIX秒）
    pub exp: i64,
    /// 発行時刻（UNIX秒）
    pub iat: i64,
    /// 対象プレイヤーID
    pub sub: Uuid,
}

/// セッショントークンサービス
///
/// サインイン成功ごとに新しいトークンを発行する。トークンは
/// サーバー側に保存せず、有効性は署名と exp のみで判定する。
#[derive(Clone)]
pub struct SessionService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    header: Header,
    /// トークン有効期間（秒）
    ttl_secs: i64,
}

impl SessionService {
    /// 新しい SessionService を作成
    ///
    /// # Security
    /// `secret` は機密情報のため、ログ出力禁止
    pub fn new(secret: &str, ttl_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::default(),
            header: Header::default(),
            ttl_secs,
        }
    }

    /// プレイヤーIDに対してセッショントークンを発行
    ///
    /// `exp - iat` は常に設定された TTL に一致する。
    /// 失敗するのは署名設定が壊れている場合のみ（設定エラー、再試行不可）。
    pub fn issue(&self, player_id: Uuid) -> Result<String, AppError> {
        let now = OffsetDateTime::now_utc().unix_timestamp();

        let claims = SessionClaims {
            exp: now + self.ttl_secs,
            iat: now,
            sub: player_id,
        };

        let token =
            jsonwebtoken::encode(&self.header, &claims, &self.encoding_key).map_err(|e| {
                tracing::error!(error = ?e, "セッショントークン署名エラー");
                AppError::Internal(anyhow::anyhow!("session token signing error: {e}"))
            })?;

        Ok(token)
    }

    /// セッショントークンを検証してクレームを返す
    pub fn verify(&self, token: &str) -> Result<SessionClaims, AppError> {
        let claims = jsonwebtoken::decode(token, &self.decoding_key, &self.validation)
            .map_err(AppError::SessionTokenInvalid)?
            .claims;

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_TTL_SECS: i64 = 3600;

    fn create_test_service() -> SessionService {
        SessionService::new("test-session-secret", TEST_TTL_SECS)
    }

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let service = create_test_service();
        let player_id = Uuid::new_v4();

        let token = service.issue(player_id).unwrap();
        let claims = service.verify(&token).unwrap();

        assert_eq!(claims.sub, player_id);
        assert!(claims.iat <= OffsetDateTime::now_utc().unix_timestamp());
        // exp - iat は TTL に厳密一致
        assert_eq!(claims.exp - claims.iat, TEST_TTL_SECS);
    }

    #[test]
    fn test_verify_rejects_expired_token() {
        let service = create_test_service();
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let exp_in_past = now - service.validation.leeway as i64 - 10;

        let expired = jsonwebtoken::encode(
            &service.header,
            &SessionClaims {
                exp: exp_in_past,
                iat: exp_in_past - TEST_TTL_SECS,
                sub: Uuid::new_v4(),
            },
            &service.encoding_key,
        )
        .unwrap();

        let result = service.verify(&expired);
        assert!(matches!(
            result,
            Err(AppError::SessionTokenInvalid(e))
                if *e.kind() == jsonwebtoken::errors::ErrorKind::ExpiredSignature
        ));
    }

    #[test]
    fn test_verify_rejects_wrong_signature() {
        let service = create_test_service();
        let other_service = SessionService::new("different-secret", TEST_TTL_SECS);

        let token = other_service.issue(Uuid::new_v4()).unwrap();

        let result = service.verify(&token);
        assert!(matches!(
            result,
            Err(AppError::SessionTokenInvalid(e))
                if *e.kind() == jsonwebtoken::errors::ErrorKind::InvalidSignature
        ));
    }

    #[test]
    fn test_verify_rejects_garbage() {
        let service = create_test_service();
        assert!(service.verify("not-a-token").is_err());
    }
}
