use serde::Deserialize;

use crate::error::AppError;
use crate::models::Provider;

/// Google tokeninfo エンドポイント
///
/// 署名・有効期限の検証は Google 側で行われる。
/// Docs: https://developers.google.com/identity/sign-in/web/backend-auth
const GOOGLE_TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";

/// Google が許可する iss クレーム値
const GOOGLE_ALLOWED_ISS: [&str; 2] = ["accounts.google.com", "https://accounts.google.com"];

/// 検証済みのサードパーティID
///
/// コアのサインイン処理はこの構造体のみを信頼して受け取る。
#[derive(Debug, Clone)]
pub struct VerifiedIdentity {
    pub provider: Provider,
    /// プロバイダが割り当てた subject ID（プロバイダ内でのみ一意）
    pub external_id: String,
    pub email: Option<String>,
    pub name: Option<String>,
}

/// tokeninfo エンドポイントからのレスポンス
#[derive(Debug, Deserialize)]
struct TokenInfoResponse {
    sub: String,
    aud: String,
    iss: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

/// Google IDトークン検証サービス
#[derive(Clone)]
pub struct GoogleIdTokenVerifier {
    /// aud クレームと照合するクライアントID
    client_id: String,
    http_client: reqwest::Client,
}

impl GoogleIdTokenVerifier {
    /// 新しい GoogleIdTokenVerifier を作成
    pub fn new(client_id: String) -> Self {
        Self {
            client_id,
            http_client: reqwest::Client::new(),
        }
    }

    /// IDトークンを検証し、検証済みIDを返す
    ///
    /// # Arguments
    /// * `id_token` - クライアントから受け取った Google 発行の IDトークン
    pub async fn verify(&self, id_token: &str) -> Result<VerifiedIdentity, AppError> {
        let response = self
            .http_client
            .get(GOOGLE_TOKENINFO_URL)
            .query(&[("id_token", id_token)])
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = ?e, "Google tokeninfo エンドポイント通信エラー");
                AppError::IdProviderUnavailable
            })?;

        if !response.status().is_success() {
            // 無効・期限切れトークンは Google が 4xx を返す
            let status = response.status();
            return Err(AppError::IdTokenInvalid(format!(
                "tokeninfo returned {status}"
            )));
        }

        let token_info: TokenInfoResponse = response.json().await.map_err(|e| {
            tracing::error!(error = ?e, "Google tokeninfo レスポンスのパースエラー");
            AppError::IdTokenInvalid("invalid tokeninfo response".to_string())
        })?;

        validate_token_info(&token_info, &self.client_id)?;

        Ok(VerifiedIdentity {
            provider: Provider::Google,
            external_id: token_info.sub,
            email: token_info.email,
            name: token_info.name,
        })
    }
}

/// aud / iss クレームの検証
///
/// tokeninfo は署名と exp を検証済みだが、aud と iss は
/// 呼び出し側が自分のクライアントID・Google の issuer と照合する必要がある。
fn validate_token_info(token_info: &TokenInfoResponse, client_id: &str) -> Result<(), AppError> {
    if token_info.aud != client_id {
        return Err(AppError::IdTokenInvalid(
            "aud does not match client id".to_string(),
        ));
    }

    if !GOOGLE_ALLOWED_ISS.contains(&token_info.iss.as_str()) {
        return Err(AppError::IdTokenInvalid(format!(
            "unexpected iss: {}",
            token_info.iss
        )));
    }

    Ok(())
}
