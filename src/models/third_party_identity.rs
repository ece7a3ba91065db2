use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// サポートするサードパーティ認証プロバイダ
///
/// 閉じた集合として扱う。プロバイダ追加は enum バリアントと
/// スキーマの CHECK 制約の両方を更新する（match が網羅なので
/// 更新漏れはコンパイルエラーになる）。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Google,
}

impl Provider {
    /// DB に格納する文字列表現
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Google => "google",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// サードパーティIDとプレイヤーの紐付け行
///
/// (provider, external_id) ごとに高々1行。作成後に別プレイヤーへ
/// 付け替えられることはない。
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ThirdPartyIdentity {
    pub provider: String,
    pub external_id: String,
    pub player_id: Uuid,
    pub created_at: OffsetDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_serializes_lowercase() {
        let json = serde_json::to_string(&Provider::Google).unwrap();
        assert_eq!(json, "\"google\"");
        assert_eq!(Provider::Google.as_str(), "google");
    }

    #[test]
    fn test_provider_deserializes_lowercase() {
        let provider: Provider = serde_json::from_str("\"google\"").unwrap();
        assert_eq!(provider, Provider::Google);
    }
}
