use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Provider, ThirdPartyIdentity};

/// 紐付け作成の失敗
#[derive(Debug, thiserror::Error)]
pub enum CreateLinkError {
    /// (provider, external_id) の組が既に存在する。
    /// 並行した別の書き込みが先に紐付けを作成したことを示す。
    #[error("紐付けが既に存在します")]
    Conflict,

    #[error("データベースエラー")]
    Database(#[from] sqlx::Error),
}

/// (provider, external_id) → player_id の永続マッピング
///
/// 一意性は複合主キーで保証する。同じ組への並行 INSERT は
/// ちょうど1つが成功し、残りは [CreateLinkError::Conflict] になる。
pub trait IdentityStore {
    /// 紐付けを検索（副作用なし）
    fn find_link(
        &self,
        provider: Provider,
        external_id: &str,
    ) -> impl Future<Output = Result<Option<ThirdPartyIdentity>, sqlx::Error>> + Send;

    /// 紐付けを作成
    ///
    /// # Errors
    /// - [CreateLinkError::Conflict]: 同じ組の行が既に存在
    fn create_link(
        &self,
        provider: Provider,
        external_id: &str,
        player_id: Uuid,
    ) -> impl Future<Output = Result<(), CreateLinkError>> + Send;
}

#[derive(Clone)]
pub struct ThirdPartyIdentityRepository {
    pool: PgPool,
}

impl ThirdPartyIdentityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl IdentityStore for ThirdPartyIdentityRepository {
    async fn find_link(
        &self,
        provider: Provider,
        external_id: &str,
    ) -> Result<Option<ThirdPartyIdentity>, sqlx::Error> {
        sqlx::query_as::<_, ThirdPartyIdentity>(
            r#"
            SELECT provider, external_id, player_id, created_at
            FROM third_party_identity
            WHERE provider = $1 AND external_id = $2
            "#,
        )
        .bind(provider.as_str())
        .bind(external_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn create_link(
        &self,
        provider: Provider,
        external_id: &str,
        player_id: Uuid,
    ) -> Result<(), CreateLinkError> {
        sqlx::query(
            r#"
            INSERT INTO third_party_identity (provider, external_id, player_id)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(provider.as_str())
        .bind(external_id)
        .bind(player_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            // 複合主キー制約違反 = 並行書き込みに敗北
            if let sqlx::Error::Database(db_err) = &e
                && db_err.constraint() == Some("third_party_identity_pkey")
            {
                return CreateLinkError::Conflict;
            }
            CreateLinkError::Database(e)
        })?;

        Ok(())
    }
}
