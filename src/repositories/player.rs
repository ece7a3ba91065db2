use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::models::Player;

/// プレイヤー行の作成・参照
///
/// 新規プレイヤー行を書くのはこのインターフェースだけ。
/// テストではインメモリ実装に差し替える。
pub trait PlayerStore {
    /// 新しいプレイヤーを作成
    ///
    /// ID の採番と `joined_at` の記録はここで行う。
    fn create(
        &self,
        screen_name: &str,
    ) -> impl Future<Output = Result<Player, sqlx::Error>> + Send;

    /// プレイヤーIDでプレイヤーを検索
    fn find_by_id(
        &self,
        player_id: Uuid,
    ) -> impl Future<Output = Result<Option<Player>, sqlx::Error>> + Send;
}

#[derive(Clone)]
pub struct PlayerRepository {
    pool: PgPool,
}

impl PlayerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl PlayerStore for PlayerRepository {
    async fn create(&self, screen_name: &str) -> Result<Player, sqlx::Error> {
        sqlx::query_as::<_, Player>(
            r#"
            INSERT INTO player (id, screen_name, joined_at)
            VALUES ($1, $2, $3)
            RETURNING id, screen_name, joined_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(screen_name)
        .bind(OffsetDateTime::now_utc())
        .fetch_one(&self.pool)
        .await
    }

    async fn find_by_id(&self, player_id: Uuid) -> Result<Option<Player>, sqlx::Error> {
        sqlx::query_as::<_, Player>(
            r#"
            SELECT id, screen_name, joined_at
            FROM player
            WHERE id = $1
            "#,
        )
        .bind(player_id)
        .fetch_optional(&self.pool)
        .await
    }
}
