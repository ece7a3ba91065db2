use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// プレイヤー本体レコード
///
/// サードパーティIDとは独立に存在する。`id` と `joined_at` は作成後不変、
/// `screen_name` のみ可変。
#[derive(Debug, Clone, FromRow, Serialize, PartialEq)]
pub struct Player {
    pub id: Uuid,
    pub screen_name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub joined_at: OffsetDateTime,
}
