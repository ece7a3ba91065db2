use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Player, Provider};
use crate::repositories::{
    CreateLinkError, IdentityStore, PlayerRepository, PlayerStore, ThirdPartyIdentityRepository,
};
use crate::services::session::SessionService;

/// プレイヤー解決・サインインサービス
///
/// 検証済みのサードパーティIDから既存プレイヤーを特定し、
/// 存在しなければ作成してセッショントークンを発行する。
/// ストアはインターフェース経由で注入し、プロセス内に独自の状態は持たない。
#[derive(Clone)]
pub struct PlayersService<P = PlayerRepository, I = ThirdPartyIdentityRepository> {
    players: P,
    identities: I,
    sessions: SessionService,
}

impl<P, I> PlayersService<P, I>
where
    P: PlayerStore + Sync,
    I: IdentityStore + Sync,
{
    /// 新しい PlayersService を作成
    pub fn new(players: P, identities: I, sessions: SessionService) -> Self {
        Self {
            players,
            identities,
            sessions,
        }
    }

    /// サインイン処理本体
    ///
    /// `resolve` と発行の単純な合成。追加の状態は持たず、
    /// 両者の失敗をそのまま伝播する。
    pub async fn sign_in(
        &self,
        provider: Provider,
        external_id: &str,
        screen_name_hint: &str,
    ) -> Result<String, AppError> {
        let player = self.resolve(provider, external_id, screen_name_hint).await?;
        self.sessions.issue(player.id)
    }

    /// サードパーティIDをプレイヤーに解決する。存在しなければ作成する。
    ///
    /// 同一IDへの並行呼び出しでもプレイヤーが二重作成されないことを、
    /// ロックではなくストレージの一意性制約で保証する:
    ///
    /// 1. 既存の紐付けを検索。あればそのプレイヤーを返す。
    /// 2. なければ楽観的に新規プレイヤーを作成。
    /// 3. 紐付けの INSERT を試行。[CreateLinkError::Conflict] なら
    ///    並行した別の呼び出しが先に紐付けを作成している。作った行は
    ///    孤児として放置し、勝者の紐付けを1回だけ再取得して返す。
    ///
    /// 紐付けは削除されないため、競合後の再取得は必ず成功する。
    /// 再試行はこの1回のみ。
    pub async fn resolve(
        &self,
        provider: Provider,
        external_id: &str,
        screen_name_hint: &str,
    ) -> Result<Player, AppError> {
        if let Some(player) = self.find_linked_player(provider, external_id).await? {
            return Ok(player);
        }

        let player = self.players.create(screen_name_hint).await?;

        match self
            .identities
            .create_link(provider, external_id, player.id)
            .await
        {
            Ok(()) => {
                tracing::info!(player_id = %player.id, provider = %provider, "新規プレイヤー作成");
                Ok(player)
            }
            Err(CreateLinkError::Conflict) => {
                tracing::debug!(
                    provider = %provider,
                    orphan_player_id = %player.id,
                    "紐付け競合: 勝者のプレイヤーを再取得"
                );
                match self.find_linked_player(provider, external_id).await? {
                    Some(winner) => Ok(winner),
                    // 紐付けは消えないので、ここに来るのは整合性違反のみ
                    None => Err(AppError::PlayerLinkBroken {
                        provider,
                        external_id: external_id.to_string(),
                        player_id: None,
                    }),
                }
            }
            Err(CreateLinkError::Database(e)) => Err(AppError::Database(e)),
        }
    }

    /// プレイヤーIDでプレイヤーを取得
    pub async fn player_by_id(&self, player_id: Uuid) -> Result<Player, AppError> {
        self.players
            .find_by_id(player_id)
            .await?
            .ok_or(AppError::PlayerNotFound)
    }

    /// 紐付けを検索し、参照先プレイヤーを取得する
    ///
    /// 紐付けが存在するのにプレイヤー行がない場合は
    /// [AppError::PlayerLinkBroken]（修復も再試行もしない）。
    async fn find_linked_player(
        &self,
        provider: Provider,
        external_id: &str,
    ) -> Result<Option<Player>, AppError> {
        let Some(link) = self.identities.find_link(provider, external_id).await? else {
            return Ok(None);
        };

        match self.players.find_by_id(link.player_id).await? {
            Some(player) => Ok(Some(player)),
            None => Err(AppError::PlayerLinkBroken {
                provider,
                external_id: external_id.to_string(),
                player_id: Some(link.player_id),
            }),
        }
    }
}
