//! UseCase: Poll の取得
//!
//! ID（内部用）または ShortCode（共有用、大文字小文字を区別しない）で Poll を引き、
//! 現在の集計と状態（Open / Closed）を添えて返します。

use std::sync::Arc;

use crate::domain::{
    AggregateSnapshot, Poll, PollId, PollLifecycleGate, PollRepository, PollStatus, ShortCode,
};

use super::{compute_aggregate::ComputeAggregateUseCase, error::FetchPollError};

/// Poll の検索キー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollLookup {
    Id(String),
    ShortCode(String),
}

impl PollLookup {
    /// リクエストの `id` / `shortCode` から検索キーを選ぶ（両方あれば `id` を優先）
    pub fn from_parts(id: Option<String>, short_code: Option<String>) -> Option<Self> {
        let non_blank = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
        non_blank(id)
            .map(Self::Id)
            .or_else(|| non_blank(short_code).map(Self::ShortCode))
    }
}

/// Poll と、その現在の集計・状態
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollDetail {
    pub poll: Poll,
    pub snapshot: AggregateSnapshot,
    pub status: PollStatus,
}

/// Poll 取得のユースケース
pub struct FetchPollUseCase {
    repository: Arc<dyn PollRepository>,
    gate: Arc<PollLifecycleGate>,
    aggregates: Arc<ComputeAggregateUseCase>,
}

impl FetchPollUseCase {
    /// 新しい FetchPollUseCase を作成
    pub fn new(
        repository: Arc<dyn PollRepository>,
        gate: Arc<PollLifecycleGate>,
        aggregates: Arc<ComputeAggregateUseCase>,
    ) -> Self {
        Self {
            repository,
            gate,
            aggregates,
        }
    }

    /// Poll を取得
    pub async fn execute(&self, lookup: PollLookup) -> Result<PollDetail, FetchPollError> {
        let found = match lookup {
            PollLookup::Id(id) => {
                let poll_id =
                    PollId::new(id).map_err(|e| FetchPollError::InvalidInput(e.to_string()))?;
                self.repository.find_poll(&poll_id).await
            }
            PollLookup::ShortCode(code) => {
                let short_code = ShortCode::new(code)
                    .map_err(|e| FetchPollError::InvalidInput(e.to_string()))?;
                self.repository.find_poll_by_short_code(&short_code).await
            }
        };

        let poll = found
            .map_err(|e| FetchPollError::StorageUnavailable(e.to_string()))?
            .ok_or(FetchPollError::PollNotFound)?;
        let snapshot = self.aggregates.snapshot_of(&poll).await?;
        let status = self.gate.status_of(&poll);

        Ok(PollDetail {
            poll,
            snapshot,
            status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            MockPollRepository, OptionId, RepositoryError, Timestamp, Vote, VoterId,
            entity::fixtures::poll_with_options,
        },
        infrastructure::repository::InMemoryPollRepository,
    };
    use tohyo_shared::time::FixedClock;

    const NOW: i64 = 5_000;

    fn create_usecase(repository: Arc<dyn PollRepository>) -> FetchPollUseCase {
        let gate = Arc::new(PollLifecycleGate::new(
            repository.clone(),
            Arc::new(FixedClock::new(NOW)),
        ));
        let aggregates = Arc::new(ComputeAggregateUseCase::new(repository.clone()));
        FetchPollUseCase::new(repository, gate, aggregates)
    }

    async fn seeded_repository(closes_at: Option<i64>) -> Arc<InMemoryPollRepository> {
        let repository = Arc::new(InMemoryPollRepository::new());
        repository
            .insert_poll(poll_with_options("p1", closes_at))
            .await
            .unwrap();
        repository
            .upsert_vote(Vote::new(
                PollId::new("p1".to_string()).unwrap(),
                VoterId::new("v1".to_string()).unwrap(),
                OptionId::new("b".to_string()).unwrap(),
                Timestamp::new(0),
            ))
            .await
            .unwrap();
        repository
    }

    #[test]
    fn test_lookup_prefers_id() {
        // テスト項目: id と shortCode の両方があれば id を使い、空文字は無視する
        assert_eq!(
            PollLookup::from_parts(Some("p1".to_string()), Some("ABC123".to_string())),
            Some(PollLookup::Id("p1".to_string()))
        );
        assert_eq!(
            PollLookup::from_parts(Some(" ".to_string()), Some("ABC123".to_string())),
            Some(PollLookup::ShortCode("ABC123".to_string()))
        );
        assert_eq!(PollLookup::from_parts(None, None), None);
    }

    #[tokio::test]
    async fn test_fetch_by_id_includes_aggregate() {
        // テスト項目: ID で取得すると現在の集計と状態が付いてくる
        // given (前提条件):
        let usecase = create_usecase(seeded_repository(None).await);

        // when (操作):
        let detail = usecase
            .execute(PollLookup::Id("p1".to_string()))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(detail.poll.id.as_str(), "p1");
        assert_eq!(detail.snapshot.total_voters, 1);
        assert_eq!(
            detail
                .snapshot
                .votes_for(&OptionId::new("b".to_string()).unwrap()),
            Some(1)
        );
        assert_eq!(detail.status, PollStatus::Open);
    }

    #[tokio::test]
    async fn test_fetch_by_short_code_is_case_insensitive() {
        // テスト項目: ShortCode は小文字でも検索できる
        // given (前提条件):
        let usecase = create_usecase(seeded_repository(None).await);

        // when (操作):
        let detail = usecase
            .execute(PollLookup::ShortCode("abc123".to_string()))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(detail.poll.id.as_str(), "p1");
    }

    #[tokio::test]
    async fn test_fetch_reports_closed_status() {
        // テスト項目: 締切を過ぎた Poll は Closed として返る
        // given (前提条件):
        let usecase = create_usecase(seeded_repository(Some(NOW)).await);

        // when (操作):
        let detail = usecase
            .execute(PollLookup::Id("p1".to_string()))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(detail.status, PollStatus::Closed);
    }

    #[tokio::test]
    async fn test_fetch_unknown_poll() {
        // テスト項目: 存在しない ID / ShortCode は PollNotFound、形式不正は InvalidInput
        // given (前提条件):
        let usecase = create_usecase(seeded_repository(None).await);

        // when (操作):
        let by_id = usecase.execute(PollLookup::Id("p2".to_string())).await;
        let by_code = usecase
            .execute(PollLookup::ShortCode("ZZZ999".to_string()))
            .await;
        let malformed = usecase
            .execute(PollLookup::ShortCode("short".to_string()))
            .await;

        // then (期待する結果):
        assert_eq!(by_id, Err(FetchPollError::PollNotFound));
        assert_eq!(by_code, Err(FetchPollError::PollNotFound));
        assert!(matches!(malformed, Err(FetchPollError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_fetch_storage_failure() {
        // テスト項目: ストレージ障害は StorageUnavailable
        // given (前提条件):
        let mut repository = MockPollRepository::new();
        repository
            .expect_find_poll()
            .returning(|_| Err(RepositoryError::Unavailable("down".to_string())));
        let usecase = create_usecase(Arc::new(repository));

        // when (操作):
        let result = usecase.execute(PollLookup::Id("p1".to_string())).await;

        // then (期待する結果):
        assert!(matches!(result, Err(FetchPollError::StorageUnavailable(_))));
    }
}
