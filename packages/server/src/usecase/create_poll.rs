//! UseCase: Poll の作成
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - CreatePollUseCase::execute() メソッド
//! - 入力の検証（質問文、選択肢の数と内容）と ShortCode の衝突時の再試行
//!
//! ### なぜこのテストが必要か
//! - Poll は作成後に変更できないため、作成時の検証がすべて
//! - ShortCode は利用者が共有するキーなので、衝突しても作成が失敗してはいけない
//!
//! ### どのような状況を想定しているか
//! - 正常系：質問文と選択肢がトリムされて保存される
//! - 異常系：空の質問文、選択肢が 1 つ、空の選択肢
//! - エッジケース：ShortCode の衝突、過去の締切時刻

use std::sync::Arc;

use tohyo_shared::time::Clock;

use crate::domain::{
    OptionIdFactory, OptionText, Poll, PollIdFactory, PollOption, PollRepository, QuestionText,
    RepositoryError, ShortCodeFactory, Timestamp,
};

use super::error::CreatePollError;

/// ShortCode が衝突したときに生成し直す回数の上限
const MAX_SHORT_CODE_ATTEMPTS: usize = 5;

/// Poll 作成のユースケース
pub struct CreatePollUseCase {
    /// Repository（投票ストレージの抽象化）
    repository: Arc<dyn PollRepository>,
    /// 作成時刻の取得に使う時計
    clock: Arc<dyn Clock>,
}

impl CreatePollUseCase {
    /// 新しい CreatePollUseCase を作成
    pub fn new(repository: Arc<dyn PollRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// Poll 作成を実行
    ///
    /// # Arguments
    ///
    /// * `question` - 質問文（前後の空白は取り除かれる）
    /// * `options` - 選択肢の表示テキスト（2 つ以上、順序はそのまま保存される）
    /// * `closes_at` - 締切時刻（Unix ミリ秒）。過去の時刻なら作成直後から締め切られている
    ///
    /// # Returns
    ///
    /// * `Ok(Poll)` - 作成された Poll
    /// * `Err(CreatePollError)` - 作成失敗
    pub async fn execute(
        &self,
        question: String,
        options: Vec<String>,
        closes_at: Option<i64>,
    ) -> Result<Poll, CreatePollError> {
        // 1. 入力の検証
        let question = QuestionText::new(question).map_err(invalid_input)?;
        let options = options
            .into_iter()
            .map(|text| {
                let text = OptionText::new(text).map_err(invalid_input)?;
                let id = OptionIdFactory::generate().map_err(invalid_input)?;
                Ok(PollOption::new(id, text))
            })
            .collect::<Result<Vec<_>, CreatePollError>>()?;
        let poll_id = PollIdFactory::generate().map_err(invalid_input)?;
        let created_at = Timestamp::new(self.clock.now_millis());
        let closes_at = closes_at.map(Timestamp::new);

        // 2. ShortCode を割り当てて保存（衝突したら生成し直す）
        for attempt in 1..=MAX_SHORT_CODE_ATTEMPTS {
            let short_code = ShortCodeFactory::generate().map_err(invalid_input)?;
            let poll = Poll::new(
                poll_id.clone(),
                short_code,
                question.clone(),
                options.clone(),
                closes_at,
                created_at,
            )
            .map_err(|e| CreatePollError::InvalidInput(e.to_string()))?;

            match self.repository.insert_poll(poll.clone()).await {
                Ok(()) => {
                    tracing::info!(
                        "Created poll '{}' with short code '{}' ({} options)",
                        poll.id,
                        poll.short_code,
                        poll.options.len()
                    );
                    return Ok(poll);
                }
                Err(RepositoryError::DuplicateShortCode(code)) => {
                    tracing::debug!(
                        "Short code '{}' already taken (attempt {}/{})",
                        code,
                        attempt,
                        MAX_SHORT_CODE_ATTEMPTS
                    );
                }
                Err(e) => {
                    tracing::error!("Failed to store poll '{}': {}", poll_id, e);
                    return Err(CreatePollError::StorageUnavailable(e.to_string()));
                }
            }
        }

        tracing::error!(
            "Gave up allocating a short code for poll '{}' after {} attempts",
            poll_id,
            MAX_SHORT_CODE_ATTEMPTS
        );
        Err(CreatePollError::StorageUnavailable(
            "could not allocate a unique short code".to_string(),
        ))
    }
}

fn invalid_input(error: impl std::fmt::Display) -> CreatePollError {
    CreatePollError::InvalidInput(error.to_string())
}
