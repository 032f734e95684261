//! Server state and use case wiring.

use std::{sync::Arc, time::Duration};

use tohyo_shared::time::Clock;

use crate::{
    domain::{MessagePusher, PollLifecycleGate, PollRepository, RoomRegistry},
    usecase::{
        BroadcastEngine, ComputeAggregateUseCase, ConnectParticipantUseCase, CreatePollUseCase,
        DisconnectParticipantUseCase, FetchPollUseCase, JoinPollUseCase, LeavePollUseCase,
        ParticipantCountUseCase, SubmitVoteUseCase,
    },
};

/// Shared application state
pub struct AppState {
    /// CreatePollUseCase（Poll 作成のユースケース）
    pub create_poll_usecase: Arc<CreatePollUseCase>,
    /// FetchPollUseCase（Poll 取得のユースケース）
    pub fetch_poll_usecase: Arc<FetchPollUseCase>,
    /// SubmitVoteUseCase（投票のユースケース）
    pub submit_vote_usecase: Arc<SubmitVoteUseCase>,
    /// ConnectParticipantUseCase（接続開始のユースケース）
    pub connect_participant_usecase: Arc<ConnectParticipantUseCase>,
    /// DisconnectParticipantUseCase（接続終了のユースケース）
    pub disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
    /// JoinPollUseCase（Room 参加のユースケース）
    pub join_poll_usecase: Arc<JoinPollUseCase>,
    /// LeavePollUseCase（Room 退出のユースケース）
    pub leave_poll_usecase: Arc<LeavePollUseCase>,
    /// ParticipantCountUseCase（参加人数取得のユースケース）
    pub participant_count_usecase: Arc<ParticipantCountUseCase>,
    /// MessagePusher（接続ごとのエラー通知に使う）
    pub message_pusher: Arc<dyn MessagePusher>,
    /// 1 回の WebSocket 送信に許す時間
    pub send_timeout: Duration,
}

impl AppState {
    /// Build the engine and every use case on top of the given adapters.
    ///
    /// The same `BroadcastEngine` instance is shared by the vote path and
    /// the connection path.
    pub fn new(
        repository: Arc<dyn PollRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        registry: Arc<dyn RoomRegistry>,
        clock: Arc<dyn Clock>,
        send_timeout: Duration,
    ) -> Self {
        // 1. Lifecycle gate and aggregate calculator
        let gate = Arc::new(PollLifecycleGate::new(repository.clone(), clock.clone()));
        let aggregates = Arc::new(ComputeAggregateUseCase::new(repository.clone()));

        // 2. Broadcast engine
        let broadcast_engine = Arc::new(BroadcastEngine::new(
            registry.clone(),
            message_pusher.clone(),
            aggregates.clone(),
        ));

        // 3. UseCases
        Self {
            create_poll_usecase: Arc::new(CreatePollUseCase::new(repository.clone(), clock)),
            fetch_poll_usecase: Arc::new(FetchPollUseCase::new(
                repository.clone(),
                gate.clone(),
                aggregates.clone(),
            )),
            submit_vote_usecase: Arc::new(SubmitVoteUseCase::new(
                repository.clone(),
                gate,
                aggregates,
                broadcast_engine.clone(),
            )),
            connect_participant_usecase: Arc::new(ConnectParticipantUseCase::new(
                registry.clone(),
                message_pusher.clone(),
            )),
            disconnect_participant_usecase: Arc::new(DisconnectParticipantUseCase::new(
                registry.clone(),
                message_pusher.clone(),
                broadcast_engine.clone(),
            )),
            join_poll_usecase: Arc::new(JoinPollUseCase::new(
                repository,
                registry.clone(),
                broadcast_engine.clone(),
            )),
            leave_poll_usecase: Arc::new(LeavePollUseCase::new(
                registry.clone(),
                broadcast_engine,
            )),
            participant_count_usecase: Arc::new(ParticipantCountUseCase::new(registry)),
            message_pusher,
            send_timeout,
        }
    }
}
