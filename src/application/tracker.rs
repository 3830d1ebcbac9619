use super::dispatcher::{DispatchStats, Dispatcher};
use super::position_ingest::PositionIngest;
use super::query_service::{QueryRoutes, QueryService};
use crate::common::{ApplicationError, ApplicationResult, MessageBus};
use crate::config::Config;
use crate::domains::logger::DynLogger;
use crate::domains::tracking::{BoardActor, BoardHandle, BoardState};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Running tracker: one board worker plus the bus consumer feeding it.
pub struct Tracker {
    board: BoardHandle,
    worker: JoinHandle<BoardState>,
    consumer: JoinHandle<DispatchStats>,
}

impl Tracker {
    /// Subscribe to the position and query exchanges and start consuming.
    ///
    /// The bindings are registered before this returns. On the in-memory bus
    /// that means anything published afterwards is seen; other transports
    /// may still be joining when it returns. A bus failure here is fatal to
    /// the caller.
    pub async fn start(
        config: &Config,
        bus: Arc<dyn MessageBus>,
        logger: DynLogger,
    ) -> ApplicationResult<Self> {
        let grid = config.grid()?;
        let board = BoardState::with_mode(grid, config.board.recompute_mode);
        let (actor, handle) = BoardActor::new(board, logger, config.tracker.command_buffer);

        let ingest = PositionIngest::new(handle.clone(), &config.exchanges.position);
        let routes = QueryRoutes {
            request_exchange: config.exchanges.query.clone(),
            request_key: config.exchanges.query_routing_key.clone(),
            response_exchange: config.exchanges.query_response.clone(),
        };
        let queries = QueryService::new(bus.clone(), handle.clone(), routes);
        let dispatcher = Dispatcher::new(bus, ingest, queries);

        let subscription = dispatcher.subscribe().await?;

        let worker = tokio::spawn(actor.run());
        let consumer = tokio::spawn(dispatcher.run(subscription));

        tracing::info!(
            width = grid.width(),
            height = grid.height(),
            mode = ?config.board.recompute_mode,
            "Tracker started"
        );

        Ok(Self {
            board: handle,
            worker,
            consumer,
        })
    }

    pub fn board(&self) -> &BoardHandle {
        &self.board
    }

    /// Stop consuming and return the final board. Queued but unprocessed
    /// messages are discarded. Waits until every cloned [`BoardHandle`]
    /// has been dropped.
    pub async fn shutdown(self) -> ApplicationResult<BoardState> {
        let Tracker {
            board,
            worker,
            consumer,
        } = self;

        consumer.abort();
        let _ = consumer.await;
        drop(board);

        let board = worker
            .await
            .map_err(|_| ApplicationError::WorkerStopped)?;
        tracing::info!("Tracker stopped");
        Ok(board)
    }
}
