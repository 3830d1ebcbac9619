use super::board::{BoardSnapshot, BoardState};
use super::events::BoardEvent;
use super::grid::{Cell, Direction};
use crate::common::{ApplicationError, ApplicationResult, DomainResult};
use crate::domains::logger::DynLogger;
use tokio::sync::{broadcast, mpsc, oneshot};

const EVENT_FANOUT_CAPACITY: usize = 256;

/// Work items for the board worker. Every read and write of the board
/// goes through one of these.
#[derive(Debug)]
pub enum BoardCommand {
    Create {
        identity: String,
        x: i64,
        y: i64,
        infected: bool,
        reply: oneshot::Sender<DomainResult<()>>,
    },
    Move {
        identity: String,
        direction: Direction,
        reply: oneshot::Sender<DomainResult<Cell>>,
    },
    Contacts {
        identity: String,
        reply: oneshot::Sender<DomainResult<Vec<String>>>,
    },
    Snapshot {
        reply: oneshot::Sender<BoardSnapshot>,
    },
}

/// Single worker that owns the board and applies commands one at a time,
/// in the order they were queued.
pub struct BoardActor {
    board: BoardState,
    command_receiver: mpsc::Receiver<BoardCommand>,
    event_sender: broadcast::Sender<BoardEvent>,
    logger: DynLogger,
}

impl BoardActor {
    pub fn new(board: BoardState, logger: DynLogger, buffer: usize) -> (Self, BoardHandle) {
        let (command_sender, command_receiver) = mpsc::channel(buffer.max(1));
        let (event_sender, _) = broadcast::channel(EVENT_FANOUT_CAPACITY);

        let handle = BoardHandle {
            command_sender,
            event_sender: event_sender.clone(),
        };
        let actor = Self {
            board,
            command_receiver,
            event_sender,
            logger,
        };
        (actor, handle)
    }

    /// Drain commands until every handle is dropped, then hand the board back.
    pub async fn run(mut self) -> BoardState {
        while let Some(command) = self.command_receiver.recv().await {
            self.handle_command(command);
        }
        tracing::info!("Board worker stopped with {} agents", self.board.len());
        self.board
    }

    fn handle_command(&mut self, command: BoardCommand) {
        match command {
            BoardCommand::Create {
                identity,
                x,
                y,
                infected,
                reply,
            } => {
                let result = self
                    .board
                    .create_person_with_status(&identity, x, y, infected);
                if let Err(e) = &result {
                    self.logger.warn(&format!("Create rejected: {}", e));
                }
                self.commit_events();
                let _ = reply.send(result);
            }
            BoardCommand::Move {
                identity,
                direction,
                reply,
            } => {
                let result = self.board.move_person(&identity, direction);
                if let Err(e) = &result {
                    self.logger.warn(&format!("Move rejected: {}", e));
                }
                self.commit_events();
                let _ = reply.send(result);
            }
            BoardCommand::Contacts { identity, reply } => {
                let result = self.board.get_contacts(&identity);
                match &result {
                    Ok(contacts) => self.logger.info(&format!(
                        "Query: found {} contacts for {}",
                        contacts.len(),
                        identity
                    )),
                    Err(e) => self.logger.warn(&format!("Query rejected: {}", e)),
                }
                let _ = reply.send(result);
            }
            BoardCommand::Snapshot { reply } => {
                let _ = reply.send(self.board.snapshot());
            }
        }
    }

    fn commit_events(&mut self) {
        for event in self.board.take_events() {
            self.logger.info(&event.describe());
            tracing::debug!(
                event_type = event.event_type(),
                identity = event.identity(),
                occurred_at = %event.occurred_at(),
                "board event"
            );
            // No observers is fine.
            let _ = self.event_sender.send(event);
        }
    }
}

/// Cloneable front door to a running [`BoardActor`].
#[derive(Clone)]
pub struct BoardHandle {
    command_sender: mpsc::Sender<BoardCommand>,
    event_sender: broadcast::Sender<BoardEvent>,
}

impl BoardHandle {
    pub async fn create_person(
        &self,
        identity: String,
        x: i64,
        y: i64,
        infected: bool,
    ) -> ApplicationResult<()> {
        let (reply, response) = oneshot::channel();
        self.submit(BoardCommand::Create {
            identity,
            x,
            y,
            infected,
            reply,
        })
        .await?;
        Ok(Self::await_reply(response).await??)
    }

    pub async fn move_person(&self, identity: String, direction: Direction) -> ApplicationResult<Cell> {
        let (reply, response) = oneshot::channel();
        self.submit(BoardCommand::Move {
            identity,
            direction,
            reply,
        })
        .await?;
        Ok(Self::await_reply(response).await??)
    }

    pub async fn contacts(&self, identity: String) -> ApplicationResult<Vec<String>> {
        let (reply, response) = oneshot::channel();
        self.submit(BoardCommand::Contacts { identity, reply }).await?;
        Ok(Self::await_reply(response).await??)
    }

    pub async fn snapshot(&self) -> ApplicationResult<BoardSnapshot> {
        let (reply, response) = oneshot::channel();
        self.submit(BoardCommand::Snapshot { reply }).await?;
        Self::await_reply(response).await
    }

    /// Stream of board events committed after this call.
    pub fn subscribe_events(&self) -> broadcast::Receiver<BoardEvent> {
        self.event_sender.subscribe()
    }

    async fn submit(&self, command: BoardCommand) -> ApplicationResult<()> {
        self.command_sender
            .send(command)
            .await
            .map_err(|_| ApplicationError::WorkerStopped)
    }

    async fn await_reply<T>(response: oneshot::Receiver<T>) -> ApplicationResult<T> {
        response.await.map_err(|_| ApplicationError::WorkerStopped)
    }
}
