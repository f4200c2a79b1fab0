use crate::actors::messages::{
    ActorError, AnswerReady, AppError, AskOutcome, SessionSnapshot, SupervisorMessage,
};
use crate::actors::traits::ConversationStore;
use crate::brain::ResponseComposer;
use crate::models::NewMessage;
use crate::session::{
    ChatMessage, ConversationSession, Notification, SubmitOutcome, TurnId,
};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout, Duration};
use tracing::{debug, info, instrument, warn};

/// Timing knobs for the supervisor
#[derive(Debug, Clone, Copy)]
pub struct SupervisorOptions {
    /// Presentation delay between accepting a question and appending its reply.
    pub response_delay: Duration,
    /// Upper bound on waiting for any reply from the actor.
    pub reply_timeout: Duration,
}

impl Default for SupervisorOptions {
    fn default() -> Self {
        Self {
            response_delay: Duration::from_millis(1500),
            reply_timeout: Duration::from_secs(30),
        }
    }
}

/// A handle to the `SupervisorActor`.
///
/// The supervisor owns every live [`ConversationSession`]. A session is
/// opened by its first question, seeded with the welcome message and any
/// history the [`ConversationStore`] already holds for that id. Answers are
/// appended after the presentation delay and every appended message is
/// handed to the store. A failed load or save becomes a notification on the
/// session instead of an error.
///
/// Sessions opened by [`SupervisorHandle::ask_and_wait`] are one-off: they
/// are released as soon as their reply is appended, and the next question
/// for the same id reopens them from the store.
#[derive(Clone)]
pub struct SupervisorHandle {
    sender: mpsc::Sender<SupervisorMessage>,
    reply_timeout: Duration,
}

impl SupervisorHandle {
    /// Spawns the supervisor over `store` and returns a handle to it.
    pub fn new<S: ConversationStore>(
        store: Arc<S>,
        composer: ResponseComposer,
        options: SupervisorOptions,
    ) -> Self {
        let (sender, receiver) = mpsc::channel(32);
        let actor = SupervisorRunner::new(receiver, store, Arc::new(composer), options);
        tokio::spawn(async move { actor.run().await });
        Self {
            sender,
            reply_timeout: options.reply_timeout,
        }
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<T, AppError>>) -> SupervisorMessage,
    ) -> Result<T, AppError> {
        let (send, recv) = oneshot::channel();
        self.sender
            .send(build(send))
            .await
            .map_err(|e| ActorError::Internal(e.to_string()))?;
        timeout(self.reply_timeout, recv)
            .await?
            .map_err(|e| ActorError::Internal(e.to_string()))?
    }

    /// Submits `text` to a session and returns as soon as the user message
    /// is appended. The reply arrives later; poll with [`Self::snapshot`].
    #[instrument(skip(self, text))]
    pub async fn ask(&self, session_id: String, text: String) -> Result<AskOutcome, AppError> {
        self.request(|responder| SupervisorMessage::Ask {
            session_id,
            text,
            reply: None,
            responder,
        })
        .await
    }

    /// Submits `text` and waits for the assistant message.
    ///
    /// Blank input is a validation error and a busy session is a conflict.
    #[instrument(skip(self, text))]
    pub async fn ask_and_wait(
        &self,
        session_id: String,
        text: String,
    ) -> Result<ChatMessage, AppError> {
        if text.trim().is_empty() {
            return Err(AppError::Validation("Message is required".to_string()));
        }
        let (reply_send, reply_recv) = oneshot::channel();
        let outcome = self
            .request(|responder| SupervisorMessage::Ask {
                session_id: session_id.clone(),
                text,
                reply: Some(reply_send),
                responder,
            })
            .await?;

        match outcome {
            AskOutcome::Accepted { .. } => timeout(self.reply_timeout, reply_recv)
                .await?
                .map_err(|_| ActorError::SessionClosed(session_id))?,
            AskOutcome::Ignored => Err(AppError::Validation("Message is required".to_string())),
            AskOutcome::Busy => Err(AppError::Conflict(
                "A reply is still being composed for this session".to_string(),
            )),
        }
    }

    /// Current state of an open session; `NotFound` if it was never opened
    /// or has been closed.
    #[instrument(skip(self))]
    pub async fn snapshot(&self, session_id: String) -> Result<SessionSnapshot, AppError> {
        self.request(|responder| SupervisorMessage::Snapshot {
            session_id,
            responder,
        })
        .await
    }

    /// Closes a session, cancelling any pending reply. Returns whether the
    /// session existed.
    #[instrument(skip(self))]
    pub async fn close(&self, session_id: String) -> Result<bool, AppError> {
        self.request(|responder| SupervisorMessage::Close {
            session_id,
            responder,
        })
        .await
    }

    pub async fn shutdown(&self) -> Result<(), AppError> {
        self.sender
            .send(SupervisorMessage::Shutdown)
            .await
            .map_err(|e| ActorError::Internal(e.to_string()))?;
        Ok(())
    }
}

// --- Actor Runner ---

struct PendingReply {
    turn: TurnId,
    task: JoinHandle<()>,
    waiters: Vec<oneshot::Sender<Result<ChatMessage, AppError>>>,
}

struct SessionEntry {
    session: ConversationSession,
    /// Unique per opening, so answers scheduled before a close never match
    /// a reopened session.
    generation: u64,
    /// Released once its reply is appended.
    transient: bool,
    pending: Option<PendingReply>,
}

impl SessionEntry {
    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.session.id().to_string(),
            state: self.session.state().clone(),
            messages: self.session.messages().to_vec(),
            notifications: self.session.notifications().to_vec(),
        }
    }
}

struct SupervisorRunner<S: ConversationStore> {
    receiver: mpsc::Receiver<SupervisorMessage>,
    answers_sender: mpsc::Sender<AnswerReady>,
    answers: mpsc::Receiver<AnswerReady>,
    store: Arc<S>,
    composer: Arc<ResponseComposer>,
    response_delay: Duration,
    sessions: HashMap<String, SessionEntry>,
    next_generation: u64,
}

/// Open a session, restoring whatever the store already has for its id.
async fn open_session<S: ConversationStore>(
    store: &S,
    session_id: &str,
    generation: u64,
    transient: bool,
) -> SessionEntry {
    let session = match store.load_messages(session_id).await {
        Ok(stored) => {
            let history: Vec<ChatMessage> = stored
                .into_iter()
                .filter_map(ChatMessage::from_stored)
                .collect();
            debug!(session_id, restored = history.len(), "Opened session");
            ConversationSession::restore(session_id, history)
        }
        Err(e) => {
            warn!(session_id, error = %e, "Failed to load conversation history");
            let mut session = ConversationSession::new(session_id);
            session.notify(Notification::new(format!(
                "Earlier messages could not be loaded: {}",
                e
            )));
            session
        }
    };

    SessionEntry {
        session,
        generation,
        transient,
        pending: None,
    }
}

/// Save one message; a failure is recorded on the session.
async fn persist<S: ConversationStore>(
    store: &S,
    session: &mut ConversationSession,
    message: &ChatMessage,
) {
    let new = NewMessage::from_chat(session.id(), message);
    if let Err(e) = store.append_message(new).await {
        warn!(session_id = %session.id(), error = %e, "Failed to persist message");
        session.notify(Notification::new(format!(
            "Your conversation could not be saved: {}",
            e
        )));
    }
}

impl<S: ConversationStore> SupervisorRunner<S> {
    fn new(
        receiver: mpsc::Receiver<SupervisorMessage>,
        store: Arc<S>,
        composer: Arc<ResponseComposer>,
        options: SupervisorOptions,
    ) -> Self {
        let (answers_sender, answers) = mpsc::channel(32);
        Self {
            receiver,
            answers_sender,
            answers,
            store,
            composer,
            response_delay: options.response_delay,
            sessions: HashMap::new(),
            next_generation: 0,
        }
    }

    async fn run(mut self) {
        info!("Supervisor started");
        loop {
            tokio::select! {
                msg = self.receiver.recv() => match msg {
                    Some(SupervisorMessage::Shutdown) | None => break,
                    Some(msg) => self.handle_message(msg).await,
                },
                Some(ready) = self.answers.recv() => self.handle_answer(ready).await,
            }
        }
        for (_, entry) in self.sessions.drain() {
            if let Some(pending) = entry.pending {
                pending.task.abort();
            }
        }
        info!("Supervisor stopped");
    }

    async fn handle_message(&mut self, msg: SupervisorMessage) {
        match msg {
            SupervisorMessage::Ask {
                session_id,
                text,
                reply,
                responder,
            } => {
                let outcome = self.handle_ask(session_id, &text, reply).await;
                if responder.send(Ok(outcome)).is_err() {
                    warn!("Failed to send ask response (channel closed)");
                }
            }
            SupervisorMessage::Snapshot {
                session_id,
                responder,
            } => {
                let snapshot = self
                    .sessions
                    .get(&session_id)
                    .map(SessionEntry::snapshot)
                    .ok_or_else(|| AppError::NotFound(format!("Session {} not found", session_id)));
                if responder.send(snapshot).is_err() {
                    warn!("Failed to send snapshot response (channel closed)");
                }
            }
            SupervisorMessage::Close {
                session_id,
                responder,
            } => {
                let existed = self.handle_close(&session_id);
                if responder.send(Ok(existed)).is_err() {
                    warn!("Failed to send close response (channel closed)");
                }
            }
            SupervisorMessage::Shutdown => {}
        }
    }

    #[instrument(skip(self, text, reply))]
    async fn handle_ask(
        &mut self,
        session_id: String,
        text: &str,
        reply: Option<oneshot::Sender<Result<ChatMessage, AppError>>>,
    ) -> AskOutcome {
        let entry = match self.sessions.entry(session_id.clone()) {
            Entry::Occupied(occupied) => occupied.into_mut(),
            Entry::Vacant(vacant) => {
                self.next_generation += 1;
                let opened = open_session(
                    &*self.store,
                    vacant.key(),
                    self.next_generation,
                    reply.is_some(),
                )
                .await;
                vacant.insert(opened)
            }
        };

        let pending = match entry.session.submit(text) {
            SubmitOutcome::Accepted(pending) => pending,
            SubmitOutcome::Ignored => {
                debug!("Ignoring blank question");
                return AskOutcome::Ignored;
            }
            SubmitOutcome::Busy => {
                debug!("Rejecting question while composing");
                return AskOutcome::Busy;
            }
        };

        persist(&*self.store, &mut entry.session, &pending.user_message).await;

        let answers_sender = self.answers_sender.clone();
        let composer = Arc::clone(&self.composer);
        let delay = self.response_delay;
        let turn = pending.turn;
        let generation = entry.generation;
        let question = pending.question;
        let task = tokio::spawn(async move {
            sleep(delay).await;
            let answer = composer.answer(&question);
            let ready = AnswerReady {
                session_id,
                generation,
                turn,
                answer,
            };
            if answers_sender.send(ready).await.is_err() {
                warn!("Failed to deliver answer (supervisor stopped)");
            }
        });

        entry.pending = Some(PendingReply {
            turn,
            task,
            waiters: reply.into_iter().collect(),
        });

        AskOutcome::Accepted {
            turn,
            user_message: pending.user_message,
        }
    }

    #[instrument(skip(self, ready), fields(session_id = %ready.session_id, turn = ready.turn))]
    async fn handle_answer(&mut self, ready: AnswerReady) {
        let Some(entry) = self.sessions.get_mut(&ready.session_id) else {
            debug!("Discarding answer for closed session");
            return;
        };
        if entry.generation != ready.generation {
            debug!("Discarding answer scheduled before the session was reopened");
            return;
        }

        let message = match entry.session.resolve(ready.turn, ready.answer) {
            Ok(message) => message.clone(),
            Err(e) => {
                debug!(error = %e, "Discarding stale answer");
                return;
            }
        };

        persist(&*self.store, &mut entry.session, &message).await;

        if let Some(pending) = entry.pending.take() {
            for waiter in pending.waiters {
                let _ = waiter.send(Ok(message.clone()));
            }
        }
        info!("Reply appended");

        if entry.transient {
            self.sessions.remove(&ready.session_id);
            debug!("Released one-off session");
        }
    }

    fn handle_close(&mut self, session_id: &str) -> bool {
        let Some(entry) = self.sessions.remove(session_id) else {
            return false;
        };
        if let Some(pending) = entry.pending {
            pending.task.abort();
            debug!(session_id, turn = pending.turn, "Cancelled pending reply");
            for waiter in pending.waiters {
                let _ = waiter.send(Err(
                    ActorError::SessionClosed(session_id.to_string()).into()
                ));
            }
        }
        info!(session_id, "Session closed");
        true
    }
}
