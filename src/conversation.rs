use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

use crate::config::ChatConfig;
use crate::message::ChatMessage;
use crate::quick_action::{self, QuickAction};
use crate::responder::{RandomSource, Responder, ThreadRandom};
use crate::scheduler::Scheduler;
use crate::sentiment::{classify, Sentiment};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ConversationState {
    Idle,
    AwaitingReply,
    /// The reply is out and a resource offer is still pending.
    OfferingResources,
}

struct Session {
    transcript: Vec<ChatMessage>,
    awaiting_replies: usize,
    pending_offers: usize,
    closed: bool,
    rng: Box<dyn RandomSource>,
    last_activity: DateTime<Utc>,
}

/// A single chat session with the simulated counselor.
///
/// Visitor messages are appended immediately; assistant messages arrive
/// later through the scheduler, filed under the conversation id so a shared
/// scheduler can cancel one session without touching the others. Cloning
/// yields another handle to the same session.
#[derive(Clone)]
pub struct Conversation {
    id: String,
    session: Arc<Mutex<Session>>,
    responder: Arc<Responder>,
    scheduler: Arc<dyn Scheduler>,
    config: ChatConfig,
}

impl Conversation {
    pub fn new(responder: Arc<Responder>, scheduler: Arc<dyn Scheduler>, config: ChatConfig) -> Self {
        Conversation {
            id: Uuid::new_v4().to_string(),
            session: Arc::new(Mutex::new(Session {
                transcript: Vec::new(),
                awaiting_replies: 0,
                pending_offers: 0,
                closed: false,
                rng: Box::new(ThreadRandom),
                last_activity: Utc::now(),
            })),
            responder,
            scheduler,
            config,
        }
    }

    /// Replaces the source used for picking among equivalent replies.
    pub fn with_random_source(self, rng: impl RandomSource + 'static) -> Self {
        self.lock().rng = Box::new(rng);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Appends the counselor's opening line.
    pub fn greet(&self, visitor_name: &str) {
        let greeting = self.responder.greeting(visitor_name);
        let mut session = self.lock();
        if session.closed {
            return;
        }
        session.transcript.push(ChatMessage::assistant(greeting));
        session.last_activity = Utc::now();
    }

    pub fn submit_visitor_message(&self, text: &str) {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            log::debug!("[Conversation {}] Ignoring empty message", self.id);
            return;
        }

        let sentiment = classify(text);
        let wants_offer =
            sentiment == Sentiment::Negative || trimmed.to_lowercase().contains("stressed");

        {
            let mut session = self.lock();
            if session.closed {
                log::debug!("[Conversation {}] Message after close dropped", self.id);
                return;
            }
            session.transcript.push(ChatMessage::visitor(trimmed, sentiment));
            session.awaiting_replies += 1;
            session.last_activity = Utc::now();
        }

        log::debug!(
            "[Conversation {}] Visitor message classified as {}, follow-up offer: {}",
            self.id,
            sentiment.as_str(),
            wants_offer
        );

        let this = self.clone();
        let text = trimmed.to_string();
        self.scheduler.schedule(
            &self.id,
            self.config.reply_delay(),
            Box::new(move || this.deliver_reply(&text, sentiment, wants_offer)),
        );
    }

    /// Handles a quick-action shortcut. Unknown ids still get an answer,
    /// the generic fallback.
    pub fn trigger_quick_action(&self, action_id: &str) {
        let action_id = action_id.trim();
        if action_id.is_empty() {
            return;
        }

        let action = action_id.parse::<QuickAction>().ok();
        if action.is_none() {
            log::warn!("[Conversation {}] Unknown quick action '{}'", self.id, action_id);
        }

        {
            let mut session = self.lock();
            if session.closed {
                return;
            }
            let request = quick_action::request_text(action_id);
            session
                .transcript
                .push(ChatMessage::visitor(request, Sentiment::Neutral));
            session.awaiting_replies += 1;
            session.last_activity = Utc::now();
        }

        let this = self.clone();
        self.scheduler.schedule(
            &self.id,
            self.config.quick_action_delay(),
            Box::new(move || this.deliver_quick_action_reply(action)),
        );
    }

    /// Snapshot of the messages so far, oldest first.
    pub fn transcript(&self) -> Vec<ChatMessage> {
        self.lock().transcript.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().transcript.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn state(&self) -> ConversationState {
        let session = self.lock();
        if session.awaiting_replies > 0 {
            ConversationState::AwaitingReply
        } else if session.pending_offers > 0 {
            ConversationState::OfferingResources
        } else {
            ConversationState::Idle
        }
    }

    /// Marks the visitor as still present, e.g. when the page polls.
    pub fn touch(&self) {
        self.lock().last_activity = Utc::now();
    }

    /// Last time the visitor did something in this session.
    pub fn last_activity(&self) -> DateTime<Utc> {
        self.lock().last_activity
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Tears the session down. Pending replies are cancelled and anything
    /// that still fires afterwards is discarded.
    pub fn close(&self) {
        {
            let mut session = self.lock();
            if session.closed {
                return;
            }
            session.closed = true;
            session.awaiting_replies = 0;
            session.pending_offers = 0;
        }
        self.scheduler.cancel(&self.id);
        log::info!("[Conversation {}] Closed", self.id);
    }

    fn deliver_reply(&self, text: &str, sentiment: Sentiment, wants_offer: bool) {
        {
            let mut session = self.lock();
            if session.closed {
                return;
            }
            let reply = self.responder.generate(text, sentiment, session.rng.as_mut());
            session.transcript.push(ChatMessage::assistant(reply));
            session.awaiting_replies = session.awaiting_replies.saturating_sub(1);
            if wants_offer {
                session.pending_offers += 1;
            }
        }

        if wants_offer {
            let this = self.clone();
            self.scheduler.schedule(
                &self.id,
                self.config.follow_up_delay(),
                Box::new(move || this.deliver_offer()),
            );
        }
    }

    fn deliver_offer(&self) {
        let mut session = self.lock();
        if session.closed {
            return;
        }
        session
            .transcript
            .push(ChatMessage::assistant(self.responder.resource_offer()));
        session.pending_offers = session.pending_offers.saturating_sub(1);
    }

    fn deliver_quick_action_reply(&self, action: Option<QuickAction>) {
        let mut session = self.lock();
        if session.closed {
            return;
        }
        session
            .transcript
            .push(ChatMessage::assistant(self.responder.quick_action_reply(action)));
        session.awaiting_replies = session.awaiting_replies.saturating_sub(1);
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
