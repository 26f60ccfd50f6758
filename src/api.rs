use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::config::ChatConfig;
use crate::conversation::{Conversation, ConversationState};
use crate::error::{ChatError, Result};
use crate::message::ChatMessage;
use crate::page::CHAT_PAGE;
use crate::quick_action::{QuickAction, QuickActionInfo};
use crate::responder::Responder;
use crate::scheduler::{Scheduler, TokioScheduler};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub visitor_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SubmitMessageRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct QuickActionRequest {
    pub action: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub session_id: String,
    pub state: ConversationState,
    pub transcript: Vec<ChatMessage>,
}

impl SessionResponse {
    fn snapshot(conversation: &Conversation) -> Self {
        SessionResponse {
            session_id: conversation.id().to_string(),
            state: conversation.state(),
            transcript: conversation.transcript(),
        }
    }
}

/// Live conversations keyed by session id. Nothing survives a restart, and
/// sessions nobody touches for a while are swept out.
#[derive(Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<String, Conversation>>,
}

impl SessionStore {
    pub fn insert(&self, conversation: Conversation) {
        self.lock().insert(conversation.id().to_string(), conversation);
    }

    /// Looks a session up and counts the lookup as visitor activity.
    pub fn get(&self, id: &str) -> Result<Conversation> {
        let conversation = self
            .lock()
            .get(id)
            .cloned()
            .ok_or_else(|| ChatError::SessionNotFound(id.to_string()))?;
        conversation.touch();
        Ok(conversation)
    }

    pub fn remove(&self, id: &str) -> Result<Conversation> {
        self.lock()
            .remove(id)
            .ok_or_else(|| ChatError::SessionNotFound(id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Closes and drops every session idle for at least `idle_timeout` as of
    /// `now`. Returns the evicted ids.
    pub fn evict_idle(&self, now: DateTime<Utc>, idle_timeout: Duration) -> Vec<String> {
        let evicted: Vec<Conversation> = {
            let mut sessions = self.lock();
            let expired: Vec<String> = sessions
                .iter()
                .filter(|(_, c)| {
                    (now - c.last_activity())
                        .to_std()
                        .map(|idle| idle >= idle_timeout)
                        .unwrap_or(false)
                })
                .map(|(id, _)| id.clone())
                .collect();
            expired.iter().filter_map(|id| sessions.remove(id)).collect()
        };

        evicted
            .into_iter()
            .map(|conversation| {
                conversation.close();
                conversation.id().to_string()
            })
            .collect()
    }

    pub fn close_all(&self) {
        let drained: Vec<Conversation> = self.lock().drain().map(|(_, c)| c).collect();
        for conversation in drained {
            conversation.close();
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Conversation>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Shared state handed to every worker.
pub struct AppContext {
    pub responder: Arc<Responder>,
    pub chat: ChatConfig,
    pub sessions: SessionStore,
}

impl AppContext {
    pub fn new(responder: Responder, chat: ChatConfig) -> Self {
        AppContext {
            responder: Arc::new(responder),
            chat,
            sessions: SessionStore::default(),
        }
    }
}

/// Periodically evicts idle sessions until the returned token is cancelled.
pub fn start_session_sweeper(
    ctx: web::Data<AppContext>,
    idle_timeout: Duration,
    every: Duration,
) -> CancellationToken {
    let cancel_token = CancellationToken::new();
    let cancel_token_clone = cancel_token.clone();

    tokio::spawn(async move {
        log::info!(
            "[Sweeper] Closing sessions idle for {}s, checking every {}s",
            idle_timeout.as_secs(),
            every.as_secs()
        );

        let mut ticker = tokio::time::interval(every);
        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let evicted = ctx.sessions.evict_idle(Utc::now(), idle_timeout);
                    if !evicted.is_empty() {
                        log::info!(
                            "[Sweeper] Evicted {} idle sessions ({} active)",
                            evicted.len(),
                            ctx.sessions.len()
                        );
                    }
                }
                _ = cancel_token_clone.cancelled() => {
                    log::info!("[Sweeper] Stopped");
                    break;
                }
            }
        }
    });

    cancel_token
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(serve_homepage))
        .route("/health", web::get().to(health_check))
        .route("/quick-actions", web::get().to(list_quick_actions))
        .route("/sessions", web::post().to(create_session))
        .route("/sessions/{id}", web::delete().to(close_session))
        .route("/sessions/{id}/messages", web::post().to(submit_message))
        .route("/sessions/{id}/quick-actions", web::post().to(trigger_quick_action))
        .route("/sessions/{id}/transcript", web::get().to(get_transcript));
}

async fn serve_homepage() -> HttpResponse {
    HttpResponse::Ok().content_type("text/html").body(CHAT_PAGE)
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().body("EduGuard counselor chat is running!")
}

async fn list_quick_actions() -> HttpResponse {
    let actions: Vec<QuickActionInfo> = QuickAction::ALL.iter().map(|a| a.info()).collect();
    HttpResponse::Ok().json(actions)
}

async fn create_session(
    ctx: web::Data<AppContext>,
    body: Option<web::Json<CreateSessionRequest>>,
) -> Result<HttpResponse> {
    let request = body.map(|b| b.into_inner()).unwrap_or_default();

    let scheduler: Arc<dyn Scheduler> = Arc::new(TokioScheduler::current()?);
    let conversation = Conversation::new(ctx.responder.clone(), scheduler, ctx.chat);
    if let Some(name) = request.visitor_name.as_deref() {
        conversation.greet(name);
    }

    let response = SessionResponse::snapshot(&conversation);
    ctx.sessions.insert(conversation);

    log::info!(
        "[Api] Opened session {} ({} active)",
        response.session_id,
        ctx.sessions.len()
    );

    Ok(HttpResponse::Created().json(response))
}

async fn submit_message(
    ctx: web::Data<AppContext>,
    path: web::Path<String>,
    body: web::Json<SubmitMessageRequest>,
) -> Result<HttpResponse> {
    let conversation = ctx.sessions.get(&path)?;
    conversation.submit_visitor_message(&body.text);
    Ok(HttpResponse::Accepted().json(SessionResponse::snapshot(&conversation)))
}

async fn trigger_quick_action(
    ctx: web::Data<AppContext>,
    path: web::Path<String>,
    body: web::Json<QuickActionRequest>,
) -> Result<HttpResponse> {
    let conversation = ctx.sessions.get(&path)?;
    conversation.trigger_quick_action(&body.action);
    Ok(HttpResponse::Accepted().json(SessionResponse::snapshot(&conversation)))
}

async fn get_transcript(
    ctx: web::Data<AppContext>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let conversation = ctx.sessions.get(&path)?;
    Ok(HttpResponse::Ok().json(SessionResponse::snapshot(&conversation)))
}

async fn close_session(
    ctx: web::Data<AppContext>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let conversation = ctx.sessions.remove(&path)?;
    conversation.close();
    log::info!("[Api] Closed session {}", conversation.id());
    Ok(HttpResponse::NoContent().finish())
}
