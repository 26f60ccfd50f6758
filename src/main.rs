use actix_web::{middleware, web, App, HttpServer};
use std::error::Error;

use eduguard_chat::api::{self, AppContext};
use eduguard_chat::{ReplyBook, Responder, ServerConfig};

#[actix_web::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServerConfig::from_env()?;

    let book = match &config.reply_book {
        Some(path) => {
            log::info!("Loading counselor script from {}", path.display());
            ReplyBook::from_json_file(path)?
        }
        None => ReplyBook::default(),
    };

    log::info!(
        "Reply delays: {} ms reply, {} ms follow-up, {} ms quick action",
        config.chat.reply_delay_ms,
        config.chat.follow_up_delay_ms,
        config.chat.quick_action_delay_ms
    );

    let ctx = web::Data::new(AppContext::new(Responder::new(book), config.chat));
    let server_ctx = ctx.clone();
    let sweeper = api::start_session_sweeper(
        ctx.clone(),
        config.session_idle_timeout(),
        config.session_sweep_interval(),
    );

    log::info!(
        "Starting EduGuard counselor chat on http://{}:{}",
        config.host,
        config.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(server_ctx.clone())
            .configure(api::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    sweeper.cancel();
    ctx.sessions.close_all();
    log::info!("Server stopped, all sessions closed");

    Ok(())
}
