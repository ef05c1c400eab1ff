//! Bakehouse shop-floor terminal host.
//!
//! Runs a [`SessionGuard`] for one signed-in terminal. Each line on stdin
//! is fed to the guard as an input event (`keydown`, `mousemove`, ...; an
//! empty line counts as `keydown`). When the guard forces a logout the
//! redirect is printed and the process exits.
//!
//! With a token (`--token` or `BAKEHOUSE_TERMINAL_TOKEN`, issued by
//! `bakehouse-admin session issue`) the guard runs against the database;
//! otherwise it runs against an in-memory store.

use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use bakehouse::{ENV_VAR, init_logging};
use bakehouse_auth::DatabaseSessionStore;
use bakehouse_core::config::AppConfig;
use bakehouse_core::error::AppError;
use bakehouse_core::traits::SessionStore;
use bakehouse_core::types::UserId;
use bakehouse_database::DatabasePool;
use bakehouse_database::repositories::{
    AuthSessionRepository, LivenessRepository, ProfileRepository,
};
use bakehouse_guard::{
    ActivityKind, ChannelNavigator, GuardConfig, MemorySessionStore, SessionGuard, TokioScheduler,
};

/// Shop-floor terminal host for the Bakehouse session guard
#[derive(Debug, Parser)]
#[command(name = "bakehouse-terminal", version, about, long_about = None)]
struct Args {
    /// Configuration overlay to load (config/{env}.toml)
    #[arg(short, long, env = ENV_VAR, default_value = "development")]
    env: String,

    /// Bearer token of the terminal's auth session
    #[arg(short, long, env = "BAKEHOUSE_TERMINAL_TOKEN", hide_env_values = true)]
    token: Option<String>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let config = match AppConfig::load(&args.env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config.logging);

    if let Err(e) = run(config, args.token).await {
        tracing::error!(error = %e, "Terminal error");
        std::process::exit(1);
    }
}

async fn run(config: AppConfig, token: Option<String>) -> Result<(), AppError> {
    let store = build_store(&config, token).await?;
    let (navigator, mut redirects) = ChannelNavigator::new();

    let guard = SessionGuard::new(
        store,
        Arc::new(navigator),
        Arc::new(TokioScheduler::new()),
        GuardConfig::from(&config.session),
    );
    guard.start();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            redirect = redirects.recv() => {
                if let Some(redirect) = redirect {
                    println!("{redirect}");
                }
                break;
            }
            line = lines.next_line() => {
                match line? {
                    Some(line) => {
                        let name = line.trim();
                        if name.is_empty() {
                            guard.record_activity(ActivityKind::KeyPress);
                        } else if ActivityKind::from_event_name(name).is_none() {
                            tracing::debug!(event = name, "Ignoring non-activity input");
                        } else {
                            guard.record_event(name);
                        }
                    }
                    None => {
                        tracing::info!("Input closed");
                        break;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted");
                break;
            }
        }
    }

    guard.stop();
    Ok(())
}

async fn build_store(
    config: &AppConfig,
    token: Option<String>,
) -> Result<Arc<dyn SessionStore>, AppError> {
    let Some(token) = token else {
        let user_id = UserId::new();
        tracing::warn!(
            user_id = %user_id,
            "No terminal token, running against an in-memory session store"
        );
        return Ok(Arc::new(MemorySessionStore::signed_in(user_id)));
    };

    let db = DatabasePool::connect(&config.database).await?;
    let pool = db.into_pool();
    let store = DatabaseSessionStore::new(
        Arc::new(AuthSessionRepository::new(pool.clone())),
        Arc::new(ProfileRepository::new(pool.clone())),
        Arc::new(LivenessRepository::new(pool)),
    )
    .with_token(token);

    if store.current_session().await?.is_none() {
        return Err(AppError::unauthorized(
            "Terminal token does not belong to an active session",
        ));
    }
    Ok(Arc::new(store))
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_args_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_token_flag() {
        let args = Args::try_parse_from(["bakehouse-terminal", "--env", "test", "-t", "abc123"])
            .expect("should parse");
        assert_eq!(args.env, "test");
        assert_eq!(args.token.as_deref(), Some("abc123"));
    }
}
