//! Command implementations over the session manager and controllers.

use std::io::{BufRead, Write};
use std::sync::Arc;
use std::time::Duration;

use minerva_api::{
    ConversationController, ConverseMode, GatewayConfig, HttpGateway, RejectReason,
    SessionManager, SubmitOptions, SubmitOutcome,
};
use minerva_config::MinervaConfig;
use minerva_platform::FileSessionStore;

fn build_gateway(config: &MinervaConfig) -> Arc<HttpGateway> {
    Arc::new(HttpGateway::new(
        GatewayConfig::new(&config.server.base_url)
            .with_connect_timeout(Duration::from_secs(config.server.connect_timeout_secs))
            .with_request_timeout(Duration::from_secs(config.server.request_timeout_secs)),
    ))
}

fn build_session_manager(
    gateway: Arc<HttpGateway>,
    config: &MinervaConfig,
) -> Arc<SessionManager> {
    Arc::new(
        SessionManager::new(gateway, Box::new(FileSessionStore::at_default_path()))
            .with_ttl(config.session.ttl_secs),
    )
}

pub async fn login(config: &MinervaConfig, username: &str) -> i32 {
    let password = match prompt_password() {
        Some(p) => p,
        None => {
            eprintln!("no password given");
            return 1;
        }
    };

    let manager = build_session_manager(build_gateway(config), config);
    match manager.login(username, &password).await {
        Ok(session) => {
            let role = if session.is_admin { "admin" } else { "user" };
            println!("logged in as {} ({role})", session.username);
            0
        }
        Err(e) => {
            eprintln!("login failed: {e}");
            1
        }
    }
}

pub fn logout(config: &MinervaConfig) -> i32 {
    build_session_manager(build_gateway(config), config).logout();
    println!("logged out");
    0
}

pub fn whoami(config: &MinervaConfig) -> i32 {
    let manager = build_session_manager(build_gateway(config), config);
    if !manager.check_auth() {
        println!("not logged in");
        return 1;
    }
    if let Some(session) = manager.current_session() {
        let role = if session.is_admin { "admin" } else { "user" };
        println!(
            "{} ({role}), session expires at {}",
            session.username,
            session.expires_at()
        );
    }
    0
}

/// Interactive turn-taking loop shared by the chat and question screens.
pub async fn converse(
    config: &MinervaConfig,
    project: &str,
    mode: ConverseMode,
    options: SubmitOptions,
) -> i32 {
    let gateway = build_gateway(config);
    let manager = build_session_manager(gateway.clone(), config);
    if !manager.check_auth() {
        eprintln!("not logged in (run `minerva login <username>`)");
        return 1;
    }

    let controller = ConversationController::new(gateway, manager, project, mode)
        .with_timeout(Duration::from_secs(config.server.request_timeout_secs));

    let prompt = match mode {
        ConverseMode::Chat => "message",
        ConverseMode::Question => "question",
    };
    println!(
        "{} thread on project '{project}' (Ctrl-D to exit)",
        mode.endpoint()
    );

    let stdin = std::io::stdin();
    loop {
        print!("{prompt}> ");
        let _ = std::io::stdout().flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                eprintln!("read error: {e}");
                break;
            }
        }

        match controller.submit(line.trim(), options.clone()).await {
            SubmitOutcome::Resolved(answer) => println!("{answer}\n"),
            SubmitOutcome::Failed => {
                // The terminal turn already carries the placeholder answer
                if let Some(turn) = controller.turns().last() {
                    println!("{}\n", turn.response_text.as_deref().unwrap_or_default());
                }
            }
            SubmitOutcome::Rejected(RejectReason::EmptyInput) => {}
            SubmitOutcome::Rejected(RejectReason::Busy) => {
                eprintln!("previous turn still in flight");
            }
            SubmitOutcome::Rejected(RejectReason::NotAuthenticated) => {
                eprintln!("session expired, log in again");
                return 1;
            }
        }
    }

    for entry in controller.errors() {
        eprintln!("[{}] {}: {}", entry.at, entry.origin, entry.error);
    }
    0
}

fn prompt_password() -> Option<String> {
    print!("password: ");
    let _ = std::io::stdout().flush();
    let mut password = String::new();
    std::io::stdin().read_line(&mut password).ok()?;
    let password = password.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        None
    } else {
        Some(password)
    }
}
