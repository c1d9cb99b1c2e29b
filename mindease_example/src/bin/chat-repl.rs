use std::io::Write;
use std::sync::Arc;

use anyhow::Result;
use futures::StreamExt;
use mindease_core::{
    AuthSession, ChatEngine, ChatError, CompletionGateway, ReplyStream, SortOrder,
    TranscriptPersister, DEFAULT_MODEL,
};
use mindease_persist::{MemoryStore, MongoPersistenceClient, ProfileStore, ProfileUpdate};
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "Commands: /retry  /reset  /history  /name <name>  /quit";

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    println!("MindEase - Terminal Companion");
    println!("=============================\n");

    let uid = std::env::var("MINDEASE_UID").unwrap_or_else(|_| "local-user".to_string());
    let email = std::env::var("MINDEASE_EMAIL").unwrap_or_else(|_| format!("{}@localhost", uid));

    // 1. Store
    let (profiles, persister): (Arc<dyn ProfileStore>, TranscriptPersister) =
        match std::env::var("MONGODB_URI") {
            Ok(uri) => {
                let database = std::env::var("MONGODB_DATABASE").unwrap_or_else(|_| "mindease".to_string());
                let client = Arc::new(MongoPersistenceClient::connect(&uri, &database).await?);
                client.ping().await?;
                println!("✓ Connected to MongoDB ({})", database);
                let profiles: Arc<dyn ProfileStore> = client.clone();
                (profiles, TranscriptPersister::new(client))
            }
            Err(_) => {
                println!("✓ Using in-memory store (set MONGODB_URI to keep history)");
                let store = Arc::new(MemoryStore::new());
                let profiles: Arc<dyn ProfileStore> = store.clone();
                (profiles, TranscriptPersister::new(store))
            }
        };

    // 2. Gateway
    let gateway = CompletionGateway::from_credential(
        std::env::var("GROQ_API_KEY").ok(),
        std::env::var("LLM_BASE_URL").ok(),
        std::env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
    )?;
    if !gateway.is_configured() {
        println!("! GROQ_API_KEY is not set – add it to your environment to chat.\n");
    }
    let engine = ChatEngine::new(gateway);

    // 3. Identity and conversation
    let mut auth = AuthSession::establish(profiles, &uid, &email).await?;
    println!("✓ Signed in as {}\n", auth.uid());
    println!("{}\n", HELP);

    let mut session = auth.open_conversation(persister.clone());
    if let Some(welcome) = session.current_turns().first() {
        println!("MindEase: {}\n", welcome.content);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("You: ");
        std::io::stdout().flush()?;

        let Some(raw) = lines.next_line().await? else {
            break;
        };
        let line = raw.trim();

        match line {
            "" => continue,
            "/quit" => break,
            "/reset" => {
                session.reset();
                println!("(conversation reset)\n");
                continue;
            }
            "/history" => {
                for entry in history_lines(&persister, auth.uid()).await {
                    println!("  {}", entry);
                }
                println!();
                continue;
            }
            _ => {}
        }

        if let Some(name) = line.strip_prefix("/name ") {
            println!("{}\n", rename(&mut auth, name).await);
            continue;
        }

        let profile = auth.projection();
        let reply = if line == "/retry" {
            engine.retry(&mut session, Some(&profile)).await
        } else {
            engine.reply(&mut session, Some(&profile), &raw).await
        };

        match reply {
            Ok(stream) => print_reply(stream).await?,
            Err(ChatError::NothingToRetry) => println!("(nothing to retry)\n"),
            Err(e) => println!("! {}\n", e),
        }
    }

    println!("Goodbye, {}.", auth.sign_out());
    Ok(())
}

/// Recent durable turns; a storage failure becomes a single notice line
async fn history_lines(persister: &TranscriptPersister, uid: &str) -> Vec<String> {
    match persister.history(uid, 20, SortOrder::Ascending).await {
        Ok(turns) => turns
            .iter()
            .map(|turn| {
                format!(
                    "[{}] {}: {}",
                    turn.created_at.format("%H:%M:%S"),
                    turn.role.as_str(),
                    turn.content
                )
            })
            .collect(),
        Err(e) => vec![format!("! could not load history: {}", e)],
    }
}

async fn rename(auth: &mut AuthSession, name: &str) -> String {
    let update = ProfileUpdate {
        name: Some(name.trim().to_string()),
        ..Default::default()
    };
    match auth.update_profile(update).await {
        Ok(_) => "(profile updated)".to_string(),
        Err(e) => format!("! could not update profile: {}", e),
    }
}

async fn print_reply(mut stream: ReplyStream<'_>) -> Result<()> {
    print!("MindEase: ");
    while let Some(fragment) = stream.next().await {
        match fragment {
            Ok(text) => {
                print!("{}", text);
                std::io::stdout().flush()?;
            }
            Err(e) => {
                println!("\n! {} (type /retry to try again)", e);
                break;
            }
        }
    }
    println!("\n");
    Ok(())
}
