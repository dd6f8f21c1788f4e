/**
 * XFDocs Terminal Editor
 *
 * Line-oriented editor over the documents API. Every stdin line is appended
 * to the document as a paragraph and auto-saved; `:w` saves now, `:status`
 * prints the save state and `:q` saves and exits.
 *
 * Usage: xfdocs-editor [--doc <uuid>] [--title <title>]
 */
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use xfdocs::editor::{Config, DocumentsClient, EditorSession};
use xfdocs::shared::{DocumentId, EditableDocument};

#[derive(Debug, Default)]
struct Args {
    doc: Option<DocumentId>,
    title: Option<String>,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args::default();
    let mut raw = std::env::args().skip(1);
    while let Some(flag) = raw.next() {
        match flag.as_str() {
            "--doc" => {
                let value = raw.next().ok_or("--doc needs a document id")?;
                let id = value
                    .parse()
                    .map_err(|e| format!("invalid document id {:?}: {}", value, e))?;
                args.doc = Some(id);
            }
            "--title" => args.title = Some(raw.next().ok_or("--title needs a value")?),
            other => return Err(format!("unknown argument: {}", other)),
        }
    }
    Ok(args)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&env_filter))
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args()?;
    let config = Config::load()?;
    let settings = config.autosave();
    tracing::info!(
        server = config.server_url(),
        debounce_ms = settings.debounce.as_millis() as u64,
        "starting editor"
    );

    let mut client = DocumentsClient::new(config);
    if let Some(title) = &args.title {
        client = client.with_draft_title(title);
    }

    let document = match args.doc {
        Some(id) => EditableDocument::from(client.fetch(id).await?),
        None => {
            let title = args.title.clone().unwrap_or_else(|| "Untitled".to_string());
            EditableDocument::draft(title)
        }
    };
    println!("{}", document.content);

    let mut session = EditorSession::mount(document, client, settings);

    let mut events = session.subscribe_events();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => eprintln!("[{}]", event.toast_text()),
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            ":q" => break,
            ":w" => {
                let outcome = session.save_now().await?;
                tracing::debug!(?outcome, "manual save requested");
            }
            ":status" => println!("{}", session.state().status_line()),
            _ => {
                let content = format!("{}<p>{}</p>", session.content(), line);
                session.edit(content)?;
            }
        }
    }

    let target = session.target();
    if let Err(e) = session.close().await {
        tracing::error!(document = %target, error = %e, "unsaved changes left behind");
        return Err(e.into());
    }
    Ok(())
}
