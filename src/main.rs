use clap::Parser;
use intake::adapters::form_api::FormApiState;
use intake::adapters::form_client::FormApiClient;
use intake::adapters::health_handler::HealthHandler;
use intake::adapters::schema_loader::SchemaLoader;
use intake::adapters::submission_store::SubmissionStore;
use intake::cli::{Cli, Command};
use intake::config::Settings;
use intake::form::{IntakePage, PageView, SubmitError, SubmitOutcome};
use intake::render::{field_prompt, parse_answer, render, Answer};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};
use tokio::sync::RwLock;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so rendered forms stay readable on stdout
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = Settings::new_with_cli(&cli)?;

    match cli.command() {
        Command::Serve => serve(settings).await,
        Command::Show { form_id } => show(&settings, &form_id).await,
        Command::Fill {
            form_id,
            values,
            no_input,
        } => fill(&settings, form_id, values, no_input).await,
    }
}

async fn serve(settings: Settings) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port).parse()?;
    info!("Serving {} form(s) on {}", settings.forms.len(), addr);

    let settings = Arc::new(RwLock::new(settings));
    let health_handler = Arc::new(HealthHandler::new(settings.clone()));
    let state = FormApiState {
        settings,
        submissions: SubmissionStore::new(),
    };

    let app = intake::create_app(state, health_handler);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn show(settings: &Settings, form_id: &str) -> anyhow::Result<()> {
    let client = Arc::new(FormApiClient::new(settings.api_base_url()?));
    let loader = SchemaLoader::new(client);

    match loader.load(Some(form_id)).await? {
        Some(schema) => println!("{}", serde_json::to_string_pretty(schema.as_ref())?),
        None => println!("{}", render(&PageView::Loading)),
    }
    Ok(())
}

async fn fill(
    settings: &Settings,
    form_id: String,
    values: Vec<(String, String)>,
    no_input: bool,
) -> anyhow::Result<()> {
    let client = Arc::new(FormApiClient::new(settings.api_base_url()?));
    let loader = Arc::new(SchemaLoader::new(client.clone()));
    let mut page = IntakePage::new(loader, client, Some(form_id));

    print!("{}", render(&page.view().await));
    page.load().await;
    if let Some(e) = page.load_error() {
        print!("{}", render(&page.view().await));
        return Err(anyhow::anyhow!(e.clone()));
    }

    for (key, value) in values {
        page.set_field(key, value).await?;
    }

    if no_input {
        let outcome = page.submit().await;
        print!("{}", render(&page.view().await));
        return outcome.map(|_| ()).map_err(Into::into);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut only_invalid = false;
    loop {
        prompt_fields(&page, &mut lines, only_invalid).await?;

        match page.submit().await {
            Ok(SubmitOutcome::Submitted) | Ok(SubmitOutcome::Discarded) => {
                print!("{}", render(&page.view().await));
                return Ok(());
            }
            Err(SubmitError::Invalid(_)) => {
                print!("\n{}", render(&page.view().await));
                only_invalid = true;
            }
            Err(SubmitError::SubmissionFailed(reason)) => {
                warn!("Submission failed: {}", reason);
                println!("\nSubmission failed ({}). Your answers were kept.", reason);
                if !confirm(&mut lines, "Try again? [Y/n] ").await? {
                    return Err(anyhow::anyhow!("Submission abandoned"));
                }
                only_invalid = true;
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// Prompts for each field in registry order. Empty input keeps the current
/// value and `-` clears it.
async fn prompt_fields(
    page: &IntakePage,
    lines: &mut Lines<BufReader<Stdin>>,
    only_invalid: bool,
) -> anyhow::Result<()> {
    let PageView::Form(form) = page.view().await else {
        return Ok(());
    };

    let mut stdout = tokio::io::stdout();
    for field in form.fields {
        if only_invalid && field.error.is_none() {
            continue;
        }
        stdout.write_all(field_prompt(&field).as_bytes()).await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            return Err(anyhow::anyhow!("Input closed before the form was complete"));
        };
        if let Answer::Replace(value) = parse_answer(&line) {
            page.set_field(field.key, value).await?;
        }
    }
    Ok(())
}

async fn confirm(lines: &mut Lines<BufReader<Stdin>>, question: &str) -> anyhow::Result<bool> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(question.as_bytes()).await?;
    stdout.flush().await?;

    let answer = lines.next_line().await?.unwrap_or_default();
    Ok(!matches!(answer.trim().to_lowercase().as_str(), "n" | "no" | "q"))
}
