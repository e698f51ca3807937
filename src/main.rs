use agent_studio::cli::{AgentsCommand, ChatArgs, Cli, Command, ToolsCommand};
use agent_studio::client::{AgentApi, HttpApiClient};
use agent_studio::config::validator::ConfigValidator;
use agent_studio::config::Settings;
use agent_studio::controller::runner::Runner;
use agent_studio::controller::{Action, Screen};
use agent_studio::domain::{
    AgentType, CodingMode, CreateToolFromCodeRequest, CreateToolRequest, DocumentFile, Message,
    Role,
};
use anyhow::{bail, Context};
use clap::Parser;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let settings = Settings::new_with_cli(&cli)?;

    // Initialize tracing; stdout is kept for command output
    let level = settings
        .logging
        .level
        .parse::<tracing::Level>()
        .unwrap_or(tracing::Level::INFO);
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    if let Err(errors) = ConfigValidator::validate(&settings) {
        for e in &errors {
            error!("{}", e);
        }
        bail!("Invalid configuration ({} errors)", errors.len());
    }

    let client = Arc::new(HttpApiClient::new(settings.api.base_url.clone()));

    match cli.command {
        Command::Agents(command) => run_agents(client, command).await,
        Command::Tools(command) => run_tools(client.as_ref(), command).await,
        Command::Chat(args) => run_chat(client, args).await,
        Command::Serve(_) => serve(&settings).await,
    }
}

async fn run_agents(client: Arc<HttpApiClient>, command: AgentsCommand) -> anyhow::Result<()> {
    match command {
        AgentsCommand::List => {
            for agent in client.list_agents().await? {
                println!(
                    "{}\t{}\t{}\t{}",
                    agent.id, agent.kind, agent.status, agent.name
                );
            }
        }
        AgentsCommand::Create {
            name,
            kind,
            prompt_template,
            tools,
        } => {
            // Same path as the creation form: draft, tool selection, submit
            let mut runner = Runner::new(client);
            runner.run(Action::Mount).await;
            if let Some(message) = &runner.state().error {
                warn!("Agent list unavailable: {}", message);
            }
            match runner.create_agent(name, kind, prompt_template, &tools).await {
                Ok(agent) => println!("Created agent {} ({})", agent.id, agent.name),
                Err(message) => bail!("{}", message),
            }
        }
        AgentsCommand::Ask { id, message } => {
            let response = client.interact_with_agent(id, &message).await?;
            print_message(&Message::from_response(&response));
        }
        AgentsCommand::Delete { id } => {
            let result = client.delete_agent(id).await?;
            info!("Deleted agent {}", id);
            if !result.is_null() {
                println!("{}", serde_json::to_string_pretty(&result)?);
            }
        }
    }
    Ok(())
}

async fn run_tools(client: &HttpApiClient, command: ToolsCommand) -> anyhow::Result<()> {
    match command {
        ToolsCommand::List => {
            for tool in client.list_tools().await? {
                let sample = if tool.is_sample { " (sample)" } else { "" };
                println!("{}{}\t{}", tool.name, sample, tool.description);
            }
        }
        ToolsCommand::Get { name } => {
            let tool = client.get_tool(&name).await?;
            println!("{}", serde_json::to_string_pretty(&tool)?);
        }
        ToolsCommand::Create {
            description,
            code_file,
        } => {
            let code = match code_file {
                Some(path) => Some(read_text(&path).await?),
                None => None,
            };
            let request = CreateToolRequest {
                code,
                ..CreateToolRequest::from_description(description)
            };
            let tool = client.create_tool(&request).await?;
            println!("Created tool '{}'", tool.name);
        }
        ToolsCommand::CreateFromCode { name, code_file } => {
            let code = read_text(&code_file).await?;
            let tool = client
                .create_tool_from_code(&CreateToolFromCodeRequest::new(name, code))
                .await?;
            println!("Created tool '{}'", tool.name);
        }
        ToolsCommand::Delete { name } => {
            client.delete_tool(&name).await?;
            println!("Deleted tool '{}'", name);
        }
        ToolsCommand::Exec { name, params } => {
            let parameters: serde_json::Value =
                serde_json::from_str(&params).context("--params must be a JSON object")?;
            if !parameters.is_object() {
                bail!("--params must be a JSON object");
            }
            let result = client.execute_tool(&name, parameters).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }
    Ok(())
}

async fn run_chat(client: Arc<HttpApiClient>, args: ChatArgs) -> anyhow::Result<()> {
    let mut runner = Runner::new(client);
    runner.run(Action::Mount).await;
    if let Some(message) = runner.state().error.clone() {
        bail!("{}", message);
    }
    runner.dispatch(Action::SelectAgent(args.agent_id));
    if let Some(message) = runner.state().error.clone() {
        bail!("{}", message);
    }
    if let Some(mode) = args.mode {
        runner.dispatch(Action::SetCodingMode(mode));
    }
    if let Some(language) = args.language {
        runner.dispatch(Action::SetLanguage(language));
    }

    if let Some(session) = runner.state().session() {
        println!("Chatting with {} ({})", session.agent.name, session.agent.kind.info().name);
    }
    if let Some(path) = args.document {
        upload(&mut runner, &path).await?;
    }
    print_help(&runner);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(command) = line.strip_prefix('/') {
            let (name, arg) = command.split_once(' ').unwrap_or((command, ""));
            let arg = arg.trim();
            match name {
                "quit" | "exit" => break,
                "help" => print_help(&runner),
                "mode" => match arg.parse::<CodingMode>() {
                    Ok(mode) => {
                        runner.dispatch(Action::SetCodingMode(mode));
                        println!("Mode: {}", mode.label());
                    }
                    Err(e) => eprintln!("{}", e),
                },
                "lang" if !arg.is_empty() => {
                    runner.dispatch(Action::SetLanguage(arg.to_string()));
                    println!("Language: {}", arg);
                }
                "upload" if !arg.is_empty() => {
                    if let Err(e) = upload(&mut runner, Path::new(arg)).await {
                        eprintln!("{}", e);
                    }
                }
                _ => eprintln!("Unknown command '/{}', try /help", command),
            }
            continue;
        }

        if matches!(runner.state().screen, Screen::AwaitingDocument(_)) {
            eprintln!("Upload a document first with /upload <path>");
            continue;
        }
        let shown = message_count(&runner);
        runner.dispatch(Action::EditInput(line.to_string()));
        runner.dispatch(Action::SendMessage);
        if let Some(session) = runner.state().session().filter(|s| s.is_sending()) {
            eprintln!("{}", session.loading_message());
        }
        runner.settle().await;
        print_replies(&runner, shown);
        report_error(&mut runner);
    }
    Ok(())
}

async fn upload(runner: &mut Runner, path: &Path) -> anyhow::Result<()> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    eprintln!("Processing {}...", name);
    runner
        .run(Action::UploadDocument(DocumentFile::new(name, bytes)))
        .await;
    if let Some(message) = runner.state().error.clone() {
        runner.dispatch(Action::DismissError);
        bail!("{}", message);
    }
    print_replies(runner, 0);
    Ok(())
}

fn message_count(runner: &Runner) -> usize {
    runner.state().session().map(|s| s.messages.len()).unwrap_or(0)
}

fn print_replies(runner: &Runner, from: usize) {
    let Some(session) = runner.state().session() else {
        return;
    };
    for message in session.messages.iter().skip(from) {
        if message.role == Role::Assistant {
            print_message(message);
        }
    }
}

fn print_message(message: &Message) {
    println!("\n{}\n", message.content);
    if let Some(code) = &message.code {
        let language = message.language.as_deref().unwrap_or("");
        for block in code {
            println!("```{}\n{}\n```", language, block.trim_end());
        }
    }
}

fn report_error(runner: &mut Runner) {
    if let Some(message) = runner.state().error.clone() {
        eprintln!("Error: {}", message);
        runner.dispatch(Action::DismissError);
    }
}

fn print_help(runner: &Runner) {
    let Some(session) = runner.state().session() else {
        return;
    };
    let mut commands = vec!["/quit"];
    if session.is_coding() {
        commands.extend(["/mode <generate|troubleshoot|explain>", "/lang <language>"]);
    }
    if session.agent.kind == AgentType::Rag {
        commands.push("/upload <path>");
    }
    eprintln!("Commands: {}", commands.join(", "));
    if session.needs_document() {
        eprintln!("Upload a document to start chatting.");
    } else {
        eprintln!("{}", session.placeholder());
    }
}

async fn read_text(path: &Path) -> anyhow::Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))
}

async fn serve(settings: &Settings) -> anyhow::Result<()> {
    let app = agent_studio::create_app(settings);

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port).parse()?;
    info!(
        "Serving Agent Studio on http://{} (agent service at {})",
        addr, settings.api.base_url
    );
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
