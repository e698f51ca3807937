use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::domain::{AgentType, CodingMode};

/// Agent Studio - build, manage and chat with no-code agents
#[derive(Parser, Debug, Clone)]
#[command(name = "agent-studio", version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true, env = "STUDIO_CONFIG", default_value = "studio.toml")]
    pub config: PathBuf,

    /// Base URL of the agent service
    #[arg(long, global = true, env = "STUDIO_API_URL")]
    pub api_url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "STUDIO_LOG_LEVEL")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Manage agents
    #[command(subcommand)]
    Agents(AgentsCommand),

    /// Manage the tools available to tool-calling agents
    #[command(subcommand)]
    Tools(ToolsCommand),

    /// Chat with an agent interactively
    Chat(ChatArgs),

    /// Serve the browser UI
    Serve(ServeArgs),
}

#[derive(Subcommand, Debug, Clone)]
pub enum AgentsCommand {
    /// List all agents
    List,

    /// Create an agent
    Create {
        #[arg(long)]
        name: String,

        /// conversational, rag, tool_calling or coding
        #[arg(long = "type", value_parser = parse_agent_type)]
        kind: AgentType,

        /// Prompt template for conversational agents, must contain {input}
        #[arg(long)]
        prompt_template: Option<String>,

        /// Tool to give a tool-calling agent; repeat for several
        #[arg(long = "tool")]
        tools: Vec<String>,
    },

    /// Send a single message through the interact endpoint
    Ask { id: i64, message: String },

    /// Delete an agent
    Delete { id: i64 },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ToolsCommand {
    /// List all tools
    List,

    /// Show one tool, including its code
    Get { name: String },

    /// Create a tool from a description; the service writes the code
    Create {
        description: String,

        /// File with code to use instead of generated code
        #[arg(long)]
        code_file: Option<PathBuf>,
    },

    /// Create a tool from a Python source file
    CreateFromCode {
        name: String,
        code_file: PathBuf,
    },

    /// Delete a tool
    Delete { name: String },

    /// Run a tool with JSON parameters
    Exec {
        name: String,

        /// Parameters as a JSON object
        #[arg(long, default_value = "{}")]
        params: String,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ChatArgs {
    /// Id of the agent to chat with
    pub agent_id: i64,

    /// Coding mode for coding agents
    #[arg(long, value_parser = parse_coding_mode)]
    pub mode: Option<CodingMode>,

    /// Language for coding agents
    #[arg(long)]
    pub language: Option<String>,

    /// Document to upload before chatting (rag agents)
    #[arg(long)]
    pub document: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Server host address
    #[arg(long, env = "STUDIO_HOST")]
    pub host: Option<String>,

    /// Server port
    #[arg(long, env = "STUDIO_PORT")]
    pub port: Option<u16>,

    /// Serve the UI from this directory instead of the embedded bundle
    #[arg(long)]
    pub ui_dir: Option<PathBuf>,
}

fn parse_agent_type(s: &str) -> Result<AgentType, String> {
    s.parse::<AgentType>().map_err(|e| e.to_string())
}

fn parse_coding_mode(s: &str) -> Result<CodingMode, String> {
    s.parse()
}

impl Cli {
    /// Serve arguments, when the serve command was given
    pub fn serve_args(&self) -> Option<&ServeArgs> {
        match &self.command {
            Command::Serve(args) => Some(args),
            _ => None,
        }
    }
}
