use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Message to send as a one-shot query; omit to start an interactive chat
    pub query: Option<String>,

    /// Model to chat with [possible values: gpt-3.5-turbo, gemini-1.5-pro]
    #[arg(short, long)]
    pub model: Option<String>,
}
