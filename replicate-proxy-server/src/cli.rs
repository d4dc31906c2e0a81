use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Parser)]
#[command(
    name = "replicate-proxy-server",
    about = "Replicate Proxy - forwards prediction requests to the Replicate API",
    version = env!("CARGO_PKG_VERSION"),
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(long, env = "HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Start the HTTP listener (default if no command specified)")]
    Serve {
        #[arg(long, env = "HOST", default_value = DEFAULT_HOST)]
        host: String,

        #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
        port: u16,
    },

    #[command(about = "Handle one trigger event and print the reply")]
    Invoke {
        #[arg(short, long, help = "Path to the event JSON (stdin when omitted)")]
        event: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_uses_top_level_port() {
        let cli = Cli::try_parse_from(["replicate-proxy-server", "--port", "9000"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.port, 9000);
    }

    #[test]
    fn test_invoke_with_event_file() {
        let cli =
            Cli::try_parse_from(["replicate-proxy-server", "invoke", "--event", "event.json"]).unwrap();
        match cli.command {
            Some(Commands::Invoke { event }) => assert_eq!(event, Some(PathBuf::from("event.json"))),
            _ => panic!("expected invoke"),
        }
    }
}
