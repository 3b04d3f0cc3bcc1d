//! Command-line arguments.
//!
//! Every flag falls back to the environment variable that
//! [`Config::from_env`](crate::config::Config::from_env) reads, so flags only
//! need to be given to override it.

use std::time::Duration;

use clap::Parser;

use crate::config::Config;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "ai-utility")]
#[command(version, about = "Web front end for Gemini chat, image captioning, embeddings and Q&A")]
pub struct Cli {
    /// Address to bind the web server to
    #[arg(long, env = "GATEWAY_HOST")]
    pub host: Option<String>,

    /// Port for the web server
    #[arg(short, long, env = "GATEWAY_PORT")]
    pub port: Option<u16>,

    /// Gemini model used for chat, captions and answers
    #[arg(long, env = "GEMINI_CHAT_MODEL")]
    pub chat_model: Option<String>,

    /// Gemini model used for embeddings
    #[arg(long, env = "GEMINI_EMBEDDING_MODEL")]
    pub embedding_model: Option<String>,

    /// Seconds a browser session may sit idle before it is dropped
    #[arg(long, env = "SESSION_IDLE_TIMEOUT_SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub session_idle_secs: Option<u64>,
}

impl Cli {
    /// Overlay the flags that were given onto `config`.
    pub fn apply(&self, config: &mut Config) {
        if let Some(host) = &self.host {
            config.gateway.host = host.clone();
        }
        if let Some(port) = self.port {
            config.gateway.port = port;
        }
        if let Some(model) = &self.chat_model {
            config.google.chat_model = model.clone();
        }
        if let Some(model) = &self.embedding_model {
            config.google.embedding_model = model.clone();
        }
        if let Some(secs) = self.session_idle_secs {
            config.session.idle_timeout = Duration::from_secs(secs);
        }
    }
}
