use clap::Parser;

use crate::config::AppConfig;

#[derive(Debug, Parser)]
#[command(name = "oneservice")]
#[command(about = "Serve configured profiles as a GraphQL API")]
#[command(version)]
pub struct Cli {
    /// Configuration file (defaults to ONESERVICE_CONFIG, then oneservice.toml)
    #[arg(short, long)]
    pub config: Option<String>,

    /// The hostname to be used. Defaults to `localhost`
    #[arg(short = 'n', long)]
    pub host: Option<String>,

    /// The port to be used. Defaults to 8000
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Allow graphical interactive in-browser GraphQL IDE
    #[arg(long)]
    pub graphiql: bool,

    /// Print the generated schema in SDL and exit
    #[arg(long)]
    pub print_schema: bool,
}

impl Cli {
    /// Flags win over file and environment values.
    pub fn apply_overrides(&self, cfg: &mut AppConfig) {
        if let Some(host) = &self.host {
            cfg.server.host = host.clone();
        }
        if let Some(port) = self.port {
            cfg.server.port = port;
        }
        if self.graphiql {
            cfg.graphql.graphiql = true;
        }
    }
}
