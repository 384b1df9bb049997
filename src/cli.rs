//! Interface de linha de comando do ringback baseada em clap.
//!
//! Define a struct [`Cli`] com subcomandos [`Command`] (serve, demo, render)
//! e flags globais (--config, --verbose).

use clap::{Parser, Subcommand, ValueEnum};

use crate::twiml::EntryPoint;

/// ringback — URA de retorno de ligação para chamadas não atendidas.
#[derive(Debug, Parser)]
#[command(name = "ringback", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Caminho do arquivo de configuração.
    #[arg(long, global = true, default_value = crate::config::DEFAULT_CONFIG_PATH)]
    pub config: String,

    /// Habilita saída detalhada (verbose).
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

/// Entry point aceito pela CLI, mapeado para [`EntryPoint`] internamente.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EntryArg {
    Incoming,
    DialOutcome,
    MenuChoice,
    CapturePhoneNumber,
    FinishCall,
    CaptureTranscript,
}

impl From<EntryArg> for EntryPoint {
    fn from(arg: EntryArg) -> Self {
        match arg {
            EntryArg::Incoming => EntryPoint::Incoming,
            EntryArg::DialOutcome => EntryPoint::DialOutcome,
            EntryArg::MenuChoice => EntryPoint::MenuChoice,
            EntryArg::CapturePhoneNumber => EntryPoint::CapturePhoneNumber,
            EntryArg::FinishCall => EntryPoint::FinishCall,
            EntryArg::CaptureTranscript => EntryPoint::CaptureTranscript,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sobe o servidor de webhooks de voz.
    Serve {
        /// Endereço de escuta (sobrepõe `bind_addr` do arquivo).
        #[arg(long)]
        bind: Option<String>,
    },

    /// Executa a demonstração embutida do fluxo de chamada perdida.
    Demo,

    /// Imprime o TwiML que um único webhook retornaria.
    Render {
        /// Entry point a renderizar.
        entry: EntryArg,

        /// Dígitos digitados pelo chamador.
        #[arg(long, default_value = "")]
        digits: String,

        /// Resultado da discagem informado pelo provedor.
        #[arg(long, default_value = "")]
        dial_status: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses_serve_subcommand() {
        let cli = Cli::parse_from(["ringback", "serve", "--bind", "127.0.0.1:9000"]);
        match cli.command {
            Command::Serve { bind } => assert_eq!(bind.as_deref(), Some("127.0.0.1:9000")),
            _ => panic!("expected Serve command"),
        }
        assert_eq!(cli.config, "ringback.toml");
    }

    #[test]
    fn cli_parses_global_flags() {
        let cli = Cli::parse_from(["ringback", "--config", "prod.toml", "--verbose", "demo"]);
        assert!(cli.verbose);
        assert_eq!(cli.config, "prod.toml");
        assert!(matches!(cli.command, Command::Demo));
    }

    #[test]
    fn cli_parses_render_subcommand() {
        let cli = Cli::parse_from([
            "ringback",
            "render",
            "capture-phone-number",
            "--digits",
            "555",
        ]);
        match cli.command {
            Command::Render {
                entry,
                digits,
                dial_status,
            } => {
                assert_eq!(EntryPoint::from(entry), EntryPoint::CapturePhoneNumber);
                assert_eq!(digits, "555");
                assert!(dial_status.is_empty());
            }
            _ => panic!("expected Render command"),
        }
    }

    #[test]
    fn cli_verify() {
        Cli::command().debug_assert();
    }
}
