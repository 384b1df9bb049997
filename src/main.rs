mod cli;
mod config;
mod error;
mod flow;
mod logging;
mod server;
mod store;
mod twiml;
mod ui;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use cli::{Cli, Command};
use config::RingbackConfig;
use flow::{CallFlow, CallFlowEngine, CallbackForm};
use store::{LoggingStore, Store};
use twiml::EntryPoint;
use ui::StepPrinter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = RingbackConfig::load(&cli.config)?;
    logging::init(&config.log_level, config.log_json, cli.verbose);

    match cli.command {
        Command::Serve { bind } => {
            let bind_addr = bind.unwrap_or_else(|| config.bind_addr.clone());
            let store = Store::from_config(&config);
            info!(store = store.kind(), dial_client = %config.dial_client, "starting ringback");
            let engine = CallFlowEngine::new(CallFlow::new(config.dial_client.as_str()), store);
            server::serve(engine, &bind_addr).await?;
        }
        Command::Demo => run_demo(&config).await?,
        Command::Render {
            entry,
            digits,
            dial_status,
        } => {
            let form = CallbackForm {
                call_sid: "CA-render".to_string(),
                digits,
                dial_call_status: dial_status,
                ..Default::default()
            };
            let step = CallFlow::new(config.dial_client.as_str()).step(entry.into(), &form);
            println!("{}", twiml::render(&step.response)?);
        }
    }

    Ok(())
}

/// Walk one missed call from ring to transcript against the logging store.
async fn run_demo(config: &RingbackConfig) -> Result<()> {
    let engine = CallFlowEngine::new(CallFlow::new(config.dial_client.as_str()), LoggingStore);
    let printer = StepPrinter::default();
    let call_sid = format!("CA{}", uuid::Uuid::new_v4().simple());

    let script = [
        (EntryPoint::Incoming, CallbackForm::default()),
        (
            EntryPoint::DialOutcome,
            CallbackForm {
                dial_call_status: "no-answer".to_string(),
                ..Default::default()
            },
        ),
        (
            EntryPoint::MenuChoice,
            CallbackForm {
                digits: "7".to_string(),
                ..Default::default()
            },
        ),
        (
            EntryPoint::MenuChoice,
            CallbackForm {
                digits: "1".to_string(),
                ..Default::default()
            },
        ),
        (
            EntryPoint::CapturePhoneNumber,
            CallbackForm {
                digits: "555".to_string(),
                ..Default::default()
            },
        ),
        (
            EntryPoint::MenuChoice,
            CallbackForm {
                digits: "1".to_string(),
                ..Default::default()
            },
        ),
        (
            EntryPoint::CapturePhoneNumber,
            CallbackForm {
                digits: "5551234567".to_string(),
                ..Default::default()
            },
        ),
        (EntryPoint::FinishCall, CallbackForm::default()),
        (
            EntryPoint::CaptureTranscript,
            CallbackForm {
                transcription_text: "call me back please".to_string(),
                ..Default::default()
            },
        ),
    ];

    for (entry, form) in script {
        let form = CallbackForm {
            call_sid: call_sid.clone(),
            ..form
        };
        let (response, write) = engine.handle_detached(entry, &form);
        if let Some(write) = write {
            write.await?;
        }
        let xml = twiml::render(&response)?;
        let input = [
            form.dial_call_status.as_str(),
            form.digits.as_str(),
            form.transcription_text.as_str(),
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(", ");
        printer.step(entry, &input, &response, &xml);
    }

    Ok(())
}
