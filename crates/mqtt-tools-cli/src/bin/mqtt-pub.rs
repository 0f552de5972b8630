//! # mqtt-pub
//!
//! Publish one message per argument (or standard input) to a subject.
//!
//! ```text
//! mqtt-pub -s tcp://localhost:1883 greet hello hex:00ff @payload.bin
//! ```

use anyhow::Result;
use mqtt_tools_cli::publish::run_publish;
use mqtt_tools_cli::{logging, parse_args, Invocation, Options, Settings, Tool};
use mqtt_tools_client::Connection;
use std::process::ExitCode;

const TOOL: Tool = Tool::Publisher;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    logging::init();

    let options = match parse_args(TOOL, std::env::args().skip(1)) {
        Ok(Invocation::Run(options)) => options,
        Ok(Invocation::Help) => {
            eprint!("{}", TOOL.usage());
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            eprintln!("{err}");
            eprint!("{}", TOOL.usage());
            return ExitCode::FAILURE;
        }
    };

    match run(options).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(options: Options) -> Result<()> {
    let settings = Settings::from_env().with_flags(&options);
    let config = settings.broker_config(TOOL)?;
    let mut connection = Connection::connect(&config).await?;

    let result = run_publish(
        &mut connection,
        &options.subject,
        &options.messages,
        std::io::stdin().lock(),
    )
    .await;

    connection.close().await;
    result.map(|_| ())
}
