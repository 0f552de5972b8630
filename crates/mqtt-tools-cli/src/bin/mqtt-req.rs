//! # mqtt-req
//!
//! Send one request per argument (or standard input) and print each reply.
//!
//! ```text
//! mqtt-req -s tcp://localhost:1883 svc.echo ping
//! mqtt-req -o svc.thumbnail @image.png > thumb.png
//! ```

use anyhow::Result;
use mqtt_tools_cli::request::run_request;
use mqtt_tools_cli::{logging, parse_args, Invocation, Options, Settings, Tool};
use mqtt_tools_client::Connection;
use std::io;
use std::process::ExitCode;

const TOOL: Tool = Tool::Requester;

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

    let mut stdout = io::stdout().lock();
    let result = run_request(
        &mut connection,
        &options.subject,
        &options.messages,
        io::stdin().lock(),
        options.raw_output.then_some(&mut stdout),
    )
    .await;

    connection.close().await;
    result.map(|_| ())
}
