mod commands;
mod terminal;

use std::process::ExitCode;

use anyhow::Context;
use commands::CommandLine;
use lomap_core::Hosts;
use terminal::{logging, print};

fn main() -> ExitCode {
    let cmd = CommandLine::parse_args();
    logging::init(cmd.verbose);

    match run(&cmd) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            print::failure(&err);
            ExitCode::FAILURE
        }
    }
}

fn run(cmd: &CommandLine) -> anyhow::Result<()> {
    let mut hosts = Hosts::new(cmd.config());

    let text = commands::execute(cmd, &mut hosts)?;
    print::output(&text, cmd.no_newline).context("writing result")?;

    Ok(())
}
