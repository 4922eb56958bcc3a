use housing_regression::config::PipelineConfig;
use housing_regression::controller::{Controller, Outcome};
use housing_regression::session::Session;
use housing_regression::viz::{LogVisualizer, Visor};
use housing_regression::CpuBackend;
use log::{error, info};
use std::io::{self, BufRead, Write};
use std::process::ExitCode;

fn run() -> housing_regression::Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => {
            info!("reading configuration from {}", path);
            PipelineConfig::from_file(path)?
        }
        None => PipelineConfig::default(),
    }
    .with_env_overrides()?;

    let session = Session::<CpuBackend>::prepare(config)?;
    let mut controller = Controller::new(session, Visor::new(LogVisualizer, false));
    println!("{}", controller.status());
    println!("Type `help` for commands.");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        match controller.execute(line.trim()) {
            Ok(Outcome::Quit) => break,
            Ok(Outcome::Message(msg)) if msg.is_empty() => {}
            Ok(Outcome::Message(msg)) => println!("{}", msg),
            Err(e) => println!("error: {}", e),
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
