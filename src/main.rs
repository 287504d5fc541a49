use std::env;
use std::process;

use log::{error, LevelFilter};
use simple_logger::SimpleLogger;

use scorebin::{Pipeline, PipelineConfig, Result};

fn run() -> Result<()> {
    let config = match env::args_os().nth(1) {
        Some(path) => PipelineConfig::from_json_path(path)?,
        None => PipelineConfig::default(),
    };

    let report = Pipeline::new(config)?.run()?;
    println!("{}", report);
    Ok(())
}

fn main() {
    if let Err(e) = SimpleLogger::new().with_level(LevelFilter::Info).init() {
        eprintln!("could not initialize logging: {}", e);
    }

    if let Err(e) = run() {
        error!("{}", e);
        eprintln!("error: {}", e);
        process::exit(1);
    }
}
