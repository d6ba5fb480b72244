use log::LevelFilter;
use std::env;
use std::path::Path;
use std::process::ExitCode;

mod config;
mod convert;
mod map;
mod parsing;

fn main() -> ExitCode {
    env_logger::Builder::from_default_env()
        .filter_level(LevelFilter::Info)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("usage: windconv <root directory>");
        return ExitCode::FAILURE;
    }

    convert::convert_all(Path::new(&args[1]));
    ExitCode::SUCCESS
}
