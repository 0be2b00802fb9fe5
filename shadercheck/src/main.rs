use std::path::Path;

use clap::Parser;
use log::LevelFilter;

mod args;
mod check;
mod config;
mod context;

use args::Args;
use config::Config;
use context::HiddenContext;

fn main() {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = <Args as Parser>::parse();

    let config = match Config::load(&args.config_path) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Could not read config: {e}");
            std::process::exit(-1);
        }
    };

    for name in &args.only {
        if !config.programs.iter().any(|p| &p.name == name) {
            log::warn!("no program named {name:?} in {:?}", args.config_path);
        }
    }

    let base = args.config_path.parent().unwrap_or(Path::new("."));

    let _context = match HiddenContext::new(args.gl_major, args.gl_minor) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Could not create OpenGL context: {e}");
            std::process::exit(-1);
        }
    };

    let selected = config
        .programs
        .iter()
        .filter(|p| args.only.is_empty() || args.only.contains(&p.name))
        .collect::<Vec<_>>();

    let mut failed = 0;

    for entry in &selected {
        match check::check_program(base, entry) {
            Ok(()) => println!("{}: ok", entry.name),
            Err(e) => {
                eprintln!("{e}");
                failed += 1;
            }
        }
    }

    println!("{} checked, {failed} failed", selected.len());

    if failed > 0 {
        std::process::exit(1);
    }
}
