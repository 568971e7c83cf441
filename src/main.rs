mod cli;

use cli::CmdArgs;
use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::error::Error;
use std::path::Path;
use subnetcalc::output::Report;
use subnetcalc::processing::{generate_unique_local, parse_request};

const DEFAULT_LOG_CONFIG: &str = "log4rs.yml";

fn main() {
    // Do as little as possible in main.rs as it can't contain any tests
    dotenv::dotenv().ok();
    init_logging();
    log::info!("#Start main()");

    let args = match CmdArgs::parse_from_env() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            std::process::exit(cli::exit_code(&e));
        }
    };
    if let Err(e) = run(&args) {
        log::debug!("run failed: {e:?}");
        eprintln!("ERROR: {e}!");
        std::process::exit(1);
    }
}

fn run(args: &CmdArgs) -> Result<(), Box<dyn Error>> {
    let mut request = parse_request(&args.address, args.mask.as_deref())?;
    if let Some(source) = args.random_source() {
        if !args.json {
            println!("Generating Unique Local IPv6 address (using {source}) ...");
        }
        request.address.value = generate_unique_local(&request.address.value, source)?;
    }
    let report = Report::new(&request)?;

    if args.json {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", report.render_text(&args.render_options()));
    }
    Ok(())
}

/// log4rs from `SUBNETCALC_LOG_CONFIG` or `log4rs.yml`, else warnings to stderr.
fn init_logging() {
    let path = std::env::var("SUBNETCALC_LOG_CONFIG").unwrap_or_else(|_| DEFAULT_LOG_CONFIG.into());
    if Path::new(&path).exists() {
        match log4rs::init_file(&path, Default::default()) {
            Ok(()) => return,
            Err(e) => eprintln!("WARNING: ignoring {path}: {e}"),
        }
    }

    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("{l} {t} - {m}{n}")))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(LevelFilter::Warn));
    match config {
        Ok(config) => {
            if let Err(e) = log4rs::init_config(config) {
                eprintln!("WARNING: logging disabled: {e}");
            }
        }
        Err(e) => eprintln!("WARNING: logging disabled: {e}"),
    }
}
