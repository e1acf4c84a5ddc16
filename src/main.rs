use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config as LogConfig, Root};
use std::error::Error;
use student_ip_registry::cli::{parse_args, run_command};
use student_ip_registry::{load_store, save_store, AddressRegistry, Config, Expander};

fn init_logging(log_config: &str) -> Result<(), Box<dyn Error>> {
    if std::path::Path::new(log_config).exists() {
        log4rs::init_file(log_config, Default::default())?;
    } else {
        let stderr = ConsoleAppender::builder()
            .target(Target::Stderr)
            .build();
        let config = LogConfig::builder()
            .appender(Appender::builder().build("stderr", Box::new(stderr)))
            .build(Root::builder().appender("stderr").build(LevelFilter::Warn))?;
        log4rs::init_config(config)?;
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    // Do as little as possible in main.rs as it can't contain any tests
    dotenv::dotenv().ok();
    let config = Config::from_env()?;
    init_logging(&config.log_config)?;
    log::info!("#Start main()");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = parse_args(&args)?;

    let expander = Expander::new(config.expansion_cap);
    let store = load_store(&config.store_file)?;
    let mut registry = AddressRegistry::with_expander(store, expander);

    let mutates = command.mutates();
    run_command(command, &mut registry, &expander)?;

    if mutates {
        save_store(registry.store(), &config.store_file)?;
    }
    log::info!("#End main()");
    Ok(())
}
