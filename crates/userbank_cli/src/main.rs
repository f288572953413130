//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `userbank_core` linkage and configuration end to end.
//! - Print every stored user from the configured database.

use log::info;
use std::error::Error;
use std::process::ExitCode;
use userbank_core::{
    init_logging, CoreConfig, FileConnectionProvider, SqliteUserRepository, UserService,
};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("userbank: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    // A missing .env file is fine; the process environment still applies.
    dotenvy::dotenv().ok();

    println!("userbank_core ping={}", userbank_core::ping());
    println!("userbank_core version={}", userbank_core::core_version());

    let config = CoreConfig::from_env()?;
    if let Some(log_dir) = &config.log_dir {
        init_logging(config.log_level, log_dir)?;
    }

    let provider = FileConnectionProvider::new(config.db_path.clone())?;
    let repo = SqliteUserRepository::try_new(provider)?;
    let service = UserService::new(repo);

    let users = service.fetch_all();
    info!(
        "event=cli_list module=cli status=ok user_count={}",
        users.len()
    );
    println!("db_path={} users={}", config.db_path.display(), users.len());
    for user in &users {
        print!("{user}");
    }

    Ok(())
}
