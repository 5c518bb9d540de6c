use std::io::{self, BufRead, Write};

use carton_record::configuration::Settings;
use carton_record::console::{execute, Command, HELP};
use carton_record::telemetry::{get_subscriber, init_subscriber};
use carton_record::{seed, Workspace};
use dotenv::dotenv;
use tracing::info;

fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let settings = Settings::from_env()?;

    let subscriber = get_subscriber(settings.app_name.clone(), settings.log_filter.clone(), io::stderr);
    init_subscriber(subscriber)?;

    let store = seed::store()?;
    info!(
        customers = store.customers().count(),
        records = store.records().count(),
        update_policy = %settings.update_policy,
        "record store seeded"
    );

    let mut workspace = Workspace::new(store, seed::employees(), settings.update_policy)?;

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", HELP)?;

    for line in stdin.lock().lines() {
        let line = line?;
        let keep_going = match Command::parse(&line) {
            Ok(command) => execute(&mut workspace, command, &mut stdout)?,
            Err(err) => {
                writeln!(stdout, "{}", serde_json::to_string(&err.to_response())?)?;
                true
            }
        };
        stdout.flush()?;
        if !keep_going {
            break;
        }
    }

    info!("session ended");
    Ok(())
}
