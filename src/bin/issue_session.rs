//! Prints a session token for the given email, creating the profile on first use.
//!
//! Usage: `issue_session <email> [--admin] [--hours N]`

use std::env;

use chrono::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dept_portal::config::Config;
use dept_portal::db::{self, auth};
use dept_portal::models::profile::ADMIN_ROLE;

const DEFAULT_ROLE: &str = "user";
const DEFAULT_HOURS: i64 = 24;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            env::var("RUST_LOG").unwrap_or_else(|_| "dept_portal=info".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut email = None;
    let mut admin = false;
    let mut hours = DEFAULT_HOURS;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--admin" => admin = true,
            "--hours" => {
                let raw = args.next().ok_or("--hours needs a value")?;
                hours = raw.parse()?;
            }
            _ if email.is_none() => email = Some(arg),
            other => return Err(format!("unexpected argument: {}", other).into()),
        }
    }
    let email = email.ok_or("usage: issue_session <email> [--admin] [--hours N]")?;

    let config = Config::from_env()?;
    let pool = db::connect(&config).await?;

    let profile = match auth::find_profile_by_email(&pool, &email).await? {
        Some(profile) => {
            if admin && !profile.is_admin() {
                auth::set_profile_role(&pool, &profile.id, ADMIN_ROLE).await?;
            }
            profile
        }
        None => {
            let role = if admin { ADMIN_ROLE } else { DEFAULT_ROLE };
            auth::insert_profile(&pool, &email, None, role).await?
        }
    };

    let token = auth::create_session(&pool, &profile.id, Duration::hours(hours)).await?;
    println!("{}", token);

    Ok(())
}
