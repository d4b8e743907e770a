use anyhow::Result;
use std::io::{self, Write};

use super::open_session;
use crate::auth::RegisterRequest;
use crate::core::AppConfig;

fn prompt(label: &str) -> String {
    print!("{}", label);
    io::stdout().flush().unwrap();
    let mut value = String::new();
    io::stdin()
        .read_line(&mut value)
        .expect("Failed to read input");
    value.trim().to_owned()
}

pub async fn login(config: &AppConfig, email: Option<String>) -> Result<()> {
    let email = email.unwrap_or_else(|| prompt("Email: "));
    let password = prompt("Password: ");

    let session = open_session(config).await?;
    let payload = session.login(&email, &password).await?;
    match payload.org {
        Some(org) => println!("Logged in as {} ({})", payload.user.email, org.name),
        None => println!("Logged in as {}", payload.user.email),
    }

    Ok(())
}

pub async fn register(
    config: &AppConfig,
    email: Option<String>,
    name: Option<String>,
    org_name: Option<String>,
) -> Result<()> {
    let email = email.unwrap_or_else(|| prompt("Email: "));
    let name = name.unwrap_or_else(|| prompt("Your name: "));
    let org_name = org_name.unwrap_or_else(|| prompt("Organization name: "));
    let password = prompt("Password: ");
    let password_confirm = prompt("Confirm password: ");

    let session = open_session(config).await?;
    let payload = session
        .register(&RegisterRequest {
            email,
            password,
            password_confirm,
            name,
            org_name,
        })
        .await?;
    match payload.org {
        Some(org) => println!("Registered {} with org {}", payload.user.email, org.name),
        None => println!("Registered {}", payload.user.email),
    }

    Ok(())
}

pub async fn logout(config: &AppConfig) -> Result<()> {
    let session = open_session(config).await?;
    session.logout().await?;
    println!("Logged out");

    Ok(())
}

pub async fn me(config: &AppConfig) -> Result<()> {
    let session = open_session(config).await?;
    let me = session.me().await?;
    println!("{} <{}> on the {} plan", me.user.name, me.user.email, me.user.plan);
    for org in &me.organizations {
        println!("  {} ({}, {})", org.name, org.currency, org.id);
    }

    Ok(())
}
