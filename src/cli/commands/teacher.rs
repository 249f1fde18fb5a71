//! Staff account command handler

use crate::config::Config;
use crate::db::{Store, StoreError};

pub async fn cmd_add_teacher(config: &Config, username: &str) -> anyhow::Result<()> {
    let username = username.trim();
    if username.is_empty() {
        println!("Username cannot be empty.");
        return Ok(());
    }

    let store = Store::new(&config.general.database_path).await?;

    // Courtesy check before prompting twice for a password; create still
    // catches the race on the unique column.
    if store.teacher_exists(username).await? {
        println!("Username '{username}' is already taken.");
        return Ok(());
    }

    println!("Password for '{username}':");
    let mut password = String::new();
    std::io::stdin().read_line(&mut password)?;
    let password = password.trim_end_matches(['\r', '\n']);

    println!("Confirm password:");
    let mut confirm = String::new();
    std::io::stdin().read_line(&mut confirm)?;
    let confirm = confirm.trim_end_matches(['\r', '\n']);

    if password != confirm {
        println!("Passwords do not match.");
        return Ok(());
    }

    if password.len() < 8 {
        println!("Password must be at least 8 characters.");
        return Ok(());
    }

    match store
        .create_teacher(username, password, &config.security)
        .await
    {
        Ok(teacher) => println!("✓ Created staff account: {}", teacher.username),
        Err(StoreError::DuplicateUsername(_)) => {
            println!("Username '{username}' is already taken.");
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
