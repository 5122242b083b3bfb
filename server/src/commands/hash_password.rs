use crate::{auth::AdminCredentials, Result};

pub(crate) fn print_hash(username: &str, password: &str) -> Result<()> {
    let hash = AdminCredentials::hash_password(username, password)?;

    println!("ADMIN_USERNAME={username}");
    println!("ADMIN_PASSWORD_HASH={hash}");

    Ok(())
}
