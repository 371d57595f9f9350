use clap::Subcommand;
use osfloor_core::KeyringToken;

#[derive(Subcommand)]
pub enum AuthAction {
    /// Store a management API bearer token in the OS keyring
    Login {
        /// Access token issued for the management API
        #[arg(long)]
        token: String,
    },
    /// Remove the stored token
    Logout,
    /// Check whether a token is stored
    Status,
}

pub fn run(action: AuthAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        AuthAction::Login { token } => {
            if token.trim().is_empty() {
                return Err("--token must not be empty".into());
            }
            KeyringToken::store(token.trim())?;
            println!("token stored");
        }
        AuthAction::Logout => {
            KeyringToken::clear()?;
            println!("token removed");
        }
        AuthAction::Status => {
            println!(
                "{}",
                if KeyringToken::is_stored() {
                    "authenticated"
                } else {
                    "not authenticated"
                }
            );
        }
    }
    Ok(())
}
