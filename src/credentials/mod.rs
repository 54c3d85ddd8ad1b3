//! Account credential loading.
//!
//! Credentials come from a single file, either a plain token list or a JSON
//! array of token/secondary-id pairs. Both layouts produce the same
//! [`Account`] type; the secondary id is simply absent for plain tokens.
//!
//! ## Usage
//!
//! ```no_run
//! use klok_bot::credentials::{CredentialFormat, load_accounts_from_path};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let accounts = load_accounts_from_path("tokens.txt".as_ref(), CredentialFormat::Auto)?;
//! println!("loaded {} accounts", accounts.len());
//! # Ok(())
//! # }
//! ```

mod loader;
mod types;

pub use loader::{load_accounts, load_accounts_from_path, parse_accounts};
pub use types::{Account, CredentialError, CredentialFormat};
