//! Session service - login, registration, and the persisted identity
//!
//! Credentials are plaintext compared against static values and the
//! registered-accounts record; there is deliberately no hashing, tokens,
//! or lockout. The current user lives under its own store key and is not
//! one of the synchronized collections, so no sync events fire for it.

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{CurrentUser, CustomerAccount, Role, SignUp};

use crate::store::{CURRENT_USER_KEY, CUSTOMER_ACCOUNTS_KEY};
use crate::sync::TabContext;

/// Built-in admin login
const ADMIN_USERNAME: &str = "admin";
const ADMIN_PASSWORD: &str = "admin123";

/// Built-in demo customer login
const CUSTOMER_USERNAME: &str = "customer";
const CUSTOMER_PASSWORD: &str = "customer123";

/// Usernames that can never be registered
const RESERVED_USERNAMES: [&str; 2] = [ADMIN_USERNAME, CUSTOMER_USERNAME];

const MIN_PASSWORD_LEN: usize = 6;

/// Session operations for one tab
#[derive(Debug)]
pub struct SessionService<'a> {
    tab: &'a TabContext,
}

impl<'a> SessionService<'a> {
    pub fn new(tab: &'a TabContext) -> Self {
        Self { tab }
    }

    /// Authenticate and persist the session identity.
    ///
    /// The failure message is uniform across unknown-user and wrong-password
    /// to avoid username probing.
    pub fn login(&self, username: &str, password: &str) -> AppResult<CurrentUser> {
        let role = if username == ADMIN_USERNAME && password == ADMIN_PASSWORD {
            Role::Admin
        } else if username == CUSTOMER_USERNAME && password == CUSTOMER_PASSWORD {
            Role::Customer
        } else {
            let accounts = self.accounts()?;
            let matched = accounts
                .iter()
                .any(|acc| acc.username == username && acc.password == password);
            if !matched {
                return Err(AppError::invalid_credentials());
            }
            Role::Customer
        };

        let user = CurrentUser {
            username: username.to_string(),
            role,
        };
        self.tab
            .store()
            .write_value(CURRENT_USER_KEY, &user, self.tab.id())?;

        tracing::info!(username, %role, "User logged in");
        Ok(user)
    }

    /// Register a new customer account
    pub fn register(&self, sign_up: SignUp) -> AppResult<()> {
        let username = sign_up.username.trim().to_string();
        if username.is_empty() {
            return Err(AppError::validation("Username is required"));
        }
        if sign_up.password.len() < MIN_PASSWORD_LEN {
            return Err(AppError::new(ErrorCode::WeakPassword));
        }

        let mut accounts = self.accounts()?;
        let taken = RESERVED_USERNAMES
            .iter()
            .any(|r| r.eq_ignore_ascii_case(&username))
            || accounts
                .iter()
                .any(|acc| acc.username.eq_ignore_ascii_case(&username));
        if taken {
            return Err(AppError::new(ErrorCode::UsernameTaken).with_detail("username", username));
        }

        accounts.push(CustomerAccount {
            username: username.clone(),
            password: sign_up.password,
            name: sign_up.name,
            email: sign_up.email,
        });
        self.tab
            .store()
            .write_value(CUSTOMER_ACCOUNTS_KEY, &accounts, self.tab.id())?;

        tracing::info!(username, "Customer account registered");
        Ok(())
    }

    /// The persisted identity, if any tab on this store is logged in
    pub fn current_user(&self) -> AppResult<Option<CurrentUser>> {
        Ok(self.tab.store().read_value(CURRENT_USER_KEY)?)
    }

    /// Clear the persisted identity
    pub fn logout(&self) -> AppResult<()> {
        self.tab.store().remove_raw(CURRENT_USER_KEY, self.tab.id())?;
        Ok(())
    }

    fn accounts(&self) -> AppResult<Vec<CustomerAccount>> {
        Ok(self
            .tab
            .store()
            .read_value(CUSTOMER_ACCOUNTS_KEY)?
            .unwrap_or_default())
    }
}
