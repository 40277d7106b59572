//! Authentication and authorization policy.
//!
//! Gates every protected operation. The session model is a single opaque
//! token (the authenticated account's normalized email) persisted separately
//! from the data snapshot; a valid, still-existing, still-verified account
//! for that token reconstructs the session across restarts, otherwise the
//! token is discarded silently.
//!
//! Passwords are plain text by design of the demo; comparisons still use
//! constant-time equality.

use std::sync::Arc;

use serde::Serialize;
use subtle::ConstantTimeEq;

use crate::db::{AUTH_TOKEN_KEY, UNVERIFIED_EMAIL_KEY};
use crate::errors::AppError;
use crate::models::{
    Account, ChangePasswordRequest, CreateAccountRequest, LoginRequest, RegisterRequest,
    ResetPasswordRequest, Role, UpdateAccountRequest, UpdateProfileRequest,
};
use crate::store::{Mutated, Store};

/// Authorization requirement of a named UI route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    Public,
    Authenticated,
    AdminOnly,
}

/// Access requirement for a named route; `None` means the route is unknown
/// and falls back to home.
pub fn route_access(route: &str) -> Option<RouteAccess> {
    match route {
        "" | "home" | "login" | "register" | "verify-email" => Some(RouteAccess::Public),
        "profile" | "requests" => Some(RouteAccess::Authenticated),
        "employees" | "departments" | "accounts" | "all-requests" => Some(RouteAccess::AdminOnly),
        _ => None,
    }
}

/// Outcome of a navigation request: the page to show, or where to redirect.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationDecision {
    pub page: String,
    pub allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
}

/// Credential, session, and role policy over the store.
pub struct AuthService {
    store: Arc<Store>,
}

impl AuthService {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    // ==================== REGISTRATION & VERIFICATION ====================

    /// Register a new account. Starts unverified with role User and arms the
    /// pending-verification marker.
    pub async fn register(&self, req: &RegisterRequest) -> Result<Mutated<Account>, AppError> {
        let first_name = req.first_name.trim().to_string();
        let last_name = req.last_name.trim().to_string();
        let email = normalize_email(&req.email);
        validate_account_fields(&first_name, &last_name, &email, &req.password)?;

        let password = req.password.clone();
        let mutated = self
            .store
            .mutate(move |snapshot| {
                if snapshot
                    .accounts
                    .iter()
                    .any(|a| a.email.eq_ignore_ascii_case(&email))
                {
                    return Err(AppError::Conflict(
                        "Email already registered. Please use a different email.".to_string(),
                    ));
                }
                let account = Account {
                    first_name,
                    last_name,
                    email,
                    password,
                    role: Role::User,
                    verified: false,
                };
                snapshot.accounts.push(account.clone());
                Ok(account)
            })
            .await?;

        self.set_marker(&mutated.value.email).await;
        Ok(mutated)
    }

    /// Complete verification for the email held by the pending marker.
    pub async fn verify_pending(&self) -> Result<Mutated<Account>, AppError> {
        let email = match self.store.kv().get(UNVERIFIED_EMAIL_KEY).await? {
            Some(email) => email,
            None => return Err(AppError::NotFound("No email to verify".to_string())),
        };

        let mutated = self
            .store
            .mutate(move |snapshot| {
                let account = snapshot
                    .find_account_mut(&email)
                    .ok_or_else(|| AppError::NotFound("Account not found".to_string()))?;
                account.verified = true;
                Ok(account.clone())
            })
            .await?;

        if let Err(err) = self.store.kv().remove(UNVERIFIED_EMAIL_KEY).await {
            tracing::warn!("Failed to clear verification marker: {}", err);
        }
        Ok(mutated)
    }

    // ==================== SESSION ====================

    /// Authenticate credentials and open the session. Verification is
    /// checked before the password.
    pub async fn login(&self, req: &LoginRequest) -> Result<Account, AppError> {
        let email = normalize_email(&req.email);
        if email.is_empty() || req.password.is_empty() {
            return Err(AppError::Validation(
                "Please enter both email and password".to_string(),
            ));
        }

        let account = self
            .store
            .read(|snapshot| snapshot.find_account(&email).cloned())
            .await
            .ok_or_else(|| {
                AppError::NotFound("Account not found. Please register first.".to_string())
            })?;

        if !account.verified {
            // Re-arm the marker so the caller can be sent to verification.
            self.set_marker(&account.email).await;
            return Err(AppError::NotVerified(
                "Email not verified. Please check your email for verification link.".to_string(),
            ));
        }

        if !constant_time_compare(&account.password, &req.password) {
            return Err(AppError::Unauthorized(
                "Incorrect password. Please try again.".to_string(),
            ));
        }

        self.store.kv().set(AUTH_TOKEN_KEY, &account.email).await?;
        Ok(account)
    }

    /// Close the session.
    pub async fn logout(&self) -> Result<(), AppError> {
        self.store.kv().remove(AUTH_TOKEN_KEY).await?;
        Ok(())
    }

    /// Reconstruct the session from the persisted token. A token whose
    /// account no longer exists or is unverified is discarded silently.
    pub async fn current_session(&self) -> Result<Account, AppError> {
        let token = match self.store.kv().get(AUTH_TOKEN_KEY).await? {
            Some(token) => token,
            None => return Err(AppError::Unauthorized("Not logged in".to_string())),
        };

        let account = self
            .store
            .read(|snapshot| snapshot.find_account(&token).cloned())
            .await;
        match account {
            Some(account) if account.verified => Ok(account),
            _ => {
                if let Err(err) = self.store.kv().remove(AUTH_TOKEN_KEY).await {
                    tracing::warn!("Failed to discard stale session token: {}", err);
                }
                Err(AppError::Unauthorized("Not logged in".to_string()))
            }
        }
    }

    /// Session plus Admin role, for admin-only operations.
    pub async fn require_admin(&self) -> Result<Account, AppError> {
        let account = self.current_session().await?;
        if !account.role.is_admin() {
            return Err(AppError::Forbidden("Admin access required".to_string()));
        }
        Ok(account)
    }

    /// Resolve a navigation request against the current session.
    pub async fn navigate(&self, route: &str) -> NavigationDecision {
        let session = self.current_session().await.ok();
        let (access, page) = match route_access(route) {
            Some(access) => {
                let page = if route.is_empty() { "home" } else { route };
                (access, page.to_string())
            }
            // Unknown routes fall back to home.
            None => (RouteAccess::Public, "home".to_string()),
        };

        let redirect = match access {
            RouteAccess::Public => None,
            RouteAccess::Authenticated => match session {
                Some(_) => None,
                None => Some("login".to_string()),
            },
            RouteAccess::AdminOnly => match session {
                Some(account) if account.role.is_admin() => None,
                Some(_) => Some("home".to_string()),
                None => Some("login".to_string()),
            },
        };

        NavigationDecision {
            page,
            allowed: redirect.is_none(),
            redirect,
        }
    }

    // ==================== SELF-SERVICE ====================

    /// Edit the session account's names.
    pub async fn update_profile(
        &self,
        req: &UpdateProfileRequest,
    ) -> Result<Mutated<Account>, AppError> {
        let session = self.current_session().await?;
        let first_name = req.first_name.trim().to_string();
        let last_name = req.last_name.trim().to_string();
        validate_names(&first_name, &last_name)?;

        self.store
            .mutate(move |snapshot| {
                let account = snapshot
                    .find_account_mut(&session.email)
                    .ok_or_else(|| AppError::NotFound("Account not found".to_string()))?;
                account.first_name = first_name;
                account.last_name = last_name;
                Ok(account.clone())
            })
            .await
    }

    /// Change the session account's password. The current password must be
    /// presented and match; there is no bypass.
    pub async fn change_password(
        &self,
        req: &ChangePasswordRequest,
    ) -> Result<Mutated<()>, AppError> {
        let session = self.current_session().await?;
        if !constant_time_compare(&session.password, &req.current_password) {
            return Err(AppError::Unauthorized(
                "Current password is incorrect".to_string(),
            ));
        }
        validate_password(&req.new_password)?;

        let new_password = req.new_password.clone();
        self.store
            .mutate(move |snapshot| {
                let account = snapshot
                    .find_account_mut(&session.email)
                    .ok_or_else(|| AppError::NotFound("Account not found".to_string()))?;
                account.password = new_password;
                Ok(())
            })
            .await
    }

    // ==================== ACCOUNT ADMINISTRATION ====================

    /// Admin-created account; may be pre-verified and may hold any role.
    pub async fn create_account(
        &self,
        req: &CreateAccountRequest,
    ) -> Result<Mutated<Account>, AppError> {
        self.require_admin().await?;

        let first_name = req.first_name.trim().to_string();
        let last_name = req.last_name.trim().to_string();
        let email = normalize_email(&req.email);
        validate_account_fields(&first_name, &last_name, &email, &req.password)?;

        let account = Account {
            first_name,
            last_name,
            email,
            password: req.password.clone(),
            role: req.role,
            verified: req.verified,
        };
        self.store
            .mutate(move |snapshot| {
                if snapshot
                    .accounts
                    .iter()
                    .any(|a| a.email.eq_ignore_ascii_case(&account.email))
                {
                    return Err(AppError::Conflict(
                        "Email already exists. Please use a different email.".to_string(),
                    ));
                }
                snapshot.accounts.push(account.clone());
                Ok(account)
            })
            .await
    }

    /// Admin edit of an account, keyed by its current email. When the edited
    /// account backs the live session token, the token follows the new email.
    pub async fn update_account(
        &self,
        current_email: &str,
        req: &UpdateAccountRequest,
    ) -> Result<Mutated<Account>, AppError> {
        let admin = self.require_admin().await?;

        let current_email = normalize_email(current_email);
        let first_name = req.first_name.trim().to_string();
        let last_name = req.last_name.trim().to_string();
        let email = normalize_email(&req.email);
        validate_account_fields(&first_name, &last_name, &email, &req.password)?;

        let updated = Account {
            first_name,
            last_name,
            email,
            password: req.password.clone(),
            role: req.role,
            verified: req.verified,
        };
        let target = current_email.clone();
        let mutated = self
            .store
            .mutate(move |snapshot| {
                if updated.email != target
                    && snapshot
                        .accounts
                        .iter()
                        .any(|a| a.email.eq_ignore_ascii_case(&updated.email))
                {
                    return Err(AppError::Conflict(
                        "Email already exists. Please use a different email.".to_string(),
                    ));
                }
                let account = snapshot
                    .find_account_mut(&target)
                    .ok_or_else(|| AppError::NotFound("Account not found".to_string()))?;
                *account = updated.clone();
                Ok(updated)
            })
            .await?;

        if admin.email == current_email && mutated.value.email != current_email {
            self.store
                .kv()
                .set(AUTH_TOKEN_KEY, &mutated.value.email)
                .await?;
        }
        Ok(mutated)
    }

    /// Admin password reset, without the current password.
    pub async fn reset_password(
        &self,
        email: &str,
        req: &ResetPasswordRequest,
    ) -> Result<Mutated<()>, AppError> {
        self.require_admin().await?;
        validate_password(&req.new_password)?;

        let email = normalize_email(email);
        let new_password = req.new_password.clone();
        self.store
            .mutate(move |snapshot| {
                let account = snapshot
                    .find_account_mut(&email)
                    .ok_or_else(|| AppError::NotFound("Account not found".to_string()))?;
                account.password = new_password;
                Ok(())
            })
            .await
    }

    /// Delete an account, cascading to its employee record. Deleting the
    /// account behind the caller's own session is blocked.
    pub async fn delete_account(&self, email: &str) -> Result<Mutated<()>, AppError> {
        let admin = self.require_admin().await?;
        let email = normalize_email(email);
        if admin.email == email {
            return Err(AppError::Forbidden(
                "Cannot delete your own account".to_string(),
            ));
        }

        self.store
            .mutate(move |snapshot| {
                if snapshot.find_account(&email).is_none() {
                    return Err(AppError::NotFound("Account not found".to_string()));
                }
                snapshot.accounts.retain(|a| a.email != email);
                snapshot.employees.retain(|e| e.user_email != email);
                Ok(())
            })
            .await
    }

    /// List all accounts (admin view).
    pub async fn list_accounts(&self) -> Result<Vec<Account>, AppError> {
        self.require_admin().await?;
        Ok(self.store.read(|snapshot| snapshot.accounts.clone()).await)
    }

    async fn set_marker(&self, email: &str) {
        if let Err(err) = self.store.kv().set(UNVERIFIED_EMAIL_KEY, email).await {
            tracing::warn!("Failed to persist verification marker: {}", err);
        }
    }
}

/// Normalize an email at the boundary: trimmed, lowercase.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Shape check equivalent to the demo's `local@domain.tld` pattern:
/// no whitespace, exactly one `@`, and a dot inside the domain with
/// non-empty segments on both sides.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

fn validate_names(first_name: &str, last_name: &str) -> Result<(), AppError> {
    if first_name.is_empty() || last_name.is_empty() {
        return Err(AppError::Validation(
            "Please enter your full name".to_string(),
        ));
    }
    if first_name.len() < 2 || last_name.len() < 2 {
        return Err(AppError::Validation(
            "Names must be at least 2 characters".to_string(),
        ));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), AppError> {
    if password.len() < 6 {
        return Err(AppError::Validation(
            "Password must be at least 6 characters".to_string(),
        ));
    }
    Ok(())
}

fn validate_account_fields(
    first_name: &str,
    last_name: &str,
    email: &str,
    password: &str,
) -> Result<(), AppError> {
    validate_names(first_name, last_name)?;
    if !is_valid_email(email) {
        return Err(AppError::Validation(
            "Please enter a valid email address".to_string(),
        ));
    }
    validate_password(password)
}

/// Perform constant-time string comparison.
fn constant_time_compare(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}
