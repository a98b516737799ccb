//! User service: registration, login and profile lookups

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::application::log_storage_failure;
use crate::domain::{CreateUserDto, DomainError, RepositoryProvider, User};
use crate::infrastructure::crypto::jwt::{create_token, JwtConfig};
use crate::infrastructure::crypto::password::{
    hash_password_async, verify_password_async, DEFAULT_COST,
};
use crate::shared::{PaginatedResult, PaginationParams};

pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 50;
pub const PASSWORD_MIN_LEN: usize = 8;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UserError {
    /// The caller's own account does not exist.
    #[error("Bad request: user does not exist")]
    BadRequest,
    #[error("User not found")]
    NotFound,
    #[error("Internal error")]
    Unknown,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Username already taken")]
    UsernameTaken,
    #[error("Email already registered")]
    EmailTaken,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Internal error")]
    Unknown,
}

/// Access token issued on login
#[derive(Debug, Clone)]
pub struct AuthToken {
    pub token: String,
    pub token_type: String,
    /// Lifetime in seconds
    pub expires_in: i64,
    pub user: User,
}

pub struct UserService {
    repos: Arc<dyn RepositoryProvider>,
    jwt: JwtConfig,
    password_cost: u32,
}

impl UserService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, jwt: JwtConfig) -> Self {
        Self {
            repos,
            jwt,
            password_cost: DEFAULT_COST,
        }
    }

    /// Override the bcrypt cost.
    pub fn with_password_cost(mut self, cost: u32) -> Self {
        self.password_cost = cost;
        self
    }

    pub fn jwt_config(&self) -> &JwtConfig {
        &self.jwt
    }

    // ── Registration & login ───────────────────────────────────

    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let username = username.trim();
        let email = email.trim();
        validate_registration(username, email, password)?;

        let password_hash = hash_password_async(password, self.password_cost)
            .await
            .map_err(|e| {
                error!(error = %e, "Password hashing failed");
                AuthError::Unknown
            })?;

        let dto = CreateUserDto {
            username: username.to_string(),
            email: email.to_string(),
            password_hash,
            bio: None,
        };

        match self.repos.users().create(dto).await {
            Ok(user) => {
                info!(user_id = %user.id, username = %user.username, "User registered");
                Ok(user)
            }
            Err(DomainError::Conflict(msg)) => {
                debug!(conflict = %msg, "Registration rejected");
                if msg.contains("username") {
                    Err(AuthError::UsernameTaken)
                } else {
                    Err(AuthError::EmailTaken)
                }
            }
            Err(e) => {
                log_storage_failure("register", &e);
                Err(AuthError::Unknown)
            }
        }
    }

    /// Authenticate by username, or by email when the identifier looks like one.
    pub async fn login(&self, username_or_email: &str, password: &str) -> Result<AuthToken, AuthError> {
        let identifier = username_or_email.trim();
        let users = self.repos.users();

        let found = if identifier.contains('@') {
            users.find_by_email(identifier).await
        } else {
            users.find_by_username(identifier).await
        };
        let user = match found {
            Ok(Some(user)) => user,
            Ok(None) => {
                warn!(identifier, "Login failed: unknown user");
                return Err(AuthError::InvalidCredentials);
            }
            Err(e) => {
                log_storage_failure("login", &e);
                return Err(AuthError::Unknown);
            }
        };

        let valid = verify_password_async(password, &user.password_hash)
            .await
            .map_err(|e| {
                error!(user_id = %user.id, error = %e, "Password verification failed");
                AuthError::Unknown
            })?;
        if !valid {
            warn!(user_id = %user.id, "Login failed: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let token = create_token(&user.id, &user.username, &self.jwt).map_err(|e| {
            error!(user_id = %user.id, error = %e, "Token signing failed");
            AuthError::Unknown
        })?;

        info!(user_id = %user.id, "User logged in");
        Ok(AuthToken {
            token,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt.expiration_hours * 3600,
            user,
        })
    }

    // ── Profiles ───────────────────────────────────────────────

    /// The authenticated caller's own profile. A missing record means the
    /// token refers to an account that no longer exists.
    pub async fn get_me(&self, user_id: &str) -> Result<User, UserError> {
        self.find(user_id, "get_me")
            .await?
            .ok_or(UserError::BadRequest)
    }

    pub async fn get_user(&self, user_id: &str) -> Result<User, UserError> {
        self.find(user_id, "get_user")
            .await?
            .ok_or(UserError::NotFound)
    }

    /// Users ordered alphabetically by username.
    pub async fn list_users(
        &self,
        params: PaginationParams,
    ) -> Result<PaginatedResult<User>, UserError> {
        let users = self.repos.users();
        let total = users.count().await.map_err(|e| {
            log_storage_failure("count_users", &e);
            UserError::Unknown
        })?;
        let items = users.find_page(params.window()).await.map_err(|e| {
            log_storage_failure("list_users", &e);
            UserError::Unknown
        })?;

        Ok(PaginatedResult::new(items, total, params.page, params.limit))
    }

    async fn find(&self, user_id: &str, operation: &'static str) -> Result<Option<User>, UserError> {
        self.repos.users().find_by_id(user_id).await.map_err(|e| {
            log_storage_failure(operation, &e);
            UserError::Unknown
        })
    }
}

fn validate_registration(username: &str, email: &str, password: &str) -> Result<(), AuthError> {
    let len = username.chars().count();
    if !(USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&len) {
        return Err(AuthError::Validation(format!(
            "username must be {USERNAME_MIN_LEN}-{USERNAME_MAX_LEN} characters"
        )));
    }
    if username.contains('@') {
        return Err(AuthError::Validation(
            "username must not contain '@'".to_string(),
        ));
    }
    if !email.contains('@') {
        return Err(AuthError::Validation("email is not valid".to_string()));
    }
    if password.chars().count() < PASSWORD_MIN_LEN {
        return Err(AuthError::Validation(format!(
            "password must be at least {PASSWORD_MIN_LEN} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::crypto::jwt::verify_token;
    use crate::infrastructure::InMemoryRepositoryProvider;
    use crate::test_support::seed_user;

    fn service(repos: &InMemoryRepositoryProvider) -> UserService {
        UserService::new(Arc::new(repos.clone()), JwtConfig::default())
            .with_password_cost(crate::infrastructure::crypto::password::MIN_COST)
    }

    #[tokio::test]
    async fn register_then_login_by_username_and_email() {
        let repos = InMemoryRepositoryProvider::new();
        let svc = service(&repos);

        let user = svc
            .register("alice", "alice@example.com", "s3cret-pass")
            .await
            .unwrap();
        assert_ne!(user.password_hash, "s3cret-pass");

        let token = svc.login("alice", "s3cret-pass").await.unwrap();
        assert_eq!(token.token_type, "Bearer");
        assert_eq!(token.expires_in, 24 * 3600);
        assert_eq!(token.user.id, user.id);

        let claims = verify_token(&token.token, svc.jwt_config()).unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.username, "alice");

        let by_email = svc.login("alice@example.com", "s3cret-pass").await.unwrap();
        assert_eq!(by_email.user.id, user.id);
    }

    #[tokio::test]
    async fn bad_credentials_are_indistinguishable() {
        let repos = InMemoryRepositoryProvider::new();
        let svc = service(&repos);
        svc.register("alice", "alice@example.com", "s3cret-pass")
            .await
            .unwrap();

        assert_eq!(
            svc.login("alice", "wrong-pass").await.unwrap_err(),
            AuthError::InvalidCredentials
        );
        assert_eq!(
            svc.login("nobody", "s3cret-pass").await.unwrap_err(),
            AuthError::InvalidCredentials
        );
    }

    #[tokio::test]
    async fn duplicate_registration() {
        let repos = InMemoryRepositoryProvider::new();
        let svc = service(&repos);
        svc.register("alice", "alice@example.com", "s3cret-pass")
            .await
            .unwrap();

        assert_eq!(
            svc.register("alice", "other@example.com", "s3cret-pass")
                .await
                .unwrap_err(),
            AuthError::UsernameTaken
        );
        assert_eq!(
            svc.register("alicia", "alice@example.com", "s3cret-pass")
                .await
                .unwrap_err(),
            AuthError::EmailTaken
        );
    }

    #[test]
    fn registration_rules() {
        assert!(validate_registration("bob", "bob@example.com", "12345678").is_ok());
        assert!(matches!(
            validate_registration("al", "al@example.com", "12345678"),
            Err(AuthError::Validation(_))
        ));
        assert!(matches!(
            validate_registration(&"x".repeat(51), "x@example.com", "12345678"),
            Err(AuthError::Validation(_))
        ));
        assert!(matches!(
            validate_registration("bob", "not-an-email", "12345678"),
            Err(AuthError::Validation(_))
        ));
        assert!(matches!(
            validate_registration("bob", "bob@example.com", "short"),
            Err(AuthError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn get_me_reports_missing_caller_as_bad_request() {
        let repos = InMemoryRepositoryProvider::new();
        let alice = seed_user(&repos, "alice").await;
        let svc = service(&repos);

        assert_eq!(svc.get_me(&alice.id).await.unwrap().username, "alice");
        assert_eq!(svc.get_me("ghost").await.unwrap_err(), UserError::BadRequest);
        assert_eq!(svc.get_user("ghost").await.unwrap_err(), UserError::NotFound);
    }

    #[tokio::test]
    async fn list_users_is_alphabetical() {
        let repos = InMemoryRepositoryProvider::new();
        for name in ["carol", "alice", "dave", "bob"] {
            seed_user(&repos, name).await;
        }
        let svc = service(&repos);

        let first = svc.list_users(PaginationParams::new(1, 3)).await.unwrap();
        let names: Vec<_> = first.items.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, ["alice", "bob", "carol"]);
        assert_eq!(first.total, 4);
        assert_eq!(first.total_pages, 2);

        let second = svc.list_users(PaginationParams::new(2, 3)).await.unwrap();
        assert_eq!(second.items[0].username, "dave");
    }

    #[tokio::test]
    async fn store_failure_is_unknown() {
        let repos = InMemoryRepositoryProvider::new();
        repos.set_unavailable(true);
        let svc = service(&repos);

        assert_eq!(svc.get_me("any").await.unwrap_err(), UserError::Unknown);
        assert_eq!(
            svc.list_users(PaginationParams::new(1, 10)).await.unwrap_err(),
            UserError::Unknown
        );
        assert_eq!(
            svc.login("alice", "whatever1").await.unwrap_err(),
            AuthError::Unknown
        );
    }
}
