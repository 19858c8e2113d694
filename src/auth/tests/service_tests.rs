//! Service orchestration tests for registration and session handling.

use std::sync::Arc;

use crate::auth::{
    adapters::memory::InMemoryAuthRepository,
    domain::{
        AccessToken, AccessTokenId, AuthDomainError, EmailAddress, PersistedAccessTokenData,
        TokenDigest, User, UserId,
    },
    ports::{AuthRepository, AuthRepositoryError, AuthRepositoryResult},
    services::{AccountService, AccountServiceError, RegisterRequest},
};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

type TestService = AccountService<InMemoryAuthRepository, DefaultClock>;

mockall::mock! {
    AuthStore {}

    #[async_trait]
    impl AuthRepository for AuthStore {
        async fn store_user(&self, user: &User) -> AuthRepositoryResult<()>;
        async fn find_user(&self, id: UserId) -> AuthRepositoryResult<Option<User>>;
        async fn find_user_by_email(
            &self,
            email: &EmailAddress,
        ) -> AuthRepositoryResult<Option<User>>;
        async fn list_users(&self) -> AuthRepositoryResult<Vec<User>>;
        async fn store_token(&self, token: &AccessToken) -> AuthRepositoryResult<()>;
        async fn find_token(
            &self,
            digest: &TokenDigest,
        ) -> AuthRepositoryResult<Option<AccessToken>>;
        async fn delete_token(&self, digest: &TokenDigest) -> AuthRepositoryResult<()>;
        async fn purge_expired_tokens(
            &self,
            user_id: UserId,
            now: DateTime<Utc>,
        ) -> AuthRepositoryResult<u64>;
    }
}

#[fixture]
fn repository() -> Arc<InMemoryAuthRepository> {
    Arc::new(InMemoryAuthRepository::new())
}

fn service_over(repository: &Arc<InMemoryAuthRepository>) -> TestService {
    AccountService::new(Arc::clone(repository), Arc::new(DefaultClock))
}

async fn register_account(service: &TestService, name: &str, email: &str) -> User {
    service
        .register(RegisterRequest::new(name, email, "hunter2hunter2"))
        .await
        .expect("registration should succeed")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn register_then_login_mints_a_session(repository: Arc<InMemoryAuthRepository>) {
    let service = service_over(&repository);
    let user = register_account(&service, "Ana Lopez", "ana@example.com").await;

    let session = service
        .login("ana@example.com", "hunter2hunter2")
        .await
        .expect("login should succeed");

    assert_eq!(session.user().id(), user.id());
    assert_eq!(session.token().as_str().chars().count(), 64);
    assert!(session.expires_at() > Utc::now());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn register_rejects_duplicate_email(repository: Arc<InMemoryAuthRepository>) {
    let service = service_over(&repository);
    register_account(&service, "Ana Lopez", "ana@example.com").await;

    let result = service
        .register(RegisterRequest::new(
            "Another Ana",
            "ana@example.com",
            "hunter2hunter2",
        ))
        .await;

    assert!(matches!(
        result,
        Err(AccountServiceError::Repository(
            AuthRepositoryError::DuplicateEmail(_)
        ))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn register_rejects_malformed_email(repository: Arc<InMemoryAuthRepository>) {
    let service = service_over(&repository);
    let result = service
        .register(RegisterRequest::new(
            "Ana Lopez",
            "not-an-email",
            "hunter2hunter2",
        ))
        .await;

    assert!(matches!(
        result,
        Err(AccountServiceError::Domain(AuthDomainError::InvalidEmail(_)))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn register_rejects_short_password(repository: Arc<InMemoryAuthRepository>) {
    let service = service_over(&repository);
    let result = service
        .register(RegisterRequest::new("Ana Lopez", "ana@example.com", "short"))
        .await;

    assert!(matches!(
        result,
        Err(AccountServiceError::Domain(
            AuthDomainError::PasswordTooShort { minimum: 8 }
        ))
    ));
}

#[rstest]
#[case::unknown_email("nobody@example.com", "hunter2hunter2")]
#[case::wrong_password("ana@example.com", "wrong password")]
#[case::malformed_email("not-an-email", "hunter2hunter2")]
#[tokio::test(flavor = "multi_thread")]
async fn login_rejects_bad_credentials(
    repository: Arc<InMemoryAuthRepository>,
    #[case] email: &str,
    #[case] password: &str,
) {
    let service = service_over(&repository);
    register_account(&service, "Ana Lopez", "ana@example.com").await;

    let result = service.login(email, password).await;

    assert!(matches!(
        result,
        Err(AccountServiceError::InvalidCredentials)
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn login_purges_expired_tokens_for_the_account(repository: Arc<InMemoryAuthRepository>) {
    let service = service_over(&repository);
    let user = register_account(&service, "Ana Lopez", "ana@example.com").await;

    let stale = AccessToken::from_persisted(PersistedAccessTokenData {
        id: AccessTokenId::new(),
        user_id: user.id(),
        digest: TokenDigest::generate(),
        expires_at: Utc::now() - Duration::days(1),
        created_at: Utc::now() - Duration::days(31),
    });
    repository
        .store_token(&stale)
        .await
        .expect("storing stale token should succeed");

    service
        .login("ana@example.com", "hunter2hunter2")
        .await
        .expect("login should succeed");

    let found = repository
        .find_token(stale.digest())
        .await
        .expect("lookup should succeed");
    assert!(found.is_none());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn authenticate_resolves_a_live_session(repository: Arc<InMemoryAuthRepository>) {
    let service = service_over(&repository);
    let user = register_account(&service, "Ana Lopez", "ana@example.com").await;
    let session = service
        .login("ana@example.com", "hunter2hunter2")
        .await
        .expect("login should succeed");

    let resolved = service
        .authenticate(session.token())
        .await
        .expect("authentication should succeed");

    assert_eq!(resolved.id(), user.id());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn authenticate_rejects_unknown_tokens(repository: Arc<InMemoryAuthRepository>) {
    let service = service_over(&repository);
    let result = service.authenticate(&TokenDigest::generate()).await;

    assert!(matches!(result, Err(AccountServiceError::InvalidToken)));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn authenticate_rejects_expired_tokens(repository: Arc<InMemoryAuthRepository>) {
    let service = service_over(&repository);
    let user = register_account(&service, "Ana Lopez", "ana@example.com").await;

    let stale = AccessToken::from_persisted(PersistedAccessTokenData {
        id: AccessTokenId::new(),
        user_id: user.id(),
        digest: TokenDigest::generate(),
        expires_at: Utc::now() - Duration::seconds(1),
        created_at: Utc::now() - Duration::days(30),
    });
    repository
        .store_token(&stale)
        .await
        .expect("storing stale token should succeed");

    let result = service.authenticate(stale.digest()).await;

    assert!(matches!(result, Err(AccountServiceError::InvalidToken)));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn logout_revokes_the_session_and_stays_idempotent(
    repository: Arc<InMemoryAuthRepository>,
) {
    let service = service_over(&repository);
    register_account(&service, "Ana Lopez", "ana@example.com").await;
    let session = service
        .login("ana@example.com", "hunter2hunter2")
        .await
        .expect("login should succeed");

    service
        .logout(session.token())
        .await
        .expect("logout should succeed");
    service
        .logout(session.token())
        .await
        .expect("repeated logout should succeed");

    let result = service.authenticate(session.token()).await;
    assert!(matches!(result, Err(AccountServiceError::InvalidToken)));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn users_lists_accounts_ordered_by_display_name(repository: Arc<InMemoryAuthRepository>) {
    let service = service_over(&repository);
    register_account(&service, "Marta Diaz", "marta@example.com").await;
    register_account(&service, "Alonso Vega", "alonso@example.com").await;

    let users = service.users().await.expect("listing should succeed");
    let names: Vec<&str> = users.iter().map(User::full_name).collect();

    assert_eq!(names, vec!["Alonso Vega", "Marta Diaz"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn user_lookup_reports_missing_accounts(repository: Arc<InMemoryAuthRepository>) {
    let service = service_over(&repository);
    let missing = UserId::new();

    let result = service.user(missing).await;

    assert!(matches!(
        result,
        Err(AccountServiceError::UserNotFound(id)) if id == missing
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn repository_failures_surface_as_service_errors() {
    let mut mock = MockAuthStore::new();
    mock.expect_list_users()
        .returning(|| Err(AuthRepositoryError::persistence(std::io::Error::other("db down"))));
    let service = AccountService::new(Arc::new(mock), Arc::new(DefaultClock));

    let result = service.users().await;

    assert!(matches!(
        result,
        Err(AccountServiceError::Repository(
            AuthRepositoryError::Persistence(_)
        ))
    ));
}
