//! In-memory port stubs shared by handler tests.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::ports::{
    CorpusStore, CorpusStoreError, DocumentPersistenceError, DocumentRepository, LoginService,
    PasswordHashError, PasswordHasher, PipelineError, QaPipeline, TokenError, TokenService,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    AccessToken, Answer, Document, EmailAddress, Error, IndexBuildRequest, LoginCredentials,
    QaQuery, QaResult, TokenClaims, User, UserId, Username,
};
use crate::inbound::http::state::HttpState;

/// Users keyed by username alongside their stored password hash.
#[derive(Default)]
pub struct StubUserRepository {
    store: Mutex<HashMap<String, (User, String)>>,
}

#[async_trait]
impl UserRepository for StubUserRepository {
    async fn create(&self, user: &User, password_hash: &str) -> Result<(), UserPersistenceError> {
        let mut guard = self.store.lock().expect("store poisoned");
        let duplicate = guard.contains_key(user.username().as_str())
            || guard
                .values()
                .any(|(existing, _)| existing.email() == user.email());
        if duplicate {
            return Err(UserPersistenceError::duplicate("users_username_key"));
        }
        guard.insert(
            user.username().as_str().to_owned(),
            (user.clone(), password_hash.to_owned()),
        );
        Ok(())
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError> {
        let guard = self.store.lock().expect("store poisoned");
        Ok(guard.get(username.as_str()).map(|(user, _)| user.clone()))
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let guard = self.store.lock().expect("store poisoned");
        Ok(guard
            .values()
            .find(|(user, _)| user.id() == id)
            .map(|(user, _)| user.clone()))
    }

    async fn find_credentials(
        &self,
        username: &Username,
    ) -> Result<Option<(User, String)>, UserPersistenceError> {
        let guard = self.store.lock().expect("store poisoned");
        Ok(guard.get(username.as_str()).cloned())
    }
}

/// Append-only in-memory document list.
#[derive(Default)]
pub struct StubDocumentRepository {
    store: Mutex<Vec<Document>>,
}

#[async_trait]
impl DocumentRepository for StubDocumentRepository {
    async fn insert(&self, document: &Document) -> Result<(), DocumentPersistenceError> {
        self.store
            .lock()
            .expect("store poisoned")
            .push(document.clone());
        Ok(())
    }

    async fn list_by_owner(
        &self,
        owner_id: &UserId,
    ) -> Result<Vec<Document>, DocumentPersistenceError> {
        let guard = self.store.lock().expect("store poisoned");
        let mut documents: Vec<Document> = guard
            .iter()
            .filter(|doc| doc.owner_id() == owner_id)
            .cloned()
            .collect();
        documents.sort_by_key(|doc| std::cmp::Reverse(doc.created_at()));
        Ok(documents)
    }
}

/// Transparent "hash" so tests avoid real argon2 work.
pub struct PlainHasher;

impl PasswordHasher for PlainHasher {
    fn hash(&self, password: &str) -> Result<String, PasswordHashError> {
        Ok(format!("plain${password}"))
    }

    fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, PasswordHashError> {
        Ok(stored_hash == format!("plain${password}"))
    }
}

/// Login service resolving credentials against the stub repository.
pub struct StubLoginService {
    users: Arc<StubUserRepository>,
}

#[async_trait]
impl LoginService for StubLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        let username = Username::new(credentials.username())
            .map_err(|_| Error::unauthorized("Incorrect username or password"))?;
        let found = self
            .users
            .find_credentials(&username)
            .await
            .map_err(|err| Error::internal(err.to_string()))?;
        match found {
            Some((user, hash))
                if PlainHasher
                    .verify(credentials.password(), &hash)
                    .unwrap_or(false) =>
            {
                Ok(user)
            }
            _ => Err(Error::unauthorized("Incorrect username or password")),
        }
    }
}

/// Unsigned token carrying `uid|username`; parseable without a key.
pub struct StubTokenService;

impl TokenService for StubTokenService {
    fn issue(&self, user: &User) -> Result<AccessToken, TokenError> {
        Ok(AccessToken::bearer(format!(
            "{}|{}",
            user.id(),
            user.username()
        )))
    }

    fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let (uid, sub) = token.split_once('|').ok_or(TokenError::Invalid)?;
        let uid = Uuid::parse_str(uid).map_err(|_| TokenError::Invalid)?;
        Ok(TokenClaims {
            sub: sub.to_owned(),
            uid: UserId::from_uuid(uid),
            exp: i64::MAX,
        })
    }
}

/// Records saved file names per user without touching the filesystem.
#[derive(Default)]
pub struct StubCorpusStore {
    files: Mutex<HashMap<Uuid, Vec<String>>>,
}

#[async_trait]
impl CorpusStore for StubCorpusStore {
    async fn save_file(
        &self,
        user_id: &UserId,
        file_name: &str,
        _source: &Path,
    ) -> Result<PathBuf, CorpusStoreError> {
        let mut guard = self.files.lock().expect("files poisoned");
        guard
            .entry(*user_id.as_uuid())
            .or_default()
            .push(file_name.to_owned());
        Ok(self.corpus_dir(user_id).join(file_name))
    }

    async fn clear(&self, user_id: &UserId) -> Result<usize, CorpusStoreError> {
        let mut guard = self.files.lock().expect("files poisoned");
        Ok(guard.remove(user_id.as_uuid()).map_or(0, |files| files.len()))
    }

    fn corpus_dir(&self, user_id: &UserId) -> PathBuf {
        PathBuf::from("/tmp/corpus").join(user_id.to_string())
    }
}

/// Pipeline stub answering every question with one canned span.
pub struct StubQaPipeline;

#[async_trait]
impl QaPipeline for StubQaPipeline {
    async fn build_index(&self, _request: &IndexBuildRequest) -> Result<(), PipelineError> {
        Ok(())
    }

    async fn run_query(&self, query: &QaQuery) -> Result<QaResult, PipelineError> {
        Ok(QaResult {
            query: query.question.as_str().to_owned(),
            answers: vec![Answer {
                answer: "a canned answer".to_owned(),
                score: 0.5,
                context: None,
                document_id: None,
                span: None,
            }],
        })
    }
}

/// Fully stubbed dependency bundle for handler tests.
pub fn stub_state() -> HttpState {
    let users = Arc::new(StubUserRepository::default());
    HttpState {
        users: users.clone(),
        documents: Arc::new(StubDocumentRepository::default()),
        login: Arc::new(StubLoginService {
            users: users.clone(),
        }),
        tokens: Arc::new(StubTokenService),
        hasher: Arc::new(PlainHasher),
        corpus: Arc::new(StubCorpusStore::default()),
        pipeline: Arc::new(StubQaPipeline),
    }
}

/// A valid user fixture with a deterministic email.
pub fn test_user(name: &str) -> User {
    User::new(
        UserId::random(),
        Username::new(name).expect("valid username"),
        EmailAddress::new(format!("{name}@example.com")).expect("valid email"),
        None,
    )
}

/// Register `name` with `password` through the stub state's ports.
pub async fn register_user(state: &HttpState, name: &str, password: &str) -> User {
    let user = test_user(name);
    let hash = state.hasher.hash(password).expect("hash");
    state.users.create(&user, &hash).await.expect("seed user");
    user
}

/// Issue a bearer token for `user` via the state's token service.
pub fn bearer_for(state: &HttpState, user: &User) -> String {
    state
        .tokens
        .issue(user)
        .expect("token issued")
        .access_token()
        .to_owned()
}
