//! Admin dashboard state and its reconciliation with the document store.
//!
//! The dashboard owns two local lists mirroring the `projects` and `skills`
//! collections, the current network status and a single error banner string.
//! Every remote operation catches its own failure, appends a message to the
//! banner and leaves the dashboard usable.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use super::connectivity::{check_connection, ConnectivityEvent, NetworkStatus};
use super::strategy::{FallbackChain, WriteOutcome, WritePlan};
use crate::auth::{Session, SessionAuthority};
use crate::config::SyncConfig;
use crate::domain::{Project, ProjectForm, Record, Skill, SkillForm};
use crate::error::{FolioError, FolioResult};
use crate::site::{self, Navigation, SiteRoute};
use crate::store::DocumentStore;

/// Appended to a write error when every attempt failed for a transient reason.
pub const RETRY_HINT: &str = " The connection looks unstable; retry when back online.";

/// Asks the operator to confirm a destructive action.
pub trait Confirm: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

pub struct AdminDashboard {
    store: Arc<dyn DocumentStore>,
    session: Session,
    config: SyncConfig,
    projects: Vec<Project>,
    skills: Vec<Skill>,
    error: String,
    network: NetworkStatus,
    loading: bool,
}

/// Record kinds with a local list on the dashboard.
trait Mirrored: Record {
    fn local(dashboard: &AdminDashboard) -> &Vec<Self>;
    fn local_mut(dashboard: &mut AdminDashboard) -> &mut Vec<Self>;
}

impl Mirrored for Project {
    fn local(dashboard: &AdminDashboard) -> &Vec<Self> {
        &dashboard.projects
    }

    fn local_mut(dashboard: &mut AdminDashboard) -> &mut Vec<Self> {
        &mut dashboard.projects
    }
}

impl Mirrored for Skill {
    fn local(dashboard: &AdminDashboard) -> &Vec<Self> {
        &dashboard.skills
    }

    fn local_mut(dashboard: &mut AdminDashboard) -> &mut Vec<Self> {
        &mut dashboard.skills
    }
}

impl AdminDashboard {
    /// Open the dashboard for a session.
    ///
    /// Returns the redirect when the session may not see the dashboard.
    /// Call [`AdminDashboard::load_data`] afterwards to fill the lists.
    pub fn open(
        store: Arc<dyn DocumentStore>,
        session: Session,
        config: SyncConfig,
    ) -> Result<Self, Navigation> {
        match site::guard(SiteRoute::AdminDashboard, &session) {
            Navigation::Render(_) => Ok(Self {
                store,
                session,
                config,
                projects: Vec::new(),
                skills: Vec::new(),
                error: String::new(),
                network: NetworkStatus::Online,
                loading: false,
            }),
            redirect => Err(redirect),
        }
    }

    /// Open the dashboard and seed the network status from a store ping.
    ///
    /// An unreachable store starts the dashboard offline with the store's
    /// network disabled, so writes stay suspended until a retry or an
    /// online event reconnects it.
    pub async fn connect(
        store: Arc<dyn DocumentStore>,
        session: Session,
        config: SyncConfig,
    ) -> Result<Self, Navigation> {
        let mut dashboard = Self::open(store, session, config)?;
        let timeout = Duration::from_millis(dashboard.config.connect_timeout_ms);
        if check_connection(dashboard.store.as_ref(), timeout).await == NetworkStatus::Offline {
            dashboard.handle_connectivity(ConnectivityEvent::Offline).await;
        }
        Ok(dashboard)
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn skills(&self) -> &[Skill] {
        &self.skills
    }

    /// The error banner. Empty when there is nothing to show.
    pub fn error(&self) -> &str {
        &self.error
    }

    pub fn network_status(&self) -> NetworkStatus {
        self.network
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Prefilled form for editing a local project.
    pub fn project_form(&self, id: &str) -> Option<ProjectForm> {
        self.projects
            .iter()
            .find(|p| p.id == id)
            .map(ProjectForm::from_project)
    }

    pub fn skill_form(&self, id: &str) -> Option<SkillForm> {
        self.skills
            .iter()
            .find(|s| s.id == id)
            .map(SkillForm::from_skill)
    }

    /// Reload both collections. A failure in one does not stop the other.
    pub async fn load_data(&mut self) {
        self.loading = true;
        self.error.clear();

        match self.fetch::<Project>().await {
            Ok(projects) => self.projects = projects,
            Err(e) => {
                self.projects.clear();
                self.report(format!("Projects: {}. ", e));
            }
        }

        match self.fetch::<Skill>().await {
            Ok(skills) => self.skills = skills,
            Err(e) => {
                self.skills.clear();
                self.report(format!("Skills: {}", e));
            }
        }

        if self.projects.is_empty() && self.skills.is_empty() && self.error.is_empty() {
            tracing::warn!("No projects or skills loaded; the store may be denying reads");
        }

        tracing::info!(
            projects = self.projects.len(),
            skills = self.skills.len(),
            "Dashboard data loaded"
        );
        self.loading = false;
    }

    /// Re-enable the store's network, let it settle, then reload.
    pub async fn retry_load_data(&mut self) {
        match self.store.enable_network().await {
            Ok(()) => self.network = NetworkStatus::Online,
            Err(e) => tracing::warn!(error = %e, "Failed to re-enable store network"),
        }

        tokio::time::sleep(Duration::from_millis(self.config.settle_delay_ms)).await;
        self.load_data().await;
    }

    /// The status only turns online once the store accepted the reconnect.
    pub async fn handle_connectivity(&mut self, event: ConnectivityEvent) {
        tracing::info!(event = ?event, "Connectivity changed");

        match event {
            ConnectivityEvent::Offline => {
                self.network = NetworkStatus::Offline;
                if let Err(e) = self.store.disable_network().await {
                    tracing::warn!(error = %e, "Failed to disable store network");
                }
            }
            ConnectivityEvent::Online => match self.store.enable_network().await {
                Ok(()) => {
                    self.network = NetworkStatus::Online;
                    self.load_data().await;
                }
                Err(e) => {
                    self.network = NetworkStatus::Offline;
                    self.report(format!("Error reconnecting: {}", e));
                }
            },
        }
    }

    /// Create a project, or update `editing` when given.
    pub async fn submit_project(
        &mut self,
        form: &ProjectForm,
        editing: Option<&str>,
    ) -> FolioResult<WriteOutcome> {
        let draft = match form.validate() {
            Ok(draft) => draft,
            Err(e) => {
                self.report(format!("Invalid project: {}", e));
                return Err(e);
            }
        };
        self.submit::<Project>(draft, editing).await
    }

    /// Create a skill, or update `editing` when given.
    pub async fn submit_skill(
        &mut self,
        form: &SkillForm,
        editing: Option<&str>,
    ) -> FolioResult<WriteOutcome> {
        let draft = match form.validate() {
            Ok(draft) => draft,
            Err(e) => {
                self.report(format!("Invalid skill: {}", e));
                return Err(e);
            }
        };
        self.submit::<Skill>(draft, editing).await
    }

    /// Returns `Ok(false)` when the operator declined.
    pub async fn delete_project(&mut self, id: &str, confirm: &dyn Confirm) -> FolioResult<bool> {
        self.delete::<Project>(id, confirm).await
    }

    pub async fn delete_skill(&mut self, id: &str, confirm: &dyn Confirm) -> FolioResult<bool> {
        self.delete::<Skill>(id, confirm).await
    }

    /// End the session. Returns the route to navigate to on success.
    pub async fn sign_out(&mut self, authority: &dyn SessionAuthority) -> Option<SiteRoute> {
        match authority.sign_out(&self.session).await {
            Ok(()) => {
                if let Err(e) = self.session.sign_out() {
                    tracing::debug!(error = %e, "Session already inactive");
                }
                Some(SiteRoute::AdminLogin)
            }
            Err(e) => {
                self.report(format!("Error signing out: {}", e));
                None
            }
        }
    }

    async fn fetch<R: Record>(&self) -> FolioResult<Vec<R>> {
        let docs = self.store.get_all(R::COLLECTION).await?;
        Ok(docs
            .into_iter()
            .filter_map(|doc| {
                let id = doc.id.clone();
                match R::from_document(doc) {
                    Ok(record) => Some(record),
                    Err(e) => {
                        tracing::warn!(
                            collection = %R::COLLECTION,
                            id = %id,
                            error = %e,
                            "Skipping invalid document"
                        );
                        None
                    }
                }
            })
            .collect())
    }

    async fn submit<R: Mirrored>(
        &mut self,
        draft: R::Draft,
        editing: Option<&str>,
    ) -> FolioResult<WriteOutcome> {
        self.ensure_online(R::LABEL)?;
        self.error.clear();

        let fields = R::draft_fields(&draft);
        let plan = match editing {
            None => WritePlan::create(R::COLLECTION, fields),
            Some(id) => {
                let existing = R::local(self).iter().find(|r| r.id() == id);
                WritePlan::update(
                    R::COLLECTION,
                    id,
                    fields,
                    existing.and_then(|r| r.created_at()),
                    existing.and_then(|r| r.updated_at()),
                )
            }
        };

        let outcome = FallbackChain::for_plan(&plan)
            .with_conflict_policy(self.config.conflict_policy)
            .execute(self.store.as_ref(), &plan)
            .await;

        match &outcome {
            WriteOutcome::Succeeded { id, strategy, .. } => {
                tracing::info!(
                    collection = %R::COLLECTION,
                    id = %id,
                    strategy = %strategy,
                    "Saved {}",
                    R::LABEL
                );
                let list = R::local_mut(self);
                match editing {
                    // Store timestamps are unknown until the next load.
                    None => list.push(R::from_draft(draft, id.clone(), Some(Utc::now()), None)),
                    Some(_) => match list.iter_mut().find(|r| r.id() == id.as_str()) {
                        Some(slot) => {
                            let created_at = slot.created_at();
                            *slot = R::from_draft(draft, id.clone(), created_at, None);
                        }
                        None => tracing::debug!(id = %id, "Updated record is not in the local list"),
                    },
                }
            }
            WriteOutcome::Failed { .. } => {
                let verb = if editing.is_some() { "updating" } else { "adding" };
                let reason = outcome
                    .last_error()
                    .map(ToString::to_string)
                    .unwrap_or_else(|| "no write strategy configured".to_string());
                self.report(format!("Error {} {}: {}", verb, R::LABEL, reason));
                if outcome.is_transient() {
                    self.error.push_str(RETRY_HINT);
                }
            }
        }

        Ok(outcome)
    }

    async fn delete<R: Mirrored>(&mut self, id: &str, confirm: &dyn Confirm) -> FolioResult<bool> {
        let prompt = format!("Are you sure you want to delete this {}?", R::LABEL);
        if !confirm.confirm(&prompt) {
            tracing::debug!(collection = %R::COLLECTION, id = %id, "Delete declined");
            return Ok(false);
        }
        self.ensure_online(R::LABEL)?;

        match self.store.delete(R::COLLECTION, id).await {
            Ok(()) => {
                R::local_mut(self).retain(|r| r.id() != id);
                tracing::info!(collection = %R::COLLECTION, id = %id, "Deleted {}", R::LABEL);
                Ok(true)
            }
            Err(e) => {
                self.report(format!("Error deleting {}: {}", R::LABEL, e));
                Err(e)
            }
        }
    }

    /// Writes are suspended while offline.
    fn ensure_online(&mut self, label: &str) -> FolioResult<()> {
        if self.network == NetworkStatus::Offline {
            let e = FolioError::Unavailable(format!(
                "you are offline; the {} cannot be saved until the connection is restored",
                label
            ));
            self.report(e.to_string());
            return Err(e);
        }
        Ok(())
    }

    fn report(&mut self, message: String) {
        tracing::error!(error = %message, "Dashboard operation failed");
        self.error.push_str(&message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{JwtManager, SessionUser, UserRole};
    use crate::store::{Collection, InMemoryDocumentStore, RemoteDocumentStore};
    use crate::sync::testing::{FlakyStore, Op};
    use crate::sync::WriteStrategy;
    use tokio_test::{assert_err, assert_ok};

    fn admin_session() -> Session {
        Session::authenticated(
            "token",
            SessionUser {
                id: "u1".to_string(),
                email: "admin@example.com".to_string(),
                role: UserRole::Admin,
            },
        )
    }

    fn quick_config() -> SyncConfig {
        SyncConfig {
            settle_delay_ms: 0,
            ..SyncConfig::default()
        }
    }

    fn setup() -> (Arc<FlakyStore>, AdminDashboard) {
        crate::logging::init_test();
        let store = Arc::new(FlakyStore::new(Arc::new(InMemoryDocumentStore::new())));
        let dashboard =
            AdminDashboard::open(store.clone(), admin_session(), quick_config()).unwrap();
        (store, dashboard)
    }

    fn project_form(title: &str) -> ProjectForm {
        ProjectForm {
            title: title.to_string(),
            description: "Realtime chat".to_string(),
            image_url: "https://example.com/chat.png".to_string(),
            live_url: String::new(),
            github_url: "https://github.com/example/chat".to_string(),
            technologies: "Rust, tokio, ".to_string(),
            featured: true,
        }
    }

    fn skill_form(proficiency: i64) -> SkillForm {
        SkillForm {
            name: "Rust".to_string(),
            icon: "rust.svg".to_string(),
            category: "backend".to_string(),
            proficiency,
        }
    }

    #[tokio::test]
    async fn test_create_project_appends_one_entry() {
        let (store, mut dashboard) = setup();

        let outcome = dashboard
            .submit_project(&project_form("Chat"), None)
            .await
            .unwrap();

        assert_eq!(outcome.strategy(), Some(WriteStrategy::BatchWrite));
        assert_eq!(dashboard.projects().len(), 1);
        let project = &dashboard.projects()[0];
        assert_eq!(project.title, "Chat");
        assert_eq!(project.technologies, vec!["Rust", "tokio"]);
        assert!(project.created_at.is_some());
        assert_eq!(store.calls(Op::CommitBatch), 1);
        assert_eq!(store.calls(Op::Add), 0);
        assert!(dashboard.error().is_empty());
    }

    #[tokio::test]
    async fn test_create_falls_back_to_add() {
        let (store, mut dashboard) = setup();
        store.fail(Op::CommitBatch);

        let outcome = dashboard.submit_skill(&skill_form(80), None).await.unwrap();

        assert_eq!(outcome.strategy(), Some(WriteStrategy::AddDocument));
        assert_eq!(dashboard.skills().len(), 1);
        assert_eq!(dashboard.skills()[0].id, outcome.id().unwrap());
    }

    #[tokio::test]
    async fn test_update_with_overwrite_fallback_keeps_single_entry() {
        let (store, mut dashboard) = setup();
        dashboard.submit_project(&project_form("Chat"), None).await.unwrap();
        dashboard.load_data().await;
        let id = dashboard.projects()[0].id.clone();
        let created_at = dashboard.projects()[0].created_at;

        store.fail(Op::Update);
        let mut form = dashboard.project_form(&id).unwrap();
        form.title = "Chat v2".to_string();
        let outcome = dashboard.submit_project(&form, Some(&id)).await.unwrap();

        assert_eq!(outcome.strategy(), Some(WriteStrategy::Overwrite));
        assert_eq!(dashboard.projects().len(), 1);
        assert_eq!(dashboard.projects()[0].title, "Chat v2");
        assert_eq!(dashboard.projects()[0].created_at, created_at);

        let stored = store
            .inner()
            .get(Collection::Projects, &id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.timestamp("createdAt"), created_at);
    }

    #[tokio::test]
    async fn test_update_merges_when_possible() {
        let (store, mut dashboard) = setup();
        dashboard.submit_skill(&skill_form(40), None).await.unwrap();
        let id = dashboard.skills()[0].id.clone();

        let outcome = dashboard.submit_skill(&skill_form(75), Some(&id)).await.unwrap();

        assert_eq!(outcome.strategy(), Some(WriteStrategy::MergeUpdate));
        assert_eq!(store.calls(Op::Set), 0);
        assert_eq!(dashboard.skills().len(), 1);
        assert_eq!(dashboard.skills()[0].proficiency, 75);
    }

    #[tokio::test]
    async fn test_declined_delete_makes_no_call() {
        let (store, mut dashboard) = setup();
        dashboard.submit_skill(&skill_form(50), None).await.unwrap();
        let id = dashboard.skills()[0].id.clone();
        let before = store.total_calls();

        let deleted = dashboard.delete_skill(&id, &|_: &str| false).await.unwrap();

        assert!(!deleted);
        assert_eq!(dashboard.skills().len(), 1);
        assert_eq!(store.total_calls(), before);
    }

    #[tokio::test]
    async fn test_confirmed_delete_removes_locally() {
        let (store, mut dashboard) = setup();
        dashboard.submit_project(&project_form("Chat"), None).await.unwrap();
        let id = dashboard.projects()[0].id.clone();

        let prompt_seen = std::sync::Mutex::new(String::new());
        let confirm = |p: &str| {
            *prompt_seen.lock().unwrap() = p.to_string();
            true
        };
        assert!(dashboard.delete_project(&id, &confirm).await.unwrap());

        assert!(dashboard.projects().is_empty());
        assert!(prompt_seen.lock().unwrap().contains("project"));
        assert!(store
            .inner()
            .get(Collection::Projects, &id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_local_state() {
        let (store, mut dashboard) = setup();
        dashboard.submit_skill(&skill_form(50), None).await.unwrap();
        let id = dashboard.skills()[0].id.clone();
        store.fail(Op::Delete);

        assert_err!(dashboard.delete_skill(&id, &|_: &str| true).await);
        assert_eq!(dashboard.skills().len(), 1);
        assert!(dashboard.error().starts_with("Error deleting skill:"));
    }

    #[tokio::test]
    async fn test_offline_suspends_writes_until_reconnect() {
        let (store, mut dashboard) = setup();

        dashboard.handle_connectivity(ConnectivityEvent::Offline).await;
        assert_eq!(dashboard.network_status(), NetworkStatus::Offline);
        assert_eq!(store.network_calls(), vec![false]);

        let err = dashboard
            .submit_project(&project_form("Chat"), None)
            .await
            .unwrap_err();
        assert!(err.is_transient());
        assert!(dashboard.error().contains("offline"));
        assert_err!(dashboard.delete_project("any", &|_: &str| true).await);
        assert_eq!(store.total_calls(), 0);

        dashboard.handle_connectivity(ConnectivityEvent::Online).await;
        assert_eq!(dashboard.network_status(), NetworkStatus::Online);
        assert_eq!(store.network_calls(), vec![false, true]);
        assert_eq!(store.calls(Op::GetAll(Collection::Projects)), 1);
        assert_eq!(store.calls(Op::GetAll(Collection::Skills)), 1);

        assert_ok!(dashboard.submit_project(&project_form("Chat"), None).await);
        assert_eq!(dashboard.projects().len(), 1);
    }

    #[tokio::test]
    async fn test_out_of_range_proficiency_rejected_locally() {
        let (store, mut dashboard) = setup();

        assert_err!(dashboard.submit_skill(&skill_form(0), None).await);
        assert_err!(dashboard.submit_skill(&skill_form(101), None).await);

        assert_eq!(store.total_calls(), 0);
        assert!(dashboard.skills().is_empty());
        assert!(dashboard.error().contains("Invalid skill"));
    }

    #[tokio::test]
    async fn test_partial_load_failure() {
        let (store, mut dashboard) = setup();
        dashboard.submit_project(&project_form("Chat"), None).await.unwrap();
        dashboard.submit_skill(&skill_form(90), None).await.unwrap();
        store.fail(Op::GetAll(Collection::Projects));

        dashboard.load_data().await;

        assert!(dashboard.projects().is_empty());
        assert_eq!(dashboard.skills().len(), 1);
        assert!(dashboard.error().starts_with("Projects: "));
        assert!(!dashboard.is_loading());
    }

    #[tokio::test]
    async fn test_both_loads_failing_combine_messages() {
        let (store, mut dashboard) = setup();
        store.fail(Op::GetAll(Collection::Projects));
        store.fail(Op::GetAll(Collection::Skills));

        dashboard.load_data().await;

        let banner = dashboard.error();
        assert!(banner.starts_with("Projects: "));
        assert!(banner.contains(". Skills: "));
    }

    #[tokio::test]
    async fn test_transient_failure_adds_retry_hint() {
        let (store, mut dashboard) = setup();
        store.fail(Op::CommitBatch);
        store.fail(Op::Add);

        let outcome = dashboard.submit_skill(&skill_form(60), None).await.unwrap();

        assert!(!outcome.is_success());
        assert!(dashboard.skills().is_empty());
        assert!(dashboard.error().starts_with("Error adding skill:"));
        assert!(dashboard.error().ends_with(RETRY_HINT));
    }

    #[tokio::test]
    async fn test_retry_reconnects_and_reloads() {
        let (store, mut dashboard) = setup();
        dashboard.submit_skill(&skill_form(60), None).await.unwrap();
        dashboard.handle_connectivity(ConnectivityEvent::Offline).await;

        dashboard.retry_load_data().await;

        assert_eq!(dashboard.network_status(), NetworkStatus::Online);
        assert_eq!(store.network_calls(), vec![false, true]);
        assert_eq!(dashboard.skills().len(), 1);
        assert!(dashboard.error().is_empty());
    }

    #[tokio::test]
    async fn test_failed_reconnect_stays_offline_until_retry() {
        let (store, mut dashboard) = setup();
        dashboard.submit_skill(&skill_form(60), None).await.unwrap();
        dashboard.handle_connectivity(ConnectivityEvent::Offline).await;
        store.fail_enables(1);

        dashboard.handle_connectivity(ConnectivityEvent::Online).await;
        assert_eq!(dashboard.network_status(), NetworkStatus::Offline);
        assert!(dashboard.error().starts_with("Error reconnecting: "));
        assert_err!(dashboard.submit_skill(&skill_form(70), None).await);

        dashboard.retry_load_data().await;

        assert_eq!(store.network_calls(), vec![false, true, true]);
        assert_eq!(dashboard.network_status(), NetworkStatus::Online);
        assert_eq!(dashboard.skills().len(), 1);
        assert!(dashboard.error().is_empty());
    }

    #[tokio::test]
    async fn test_retry_reenables_even_when_status_is_online() {
        let (store, mut dashboard) = setup();
        dashboard.submit_project(&project_form("Chat"), None).await.unwrap();
        store.go_offline();

        dashboard.load_data().await;
        assert!(dashboard.error().starts_with("Projects: "));

        dashboard.retry_load_data().await;
        assert_eq!(store.network_calls(), vec![true]);
        assert_eq!(dashboard.projects().len(), 1);
        assert!(dashboard.error().is_empty());
    }

    #[tokio::test]
    async fn test_failed_retry_keeps_status() {
        let (store, mut dashboard) = setup();
        dashboard.handle_connectivity(ConnectivityEvent::Offline).await;
        store.fail_enables(1);

        dashboard.retry_load_data().await;

        assert_eq!(dashboard.network_status(), NetworkStatus::Offline);
        assert!(dashboard.error().starts_with("Projects: "));
    }

    #[tokio::test]
    async fn test_connect_to_unreachable_store_starts_offline() {
        crate::logging::init_test();
        let store: Arc<dyn DocumentStore> = Arc::new(
            RemoteDocumentStore::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap(),
        );
        let config = SyncConfig {
            connect_timeout_ms: 2000,
            ..quick_config()
        };

        let mut dashboard = AdminDashboard::connect(store, admin_session(), config)
            .await
            .unwrap();

        assert_eq!(dashboard.network_status(), NetworkStatus::Offline);
        let err = dashboard
            .submit_project(&project_form("Chat"), None)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("offline"));
    }

    #[tokio::test]
    async fn test_connect_to_reachable_store_starts_online() {
        crate::logging::init_test();
        let store = Arc::new(FlakyStore::new(Arc::new(InMemoryDocumentStore::new())));

        let dashboard = AdminDashboard::connect(store.clone(), admin_session(), quick_config())
            .await
            .unwrap();

        assert_eq!(dashboard.network_status(), NetworkStatus::Online);
        assert!(store.network_calls().is_empty());
    }

    #[tokio::test]
    async fn test_connect_requires_session() {
        let store: Arc<dyn DocumentStore> = Arc::new(InMemoryDocumentStore::new());
        let result = AdminDashboard::connect(store, Session::SignedOut, quick_config()).await;
        assert_eq!(
            result.err(),
            Some(Navigation::Redirect(SiteRoute::AdminLogin))
        );
    }

    #[test]
    fn test_open_requires_session() {
        let store: Arc<dyn DocumentStore> = Arc::new(InMemoryDocumentStore::new());
        let result = AdminDashboard::open(store, Session::Unauthenticated, quick_config());
        assert_eq!(
            result.err(),
            Some(Navigation::Redirect(SiteRoute::AdminLogin))
        );
    }

    #[tokio::test]
    async fn test_sign_out_revokes_and_redirects() {
        let jwt = JwtManager::new("secret", "folio-core".to_string(), 1);
        let token = jwt
            .generate_token("u1", "admin@example.com", UserRole::Admin)
            .unwrap();
        let claims = jwt.validate_token(&token).await.unwrap();
        let session = Session::authenticated(token.clone(), SessionUser::from(&claims));
        let store: Arc<dyn DocumentStore> = Arc::new(InMemoryDocumentStore::new());
        let mut dashboard = AdminDashboard::open(store, session, quick_config()).unwrap();

        assert_eq!(dashboard.sign_out(&jwt).await, Some(SiteRoute::AdminLogin));
        assert_eq!(dashboard.session(), &Session::SignedOut);
        assert!(jwt.validate_token(&token).await.is_err());
    }

    #[tokio::test]
    async fn test_sign_out_failure_is_reported() {
        let jwt = JwtManager::new("secret", "folio-core".to_string(), 1);
        let (_, mut dashboard) = setup();

        assert_eq!(dashboard.sign_out(&jwt).await, None);
        assert!(dashboard.error().starts_with("Error signing out: "));
        assert!(dashboard.session().is_authenticated());
    }
}
