// src/session.rs
//! In-memory candidate sessions

use crate::candidate::CandidateProfile;
use crate::postings::Posting;
use chrono::{DateTime, Duration, Local};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

pub const DEFAULT_SESSION_TTL_MINUTES: i64 = 120;

#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub id: Uuid,
    pub candidate: CandidateProfile,
    pub postings: Vec<Posting>,
    /// Generated reports keyed by posting number.
    pub reports: BTreeMap<usize, String>,
    pub active_report: Option<usize>,
    pub created_at: DateTime<Local>,
    pub last_used: DateTime<Local>,
}

impl Session {
    fn new(candidate: CandidateProfile) -> Self {
        let now = Local::now();
        Self {
            id: Uuid::new_v4(),
            candidate,
            postings: Vec::new(),
            reports: BTreeMap::new(),
            active_report: None,
            created_at: now,
            last_used: now,
        }
    }

    pub fn posting(&self, number: usize) -> Option<&Posting> {
        self.postings.iter().find(|p| p.number == number)
    }

    /// Forget postings and reports, keep the candidate.
    pub fn clear_results(&mut self) {
        self.postings.clear();
        self.reports.clear();
        self.active_report = None;
    }
}

/// Sessions idle for longer than `ttl` are dropped whenever a new one is
/// created.
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Session>>,
    ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_ttl(Duration::minutes(DEFAULT_SESSION_TTL_MINUTES))
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub async fn create(&self, candidate: CandidateProfile) -> Session {
        let session = Session::new(candidate);
        let mut sessions = self.sessions.write().await;
        evict_idle(&mut sessions, session.created_at - self.ttl);
        sessions.insert(session.id, session.clone());
        session
    }

    pub async fn get(&self, id: &Uuid) -> Option<Session> {
        let mut sessions = self.sessions.write().await;
        let session = touch(&mut sessions, id)?;
        Some(session.clone())
    }

    pub async fn remove(&self, id: &Uuid) -> Option<Session> {
        self.sessions.write().await.remove(id)
    }

    /// Drop sessions last used before `now - ttl`. Returns how many went.
    pub async fn evict_expired_at(&self, now: DateTime<Local>) -> usize {
        evict_idle(&mut *self.sessions.write().await, now - self.ttl)
    }

    /// Replace the postings of a session. Previous reports no longer apply.
    pub async fn set_postings(&self, id: &Uuid, postings: Vec<Posting>) -> Option<Session> {
        let mut sessions = self.sessions.write().await;
        let session = touch(&mut sessions, id)?;
        session.clear_results();
        session.postings = postings;
        Some(session.clone())
    }

    pub async fn clear_results(&self, id: &Uuid) -> Option<Session> {
        let mut sessions = self.sessions.write().await;
        let session = touch(&mut sessions, id)?;
        session.clear_results();
        Some(session.clone())
    }

    /// Store a report and mark it active. `None` when the session or posting
    /// does not exist.
    pub async fn store_report(&self, id: &Uuid, number: usize, report: String) -> Option<()> {
        let mut sessions = self.sessions.write().await;
        let session = touch(&mut sessions, id)?;
        session.posting(number)?;
        session.reports.insert(number, report);
        session.active_report = Some(number);
        Some(())
    }

    pub async fn report(&self, id: &Uuid, number: usize) -> Option<String> {
        self.sessions
            .read()
            .await
            .get(id)
            .and_then(|s| s.reports.get(&number).cloned())
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

fn touch<'a>(sessions: &'a mut HashMap<Uuid, Session>, id: &Uuid) -> Option<&'a mut Session> {
    let session = sessions.get_mut(id)?;
    session.last_used = Local::now();
    Some(session)
}

fn evict_idle(sessions: &mut HashMap<Uuid, Session>, cutoff: DateTime<Local>) -> usize {
    let before = sessions.len();
    sessions.retain(|_, s| s.last_used >= cutoff);
    let evicted = before - sessions.len();
    if evicted > 0 {
        info!("Evicted {} idle session(s)", evicted);
    }
    evicted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::CandidateForm;

    fn profile() -> CandidateProfile {
        CandidateForm {
            name: "Ana".to_string(),
            ..CandidateForm::default()
        }
        .into_profile("cv".to_string(), "linkedin".to_string())
    }

    fn posting(number: usize) -> Posting {
        Posting {
            number,
            title: format!("Job {}", number),
            body: "## Dev".to_string(),
        }
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let store = SessionStore::new();
        assert!(store.is_empty().await);

        let session = store.create(profile()).await;
        assert_eq!(store.len().await, 1);
        assert_eq!(store.get(&session.id).await.unwrap().candidate.name, "Ana");

        store
            .set_postings(&session.id, vec![posting(1), posting(2)])
            .await
            .unwrap();
        assert!(store.store_report(&session.id, 2, "relatório".to_string()).await.is_some());
        assert!(store.store_report(&session.id, 9, "x".to_string()).await.is_none());

        let current = store.get(&session.id).await.unwrap();
        assert_eq!(current.active_report, Some(2));
        assert_eq!(store.report(&session.id, 2).await.as_deref(), Some("relatório"));

        let cleared = store.clear_results(&session.id).await.unwrap();
        assert!(cleared.postings.is_empty());
        assert!(cleared.reports.is_empty());
        assert_eq!(cleared.active_report, None);
        assert_eq!(cleared.candidate.name, "Ana");
    }

    #[tokio::test]
    async fn test_new_postings_drop_old_reports() {
        let store = SessionStore::new();
        let session = store.create(profile()).await;
        store.set_postings(&session.id, vec![posting(1)]).await;
        store.store_report(&session.id, 1, "old".to_string()).await;

        store.set_postings(&session.id, vec![posting(1)]).await;
        assert!(store.report(&session.id, 1).await.is_none());
    }

    async fn age(store: &SessionStore, id: &Uuid, by: Duration) {
        let mut sessions = store.sessions.write().await;
        let session = sessions.get_mut(id).unwrap();
        session.last_used = session.last_used - by;
    }

    #[tokio::test]
    async fn test_idle_sessions_expire() {
        let store = SessionStore::with_ttl(Duration::minutes(30));
        let old = store.create(profile()).await;
        let fresh = store.create(profile()).await;

        age(&store, &old.id, Duration::minutes(31)).await;

        let evicted = store.evict_expired_at(Local::now()).await;
        assert_eq!(evicted, 1);
        assert!(store.get(&old.id).await.is_none());
        assert!(store.get(&fresh.id).await.is_some());
    }

    #[tokio::test]
    async fn test_create_evicts_idle_sessions() {
        let store = SessionStore::with_ttl(Duration::minutes(30));
        let old = store.create(profile()).await;
        age(&store, &old.id, Duration::hours(1)).await;

        let new = store.create(profile()).await;
        assert_eq!(store.len().await, 1);
        assert!(store.get(&new.id).await.is_some());
    }

    #[tokio::test]
    async fn test_use_keeps_session_alive() {
        let store = SessionStore::with_ttl(Duration::minutes(30));
        let session = store.create(profile()).await;
        age(&store, &session.id, Duration::minutes(29)).await;

        store.get(&session.id).await.unwrap();
        assert_eq!(store.evict_expired_at(Local::now() + Duration::minutes(5)).await, 0);
    }

    #[tokio::test]
    async fn test_remove_session() {
        let store = SessionStore::new();
        let session = store.create(profile()).await;
        assert!(store.remove(&session.id).await.is_some());
        assert!(store.remove(&session.id).await.is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_unknown_session() {
        let store = SessionStore::new();
        let id = Uuid::new_v4();
        assert!(store.get(&id).await.is_none());
        assert!(store.clear_results(&id).await.is_none());
        assert!(store.set_postings(&id, Vec::new()).await.is_none());
    }
}
