//! Resume-or-start use case.
//!
//! On page load the session id is read from the address. A cached session
//! under that id is rebuilt and, when it is linked to a backend session, its
//! filled PDF is fetched again. Anything else starts a fresh session and
//! writes its id into the address.

use std::sync::Arc;

use formfill_core::pdf::FilledPdfSource;
use formfill_core::session::{LoadedSession, Session, SessionStore, new_session};
use formfill_infrastructure::UrlSessionCorrelator;

/// How the session handed to the UI came to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOrigin {
    /// Rebuilt from the local cache.
    Restored,
    /// Newly created.
    Fresh,
}

/// The session the UI should show, plus its backend correlation id.
#[derive(Debug, Clone)]
pub struct ResumedSession {
    pub session: Session,
    pub user_session_id: Option<String>,
    pub origin: SessionOrigin,
}

/// Ties the session store, the address and the backend PDF source together.
pub struct SessionResumer {
    store: Arc<dyn SessionStore>,
    correlator: UrlSessionCorrelator,
    pdf_source: Arc<dyn FilledPdfSource>,
}

impl SessionResumer {
    pub fn new(
        store: Arc<dyn SessionStore>,
        correlator: UrlSessionCorrelator,
        pdf_source: Arc<dyn FilledPdfSource>,
    ) -> Self {
        Self {
            store,
            correlator,
            pdf_source,
        }
    }

    /// Restores the session named in the address, or starts a new one.
    ///
    /// Never fails: a missing or unreadable cache entry starts fresh and a
    /// failed PDF fetch leaves the restored session without a filled PDF.
    /// An id in the address that is not cached is replaced by the new id.
    pub async fn resume_or_start(&self) -> ResumedSession {
        if let Some(session_id) = self.correlator.get_session_id_from_url() {
            if let Some(loaded) = self.store.load(&session_id) {
                return self.restore(loaded).await;
            }
            tracing::info!(session_id = %session_id, "Session in address is not cached; starting fresh");
        }

        let session = new_session();
        self.correlator.set_session_id_in_url(session.id());
        tracing::info!(session_id = %session.id(), "Started new session");

        ResumedSession {
            session,
            user_session_id: None,
            origin: SessionOrigin::Fresh,
        }
    }

    /// Caches the session after a mutation. Best effort.
    pub fn persist(&self, session: &Session, user_session_id: Option<&str>) {
        self.store.save(session, user_session_id);
    }

    async fn restore(&self, loaded: LoadedSession) -> ResumedSession {
        let user_session_id = loaded.user_session_id.clone();
        let mut session = loaded.into_session();

        if let Some(backend_id) = user_session_id.as_deref() {
            match self.pdf_source.fetch_filled_pdf(backend_id).await {
                Ok(bytes) => session.set_filled_pdf(bytes),
                Err(e) => {
                    tracing::warn!(
                        session_id = %session.id(),
                        user_session_id = %backend_id,
                        error = %e,
                        "Failed to fetch filled PDF; continuing without it"
                    );
                }
            }
        }

        tracing::info!(
            session_id = %session.id(),
            messages = session.messages.len(),
            has_filled_pdf = session.has_filled_pdf(),
            "Restored session"
        );

        ResumedSession {
            session,
            user_session_id,
            origin: SessionOrigin::Restored,
        }
    }
}
