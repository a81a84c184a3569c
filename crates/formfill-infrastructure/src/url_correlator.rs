//! Session id <-> page address correlation.
//!
//! The session id travels in one query parameter (`?session=<id>` by
//! default) so a reload or a shared link lands on the same session.

use std::sync::{Arc, RwLock};

use url::Url;

use formfill_core::config::UrlConfig;
use formfill_core::error::{FormFillError, Result};
use formfill_core::location::AddressBar;

/// Reads and writes the session id in the page address.
///
/// Built without an address bar (see [`UrlSessionCorrelator::detached`]) it
/// behaves as it would outside a browser: nothing is read and writes are
/// no-ops.
#[derive(Clone)]
pub struct UrlSessionCorrelator {
    address_bar: Option<Arc<dyn AddressBar>>,
    param: String,
}

impl UrlSessionCorrelator {
    pub fn new(address_bar: Arc<dyn AddressBar>) -> Self {
        Self::with_config(address_bar, &UrlConfig::default())
    }

    pub fn with_config(address_bar: Arc<dyn AddressBar>, config: &UrlConfig) -> Self {
        Self {
            address_bar: Some(address_bar),
            param: config.session_param.clone(),
        }
    }

    pub fn detached() -> Self {
        Self {
            address_bar: None,
            param: UrlConfig::default().session_param,
        }
    }

    pub fn param(&self) -> &str {
        &self.param
    }

    /// The session id in the current address, if any. An empty value counts
    /// as absent.
    pub fn try_get_session_id(&self) -> Result<Option<String>> {
        let Some(address_bar) = &self.address_bar else {
            return Ok(None);
        };

        let url = parse_href(&address_bar.href())?;
        Ok(url
            .query_pairs()
            .find(|(key, _)| key == self.param.as_str())
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty()))
    }

    /// Points the current history entry at `session_id`.
    ///
    /// The first occurrence of the parameter is rewritten and any duplicates
    /// are dropped; other parameters and the fragment are kept. A missing
    /// parameter is appended.
    pub fn try_set_session_id(&self, session_id: &str) -> Result<()> {
        let Some(address_bar) = &self.address_bar else {
            return Ok(());
        };

        let mut url = parse_href(&address_bar.href())?;

        let mut replaced = false;
        let mut pairs: Vec<(String, String)> = Vec::new();
        for (key, value) in url.query_pairs() {
            if key == self.param.as_str() {
                if !replaced {
                    pairs.push((self.param.clone(), session_id.to_string()));
                    replaced = true;
                }
            } else {
                pairs.push((key.into_owned(), value.into_owned()));
            }
        }
        if !replaced {
            pairs.push((self.param.clone(), session_id.to_string()));
        }

        url.query_pairs_mut().clear().extend_pairs(pairs);
        address_bar.replace_state(url.as_str())
    }

    pub fn get_session_id_from_url(&self) -> Option<String> {
        match self.try_get_session_id() {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!(error = %e, "Could not read session id from address");
                None
            }
        }
    }

    pub fn set_session_id_in_url(&self, session_id: &str) {
        if let Err(e) = self.try_set_session_id(session_id) {
            tracing::warn!(session_id = %session_id, error = %e, "Could not write session id to address");
        }
    }
}

fn parse_href(href: &str) -> Result<Url> {
    Url::parse(href).map_err(|e| FormFillError::address(format!("{}: {}", e, href)))
}

/// An in-memory address bar with a session history.
///
/// `replace_state` follows the browser's rule that the new address must stay
/// on the same origin.
#[derive(Debug)]
pub struct MemoryAddressBar {
    history: RwLock<Vec<String>>,
}

impl MemoryAddressBar {
    /// Starts a history with one entry.
    ///
    /// # Errors
    ///
    /// Returns an address error if `href` is not an absolute URL.
    pub fn new(href: &str) -> Result<Self> {
        let url = parse_href(href)?;
        Ok(Self {
            history: RwLock::new(vec![url.to_string()]),
        })
    }

    /// Navigates to `href`, adding a history entry.
    pub fn push_state(&self, href: &str) -> Result<()> {
        let url = parse_href(href)?;
        self.history
            .write()
            .map_err(|e| FormFillError::internal(format!("history lock poisoned: {}", e)))?
            .push(url.to_string());
        Ok(())
    }

    pub fn history_len(&self) -> usize {
        self.history.read().map(|h| h.len()).unwrap_or(0)
    }
}

impl AddressBar for MemoryAddressBar {
    fn href(&self) -> String {
        self.history
            .read()
            .ok()
            .and_then(|h| h.last().cloned())
            .unwrap_or_default()
    }

    fn replace_state(&self, href: &str) -> Result<()> {
        let next = parse_href(href)?;
        let mut history = self
            .history
            .write()
            .map_err(|e| FormFillError::internal(format!("history lock poisoned: {}", e)))?;

        if let Some(current) = history.last_mut() {
            let current_origin = parse_href(current)?.origin();
            if current_origin != next.origin() {
                return Err(FormFillError::address(format!(
                    "cannot replace {} with cross-origin {}",
                    current, next
                )));
            }
            *current = next.to_string();
        } else {
            history.push(next.to_string());
        }
        Ok(())
    }
}
