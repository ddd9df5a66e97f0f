//! # Save / Publish Orchestration
//!
//! Drives the asynchronous persistence sequence against the synchronous
//! engine. A publish implicitly performs save-then-promote; neither a
//! save nor a publish may be re-entered while one is in flight, and a
//! manual save is suppressed while a publish sequence owns the document.
//!
//! A publish failure that happens *after* the version was created is a
//! distinct outcome, reported as
//! [`PublishOutcome::DraftSavedPublishFailed`]: the user's work is safe
//! in a draft.

use std::sync::Mutex;

use pagesmith_editor::Editor;
use thiserror::Error;
use tracing::{info, warn};

use crate::client::{ClientError, Page, PageClient, PageVersion, PageVersionPayload, PublishReceipt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flight {
    Idle,
    Saving,
    Publishing,
}

/// Outcome of a draft save request.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    Saved(PageVersion),
    /// No document is loaded yet; nothing to persist.
    NothingToSave,
    /// The source page has not finished loading.
    SourceNotLoaded,
    /// A save or publish already owns the document.
    Busy,
}

/// Outcome of a publish request.
#[derive(Debug, Clone, PartialEq)]
pub enum PublishOutcome {
    Published(PublishReceipt),
    /// The version was created but the promote step failed; no data was
    /// lost.
    DraftSavedPublishFailed {
        version: PageVersion,
        error: ClientError,
    },
    NothingToPublish,
    SourceNotLoaded,
    Busy,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SaveError {
    #[error("persistence request failed: {0}")]
    Client(#[from] ClientError),
}

/// Serializes save/publish sequences for one editing session.
pub struct SaveCoordinator<C> {
    client: C,
    flight: Mutex<Flight>,
}

/// Resets the flight flag when a sequence ends, on every exit path.
struct FlightGuard<'a> {
    flight: &'a Mutex<Flight>,
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        *lock(self.flight) = Flight::Idle;
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl<C: PageClient> SaveCoordinator<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            flight: Mutex::new(Flight::Idle),
        }
    }

    pub fn is_busy(&self) -> bool {
        *lock(&self.flight) != Flight::Idle
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    fn begin(&self, next: Flight) -> Option<FlightGuard<'_>> {
        let mut flight = lock(&self.flight);
        if *flight != Flight::Idle {
            return None;
        }
        *flight = next;
        drop(flight);
        Some(FlightGuard {
            flight: &self.flight,
        })
    }

    /// Create a new draft version from the current document.
    pub async fn save_draft(
        &self,
        editor: &Mutex<Editor>,
        page: Option<&Page>,
    ) -> Result<SaveOutcome, SaveError> {
        let Some(_guard) = self.begin(Flight::Saving) else {
            return Ok(SaveOutcome::Busy);
        };

        if lock(editor).document().is_none() {
            return Ok(SaveOutcome::NothingToSave);
        }
        let Some(page) = page else {
            return Ok(SaveOutcome::SourceNotLoaded);
        };

        let payload = {
            let editor = lock(editor);
            match editor.document() {
                Some(document) => build_version_payload(document, page),
                None => return Ok(SaveOutcome::NothingToSave),
            }
        };

        let version = self.client.create_version(&page.id, payload).await?;

        lock(editor).mark_saved();
        info!(page = %page.id, version = version.version, "draft saved");
        Ok(SaveOutcome::Saved(version))
    }

    /// Save-then-promote. Non-reentrant; a post-save promote failure is
    /// reported distinctly since the draft survived.
    pub async fn publish(
        &self,
        editor: &Mutex<Editor>,
        page: Option<&Page>,
    ) -> Result<PublishOutcome, SaveError> {
        let Some(_guard) = self.begin(Flight::Publishing) else {
            return Ok(PublishOutcome::Busy);
        };

        if lock(editor).document().is_none() {
            return Ok(PublishOutcome::NothingToPublish);
        }
        let Some(page) = page else {
            return Ok(PublishOutcome::SourceNotLoaded);
        };

        let payload = {
            let editor = lock(editor);
            match editor.document() {
                Some(document) => build_version_payload(document, page),
                None => return Ok(PublishOutcome::NothingToPublish),
            }
        };

        let version = self.client.create_version(&page.id, payload).await?;

        match self.client.publish(&page.id, &version.id).await {
            Ok(receipt) => {
                lock(editor).mark_saved();
                info!(page = %page.id, version = version.version, "page published");
                Ok(PublishOutcome::Published(receipt))
            }
            Err(error) => {
                // The version exists, so the work is safe.
                lock(editor).mark_saved();
                warn!(page = %page.id, %error, "publish failed after version was created");
                Ok(PublishOutcome::DraftSavedPublishFailed { version, error })
            }
        }
    }
}

fn build_version_payload(
    document: &pagesmith_model::Document,
    page: &Page,
) -> PageVersionPayload {
    let current = page.current_version.as_ref();

    let title = current
        .map(|version| version.title.clone())
        .filter(|title| !title.is_empty())
        .or_else(|| Some(page.title.clone()).filter(|title| !title.is_empty()))
        .unwrap_or_else(|| "Untitled page".to_string());

    let notes = current
        .map(|version| version.notes.clone())
        .filter(|notes| !notes.is_empty());

    let metadata = current
        .map(|version| version.metadata.clone())
        .filter(|metadata| !metadata.is_empty());

    PageVersionPayload {
        title,
        notes,
        component_tree: document.tree_payload(),
        metadata,
    }
}
