//! # Media Selection Channel
//!
//! Event-based hand-off from the separately-owned media picker back to a
//! specific node. A selection names the node, the kind of asset picked,
//! and the file; applying it routes the file into the right props.
//! Video nodes distinguish a poster image from the video source; every
//! other node gets a plain `url`/`alt` pair.

use pagesmith_editor::{Editor, EditorError};
use pagesmith_model::NodeId;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::warn;

/// What kind of asset the picker reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

/// File reference as reported by the media library.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl MediaFile {
    /// The served URL wins over the raw file path.
    pub fn url(&self) -> String {
        self.file_url
            .clone()
            .or_else(|| self.file.clone())
            .unwrap_or_default()
    }
}

/// One selection event: which node, what was picked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaSelection {
    pub node_id: NodeId,
    pub kind: MediaKind,
    pub file: MediaFile,
}

pub type MediaSender = mpsc::Sender<MediaSelection>;
pub type MediaReceiver = mpsc::Receiver<MediaSelection>;

/// Create the selection channel; the picker keeps the sender, the editor
/// side consumes the receiver.
pub fn media_channel(capacity: usize) -> (MediaSender, MediaReceiver) {
    mpsc::channel(capacity)
}

/// Wrap the receiver as a stream for combinator-style consumers.
pub fn media_stream(receiver: MediaReceiver) -> ReceiverStream<MediaSelection> {
    ReceiverStream::new(receiver)
}

/// Route a selection into the target node's props.
pub fn apply_selection(
    editor: &mut Editor,
    selection: &MediaSelection,
) -> Result<(), EditorError> {
    let component = editor
        .document()
        .and_then(|document| document.tree.get(&selection.node_id))
        .map(|node| node.component.clone());

    let url = selection.file.url();
    let title = selection.file.title.clone();

    let update = match component.as_deref() {
        Some("media.video") => match selection.kind {
            MediaKind::Image => json!({
                "poster": url,
                "posterAlt": title,
                "sourceType": "library",
            }),
            MediaKind::Video => json!({
                "source": url,
                "title": title,
                "sourceType": "library",
            }),
        },
        _ => json!({
            "url": url,
            "alt": title,
            "sourceType": "library",
        }),
    };

    let update = update.as_object().cloned().unwrap_or_default();
    editor.update_node_props(&selection.node_id, update)
}

/// Drain the channel, applying each selection to the shared editor.
/// Failures (stale node ids from an already-deleted node) are logged and
/// skipped; the listener itself never dies on a bad event.
pub async fn run_media_listener(
    mut receiver: MediaReceiver,
    editor: Arc<Mutex<Editor>>,
) {
    while let Some(selection) = receiver.recv().await {
        let mut editor = match editor.lock() {
            Ok(editor) => editor,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Err(error) = apply_selection(&mut editor, &selection) {
            warn!(node = %selection.node_id, %error, "dropped media selection");
        }
    }
}
