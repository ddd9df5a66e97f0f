//! # Pagesmith Workspace
//!
//! Asynchronous boundary around the synchronous editing engine:
//!
//! - **Persistence**: the [`PageClient`] contract plus the
//!   [`SaveCoordinator`], which serializes draft-save and
//!   save-then-publish sequences and keeps them from overlapping.
//! - **Preview**: a keyed, size-bounded snapshot channel read by the
//!   preview surface.
//! - **Media**: the selection channel through which the media picker
//!   reports a chosen asset back to a node.
//!
//! The engine itself stays single-threaded; asynchrony only enters here,
//! at the edges.

mod client;
mod media;
mod preview;
mod save;

pub use client::{
    load_page_document, ClientError, Page, PageClient, PageVersion, PageVersionPayload,
    PublishReceipt, PublishStatus,
};
pub use media::{
    apply_selection, media_channel, media_stream, run_media_listener, MediaFile, MediaKind,
    MediaReceiver, MediaSelection, MediaSender,
};
pub use preview::{
    preview_key, PreviewChannel, PreviewRequest, PreviewSnapshot, PreviewView,
    DEFAULT_SNAPSHOT_BUDGET, PREVIEW_KEY_PREFIX,
};
pub use save::{PublishOutcome, SaveCoordinator, SaveError, SaveOutcome};
