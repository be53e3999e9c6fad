//! Photo persistence: the serialized disk writer and the upload pipeline.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::error::StoreError;
use crate::manifest::Manifest;
use crate::naming;

/// Queued-but-unserved uploads tolerated before `save` backpressures.
const QUEUE_DEPTH: usize = 32;

/// One file going through the upload pipeline.
#[derive(Debug)]
pub struct SaveRequest {
    /// Client-supplied filename, untrusted.
    pub original_name: String,
    /// Declared content type, untrusted.
    pub content_type: String,
    /// Username recorded in the metadata sidecar.
    pub uploaded_by: String,
    /// Full file contents.
    pub bytes: Bytes,
}

/// Outcome of a successful save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPhoto {
    /// Final on-disk filename, sanitized and collision-free.
    pub file_name: String,
    /// Stored size in bytes.
    pub size: u64,
}

/// Metadata sidecar written next to every stored photo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoMeta {
    /// Username that uploaded the photo.
    pub uploaded_by: String,
    /// Upload time, UTC ISO-8601.
    pub uploaded_time: DateTime<Utc>,
    /// Filename as supplied by the client, before sanitization.
    pub original_filename: String,
    /// Declared content type at upload time.
    pub content_type: String,
}

struct SaveJob {
    request: SaveRequest,
    reply: oneshot::Sender<Result<StoredPhoto, StoreError>>,
}

struct StoreShared {
    root: PathBuf,
    manifest: Manifest,
}

/// Handle to the photo store: the manifest plus a single-worker write queue.
///
/// Cloning is cheap; all clones feed the same worker. Disk writes from
/// concurrently handled requests are serialized through it, and the
/// uniqueness check, the write, and the manifest insertion for one file run
/// as one uninterrupted step inside the worker, so two in-flight uploads can
/// never be assigned the same name.
#[derive(Clone)]
pub struct PhotoStore {
    shared: Arc<StoreShared>,
    jobs: mpsc::Sender<SaveJob>,
}

/// Owner of the spawned writer task, held by whoever controls shutdown.
pub struct StoreWorker {
    handle: JoinHandle<()>,
}

impl PhotoStore {
    /// Opens the store over `root`, scanning it to seed the manifest and
    /// spawning the writer task. Must be called from a tokio runtime.
    pub fn open(root: impl Into<PathBuf>) -> io::Result<(Self, StoreWorker)> {
        let root = root.into();
        let manifest = Manifest::scan(&root)?;
        let shared = Arc::new(StoreShared { root, manifest });

        let (jobs, mut queue) = mpsc::channel::<SaveJob>(QUEUE_DEPTH);
        let worker_shared = Arc::clone(&shared);
        let handle = tokio::spawn(async move {
            while let Some(job) = queue.recv().await {
                let result = perform(&worker_shared, job.request).await;
                // The submitter may have disconnected; the write still counts.
                let _ = job.reply.send(result);
            }
            tracing::debug!("photo writer drained");
        });

        Ok((Self { shared, jobs }, StoreWorker { handle }))
    }

    /// Runs the upload pipeline for one file.
    ///
    /// Validation happens here, before the queue: a file with a disallowed
    /// extension or content type is rejected with zero disk I/O and zero
    /// manifest mutation. Accepted files are written in submission order.
    pub async fn save(&self, request: SaveRequest) -> Result<StoredPhoto, StoreError> {
        if !naming::has_allowed_extension(&request.original_name)
            || !naming::is_allowed_mime(&request.content_type)
        {
            return Err(StoreError::UnsupportedType {
                file_name: request.original_name,
                content_type: request.content_type,
            });
        }

        let (reply, result) = oneshot::channel();
        self.jobs
            .send(SaveJob { request, reply })
            .await
            .map_err(|_| StoreError::Closed)?;
        result.await.map_err(|_| StoreError::Closed)?
    }

    /// Returns `true` when `name` is a stored photo.
    pub fn contains(&self, name: &str) -> bool {
        self.shared.manifest.contains(name)
    }

    /// Sorted snapshot of stored photo names.
    pub fn photo_names(&self) -> Vec<String> {
        self.shared.manifest.names()
    }

    /// Number of stored photos.
    pub fn photo_count(&self) -> usize {
        self.shared.manifest.len()
    }

    /// Path of a stored photo. Only meaningful for manifest entries.
    pub fn photo_path(&self, name: &str) -> PathBuf {
        self.shared.root.join(name)
    }
}

impl StoreWorker {
    /// Waits for the writer to finish every queued and in-flight write.
    ///
    /// The worker exits once the queue closes, which happens when the last
    /// `PhotoStore` clone is dropped; drop them before awaiting this.
    pub async fn drain(self) {
        if let Err(err) = self.handle.await {
            tracing::error!(error = %err, "photo writer task failed");
        }
    }
}

/// Executes one save on the writer task: uniquify, write photo and sidecar,
/// record in the manifest.
async fn perform(shared: &StoreShared, request: SaveRequest) -> Result<StoredPhoto, StoreError> {
    let sanitized = naming::sanitize(&request.original_name);
    let file_name = naming::uniquify(|name| shared.manifest.contains(name), &sanitized);

    let photo_path = shared.root.join(&file_name);
    let sidecar_path = shared.root.join(format!("{file_name}.json"));

    let meta = PhotoMeta {
        uploaded_by: request.uploaded_by,
        uploaded_time: Utc::now(),
        original_filename: request.original_name,
        content_type: request.content_type,
    };

    if let Err(source) = write_files(&photo_path, &sidecar_path, &request.bytes, &meta).await {
        // Remove partial output so a rescan never surfaces a corrupt photo.
        let _ = tokio::fs::remove_file(&photo_path).await;
        let _ = tokio::fs::remove_file(&sidecar_path).await;
        return Err(StoreError::Write {
            name: file_name,
            source,
        });
    }

    shared.manifest.add(file_name.clone());
    tracing::info!(
        file = %file_name,
        user = %meta.uploaded_by,
        size = request.bytes.len(),
        "photo stored"
    );

    Ok(StoredPhoto {
        file_name,
        size: request.bytes.len() as u64,
    })
}

async fn write_files(
    photo_path: &Path,
    sidecar_path: &Path,
    bytes: &Bytes,
    meta: &PhotoMeta,
) -> io::Result<()> {
    let mut file = tokio::fs::File::create(photo_path).await?;
    file.write_all(bytes).await?;
    file.flush().await?;

    let record = serde_json::to_vec_pretty(meta)?;
    tokio::fs::write(sidecar_path, record).await?;
    Ok(())
}
