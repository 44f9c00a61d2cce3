//! Flat on-disk storage for uploaded files.
//!
//! Storage Structure:
//! Files live directly in the upload directory under their sanitized name:
//! `{upload_dir}/{sanitized_name}`. A later upload with the same name
//! replaces the earlier file; there is no versioning.
//!
//! Writes go to a hidden `.upload.{uuid}.part` file in the same directory
//! and are renamed into place once fully flushed, so a concurrent reader
//! sees either the old file or the complete new one. The temp name does
//! not embed the upload's name, so any name the filesystem accepts for
//! the final file also works during the write.

use std::io;
use std::path::{Path, PathBuf};

use axum::body::Bytes;
use futures::{Stream, StreamExt};
use tokio::fs::{self, File};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use uuid::Uuid;

use crate::{Error, Result};

/// A file fully written to the upload directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub path: PathBuf,
    /// Size as reported by the filesystem after the write completed.
    pub size_bytes: u64,
}

/// Service writing uploads into a single flat directory.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
    chunk_size: usize,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>, chunk_size: usize) -> Self {
        Self {
            dir: dir.into(),
            chunk_size: chunk_size.max(1),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Final location for a sanitized name.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Create the upload directory (and parents) if missing.
    pub async fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(Error::StorageWriteFailed)
    }

    /// Stream `chunks` to `{dir}/{name}` and report the stored size.
    ///
    /// Bytes are written in blocks of `chunk_size`, so memory use does not
    /// grow with the upload. A failing chunk aborts the write with the
    /// chunk's own error; a failing disk write aborts it with
    /// `StorageWriteFailed`. Either way any existing file under `name` is
    /// left untouched.
    pub async fn store<S, E>(&self, name: &str, chunks: S) -> Result<StoredFile>
    where
        S: Stream<Item = std::result::Result<Bytes, E>>,
        E: Into<Error>,
    {
        let final_path = self.path_for(name);
        let temp_path = self.temp_path();

        let written = match self.copy_to(&temp_path, chunks).await {
            Ok(written) => written,
            Err(e) => {
                self.discard(&temp_path).await;
                return Err(e);
            }
        };

        if let Err(e) = fs::rename(&temp_path, &final_path).await {
            self.discard(&temp_path).await;
            return Err(Error::StorageWriteFailed(e));
        }

        let size_bytes = fs::metadata(&final_path)
            .await
            .map_err(Error::StorageReadFailed)?
            .len();

        tracing::debug!(
            path = %final_path.display(),
            written,
            size_bytes,
            "Upload stored"
        );

        Ok(StoredFile {
            path: final_path,
            size_bytes,
        })
    }

    /// Read at most `limit` leading bytes of a stored file.
    pub async fn read_sample(&self, stored: &StoredFile, limit: usize) -> Result<Vec<u8>> {
        let file = File::open(&stored.path)
            .await
            .map_err(Error::StorageReadFailed)?;

        let mut sample = Vec::with_capacity(limit.min(stored.size_bytes as usize));
        file.take(limit as u64)
            .read_to_end(&mut sample)
            .await
            .map_err(Error::StorageReadFailed)?;

        Ok(sample)
    }

    /// Hidden, collision-free temp file inside the upload directory.
    fn temp_path(&self) -> PathBuf {
        self.dir.join(format!(".upload.{}.part", Uuid::new_v4().simple()))
    }

    /// Re-block `chunks` into `chunk_size` writes; only the last block may
    /// be shorter.
    async fn copy_to<S, E>(&self, path: &Path, chunks: S) -> Result<u64>
    where
        S: Stream<Item = std::result::Result<Bytes, E>>,
        E: Into<Error>,
    {
        let mut chunks = std::pin::pin!(chunks);
        let mut file = File::create(path)
            .await
            .map_err(Error::StorageWriteFailed)?;
        let mut block = Vec::with_capacity(self.chunk_size);
        let mut written: u64 = 0;

        while let Some(chunk) = chunks.next().await {
            let chunk = chunk.map_err(Into::<Error>::into)?;
            let mut rest = &chunk[..];

            while !rest.is_empty() {
                let take = (self.chunk_size - block.len()).min(rest.len());
                block.extend_from_slice(&rest[..take]);
                rest = &rest[take..];

                if block.len() == self.chunk_size {
                    write_block(&mut file, &block).await?;
                    written += block.len() as u64;
                    block.clear();
                }
            }
        }

        if !block.is_empty() {
            write_block(&mut file, &block).await?;
            written += block.len() as u64;
        }

        file.flush().await.map_err(Error::StorageWriteFailed)?;
        file.sync_all().await.map_err(Error::StorageWriteFailed)?;

        Ok(written)
    }

    async fn discard(&self, temp_path: &Path) {
        if let Err(e) = fs::remove_file(temp_path).await {
            if e.kind() != io::ErrorKind::NotFound {
                tracing::warn!(
                    path = %temp_path.display(),
                    error = %e,
                    "Failed to remove partial upload"
                );
            }
        }
    }
}

async fn write_block(file: &mut File, block: &[u8]) -> Result<()> {
    file.write_all(block)
        .await
        .map_err(Error::StorageWriteFailed)
}
