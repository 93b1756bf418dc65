//! On-disk index artifact.
//!
//! Single self-describing binary file so the vector matrix and the
//! identifier list are always replaced together:
//!
//! ```text
//! Offset   Size        Description
//! ──────────────────────────────────────────────
//! 0x00     4           Magic: "PSX1"
//! 0x04     4           Format version, u32 LE
//! 0x08     4           Dimension D, u32 LE
//! 0x0C     8           Count N, u64 LE
//! 0x14     N*D*4       Vector matrix, f32 LE, row-major
//! ...      per entry   Identifiers: u32 LE length + UTF-8 bytes
//! ```
//!
//! Writes go to a `.tmp` sibling and are renamed into place, so a
//! concurrent reader sees either the old artifact or the new one, never
//! a partial write.

use crate::error::{Result, VectorStoreError};
use crate::store::VectorStore;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

const MAGIC: &[u8; 4] = b"PSX1";
const FORMAT_VERSION: u32 = 1;
const HEADER_LEN: usize = 20;

/// Change token for an artifact, cheap to compute without reading the file.
///
/// Modification time and length are compared together so a same-second
/// rewrite of a different size is still detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactSignature {
    Absent,
    Present { modified: SystemTime, len: u64 },
}

/// Write `store` to `path` atomically, creating parent directories.
pub async fn save(store: &VectorStore, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let bytes = encode(store);
    let tmp = tmp_path(path);
    tokio::fs::write(&tmp, &bytes).await?;
    if let Err(err) = tokio::fs::rename(&tmp, path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(err.into());
    }

    log::info!(
        "Saved index artifact {:?}: {} vectors, dimension {}",
        path,
        store.len(),
        store.dimension()
    );
    Ok(())
}

/// Read and decode the artifact at `path`.
pub async fn load(path: impl AsRef<Path>) -> Result<VectorStore> {
    let path = path.as_ref();
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(VectorStoreError::ArtifactNotFound(path.to_path_buf()));
        }
        Err(err) => return Err(err.into()),
    };
    let store = decode(&bytes)?;
    log::debug!("Loaded index artifact {:?}: {} vectors", path, store.len());
    Ok(store)
}

/// Current change token for the artifact at `path`.
pub async fn signature(path: impl AsRef<Path>) -> Result<ArtifactSignature> {
    match tokio::fs::metadata(path.as_ref()).await {
        Ok(meta) => Ok(ArtifactSignature::Present {
            modified: meta.modified()?,
            len: meta.len(),
        }),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(ArtifactSignature::Absent),
        Err(err) => Err(err.into()),
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn encode(store: &VectorStore) -> Vec<u8> {
    let matrix = store.matrix();
    let identifiers = store.identifiers();

    let id_bytes: usize = identifiers.iter().map(|id| 4 + id.len()).sum();
    let mut out = Vec::with_capacity(HEADER_LEN + matrix.len() * 4 + id_bytes);

    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    #[allow(clippy::cast_possible_truncation)]
    out.extend_from_slice(&(store.dimension() as u32).to_le_bytes());
    out.extend_from_slice(&(store.len() as u64).to_le_bytes());
    for value in matrix {
        out.extend_from_slice(&value.to_le_bytes());
    }
    for id in identifiers {
        #[allow(clippy::cast_possible_truncation)]
        out.extend_from_slice(&(id.len() as u32).to_le_bytes());
        out.extend_from_slice(id.as_bytes());
    }
    out
}

fn decode(bytes: &[u8]) -> Result<VectorStore> {
    if bytes.len() < HEADER_LEN {
        return Err(corrupt("shorter than header"));
    }
    if &bytes[0..4] != MAGIC {
        return Err(corrupt("bad magic bytes"));
    }
    let version = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
    if version != FORMAT_VERSION {
        return Err(corrupt(format!("unsupported format version {version}")));
    }
    let dimension = u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]) as usize;
    let count = u64::from_le_bytes([
        bytes[12], bytes[13], bytes[14], bytes[15], bytes[16], bytes[17], bytes[18], bytes[19],
    ]) as usize;

    let matrix_bytes = count
        .checked_mul(dimension)
        .and_then(|n| n.checked_mul(4))
        .ok_or_else(|| corrupt("vector matrix size overflows"))?;
    let matrix_end = HEADER_LEN
        .checked_add(matrix_bytes)
        .ok_or_else(|| corrupt("vector matrix size overflows"))?;
    if bytes.len() < matrix_end {
        return Err(corrupt("truncated vector matrix"));
    }

    let mut vectors = Vec::with_capacity(count * dimension);
    for chunk in bytes[HEADER_LEN..matrix_end].chunks_exact(4) {
        vectors.push(f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]));
    }

    // Each identifier needs at least its 4 length bytes; a header count
    // the identifier section cannot hold must fail before allocation.
    let remaining = bytes.len() - matrix_end;
    if count
        .checked_mul(4)
        .map_or(true, |min_bytes| min_bytes > remaining)
    {
        return Err(corrupt("identifier count exceeds artifact size"));
    }

    let mut identifiers = Vec::with_capacity(count);
    let mut offset = matrix_end;
    for _ in 0..count {
        if bytes.len() < offset + 4 {
            return Err(corrupt("truncated identifier list"));
        }
        let len = u32::from_le_bytes([
            bytes[offset],
            bytes[offset + 1],
            bytes[offset + 2],
            bytes[offset + 3],
        ]) as usize;
        offset += 4;
        if bytes.len() < offset + len {
            return Err(corrupt("truncated identifier entry"));
        }
        let id = std::str::from_utf8(&bytes[offset..offset + len])
            .map_err(|_| corrupt("identifier is not valid UTF-8"))?;
        identifiers.push(id.to_string());
        offset += len;
    }
    if offset != bytes.len() {
        return Err(corrupt("trailing bytes after identifier list"));
    }

    VectorStore::from_parts(dimension, vectors, identifiers)
}

fn corrupt(reason: impl Into<String>) -> VectorStoreError {
    VectorStoreError::CorruptArtifact(reason.into())
}
