//! Question bank loading from pack files on disk.
//!
//! The manifest lists pack files. Each listed path is resolved against the
//! manifest's directory first and the working directory second, so both
//! `"eng_week1.json"` and `"data/eng_week1.json"` style manifests work.
//!
//! Loading fails fast: an unreadable or malformed manifest or pack aborts
//! startup with the offending path in the message.

use std::path::{Path, PathBuf};

use quiz_core::validation::validate_pack;
use quiz_core::{parse_manifest, parse_pack, Pack, PackError, QuestionBank};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid manifest {path}: {source}")]
    Manifest {
        path: String,
        #[source]
        source: PackError,
    },
    #[error("invalid pack {path}: {source}")]
    Pack {
        path: String,
        #[source]
        source: PackError,
    },
    #[error("manifest {path} lists no packs")]
    EmptyManifest { path: String },
    #[error(transparent)]
    Bank(PackError),
}

/// Per-pack load statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackStats {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub questions: usize,
    pub skipped: usize,
    pub warnings: usize,
}

/// Normalized bank plus what went into it.
#[derive(Debug, Clone)]
pub struct LoadedBank {
    pub bank: QuestionBank,
    pub packs: Vec<PackStats>,
}

impl LoadedBank {
    pub fn warning_count(&self) -> usize {
        self.packs.iter().map(|pack| pack.warnings).sum()
    }
}

/// Load every pack listed in the manifest into one bank.
pub async fn load_bank(manifest_path: &Path) -> Result<LoadedBank, LoadError> {
    let content = read_to_string(manifest_path).await?;
    let manifest = parse_manifest(&content).map_err(|source| LoadError::Manifest {
        path: manifest_path.display().to_string(),
        source,
    })?;

    if manifest.packs.is_empty() {
        return Err(LoadError::EmptyManifest {
            path: manifest_path.display().to_string(),
        });
    }

    let base = manifest_path.parent().unwrap_or_else(|| Path::new(""));
    let mut packs = Vec::with_capacity(manifest.packs.len());
    let mut stats = Vec::with_capacity(manifest.packs.len());

    for entry in &manifest.packs {
        let path = resolve_pack_path(base, entry).await;
        let pack = load_pack(&path).await?;
        stats.push(inspect_pack(&path, &pack));
        packs.push(pack);
    }

    let bank = QuestionBank::from_packs(&packs).map_err(LoadError::Bank)?;

    tracing::info!(
        "Loaded {} questions from {} pack(s)",
        bank.len(),
        stats.len()
    );

    Ok(LoadedBank { bank, packs: stats })
}

/// Read and parse one pack file.
pub async fn load_pack(path: &Path) -> Result<Pack, LoadError> {
    let content = read_to_string(path).await?;
    parse_pack(&content).map_err(|source| LoadError::Pack {
        path: path.display().to_string(),
        source,
    })
}

fn inspect_pack(path: &Path, pack: &Pack) -> PackStats {
    let shown = path.display().to_string();
    let warnings = validate_pack(pack);

    for record in &warnings {
        tracing::warn!(
            pack = %shown,
            question = record.index,
            "{}",
            record.warning
        );
    }
    if pack.skipped > 0 {
        tracing::warn!(pack = %shown, "Skipped {} non-object question entries", pack.skipped);
    }
    if pack.questions.is_empty() {
        tracing::warn!(pack = %shown, "Pack contains no questions");
    }

    PackStats {
        path: shown,
        title: pack.title.clone(),
        questions: pack.questions.len(),
        skipped: pack.skipped,
        warnings: warnings.len(),
    }
}

async fn resolve_pack_path(base: &Path, entry: &str) -> PathBuf {
    let beside_manifest = base.join(entry);
    match tokio::fs::try_exists(&beside_manifest).await {
        Ok(true) => beside_manifest,
        _ => PathBuf::from(entry),
    }
}

async fn read_to_string(path: &Path) -> Result<String, LoadError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| LoadError::Read {
            path: path.display().to_string(),
            source,
        })
}
