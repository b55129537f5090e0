use crate::error::CoreError;
use crate::index::{ListingMatrix, TfidfModel};
use anyhow::{Context, Result};
use bincode;
use serde::{Deserialize, Serialize};
use std::fs::{create_dir_all, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
pub struct MetaFile {
    pub num_listings: usize,
    pub num_terms: usize,
    pub created_at: String,
    pub version: u32,
}

pub struct ModelPaths {
    pub root: PathBuf,
}

impl ModelPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    pub fn model(&self) -> PathBuf { self.root.join("tfidf.bin") }
    pub fn matrix(&self) -> PathBuf { self.root.join("tfidf_matrix.bin") }
    pub fn meta(&self) -> PathBuf { self.root.join("meta.json") }
}

fn write_bincode<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut f = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let bytes = bincode::serialize(value)?;
    f.write_all(&bytes)?;
    Ok(())
}

fn read_bincode<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let mut f = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mut buf = Vec::new();
    f.read_to_end(&mut buf)?;
    let value = bincode::deserialize(&buf).with_context(|| format!("corrupt artifact {}", path.display()))?;
    Ok(value)
}

pub fn save_model(paths: &ModelPaths, model: &TfidfModel) -> Result<()> {
    create_dir_all(&paths.root)?;
    write_bincode(&paths.model(), model)
}

pub fn load_model(paths: &ModelPaths) -> Result<TfidfModel> {
    read_bincode(&paths.model())
}

pub fn save_matrix(paths: &ModelPaths, matrix: &ListingMatrix) -> Result<()> {
    create_dir_all(&paths.root)?;
    write_bincode(&paths.matrix(), matrix)
}

pub fn load_matrix(paths: &ModelPaths) -> Result<ListingMatrix> {
    read_bincode(&paths.matrix())
}

pub fn save_meta(paths: &ModelPaths, meta: &MetaFile) -> Result<()> {
    create_dir_all(&paths.root)?;
    let mut f = File::create(paths.meta())?;
    let json = serde_json::to_string_pretty(meta)?;
    f.write_all(json.as_bytes())?;
    Ok(())
}

pub fn load_meta(paths: &ModelPaths) -> Result<MetaFile> {
    let mut f = File::open(paths.meta()).with_context(|| format!("failed to open {}", paths.meta().display()))?;
    let mut buf = String::new();
    f.read_to_string(&mut buf)?;
    let meta: MetaFile = serde_json::from_str(&buf)?;
    Ok(meta)
}

/// Load the model and its listing matrix, checking that they belong together.
pub fn load_artifacts(paths: &ModelPaths) -> Result<(TfidfModel, ListingMatrix, MetaFile)> {
    let meta = load_meta(paths)?;
    if meta.version != FORMAT_VERSION {
        anyhow::bail!("unsupported model format version {} (expected {FORMAT_VERSION})", meta.version);
    }
    let model = load_model(paths)?;
    let matrix = load_matrix(paths)?;
    model.validate()?;
    matrix.validate()?;
    if meta.num_terms != model.dim() {
        return Err(CoreError::CorruptModel(format!("meta.json records {} terms but model has {}", meta.num_terms, model.dim())).into());
    }
    if matrix.dim != model.dim() {
        return Err(CoreError::DimensionMismatch { query: model.dim(), matrix: matrix.dim }.into());
    }
    if matrix.len() != meta.num_listings {
        return Err(CoreError::RowCountMismatch { rows: matrix.len(), listings: meta.num_listings }.into());
    }
    Ok((model, matrix, meta))
}
