use crate::error::CoreError;
use crate::tokenizer::{tokenize_with, TokenizerOptions};
use crate::TermId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Term vector stored as `(term_id, weight)` pairs sorted by term id.
/// `dim` is the vocabulary size of the model that produced it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
    pub dim: usize,
    pub entries: Vec<(TermId, f64)>,
}

impl SparseVector {
    pub fn zeros(dim: usize) -> Self {
        Self { dim, entries: Vec::new() }
    }

    /// Builds a vector from unsorted entries. Duplicate term ids are summed.
    pub fn from_entries(dim: usize, entries: impl IntoIterator<Item = (TermId, f64)>) -> Self {
        let mut acc: BTreeMap<TermId, f64> = BTreeMap::new();
        for (tid, w) in entries {
            *acc.entry(tid).or_insert(0.0) += w;
        }
        Self { dim, entries: acc.into_iter().filter(|(_, w)| *w != 0.0).collect() }
    }

    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt()
    }

    /// Dot product by merging the two sorted entry lists.
    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0f64;
        while i < self.entries.len() && j < other.entries.len() {
            let (ta, wa) = self.entries[i];
            let (tb, wb) = other.entries[j];
            if ta == tb {
                sum += wa * wb;
                i += 1;
                j += 1;
            } else if ta < tb {
                i += 1;
            } else {
                j += 1;
            }
        }
        sum
    }

    /// Entries must be sorted, unique and inside `dim`.
    fn check(&self, row: usize, dim: usize) -> Result<(), CoreError> {
        if self.dim != dim {
            return Err(CoreError::CorruptModel(format!("matrix row {row} has dimension {} but matrix has {dim}", self.dim)));
        }
        if let Some((tid, _)) = self.entries.iter().find(|(tid, _)| *tid as usize >= dim) {
            return Err(CoreError::CorruptModel(format!("matrix row {row} references term {tid} outside dimension {dim}")));
        }
        if self.entries.windows(2).any(|w| w[0].0 >= w[1].0) {
            return Err(CoreError::CorruptModel(format!("matrix row {row} has unsorted term ids")));
        }
        if self.entries.iter().any(|(_, w)| !w.is_finite()) {
            return Err(CoreError::CorruptModel(format!("matrix row {row} has a non-finite weight")));
        }
        Ok(())
    }

    fn l2_normalize(&mut self) {
        let norm = self.norm();
        if norm == 0.0 { return; }
        for (_, w) in self.entries.iter_mut() {
            *w /= norm;
        }
    }
}

/// Listing term matrix. Row `i` belongs to listing `i` of the dataset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListingMatrix {
    pub dim: usize,
    pub rows: Vec<SparseVector>,
}

impl ListingMatrix {
    pub fn len(&self) -> usize { self.rows.len() }
    pub fn is_empty(&self) -> bool { self.rows.is_empty() }

    /// Every row must have the matrix dimension and only reference terms inside it.
    pub fn validate(&self) -> Result<(), CoreError> {
        for (row, v) in self.rows.iter().enumerate() {
            v.check(row, self.dim)?;
        }
        Ok(())
    }
}

/// Settings used when fitting a model on a corpus.
#[derive(Debug, Clone)]
pub struct FitOptions {
    pub tokenizer: TokenizerOptions,
    /// IDF = ln((1 + N) / (1 + df)) + 1 instead of ln(N / df) + 1
    pub smoothed_idf: bool,
    /// Use 1 + ln(tf) instead of raw counts
    pub sublinear_tf: bool,
    /// Terms appearing in fewer documents are left out of the vocabulary
    pub min_df: u32,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self { tokenizer: TokenizerOptions::default(), smoothed_idf: true, sublinear_tf: false, min_df: 1 }
    }
}

/// Fitted TF-IDF transform: vocabulary, per-term IDF and the tokenizer settings it was fitted with.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TfidfModel {
    pub vocabulary: HashMap<String, TermId>,
    pub idf: Vec<f64>,
    pub tokenizer: TokenizerOptions,
    pub sublinear_tf: bool,
}

impl TfidfModel {
    pub fn dim(&self) -> usize { self.idf.len() }

    /// Term ids must be unique and index into `idf`, and every weight must be finite.
    pub fn validate(&self) -> Result<(), CoreError> {
        let dim = self.dim();
        if self.vocabulary.len() != dim {
            return Err(CoreError::CorruptModel(format!("vocabulary has {} terms but idf has {dim} weights", self.vocabulary.len())));
        }
        let mut seen = vec![false; dim];
        for (term, &tid) in &self.vocabulary {
            match seen.get_mut(tid as usize) {
                Some(slot) if !*slot => *slot = true,
                Some(_) => return Err(CoreError::CorruptModel(format!("term id {tid} is assigned twice"))),
                None => return Err(CoreError::CorruptModel(format!("term '{term}' has id {tid} outside dimension {dim}"))),
            }
        }
        if self.idf.iter().any(|w| !w.is_finite()) {
            return Err(CoreError::CorruptModel("idf has a non-finite weight".into()));
        }
        Ok(())
    }

    /// Fits vocabulary and IDF weights on `docs`. Term ids follow the sorted order of the terms.
    pub fn fit(docs: &[&str], opts: &FitOptions) -> Self {
        let n = docs.len();
        let mut df: HashMap<String, u32> = HashMap::new();
        for doc in docs {
            let unique: HashSet<String> = tokenize_with(doc, &opts.tokenizer).into_iter().collect();
            for term in unique {
                *df.entry(term).or_insert(0) += 1;
            }
        }

        let mut terms: Vec<(String, u32)> = df.into_iter().filter(|(_, d)| *d >= opts.min_df.max(1)).collect();
        terms.sort_by(|a, b| a.0.cmp(&b.0));

        let mut vocabulary = HashMap::with_capacity(terms.len());
        let mut idf = Vec::with_capacity(terms.len());
        for (tid, (term, df_t)) in terms.into_iter().enumerate() {
            let w = if opts.smoothed_idf {
                ((1.0 + n as f64) / (1.0 + df_t as f64)).ln() + 1.0
            } else {
                (n as f64 / df_t as f64).ln() + 1.0
            };
            vocabulary.insert(term, tid as TermId);
            idf.push(w);
        }
        tracing::debug!(num_docs = n, num_terms = idf.len(), "fitted tf-idf model");
        Self { vocabulary, idf, tokenizer: opts.tokenizer.clone(), sublinear_tf: opts.sublinear_tf }
    }

    /// Projects text into the model's vector space (L2-normalized). Unknown terms are ignored.
    pub fn transform(&self, text: &str) -> SparseVector {
        let mut tf: HashMap<TermId, u32> = HashMap::new();
        for term in tokenize_with(text, &self.tokenizer) {
            if let Some(&tid) = self.vocabulary.get(&term) {
                *tf.entry(tid).or_insert(0) += 1;
            }
        }
        let weights = tf.into_iter().map(|(tid, count)| {
            let tf = if self.sublinear_tf { 1.0 + (count as f64).ln() } else { count as f64 };
            (tid, tf * self.idf[tid as usize])
        });
        let mut v = SparseVector::from_entries(self.dim(), weights);
        v.l2_normalize();
        v
    }

    /// Builds the listing matrix, one row per document in input order.
    pub fn transform_all(&self, docs: &[&str]) -> ListingMatrix {
        ListingMatrix { dim: self.dim(), rows: docs.iter().map(|d| self.transform(d)).collect() }
    }

    pub fn fit_transform(docs: &[&str], opts: &FitOptions) -> (Self, ListingMatrix) {
        let model = Self::fit(docs, opts);
        let matrix = model.transform_all(docs);
        (model, matrix)
    }
}
