use apart_core::tokenizer::{tokenize, tokenize_with, StemLanguage, TokenizerOptions};

#[test]
fn it_normalizes_and_stems() {
    let opts = TokenizerOptions { remove_stopwords: false, stem: Some(StemLanguage::English) };
    let words = tokenize_with("Running Runners RUN! The café's menu.", &opts);
    // Stemming to "run" should appear
    assert!(words.contains(&"run".to_string()));
    // Unicode normalization keeps the accented letter as one word character
    assert!(words.iter().any(|w| w.starts_with("café")));
}

#[test]
fn it_filters_stopwords() {
    let opts = TokenizerOptions { remove_stopwords: true, stem: None };
    let words = tokenize_with("The quick brown fox and the lazy dog", &opts);
    assert!(!words.contains(&"the".to_string()));
    assert!(!words.contains(&"and".to_string()));
    assert!(words.contains(&"quick".to_string()));
}

#[test]
fn it_keeps_stopwords_by_default() {
    let words = tokenize("near the station");
    assert_eq!(words, vec!["near", "the", "station"]);
}

#[test]
fn fullwidth_text_is_folded() {
    // NFKC maps fullwidth latin to ascii
    let words = tokenize("ＷｉＦｉ");
    assert_eq!(words, vec!["wifi"]);
}
