use crate::error::CoreError;
use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;
use std::collections::HashSet;
use std::str::FromStr;

lazy_static! {
    static ref RE: Regex = Regex::new(r"(?u)\b\w\w+\b").expect("valid regex");
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a","about","above","after","again","against","all","am","an","and","any","are","as","at",
            "be","because","been","before","being","below","between","both","but","by",
            "can","cannot","could",
            "did","do","does","doing","down","during",
            "each","few","for","from","further",
            "had","has","have","having","he","her","here","hers","herself","him","himself","his","how",
            "i","if","in","into","is","it","its","itself",
            "me","more","most","my","myself",
            "no","nor","not","of","off","on","once","only","or","other","ought","our","ours","ourselves","out","over","own",
            "same","she","should","so","some","such",
            "than","that","the","their","theirs","them","themselves","then","there","these","they","this","those","through","to","too",
            "under","until","up","very",
            "was","we","were","what","when","where","which","while","who","whom","why","with","would",
            "you","your","yours","yourself","yourselves"
        ];
        words.iter().copied().collect()
    };
}

/// Snowball stemmer languages the tokenizer can be fitted with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StemLanguage {
    English,
    Dutch,
    French,
    German,
    Portuguese,
    Spanish,
}

impl StemLanguage {
    fn algorithm(self) -> Algorithm {
        match self {
            StemLanguage::English => Algorithm::English,
            StemLanguage::Dutch => Algorithm::Dutch,
            StemLanguage::French => Algorithm::French,
            StemLanguage::German => Algorithm::German,
            StemLanguage::Portuguese => Algorithm::Portuguese,
            StemLanguage::Spanish => Algorithm::Spanish,
        }
    }
}

impl FromStr for StemLanguage {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "english" | "en" => Ok(StemLanguage::English),
            "dutch" | "nl" => Ok(StemLanguage::Dutch),
            "french" | "fr" => Ok(StemLanguage::French),
            "german" | "de" => Ok(StemLanguage::German),
            "portuguese" | "pt" => Ok(StemLanguage::Portuguese),
            "spanish" | "es" => Ok(StemLanguage::Spanish),
            _ => Err(CoreError::UnknownLanguage(s.to_string())),
        }
    }
}

/// Tokenization settings. Stored inside a fitted model so that queries are
/// tokenized exactly like the listings it was fitted on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenizerOptions {
    pub remove_stopwords: bool,
    pub stem: Option<StemLanguage>,
}

fn is_stopword(token: &str) -> bool { STOPWORDS.contains(token) }

/// Tokenize text with default options: NFKC normalization, lowercase, terms of two or more word characters.
pub fn tokenize(text: &str) -> Vec<String> {
    tokenize_with(text, &TokenizerOptions::default())
}

/// Tokenize text, optionally dropping stopwords and stemming what remains.
pub fn tokenize_with(text: &str, opts: &TokenizerOptions) -> Vec<String> {
    let normalized = text.nfkc().collect::<String>().to_lowercase();
    let stemmer = opts.stem.map(|lang| Stemmer::create(lang.algorithm()));
    let mut tokens = Vec::new();
    for mat in RE.find_iter(&normalized) {
        let token = mat.as_str();
        if opts.remove_stopwords && is_stopword(token) { continue; }
        match &stemmer {
            Some(s) => tokens.push(s.stem(token).to_string()),
            None => tokens.push(token.to_string()),
        }
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_tokenize() {
        let t = tokenize("Dekat Kampus, AC & WiFi");
        assert_eq!(t, vec!["dekat", "kampus", "ac", "wifi"]);
    }

    #[test]
    fn single_characters_are_dropped() {
        let t = tokenize("2 BR");
        assert_eq!(t, vec!["br"]);
    }

    #[test]
    fn stemming_is_opt_in() {
        let opts = TokenizerOptions { remove_stopwords: false, stem: Some(StemLanguage::English) };
        let t = tokenize_with("running", &opts);
        assert_eq!(t, vec!["run"]);
        assert_eq!(tokenize("running"), vec!["running"]);
    }

    #[test]
    fn parses_language_names() {
        assert_eq!("EN".parse::<StemLanguage>().unwrap(), StemLanguage::English);
        assert!("klingon".parse::<StemLanguage>().is_err());
    }
}
