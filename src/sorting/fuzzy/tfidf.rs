//! TF-IDF text vectors and cosine similarity.
//!
//! Documents are lowercased, tokenised into words of two or more word
//! characters, stripped of English stop words, and expanded with bigrams of
//! adjacent remaining tokens. The vocabulary keeps the most frequent terms
//! across the corpus. Weights are raw term counts times smoothed IDF,
//! `ln((1 + n) / (1 + df)) + 1`, and every row is L2-normalised.

use std::collections::HashMap;

use lazy_static::lazy_static;
use nalgebra::DMatrix;
use phf::phf_set;
use regex::Regex;

/// Default vocabulary cap.
pub const DEFAULT_MAX_FEATURES: usize = 50;

lazy_static! {
    static ref RE_TOKEN: Regex = Regex::new(r"\b\w\w+\b").unwrap();
}

static STOP_WORDS: phf::Set<&'static str> = phf_set! {
    "a", "about", "above", "across", "after", "afterwards", "again", "against",
    "all", "almost", "alone", "along", "already", "also", "although", "always",
    "am", "among", "amongst", "an", "and", "another", "any", "anyhow", "anyone",
    "anything", "anyway", "anywhere", "are", "around", "as", "at", "back", "be",
    "became", "because", "become", "becomes", "becoming", "been", "before",
    "beforehand", "behind", "being", "below", "beside", "besides", "between",
    "beyond", "both", "bottom", "but", "by", "can", "cannot", "could", "down",
    "due", "during", "each", "eg", "either", "else", "elsewhere", "enough",
    "etc", "even", "ever", "every", "everyone", "everything", "everywhere",
    "except", "few", "for", "former", "formerly", "from", "front", "full",
    "further", "get", "give", "go", "had", "has", "have", "he", "hence", "her",
    "here", "hereafter", "hereby", "herein", "hereupon", "hers", "herself",
    "him", "himself", "his", "how", "however", "ie", "if", "in", "inc",
    "indeed", "into", "is", "it", "its", "itself", "keep", "last", "latter",
    "latterly", "least", "less", "ltd", "made", "many", "may", "me",
    "meanwhile", "might", "mine", "more", "moreover", "most", "mostly", "move",
    "much", "must", "my", "myself", "name", "namely", "neither", "never",
    "nevertheless", "next", "no", "nobody", "none", "noone", "nor", "not",
    "nothing", "now", "nowhere", "of", "off", "often", "on", "once", "one",
    "only", "onto", "or", "other", "others", "otherwise", "our", "ours",
    "ourselves", "out", "over", "own", "part", "per", "perhaps", "please",
    "put", "rather", "re", "same", "see", "seem", "seemed", "seeming", "seems",
    "several", "she", "should", "show", "side", "since", "so", "some",
    "somehow", "someone", "something", "sometime", "sometimes", "somewhere",
    "still", "such", "take", "than", "that", "the", "their", "them",
    "themselves", "then", "thence", "there", "thereafter", "thereby",
    "therefore", "therein", "thereupon", "these", "they", "this", "those",
    "though", "through", "throughout", "thru", "thus", "to", "together", "too",
    "top", "toward", "towards", "under", "until", "up", "upon", "us", "very",
    "via", "was", "we", "well", "were", "what", "whatever", "when", "whence",
    "whenever", "where", "whereafter", "whereas", "whereby", "wherein",
    "whereupon", "wherever", "whether", "which", "while", "whither", "who",
    "whoever", "whole", "whom", "whose", "why", "will", "with", "within",
    "without", "would", "yet", "you", "your", "yours", "yourself", "yourselves",
};

/// Whether `word` (lowercase) is an English stop word.
pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(word)
}

/// Unigram and bigram terms of one document.
pub fn terms(document: &str) -> Vec<String> {
    let lower = document.to_lowercase();
    let tokens: Vec<&str> = RE_TOKEN
        .find_iter(&lower)
        .map(|m| m.as_str())
        .filter(|t| !is_stop_word(t))
        .collect();

    let mut out: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
    out.extend(tokens.windows(2).map(|pair| format!("{} {}", pair[0], pair[1])));
    out
}

/// A fitted TF-IDF model: one L2-normalised row per document.
#[derive(Debug, Clone)]
pub struct TfIdf {
    vocabulary: Vec<String>,
    weights: DMatrix<f64>,
}

impl TfIdf {
    /// Fit and transform a corpus, keeping at most `max_features` terms.
    ///
    /// Returns `None` when no document yields a single term.
    pub fn fit(documents: &[String], max_features: usize) -> Option<Self> {
        let doc_terms: Vec<Vec<String>> = documents.iter().map(|d| terms(d)).collect();

        let mut corpus_counts: HashMap<&str, usize> = HashMap::new();
        let mut doc_freq: HashMap<&str, usize> = HashMap::new();
        for doc in &doc_terms {
            let mut seen: Vec<&str> = Vec::new();
            for term in doc {
                *corpus_counts.entry(term.as_str()).or_insert(0) += 1;
                if !seen.contains(&term.as_str()) {
                    seen.push(term.as_str());
                    *doc_freq.entry(term.as_str()).or_insert(0) += 1;
                }
            }
        }
        if corpus_counts.is_empty() {
            return None;
        }

        let mut ranked: Vec<(&str, usize)> = corpus_counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(max_features.max(1));
        let mut vocabulary: Vec<String> = ranked.iter().map(|(t, _)| t.to_string()).collect();
        vocabulary.sort();

        let n = documents.len();
        let index: HashMap<&str, usize> = vocabulary
            .iter()
            .enumerate()
            .map(|(i, t)| (t.as_str(), i))
            .collect();
        let idf: Vec<f64> = vocabulary
            .iter()
            .map(|t| {
                let df = doc_freq.get(t.as_str()).copied().unwrap_or(0);
                ((1 + n) as f64 / (1 + df) as f64).ln() + 1.0
            })
            .collect();

        let mut weights = DMatrix::zeros(n, vocabulary.len());
        for (row, doc) in doc_terms.iter().enumerate() {
            for term in doc {
                if let Some(&col) = index.get(term.as_str()) {
                    weights[(row, col)] += idf[col];
                }
            }
            let norm = weights.row(row).norm();
            if norm > 0.0 {
                let scaled = weights.row(row) / norm;
                weights.set_row(row, &scaled);
            }
        }

        Some(Self {
            vocabulary,
            weights,
        })
    }

    /// Terms kept, sorted alphabetically (column order).
    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    /// Document-term weights.
    pub fn weights(&self) -> &DMatrix<f64> {
        &self.weights
    }

    /// Pairwise cosine similarity. Rows are unit length (or zero), so this is
    /// the Gram matrix.
    pub fn cosine_similarity(&self) -> DMatrix<f64> {
        &self.weights * self.weights.transpose()
    }
}
