//! TF-IDF text vectorizer.

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

use regex::Regex;
use serde::{Deserialize, Serialize};
use veritas_core::{ModelError, SparseVector, Vectorizer};

/// Tokens of two or more word characters.
pub const DEFAULT_TOKEN_PATTERN: &str = r"(?u)\b\w\w+\b";

/// Row normalization applied after weighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    L1,
    L2,
}

fn default_true() -> bool {
    true
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

fn default_norm() -> Option<Norm> {
    Some(Norm::L2)
}

fn default_token_pattern() -> String {
    DEFAULT_TOKEN_PATTERN.to_string()
}

/// Serialized form of a fitted TF-IDF vectorizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfSpec {
    /// Term to column index.
    pub vocabulary: HashMap<String, usize>,
    /// Inverse document frequency per column. Absent means raw term counts.
    #[serde(default)]
    pub idf: Option<Vec<f64>>,
    #[serde(default = "default_true")]
    pub lowercase: bool,
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),
    #[serde(default)]
    pub stop_words: Vec<String>,
    /// Replace tf with `1 + ln(tf)`.
    #[serde(default)]
    pub sublinear_tf: bool,
    /// Clip term counts to one.
    #[serde(default)]
    pub binary: bool,
    #[serde(default = "default_norm")]
    pub norm: Option<Norm>,
    #[serde(default = "default_token_pattern")]
    pub token_pattern: String,
}

impl TfidfSpec {
    /// Builds a spec with default settings over the given vocabulary.
    pub fn new(vocabulary: HashMap<String, usize>, idf: Option<Vec<f64>>) -> Self {
        Self {
            vocabulary,
            idf,
            lowercase: true,
            ngram_range: default_ngram_range(),
            stop_words: Vec::new(),
            sublinear_tf: false,
            binary: false,
            norm: default_norm(),
            token_pattern: default_token_pattern(),
        }
    }
}

/// Fitted TF-IDF vectorizer ready for inference.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Option<Vec<f64>>,
    lowercase: bool,
    ngram_range: (usize, usize),
    stop_words: HashSet<String>,
    sublinear_tf: bool,
    binary: bool,
    norm: Option<Norm>,
    token_pattern: Regex,
}

impl TfidfVectorizer {
    pub fn from_spec(spec: TfidfSpec) -> Result<Self, ModelError> {
        let n_features = spec.vocabulary.len();
        if n_features == 0 {
            return Err(ModelError::invalid("tfidf vocabulary is empty"));
        }

        let mut seen = vec![false; n_features];
        for (term, &idx) in &spec.vocabulary {
            if idx >= n_features {
                return Err(ModelError::invalid(format!(
                    "tfidf column {} for '{}' exceeds vocabulary size {}",
                    idx, term, n_features
                )));
            }
            if std::mem::replace(&mut seen[idx], true) {
                return Err(ModelError::invalid(format!("tfidf column {} is assigned twice", idx)));
            }
        }

        if let Some(idf) = &spec.idf {
            if idf.len() != n_features {
                return Err(ModelError::invalid(format!(
                    "tfidf has {} idf weights for {} terms",
                    idf.len(),
                    n_features
                )));
            }
            if idf.iter().any(|w| !w.is_finite()) {
                return Err(ModelError::invalid("tfidf idf weights must be finite"));
            }
        }

        let (min_n, max_n) = spec.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(ModelError::invalid(format!("invalid ngram range ({}, {})", min_n, max_n)));
        }

        let token_pattern = Regex::new(&spec.token_pattern)
            .map_err(|e| ModelError::invalid(format!("invalid token pattern: {}", e)))?;

        Ok(Self {
            vocabulary: spec.vocabulary,
            idf: spec.idf,
            lowercase: spec.lowercase,
            ngram_range: spec.ngram_range,
            stop_words: spec.stop_words.into_iter().collect(),
            sublinear_tf: spec.sublinear_tf,
            binary: spec.binary,
            norm: spec.norm,
            token_pattern,
        })
    }

    fn tokenize<'a>(&self, doc: &'a str) -> Vec<&'a str> {
        self.token_pattern
            .find_iter(doc)
            .map(|m| m.as_str())
            .filter(|t| !self.stop_words.contains(*t))
            .collect()
    }

    fn term_counts(&self, tokens: &[&str]) -> HashMap<usize, f64> {
        let mut counts = HashMap::new();
        let (min_n, max_n) = self.ngram_range;

        for n in min_n..=max_n {
            if tokens.len() < n {
                break;
            }
            for window in tokens.windows(n) {
                let idx = if n == 1 {
                    self.vocabulary.get(window[0])
                } else {
                    self.vocabulary.get(&window.join(" "))
                };
                if let Some(&idx) = idx {
                    *counts.entry(idx).or_insert(0.0) += 1.0;
                }
            }
        }

        counts
    }

    fn weight(&self, idx: usize, count: f64) -> f64 {
        let tf = if self.binary {
            1.0
        } else if self.sublinear_tf {
            1.0 + count.ln()
        } else {
            count
        };
        match &self.idf {
            Some(idf) => tf * idf[idx],
            None => tf,
        }
    }
}

impl Vectorizer for TfidfVectorizer {
    fn kind(&self) -> &'static str {
        "tfidf"
    }

    fn n_features(&self) -> usize {
        self.vocabulary.len()
    }

    fn transform(&self, text: &str) -> Result<SparseVector, ModelError> {
        let doc = if self.lowercase {
            Cow::Owned(text.to_lowercase())
        } else {
            Cow::Borrowed(text)
        };

        let tokens = self.tokenize(&doc);
        let counts = self.term_counts(&tokens);
        let weighted = counts.into_iter().map(|(idx, count)| (idx, self.weight(idx, count)));
        let mut vector = SparseVector::from_entries(self.n_features(), weighted)?;

        let norm = match self.norm {
            Some(Norm::L2) => vector.l2_norm(),
            Some(Norm::L1) => vector.l1_norm(),
            None => 0.0,
        };
        if norm > 0.0 {
            vector.scale(1.0 / norm);
        }

        Ok(vector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocabulary(terms: &[&str]) -> HashMap<String, usize> {
        terms.iter().enumerate().map(|(i, t)| (t.to_string(), i)).collect()
    }

    #[test]
    fn test_out_of_vocabulary_is_empty() {
        let v = TfidfVectorizer::from_spec(TfidfSpec::new(vocabulary(&["government", "report"]), None))
            .unwrap();
        let x = v.transform("xyzzyqqqqzzzzznonsense1234").unwrap();
        assert_eq!(x.nnz(), 0);
        assert_eq!(x.dim(), 2);
    }

    #[test]
    fn test_single_character_tokens_ignored() {
        let v = TfidfVectorizer::from_spec(TfidfSpec::new(vocabulary(&["a", "report"]), None)).unwrap();
        let x = v.transform("a a a").unwrap();
        assert!(x.is_empty());
    }

    #[test]
    fn test_lowercase_and_l2_norm() {
        let spec = TfidfSpec::new(vocabulary(&["senate", "vote", "budget"]), Some(vec![1.0, 1.0, 2.0]));
        let v = TfidfVectorizer::from_spec(spec).unwrap();

        let x = v.transform("SENATE Vote on the budget").unwrap();
        assert_eq!(x.nnz(), 3);
        assert!((x.l2_norm() - 1.0).abs() < 1e-12);
        // budget carries twice the idf weight of the other terms
        assert!((x.get(2) - 2.0 * x.get(0)).abs() < 1e-12);
    }

    #[test]
    fn test_raw_counts_without_norm() {
        let mut spec = TfidfSpec::new(vocabulary(&["fake", "news"]), None);
        spec.norm = None;
        let v = TfidfVectorizer::from_spec(spec).unwrap();

        let x = v.transform("fake fake news").unwrap();
        assert_eq!(x.get(0), 2.0);
        assert_eq!(x.get(1), 1.0);
    }

    #[test]
    fn test_sublinear_and_binary() {
        let mut spec = TfidfSpec::new(vocabulary(&["fake"]), None);
        spec.norm = None;
        spec.sublinear_tf = true;
        let sublinear = TfidfVectorizer::from_spec(spec.clone()).unwrap();
        let x = sublinear.transform("fake fake fake").unwrap();
        assert!((x.get(0) - (1.0 + 3f64.ln())).abs() < 1e-12);

        spec.sublinear_tf = false;
        spec.binary = true;
        let binary = TfidfVectorizer::from_spec(spec).unwrap();
        assert_eq!(binary.transform("fake fake fake").unwrap().get(0), 1.0);
    }

    #[test]
    fn test_bigrams_and_stop_words() {
        let mut spec = TfidfSpec::new(vocabulary(&["white house", "house", "white"]), None);
        spec.ngram_range = (1, 2);
        spec.norm = None;
        spec.stop_words = vec!["the".into()];
        let v = TfidfVectorizer::from_spec(spec).unwrap();

        let x = v.transform("The White House").unwrap();
        assert_eq!(x.get(0), 1.0);
        assert_eq!(x.get(1), 1.0);
        assert_eq!(x.get(2), 1.0);
    }

    #[test]
    fn test_rejects_inconsistent_idf() {
        let spec = TfidfSpec::new(vocabulary(&["one", "two"]), Some(vec![1.0]));
        assert!(matches!(TfidfVectorizer::from_spec(spec), Err(ModelError::Invalid(_))));
    }

    #[test]
    fn test_rejects_out_of_range_column() {
        let mut vocab = vocabulary(&["one"]);
        vocab.insert("two".into(), 5);
        assert!(TfidfVectorizer::from_spec(TfidfSpec::new(vocab, None)).is_err());
    }

    #[test]
    fn test_rejects_bad_pattern_and_ngrams() {
        let mut spec = TfidfSpec::new(vocabulary(&["one"]), None);
        spec.token_pattern = "(".into();
        assert!(TfidfVectorizer::from_spec(spec.clone()).is_err());

        spec.token_pattern = DEFAULT_TOKEN_PATTERN.into();
        spec.ngram_range = (2, 1);
        assert!(TfidfVectorizer::from_spec(spec).is_err());
    }
}
