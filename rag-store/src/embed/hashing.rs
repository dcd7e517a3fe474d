//! Deterministic feature-hashing embedder.
//!
//! Text is cut into runs of letters, digits and combining marks, so Thai
//! words keep their vowel and tone marks. Each run contributes character
//! trigrams (or the whole run when shorter), hashed with FNV-1a into `dim`
//! buckets. A trigram's weight is `1 / (position + 1)` within its run, so a
//! query that matches the start of an unsegmented Thai sentence stays close
//! to it. Used for offline runs and tests where no embedding model is
//! reachable.

use futures::future::{self, BoxFuture};

use super::EmbeddingsProvider;
use crate::errors::RagError;

const GRAM: usize = 3;

pub struct HashingEmbedder {
    dim: usize,
}

impl HashingEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim: dim.max(1) }
    }

    fn vectorize(&self, text: &str) -> Result<Vec<f32>, RagError> {
        let mut v = vec![0f32; self.dim];
        let mut any = false;
        for run in text.split(|c: char| !is_word_char(c)).filter(|t| !t.is_empty()) {
            let chars: Vec<char> = run.to_lowercase().chars().collect();
            if chars.len() <= GRAM {
                v[self.bucket(&chars)] += 1.0;
            } else {
                for (i, gram) in chars.windows(GRAM).enumerate() {
                    v[self.bucket(gram)] += 1.0 / (i + 1) as f32;
                }
            }
            any = true;
        }
        if !any {
            return Err(RagError::Embedding("nothing to embed".into()));
        }
        Ok(v)
    }

    fn bucket(&self, gram: &[char]) -> usize {
        let s: String = gram.iter().collect();
        (fnv1a(&s) % self.dim as u64) as usize
    }
}

/// Letters, digits, and the combining marks Thai (and Latin diacritics) use.
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric()
        || matches!(c,
            '\u{0300}'..='\u{036F}'
            | '\u{0E31}'
            | '\u{0E34}'..='\u{0E3A}'
            | '\u{0E47}'..='\u{0E4E}')
}

fn fnv1a(s: &str) -> u64 {
    s.bytes().fold(0xcbf2_9ce4_8422_2325, |h, b| {
        (h ^ u64::from(b)).wrapping_mul(0x0000_0100_0000_01b3)
    })
}

impl EmbeddingsProvider for HashingEmbedder {
    fn embed<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<Vec<f32>, RagError>> {
        Box::pin(future::ready(self.vectorize(text)))
    }

    fn dim(&self) -> usize {
        self.dim
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::cosine_distance;

    #[tokio::test]
    async fn same_text_same_vector() {
        let e = HashingEmbedder::new(32);
        let a = e.embed("Renew an ID card").await.unwrap();
        let b = e.embed("renew an id CARD").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 32);
    }

    #[tokio::test]
    async fn shared_vocabulary_is_closer() {
        let e = HashingEmbedder::new(64);
        let q = e.embed("water bill payment").await.unwrap();
        let near = e.embed("how to pay the water bill").await.unwrap();
        let far = e.embed("building permit for a house").await.unwrap();
        assert!(cosine_distance(&q, &near) < cosine_distance(&q, &far));
    }

    #[test]
    fn thai_marks_do_not_split_words() {
        assert!("น้ำประปา".chars().all(is_word_char));
        assert!(!is_word_char(' '));
        assert!(!is_word_char('?'));
    }

    #[tokio::test]
    async fn thai_prefix_query_is_close_to_sentence() {
        let e = HashingEmbedder::new(64);
        let doc = e.embed("น้ำประปาไม่ไหลต้องทำอย่างไร").await.unwrap();
        let other = e.embed("ทำบัตรประชาชนใหม่").await.unwrap();
        let q = e.embed("น้ำประปา").await.unwrap();

        let near = cosine_distance(&q, &doc);
        assert!(near <= 0.3, "distance {near}");
        assert!(near < cosine_distance(&q, &other));
    }

    #[tokio::test]
    async fn punctuation_only_is_rejected() {
        let e = HashingEmbedder::new(8);
        assert!(matches!(e.embed(" ?! ").await, Err(RagError::Embedding(_))));
    }
}
