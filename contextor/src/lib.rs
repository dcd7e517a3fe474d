//! Grounded question answering on top of `rag-store`.
//!
//! [`AnswerEngine::answer`] retrieves the nearest documents for a question,
//! assembles a bounded context from them, asks the chat model once and
//! returns the answer with previews of the documents used. When nothing is
//! retrieved the model is not called and a fixed "no relevant documents"
//! answer is returned.

mod api_types;
mod cfg;
mod error;
mod llm;
pub mod prompt;

use std::sync::Arc;

use rag_store::{RagQuery, Retriever, ScoredDocument};
use tracing::{info, instrument};

pub use api_types::{AskOptions, QaAnswer, RelevantDocument};
pub use cfg::ContextorConfig;
pub use error::ContextorError;
pub use llm::AnswerGenerator;

/// Retrieval + synthesis.
#[derive(Clone)]
pub struct AnswerEngine {
    retriever: Retriever,
    generator: Arc<dyn AnswerGenerator>,
    cfg: ContextorConfig,
}

impl AnswerEngine {
    pub fn new(
        retriever: Retriever,
        generator: Arc<dyn AnswerGenerator>,
        cfg: ContextorConfig,
    ) -> Self {
        Self {
            retriever,
            generator,
            cfg,
        }
    }

    /// Answers `question` from the stored corpus.
    ///
    /// # Errors
    /// - [`ContextorError::EmptyQuestion`] for blank questions
    /// - [`ContextorError::Rag`] when embedding or the store fails
    /// - [`ContextorError::Generation`] when the chat model fails
    ///
    /// # Example
    /// ```no_run
    /// # use contextor::{AnswerEngine, AskOptions};
    /// # async fn run(engine: AnswerEngine) -> Result<(), contextor::ContextorError> {
    /// let qa = engine.answer("น้ำประปา", AskOptions::default()).await?;
    /// println!("{} ({} docs)", qa.answer, qa.relevant_documents.len());
    /// # Ok(()) }
    /// ```
    #[instrument(skip_all, fields(top_k = ?opts.top_k, scoped = opts.scope.is_some()))]
    pub async fn answer(
        &self,
        question: &str,
        opts: AskOptions,
    ) -> Result<QaAnswer, ContextorError> {
        if question.trim().is_empty() {
            return Err(ContextorError::EmptyQuestion);
        }

        let hits = self
            .retriever
            .retrieve_query(RagQuery {
                text: question,
                top_k: opts.top_k,
                filter: opts.scope,
            })
            .await?;

        let answer = self.synthesize(question, &hits).await?;
        let relevant_documents = hits
            .iter()
            .map(|d| RelevantDocument::from_scored(d, self.cfg.preview_chars))
            .collect();

        Ok(QaAnswer {
            answer,
            relevant_documents,
        })
    }

    /// Generates an answer from already retrieved documents.
    ///
    /// An empty `docs` slice short-circuits to [`prompt::NO_DOCUMENTS_ANSWER`].
    pub async fn synthesize(
        &self,
        question: &str,
        docs: &[ScoredDocument],
    ) -> Result<String, ContextorError> {
        if docs.is_empty() {
            info!("no documents retrieved; skipping generation");
            return Ok(prompt::NO_DOCUMENTS_ANSWER.to_string());
        }

        let context = prompt::build_context(docs, self.cfg.max_docs, self.cfg.doc_chars);
        let user = prompt::build_user_prompt(question, &context);
        let answer = self.generator.generate(prompt::SYSTEM_PROMPT, &user).await?;
        info!(docs = docs.len(), answer_chars = answer.chars().count(), "answer generated");
        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use directory::ScopeInfo;
    use futures::future::{self, BoxFuture};
    use rag_store::{
        EmbeddingsProvider, NewDocument, ScopeFilter, VectorStore, embed::hashing::HashingEmbedder,
        store::memory::MemoryStore,
    };

    use super::*;

    const DIM: usize = 32;

    /// Records prompts and replies with a fixed text (or fails).
    struct RecordingGenerator {
        prompts: Mutex<Vec<String>>,
        fail: bool,
    }

    impl RecordingGenerator {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                prompts: Mutex::new(Vec::new()),
                fail,
            })
        }

        fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    impl AnswerGenerator for RecordingGenerator {
        fn generate<'a>(
            &'a self,
            _system: &'a str,
            user: &'a str,
        ) -> BoxFuture<'a, Result<String, ContextorError>> {
            self.prompts.lock().unwrap().push(user.to_string());
            let res = if self.fail {
                Err(ContextorError::Generation("connection refused".into()))
            } else {
                Ok("ติดต่อการประปาส่วนภูมิภาคได้ครับ".to_string())
            };
            Box::pin(future::ready(res))
        }
    }

    fn scope(service_id: i32) -> ScopeInfo {
        ScopeInfo {
            service_id,
            district_id: 2,
            province_id: 1,
            service_name: "ประปา".into(),
            district_name: "เมือง".into(),
            province_name: "เชียงใหม่".into(),
        }
    }

    async fn engine(generator: Arc<RecordingGenerator>, docs: &[(&str, i32)]) -> AnswerEngine {
        let emb = Arc::new(HashingEmbedder::new(DIM));
        let store = Arc::new(MemoryStore::new(DIM));
        for (text, service_id) in docs {
            let embedding = emb.embed(text).await.unwrap();
            store
                .store(NewDocument {
                    content: text.to_string(),
                    scope: scope(*service_id),
                    embedding,
                })
                .await
                .unwrap();
        }
        let retriever = Retriever::new(emb, store, 1);
        AnswerEngine::new(retriever, generator, ContextorConfig::default())
    }

    #[tokio::test]
    async fn empty_corpus_skips_generation() {
        let g = RecordingGenerator::new(false);
        let e = engine(g.clone(), &[]).await;

        let qa = e.answer("น้ำประปา", AskOptions::default()).await.unwrap();
        assert_eq!(qa.answer, prompt::NO_DOCUMENTS_ANSWER);
        assert!(qa.relevant_documents.is_empty());
        assert_eq!(g.calls(), 0);
    }

    #[tokio::test]
    async fn blank_question_is_rejected() {
        let g = RecordingGenerator::new(false);
        let e = engine(g.clone(), &[("x", 1)]).await;
        assert!(matches!(
            e.answer("   ", AskOptions::default()).await,
            Err(ContextorError::EmptyQuestion)
        ));
        assert_eq!(g.calls(), 0);
    }

    #[tokio::test]
    async fn answer_is_grounded_in_retrieved_document() {
        let g = RecordingGenerator::new(false);
        let text = "น้ำประปาไม่ไหลต้องทำอย่างไร";
        let e = engine(g.clone(), &[(text, 5), ("ทำบัตรประชาชนใหม่", 6)]).await;

        let qa = e.answer("น้ำประปา", AskOptions::default()).await.unwrap();
        assert!(!qa.answer.is_empty());
        assert_eq!(qa.relevant_documents.len(), 1);

        let top = &qa.relevant_documents[0];
        assert_eq!(top.id, 1);
        assert_eq!(top.service_id, 5);
        assert!((0.0..=0.3).contains(&top.similarity_score));

        let prompts = g.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("คำถาม: น้ำประปา"));
        assert!(prompts[0].contains(text));
    }

    #[tokio::test]
    async fn generation_failure_is_surfaced() {
        let g = RecordingGenerator::new(true);
        let e = engine(g.clone(), &[("some text", 1)]).await;
        let err = e.answer("some text", AskOptions::default()).await.unwrap_err();
        assert!(matches!(err, ContextorError::Generation(m) if m == "connection refused"));
        assert_eq!(g.calls(), 1);
    }

    #[tokio::test]
    async fn top_k_and_scope_are_honoured() {
        let g = RecordingGenerator::new(false);
        let e = engine(g, &[("alpha beta", 1), ("alpha gamma", 2), ("alpha delta", 2)]).await;

        let all = e
            .answer("alpha", AskOptions { top_k: Some(3), scope: None })
            .await
            .unwrap();
        assert_eq!(all.relevant_documents.len(), 3);

        let scoped = e
            .answer(
                "alpha",
                AskOptions {
                    top_k: Some(3),
                    scope: Some(ScopeFilter {
                        service_id: Some(2),
                        ..Default::default()
                    }),
                },
            )
            .await
            .unwrap();
        assert_eq!(scoped.relevant_documents.len(), 2);
        assert!(scoped.relevant_documents.iter().all(|d| d.service_id == 2));
    }

    #[tokio::test]
    async fn previews_are_cut_with_ellipsis() {
        let g = RecordingGenerator::new(false);
        let long = format!("ค่าธรรมเนียม {}", "ก".repeat(400));
        let e = engine(g, &[(long.as_str(), 1)]).await;

        let qa = e.answer("ค่าธรรมเนียม", AskOptions::default()).await.unwrap();
        let p = &qa.relevant_documents[0].content_preview;
        assert!(p.ends_with("..."));
        assert_eq!(p.chars().count(), 203);

        let json = serde_json::to_value(&qa).unwrap();
        assert_eq!(json["relevant_documents"][0]["province"], "เชียงใหม่");
    }
}
