//! Prompt builder: fixed Thai system message + bounded context block.

use rag_store::{ScoredDocument, record::truncate_chars};

/// System instructions: polite Thai, accurate information.
pub const SYSTEM_PROMPT: &str = "คุณเป็นผู้ช่วยตอบคำถามภาษาไทย ตอบด้วยความสุภาพและให้ข้อมูลที่ถูกต้อง \
ใช้คำว่า 'ครับ' หรือ 'ค่ะ' ตามความเหมาะสม";

/// Answer returned when retrieval found nothing; the model is not called.
pub const NO_DOCUMENTS_ANSWER: &str = "ไม่พบเอกสารที่เกี่ยวข้อง";

/// Joins the first `max_docs` documents, each cut to `doc_chars` characters,
/// with blank lines. Works for any number of documents.
///
/// # Example
/// ```
/// # use contextor::prompt::build_context;
/// let ctx = build_context(&[], 3, 1000);
/// assert!(ctx.is_empty());
/// ```
pub fn build_context(docs: &[ScoredDocument], max_docs: usize, doc_chars: usize) -> String {
    docs.iter()
        .take(max_docs)
        .map(|d| truncate_chars(&d.content, doc_chars))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// User turn: instruction, question, reference data, answer-language rule.
pub fn build_user_prompt(question: &str, context: &str) -> String {
    format!(
        "ตอบคำถามต่อไปนี้โดยใช้ข้อมูลจากเอกสารที่เกี่ยวข้อง:\n\n\
         คำถาม: {question}\n\n\
         ข้อมูลอ้างอิง:\n{context}\n\n\
         กรุณาตอบเป็นภาษาไทยและให้ข้อมูลที่ถูกต้องตามเอกสารที่ให้มา \
         หากไม่มีข้อมูลในเอกสาร ให้บอกว่าไม่พบข้อมูลที่เกี่ยวข้อง\n",
        question = question.trim(),
    )
}
