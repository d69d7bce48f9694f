//! Wire types for the QA pipeline service.
//!
//! The pipeline speaks the retrieval framework's native JSON: answers carry
//! `document_ids` and `offsets_in_document` lists even though each extractive
//! answer has exactly one source span.

use serde::{Deserialize, Serialize};

use crate::domain::{Answer, AnswerSpan, IndexBuildRequest, QaQuery, QaResult};

/// Body of `POST /index`.
#[derive(Debug, Serialize)]
pub struct IndexBuildRequestDto {
    /// Owner of the corpus being indexed.
    pub user_id: String,
    /// Directory holding the owner's uploaded files.
    pub corpus_dir: String,
    /// Words per passage when splitting documents.
    pub split_length: u32,
}

impl From<&IndexBuildRequest> for IndexBuildRequestDto {
    fn from(request: &IndexBuildRequest) -> Self {
        Self {
            user_id: request.user_id.to_string(),
            corpus_dir: request.corpus_dir.to_string_lossy().into_owned(),
            split_length: request.split_length.get(),
        }
    }
}

/// Body of `POST /query`.
#[derive(Debug, Serialize)]
pub struct QueryRequestDto {
    /// Owner whose index is queried.
    pub user_id: String,
    /// Natural-language question.
    pub query: String,
    /// Passages the retriever returns.
    pub top_k_retriever: u32,
    /// Answer candidates the reader returns.
    pub top_k_reader: u32,
}

impl From<&QaQuery> for QueryRequestDto {
    fn from(query: &QaQuery) -> Self {
        Self {
            user_id: query.user_id.to_string(),
            query: query.question.as_str().to_owned(),
            top_k_retriever: query.retriever_top_k.get(),
            top_k_reader: query.reader_top_k.get(),
        }
    }
}

/// Answer span offsets as the pipeline reports them.
#[derive(Debug, Deserialize)]
pub struct OffsetDto {
    /// Character offset where the span starts.
    pub start: u64,
    /// Character offset just past the span.
    pub end: u64,
}

/// One answer candidate from the reader.
///
/// `answer` is `null` when the reader predicts "no answer"; those entries are
/// dropped during conversion.
#[derive(Debug, Deserialize)]
pub struct AnswerDto {
    /// Extracted answer text, or `null` for a no-answer prediction.
    pub answer: Option<String>,
    /// Reader confidence.
    #[serde(default)]
    pub score: Option<f32>,
    /// Passage surrounding the answer.
    #[serde(default)]
    pub context: Option<String>,
    /// Source document identifiers; the first is the answer's source.
    #[serde(default)]
    pub document_ids: Vec<String>,
    /// Span offsets; parallel to `document_ids`.
    #[serde(default)]
    pub offsets_in_document: Vec<OffsetDto>,
}

/// Response of `POST /query`.
#[derive(Debug, Deserialize)]
pub struct QueryResponseDto {
    /// Question as the pipeline saw it.
    pub query: String,
    /// Answer candidates, best first.
    #[serde(default)]
    pub answers: Vec<AnswerDto>,
}

impl QueryResponseDto {
    /// Convert the wire payload into the domain result, dropping no-answer
    /// entries.
    pub fn into_domain(self) -> QaResult {
        let answers = self
            .answers
            .into_iter()
            .filter_map(|dto| {
                let answer = dto.answer?;
                Some(Answer {
                    answer,
                    score: dto.score.unwrap_or(0.0),
                    context: dto.context,
                    document_id: dto.document_ids.into_iter().next(),
                    span: dto
                        .offsets_in_document
                        .into_iter()
                        .next()
                        .map(|offset| AnswerSpan {
                            start: offset.start,
                            end: offset.end,
                        }),
                })
            })
            .collect();
        QaResult {
            query: self.query,
            answers,
        }
    }
}
