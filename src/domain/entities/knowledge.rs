use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeChunk {
    pub id: Uuid,
    pub document_id: Uuid,
    pub document_name: String,
    pub content: String,
    pub chunk_index: usize,
}

impl KnowledgeChunk {
    pub fn new(
        document_id: Uuid,
        document_name: impl Into<String>,
        content: impl Into<String>,
        chunk_index: usize,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            document_id,
            document_name: document_name.into(),
            content: content.into(),
            chunk_index,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeHit {
    pub chunk: KnowledgeChunk,
    pub score: f32,
}

/// Source reference returned alongside knowledge search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    pub document_id: Uuid,
    pub document_name: String,
    pub chunk_text: String,
    pub relevance_score: f32,
}

impl From<KnowledgeHit> for Citation {
    fn from(hit: KnowledgeHit) -> Self {
        Self {
            document_id: hit.chunk.document_id,
            document_name: hit.chunk.document_name,
            chunk_text: hit.chunk.content,
            relevance_score: hit.score,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestedDocument {
    pub document_id: Uuid,
    pub document_name: String,
    pub chunks_count: usize,
}

/// Splits a document into paragraph-aligned chunks of at most `chunk_size`
/// characters.
///
/// When a chunk fills up, roughly the last `overlap` characters of it (cut at
/// a word boundary) open the next chunk so that retrieval does not lose
/// context at the seam. Paragraphs longer than `chunk_size` are broken at the
/// last whitespace that fits. `overlap` is capped at half of `chunk_size`.
pub fn chunk_text(
    document_id: Uuid,
    document_name: &str,
    content: &str,
    chunk_size: usize,
    overlap: usize,
) -> Vec<KnowledgeChunk> {
    let chunk_size = chunk_size.max(1);
    let overlap = overlap.min(chunk_size / 2);

    let pieces = content
        .split("\n\n")
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .flat_map(|p| split_long(p, chunk_size));

    let mut texts: Vec<String> = Vec::new();
    let mut current = String::new();

    for piece in pieces {
        if !current.is_empty() && char_len(&current) + 2 + char_len(piece) > chunk_size {
            let tail = overlap_tail(&current, overlap).to_string();
            texts.push(std::mem::take(&mut current));

            if !tail.is_empty() && char_len(&tail) + 2 + char_len(piece) <= chunk_size {
                current = tail;
            }
        }

        if !current.is_empty() {
            current.push_str("\n\n");
        }
        current.push_str(piece);
    }

    if !current.is_empty() {
        texts.push(current);
    }

    texts
        .into_iter()
        .enumerate()
        .map(|(i, text)| KnowledgeChunk::new(document_id, document_name, text, i))
        .collect()
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn split_long(paragraph: &str, size: usize) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut rest = paragraph;

    while char_len(rest) > size {
        let limit = rest
            .char_indices()
            .nth(size)
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        let cut = rest[..limit]
            .rfind(char::is_whitespace)
            .filter(|&i| i > 0)
            .unwrap_or(limit);

        pieces.push(rest[..cut].trim_end());
        rest = rest[cut..].trim_start();
    }

    if !rest.is_empty() {
        pieces.push(rest);
    }
    pieces
}

fn overlap_tail(chunk: &str, overlap: usize) -> &str {
    if overlap == 0 {
        return "";
    }

    let start = match chunk.char_indices().rev().nth(overlap - 1) {
        Some((i, _)) => i,
        None => return chunk,
    };
    let tail = &chunk[start..];

    if start == 0 || chunk[..start].ends_with(char::is_whitespace) {
        return tail.trim_start();
    }

    // mid-word: start at the next word
    match tail.find(char::is_whitespace) {
        Some(ws) => tail[ws..].trim_start(),
        None => "",
    }
}
