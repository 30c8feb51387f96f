#![allow(dead_code)]

pub mod harness;
pub mod http_client;

use campus::store::{ChunkKind, ChunkMetadata, ChunkRecord, DocumentRecord, InMemoryStore};

pub const EXAM_DOC_ID: &str = "exam-circular";

/// Store seeded with one exam circular split into two text chunks and a timetable image.
pub fn seeded_store() -> InMemoryStore {
    let store = InMemoryStore::new();
    store.insert_document(DocumentRecord {
        id: EXAM_DOC_ID.to_string(),
        name: "Exam Circular 2099".to_string(),
        file_url: Some("https://files.example/exam-circular.pdf".to_string()),
    });
    store.insert_chunks([
        chunk(
            "ec-1",
            1,
            ChunkKind::Text,
            "TY exam forms for sem 3 must be submitted on the student portal.",
            vec![0.9, 0.1, 0.0],
        ),
        chunk(
            "ec-2",
            2,
            ChunkKind::Text,
            "Late submissions attract a fine of Rs. 500.",
            vec![0.6, 0.4, 0.0],
        ),
        chunk(
            "ec-3",
            3,
            ChunkKind::Image,
            "[Image on page 3]",
            vec![0.0, 0.0, 1.0],
        ),
    ]);
    store
}

fn chunk(id: &str, page: u32, kind: ChunkKind, content: &str, embedding: Vec<f32>) -> ChunkRecord {
    ChunkRecord {
        id: id.to_string(),
        document_id: EXAM_DOC_ID.to_string(),
        index: page - 1,
        content: content.to_string(),
        kind,
        embedding: Some(embedding),
        metadata: ChunkMetadata {
            page_number: Some(page),
            ..Default::default()
        },
    }
}

/// Vector whose cosine with `[1, 0, 0]` is `cos`.
pub fn at_cosine(cos: f32) -> Vec<f32> {
    vec![cos, (1.0 - cos * cos).sqrt(), 0.0]
}
