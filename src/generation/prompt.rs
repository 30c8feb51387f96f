use super::PromptPart;
use crate::retrieval::ScoredChunk;
use crate::store::ChunkKind;

/// MIME type of inline chunk images.
pub const PNG_MIME_TYPE: &str = "image/png";

const CLOSING_INSTRUCTION: &str = "\n\nPlease answer the question based on the provided text and images. Be specific and cite page numbers.";

/// Builds the prompt for `question` grounded on `chunks`.
///
/// Layout: the question header, one block with every text chunk as `[Page N]: content`,
/// each image chunk that carries image data as a label followed by the image, then the
/// closing instruction. Image chunks without image data are left out.
pub fn build_multimodal_prompt(question: &str, chunks: &[ScoredChunk]) -> Vec<PromptPart> {
    let mut parts = vec![PromptPart::Text(format!(
        "Question: {question}\n\nContext:\n"
    ))];

    let excerpts: Vec<String> = chunks
        .iter()
        .filter(|c| c.chunk.kind == ChunkKind::Text)
        .map(|c| format!("[Page {}]: {}", page_label(c), c.chunk.content))
        .collect();
    if !excerpts.is_empty() {
        parts.push(PromptPart::Text(format!(
            "Text excerpts:\n{}\n",
            excerpts.join("\n\n")
        )));
    }

    for scored in chunks.iter().filter(|c| c.chunk.kind == ChunkKind::Image) {
        let Some(data) = scored.chunk.metadata.image_data.as_deref() else {
            continue;
        };
        if data.is_empty() {
            continue;
        }
        parts.push(PromptPart::Text(format!(
            "\n[Image from page {}]:\n",
            page_label(scored)
        )));
        parts.push(PromptPart::InlineImage {
            mime_type: PNG_MIME_TYPE.to_string(),
            data: data.to_string(),
        });
    }

    parts.push(PromptPart::text(CLOSING_INSTRUCTION));
    parts
}

fn page_label(scored: &ScoredChunk) -> String {
    scored
        .chunk
        .metadata
        .page_number
        .map(|p| p.to_string())
        .unwrap_or_else(|| "?".to_string())
}
