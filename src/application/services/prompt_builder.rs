use crate::domain::{AnalysisKind, AnalysisOptions, DocumentRecord};

/// Renders the analysis prompt for a document. Never fails: every
/// `AnalysisKind` has a template and `custom` falls back to a generic one.
pub fn build_analysis_prompt(
    document: &DocumentRecord,
    content: &str,
    kind: AnalysisKind,
    options: &AnalysisOptions,
) -> String {
    let header = document_header(document, content);

    match kind {
        AnalysisKind::Summary => format!(
            "Please provide a concise summary of the following document:\n{header}\n\n\
             Please summarize the key points in 3-5 bullets."
        ),
        AnalysisKind::Entities => format!(
            "Please extract all important entities from the following document:\n{header}\n\n\
             Extract entities in these categories:\n\
             - People\n\
             - Organizations\n\
             - Locations\n\
             - Dates\n\
             - Key terms/concepts\n\n\
             Format your response as a structured list by category."
        ),
        AnalysisKind::Sentiment => format!(
            "Please analyze the sentiment of the following document:\n{header}\n\n\
             Provide:\n\
             1. Overall sentiment (positive, negative, or neutral)\n\
             2. Confidence score (0-100%)\n\
             3. Brief explanation of your assessment\n\
             4. Key positive and negative elements if present"
        ),
        AnalysisKind::Custom => match options.custom_prompt.as_deref() {
            Some(prompt) if !prompt.is_empty() => prompt.to_string(),
            _ => format!("Analyze this document:\n{header}\n"),
        },
    }
}

fn document_header(document: &DocumentRecord, content: &str) -> String {
    format!(
        "Title: {}\nType: {}\n\nDOCUMENT CONTENT:\n{}",
        document.title, document.doc_type, content
    )
}
