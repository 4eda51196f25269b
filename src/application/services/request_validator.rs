use serde_json::{Map, Value};

use crate::domain::{
    AnalysisKind, AnalysisOptions, ChatMessage, ConversationId, DocumentId, MAX_MAX_TOKENS,
    MIN_MAX_TOKENS, ModelParameterOverrides, ModelParameters, RetrievalFilter,
};

const MIN_CONVERSATION_ID_LEN: usize = 2;
const MAX_CONVERSATION_ID_LEN: usize = 100;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("no messages provided")]
    NoMessages,
    #[error("temperature out of range: must be between 0 and 1")]
    TemperatureOutOfRange,
    #[error("maxTokens out of range: must be between 1 and 4000")]
    MaxTokensOutOfRange,
    #[error("missing documentId")]
    MissingDocumentId,
    #[error("invalid analysis kind: {0}")]
    InvalidAnalysisKind(String),
    #[error("missing query")]
    MissingQuery,
    #[error("invalid filter '{0}': values must be strings or non-empty lists of strings")]
    InvalidFilter(String),
    #[error("missing conversationId")]
    MissingConversationId,
    #[error("invalid conversationId: use 2-100 characters from [0-9A-Za-z._:-]")]
    InvalidConversationId,
    #[error("malformed request: {0}")]
    MalformedRequest(String),
}

pub fn validate_chat_request(
    messages: &[ChatMessage],
    parameters: Option<&ModelParameterOverrides>,
) -> Result<ModelParameters, ValidationError> {
    if messages.is_empty() {
        return Err(ValidationError::NoMessages);
    }

    let overrides = parameters.copied().unwrap_or_default();

    if let Some(temperature) = overrides.temperature {
        if !(0.0..=1.0).contains(&temperature) {
            return Err(ValidationError::TemperatureOutOfRange);
        }
    }

    if let Some(max_tokens) = overrides.max_tokens {
        if !(MIN_MAX_TOKENS..=MAX_MAX_TOKENS).contains(&max_tokens) {
            return Err(ValidationError::MaxTokensOutOfRange);
        }
    }

    Ok(ModelParameters::merged(&overrides))
}

pub fn validate_analysis_request(
    document_id: Option<&str>,
    options: &AnalysisOptions,
) -> Result<(DocumentId, AnalysisKind), ValidationError> {
    let document_id = document_id
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or(ValidationError::MissingDocumentId)?;

    let kind = match options.analysis_type.as_deref() {
        None => AnalysisKind::default(),
        Some(name) => name
            .parse::<AnalysisKind>()
            .map_err(|_| ValidationError::InvalidAnalysisKind(name.to_string()))?,
    };

    Ok((DocumentId::new(document_id), kind))
}

pub fn validate_search_request(query: Option<&str>) -> Result<String, ValidationError> {
    query
        .filter(|q| !q.trim().is_empty())
        .map(str::to_string)
        .ok_or(ValidationError::MissingQuery)
}

/// String values become equality conditions, string lists become any-of
/// conditions. The knowledge base combines all conditions with AND.
pub fn parse_search_filters(
    filters: Option<&Map<String, Value>>,
) -> Result<Vec<RetrievalFilter>, ValidationError> {
    let Some(filters) = filters else {
        return Ok(Vec::new());
    };

    filters
        .iter()
        .map(|(key, value)| match value {
            Value::String(s) => Ok(RetrievalFilter::Equals {
                key: key.clone(),
                value: s.clone(),
            }),
            Value::Array(items) if !items.is_empty() => items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
                .map(|values| RetrievalFilter::AnyOf {
                    key: key.clone(),
                    values,
                })
                .ok_or_else(|| ValidationError::InvalidFilter(key.clone())),
            _ => Err(ValidationError::InvalidFilter(key.clone())),
        })
        .collect()
}

/// Conversation ids double as agent session ids, so they follow the agent
/// runtime's session id format. Blank ids mean "start a new conversation".
pub fn validate_conversation_id(
    conversation_id: Option<&str>,
) -> Result<Option<ConversationId>, ValidationError> {
    let Some(id) = conversation_id.map(str::trim).filter(|id| !id.is_empty()) else {
        return Ok(None);
    };

    let well_formed = (MIN_CONVERSATION_ID_LEN..=MAX_CONVERSATION_ID_LEN).contains(&id.len())
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | ':' | '-'))
        && !id.chars().all(|c| c == '.');

    if well_formed {
        Ok(Some(ConversationId::new(id)))
    } else {
        Err(ValidationError::InvalidConversationId)
    }
}

pub fn validate_history_request(
    conversation_id: Option<&str>,
) -> Result<ConversationId, ValidationError> {
    conversation_id
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(ConversationId::new)
        .ok_or(ValidationError::MissingConversationId)
}
