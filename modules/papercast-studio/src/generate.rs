use ai_client::{AiError, GenerationRequest, TextGenerator};
use papercast_common::{PapercastError, Result, Stage};
use tracing::debug;

/// Run one generation and return its first candidate, trimmed. The answer
/// may be blank; provider failures become errors scoped to `stage`.
pub(crate) async fn first_answer(
    generator: &dyn TextGenerator,
    request: &GenerationRequest,
    stage: Stage,
) -> Result<String> {
    debug!(
        %stage,
        model = generator.model(),
        prompt_chars = request.prompt.chars().count(),
        max_tokens = request.max_tokens,
        "generation request"
    );

    let candidates = generator
        .generate(request)
        .await
        .map_err(|e| provider_error(stage, e))?;
    ai_client::first_candidate(candidates, "generation").map_err(|e| provider_error(stage, e))
}

/// Like `first_answer`, but a blank answer is a failure of `stage`.
pub(crate) async fn first_text(
    generator: &dyn TextGenerator,
    request: &GenerationRequest,
    stage: Stage,
) -> Result<String> {
    let text = first_answer(generator, request, stage).await?;
    if text.is_empty() {
        return Err(PapercastError::stage(stage, "model returned an empty answer"));
    }
    Ok(text)
}

/// Stage-scoped error; rejected credentials and exhausted quota say so.
pub(crate) fn provider_error(stage: Stage, err: AiError) -> PapercastError {
    if err.is_auth_or_quota() {
        PapercastError::stage(
            stage,
            format!("{err} (check the API key and account quota)"),
        )
    } else {
        PapercastError::stage(stage, err)
    }
}
