use super::interface::TranslationRequest;

/// Instruction asking the model for the bare translation of `req.text`
pub fn translation_prompt(req: &TranslationRequest) -> String {
    format!(
        "Translate the following text from {} to {}.\n\
         Respond with only the translated text.\n\
         Text:\n{}",
        req.source_lang, req.target_lang, req.text
    )
}
