use super::interface::SummarizeRequest;

pub fn summary_prompt(req: &SummarizeRequest) -> String {
    format!(
        "{}\nText:\n{}\nRespond only with the summary.",
        req.summary_length().instruction(),
        req.text
    )
}
