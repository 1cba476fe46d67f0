use serde::{Deserialize, Serialize};

/// Body of `POST /summarize`
#[derive(Debug, Serialize, Deserialize)]
pub struct SummarizeRequest {
    pub text: String,
    #[serde(default = "default_length")]
    pub length: String,
}

fn default_length() -> String {
    "medium".to_string()
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SummarizeResponse {
    pub summary: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SummaryLength {
    Short,
    #[default]
    Medium,
    Long,
}

impl SummaryLength {
    /// Case-insensitive; anything unrecognized is treated as `Medium`
    pub fn parse_lenient(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "short" => Self::Short,
            "long" => Self::Long,
            _ => Self::Medium,
        }
    }

    pub fn instruction(self) -> &'static str {
        match self {
            Self::Short => "Summarize the text in 2 lines.",
            Self::Medium => "Summarize the text in 5 lines.",
            Self::Long => "Summarize the text in 10 lines.",
        }
    }
}

impl SummarizeRequest {
    pub fn summary_length(&self) -> SummaryLength {
        SummaryLength::parse_lenient(&self.length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_defaults_to_medium() {
        let req: SummarizeRequest = serde_json::from_str(r#"{"text": "abc"}"#).unwrap();
        assert_eq!(req.length, "medium");
        assert_eq!(req.summary_length(), SummaryLength::Medium);
    }

    #[test]
    fn parses_known_lengths_case_insensitively() {
        assert_eq!(SummaryLength::parse_lenient("SHORT"), SummaryLength::Short);
        assert_eq!(SummaryLength::parse_lenient("Medium"), SummaryLength::Medium);
        assert_eq!(SummaryLength::parse_lenient("long"), SummaryLength::Long);
    }

    #[test]
    fn unknown_length_falls_back_to_medium() {
        assert_eq!(SummaryLength::parse_lenient("tiny"), SummaryLength::Medium);
        assert_eq!(SummaryLength::parse_lenient(""), SummaryLength::Medium);
        assert_eq!(SummaryLength::parse_lenient(" short "), SummaryLength::Medium);
    }
}
