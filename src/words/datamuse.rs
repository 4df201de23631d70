//! Datamuse word API client
//!
//! Query building and response filtering are plain functions; the network call
//! itself only exists on wasm, where the browser's `fetch` is available.

use serde::Deserialize;

use super::{WordMode, WordRequest, WordSupplyError};

pub const BASE_URL: &str = "https://api.datamuse.com/words";

/// Upper bound on results per query
pub const MAX_RESULTS: u32 = 1000;

/// One entry of a Datamuse response
#[derive(Debug, Clone, Deserialize)]
pub struct DatamuseWord {
    pub word: String,
    #[serde(default)]
    pub score: Option<u64>,
}

/// Build the spelling-pattern query for a request
pub fn query_url(request: &WordRequest) -> Result<String, WordSupplyError> {
    if request.length == 0 {
        return Err(WordSupplyError::InvalidRequest(
            "length must be positive".to_string(),
        ));
    }
    let pattern = match request.mode {
        WordMode::Letter(letter) if letter.is_ascii_alphabetic() => format!("*{letter}*"),
        WordMode::Letter(letter) => {
            return Err(WordSupplyError::InvalidRequest(format!(
                "{letter:?} is not a single alphabetic character"
            )));
        }
        // `?` matches exactly one character
        WordMode::Free => "?".repeat(request.length),
    };
    Ok(format!("{BASE_URL}?sp={pattern}&max={MAX_RESULTS}"))
}

/// Decode a response body and keep the words usable for `request`
pub fn parse_response(json: &str, request: &WordRequest) -> Result<Vec<String>, WordSupplyError> {
    let entries: Vec<DatamuseWord> =
        serde_json::from_str(json).map_err(|e| WordSupplyError::Malformed(e.to_string()))?;
    Ok(entries
        .into_iter()
        .map(|entry| entry.word.to_ascii_lowercase())
        .filter(|word| request.accepts(word))
        .collect())
}

/// Fetch words for `request` from Datamuse (WASM only)
#[cfg(target_arch = "wasm32")]
pub async fn fetch_words(request: WordRequest) -> Result<Vec<String>, WordSupplyError> {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;

    let url = query_url(&request)?;
    let window =
        web_sys::window().ok_or_else(|| WordSupplyError::Network("no window".to_string()))?;

    let response = JsFuture::from(window.fetch_with_str(&url))
        .await
        .map_err(|e| WordSupplyError::Network(format!("{e:?}")))?;
    let response: web_sys::Response = response
        .dyn_into()
        .map_err(|_| WordSupplyError::Network("fetch did not yield a Response".to_string()))?;

    if !response.ok() {
        return Err(WordSupplyError::Status(response.status()));
    }

    let body = response
        .text()
        .map_err(|e| WordSupplyError::Network(format!("{e:?}")))?;
    let body = JsFuture::from(body)
        .await
        .map_err(|e| WordSupplyError::Network(format!("{e:?}")))?;
    let body = body
        .as_string()
        .ok_or_else(|| WordSupplyError::Malformed("body is not text".to_string()))?;

    let words = parse_response(&body, &request)?;
    log::info!("Fetched {} words for {:?}", words.len(), request);
    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_letter_mode() {
        let url = query_url(&WordRequest::new(WordMode::Letter('k'), 5)).unwrap();
        assert_eq!(url, "https://api.datamuse.com/words?sp=*k*&max=1000");
    }

    #[test]
    fn test_query_free_mode_uses_wildcards() {
        let url = query_url(&WordRequest::new(WordMode::Free, 4)).unwrap();
        assert!(url.ends_with("?sp=????&max=1000"));
    }

    #[test]
    fn test_query_rejects_bad_requests() {
        assert!(matches!(
            query_url(&WordRequest::new(WordMode::Letter('#'), 5)),
            Err(WordSupplyError::InvalidRequest(_))
        ));
        assert!(query_url(&WordRequest::new(WordMode::Free, 0)).is_err());
    }

    #[test]
    fn test_parse_filters_entries() {
        let json = r#"[
            {"word": "kayak", "score": 1200},
            {"word": "knock"},
            {"word": "-kite", "score": 3},
            {"word": "ski lift", "score": 2},
            {"word": "bike", "score": 9},
            {"word": "Karma", "score": 1}
        ]"#;
        let words = parse_response(json, &WordRequest::new(WordMode::Letter('k'), 5)).unwrap();
        assert_eq!(words, vec!["kayak", "knock", "karma"]);
    }

    #[test]
    fn test_parse_malformed() {
        let err = parse_response("{\"oops\":", &WordRequest::new(WordMode::Free, 5)).unwrap_err();
        assert!(matches!(err, WordSupplyError::Malformed(_)));
    }
}
