use url::form_urlencoded;

use crate::common::UtmParams;

/// Appends a `/` unless the URL already ends with one.
pub fn ensure_trailing_slash(base_url: &str) -> String {
    if base_url.ends_with('/') {
        base_url.to_string()
    } else {
        format!("{}/", base_url)
    }
}

/// Form-urlencodes the params in fixed key order.
pub fn encode_query(params: &UtmParams) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in params.query_pairs() {
        serializer.append_pair(key, value);
    }
    serializer.finish()
}

/// `base_url + "?" + query`. The base URL must already be slash-terminated.
pub fn assemble_link(base_url: &str, params: &UtmParams) -> String {
    format!("{}?{}", base_url, encode_query(params))
}
