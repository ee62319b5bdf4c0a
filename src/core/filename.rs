/// Picks the local file name for a download.
///
/// An explicit name always wins, then the `filename` parameter of the
/// `content-disposition` header, then the last `/` segment of the URL.
pub fn resolve_file_name(
    explicit: Option<&str>,
    content_disposition: Option<&str>,
    url: &str,
) -> String {
    if let Some(name) = explicit {
        return name.to_string();
    }

    if let Some(name) = content_disposition.and_then(disposition_file_name) {
        return name;
    }

    url_file_name(url).to_string()
}

/// Last `/`-delimited segment of the raw URL string. Any query string stays
/// attached.
pub fn url_file_name(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

pub fn disposition_file_name(header: &str) -> Option<String> {
    let (_, params) = parse_header(header);
    params
        .into_iter()
        .find(|(key, _)| key == "filename")
        .map(|(_, value)| value)
}

/// Splits a header value such as `attachment; filename="a.csv"` into its
/// leading token and its lowercased `key=value` parameters.
pub fn parse_header(header: &str) -> (String, Vec<(String, String)>) {
    let mut parts = split_params(header).into_iter();
    let value = parts.next().unwrap_or_default().trim().to_string();

    let params = parts
        .filter_map(|part| {
            let (key, value) = part.split_once('=')?;
            Some((key.trim().to_lowercase(), unquote(value.trim())))
        })
        .collect();

    (value, params)
}

// Splits on `;` outside of double-quoted strings.
fn split_params(header: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut escaped = false;

    for (i, c) in header.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            ';' if !in_quotes => {
                parts.push(&header[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&header[start..]);
    parts
}

fn unquote(value: &str) -> String {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        value[1..value.len() - 1]
            .replace("\\\\", "\\")
            .replace("\\\"", "\"")
    } else {
        value.to_string()
    }
}
