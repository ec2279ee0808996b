//! `Content-Disposition` filename extraction and reduction to a bare file name.

/// Extracts the suggested filename from a `Content-Disposition` header value.
///
/// Understands quoted and token `filename` parameters and RFC 5987
/// `filename*` (UTF-8 or ISO-8859-1); `filename*` wins when both are present.
/// Returns `None` when the header carries no usable filename.
pub fn parse_content_disposition(header_value: &str) -> Option<String> {
    let mut params = split_params(header_value).into_iter();

    // Disposition type comes first; a bare parameter list is tolerated.
    let first = params.next()?;
    let leading_param = first.contains('=').then_some(first);

    let mut filename = None;
    let mut extended_filename = None;

    for param in leading_param.into_iter().chain(params) {
        let Some((name, value)) = param.split_once('=') else {
            continue;
        };
        match name.trim().to_ascii_lowercase().as_str() {
            "filename" => filename = Some(unquote(value.trim())),
            "filename*" => extended_filename = decode_extended_value(value.trim()),
            _ => {}
        }
    }

    extended_filename
        .or(filename)
        .filter(|name| !name.trim().is_empty())
}

/// Reduces a server-suggested filename to its final path component.
///
/// Both `/` and `\` count as separators. Returns `None` for names that would
/// not point at a regular file inside the destination directory.
pub fn base_file_name(raw: &str) -> Option<String> {
    let name = raw
        .split(['/', '\\'])
        .filter(|segment| !segment.is_empty())
        .next_back()?
        .trim();

    if name.is_empty() || name == "." || name == ".." || name.contains('\0') {
        return None;
    }
    Some(name.to_string())
}

/// Splits on `;` outside of quoted strings.
fn split_params(value: &str) -> Vec<&str> {
    let mut params = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut escaped = false;

    for (idx, c) in value.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            ';' if !in_quotes => {
                params.push(value[start..idx].trim());
                start = idx + 1;
            }
            _ => {}
        }
    }
    params.push(value[start..].trim());

    params.into_iter().filter(|p| !p.is_empty()).collect()
}

fn unquote(value: &str) -> String {
    let Some(inner) = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
    else {
        return value.to_string();
    };

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Decodes `charset'language'percent-encoded` (RFC 5987).
fn decode_extended_value(value: &str) -> Option<String> {
    let mut parts = value.splitn(3, '\'');
    let charset = parts.next()?.trim();
    let _language = parts.next()?;
    let encoded = parts.next()?;

    if charset.eq_ignore_ascii_case("utf-8") {
        urlencoding::decode(encoded).ok().map(|s| s.into_owned())
    } else if charset.eq_ignore_ascii_case("iso-8859-1") {
        Some(
            urlencoding::decode_binary(encoded.as_bytes())
                .iter()
                .map(|&b| b as char)
                .collect(),
        )
    } else {
        None
    }
}
