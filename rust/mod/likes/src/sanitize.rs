//! Input sanitisation and output escaping.
//!
//! `sanitize_*` functions clean untrusted input before it is stored.
//! `esc_*` functions make stored text safe for one specific HTML context
//! and are applied at output time only.

use url::Url;

/// Schemes a stored URL may use.
const ALLOWED_SCHEMES: &[&str] = &[
    "http", "https", "ftp", "ftps", "mailto", "news", "irc", "gopher", "nntp", "feed", "telnet",
    "mms", "rtsp", "sms", "svn", "tel", "fax", "xmpp", "webcal", "urn",
];

/// Encoded CR, LF and NUL, removed until none remain.
const STRIPPED_OCTETS: &[&str] = &["%0d", "%0a", "%00", "%0D", "%0A"];

// ── URLs ──

/// Clean a URL for storage, or return `""` if it is not acceptable.
///
/// Spaces become `%20`; characters outside the URL-safe set are dropped;
/// input without a scheme gets `http://`. The result must parse as an
/// absolute URL with an allowed scheme. The cleaned input is returned,
/// not the parser's normalised form.
pub fn sanitize_url(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let mut cleaned: String = trimmed
        .replace(' ', "%20")
        .chars()
        .filter(|&c| is_url_char(c))
        .collect();
    while let Some(octet) = STRIPPED_OCTETS.iter().find(|o| cleaned.contains(**o)) {
        cleaned = cleaned.replace(octet, "");
    }
    if cleaned.is_empty() {
        return String::new();
    }

    if !cleaned.contains(':') && !cleaned.starts_with(['/', '#', '?']) {
        cleaned = format!("http://{cleaned}");
    }

    let Ok(parsed) = Url::parse(&cleaned) else {
        return String::new();
    };
    if !ALLOWED_SCHEMES.contains(&parsed.scheme()) {
        return String::new();
    }
    if matches!(parsed.scheme(), "http" | "https") && parsed.host().is_none() {
        return String::new();
    }
    cleaned
}

/// [`sanitize_url`] for output inside an HTML attribute.
pub fn esc_url(input: &str) -> String {
    escape(&sanitize_url(input), "&#038;")
}

/// Hostname of `url` as written, or `""` if it has none or does not parse.
///
/// Case and Unicode labels are kept; the parser is only used to decide
/// whether there is a host at all.
pub fn host_of(url: &str) -> String {
    let Ok(parsed) = Url::parse(url) else {
        return String::new();
    };
    if parsed.host().is_none() {
        return String::new();
    }
    let Some(after_scheme) = url
        .trim()
        .get(parsed.scheme().len() + 1..)
        .and_then(|rest| rest.strip_prefix("//"))
    else {
        return parsed.host_str().unwrap_or_default().to_string();
    };
    let authority = after_scheme
        .split(['/', '?', '#', '\\'])
        .next()
        .unwrap_or_default();
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, h)| h);
    let host = match host_port.strip_prefix('[') {
        Some(v6) => v6.split_once(']').map_or(host_port, |(addr, _)| &host_port[..addr.len() + 2]),
        None => host_port.split(':').next().unwrap_or_default(),
    };
    host.to_string()
}

fn is_url_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || "-~+_.?#=!&;,/:%@$|*'()[]".contains(c)
        || (!c.is_ascii() && !c.is_control() && !c.is_whitespace())
}

// ── HTML escaping ──

/// Escape text for an HTML text node. Valid entities already present are
/// kept as-is.
pub fn esc_html(text: &str) -> String {
    escape(text, "&amp;")
}

/// Escape text for a quoted HTML attribute value.
pub fn esc_attr(text: &str) -> String {
    escape(text, "&amp;")
}

fn escape(text: &str, amp: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for (i, ch) in text.char_indices() {
        match ch {
            '&' if entity_len(&text[i..]).is_some() => out.push('&'),
            '&' => out.push_str(amp),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            c => out.push(c),
        }
    }
    out
}

/// Byte length of the character reference at the start of `s`
/// (`&name;`, `&#123;`, `&#x1F;`), if there is one.
fn entity_len(s: &str) -> Option<usize> {
    if !s.starts_with('&') {
        return None;
    }
    let semi = s.find(';')?;
    if semi < 2 || semi > 33 {
        return None;
    }
    let body = &s[1..semi];
    let valid = if let Some(hex) = body.strip_prefix("#x").or_else(|| body.strip_prefix("#X")) {
        (1..=6).contains(&hex.len()) && hex.chars().all(|c| c.is_ascii_hexdigit())
    } else if let Some(dec) = body.strip_prefix('#') {
        (1..=7).contains(&dec.len()) && dec.chars().all(|c| c.is_ascii_digit())
    } else {
        body.starts_with(|c: char| c.is_ascii_alphabetic())
            && body.chars().all(|c| c.is_ascii_alphanumeric())
    };
    valid.then_some(semi + 1)
}

// ── Plain text ──

/// Remove all tags. `script` and `style` elements go with their contents.
/// A `<` that cannot open a tag is kept as text. An unterminated tag
/// swallows the rest of the input.
pub fn strip_tags(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find('<') {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 1..];
        if !opens_tag(tail) {
            out.push('<');
            rest = tail;
            continue;
        }
        let Some(end) = tail.find('>') else {
            return out;
        };
        let tag = &tail[..end];
        rest = &tail[end + 1..];

        let name = tag_name(tag);
        if !tag.starts_with('/') && (name == "script" || name == "style") {
            let close = format!("</{name}");
            rest = match rest.to_ascii_lowercase().find(&close) {
                Some(pos) => match rest[pos..].find('>') {
                    Some(gt) => &rest[pos + gt + 1..],
                    None => "",
                },
                None => "",
            };
        }
    }
    out.push_str(rest);
    out
}

/// A tag name, end tag, comment or declaration must follow `<` directly.
fn opens_tag(after_lt: &str) -> bool {
    after_lt
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || matches!(c, '/' | '!' | '?'))
}

fn tag_name(tag: &str) -> String {
    tag.trim_start_matches('/')
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase()
}

/// Clean single-line user text for storage: lone `<` becomes `&lt;`, tags
/// are stripped, whitespace runs collapse to one space, percent-encoded
/// octets are removed, and the result is trimmed.
pub fn sanitize_text_field(text: &str) -> String {
    let stripped = strip_tags(&escape_lone_lt(text));
    let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    remove_octets(&collapsed).trim().to_string()
}

/// `<` that does not open a tag, or is not closed by a `>` before the next
/// `<` (or the end), is escaped so strip_tags keeps the text after it.
fn escape_lone_lt(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for (i, ch) in text.char_indices() {
        if ch == '<' {
            let after = &text[i + 1..];
            let closes = after.find(['<', '>']).is_some_and(|p| after[p..].starts_with('>'));
            if !closes || !opens_tag(after) {
                out.push_str("&lt;");
                continue;
            }
        }
        out.push(ch);
    }
    out
}

fn remove_octets(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < text.len() {
        if bytes[i] == b'%'
            && i + 2 < text.len()
            && bytes[i + 1].is_ascii_hexdigit()
            && bytes[i + 2].is_ascii_hexdigit()
        {
            i += 3;
            continue;
        }
        let Some(ch) = text[i..].chars().next() else {
            break;
        };
        out.push(ch);
        i += ch.len_utf8();
    }
    out
}

// ── Slugs ──

/// Identifier-safe form of `text`.
///
/// Tags and entities are removed, common Latin accents folded, letters
/// lowercased. Whitespace, dots and dashes separate words with a single
/// `-`; other punctuation is dropped. Leading and trailing dashes are
/// trimmed.
pub fn sanitize_slug(text: &str) -> String {
    let lowered = strip_tags(text).to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    let mut pending_dash = false;

    let mut i = 0;
    while i < lowered.len() {
        let rest = &lowered[i..];
        if let Some(n) = entity_len(rest) {
            i += n;
            continue;
        }
        let Some(ch) = rest.chars().next() else {
            break;
        };
        i += ch.len_utf8();

        let word: Option<&str> = fold_accent(ch);
        if word.is_none() && !(ch.is_alphanumeric() || ch == '_') {
            if ch.is_whitespace() || ch == '-' || ch == '.' {
                pending_dash = true;
            }
            continue;
        }
        if pending_dash && !slug.is_empty() {
            slug.push('-');
        }
        pending_dash = false;
        match word {
            Some(w) => slug.push_str(w),
            None => slug.push(ch),
        }
    }
    slug
}

fn fold_accent(ch: char) -> Option<&'static str> {
    let folded = match ch {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => "a",
        'æ' => "ae",
        'ç' | 'ć' | 'č' | 'ĉ' | 'ċ' => "c",
        'ď' | 'đ' | 'ð' => "d",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ė' | 'ę' | 'ě' => "e",
        'ğ' | 'ģ' => "g",
        'ì' | 'í' | 'î' | 'ï' | 'ī' | 'į' | 'ı' => "i",
        'ķ' => "k",
        'ł' | 'ľ' | 'ļ' | 'ĺ' => "l",
        'ñ' | 'ń' | 'ň' | 'ņ' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ő' => "o",
        'œ' => "oe",
        'ŕ' | 'ř' => "r",
        'ś' | 'š' | 'ş' | 'ș' => "s",
        'ß' => "ss",
        'ť' | 'ţ' | 'ț' => "t",
        'þ' => "th",
        'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ů' | 'ű' | 'ų' => "u",
        'ý' | 'ÿ' => "y",
        'ź' | 'ż' | 'ž' => "z",
        _ => return None,
    };
    Some(folded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_accepts_allowed_schemes() {
        assert_eq!(sanitize_url("https://example.org/b"), "https://example.org/b");
        assert_eq!(sanitize_url("  https://example.com/a?x=1&y=2 "), "https://example.com/a?x=1&y=2");
        assert_eq!(sanitize_url("mailto:me@example.com"), "mailto:me@example.com");
    }

    #[test]
    fn url_without_scheme_gets_http() {
        assert_eq!(sanitize_url("example.com/page"), "http://example.com/page");
    }

    #[test]
    fn url_rejects_bad_schemes_and_garbage() {
        assert_eq!(sanitize_url("javascript:alert(1)"), "");
        assert_eq!(sanitize_url("data:text/html,hi"), "");
        assert_eq!(sanitize_url("   "), "");
        assert_eq!(sanitize_url("http://"), "");
        assert_eq!(sanitize_url("/relative/path"), "");
    }

    #[test]
    fn url_drops_unsafe_characters() {
        assert_eq!(
            sanitize_url("https://example.com/a b<script>\"x\""),
            "https://example.com/a%20bscriptx"
        );
        assert_eq!(sanitize_url("https://example.com/%0d%0aSet-Cookie"), "https://example.com/Set-Cookie");
    }

    #[test]
    fn esc_url_escapes_for_attributes() {
        assert_eq!(esc_url("https://example.com/?a=1&b=2"), "https://example.com/?a=1&#038;b=2");
        assert_eq!(esc_url("https://example.com/it's"), "https://example.com/it&#039;s");
        assert_eq!(esc_url("javascript:alert(1)"), "");
    }

    #[test]
    fn host_extraction() {
        assert_eq!(host_of("https://example.com/page"), "example.com");
        assert_eq!(host_of("https://sub.example.co.uk:8443/x"), "sub.example.co.uk");
        assert_eq!(host_of("not a url"), "");
        assert_eq!(host_of(""), "");
        assert_eq!(host_of("mailto:me@example.com"), "");
    }

    #[test]
    fn host_is_kept_as_written() {
        assert_eq!(host_of("https://münchen.de/page"), "münchen.de");
        assert_eq!(host_of("https://Example.COM/page"), "Example.COM");
        assert_eq!(host_of("https://user:pw@Example.com:8080/?q=1"), "Example.com");
        assert_eq!(host_of("http://[::1]:8080/x"), "[::1]");
        assert_eq!(host_of("https://example.com?x=a/b"), "example.com");
    }

    #[test]
    fn html_escaping_keeps_valid_entities() {
        assert_eq!(esc_html("<b>Tom & \"Jerry\"</b>"), "&lt;b&gt;Tom &amp; &quot;Jerry&quot;&lt;/b&gt;");
        assert_eq!(esc_html("caf&eacute; &#233; &#xE9;"), "caf&eacute; &#233; &#xE9;");
        assert_eq!(esc_html("a &; b &#zz;"), "a &amp;; b &amp;#zz;");
        assert_eq!(esc_attr("it's"), "it&#039;s");
    }

    #[test]
    fn strip_tags_removes_script_bodies() {
        assert_eq!(strip_tags("My <b>Favorite</b> Post!"), "My Favorite Post!");
        assert_eq!(strip_tags("a<script>alert(1)</script>b"), "ab");
        assert_eq!(strip_tags("a<STYLE type=x>p{}</Style >b"), "ab");
        assert_eq!(strip_tags("keep <unterminated"), "keep ");
        assert_eq!(strip_tags("3 < 4 and 5 > 4"), "3 < 4 and 5 > 4");
        assert_eq!(strip_tags("a<!-- note -->b"), "ab");
    }

    #[test]
    fn text_field_keeps_comparisons_and_hearts() {
        assert_eq!(sanitize_text_field("a < b > c"), "a &lt; b > c");
        assert_eq!(sanitize_text_field("I <3 Rust > Go"), "I &lt;3 Rust > Go");
        assert_eq!(sanitize_text_field("x <b>bold</b> <= y"), "x bold &lt;= y");
    }

    #[test]
    fn text_field_is_plain_single_line() {
        assert_eq!(sanitize_text_field("My <b>Favorite</b> Post!"), "My Favorite Post!");
        assert_eq!(sanitize_text_field("  two\n\tlines   here "), "two lines here");
        assert_eq!(sanitize_text_field("1 < 2"), "1 &lt; 2");
        assert_eq!(sanitize_text_field("50%20off"), "50off");
        assert_eq!(sanitize_text_field("<p></p>"), "");
    }

    #[test]
    fn slug_from_title() {
        assert_eq!(sanitize_slug("My <b>Favorite</b> Post!"), "my-favorite-post");
        assert_eq!(sanitize_slug("  Don't   stop -- me now. "), "dont-stop-me-now");
        assert_eq!(sanitize_slug("Crème Brûlée &amp; Straße"), "creme-brulee-strasse");
        assert_eq!(sanitize_slug("snake_case stays"), "snake_case-stays");
        assert_eq!(sanitize_slug("!!!"), "");
    }
}
