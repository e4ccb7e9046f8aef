// src/core/html.rs
//
// Tolerant, case-insensitive tag scanning over raw markup. No DOM is built:
// callers locate an element by tag name plus a predicate on its opening tag,
// then keep scanning inside the returned slice.
// Lowercasing is ASCII-only, so byte offsets in the lowercased copy line up
// with the original string.

use super::sanitize::{normalize_entities, normalize_ws};

pub fn to_lower(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_ascii() {
                c.to_ascii_lowercase()
            } else {
                c
            }
        })
        .collect()
}

/// Next `<o …>…c` block from `from` onwards. Not depth-aware: use for
/// elements that never nest (`<tr>`, `<td>`, `<th>`).
pub fn next_tag_block_ci(s: &str, o: &str, c: &str, from: usize) -> Option<(usize, usize)> {
    let lc = to_lower(s);
    let ol = to_lower(o);
    let cl = to_lower(c);
    let start = lc.get(from..)?.find(&ol)? + from;
    let open_end = s[start..].find('>')? + start + 1;
    let end_rel = lc[open_end..].find(&cl)?;
    let end = open_end + end_rel + c.len();
    Some((start, end))
}

pub fn inner_after_open_tag(block: &str) -> String {
    if let Some(oe) = block.find('>') {
        if let Some(cs) = block.rfind('<') {
            if cs > oe {
                return block[oe + 1..cs].to_string();
            }
        }
    }
    s!()
}

/// Visible text with tags removed and whitespace collapsed.
pub fn strip_tags<S: AsRef<str>>(s: S) -> String {
    collect_text(s.as_ref(), false)
}

/// Visible text where every tag acts as a word break, so adjacent elements
/// never glue their text together (`<b>2</b><b>1</b>` → `2 1`).
pub fn text_spaced<S: AsRef<str>>(s: S) -> String {
    collect_text(s.as_ref(), true)
}

fn collect_text(s: &str, tag_breaks: bool) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;

    for ch in s.chars() {
        match ch {
            '<' => {
                in_tag = true;
                if tag_breaks { out.push(' '); }
            }
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    normalize_ws(&normalize_entities(&out))
}

/// The opening tag of an element block (`<div class="x">`), or the whole
/// slice when it has no closing `>`.
pub fn open_tag(block: &str) -> &str {
    match block.find('>') {
        Some(i) => &block[..=i],
        None => block,
    }
}

/// Value of attribute `name` in an opening tag. Handles double-quoted,
/// single-quoted, unquoted and valueless attributes (the latter yield "").
pub fn attr_value(tag: &str, name: &str) -> Option<String> {
    let b = tag.as_bytes();
    let n = b.len();

    // skip "<tagname"
    let mut i = tag.find(|c: char| c.is_ascii_whitespace() || c == '>' || c == '/')?;

    while i < n {
        while i < n && (b[i].is_ascii_whitespace() || b[i] == b'/') { i += 1; }
        if i >= n || b[i] == b'>' { break; }

        let key_start = i;
        while i < n && !b[i].is_ascii_whitespace() && b[i] != b'=' && b[i] != b'>' { i += 1; }
        let key = &tag[key_start..i];

        while i < n && b[i].is_ascii_whitespace() { i += 1; }
        let value = if i < n && b[i] == b'=' {
            i += 1;
            while i < n && b[i].is_ascii_whitespace() { i += 1; }
            if i < n && (b[i] == b'"' || b[i] == b'\'') {
                let q = b[i];
                i += 1;
                let v_start = i;
                while i < n && b[i] != q { i += 1; }
                let v = &tag[v_start..i.min(n)];
                i += 1;
                v
            } else {
                let v_start = i;
                while i < n && !b[i].is_ascii_whitespace() && b[i] != b'>' { i += 1; }
                &tag[v_start..i]
            }
        } else {
            ""
        };

        if key.eq_ignore_ascii_case(name) {
            return Some(normalize_entities(value));
        }
    }
    None
}

/// Whitespace-separated class list of an opening tag.
pub fn classes(tag: &str) -> Vec<String> {
    attr_value(tag, "class")
        .map(|c| c.split_whitespace().map(|x| x.to_string()).collect())
        .unwrap_or_default()
}

pub fn has_class(tag: &str, class: &str) -> bool {
    classes(tag).iter().any(|c| c == class)
}

fn is_name_boundary(b: Option<&u8>) -> bool {
    match b {
        None => true,
        Some(c) => c.is_ascii_whitespace() || *c == b'>' || *c == b'/',
    }
}

/// Byte offset of the next `<tag` (name-bounded, so `<div` never matches
/// `<divider`) in the lowercased haystack at or after `from`.
fn next_open(lc: &str, tag_lc: &str, from: usize) -> Option<usize> {
    next_bounded(lc, &join!("<", tag_lc), from)
}

fn next_bounded(lc: &str, pat: &str, from: usize) -> Option<usize> {
    let mut pos = from;
    while let Some(rel) = lc.get(pos..)?.find(pat) {
        let at = pos + rel;
        if is_name_boundary(lc.as_bytes().get(at + pat.len())) {
            return Some(at);
        }
        pos = at + pat.len();
    }
    None
}

/// End (exclusive) of the element opening at `start`, balancing nested
/// elements of the same name. An unclosed element runs to the end of input.
fn balanced_end(s: &str, lc: &str, tag_lc: &str, start: usize) -> usize {
    let Some(open_end) = s[start..].find('>').map(|i| start + i + 1) else {
        return s.len();
    };
    if s[start..open_end].ends_with("/>") {
        return open_end;
    }

    let open_pat = join!("<", tag_lc);
    let close_pat = join!("</", tag_lc);
    let mut depth = 1usize;
    let mut pos = open_end;

    while depth > 0 {
        let next_close = next_bounded(lc, &close_pat, pos);
        let next_nested = next_open(lc, tag_lc, pos);

        match (next_nested, next_close) {
            (Some(o), Some(c)) if o < c => {
                // `<tag …/>` opens nothing
                match s[o..].find('>') {
                    Some(i) if s[o..o + i + 1].ends_with("/>") => pos = o + i + 1,
                    _ => {
                        depth += 1;
                        pos = o + open_pat.len();
                    }
                }
            }
            (_, Some(c)) => {
                depth -= 1;
                pos = match s[c..].find('>') {
                    Some(i) => c + i + 1,
                    None => s.len(),
                };
            }
            (_, None) => return s.len(),
        }
    }
    pos
}

/// Every `<tag …>…</tag>` element whose opening tag satisfies `pred`,
/// in document order. Nested matches are returned as well.
pub fn find_all<'a, F>(s: &'a str, tag: &str, pred: F) -> Vec<&'a str>
where
    F: Fn(&str) -> bool,
{
    let lc = to_lower(s);
    let tag_lc = to_lower(tag);
    let mut out = Vec::new();
    let mut pos = 0usize;

    while let Some(start) = next_open(&lc, &tag_lc, pos) {
        pos = start + 1;
        let tag_text = open_tag(&s[start..]);
        if !pred(tag_text) { continue; }
        let end = balanced_end(s, &lc, &tag_lc, start);
        out.push(&s[start..end]);
    }
    out
}

/// First element matching `pred`; see `find_all`.
pub fn find_first<'a, F>(s: &'a str, tag: &str, pred: F) -> Option<&'a str>
where
    F: Fn(&str) -> bool,
{
    let lc = to_lower(s);
    let tag_lc = to_lower(tag);
    let mut pos = 0usize;

    while let Some(start) = next_open(&lc, &tag_lc, pos) {
        pos = start + 1;
        if pred(open_tag(&s[start..])) {
            let end = balanced_end(s, &lc, &tag_lc, start);
            return Some(&s[start..end]);
        }
    }
    None
}

/// Opening tags only; for void elements such as `<img>`.
pub fn find_open_tags<'a>(s: &'a str, tag: &str) -> Vec<&'a str> {
    let lc = to_lower(s);
    let tag_lc = to_lower(tag);
    let mut out = Vec::new();
    let mut pos = 0usize;

    while let Some(start) = next_open(&lc, &tag_lc, pos) {
        pos = start + 1;
        out.push(open_tag(&s[start..]));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attr_value_quoting_variants() {
        let t = r#"<div id="12" class='a b' data-bs-toggle=collapse hidden>"#;
        assert_eq!(attr_value(t, "id").as_deref(), Some("12"));
        assert_eq!(attr_value(t, "CLASS").as_deref(), Some("a b"));
        assert_eq!(attr_value(t, "data-bs-toggle").as_deref(), Some("collapse"));
        assert_eq!(attr_value(t, "hidden").as_deref(), Some(""));
        assert_eq!(attr_value(t, "alt"), None);
    }

    #[test]
    fn attr_value_decodes_entities() {
        let t = r#"<img alt="Mr. P &amp; co">"#;
        assert_eq!(attr_value(t, "alt").as_deref(), Some("Mr. P & co"));
    }

    #[test]
    fn has_class_is_exact_per_token() {
        let t = r#"<div class="d-none d-sm-block">"#;
        assert!(has_class(t, "d-none"));
        assert!(has_class(t, "d-sm-block"));
        assert!(!has_class(t, "d-sm"));
    }

    #[test]
    fn find_all_balances_nested_divs() {
        let html = r#"<div id="1"><div>inner</div><p>tail</p></div><div id="2">two</div>"#;
        let blocks = find_all(html, "div", |t| attr_value(t, "id").is_some());
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].ends_with("<p>tail</p></div>"));
        assert_eq!(strip_tags(blocks[1]), "two");
    }

    #[test]
    fn nested_self_closing_div_does_not_open() {
        let html = r#"<div id="1"><h3>A</h3><div class="spacer"/></div><div id="2">(1/2/3)</div>"#;
        let blocks = find_all(html, "div", |t| attr_value(t, "id").is_some());
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0], r#"<div id="1"><h3>A</h3><div class="spacer"/></div>"#);
        assert_eq!(strip_tags(blocks[1]), "(1/2/3)");
    }

    #[test]
    fn tag_name_must_be_bounded() {
        let html = r#"<divider>x</divider><DIV class="k">y</DIV>"#;
        let found = find_first(html, "div", |_| true).unwrap();
        assert_eq!(strip_tags(found), "y");
    }

    #[test]
    fn unclosed_element_runs_to_end() {
        let html = r#"<div id="3"><span>Shelly</span>"#;
        let found = find_first(html, "div", |_| true).unwrap();
        assert_eq!(found, html);
    }

    #[test]
    fn text_spaced_separates_adjacent_elements() {
        assert_eq!(text_spaced("<b>2</b><b>1</b>"), "2 1");
        assert_eq!(strip_tags("<b>2</b><b>1</b>"), "21");
        assert_eq!(text_spaced("  <i>a&nbsp;b</i>\n c "), "a b c");
    }

    #[test]
    fn find_open_tags_returns_void_elements() {
        let html = r#"<span><img src="t.png" class="x"></span><IMG alt=Colt>"#;
        let imgs = find_open_tags(html, "img");
        assert_eq!(imgs.len(), 2);
        assert_eq!(attr_value(imgs[1], "alt").as_deref(), Some("Colt"));
    }

    #[test]
    fn next_tag_block_walks_rows() {
        let t = "<tr><th>A</th></tr><TR><th>B</th></TR>";
        let (s1, e1) = next_tag_block_ci(t, "<tr", "</tr>", 0).unwrap();
        let (s2, _) = next_tag_block_ci(t, "<tr", "</tr>", e1).unwrap();
        assert_eq!(s1, 0);
        assert_eq!(strip_tags(inner_after_open_tag(&t[s2..])), "B");
    }
}
