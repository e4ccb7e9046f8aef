// src/specs/profile.rs
//
// Brawlify profile page → one RawRecord per brawler block.
//
// Page shape (only what we rely on):
//   <div id="16000000">                          brawler block, id is all digits
//     <div data-bs-toggle="collapse">            header
//       <h3><span>Shelly</span></h3>             name (or <img class="emoji-ico" alt=…>)
//       <div class="d-none d-sm-block">          counts region
//         <span class="text-orange"><img …>845</span>   trophies
//         (2/1/3)                                gadgets / star powers / gears
//       </div>
//     </div>
//     <div id="details-16000000">
//       <table class="tb-stats"><tr><th>Power</th><td>9</td></tr>…</table>
//     </div>
//   </div>

use std::sync::LazyLock;

use regex::Regex;

use crate::core::html::{
    self, attr_value, classes, find_all, find_first, find_open_tags, has_class,
    inner_after_open_tag, next_tag_block_ci, text_spaced,
};
use crate::model::RawRecord;
use crate::normalize::to_int;

static TRIPLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(?\s*(\d+)\s*/\s*(\d+)\s*/\s*(\d+)\s*\)?").expect("valid regex")
});
static GADGETS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)gadgets\s*[:\-]?\s*(\d+)").expect("valid regex"));
static STAR_POWERS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)star\s*powers?\s*[:\-]?\s*(\d+)").expect("valid regex"));
static GEARS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)gears?\s*[:\-]?\s*(\d+)").expect("valid regex"));

/// The located sub-regions of one brawler block. Any of them may be absent.
pub struct Block<'a> {
    pub whole: &'a str,
    pub header: Option<&'a str>,
    pub counts: Option<&'a str>,
    pub details: Option<&'a str>,
}

impl<'a> Block<'a> {
    pub fn locate(whole: &'a str) -> Self {
        let header = find_first(whole, "div", |t| {
            attr_value(t, "data-bs-toggle").is_some_and(|v| v.eq_ignore_ascii_case("collapse"))
        });
        let counts = header.and_then(|h| {
            find_first(h, "div", |t| has_class(t, "d-none") && has_class(t, "d-sm-block"))
        });
        let details = find_first(whole, "div", |t| {
            attr_value(t, "id").is_some_and(|id| id.starts_with("details-"))
        });
        Self { whole, header, counts, details }
    }

    /// Where name lookups happen: the header, else the whole block.
    fn name_scope(&self) -> &'a str {
        self.header.unwrap_or(self.whole)
    }
}

/// Gadgets / star powers / gears as read from the markup.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Triple {
    pub gadgets: i64,
    pub star_powers: i64,
    pub gears: i64,
}

type Strategy<T> = fn(&Block) -> Option<T>;

/// Ordered fallbacks: the first strategy returning `Some` wins.
fn first_of<T>(block: &Block, chain: &[(&str, Strategy<T>)], field: &str) -> Option<T> {
    for (i, (label, strategy)) in chain.iter().enumerate() {
        if let Some(v) = strategy(block) {
            if i > 0 {
                logd!("Profile: {field} via fallback '{label}'");
            }
            return Some(v);
        }
    }
    logd!("Profile: {field} not found, using default");
    None
}

/* ---------- name ---------- */

static NAME_CHAIN: &[(&str, Strategy<String>)] = &[
    ("h3 span", name_from_h3_span),
    ("h3 text", name_from_h3_text),
    ("emoji alt", name_from_img_alt),
];

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}

fn name_from_h3_span(b: &Block) -> Option<String> {
    let h3 = find_first(b.name_scope(), "h3", |_| true)?;
    let span = find_first(h3, "span", |_| true)?;
    non_empty(text_spaced(span))
}

fn name_from_h3_text(b: &Block) -> Option<String> {
    let h3 = find_first(b.name_scope(), "h3", |_| true)?;
    non_empty(text_spaced(h3))
}

fn name_from_img_alt(b: &Block) -> Option<String> {
    find_open_tags(b.name_scope(), "img")
        .into_iter()
        .filter(|t| has_class(t, "emoji-ico"))
        .find_map(|t| attr_value(t, "alt").map(|a| a.trim().to_string()).and_then(non_empty))
}

/* ---------- trophies ---------- */

static TROPHY_CHAIN: &[(&str, Strategy<i64>)] = &[("counts marker", trophies_from_counts)];

/// A `<span>` styled `text-orange` that carries an icon.
fn trophy_marker(scope: &str) -> Option<i64> {
    find_all(scope, "span", |t| classes(t).iter().any(|c| c.contains("text-orange")))
        .into_iter()
        .find(|span| !find_open_tags(span, "img").is_empty())
        .map(|span| to_int(&text_spaced(span)))
}

fn trophies_from_counts(b: &Block) -> Option<i64> {
    trophy_marker(b.counts?)
}

/* ---------- gadgets / star powers / gears ---------- */

static TRIPLE_CHAIN: &[(&str, Strategy<Triple>)] = &[
    ("counts pattern", triple_from_counts),
    ("block pattern", triple_from_block),
    ("labeled fields", triple_from_labels),
];

fn triple_in(text: &str) -> Option<Triple> {
    let caps = TRIPLE_RE.captures(text)?;
    let n = |i: usize| caps.get(i).map(|m| to_int(m.as_str())).unwrap_or(0);
    Some(Triple { gadgets: n(1), star_powers: n(2), gears: n(3) })
}

fn triple_from_counts(b: &Block) -> Option<Triple> {
    triple_in(&text_spaced(b.counts?))
}

fn triple_from_block(b: &Block) -> Option<Triple> {
    triple_in(&text_spaced(b.whole))
}

fn labeled(re: &Regex, text: &str) -> Option<i64> {
    re.captures(text).and_then(|c| c.get(1)).map(|m| to_int(m.as_str()))
}

/// Each label is independent; succeeds when at least one is present.
fn triple_from_labels(b: &Block) -> Option<Triple> {
    let text = text_spaced(b.whole);
    let gadgets = labeled(&GADGETS_RE, &text);
    let star_powers = labeled(&STAR_POWERS_RE, &text);
    let gears = labeled(&GEARS_RE, &text);
    if gadgets.is_none() && star_powers.is_none() && gears.is_none() {
        return None;
    }
    Some(Triple {
        gadgets: gadgets.unwrap_or(0),
        star_powers: star_powers.unwrap_or(0),
        gears: gears.unwrap_or(0),
    })
}

/* ---------- detail table ---------- */

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Details {
    pub power: Option<i64>,
    pub points_to_max: Option<i64>,
    pub coins_to_max: Option<i64>,
}

/// Label/value rows of the `tb-stats` table inside the details region.
pub fn read_details(details: &str) -> Details {
    let mut out = Details::default();
    let Some(table) = find_first(details, "table", |t| {
        classes(t).iter().any(|c| c.contains("tb-stats"))
    }) else {
        return out;
    };

    let mut pos = 0usize;
    while let Some((tr_s, tr_e)) = next_tag_block_ci(table, "<tr", "</tr>", pos) {
        let tr = &table[tr_s..tr_e];
        pos = tr_e;

        let th = next_tag_block_ci(tr, "<th", "</th>", 0).map(|(s, e)| &tr[s..e]);
        let td = next_tag_block_ci(tr, "<td", "</td>", 0).map(|(s, e)| &tr[s..e]);
        let (Some(th), Some(td)) = (th, td) else { continue };

        let label = html::to_lower(&text_spaced(inner_after_open_tag(th)));
        let value = to_int(&text_spaced(inner_after_open_tag(td)));

        if label.contains("power") && !label.contains("points to max") {
            out.power = Some(value);
        } else if label.contains("points to max") {
            out.points_to_max = Some(value);
        } else if label.contains("coins to max") {
            out.coins_to_max = Some(value);
        }
    }
    out
}

/* ---------- entry points ---------- */

/// Best-effort record for one brawler block; never fails.
pub fn extract_block(whole: &str) -> RawRecord {
    let block = Block::locate(whole);

    let name = first_of(&block, NAME_CHAIN, "name");
    let trophies = first_of(&block, TROPHY_CHAIN, "trophies").unwrap_or(0);
    let triple = first_of(&block, TRIPLE_CHAIN, "triple").unwrap_or_default();
    let details = block.details.map(read_details).unwrap_or_default();

    RawRecord {
        name,
        power: details.power.unwrap_or(0),
        trophies,
        gadgets: triple.gadgets,
        star_powers: triple.star_powers,
        gears: triple.gears,
        reported_points: details.points_to_max,
        reported_coins: details.coins_to_max,
    }
}

fn is_brawler_block(open: &str) -> bool {
    attr_value(open, "id").is_some_and(|id| !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()))
}

/// Every brawler block in the page, in document order.
pub fn parse_doc(doc: &str) -> Vec<RawRecord> {
    let blocks = find_all(doc, "div", is_brawler_block);
    logd!("Profile: {} brawler block(s) in {} bytes", blocks.len(), doc.len());
    blocks.into_iter().map(extract_block).collect()
}
