//! Character-level BIO / BIOES tagged export.
//!
//! Sequence-labeling trainers consume one `char<TAB>tag` line per
//! character, records separated by a blank line. Under BIOES a
//! single-character span is tagged `S-<Attr>`, longer spans
//! `B-<Attr>` … `I-<Attr>` … `E-<Attr>`; plain BIO uses only `B`/`I`.

use crate::record::LabeledRecord;

/// Tagging scheme for span boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TagScheme {
    /// Begin/Inside only.
    Bio,
    /// Begin/Inside/End/Single (default, sharper span boundaries).
    #[default]
    Bioes,
}

/// Tags for one value span of `len` characters.
fn span_tags(scheme: TagScheme, attribute: &str, len: usize) -> Vec<String> {
    match scheme {
        TagScheme::Bio => {
            let mut tags = vec![format!("B-{attribute}")];
            tags.extend(std::iter::repeat(format!("I-{attribute}")).take(len - 1));
            tags
        }
        TagScheme::Bioes => {
            if len == 1 {
                return vec![format!("S-{attribute}")];
            }
            let mut tags = vec![format!("B-{attribute}")];
            tags.extend(std::iter::repeat(format!("I-{attribute}")).take(len - 2));
            tags.push(format!("E-{attribute}"));
            tags
        }
    }
}

/// Tag one line of text against (attribute, values) entries.
///
/// Characters are consumed left to right; at each position the first
/// entry whose value matches verbatim wins and the cursor jumps past
/// it. Everything else is `O`. Returns `char<TAB>tag` lines.
pub(crate) fn tag_line(line: &str, entries: &[(String, Vec<String>)], scheme: TagScheme) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    let mut out = Vec::with_capacity(chars.len());
    let mut index = 0;
    while index < chars.len() {
        let mut advanced = false;
        for (attribute, values) in entries {
            for value in values {
                let vchars: Vec<char> = value.chars().collect();
                if vchars.is_empty() || index + vchars.len() > chars.len() {
                    continue;
                }
                if chars[index..index + vchars.len()] == vchars[..] {
                    for (c, tag) in vchars.iter().zip(span_tags(scheme, attribute, vchars.len())) {
                        out.push(format!("{c}\t{tag}"));
                    }
                    index += vchars.len();
                    advanced = true;
                    break;
                }
            }
            if advanced {
                break;
            }
        }
        if !advanced {
            out.push(format!("{}\tO", chars[index]));
            index += 1;
        }
    }
    out
}

/// Join a record's supporting lines into one taggable passage: at most
/// one clause mark comes off each edge of a line, emptied lines drop
/// out, and the rest joins on `，`.
fn join_supporting(lines: &[String]) -> String {
    const CLAUSE_MARKS: &[char] = &[',', '，', '。', '.'];
    let mut cleaned = Vec::new();
    for line in lines {
        let mut chars: Vec<char> = line.chars().collect();
        if chars.first().map_or(false, |c| CLAUSE_MARKS.contains(c)) {
            chars.remove(0);
        }
        if chars.last().map_or(false, |c| CLAUSE_MARKS.contains(c)) {
            chars.pop();
        }
        if !chars.is_empty() {
            cleaned.push(chars.into_iter().collect::<String>());
        }
    }
    cleaned.join("，")
}

/// Render a batch of labeled records as one BIO/BIOES document.
#[must_use]
pub fn render_bio(records: &[LabeledRecord], scheme: TagScheme) -> String {
    let mut blocks = Vec::with_capacity(records.len());
    for record in records {
        let entries: Vec<(String, Vec<String>)> = record
            .infobox
            .iter()
            .map(|(k, v)| {
                (
                    k.clone(),
                    v.as_slice().iter().map(|s| s.to_string()).collect(),
                )
            })
            .collect();
        let passage = join_supporting(&record.summary);
        blocks.push(tag_line(&passage, &entries, scheme).join("\n"));
    }
    let mut out = blocks.join("\n\n");
    out.push('\n');
    out
}
