//! One-pass lenient scanner for namespaced report tags.
//!
//! Recognises `<ns:name attr="value">`, `</ns:name>` and `<ns:name attr="value" />`.
//! Anything else (foreign tags, stray `<`, a tag cut off mid-stream) is plain
//! text and is skipped without error. Quote positions are indexed up front, so
//! an unterminated attribute value costs one lookup instead of a rescan.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Open,
    Close,
    SelfClosing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag<'a> {
    pub kind: TagKind,
    pub name: &'a str,
    attrs: Vec<(&'a str, &'a str)>,
    pub start: usize, // Byte offset of '<'
    pub end: usize,   // Byte offset just past '>'
}

impl<'a> Tag<'a> {
    /// First attribute with the given name.
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.attrs.iter().find(|(k, _)| *k == name).map(|(_, v)| *v)
    }

    /// Open or self-closing tag with the given name.
    pub fn starts(&self, name: &str) -> bool {
        self.kind != TagKind::Close && self.name == name
    }
}

pub struct Scanner<'a> {
    input: &'a str,
    namespace: &'a str,
    pos: usize,
    double_quotes: Vec<usize>, // Sorted byte offsets of '"'
    single_quotes: Vec<usize>, // Sorted byte offsets of '\''
}

impl<'a> Scanner<'a> {
    pub fn new(input: &'a str, namespace: &'a str) -> Self {
        let offsets = |quote: u8| -> Vec<usize> {
            input
                .bytes()
                .enumerate()
                .filter(|&(_, b)| b == quote)
                .map(|(i, _)| i)
                .collect()
        };

        Self {
            input,
            namespace,
            pos: 0,
            double_quotes: offsets(b'"'),
            single_quotes: offsets(b'\''),
        }
    }

    /// Offset of the first `quote` at or after `from`.
    fn next_quote(&self, quote: u8, from: usize) -> Option<usize> {
        let offsets = if quote == b'"' {
            &self.double_quotes
        } else {
            &self.single_quotes
        };
        let idx = offsets.partition_point(|&p| p < from);
        offsets.get(idx).copied()
    }

    fn parse_tag(&self, start: usize) -> Option<Tag<'a>> {
        let bytes = self.input.as_bytes();
        let mut i = start + 1;

        let closing = bytes.get(i) == Some(&b'/');
        if closing {
            i += 1;
        }

        // Namespace prefix
        let prefix = self.namespace.as_bytes();
        if !bytes.get(i..)?.starts_with(prefix) || bytes.get(i + prefix.len()) != Some(&b':') {
            return None;
        }
        i += prefix.len() + 1;

        let name_start = i;
        i = skip_while(bytes, i, is_name_byte);
        if i == name_start {
            return None;
        }
        let name = &self.input[name_start..i];

        if closing {
            i = skip_while(bytes, i, |b| b.is_ascii_whitespace());
            return (bytes.get(i) == Some(&b'>')).then(|| Tag {
                kind: TagKind::Close,
                name,
                attrs: Vec::new(),
                start,
                end: i + 1,
            });
        }

        let mut attrs = Vec::new();
        loop {
            i = skip_while(bytes, i, |b| b.is_ascii_whitespace());
            match *bytes.get(i)? {
                b'>' => {
                    return Some(Tag {
                        kind: TagKind::Open,
                        name,
                        attrs,
                        start,
                        end: i + 1,
                    });
                }
                b'/' => {
                    return (bytes.get(i + 1) == Some(&b'>')).then(|| Tag {
                        kind: TagKind::SelfClosing,
                        name,
                        attrs,
                        start,
                        end: i + 2,
                    });
                }
                _ => {}
            }

            let key_start = i;
            i = skip_while(bytes, i, is_name_byte);
            if i == key_start {
                return None;
            }
            let key = &self.input[key_start..i];

            i = skip_while(bytes, i, |b| b.is_ascii_whitespace());
            if *bytes.get(i)? != b'=' {
                return None;
            }
            i = skip_while(bytes, i + 1, |b| b.is_ascii_whitespace());

            let quote = *bytes.get(i)?;
            if quote != b'"' && quote != b'\'' {
                return None;
            }
            let value_start = i + 1;
            // Values may hold '<' and '>'; only the matching quote ends them
            let value_end = self.next_quote(quote, value_start)?;
            attrs.push((key, &self.input[value_start..value_end]));
            i = value_end + 1;
        }
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Tag<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let offset = self.input.get(self.pos..)?.find('<')?;
            let start = self.pos + offset;

            match self.parse_tag(start) {
                Some(tag) => {
                    self.pos = tag.end;
                    return Some(tag);
                }
                None => self.pos = start + 1,
            }
        }
    }
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-' || b == b':'
}

fn skip_while(bytes: &[u8], mut i: usize, pred: impl Fn(u8) -> bool) -> usize {
    while i < bytes.len() && pred(bytes[i]) {
        i += 1;
    }
    i
}

/// Remove every `<...>` run from `text`, leaving the text between them.
pub fn strip_tags(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find('<') {
        let after = &rest[open + 1..];
        match after.find('>') {
            // `<>` is not a tag
            Some(0) => {
                out.push_str(&rest[..open + 2]);
                rest = &after[1..];
            }
            Some(close) => {
                out.push_str(&rest[..open]);
                rest = &after[close + 1..];
            }
            None => break,
        }
    }

    out.push_str(rest);
    out
}
