//! Line-oriented Markdown fence scanner.

/// A closed, triple-backtick fenced code block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FencedBlock {
    /// First word of the info string after the opening fence; may be empty.
    pub lang: String,
    /// Lines between the fences, joined with `\n`.
    pub body: String,
}

impl FencedBlock {
    /// Case-insensitive language tag comparison.
    #[must_use]
    pub fn is_lang(&self, lang: &str) -> bool {
        self.lang.eq_ignore_ascii_case(lang)
    }
}

/// Every closed fenced block in `text`, in document order.
///
/// A fence opens on a line starting (after indentation) with three backticks,
/// or mid-line when the backticks are directly followed by a language tag. It
/// closes on a line that holds only backticks or that ends with them, in which
/// case the text before the backticks is the block's last line. Openers and
/// closers on one line form a single-line block whose body follows the tag;
/// otherwise the rest of the opening line is info string. A fence left open at
/// the end of the text is discarded.
#[must_use]
pub fn fenced_blocks(text: &str) -> Vec<FencedBlock> {
    let mut blocks = Vec::new();
    let mut open: Option<(String, Vec<&str>)> = None;

    for raw in text.split('\n') {
        let line = raw.strip_suffix('\r').unwrap_or(raw);

        match open.take() {
            None => {
                let Some(info) = opener_info(line) else {
                    continue;
                };
                let (lang, rest) = split_info(info);
                match rest.find("```") {
                    Some(end) => blocks.push(FencedBlock {
                        lang: lang.to_string(),
                        body: rest[..end].trim().to_string(),
                    }),
                    None => open = Some((lang.to_string(), Vec::new())),
                }
            }
            Some((lang, mut body)) => {
                let trimmed = line.trim_end();
                if is_closing_fence(trimmed.trim_start()) {
                    blocks.push(FencedBlock {
                        lang,
                        body: body.join("\n"),
                    });
                } else if let Some(last) = trimmed.strip_suffix("```") {
                    body.push(last.trim_end_matches('`'));
                    blocks.push(FencedBlock {
                        lang,
                        body: body.join("\n"),
                    });
                } else {
                    body.push(line);
                    open = Some((lang, body));
                }
            }
        }
    }

    blocks
}

/// Text after an opening fence on `line`, if the line opens one.
fn opener_info(line: &str) -> Option<&str> {
    if let Some(info) = line.trim_start().strip_prefix("```") {
        return Some(info.trim_start_matches('`'));
    }

    let start = line.find("```")?;
    let info = line[start..].trim_start_matches('`');
    info.starts_with(|c: char| c.is_ascii_alphabetic())
        .then_some(info)
}

/// Split an info string into its language tag and the rest of the line.
fn split_info(info: &str) -> (&str, &str) {
    let info = info.trim_start();
    let tag_end = info
        .find(|c: char| c.is_whitespace() || c == '`')
        .unwrap_or(info.len());
    let (tag, rest) = info.split_at(tag_end);
    (tag, rest.trim_start())
}

fn is_closing_fence(trimmed: &str) -> bool {
    trimmed.len() >= 3 && trimmed.chars().all(|c| c == '`')
}
