/// Formula kinds found in rendered site content.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormulaKind {
    Inline,
    Display,
}

impl FormulaKind {
    pub fn selector(self) -> &'static str {
        match self {
            FormulaKind::Inline => ".math.inline[data-latex]",
            FormulaKind::Display => ".math.display[data-latex]",
        }
    }

    /// Only inline formulas copy their source on click; display formulas
    /// carry a dedicated copy button.
    pub fn copies_on_click(self) -> bool {
        matches!(self, FormulaKind::Inline)
    }
}

/// Decodes the five entities the site generator escapes in `data-latex`.
/// Single pass, so `&amp;lt;` decodes to `&lt;` rather than `<`.
pub fn decode_entities(raw: &str) -> String {
    const ENTITIES: [(&str, char); 5] = [
        ("&amp;", '&'),
        ("&lt;", '<'),
        ("&gt;", '>'),
        ("&quot;", '"'),
        ("&#39;", '\''),
    ];
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(idx) = rest.find('&') {
        out.push_str(&rest[..idx]);
        let tail = &rest[idx..];
        match ENTITIES.iter().find(|(entity, _)| tail.starts_with(entity)) {
            Some((entity, ch)) => {
                out.push(*ch);
                rest = &tail[entity.len()..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
