use regex::Regex;
use std::sync::LazyLock;

use super::TemplateError;

static MARKUP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\{\{(.*?)\}\}|\{%\s*(\w+)\s*(.*?)\s*%\}").expect("valid regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Token<'a> {
    Text(&'a str),
    /// `{{ expr }}`
    Output(&'a str),
    /// `{% name markup %}`
    Tag { name: &'a str, markup: &'a str },
}

pub(super) fn tokenize(source: &str) -> Result<Vec<Token<'_>>, TemplateError> {
    let mut tokens = Vec::new();
    let mut last = 0;

    for caps in MARKUP.captures_iter(source) {
        let Some(whole) = caps.get(0) else { continue };
        push_text(&mut tokens, &source[last..whole.start()])?;
        last = whole.end();

        if let Some(expr) = caps.get(1) {
            tokens.push(Token::Output(expr.as_str().trim()));
        } else if let (Some(name), Some(markup)) = (caps.get(2), caps.get(3)) {
            tokens.push(Token::Tag {
                name: name.as_str(),
                markup: markup.as_str(),
            });
        }
    }
    push_text(&mut tokens, &source[last..])?;

    Ok(tokens)
}

/// Markup openers left in plain text were never closed.
fn push_text<'a>(tokens: &mut Vec<Token<'a>>, text: &'a str) -> Result<(), TemplateError> {
    for delimiter in ["{{", "{%"] {
        if let Some(pos) = text.find(delimiter) {
            let snippet: String = text[pos..].chars().take(40).collect();
            return Err(TemplateError::Unclosed { delimiter, snippet });
        }
    }
    if !text.is_empty() {
        tokens.push(Token::Text(text));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize() {
        let tokens = tokenize("<h1>{{ page.title }}</h1>{% t  nav.home %}!").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Text("<h1>"),
                Token::Output("page.title"),
                Token::Text("</h1>"),
                Token::Tag {
                    name: "t",
                    markup: "nav.home"
                },
                Token::Text("!"),
            ]
        );
    }

    #[test]
    fn test_tag_without_markup() {
        let tokens = tokenize("{%tl%}").unwrap();
        assert_eq!(tokens, vec![Token::Tag { name: "tl", markup: "" }]);
    }

    #[test]
    fn test_multiline_tag() {
        let tokens = tokenize("{% tf intro.md\n  title=\"x\" %}").unwrap();
        assert_eq!(
            tokens,
            vec![Token::Tag {
                name: "tf",
                markup: "intro.md\n  title=\"x\""
            }]
        );
    }

    #[test]
    fn test_unclosed() {
        assert!(matches!(
            tokenize("a {{ b"),
            Err(TemplateError::Unclosed { delimiter: "{{", .. })
        ));
        assert!(tokenize("{% t key").is_err());
    }
}
