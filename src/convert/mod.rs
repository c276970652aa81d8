//! Content converters, selected by file extension.

mod markdown;

pub use markdown::{MarkdownConverter, MarkdownOptions};

/// Turns source text of one format into output text.
pub trait Converter: Send + Sync {
    fn matches(&self, ext: &str) -> bool;

    /// Extension of the converted output (`html`).
    fn output_ext(&self) -> &'static str;

    fn convert(&self, content: &str) -> String;
}

/// Ordered converter list. The first match wins.
pub struct ConverterRegistry {
    converters: Vec<Box<dyn Converter>>,
}

impl ConverterRegistry {
    /// Registry with no converters: everything passes through.
    pub fn new() -> Self {
        Self {
            converters: Vec::new(),
        }
    }

    pub fn register(&mut self, converter: impl Converter + 'static) -> &mut Self {
        self.converters.push(Box::new(converter));
        self
    }

    pub fn find(&self, ext: &str) -> Option<&dyn Converter> {
        let ext = ext.to_ascii_lowercase();
        self.converters
            .iter()
            .find(|c| c.matches(&ext))
            .map(|c| &**c)
    }

    /// Convert with the matching converter, or return `content` unchanged.
    pub fn convert(&self, ext: &str, content: &str) -> String {
        match self.find(ext) {
            Some(converter) => converter.convert(content),
            None => content.to_string(),
        }
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register(MarkdownConverter::new(MarkdownOptions::all()));
        registry
    }
}
