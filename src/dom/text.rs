// src/dom/text.rs
use scraper::{node::Node, ElementRef};

// Elements that start and end a visual line.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "details", "div", "dl", "dt",
    "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5",
    "h6", "header", "hr", "li", "main", "nav", "ol", "p", "pre", "section", "summary",
    "table", "tbody", "td", "tfoot", "th", "thead", "tr", "ul",
];

// Elements whose content is never rendered as text.
const SKIPPED_TAGS: &[&str] = &["script", "style", "template", "noscript", "head"];

// Elements whose line breaks survive rendering.
const PREFORMATTED_TAGS: &[&str] = &["pre", "textarea"];

/// Accumulates rendered lines, collapsing whitespace the way a browser does
/// for normal `white-space` flow.
#[derive(Default)]
struct LineBuffer {
    lines: Vec<String>,
    current: String,
}

impl LineBuffer {
    fn push_text(&mut self, text: &str) {
        self.current.push_str(text);
    }

    // Source newlines are real line breaks inside preformatted elements.
    fn push_preformatted(&mut self, text: &str) {
        let mut lines = text.split('\n');
        if let Some(first) = lines.next() {
            self.current.push_str(first);
        }
        for line in lines {
            self.break_line();
            self.current.push_str(line);
        }
    }

    fn break_line(&mut self) {
        let line = self.current.split_whitespace().collect::<Vec<_>>().join(" ");
        if !line.is_empty() {
            self.lines.push(line);
        }
        self.current.clear();
    }

    fn finish(mut self) -> String {
        self.break_line();
        self.lines.join("\n")
    }
}

enum Step<'a> {
    Enter(ElementRef<'a>),
    Text(&'a str),
    Leave(&'a str),
}

/// Flattened, line-by-line text of an element subtree.
///
/// Block-level elements and `<br>` produce line breaks, whitespace runs inside
/// a line collapse to a single space, and blank lines are dropped. Inside
/// `<pre>` and `<textarea>` source newlines are kept as line breaks.
///
/// Walks the subtree with an explicit stack, so nesting depth is bounded only
/// by memory.
pub fn rendered_text(element: ElementRef<'_>) -> String {
    let mut buffer = LineBuffer::default();
    let mut preformatted_depth = 0usize;
    let mut stack = vec![Step::Enter(element)];

    while let Some(step) = stack.pop() {
        match step {
            Step::Text(text) if preformatted_depth > 0 => buffer.push_preformatted(text),
            Step::Text(text) => buffer.push_text(text),
            Step::Leave(tag) => {
                if PREFORMATTED_TAGS.contains(&tag) {
                    preformatted_depth -= 1;
                }
                if BLOCK_TAGS.contains(&tag) {
                    buffer.break_line();
                }
            }
            Step::Enter(current) => {
                let tag = current.value().name();
                if SKIPPED_TAGS.contains(&tag) {
                    continue;
                }
                if tag == "br" {
                    buffer.break_line();
                    continue;
                }
                if BLOCK_TAGS.contains(&tag) {
                    buffer.break_line();
                }
                if PREFORMATTED_TAGS.contains(&tag) {
                    preformatted_depth += 1;
                }

                stack.push(Step::Leave(tag));
                // Reversed so the first child is popped first.
                for child in current.children().rev() {
                    match child.value() {
                        Node::Text(text_node) => stack.push(Step::Text(&text_node.text)),
                        Node::Element(_) => {
                            if let Some(child_element) = ElementRef::wrap(child) {
                                stack.push(Step::Enter(child_element));
                            }
                        }
                        _ => {} // Comments, doctypes, processing instructions
                    }
                }
            }
        }
    }
    buffer.finish()
}
