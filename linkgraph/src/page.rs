//! Page snapshot parsed from HTML markup.
//!
//! DESIGN
//! ======
//! Pages are parsed with the html5ever tokenizer rather than a full tree
//! builder: the checks only need start/end tags, attributes and text. A
//! stack of open elements tracks what is hidden from layout and what is
//! non-rendered (`head`, `script`, `style`, ...), and raw-text elements are
//! switched into the matching tokenizer state so script bodies are never read
//! as markup. The one implied end tag that matters for hidden state, `</p>`
//! before a block-level start tag, is applied the way a tree builder would.

use std::collections::BTreeSet;

use html5ever::tendril::StrTendril;
use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, Tag, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts, TokenizerResult,
};

use crate::link::{Link, parse_rel};

#[cfg(test)]
#[path = "page_test.rs"]
mod tests;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track", "wbr",
];

/// Containers whose contents never render as page content.
const NON_RENDERED: &[&str] = &["head", "script", "style", "template", "noscript", "title"];

/// Start tags that implicitly close an open `<p>`.
const CLOSES_PARAGRAPH: &[&str] = &[
    "address", "article", "aside", "blockquote", "details", "dialog", "div", "dl", "fieldset", "figcaption", "figure",
    "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hgroup", "hr", "main", "menu", "nav", "ol", "p",
    "pre", "section", "summary", "table", "ul",
];

/// Elements an implied `</p>` does not reach past.
const PARAGRAPH_SCOPE: &[&str] =
    &["applet", "button", "caption", "html", "marquee", "object", "table", "td", "template", "th"];

/// Elements that count as rendered content even without text.
const MEDIA_ELEMENTS: &[&str] = &["img", "picture", "video", "audio", "iframe", "canvas", "svg", "object", "embed"];

/// Immutable snapshot of one page: anchors, outbound links and layout hints.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Page {
    /// Site-relative path, `/`-separated (e.g. `touren/nord.html`).
    pub path: String,
    /// Ids (and legacy `<a name>`) targetable via `#fragment`.
    pub anchors: BTreeSet<String>,
    /// Anchors on elements hidden from layout, themselves or via an ancestor.
    pub hidden_anchors: BTreeSet<String>,
    pub links: Vec<Link>,
    pub has_breadcrumb: bool,
    /// Whether the page renders any visible text or media.
    pub has_content: bool,
}

impl Page {
    pub fn parse(path: impl Into<String>, html: &str) -> Self {
        let sink = PageSink { page: Page { path: path.into(), ..Page::default() }, open: Vec::new() };
        let mut tokenizer = Tokenizer::new(sink, TokenizerOpts::default());
        let mut input = BufferQueue::default();
        input.push_back(StrTendril::from_slice(html));
        while let TokenizerResult::Script(()) = tokenizer.feed(&mut input) {}
        tokenizer.end();
        tokenizer.sink.page
    }

    #[must_use]
    pub fn defines(&self, anchor: &str) -> bool {
        self.anchors.contains(anchor)
    }

    #[must_use]
    pub fn is_hidden(&self, anchor: &str) -> bool {
        self.hidden_anchors.contains(anchor)
    }
}

/// Whether `html` has non-empty rendered body content.
#[must_use]
pub fn has_rendered_content(html: &str) -> bool {
    Page::parse("", html).has_content
}

struct OpenElement {
    name: String,
    hidden: bool,
}

struct PageSink {
    page: Page,
    open: Vec<OpenElement>,
}

impl PageSink {
    fn start_tag(&mut self, tag: Tag, line: u64) -> TokenSinkResult<()> {
        let name: &str = &tag.name;
        let attr = |wanted: &str| tag.attrs.iter().find(|a| &*a.name.local == wanted).map(|a| a.value.to_string());

        if CLOSES_PARAGRAPH.contains(&name) {
            self.close_paragraph();
        }
        let hidden = self.inside_hidden() || hides_itself(&tag);
        if let Some(id) = attr("id").filter(|id| !id.is_empty()) {
            if hidden {
                self.page.hidden_anchors.insert(id.clone());
            }
            self.page.anchors.insert(id);
        }
        if name == "a" {
            if let Some(legacy) = attr("name").filter(|n| !n.is_empty()) {
                if hidden {
                    self.page.hidden_anchors.insert(legacy.clone());
                }
                self.page.anchors.insert(legacy);
            }
        }
        if attr("class").is_some_and(|class| class.split_ascii_whitespace().any(|c| c == "breadcrumb")) {
            self.page.has_breadcrumb = true;
        }
        if matches!(name, "a" | "area") {
            if let Some(href) = attr("href") {
                let target = attr("target");
                let rel = attr("rel").map(|rel| parse_rel(&rel)).unwrap_or_default();
                self.page.links.push(Link { href, target, rel, line });
            }
        }
        if !hidden && MEDIA_ELEMENTS.contains(&name) && !self.inside_non_rendered() {
            self.page.has_content = true;
        }

        if !tag.self_closing && !VOID_ELEMENTS.contains(&name) {
            self.open.push(OpenElement { name: name.to_owned(), hidden });
        }

        match name {
            "script" => TokenSinkResult::RawData(RawKind::ScriptData),
            "style" | "xmp" | "iframe" | "noembed" | "noframes" => TokenSinkResult::RawData(RawKind::Rawtext),
            "title" | "textarea" => TokenSinkResult::RawData(RawKind::Rcdata),
            "plaintext" => TokenSinkResult::Plaintext,
            _ => TokenSinkResult::Continue,
        }
    }

    fn end_tag(&mut self, name: &str) {
        if let Some(pos) = self.open.iter().rposition(|el| el.name == name) {
            self.open.truncate(pos);
        }
    }

    fn close_paragraph(&mut self) {
        let open_paragraph = self
            .open
            .iter()
            .rev()
            .take_while(|el| !PARAGRAPH_SCOPE.contains(&el.name.as_str()))
            .any(|el| el.name == "p");
        if open_paragraph {
            self.end_tag("p");
        }
    }

    fn text(&mut self, text: &str) {
        if !text.trim().is_empty() && !self.inside_hidden() && !self.inside_non_rendered() {
            self.page.has_content = true;
        }
    }

    fn inside_hidden(&self) -> bool {
        self.open.last().is_some_and(|el| el.hidden)
    }

    fn inside_non_rendered(&self) -> bool {
        self.open.iter().any(|el| NON_RENDERED.contains(&el.name.as_str()))
    }
}

fn hides_itself(tag: &Tag) -> bool {
    tag.attrs.iter().any(|a| match &*a.name.local {
        "hidden" => true,
        "style" => {
            let style: String = a.value.chars().filter(|c| !c.is_whitespace()).collect::<String>().to_ascii_lowercase();
            style.contains("display:none") || style.contains("visibility:hidden")
        }
        _ => false,
    })
}

impl TokenSink for PageSink {
    type Handle = ();

    fn process_token(&mut self, token: Token, line_number: u64) -> TokenSinkResult<()> {
        match token {
            Token::TagToken(tag) => match tag.kind {
                TagKind::StartTag => return self.start_tag(tag, line_number),
                TagKind::EndTag => self.end_tag(&tag.name),
            },
            Token::CharacterTokens(text) => self.text(&text),
            _ => {}
        }
        TokenSinkResult::Continue
    }
}
