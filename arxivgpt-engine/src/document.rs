use arxivgpt_core::types::ColorScheme;
use scraper::node::Element;
use scraper::{ElementRef, Html, Node, Selector};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::OnceLock;

pub const CONTAINER_CLASS: &str = "chat-gpt-container";

pub const FALLBACK_CLASS: &str = "sidebar-free";

pub const QUESTION_LIST_CLASS: &str = "question-container";

fn container_selector() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    SEL.get_or_init(|| {
        Selector::parse(&format!("div.{CONTAINER_CLASS}")).expect("valid container selector")
    })
}

fn question_list_selector() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    SEL.get_or_init(|| {
        Selector::parse(&format!(".{QUESTION_LIST_CLASS}")).expect("valid question list selector")
    })
}

fn div_selector() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    SEL.get_or_init(|| Selector::parse("div").expect("valid div selector"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Primary,
    Fallback,
}

/// A parsed HTML document the assistant container can be inserted into.
///
/// Only selector queries read it. Writes are limited to container insertion
/// or removal and question list items. Once detached (the page went away)
/// every write is a no-op.
#[derive(Debug)]
pub struct Document {
    html: Html,
    attached: bool,
}

impl Document {
    pub fn parse(source: &str) -> Self {
        Self {
            html: Html::parse_document(source),
            attached: true,
        }
    }

    pub fn html(&self) -> &Html {
        &self.html
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn detach(&mut self) {
        self.attached = false;
    }

    /// First element matching `selector` in document order.
    ///
    /// `Html::select` yields nodes in creation order, which differs from
    /// document order once the parser has moved content (foster parenting).
    pub fn select_first(&self, selector: &Selector) -> Option<ElementRef<'_>> {
        let root = self.html.root_element();
        if selector.matches(&root) {
            return Some(root);
        }
        root.select(selector).next()
    }

    pub fn container_count(&self) -> usize {
        self.html.select(container_selector()).count()
    }

    pub fn has_container(&self) -> bool {
        self.container_count() > 0
    }

    pub fn insert_container(
        &mut self,
        target: &Selector,
        placement: Placement,
        classes: &[&str],
    ) -> bool {
        if !self.attached {
            return false;
        }

        let Some(target_id) = self.select_first(target).map(|el| el.id()) else {
            return false;
        };
        let Some(element) = container_element(classes) else {
            return false;
        };
        let Some(mut node) = self.html.tree.get_mut(target_id) else {
            return false;
        };

        match placement {
            Placement::Primary => {
                node.prepend(Node::Element(element));
            }
            Placement::Fallback => {
                node.append(Node::Element(element));
            }
        }
        true
    }

    /// Appends `Q<n> : <question>` as item `question-<index>` to the question
    /// list and gives both the theme class. Returns false when the page has
    /// no question list.
    pub fn append_question(&mut self, index: usize, question: &str, theme_class: &str) -> bool {
        if !self.attached {
            return false;
        }

        let Some((list_id, themed_list)) = self
            .select_first(question_list_selector())
            .map(|el| (el.id(), with_class(el.value(), theme_class)))
        else {
            return false;
        };
        let Some((item, text)) = question_item(index, question, theme_class) else {
            return false;
        };
        let Some(mut list) = self.html.tree.get_mut(list_id) else {
            return false;
        };

        if let Some(themed) = themed_list {
            *list.value() = Node::Element(themed);
        }
        list.append(Node::Element(item)).append(text);
        true
    }

    pub fn remove_containers(&mut self) -> usize {
        if !self.attached {
            return 0;
        }

        let ids: Vec<_> = self
            .html
            .select(container_selector())
            .map(|el| el.id())
            .collect();
        for id in &ids {
            if let Some(mut node) = self.html.tree.get_mut(*id) {
                node.detach();
            }
        }
        ids.len()
    }

    pub fn to_html(&self) -> String {
        self.html.html()
    }
}

fn container_element(classes: &[&str]) -> Option<Element> {
    let mut all = vec![CONTAINER_CLASS];
    all.extend(classes.iter().copied().filter(|c| *c != CONTAINER_CLASS));
    let fragment = Html::parse_fragment(&format!(r#"<div class="{}"></div>"#, all.join(" ")));
    fragment
        .select(div_selector())
        .next()
        .map(|el| el.value().clone())
}

fn question_item(index: usize, question: &str, theme_class: &str) -> Option<(Element, Node)> {
    let source = format!(
        r#"<div class="question-{index} {theme_class}">Q{} : {}</div>"#,
        index + 1,
        escape_html(question)
    );
    let fragment = Html::parse_fragment(&source);
    let div = fragment.select(div_selector()).next()?;
    let text = div.children().next()?.value().clone();
    Some((div.value().clone(), text))
}

// Copy of `element` with `class` added, or None if it already has it.
fn with_class(element: &Element, class: &str) -> Option<Element> {
    if element.classes().any(|c| c == class) {
        return None;
    }

    let mut attrs = String::new();
    let mut has_class_attr = false;
    for (name, value) in element.attrs() {
        let value = if name == "class" {
            has_class_attr = true;
            format!("{value} {class}")
        } else {
            value.to_string()
        };
        attrs.push_str(&format!(r#" {name}="{}""#, escape_html(&value)));
    }
    if !has_class_attr {
        attrs.push_str(&format!(r#" class="{}""#, escape_html(class)));
    }

    let name = element.name();
    let fragment = Html::parse_fragment(&format!("<{name}{attrs}></{name}>"));
    let selector = Selector::parse(name).ok()?;
    fragment.select(&selector).next().map(|el| el.value().clone())
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[derive(Debug)]
pub struct Page {
    pub host: String,
    pub color_scheme: ColorScheme,
    pub document: Document,
}

pub type SharedPage = Rc<RefCell<Page>>;

impl Page {
    pub fn new(host: impl Into<String>, document: Document) -> Self {
        Self {
            host: host.into(),
            color_scheme: ColorScheme::Light,
            document,
        }
    }

    pub fn with_color_scheme(mut self, scheme: ColorScheme) -> Self {
        self.color_scheme = scheme;
        self
    }

    pub fn shared(self) -> SharedPage {
        Rc::new(RefCell::new(self))
    }
}
