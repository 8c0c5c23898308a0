//! Markdown projection for answer rendering.
//!
//! Projects a text blob from the answering collaborator into a sequence of
//! whitelisted block nodes. The input is only partially trusted, so the
//! output is restricted to the node kinds below: raw HTML, scripts, links,
//! images, headings and fenced code all degrade to plain text instead of
//! surviving as markup.

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

/// Inline content inside a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineNode {
    /// Plain text. Everything outside the whitelist lands here.
    Text(String),
    /// Bold span.
    Bold(Vec<InlineNode>),
    /// Inline code span.
    Code(String),
}

/// A renderable block. The whitelist is closed: no HTML or executable
/// construct can appear in the projection output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockNode {
    Paragraph(Vec<InlineNode>),
    List {
        ordered: bool,
        items: Vec<Vec<InlineNode>>,
    },
    BlockQuote(Vec<BlockNode>),
    Table {
        header: Vec<String>,
        rows: Vec<Vec<String>>,
    },
}

impl InlineNode {
    /// Flattens this node to its plain-text content.
    pub fn plain_text(&self) -> String {
        match self {
            InlineNode::Text(text) | InlineNode::Code(text) => text.clone(),
            InlineNode::Bold(children) => children.iter().map(InlineNode::plain_text).collect(),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum FrameKind {
    Paragraph,
    Item,
    Bold,
}

struct Frame {
    kind: FrameKind,
    inlines: Vec<InlineNode>,
}

struct ListFrame {
    ordered: bool,
    items: Vec<Vec<InlineNode>>,
}

/// Event-walk state. Block containers (the document itself plus any open
/// block quotes) form one stack, inline containers another.
struct Projector {
    block_stack: Vec<Vec<BlockNode>>,
    frame_stack: Vec<Frame>,
    list_stack: Vec<ListFrame>,
    table: Option<TableState>,
}

#[derive(Default)]
struct TableState {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
    current_row: Vec<String>,
    current_cell: String,
    in_cell: bool,
}

/// Projects markdown text into the whitelisted block-node sequence.
///
/// Pure and deterministic per input; unsupported constructs degrade to
/// plain text.
pub fn project(text: &str) -> Vec<BlockNode> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    let parser = Parser::new_ext(text, options);

    let mut projector = Projector {
        block_stack: vec![Vec::new()],
        frame_stack: Vec::new(),
        list_stack: Vec::new(),
        table: None,
    };

    for event in parser {
        projector.handle(event);
    }
    projector.finish()
}

impl Projector {
    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.push_inline(InlineNode::Text(text.to_string())),
            Event::Code(text) => self.push_inline(InlineNode::Code(text.to_string())),
            // Raw HTML never survives as markup: it degrades to literal text.
            Event::Html(raw) | Event::InlineHtml(raw) => {
                self.push_inline(InlineNode::Text(raw.to_string()))
            }
            Event::SoftBreak | Event::HardBreak => {
                self.push_inline(InlineNode::Text(" ".to_string()))
            }
            Event::TaskListMarker(checked) => {
                let marker = if checked { "[x] " } else { "[ ] " };
                self.push_inline(InlineNode::Text(marker.to_string()));
            }
            // Rules, footnote references and any future event kinds carry
            // no whitelisted content.
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            // Headings are not whitelisted; their text degrades to a paragraph.
            Tag::Paragraph | Tag::Heading { .. } | Tag::CodeBlock(_) => {
                if !self.in_item() {
                    self.frame_stack.push(Frame {
                        kind: FrameKind::Paragraph,
                        inlines: Vec::new(),
                    });
                }
            }
            Tag::Strong => self.frame_stack.push(Frame {
                kind: FrameKind::Bold,
                inlines: Vec::new(),
            }),
            Tag::List(start) => self.list_stack.push(ListFrame {
                ordered: start.is_some(),
                items: Vec::new(),
            }),
            Tag::Item => self.frame_stack.push(Frame {
                kind: FrameKind::Item,
                inlines: Vec::new(),
            }),
            Tag::BlockQuote(_) => self.block_stack.push(Vec::new()),
            Tag::Table(_) => self.table = Some(TableState::default()),
            Tag::TableHead | Tag::TableRow => {
                if let Some(table) = self.table.as_mut() {
                    table.current_row.clear();
                }
            }
            Tag::TableCell => {
                if let Some(table) = self.table.as_mut() {
                    table.current_cell.clear();
                    table.in_cell = true;
                }
            }
            // Links, images, emphasis and the rest are outside the
            // whitelist; their inner text flows through as plain text.
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph | TagEnd::Heading(_) | TagEnd::CodeBlock => {
                if !self.in_item() {
                    self.flush_paragraph();
                }
            }
            TagEnd::Strong => {
                if let Some(frame) = self.pop_frame(FrameKind::Bold) {
                    self.push_inline(InlineNode::Bold(frame.inlines));
                }
            }
            TagEnd::Item => {
                if let Some(frame) = self.pop_frame(FrameKind::Item) {
                    if let Some(list) = self.list_stack.last_mut() {
                        list.items.push(frame.inlines);
                    }
                }
            }
            TagEnd::List(_) => {
                if let Some(list) = self.list_stack.pop() {
                    if let Some(parent) = self.list_stack.last_mut() {
                        // A nested list folds its items into the parent.
                        parent.items.extend(list.items);
                    } else {
                        self.push_block(BlockNode::List {
                            ordered: list.ordered,
                            items: list.items,
                        });
                    }
                }
            }
            TagEnd::BlockQuote(_) => {
                if self.block_stack.len() > 1 {
                    let blocks = self.block_stack.pop().unwrap_or_default();
                    self.push_block(BlockNode::BlockQuote(blocks));
                }
            }
            TagEnd::TableCell => {
                if let Some(table) = self.table.as_mut() {
                    table.in_cell = false;
                    let cell = std::mem::take(&mut table.current_cell);
                    table.current_row.push(cell.trim().to_string());
                }
            }
            TagEnd::TableHead => {
                if let Some(table) = self.table.as_mut() {
                    table.header = std::mem::take(&mut table.current_row);
                }
            }
            TagEnd::TableRow => {
                if let Some(table) = self.table.as_mut() {
                    let row = std::mem::take(&mut table.current_row);
                    table.rows.push(row);
                }
            }
            TagEnd::Table => {
                if let Some(table) = self.table.take() {
                    self.push_block(BlockNode::Table {
                        header: table.header,
                        rows: table.rows,
                    });
                }
            }
            _ => {}
        }
    }

    fn in_item(&self) -> bool {
        self.frame_stack
            .iter()
            .any(|frame| frame.kind == FrameKind::Item)
    }

    fn pop_frame(&mut self, kind: FrameKind) -> Option<Frame> {
        match self.frame_stack.last() {
            Some(frame) if frame.kind == kind => self.frame_stack.pop(),
            _ => None,
        }
    }

    fn push_inline(&mut self, node: InlineNode) {
        // Table cells hold plain text only.
        if let Some(table) = self.table.as_mut() {
            if table.in_cell {
                table.current_cell.push_str(&node.plain_text());
                return;
            }
        }
        match self.frame_stack.last_mut() {
            Some(frame) => frame.inlines.push(node),
            // Inline content with no open block (e.g. stray HTML) still
            // lands in the output as its own paragraph.
            None => self.push_block(BlockNode::Paragraph(vec![node])),
        }
    }

    fn flush_paragraph(&mut self) {
        if let Some(frame) = self.pop_frame(FrameKind::Paragraph) {
            if !frame.inlines.is_empty() {
                self.push_block(BlockNode::Paragraph(frame.inlines));
            }
        }
    }

    fn push_block(&mut self, block: BlockNode) {
        if let Some(blocks) = self.block_stack.last_mut() {
            blocks.push(block);
        }
    }

    fn finish(mut self) -> Vec<BlockNode> {
        self.flush_paragraph();
        while self.block_stack.len() > 1 {
            let blocks = self.block_stack.pop().unwrap_or_default();
            self.push_block(BlockNode::BlockQuote(blocks));
        }
        self.block_stack.pop().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(content: &str) -> InlineNode {
        InlineNode::Text(content.to_string())
    }

    #[test]
    fn bold_span_inside_paragraph() {
        let blocks = project("**bold** text");
        assert_eq!(
            blocks,
            vec![BlockNode::Paragraph(vec![
                InlineNode::Bold(vec![text("bold")]),
                text(" text"),
            ])]
        );
    }

    #[test]
    fn plain_paragraphs() {
        let blocks = project("primeiro\n\nsegundo");
        assert_eq!(
            blocks,
            vec![
                BlockNode::Paragraph(vec![text("primeiro")]),
                BlockNode::Paragraph(vec![text("segundo")]),
            ]
        );
    }

    #[test]
    fn ordered_and_unordered_lists() {
        let blocks = project("1. um\n2. dois\n\n- a\n- b");
        assert_eq!(
            blocks,
            vec![
                BlockNode::List {
                    ordered: true,
                    items: vec![vec![text("um")], vec![text("dois")]],
                },
                BlockNode::List {
                    ordered: false,
                    items: vec![vec![text("a")], vec![text("b")]],
                },
            ]
        );
    }

    #[test]
    fn block_quote_wraps_inner_blocks() {
        let blocks = project("> citação legal");
        assert_eq!(
            blocks,
            vec![BlockNode::BlockQuote(vec![BlockNode::Paragraph(vec![
                text("citação legal")
            ])])]
        );
    }

    #[test]
    fn table_with_header_and_rows() {
        let blocks = project("| Ato | Prazo |\n|---|---|\n| Registro | 30 dias |\n| Averbação | 15 dias |");
        assert_eq!(
            blocks,
            vec![BlockNode::Table {
                header: vec!["Ato".to_string(), "Prazo".to_string()],
                rows: vec![
                    vec!["Registro".to_string(), "30 dias".to_string()],
                    vec!["Averbação".to_string(), "15 dias".to_string()],
                ],
            }]
        );
    }

    #[test]
    fn inline_code_span() {
        let blocks = project("use `art. 167` aqui");
        assert_eq!(
            blocks,
            vec![BlockNode::Paragraph(vec![
                text("use "),
                InlineNode::Code("art. 167".to_string()),
                text(" aqui"),
            ])]
        );
    }

    #[test]
    fn raw_html_degrades_to_plain_text() {
        let blocks = project("<script>alert('x')</script>");
        // No markup-capable node kind exists; the payload must survive only
        // as literal text.
        let flattened: String = blocks
            .iter()
            .map(|block| match block {
                BlockNode::Paragraph(inlines) => inlines
                    .iter()
                    .map(|inline| {
                        assert!(matches!(inline, InlineNode::Text(_)));
                        inline.plain_text()
                    })
                    .collect::<String>(),
                other => panic!("unexpected block for html input: {other:?}"),
            })
            .collect();
        assert!(flattened.contains("<script>"));
        assert!(flattened.contains("alert('x')"));
    }

    #[test]
    fn inline_html_degrades_to_plain_text() {
        let blocks = project("antes <b onclick=\"x()\">depois</b>");
        let BlockNode::Paragraph(inlines) = &blocks[0] else {
            panic!("expected paragraph");
        };
        assert!(inlines.iter().all(|node| matches!(node, InlineNode::Text(_))));
        let flat: String = inlines.iter().map(InlineNode::plain_text).collect();
        assert!(flat.contains("<b onclick=\"x()\">"));
    }

    #[test]
    fn heading_degrades_to_paragraph() {
        let blocks = project("# Título\n\ncorpo");
        assert_eq!(
            blocks,
            vec![
                BlockNode::Paragraph(vec![text("Título")]),
                BlockNode::Paragraph(vec![text("corpo")]),
            ]
        );
    }

    #[test]
    fn link_keeps_only_its_text() {
        let blocks = project("veja [o provimento](https://example.com/x)");
        let BlockNode::Paragraph(inlines) = &blocks[0] else {
            panic!("expected paragraph");
        };
        let flat: String = inlines.iter().map(InlineNode::plain_text).collect();
        assert_eq!(flat, "veja o provimento");
    }

    #[test]
    fn projection_is_deterministic() {
        let input = "**negrito** e `código`\n\n> nota";
        assert_eq!(project(input), project(input));
    }

    #[test]
    fn empty_input_projects_to_nothing() {
        assert!(project("").is_empty());
    }
}
