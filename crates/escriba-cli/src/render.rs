//! Terminal rendering of projected answers, citations and reports.

use colored::Colorize;

use escriba_core::analyzer::{AnalysisReport, Severity};
use escriba_core::citation::Citation;
use escriba_core::markdown::{BlockNode, InlineNode};

/// Renders projected blocks as colored terminal text.
pub fn render_blocks(blocks: &[BlockNode]) -> String {
    let mut out = String::new();
    for (index, block) in blocks.iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        render_block(block, &mut out);
    }
    out
}

fn render_block(block: &BlockNode, out: &mut String) {
    match block {
        BlockNode::Paragraph(inlines) => {
            out.push_str(&render_inlines(inlines));
            out.push('\n');
        }
        BlockNode::List { ordered, items } => {
            for (index, item) in items.iter().enumerate() {
                let marker = if *ordered {
                    format!("{}. ", index + 1)
                } else {
                    "• ".to_string()
                };
                out.push_str(&marker);
                out.push_str(&render_inlines(item));
                out.push('\n');
            }
        }
        BlockNode::BlockQuote(inner) => {
            let rendered = render_blocks(inner);
            for line in rendered.lines() {
                out.push_str(&format!("{} {}\n", "│".dimmed(), line));
            }
        }
        BlockNode::Table { header, rows } => {
            if !header.is_empty() {
                out.push_str(&header.join(" | ").bold().to_string());
                out.push('\n');
                out.push_str(&"-".repeat(header.join(" | ").chars().count()));
                out.push('\n');
            }
            for row in rows {
                out.push_str(&row.join(" | "));
                out.push('\n');
            }
        }
    }
}

fn render_inlines(inlines: &[InlineNode]) -> String {
    inlines
        .iter()
        .map(|inline| match inline {
            InlineNode::Text(text) => text.clone(),
            InlineNode::Bold(children) => render_inlines(children).bold().to_string(),
            InlineNode::Code(code) => code.cyan().to_string(),
        })
        .collect()
}

/// Terminal glyph for a citation icon identifier.
fn glyph_for(icon: &str) -> &'static str {
    match icon {
        "file-text" => "📄",
        "scale" => "⚖",
        "book-open" => "📖",
        _ => "•",
    }
}

/// Renders the "Fundamentos e Fontes" card.
pub fn render_sources(sources: &[Citation]) -> String {
    if sources.is_empty() {
        return String::new();
    }
    let mut out = format!("{}\n", "Fundamentos e Fontes".bold());
    for (index, source) in sources.iter().enumerate() {
        let mut line = format!(
            "  {}. {} [{}] {}",
            index + 1,
            glyph_for(source.kind.icon()),
            source.kind,
            source.title
        );
        if let Some(reference) = &source.reference {
            line.push_str(&format!(" - {reference}"));
        }
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// Renders the follow-up suggestion chips, selectable by number.
pub fn render_follow_ups(follow_ups: &[String]) -> String {
    if follow_ups.is_empty() {
        return String::new();
    }
    let mut out = format!("{}\n", "Perguntas relacionadas:".bold());
    for (index, suggestion) in follow_ups.iter().enumerate() {
        out.push_str(&format!("  [{}] {}\n", index + 1, suggestion));
    }
    out.push_str(&"Digite o número para perguntar.".dimmed().to_string());
    out.push('\n');
    out
}

fn severity_glyph(severity: Severity) -> String {
    match severity {
        Severity::Passed => "✔".green().to_string(),
        Severity::Warning => "⚠".yellow().to_string(),
        Severity::Failed => "✖".red().to_string(),
    }
}

/// Renders a document analysis report.
pub fn render_report(report: &AnalysisReport) -> String {
    let mut out = format!("{}\n", "Resultado da Análise".bold());
    out.push_str(&format!(
        "Tipo: {} | Confiança: {}%\n",
        report.document_type, report.confidence
    ));
    for finding in &report.findings {
        out.push_str(&format!(
            "  {} {}\n",
            severity_glyph(finding.severity),
            finding.message
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use escriba_core::analyzer::Finding;
    use escriba_core::citation::SourceKind;
    use escriba_core::markdown::project;

    fn no_color() {
        colored::control::set_override(false);
    }

    #[test]
    fn renders_paragraph_with_bold_and_code() {
        no_color();
        let rendered = render_blocks(&project("**negrito** e `código`"));
        assert_eq!(rendered, "negrito e código\n");
    }

    #[test]
    fn renders_lists_with_markers() {
        no_color();
        let rendered = render_blocks(&project("1. um\n2. dois"));
        assert_eq!(rendered, "1. um\n2. dois\n");
        let rendered = render_blocks(&project("- a\n- b"));
        assert_eq!(rendered, "• a\n• b\n");
    }

    #[test]
    fn renders_quote_with_bar_prefix() {
        no_color();
        let rendered = render_blocks(&project("> nota"));
        assert_eq!(rendered, "│ nota\n");
    }

    #[test]
    fn renders_sources_with_kind_tags() {
        no_color();
        let sources = vec![
            Citation::new(SourceKind::Statute, "Lei 6.015/73").with_reference("art. 198"),
            Citation::new(SourceKind::Document, "Matrícula 12.345"),
        ];
        let rendered = render_sources(&sources);
        assert!(rendered.contains("1. ⚖ [LEI] Lei 6.015/73 - art. 198"));
        assert!(rendered.contains("2. 📄 [DOCUMENTO] Matrícula 12.345"));
        assert!(render_sources(&[]).is_empty());
    }

    #[test]
    fn renders_follow_up_chips_numbered() {
        no_color();
        let rendered = render_follow_ups(&["Qual o prazo?".to_string()]);
        assert!(rendered.contains("[1] Qual o prazo?"));
        assert!(render_follow_ups(&[]).is_empty());
    }

    #[test]
    fn renders_report_findings() {
        no_color();
        let report = AnalysisReport {
            document_type: "Matrícula Imobiliária".to_string(),
            confidence: 85,
            findings: vec![
                Finding::new(Severity::Passed, "ok"),
                Finding::new(Severity::Failed, "falta certidão"),
            ],
        };
        let rendered = render_report(&report);
        assert!(rendered.contains("Tipo: Matrícula Imobiliária | Confiança: 85%"));
        assert!(rendered.contains("✖ falta certidão"));
    }
}
