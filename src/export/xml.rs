use crate::error::ExportError;
use crate::model::{ReportDocument, ReportNode};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

const INDENT: usize = 2;

/// Writes the report as XML to `path`, replacing any existing file.
///
/// The output starts with `<?xml version="1.0" encoding="utf-8" standalone="yes"?>`,
/// then the report comment, then the root element. Category, family and
/// type names are written as element text ahead of the nested elements.
///
/// # Errors
///
/// Returns [`ExportError::FileCreate`] if the file cannot be created.
/// Returns [`ExportError::Write`] if writing or flushing fails.
pub fn write_report<P: AsRef<Path>>(document: &ReportDocument, path: P) -> Result<(), ExportError> {
    let path_ref = path.as_ref();
    let file = File::create(path_ref).map_err(|source| ExportError::FileCreate {
        path: path_ref.to_path_buf(),
        source,
    })?;

    let mut out = BufWriter::new(file);
    write_document(document, &mut out)?;
    out.flush().map_err(|e| ExportError::Write {
        message: e.to_string(),
    })?;

    tracing::info!(path = %path_ref.display(), "wrote XML report");
    Ok(())
}

/// Serializes the report to an XML string, exactly as [`write_report`] writes it.
pub fn to_xml_string(document: &ReportDocument) -> Result<String, ExportError> {
    let mut buf = Vec::new();
    write_document(document, &mut buf)?;
    String::from_utf8(buf).map_err(|e| ExportError::Write {
        message: e.to_string(),
    })
}

fn write_document<W: Write>(document: &ReportDocument, inner: W) -> Result<(), ExportError> {
    let mut writer = Writer::new_with_indent(inner, b' ', INDENT);

    emit(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("utf-8"), Some("yes"))),
    )?;
    emit(
        &mut writer,
        Event::Comment(BytesText::from_escaped(document.comment.as_str())),
    )?;
    write_node(&mut writer, &document.root)?;

    writer.get_mut().write_all(b"\n").map_err(|e| ExportError::Write {
        message: e.to_string(),
    })
}

fn write_node<W: Write>(writer: &mut Writer<W>, node: &ReportNode) -> Result<(), ExportError> {
    let tag = node.tag.as_str();

    if node.text.is_none() && node.children.is_empty() {
        return emit(writer, Event::Empty(BytesStart::new(tag)));
    }

    emit(writer, Event::Start(BytesStart::new(tag)))?;
    if let Some(text) = &node.text {
        emit(writer, Event::Text(BytesText::new(text)))?;
    }
    for child in &node.children {
        write_node(writer, child)?;
    }
    emit(writer, Event::End(BytesEnd::new(tag)))
}

fn emit<W: Write>(writer: &mut Writer<W>, event: Event<'_>) -> Result<(), ExportError> {
    writer.write_event(event).map_err(|e| ExportError::Write {
        message: e.to_string(),
    })
}

/// Reads a report written by [`write_report`] back into a tree.
///
/// Text inside a category, family or type element, up to its first child,
/// is that node's name, whitespace included. Text anywhere else is
/// indentation and is ignored. Nodes below the two sections always get a
/// text value, empty if the element had none.
///
/// # Errors
///
/// Returns [`ExportError::Xml`] for malformed XML and
/// [`ExportError::Malformed`] when the document has no single root element.
pub fn parse_report(xml: &str) -> Result<ReportDocument, ExportError> {
    let mut reader = Reader::from_str(xml);
    let mut comment: Option<String> = None;
    let mut root: Option<ReportNode> = None;
    let mut stack: Vec<ReportNode> = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let tag = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                stack.push(open_node(tag, stack.len()));
            }
            Event::Empty(e) => {
                let tag = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                let node = open_node(tag, stack.len());
                attach(&mut stack, &mut root, node)?;
            }
            Event::End(_) => {
                let node = stack.pop().ok_or_else(|| malformed("unbalanced end tag"))?;
                attach(&mut stack, &mut root, node)?;
            }
            Event::Text(t) => {
                let text = t.unescape()?;
                set_text(&mut stack, &text);
            }
            Event::CData(c) => {
                let text = String::from_utf8_lossy(&c.into_inner()).into_owned();
                set_text(&mut stack, &text);
            }
            Event::Comment(c) => {
                if comment.is_none() && stack.is_empty() && root.is_none() {
                    comment = Some(String::from_utf8_lossy(&c).into_owned());
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(malformed("unclosed element at end of input"));
    }
    let root = root.ok_or_else(|| malformed("no root element"))?;

    Ok(ReportDocument {
        comment: comment.unwrap_or_default(),
        root,
    })
}

// Depth 0 is the root, 1 the sections; anything deeper is a named node.
fn open_node(tag: String, depth: usize) -> ReportNode {
    ReportNode {
        tag,
        text: (depth >= 2).then(String::new),
        children: Vec::new(),
    }
}

// Only named nodes take text, and only ahead of their first child. The
// writer never breaks a line between a start tag and its text, so anything
// else is indentation.
fn set_text(stack: &mut [ReportNode], text: &str) {
    if let Some(node) = stack.last_mut() {
        if node.children.is_empty() {
            if let Some(current) = node.text.as_mut() {
                current.push_str(text);
            }
        }
    }
}

fn attach(stack: &mut [ReportNode], root: &mut Option<ReportNode>, node: ReportNode) -> Result<(), ExportError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None if root.is_none() => *root = Some(node),
        None => return Err(malformed("more than one root element")),
    }
    Ok(())
}

fn malformed(message: &str) -> ExportError {
    ExportError::Malformed {
        message: message.to_string(),
    }
}
