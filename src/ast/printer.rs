//! Stringifier for the style-sheet tree

use super::node::{NodeData, NodeId, NodeKind};
use super::tree::Stylesheet;

/// Print a sheet back to source text, re-emitting every stored raw.
pub(crate) fn print(sheet: &Stylesheet) -> String {
    let mut out = String::new();
    let root = sheet.root();
    write_children(sheet, root, &mut out);
    if let Some(node) = sheet.get(root) {
        out.push_str(&node.raws.after);
    }
    out
}

fn write_children(sheet: &Stylesheet, parent: NodeId, out: &mut String) {
    let children = sheet.children(parent);
    for (index, &id) in children.iter().enumerate() {
        if let Some(node) = sheet.get(id) {
            let last = index + 1 == children.len();
            write_node(sheet, id, node, last, out);
        }
    }
}

fn write_node(sheet: &Stylesheet, id: NodeId, node: &NodeData, last: bool, out: &mut String) {
    let raws = &node.raws;
    out.push_str(&raws.before);

    // A statement followed by a sibling always needs its semicolon, even if
    // it was the last one in its block when parsed.
    let terminate = raws.semicolon || !last;

    match &node.kind {
        NodeKind::Root => {}
        NodeKind::Rule { selector } => {
            out.push_str(selector);
            out.push_str(&raws.between);
            write_body(sheet, id, node, out);
        }
        NodeKind::Declaration {
            prop,
            value,
            important,
        } => {
            out.push_str(prop);
            out.push_str(&raws.between);
            out.push_str(value);
            if *important {
                if raws.important.is_empty() {
                    out.push_str(" !important");
                } else {
                    out.push_str(&raws.important);
                }
            }
            if terminate {
                out.push_str(&raws.after);
                out.push(';');
            }
        }
        NodeKind::AtRule {
            name,
            params,
            block,
        } => {
            out.push('@');
            out.push_str(name);
            out.push_str(&raws.after_name);
            out.push_str(params);
            if *block {
                out.push_str(&raws.between);
                write_body(sheet, id, node, out);
            } else if terminate {
                out.push_str(&raws.between);
                out.push(';');
            }
        }
        NodeKind::Comment { text, inline } => {
            if *inline {
                out.push_str("//");
                out.push_str(text);
            } else {
                out.push_str("/*");
                out.push_str(text);
                out.push_str("*/");
            }
        }
    }
}

fn write_body(sheet: &Stylesheet, id: NodeId, node: &NodeData, out: &mut String) {
    out.push('{');
    write_children(sheet, id, out);
    out.push_str(&node.raws.after);
    out.push('}');
}
