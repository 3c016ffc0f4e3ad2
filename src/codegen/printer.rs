//! Renders an output tree to text with two-space indentation.

use super::tree::Node;
use crate::text::{dedent, tidy_lines};

const INDENT: &str = "  ";

#[derive(Debug, Default)]
pub struct Printer {
    out: String,
    depth: usize,
}

impl Printer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Print `nodes` at the top level and return the text, newline-terminated.
    pub fn print(nodes: &[Node]) -> String {
        let mut printer = Self::new();
        printer.nodes(nodes);
        printer.finish()
    }

    pub fn nodes(&mut self, nodes: &[Node]) {
        for node in nodes {
            self.node(node);
        }
    }

    pub fn node(&mut self, node: &Node) {
        match node {
            Node::Line(text) => self.line(text),
            Node::Blank => self.blank(),
            Node::Comment(text) => {
                for line in text.lines() {
                    if line.trim().is_empty() {
                        self.line("//");
                    } else {
                        self.line(&format!("// {line}"));
                    }
                }
            }
            Node::Code(text) => {
                for line in dedent(&tidy_lines(text)).lines() {
                    if line.is_empty() {
                        self.blank();
                    } else {
                        self.line(line);
                    }
                }
            }
            Node::Block { open, body, close } => {
                self.line(open);
                self.depth += 1;
                self.nodes(body);
                self.depth -= 1;
                self.line(close);
            }
            Node::DocComment(lines) => {
                self.line("/**");
                for line in lines {
                    if line.is_empty() {
                        self.line(" *");
                    } else {
                        self.line(&format!(" * {}", line.replace("*/", "* /")));
                    }
                }
                self.line(" */");
            }
        }
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn blank(&mut self) {
        self.out.push('\n');
    }

    pub fn finish(self) -> String {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn blocks_indent_their_bodies() {
        let nodes = vec![Node::block(
            "function f() {",
            vec![
                Node::line("a();"),
                Node::block("if (x) {", vec![Node::line("b();")], "}"),
            ],
            "}",
        )];
        assert_eq!(
            Printer::print(&nodes),
            "function f() {\n  a();\n  if (x) {\n    b();\n  }\n}\n"
        );
    }

    #[test]
    fn code_is_reindented() {
        let nodes = vec![Node::block(
            "{",
            vec![Node::code("      if (a) {\n        b();\n      }\n\n\n      c();")],
            "}",
        )];
        assert_eq!(
            Printer::print(&nodes),
            "{\n  if (a) {\n    b();\n  }\n\n  c();\n}\n"
        );
    }

    #[test]
    fn comments_and_doc_comments() {
        let nodes = vec![
            Node::comment("first\n\nsecond"),
            Node::DocComment(vec!["Title".into(), String::new(), "ends */ here".into()]),
        ];
        assert_eq!(
            Printer::print(&nodes),
            "// first\n//\n// second\n/**\n * Title\n *\n * ends * / here\n */\n"
        );
    }

    #[test]
    fn blank_lines_carry_no_indentation() {
        let nodes = vec![Node::block("{", vec![Node::line("a"), Node::Blank, Node::line("b")], "}")];
        assert_eq!(Printer::print(&nodes), "{\n  a\n\n  b\n}\n");
    }
}
