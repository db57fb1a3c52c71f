use crate::error::CortexError;
use std::collections::VecDeque;
use tree_sitter::{Node, Parser, Tree};

/// Imports and bare-name call sites pulled out of a python syntax tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PythonSymbols {
    pub imports: Vec<String>,
    pub calls: Vec<String>,
}

pub struct TreeSitterParser {
    parser: Parser,
}

impl TreeSitterParser {
    pub fn python() -> Result<Self, CortexError> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_python::language())
            .map_err(|e| CortexError::ParseError(format!("python grammar unavailable: {}", e)))?;

        Ok(Self { parser })
    }

    /// Parses `source` and rejects any tree that needed error recovery or
    /// that only the legacy python 2 grammar accepts.
    pub fn parse(&mut self, source: &str) -> Result<Tree, CortexError> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| CortexError::ParseError("parser produced no syntax tree".to_string()))?;

        let root = tree.root_node();
        let offending = if root.has_error() {
            Some(first_error_node(root).unwrap_or(root))
        } else {
            first_rejected_node(root)
        };

        match offending {
            Some(node) => Err(describe_syntax_error(node)),
            None => Ok(tree),
        }
    }

    pub fn extract_symbols(&mut self, source: &str) -> Result<PythonSymbols, CortexError> {
        let tree = self.parse(source)?;
        Ok(collect_symbols(tree.root_node(), source.as_bytes()))
    }
}

fn describe_syntax_error(node: Node) -> CortexError {
    let position = node.start_position();
    CortexError::ParseError(format!(
        "invalid syntax at line {}, column {}",
        position.row + 1,
        position.column + 1
    ))
}

fn first_error_node<'t>(node: Node<'t>) -> Option<Node<'t>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }

    let mut cursor = node.walk();
    let children: Vec<Node<'t>> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error_node)
}

/// Constructs the grammar parses cleanly but python 3 rejects: `print x`,
/// `exec code` and an unparenthesized walrus used as a statement.
fn first_rejected_node<'t>(node: Node<'t>) -> Option<Node<'t>> {
    match node.kind() {
        "print_statement" | "exec_statement" => return Some(node),
        "expression_statement" => {
            let mut cursor = node.walk();
            let walrus = node
                .named_children(&mut cursor)
                .find(|child| child.kind() == "named_expression");
            if walrus.is_some() {
                return walrus;
            }
        }
        _ => {}
    }

    let mut cursor = node.walk();
    let children: Vec<Node<'t>> = node.named_children(&mut cursor).collect();
    children.into_iter().find_map(first_rejected_node)
}

// Breadth-first, so top-level statements are reported before nested ones.
fn collect_symbols(root: Node, source: &[u8]) -> PythonSymbols {
    let mut symbols = PythonSymbols::default();
    let mut queue = VecDeque::from([root]);

    while let Some(node) = queue.pop_front() {
        match node.kind() {
            "import_statement" => {
                for name in field_children(node, "name") {
                    symbols.imports.push(imported_name(name, source));
                }
            }
            "import_from_statement" | "future_import_statement" => {
                let module = match node.kind() {
                    "future_import_statement" => "__future__".to_string(),
                    _ => node
                        .child_by_field_name("module_name")
                        .map(|m| node_text(m, source).trim_start_matches('.').to_string())
                        .unwrap_or_default(),
                };

                if has_wildcard(node) {
                    symbols.imports.push(format!("{}.*", module));
                }
                for name in field_children(node, "name") {
                    symbols
                        .imports
                        .push(format!("{}.{}", module, imported_name(name, source)));
                }
            }
            "call" => {
                if let Some(function) = node.child_by_field_name("function") {
                    if function.kind() == "identifier" {
                        symbols.calls.push(node_text(function, source));
                    }
                }
            }
            _ => {}
        }

        let mut cursor = node.walk();
        queue.extend(node.named_children(&mut cursor));
    }

    symbols
}

fn field_children<'t>(node: Node<'t>, field: &str) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    let children = node.children_by_field_name(field, &mut cursor).collect();
    children
}

fn has_wildcard(node: Node) -> bool {
    let mut cursor = node.walk();
    let found = node
        .named_children(&mut cursor)
        .any(|child| child.kind() == "wildcard_import");
    found
}

// `import a.b as c` records `a.b`
fn imported_name(node: Node, source: &[u8]) -> String {
    match node.kind() {
        "aliased_import" => node
            .child_by_field_name("name")
            .map(|name| node_text(name, source))
            .unwrap_or_default(),
        _ => node_text(node, source),
    }
}

fn node_text(node: Node, source: &[u8]) -> String {
    node.utf8_text(source)
        .unwrap_or_default()
        .split_whitespace()
        .collect()
}
