//! Python scope resolution with tree-sitter integration.

use tree_sitter::{Node, Parser};

use super::scope::{ScopeInterval, ScopeMap};
use crate::core::errors::{Result, TodoMdError};

/// Node kinds that open a named scope. `async def` parses as a
/// `function_definition` with an `async` keyword child.
const DEFINITION_KINDS: &[&str] = &["function_definition", "class_definition"];

/// Python 2 statements the grammar still accepts but Python 3 rejects.
const PYTHON2_STATEMENT_KINDS: &[&str] = &["print_statement", "exec_statement"];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::scope::MODULE_SCOPE;

    fn scopes(source: &str) -> ScopeMap {
        PythonScopeResolver::new()
            .unwrap()
            .map_scopes(source)
            .expect("source should parse")
    }

    #[test]
    fn test_python_resolver_creation() {
        let resolver = PythonScopeResolver::new();
        assert!(resolver.is_ok(), "Should create Python resolver successfully");
    }

    #[test]
    fn test_simple_function_covers_def_line() {
        let map = scopes("def foo():\n    pass\n");
        assert_eq!(map.scope_for(1), "foo");
        assert_eq!(map.scope_for(2), "foo");
    }

    #[test]
    fn test_mapping_is_total() {
        let source = "import os\n\ndef foo():\n    return 1\n\nx = foo()\n";
        let map = scopes(source);
        assert_eq!(map.len(), source.lines().count());
        let expected = [MODULE_SCOPE, MODULE_SCOPE, "foo", "foo", MODULE_SCOPE, MODULE_SCOPE];
        for (line, want) in expected.iter().enumerate() {
            assert_eq!(map.scope_for(line + 1), *want, "line {}", line + 1);
        }
    }

    #[test]
    fn test_nested_definitions_innermost_wins() {
        let source = r#"class Outer:
    attr = 1

    def method(self):
        def helper():
            return 2
        return helper()

    other = 3
"#;
        let map = scopes(source);
        assert_eq!(map.scope_for(1), "Outer");
        assert_eq!(map.scope_for(2), "Outer");
        assert_eq!(map.scope_for(4), "method");
        assert_eq!(map.scope_for(5), "helper");
        assert_eq!(map.scope_for(6), "helper");
        assert_eq!(map.scope_for(7), "method");
        assert_eq!(map.scope_for(9), "Outer");
    }

    #[test]
    fn test_async_function() {
        let map = scopes("async def fetch():\n    await go()\n");
        assert_eq!(map.scope_for(1), "fetch");
        assert_eq!(map.scope_for(2), "fetch");
    }

    #[test]
    fn test_end_line_is_last_descendant_start() {
        // The closing bracket starts no syntax node of its own, and the trailing
        // comment is not a syntax node at all.
        let source = "def build():\n    return [\n        1,\n    ]\n    # trailing\n";
        let map = scopes(source);
        assert_eq!(map.scope_for(3), "build");
        assert_eq!(map.scope_for(4), MODULE_SCOPE);
        assert_eq!(map.scope_for(5), MODULE_SCOPE);
    }

    #[test]
    fn test_comment_inside_body_is_covered() {
        let source = "def foo():\n    # TODO: inside\n    return 1\n";
        let map = scopes(source);
        assert_eq!(map.scope_for(2), "foo");
    }

    #[test]
    fn test_decorated_function_starts_at_def() {
        let source = "@cache\ndef cached():\n    return 1\n";
        let map = scopes(source);
        assert_eq!(map.scope_for(1), MODULE_SCOPE);
        assert_eq!(map.scope_for(2), "cached");
        assert_eq!(map.scope_for(3), "cached");
    }

    #[test]
    fn test_syntax_error_is_parse_error() {
        let mut resolver = PythonScopeResolver::new().unwrap();
        let err = resolver.map_scopes("def broken(:\n    pass\n").unwrap_err();
        assert!(matches!(err, TodoMdError::Parse { .. }));
    }

    #[test]
    fn test_multiline_string_counts_at_opening_line() {
        let source = "def foo():\n    x = \"\"\"a\n# TODO: inside string\n\"\"\"  # FIXME: closing\n\ny = 1\n";
        let map = scopes(source);
        assert_eq!(map.scope_for(1), "foo");
        assert_eq!(map.scope_for(2), "foo");
        assert_eq!(map.scope_for(3), MODULE_SCOPE);
        assert_eq!(map.scope_for(4), MODULE_SCOPE);
    }

    #[test]
    fn test_fstring_interpolation_extends_definition() {
        let source = "def fmt(v):\n    return f\"\"\"\n{v}\n\"\"\"\n";
        let map = scopes(source);
        assert_eq!(map.scope_for(3), "fmt");
        assert_eq!(map.scope_for(4), MODULE_SCOPE);
    }

    #[test]
    fn test_python2_statements_are_parse_errors() {
        let mut resolver = PythonScopeResolver::new().unwrap();
        let err = resolver
            .map_scopes("def foo():\n    print \"hi\"\n")
            .unwrap_err();
        assert!(matches!(err, TodoMdError::Parse { line: Some(2), .. }));
        assert!(resolver.map_scopes("exec \"x = 1\"\n").is_err());

        let map = scopes("def foo():\n    print(\"hi\")\n");
        assert_eq!(map.scope_for(2), "foo");
    }

    #[test]
    fn test_comment_only_file() {
        let map = scopes("# Just a comment\n");
        assert_eq!(map.len(), 1);
        assert_eq!(map.scope_for(1), MODULE_SCOPE);
    }

    #[test]
    fn test_collect_intervals_in_preorder() {
        let mut resolver = PythonScopeResolver::new().unwrap();
        let source = "class A:\n    def b(self):\n        pass\ndef c():\n    pass\n";
        let intervals = resolver.collect_intervals(source).unwrap();
        let names: Vec<_> = intervals.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["A", "b", "c"]);
        assert_eq!((intervals[0].start_line, intervals[0].end_line), (1, 3));
        assert_eq!((intervals[2].start_line, intervals[2].end_line), (4, 5));
    }
}

/// Python scope resolver backed by a tree-sitter parser
pub struct PythonScopeResolver {
    /// Tree-sitter parser for Python
    parser: Parser,
}

impl PythonScopeResolver {
    /// Create a new Python resolver
    pub fn new() -> Result<Self> {
        let language: tree_sitter::Language = tree_sitter_python::LANGUAGE.into();
        let mut parser = Parser::new();
        parser.set_language(&language).map_err(|e| {
            TodoMdError::parse("python", format!("Failed to set Python language: {:?}", e))
        })?;

        Ok(Self { parser })
    }

    /// Map every line of `source_code` to its innermost definition.
    pub fn map_scopes(&mut self, source_code: &str) -> Result<ScopeMap> {
        let intervals = self.collect_intervals(source_code)?;
        Ok(ScopeMap::from_intervals(source_code.lines().count(), &intervals))
    }

    /// Parse and list definition intervals, outer definitions before inner ones.
    pub fn collect_intervals(&mut self, source_code: &str) -> Result<Vec<ScopeInterval>> {
        let tree = self
            .parser
            .parse(source_code, None)
            .ok_or_else(|| TodoMdError::parse("python", "Failed to parse Python source code"))?;

        let root = tree.root_node();
        if root.has_error() {
            let (line, column) = first_error_position(root).unwrap_or((0, 0));
            return Err(TodoMdError::Parse {
                language: "python".to_string(),
                message: "source contains syntax errors".to_string(),
                file_path: None,
                line: Some(line + 1),
                column: Some(column + 1),
            });
        }

        if let Some(node) = find_python2_statement(root) {
            let pos = node.start_position();
            return Err(TodoMdError::Parse {
                language: "python".to_string(),
                message: format!("{} is not valid Python 3", node.kind()),
                file_path: None,
                line: Some(pos.row + 1),
                column: Some(pos.column + 1),
            });
        }

        let mut intervals = Vec::new();
        self.collect_recursive(root, source_code.as_bytes(), &mut intervals)?;
        Ok(intervals)
    }

    /// Pre-order walk: a definition is recorded before anything nested in it.
    fn collect_recursive(
        &self,
        node: Node,
        source: &[u8],
        intervals: &mut Vec<ScopeInterval>,
    ) -> Result<()> {
        if DEFINITION_KINDS.contains(&node.kind()) {
            if let Some(name_node) = node.child_by_field_name("name") {
                let name = name_node.utf8_text(source)?;
                intervals.push(ScopeInterval {
                    start_line: node.start_position().row + 1,
                    end_line: last_descendant_line(node),
                    name: name.to_string(),
                });
            }
        }

        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            self.collect_recursive(child, source, intervals)?;
        }
        Ok(())
    }
}

/// Largest 1-based start line among `node` and every named descendant.
///
/// Visits the whole subtree. Comments are not part of the syntax and are
/// skipped, so a trailing comment does not extend a definition. A string
/// counts only at its opening line; only the expressions interpolated into
/// it are visited further.
fn last_descendant_line(node: Node) -> usize {
    let mut max_row = node.start_position().row;
    let mut stack = vec![node];

    while let Some(current) = stack.pop() {
        if current.kind() == "comment" {
            continue;
        }
        max_row = max_row.max(current.start_position().row);

        let mut cursor = current.walk();
        if current.kind() == "string" {
            stack.extend(
                current
                    .named_children(&mut cursor)
                    .filter(|child| child.kind() == "interpolation"),
            );
        } else {
            stack.extend(current.named_children(&mut cursor));
        }
    }

    max_row + 1
}

fn find_python2_statement(root: Node) -> Option<Node> {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if PYTHON2_STATEMENT_KINDS.contains(&node.kind()) {
            return Some(node);
        }
        let mut cursor = node.walk();
        stack.extend(node.named_children(&mut cursor));
    }
    None
}

fn first_error_position(root: Node) -> Option<(usize, usize)> {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            let pos = node.start_position();
            return Some((pos.row, pos.column));
        }
        if node.has_error() {
            let mut cursor = node.walk();
            let children: Vec<_> = node.children(&mut cursor).collect();
            stack.extend(children.into_iter().rev());
        }
    }
    None
}
