//! Whole-parser edge cases: realistic files, recovery interplay, and
//! span discipline across the tree.

use tablec_util::{Handler, SourceFile};

use crate::ast::*;
use crate::test_util::*;
use crate::Parser;

#[test]
fn realistic_module_parses_clean() {
    let source = "\
import io.file
import fmt = text.format

pub const version = \"1.0.0\"

const {
    max_rows = 10_000
    max_cols = 256
}

struct Cell {
    row, col: int = 0, 0
    value: ?float
}

pub func cell_at(table: Table, row: int, col: int = 0): ?Cell {
    if row < 0 or col < 0 {
        return null
    }
    candidates: []Cell = table.cells[row..row + 1]
    for c in candidates {
        if c.col == col {
            return c
        }
    }
    return null
}

func + (a: Cell, b: Cell): Cell {
    total: float = (a.value ? 0.0) + (b.value ? 0.0)
    return make_cell(a.row, a.col, value = total)
}

#test \"cell lookup\" {
    assert cell_at(empty_table(), 0, 0) == null
}
";
    let module = parse_module(source);
    assert_eq!(module.tests.len(), 1);
    let keys: Vec<_> = module.scope.keys().map(|k| k.as_str()).collect();
    assert_eq!(
        keys,
        vec![
            "io.file",
            "fmt",
            "version",
            "max_rows",
            "max_cols",
            "Cell",
            "cell_at",
            "+"
        ]
    );
}

#[test]
fn every_node_span_is_ordered() {
    fn check_expr(expr: &Expr) {
        assert!(expr.span().is_ordered(), "unordered {:?}", expr.span());
        match expr {
            Expr::Binop(n) => {
                check_expr(&n.lhs);
                check_expr(&n.rhs);
            },
            Expr::Cmp(n) => n.operands.iter().for_each(check_expr),
            Expr::Call(n) => {
                check_expr(&n.callee);
                n.pos_args.iter().for_each(check_expr);
                n.kw_args.values().for_each(check_expr);
            },
            Expr::Subscript(n) => check_expr(&n.base),
            Expr::Ternary(n) => {
                check_expr(&n.condition);
                check_expr(&n.true_expr);
                check_expr(&n.false_expr);
            },
            _ => {},
        }
    }
    let module = parse_module(
        "const a = f(x + y * z, depth = 3)[0]\nconst b = p if q < r else s\n",
    );
    assert!(module.span.is_ordered());
    for item in module.scope.values() {
        assert!(item.span().is_ordered());
        if let Item::Const(constant) = item {
            check_expr(&constant.value);
        }
    }
}

#[test]
fn comparison_chain_invariant_holds_under_nesting() {
    let Expr::Cmp(chain) = parse_expr("(a + 1) < f(b) <= c[0] == d.e") else {
        panic!("expected chain");
    };
    assert_eq!(chain.operands.len(), chain.ops.len() + 1);
    assert!(chain.operands.len() >= 2);
}

#[test]
fn error_in_one_function_does_not_hide_later_errors() {
    let source = "\
func first() {
    1 +
}

func second() {
    2 +
}
";
    let file = SourceFile::from_source("test.tbl", source);
    let handler = Handler::new();
    let mut parser = Parser::new(&file, &handler);
    assert!(parser.execute().is_none());
    assert!(handler.error_count() >= 2, "both bodies should be diagnosed");
}

#[test]
fn deeply_nested_expression() {
    let mut source = String::from("const deep = ");
    for _ in 0..64 {
        source.push('(');
    }
    source.push('1');
    for _ in 0..64 {
        source.push(')');
    }
    source.push('\n');
    let module = parse_module(&source);
    let Item::Const(constant) = &module.scope[0] else {
        panic!("expected const");
    };
    assert!(matches!(constant.value, Expr::Int(_)));
}

#[test]
fn semicolon_sequences_in_one_line() {
    let Expr::Binop(seq) = parse_expr("a ; b ; c") else {
        panic!("expected sequence");
    };
    assert_eq!(seq.op.as_str(), ";");
    // Left-associative: ((a ; b) ; c).
    assert!(matches!(&*seq.lhs, Expr::Binop(_)));
}

#[test]
fn directive_read_missing_file_is_fatal() {
    let handler = parse_module_err("const blob = #read \"/no/such/file.txt\"\n");
    assert!(handler
        .diagnostics()
        .iter()
        .any(|d| d.message.contains("Unable to read")));
}

#[test]
fn directive_read_substitutes_contents() {
    use std::io::Write;
    let mut tmp = tempfile::NamedTempFile::new().unwrap();
    write!(tmp, "embedded payload").unwrap();
    let source = format!("const blob = #read \"{}\"\n", tmp.path().display());
    let module = parse_module(&source);
    let Item::Const(constant) = &module.scope[0] else {
        panic!("expected const");
    };
    let Expr::Str(lit) = &constant.value else {
        panic!("expected string");
    };
    assert_eq!(lit.value.as_str(), "embedded payload");
}

#[test]
fn backtick_names_escape_keywords() {
    let module = parse_module("const `match` = 1\n");
    assert_eq!(
        module.scope.keys().next().unwrap().as_str(),
        "match"
    );
}

#[test]
fn line_continuation_joins_statements() {
    let module = parse_module("const x = 1 + \\\n    2\n");
    let Item::Const(constant) = &module.scope[0] else {
        panic!("expected const");
    };
    assert!(matches!(constant.value, Expr::Binop(_)));
}
