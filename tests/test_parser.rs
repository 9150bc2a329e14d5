//! Parser integration tests.
//!
//! Sources are parsed to ASTs and compared against hand-built trees.

extern crate beans;

use beans::parser::ast::{FunctionCallData, Node};
use beans::parser::{parse_to_ast, parse_to_token_tree, ParseError};
use pretty_assertions::assert_eq;

fn parse_body(source: &str) -> Vec<Node> {
    match parse_to_ast(source) {
        Ok(Node::Program(body)) => body,
        Ok(other) => panic!("expected a program, got {:?}", other),
        Err(e) => panic!("Parse error: {}", e),
    }
}

fn call(name: &str, parameters: Vec<Node>) -> Node {
    Node::call(FunctionCallData::new(name).with_parameters(parameters))
}

#[test]
fn test_empty_script() {
    assert_eq!(parse_body(""), vec![]);
    assert_eq!(parse_body("  // only a comment\n"), vec![]);
}

#[test]
fn test_literals() {
    assert_eq!(
        parse_body("1 -2.5 \"text\" true false <slot>"),
        vec![
            Node::number(1.0),
            Node::number(-2.5),
            Node::string("text"),
            Node::boolean(true),
            Node::boolean(false),
            Node::memory("slot"),
        ]
    );
}

#[test]
fn test_string_escapes() {
    assert_eq!(parse_body(r#""a\"b\n""#), vec![Node::string("a\"b\n")]);
}

#[test]
fn test_call_forms() {
    assert_eq!(
        parse_body("bare\nempty()\nprint(1, \"two\")"),
        vec![
            call("bare", vec![]),
            call("empty", vec![]),
            call("print", vec![Node::number(1.0), Node::string("two")]),
        ]
    );
}

#[test]
fn test_nested_calls() {
    assert_eq!(
        parse_body("print(add(1, mul(2, 3)))"),
        vec![call(
            "print",
            vec![call("add", vec![Node::number(1.0), call("mul", vec![Node::number(2.0), Node::number(3.0)])])]
        )]
    );
}

#[test]
fn test_colon_yield() {
    let expected = Node::call(
        FunctionCallData::new("def")
            .with_parameters(vec![Node::memory("x")])
            .with_yield(Node::number(5.0)),
    );
    assert_eq!(parse_body("def(<x>): 5"), vec![expected]);
}

#[test]
fn test_block_yield() {
    let expected = Node::call(
        FunctionCallData::new("if")
            .with_parameters(vec![Node::boolean(true)])
            .with_yield(Node::block(vec![call("print", vec![Node::string("yes")])])),
    );
    assert_eq!(parse_body("if(true) {\n  print(\"yes\")\n}"), vec![expected]);
}

#[test]
fn test_yield_without_arguments() {
    let expected = Node::call(FunctionCallData::new("twice").with_yield(Node::block(vec![])));
    assert_eq!(parse_body("twice {}"), vec![expected]);
}

#[test]
fn test_blocks_and_parameter_blocks() {
    assert_eq!(
        parse_body("{ 1; 2 } (3, 4)"),
        vec![
            Node::block(vec![Node::number(1.0), Node::number(2.0)]),
            Node::ParameterBlock(vec![Node::number(3.0), Node::number(4.0)]),
        ]
    );
}

#[test]
fn test_module_import_and_member_call() {
    assert_eq!(
        parse_body("need math\nmath.double(21)"),
        vec![
            Node::ModuleImport("math".to_string()),
            call("math.double", vec![Node::number(21.0)]),
        ]
    );
}

#[test]
fn test_file_module_import() {
    assert_eq!(
        parse_body("need \"./lib/util\""),
        vec![Node::ModuleImport("./lib/util".to_string())]
    );
}

#[test]
fn test_block_on_next_line_is_a_statement() {
    assert_eq!(
        parse_body("print(1)\n{ print(2) }"),
        vec![
            call("print", vec![Node::number(1.0)]),
            Node::block(vec![call("print", vec![Node::number(2.0)])]),
        ]
    );
    assert_eq!(
        parse_body("x\n{ y }"),
        vec![call("x", vec![]), Node::block(vec![call("y", vec![])])]
    );
}

#[test]
fn test_parameter_block_on_next_line_is_a_statement() {
    assert_eq!(
        parse_body("bare\n(1, 2)"),
        vec![
            call("bare", vec![]),
            Node::ParameterBlock(vec![Node::number(1.0), Node::number(2.0)]),
        ]
    );
}

#[test]
fn test_yield_on_the_same_line_is_attached() {
    let expected = Node::call(
        FunctionCallData::new("twice")
            .with_parameters(vec![Node::number(2.0)])
            .with_yield(Node::block(vec![call("go", vec![])])),
    );
    assert_eq!(parse_body("twice (2)\t{\n  go\n}"), vec![expected]);
}

#[test]
fn test_keywords_need_a_boundary() {
    assert_eq!(
        parse_body("needle trueish"),
        vec![call("needle", vec![]), call("trueish", vec![])]
    );
}

#[test]
fn test_statement_separators_are_optional() {
    assert_eq!(parse_body("a; b;; c"), parse_body("a b c"));
}

#[test]
fn test_syntax_errors() {
    for source in ["print(", "\"unterminated", "<>", "{", "name.", "1.x"].iter() {
        match parse_to_ast(source) {
            Err(ParseError::Syntax(_)) => {}
            other => panic!("expected a syntax error for {:?}, got {:?}", source, other),
        }
    }
}

#[test]
fn test_token_tree() {
    let tree = parse_to_token_tree("need io").unwrap();
    let lines: Vec<&str> = tree.lines().collect();
    assert_eq!(
        lines,
        vec![
            "script => (0,7) #\"need io\"",
            "  module_import => (0,7) #\"need io\"",
            "    need_keyword => (0,4) #\"need\"",
            "    identifier => (5,7) #\"io\"",
            "  EOI => (7,7) #\"\"",
        ]
    );
}
