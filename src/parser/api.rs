use std::rc::Rc;

use pest::error::{Error, ErrorVariant};
use pest::iterators::{Pair, Pairs};
use pest::Parser;
use pest_derive::Parser;
use thiserror::Error;

use super::ast::*;

#[derive(Parser)]
#[grammar = "parser/beans_grammar.pest"] // relative to src
pub struct BeansParser;

const TAB_WIDTH: usize = 2;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("{0}")]
    Syntax(Box<Error<Rule>>),
    #[error("invalid number literal `{0}`")]
    InvalidNumber(String),
}

impl From<Error<Rule>> for ParseError {
    fn from(e: Error<Rule>) -> Self {
        ParseError::Syntax(Box::new(e))
    }
}

pub fn parse_to_token_tree(script: &str) -> Result<String, ParseError> {
    let mut tree = vec![];
    let pairs = BeansParser::parse(Rule::script, script)?;
    for pair in pairs {
        tree.push(pair_to_string(pair, 0).join("\n"));
    }
    Ok(tree.join("\n"))
}

fn pair_to_string(pair: Pair<Rule>, level: usize) -> Vec<String> {
    let mut tree = vec![];
    let span = pair.as_span();
    let rule_name = format!(
        "{:?} => ({},{}) #{:?}",
        pair.as_rule(),
        span.start(),
        span.end(),
        span.as_str()
    );
    let string_pads = " ".repeat(level * TAB_WIDTH);
    tree.push(format!("{}{}", string_pads, rule_name));
    for child_pair in pair.into_inner() {
        tree.append(pair_to_string(child_pair, level + 1).as_mut());
    }
    tree
}

/// Parses a whole script into a `Node::Program`.
pub fn parse_to_ast(script: &str) -> Result<Node, ParseError> {
    let mut pairs = BeansParser::parse(Rule::script, script)?;
    let script_pair = match pairs.next() {
        Some(p) => p,
        None => return Ok(Node::Program(vec![])),
    };
    let mut body = vec![];
    for pair in script_pair.into_inner() {
        match pair.as_rule() {
            Rule::EOI => { /* Do nothing */ }
            _ => body.push(build_ast_from_expression(pair)?),
        }
    }
    Ok(Node::Program(body))
}

fn build_ast_from_expression(pair: Pair<Rule>) -> Result<Node, ParseError> {
    Ok(match pair.as_rule() {
        Rule::number_literal => {
            let text = pair.as_str();
            let n = text
                .parse::<f64>()
                .map_err(|_| ParseError::InvalidNumber(text.to_string()))?;
            Node::number(n)
        }
        Rule::string_literal => {
            let content = only_child(pair)?;
            Node::string(unescape(content.as_str()))
        }
        Rule::boolean_literal => Node::boolean(pair.as_str() == "true"),
        Rule::memory_literal => {
            let identifier = only_child(pair)?;
            Node::memory(identifier.as_str())
        }
        Rule::module_import => {
            let mut inner = pair.into_inner();
            // need_keyword is atomic and shows up as its own pair
            let target = inner.find(|p| p.as_rule() != Rule::need_keyword);
            match target {
                Some(p) if p.as_rule() == Rule::identifier => Node::ModuleImport(p.as_str().to_string()),
                Some(p) if p.as_rule() == Rule::string_literal => {
                    Node::ModuleImport(unescape(only_child(p)?.as_str()))
                }
                _ => return Err(unexpected("module name")),
            }
        }
        Rule::block => Node::Block(BlockData::new(build_ast_from_list(pair.into_inner())?)),
        Rule::parameter_block => Node::ParameterBlock(build_ast_from_list(pair.into_inner())?),
        Rule::function_call => Node::FunctionCall(build_ast_from_function_call(pair)?),
        _ => return Err(unexpected_pair(&pair)),
    })
}

fn build_ast_from_list(pairs: Pairs<Rule>) -> Result<Vec<Node>, ParseError> {
    pairs.map(build_ast_from_expression).collect()
}

fn build_ast_from_function_call(pair: Pair<Rule>) -> Result<FunctionCallData, ParseError> {
    let mut call = FunctionCallData::new("");
    for part in pair.into_inner() {
        match part.as_rule() {
            Rule::call_name => call.name = part.as_str().to_string(),
            Rule::arguments => call.parameters = build_ast_from_list(part.into_inner())?,
            Rule::yield_function => {
                let body = build_ast_from_expression(only_child(part)?)?;
                call.yield_function = Some(Rc::new(body));
            }
            _ => return Err(unexpected_pair(&part)),
        }
    }
    Ok(call)
}

fn only_child(pair: Pair<Rule>) -> Result<Pair<Rule>, ParseError> {
    let span = pair.as_span();
    pair.into_inner().next().ok_or_else(|| {
        ParseError::from(Error::new_from_span(
            ErrorVariant::CustomError {
                message: "expected a nested token".to_string(),
            },
            span,
        ))
    })
}

fn unexpected_pair(pair: &Pair<Rule>) -> ParseError {
    ParseError::from(Error::new_from_span(
        ErrorVariant::CustomError {
            message: format!("unexpected {:?}", pair.as_rule()),
        },
        pair.as_span(),
    ))
}

fn unexpected(what: &str) -> ParseError {
    ParseError::from(Error::new_from_pos(
        ErrorVariant::CustomError {
            message: format!("expected {}", what),
        },
        pest::Position::from_start(""),
    ))
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unescape() {
        assert_eq!(unescape(r#"a\"b\\c\nd"#), "a\"b\\c\nd");
    }
}
