//! Parses HCL documents into the syntax tree defined in [`crate::ast`].

use crate::ast::{
    Attribute, Block, Body, Expression, Number, ObjectItem, ObjectKey, Structure, Value,
};
use crate::{template, Error, Result};
use pest::error::{Error as PestError, ErrorVariant};
use pest::iterators::Pair;
use pest::{Parser as ParseTrait, Span};
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "parser/grammars/hcl.pest"]
pub(crate) struct HclParser;

type ParseResult<T> = std::result::Result<T, PestError<Rule>>;

/// Parses a HCL document into a `Body`.
///
/// The `filename` is only used to point at the location of syntax errors and may be empty.
///
/// ## Errors
///
/// Returns an `Error::Syntax` if the input is not valid HCL.
pub fn parse<'a>(input: &'a str, filename: &str) -> Result<Body<'a>> {
    parse_file(input).map_err(|err| Error::syntax(err, filename))
}

fn parse_file(input: &str) -> ParseResult<Body<'_>> {
    // The first inner pair of `file` is always the body, followed by `EOI`.
    let body = HclParser::parse(Rule::file, input)?
        .next()
        .and_then(|file| file.into_inner().next());

    match body {
        Some(body) => parse_body(body),
        None => Ok(Body::new()),
    }
}

fn parse_body(pair: Pair<'_, Rule>) -> ParseResult<Body<'_>> {
    pair.into_inner().map(parse_structure).collect()
}

fn parse_structure(pair: Pair<'_, Rule>) -> ParseResult<Structure<'_>> {
    match pair.as_rule() {
        Rule::attribute => parse_attribute(pair).map(Structure::Attribute),
        Rule::block => parse_block(pair).map(Structure::Block),
        rule => unreachable!("unexpected rule in body: {:?}", rule),
    }
}

fn parse_attribute(pair: Pair<'_, Rule>) -> ParseResult<Attribute<'_>> {
    let mut inner = pair.into_inner();
    // Guaranteed by the grammar that these will exist so unchecked unwrap here is safe.
    let key = inner.next().unwrap().as_str();
    let expr = parse_expression(inner.next().unwrap())?;

    Ok(Attribute::new(key, expr))
}

fn parse_block(pair: Pair<'_, Rule>) -> ParseResult<Block<'_>> {
    let mut inner = pair.into_inner();
    // Guaranteed by the grammar that a block starts with an identifier.
    let identifier = inner.next().unwrap().as_str();
    let mut labels = Vec::new();
    let mut body = Body::new();

    for pair in inner {
        match pair.as_rule() {
            Rule::identifier => labels.push(pair.as_str().to_owned()),
            Rule::string => labels.push(parse_label(pair)?),
            Rule::body => body = parse_body(pair)?,
            rule => unreachable!("unexpected rule in block: {:?}", rule),
        }
    }

    Ok(Block::new(identifier, labels, body))
}

fn parse_label(pair: Pair<'_, Rule>) -> ParseResult<String> {
    let span = pair.as_span();

    match parse_string(pair)? {
        Expression::Value(Value::String(label)) => Ok(label),
        _ => Err(custom_error(
            "template sequences are not allowed in block labels",
            span,
        )),
    }
}

fn parse_expression(pair: Pair<'_, Rule>) -> ParseResult<Expression<'_>> {
    let raw = pair.as_str();
    let mut inner: Vec<_> = pair.into_inner().collect();

    // Nested expressions only appear as direct children in the branches of a conditional.
    if inner.iter().any(|pair| pair.as_rule() == Rule::expression) {
        return Ok(Expression::Conditional(raw));
    }

    if inner.len() > 1 {
        return Ok(Expression::Operation(raw));
    }

    match inner.pop() {
        Some(operand) => parse_operand(operand, raw),
        None => unreachable!("expression without operand"),
    }
}

fn parse_operand<'a>(pair: Pair<'a, Rule>, raw: &'a str) -> ParseResult<Expression<'a>> {
    let inner: Vec<_> = pair.into_inner().collect();

    match inner.as_slice() {
        [term] => parse_term(term.clone(), raw),
        [op, num] if op.as_str() == "-" && num.as_rule() == Rule::number => {
            parse_number(num, true).map(Expression::Value)
        }
        _ if inner.iter().any(|pair| pair.as_rule() == Rule::unary_op) => {
            Ok(Expression::Operation(raw))
        }
        _ => Ok(Expression::RawExpr(raw)),
    }
}

fn parse_term<'a>(pair: Pair<'a, Rule>, raw: &'a str) -> ParseResult<Expression<'a>> {
    let expr = match pair.as_rule() {
        Rule::number => parse_number(&pair, false)?.into(),
        Rule::boolean => Value::Bool(pair.as_str() == "true").into(),
        Rule::null => Value::Null.into(),
        Rule::string => parse_string(pair)?,
        Rule::heredoc => parse_heredoc(pair),
        Rule::tuple => {
            let tuple = pair
                .into_inner()
                .map(parse_expression)
                .collect::<ParseResult<_>>()?;

            Value::Tuple(tuple).into()
        }
        Rule::object => {
            let object = pair
                .into_inner()
                .map(parse_object_item)
                .collect::<ParseResult<_>>()?;

            Value::Object(object).into()
        }
        _ => Expression::RawExpr(raw),
    };

    Ok(expr)
}

fn parse_number<'a>(pair: &Pair<'a, Rule>, negate: bool) -> ParseResult<Value<'a>> {
    let literal = if negate {
        format!("-{}", pair.as_str())
    } else {
        pair.as_str().to_owned()
    };

    Number::parse(&literal)
        .map(Value::Number)
        .ok_or_else(|| custom_error(format!("number `{}` is out of range", literal), pair.as_span()))
}

fn parse_object_item(pair: Pair<'_, Rule>) -> ParseResult<ObjectItem<'_>> {
    let mut inner = pair.into_inner();
    // Guaranteed by the grammar that these will exist so unchecked unwrap here is safe.
    let key = inner.next().unwrap();
    let expr = parse_expression(inner.next().unwrap())?;

    let key = match key.as_rule() {
        Rule::identifier => ObjectKey::Identifier(key.as_str()),
        Rule::string => ObjectKey::Expression(parse_string(key)?),
        Rule::number => ObjectKey::Expression(parse_number(&key, false)?.into()),
        _ => ObjectKey::Expression(Expression::RawExpr(key.as_str())),
    };

    Ok(ObjectItem(key, expr))
}

fn parse_string(pair: Pair<'_, Rule>) -> ParseResult<Expression<'_>> {
    let parts: Vec<_> = pair.into_inner().collect();
    let is_template = parts
        .iter()
        .any(|part| part.as_rule() != Rule::string_literal);

    let mut s = String::new();

    for part in parts {
        if part.as_rule() != Rule::string_literal {
            s.push_str(part.as_str());
            continue;
        }

        // Escaped template markers are kept as-is within templates.
        let literal = if is_template {
            template::unescape_literal(part.as_str())
        } else {
            template::unescape_literal(&template::unescape_markers(part.as_str()))
        };

        match literal {
            Some(literal) => s.push_str(&literal),
            None => return Err(custom_error("invalid escape sequence", part.as_span())),
        }
    }

    if is_template {
        Ok(Expression::TemplateExpr(s))
    } else {
        Ok(Value::String(s).into())
    }
}

fn parse_heredoc(pair: Pair<'_, Rule>) -> Expression<'_> {
    let mut strip = false;
    let mut content = "";

    for part in pair.into_inner() {
        match part.as_rule() {
            Rule::heredoc_strip => strip = true,
            Rule::heredoc_template => content = part.as_str(),
            _ => {}
        }
    }

    let content = if strip {
        template::strip_indent(content)
    } else {
        content.to_owned()
    };

    if template::has_template_sequences(&content) {
        Expression::TemplateExpr(content)
    } else {
        Value::String(template::unescape_markers(&content)).into()
    }
}

fn custom_error<S>(message: S, span: Span<'_>) -> PestError<Rule>
where
    S: Into<String>,
{
    PestError::new_from_span(
        ErrorVariant::CustomError {
            message: message.into(),
        },
        span,
    )
}

/// Human readable rule names for syntax error messages.
pub(crate) fn describe_rule(rule: &Rule) -> String {
    let name = match rule {
        Rule::EOI => "end of input",
        Rule::attribute => "attribute",
        Rule::block => "block",
        Rule::body => "body",
        Rule::identifier => "identifier",
        Rule::expression | Rule::operand => "expression",
        Rule::unary_op => "unary operator",
        Rule::binary_op => "operator",
        Rule::string | Rule::string_literal => "string",
        Rule::heredoc | Rule::heredoc_template => "heredoc",
        Rule::template_interpolation => "interpolation",
        Rule::template_directive => "template directive",
        Rule::tuple | Rule::for_tuple => "tuple",
        Rule::object | Rule::for_object => "object",
        Rule::object_item => "object item",
        other => return format!("{:?}", other),
    };

    name.to_owned()
}
