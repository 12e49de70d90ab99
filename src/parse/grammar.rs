use winnow::ascii::{digit1, space0, till_line_ending};
use winnow::combinator::{alt, cut_err, opt, repeat, terminated};
use winnow::error::{ErrMode, ModalResult, ParserError, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::{any, one_of, take_while};

use crate::{CompareOp, Expression, Label, Operand, Rule, Value};

/// Words that can never be used as variable names.
const RESERVED: [&str; 8] = ["IF", "THEN", "RETURN", "AND", "OR", "NULL", "TRUE", "FALSE"];

// -- Words & keywords -------------------------------------------------------

fn ident<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (
        take_while(1, |c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(0.., |c: char| {
            c.is_ascii_alphanumeric() || c == '_' || c == '.'
        }),
    )
        .take()
        .parse_next(input)
}

/// Keywords are accepted in all-upper or all-lower case (`AND` / `and`).
fn is_keyword(word: &str, keyword: &str) -> bool {
    word == keyword
        || (word.eq_ignore_ascii_case(keyword) && !word.chars().any(|c| c.is_ascii_uppercase()))
}

fn is_reserved(word: &str) -> bool {
    RESERVED.iter().any(|kw| is_keyword(word, kw))
}

fn keyword<'i>(expected: &'static str) -> impl FnMut(&mut &'i str) -> ModalResult<()> {
    move |input: &mut &'i str| {
        space0.parse_next(input)?;
        let word = ident.parse_next(input)?;
        if is_keyword(word, expected) {
            Ok(())
        } else {
            Err(ErrMode::from_input(input))
        }
    }
}

// -- Literals ---------------------------------------------------------------

fn quoted(input: &mut &str) -> ModalResult<String> {
    let quote = one_of(['"', '\'']).parse_next(input)?;
    let mut s = String::new();
    loop {
        let ch = cut_err(any)
            .context(StrContext::Expected(StrContextValue::CharLiteral(quote)))
            .parse_next(input)?;
        match ch {
            c if c == quote => return Ok(s),
            '\\' => {
                let esc = cut_err(any).parse_next(input)?;
                match esc {
                    '"' | '\'' | '\\' => s.push(esc),
                    'n' => s.push('\n'),
                    't' => s.push('\t'),
                    other => {
                        s.push('\\');
                        s.push(other);
                    }
                }
            }
            c => s.push(c),
        }
    }
}

fn number(input: &mut &str) -> ModalResult<f64> {
    (opt('-'), digit1, opt(('.', digit1)))
        .take()
        .try_map(|s: &str| s.parse::<f64>())
        .parse_next(input)
}

// -- Operands & comparisons -------------------------------------------------

fn variable_or_null(input: &mut &str) -> ModalResult<Operand> {
    let name = ident.parse_next(input)?;
    if is_keyword(name, "NULL") {
        Ok(Operand::Literal(Value::Null))
    } else if is_reserved(name) {
        Err(ErrMode::from_input(input))
    } else {
        Ok(Operand::Variable(name.to_owned()))
    }
}

fn operand(input: &mut &str) -> ModalResult<Operand> {
    space0.parse_next(input)?;
    alt((
        quoted.map(|s| Operand::Literal(Value::String(s))),
        number.map(|n| Operand::Literal(Value::Number(n))),
        variable_or_null,
    ))
    .context(StrContext::Expected(StrContextValue::Description(
        "operand",
    )))
    .parse_next(input)
}

fn compare_op(input: &mut &str) -> ModalResult<CompareOp> {
    space0.parse_next(input)?;
    alt((
        ">=".value(CompareOp::Gte),
        ">".value(CompareOp::Gt),
        "<=".value(CompareOp::Lte),
        "<".value(CompareOp::Lt),
        "==".value(CompareOp::Eq),
        "!=".value(CompareOp::Neq),
    ))
    .context(StrContext::Expected(StrContextValue::Description(
        "comparator",
    )))
    .parse_next(input)
}

fn comparison(input: &mut &str) -> ModalResult<Expression> {
    let left = operand.parse_next(input)?;
    let op = compare_op.parse_next(input)?;
    let right = cut_err(operand).parse_next(input)?;
    Ok(Expression::Comparison { left, op, right })
}

fn constant(input: &mut &str) -> ModalResult<Expression> {
    space0.parse_next(input)?;
    let word = ident.parse_next(input)?;
    if is_keyword(word, "TRUE") {
        Ok(Expression::Constant(true))
    } else if is_keyword(word, "FALSE") {
        Ok(Expression::Constant(false))
    } else {
        Err(ErrMode::from_input(input))
    }
}

// -- Expressions (AND / OR, equal precedence, left to right) ----------------

#[derive(Debug, Clone, Copy)]
enum Connective {
    And,
    Or,
}

fn connective(input: &mut &str) -> ModalResult<Connective> {
    alt((
        keyword("AND").value(Connective::And),
        keyword("OR").value(Connective::Or),
    ))
    .parse_next(input)
}

fn term(input: &mut &str) -> ModalResult<Expression> {
    alt((comparison, constant))
        .context(StrContext::Expected(StrContextValue::Description(
            "comparison",
        )))
        .parse_next(input)
}

pub(crate) fn expression(input: &mut &str) -> ModalResult<Expression> {
    let mut expr = term.parse_next(input)?;
    let rest: Vec<(Connective, Expression)> =
        repeat(0.., (connective, cut_err(term))).parse_next(input)?;
    for (conn, rhs) in rest {
        expr = match conn {
            Connective::And => expr.and(rhs),
            Connective::Or => expr.or(rhs),
        };
    }
    Ok(expr)
}

// -- Rules ------------------------------------------------------------------

fn label(input: &mut &str) -> ModalResult<Label> {
    space0.parse_next(input)?;
    alt((
        quoted.verify(|s: &String| !s.is_empty()),
        take_while(1.., |c: char| c.is_ascii_alphanumeric() || c == '_')
            .map(str::to_owned),
    ))
    .map(Label::new)
    .context(StrContext::Expected(StrContextValue::Description("label")))
    .parse_next(input)
}

fn conditional(input: &mut &str) -> ModalResult<Rule> {
    keyword("IF").parse_next(input)?;
    let condition = cut_err(expression)
        .context(StrContext::Label("condition"))
        .parse_next(input)?;
    cut_err(keyword("THEN"))
        .context(StrContext::Expected(StrContextValue::StringLiteral("THEN")))
        .parse_next(input)?;
    cut_err(keyword("RETURN"))
        .context(StrContext::Expected(StrContextValue::StringLiteral(
            "RETURN",
        )))
        .parse_next(input)?;
    let result = cut_err(label).parse_next(input)?;
    Ok(Rule::Conditional { condition, result })
}

fn fallback(input: &mut &str) -> ModalResult<Rule> {
    keyword("RETURN").parse_next(input)?;
    let result = cut_err(label).parse_next(input)?;
    Ok(Rule::Fallback { result })
}

fn trailing(input: &mut &str) -> ModalResult<()> {
    (space0, opt(("//", till_line_ending)))
        .void()
        .parse_next(input)
}

/// A single rule line, e.g. `IF segment == "VIP" THEN RETURN BIG`.
pub(crate) fn rule_line(input: &mut &str) -> ModalResult<Rule> {
    terminated(
        alt((conditional, fallback))
            .context(StrContext::Label("rule")),
        trailing,
    )
    .parse_next(input)
}
