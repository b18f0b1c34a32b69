//! Minimal CSS selector engine for the in-memory DOM
//!
//! Supports what the enhancer's selectors use: selector lists (`,`),
//! descendant combinators (whitespace), type and universal selectors, `#id`,
//! `.class`, and `[attr]`, `[attr="v"]`, `[attr^="v"]`.

use crate::error::EnhancerError;
use nom::{
    branch::alt,
    bytes::complete::{tag, take_till, take_while1},
    character::complete::{char, multispace0, multispace1},
    combinator::{all_consuming, map, opt, value},
    error::{Error as NomError, ErrorKind},
    multi::{many0, separated_list1},
    sequence::{delimited, pair, preceded, terminated},
    IResult,
};

/// Read-only view of an element tree the selector can be matched against.
pub(crate) trait ElementTree {
    type Id: Copy;

    fn tag(&self, id: Self::Id) -> &str;
    fn attr(&self, id: Self::Id, name: &str) -> Option<&str>;
    fn parent(&self, id: Self::Id) -> Option<Self::Id>;
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SelectorList(Vec<ComplexSelector>);

/// Compounds joined by descendant combinators, leftmost first.
#[derive(Debug, Clone, PartialEq)]
struct ComplexSelector(Vec<Compound>);

#[derive(Debug, Clone, Default, PartialEq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrSelector>,
}

#[derive(Debug, Clone, PartialEq)]
struct AttrSelector {
    name: String,
    op: AttrOp,
}

#[derive(Debug, Clone, PartialEq)]
enum AttrOp {
    Exists,
    Equals(String),
    Prefix(String),
}

impl SelectorList {
    pub(crate) fn parse(source: &str) -> Result<Self, EnhancerError> {
        all_consuming(parse_list)(source)
            .map(|(_, list)| list)
            .map_err(|_| EnhancerError::InvalidSelector(source.to_string()))
    }

    pub(crate) fn matches<T: ElementTree>(&self, tree: &T, id: T::Id) -> bool {
        self.0.iter().any(|complex| complex.matches(tree, id))
    }
}

impl ComplexSelector {
    fn matches<T: ElementTree>(&self, tree: &T, id: T::Id) -> bool {
        let Some((subject, ancestors)) = self.0.split_last() else {
            return false;
        };
        if !subject.matches(tree, id) {
            return false;
        }

        // Descendant-only chains: greedily matching the nearest ancestor is exact.
        let mut cursor = tree.parent(id);
        for compound in ancestors.iter().rev() {
            loop {
                match cursor {
                    None => return false,
                    Some(ancestor) => {
                        cursor = tree.parent(ancestor);
                        if compound.matches(tree, ancestor) {
                            break;
                        }
                    }
                }
            }
        }
        true
    }
}

impl Compound {
    fn matches<T: ElementTree>(&self, tree: &T, id: T::Id) -> bool {
        if let Some(tag) = &self.tag {
            if !tree.tag(id).eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(wanted) = &self.id {
            if tree.attr(id, "id") != Some(wanted.as_str()) {
                return false;
            }
        }
        if !self.classes.is_empty() {
            let class_attr = tree.attr(id, "class").unwrap_or("");
            let has_all = self
                .classes
                .iter()
                .all(|c| class_attr.split_whitespace().any(|have| have == c));
            if !has_all {
                return false;
            }
        }
        self.attrs.iter().all(|attr| {
            let value = tree.attr(id, &attr.name);
            match (&attr.op, value) {
                (_, None) => false,
                (AttrOp::Exists, Some(_)) => true,
                (AttrOp::Equals(expected), Some(v)) => v == expected,
                (AttrOp::Prefix(prefix), Some(v)) => v.starts_with(prefix.as_str()),
            }
        })
    }
}

// =============================================================================
// PARSER
// =============================================================================

enum Simple {
    Id(String),
    Class(String),
    Attr(AttrSelector),
}

fn parse_list(input: &str) -> IResult<&str, SelectorList> {
    map(
        delimited(
            multispace0,
            separated_list1(delimited(multispace0, char(','), multispace0), complex),
            multispace0,
        ),
        SelectorList,
    )(input)
}

fn complex(input: &str) -> IResult<&str, ComplexSelector> {
    map(separated_list1(multispace1, compound), ComplexSelector)(input)
}

fn compound(input: &str) -> IResult<&str, Compound> {
    let (rest, (tag_selector, simples)) = pair(opt(type_selector), many0(simple))(input)?;
    if tag_selector.is_none() && simples.is_empty() {
        return Err(nom::Err::Error(NomError::new(input, ErrorKind::Verify)));
    }

    let mut compound = Compound {
        tag: tag_selector.flatten(),
        ..Default::default()
    };
    for simple in simples {
        match simple {
            Simple::Id(id) => compound.id = Some(id),
            Simple::Class(class) => compound.classes.push(class),
            Simple::Attr(attr) => compound.attrs.push(attr),
        }
    }
    Ok((rest, compound))
}

/// `*` matches any tag, so it yields no constraint.
fn type_selector(input: &str) -> IResult<&str, Option<String>> {
    alt((
        value(None, char('*')),
        map(ident, |tag: &str| Some(tag.to_ascii_lowercase())),
    ))(input)
}

fn simple(input: &str) -> IResult<&str, Simple> {
    alt((
        map(preceded(char('#'), ident), |id: &str| Simple::Id(id.to_string())),
        map(preceded(char('.'), ident), |class: &str| {
            Simple::Class(class.to_string())
        }),
        map(attr, Simple::Attr),
    ))(input)
}

fn attr(input: &str) -> IResult<&str, AttrSelector> {
    let operator = pair(
        alt((tag("^="), tag("="))),
        preceded(multispace0, attr_value),
    );
    map(
        delimited(
            pair(char('['), multispace0),
            pair(terminated(ident, multispace0), opt(operator)),
            pair(multispace0, char(']')),
        ),
        |(name, op): (&str, Option<(&str, &str)>)| AttrSelector {
            name: name.to_string(),
            op: match op {
                None => AttrOp::Exists,
                Some(("^=", v)) => AttrOp::Prefix(v.to_string()),
                Some((_, v)) => AttrOp::Equals(v.to_string()),
            },
        },
    )(input)
}

fn attr_value(input: &str) -> IResult<&str, &str> {
    alt((
        delimited(char('"'), take_till(|c: char| c == '"'), char('"')),
        delimited(char('\''), take_till(|c: char| c == '\''), char('\'')),
        ident,
    ))(input)
}

fn ident(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '-' || c == '_')(input)
}
