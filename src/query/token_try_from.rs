use crate::query::tokenizer::{split_subselectors, tokenize};
use crate::query::{DetachedSpan, Pair, ParseError, Query, Rule};
use crate::select::{
    AttrClause, AttrMatcher, AttrOp, ClassSelector, CompoundSelector, FilterExpr, SelectorGroup, Subselector, Token,
};

impl SelectorGroup {
    /// Parses a full selector string, including its comma-separated subselectors.
    ///
    /// Parsing is lenient: a token that isn't a recognized form becomes [`Token::Unrecognized`] rather than an
    /// error. The only errors are from tokenizing.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let mut subselectors = Vec::new();
        for (offset, part) in split_subselectors(text) {
            subselectors.push(Subselector::parse_at(part, offset)?);
        }
        Ok(Self { subselectors })
    }
}

impl TryFrom<&str> for SelectorGroup {
    type Error = ParseError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl TryFrom<&String> for SelectorGroup {
    type Error = ParseError;

    fn try_from(value: &String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl Subselector {
    /// Parses a single subselector. Commas are not treated specially.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        Self::parse_at(text, 0)
    }

    pub(crate) fn parse_at(text: &str, offset: usize) -> Result<Self, ParseError> {
        let mut tokens = Vec::new();
        for raw in tokenize(text, offset)? {
            tokens.push(Token::parse_raw(&raw.text, raw.span)?);
        }
        Ok(Self { tokens })
    }
}

impl Token {
    fn parse_raw(text: &str, span: DetachedSpan) -> Result<Self, ParseError> {
        match Query::parse_token(text) {
            None => Ok(Self::Unrecognized(text.to_string())),
            Some(pair) => Self::find_token(pair, span.start),
        }
    }

    fn find_token(root: Pair, offset: usize) -> Result<Self, ParseError> {
        let (as_rule, text) = (root.as_rule(), root.as_str());
        let token = match as_rule {
            Rule::universal => Self::Universal,
            Rule::filter_expr => Self::Filter(FilterExpr::from_pair(root, offset)?),
            Rule::compound => Self::Compound(CompoundSelector::from_pair(root)),
            Rule::id_selector => {
                let id = root.into_inner().find(|p| p.as_rule() == Rule::id_name);
                Self::Id(id.map(|p| p.as_str().to_string()).unwrap_or_default())
            }
            Rule::class_selector => Self::Class(ClassSelector::from_pair(root)),
            _ => Self::Unrecognized(text.to_string()),
        };
        Ok(token)
    }
}

impl FilterExpr {
    fn from_pair(root: Pair, offset: usize) -> Result<Self, ParseError> {
        let mut expr = Self::new("");
        let mut arg_offset = offset;
        for child in root.into_inner() {
            match child.as_rule() {
                Rule::preselector => {
                    let pre_offset = offset + child.as_span().start();
                    expr.preselector = Some(Subselector::parse_at(child.as_str(), pre_offset)?);
                }
                Rule::filter_name => expr.name = child.as_str().to_string(),
                Rule::filter_args => {
                    if let Some(arg) = child.into_inner().find(|p| p.as_rule() == Rule::filter_arg) {
                        arg_offset = offset + arg.as_span().start();
                        expr.arg = Some(arg.as_str().to_string());
                    }
                }
                _ => {}
            }
        }
        if let Some(arg) = &expr.arg {
            if let Some(inner) = Query::parse_token(arg).filter(|p| p.as_rule() == Rule::filter_expr) {
                expr.chained = Some(Box::new(Self::from_pair(inner, arg_offset)?));
            }
        }
        Ok(expr)
    }
}

impl CompoundSelector {
    fn from_pair(root: Pair) -> Self {
        let mut result = Self::default();
        for child in root.into_inner() {
            match child.as_rule() {
                Rule::tag_name => result.tag = Some(child.as_str().to_string()),
                Rule::attr_clause => result.attrs.push(AttrClause::from_pair(child)),
                _ => {}
            }
        }
        result
    }
}

impl AttrClause {
    fn from_pair(root: Pair) -> Self {
        let mut name = String::new();
        let mut op = None;
        let mut value = String::new();
        for child in root.into_inner() {
            match child.as_rule() {
                Rule::attr_name => name = child.as_str().to_string(),
                Rule::attr_op => op = AttrOp::from_symbol(child.as_str()),
                Rule::attr_value => value = child.as_str().to_string(),
                _ => {}
            }
        }
        let matcher = match op {
            None => AttrMatcher::presence(),
            Some(op) => AttrMatcher::new(op, value),
        };
        Self { name, matcher }
    }
}

impl ClassSelector {
    fn from_pair(root: Pair) -> Self {
        let mut segments = root
            .into_inner()
            .filter(|p| p.as_rule() == Rule::class_segment)
            .map(|p| p.as_str().to_string());
        let tag = segments.next().filter(|tag| !tag.is_empty());
        Self {
            tag,
            classes: segments.collect(),
        }
    }
}
