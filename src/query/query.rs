use pest::Parser;
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "query/grammar.pest"]
struct TokenPairs;

pub(crate) type Pair<'a> = pest::iterators::Pair<'a, Rule>;

pub(crate) struct Query {
    _private: (),
}

impl Query {
    /// Classifies a single selector token.
    ///
    /// On success, the returned pair is one of [`Rule::universal`], [`Rule::filter_expr`], [`Rule::compound`],
    /// [`Rule::id_selector`] or [`Rule::class_selector`]. A token that fits none of those returns `None`; that isn't
    /// an error, since unrecognized tokens just select nothing.
    pub(crate) fn parse_token(token_text: &str) -> Option<Pair<'_>> {
        let mut pairs = TokenPairs::parse(Rule::token, token_text).ok()?;
        pairs.next()?.into_inner().next()
    }
}
