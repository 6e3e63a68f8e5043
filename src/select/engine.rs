use crate::node::{DomWalker, Node, PredicateKey, PredicateMap, TreeWalker};
use crate::select::{
    ClassSelector, CompoundSelector, Context, FilterExpr, FilterRegistry, FilterResult, Roots, SelectError,
    SelectOptions, SelectorGroup, Subselector, Token,
};
use std::fmt::{Debug, Formatter};
use tracing::{debug, trace};

/// Evaluates selectors against node trees.
///
/// An engine owns its [`FilterRegistry`] (seeded with the built-in filters) and its [`TreeWalker`]. Registering a
/// filter needs `&mut self`, and selecting needs only `&self`, so the set of filters can't change in the middle of a
/// selection.
pub struct Engine {
    filters: FilterRegistry,
    options: SelectOptions,
    walker: Box<dyn TreeWalker + Send + Sync>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for Engine {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("filters", &self.filters)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Engine {
    pub fn new() -> Self {
        Self::with_options(SelectOptions::default())
    }

    pub fn with_options(options: SelectOptions) -> Self {
        Self {
            filters: FilterRegistry::with_builtins(),
            options,
            walker: Box::new(DomWalker),
        }
    }

    /// Replaces the default [`DomWalker`].
    pub fn with_walker<W>(mut self, walker: W) -> Self
    where
        W: TreeWalker + Send + Sync + 'static,
    {
        self.walker = Box::new(walker);
        self
    }

    pub fn options(&self) -> SelectOptions {
        self.options
    }

    pub fn walker(&self) -> &(dyn TreeWalker + Send + Sync) {
        self.walker.as_ref()
    }

    pub fn filters(&self) -> &FilterRegistry {
        &self.filters
    }

    pub fn filters_mut(&mut self) -> &mut FilterRegistry {
        &mut self.filters
    }

    /// Adds a filter under the given name, replacing any filter (including a built-in one) of the same name.
    pub fn register_filter<F>(&mut self, name: impl Into<String>, filter: F)
    where
        F: for<'n> Fn(&Engine, Context<'n>, Option<&str>) -> FilterResult<'n> + Send + Sync + 'static,
    {
        self.filters.register(name, filter);
    }

    /// Selects the nodes matching `selector`, searching the roots and all their descendants.
    ///
    /// Results are in evaluation order: each comma-separated subselector's results, in turn. Nodes are not
    /// deduplicated.
    pub fn select<'n>(&self, roots: impl Into<Roots<'n>>, selector: &str) -> Result<Vec<&'n Node>, SelectError> {
        let group = SelectorGroup::parse(selector).map_err(|err| SelectError::parse(selector, err))?;
        self.select_parsed(roots, &group)
    }

    /// Like [`Engine::select`], with an already-parsed selector.
    pub fn select_parsed<'n>(
        &self,
        roots: impl Into<Roots<'n>>,
        group: &SelectorGroup,
    ) -> Result<Vec<&'n Node>, SelectError> {
        let roots = roots.into();
        let mut found = Vec::new();
        for subselector in &group.subselectors {
            found.extend(self.select_subselector(roots.as_slice(), subselector)?);
        }
        Ok(found)
    }

    /// Evaluates a single subselector. This is mostly useful for filters that take a selector as their argument.
    ///
    /// Evaluation stops as soon as any token leaves nothing selected.
    pub fn select_subselector<'n>(
        &self,
        roots: impl Into<Roots<'n>>,
        subselector: &Subselector,
    ) -> Result<Vec<&'n Node>, SelectError> {
        let mut context = Context::single_group(roots.into().into_vec());
        for token in &subselector.tokens {
            trace!(?token, nodes = context.len(), "applying token");
            context = self.apply_token(context, token)?;
            if context.is_empty() {
                return Ok(Vec::new());
            }
        }
        Ok(context.flatten())
    }

    fn apply_token<'n>(&self, context: Context<'n>, token: &Token) -> Result<Context<'n>, SelectError> {
        let next = match token {
            Token::Universal => context,
            Token::Compound(compound) => self.apply_compound(context, compound),
            Token::Id(id) => self.apply_id(context, id),
            Token::Class(class) => self.apply_class(context, class),
            Token::Filter(expr) => self.apply_filter(context, expr)?,
            Token::Unrecognized(text) => {
                debug!(token = text.as_str(), "unrecognized selector token; selecting nothing");
                Context::default()
            }
        };
        Ok(next)
    }

    /// The tag search is recursive. The attribute refinements after it are not, since the tag search already found
    /// every candidate; without a tag, they search recursively instead.
    fn apply_compound<'n>(&self, mut context: Context<'n>, compound: &CompoundSelector) -> Context<'n> {
        if let Some(tag) = &compound.tag {
            let found = context
                .groups()
                .iter()
                .flat_map(|group| self.walker.find_by_tag(tag, group, true));
            context = Context::from_nodes(found.collect::<Vec<_>>());
        }
        let recurse = compound.tag.is_none();
        for clause in &compound.attrs {
            let predicates = PredicateMap::new()
                .with(PredicateKey::Attr(clause.name.clone()), |value| clause.matcher.matches(value));
            let found = context
                .groups()
                .iter()
                .flat_map(|group| self.walker.find_matching(&predicates, group, recurse));
            context = Context::from_nodes(found.collect::<Vec<_>>());
        }
        context
    }

    fn apply_id<'n>(&self, context: Context<'n>, id: &str) -> Context<'n> {
        let candidates: Vec<&'n Node> = context.nodes().collect();
        match self.walker.find_by_id(id, &candidates, true) {
            Some(node) => Context::from_nodes([node]),
            None => {
                debug!(id, "no element with id; selecting nothing");
                Context::default()
            }
        }
    }

    fn apply_class<'n>(&self, context: Context<'n>, class: &ClassSelector) -> Context<'n> {
        let predicates =
            PredicateMap::new().with(PredicateKey::Attr("class".to_string()), |value| class.matches(value));
        let mut found = Vec::new();
        for group in context.groups() {
            match &class.tag {
                Some(tag) => {
                    let tagged = self.walker.find_by_tag(tag, group, true);
                    found.extend(self.walker.find_matching(&predicates, &tagged, false));
                }
                None => found.extend(self.walker.find_matching(&predicates, group, true)),
            }
        }
        Context::from_nodes(found)
    }

    /// With a preselector, the filter sees one group per input group: whatever the preselector found within it.
    /// Without one, it sees a single group of the whole context.
    ///
    /// A chained filter then runs against this filter's results. Its own preselector, if it has one, applies; this
    /// filter's doesn't.
    fn apply_filter<'n>(&self, context: Context<'n>, expr: &FilterExpr) -> Result<Context<'n>, SelectError> {
        let input = match &expr.preselector {
            Some(preselector) => {
                let mut groups = Vec::with_capacity(context.groups().len());
                for group in context.groups() {
                    groups.push(self.select_subselector(group.as_slice(), preselector)?);
                }
                Context::new(groups)
            }
            None => Context::single_group(context.flatten()),
        };
        let found = match self.filters.get(&expr.name) {
            Some(filter) => filter.apply(self, input, expr.arg())?,
            None => {
                debug!(filter = expr.name.as_str(), "unknown filter; selecting nothing");
                Vec::new()
            }
        };
        let context = Context::from_nodes(found);
        match &expr.chained {
            Some(chained) => self.apply_filter(context, chained),
            None => Ok(context),
        }
    }
}
