use crate::ast;
use crate::provenance;
use crate::provenance::PathSegment;
use crate::provenance::ProvenancePath;
use crate::DefinitionRegistry;
use crate::DefragError;
use indexmap::IndexMap;

type Result<T> = std::result::Result<T, DefragError>;

/// Flattens selection sets against a [`DefinitionRegistry`].
///
/// Resolution inlines every fragment spread, buckets the resulting fields
/// by response key, and merges each bucket into a single field whose
/// nested selection set is the (recursively merged) union of all bucket
/// members. The output lists fields sorted by response key, followed by
/// inline fragments in the order they were encountered.
///
/// When a [`ProvenancePath`] is supplied, every field and inline fragment
/// is tagged with a `@gql_defrag_source` directive describing the path at
/// which it was reached; merged fields carry one such directive per
/// contributor.
#[derive(Clone, Copy, Debug)]
pub struct SelectionResolver<'reg> {
    max_depth: usize,
    registry: &'reg DefinitionRegistry,
}
impl<'reg> SelectionResolver<'reg> {
    pub fn new(registry: &'reg DefinitionRegistry, max_depth: usize) -> Self {
        Self {
            max_depth,
            registry,
        }
    }

    pub fn resolve(
        &self,
        selection_set: &ast::SelectionSet,
        provenance: Option<&ProvenancePath>,
    ) -> Result<ast::SelectionSet> {
        self.resolve_at_depth(selection_set, provenance, 0)
    }

    fn resolve_at_depth(
        &self,
        selection_set: &ast::SelectionSet,
        provenance: Option<&ProvenancePath>,
        depth: usize,
    ) -> Result<ast::SelectionSet> {
        let mut accumulator = SelectionAccumulator::default();
        self.accumulate(&selection_set.items, provenance, depth, &mut accumulator)?;
        Ok(accumulator.finish(selection_set.span, provenance.is_some()))
    }

    fn accumulate(
        &self,
        selections: &[ast::Selection],
        provenance: Option<&ProvenancePath>,
        depth: usize,
        accumulator: &mut SelectionAccumulator,
    ) -> Result<()> {
        if depth > self.max_depth {
            return Err(DefragError::RecursionLimitExceeded {
                limit: self.max_depth,
                provenance: provenance.map(|path| path.to_string()),
            });
        }

        for selection in selections {
            match selection {
                ast::Selection::Field(field) => {
                    let response_key = ast::response_key(field);
                    let selection_set =
                        if field.selection_set.items.is_empty() {
                            field.selection_set.clone()
                        } else {
                            let nested_provenance = provenance.map(|path| {
                                path.extend(PathSegment::Field(response_key))
                            });
                            self.resolve_at_depth(
                                &field.selection_set,
                                nested_provenance.as_ref(),
                                depth + 1,
                            )?
                        };

                    accumulator.push_field(ast::Field {
                        position: field.position,
                        alias: field.alias.clone(),
                        name: field.name.clone(),
                        arguments: field.arguments.clone(),
                        directives: attach_provenance(
                            &field.directives,
                            provenance,
                            field.position,
                        ),
                        selection_set,
                    });
                },

                // Directives on the spread itself are dropped: a spread only
                // contributes the selections of the fragment it names.
                ast::Selection::FragmentSpread(spread) => {
                    let fragment =
                        self.registry.lookup_fragment(&spread.fragment_name)?;
                    let fragment_provenance = provenance.map(|path| {
                        path.extend(PathSegment::Fragment(&spread.fragment_name))
                    });
                    self.accumulate(
                        &fragment.selection_set.items,
                        fragment_provenance.as_ref(),
                        depth + 1,
                        accumulator,
                    )?;
                },

                ast::Selection::InlineFragment(inline_fragment) => {
                    let nested_provenance = provenance.map(|path| {
                        path.extend(PathSegment::InlineFragment)
                    });
                    let selection_set = self.resolve_at_depth(
                        &inline_fragment.selection_set,
                        nested_provenance.as_ref(),
                        depth + 1,
                    )?;

                    accumulator.push_inline_fragment(ast::InlineFragment {
                        position: inline_fragment.position,
                        type_condition: inline_fragment.type_condition.clone(),
                        directives: attach_provenance(
                            &inline_fragment.directives,
                            provenance,
                            inline_fragment.position,
                        ),
                        selection_set,
                    });
                },
            }
        }

        Ok(())
    }
}

fn attach_provenance(
    directives: &[ast::Directive],
    provenance: Option<&ProvenancePath>,
    position: ast::Pos,
) -> Vec<ast::Directive> {
    match provenance {
        Some(path) => provenance::attach(directives, path, position),
        None => directives.to_vec(),
    }
}

/// Fields gathered for one selection scope, bucketed by response key in
/// arrival order, plus the scope's inline fragments in traversal order.
#[derive(Debug, Default)]
struct SelectionAccumulator {
    fields: IndexMap<String, Vec<ast::Field>>,
    inline_fragments: Vec<ast::InlineFragment>,
}
impl SelectionAccumulator {
    fn push_field(&mut self, field: ast::Field) {
        self.fields
            .entry(ast::response_key(&field).to_string())
            .or_default()
            .push(field);
    }

    fn push_inline_fragment(&mut self, inline_fragment: ast::InlineFragment) {
        self.inline_fragments.push(inline_fragment);
    }

    /// Pushes the contents of an already-flattened selection set without
    /// touching any directives.
    fn push_flattened(&mut self, selection_set: ast::SelectionSet) {
        for selection in selection_set.items {
            match selection {
                ast::Selection::Field(field) => self.push_field(field),
                ast::Selection::InlineFragment(inline_fragment) =>
                    self.push_inline_fragment(inline_fragment),
                // Flattened output never contains spreads.
                ast::Selection::FragmentSpread(_) => (),
            }
        }
    }

    fn finish(
        self,
        span: (ast::Pos, ast::Pos),
        track_provenance: bool,
    ) -> ast::SelectionSet {
        let SelectionAccumulator { mut fields, inline_fragments } = self;
        fields.sort_keys();

        let mut items: Vec<ast::Selection> =
            Vec::with_capacity(fields.len() + inline_fragments.len());
        items.extend(
            fields.into_values()
                .filter_map(|bucket| merge_bucket(bucket, track_provenance))
                .map(ast::Selection::Field),
        );
        items.extend(inline_fragments.into_iter().map(ast::Selection::InlineFragment));

        ast::SelectionSet { span, items }
    }
}

/// Collapses every field that shares one response key into a single field.
///
/// The first field's identity (name, alias, arguments) wins. Later fields
/// contribute their provenance directives (when tracked) and their nested
/// selections; a leaf merged with a non-leaf simply contributes nothing.
fn merge_bucket(
    bucket: Vec<ast::Field>,
    track_provenance: bool,
) -> Option<ast::Field> {
    let mut bucket = bucket.into_iter();
    let mut merged = bucket.next()?;

    let rest: Vec<ast::Field> = bucket.collect();
    if rest.is_empty() {
        return Some(merged);
    }

    let span = merged.selection_set.span;
    let mut children = SelectionAccumulator::default();
    children.push_flattened(std::mem::replace(
        &mut merged.selection_set,
        ast::SelectionSet { span, items: vec![] },
    ));

    for field in rest {
        if track_provenance {
            merged.directives.extend(
                field.directives
                    .into_iter()
                    .filter(provenance::is_provenance_directive),
            );
        }
        children.push_flattened(field.selection_set);
    }

    merged.selection_set = children.finish(span, track_provenance);
    Some(merged)
}
