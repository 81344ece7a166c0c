use indexmap::IndexSet;
use tracing::{debug, trace};

use crate::{
    analyzer::{Analysis, AnalyzerError, ImmutableAnalysis, Into, JoinInfo, SourceSchemas},
    ast::{ColumnReference, ComparisonOp, Expression, Join, Query, Relation, SelectItem, Sink},
    metastore::{ColumnName, KeyFormat, KsqlTopic, MetaStore, SerdeOption, SourceName, ValueFormat},
};

/// Table functions known out of the box.
pub const EXPLODE: &str = "EXPLODE";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JoinSide {
    Left,
    Right,
}

/// Walks a parsed query and records what it finds in an [`Analysis`].
///
/// Clauses are visited in a fixed order: sources and joins, the select
/// list, WHERE, GROUP BY, WINDOW, HAVING, PARTITION BY, LIMIT and finally
/// the sink.
pub struct QueryAnalyzer<'a> {
    meta_store: &'a dyn MetaStore,
    table_functions: IndexSet<String>,
}

impl<'a> QueryAnalyzer<'a> {
    pub fn new(meta_store: &'a dyn MetaStore) -> Self {
        let mut table_functions = IndexSet::new();
        table_functions.insert(EXPLODE.to_string());
        Self { meta_store, table_functions }
    }

    /// Register an additional table function name.
    pub fn with_table_function(mut self, name: &str) -> Self {
        self.table_functions.insert(name.to_uppercase());
        self
    }

    pub fn analyze(&self, query: &Query, sink: Option<&Sink>) -> Result<ImmutableAnalysis, AnalyzerError> {
        debug!(from = %query.from.name, joins = query.joins.len(), "analyzing query");
        let mut analysis = Analysis::new(query.result_materialization);

        // 1) sources, each join right after the source it brings in
        self.visit_relation(&query.from, &mut analysis)?;
        for join in &query.joins {
            self.visit_join(join, &mut analysis)?;
        }

        // 2) select list, wildcards expanded
        self.visit_select(&query.select, &mut analysis)?;

        // 3) WHERE
        if let Some(expr) = &query.where_clause {
            Self::resolve_columns(expr, &analysis.source_schemas(false)?)?;
            analysis.set_where(expr.clone())?;
        }

        // 4) GROUP BY
        if !query.group_by.is_empty() {
            let schemas = analysis.source_schemas(false)?;
            for expr in &query.group_by {
                Self::resolve_columns(expr, &schemas)?;
            }
            analysis.set_group_by(query.group_by.iter().cloned())?;
        }

        // 5) WINDOW
        if let Some(window) = &query.window {
            analysis.set_window(window.clone())?;
        }

        // 6) HAVING, evaluated after the aggregation
        if let Some(expr) = &query.having {
            Self::resolve_columns(expr, &analysis.source_schemas(true)?)?;
            analysis.set_having(expr.clone())?;
        }

        // select expressions see the aggregated row when the query groups
        let post_aggregate = !analysis.group_by_expressions().is_empty();
        let schemas = analysis.source_schemas(post_aggregate)?;
        for item in analysis.select_items() {
            if let SelectItem::Single { expression, .. } = item {
                Self::resolve_columns(expression, &schemas)?;
            }
        }

        // 7) PARTITION BY
        if let Some(expr) = &query.partition_by {
            Self::resolve_columns(expr, &analysis.source_schemas(false)?)?;
            analysis.set_partition_by(expr.clone())?;
        }

        // 8) LIMIT
        if let Some(limit) = query.limit {
            analysis.set_limit(limit)?;
        }

        // 9) INTO
        if let Some(sink) = sink {
            self.visit_sink(sink, &mut analysis)?;
        }

        Ok(analysis.freeze())
    }

    fn visit_relation(&self, relation: &Relation, analysis: &mut Analysis) -> Result<SourceName, AnalyzerError> {
        let source = self.meta_store
            .data_source(&relation.name)
            .ok_or_else(|| AnalyzerError::UnknownSource(relation.name.clone()))?;

        let alias = relation.visible_name();

        trace!(source = %relation.name, %alias, "relation");
        analysis.add_data_source(alias.clone(), source)?;
        Ok(alias)
    }

    fn visit_join(&self, join: &Join, analysis: &mut Analysis) -> Result<(), AnalyzerError> {
        let right = self.visit_relation(&join.relation, analysis)?;

        let (first, second) = match &join.criteria {
            Expression::Comparison { op: ComparisonOp::Eq, left, right } => (left.as_ref(), right.as_ref()),
            other => return Err(AnalyzerError::UnsupportedJoinCriteria(other.to_string())),
        };

        let schemas = analysis.source_schemas(false)?;
        let sides = (
            Self::join_side(first, &right, &schemas)?,
            Self::join_side(second, &right, &schemas)?,
        );

        let (left_key, right_key) = match sides {
            (Some(JoinSide::Left), Some(JoinSide::Right)) => (first, second),
            (Some(JoinSide::Right), Some(JoinSide::Left)) => (second, first),
            _ => return Err(AnalyzerError::UnsupportedJoinCriteria(join.criteria.to_string())),
        };

        analysis.add_join(JoinInfo::new(left_key.clone(), right_key.clone(), join.join_type, join.within))
    }

    /// Which side of the join an ON operand reads from. `None` when it reads
    /// from both sides or from no source at all.
    fn join_side(expr: &Expression, right: &SourceName, schemas: &SourceSchemas) -> Result<Option<JoinSide>, AnalyzerError> {
        let mut side = None;
        for column in expr.column_references() {
            let current = if &schemas.resolve(column)? == right { JoinSide::Right } else { JoinSide::Left };
            match side {
                None => side = Some(current),
                Some(previous) if previous != current => return Ok(None),
                Some(_) => {}
            }
        }
        Ok(side)
    }

    fn visit_select(&self, items: &[SelectItem], analysis: &mut Analysis) -> Result<(), AnalyzerError> {
        for item in items {
            match item {
                SelectItem::AllColumns { source } => {
                    let schemas = analysis.source_schemas(false)?;
                    for (expanded, name) in Self::expand_all_columns(source.as_ref(), &schemas)? {
                        analysis.add_select_column_refs([name]);
                        analysis.add_select_item(expanded);
                    }
                }
                SelectItem::Single { expression, .. } => {
                    analysis.add_select_column_refs(expression.column_references().into_iter().map(|c| c.name().clone()));
                    for call in expression.function_calls() {
                        if self.table_functions.contains(&call.name) {
                            analysis.add_table_function(call.clone());
                        }
                    }
                    analysis.add_select_item(item.clone());
                }
            }
        }
        Ok(())
    }

    /// Expand `*` / `source.*` into one item per value column. In a join the
    /// output names are prefixed with the source alias.
    fn expand_all_columns(source: Option<&SourceName>, schemas: &SourceSchemas) -> Result<Vec<(SelectItem, ColumnName)>, AnalyzerError> {
        if let Some(source) = source {
            if schemas.schema_of(source).is_none() {
                return Err(AnalyzerError::UnknownSource(source.clone()));
            }
        }

        let prefix_names = schemas.is_join();
        let mut out = Vec::new();
        for (alias, schema) in schemas.iter().filter(|(alias, _)| source.is_none_or(|s| s == *alias)) {
            for column in schema.value_columns() {
                let output_name = match prefix_names {
                    true => ColumnName::of(format!("{}_{}", alias, column.name)),
                    false => column.name.clone(),
                };
                let expression = Expression::Column(ColumnReference::qualified(alias.clone(), column.name.clone()));
                out.push((SelectItem::Single { expression, alias: Some(output_name) }, column.name.clone()));
            }
        }
        Ok(out)
    }

    fn resolve_columns(expr: &Expression, schemas: &SourceSchemas) -> Result<(), AnalyzerError> {
        for column in expr.column_references() {
            schemas.resolve(column)?;
        }
        Ok(())
    }

    fn visit_sink(&self, sink: &Sink, analysis: &mut Analysis) -> Result<(), AnalyzerError> {
        let serde_options = Self::serde_options(sink.properties.wrap_single_values());

        let into = match sink.create {
            true => {
                let anchor = analysis.from_sources().first().ok_or(AnalyzerError::NoSourcesBound)?;
                let anchor_topic = anchor.topic();
                let props = &sink.properties;

                let topic_name = props.kafka_topic()
                    .map(str::to_string)
                    .unwrap_or_else(|| sink.name.text().to_string());
                let value_format = props.value_format()
                    .map(ValueFormat::of)
                    .unwrap_or(anchor_topic.value_format);
                let key_format = match analysis.window_expression() {
                    Some(window) => KeyFormat::windowed(anchor_topic.key_format.format, window.window_info()),
                    // grouping re-keys the output, dropping any source windowing
                    None if !analysis.group_by_expressions().is_empty() => KeyFormat::non_windowed(anchor_topic.key_format.format),
                    None => anchor_topic.key_format,
                };

                Into::new(sink.name.clone(), true, KsqlTopic::new(topic_name, key_format, value_format), serde_options)
            }
            false => {
                let existing = self.meta_store
                    .data_source(&sink.name)
                    .ok_or_else(|| AnalyzerError::UnknownSource(sink.name.clone()))?;
                Into::new(sink.name.clone(), false, existing.topic, serde_options)
            }
        };

        debug!(sink = %into.name(), topic = %into.topic().kafka_topic_name, create = into.is_create(), "sink resolved");
        analysis.set_properties(sink.properties.clone());
        analysis.set_into(into)
    }

    fn serde_options(wrap_single_values: Option<bool>) -> Vec<SerdeOption> {
        match wrap_single_values {
            Some(true) => vec![SerdeOption::WrapSingleValues],
            Some(false) => vec![SerdeOption::UnwrapSingleValues],
            None => vec![],
        }
    }
}
