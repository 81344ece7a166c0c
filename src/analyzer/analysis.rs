use std::collections::HashSet;

use indexmap::{IndexMap, IndexSet};
use tracing::{debug, trace};

use crate::{
    analyzer::{AliasedDataSource, AnalyzerError, Clause, ImmutableAnalysis, Into, JoinInfo, SourceSchemas},
    ast::{ColumnReference, CreateSourceAsProperties, Expression, FunctionCall, ResultMaterialization, SelectItem, WindowExpression},
    metastore::{ColumnName, DataSource, LogicalSchema, SourceName},
};

/// Accumulates what the analyzer learns while walking one query.
///
/// Mutators are used only during the walk; once it is complete the analysis
/// is turned into an [`ImmutableAnalysis`] with [`Analysis::freeze`] and
/// handed to planning. Single-valued clauses can be set once.
#[derive(Debug, Clone)]
pub struct Analysis {
    result_materialization: ResultMaterialization,
    into: Option<Into>,
    from_sources: Vec<AliasedDataSource>,
    joins: Vec<JoinInfo>,
    where_expression: Option<Expression>,
    select_items: Vec<SelectItem>,
    select_column_names: HashSet<ColumnName>,
    group_by_expressions: IndexSet<Expression>,
    window_expression: Option<WindowExpression>,
    partition_by: Option<Expression>,
    having_expression: Option<Expression>,
    limit: Option<u32>,
    with_properties: CreateSourceAsProperties,
    table_functions: Vec<FunctionCall>,
}

/// Store `value` in an empty slot, or fail if the clause was already set.
fn set_once<T>(slot: &mut Option<T>, value: T, clause: Clause) -> Result<(), AnalyzerError> {
    if slot.is_some() {
        return Err(AnalyzerError::ClauseAlreadySet { clause });
    }
    *slot = Some(value);
    Ok(())
}

impl Analysis {
    pub fn new(result_materialization: ResultMaterialization) -> Self {
        Self {
            result_materialization,
            into: None,
            from_sources: Vec::new(),
            joins: Vec::new(),
            where_expression: None,
            select_items: Vec::new(),
            select_column_names: HashSet::new(),
            group_by_expressions: IndexSet::new(),
            window_expression: None,
            partition_by: None,
            having_expression: None,
            limit: None,
            with_properties: CreateSourceAsProperties::none(),
            table_functions: Vec::new(),
        }
    }

    /// Ends the walk. The returned value exposes the read API only.
    pub fn freeze(self) -> ImmutableAnalysis {
        debug!(
            sources = self.from_sources.len(),
            joins = self.joins.len(),
            select_items = self.select_items.len(),
            "analysis frozen"
        );
        ImmutableAnalysis::from(self)
    }

    pub fn add_select_item(&mut self, item: SelectItem) {
        trace!(%item, "select item");
        self.select_items.push(item);
    }

    /// Record column names referenced by the select list. Names already
    /// recorded are ignored.
    pub fn add_select_column_refs(&mut self, names: impl IntoIterator<Item = ColumnName>) {
        self.select_column_names.extend(names);
    }

    pub fn set_into(&mut self, into: Into) -> Result<(), AnalyzerError> {
        trace!(sink = %into.name(), create = into.is_create(), "into");
        set_once(&mut self.into, into, Clause::Into)
    }

    pub fn set_where(&mut self, expression: Expression) -> Result<(), AnalyzerError> {
        trace!(%expression, "where");
        set_once(&mut self.where_expression, expression, Clause::Where)
    }

    pub fn set_having(&mut self, expression: Expression) -> Result<(), AnalyzerError> {
        trace!(%expression, "having");
        set_once(&mut self.having_expression, expression, Clause::Having)
    }

    pub fn set_partition_by(&mut self, expression: Expression) -> Result<(), AnalyzerError> {
        trace!(%expression, "partition by");
        set_once(&mut self.partition_by, expression, Clause::PartitionBy)
    }

    pub fn set_window(&mut self, window: WindowExpression) -> Result<(), AnalyzerError> {
        trace!(%window, "window");
        set_once(&mut self.window_expression, window, Clause::Window)
    }

    pub fn set_limit(&mut self, limit: u32) -> Result<(), AnalyzerError> {
        trace!(limit, "limit");
        set_once(&mut self.limit, limit, Clause::Limit)
    }

    /// Add GROUP BY expressions in order. Nothing is inserted if any
    /// expression is already present or repeated within `expressions`.
    pub fn set_group_by(&mut self, expressions: impl IntoIterator<Item = Expression>) -> Result<(), AnalyzerError> {
        let mut pending: IndexSet<Expression> = IndexSet::new();
        for expression in expressions {
            if self.group_by_expressions.contains(&expression) || pending.contains(&expression) {
                debug!(%expression, "duplicate group by expression");
                return Err(AnalyzerError::DuplicateClauseElement { clause: Clause::GroupBy, expression });
            }
            pending.insert(expression);
        }
        trace!(count = pending.len(), "group by");
        self.group_by_expressions.extend(pending);
        Ok(())
    }

    /// Each join pairs the sources already joined with the next bound
    /// source, so there is at most one join per source after the first.
    pub fn add_join(&mut self, join: JoinInfo) -> Result<(), AnalyzerError> {
        if self.joins.len() + 1 >= self.from_sources.len() {
            return Err(AnalyzerError::StructuralInvariantViolation(format!(
                "join info can only be supplied for joins: {} sources, {} joins already recorded",
                self.from_sources.len(),
                self.joins.len()
            )));
        }
        trace!(%join, "join");
        self.joins.push(join);
        Ok(())
    }

    /// Aliases are unique within a query; a repeated alias is rejected and
    /// nothing is bound.
    pub fn add_data_source(&mut self, alias: SourceName, data_source: DataSource) -> Result<(), AnalyzerError> {
        if self.from_sources.iter().any(|ds| ds.alias() == &alias) {
            return Err(AnalyzerError::DuplicateAlias(alias));
        }
        let aliased = AliasedDataSource::new(alias, data_source)?;
        debug!(alias = %aliased.alias(), source = %aliased.data_source(), "data source bound");
        self.from_sources.push(aliased);
        Ok(())
    }

    pub fn set_properties(&mut self, properties: CreateSourceAsProperties) {
        self.with_properties = properties;
    }

    pub fn add_table_function(&mut self, call: FunctionCall) {
        trace!(%call, "table function");
        self.table_functions.push(call);
    }

    pub fn result_materialization(&self) -> ResultMaterialization {
        self.result_materialization
    }

    /// The sink, if the query writes to one.
    pub fn sink(&self) -> Option<&Into> {
        self.into.as_ref()
    }

    pub fn where_expression(&self) -> Option<&Expression> {
        self.where_expression.as_ref()
    }

    pub fn select_items(&self) -> &[SelectItem] {
        &self.select_items
    }

    pub fn select_column_names(&self) -> &HashSet<ColumnName> {
        &self.select_column_names
    }

    pub fn group_by_expressions(&self) -> &IndexSet<Expression> {
        &self.group_by_expressions
    }

    pub fn window_expression(&self) -> Option<&WindowExpression> {
        self.window_expression.as_ref()
    }

    pub fn having_expression(&self) -> Option<&Expression> {
        self.having_expression.as_ref()
    }

    pub fn partition_by(&self) -> Option<&Expression> {
        self.partition_by.as_ref()
    }

    pub fn limit(&self) -> Option<u32> {
        self.limit
    }

    pub fn properties(&self) -> &CreateSourceAsProperties {
        &self.with_properties
    }

    pub fn table_functions(&self) -> &[FunctionCall] {
        &self.table_functions
    }

    pub fn joins(&self) -> &[JoinInfo] {
        &self.joins
    }

    pub fn is_join(&self) -> bool {
        !self.joins.is_empty()
    }

    pub fn from_sources(&self) -> &[AliasedDataSource] {
        &self.from_sources
    }

    /// Schemas of the bound sources as visible at this point of the query.
    /// `post_aggregate` is true when resolving columns evaluated after the
    /// GROUP BY. Built fresh on every call.
    pub fn source_schemas(&self, post_aggregate: bool) -> Result<SourceSchemas, AnalyzerError> {
        if self.from_sources.is_empty() {
            return Err(AnalyzerError::NoSourcesBound);
        }

        let schemas: IndexMap<SourceName, LogicalSchema> = self.from_sources
            .iter()
            .map(|ds| (ds.alias().clone(), self.build_source_schema(ds, post_aggregate)))
            .collect();

        Ok(SourceSchemas::new(schemas))
    }

    /// Window bounds, ROWTIME and key columns are only addressable as values
    /// when the source itself is windowed, or past a windowed GROUP BY.
    fn build_source_schema(&self, ds: &AliasedDataSource, post_aggregate: bool) -> LogicalSchema {
        let windowed_source = ds.topic().key_format.is_windowed();
        let windowed_group_by = post_aggregate && self.window_expression.is_some();

        ds.schema().with_meta_and_key_cols_in_value(windowed_source || windowed_group_by)
    }

    /// `<anchor alias>.ROWTIME`, the implicit argument of functions called
    /// without one.
    pub fn default_argument(&self) -> Result<ColumnReference, AnalyzerError> {
        let anchor = self.from_sources.first().ok_or(AnalyzerError::NoSourcesBound)?;
        Ok(ColumnReference::qualified(anchor.alias().clone(), ColumnName::rowtime()))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::{
        ast::{JoinType, WithinExpression},
        metastore::{DataSourceType, Format, KeyFormat, KsqlTopic, Namespace, SerdeOption, SqlType, ValueFormat, WindowInfo, WindowType},
    };

    fn schema() -> LogicalSchema {
        LogicalSchema::new()
            .with_key_column(ColumnName::of("ID"), SqlType::BigInt)
            .with_value_column(ColumnName::of("AMOUNT"), SqlType::Double)
    }

    fn source(name: &str, source_type: DataSourceType, windowed: bool) -> DataSource {
        let key_format = if windowed {
            KeyFormat::windowed(Format::Kafka, WindowInfo::new(WindowType::Tumbling, Some(Duration::from_secs(60))))
        } else {
            KeyFormat::non_windowed(Format::Kafka)
        };
        let topic = KsqlTopic::new(name.to_lowercase(), key_format, ValueFormat::of(Format::Json));
        DataSource::new(SourceName::of(name), source_type, schema(), topic)
    }

    fn stream(name: &str) -> DataSource {
        source(name, DataSourceType::Stream, false)
    }

    fn join() -> JoinInfo {
        JoinInfo::new(Expression::qualified_column("a", "id"), Expression::qualified_column("b", "id"), JoinType::Inner, None)
    }

    fn analysis() -> Analysis {
        Analysis::new(ResultMaterialization::Changes)
    }

    #[test]
    fn test_new_analysis_is_empty() {
        let a = Analysis::new(ResultMaterialization::Final);
        assert_eq!(a.result_materialization(), ResultMaterialization::Final);
        assert!(a.from_sources().is_empty());
        assert!(a.sink().is_none());
        assert!(a.properties().is_empty());
        assert!(!a.is_join());
        assert_eq!(a.limit(), None);
    }

    #[test]
    fn test_join_requires_extra_source() {
        let mut a = analysis();
        assert!(matches!(a.add_join(join()), Err(AnalyzerError::StructuralInvariantViolation(_))));

        a.add_data_source(SourceName::of("a"), stream("orders")).unwrap();
        assert!(matches!(a.add_join(join()), Err(AnalyzerError::StructuralInvariantViolation(_))));
        assert!(a.joins().is_empty());

        a.add_data_source(SourceName::of("b"), stream("users")).unwrap();
        a.add_join(join()).unwrap();
        assert!(a.is_join());

        let err = a.add_join(join()).unwrap_err();
        assert!(err.is_internal());
        assert_eq!(a.joins().len(), 1);
    }

    #[test]
    fn test_join_invariant_holds_for_interleavings() {
        // 's' binds a source, 'j' adds a join
        for pattern in ["sjsj", "ssjj", "jssj", "sssjjj", "ssjsjj"] {
            let mut a = analysis();
            for (i, step) in pattern.chars().enumerate() {
                let before = a.joins().len();
                let result = match step {
                    's' => a.add_data_source(SourceName::of(format!("s{}", i)), stream("src")),
                    _ => a.add_join(join()),
                };
                if result.is_err() {
                    assert_eq!(a.joins().len(), before);
                }
                assert!(a.joins().len() < a.from_sources().len().max(1));
            }
        }
    }

    #[test]
    fn test_group_by_duplicate_is_all_or_nothing() {
        let e1 = Expression::column("a");
        let e2 = Expression::column("b");

        let mut a = analysis();
        let err = a.set_group_by(vec![e1.clone(), e2.clone(), e1.clone()]).unwrap_err();
        assert_eq!(err, AnalyzerError::DuplicateClauseElement { clause: Clause::GroupBy, expression: e1.clone() });
        assert!(a.group_by_expressions().is_empty());

        a.set_group_by(vec![e1.clone(), e2.clone()]).unwrap();
        let order: Vec<&Expression> = a.group_by_expressions().iter().collect();
        assert_eq!(order, vec![&e1, &e2]);

        assert!(a.set_group_by(vec![Expression::column("c"), e2.clone()]).is_err());
        assert_eq!(a.group_by_expressions().len(), 2);
    }

    #[test]
    fn test_select_column_refs_idempotent() {
        let mut a = analysis();
        a.add_select_column_refs([ColumnName::of("A")]);
        a.add_select_column_refs([ColumnName::of("A")]);
        assert_eq!(a.select_column_names().len(), 1);
        assert!(a.select_column_names().contains(&ColumnName::of("a")));
    }

    #[test]
    fn test_select_items_keep_order() {
        let mut a = analysis();
        a.add_select_item(SelectItem::single(Expression::column("b")));
        a.add_select_item(SelectItem::single(Expression::column("a")));
        assert_eq!(a.select_items()[0], SelectItem::single(Expression::column("b")));
        assert_eq!(a.select_items()[1], SelectItem::single(Expression::column("a")));
    }

    #[test]
    fn test_duplicate_alias_leaves_state_unchanged() {
        let mut a = analysis();
        a.add_data_source(SourceName::of("x"), stream("orders")).unwrap();
        let err = a.add_data_source(SourceName::of("X"), stream("users")).unwrap_err();
        assert_eq!(err, AnalyzerError::DuplicateAlias(SourceName::of("x")));
        assert!(!err.is_internal());
        assert_eq!(a.from_sources().len(), 1);
        assert_eq!(a.from_sources()[0].data_source().name, SourceName::of("orders"));
        assert_eq!(a.source_schemas(false).unwrap().source_names(), vec![SourceName::of("x")]);
        assert!(a.add_join(join()).is_err());
    }

    #[test]
    fn test_unsupported_source_leaves_state_unchanged() {
        let mut a = analysis();
        a.add_data_source(SourceName::of("s"), stream("orders")).unwrap();
        let err = a.add_data_source(SourceName::of("q"), source("q1", DataSourceType::Subquery, false)).unwrap_err();
        assert!(matches!(err, AnalyzerError::UnsupportedSourceKind { .. }));
        assert_eq!(a.from_sources().len(), 1);
    }

    #[test]
    fn test_single_valued_clauses_set_once() {
        let mut a = analysis();
        a.set_where(Expression::column("x")).unwrap();
        assert_eq!(
            a.set_where(Expression::column("y")),
            Err(AnalyzerError::ClauseAlreadySet { clause: Clause::Where })
        );
        assert_eq!(a.where_expression(), Some(&Expression::column("x")));

        a.set_limit(10).unwrap();
        assert!(a.set_limit(5).is_err());
        assert_eq!(a.limit(), Some(10));

        a.set_having(Expression::column("h")).unwrap();
        assert!(a.set_having(Expression::column("h")).is_err());

        a.set_partition_by(Expression::column("p")).unwrap();
        assert!(a.set_partition_by(Expression::column("p")).is_err());

        a.set_window(WindowExpression::tumbling(Duration::from_secs(1))).unwrap();
        assert!(a.set_window(WindowExpression::tumbling(Duration::from_secs(2))).is_err());

        let topic = KsqlTopic::new("out", KeyFormat::non_windowed(Format::Kafka), ValueFormat::of(Format::Json));
        a.set_into(Into::new(SourceName::of("out"), true, topic.clone(), [SerdeOption::WrapSingleValues])).unwrap();
        assert!(a.set_into(Into::new(SourceName::of("out2"), true, topic, [])).is_err());
        assert_eq!(a.sink().unwrap().name(), &SourceName::of("out"));
    }

    #[test]
    fn test_properties_and_table_functions() {
        let mut a = analysis();
        let props = CreateSourceAsProperties::from_json(&serde_json::json!({"partitions": 2})).unwrap();
        a.set_properties(props.clone());
        assert_eq!(a.properties(), &props);

        a.add_table_function(FunctionCall::new("explode", vec![Expression::column("items")]));
        a.add_table_function(FunctionCall::new("explode", vec![Expression::column("items")]));
        assert_eq!(a.table_functions().len(), 2);
    }

    #[test]
    fn test_source_schemas_requires_sources() {
        assert_eq!(analysis().source_schemas(false).unwrap_err(), AnalyzerError::NoSourcesBound);
    }

    #[test]
    fn test_non_windowed_source_schema_unchanged() {
        let mut a = analysis();
        a.add_data_source(SourceName::of("s"), stream("orders")).unwrap();

        let schemas = a.source_schemas(false).unwrap();
        assert_eq!(schemas.schema_of(&SourceName::of("S")), Some(&schema()));

        // no window clause: post-aggregate alone does not merge
        let schemas = a.source_schemas(true).unwrap();
        assert_eq!(schemas.schema_of(&SourceName::of("S")), Some(&schema()));
    }

    #[test]
    fn test_windowed_group_by_merges_post_aggregate_only() {
        let mut a = analysis();
        a.add_data_source(SourceName::of("s"), stream("orders")).unwrap();
        a.set_window(WindowExpression::tumbling(Duration::from_secs(60))).unwrap();

        let pre = a.source_schemas(false).unwrap();
        assert_eq!(pre.schema_of(&SourceName::of("S")), Some(&schema()));

        let post = a.source_schemas(true).unwrap();
        let merged = post.schema_of(&SourceName::of("S")).unwrap();
        assert_eq!(merged, &schema().with_meta_and_key_cols_in_value(true));
        let rowtime = merged.find_value_column(&ColumnName::rowtime()).unwrap();
        assert_eq!(rowtime.namespace, Namespace::Value);
        assert!(merged.find_value_column(&ColumnName::of("ID")).is_some());
        assert!(merged.find_value_column(&ColumnName::window_start()).is_some());
    }

    #[test]
    fn test_windowed_source_merges_always() {
        let mut a = analysis();
        a.add_data_source(SourceName::of("w"), source("win", DataSourceType::Table, true)).unwrap();
        a.add_data_source(SourceName::of("p"), stream("plain")).unwrap();

        for post_aggregate in [false, true] {
            let schemas = a.source_schemas(post_aggregate).unwrap();
            assert_eq!(schemas.schema_of(&SourceName::of("W")), Some(&schema().with_meta_and_key_cols_in_value(true)));
            assert_eq!(schemas.schema_of(&SourceName::of("P")), Some(&schema()));
        }
    }

    #[test]
    fn test_source_schemas_is_deterministic() {
        let mut a = analysis();
        a.add_data_source(SourceName::of("s"), stream("orders")).unwrap();
        a.set_window(WindowExpression::session(Duration::from_secs(5))).unwrap();
        assert_eq!(a.source_schemas(true).unwrap(), a.source_schemas(true).unwrap());
    }

    #[test]
    fn test_default_argument() {
        let mut a = analysis();
        assert_eq!(a.default_argument(), Err(AnalyzerError::NoSourcesBound));

        a.add_data_source(SourceName::of("S"), stream("orders")).unwrap();
        a.add_data_source(SourceName::of("T"), stream("users")).unwrap();
        let arg = a.default_argument().unwrap();
        assert_eq!(arg, ColumnReference::qualified(SourceName::of("S"), ColumnName::of("ROWTIME")));
        assert_eq!(arg.to_string(), "S.ROWTIME");
    }

    #[test]
    fn test_join_with_within() {
        let mut a = analysis();
        a.add_data_source(SourceName::of("a"), stream("orders")).unwrap();
        a.add_data_source(SourceName::of("b"), stream("shipments")).unwrap();
        let within = WithinExpression::symmetric(Duration::from_secs(3600));
        let info = JoinInfo::new(Expression::qualified_column("a", "id"), Expression::qualified_column("b", "id"), JoinType::Left, Some(within));
        a.add_join(info).unwrap();

        let j = &a.joins()[0];
        assert_eq!(j.join_type(), JoinType::Left);
        assert_eq!(j.within(), Some(&within));
        assert_eq!(j.left_join_expression(), &Expression::qualified_column("A", "ID"));
    }
}
