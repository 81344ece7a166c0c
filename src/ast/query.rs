// SELECT O.ID, U.NAME, COUNT(*) AS TOTAL
// FROM ORDERS O
// LEFT JOIN USERS U ON O.USER_ID = U.ID
// WHERE O.AMOUNT > 10
// GROUP BY O.ID, U.NAME
// WINDOW TUMBLING (SIZE 1 MINUTE)
// HAVING COUNT(*) > 3
// PARTITION BY O.ID
// EMIT CHANGES
// LIMIT 10

use crate::{
    ast::{CreateSourceAsProperties, Expression, Join, SelectItem, WindowExpression},
    metastore::SourceName,
};

/// How a query's results are emitted downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResultMaterialization {
    /// Every intermediate change is emitted.
    #[default]
    Changes,
    /// Only the final result of each window is emitted.
    Final,
}

/// `name [AS alias]` in a FROM or JOIN clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    pub name: SourceName,
    pub alias: Option<SourceName>,
}

impl Relation {
    pub fn named(name: &str) -> Self {
        Self { name: SourceName::of(name), alias: None }
    }

    pub fn aliased(name: &str, alias: &str) -> Self {
        Self { name: SourceName::of(name), alias: Some(SourceName::of(alias)) }
    }

    /// Name the relation is visible under: the alias when given.
    pub fn visible_name(&self) -> SourceName {
        self.alias.clone().unwrap_or_else(|| self.name.clone())
    }
}

/// A parsed SELECT statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub select: Vec<SelectItem>,
    pub from: Relation,
    pub joins: Vec<Join>,
    pub where_clause: Option<Expression>,
    pub group_by: Vec<Expression>,
    pub window: Option<WindowExpression>,
    pub having: Option<Expression>,
    pub partition_by: Option<Expression>,
    pub limit: Option<u32>,
    pub result_materialization: ResultMaterialization,
}

impl Query {
    pub fn new(select: Vec<SelectItem>, from: Relation) -> Self {
        Self {
            select,
            from,
            joins: Vec::new(),
            where_clause: None,
            group_by: Vec::new(),
            window: None,
            having: None,
            partition_by: None,
            limit: None,
            result_materialization: ResultMaterialization::default(),
        }
    }
}

/// Target of `CREATE STREAM/TABLE ... AS SELECT` or `INSERT INTO ... SELECT`.
#[derive(Debug, Clone, PartialEq)]
pub struct Sink {
    pub name: SourceName,
    /// True for CREATE ... AS, false for INSERT INTO an existing source.
    pub create: bool,
    pub properties: CreateSourceAsProperties,
}

impl Sink {
    pub fn create(name: &str, properties: CreateSourceAsProperties) -> Self {
        Self { name: SourceName::of(name), create: true, properties }
    }

    pub fn insert_into(name: &str) -> Self {
        Self { name: SourceName::of(name), create: false, properties: CreateSourceAsProperties::none() }
    }
}
