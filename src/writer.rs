//! Renders a [SelectStatement] as BQL text.
//!
//! Clauses always come in this order, and only show up when they have content:
//! ```text
//! SELECT [DISTINCT] <items> FROM <sources> [WHERE <cond>] [GROUP BY <exprs>] [HAVING <cond>]
//! [ORDER BY <expr> (ASC|DESC), ...] [LIMIT n] [OFFSET n]
//! ```
//! Formatting only changes whitespace: single spaces on one line, or one clause per line with
//! list items indented below it.
use crate::condition::{render_conditions, Condition, ConditionMode};
use crate::identifiers::escape_identifier_if_required;
use crate::refs::Reference;
use crate::statement::{
    GroupBy, JoinType, OrderBy, SelectStatement, SelectStatementItem, SourceKind, TableSource,
};
use log::{debug, error};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use thiserror::Error;


#[derive(Debug, Error)]
pub enum WriterError {
    #[error("Unsupported GroupBy. `{0}` is neither a grouping key nor an aggregate")]
    UnsupportedGroupBy(String),
    #[error("Join type not supported. `{0}` is not a join we can render")]
    UnsupportedJoinType(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriterOptions {
    /// One clause per line instead of a single line.
    pub format: bool,
    /// How deep this statement is nested in sub-queries.
    pub nesting_level: usize,
    /// Spaces per nesting level when formatting.
    pub indent: usize,
    /// How structured conditions read their right hand side.
    pub condition_mode: ConditionMode,
}

impl Default for WriterOptions {
    fn default() -> Self {
        WriterOptions {
            format: false,
            nesting_level: 0,
            indent: 2,
            condition_mode: ConditionMode::Values,
        }
    }
}

impl WriterOptions {
    pub fn formatted() -> Self {
        WriterOptions {
            format: true,
            ..Default::default()
        }
    }
}

/// Renders `statement` in one go.
pub fn render_statement(
    statement: &SelectStatement,
    options: WriterOptions,
) -> Result<String, crate::Error> {
    Ok(BqlWriter::new(statement, options).to_bql()?)
}

pub struct BqlWriter<'a> {
    statement: &'a SelectStatement,
    options: WriterOptions,
    /// Items left after dropping the blank ones.
    items: Vec<&'a SelectStatementItem>,
    /// Order by entries left after dropping the blank ones.
    order_by: Vec<&'a OrderBy>,
}

impl<'a> BqlWriter<'a> {
    pub fn new(statement: &'a SelectStatement, options: WriterOptions) -> Self {
        let items = statement
            .items
            .iter()
            .filter(|item| !item.is_blank())
            .collect();
        let order_by = statement
            .order_by
            .iter()
            .filter(|order| !order.is_blank())
            .collect();

        BqlWriter {
            statement,
            options,
            items,
            order_by,
        }
    }

    pub fn to_bql(&self) -> Result<String, WriterError> {
        debug!(
            "Writing statement at nesting level {}",
            self.options.nesting_level
        );

        let statement = self.statement;
        let layout = self.layout();
        let mut clauses = vec![self.select_clause()?];

        let sources = statement
            .sources
            .iter()
            .map(|source| self.render_source(source))
            .collect::<Result<Vec<_>, _>>()?;
        clauses.push(OptionalClause::sources(&sources, layout).to_string());

        let filter =
            self.condition_text(statement.where_.as_deref(), &statement.where_conditions);
        clauses.push(FilterClause::new("WHERE", filter, layout).to_string());

        let group_by = self.group_by_expressions();
        clauses.push(OptionalClause::group_by(&group_by, layout).to_string());

        let having =
            self.condition_text(statement.having.as_deref(), &statement.having_conditions);
        clauses.push(FilterClause::new("HAVING", having, layout).to_string());

        let order_by = self
            .order_by
            .iter()
            .map(|order| {
                let direction = order.direction.unwrap_or_default();
                format!("{} {direction}", order.expression)
            })
            .collect::<Vec<_>>();
        clauses.push(OptionalClause::order_by(&order_by, layout).to_string());

        if let Some(limit) = statement.limit.filter(|limit| *limit > 0) {
            clauses.push(format!("LIMIT {limit}"));
        }

        if let Some(offset) = statement.off_set.filter(|offset| *offset > 0) {
            clauses.push(format!("OFFSET {offset}"));
        }

        let clauses: Vec<String> = clauses
            .into_iter()
            .filter(|clause| !clause.is_empty())
            .collect();

        Ok(clauses.join(&layout.clause_break()))
    }

    fn layout(&self) -> Layout {
        Layout {
            format: self.options.format,
            nesting_level: self.options.nesting_level,
            indent: self.options.indent,
        }
    }

    fn select_clause(&self) -> Result<String, WriterError> {
        let intro = if self.statement.distinct {
            "SELECT DISTINCT"
        } else {
            "SELECT"
        };

        let mut items = self
            .items
            .iter()
            .map(|item| render_item(item))
            .collect::<Result<Vec<_>, _>>()?;

        if items.is_empty() {
            items.push("*".to_owned());
        }

        Ok(OptionalClause::list(intro, &items, self.layout()).to_string())
    }

    /// Expressions of the items marked as plain grouping keys.
    fn group_by_expressions(&self) -> Vec<String> {
        self.items
            .iter()
            .filter(|item| item.group_by == Some(GroupBy::GroupBy))
            .map(|item| item.expression.clone())
            .collect()
    }

    fn render_source(&self, source: &TableSource) -> Result<String, WriterError> {
        let mut text = match &source.source {
            SourceKind::Object(object) => object.escape_ref_if_required(),
            SourceKind::SubQuery(statement) => {
                let nested = WriterOptions {
                    nesting_level: self.options.nesting_level + 1,
                    ..self.options
                };

                format!("({})", BqlWriter::new(statement, nested).to_bql()?)
            }
        };

        if let Some(alias) = non_empty(&source.alias) {
            text.push_str(" AS ");
            text.push_str(&escape_identifier_if_required(alias));
        }

        for join in &source.joins {
            let keyword = join_keyword(&join.join_type)?;
            let target = self.render_source(&join.source)?;

            text.push_str(&self.layout().item_break());
            text.push_str(&format!("{keyword} {target}"));

            let on =
                self.condition_text(join.search_condition.as_deref(), &join.search_conditions);
            if let Some(on) = on {
                text.push_str(&format!(" ON {on}"));
            }
        }

        Ok(text)
    }

    /// Free text wins, structured conditions are the fallback.
    fn condition_text(&self, text: Option<&str>, conditions: &[Condition]) -> Option<String> {
        match text.map(str::trim).filter(|text| !text.is_empty()) {
            Some(text) => Some(text.to_owned()),
            None => render_conditions(conditions, self.options.condition_mode),
        }
    }
}

fn render_item(item: &SelectStatementItem) -> Result<String, WriterError> {
    let expression = match &item.group_by {
        Some(GroupBy::Unsupported(marker)) => {
            error!("Cannot write select item {:?}: unsupported group by", item.expression);
            return Err(WriterError::UnsupportedGroupBy(marker.clone()));
        }
        Some(marker) => match marker.aggregate_function() {
            Some(function) => format!("{function}({})", item.expression),
            None => item.expression.clone(),
        },
        None => item.expression.clone(),
    };

    match non_empty(&item.alias) {
        Some(alias) => Ok(format!(
            "{expression} AS {}",
            escape_identifier_if_required(alias)
        )
        .trim_start()
        .to_owned()),
        None => Ok(expression),
    }
}

fn join_keyword(join_type: &JoinType) -> Result<&'static str, WriterError> {
    match join_type {
        JoinType::Cross => Ok("CROSS JOIN"),
        JoinType::Inner => Ok("INNER JOIN"),
        JoinType::LeftOuter => Ok("LEFT OUTER JOIN"),
        JoinType::FullOuter => Ok("FULL OUTER JOIN"),
        JoinType::RightOuter => Ok("RIGHT OUTER JOIN"),
        JoinType::Unsupported(join_type) => {
            error!("Cannot write join of type {join_type:?}");
            Err(WriterError::UnsupportedJoinType(join_type.clone()))
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}

/// Whitespace between the parts of a statement.
#[derive(Debug, Clone, Copy)]
struct Layout {
    format: bool,
    nesting_level: usize,
    indent: usize,
}

impl Layout {
    /// Between two clauses.
    fn clause_break(&self) -> String {
        self.line_break(self.nesting_level)
    }

    /// Between a clause keyword and its first item, and between list items.
    fn item_break(&self) -> String {
        self.line_break(self.nesting_level + 1)
    }

    fn line_break(&self, level: usize) -> String {
        if self.format {
            format!("\n{}", " ".repeat(level * self.indent))
        } else {
            " ".to_owned()
        }
    }
}

struct OptionalClause<'a> {
    intro: &'a str,
    ligature: &'a str,
    items: &'a [String],
    layout: Layout,
}

impl<'a> OptionalClause<'a> {
    fn list(intro: &'a str, items: &'a [String], layout: Layout) -> Self {
        OptionalClause {
            intro,
            ligature: ",",
            items,
            layout,
        }
    }

    fn sources(items: &'a [String], layout: Layout) -> Self {
        Self::list("FROM", items, layout)
    }

    fn group_by(items: &'a [String], layout: Layout) -> Self {
        Self::list("GROUP BY", items, layout)
    }

    fn order_by(items: &'a [String], layout: Layout) -> Self {
        Self::list("ORDER BY", items, layout)
    }
}

/// Displays things like "FROM a, b", "GROUP BY 1, 2, 3", and "ORDER BY 1 ASC, 2 DESC".
/// Displays nothing when there are no items.
impl<'a> Display for OptionalClause<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let Self {
            intro,
            ligature,
            items,
            layout,
        } = self;

        if let Some((first, rest)) = items.split_first() {
            write!(f, "{intro}{}{first}", layout.item_break())?;

            for item in rest {
                write!(f, "{ligature}{}{item}", layout.item_break())?;
            }
        }

        Ok(())
    }
}

/// WHERE and HAVING hold a single condition.
struct FilterClause<'a> {
    intro: &'a str,
    condition: Option<String>,
    layout: Layout,
}

impl<'a> FilterClause<'a> {
    fn new(intro: &'a str, condition: Option<String>, layout: Layout) -> Self {
        FilterClause {
            intro,
            condition,
            layout,
        }
    }
}

impl<'a> Display for FilterClause<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if let Some(condition) = &self.condition {
            write!(f, "{}{}{condition}", self.intro, self.layout.item_break())?;
        }

        Ok(())
    }
}
