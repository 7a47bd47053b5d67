//! Builds `UPDATE` statements from sparse patches.
//!
//! Columns and their bound values are pushed as pairs into one ordered list,
//! and the SQL text and parameter vector are rendered from that list in a
//! single pass, so placeholder `?n` always binds the n-th value.

use organizer_core::patch::Field;
use rusqlite::types::Value;

/// A rendered statement ready for `rusqlite::params_from_iter`.
#[derive(Debug)]
pub struct Statement {
  pub sql:    String,
  pub params: Vec<Value>,
}

#[derive(Debug)]
pub struct UpdateBuilder {
  table:       &'static str,
  assignments: Vec<(&'static str, Value)>,
}

impl UpdateBuilder {
  pub fn new(table: &'static str) -> Self {
    Self { table, assignments: Vec::new() }
  }

  /// Assign `column` if `field` is set; otherwise the column is not named.
  pub fn field<T: Into<Value>>(&mut self, column: &'static str, field: Field<T>) -> &mut Self {
    if let Field::Set(value) = field {
      self.assignments.push((column, value.into()));
    }
    self
  }

  /// `true` when no column has been assigned.
  pub fn is_empty(&self) -> bool { self.assignments.is_empty() }

  /// Render `UPDATE <table> SET ..., updated_at = ? WHERE <keys> RETURNING
  /// <returning>`.
  ///
  /// Returns `None` when nothing was assigned; the caller should read the
  /// row back instead of issuing a write.
  pub fn build(
    self,
    updated_at: String,
    keys: Vec<(&'static str, Value)>,
    returning: &str,
  ) -> Option<Statement> {
    if self.is_empty() {
      return None;
    }

    let mut params = Vec::with_capacity(self.assignments.len() + keys.len() + 1);
    let mut sets = Vec::with_capacity(self.assignments.len() + 1);
    let assignments = self
      .assignments
      .into_iter()
      .chain(std::iter::once(("updated_at", Value::Text(updated_at))));
    for (column, value) in assignments {
      params.push(value);
      sets.push(format!("{column} = ?{}", params.len()));
    }

    let mut conds = Vec::with_capacity(keys.len());
    for (column, value) in keys {
      params.push(value);
      conds.push(format!("{column} = ?{}", params.len()));
    }

    let sql = format!(
      "UPDATE {} SET {} WHERE {} RETURNING {returning}",
      self.table,
      sets.join(", "),
      conds.join(" AND "),
    );
    Some(Statement { sql, params })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_builder_renders_nothing() {
    let b = UpdateBuilder::new("notes");
    assert!(b.is_empty());
    assert!(b.build("now".into(), vec![("id", Value::Integer(1))], "id").is_none());
  }

  #[test]
  fn unset_fields_are_not_named() {
    let mut b = UpdateBuilder::new("notes");
    b.field("note_date", Field::<String>::Unset)
      .field("content", Field::Set("hello".to_string()))
      .field("hidden", Field::<bool>::Unset);

    let stmt = b
      .build(
        "2025-01-01T00:00:00+00:00".into(),
        vec![("id", Value::Integer(3)), ("user_id", Value::Integer(9))],
        "id",
      )
      .unwrap();

    assert_eq!(
      stmt.sql,
      "UPDATE notes SET content = ?1, updated_at = ?2 WHERE id = ?3 AND user_id = ?4 RETURNING id"
    );
    assert_eq!(
      stmt.params,
      vec![
        Value::Text("hello".into()),
        Value::Text("2025-01-01T00:00:00+00:00".into()),
        Value::Integer(3),
        Value::Integer(9),
      ]
    );
  }

  #[test]
  fn placeholders_follow_insertion_order() {
    let mut b = UpdateBuilder::new("users");
    b.field("role", Field::Set("admin".to_string()))
      .field("email", Field::Set(String::new()))
      .field("first_name", Field::Set("Ann".to_string()));

    let stmt = b.build("t".into(), vec![("id", Value::Integer(1))], "id").unwrap();
    assert!(stmt.sql.contains("role = ?1, email = ?2, first_name = ?3, updated_at = ?4"));
    assert!(stmt.sql.contains("WHERE id = ?5"));
    assert_eq!(stmt.params.len(), 5);
    assert_eq!(stmt.params[1], Value::Text(String::new()));
  }

  #[test]
  fn booleans_bind_as_integers() {
    let mut b = UpdateBuilder::new("notes");
    b.field("starred", Field::Set(true));
    let stmt = b.build("t".into(), vec![("id", Value::Integer(1))], "id").unwrap();
    assert_eq!(stmt.params[0], Value::Integer(1));
  }
}
