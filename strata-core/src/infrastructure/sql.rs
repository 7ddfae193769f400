// strata-core/src/infrastructure/sql.rs

// Relation and column names come from the project YAML, so they are always
// quoted before being spliced into SQL.

/// `fct_reviews` -> `"fct_reviews"`, `main.t` -> `"main"."t"`.
pub fn quote_ident(name: &str) -> String {
    name.split('.')
        .map(|part| format!("\"{}\"", part.replace('"', "\"\"")))
        .collect::<Vec<_>>()
        .join(".")
}

pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// `catalog.schema.table` split from the right. Missing parts are `None`.
pub fn split_qualified(name: &str) -> (Option<&str>, Option<&str>, &str) {
    let mut parts = name.rsplitn(3, '.');
    let table = parts.next().unwrap_or(name);
    let schema = parts.next();
    let catalog = parts.next();
    (catalog, schema, table)
}
