use itertools::Itertools;
use libsql::Value;
use url::form_urlencoded;

/// One translated query condition, ready to be AND-ed into a WHERE clause.
/// The value is always bound as a parameter, never spliced into the SQL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub column: String,
    pub op: String,
    pub value: String,
}

/// Allow-list filter configuration for one resource type.
///
/// `safe_params` maps a public parameter name to the operator tokens it
/// accepts. `column_map` maps the public name to the internal column; a name
/// missing from it passes through unchanged (the user and search specs keep
/// theirs empty). `operator_map` maps an operator token to its SQL symbol.
/// Anything not covered by these tables is dropped without error.
pub struct FilterSpec {
    pub safe_params: &'static [(&'static str, &'static [&'static str])],
    pub column_map: &'static [(&'static str, &'static str)],
    pub operator_map: &'static [(&'static str, &'static str)],
}

const EQ_ONLY: &[&str] = &["eq"];
const OPERATORS: &[(&str, &str)] = &[("eq", "=")];

pub const POST_FILTER: FilterSpec = FilterSpec {
    safe_params: &[("authorId", EQ_ONLY), ("postId", EQ_ONLY), ("slug", EQ_ONLY)],
    column_map: &[("authorId", "author_id"), ("postId", "id"), ("slug", "slug")],
    operator_map: OPERATORS,
};

pub const COMMENT_FILTER: FilterSpec = FilterSpec {
    safe_params: &[("authorId", EQ_ONLY), ("postId", EQ_ONLY)],
    column_map: &[("authorId", "author_id"), ("postId", "post_id")],
    operator_map: OPERATORS,
};

pub const LIKED_POST_FILTER: FilterSpec = FilterSpec {
    safe_params: &[("userId", EQ_ONLY), ("postId", EQ_ONLY)],
    column_map: &[("userId", "user_id"), ("postId", "post_id")],
    operator_map: OPERATORS,
};

pub const LIKED_COMMENT_FILTER: FilterSpec = FilterSpec {
    safe_params: &[("userId", EQ_ONLY), ("commentId", EQ_ONLY)],
    column_map: &[("userId", "user_id"), ("commentId", "comment_id")],
    operator_map: OPERATORS,
};

pub const SHARED_POST_FILTER: FilterSpec = FilterSpec {
    safe_params: &[("userId", EQ_ONLY), ("postId", EQ_ONLY)],
    column_map: &[("userId", "user_id"), ("postId", "post_id")],
    operator_map: OPERATORS,
};

pub const FOLLOWER_FILTER: FilterSpec = FilterSpec {
    safe_params: &[("userId", EQ_ONLY), ("followerId", EQ_ONLY)],
    column_map: &[("userId", "user_id"), ("followerId", "follower_id")],
    operator_map: OPERATORS,
};

pub const USER_FILTER: FilterSpec = FilterSpec {
    safe_params: &[
        ("id", EQ_ONLY),
        ("name", EQ_ONLY),
        ("nickname", EQ_ONLY),
        ("email", EQ_ONLY),
    ],
    column_map: &[],
    operator_map: OPERATORS,
};

pub const SEARCH_FILTER: FilterSpec = FilterSpec {
    safe_params: &[("q", EQ_ONLY)],
    column_map: &[],
    operator_map: OPERATORS,
};

/// Splits `base[op]` into base name and operator token. No bracket suffix
/// means the default operator `eq`.
fn split_key(key: &str) -> (&str, &str) {
    if let Some(open) = key.find('[') {
        if let Some(close) = key[open..].find(']') {
            return (&key[..open], &key[open + 1..open + close]);
        }
    }
    (key, "eq")
}

fn lookup<'a>(map: &[(&'a str, &'a str)], key: &str) -> Option<&'a str> {
    map.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

impl FilterSpec {
    /// Translates a raw request query string into conditions, in input order.
    /// Unknown parameters and disallowed operators are dropped, never an
    /// error; an empty result means the caller should list unfiltered.
    pub fn transform(&self, query_string: &str) -> Vec<Condition> {
        let mut conditions = Vec::new();

        for (key, value) in form_urlencoded::parse(query_string.as_bytes()) {
            let (base, op) = split_key(&key);

            let Some((_, allowed_ops)) = self.safe_params.iter().find(|(p, _)| *p == base) else {
                continue;
            };
            if !allowed_ops.contains(&op) {
                continue;
            }
            let Some(symbol) = lookup(self.operator_map, op) else {
                continue;
            };

            let column = lookup(self.column_map, base).unwrap_or(base);

            conditions.push(Condition {
                column: column.to_string(),
                op: symbol.to_string(),
                value: value.into_owned(),
            });
        }

        conditions
    }
}

/// Renders conditions as an AND-conjoined clause with `?1`-style
/// placeholders. Caller appends further placeholders starting at
/// `conditions.len() + 1`.
pub fn where_clause(conditions: &[Condition]) -> String {
    conditions
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{} {} ?{}", c.column, c.op, i + 1))
        .join(" AND ")
}

pub fn bind_values(conditions: &[Condition]) -> Vec<Value> {
    conditions
        .iter()
        .map(|c| Value::Text(c.value.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_parameter_is_dropped() {
        let conds = POST_FILTER.transform("banana[eq]=5&page=2");
        assert!(conds.is_empty());
    }

    #[test]
    fn bare_key_defaults_to_eq() {
        let with_op = POST_FILTER.transform("authorId[eq]=7");
        let without_op = POST_FILTER.transform("authorId=7");
        assert_eq!(with_op, without_op);
        assert_eq!(
            with_op,
            vec![Condition {
                column: "author_id".into(),
                op: "=".into(),
                value: "7".into(),
            }]
        );
    }

    #[test]
    fn disallowed_operator_is_dropped() {
        let conds = POST_FILTER.transform("authorId[ne]=7");
        assert!(conds.is_empty());
    }

    #[test]
    fn empty_column_map_passes_name_through() {
        let conds = USER_FILTER.transform("nickname[eq]=kae");
        assert_eq!(conds[0].column, "nickname");

        let conds = SEARCH_FILTER.transform("q=ferris");
        assert_eq!(conds[0].column, "q");
        assert_eq!(conds[0].value, "ferris");
    }

    #[test]
    fn post_id_maps_to_primary_key_column() {
        let conds = POST_FILTER.transform("postId[eq]=12");
        assert_eq!(conds[0].column, "id");
    }

    #[test]
    fn output_preserves_input_order() {
        let conds = POST_FILTER.transform("slug=hello&authorId=3");
        let columns: Vec<&str> = conds.iter().map(|c| c.column.as_str()).collect();
        assert_eq!(columns, vec!["slug", "author_id"]);
    }

    #[test]
    fn transform_is_idempotent() {
        let qs = "authorId[eq]=3&postId=9&junk=1";
        assert_eq!(COMMENT_FILTER.transform(qs), COMMENT_FILTER.transform(qs));
    }

    #[test]
    fn mixed_known_and_unknown_keeps_only_known() {
        let conds = LIKED_POST_FILTER.transform("userId=4&order=desc&postId[ne]=2");
        assert_eq!(
            conds,
            vec![Condition {
                column: "user_id".into(),
                op: "=".into(),
                value: "4".into(),
            }]
        );
    }

    #[test]
    fn values_are_bound_not_spliced() {
        let conds = POST_FILTER.transform("slug=x%27%3B%20DROP%20TABLE%20posts%3B--");
        assert_eq!(where_clause(&conds), "slug = ?1");

        let values = bind_values(&conds);
        assert_eq!(values.len(), 1);
        assert!(matches!(&values[0], Value::Text(v) if v == "x'; DROP TABLE posts;--"));
    }

    #[test]
    fn where_clause_joins_with_and() {
        let conds = COMMENT_FILTER.transform("authorId=1&postId=2");
        assert_eq!(where_clause(&conds), "author_id = ?1 AND post_id = ?2");
    }
}
