pub const TABLE_NAME: &str = "HIVE_15388";
pub const BASE_CLAUSE: &str = "i = 0";

const BASE_SQL: &str = "select * from HIVE_15388 where ";

/// Wraps `seed` in parentheses and ORs it with [`BASE_CLAUSE`], `count` times.
pub fn build_where_condition(seed: &str, count: usize) -> String {
    (0..count).fold(seed.to_string(), |condition, _| {
        format!("({condition}) OR {BASE_CLAUSE}")
    })
}

pub fn build_sql(count: usize) -> String {
    let condition = build_where_condition(BASE_CLAUSE, count);

    let mut sql = String::with_capacity(BASE_SQL.len() + condition.len());
    sql.push_str(BASE_SQL);
    sql.push_str(&condition);
    sql
}
