//! Database schema definitions

/// SQL to create the users table
pub const CREATE_USERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY,
    name TEXT
)
"#;

/// SQL to create the submissions table
///
/// The foreign key is declared but not enforced: `BotStore` switches
/// `PRAGMA foreign_keys` off on every connection it opens, so a dangling
/// reviewer is stored as-is.
pub const CREATE_SUBMISSIONS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS submissions (
    id INTEGER PRIMARY KEY,
    reviewer INTEGER REFERENCES users(id)
)
"#;

/// SQL to create the reviewer lookup index
pub const CREATE_REVIEWER_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_reviewer ON submissions(reviewer)";

/// Kind of an object in `sqlite_master`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Table,
    Index,
}

impl ObjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Table => "table",
            ObjectKind::Index => "index",
        }
    }
}

/// A schema object and the statement that creates it
#[derive(Debug, Clone, Copy)]
pub struct SchemaObject {
    pub kind: ObjectKind,
    pub name: &'static str,
    pub create: &'static str,
}

/// All schema objects, in creation order
pub const SCHEMA_OBJECTS: &[SchemaObject] = &[
    SchemaObject {
        kind: ObjectKind::Table,
        name: "users",
        create: CREATE_USERS_TABLE,
    },
    SchemaObject {
        kind: ObjectKind::Table,
        name: "submissions",
        create: CREATE_SUBMISSIONS_TABLE,
    },
    SchemaObject {
        kind: ObjectKind::Index,
        name: "idx_reviewer",
        create: CREATE_REVIEWER_INDEX,
    },
];
