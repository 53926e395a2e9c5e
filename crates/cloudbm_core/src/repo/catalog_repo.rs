//! Catalog store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the persistence operations the catalog engine composes.
//! - Keep SQL details inside the core persistence boundary.
//! - Offer one transaction scope for read-then-write sequences.
//!
//! # Invariants
//! - A store instance is scoped to exactly one `CatalogKind`; every query
//!   filters on it.
//! - Write paths call `CatalogItem::validate_for()` before SQL mutations.
//! - Translations are stored and returned in caller order.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Rates are stored as decimal text so they round-trip exactly.

use crate::db::DbError;
use crate::model::catalog::CatalogKind;
use crate::model::item::{CatalogItem, CatalogValidationError};
use crate::model::query::{CatalogFilter, CatalogListQuery, CatalogPage, Sort, SortOrder};
use crate::model::translation::LocalizedText;
use crate::text::language::normalize_language;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row, Transaction, TransactionBehavior};
use rust_decimal::Decimal;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

const ITEM_SELECT_SQL: &str = "SELECT
    i.id AS id,
    i.key AS key,
    i.is_default AS is_default,
    i.is_system AS is_system,
    i.rate AS rate
FROM catalog_items i";

/// Sortable columns, by public field name.
const SORTABLE_COLUMNS: &[(&str, &str)] = &[
    ("id", "i.id"),
    ("key", "i.key"),
    ("is_default", "i.is_default"),
    ("is_system", "i.is_system"),
    ("created_at", "i.created_at"),
    ("updated_at", "i.updated_at"),
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for catalog persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(CatalogValidationError),
    Db(DbError),
    /// Write targeted an id with no row in this catalog.
    NotFound(String),
    InvalidData(String),
    UnsupportedSortField(String),
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "catalog item not found: {id}"),
            Self::InvalidData(message) => {
                write!(f, "invalid persisted catalog data: {message}")
            }
            Self::UnsupportedSortField(name) => write!(f, "unsupported sort field `{name}`"),
            Self::MissingRequiredTable(table) => {
                write!(f, "catalog repository requires table `{table}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_)
            | Self::InvalidData(_)
            | Self::UnsupportedSortField(_)
            | Self::MissingRequiredTable(_) => None,
        }
    }
}

impl From<CatalogValidationError> for RepoError {
    fn from(value: CatalogValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Persistence contract for one catalog.
pub trait CatalogStore {
    /// Catalog this store is scoped to.
    fn catalog(&self) -> CatalogKind;
    /// Lists one page of items plus the unpaged match count.
    fn list_items(&self, query: &CatalogListQuery) -> RepoResult<CatalogPage>;
    fn get_item_by_id(&self, id: &str) -> RepoResult<Option<CatalogItem>>;
    /// Looks up by already-normalized key.
    fn get_item_by_key(&self, key: &str) -> RepoResult<Option<CatalogItem>>;
    /// Looks up by translation language and already-normalized name.
    fn get_item_by_name(
        &self,
        language: &str,
        normalized_name: &str,
    ) -> RepoResult<Option<CatalogItem>>;
    /// Returns the flagged default item, first by key when several exist.
    fn get_default_item(&self) -> RepoResult<Option<CatalogItem>>;
    /// Inserts an item and returns its id. Transient items get a new id.
    fn create_item(&self, item: &CatalogItem) -> RepoResult<String>;
    /// Replaces key, flags and the full translation list of a stored item.
    fn update_item(&self, item: &CatalogItem) -> RepoResult<()>;
    fn delete_item(&self, item: &CatalogItem) -> RepoResult<()>;
    /// Runs `op` in one transaction: commit on `Ok`, roll back on `Err`.
    fn atomically<T, E, F>(&self, op: F) -> Result<T, E>
    where
        E: From<RepoError>,
        F: FnOnce(&Self) -> Result<T, E>;
}

/// SQLite-backed catalog store.
pub struct SqliteCatalogStore<'conn> {
    conn: &'conn Connection,
    catalog: CatalogKind,
}

impl<'conn> SqliteCatalogStore<'conn> {
    /// Constructs a store from a migrated connection.
    pub fn try_new(conn: &'conn Connection, catalog: CatalogKind) -> RepoResult<Self> {
        for table in ["catalog_items", "catalog_translations"] {
            if !table_exists(conn, table)? {
                return Err(RepoError::MissingRequiredTable(table));
            }
        }
        Ok(Self { conn, catalog })
    }

    fn query_one(&self, sql: &str, bind_values: Vec<Value>) -> RepoResult<Option<CatalogItem>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        if let Some(row) = rows.next()? {
            let mut item = parse_item_row(row)?;
            item.translations = load_translations(self.conn, &item.id)?;
            return Ok(Some(item));
        }
        Ok(None)
    }

    fn write_translations(&self, item: &CatalogItem) -> RepoResult<()> {
        self.conn.execute(
            "DELETE FROM catalog_translations WHERE item_id = ?1;",
            [item.id.as_str()],
        )?;
        for (position, translation) in item.translations.iter().enumerate() {
            self.conn.execute(
                "INSERT INTO catalog_translations (
                    item_id,
                    position,
                    language,
                    name,
                    normalized_name,
                    description
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
                params![
                    item.id.as_str(),
                    position as i64,
                    translation.language.as_str(),
                    translation.name.as_str(),
                    translation.normalized_name.as_str(),
                    translation.description.as_str(),
                ],
            )?;
        }
        Ok(())
    }
}

impl CatalogStore for SqliteCatalogStore<'_> {
    fn catalog(&self) -> CatalogKind {
        self.catalog
    }

    fn list_items(&self, query: &CatalogListQuery) -> RepoResult<CatalogPage> {
        let mut where_sql = String::from(" WHERE i.catalog = ?");
        let mut bind_values = vec![Value::Text(self.catalog.as_str().to_string())];
        push_filter(&query.filter, &mut where_sql, &mut bind_values);

        let total_count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM catalog_items i{where_sql};"),
            params_from_iter(bind_values.iter()),
            |row| row.get(0),
        )?;

        let mut sql = format!("{ITEM_SELECT_SQL}{where_sql}");
        sql.push_str(&order_by_clause(&query.sort)?);

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if query.offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(query.offset)));
            }
        } else if query.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_item_row(row)?);
        }
        for item in &mut items {
            item.translations = load_translations(self.conn, &item.id)?;
        }

        Ok(CatalogPage {
            items,
            total_count: u64::try_from(total_count).map_err(|_| {
                RepoError::InvalidData(format!("negative item count {total_count}"))
            })?,
        })
    }

    fn get_item_by_id(&self, id: &str) -> RepoResult<Option<CatalogItem>> {
        self.query_one(
            &format!("{ITEM_SELECT_SQL} WHERE i.catalog = ?1 AND i.id = ?2;"),
            vec![
                Value::Text(self.catalog.as_str().to_string()),
                Value::Text(id.to_string()),
            ],
        )
    }

    fn get_item_by_key(&self, key: &str) -> RepoResult<Option<CatalogItem>> {
        self.query_one(
            &format!("{ITEM_SELECT_SQL} WHERE i.catalog = ?1 AND i.key = ?2;"),
            vec![
                Value::Text(self.catalog.as_str().to_string()),
                Value::Text(key.to_string()),
            ],
        )
    }

    fn get_item_by_name(
        &self,
        language: &str,
        normalized_name: &str,
    ) -> RepoResult<Option<CatalogItem>> {
        self.query_one(
            &format!(
                "{ITEM_SELECT_SQL}
                 INNER JOIN catalog_translations t ON t.item_id = i.id
                 WHERE i.catalog = ?1
                   AND t.language = ?2
                   AND t.normalized_name = ?3
                 ORDER BY i.key ASC, i.id ASC
                 LIMIT 1;"
            ),
            vec![
                Value::Text(self.catalog.as_str().to_string()),
                Value::Text(normalize_language(language)),
                Value::Text(normalized_name.to_string()),
            ],
        )
    }

    fn get_default_item(&self) -> RepoResult<Option<CatalogItem>> {
        self.query_one(
            &format!(
                "{ITEM_SELECT_SQL}
                 WHERE i.catalog = ?1
                   AND i.is_default = 1
                 ORDER BY i.key ASC, i.id ASC
                 LIMIT 1;"
            ),
            vec![Value::Text(self.catalog.as_str().to_string())],
        )
    }

    fn create_item(&self, item: &CatalogItem) -> RepoResult<String> {
        item.validate_for(self.catalog)?;

        let mut stored = item.clone();
        if stored.is_transient() {
            stored.id = Uuid::new_v4().to_string();
        }

        self.conn.execute(
            "INSERT INTO catalog_items (
                id,
                catalog,
                key,
                is_default,
                is_system,
                rate
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                stored.id.as_str(),
                self.catalog.as_str(),
                stored.key.as_str(),
                bool_to_int(stored.is_default),
                bool_to_int(stored.is_system),
                rate_to_text(stored.rate),
            ],
        )?;
        self.write_translations(&stored)?;

        Ok(stored.id)
    }

    fn update_item(&self, item: &CatalogItem) -> RepoResult<()> {
        item.validate_for(self.catalog)?;

        let changed = self.conn.execute(
            "UPDATE catalog_items
             SET
                key = ?1,
                is_default = ?2,
                is_system = ?3,
                rate = ?4,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?5
               AND catalog = ?6;",
            params![
                item.key.as_str(),
                bool_to_int(item.is_default),
                bool_to_int(item.is_system),
                rate_to_text(item.rate),
                item.id.as_str(),
                self.catalog.as_str(),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(item.id.clone()));
        }

        self.write_translations(item)
    }

    fn delete_item(&self, item: &CatalogItem) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM catalog_items WHERE id = ?1 AND catalog = ?2;",
            params![item.id.as_str(), self.catalog.as_str()],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(item.id.clone()));
        }
        Ok(())
    }

    fn atomically<T, E, F>(&self, op: F) -> Result<T, E>
    where
        E: From<RepoError>,
        F: FnOnce(&Self) -> Result<T, E>,
    {
        // Immediate: take the write lock up front so concurrent default swaps
        // serialize instead of failing on upgrade.
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)
            .map_err(RepoError::from)?;
        let value = op(self)?;
        tx.commit().map_err(RepoError::from)?;
        Ok(value)
    }
}

fn push_filter(filter: &CatalogFilter, where_sql: &mut String, bind_values: &mut Vec<Value>) {
    let language = filter
        .language
        .as_deref()
        .map(normalize_language)
        .filter(|value| !value.is_empty());
    let name = filter
        .name
        .as_deref()
        .map(|value| value.trim().to_lowercase())
        .filter(|value| !value.is_empty());

    if language.is_none() && name.is_none() {
        return;
    }

    where_sql.push_str(
        " AND EXISTS (
            SELECT 1
            FROM catalog_translations t
            WHERE t.item_id = i.id",
    );
    if let Some(language) = language {
        where_sql.push_str(" AND t.language = ?");
        bind_values.push(Value::Text(language));
    }
    if let Some(name) = name {
        where_sql.push_str(" AND t.normalized_name LIKE ? ESCAPE '\\'");
        bind_values.push(Value::Text(format!("{}%", escape_like(&name))));
    }
    where_sql.push(')');
}

fn order_by_clause(sort: &Sort) -> RepoResult<String> {
    let mut terms = Vec::new();
    for field in &sort.fields {
        let direction = match field.order {
            SortOrder::Ascending => "ASC",
            SortOrder::Descending => "DESC",
            SortOrder::None => continue,
        };
        let column = SORTABLE_COLUMNS
            .iter()
            .find(|(name, _)| *name == field.name.trim())
            .map(|(_, column)| *column)
            .ok_or_else(|| RepoError::UnsupportedSortField(field.name.clone()))?;
        terms.push(format!("{column} {direction}"));
    }
    terms.push("i.key ASC".to_string());
    terms.push("i.id ASC".to_string());
    Ok(format!(" ORDER BY {}", terms.join(", ")))
}

fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn parse_item_row(row: &Row<'_>) -> RepoResult<CatalogItem> {
    Ok(CatalogItem {
        id: row.get("id")?,
        key: row.get("key")?,
        translations: Vec::new(),
        is_default: parse_flag(row.get("is_default")?, "is_default")?,
        is_system: parse_flag(row.get("is_system")?, "is_system")?,
        rate: parse_rate(row.get("rate")?)?,
    })
}

fn parse_rate(value: Option<String>) -> RepoResult<Option<Decimal>> {
    value
        .map(|raw| {
            Decimal::from_str(&raw).map_err(|err| {
                RepoError::InvalidData(format!(
                    "invalid rate `{raw}` in catalog_items.rate: {err}"
                ))
            })
        })
        .transpose()
}

fn rate_to_text(rate: Option<Decimal>) -> Option<String> {
    rate.map(|value| value.to_string())
}

fn parse_flag(value: i64, column: &str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid {column} value `{other}` in catalog_items.{column}"
        ))),
    }
}

fn load_translations(conn: &Connection, item_id: &str) -> RepoResult<Vec<LocalizedText>> {
    let mut stmt = conn.prepare(
        "SELECT
            language,
            name,
            normalized_name,
            description
         FROM catalog_translations
         WHERE item_id = ?1
         ORDER BY position ASC;",
    )?;
    let mut rows = stmt.query([item_id])?;
    let mut translations = Vec::new();
    while let Some(row) = rows.next()? {
        translations.push(LocalizedText {
            language: row.get("language")?,
            name: row.get("name")?,
            normalized_name: row.get("normalized_name")?,
            description: row.get("description")?,
        });
    }
    Ok(translations)
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn bool_to_int(value: bool) -> i64 {
    i64::from(value)
}
