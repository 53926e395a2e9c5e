use cloudbm_core::db::open_db_in_memory;
use cloudbm_core::{
    CatalogErrorKind, CatalogItem, CatalogKind, CatalogListQuery, CatalogService,
    CatalogServiceError, CatalogValidationError, SqliteCatalogStore,
};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn service(conn: &Connection, catalog: CatalogKind) -> CatalogService<SqliteCatalogStore<'_>> {
    CatalogService::new(SqliteCatalogStore::try_new(conn, catalog).unwrap())
}

fn item_count(conn: &Connection, catalog: CatalogKind) -> i64 {
    conn.query_row(
        "SELECT COUNT(*) FROM catalog_items WHERE catalog = ?1;",
        [catalog.as_str()],
        |row| row.get(0),
    )
    .unwrap()
}

#[test]
fn create_then_get_returns_stored_item() {
    let conn = open_db_in_memory().unwrap();
    let jobs = service(&conn, CatalogKind::JobTitle);

    let created = jobs
        .create_item(
            CatalogItem::new("Engineer")
                .with_translation("en", "Engineer", "Builds things")
                .with_translation("NL-be", "Ingenieur", ""),
        )
        .unwrap();

    assert!(!created.id.is_empty());
    assert_eq!(created.key, "engineer");
    assert_eq!(created.translations.len(), 2);
    assert_eq!(created.translations[1].language, "nl");
    assert_eq!(created.translations[1].normalized_name, "ingenieur");

    let loaded = jobs.get_item_by_id(&created.id).unwrap();
    assert_eq!(loaded, created);

    let by_key = jobs.get_item_by_key("  ENGINEER ").unwrap().unwrap();
    assert_eq!(by_key.id, created.id);
}

#[test]
fn create_discards_caller_supplied_id() {
    let conn = open_db_in_memory().unwrap();
    let industries = service(&conn, CatalogKind::Industry);

    let mut candidate = CatalogItem::new("retail");
    candidate.id = "caller-chosen".to_string();
    let created = industries.create_item(candidate).unwrap();

    assert_ne!(created.id, "caller-chosen");
}

#[test]
fn get_missing_item_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let titles = service(&conn, CatalogKind::ContactTitle);

    let err = titles.get_item_by_id("missing").unwrap_err();
    assert!(matches!(
        err,
        CatalogServiceError::NotFound { catalog: CatalogKind::ContactTitle, ref id } if id == "missing"
    ));
    assert!(titles.get_item_by_key("missing").unwrap().is_none());
}

#[test]
fn catalogs_are_isolated_from_each_other() {
    let conn = open_db_in_memory().unwrap();
    let phones = service(&conn, CatalogKind::PhoneType);
    let emails = service(&conn, CatalogKind::EmailType);

    let phone = phones
        .create_item(CatalogItem::new("work").with_translation("en", "Work", ""))
        .unwrap();
    emails
        .create_item(CatalogItem::new("work").with_translation("en", "Work", ""))
        .unwrap();

    assert!(emails.get_item_by_id(&phone.id).is_err());
    assert_eq!(item_count(&conn, CatalogKind::PhoneType), 1);
    assert_eq!(item_count(&conn, CatalogKind::EmailType), 1);
}

#[test]
fn duplicate_key_is_case_insensitive_and_writes_nothing() {
    let conn = open_db_in_memory().unwrap();
    let companies = service(&conn, CatalogKind::CompanyType);

    companies.create_item(CatalogItem::new("llc")).unwrap();
    let err = companies.create_item(CatalogItem::new(" LLC ")).unwrap_err();

    assert!(matches!(err, CatalogServiceError::DuplicateKey { ref key, .. } if key == "llc"));
    assert_eq!(err.kind(), CatalogErrorKind::DuplicateKey);
    assert_eq!(item_count(&conn, CatalogKind::CompanyType), 1);
}

#[test]
fn duplicate_name_in_same_language_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let jobs = service(&conn, CatalogKind::JobTitle);

    jobs.create_item(CatalogItem::new("dev").with_translation("en", "Developer", ""))
        .unwrap();
    let err = jobs
        .create_item(CatalogItem::new("coder").with_translation("en-GB", " developer ", ""))
        .unwrap_err();

    assert!(matches!(
        err,
        CatalogServiceError::DuplicateName { ref language, .. } if language == "en"
    ));
    assert_eq!(item_count(&conn, CatalogKind::JobTitle), 1);
}

#[test]
fn same_name_in_another_language_is_allowed() {
    let conn = open_db_in_memory().unwrap();
    let titles = service(&conn, CatalogKind::ContactTitle);

    titles
        .create_item(CatalogItem::new("dr").with_translation("en", "Doctor", ""))
        .unwrap();
    titles
        .create_item(CatalogItem::new("dr-nl").with_translation("nl", "Doctor", ""))
        .unwrap();

    assert_eq!(item_count(&conn, CatalogKind::ContactTitle), 2);
}

#[test]
fn structural_validation_errors_are_reported() {
    let conn = open_db_in_memory().unwrap();
    let industries = service(&conn, CatalogKind::Industry);

    let err = industries.create_item(CatalogItem::new("   ")).unwrap_err();
    assert!(matches!(
        err,
        CatalogServiceError::Validation(CatalogValidationError::EmptyKey)
    ));

    let err = industries
        .create_item(CatalogItem::new("food").with_translation("english", "Food", ""))
        .unwrap_err();
    assert!(matches!(
        err,
        CatalogServiceError::Validation(CatalogValidationError::InvalidLanguage(_))
    ));

    let err = industries
        .create_item(CatalogItem::new("food").with_translation("en", "  ", ""))
        .unwrap_err();
    assert!(matches!(
        err,
        CatalogServiceError::Validation(CatalogValidationError::EmptyName { .. })
    ));

    let err = industries
        .create_item(
            CatalogItem::new("food")
                .with_translation("en", "Food", "")
                .with_translation("EN-us", "Foods", ""),
        )
        .unwrap_err();
    assert!(matches!(
        err,
        CatalogServiceError::Validation(CatalogValidationError::DuplicateLanguage(ref language))
            if language == "en"
    ));

    assert_eq!(item_count(&conn, CatalogKind::Industry), 0);
}

#[test]
fn update_replaces_translations_wholesale() {
    let conn = open_db_in_memory().unwrap();
    let jobs = service(&conn, CatalogKind::JobTitle);

    let created = jobs
        .create_item(
            CatalogItem::new("cto")
                .with_translation("en", "CTO", "")
                .with_translation("fr", "DT", ""),
        )
        .unwrap();

    let updated = jobs
        .update_item(
            &created.id,
            CatalogItem::new("").with_translation("de", "Technischer Leiter", "Leitung"),
        )
        .unwrap();

    assert_eq!(updated.key, "cto");
    assert_eq!(updated.translations.len(), 1);
    assert_eq!(updated.translations[0].language, "de");
    assert_eq!(updated.translations[0].description, "Leitung");

    let stale_rows: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM catalog_translations WHERE item_id = ?1 AND language IN ('en', 'fr');",
            [created.id.as_str()],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(stale_rows, 0);
}

#[test]
fn resaving_unchanged_item_succeeds() {
    let conn = open_db_in_memory().unwrap();
    let titles = service(&conn, CatalogKind::ContactTitle);

    let created = titles
        .create_item(CatalogItem::new("mr").with_translation("en", "Mister", ""))
        .unwrap();
    let updated = titles.update_item(&created.id, created.clone()).unwrap();

    assert_eq!(updated.key, created.key);
    assert_eq!(updated.translations, created.translations);
}

#[test]
fn update_rejects_name_taken_by_another_item() {
    let conn = open_db_in_memory().unwrap();
    let titles = service(&conn, CatalogKind::ContactTitle);

    titles
        .create_item(CatalogItem::new("mr").with_translation("en", "Mister", ""))
        .unwrap();
    let ms = titles
        .create_item(CatalogItem::new("ms").with_translation("en", "Miss", ""))
        .unwrap();

    let err = titles
        .update_item(&ms.id, CatalogItem::new("ms").with_translation("en", "MISTER", ""))
        .unwrap_err();
    assert_eq!(err.kind(), CatalogErrorKind::DuplicateName);

    let unchanged = titles.get_item_by_id(&ms.id).unwrap();
    assert_eq!(unchanged.translations[0].name, "Miss");
}

#[test]
fn update_can_rename_key_of_user_item() {
    let conn = open_db_in_memory().unwrap();
    let companies = service(&conn, CatalogKind::CompanyType);

    let created = companies.create_item(CatalogItem::new("bv")).unwrap();
    companies.create_item(CatalogItem::new("nv")).unwrap();

    let renamed = companies
        .update_item(&created.id, CatalogItem::new("B.V."))
        .unwrap();
    assert_eq!(renamed.key, "b.v.");

    let err = companies
        .update_item(&created.id, CatalogItem::new("NV"))
        .unwrap_err();
    assert_eq!(err.kind(), CatalogErrorKind::DuplicateKey);
}

#[test]
fn update_missing_item_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let industries = service(&conn, CatalogKind::Industry);

    let err = industries
        .update_item("missing", CatalogItem::new("x"))
        .unwrap_err();
    assert_eq!(err.kind(), CatalogErrorKind::NotFound);
}

#[test]
fn system_items_cannot_be_deleted_or_rekeyed() {
    let conn = open_db_in_memory().unwrap();
    let taxes = service(&conn, CatalogKind::TaxProfile);

    let mut candidate = CatalogItem::new("vat-high")
        .with_translation("en", "VAT high", "")
        .with_rate(Decimal::new(21, 2));
    candidate.is_system = true;
    let system = taxes.create_item(candidate).unwrap();
    assert!(system.is_system);

    let err = taxes.delete_item(&system.id).unwrap_err();
    assert!(matches!(err, CatalogServiceError::ReadOnly { .. }));

    let err = taxes
        .update_item(&system.id, CatalogItem::new("vat-21"))
        .unwrap_err();
    assert!(matches!(err, CatalogServiceError::ReadOnly { .. }));

    let relabelled = taxes
        .update_item(
            &system.id,
            CatalogItem::new("vat-high")
                .with_translation("en", "VAT 21%", "")
                .with_rate(Decimal::new(21, 2)),
        )
        .unwrap();
    assert!(relabelled.is_system);
    assert_eq!(relabelled.translations[0].name, "VAT 21%");
    assert_eq!(item_count(&conn, CatalogKind::TaxProfile), 1);
}

#[test]
fn delete_removes_item_and_translations() {
    let conn = open_db_in_memory().unwrap();
    let industries = service(&conn, CatalogKind::Industry);

    let created = industries
        .create_item(CatalogItem::new("mining").with_translation("en", "Mining", ""))
        .unwrap();
    industries.delete_item(&created.id).unwrap();

    assert_eq!(item_count(&conn, CatalogKind::Industry), 0);
    let translations: i64 = conn
        .query_row("SELECT COUNT(*) FROM catalog_translations;", [], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(translations, 0);

    let err = industries.delete_item(&created.id).unwrap_err();
    assert_eq!(err.kind(), CatalogErrorKind::NotFound);
}

#[test]
fn list_returns_everything_with_default_query() {
    let conn = open_db_in_memory().unwrap();
    let jobs = service(&conn, CatalogKind::JobTitle);
    for key in ["a", "b", "c"] {
        jobs.create_item(CatalogItem::new(key)).unwrap();
    }

    let page = jobs.list_items(&CatalogListQuery::default()).unwrap();
    assert_eq!(page.total_count, 3);
    assert_eq!(page.items.len(), 3);
}

#[test]
fn tax_profile_rate_round_trips_exactly() {
    let conn = open_db_in_memory().unwrap();
    let taxes = service(&conn, CatalogKind::TaxProfile);

    let created = taxes
        .create_item(
            CatalogItem::new("vat-reduced")
                .with_translation("en", "VAT reduced", "")
                .with_rate(Decimal::new(900, 4)),
        )
        .unwrap();
    assert_eq!(created.rate, Some(Decimal::new(9, 2)));

    let stored: String = conn
        .query_row(
            "SELECT rate FROM catalog_items WHERE id = ?1;",
            [created.id.as_str()],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(stored, "0.0900");

    let updated = taxes
        .update_item(
            &created.id,
            CatalogItem::new("vat-reduced")
                .with_translation("en", "VAT reduced", "")
                .with_rate(Decimal::new(6, 2)),
        )
        .unwrap();
    assert_eq!(updated.rate, Some(Decimal::new(6, 2)));
    assert_eq!(
        taxes.get_item_by_id(&created.id).unwrap().rate,
        Some(Decimal::new(6, 2))
    );
}

#[test]
fn rate_rules_depend_on_the_catalog() {
    let conn = open_db_in_memory().unwrap();
    let taxes = service(&conn, CatalogKind::TaxProfile);

    let err = taxes.create_item(CatalogItem::new("vat-none")).unwrap_err();
    assert!(matches!(
        err,
        CatalogServiceError::Validation(CatalogValidationError::MissingRate)
    ));

    let err = taxes
        .create_item(CatalogItem::new("vat-neg").with_rate(Decimal::new(-1, 2)))
        .unwrap_err();
    assert!(matches!(
        err,
        CatalogServiceError::Validation(CatalogValidationError::NegativeRate(_))
    ));

    let zero = taxes
        .create_item(CatalogItem::new("vat-zero").with_rate(Decimal::ZERO))
        .unwrap();
    let err = taxes
        .update_item(&zero.id, CatalogItem::new("vat-zero"))
        .unwrap_err();
    assert!(matches!(
        err,
        CatalogServiceError::Validation(CatalogValidationError::MissingRate)
    ));
    assert_eq!(
        taxes.get_item_by_id(&zero.id).unwrap().rate,
        Some(Decimal::ZERO)
    );

    let industries = service(&conn, CatalogKind::Industry);
    let err = industries
        .create_item(CatalogItem::new("mining").with_rate(Decimal::ONE))
        .unwrap_err();
    assert!(matches!(
        err,
        CatalogServiceError::Validation(CatalogValidationError::UnexpectedRate(
            CatalogKind::Industry
        ))
    ));
    assert_eq!(item_count(&conn, CatalogKind::Industry), 0);
}
